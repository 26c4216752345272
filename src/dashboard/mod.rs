pub mod controller;
pub mod view;

pub use controller::{DashboardController, DashboardHandle, RefreshSettings};

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::info;

use controller::ControlError;

/// Build the Axum router for the dashboard.
pub fn router(handle: DashboardHandle) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/view", get(view_handler))
        .route("/api/sport", post(select_sport_handler))
        .route("/api/refresh", post(refresh_handler))
        .layer(CorsLayer::permissive())
        .with_state(handle)
}

async fn index_handler() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

/// GET /api/view
async fn view_handler(State(handle): State<DashboardHandle>) -> impl IntoResponse {
    let view = handle.view().read().await.clone();
    Json(view)
}

#[derive(Debug, Deserialize)]
struct SelectSport {
    sport: String,
}

/// POST /api/sport  {"sport": "basketball"}
async fn select_sport_handler(
    State(handle): State<DashboardHandle>,
    Json(body): Json<SelectSport>,
) -> Result<StatusCode, (StatusCode, String)> {
    info!("Sport selection requested: {}", body.sport);
    handle
        .select_sport(&body.sport)
        .await
        .map(|_| StatusCode::ACCEPTED)
        .map_err(control_error)
}

/// POST /api/refresh
async fn refresh_handler(
    State(handle): State<DashboardHandle>,
) -> Result<StatusCode, (StatusCode, String)> {
    handle
        .refresh()
        .await
        .map(|_| StatusCode::ACCEPTED)
        .map_err(control_error)
}

fn control_error(e: ControlError) -> (StatusCode, String) {
    let status = match e {
        ControlError::EmptySport => StatusCode::BAD_REQUEST,
        ControlError::Stopped | ControlError::AlreadyStarted => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, e.to_string())
}

/// Embedded single-file dashboard (HTML + CSS + JS). It only draws the
/// render records served by `/api/view`.
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Live Sports Predictions</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  .status-dot { width: 10px; height: 10px; border-radius: 50%; background: var(--muted); display: inline-block; }
  .status-dot.polling { background: var(--green); animation: pulse 1.5s infinite; }
  @keyframes pulse { 0%,100% { opacity: 1; } 50% { opacity: .3; } }
  .sport-selector { display: flex; gap: .5rem; }
  .sport-btn { background: none; border: 1px solid var(--border); color: var(--muted); padding: .3rem .8rem; border-radius: 6px; cursor: pointer; font-size: .85rem; text-transform: capitalize; }
  .sport-btn.active, .sport-btn:hover { border-color: var(--accent); color: var(--accent); }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .error { display: none; background: rgba(255,79,106,.15); color: var(--red); border: 1px solid var(--red); border-radius: 8px; padding: .7rem 1rem; }
  .error.visible { display: block; }
  .panel-title { font-weight: 600; margin-bottom: .8rem; }
  .cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 1rem; }
  .match-card, .prediction-card { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1rem; }
  .teams { display: flex; justify-content: space-between; gap: .5rem; font-weight: 600; }
  .score { color: var(--accent); }
  .match-time, .timestamp { color: var(--muted); font-size: .8rem; margin-top: .4rem; }
  .prediction-card h3 { font-size: 1rem; margin-bottom: .4rem; }
  .confidence { color: var(--green); font-size: .9rem; }
  .empty { color: var(--muted); font-size: .9rem; }
  .refresh-btn { margin-left: auto; background: none; border: 1px solid var(--border); color: var(--muted); padding: .3rem .8rem; border-radius: 6px; cursor: pointer; font-size: .8rem; }
  .refresh-btn:hover { border-color: var(--accent); color: var(--accent); }
</style>
</head>
<body>
<header>
  <span class="status-dot" id="dot"></span>
  <h1>Live Sports Predictions</h1>
  <div class="sport-selector" id="sport-selector"></div>
  <button class="refresh-btn" onclick="post('/api/refresh')">↻ Refresh</button>
  <span style="color:var(--muted);font-size:.8rem;" id="last-updated"></span>
</header>

<main>
  <div class="error" id="error"></div>
  <section>
    <div class="panel-title">Live Matches</div>
    <div class="cards matches-container" id="matches"><p class="empty">Loading…</p></div>
  </section>
  <section>
    <div class="panel-title">Predictions</div>
    <div class="cards predictions-container" id="predictions"><p class="empty">Loading…</p></div>
  </section>
</main>

<script>
function el(tag, cls, text) {
  const e = document.createElement(tag);
  if (cls) e.className = cls;
  if (text !== undefined) e.textContent = text;
  return e;
}

async function post(path, body) {
  await fetch(path, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: body ? JSON.stringify(body) : undefined,
  });
  setTimeout(load, 250);
}

function drawSelector(view) {
  const sel = document.getElementById('sport-selector');
  sel.replaceChildren(...view.sports.map(s => {
    const b = el('button', 'sport-btn' + (s === view.sport ? ' active' : ''), s);
    b.dataset.sport = s;
    b.onclick = () => post('/api/sport', { sport: s });
    return b;
  }));
}

function drawMatches(cards) {
  const box = document.getElementById('matches');
  if (!cards.length) { box.replaceChildren(el('p', 'empty', 'No live matches')); return; }
  box.replaceChildren(...cards.map(m => {
    const card = el('div', 'match-card');
    const teams = el('div', 'teams');
    teams.append(el('span', 'home-team', m.home_team), el('span', 'score', m.score), el('span', 'away-team', m.away_team));
    card.append(teams, el('div', 'match-time', m.time_label));
    return card;
  }));
}

function drawPredictions(cards) {
  const box = document.getElementById('predictions');
  if (!cards.length) { box.replaceChildren(el('p', 'empty', 'No predictions yet')); return; }
  box.replaceChildren(...cards.map(p => {
    const card = el('div', 'prediction-card');
    card.append(
      el('h3', null, p.title),
      el('p', 'prediction', p.prediction),
      el('p', 'confidence', p.confidence_label),
      el('p', 'timestamp', p.updated_label),
    );
    return card;
  }));
}

async function load() {
  const r = await fetch('/api/view');
  if (!r.ok) return;
  const v = await r.json();
  drawSelector(v);
  drawMatches(v.matches);
  drawPredictions(v.predictions);
  const err = document.getElementById('error');
  err.textContent = v.error || '';
  err.className = 'error' + (v.error ? ' visible' : '');
  document.getElementById('dot').className = 'status-dot' + (v.polling ? ' polling' : '');
  document.getElementById('last-updated').textContent =
    v.last_updated ? 'Updated ' + new Date(v.last_updated).toLocaleTimeString() : '';
}

load();
setInterval(load, 3000);
</script>
</body>
</html>"#;
