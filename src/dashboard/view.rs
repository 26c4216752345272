//! Render records for the dashboard page.
//!
//! The refresh loop never produces markup; it writes these records into a
//! shared [`DashboardView`] and the page (or any other front end) draws them.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::{Match, Prediction};

pub type SharedView = Arc<RwLock<DashboardView>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCard {
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    pub score: String,
    /// Match clock with a minute mark, e.g. "45'"
    pub time_label: String,
}

impl From<&Match> for MatchCard {
    fn from(m: &Match) -> Self {
        MatchCard {
            match_id: m.match_id.clone(),
            home_team: m.home_team.clone(),
            away_team: m.away_team.clone(),
            score: m.current_score.clone(),
            time_label: format!("{}'", m.time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionCard {
    pub match_id: String,
    /// "Home vs Away"
    pub title: String,
    pub home_team: String,
    pub away_team: String,
    pub prediction: String,
    /// "Confidence: 73.0%"
    pub confidence_label: String,
    /// "Updated: 14:05:09" in local time
    pub updated_label: String,
}

impl PredictionCard {
    /// `match_id` is the id the prediction was requested for; the backend
    /// does not always echo it back.
    pub fn new(match_id: &str, prediction: &Prediction) -> Self {
        let home = &prediction.match_data.home_team;
        let away = &prediction.match_data.away_team;
        PredictionCard {
            match_id: match_id.to_string(),
            title: format!("{} vs {}", home, away),
            home_team: home.clone(),
            away_team: away.clone(),
            prediction: prediction.prediction.clone(),
            confidence_label: format!("Confidence: {}", format_confidence(prediction.confidence)),
            updated_label: format!("Updated: {}", format_clock(prediction.timestamp)),
        }
    }
}

/// Format a 0.0–1.0 confidence as a percentage with one decimal. Ties
/// round up ("6.25" → "6.3").
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", (confidence * 1000.0).round() / 10.0)
}

fn format_clock(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Everything the page needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// Currently selected sport
    pub sport: String,
    /// Sports offered by the selector
    pub sports: Vec<String>,
    pub matches: Vec<MatchCard>,
    pub predictions: Vec<PredictionCard>,
    /// User-visible notice from the last failed refresh, cleared on success
    pub error: Option<String>,
    /// True while a refresh cycle is in flight
    pub polling: bool,
    /// Completion time of the last successful live-match fetch
    pub last_updated: Option<DateTime<Utc>>,
}

impl DashboardView {
    pub fn new(sport: &str, sports: Vec<String>) -> Self {
        DashboardView {
            sport: sport.to_string(),
            sports,
            matches: Vec::new(),
            predictions: Vec::new(),
            error: None,
            polling: false,
            last_updated: None,
        }
    }

    /// Replace the match area in full and reset the prediction area.
    pub fn render_matches(&mut self, matches: &[Match]) {
        self.matches = matches.iter().map(MatchCard::from).collect();
        self.predictions.clear();
        self.error = None;
        self.last_updated = Some(Utc::now());
    }

    pub fn append_prediction(&mut self, card: PredictionCard) {
        self.predictions.push(card);
    }

    pub fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }
}
