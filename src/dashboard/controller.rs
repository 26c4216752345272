//! Refresh loop driving the dashboard view.
//!
//! A single driver task owns the refresh timer and the selected sport. A sport
//! change or manual refresh starts a new refresh cycle and cancels the
//! previous one if it is still running. A timer tick that lands while a cycle
//! is running is skipped, so slow cycles always finish. Each cycle carries a
//! generation number and only the newest generation may write to the view.

use futures_util::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, RwLockWriteGuard};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::view::{DashboardView, PredictionCard, SharedView};
use crate::api::{FetchError, PredictionBackend};

/// Notice shown on the page when the live-match fetch fails.
pub const UPDATE_FAILED_NOTICE: &str = "Failed to update dashboard";

#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub interval: Duration,
    /// Tag sent with every prediction request, e.g. "match_outcome"
    pub prediction_type: String,
    /// Maximum prediction requests in flight per cycle; 1 is strictly sequential
    pub prediction_workers: usize,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        RefreshSettings {
            interval: Duration::from_secs(60),
            prediction_type: "match_outcome".to_string(),
            prediction_workers: 1,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("sport identifier must not be empty")]
    EmptySport,
    #[error("dashboard controller is not running")]
    Stopped,
    #[error("dashboard controller was already started")]
    AlreadyStarted,
}

#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("refresh cycle superseded by a newer one")]
    Superseded,
}

/// Outcome of a completed refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub matches: usize,
    pub predictions: usize,
    pub failed_predictions: usize,
}

#[derive(Debug)]
enum Command {
    SelectSport(String),
    Refresh,
    Shutdown,
}

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Scheduled,
    SportChanged,
    Manual,
}

/// Cheap, cloneable handle used by the render layer to steer the controller.
#[derive(Clone)]
pub struct DashboardHandle {
    commands: mpsc::Sender<Command>,
    view: SharedView,
}

impl DashboardHandle {
    /// Switch to `sport` and refresh immediately. The standing schedule is
    /// not reset.
    pub async fn select_sport(&self, sport: &str) -> Result<(), ControlError> {
        let sport = sport.trim();
        if sport.is_empty() {
            return Err(ControlError::EmptySport);
        }
        self.send(Command::SelectSport(sport.to_string())).await
    }

    /// Run an out-of-cycle refresh for the current sport.
    pub async fn refresh(&self) -> Result<(), ControlError> {
        self.send(Command::Refresh).await
    }

    pub fn view(&self) -> &SharedView {
        &self.view
    }

    async fn send(&self, command: Command) -> Result<(), ControlError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ControlError::Stopped)
    }
}

/// Owns the refresh timer, sport selection and in-flight cycle for one
/// dashboard session.
pub struct DashboardController {
    backend: Arc<dyn PredictionBackend>,
    settings: RefreshSettings,
    view: SharedView,
    default_sport: String,
    commands: mpsc::Sender<Command>,
    pending: Option<mpsc::Receiver<Command>>,
    driver: Option<JoinHandle<()>>,
}

impl DashboardController {
    pub fn new(
        backend: Arc<dyn PredictionBackend>,
        settings: RefreshSettings,
        default_sport: &str,
        sports: Vec<String>,
    ) -> Self {
        let (commands, pending) = mpsc::channel(32);
        let view = DashboardView::new(default_sport, sports);
        DashboardController {
            backend,
            settings,
            view: Arc::new(tokio::sync::RwLock::new(view)),
            default_sport: default_sport.to_string(),
            commands,
            pending: Some(pending),
            driver: None,
        }
    }

    pub fn handle(&self) -> DashboardHandle {
        DashboardHandle {
            commands: self.commands.clone(),
            view: Arc::clone(&self.view),
        }
    }

    /// Spawn the driver task. The first refresh runs immediately, then on
    /// every interval tick.
    pub fn start(&mut self) -> Result<(), ControlError> {
        let commands = self.pending.take().ok_or(ControlError::AlreadyStarted)?;
        let driver = Driver {
            backend: Arc::clone(&self.backend),
            settings: self.settings.clone(),
            view: Arc::clone(&self.view),
            sport: self.default_sport.clone(),
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: None,
        };
        info!(
            "Starting dashboard refresh loop (sport={}, every {:?}, {} prediction worker(s))",
            self.default_sport, self.settings.interval, self.settings.prediction_workers
        );
        self.driver = Some(tokio::spawn(driver.run(commands)));
        Ok(())
    }

    /// Stop the timer and cancel any in-flight cycle. Waits for the driver
    /// to exit.
    pub async fn stop(&mut self) {
        let Some(driver) = self.driver.take() else {
            return;
        };
        if self.commands.send(Command::Shutdown).await.is_err() {
            debug!("Dashboard driver already gone");
        }
        if let Err(e) = driver.await {
            warn!("Dashboard driver ended abnormally: {}", e);
        }
    }
}

struct Driver {
    backend: Arc<dyn PredictionBackend>,
    settings: RefreshSettings,
    view: SharedView,
    sport: String,
    generation: Arc<AtomicU64>,
    in_flight: Option<JoinHandle<()>>,
}

impl Driver {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        let mut ticker = tokio::time::interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.trigger(Trigger::Scheduled),
                cmd = commands.recv() => match cmd {
                    Some(Command::SelectSport(sport)) => {
                        info!("Sport selected: {}", sport);
                        self.view.write().await.sport = sport.clone();
                        self.sport = sport;
                        self.trigger(Trigger::SportChanged);
                    }
                    Some(Command::Refresh) => self.trigger(Trigger::Manual),
                    Some(Command::Shutdown) | None => break,
                },
            }
        }

        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cancel_in_flight();
        self.view.write().await.polling = false;
        info!("Dashboard refresh loop stopped");
    }

    fn trigger(&mut self, trigger: Trigger) {
        let busy = self
            .in_flight
            .as_ref()
            .is_some_and(|cycle| !cycle.is_finished());
        if busy && matches!(trigger, Trigger::Scheduled) {
            debug!("Previous refresh of {} still running, skipping scheduled tick", self.sport);
            return;
        }
        self.cancel_in_flight();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Refresh cycle #{} for {} ({:?})", generation, self.sport, trigger);

        let cycle = RefreshCycle {
            backend: Arc::clone(&self.backend),
            view: Arc::clone(&self.view),
            sport: self.sport.clone(),
            prediction_type: self.settings.prediction_type.clone(),
            workers: self.settings.prediction_workers.max(1),
            generation,
            current: Arc::clone(&self.generation),
        };
        self.in_flight = Some(tokio::spawn(async move {
            // Failures are already logged and surfaced on the view.
            let _ = cycle.run().await;
        }));
    }

    fn cancel_in_flight(&mut self) {
        if let Some(prev) = self.in_flight.take() {
            if !prev.is_finished() {
                debug!("Cancelling stale refresh cycle");
                prev.abort();
            }
        }
    }
}

/// One pass: fetch live matches, render them, then fetch and append
/// predictions in match order.
struct RefreshCycle {
    backend: Arc<dyn PredictionBackend>,
    view: SharedView,
    sport: String,
    prediction_type: String,
    workers: usize,
    generation: u64,
    current: Arc<AtomicU64>,
}

impl RefreshCycle {
    async fn run(self) -> Result<CycleReport, CycleError> {
        self.write_view().await?.polling = true;

        let matches = match self.backend.get_live_matches(&self.sport).await {
            Ok(m) => m,
            Err(e) => {
                match &e {
                    FetchError::LiveMatches { sport, cause } => {
                        warn!("Refresh for {} aborted: {}", sport, cause)
                    }
                    other => warn!("Refresh for {} aborted: {}", self.sport, other),
                }
                let mut view = self.write_view().await?;
                view.show_error(UPDATE_FAILED_NOTICE);
                view.polling = false;
                return Err(e.into());
            }
        };
        self.write_view().await?.render_matches(&matches);

        let mut report = CycleReport {
            matches: matches.len(),
            ..CycleReport::default()
        };

        let backend = Arc::clone(&self.backend);
        let sport = self.sport.clone();
        let prediction_type = self.prediction_type.clone();
        let mut results = futures_util::stream::iter(matches.iter().cloned())
            .map(move |m| {
                let backend = Arc::clone(&backend);
                let sport = sport.clone();
                let prediction_type = prediction_type.clone();
                async move {
                    let result = backend
                        .get_prediction(&sport, &m.match_id, &prediction_type)
                        .await;
                    (m, result)
                }
            })
            .buffered(self.workers)
            .boxed();

        while let Some((m, result)) = results.next().await {
            match result {
                Ok(prediction) => {
                    let card = PredictionCard::new(&m.match_id, &prediction);
                    self.write_view().await?.append_prediction(card);
                    report.predictions += 1;
                }
                Err(FetchError::Prediction { match_id, cause }) => {
                    warn!("Skipping prediction for match {}: {}", match_id, cause);
                    report.failed_predictions += 1;
                }
                Err(e) => {
                    warn!("Skipping prediction for match {}: {}", m.match_id, e);
                    report.failed_predictions += 1;
                }
            }
        }

        self.write_view().await?.polling = false;
        info!(
            "Refreshed {}: {} match(es), {} prediction(s), {} skipped",
            self.sport, report.matches, report.predictions, report.failed_predictions
        );
        Ok(report)
    }

    /// Lock the view for writing, unless a newer cycle has started.
    async fn write_view(&self) -> Result<RwLockWriteGuard<'_, DashboardView>, CycleError> {
        let guard = self.view.write().await;
        if self.current.load(Ordering::SeqCst) != self.generation {
            debug!("Refresh cycle #{} superseded", self.generation);
            return Err(CycleError::Superseded);
        }
        Ok(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::FetchFailure;
    use crate::api::models::MatchData;
    use crate::api::{Match, Prediction};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    fn make_match(id: &str, home: &str, away: &str) -> Match {
        Match {
            match_id: id.into(),
            home_team: home.into(),
            away_team: away.into(),
            current_score: "1-0".into(),
            time: "45".into(),
            sport: None,
            statistics: None,
        }
    }

    fn make_prediction(home: &str, away: &str, confidence: f64) -> Prediction {
        Prediction {
            match_id: None,
            match_data: MatchData {
                home_team: home.into(),
                away_team: away.into(),
                match_id: None,
                current_score: None,
                statistics: None,
            },
            prediction: format!("{} wins", home),
            confidence,
            timestamp: "2024-01-01T00:00:00Z".parse().unwrap(),
            additional_insights: None,
        }
    }

    fn unavailable() -> FetchFailure {
        FetchFailure::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            detail: None,
        }
    }

    /// Backend that serves canned matches per sport and records every call.
    #[derive(Default)]
    struct ScriptedBackend {
        live: Mutex<HashMap<String, Vec<Match>>>,
        failing_sports: Mutex<HashSet<String>>,
        failing_matches: Mutex<HashSet<String>>,
        prediction_delay: Duration,
        live_calls: Mutex<Vec<String>>,
        prediction_calls: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedBackend {
        fn with_matches(sport: &str, matches: Vec<Match>) -> Self {
            let backend = ScriptedBackend::default();
            backend.set_matches(sport, matches);
            backend
        }

        fn set_matches(&self, sport: &str, matches: Vec<Match>) {
            self.live.lock().unwrap().insert(sport.to_string(), matches);
        }

        fn fail_sport(&self, sport: &str) {
            self.failing_sports.lock().unwrap().insert(sport.to_string());
        }

        fn fail_match(&self, match_id: &str) {
            self.failing_matches.lock().unwrap().insert(match_id.to_string());
        }

        fn live_calls_for(&self, sport: &str) -> usize {
            self.live_calls
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.as_str() == sport)
                .count()
        }

        fn prediction_calls(&self) -> Vec<String> {
            self.prediction_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PredictionBackend for ScriptedBackend {
        async fn get_live_matches(&self, sport: &str) -> Result<Vec<Match>, FetchError> {
            self.live_calls.lock().unwrap().push(sport.to_string());
            if self.failing_sports.lock().unwrap().contains(sport) {
                return Err(FetchError::LiveMatches {
                    sport: sport.to_string(),
                    cause: unavailable(),
                });
            }
            Ok(self.live.lock().unwrap().get(sport).cloned().unwrap_or_default())
        }

        async fn get_prediction(
            &self,
            _sport: &str,
            match_id: &str,
            _prediction_type: &str,
        ) -> Result<Prediction, FetchError> {
            self.prediction_calls.lock().unwrap().push(match_id.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if self.prediction_delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(self.prediction_delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing_matches.lock().unwrap().contains(match_id) {
                return Err(FetchError::Prediction {
                    match_id: match_id.to_string(),
                    cause: unavailable(),
                });
            }
            let m = self
                .live
                .lock()
                .unwrap()
                .values()
                .flatten()
                .find(|m| m.match_id == match_id)
                .cloned()
                .unwrap_or_else(|| make_match(match_id, "?", "?"));
            Ok(make_prediction(&m.home_team, &m.away_team, 0.73))
        }
    }

    fn cycle(
        backend: Arc<ScriptedBackend>,
        view: &SharedView,
        sport: &str,
        workers: usize,
    ) -> RefreshCycle {
        RefreshCycle {
            backend,
            view: Arc::clone(view),
            sport: sport.to_string(),
            prediction_type: "match_outcome".to_string(),
            workers,
            generation: 1,
            current: Arc::new(AtomicU64::new(1)),
        }
    }

    fn new_view() -> SharedView {
        Arc::new(tokio::sync::RwLock::new(DashboardView::new(
            "soccer",
            vec!["soccer".into(), "basketball".into()],
        )))
    }

    fn prediction_ids(view: &DashboardView) -> Vec<String> {
        view.predictions.iter().map(|p| p.match_id.clone()).collect()
    }

    #[tokio::test]
    async fn test_cycle_renders_round_trip_scenario() {
        let backend = Arc::new(ScriptedBackend::with_matches(
            "soccer",
            vec![make_match("m1", "A", "B")],
        ));
        let view = new_view();

        let report = cycle(Arc::clone(&backend), &view, "soccer", 1).run().await.unwrap();
        assert_eq!(report.matches, 1);
        assert_eq!(report.predictions, 1);

        let v = view.read().await;
        assert_eq!(v.matches.len(), 1);
        assert_eq!(v.matches[0].time_label, "45'");
        let card = &v.predictions[0];
        assert_eq!(card.confidence_label, "Confidence: 73.0%");
        assert_eq!(card.home_team, "A");
        assert_eq!(card.away_team, "B");
        assert!(!v.polling);
        assert!(v.error.is_none());
    }

    #[tokio::test]
    async fn test_cycle_requests_predictions_in_order_without_overlap() {
        let matches: Vec<Match> = (1..=5)
            .map(|i| make_match(&format!("m{i}"), "H", "A"))
            .collect();
        let backend = Arc::new(ScriptedBackend::with_matches("soccer", matches));
        let view = new_view();

        cycle(Arc::clone(&backend), &view, "soccer", 1).run().await.unwrap();

        assert_eq!(backend.prediction_calls(), vec!["m1", "m2", "m3", "m4", "m5"]);
        assert_eq!(backend.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(
            prediction_ids(&*view.read().await),
            vec!["m1", "m2", "m3", "m4", "m5"]
        );
    }

    #[tokio::test]
    async fn test_cycle_with_workers_keeps_match_order() {
        let matches: Vec<Match> = (1..=6)
            .map(|i| make_match(&format!("m{i}"), "H", "A"))
            .collect();
        let backend = Arc::new(ScriptedBackend::with_matches("soccer", matches));
        backend.fail_match("m4");
        let view = new_view();

        let report = cycle(Arc::clone(&backend), &view, "soccer", 3).run().await.unwrap();

        assert_eq!(report.predictions, 5);
        assert_eq!(report.failed_predictions, 1);
        assert!(backend.max_in_flight.load(Ordering::SeqCst) <= 3);
        assert_eq!(
            prediction_ids(&*view.read().await),
            vec!["m1", "m2", "m3", "m5", "m6"]
        );
    }

    #[tokio::test]
    async fn test_failed_prediction_is_skipped() {
        let backend = Arc::new(ScriptedBackend::with_matches(
            "soccer",
            vec![
                make_match("m1", "A", "B"),
                make_match("m2", "C", "D"),
                make_match("m3", "E", "F"),
            ],
        ));
        backend.fail_match("m2");
        let view = new_view();

        let report = cycle(Arc::clone(&backend), &view, "soccer", 1).run().await.unwrap();

        assert_eq!(report.predictions, 2);
        assert_eq!(report.failed_predictions, 1);
        assert_eq!(backend.prediction_calls(), vec!["m1", "m2", "m3"]);
        let v = view.read().await;
        assert_eq!(prediction_ids(&v), vec!["m1", "m3"]);
        assert!(v.error.is_none());
    }

    #[tokio::test]
    async fn test_failed_live_fetch_keeps_previous_render() {
        let backend = Arc::new(ScriptedBackend::with_matches(
            "soccer",
            vec![make_match("m1", "A", "B"), make_match("m2", "C", "D")],
        ));
        let view = new_view();
        cycle(Arc::clone(&backend), &view, "soccer", 1).run().await.unwrap();
        let before = view.read().await.clone();

        backend.fail_sport("soccer");
        let err = cycle(Arc::clone(&backend), &view, "soccer", 1).run().await.unwrap_err();
        assert!(matches!(err, CycleError::Fetch(FetchError::LiveMatches { .. })));

        let after = view.read().await;
        assert_eq!(after.matches, before.matches);
        assert_eq!(after.predictions, before.predictions);
        assert_eq!(after.error.as_deref(), Some(UPDATE_FAILED_NOTICE));
        assert!(!after.polling);
        // No prediction requests beyond the first cycle's two.
        assert_eq!(backend.prediction_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_superseded_cycle_does_not_write() {
        let backend = Arc::new(ScriptedBackend::with_matches(
            "soccer",
            vec![make_match("m1", "A", "B")],
        ));
        let view = new_view();
        let mut stale = cycle(Arc::clone(&backend), &view, "soccer", 1);
        stale.current = Arc::new(AtomicU64::new(2));

        let err = stale.run().await.unwrap_err();
        assert!(matches!(err, CycleError::Superseded));
        let v = view.read().await;
        assert!(v.matches.is_empty());
        assert!(!v.polling);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sport_selection_adds_one_immediate_refresh() {
        let backend = Arc::new(ScriptedBackend::with_matches(
            "soccer",
            vec![make_match("m1", "A", "B")],
        ));
        backend.set_matches("basketball", vec![make_match("b1", "Lakers", "Celtics")]);
        let mut controller = DashboardController::new(
            backend.clone(),
            RefreshSettings::default(),
            "soccer",
            vec!["soccer".into(), "basketball".into()],
        );
        let handle = controller.handle();
        controller.start().unwrap();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(backend.live_calls_for("soccer"), 1);

        handle.select_sport("basketball").await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(backend.live_calls_for("soccer"), 1);
        assert_eq!(backend.live_calls_for("basketball"), 1);
        {
            let v = handle.view().read().await;
            assert_eq!(v.sport, "basketball");
            assert_eq!(prediction_ids(&v), vec!["b1"]);
        }

        // Standing schedule still fires at t=60s, not reset by the selection.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(backend.live_calls_for("basketball"), 2);
        assert_eq!(backend.live_calls_for("soccer"), 1);

        controller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_trigger_cancels_in_flight_cycle() {
        let mut backend = ScriptedBackend::default();
        backend.prediction_delay = Duration::from_secs(10);
        backend.set_matches("soccer", vec![make_match("m1", "A", "B"), make_match("m2", "C", "D")]);
        backend.set_matches("basketball", vec![make_match("b1", "Lakers", "Celtics")]);
        let backend = Arc::new(backend);

        let mut controller = DashboardController::new(
            backend.clone(),
            RefreshSettings::default(),
            "soccer",
            vec!["soccer".into(), "basketball".into()],
        );
        let handle = controller.handle();
        controller.start().unwrap();

        // First cycle is waiting on the m1 prediction.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(handle.view().read().await.polling);
        handle.select_sport("basketball").await.unwrap();

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(backend.prediction_calls(), vec!["m1", "b1"]);
        let v = handle.view().read().await;
        assert_eq!(v.matches.len(), 1);
        assert_eq!(v.matches[0].match_id, "b1");
        assert_eq!(prediction_ids(&v), vec!["b1"]);
        assert!(!v.polling);
        drop(v);

        controller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_tick_lets_slow_cycle_finish() {
        let mut backend = ScriptedBackend::default();
        backend.prediction_delay = Duration::from_secs(9);
        let matches: Vec<Match> = (1..=8)
            .map(|i| make_match(&format!("m{i}"), "H", "A"))
            .collect();
        backend.set_matches("soccer", matches);
        let backend = Arc::new(backend);

        let mut controller = DashboardController::new(
            backend.clone(),
            RefreshSettings::default(),
            "soccer",
            vec!["soccer".into()],
        );
        let handle = controller.handle();
        controller.start().unwrap();

        // 8 x 9s = 72s; the tick at 60s must not cut the cycle short.
        tokio::time::sleep(Duration::from_secs(75)).await;
        assert_eq!(backend.live_calls_for("soccer"), 1);
        assert_eq!(backend.prediction_calls().len(), 8);
        {
            let v = handle.view().read().await;
            assert_eq!(
                prediction_ids(&v),
                vec!["m1", "m2", "m3", "m4", "m5", "m6", "m7", "m8"]
            );
            assert!(!v.polling);
        }

        // Next tick at 120s starts a fresh cycle.
        tokio::time::sleep(Duration::from_secs(50)).await;
        assert_eq!(backend.live_calls_for("soccer"), 2);

        controller.stop().await;
    }

    #[tokio::test]
    async fn test_select_sport_rejects_empty() {
        let backend = Arc::new(ScriptedBackend::default());
        let controller =
            DashboardController::new(backend, RefreshSettings::default(), "soccer", vec![]);
        let handle = controller.handle();
        assert_eq!(handle.select_sport("  ").await, Err(ControlError::EmptySport));
    }

    #[tokio::test]
    async fn test_stop_disconnects_handle() {
        let backend = Arc::new(ScriptedBackend::default());
        let mut controller =
            DashboardController::new(backend, RefreshSettings::default(), "soccer", vec![]);
        let handle = controller.handle();
        controller.start().unwrap();
        assert_eq!(controller.start(), Err(ControlError::AlreadyStarted));

        controller.stop().await;
        assert_eq!(handle.refresh().await, Err(ControlError::Stopped));
    }
}
