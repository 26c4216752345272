use async_trait::async_trait;

use super::error::FetchError;
use super::models::{Match, Prediction};

/// Remote source of live matches and predictions consumed by the dashboard.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    async fn get_live_matches(&self, sport: &str) -> Result<Vec<Match>, FetchError>;

    async fn get_prediction(
        &self,
        sport: &str,
        match_id: &str,
        prediction_type: &str,
    ) -> Result<Prediction, FetchError>;
}
