use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

use super::backend::PredictionBackend;
use super::error::{FetchError, FetchFailure};
use super::models::{ErrorResponse, HealthResponse, Match, Prediction, PredictionRequest};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Client for the sports prediction backend (`/predict/{sport}/...`).
#[derive(Clone)]
pub struct SportsApi {
    http: Client,
    base_url: Url,
}

impl SportsApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(SportsApi { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET /predict/{sport}/live
    pub async fn get_live_matches(&self, sport: &str) -> Result<Vec<Match>, FetchError> {
        self.fetch_live_matches(sport).await.map_err(|cause| {
            let err = FetchError::LiveMatches {
                sport: sport.to_string(),
                cause,
            };
            error!("Error fetching live matches for '{}': {}", sport, err.cause());
            err
        })
    }

    /// POST /predict/{sport}/predict
    pub async fn get_prediction(
        &self,
        sport: &str,
        match_id: &str,
        prediction_type: &str,
    ) -> Result<Prediction, FetchError> {
        self.fetch_prediction(sport, match_id, prediction_type)
            .await
            .map_err(|cause| {
                let err = FetchError::Prediction {
                    match_id: match_id.to_string(),
                    cause,
                };
                error!("Error fetching prediction for match {}: {}", match_id, err.cause());
                err
            })
    }

    /// GET /health, returning the backend's reported status.
    pub async fn health(&self) -> Result<String, FetchError> {
        self.fetch_health()
            .await
            .map_err(|cause| FetchError::Health { cause })
    }

    async fn fetch_health(&self) -> Result<String, FetchFailure> {
        let resp = self
            .http
            .get(self.endpoint(&["health"]))
            .send()
            .await
            .map_err(FetchFailure::Transport)?;
        let body: HealthResponse = check_status(resp)
            .await?
            .json()
            .await
            .map_err(FetchFailure::Body)?;
        Ok(body.status)
    }

    async fn fetch_live_matches(&self, sport: &str) -> Result<Vec<Match>, FetchFailure> {
        if sport.is_empty() {
            return Err(FetchFailure::EmptySport);
        }
        let url = self.endpoint(&["predict", sport, "live"]);
        debug!("Fetching live matches from {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchFailure::Transport)?;
        let matches: Vec<Match> = check_status(resp)
            .await?
            .json()
            .await
            .map_err(FetchFailure::Body)?;

        info!("Fetched {} live {} matches", matches.len(), sport);
        Ok(matches)
    }

    async fn fetch_prediction(
        &self,
        sport: &str,
        match_id: &str,
        prediction_type: &str,
    ) -> Result<Prediction, FetchFailure> {
        if sport.is_empty() {
            return Err(FetchFailure::EmptySport);
        }
        let url = self.endpoint(&["predict", sport, "predict"]);
        debug!("Requesting {} prediction for match {} from {}", prediction_type, match_id, url);

        let body = PredictionRequest {
            match_id: match_id.to_string(),
            prediction_type: prediction_type.to_string(),
        };
        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(FetchFailure::Transport)?;

        check_status(resp)
            .await?
            .json()
            .await
            .map_err(FetchFailure::Body)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl PredictionBackend for SportsApi {
    async fn get_live_matches(&self, sport: &str) -> Result<Vec<Match>, FetchError> {
        SportsApi::get_live_matches(self, sport).await
    }

    async fn get_prediction(
        &self,
        sport: &str,
        match_id: &str,
        prediction_type: &str,
    ) -> Result<Prediction, FetchError> {
        SportsApi::get_prediction(self, sport, match_id, prediction_type).await
    }
}

/// Parse and check a backend base URL. Only absolute http(s) URLs are accepted.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid backend URL '{}'", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("Backend URL must use http or https, got '{}'", url.scheme());
    }
    Ok(url)
}

async fn check_status(resp: Response) -> Result<Response, FetchFailure> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => Some(match err.error_code {
            Some(code) => format!("{} ({})", err.detail, code),
            None => err.detail,
        }),
        Err(_) if body.trim().is_empty() => None,
        Err(_) => Some(body.trim().to_string()),
    };
    Err(FetchFailure::Status { status, detail })
}
