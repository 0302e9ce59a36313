//! `fetch`-based client for the browser build

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, Response};

use super::{
    ApiError, Dashboard, DEFAULT_LEADERBOARD_LIMIT, DEFAULT_RECENT_LIMIT, Endpoint, GameResult,
    LeaderboardEntry, PlayerStats, ScoreService, ScoreSubmission, error_for_status,
};

fn js_error(value: JsValue) -> ApiError {
    ApiError::Client(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

/// Cookie-authenticated JSON client
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, endpoint: Endpoint, body: Option<String>) -> Result<String, ApiError> {
        let url = endpoint.url(&self.base_url);
        log::debug!("{} {}", endpoint.method().as_str(), url);

        let init = RequestInit::new();
        init.set_method(endpoint.method().as_str());
        init.set_credentials(RequestCredentials::Include);
        if let Some(body) = &body {
            init.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&url, &init).map_err(js_error)?;
        let headers = request.headers();
        headers.set("Content-Type", "application/json").map_err(js_error)?;
        headers.set("Accept", "application/json").map_err(js_error)?;

        let window = web_sys::window().ok_or_else(|| ApiError::Client("no window".into()))?;
        let response = match JsFuture::from(window.fetch_with_request(&request)).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("{} failed before a response: {:?}", url, e);
                return Err(ApiError::Unreachable);
            }
        };
        let response: Response = response.dyn_into().map_err(js_error)?;

        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?
            .as_string()
            .unwrap_or_default();

        if !response.ok() {
            let error = error_for_status(response.status(), &response.status_text(), &text);
            log::error!("{} returned {}: {}", url, response.status(), error);
            return Err(error);
        }
        Ok(text)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        let text = self.send(endpoint, None).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<T, ApiError> {
        let text = self.send(endpoint, Some(serde_json::to_string(body)?)).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Create the player's stats row; safe to repeat
    pub async fn initialize(&self) -> Result<(), ApiError> {
        self.send(Endpoint::Initialize, Some("{}".to_string())).await?;
        log::info!("Bug Chase stats initialized");
        Ok(())
    }

    pub async fn stats(&self) -> Result<PlayerStats, ApiError> {
        self.get(Endpoint::Stats).await
    }

    pub async fn leaderboard(&self, limit: Option<u32>) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.get(Endpoint::Leaderboard {
            limit: limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT),
        })
        .await
    }

    pub async fn recent(&self, limit: Option<u32>) -> Result<Vec<GameResult>, ApiError> {
        self.get(Endpoint::Recent {
            limit: limit.unwrap_or(DEFAULT_RECENT_LIMIT),
        })
        .await
    }
}

impl ScoreService for HttpClient {
    async fn submit_score(&self, submission: &ScoreSubmission) -> Result<GameResult, ApiError> {
        log::info!("Submitting score {}", submission.score);
        self.post(Endpoint::Score, submission).await
    }

    async fn get_dashboard(&self) -> Result<Dashboard, ApiError> {
        self.get(Endpoint::Dashboard).await
    }
}
