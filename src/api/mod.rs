//! Bug Chase backend contract
//!
//! The game core never talks to the network directly. On game over the
//! host hands a `ScoreSubmission` to a `ScoreService`; the browser build
//! uses `HttpClient`, tests use in-memory fakes.

mod dto;
mod error;
pub mod survival_time;

#[cfg(target_arch = "wasm32")]
mod http;

pub use dto::{Dashboard, GameResult, LeaderboardEntry, PlayerStats, ScoreSubmission};
pub use error::{ApiError, error_for_status};

#[cfg(target_arch = "wasm32")]
pub use http::HttpClient;

/// Leaderboard rows requested when no limit is given
pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 5;
/// Recent games requested when no limit is given
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Backend routes, relative to the configured base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Create the player's stats row
    Initialize,
    Dashboard,
    Score,
    Stats,
    Leaderboard { limit: u32 },
    Recent { limit: u32 },
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Initialize | Endpoint::Score => Method::Post,
            _ => Method::Get,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::Initialize => "/initialize".to_string(),
            Endpoint::Dashboard => "/dashboard".to_string(),
            Endpoint::Score => "/score".to_string(),
            Endpoint::Stats => "/stats".to_string(),
            Endpoint::Leaderboard { limit } => format!("/leaderboard?limit={}", limit),
            Endpoint::Recent { limit } => format!("/recent?limit={}", limit),
        }
    }

    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }
}

/// The two calls the game needs from the backend
#[allow(async_fn_in_trait)]
pub trait ScoreService {
    async fn submit_score(&self, submission: &ScoreSubmission) -> Result<GameResult, ApiError>;
    async fn get_dashboard(&self) -> Result<Dashboard, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_routes() {
        let base = "https://localhost:7276/api/bugchase/";
        assert_eq!(Endpoint::Score.method(), Method::Post);
        assert_eq!(Endpoint::Initialize.method(), Method::Post);
        assert_eq!(Endpoint::Dashboard.method(), Method::Get);
        assert_eq!(
            Endpoint::Score.url(base),
            "https://localhost:7276/api/bugchase/score"
        );
        assert_eq!(
            Endpoint::Leaderboard {
                limit: DEFAULT_LEADERBOARD_LIMIT
            }
            .path(),
            "/leaderboard?limit=5"
        );
        assert_eq!(Endpoint::Recent { limit: 3 }.path(), "/recent?limit=3");
    }
}
