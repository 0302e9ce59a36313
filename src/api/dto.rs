//! Wire types for the Bug Chase backend
//!
//! Field names follow the backend's camelCase JSON. Timestamps such as
//! `playedAt` are kept as the ISO strings the server sends.

use serde::{Deserialize, Serialize};

use super::survival_time;
use crate::sim::RunSummary;

/// Body of `POST /score`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub score: u64,
    pub distance: u64,
    /// `HH:MM:SS.fffffff`
    pub survival_time: String,
    pub bugs_avoided: u32,
    pub deadlines_avoided: u32,
    pub meetings_avoided: u32,
    pub coffee_collected: u32,
    pub weekends_collected: u32,
}

impl From<&RunSummary> for ScoreSubmission {
    fn from(summary: &RunSummary) -> Self {
        let stats = &summary.stats;
        Self {
            score: summary.score,
            distance: summary.distance,
            survival_time: survival_time::format(summary.survival_ms / 1000.0),
            bugs_avoided: stats.bugs_avoided,
            deadlines_avoided: stats.deadlines_avoided,
            meetings_avoided: stats.meetings_avoided,
            coffee_collected: stats.coffee_collected,
            weekends_collected: stats.weekends_collected,
        }
    }
}

/// A stored game, as returned by `POST /score` and `GET /recent`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub id: i64,
    pub score: u64,
    pub distance: u64,
    pub survival_time: String,
    pub bugs_avoided: u32,
    pub deadlines_avoided: u32,
    pub meetings_avoided: u32,
    pub coffee_collected: u32,
    pub weekends_collected: u32,
    pub played_at: String,
    pub is_new_best_score: bool,
    pub rank: u32,
}

impl GameResult {
    /// Game-over banner text
    pub fn headline(&self) -> String {
        if self.is_new_best_score {
            format!("Rank #{}, new best score!", self.rank)
        } else {
            format!("Rank #{}", self.rank)
        }
    }

    /// One line of the recent games list
    pub fn row(&self) -> String {
        format!(
            "{} pts, {}m in {}",
            self.score,
            self.distance,
            survival_time::display(&self.survival_time)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Backend enum ordinal
    pub tech_stack: i32,
    /// Backend enum ordinal
    pub zodiac_sign: i32,
    pub score: u64,
    pub distance: u64,
    pub survival_time: String,
    pub played_at: String,
}

impl LeaderboardEntry {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// One line of the leaderboard
    pub fn row(&self) -> String {
        format!(
            "#{} {} {} ({})",
            self.rank,
            self.display_name(),
            self.score,
            survival_time::display(&self.survival_time)
        )
    }
}

/// Lifetime totals for the signed-in player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub best_score: u64,
    pub total_games_played: u32,
    pub total_distance: u64,
    pub total_survival_time: String,
    pub total_bugs_avoided: u32,
    pub total_deadlines_avoided: u32,
    pub total_meetings_avoided: u32,
    pub total_coffee_collected: u32,
    pub total_weekends_collected: u32,
    pub average_score: f64,
    /// Seconds
    pub average_survival_time: f64,
}

impl PlayerStats {
    pub fn summary_line(&self) -> String {
        format!(
            "Best {} | {} games | {} played",
            self.best_score,
            self.total_games_played,
            survival_time::display(&self.total_survival_time)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user_stats: PlayerStats,
    #[serde(default)]
    pub top_scores: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub recent_games: Vec<GameResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RunStats;

    fn summary() -> RunSummary {
        RunSummary {
            score: 460,
            distance: 375,
            survival_ms: 90_250.0,
            stats: RunStats {
                bugs_avoided: 12,
                deadlines_avoided: 7,
                meetings_avoided: 3,
                coffee_collected: 2,
                weekends_collected: 1,
            },
            start_ms: 1_000.0,
            end_ms: 91_250.0,
        }
    }

    #[test]
    fn test_submission_from_summary() {
        let submission = ScoreSubmission::from(&summary());
        assert_eq!(submission.survival_time, "00:01:30.2500000");
        assert_eq!(submission.bugs_avoided, 12);
        assert_eq!(submission.weekends_collected, 1);
    }

    #[test]
    fn test_submission_field_names() {
        let json = serde_json::to_value(ScoreSubmission::from(&summary())).unwrap();
        let object = json.as_object().unwrap();
        for key in [
            "score",
            "distance",
            "survivalTime",
            "bugsAvoided",
            "deadlinesAvoided",
            "meetingsAvoided",
            "coffeeCollected",
            "weekendsCollected",
        ] {
            assert!(object.contains_key(key), "missing {}", key);
        }
        assert_eq!(object.len(), 8);
    }

    #[test]
    fn test_dashboard_from_server_json() {
        let json = r#"{
            "userStats": {
                "bestScore": 900, "totalGamesPlayed": 4, "totalDistance": 2000,
                "totalSurvivalTime": "00:05:00.0000000",
                "totalBugsAvoided": 40, "totalDeadlinesAvoided": 20,
                "totalMeetingsAvoided": 10, "totalCoffeeCollected": 5,
                "totalWeekendsCollected": 2, "averageScore": 512.5,
                "averageSurvivalTime": 75.0
            },
            "topScores": [{
                "rank": 1, "username": "ada", "firstName": "Ada", "lastName": "Lovelace",
                "techStack": 3, "zodiacSign": 11, "score": 900, "distance": 700,
                "survivalTime": "00:02:00.0000000", "playedAt": "2024-05-01T10:00:00Z"
            }],
            "recentGames": []
        }"#;
        let dashboard: Dashboard = serde_json::from_str(json).unwrap();
        assert_eq!(dashboard.user_stats.best_score, 900);
        assert_eq!(dashboard.top_scores[0].display_name(), "Ada Lovelace");
        assert!(dashboard.recent_games.is_empty());

        assert_eq!(dashboard.user_stats.summary_line(), "Best 900 | 4 games | 5:00 played");
        assert_eq!(dashboard.top_scores[0].row(), "#1 Ada Lovelace 900 (2:00)");
    }

    #[test]
    fn test_result_text() {
        let mut result = GameResult {
            score: 460,
            distance: 375,
            survival_time: "00:01:30.2500000".into(),
            rank: 3,
            ..Default::default()
        };
        assert_eq!(result.headline(), "Rank #3");
        assert_eq!(result.row(), "460 pts, 375m in 1:30");

        result.is_new_best_score = true;
        assert_eq!(result.headline(), "Rank #3, new best score!");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let entry = LeaderboardEntry {
            rank: 2,
            username: "grace".into(),
            first_name: String::new(),
            last_name: String::new(),
            tech_stack: 0,
            zodiac_sign: 0,
            score: 10,
            distance: 5,
            survival_time: "00:00:05.0000000".into(),
            played_at: "2024-05-01T10:00:00Z".into(),
        };
        assert_eq!(entry.display_name(), "grace");
    }
}
