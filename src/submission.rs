//! Game-over result submission
//!
//! Each finished run is submitted once. Runs that finish while a
//! submission is in flight wait in a queue; a failed submission keeps
//! its run at the head so the player can retry. The game itself never
//! waits on any of it.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::api::{ApiError, Dashboard, GameResult, ScoreService, ScoreSubmission};
use crate::sim::RunSummary;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    InFlight,
    Submitted(GameResult),
    Failed(ApiError),
}

/// Tracks unsent runs and the last dashboard seen
#[derive(Debug, Clone, Default)]
pub struct Submission {
    status: SubmissionStatus,
    /// Runs not yet accepted by the backend; the head is the one being sent
    queue: VecDeque<RunSummary>,
    dashboard: Option<Dashboard>,
    dashboard_error: Option<ApiError>,
    dismissed: bool,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_in_flight(&self) -> bool {
        self.status == SubmissionStatus::InFlight
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    /// Runs waiting to be accepted, including one in flight
    pub fn unsent(&self) -> usize {
        self.queue.len()
    }

    /// Most recent error worth showing, submission first. `None` once
    /// dismissed, until the next failure.
    pub fn error(&self) -> Option<&ApiError> {
        if self.dismissed {
            return None;
        }
        match &self.status {
            SubmissionStatus::Failed(e) => Some(e),
            _ => self.dashboard_error.as_ref(),
        }
    }

    /// Hide the current error. A failed run stays available for retry.
    pub fn dismiss_error(&mut self) {
        self.dashboard_error = None;
        self.dismissed = true;
    }

    /// Queue a finished run. Returns the payload to send now, or `None`
    /// when another submission is in flight; the run is sent after it.
    /// After a failure the run kept for retry goes out first.
    pub fn begin(&mut self, summary: RunSummary) -> Option<ScoreSubmission> {
        self.queue.push_back(summary);
        if self.is_in_flight() {
            log::info!("Submission in flight, {} run(s) queued", self.queue.len() - 1);
            return None;
        }
        self.send_head()
    }

    /// Re-send the run kept from a failed attempt
    pub fn retry(&mut self) -> Option<ScoreSubmission> {
        if !matches!(self.status, SubmissionStatus::Failed(_)) {
            return None;
        }
        self.send_head()
    }

    /// Next queued run once the previous one was accepted
    pub fn next_queued(&mut self) -> Option<ScoreSubmission> {
        match self.status {
            SubmissionStatus::InFlight | SubmissionStatus::Failed(_) => None,
            _ => self.send_head(),
        }
    }

    fn send_head(&mut self) -> Option<ScoreSubmission> {
        let payload = ScoreSubmission::from(self.queue.front()?);
        self.status = SubmissionStatus::InFlight;
        self.dismissed = false;
        Some(payload)
    }

    pub fn complete(&mut self, result: Result<GameResult, ApiError>) {
        match result {
            Ok(result) => {
                log::info!(
                    "Score {} stored, rank {}{}",
                    result.score,
                    result.rank,
                    if result.is_new_best_score { " (new best)" } else { "" }
                );
                self.queue.pop_front();
                self.status = SubmissionStatus::Submitted(result);
            }
            Err(e) => {
                log::error!("Failed to submit score: {}", e);
                self.status = SubmissionStatus::Failed(e);
                self.dismissed = false;
            }
        }
    }

    pub fn set_dashboard(&mut self, result: Result<Dashboard, ApiError>) {
        match result {
            Ok(dashboard) => {
                self.dashboard = Some(dashboard);
                self.dashboard_error = None;
            }
            Err(e) => {
                log::warn!("Failed to load dashboard: {}", e);
                self.dashboard_error = Some(e);
                self.dismissed = false;
            }
        }
    }

    /// Forget the previous accepted result when a new run starts.
    /// In-flight and failed runs are kept.
    pub fn clear_result(&mut self) {
        if matches!(self.status, SubmissionStatus::Submitted(_)) {
            self.status = SubmissionStatus::Idle;
        }
    }
}

/// Fetch the dashboard into the tracker
pub async fn refresh_dashboard<S: ScoreService>(service: &S, tracker: &RefCell<Submission>) {
    let result = service.get_dashboard().await;
    tracker.borrow_mut().set_dashboard(result);
}

/// Submit `payload` and any runs queued behind it, then reload the
/// dashboard if the backend accepted at least one. Stops at the first
/// failure. The tracker is never borrowed across an await.
pub async fn submit_and_refresh<S: ScoreService>(
    service: &S,
    tracker: &RefCell<Submission>,
    payload: ScoreSubmission,
) {
    let mut payload = payload;
    let mut accepted = false;
    loop {
        let result = service.submit_score(&payload).await;
        if result.is_err() {
            tracker.borrow_mut().complete(result);
            break;
        }
        accepted = true;
        let next = {
            let mut tracker = tracker.borrow_mut();
            tracker.complete(result);
            tracker.next_queued()
        };
        match next {
            Some(next) => payload = next,
            None => break,
        }
    }
    if accepted {
        refresh_dashboard(service, tracker).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PlayerStats;
    use crate::sim::RunStats;
    use std::cell::Cell;
    use std::future::Future;
    use std::pin::pin;
    use std::task::{Context, Poll, Waker};

    fn block_on<F: Future>(future: F) -> F::Output {
        let mut future = pin!(future);
        let mut cx = Context::from_waker(Waker::noop());
        loop {
            if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                return output;
            }
        }
    }

    struct FakeService {
        fail_submit: Cell<bool>,
        submits: Cell<u32>,
        dashboards: Cell<u32>,
    }

    impl FakeService {
        fn new(fail_submit: bool) -> Self {
            Self {
                fail_submit: Cell::new(fail_submit),
                submits: Cell::new(0),
                dashboards: Cell::new(0),
            }
        }
    }

    impl ScoreService for FakeService {
        async fn submit_score(&self, submission: &ScoreSubmission) -> Result<GameResult, ApiError> {
            self.submits.set(self.submits.get() + 1);
            if self.fail_submit.get() {
                return Err(ApiError::Unreachable);
            }
            Ok(GameResult {
                id: 1,
                score: submission.score,
                distance: submission.distance,
                survival_time: submission.survival_time.clone(),
                bugs_avoided: submission.bugs_avoided,
                deadlines_avoided: submission.deadlines_avoided,
                meetings_avoided: submission.meetings_avoided,
                coffee_collected: submission.coffee_collected,
                weekends_collected: submission.weekends_collected,
                played_at: "2024-05-01T10:00:00Z".into(),
                is_new_best_score: true,
                rank: 1,
            })
        }

        async fn get_dashboard(&self) -> Result<Dashboard, ApiError> {
            self.dashboards.set(self.dashboards.get() + 1);
            Ok(Dashboard {
                user_stats: PlayerStats {
                    best_score: 120,
                    ..Default::default()
                },
                ..Default::default()
            })
        }
    }

    fn summary(score: u64) -> RunSummary {
        RunSummary {
            score,
            distance: score / 2,
            survival_ms: 12_000.0,
            stats: RunStats::default(),
            start_ms: 0.0,
            end_ms: 12_000.0,
        }
    }

    #[test]
    fn test_success_refreshes_dashboard() {
        let service = FakeService::new(false);
        let tracker = RefCell::new(Submission::new());
        let payload = tracker.borrow_mut().begin(summary(120)).unwrap();
        assert!(tracker.borrow().is_in_flight());

        block_on(submit_and_refresh(&service, &tracker, payload));

        let tracker = tracker.borrow();
        assert!(matches!(tracker.status(), SubmissionStatus::Submitted(r) if r.score == 120));
        assert_eq!(tracker.dashboard().unwrap().user_stats.best_score, 120);
        assert_eq!(service.dashboards.get(), 1);
        assert!(tracker.error().is_none());
    }

    #[test]
    fn test_failure_keeps_run_for_retry() {
        let service = FakeService::new(true);
        let tracker = RefCell::new(Submission::new());
        let payload = tracker.borrow_mut().begin(summary(80)).unwrap();
        block_on(submit_and_refresh(&service, &tracker, payload));

        assert_eq!(tracker.borrow().error(), Some(&ApiError::Unreachable));
        assert_eq!(service.dashboards.get(), 0);

        service.fail_submit.set(false);
        let retry = tracker.borrow_mut().retry().unwrap();
        assert_eq!(retry.score, 80);
        block_on(submit_and_refresh(&service, &tracker, retry));
        assert!(matches!(tracker.borrow().status(), SubmissionStatus::Submitted(_)));
        assert_eq!(service.submits.get(), 2);
    }

    #[test]
    fn test_run_finished_during_flight_is_queued() {
        let mut tracker = Submission::new();
        assert_eq!(tracker.begin(summary(100)).map(|p| p.score), Some(100));
        tracker.clear_result();
        assert!(tracker.begin(summary(250)).is_none());
        assert!(tracker.retry().is_none());
        assert_eq!(tracker.unsent(), 2);

        tracker.complete(Ok(GameResult {
            score: 100,
            ..Default::default()
        }));
        assert_eq!(tracker.next_queued().map(|p| p.score), Some(250));
        assert!(tracker.is_in_flight());
        assert_eq!(tracker.unsent(), 1);
    }

    #[test]
    fn test_queued_runs_are_drained() {
        let service = FakeService::new(false);
        let tracker = RefCell::new(Submission::new());
        let payload = tracker.borrow_mut().begin(summary(100)).unwrap();
        assert!(tracker.borrow_mut().begin(summary(250)).is_none());
        assert!(tracker.borrow_mut().begin(summary(300)).is_none());

        block_on(submit_and_refresh(&service, &tracker, payload));

        assert_eq!(service.submits.get(), 3);
        assert_eq!(service.dashboards.get(), 1);
        let tracker = tracker.borrow();
        assert_eq!(tracker.unsent(), 0);
        assert!(matches!(tracker.status(), SubmissionStatus::Submitted(r) if r.score == 300));
    }

    #[test]
    fn test_clear_result_keeps_unsent_runs() {
        let mut tracker = Submission::new();
        tracker.begin(summary(10));
        tracker.clear_result();
        assert!(tracker.is_in_flight());

        tracker.complete(Err(ApiError::Unauthorized));
        tracker.clear_result();
        assert_eq!(tracker.status(), &SubmissionStatus::Failed(ApiError::Unauthorized));
        assert_eq!(tracker.retry().map(|p| p.score), Some(10));
    }

    #[test]
    fn test_failed_run_goes_out_before_new_one() {
        let mut tracker = Submission::new();
        tracker.begin(summary(10));
        tracker.complete(Err(ApiError::Unreachable));
        assert_eq!(tracker.begin(summary(20)).map(|p| p.score), Some(10));
        assert_eq!(tracker.unsent(), 2);
    }

    #[test]
    fn test_dashboard_error_is_dismissible() {
        let mut tracker = Submission::new();
        tracker.set_dashboard(Err(ApiError::Unauthorized));
        assert_eq!(tracker.error(), Some(&ApiError::Unauthorized));
        tracker.dismiss_error();
        assert!(tracker.error().is_none());
    }

    #[test]
    fn test_dismissed_submission_error_stays_hidden() {
        let mut tracker = Submission::new();
        tracker.begin(summary(10));
        tracker.complete(Err(ApiError::Unreachable));
        tracker.dismiss_error();
        assert!(tracker.error().is_none());
        assert!(matches!(tracker.status(), SubmissionStatus::Failed(_)));

        // Retrying and failing again shows the new error
        assert!(tracker.retry().is_some());
        tracker.complete(Err(ApiError::Server("down".into())));
        assert_eq!(tracker.error(), Some(&ApiError::Server("down".into())));
    }
}
