//! Bug Chase entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::future::Future;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PageTransitionEvent};

    use bug_chase::api::{ApiError, GameResult, HttpClient, LeaderboardEntry};
    use bug_chase::consts::*;
    use bug_chase::platform::input::KeyboardListeners;
    use bug_chase::platform::time::BrowserClock;
    use bug_chase::platform::{Attachment, InitError, RetryPolicy};
    use bug_chase::renderer::{CanvasSurface, RenderOptions, render};
    use bug_chase::sim::RunSummary;
    use bug_chase::submission::{Submission, SubmissionStatus, refresh_dashboard, submit_and_refresh};
    use bug_chase::{GameLoop, InputState, Settings};

    const CANVAS_ID: &str = "game-canvas";
    const ERROR_ID: &str = "error-message";
    const RESULT_ID: &str = "result-message";
    const STATS_ID: &str = "dashboard-stats";
    const TOP_SCORES_ID: &str = "top-scores";
    const RECENT_GAMES_ID: &str = "recent-games";

    /// Rows fetched by the leaderboard and history buttons
    const FULL_LEADERBOARD_LIMIT: u32 = 20;
    const FULL_HISTORY_LIMIT: u32 = 25;

    /// The session cookie may lag behind page load
    const BACKEND_RETRY_MS: u32 = 2_000;
    const BACKEND_ATTEMPTS: u32 = 5;

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// Rolling one-second frame counter
    #[derive(Default)]
    struct FpsCounter {
        window_start: f64,
        frames: u32,
        fps: u32,
    }

    impl FpsCounter {
        fn record(&mut self, time: f64) {
            self.frames += 1;
            if time - self.window_start >= 1000.0 {
                self.fps = self.frames;
                self.frames = 0;
                self.window_start = time;
            }
        }
    }

    /// Everything the page keeps alive between animation frames
    struct App {
        game: GameLoop<BrowserClock>,
        keyboard: Rc<RefCell<InputState>>,
        listeners: Attachment<KeyboardListeners>,
        surface: CanvasSurface,
        settings: Settings,
        options: RenderOptions,
        fps: FpsCounter,
        client: Rc<HttpClient>,
        tracker: Rc<RefCell<Submission>>,
        running: bool,
        frame_handle: Option<i32>,
    }

    impl App {
        /// One animation frame. Returns false once the loop was stopped.
        fn frame(&mut self, time: f64) -> bool {
            if !self.running {
                return false;
            }

            self.game.input_mut().absorb(&mut self.keyboard.borrow_mut());
            let report = self.game.frame();
            if let Some(summary) = report.finished {
                self.on_finished(summary);
            }

            self.fps.record(time);
            self.options.fps = self.settings.show_fps.then_some(self.fps.fps);
            render(self.game.state(), &mut self.surface, &self.options);
            true
        }

        fn on_finished(&mut self, summary: RunSummary) {
            log::info!(
                "Run over: score {}, distance {}m, {:.1}s",
                summary.score,
                summary.distance,
                summary.survival_ms / 1000.0
            );
            let payload = self.tracker.borrow_mut().begin(summary);
            show_submission(&self.tracker.borrow());
            // Otherwise the in-flight task sends it when done
            let Some(payload) = payload else {
                return;
            };
            let client = self.client.clone();
            let tracker = self.tracker.clone();
            wasm_bindgen_futures::spawn_local(async move {
                submit_and_refresh(client.as_ref(), &tracker, payload).await;
                show_submission(&tracker.borrow());
            });
        }

        fn reset(&mut self) {
            self.game.reset();
            self.tracker.borrow_mut().clear_result();
            show_submission(&self.tracker.borrow());
            log::info!("Game reset with seed {}", self.game.state().seed);
        }

        /// Apply a settings change, persist it and restyle the next frame
        fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) {
            change(&mut self.settings);
            self.settings.save();
            self.options = RenderOptions::from_settings(&self.settings);
        }

        /// Stop the loop and release input listeners. Safe to call twice.
        fn stop(&mut self) {
            if !self.running {
                return;
            }
            self.running = false;
            if let (Some(handle), Some(window)) = (self.frame_handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(handle);
            }
            self.listeners.detach();
            log::info!("Game loop stopped");
        }

        /// Re-attach input after `stop`. Returns whether the frame loop
        /// needs to be scheduled again.
        fn resume(&mut self) -> bool {
            if self.running {
                return false;
            }
            // Keys released while the page was hidden never sent keyup
            self.keyboard.borrow_mut().clear();
            if let Some(listeners) = attach_keyboard(self.keyboard.clone()) {
                self.listeners.replace(listeners);
            }
            self.running = true;
            log::info!("Game loop resumed");
            true
        }
    }

    fn element(id: &str) -> Option<web_sys::Element> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
    }

    fn set_text(id: &str, text: Option<&str>) {
        if let Some(el) = element(id) {
            el.set_text_content(text);
            let _ = el.set_attribute("class", if text.is_none() { "hidden" } else { "" });
        }
    }

    fn show_error(message: Option<String>) {
        set_text(ERROR_ID, message.as_deref());
    }

    /// Replace the children of a list element with one `<li>` per line
    fn show_lines(id: &str, lines: impl IntoIterator<Item = String>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(list) = document.get_element_by_id(id) else {
            return;
        };
        list.set_text_content(None);
        for line in lines {
            if let Ok(item) = document.create_element("li") {
                item.set_text_content(Some(&line));
                let _ = list.append_child(&item);
            }
        }
    }

    /// Error banner, game-over result and dashboard panels
    fn show_submission(tracker: &Submission) {
        show_error(tracker.error().map(|e| e.to_string()));
        match tracker.status() {
            SubmissionStatus::Submitted(result) => set_text(RESULT_ID, Some(&result.headline())),
            SubmissionStatus::InFlight => set_text(RESULT_ID, Some("Submitting score...")),
            _ => set_text(RESULT_ID, None),
        }
        if let Some(dashboard) = tracker.dashboard() {
            set_text(STATS_ID, Some(&dashboard.user_stats.summary_line()));
            show_lines(TOP_SCORES_ID, dashboard.top_scores.iter().map(LeaderboardEntry::row));
            show_lines(RECENT_GAMES_ID, dashboard.recent_games.iter().map(GameResult::row));
        }
    }

    async fn sleep_ms(ms: u32) {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            if let Some(window) = web_sys::window() {
                let _ = window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
            }
        });
        let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
    }

    fn acquire_context() -> Result<CanvasRenderingContext2d, InitError> {
        let window = web_sys::window().ok_or(InitError::NoWindow)?;
        let document = window.document().ok_or(InitError::NoWindow)?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| InitError::CanvasMissing(CANVAS_ID.to_string()))?;

        canvas.set_width(ARENA_WIDTH as u32);
        canvas.set_height(ARENA_HEIGHT as u32);

        canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(InitError::ContextUnavailable)
    }

    fn attach_keyboard(keyboard: Rc<RefCell<InputState>>) -> Option<KeyboardListeners> {
        let window = web_sys::window()?;
        match KeyboardListeners::register(window.into(), keyboard) {
            Ok(listeners) => Some(listeners),
            Err(e) => {
                let error = InitError::Listeners(format!("{:?}", e));
                log::error!("{}", error);
                show_error(Some(error.to_string()));
                None
            }
        }
    }

    /// Create the player's stats row, retrying while the backend or the
    /// session is not ready, then load the dashboard
    async fn connect_backend(client: Rc<HttpClient>, tracker: Rc<RefCell<Submission>>) {
        let mut policy = RetryPolicy::new(BACKEND_RETRY_MS, BACKEND_ATTEMPTS);
        while let Err(e) = client.initialize().await {
            let error = InitError::Backend(e.to_string());
            show_error(Some(error.to_string()));
            match policy.next_delay(&error) {
                Some(delay) => sleep_ms(delay).await,
                None => return,
            }
        }
        refresh_dashboard(client.as_ref(), &tracker).await;
        show_submission(&tracker.borrow());
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let settings = Settings::load();
        if let Err(e) = console_log::init_with_level(settings.log_level()) {
            web_sys::console::warn_1(&format!("logger unavailable: {}", e).into());
        }

        log::info!("Bug Chase starting...");

        // The canvas may not be in the DOM yet when the module loads
        let mut policy = RetryPolicy::default();
        let ctx = loop {
            match acquire_context() {
                Ok(ctx) => break ctx,
                Err(e) => match policy.next_delay(&e) {
                    Some(delay) => sleep_ms(delay).await,
                    None => {
                        show_error(Some(format!("Failed to initialize game canvas: {}", e)));
                        return;
                    }
                },
            }
        };

        let client = Rc::new(HttpClient::new(settings.api_base_url.clone()));
        let tracker = Rc::new(RefCell::new(Submission::new()));
        wasm_bindgen_futures::spawn_local(connect_backend(client.clone(), tracker.clone()));

        let keyboard = Rc::new(RefCell::new(InputState::default()));
        let listeners = attach_keyboard(keyboard.clone())
            .map(Attachment::attach)
            .unwrap_or_default();

        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let app = Rc::new(RefCell::new(App {
            game: GameLoop::new(BrowserClock::new(), seed),
            keyboard,
            listeners,
            surface: CanvasSurface::new(ctx),
            options: RenderOptions::from_settings(&settings),
            settings,
            fps: FpsCounter::default(),
            client,
            tracker,
            running: true,
            frame_handle: None,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_buttons(app.clone());
        let callback = start_animation_loop(app.clone());
        setup_page_lifecycle(app, callback);

        log::info!("Bug Chase running!");
    }

    fn request_frame(app: &Rc<RefCell<App>>, callback: &FrameCallback) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(cb) = callback.borrow().as_ref() {
            let handle = window.request_animation_frame(cb.as_ref().unchecked_ref()).ok();
            app.borrow_mut().frame_handle = handle;
        }
    }

    /// Schedule the first frame. The returned callback restarts the loop
    /// after `App::resume`.
    fn start_animation_loop(app: Rc<RefCell<App>>) -> FrameCallback {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let next = callback.clone();
        let loop_app = app.clone();

        *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
            if !loop_app.borrow_mut().frame(time) {
                return;
            }
            request_frame(&loop_app, &next);
        }));

        request_frame(&app, &callback);
        callback
    }

    fn on_click(id: &str, handler: impl FnMut() + 'static) {
        let Some(btn) = element(id) else {
            return;
        };
        let mut handler = handler;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Fill a list from a backend query, or surface the failure
    fn load_lines<F>(id: &'static str, load: F)
    where
        F: Future<Output = Result<Vec<String>, ApiError>> + 'static,
    {
        wasm_bindgen_futures::spawn_local(async move {
            match load.await {
                Ok(lines) => show_lines(id, lines),
                Err(e) => {
                    log::warn!("Failed to load {}: {}", id, e);
                    show_error(Some(e.to_string()));
                }
            }
        });
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let client = app.borrow().client.clone();
        {
            let app = app.clone();
            on_click("start-btn", move || app.borrow_mut().game.start());
        }
        {
            let app = app.clone();
            on_click("pause-btn", move || app.borrow_mut().game.toggle_pause());
        }
        {
            let app = app.clone();
            on_click("reset-btn", move || app.borrow_mut().reset());
        }
        {
            let app = app.clone();
            on_click("retry-btn", move || {
                let (client, tracker) = {
                    let app = app.borrow();
                    (app.client.clone(), app.tracker.clone())
                };
                let Some(payload) = tracker.borrow_mut().retry() else {
                    return;
                };
                show_submission(&tracker.borrow());
                wasm_bindgen_futures::spawn_local(async move {
                    submit_and_refresh(client.as_ref(), &tracker, payload).await;
                    show_submission(&tracker.borrow());
                });
            });
        }
        {
            let app = app.clone();
            on_click("dismiss-error-btn", move || {
                app.borrow().tracker.borrow_mut().dismiss_error();
                show_error(None);
            });
        }
        {
            let client = client.clone();
            on_click("leaderboard-btn", move || {
                let client = client.clone();
                load_lines(TOP_SCORES_ID, async move {
                    let entries = client.leaderboard(Some(FULL_LEADERBOARD_LIMIT)).await?;
                    Ok::<Vec<String>, ApiError>(entries.iter().map(LeaderboardEntry::row).collect())
                });
            });
        }
        {
            let client = client.clone();
            on_click("history-btn", move || {
                let client = client.clone();
                load_lines(RECENT_GAMES_ID, async move {
                    let games = client.recent(Some(FULL_HISTORY_LIMIT)).await?;
                    Ok::<Vec<String>, ApiError>(games.iter().map(GameResult::row).collect())
                });
            });
        }
        on_click("stats-btn", move || {
            let client = client.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match client.stats().await {
                    Ok(stats) => set_text(STATS_ID, Some(&stats.summary_line())),
                    Err(e) => show_error(Some(e.to_string())),
                }
            });
        });
        {
            let app = app.clone();
            on_click("contrast-btn", move || {
                app.borrow_mut().update_settings(|s| s.high_contrast = !s.high_contrast)
            });
        }
        {
            let app = app.clone();
            on_click("motion-btn", move || {
                app.borrow_mut().update_settings(|s| s.reduced_motion = !s.reduced_motion)
            });
        }
        on_click("fps-btn", move || {
            app.borrow_mut().update_settings(|s| s.show_fps = !s.show_fps)
        });
    }

    /// Pause when the tab is hidden, shut down when the page goes away and
    /// come back when it is restored from the back/forward cache
    fn setup_page_lifecycle(app: Rc<RefCell<App>>, callback: FrameCallback) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        {
            let app = app.clone();
            let doc = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut app = app.borrow_mut();
                if doc.hidden() && app.game.state().is_playing() {
                    app.game.toggle_pause();
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document
                .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().stop();
            });
            let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
            if !event.persisted() {
                return;
            }
            let restart = app.borrow_mut().resume();
            if restart {
                request_frame(&app, &callback);
            }
        });
        let _ = window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Frames the headless demo plays before giving up on a game over
#[cfg(not(target_arch = "wasm32"))]
const DEMO_MAX_FRAMES: u32 = 60 * 60 * 5;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bug_chase::api::ScoreSubmission;
    use bug_chase::platform::{Clock, ManualClock, SystemClock};
    use bug_chase::{GameLoop, Settings};

    let settings = Settings::load();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(settings.log_level.as_str()))
        .init();

    let seed = settings.seed.unwrap_or(7);
    log::info!("Bug Chase (native) starting headless autopilot run, seed {}", seed);
    log::info!("The playable build targets wasm32 - run with `trunk serve`");

    let wall = SystemClock::default();
    let clock = ManualClock::new(0.0);
    let mut game = GameLoop::new(clock.clone(), seed);
    game.input_mut().key_down("KeyI");

    let mut summary = None;
    for _ in 0..DEMO_MAX_FRAMES {
        clock.advance(16.0);
        if let Some(finished) = game.frame().finished {
            summary = Some(finished);
            break;
        }
    }

    let summary = match summary {
        Some(summary) => summary,
        None => {
            log::info!(
                "Autopilot still running after {:.0}s, ending the demo",
                clock.now_ms() / 1000.0
            );
            game.state().summary()
        }
    };

    log::info!(
        "Simulated {:.1}s in {:.0}ms",
        clock.now_ms() / 1000.0,
        wall.now_ms()
    );
    log::info!(
        "Score {} | distance {}m | survived {:.1}s | bugs {} deadlines {} meetings {} coffee {} weekends {}",
        summary.score,
        summary.distance,
        summary.survival_ms / 1000.0,
        summary.stats.bugs_avoided,
        summary.stats.deadlines_avoided,
        summary.stats.meetings_avoided,
        summary.stats.coffee_collected,
        summary.stats.weekends_collected,
    );

    match serde_json::to_string_pretty(&ScoreSubmission::from(&summary)) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to encode submission: {}", e),
    }
}
