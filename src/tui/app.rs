//! Main TUI application: routes, session gating, and the event loop.
//!
//! Handles:
//! - Route navigation with mount/unmount semantics
//! - Input event handling
//! - Applying request completions to the store
//! - Async backend calls via the request worker
//!
//! Every route mount issues a session check; until it resolves the route
//! shows only a loader, and a missing session redirects to the login route.
//! Leaving a scan route aborts its in-flight upload and resets its slice,
//! so a revisit always starts from the empty upload form.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::application::{Action, Gate, Resolution, ScanWorkflow, SessionGuard, Store};
use crate::domain::Modality;
use crate::ports::ImagingApi;

use super::ui::{
    dashboard::render_dashboard,
    login::render_login,
    render_disclaimer, render_loader,
    scan::{render_scan_page, FileInputState},
};
use super::worker::{ApiEvent, RequestWorker};

/// Client-side routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Mammogram,
    Ultrasound,
    Login,
}

impl Route {
    /// The modality a scan route carries.
    #[must_use]
    pub fn modality(self) -> Option<Modality> {
        match self {
            Self::Mammogram => Some(Modality::Mammogram),
            Self::Ultrasound => Some(Modality::Ultrasound),
            Self::Dashboard | Self::Login => None,
        }
    }
}

/// Main application state.
pub struct App {
    /// Current route.
    route: Route,

    /// Whether the app should quit.
    should_quit: bool,

    /// Central store; mutated only through dispatched actions.
    store: Store,

    /// Session gate bookkeeping.
    guard: SessionGuard,

    /// Per-modality upload controllers.
    mammogram: ScanWorkflow,
    ultrasound: ScanWorkflow,

    /// Background request spawner and completion queue.
    worker: RequestWorker,

    /// File-path input of the mounted scan route.
    file_input: FileInputState,

    /// Handle of the in-flight upload, for abort on unmount.
    upload_task: Option<JoinHandle<()>>,

    /// Loop iteration counter, drives the spinner animation.
    tick: u64,
}

impl App {
    /// Create the application and mount the dashboard route.
    #[must_use]
    pub fn new(api: Arc<dyn ImagingApi>, runtime: Handle) -> Self {
        let mut app = Self {
            route: Route::Dashboard,
            should_quit: false,
            store: Store::new(),
            guard: SessionGuard::new(),
            mammogram: ScanWorkflow::new(Modality::Mammogram),
            ultrasound: ScanWorkflow::new(Modality::Ultrasound),
            worker: RequestWorker::new(api, runtime),
            file_input: FileInputState::new(),
            upload_task: None,
            tick: 0,
        };
        app.mount(Route::Dashboard);
        app
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.tick = self.tick.wrapping_add(1);

            // Apply completed requests before drawing.
            self.poll_worker();

            terminal.draw(|f| self.render(f))?;

            // Handle input (short poll to keep the spinner moving).
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(2)])
            .split(f.area());

        let content = chunks[0];
        match self.route {
            Route::Dashboard => {
                if self.store.dashboard_loading() {
                    render_loader(f, content, self.tick, "Loading dashboard");
                } else if let Some(user) = self.store.session().user() {
                    render_dashboard(f, content, user, self.store.history());
                } else {
                    // Signed out: the redirect lands on the next event
                    // application, nothing of the page is shown meanwhile.
                    render_loader(f, content, self.tick, "Redirecting");
                }
            }
            Route::Mammogram => self.render_scan_route(f, content, Modality::Mammogram),
            Route::Ultrasound => self.render_scan_route(f, content, Modality::Ultrasound),
            Route::Login => render_login(f, content),
        }

        render_disclaimer(f, chunks[1]);
    }

    fn render_scan_route(&self, f: &mut Frame, area: Rect, modality: Modality) {
        match SessionGuard::gate(&self.store) {
            Gate::Checking => render_loader(f, area, self.tick, "Checking session"),
            Gate::SignedOut => render_loader(f, area, self.tick, "Redirecting"),
            Gate::SignedIn => render_scan_page(
                f,
                area,
                modality,
                self.store.scan(modality),
                &self.file_input,
                self.tick,
            ),
        }
    }

    /// Drain the completion queue and apply every event.
    pub fn poll_worker(&mut self) {
        while let Some(event) = self.worker.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::SessionChecked { generation, result } => {
                let applied = match result {
                    Ok(session) => self.guard.resolve(&mut self.store, generation, session),
                    Err(e) => {
                        self.guard
                            .resolve_failure(&mut self.store, generation, &e.to_string())
                    }
                };
                if applied {
                    self.after_session_resolved();
                }
            }
            ApiEvent::HistoryFetched(result) => match result {
                Ok(scans) => {
                    tracing::info!(count = scans.len(), "history fetched");
                    self.store.dispatch(Action::HistoryFetched(scans));
                }
                Err(e) => {
                    // Never surfaced; the dashboard keeps showing what it has.
                    tracing::warn!(error = %e, "history refresh failed");
                    self.store.dispatch(Action::HistoryFailed);
                }
            },
            ApiEvent::UploadFinished {
                modality,
                generation,
                result,
            } => {
                let workflow = match modality {
                    Modality::Mammogram => &mut self.mammogram,
                    Modality::Ultrasound => &mut self.ultrasound,
                };
                let resolution = match result {
                    Ok(scan_result) => workflow.complete(&mut self.store, generation, scan_result),
                    Err(e) => workflow.fail(&mut self.store, generation, e.to_string()),
                };
                // The result is in the store before the refresh goes out.
                if resolution == Resolution::AppliedNotify {
                    self.refresh_history();
                }
                if resolution != Resolution::Stale {
                    self.upload_task = None;
                }
            }
        }
    }

    /// Navigation and follow-up requests after a session check settles.
    fn after_session_resolved(&mut self) {
        match SessionGuard::gate(&self.store) {
            Gate::SignedOut => {
                if self.route != Route::Login {
                    tracing::info!(route = ?self.route, "no session, redirecting to login");
                    self.navigate(Route::Login);
                }
            }
            Gate::SignedIn => match self.route {
                // Refresh history once the dashboard's own check settles, so
                // the stats belong to this session and not a previous one.
                Route::Dashboard => self.refresh_history(),
                Route::Login => self.navigate(Route::Dashboard),
                Route::Mammogram | Route::Ultrasound => {}
            },
            Gate::Checking => {}
        }
    }

    fn refresh_history(&mut self) {
        self.store.dispatch(Action::HistoryFetching);
        self.worker.spawn_history_fetch();
    }

    /// Leave the current route and mount another.
    pub fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        self.unmount(self.route);
        self.route = route;
        self.mount(route);
    }

    fn mount(&mut self, route: Route) {
        tracing::debug!(?route, "mount");
        match route {
            Route::Dashboard => {
                self.check_session();
            }
            Route::Mammogram | Route::Ultrasound => {
                if let Some(modality) = route.modality() {
                    // Start from the empty form, never a stale result.
                    self.reset_workflow(modality);
                }
                self.file_input.clear();
                self.check_session();
            }
            Route::Login => {}
        }
    }

    fn unmount(&mut self, route: Route) {
        tracing::debug!(?route, "unmount");
        if let Some(modality) = route.modality() {
            self.reset_workflow(modality);
            if let Some(task) = self.upload_task.take() {
                task.abort();
            }
        }
    }

    fn reset_workflow(&mut self, modality: Modality) {
        let workflow = match modality {
            Modality::Mammogram => &mut self.mammogram,
            Modality::Ultrasound => &mut self.ultrasound,
        };
        workflow.reset(&mut self.store);
    }

    /// Issue a session check for the current mount.
    fn check_session(&mut self) {
        let generation = self.guard.begin(&mut self.store);
        self.worker.spawn_session_check(generation);
    }

    fn submit_upload(&mut self, modality: Modality) {
        let Some(path) = self.file_input.path() else {
            return;
        };
        let workflow = match modality {
            Modality::Mammogram => &mut self.mammogram,
            Modality::Ultrasound => &mut self.ultrasound,
        };
        if let Some(ticket) = workflow.begin(&mut self.store, &path) {
            self.upload_task = Some(self.worker.spawn_upload(ticket));
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling.
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // While the gate is checking, a protected route takes no input.
        if self.route != Route::Login && SessionGuard::gate(&self.store) == Gate::Checking {
            if matches!(key, KeyCode::Char('q' | 'Q')) {
                self.should_quit = true;
            }
            return;
        }

        match self.route {
            Route::Dashboard => self.handle_dashboard_key(key),
            Route::Mammogram => self.handle_scan_key(Modality::Mammogram, key),
            Route::Ultrasound => self.handle_scan_key(Modality::Ultrasound, key),
            Route::Login => self.handle_login_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('m' | 'M') => self.navigate(Route::Mammogram),
            KeyCode::Char('u' | 'U') => self.navigate(Route::Ultrasound),
            KeyCode::Char('r' | 'R') => {
                if SessionGuard::gate(&self.store) == Gate::SignedIn {
                    self.refresh_history();
                }
            }
            KeyCode::Char('q' | 'Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_scan_key(&mut self, modality: Modality, key: KeyCode) {
        let state = self.store.scan(modality);
        let scanning = state.is_scanning();
        let succeeded = state.result().is_some();

        match key {
            KeyCode::Esc => self.navigate(Route::Dashboard),
            KeyCode::Enter => {
                if succeeded {
                    // Scan another image: back to the empty form.
                    self.reset_workflow(modality);
                    self.file_input.clear();
                } else if !scanning {
                    self.submit_upload(modality);
                }
            }
            KeyCode::Char(c) if !scanning && !succeeded => self.file_input.input_char(c),
            KeyCode::Backspace if !scanning && !succeeded => self.file_input.delete_char(),
            _ => {}
        }
    }

    fn handle_login_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('r' | 'R') => self.check_session(),
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Instant;

    use crate::domain::{ScanRecord, ScanResult, ScanUpload, Session};
    use crate::ports::ApiError;

    /// Scripted backend: responses are handed out in push order.
    struct ScriptedApi {
        sessions: Mutex<VecDeque<Result<Session, ApiError>>>,
        histories: Mutex<VecDeque<Result<Vec<ScanRecord>, ApiError>>>,
        uploads: Mutex<VecDeque<Result<ScanResult, ApiError>>>,
        history_calls: Mutex<u32>,
        upload_delay: Option<Duration>,
    }

    impl ScriptedApi {
        fn new() -> Self {
            Self {
                sessions: Mutex::new(VecDeque::new()),
                histories: Mutex::new(VecDeque::new()),
                uploads: Mutex::new(VecDeque::new()),
                history_calls: Mutex::new(0),
                upload_delay: None,
            }
        }

        fn with_upload_delay(delay: Duration) -> Self {
            Self {
                upload_delay: Some(delay),
                ..Self::new()
            }
        }

        fn push_session(&self, response: Result<Session, ApiError>) {
            self.sessions.lock().unwrap().push_back(response);
        }

        fn push_history(&self, response: Result<Vec<ScanRecord>, ApiError>) {
            self.histories.lock().unwrap().push_back(response);
        }

        fn push_upload(&self, response: Result<ScanResult, ApiError>) {
            self.uploads.lock().unwrap().push_back(response);
        }

        fn history_calls(&self) -> u32 {
            *self.history_calls.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl ImagingApi for ScriptedApi {
        async fn check_session(&self) -> Result<Session, ApiError> {
            self.sessions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Session::signed_out()))
        }

        async fn fetch_history(&self) -> Result<Vec<ScanRecord>, ApiError> {
            *self.history_calls.lock().unwrap() += 1;
            self.histories
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn upload_scan(
            &self,
            _modality: Modality,
            _upload: ScanUpload,
        ) -> Result<ScanResult, ApiError> {
            if let Some(delay) = self.upload_delay {
                tokio::time::sleep(delay).await;
            }
            self.uploads
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("unscripted".to_string())))
        }
    }

    fn pump_until(app: &mut App, mut done: impl FnMut(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            app.poll_worker();
            if done(app) {
                return;
            }
            assert!(Instant::now() < deadline, "condition not reached in time");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn type_path(app: &mut App, path: &std::path::Path) {
        for c in path.to_str().unwrap().chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    fn temp_image(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"image bytes").unwrap();
        path
    }

    fn malignant_result() -> ScanResult {
        ScanResult {
            prediction: "malignant".to_string(),
            confidence: 0.92,
            image_url: "/img/1.png".to_string(),
            mask_image: None,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_unauthenticated_scan_route_redirects_to_login() {
        let api = Arc::new(ScriptedApi::new());
        api.push_session(Ok(Session::signed_out()));
        api.push_session(Ok(Session::signed_out()));

        let mut app = App::new(api, Handle::current());
        app.navigate(Route::Mammogram);

        pump_until(&mut app, |a| a.route() == Route::Login);
        assert!(app.store().session().user().is_none());
        assert!(app.store().scan(Modality::Mammogram).is_idle());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_signed_in_dashboard_fetches_history() {
        let api = Arc::new(ScriptedApi::new());
        api.push_session(Ok(Session::signed_in("a@clinic.org")));
        api.push_history(Ok(vec![ScanRecord {
            id: Some("scan-1".to_string()),
            modality: Some(Modality::Mammogram),
            created_at: None,
            result: malignant_result(),
        }]));

        let mut app = App::new(api.clone(), Handle::current());
        pump_until(&mut app, |a| !a.store().history().scans().is_empty());

        assert_eq!(app.route(), Route::Dashboard);
        assert!(!app.store().dashboard_loading());
        assert_eq!(api.history_calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_upload_success_applies_result_then_refreshes_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_image(&dir, "scan.png");

        let api = Arc::new(ScriptedApi::new());
        api.push_session(Ok(Session::signed_in("a@clinic.org")));
        api.push_session(Ok(Session::signed_in("a@clinic.org")));
        api.push_upload(Ok(malignant_result()));

        let mut app = App::new(api.clone(), Handle::current());
        app.navigate(Route::Mammogram);
        pump_until(&mut app, |a| {
            a.store().session().user().is_some() && !a.store().session().is_loading()
        });
        // A scan route mount must not fetch history on its own.
        assert_eq!(api.history_calls(), 0);

        type_path(&mut app, &path);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.store().scan(Modality::Mammogram).is_scanning());

        pump_until(&mut app, |a| {
            a.store().scan(Modality::Mammogram).result().is_some()
        });
        let state = app.store().scan(Modality::Mammogram);
        let result = state.result().unwrap();
        assert_eq!(result.prediction, "malignant");
        assert!((result.confidence - 0.92).abs() < f64::EPSILON);
        assert!(state.error().is_none());

        // The success triggered exactly one history refresh.
        pump_until(&mut app, |_| api.history_calls() == 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_upload_failure_shows_banner_and_allows_retry() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_image(&dir, "scan.png");

        let api = Arc::new(ScriptedApi::new());
        api.push_session(Ok(Session::signed_in("a@clinic.org")));
        api.push_session(Ok(Session::signed_in("a@clinic.org")));
        api.push_upload(Err(ApiError::Rejected {
            status: 400,
            message: "Invalid image format. Please upload a valid mammogram image.".to_string(),
        }));
        api.push_upload(Ok(malignant_result()));

        let mut app = App::new(api, Handle::current());
        app.navigate(Route::Mammogram);
        pump_until(&mut app, |a| {
            a.store().session().user().is_some() && !a.store().session().is_loading()
        });

        type_path(&mut app, &path);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        pump_until(&mut app, |a| {
            a.store().scan(Modality::Mammogram).error().is_some()
        });
        let state = app.store().scan(Modality::Mammogram);
        assert!(state.error().unwrap().contains("Invalid image format"));
        assert!(state.result().is_none());

        // The path is still in the input; a second Enter retries.
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.store().scan(Modality::Mammogram).is_scanning());
        pump_until(&mut app, |a| {
            a.store().scan(Modality::Mammogram).result().is_some()
        });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_navigating_away_discards_inflight_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_image(&dir, "scan.png");

        let api = Arc::new(ScriptedApi::with_upload_delay(Duration::from_secs(30)));
        api.push_session(Ok(Session::signed_in("a@clinic.org")));
        api.push_session(Ok(Session::signed_in("a@clinic.org")));
        api.push_session(Ok(Session::signed_in("a@clinic.org")));

        let mut app = App::new(api, Handle::current());
        app.navigate(Route::Mammogram);
        pump_until(&mut app, |a| {
            a.store().session().user().is_some() && !a.store().session().is_loading()
        });

        type_path(&mut app, &path);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.store().scan(Modality::Mammogram).is_scanning());

        app.navigate(Route::Dashboard);
        assert!(app.store().scan(Modality::Mammogram).is_idle());

        // The aborted upload must never resurrect the slice.
        let deadline = Instant::now() + Duration::from_millis(150);
        while Instant::now() < deadline {
            app.poll_worker();
            assert!(app.store().scan(Modality::Mammogram).is_idle());
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_login_retry_recovers_to_dashboard() {
        let api = Arc::new(ScriptedApi::new());
        api.push_session(Ok(Session::signed_out()));
        api.push_session(Ok(Session::signed_in("a@clinic.org")));
        api.push_session(Ok(Session::signed_in("a@clinic.org")));

        let mut app = App::new(api, Handle::current());
        pump_until(&mut app, |a| a.route() == Route::Login);

        app.handle_key(KeyCode::Char('r'), KeyModifiers::NONE);
        pump_until(&mut app, |a| {
            a.route() == Route::Dashboard && a.store().session().user().is_some()
        });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_selection_while_scanning_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_image(&dir, "scan.png");

        let api = Arc::new(ScriptedApi::with_upload_delay(Duration::from_secs(30)));
        api.push_session(Ok(Session::signed_in("a@clinic.org")));
        api.push_session(Ok(Session::signed_in("a@clinic.org")));

        let mut app = App::new(api, Handle::current());
        app.navigate(Route::Ultrasound);
        pump_until(&mut app, |a| {
            a.store().session().user().is_some() && !a.store().session().is_loading()
        });

        type_path(&mut app, &path);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.store().scan(Modality::Ultrasound).is_scanning());

        // Typing and submitting again neither queues nor cancels.
        app.handle_key(KeyCode::Char('x'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.store().scan(Modality::Ultrasound).is_scanning());
    }
}
