//! The login / user-info state machine.

use std::fmt;
use std::future::Future;

use dahouse_credentials::{CredentialStore, Credentials};
use dahouse_session::{AccessToken, AuthError, FetchError, SessionClient, UserProfile};
use dahouse_updates::{CheckError, UpdateChecker, UpdateStatus};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::locale::{Locale, Texts};
use crate::presenter::{LoginForm, Notice, Presenter, ProfileView, WindowHandle};
use crate::state::AppState;
use crate::worker::{Completion, JobId, JobOutcome, spawn_job};

/// Opens a URL in the system browser.
pub type UrlOpener = Box<dyn Fn(&str) -> std::io::Result<()> + Send>;

/// Runs once when the window flow ends.
pub type FinishHook = Box<dyn FnOnce() + Send>;

/// Input from the presentation layer.
#[derive(Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Login button pressed.
    Submit {
        username: String,
        password: String,
        remember: bool,
    },
    Logout,
    CheckForUpdates,
    /// "Download" pressed on an update notice.
    OpenDownload { url: String },
    /// The user closed a window.
    Close { window: WindowHandle },
}

impl fmt::Debug for UiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiEvent::Submit {
                username, remember, ..
            } => f
                .debug_struct("Submit")
                .field("username", username)
                .field("password", &"<redacted>")
                .field("remember", remember)
                .finish(),
            UiEvent::Logout => f.write_str("Logout"),
            UiEvent::CheckForUpdates => f.write_str("CheckForUpdates"),
            UiEvent::OpenDownload { url } => {
                f.debug_struct("OpenDownload").field("url", url).finish()
            }
            UiEvent::Close { window } => f.debug_struct("Close").field("window", window).finish(),
        }
    }
}

/// Whether the orchestrator keeps running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Finished,
}

#[derive(Debug)]
enum PendingKind {
    Login {
        credentials: Credentials,
        remember: bool,
    },
    Profile,
    Update,
}

/// The single in-flight job and the overlay shown for it.
#[derive(Debug)]
struct Pending {
    job: JobId,
    overlay: WindowHandle,
    kind: PendingKind,
}

/// Drives one login / user-info window flow.
///
/// All state changes happen on the task running [`run`](Self::run). Network
/// calls go to worker tasks; while one is in flight the loading overlay is
/// shown and further submit/logout/update requests are ignored.
pub struct Orchestrator<P: Presenter> {
    presenter: P,
    store: CredentialStore,
    session: SessionClient,
    updates: UpdateChecker,
    texts: &'static Texts,
    open_url: UrlOpener,
    on_finish: Option<FinishHook>,

    state: AppState,
    window: Option<WindowHandle>,
    pending: Option<Pending>,
    next_job: u64,

    completions_tx: mpsc::Sender<Completion>,
    completions_rx: mpsc::Receiver<Completion>,
}

impl<P: Presenter> Orchestrator<P> {
    pub fn new(
        presenter: P,
        store: CredentialStore,
        session: SessionClient,
        updates: UpdateChecker,
        locale: Locale,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel(8);
        Self {
            presenter,
            store,
            session,
            updates,
            texts: locale.texts(),
            open_url: Box::new(|url: &str| open::that(url)),
            on_finish: None,
            state: AppState::LoggedOut,
            window: None,
            pending: None,
            next_job: 0,
            completions_tx,
            completions_rx,
        }
    }

    /// Replaces the browser launcher.
    pub fn with_url_opener(mut self, opener: UrlOpener) -> Self {
        self.open_url = opener;
        self
    }

    /// Sets a callback fired when the window is closed or events stop.
    ///
    /// It runs before [`run`](Self::run) returns, so a caller can accept a
    /// new window without waiting for the task to exit.
    pub fn with_finish_hook(mut self, hook: FinishHook) -> Self {
        self.on_finish = Some(hook);
        self
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    /// The top-level window currently shown, if any.
    pub fn active_window(&self) -> Option<WindowHandle> {
        self.window
    }

    /// True while a job and its overlay are outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_job(&self) -> Option<JobId> {
        self.pending.as_ref().map(|p| p.job)
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn session(&self) -> &SessionClient {
        &self.session
    }

    /// Shows the login screen, then processes events until the window is
    /// closed or `events` is dropped.
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) {
        self.start();

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("event channel closed");
                        self.teardown();
                        break;
                    };
                    if self.handle_event(event) == Flow::Finished {
                        break;
                    }
                }
                Some(completion) = self.completions_rx.recv() => {
                    self.handle_completion(completion);
                }
            }
        }

        info!("window orchestrator finished");
    }

    /// Shows the login screen if no window is up yet.
    pub fn start(&mut self) {
        if self.window.is_none() {
            self.show_login();
        }
    }

    /// Waits for the next worker result.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completions_rx.recv().await
    }

    pub fn handle_event(&mut self, event: UiEvent) -> Flow {
        debug!(state = %self.state, ?event, "ui event");
        match event {
            UiEvent::Submit {
                username,
                password,
                remember,
            } => self.submit(username, password, remember),
            UiEvent::Logout => self.logout(),
            UiEvent::CheckForUpdates => self.check_for_updates(),
            UiEvent::OpenDownload { url } => self.open_download(&url),
            UiEvent::Close { window } => return self.close(window),
        }
        Flow::Continue
    }

    /// Applies a worker result.
    ///
    /// The overlay of the matching job is dismissed first. The result is
    /// then applied only if its target window is still the active one.
    pub fn handle_completion(&mut self, completion: Completion) {
        let Completion {
            job,
            target,
            outcome,
        } = completion;

        let Some(pending) = self.pending.take_if(|p| p.job == job) else {
            debug!(%job, "ignoring stale completion");
            return;
        };
        self.presenter.destroy(pending.overlay);

        if self.window != Some(target) {
            debug!(%job, %target, "target window is gone, dropping result");
            return;
        }

        match (pending.kind, outcome) {
            (
                PendingKind::Login {
                    credentials,
                    remember,
                },
                JobOutcome::Login(result),
            ) => self.finish_login(target, credentials, remember, result),
            (PendingKind::Login { .. }, _) => {
                self.finish_login_failed(target, self.texts.unknown_login_error)
            }
            (PendingKind::Profile, JobOutcome::Profile(result)) => {
                self.finish_profile(target, result)
            }
            (PendingKind::Profile, _) => {
                let view = ProfileView::failed(self.texts, self.texts.profile_fetch_failed);
                self.presenter.update_profile(target, &view);
            }
            (PendingKind::Update, JobOutcome::Update(result)) => {
                self.finish_update(target, result)
            }
            (PendingKind::Update, _) => {
                let notice = Notice::error(self.texts, self.texts.update_check_failed);
                self.presenter.show_notice(target, &notice);
            }
        }
    }

    fn show_login(&mut self) {
        let texts = self.texts;
        let mut load_failed = false;
        let form = match self.store.load() {
            Ok(Some(saved)) => LoginForm {
                title: texts.login_title.into(),
                username: saved.username,
                password: saved.password,
                remember: true,
            },
            Ok(None) => LoginForm {
                title: texts.login_title.into(),
                ..LoginForm::default()
            },
            Err(e) => {
                warn!("failed to read saved credentials: {e}");
                load_failed = true;
                LoginForm {
                    title: texts.login_title.into(),
                    ..LoginForm::default()
                }
            }
        };

        let window = self.presenter.show_login(&form);
        self.window = Some(window);
        self.state = AppState::LoggedOut;

        if load_failed {
            let notice = Notice::error(texts, texts.load_credentials_failed);
            self.presenter.show_notice(window, &notice);
        }
    }

    fn submit(&mut self, username: String, password: String, remember: bool) {
        let Some(window) = self.window else {
            return;
        };
        if self.state != AppState::LoggedOut || self.is_busy() {
            debug!(state = %self.state, "ignoring submit");
            return;
        }
        if username.is_empty() || password.is_empty() {
            self.presenter
                .show_login_error(window, self.texts.missing_fields);
            return;
        }

        info!(%username, "logging in");
        self.state = AppState::Authenticating;

        let request = self.session.login(&username, &password);
        let credentials = Credentials::new(username, password);
        self.begin_job(
            window,
            self.texts.logging_in,
            PendingKind::Login {
                credentials,
                remember,
            },
            async move { JobOutcome::Login(request.await) },
        );
    }

    fn finish_login(
        &mut self,
        login_window: WindowHandle,
        credentials: Credentials,
        remember: bool,
        result: Result<AccessToken, AuthError>,
    ) {
        if let Err(kind) = self.session.complete_login(result) {
            warn!(%kind, "login failed");
            let message = self.login_error_message(kind);
            self.finish_login_failed(login_window, message);
            return;
        }

        let persisted = if remember {
            self.store.save(&credentials)
        } else {
            self.store.clear()
        };

        self.presenter.destroy(login_window);
        let window = self
            .presenter
            .show_user_info(&ProfileView::loading(self.texts));
        self.window = Some(window);
        self.state = AppState::LoggedIn;
        info!(username = %credentials.username, remember, "logged in");

        if let Err(e) = persisted {
            error!("failed to update saved credentials: {e}");
            let notice = Notice::error(self.texts, self.texts.save_credentials_failed);
            self.presenter.show_notice(window, &notice);
        }

        self.fetch_profile();
    }

    fn finish_login_failed(&mut self, login_window: WindowHandle, message: &str) {
        self.state = AppState::LoggedOut;
        self.presenter.show_login_error(login_window, message);
    }

    fn login_error_message(&self, kind: AuthError) -> &'static str {
        match kind {
            AuthError::InvalidCredentials => self.texts.invalid_credentials,
            AuthError::UserNotFound => self.texts.user_not_found,
            AuthError::ServerUnreachable => self.texts.server_unreachable,
            AuthError::Unknown => self.texts.unknown_login_error,
        }
    }

    fn fetch_profile(&mut self) {
        let Some(window) = self.window else {
            return;
        };
        let request = self.session.fetch_profile();
        self.begin_job(
            window,
            self.texts.loading_profile,
            PendingKind::Profile,
            async move { JobOutcome::Profile(request.await) },
        );
    }

    fn finish_profile(&mut self, window: WindowHandle, result: Result<UserProfile, FetchError>) {
        let view = match result {
            Ok(profile) => ProfileView::from_profile(self.texts, &profile),
            Err(e) => {
                warn!("failed to load user profile: {e}");
                let message = match e {
                    FetchError::Unreachable(_) => self.texts.server_unreachable,
                    _ => self.texts.profile_fetch_failed,
                };
                ProfileView::failed(self.texts, message)
            }
        };
        self.presenter.update_profile(window, &view);
    }

    fn logout(&mut self) {
        let Some(window) = self.window else {
            return;
        };
        if self.state != AppState::LoggedIn || self.is_busy() {
            debug!(state = %self.state, "ignoring logout");
            return;
        }

        self.session.logout();
        self.presenter.destroy(window);
        self.window = None;
        info!("logged out");
        self.show_login();
    }

    fn check_for_updates(&mut self) {
        let Some(window) = self.window else {
            return;
        };
        if self.state != AppState::LoggedIn || self.is_busy() {
            debug!(state = %self.state, "ignoring update check");
            return;
        }

        let updates = self.updates.clone();
        self.begin_job(
            window,
            self.texts.checking_updates,
            PendingKind::Update,
            async move { JobOutcome::Update(updates.check().await) },
        );
    }

    fn finish_update(&mut self, window: WindowHandle, result: Result<UpdateStatus, CheckError>) {
        let notice = match result {
            Ok(UpdateStatus::Available(release)) => {
                Notice::update_available(self.texts, &release.version, release.download_url)
            }
            Ok(UpdateStatus::UpToDate { .. }) => Notice::info(self.texts, self.texts.up_to_date),
            Err(e) => {
                warn!("update check failed: {e}");
                Notice::error(self.texts, self.texts.update_check_failed)
            }
        };
        self.presenter.show_notice(window, &notice);
    }

    fn open_download(&mut self, url: &str) {
        let Some(window) = self.window else {
            return;
        };
        match (self.open_url)(url) {
            Ok(()) => info!(%url, "opened download page"),
            Err(e) => {
                warn!(%url, "failed to open browser: {e}");
                let notice = Notice::error(self.texts, self.texts.open_browser_failed);
                self.presenter.show_notice(window, &notice);
            }
        }
    }

    fn close(&mut self, window: WindowHandle) -> Flow {
        if self.window != Some(window) {
            debug!(%window, "ignoring close of inactive window");
            return Flow::Continue;
        }
        self.teardown();
        Flow::Finished
    }

    /// Dismisses any overlay, destroys the active window, and ends the session.
    fn teardown(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(job = %pending.job, "abandoning in-flight job");
            self.presenter.destroy(pending.overlay);
        }
        if let Some(window) = self.window.take() {
            self.presenter.destroy(window);
        }
        self.session.logout();
        self.state = AppState::LoggedOut;

        if let Some(hook) = self.on_finish.take() {
            hook();
        }
    }

    fn begin_job<F>(&mut self, target: WindowHandle, message: &str, kind: PendingKind, work: F)
    where
        F: Future<Output = JobOutcome> + Send + 'static,
    {
        let job = JobId(self.next_job);
        self.next_job += 1;

        let overlay = self.presenter.show_loading(target, message);
        debug!(%job, %target, %overlay, "job started");
        self.pending = Some(Pending { job, overlay, kind });
        spawn_job(job, target, self.completions_tx.clone(), work);
    }
}
