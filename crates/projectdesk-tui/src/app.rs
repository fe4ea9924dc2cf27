//! Application state management for projectdesk.
//!
//! This module contains the core `App` struct that owns the session, the API
//! services, the current screen and the channel background tasks report on.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use projectdesk_core::api::{ApiError, ErrorKind};
use projectdesk_core::auth::{AuthService, RemoteLogout};
use projectdesk_core::config::Config;
use projectdesk_core::models::{Page, Project};
use projectdesk_core::nav::{sanitize_return_route, Route};
use projectdesk_core::notify::{Notification, Notifier};
use projectdesk_core::pipeline::reported_by_pipeline;
use projectdesk_core::projects::{ListProjectsParams, ProjectService};
use projectdesk_core::storage::KeyValueStore;
use projectdesk_core::utils::date::{mask_date_input, MAX_DATE_DIGITS};
use projectdesk_core::validation::{self, ProjectForm, ValidationError};
use projectdesk_core::{ApiClient, SessionStore};

use crate::shell::Shell;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input. Registration enforces 72 separately.
const MAX_PASSWORD_LENGTH: usize = 128;

const MAX_NAME_LENGTH: usize = 120;
const MAX_DESCRIPTION_LENGTH: usize = 500;
const MAX_VALUE_LENGTH: usize = 20;
const MAX_SEARCH_LENGTH: usize = 100;

const LOGIN_FAILED_MESSAGE: &str = "Invalid email or password.";
const REGISTER_FAILED_MESSAGE: &str = "Registration failed. Check the data and try again.";
const LOAD_PROJECTS_FAILED_MESSAGE: &str = "Failed to load projects.";
const LOAD_PROJECT_FAILED_MESSAGE: &str = "Failed to load project.";
const SAVE_FAILED_MESSAGE: &str = "Failed to save project.";
const DELETE_FAILED_MESSAGE: &str = "Failed to delete project.";

// ============================================================================
// UI State Types
// ============================================================================

/// Overlay and mode state on top of the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingDelete(i64),
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
    Register,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Register,
            LoginFocus::Register => LoginFocus::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Register,
            LoginFocus::Password => LoginFocus::Email,
            LoginFocus::Button => LoginFocus::Password,
            LoginFocus::Register => LoginFocus::Button,
        }
    }
}

/// Registration form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterFocus {
    Email,
    Password,
    Confirm,
    Button,
    Back,
}

impl RegisterFocus {
    pub fn next(&self) -> Self {
        match self {
            RegisterFocus::Email => RegisterFocus::Password,
            RegisterFocus::Password => RegisterFocus::Confirm,
            RegisterFocus::Confirm => RegisterFocus::Button,
            RegisterFocus::Button => RegisterFocus::Back,
            RegisterFocus::Back => RegisterFocus::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            RegisterFocus::Email => RegisterFocus::Back,
            RegisterFocus::Password => RegisterFocus::Email,
            RegisterFocus::Confirm => RegisterFocus::Password,
            RegisterFocus::Button => RegisterFocus::Confirm,
            RegisterFocus::Back => RegisterFocus::Button,
        }
    }
}

/// Project form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorFocus {
    Name,
    Description,
    Value,
    Active,
    StartDate,
    EndDate,
    Save,
}

impl EditorFocus {
    const ORDER: [EditorFocus; 7] = [
        EditorFocus::Name,
        EditorFocus::Description,
        EditorFocus::Value,
        EditorFocus::Active,
        EditorFocus::StartDate,
        EditorFocus::EndDate,
        EditorFocus::Save,
    ];

    pub fn next(&self) -> Self {
        let idx = Self::ORDER.iter().position(|f| f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(&self) -> Self {
        let idx = Self::ORDER.iter().position(|f| f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone)]
pub struct LoginScreen {
    pub email: String,
    pub password: String,
    pub focus: LoginFocus,
    pub errors: Vec<ValidationError>,
    pub error: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone)]
pub struct RegisterScreen {
    pub email: String,
    pub password: String,
    pub confirmation: String,
    pub focus: RegisterFocus,
    pub errors: Vec<ValidationError>,
    pub error: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectListScreen {
    pub params: ListProjectsParams,
    pub page: Option<Page<Project>>,
    pub selection: usize,
    /// Edit buffer for the search prompt; applied to `params.q` on Enter.
    pub search: String,
    pub loading: bool,
    pub error: Option<String>,
}

impl ProjectListScreen {
    pub fn projects(&self) -> &[Project] {
        self.page.as_ref().map(|p| p.content.as_slice()).unwrap_or(&[])
    }

    pub fn selected(&self) -> Option<&Project> {
        self.projects().get(self.selection)
    }
}

#[derive(Debug, Clone)]
pub struct DetailScreen {
    pub id: i64,
    pub project: Option<Project>,
    pub loading: bool,
}

#[derive(Debug, Clone)]
pub struct EditorScreen {
    /// `None` when creating.
    pub id: Option<i64>,
    pub form: ProjectForm,
    pub focus: EditorFocus,
    pub errors: Vec<ValidationError>,
    pub loading: bool,
    pub saving: bool,
}

/// The screen currently shown, with its state.
#[derive(Debug, Clone)]
pub enum Screen {
    Login(LoginScreen),
    Register(RegisterScreen),
    Projects(ProjectListScreen),
    Detail(DetailScreen),
    Editor(EditorScreen),
}

impl Screen {
    pub fn route(&self) -> Route {
        match self {
            Screen::Login(_) => Route::Login,
            Screen::Register(_) => Route::Register,
            Screen::Projects(_) => Route::Projects,
            Screen::Detail(s) => Route::ProjectDetail(s.id),
            Screen::Editor(s) => s.id.map(Route::ProjectEdit).unwrap_or(Route::ProjectNew),
        }
    }

    /// Whether typed characters go into a text field on this screen.
    pub fn captures_text(&self) -> bool {
        matches!(
            self,
            Screen::Login(_) | Screen::Register(_) | Screen::Editor(_)
        )
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result of a network call made on a spawned task.
enum TaskResult {
    LoggedIn {
        email: String,
        result: Result<(), ApiError>,
    },
    Registered {
        email: String,
        result: Result<(), ApiError>,
    },
    ProjectsLoaded(Result<Page<Project>, ApiError>),
    ProjectLoaded(Result<Project, ApiError>),
    ProjectSaved(Result<Project, ApiError>),
    ProjectDeleted(i64, Result<(), ApiError>),
    SignedOut(RemoteLogout),
}

/// A task result tagged with the screen generation that started it.
struct TaskMessage {
    ticket: u64,
    result: TaskResult,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub shell: Arc<Shell>,
    auth: AuthService,
    projects: ProjectService,

    pub state: AppState,
    pub screen: Screen,

    /// Protected route to resume after login.
    return_to: Option<String>,

    /// Bumped on every screen change so late results can be discarded.
    ticket: u64,
    task_rx: mpsc::Receiver<TaskMessage>,
    task_tx: mpsc::Sender<TaskMessage>,
}

impl App {
    /// Create the application from a loaded config, using the configured
    /// session storage.
    pub fn new(config: Config) -> Result<Self> {
        let storage = config
            .open_storage()
            .context("Failed to open session storage")?;
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let session = Arc::new(SessionStore::new(storage));
        let initial = if session.is_authenticated() {
            Route::Projects
        } else {
            Route::Login
        };
        debug!(%initial, "Session loaded");

        let shell = Arc::new(Shell::new(initial));
        let api = ApiClient::new(&config, session.clone(), shell.clone(), shell.clone())
            .context("Failed to create API client")?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let mut app = Self {
            config,
            session: session.clone(),
            shell,
            auth: AuthService::new(api.clone(), session),
            projects: ProjectService::new(api),
            state: AppState::Normal,
            screen: Screen::Login(LoginScreen::empty()),
            return_to: None,
            ticket: 0,
            task_rx: rx,
            task_tx: tx,
        };
        app.go(initial);
        Ok(app)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn route(&self) -> Route {
        self.screen.route()
    }

    /// Switch screens, applying the login guard and starting any load the
    /// new screen needs.
    pub fn go(&mut self, route: Route) {
        let route = if !route.is_public() && !self.session.is_authenticated() {
            debug!(%route, "Protected route without session, redirecting to login");
            self.return_to = Some(route.path());
            Route::Login
        } else {
            route
        };

        self.ticket += 1;
        self.state = AppState::Normal;
        self.shell.set_route(route);

        self.screen = match route {
            Route::Login => Screen::Login(LoginScreen::with_email(
                self.config.last_email.clone().unwrap_or_default(),
            )),
            Route::Register => Screen::Register(RegisterScreen::empty()),
            Route::Projects => Screen::Projects(ProjectListScreen::default()),
            Route::ProjectDetail(id) => Screen::Detail(DetailScreen {
                id,
                project: None,
                loading: true,
            }),
            Route::ProjectNew => Screen::Editor(EditorScreen {
                id: None,
                form: ProjectForm::default(),
                focus: EditorFocus::Name,
                errors: Vec::new(),
                loading: false,
                saving: false,
            }),
            Route::ProjectEdit(id) => Screen::Editor(EditorScreen {
                id: Some(id),
                form: ProjectForm::default(),
                focus: EditorFocus::Name,
                errors: Vec::new(),
                loading: true,
                saving: false,
            }),
        };

        match route {
            Route::Projects => self.load_projects(),
            Route::ProjectDetail(id) | Route::ProjectEdit(id) => self.load_project(id),
            _ => {}
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn submit_login(&mut self) {
        let Screen::Login(s) = &mut self.screen else {
            return;
        };
        if s.submitting {
            return;
        }
        s.error = None;
        if let Err(errors) = validation::validate_login(&s.email, &s.password) {
            s.errors = errors;
            return;
        }
        s.errors.clear();
        s.submitting = true;

        let email = s.email.trim().to_string();
        let password = s.password.clone();
        let auth = self.auth.clone();
        self.spawn(async move {
            let result = auth.login(&email, &password).await.map(|_| ());
            TaskResult::LoggedIn { email, result }
        });
    }

    pub fn submit_registration(&mut self) {
        let Screen::Register(s) = &mut self.screen else {
            return;
        };
        if s.submitting {
            return;
        }
        s.error = None;
        if let Err(errors) =
            validation::validate_registration(&s.email, &s.password, &s.confirmation)
        {
            s.errors = errors;
            return;
        }
        s.errors.clear();
        s.submitting = true;

        let email = s.email.trim().to_string();
        let password = s.password.clone();
        let auth = self.auth.clone();
        self.spawn(async move {
            let result = auth.register(&email, &password).await;
            TaskResult::Registered { email, result }
        });
    }

    /// Clear the session, show the login screen and revoke the session on
    /// the server in the background.
    pub fn logout(&mut self) {
        let refresh_token = self.session.refresh_token();
        self.auth.logout();
        info!("Signed out");

        self.return_to = None;
        self.go(Route::Login);
        self.shell.notify(Notification::info("Signed out."));

        let auth = self.auth.clone();
        self.spawn(async move { TaskResult::SignedOut(auth.revoke(refresh_token).await) });
    }

    // =========================================================================
    // Projects
    // =========================================================================

    pub fn load_projects(&mut self) {
        let Screen::Projects(s) = &mut self.screen else {
            return;
        };
        s.loading = true;
        let params = s.params.clone();
        let projects = self.projects.clone();
        self.spawn(async move { TaskResult::ProjectsLoaded(projects.list(&params).await) });
    }

    fn load_project(&mut self, id: i64) {
        let projects = self.projects.clone();
        self.spawn(async move { TaskResult::ProjectLoaded(projects.get(id).await) });
    }

    /// Apply a change to the list query and reload.
    pub fn update_query(&mut self, change: impl FnOnce(&mut ListProjectsParams)) {
        if let Screen::Projects(s) = &mut self.screen {
            change(&mut s.params);
            s.selection = 0;
        }
        self.load_projects();
    }

    pub fn next_page(&mut self) {
        let has_next = match &self.screen {
            Screen::Projects(s) => s.page.as_ref().is_some_and(|p| p.has_next()),
            _ => false,
        };
        if has_next {
            self.update_query(|p| p.page = p.page.saturating_add(1));
        }
    }

    pub fn prev_page(&mut self) {
        let has_prev = match &self.screen {
            Screen::Projects(s) => s.params.page > 0,
            _ => false,
        };
        if has_prev {
            self.update_query(|p| p.page = p.page.saturating_sub(1));
        }
    }

    pub fn start_search(&mut self) {
        if let Screen::Projects(s) = &mut self.screen {
            s.search = s.params.q.clone();
            self.state = AppState::Searching;
        }
    }

    pub fn apply_search(&mut self) {
        self.state = AppState::Normal;
        let query = match &self.screen {
            Screen::Projects(s) => s.search.trim().to_string(),
            _ => return,
        };
        self.update_query(|p| {
            p.q = query;
            p.page = 0;
        });
    }

    pub fn cancel_search(&mut self) {
        self.state = AppState::Normal;
        if let Screen::Projects(s) = &mut self.screen {
            s.search = s.params.q.clone();
        }
    }

    pub fn submit_project(&mut self) {
        let Screen::Editor(s) = &mut self.screen else {
            return;
        };
        if s.saving || s.loading {
            return;
        }
        let input = match s.form.validate() {
            Ok(input) => input,
            Err(errors) => {
                s.errors = errors;
                return;
            }
        };
        s.errors.clear();
        s.saving = true;

        let id = s.id;
        let projects = self.projects.clone();
        self.spawn(async move {
            let result = match id {
                Some(id) => projects.update(id, &input).await,
                None => projects.create(&input).await,
            };
            TaskResult::ProjectSaved(result)
        });
    }

    pub fn confirm_delete(&mut self) {
        let id = match &self.screen {
            Screen::Projects(s) => s.selected().map(|p| p.id),
            Screen::Detail(s) => s.project.as_ref().map(|p| p.id),
            _ => None,
        };
        if let Some(id) = id {
            self.state = AppState::ConfirmingDelete(id);
        }
    }

    pub fn delete_project(&mut self, id: i64) {
        self.state = AppState::Normal;
        let projects = self.projects.clone();
        self.spawn(async move { TaskResult::ProjectDeleted(id, projects.delete(id).await) });
    }

    // =========================================================================
    // Background tasks
    // =========================================================================

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = TaskResult> + Send + 'static,
    {
        let tx = self.task_tx.clone();
        let ticket = self.ticket;
        tokio::spawn(async move {
            let result = task.await;
            if tx.send(TaskMessage { ticket, result }).await.is_err() {
                debug!("UI closed before task finished");
            }
        });
    }

    /// Follow pipeline-driven navigation, then process completed tasks.
    pub fn check_background_tasks(&mut self) {
        if let Some(route) = self.shell.take_redirect() {
            if route != self.route() {
                let previous = self.route();
                if !previous.is_public() {
                    self.return_to = Some(previous.path());
                }
                self.go(route);
            }
        }

        let mut results = Vec::new();
        while let Ok(message) = self.task_rx.try_recv() {
            results.push(message);
        }

        for message in results {
            if let TaskResult::SignedOut(outcome) = message.result {
                debug!(?outcome, "Remote logout finished");
                continue;
            }
            if message.ticket != self.ticket {
                debug!("Ignoring result for a screen that is no longer shown");
                continue;
            }
            self.process_task_result(message.result);
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::LoggedIn { email, result } => {
                let Screen::Login(s) = &mut self.screen else {
                    return;
                };
                s.submitting = false;
                match result {
                    Ok(()) => {
                        s.password.clear();
                        self.config.last_email = Some(email);
                        if let Err(e) = self.config.save() {
                            warn!(error = %e, "Failed to save config");
                        }
                        let target = sanitize_return_route(self.return_to.take().as_deref())
                            .map(|path| Route::parse(&path))
                            .unwrap_or(Route::Projects);
                        self.go(target);
                    }
                    Err(e) => {
                        s.password.clear();
                        s.focus = LoginFocus::Password;
                        s.error = Some(login_failure_message(&e));
                    }
                }
            }
            TaskResult::Registered { email, result } => {
                let Screen::Register(s) = &mut self.screen else {
                    return;
                };
                s.submitting = false;
                match result {
                    Ok(()) => {
                        self.config.last_email = Some(email);
                        self.go(Route::Login);
                        self.shell
                            .notify(Notification::success("Account created. You can sign in now."));
                    }
                    Err(e) => {
                        s.error = Some(failure_message(&e, REGISTER_FAILED_MESSAGE));
                    }
                }
            }
            TaskResult::ProjectsLoaded(result) => {
                let Screen::Projects(s) = &mut self.screen else {
                    return;
                };
                s.loading = false;
                match result {
                    Ok(page) => {
                        s.params.page = page.number;
                        if page.size > 0 {
                            s.params.size = page.size;
                        }
                        s.selection = s.selection.min(page.content.len().saturating_sub(1));
                        s.page = Some(page);
                        s.error = None;
                    }
                    Err(e) => {
                        let message = failure_message(&e, LOAD_PROJECTS_FAILED_MESSAGE);
                        s.error = Some(message.clone());
                        self.report(&e, message);
                    }
                }
            }
            TaskResult::ProjectLoaded(result) => match result {
                Ok(project) => match &mut self.screen {
                    Screen::Detail(s) => {
                        s.loading = false;
                        s.project = Some(project);
                    }
                    Screen::Editor(s) => {
                        s.loading = false;
                        s.form = ProjectForm::from_project(&project);
                    }
                    _ => {}
                },
                Err(e) => {
                    let message = failure_message(&e, LOAD_PROJECT_FAILED_MESSAGE);
                    self.report(&e, message);
                    self.go(Route::Projects);
                }
            },
            TaskResult::ProjectSaved(result) => {
                let Screen::Editor(s) = &mut self.screen else {
                    return;
                };
                s.saving = false;
                match result {
                    Ok(project) => {
                        info!(id = project.id, "Project saved");
                        self.shell.notify(Notification::success("Project saved."));
                        self.go(Route::Projects);
                    }
                    Err(e) => {
                        let message = failure_message(&e, SAVE_FAILED_MESSAGE);
                        self.report(&e, message);
                    }
                }
            }
            TaskResult::ProjectDeleted(id, result) => match result {
                Ok(()) => {
                    self.shell.notify(Notification::success("Project deleted."));
                    if matches!(self.screen, Screen::Detail(_)) {
                        self.go(Route::Projects);
                    } else {
                        self.load_projects();
                    }
                }
                Err(e) => {
                    debug!(id, error = %e, "Delete failed");
                    let message = failure_message(&e, DELETE_FAILED_MESSAGE);
                    self.report(&e, message);
                }
            },
            TaskResult::SignedOut(_) => {}
        }
    }

    /// Notify about a failure unless the request pipeline already did.
    fn report(&self, error: &ApiError, message: String) {
        if !reported_by_pipeline(error) {
            self.shell.notify(Notification::error(message));
        }
    }
}

impl LoginScreen {
    fn empty() -> Self {
        Self::with_email(String::new())
    }

    fn with_email(email: String) -> Self {
        let focus = if email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        Self {
            email,
            password: String::new(),
            focus,
            errors: Vec::new(),
            error: None,
            submitting: false,
        }
    }
}

impl RegisterScreen {
    fn empty() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            confirmation: String::new(),
            focus: RegisterFocus::Email,
            errors: Vec::new(),
            error: None,
            submitting: false,
        }
    }
}

/// Server message when there is one, else the network text or `fallback`.
fn failure_message(error: &ApiError, fallback: &str) -> String {
    if let Some(message) = error.api_message() {
        return message;
    }
    match error.kind() {
        ErrorKind::Network => error.user_message(),
        _ => fallback.to_string(),
    }
}

fn login_failure_message(error: &ApiError) -> String {
    match error.kind() {
        ErrorKind::Unauthorized => error
            .api_message()
            .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string()),
        _ => error.user_message(),
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

pub fn can_add_name_char(current_len: usize, c: char) -> bool {
    current_len < MAX_NAME_LENGTH && is_valid_input_char(c)
}

pub fn can_add_description_char(current_len: usize, c: char) -> bool {
    current_len < MAX_DESCRIPTION_LENGTH && is_valid_input_char(c)
}

/// Amounts accept digits, one sign and either decimal separator.
pub fn can_add_value_char(current_len: usize, c: char) -> bool {
    current_len < MAX_VALUE_LENGTH && (c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
}

pub fn can_add_search_char(current_len: usize, c: char) -> bool {
    current_len < MAX_SEARCH_LENGTH && is_valid_input_char(c)
}

/// Append a typed digit to a masked date field. Non-digits are ignored.
pub fn push_date_digit(current: &str, c: char) -> String {
    let digits = current.chars().filter(|c| c.is_ascii_digit()).count();
    if !c.is_ascii_digit() || digits >= MAX_DATE_DIGITS {
        return current.to_string();
    }
    mask_date_input(&format!("{}{}", current, c))
}

/// Remove the last digit of a masked date field.
pub fn pop_date_digit(current: &str) -> String {
    let mut digits: String = current.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.pop();
    mask_date_input(&digits)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use projectdesk_core::auth::session::TOKEN_KEY;
    use projectdesk_core::nav::Navigator;
    use projectdesk_core::storage::MemoryStore;

    fn offline_config() -> Config {
        Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        }
    }

    fn app_with(slots: &[(&str, &str)]) -> App {
        let storage = Arc::new(MemoryStore::with_slots(slots.iter().copied()));
        App::with_storage(offline_config(), storage).expect("app")
    }

    // -------------------------------------------------------------------------
    // Navigation Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_starts_on_login_without_session() {
        let app = app_with(&[]);
        assert_eq!(app.route(), Route::Login);
        assert_eq!(app.shell.current_route(), Route::Login);
    }

    #[tokio::test]
    async fn test_starts_on_projects_with_session() {
        let app = app_with(&[(TOKEN_KEY, "abc")]);
        assert_eq!(app.route(), Route::Projects);
        assert!(matches!(&app.screen, Screen::Projects(s) if s.loading));
    }

    #[tokio::test]
    async fn test_guard_remembers_protected_route() {
        let mut app = app_with(&[]);
        app.go(Route::ProjectDetail(8));
        assert_eq!(app.route(), Route::Login);
        assert_eq!(app.return_to.as_deref(), Some("/projects/8"));
    }

    #[tokio::test]
    async fn test_pipeline_redirect_switches_screen() {
        let mut app = app_with(&[(TOKEN_KEY, "abc")]);
        app.go(Route::ProjectDetail(3));
        app.session.logout();
        app.shell.navigate(Route::Login);

        app.check_background_tasks();

        assert_eq!(app.route(), Route::Login);
        assert_eq!(app.return_to.as_deref(), Some("/projects/3"));
    }

    #[tokio::test]
    async fn test_stale_results_are_ignored() {
        let mut app = app_with(&[(TOKEN_KEY, "abc")]);
        let stale = app.ticket;
        app.go(Route::ProjectNew);

        let sent = app.task_tx.try_send(TaskMessage {
            ticket: stale,
            result: TaskResult::ProjectsLoaded(Err(ApiError::Client("late".to_string()))),
        });
        assert!(sent.is_ok());
        app.check_background_tasks();

        assert_eq!(app.route(), Route::ProjectNew);
        assert!(app.shell.active_notification().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_session_immediately() {
        let mut app = app_with(&[(TOKEN_KEY, "abc"), ("projectdesk_refresh_token", "r")]);
        app.logout();
        assert!(!app.session.is_authenticated());
        assert_eq!(app.session.refresh_token(), None);
        assert_eq!(app.route(), Route::Login);
    }

    #[tokio::test]
    async fn test_invalid_login_does_not_submit() {
        let mut app = app_with(&[]);
        app.submit_login();
        match &app.screen {
            Screen::Login(s) => {
                assert!(!s.submitting);
                assert_eq!(
                    s.errors,
                    vec![ValidationError::EmailRequired, ValidationError::PasswordRequired]
                );
            }
            other => panic!("unexpected screen {:?}", other.route()),
        }
    }

    #[tokio::test]
    async fn test_invalid_project_form_does_not_submit() {
        let mut app = app_with(&[(TOKEN_KEY, "abc")]);
        app.go(Route::ProjectNew);
        app.submit_project();
        match &app.screen {
            Screen::Editor(s) => {
                assert!(!s.saving);
                assert!(s.errors.contains(&ValidationError::NameRequired));
                assert!(s.errors.contains(&ValidationError::StartDateRequired));
            }
            other => panic!("unexpected screen {:?}", other.route()),
        }
    }

    // -------------------------------------------------------------------------
    // Focus Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_login_focus_cycle() {
        assert_eq!(LoginFocus::Email.next(), LoginFocus::Password);
        assert_eq!(LoginFocus::Register.next(), LoginFocus::Email);
        assert_eq!(LoginFocus::Email.prev(), LoginFocus::Register);
    }

    #[test]
    fn test_editor_focus_cycle() {
        assert_eq!(EditorFocus::Name.next(), EditorFocus::Description);
        assert_eq!(EditorFocus::Save.next(), EditorFocus::Name);
        assert_eq!(EditorFocus::Name.prev(), EditorFocus::Save);
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(can_add_email_char(253, '@'));
        assert!(!can_add_email_char(254, 'a'));
        assert!(!can_add_email_char(0, ' '));
        assert!(!can_add_email_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
    }

    #[test]
    fn test_can_add_value_char() {
        assert!(can_add_value_char(0, '1'));
        assert!(can_add_value_char(0, ','));
        assert!(!can_add_value_char(0, 'e'));
        assert!(!can_add_value_char(20, '1'));
    }

    #[test]
    fn test_date_digit_editing() {
        assert_eq!(push_date_digit("", '0'), "0");
        assert_eq!(push_date_digit("01", '0'), "01/0");
        assert_eq!(push_date_digit("01/03/202", '4'), "01/03/2024");
        assert_eq!(push_date_digit("01/03/2024", '5'), "01/03/2024");
        assert_eq!(push_date_digit("01", 'x'), "01");
        assert_eq!(pop_date_digit("01/0"), "01");
        assert_eq!(pop_date_digit("01/03/2024"), "01/03/202");
        assert_eq!(pop_date_digit(""), "");
    }
}
