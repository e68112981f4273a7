//! In-memory simulated app: a [`UiDriver`] that answers like the demo app.
//!
//! The simulator models just enough of the application under test for the
//! scenario suites to run hermetically: the bottom navigation bar, the home
//! logo, the login form with its validation rules and success alert, the
//! forms screen, and the webview screen. State is only ever observed through
//! the driver contract, the same way a remote session would be.
//!
//! Timing is configurable: [`SimDriver::with_latency`] makes the success
//! alert render only after a delay, so the wait engine is exercised against
//! elements that are present in the tree but not yet visible.

use crate::driver::{ElementHandle, UiDriver};
use crate::locator::{Locator, Strategy};
use crate::result::{TantearError, TantearResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::trace;
use uuid::Uuid;

/// Credentials the simulated backend accepts.
const VALID_EMAIL: &str = "test@example.com";
const VALID_PASSWORD: &str = "Password123";

/// Validation messages rendered by the login form.
const EMAIL_ERROR_TEXT: &str = "Please enter a valid email address";
const PASSWORD_ERROR_TEXT: &str = "Please enter at least 8 characters";

/// 1x1 transparent PNG, the simulator's screenshot payload.
const SCREENSHOT_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppScreen {
    Home,
    Webview,
    Login,
    Forms,
    Swipe,
    Drag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormTab {
    Login,
    SignUp,
}

#[derive(Debug, Clone)]
struct Alert {
    title: String,
    message: String,
    /// The alert exists in the tree from creation but renders at this instant.
    visible_at: Instant,
}

#[derive(Debug)]
struct AppState {
    screen: AppScreen,
    tab: FormTab,
    email: String,
    password: String,
    repeat_password: String,
    email_error: bool,
    password_error: bool,
    last_edited: Option<&'static str>,
    forms_input: String,
    switch_on: bool,
    alert: Option<Alert>,
    quit: bool,
    quit_count: u32,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: AppScreen::Home,
            tab: FormTab::Login,
            email: String::new(),
            password: String::new(),
            repeat_password: String::new(),
            email_error: false,
            password_error: false,
            last_edited: None,
            forms_input: String::new(),
            switch_on: false,
            alert: None,
            quit: false,
            quit_count: 0,
        }
    }
}

/// One renderable element in the simulated tree.
#[derive(Debug, Clone)]
struct Node {
    key: &'static str,
    a11y: Option<&'static str>,
    resource_id: Option<&'static str>,
    class: &'static str,
    text: String,
    displayed: bool,
}

impl Node {
    fn button(key: &'static str, a11y: &'static str, text: &str) -> Self {
        Self {
            key,
            a11y: Some(a11y),
            resource_id: None,
            class: "android.widget.Button",
            text: text.to_string(),
            displayed: true,
        }
    }

    fn input(key: &'static str, a11y: &'static str, text: &str) -> Self {
        Self {
            key,
            a11y: Some(a11y),
            resource_id: None,
            class: "android.widget.EditText",
            text: text.to_string(),
            displayed: true,
        }
    }

    fn text_view(key: &'static str, text: &str) -> Self {
        Self {
            key,
            a11y: None,
            resource_id: None,
            class: "android.widget.TextView",
            text: text.to_string(),
            displayed: true,
        }
    }

    fn alert_part(key: &'static str, resource_id: &'static str, text: &str, shown: bool) -> Self {
        Self {
            key,
            a11y: None,
            resource_id: Some(resource_id),
            class: "android.widget.TextView",
            text: text.to_string(),
            displayed: shown,
        }
    }
}

/// Extract the needle of a `contains(@text, '...')` XPath filter.
fn xpath_contains_text(selector: &str) -> Option<&str> {
    let (_, rest) = selector.split_once("contains(@text,")?;
    let (_, quoted) = rest.split_once('\'')?;
    let (needle, _) = quoted.split_once('\'')?;
    Some(needle)
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

struct SimInner {
    app: Mutex<AppState>,
    calls: Mutex<Vec<String>>,
}

/// Simulated driver session over the in-memory app.
pub struct SimDriver {
    inner: Arc<SimInner>,
    session_id: String,
    latency: Duration,
}

impl std::fmt::Debug for SimDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimDriver")
            .field("session_id", &self.session_id)
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

/// Observer handle onto a [`SimDriver`], usable after the driver is consumed
/// by a session guard. Lets tests verify teardown and call history.
#[derive(Clone)]
pub struct SimProbe {
    inner: Arc<SimInner>,
}

impl std::fmt::Debug for SimProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimProbe").finish_non_exhaustive()
    }
}

impl SimProbe {
    /// Whether the session has been quit.
    #[must_use]
    pub fn is_quit(&self) -> bool {
        lock(&self.inner.app).quit
    }

    /// How many effective quits the driver performed.
    #[must_use]
    pub fn quit_count(&self) -> u32 {
        lock(&self.inner.app).quit_count
    }

    /// All driver calls in order.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        lock(&self.inner.calls).clone()
    }

    /// Whether a call with the given prefix was made.
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        lock(&self.inner.calls).iter().any(|c| c.starts_with(prefix))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimDriver {
    /// Launch the simulated app on its default screen.
    #[must_use]
    pub fn launch() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// Launch with an artificial render delay for the success alert.
    #[must_use]
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            inner: Arc::new(SimInner {
                app: Mutex::new(AppState::default()),
                calls: Mutex::new(Vec::new()),
            }),
            session_id: Uuid::new_v4().to_string(),
            latency,
        }
    }

    /// The simulated session id.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// An observer handle that outlives the driver.
    #[must_use]
    pub fn probe_handle(&self) -> SimProbe {
        SimProbe {
            inner: Arc::clone(&self.inner),
        }
    }

    fn record(&self, call: String) {
        lock(&self.inner.calls).push(call);
    }

    fn app(&self) -> MutexGuard<'_, AppState> {
        lock(&self.inner.app)
    }

    fn guard_alive(state: &AppState) -> TantearResult<()> {
        if state.quit {
            Err(TantearError::session("session already quit"))
        } else {
            Ok(())
        }
    }

    /// Render the current UI tree.
    fn tree(state: &AppState) -> Vec<Node> {
        let mut nodes = vec![
            Node::button("nav-home", "Home", "Home"),
            Node::button("nav-webview", "Webview", "Webview"),
            Node::button("nav-login", "Login", "Login"),
            Node::button("nav-forms", "Forms", "Forms"),
            Node::button("nav-swipe", "Swipe", "Swipe"),
            Node::button("nav-drag", "Drag", "Drag"),
        ];

        match state.screen {
            AppScreen::Home => {
                let mut logo = Node::text_view("home-logo", "WEBDRIVER");
                logo.a11y = Some("Home-screen");
                logo.class = "android.widget.ImageView";
                nodes.push(logo);
            }
            AppScreen::Login => {
                nodes.push(Node::button("login-tab", "button-login-container", "Login"));
                nodes.push(Node::button(
                    "signup-tab",
                    "button-sign-up-container",
                    "Sign up",
                ));
                nodes.push(Node::input("input-email", "input-email", &state.email));
                nodes.push(Node::input(
                    "input-password",
                    "input-password",
                    &state.password,
                ));
                match state.tab {
                    FormTab::Login => {
                        nodes.push(Node::button("login-button", "button-LOGIN", "LOGIN"));
                    }
                    FormTab::SignUp => {
                        nodes.push(Node::input(
                            "input-repeat-password",
                            "input-repeat-password",
                            &state.repeat_password,
                        ));
                        nodes.push(Node::button("signup-button", "button-SIGN UP", "SIGN UP"));
                    }
                }
                if state.email_error {
                    nodes.push(Node::text_view("email-error", EMAIL_ERROR_TEXT));
                }
                if state.password_error {
                    nodes.push(Node::text_view("password-error", PASSWORD_ERROR_TEXT));
                }
            }
            AppScreen::Forms => {
                nodes.push(Node::input("forms-input", "text-input", &state.forms_input));
                let mut switch = Node::button("forms-switch", "switch", "");
                switch.class = "android.widget.Switch";
                nodes.push(switch);
                nodes.push(Node::button("forms-dropdown", "Dropdown", "Select an item"));
            }
            AppScreen::Webview => {
                nodes.push(Node::input("webview-url", "URL input field", ""));
            }
            AppScreen::Swipe | AppScreen::Drag => {}
        }

        if let Some(alert) = &state.alert {
            let shown = Instant::now() >= alert.visible_at;
            nodes.push(Node::alert_part(
                "alert-title",
                "android:id/alertTitle",
                &alert.title,
                shown,
            ));
            nodes.push(Node::alert_part(
                "alert-message",
                "android:id/message",
                &alert.message,
                shown,
            ));
            let mut ok = Node::alert_part("alert-ok", "android:id/button1", "OK", shown);
            ok.class = "android.widget.Button";
            nodes.push(ok);
        }

        nodes
    }

    fn find_in_tree(state: &AppState, locator: &Locator) -> Option<Node> {
        Self::tree(state).into_iter().find(|node| {
            let selector = locator.selector();
            match locator.strategy() {
                Strategy::AccessibilityId => node.a11y == Some(selector),
                Strategy::Id => node.resource_id == Some(selector),
                Strategy::ClassName => node.class == selector,
                Strategy::XPath => xpath_contains_text(selector)
                    .is_some_and(|needle| node.text.contains(needle)),
            }
        })
    }

    fn resolve(state: &AppState, element: &ElementHandle) -> TantearResult<Node> {
        Self::tree(state)
            .into_iter()
            .find(|node| node.key == element.id)
            .ok_or_else(|| TantearError::NoSuchElement {
                locator: element.id.clone(),
            })
    }

    /// Leaving a just-edited field re-runs its validation, like the app does
    /// on blur.
    fn blur_if_leaving(state: &mut AppState, target: &str) {
        match state.last_edited {
            Some(field) if field != target => {
                match field {
                    "input-email" => state.email_error = !is_valid_email(&state.email),
                    "input-password" => state.password_error = state.password.len() < 8,
                    _ => {}
                }
                state.last_edited = None;
            }
            _ => {}
        }
    }

    fn submit_login(state: &mut AppState, latency: Duration) {
        state.email_error = !is_valid_email(&state.email);
        state.password_error = state.password.len() < 8;
        if state.email_error || state.password_error {
            return;
        }
        if state.email == VALID_EMAIL && state.password == VALID_PASSWORD {
            state.alert = Some(Alert {
                title: "Success".to_string(),
                message: "You are logged in!".to_string(),
                visible_at: Instant::now() + latency,
            });
        }
        // Wrong credentials: the form stays put with no alert.
    }

    fn submit_sign_up(state: &mut AppState, latency: Duration) {
        state.email_error = !is_valid_email(&state.email);
        state.password_error =
            state.password.len() < 8 || state.password != state.repeat_password;
        if state.email_error || state.password_error {
            return;
        }
        state.alert = Some(Alert {
            title: "Signed Up!".to_string(),
            message: "You successfully signed up!".to_string(),
            visible_at: Instant::now() + latency,
        });
    }

    fn dispatch_click(state: &mut AppState, key: &str, latency: Duration) {
        match key {
            "nav-home" => state.screen = AppScreen::Home,
            "nav-webview" => state.screen = AppScreen::Webview,
            "nav-login" => state.screen = AppScreen::Login,
            "nav-forms" => state.screen = AppScreen::Forms,
            "nav-swipe" => state.screen = AppScreen::Swipe,
            "nav-drag" => state.screen = AppScreen::Drag,
            "login-tab" => state.tab = FormTab::Login,
            "signup-tab" => state.tab = FormTab::SignUp,
            "login-button" => Self::submit_login(state, latency),
            "signup-button" => Self::submit_sign_up(state, latency),
            "alert-ok" => state.alert = None,
            "forms-switch" => state.switch_on = !state.switch_on,
            _ => {}
        }
    }

    fn edit_field(state: &mut AppState, key: &'static str, edit: impl FnOnce(&mut String)) {
        let field = match key {
            "input-email" => &mut state.email,
            "input-password" => &mut state.password,
            "input-repeat-password" => &mut state.repeat_password,
            "forms-input" => &mut state.forms_input,
            _ => return,
        };
        edit(field);
        state.last_edited = Some(key);
    }
}

impl UiDriver for SimDriver {
    fn find(&self, locator: &Locator) -> TantearResult<ElementHandle> {
        let state = self.app();
        Self::guard_alive(&state)?;
        trace!(%locator, "sim find");
        Self::find_in_tree(&state, locator)
            .map(|node| ElementHandle::new(node.key))
            .ok_or_else(|| TantearError::NoSuchElement {
                locator: locator.to_string(),
            })
    }

    fn is_displayed(&self, element: &ElementHandle) -> TantearResult<bool> {
        let state = self.app();
        Self::guard_alive(&state)?;
        Ok(Self::resolve(&state, element)?.displayed)
    }

    fn is_enabled(&self, element: &ElementHandle) -> TantearResult<bool> {
        let state = self.app();
        Self::guard_alive(&state)?;
        Self::resolve(&state, element)?;
        Ok(true)
    }

    fn click(&self, element: &ElementHandle) -> TantearResult<()> {
        self.record(format!("click:{}", element.id));
        let mut state = self.app();
        Self::guard_alive(&state)?;
        let node = Self::resolve(&state, element)?;
        Self::blur_if_leaving(&mut state, node.key);
        Self::dispatch_click(&mut state, node.key, self.latency);
        Ok(())
    }

    fn clear(&self, element: &ElementHandle) -> TantearResult<()> {
        self.record(format!("clear:{}", element.id));
        let mut state = self.app();
        Self::guard_alive(&state)?;
        let node = Self::resolve(&state, element)?;
        Self::blur_if_leaving(&mut state, node.key);
        Self::edit_field(&mut state, node.key, String::clear);
        Ok(())
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> TantearResult<()> {
        self.record(format!("send_keys:{}:{text}", element.id));
        let mut state = self.app();
        Self::guard_alive(&state)?;
        let node = Self::resolve(&state, element)?;
        Self::blur_if_leaving(&mut state, node.key);
        Self::edit_field(&mut state, node.key, |field| field.push_str(text));
        Ok(())
    }

    fn text(&self, element: &ElementHandle) -> TantearResult<String> {
        let state = self.app();
        Self::guard_alive(&state)?;
        Ok(Self::resolve(&state, element)?.text)
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> TantearResult<Option<String>> {
        let state = self.app();
        Self::guard_alive(&state)?;
        let node = Self::resolve(&state, element)?;
        let value = match name {
            "checked" if node.key == "forms-switch" => Some(state.switch_on.to_string()),
            "content-desc" => node.a11y.map(str::to_string),
            "text" => Some(node.text),
            _ => None,
        };
        Ok(value)
    }

    fn screenshot(&self) -> TantearResult<Vec<u8>> {
        self.record("screenshot".to_string());
        let state = self.app();
        Self::guard_alive(&state)?;
        BASE64
            .decode(SCREENSHOT_PNG_BASE64)
            .map_err(|err| TantearError::Screenshot {
                message: format!("invalid simulator payload: {err}"),
            })
    }

    fn back(&self) -> TantearResult<()> {
        self.record("back".to_string());
        let mut state = self.app();
        Self::guard_alive(&state)?;
        if state.alert.is_some() {
            state.alert = None;
        } else {
            state.screen = AppScreen::Home;
        }
        Ok(())
    }

    fn page_source(&self) -> TantearResult<String> {
        let state = self.app();
        Self::guard_alive(&state)?;
        let mut source = String::from("<hierarchy>\n");
        for node in Self::tree(&state) {
            source.push_str(&format!(
                "  <{} content-desc=\"{}\" resource-id=\"{}\" text=\"{}\" displayed=\"{}\"/>\n",
                node.class,
                node.a11y.unwrap_or_default(),
                node.resource_id.unwrap_or_default(),
                node.text,
                node.displayed,
            ));
        }
        source.push_str("</hierarchy>");
        Ok(source)
    }

    fn quit(&mut self) -> TantearResult<()> {
        self.record("quit".to_string());
        let mut state = self.app();
        if state.quit {
            return Ok(());
        }
        state.quit = true;
        state.quit_count += 1;
        Ok(())
    }
}
