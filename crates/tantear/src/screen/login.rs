//! Login screen accessor: tabs, credential entry, validation errors, and the
//! result alert.

use super::ScreenContext;
use crate::driver::UiDriver;
use crate::locator::Locator;
use crate::result::TantearResult;
use crate::wait::{Waiter, ERROR_PROBE_TIMEOUT_MS};

/// Accessor for the login screen.
#[derive(Debug, Clone)]
pub struct LoginScreen<'d> {
    ctx: ScreenContext<'d>,
}

impl<'d> LoginScreen<'d> {
    // Tab selectors
    /// Login tab
    pub const LOGIN_TAB: Locator = Locator::accessibility("button-login-container");
    /// Sign-up tab
    pub const SIGNUP_TAB: Locator = Locator::accessibility("button-sign-up-container");

    // Form fields (shared between login and sign-up)
    /// Email field
    pub const EMAIL_INPUT: Locator = Locator::accessibility("input-email");
    /// Password field
    pub const PASSWORD_INPUT: Locator = Locator::accessibility("input-password");
    /// Repeat-password field (sign-up tab only)
    pub const REPEAT_PASSWORD_INPUT: Locator = Locator::accessibility("input-repeat-password");
    /// Login submit button
    pub const LOGIN_BUTTON: Locator = Locator::accessibility("button-LOGIN");
    /// Sign-up submit button
    pub const SIGNUP_BUTTON: Locator = Locator::accessibility("button-SIGN UP");

    // Validation messages
    /// Email format error text
    pub const EMAIL_ERROR: Locator =
        Locator::xpath("//android.widget.TextView[contains(@text, 'Please enter a valid email')]");
    /// Password length error text
    pub const PASSWORD_ERROR: Locator = Locator::xpath(
        "//android.widget.TextView[contains(@text, 'Please enter at least 8 characters')]",
    );

    // Result alert
    /// Alert title
    pub const ALERT_TITLE: Locator = Locator::id("android:id/alertTitle");
    /// Alert message body
    pub const ALERT_MESSAGE: Locator = Locator::id("android:id/message");
    /// Alert confirm button
    pub const ALERT_OK_BUTTON: Locator = Locator::id("android:id/button1");

    /// Accessor over a driver with the default waiter.
    #[must_use]
    pub fn new(driver: &'d dyn UiDriver) -> Self {
        Self {
            ctx: ScreenContext::new(driver),
        }
    }

    /// Accessor with a custom waiter.
    #[must_use]
    pub fn with_waiter(driver: &'d dyn UiDriver, waiter: Waiter) -> Self {
        Self {
            ctx: ScreenContext::with_waiter(driver, waiter),
        }
    }

    /// Accessor over an already-configured context.
    #[must_use]
    pub const fn from_context(ctx: ScreenContext<'d>) -> Self {
        Self { ctx }
    }

    /// The shared context, for ad hoc probes in tests.
    #[must_use]
    pub const fn context(&self) -> &ScreenContext<'d> {
        &self.ctx
    }

    // --- tabs ---

    /// Select the login tab.
    pub fn select_login_tab(&self) -> TantearResult<()> {
        self.ctx.tap(&Self::LOGIN_TAB)
    }

    /// Select the sign-up tab.
    pub fn select_signup_tab(&self) -> TantearResult<()> {
        self.ctx.tap(&Self::SIGNUP_TAB)
    }

    // --- credential entry ---

    /// Type the email address.
    pub fn enter_email(&self, email: &str) -> TantearResult<()> {
        self.ctx.type_text(&Self::EMAIL_INPUT, email)
    }

    /// Type the password.
    pub fn enter_password(&self, password: &str) -> TantearResult<()> {
        self.ctx.type_text(&Self::PASSWORD_INPUT, password)
    }

    /// Type the repeat password on the sign-up tab.
    pub fn enter_repeat_password(&self, password: &str) -> TantearResult<()> {
        self.ctx.type_text(&Self::REPEAT_PASSWORD_INPUT, password)
    }

    /// Press the login button.
    pub fn submit(&self) -> TantearResult<()> {
        self.ctx.tap(&Self::LOGIN_BUTTON)
    }

    /// Press the sign-up button.
    pub fn submit_sign_up(&self) -> TantearResult<()> {
        self.ctx.tap(&Self::SIGNUP_BUTTON)
    }

    /// Full login flow: email, password, submit.
    pub fn log_in(&self, email: &str, password: &str) -> TantearResult<()> {
        self.enter_email(email)?;
        self.enter_password(password)?;
        self.submit()
    }

    /// Full sign-up flow on the sign-up tab.
    pub fn sign_up(&self, email: &str, password: &str) -> TantearResult<()> {
        self.enter_email(email)?;
        self.enter_password(password)?;
        self.enter_repeat_password(password)?;
        self.submit_sign_up()
    }

    // --- checks ---

    /// Whether the login screen is displayed (email field anchor).
    #[must_use]
    pub fn is_displayed(&self) -> bool {
        self.ctx.is_displayed(&Self::EMAIL_INPUT)
    }

    /// Whether the email validation error is showing.
    #[must_use]
    pub fn is_email_error_displayed(&self) -> bool {
        self.ctx
            .is_displayed_within(&Self::EMAIL_ERROR, self.error_probe_timeout_ms())
    }

    /// Whether the password validation error is showing.
    #[must_use]
    pub fn is_password_error_displayed(&self) -> bool {
        self.ctx
            .is_displayed_within(&Self::PASSWORD_ERROR, self.error_probe_timeout_ms())
    }

    /// Validation errors render fast, so they get the tighter of the error
    /// probe budget and the context's soft budget.
    fn error_probe_timeout_ms(&self) -> u64 {
        ERROR_PROBE_TIMEOUT_MS.min(self.ctx.soft_timeout_ms())
    }

    /// The email validation error text.
    pub fn email_error_message(&self) -> TantearResult<String> {
        self.ctx.read_text(&Self::EMAIL_ERROR)
    }

    /// The password validation error text.
    pub fn password_error_message(&self) -> TantearResult<String> {
        self.ctx.read_text(&Self::PASSWORD_ERROR)
    }

    // --- alert ---

    /// Whether a result alert is showing.
    #[must_use]
    pub fn is_alert_displayed(&self) -> bool {
        self.ctx.is_displayed(&Self::ALERT_TITLE)
    }

    /// The alert title text.
    pub fn alert_title(&self) -> TantearResult<String> {
        self.ctx.read_text(&Self::ALERT_TITLE)
    }

    /// The alert message text.
    pub fn alert_message(&self) -> TantearResult<String> {
        self.ctx.read_text(&Self::ALERT_MESSAGE)
    }

    /// Dismiss the alert via its confirm button.
    pub fn dismiss_alert(&self) -> TantearResult<()> {
        self.ctx.tap(&Self::ALERT_OK_BUTTON)
    }

    /// Whether login succeeded: a visible alert whose title says so.
    #[must_use]
    pub fn is_login_successful(&self) -> bool {
        if !self.is_alert_displayed() {
            return false;
        }
        self.alert_title()
            .map(|title| title.contains("Success"))
            .unwrap_or(false)
    }
}
