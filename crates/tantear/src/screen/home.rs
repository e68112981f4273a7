//! Home screen accessor: bottom navigation plus the forms and webview
//! elements reached from it.

use super::{current_screen, current_screen_with, ScreenContext, ScreenKind};
use crate::driver::UiDriver;
use crate::locator::Locator;
use crate::result::TantearResult;
use crate::wait::Waiter;

/// Accessor for the home screen and the bottom navigation bar.
#[derive(Debug, Clone)]
pub struct HomeScreen<'d> {
    ctx: ScreenContext<'d>,
}

impl<'d> HomeScreen<'d> {
    // Bottom navigation bar
    /// Home tab
    pub const HOME_NAV: Locator = Locator::accessibility("Home");
    /// Webview tab
    pub const WEBVIEW_NAV: Locator = Locator::accessibility("Webview");
    /// Login tab
    pub const LOGIN_NAV: Locator = Locator::accessibility("Login");
    /// Forms tab
    pub const FORMS_NAV: Locator = Locator::accessibility("Forms");
    /// Swipe tab
    pub const SWIPE_NAV: Locator = Locator::accessibility("Swipe");
    /// Drag tab
    pub const DRAG_NAV: Locator = Locator::accessibility("Drag");

    // Home screen
    /// Logo anchoring the home screen
    pub const HOME_LOGO: Locator = Locator::accessibility("Home-screen");

    // Forms screen
    /// Free-text input on the forms screen
    pub const FORMS_INPUT: Locator = Locator::accessibility("text-input");
    /// Toggle switch on the forms screen
    pub const FORMS_SWITCH: Locator = Locator::accessibility("switch");
    /// Dropdown on the forms screen
    pub const FORMS_DROPDOWN: Locator = Locator::accessibility("Dropdown");

    // Webview screen
    /// URL field anchoring the webview screen
    pub const WEBVIEW_URL_INPUT: Locator = Locator::accessibility("URL input field");

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

    // --- navigation ---

    /// Open the home screen from the navigation bar.
    pub fn open_home(&self) -> TantearResult<()> {
        self.ctx.tap(&Self::HOME_NAV)
    }

    /// Open the login screen from the navigation bar.
    pub fn open_login(&self) -> TantearResult<()> {
        self.ctx.tap(&Self::LOGIN_NAV)
    }

    /// Open the forms screen from the navigation bar.
    pub fn open_forms(&self) -> TantearResult<()> {
        self.ctx.tap(&Self::FORMS_NAV)
    }

    /// Open the webview screen from the navigation bar.
    pub fn open_webview(&self) -> TantearResult<()> {
        self.ctx.tap(&Self::WEBVIEW_NAV)
    }

    /// Open the swipe screen from the navigation bar.
    pub fn open_swipe(&self) -> TantearResult<()> {
        self.ctx.tap(&Self::SWIPE_NAV)
    }

    /// Open the drag screen from the navigation bar.
    pub fn open_drag(&self) -> TantearResult<()> {
        self.ctx.tap(&Self::DRAG_NAV)
    }

    // --- checks ---

    /// Whether the home screen is displayed.
    #[must_use]
    pub fn is_home_screen_displayed(&self) -> bool {
        self.ctx.is_displayed(&Self::HOME_LOGO)
    }

    /// Whether the forms screen is displayed.
    #[must_use]
    pub fn is_forms_screen_displayed(&self) -> bool {
        self.ctx.is_displayed(&Self::FORMS_INPUT)
    }

    /// Whether the webview screen is displayed.
    #[must_use]
    pub fn is_webview_screen_displayed(&self) -> bool {
        self.ctx.is_displayed(&Self::WEBVIEW_URL_INPUT)
    }

    /// Whether the bottom navigation bar is visible.
    #[must_use]
    pub fn is_nav_bar_visible(&self) -> bool {
        self.ctx.is_displayed(&Self::HOME_NAV) && self.ctx.is_displayed(&Self::LOGIN_NAV)
    }

    /// Whether the app launched into a usable state.
    #[must_use]
    pub fn is_app_launched(&self) -> bool {
        self.is_nav_bar_visible()
    }

    /// Which screen is currently displayed, by anchor priority.
    #[must_use]
    pub fn current_screen(&self) -> ScreenKind {
        current_screen(&self.ctx)
    }

    /// Screen inference with an explicit probe budget.
    #[must_use]
    pub fn current_screen_within(&self, probe_timeout_ms: u64) -> ScreenKind {
        current_screen_with(&self.ctx, probe_timeout_ms)
    }

    // --- forms screen actions ---

    /// Type into the forms input field.
    pub fn enter_forms_text(&self, text: &str) -> TantearResult<()> {
        self.ctx.type_text(&Self::FORMS_INPUT, text)
    }

    /// Current text of the forms input field.
    pub fn forms_input_text(&self) -> TantearResult<String> {
        self.ctx.read_text(&Self::FORMS_INPUT)
    }

    /// Toggle the switch on the forms screen.
    pub fn toggle_switch(&self) -> TantearResult<()> {
        self.ctx.tap(&Self::FORMS_SWITCH)
    }

    /// Whether the forms switch is on.
    pub fn is_switch_checked(&self) -> TantearResult<bool> {
        let value = self.ctx.attribute(&Self::FORMS_SWITCH, "checked")?;
        Ok(value.as_deref() == Some("true"))
    }
}
