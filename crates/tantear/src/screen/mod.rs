//! Screen accessors: per-screen operations over a shared wait-backed helper.
//!
//! Each screen bundles a locator table and named operations. All of them
//! compose the same [`ScreenContext`], a driver borrow plus a [`Waiter`],
//! instead of inheriting from a base page. Screens are never modeled as
//! explicit states; "which screen am I on" is inferred by probing anchor
//! elements in a fixed priority order, first match wins.

mod home;
mod login;

pub use home::HomeScreen;
pub use login::LoginScreen;

use crate::driver::UiDriver;
use crate::locator::Locator;
use crate::result::TantearResult;
use crate::wait::{WaitPredicate, Waiter, SOFT_CHECK_TIMEOUT_MS};

/// Identity of the screen currently displayed, as far as anchors can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    /// Home screen (logo anchor)
    Home,
    /// Forms screen (text input anchor)
    Forms,
    /// Webview screen (URL field anchor)
    Webview,
    /// No anchor matched
    Unknown,
}

impl ScreenKind {
    /// Probe order for screen inference. First visible anchor wins.
    pub const PRIORITY: [Self; 3] = [Self::Home, Self::Forms, Self::Webview];

    /// Per-anchor probe budget during inference.
    pub const PROBE_TIMEOUT_MS: u64 = 2_000;

    /// The anchor element identifying this screen.
    #[must_use]
    pub const fn anchor(self) -> Option<Locator> {
        match self {
            Self::Home => Some(Locator::accessibility("Home-screen")),
            Self::Forms => Some(Locator::accessibility("text-input")),
            Self::Webview => Some(Locator::accessibility("URL input field")),
            Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Home => "Home",
            Self::Forms => "Forms",
            Self::Webview => "Webview",
            Self::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Shared helper every screen accessor composes: one driver borrow, one
/// waiter, and the wait-backed interaction primitives.
#[derive(Clone)]
pub struct ScreenContext<'d> {
    driver: &'d dyn UiDriver,
    waiter: Waiter,
    soft_timeout_ms: u64,
}

impl std::fmt::Debug for ScreenContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenContext")
            .field("waiter", &self.waiter)
            .field("soft_timeout_ms", &self.soft_timeout_ms)
            .finish_non_exhaustive()
    }
}

impl<'d> ScreenContext<'d> {
    /// Create a context with the default waiter.
    #[must_use]
    pub fn new(driver: &'d dyn UiDriver) -> Self {
        Self {
            driver,
            waiter: Waiter::new(),
            soft_timeout_ms: SOFT_CHECK_TIMEOUT_MS,
        }
    }

    /// Create a context with a custom waiter (e.g. tightened budgets in
    /// simulator-backed tests).
    #[must_use]
    pub fn with_waiter(driver: &'d dyn UiDriver, waiter: Waiter) -> Self {
        Self {
            driver,
            waiter,
            soft_timeout_ms: SOFT_CHECK_TIMEOUT_MS,
        }
    }

    /// Shrink or grow the soft-check budget. Negative probes block for the
    /// whole budget, so simulator-backed tests tighten this.
    #[must_use]
    pub const fn with_soft_timeout(mut self, timeout_ms: u64) -> Self {
        self.soft_timeout_ms = timeout_ms;
        self
    }

    /// The soft-check budget in milliseconds.
    #[must_use]
    pub const fn soft_timeout_ms(&self) -> u64 {
        self.soft_timeout_ms
    }

    /// The underlying driver.
    #[must_use]
    pub fn driver(&self) -> &'d dyn UiDriver {
        self.driver
    }

    /// Wait until the control is interactable, then click it.
    pub fn tap(&self, locator: &Locator) -> TantearResult<()> {
        let element = self
            .waiter
            .wait_for(self.driver, locator, WaitPredicate::Interactable)?;
        self.driver.click(&element)
    }

    /// Wait until the field is visible, then clear it and type the text.
    pub fn type_text(&self, locator: &Locator, text: &str) -> TantearResult<()> {
        let element = self
            .waiter
            .wait_for(self.driver, locator, WaitPredicate::Visible)?;
        self.driver.clear(&element)?;
        self.driver.send_keys(&element, text)
    }

    /// Wait until the element is visible, then read its text.
    pub fn read_text(&self, locator: &Locator) -> TantearResult<String> {
        let element = self
            .waiter
            .wait_for(self.driver, locator, WaitPredicate::Visible)?;
        self.driver.text(&element)
    }

    /// Wait until the element is visible, then read an attribute.
    pub fn attribute(&self, locator: &Locator, name: &str) -> TantearResult<Option<String>> {
        let element = self
            .waiter
            .wait_for(self.driver, locator, WaitPredicate::Visible)?;
        self.driver.attribute(&element, name)
    }

    /// Soft visibility check under the context's short budget. Never raises.
    #[must_use]
    pub fn is_displayed(&self, locator: &Locator) -> bool {
        self.is_displayed_within(locator, self.soft_timeout_ms)
    }

    /// Soft visibility check under an explicit budget. Never raises.
    #[must_use]
    pub fn is_displayed_within(&self, locator: &Locator, timeout_ms: u64) -> bool {
        self.waiter
            .is_satisfied_within(self.driver, locator, WaitPredicate::Visible, timeout_ms)
    }

    /// Soft presence check (in the tree, visible or not). Never raises.
    #[must_use]
    pub fn is_present(&self, locator: &Locator) -> bool {
        self.waiter.is_satisfied_within(
            self.driver,
            locator,
            WaitPredicate::Present,
            self.soft_timeout_ms,
        )
    }

    /// Capture a screenshot of the current screen.
    pub fn screenshot(&self) -> TantearResult<Vec<u8>> {
        self.driver.screenshot()
    }

    /// Press the device back control.
    pub fn back(&self) -> TantearResult<()> {
        self.driver.back()
    }

    /// Dump the UI tree for debugging.
    pub fn page_source(&self) -> TantearResult<String> {
        self.driver.page_source()
    }
}

/// Infer the current screen by probing anchors in priority order.
#[must_use]
pub fn current_screen(ctx: &ScreenContext<'_>) -> ScreenKind {
    current_screen_with(ctx, ScreenKind::PROBE_TIMEOUT_MS)
}

/// Screen inference with an explicit per-anchor probe budget.
#[must_use]
pub fn current_screen_with(ctx: &ScreenContext<'_>, probe_timeout_ms: u64) -> ScreenKind {
    for kind in ScreenKind::PRIORITY {
        if let Some(anchor) = kind.anchor() {
            if ctx.is_displayed_within(&anchor, probe_timeout_ms) {
                return kind;
            }
        }
    }
    ScreenKind::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimDriver;

    fn fast_waiter() -> Waiter {
        Waiter::with_options(
            crate::wait::WaitOptions::new()
                .with_timeout(1_000)
                .with_poll_interval(10),
        )
    }

    #[test]
    fn test_screen_kind_display() {
        assert_eq!(ScreenKind::Home.to_string(), "Home");
        assert_eq!(ScreenKind::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_anchor_table() {
        assert!(ScreenKind::Home.anchor().is_some());
        assert!(ScreenKind::Unknown.anchor().is_none());
    }

    #[test]
    fn test_context_primitives_on_simulator() {
        let driver = SimDriver::launch();
        let ctx = ScreenContext::with_waiter(&driver, fast_waiter());

        assert!(ctx.is_displayed(&Locator::accessibility("Home")));
        ctx.tap(&Locator::accessibility("Forms")).unwrap();
        ctx.type_text(&Locator::accessibility("text-input"), "hola")
            .unwrap();
        assert_eq!(
            ctx.read_text(&Locator::accessibility("text-input")).unwrap(),
            "hola"
        );
    }

    #[test]
    fn test_current_screen_priority_order() {
        let driver = SimDriver::launch();
        let ctx = ScreenContext::with_waiter(&driver, fast_waiter());
        assert_eq!(current_screen_with(&ctx, 100), ScreenKind::Home);

        ctx.tap(&Locator::accessibility("Forms")).unwrap();
        assert_eq!(current_screen_with(&ctx, 100), ScreenKind::Forms);

        ctx.tap(&Locator::accessibility("Webview")).unwrap();
        assert_eq!(current_screen_with(&ctx, 100), ScreenKind::Webview);

        ctx.tap(&Locator::accessibility("Swipe")).unwrap();
        assert_eq!(current_screen_with(&ctx, 100), ScreenKind::Unknown);
    }
}
