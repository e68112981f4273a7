//! Explicit-wait engine: bounded poll loops replacing fixed delays.
//!
//! Every synchronization point in the suite goes through [`Waiter`]: it polls
//! the remote driver at a fixed interval until a predicate holds or the
//! timeout budget elapses. There are no retries beyond the polling loop
//! itself and no backoff.
//!
//! Hard waits propagate [`TantearError::WaitTimeout`] and fail the scenario.
//! Soft existence checks ([`Waiter::is_satisfied_within`]) run the same loop
//! under a short budget and convert timeout into `false`, never raising.

use crate::driver::{ElementHandle, UiDriver};
use crate::locator::Locator;
use crate::result::{TantearError, TantearResult};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Default timeout for hard waits (15 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 15_000;

/// Default timeout for soft existence checks (5 seconds)
pub const SOFT_CHECK_TIMEOUT_MS: u64 = 5_000;

/// Short timeout for probing validation errors and transient popups (3 seconds)
pub const ERROR_PROBE_TIMEOUT_MS: u64 = 3_000;

/// Default polling interval (250ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Condition an element must satisfy for a wait to complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitPredicate {
    /// Element exists in the UI tree
    Present,
    /// Present and rendered with non-zero bounds
    Visible,
    /// Visible and enabled for input
    Interactable,
}

impl WaitPredicate {
    /// Human-readable name for error messages and logs.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::Interactable => "interactable",
        }
    }

    /// Evaluate the predicate against an element the driver already found.
    fn holds<D: UiDriver + ?Sized>(
        &self,
        driver: &D,
        element: &ElementHandle,
    ) -> TantearResult<bool> {
        match self {
            Self::Present => Ok(true),
            Self::Visible => driver.is_displayed(element),
            Self::Interactable => {
                Ok(driver.is_displayed(element)? && driver.is_enabled(element)?)
            }
        }
    }
}

impl std::fmt::Display for WaitPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Poll-based synchronizer over a [`UiDriver`].
#[derive(Debug, Clone, Default)]
pub struct Waiter {
    options: WaitOptions,
}

impl Waiter {
    /// Create a waiter with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a waiter with custom options.
    #[must_use]
    pub fn with_options(options: WaitOptions) -> Self {
        Self { options }
    }

    /// The waiter's default options.
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Wait under the default budget until the locator satisfies the
    /// predicate, returning the located element.
    ///
    /// # Errors
    ///
    /// [`TantearError::WaitTimeout`] when the predicate never holds within
    /// the budget; transport and session errors propagate immediately.
    pub fn wait_for<D: UiDriver + ?Sized>(
        &self,
        driver: &D,
        locator: &Locator,
        predicate: WaitPredicate,
    ) -> TantearResult<ElementHandle> {
        self.wait_with(driver, locator, predicate, &self.options)
    }

    /// Wait under an explicit budget.
    ///
    /// The predicate is evaluated at least once, so a zero timeout degrades
    /// to a single probe. Timeout is declared no earlier than the budget and
    /// no later than one poll interval past it.
    ///
    /// # Errors
    ///
    /// See [`Waiter::wait_for`].
    pub fn wait_with<D: UiDriver + ?Sized>(
        &self,
        driver: &D,
        locator: &Locator,
        predicate: WaitPredicate,
        options: &WaitOptions,
    ) -> TantearResult<ElementHandle> {
        let start = Instant::now();
        let timeout = options.timeout();
        let poll_interval = options.poll_interval();

        loop {
            if let Some(element) = Self::probe(driver, locator, predicate)? {
                trace!(%locator, %predicate, elapsed = ?start.elapsed(), "wait satisfied");
                return Ok(element);
            }
            if start.elapsed() >= timeout {
                break;
            }
            std::thread::sleep(poll_interval);
        }

        debug!(%locator, %predicate, waited = ?start.elapsed(), "wait timed out");
        Err(TantearError::WaitTimeout {
            locator: locator.to_string(),
            waited: start.elapsed(),
        })
    }

    /// Soft existence check: `true` iff the hard wait would have succeeded
    /// within the given budget. Never raises: timeout and absence are the
    /// expected negative outcome, and driver errors are logged and reported
    /// as `false`.
    pub fn is_satisfied_within<D: UiDriver + ?Sized>(
        &self,
        driver: &D,
        locator: &Locator,
        predicate: WaitPredicate,
        timeout_ms: u64,
    ) -> bool {
        let options = WaitOptions {
            timeout_ms,
            poll_interval_ms: self.options.poll_interval_ms,
        };
        match self.wait_with(driver, locator, predicate, &options) {
            Ok(_) => true,
            Err(err) if err.is_absence() => false,
            Err(err) => {
                debug!(%locator, %err, "soft check failed on driver error");
                false
            }
        }
    }

    /// One probe of the tree: `Ok(None)` while the element is absent or the
    /// predicate does not hold yet, `Ok(Some)` once it does.
    fn probe<D: UiDriver + ?Sized>(
        driver: &D,
        locator: &Locator,
        predicate: WaitPredicate,
    ) -> TantearResult<Option<ElementHandle>> {
        let element = match driver.find(locator) {
            Ok(element) => element,
            Err(TantearError::NoSuchElement { .. }) => return Ok(None),
            Err(err) => return Err(err),
        };
        // The element can disappear between find and the predicate probe;
        // that round counts as "not yet", same as absence.
        match predicate.holds(driver, &element) {
            Ok(true) => Ok(Some(element)),
            Ok(false) => Ok(None),
            Err(TantearError::NoSuchElement { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Instant;

    /// Driver whose single element appears (and becomes interactable) only
    /// after a configured delay.
    struct DelayedDriver {
        armed_at: Instant,
        appear_after: Duration,
        finds: Cell<u32>,
    }

    impl DelayedDriver {
        fn appearing_after(delay_ms: u64) -> Self {
            Self {
                armed_at: Instant::now(),
                appear_after: Duration::from_millis(delay_ms),
                finds: Cell::new(0),
            }
        }

        fn visible(&self) -> bool {
            self.armed_at.elapsed() >= self.appear_after
        }
    }

    impl UiDriver for DelayedDriver {
        fn find(&self, locator: &Locator) -> TantearResult<ElementHandle> {
            self.finds.set(self.finds.get() + 1);
            if self.visible() {
                Ok(ElementHandle::new("delayed"))
            } else {
                Err(TantearError::NoSuchElement {
                    locator: locator.to_string(),
                })
            }
        }

        fn is_displayed(&self, _element: &ElementHandle) -> TantearResult<bool> {
            Ok(self.visible())
        }

        fn is_enabled(&self, _element: &ElementHandle) -> TantearResult<bool> {
            Ok(true)
        }

        fn click(&self, _element: &ElementHandle) -> TantearResult<()> {
            Ok(())
        }

        fn clear(&self, _element: &ElementHandle) -> TantearResult<()> {
            Ok(())
        }

        fn send_keys(&self, _element: &ElementHandle, _text: &str) -> TantearResult<()> {
            Ok(())
        }

        fn text(&self, _element: &ElementHandle) -> TantearResult<String> {
            Ok(String::new())
        }

        fn attribute(
            &self,
            _element: &ElementHandle,
            _name: &str,
        ) -> TantearResult<Option<String>> {
            Ok(None)
        }

        fn screenshot(&self) -> TantearResult<Vec<u8>> {
            Ok(vec![0x89, 0x50, 0x4E, 0x47])
        }

        fn back(&self) -> TantearResult<()> {
            Ok(())
        }

        fn page_source(&self) -> TantearResult<String> {
            Ok("<hierarchy/>".to_string())
        }

        fn quit(&mut self) -> TantearResult<()> {
            Ok(())
        }
    }

    const TARGET: Locator = Locator::accessibility("delayed");

    mod predicate_tests {
        use super::*;

        #[test]
        fn test_describe() {
            assert_eq!(WaitPredicate::Present.describe(), "present");
            assert_eq!(WaitPredicate::Visible.describe(), "visible");
            assert_eq!(WaitPredicate::Interactable.describe(), "interactable");
        }

        #[test]
        fn test_display_matches_describe() {
            assert_eq!(format!("{}", WaitPredicate::Visible), "visible");
        }
    }

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_builder_chain() {
            let opts = WaitOptions::new().with_timeout(800).with_poll_interval(20);
            assert_eq!(opts.timeout(), Duration::from_millis(800));
            assert_eq!(opts.poll_interval(), Duration::from_millis(20));
        }
    }

    mod waiter_tests {
        use super::*;

        #[test]
        fn test_immediate_success_does_not_sleep() {
            let driver = DelayedDriver::appearing_after(0);
            let start = Instant::now();
            let element = Waiter::new()
                .wait_for(&driver, &TARGET, WaitPredicate::Visible)
                .unwrap();
            assert_eq!(element.id, "delayed");
            assert!(start.elapsed() < Duration::from_millis(100));
            assert_eq!(driver.finds.get(), 1);
        }

        #[test]
        fn test_late_element_within_budget_succeeds() {
            let driver = DelayedDriver::appearing_after(120);
            let options = WaitOptions::new().with_timeout(2_000).with_poll_interval(20);
            let result =
                Waiter::new().wait_with(&driver, &TARGET, WaitPredicate::Interactable, &options);
            assert!(result.is_ok());
            assert!(driver.finds.get() > 1, "should have polled more than once");
        }

        #[test]
        fn test_absent_element_times_out_near_budget() {
            let driver = DelayedDriver::appearing_after(60_000);
            let options = WaitOptions::new().with_timeout(200).with_poll_interval(20);
            let start = Instant::now();
            let result = Waiter::new().wait_with(&driver, &TARGET, WaitPredicate::Present, &options);
            let elapsed = start.elapsed();

            match result {
                Err(TantearError::WaitTimeout { locator, waited }) => {
                    assert!(locator.contains("delayed"));
                    assert!(waited >= Duration::from_millis(200));
                }
                other => panic!("expected WaitTimeout, got {other:?}"),
            }
            // expiry plus at most one poll interval, with scheduling slack
            assert!(elapsed >= Duration::from_millis(200));
            assert!(elapsed < Duration::from_millis(700));
        }

        #[test]
        fn test_zero_timeout_probes_once() {
            let driver = DelayedDriver::appearing_after(0);
            let options = WaitOptions::new().with_timeout(0);
            let result =
                Waiter::new().wait_with(&driver, &TARGET, WaitPredicate::Visible, &options);
            assert!(result.is_ok());
            assert_eq!(driver.finds.get(), 1);
        }

        #[test]
        fn test_soft_check_true_when_wait_would_succeed() {
            let driver = DelayedDriver::appearing_after(50);
            let waiter = Waiter::with_options(WaitOptions::new().with_poll_interval(20));
            assert!(waiter.is_satisfied_within(&driver, &TARGET, WaitPredicate::Visible, 1_000));
        }

        #[test]
        fn test_soft_check_false_never_raises() {
            let driver = DelayedDriver::appearing_after(60_000);
            let waiter = Waiter::with_options(WaitOptions::new().with_poll_interval(20));
            assert!(!waiter.is_satisfied_within(&driver, &TARGET, WaitPredicate::Present, 100));
        }
    }
}
