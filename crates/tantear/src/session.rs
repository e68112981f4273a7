//! Driver session lifecycle: capabilities and the owning guard.
//!
//! A scenario acquires exactly one driver session and the guard guarantees
//! teardown on both success and failure paths. Dropping the guard quits the
//! session; a teardown failure is logged, never raised, so it cannot mask the
//! scenario's own outcome.

use crate::driver::UiDriver;
use crate::result::TantearResult;
use serde::Serialize;
use tracing::{debug, warn};

/// Desired session capabilities sent to the automation server.
///
/// Field names follow the W3C vendor-prefixed spelling the server expects.
#[derive(Debug, Clone, Serialize)]
pub struct Capabilities {
    /// Target platform, e.g. "Android"
    #[serde(rename = "platformName")]
    pub platform_name: String,
    /// Automation backend, e.g. "UiAutomator2"
    #[serde(rename = "appium:automationName")]
    pub automation_name: String,
    /// OS version of the device under test
    #[serde(rename = "appium:platformVersion", skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,
    /// Device identifier
    #[serde(rename = "appium:deviceName", skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    /// Path to the application binary to install
    #[serde(rename = "appium:app", skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    /// Application package to launch
    #[serde(rename = "appium:appPackage", skip_serializing_if = "Option::is_none")]
    pub app_package: Option<String>,
    /// Activity to launch within the package
    #[serde(rename = "appium:appActivity", skip_serializing_if = "Option::is_none")]
    pub app_activity: Option<String>,
    /// Keep app data between sessions
    #[serde(rename = "appium:noReset")]
    pub no_reset: bool,
    /// Uninstall the app before the session
    #[serde(rename = "appium:fullReset")]
    pub full_reset: bool,
    /// Seconds the server keeps an idle session alive
    #[serde(rename = "appium:newCommandTimeout")]
    pub new_command_timeout_secs: u32,
    /// Grant runtime permissions up front
    #[serde(rename = "appium:autoGrantPermissions")]
    pub auto_grant_permissions: bool,
}

impl Capabilities {
    /// Android defaults for the suite: UiAutomator2, clean-ish state, granted
    /// permissions, 300s idle budget.
    #[must_use]
    pub fn android() -> Self {
        Self {
            platform_name: "Android".to_string(),
            automation_name: "UiAutomator2".to_string(),
            platform_version: None,
            device_name: None,
            app: None,
            app_package: None,
            app_activity: None,
            no_reset: false,
            full_reset: false,
            new_command_timeout_secs: 300,
            auto_grant_permissions: true,
        }
    }

    /// Set the device OS version.
    #[must_use]
    pub fn with_platform_version(mut self, version: impl Into<String>) -> Self {
        self.platform_version = Some(version.into());
        self
    }

    /// Set the device identifier.
    #[must_use]
    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    /// Set the application binary path.
    #[must_use]
    pub fn with_app(mut self, path: impl Into<String>) -> Self {
        self.app = Some(path.into());
        self
    }

    /// Set the package and activity to launch.
    #[must_use]
    pub fn with_app_entry(
        mut self,
        package: impl Into<String>,
        activity: impl Into<String>,
    ) -> Self {
        self.app_package = Some(package.into());
        self.app_activity = Some(activity.into());
        self
    }

    /// Keep app data between sessions.
    #[must_use]
    pub const fn with_no_reset(mut self, no_reset: bool) -> Self {
        self.no_reset = no_reset;
        self
    }
}

/// Owning guard for a driver session.
///
/// Screens borrow the driver for the scenario's lifetime; the guard quits the
/// session when dropped. An explicit [`Session::quit`] surfaces the teardown
/// result to callers that want it.
#[derive(Debug)]
pub struct Session<D: UiDriver> {
    driver: Option<D>,
}

impl<D: UiDriver> Session<D> {
    /// Wrap an already-created driver in a teardown guard.
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self {
            driver: Some(driver),
        }
    }

    /// Borrow the driver.
    ///
    /// # Panics
    ///
    /// Panics if called after [`Session::quit`]; the guard exists precisely
    /// so that cannot happen on normal scenario paths.
    #[must_use]
    pub fn driver(&self) -> &D {
        self.driver.as_ref().expect("session already quit")
    }

    /// End the session now, surfacing the teardown result.
    ///
    /// # Errors
    ///
    /// Returns the driver's quit failure, if any.
    pub fn quit(mut self) -> TantearResult<()> {
        match self.driver.take() {
            Some(mut driver) => driver.quit(),
            None => Ok(()),
        }
    }
}

impl<D: UiDriver> Drop for Session<D> {
    fn drop(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            debug!("tearing down driver session");
            if let Err(err) = driver.quit() {
                warn!(%err, "driver session teardown failed");
            }
        }
    }
}
