//! Suite configuration from the environment.
//!
//! The automation server URL, device identity, and app binary are externally
//! supplied; nothing in the core depends on their concrete values. Every
//! variable has a default good enough for a local server and emulator.

use crate::session::Capabilities;
use std::path::PathBuf;

/// Automation server URL
pub const ENV_SERVER_URL: &str = "TANTEAR_SERVER_URL";
/// Device OS version
pub const ENV_PLATFORM_VERSION: &str = "TANTEAR_PLATFORM_VERSION";
/// Device identifier
pub const ENV_DEVICE_NAME: &str = "TANTEAR_DEVICE_NAME";
/// Path to the app binary
pub const ENV_APP: &str = "TANTEAR_APP";
/// App package to launch
pub const ENV_APP_PACKAGE: &str = "TANTEAR_APP_PACKAGE";
/// Activity to launch
pub const ENV_APP_ACTIVITY: &str = "TANTEAR_APP_ACTIVITY";
/// Directory for failure artifacts
pub const ENV_ARTIFACT_DIR: &str = "TANTEAR_ARTIFACT_DIR";

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:4723";
const DEFAULT_APP_PACKAGE: &str = "com.wdiodemoapp";
const DEFAULT_APP_ACTIVITY: &str = "com.wdiodemoapp.MainActivity";
const DEFAULT_ARTIFACT_DIR: &str = "target/tantear/screenshots";

/// Resolved suite configuration.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Automation server base URL
    pub server_url: String,
    /// Session capabilities derived from the environment
    pub capabilities: Capabilities,
    /// Where failure screenshots are written
    pub artifact_dir: PathBuf,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            capabilities: Capabilities::android()
                .with_app_entry(DEFAULT_APP_PACKAGE, DEFAULT_APP_ACTIVITY),
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
        }
    }
}

impl SuiteConfig {
    /// Build the configuration from `TANTEAR_*` environment variables,
    /// falling back to defaults for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        let mut capabilities = Capabilities::android().with_app_entry(
            env_or(ENV_APP_PACKAGE, DEFAULT_APP_PACKAGE),
            env_or(ENV_APP_ACTIVITY, DEFAULT_APP_ACTIVITY),
        );
        if let Ok(version) = std::env::var(ENV_PLATFORM_VERSION) {
            capabilities = capabilities.with_platform_version(version);
        }
        if let Ok(device) = std::env::var(ENV_DEVICE_NAME) {
            capabilities = capabilities.with_device_name(device);
        }
        if let Ok(app) = std::env::var(ENV_APP) {
            capabilities = capabilities.with_app(app);
        }

        Self {
            server_url: env_or(ENV_SERVER_URL, DEFAULT_SERVER_URL),
            capabilities,
            artifact_dir: PathBuf::from(env_or(ENV_ARTIFACT_DIR, DEFAULT_ARTIFACT_DIR)),
        }
    }

    /// Override the server URL.
    #[must_use]
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Override the artifact directory.
    #[must_use]
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    /// Override the capabilities wholesale.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Install a `tracing` subscriber for test output, honoring `RUST_LOG`.
///
/// Safe to call from every test; only the first call wins.
pub fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
