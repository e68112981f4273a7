//! Tantear: synchronous mobile UI automation suite.
//!
//! Tantear (Spanish: "to probe, to feel out") is a client library for a
//! remote UI-automation server plus black-box HTTP API checks. Its substance
//! is deliberately thin: locator tables mapping logical elements to platform
//! selectors, an explicit-wait engine replacing fixed sleeps, and per-screen
//! accessors composing the two into named operations.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Scenario (cargo test)                                           │
//! │     │                                                            │
//! │     ▼                                                            │
//! │  Screen accessors ──► Waiter (poll loop) ──► UiDriver (trait)    │
//! │  (locator tables)                              │                 │
//! │                              ┌─────────────────┴──────────┐      │
//! │                              ▼                            ▼      │
//! │                        RemoteDriver                  SimDriver   │
//! │                        (HTTP wire)              (in-memory app)  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every wait, click, and type blocks the calling thread; a driver session
//! is owned by exactly one scenario and torn down by its [`Session`] guard.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Black-box HTTP API checks
pub mod api;
/// Environment-driven suite configuration
pub mod config;
/// Driver trait and element handles
pub mod driver;
/// Locator strategies and tables
pub mod locator;
/// Wire client for the remote automation server
pub mod remote;
/// Outcomes and failure artifacts
pub mod reporter;
/// Error taxonomy
pub mod result;
/// Screen accessors
pub mod screen;
/// Driver session lifecycle
pub mod session;
/// Simulated app driver for hermetic tests
pub mod sim;
/// Explicit-wait engine
pub mod wait;

pub use api::{ApiClient, ApiResponse, RESPONSE_TIME_BUDGET};
pub use config::{init_test_tracing, SuiteConfig};
pub use driver::{ElementHandle, UiDriver};
pub use locator::{Locator, Strategy};
pub use remote::RemoteDriver;
pub use reporter::{FailureReporter, RunReport, ScenarioOutcome, TestStatus};
pub use result::{TantearError, TantearResult};
pub use screen::{current_screen, HomeScreen, LoginScreen, ScreenContext, ScreenKind};
pub use session::{Capabilities, Session};
pub use sim::{SimDriver, SimProbe};
pub use wait::{WaitOptions, WaitPredicate, Waiter};
