//! Scenario outcomes and failure artifacts.
//!
//! Outcomes are pass/fail/skip per scenario and live only for the duration of
//! the run report. Failure screenshots are strictly best-effort: a capture
//! error is logged and swallowed so it can never mask the assertion that
//! actually failed.

use crate::driver::UiDriver;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Scenario result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    /// Scenario passed
    Passed,
    /// Scenario failed
    Failed,
    /// Scenario was skipped
    Skipped,
}

impl TestStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Outcome of a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Scenario name
    pub name: String,
    /// Result status
    pub status: TestStatus,
    /// Scenario duration
    pub duration: Duration,
    /// Error message if failed
    pub error: Option<String>,
    /// Failure screenshot path, if one was captured
    pub artifact: Option<PathBuf>,
}

impl ScenarioOutcome {
    /// A passing outcome.
    #[must_use]
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            duration,
            error: None,
            artifact: None,
        }
    }

    /// A failing outcome.
    #[must_use]
    pub fn failed(name: impl Into<String>, duration: Duration, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            duration,
            error: Some(error.into()),
            artifact: None,
        }
    }

    /// A skipped outcome.
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skipped,
            duration: Duration::ZERO,
            error: None,
            artifact: None,
        }
    }

    /// Attach a failure artifact path.
    #[must_use]
    pub fn with_artifact(mut self, path: PathBuf) -> Self {
        self.artifact = Some(path);
        self
    }
}

/// Aggregated outcomes of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// All scenario outcomes in execution order
    pub outcomes: Vec<ScenarioOutcome>,
}

impl RunReport {
    /// Empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome.
    pub fn record(&mut self, outcome: ScenarioOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of passed scenarios.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_passed()).count()
    }

    /// Number of failed scenarios.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_failed()).count()
    }

    /// Whether every non-skipped scenario passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// One-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} scenarios: {} passed, {} failed, {} skipped",
            self.outcomes.len(),
            self.passed(),
            self.failed(),
            self.outcomes.len() - self.passed() - self.failed(),
        )
    }
}

/// Best-effort failure screenshot writer.
///
/// Artifacts are named `FAILURE_<test>_<timestamp>.png`. Parameterized test
/// names are sanitized so brackets and separators cannot escape the file
/// name.
#[derive(Debug, Clone)]
pub struct FailureReporter {
    dir: PathBuf,
}

impl FailureReporter {
    /// Reporter writing into the given directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The artifact directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Capture a failure screenshot from the driver.
    ///
    /// Returns the artifact path on success. Every failure mode (directory
    /// creation, driver capture, file write) is logged and turned into
    /// `None`; this never raises.
    pub fn capture_failure<D: UiDriver + ?Sized>(
        &self,
        driver: &D,
        test_name: &str,
    ) -> Option<PathBuf> {
        let path = self.artifact_path(test_name);
        match self.try_capture(driver, &path) {
            Ok(()) => {
                info!(path = %path.display(), "failure screenshot saved");
                Some(path)
            }
            Err(err) => {
                warn!(%err, test_name, "failed to capture failure screenshot");
                None
            }
        }
    }

    fn try_capture<D: UiDriver + ?Sized>(
        &self,
        driver: &D,
        path: &Path,
    ) -> crate::result::TantearResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let png = driver.screenshot()?;
        std::fs::write(path, png)?;
        Ok(())
    }

    /// The artifact path a failure of `test_name` would be written to,
    /// stamped with the current local time.
    #[must_use]
    pub fn artifact_path(&self, test_name: &str) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        self.dir
            .join(format!("FAILURE_{}_{timestamp}.png", sanitize(test_name)))
    }
}

/// Replace anything that is not alphanumeric, `-`, or `_` (bracketed test
/// parameters in particular) with `_`.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimDriver;
    use tempfile::TempDir;

    mod status_tests {
        use super::*;

        #[test]
        fn test_status_predicates() {
            assert!(TestStatus::Passed.is_passed());
            assert!(!TestStatus::Passed.is_failed());
            assert!(TestStatus::Failed.is_failed());
            assert!(!TestStatus::Skipped.is_passed());
        }
    }

    mod outcome_tests {
        use super::*;

        #[test]
        fn test_passed_outcome() {
            let outcome = ScenarioOutcome::passed("login_valid", Duration::from_secs(2));
            assert!(outcome.status.is_passed());
            assert!(outcome.error.is_none());
        }

        #[test]
        fn test_failed_outcome_with_artifact() {
            let outcome =
                ScenarioOutcome::failed("login_invalid", Duration::from_secs(1), "no alert")
                    .with_artifact(PathBuf::from("shots/FAILURE_login_invalid_x.png"));
            assert!(outcome.status.is_failed());
            assert_eq!(outcome.error.as_deref(), Some("no alert"));
            assert!(outcome.artifact.is_some());
        }
    }

    mod report_tests {
        use super::*;

        #[test]
        fn test_counts_and_summary() {
            let mut report = RunReport::new();
            report.record(ScenarioOutcome::passed("a", Duration::ZERO));
            report.record(ScenarioOutcome::failed("b", Duration::ZERO, "boom"));
            report.record(ScenarioOutcome::skipped("c"));

            assert_eq!(report.passed(), 1);
            assert_eq!(report.failed(), 1);
            assert!(!report.all_passed());
            assert_eq!(report.summary(), "3 scenarios: 1 passed, 1 failed, 1 skipped");
        }

        #[test]
        fn test_report_round_trips_as_json() {
            let mut report = RunReport::new();
            report.record(ScenarioOutcome::passed("a", Duration::from_millis(120)));
            let json = serde_json::to_string(&report).unwrap();
            let back: RunReport = serde_json::from_str(&json).unwrap();
            assert_eq!(back.outcomes.len(), 1);
            assert_eq!(back.outcomes[0].name, "a");
        }
    }

    mod failure_reporter_tests {
        use super::*;

        #[test]
        fn test_sanitize_brackets() {
            assert_eq!(sanitize("test_login[case 1]"), "test_login_case_1_");
            assert_eq!(sanitize("plain_name"), "plain_name");
        }

        #[test]
        fn test_artifact_naming_scheme() {
            let reporter = FailureReporter::new("shots");
            let path = reporter.artifact_path("test_login[0]");
            let file = path.file_name().unwrap().to_string_lossy().into_owned();
            assert!(file.starts_with("FAILURE_test_login_0__"));
            assert!(file.ends_with(".png"));
        }

        #[test]
        fn test_capture_writes_png() {
            let dir = TempDir::new().unwrap();
            let reporter = FailureReporter::new(dir.path());
            let driver = SimDriver::launch();

            let path = reporter.capture_failure(&driver, "test_something").unwrap();
            let bytes = std::fs::read(&path).unwrap();
            assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
        }

        #[test]
        fn test_capture_on_dead_session_is_swallowed() {
            let dir = TempDir::new().unwrap();
            let reporter = FailureReporter::new(dir.path());
            let mut driver = SimDriver::launch();
            driver.quit().unwrap();

            assert!(reporter.capture_failure(&driver, "test_something").is_none());
        }
    }
}
