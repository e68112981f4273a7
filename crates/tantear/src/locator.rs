//! Locator abstraction: (strategy, selector) pairs for element lookup.
//!
//! A [`Locator`] is an immutable value defined at compile time in a screen
//! accessor's locator table. It carries no identity beyond its pair value;
//! whether it matches anything is only ever observed through the wait engine.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Lookup strategy understood by the remote automation driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Accessibility label (content description on Android)
    AccessibilityId,
    /// Native resource identifier (e.g. `android:id/alertTitle`)
    Id,
    /// XPath over the driver's UI tree dump
    XPath,
    /// Widget class name
    ClassName,
}

impl Strategy {
    /// Wire name of the strategy as the remote protocol spells it.
    #[must_use]
    pub const fn as_wire(&self) -> &'static str {
        match self {
            Self::AccessibilityId => "accessibility id",
            Self::Id => "id",
            Self::XPath => "xpath",
            Self::ClassName => "class name",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A (strategy, selector) pair identifying a UI element.
///
/// Locator tables are declared as associated constants on the screen
/// accessors, so the constructors taking `&'static str` are `const fn`.
/// Runtime-built selectors (e.g. an XPath assembled from test data) go
/// through the owned constructors instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    strategy: Strategy,
    selector: Cow<'static, str>,
}

/// Serialized form of a locator in a driver find request.
#[derive(Debug, Clone, Serialize)]
pub struct WireLocator<'a> {
    /// Strategy wire name
    pub using: &'static str,
    /// Selector string
    pub value: &'a str,
}

impl Locator {
    /// Locator by accessibility label.
    #[must_use]
    pub const fn accessibility(selector: &'static str) -> Self {
        Self {
            strategy: Strategy::AccessibilityId,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Locator by native resource id.
    #[must_use]
    pub const fn id(selector: &'static str) -> Self {
        Self {
            strategy: Strategy::Id,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Locator by XPath.
    #[must_use]
    pub const fn xpath(selector: &'static str) -> Self {
        Self {
            strategy: Strategy::XPath,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Locator by widget class name.
    #[must_use]
    pub const fn class_name(selector: &'static str) -> Self {
        Self {
            strategy: Strategy::ClassName,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Locator with an owned selector built at runtime.
    #[must_use]
    pub fn new(strategy: Strategy, selector: impl Into<String>) -> Self {
        Self {
            strategy,
            selector: Cow::Owned(selector.into()),
        }
    }

    /// The lookup strategy.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The selector string.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The locator as a driver find-request payload.
    #[must_use]
    pub fn wire(&self) -> WireLocator<'_> {
        WireLocator {
            using: self.strategy.as_wire(),
            value: &self.selector,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.selector)
    }
}
