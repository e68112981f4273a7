//! Abstract driver trait for remote UI automation.
//!
//! The suite is a client of a black-box automation service; the only contract
//! consumed is the small set of operations below. The trait is object-safe and
//! synchronous: every call blocks the calling thread until the remote driver
//! responds or its own command timeout fires.
//!
//! The trait is deliberately **not** `Send`/`Sync`. A driver session is not
//! thread-safe by contract, so exclusive single-threaded ownership is enforced
//! by the type system instead of by convention.
//!
//! # Implementations
//!
//! - [`RemoteDriver`](crate::remote::RemoteDriver) - default, speaks the
//!   automation server's HTTP wire protocol
//! - [`SimDriver`](crate::sim::SimDriver) - in-memory simulated app for
//!   hermetic tests

use crate::locator::Locator;
use crate::result::TantearResult;
use serde::{Deserialize, Serialize};

/// Opaque reference to an element the driver has located.
///
/// The id is assigned by the driver and is only meaningful within the session
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-assigned element id
    pub id: String,
}

impl ElementHandle {
    /// Create a handle from a driver-assigned id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Synchronous client contract of the remote automation driver.
pub trait UiDriver {
    /// Locate an element in the current UI tree.
    ///
    /// # Errors
    ///
    /// Returns [`TantearError::NoSuchElement`](crate::TantearError::NoSuchElement)
    /// when nothing matches, or a protocol/session error on transport failure.
    fn find(&self, locator: &Locator) -> TantearResult<ElementHandle>;

    /// Whether the element is rendered with non-zero bounds.
    fn is_displayed(&self, element: &ElementHandle) -> TantearResult<bool>;

    /// Whether the element is enabled for input.
    fn is_enabled(&self, element: &ElementHandle) -> TantearResult<bool>;

    /// Click the element.
    fn click(&self, element: &ElementHandle) -> TantearResult<()>;

    /// Clear the element's current value.
    fn clear(&self, element: &ElementHandle) -> TantearResult<()>;

    /// Type text into the element.
    fn send_keys(&self, element: &ElementHandle, text: &str) -> TantearResult<()>;

    /// Read the element's visible text.
    fn text(&self, element: &ElementHandle) -> TantearResult<String>;

    /// Read a named attribute of the element, if set.
    fn attribute(&self, element: &ElementHandle, name: &str) -> TantearResult<Option<String>>;

    /// Capture a screenshot of the whole screen as PNG bytes.
    fn screenshot(&self) -> TantearResult<Vec<u8>>;

    /// Press the device back control.
    fn back(&self) -> TantearResult<()>;

    /// Dump the current UI tree for debugging.
    fn page_source(&self) -> TantearResult<String>;

    /// End the driver session. Idempotent: a second call is a no-op.
    fn quit(&mut self) -> TantearResult<()>;
}
