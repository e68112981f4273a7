//! Blocking HTTP client for the remote automation server.
//!
//! Speaks the W3C-style wire protocol the automation server exposes: JSON
//! request/response pairs under `/session/{id}`, every response wrapping its
//! payload in a `value` field. Only the operations the suite consumes are
//! implemented; the protocol itself is owned by the external driver.

use crate::config::SuiteConfig;
use crate::driver::{ElementHandle, UiDriver};
use crate::locator::Locator;
use crate::result::{TantearError, TantearResult};
use crate::session::Capabilities;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Key under which the wire protocol nests element ids in find responses.
const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Wire error code for an element absent from the tree.
const NO_SUCH_ELEMENT: &str = "no such element";

/// Per-command HTTP timeout. Generous because a single driver command can
/// legitimately block while the device settles.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// New-session request payload.
fn new_session_payload(capabilities: &Capabilities) -> Value {
    json!({
        "capabilities": {
            "alwaysMatch": capabilities,
        }
    })
}

/// Classify a wire-level error payload into the suite's taxonomy.
fn classify_wire_error(status: u16, value: &Value) -> TantearError {
    let code = value["error"].as_str().unwrap_or("unknown error");
    let message = value["message"].as_str().unwrap_or_default();
    TantearError::Protocol {
        status,
        message: format!("{code}: {message}"),
    }
}

/// [`UiDriver`] implementation backed by a live automation server session.
#[derive(Debug)]
pub struct RemoteDriver {
    http: Client,
    base_url: String,
    session_id: String,
    closed: bool,
}

impl RemoteDriver {
    /// Create a session on the automation server described by the config.
    ///
    /// # Errors
    ///
    /// [`TantearError::Session`] when the server rejects the capabilities;
    /// transport failures map to [`TantearError::Http`].
    pub fn create(config: &SuiteConfig) -> TantearResult<Self> {
        Self::create_with(&config.server_url, &config.capabilities)
    }

    /// Create a session with explicit server URL and capabilities.
    ///
    /// # Errors
    ///
    /// See [`RemoteDriver::create`].
    pub fn create_with(server_url: &str, capabilities: &Capabilities) -> TantearResult<Self> {
        let http = Client::builder().timeout(COMMAND_TIMEOUT).build()?;
        let base_url = server_url.trim_end_matches('/').to_string();

        let response = http
            .post(format!("{base_url}/session"))
            .json(&new_session_payload(capabilities))
            .send()?;
        let status = response.status();
        let body: Value = response.json()?;
        if !status.is_success() {
            let err = classify_wire_error(status.as_u16(), &body["value"]);
            return Err(TantearError::session(format!(
                "session create rejected: {err}"
            )));
        }

        let session_id = body["value"]["sessionId"]
            .as_str()
            .ok_or_else(|| TantearError::session("server response carried no sessionId"))?
            .to_string();
        debug!(%session_id, %base_url, "driver session created");

        Ok(Self {
            http,
            base_url,
            session_id,
            closed: false,
        })
    }

    /// The server-assigned session id.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/session/{}{path}", self.base_url, self.session_id)
    }

    /// Execute one command and unwrap the response's `value` field.
    fn command(&self, method: Method, path: &str, body: Option<Value>) -> TantearResult<Value> {
        if self.closed {
            return Err(TantearError::session("session already quit"));
        }
        let mut request = self.http.request(method, self.endpoint(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send()?;
        let status = response.status();
        let mut body: Value = response.json()?;
        let value = body
            .get_mut("value")
            .map(Value::take)
            .unwrap_or(Value::Null);
        if status.is_success() {
            Ok(value)
        } else {
            Err(classify_wire_error(status.as_u16(), &value))
        }
    }

    fn element_command(
        &self,
        method: Method,
        element: &ElementHandle,
        suffix: &str,
        body: Option<Value>,
    ) -> TantearResult<Value> {
        self.command(
            method,
            &format!("/element/{}{suffix}", element.id),
            body,
        )
    }
}

impl UiDriver for RemoteDriver {
    fn find(&self, locator: &Locator) -> TantearResult<ElementHandle> {
        let body = serde_json::to_value(locator.wire())?;
        match self.command(Method::POST, "/element", Some(body)) {
            Ok(value) => {
                let id = value[W3C_ELEMENT_KEY].as_str().ok_or_else(|| {
                    TantearError::session("find response carried no element id")
                })?;
                Ok(ElementHandle::new(id))
            }
            Err(TantearError::Protocol { message, .. })
                if message.starts_with(NO_SUCH_ELEMENT) =>
            {
                Err(TantearError::NoSuchElement {
                    locator: locator.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }

    fn is_displayed(&self, element: &ElementHandle) -> TantearResult<bool> {
        let value = self.element_command(Method::GET, element, "/displayed", None)?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn is_enabled(&self, element: &ElementHandle) -> TantearResult<bool> {
        let value = self.element_command(Method::GET, element, "/enabled", None)?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn click(&self, element: &ElementHandle) -> TantearResult<()> {
        self.element_command(Method::POST, element, "/click", Some(json!({})))?;
        Ok(())
    }

    fn clear(&self, element: &ElementHandle) -> TantearResult<()> {
        self.element_command(Method::POST, element, "/clear", Some(json!({})))?;
        Ok(())
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> TantearResult<()> {
        self.element_command(Method::POST, element, "/value", Some(json!({ "text": text })))?;
        Ok(())
    }

    fn text(&self, element: &ElementHandle) -> TantearResult<String> {
        let value = self.element_command(Method::GET, element, "/text", None)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> TantearResult<Option<String>> {
        let value =
            self.element_command(Method::GET, element, &format!("/attribute/{name}"), None)?;
        Ok(value.as_str().map(str::to_string))
    }

    fn screenshot(&self) -> TantearResult<Vec<u8>> {
        let value = self.command(Method::GET, "/screenshot", None)?;
        let encoded = value.as_str().ok_or_else(|| TantearError::Screenshot {
            message: "screenshot response was not a string".to_string(),
        })?;
        BASE64
            .decode(encoded)
            .map_err(|err| TantearError::Screenshot {
                message: format!("invalid base64 payload: {err}"),
            })
    }

    fn back(&self) -> TantearResult<()> {
        self.command(Method::POST, "/back", Some(json!({})))?;
        Ok(())
    }

    fn page_source(&self) -> TantearResult<String> {
        let value = self.command(Method::GET, "/source", None)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn quit(&mut self) -> TantearResult<()> {
        if self.closed {
            return Ok(());
        }
        let url = self.endpoint("");
        self.closed = true;
        let response = self.http.request(Method::DELETE, url).send()?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body: Value = response.json().unwrap_or(Value::Null);
            return Err(classify_wire_error(status, &body["value"]));
        }
        debug!(session_id = %self.session_id, "driver session quit");
        Ok(())
    }
}
