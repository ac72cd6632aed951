//! The authenticated handle to the payment network

use std::{env, fmt};

use reqwest::{
    header::{self, HeaderValue},
    StatusCode,
};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::environment::{self, Environment};

/// The media type the payment network speaks
const ACCEPT_HAL_JSON: &str = "application/vnd.dwolla.v1.hal+json";

/// The API key and secret identifying this application to the payment
/// network.
///
/// Owned exclusively by the [`Client`]; the secret is redacted from the
/// `Debug` output and never crosses the client boundary.
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    /// Bundle an existing key and secret
    #[must_use]
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Read `DWOLLA_KEY` and `DWOLLA_SECRET` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns
    /// [`MissingCredentials`](crate::ConfigurationError::MissingCredentials)
    /// when either half is unset or empty.
    pub fn from_env() -> Result<Self, environment::Error> {
        Self::from_values(env::var("DWOLLA_KEY").ok(), env::var("DWOLLA_SECRET").ok())
    }

    fn from_values(
        key: Option<String>,
        secret: Option<String>,
    ) -> Result<Self, environment::Error> {
        let present = |value: Option<String>| value.filter(|value| !value.is_empty());

        match (present(key), present(secret)) {
            (Some(key), Some(secret)) => Ok(Self::new(key, secret)),
            _ => Err(environment::Error::MissingCredentials),
        }
    }
}

// The secret must never end up in logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// The URI of a resource created on the payment network.
///
/// This is the only identifier handed back to callers; no local record of
/// the created resource is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location(pub(crate) String);

impl Location {
    /// The location as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the location, returning the underlying string
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A response from the payment network
#[derive(Debug)]
pub(crate) struct Response {
    pub(crate) location: Option<String>,
    pub(crate) body: Value,
}

impl Response {
    /// The `Location` header identifying the created resource
    pub(crate) fn location(self, path: &str) -> Result<Location, Error> {
        self.location
            .map(Location)
            .ok_or_else(|| Error::MissingLocation {
                path: path.to_string(),
            })
    }
}

/// The errors that may occur when calling the payment network
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never completed
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The network answered with a non-success status
    #[error("`{path}` returned {status}: {message}")]
    Status {
        /// the request path
        path: String,

        /// the HTTP status code
        status: StatusCode,

        /// the error description returned by the network
        message: String,
    },

    /// A created resource came back without a `Location` header
    #[error("response from `{path}` is missing the Location header")]
    MissingLocation {
        /// the request path
        path: String,
    },

    /// The response body is not the JSON the network promises
    #[error("failed to decode the response from `{path}`")]
    Decode {
        /// the request path
        path: String,

        /// the parse failure
        source: serde_json::Error,
    },
}

impl Error {
    /// Whether retrying the same request can reasonably be expected to
    /// succeed.
    ///
    /// Transport failures and 5xx statuses are retryable; anything the
    /// network rejected outright (4xx, malformed responses) is not. No
    /// retry is ever performed by this crate itself.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => !e.is_builder(),
            Self::Status { status, .. } => status.is_server_error(),
            Self::MissingLocation { .. } | Self::Decode { .. } => false,
        }
    }
}

/// A client to the payment network API.
///
/// The client is constructed once per process and shared by reference
/// between operations; it holds no mutable state after construction and is
/// the only component permitted to see the [`Credentials`] or issue network
/// I/O.
#[derive(Debug)]
pub struct Client {
    inner: InnerTransport,
}

#[derive(Debug)]
enum InnerTransport {
    Http(HttpTransport),
    #[cfg(test)]
    Fake(std::sync::Arc<fake::FakeTransport>),
}

#[derive(Debug)]
struct HttpTransport {
    http: reqwest::Client,
    environment: Environment,
    credentials: Credentials,
}

impl Client {
    /// Build a client for the given environment and credentials.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be
    /// initialised.
    pub fn new(environment: Environment, credentials: Credentials) -> Result<Self, Error> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_HAL_JSON));
        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: InnerTransport::Http(HttpTransport {
                http,
                environment,
                credentials,
            }),
        })
    }

    /// Resolve the environment and credentials from the process environment
    /// and build a client from them.
    ///
    /// Intended to run eagerly at process initialisation, so that
    /// misconfiguration surfaces before any user-facing action is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) when
    /// the environment or the credentials are missing or malformed.
    pub fn from_env() -> Result<Self, crate::Error> {
        let environment = Environment::resolve()?;
        let credentials = Credentials::from_env()?;
        Ok(Self::new(environment, credentials)?)
    }

    /// Issue a POST request against the given API path.
    ///
    /// The single primitive every operation is built on.
    #[instrument(skip(self, body))]
    pub(crate) async fn post<B>(&self, path: &str, body: Option<&B>) -> Result<Response, Error>
    where
        B: Serialize + ?Sized,
    {
        match &self.inner {
            InnerTransport::Http(transport) => transport.post(path, body).await,
            #[cfg(test)]
            InnerTransport::Fake(transport) => transport.post(path, body),
        }
    }
}

impl HttpTransport {
    async fn post<B>(&self, path: &str, body: Option<&B>) -> Result<Response, Error>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}/{path}", self.environment.base_url());
        let mut request = self
            .http
            .post(&url)
            .basic_auth(&self.credentials.key, Some(&self.credentials.secret));

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let text = response.text().await?;

        if !status.is_success() {
            let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
            return Err(Error::Status {
                path: path.to_string(),
                status,
                message: error_message(&body),
            });
        }

        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|source| Error::Decode {
                path: path.to_string(),
                source,
            })?
        };

        Ok(Response { location, body })
    }
}

/// Pull a human-readable message out of an API error body
fn error_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .unwrap_or("no error description")
        .to_string()
}

#[cfg(test)]
pub(crate) mod fake {
    //! A recording stand-in for the HTTP transport

    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use reqwest::StatusCode;
    use serde::Serialize;
    use serde_json::Value;

    use super::{Client, Error, InnerTransport, Response};

    /// A call recorded by the fake transport
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedCall {
        pub path: String,
        pub body: Option<Value>,
    }

    /// A scripted transport that records every call and answers from a
    /// queue, in order
    #[derive(Debug, Default)]
    pub struct FakeTransport {
        responses: Mutex<VecDeque<Result<Response, Error>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl FakeTransport {
        /// Queue a successful response
        pub fn respond(self, location: Option<&str>, body: Value) -> Self {
            self.responses.lock().unwrap().push_back(Ok(Response {
                location: location.map(str::to_string),
                body,
            }));
            self
        }

        /// Queue a failure with the given HTTP status
        pub fn fail(self, status: u16) -> Self {
            self.responses.lock().unwrap().push_back(Err(Error::Status {
                path: String::new(),
                status: StatusCode::from_u16(status).unwrap(),
                message: "scripted failure".to_string(),
            }));
            self
        }

        /// The calls issued so far, in order
        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        pub(super) fn post<B>(&self, path: &str, body: Option<&B>) -> Result<Response, Error>
        where
            B: Serialize + ?Sized,
        {
            self.calls.lock().unwrap().push(RecordedCall {
                path: path.to_string(),
                body: body.map(|body| serde_json::to_value(body).unwrap()),
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("the fake transport ran out of scripted responses")
        }
    }

    impl Client {
        /// A client backed by the given scripted transport
        pub(crate) fn with_fake(transport: Arc<FakeTransport>) -> Self {
            Self {
                inner: InnerTransport::Fake(transport),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;
    use test_case::test_case;

    use super::{error_message, Credentials, Error, Location, Response};

    #[test_case(Some("key"), Some("secret") => true; "both present")]
    #[test_case(None, Some("secret") => false; "key missing")]
    #[test_case(Some("key"), None => false; "secret missing")]
    #[test_case(None, None => false; "both missing")]
    #[test_case(Some(""), Some("secret") => false; "empty key is missing")]
    fn both_credential_halves_are_required(key: Option<&str>, secret: Option<&str>) -> bool {
        Credentials::from_values(key.map(str::to_string), secret.map(str::to_string)).is_ok()
    }

    #[test]
    fn debug_output_redacts_the_secret() {
        let credentials = Credentials::new("key-id", "hunter2");
        let debug = format!("{credentials:?}");

        assert!(debug.contains("key-id"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn a_location_displays_as_its_uri() {
        let location = Location("https://api-sandbox.dwolla.com/customers/abc".to_string());

        assert_eq!(
            location.to_string(),
            "https://api-sandbox.dwolla.com/customers/abc"
        );
        assert_eq!(location.as_str(), location.clone().into_string());
    }

    #[test]
    fn a_response_without_a_location_header_is_an_error() {
        let response = Response {
            location: None,
            body: serde_json::Value::Null,
        };

        assert!(matches!(
            response.location("customers"),
            Err(Error::MissingLocation { .. })
        ));
    }

    #[test_case(StatusCode::INTERNAL_SERVER_ERROR => true; "server errors are retryable")]
    #[test_case(StatusCode::BAD_REQUEST => false; "client errors are not")]
    #[test_case(StatusCode::UNAUTHORIZED => false; "authorization errors are not")]
    fn retryability_follows_the_status_class(status: StatusCode) -> bool {
        Error::Status {
            path: "transfers".to_string(),
            status,
            message: String::new(),
        }
        .is_retryable()
    }

    #[test]
    fn the_remote_error_message_is_preserved() {
        let body = json!({
            "code": "ValidationError",
            "message": "Funding source name must not be blank.",
        });

        assert_eq!(
            error_message(&body),
            "Funding source name must not be blank."
        );
        assert_eq!(error_message(&json!({})), "no error description");
    }
}
