//! Single-use grants authorizing funding-source attachment

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{instrument, Level};

use crate::{client, Client, Error};

/// The `_links` bundle of a freshly created on-demand authorization.
///
/// The network invalidates a grant after one use (or a short expiry), so
/// the bundle is not `Clone`: it is consumed by value by
/// [`Client::create_funding_source`] and a fresh grant must be obtained
/// for every attempt. Only the target of each link is retained.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AuthorizationLinks {
    links: BTreeMap<String, Link>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct Link {
    href: String,
}

#[derive(Debug, Deserialize)]
struct OnDemandAuthorization {
    #[serde(rename = "_links")]
    links: AuthorizationLinks,
}

impl Client {
    /// Obtain a fresh single-use grant for attaching a funding source
    /// without an interactive consent redirect.
    ///
    /// The grant must be consumed by a funding-source creation issued
    /// immediately afterwards, within the same logical operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] when the call fails or the response does
    /// not carry a `_links` structure.
    #[instrument(skip(self))]
    pub async fn create_on_demand_authorization(&self) -> Result<AuthorizationLinks, Error> {
        const PATH: &str = "on-demand-authorizations";

        self.post::<()>(PATH, None)
            .await
            .and_then(|response| {
                let authorization: OnDemandAuthorization = serde_json::from_value(response.body)
                    .map_err(|source| client::Error::Decode {
                        path: PATH.to_string(),
                        source,
                    })?;
                Ok(authorization.links)
            })
            .map_err(|e| {
                tracing::event!(
                    Level::ERROR,
                    error = %e,
                    "creating an on-demand authorization failed"
                );
                e.into()
            })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::{client::fake::FakeTransport, Client, Error, NetworkError};

    #[tokio::test]
    async fn returns_the_links_bundle_from_the_response_body() {
        let transport = Arc::new(FakeTransport::default().respond(
            None,
            json!({
                "_links": {
                    "self": {
                        "href": "https://api-sandbox.dwolla.com/on-demand-authorizations/30e7c028"
                    }
                },
                "bodyText": "I agree that future payments will be processed...",
                "buttonText": "Agree & Continue",
            }),
        ));
        let client = Client::with_fake(Arc::clone(&transport));

        let authorization = client.create_on_demand_authorization().await.unwrap();

        assert_eq!(
            authorization.links["self"].href,
            "https://api-sandbox.dwolla.com/on-demand-authorizations/30e7c028"
        );

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "on-demand-authorizations");
        assert_eq!(calls[0].body, None, "the request carries no body");
    }

    #[tokio::test]
    async fn a_response_without_links_is_a_decode_error() {
        let transport =
            Arc::new(FakeTransport::default().respond(None, json!({ "bodyText": "I agree" })));
        let client = Client::with_fake(Arc::clone(&transport));

        let err = client.create_on_demand_authorization().await.unwrap_err();

        assert!(matches!(err, Error::Network(NetworkError::Decode { .. })));
    }

    #[tokio::test]
    async fn network_failures_are_propagated_unchanged() {
        let transport = Arc::new(FakeTransport::default().fail(401));
        let client = Client::with_fake(Arc::clone(&transport));

        let err = client.create_on_demand_authorization().await.unwrap_err();

        assert!(matches!(
            err,
            Error::Network(NetworkError::Status { status, .. }) if status.as_u16() == 401
        ));
    }
}
