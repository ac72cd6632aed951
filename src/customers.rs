//! Registering customers with the payment network

use serde::Serialize;
use tracing::{instrument, Level};

use crate::{client::Location, Client, Error};

/// The fields required to register a new personal customer
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomerParams {
    /// Legal first name
    pub first_name: String,

    /// Legal last name
    pub last_name: String,

    /// Email address
    pub email: String,

    /// The kind of customer record to create, e.g. `personal`
    #[serde(rename = "type")]
    pub customer_type: String,

    /// First line of the residential address
    pub address1: String,

    /// City
    pub city: String,

    /// Two-letter state code
    pub state: String,

    /// Postal code
    pub postal_code: String,

    /// Date of birth, `YYYY-MM-DD`
    pub date_of_birth: String,

    /// Last four digits of the social security number
    pub ssn: String,
}

impl Client {
    /// Register a new customer record, returning the location of the
    /// created resource.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] when the call fails; the failure is
    /// logged with context and the underlying error propagated unchanged.
    #[instrument(skip(self, params))]
    pub async fn create_customer(&self, params: &NewCustomerParams) -> Result<Location, Error> {
        self.post("customers", Some(params))
            .await
            .and_then(|response| response.location("customers"))
            .map_err(|e| {
                tracing::event!(Level::ERROR, error = %e, "creating a customer failed");
                e.into()
            })
    }
}
