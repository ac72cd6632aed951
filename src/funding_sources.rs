//! Linking bank accounts to customer records as funding sources

use serde::Serialize;
use tracing::{instrument, Level};

use crate::{authorization::AuthorizationLinks, client::Location, validate, Client, Error};

/// Options for registering a funding source against a customer record
#[derive(Debug)]
pub struct CreateFundingSourceOptions {
    /// The customer the funding source belongs to
    pub customer_id: String,

    /// The display name of the funding source, usually the bank's name
    pub funding_source_name: String,

    /// The Plaid processor token for the underlying bank account
    pub plaid_token: String,
}

/// Parameters accepted by [`Client::add_funding_source`]
#[derive(Debug)]
pub struct AddFundingSourceParams {
    /// The customer the funding source belongs to
    pub customer_id: String,

    /// The processor token obtained from the bank-aggregation step
    pub processor_token: String,

    /// The name of the bank backing the funding source
    pub bank_name: String,
}

#[derive(Debug, Serialize)]
struct FundingSourceRequest<'a> {
    name: &'a str,
    #[serde(rename = "plaidToken")]
    plaid_token: &'a str,
    #[serde(rename = "_links")]
    links: AuthorizationLinks,
}

impl Client {
    /// Exchange a Plaid processor token, together with a fresh
    /// authorization grant, for a funding source registered under the
    /// customer. Returns the location of the created funding source.
    ///
    /// The grant is consumed whether or not the call succeeds; a failed
    /// call needs a fresh grant, not a retry with the stale one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when a required option is empty (no
    /// network call is issued) and [`Error::Network`] when the creation
    /// call fails.
    #[instrument(skip(self, options, authorization))]
    pub async fn create_funding_source(
        &self,
        options: &CreateFundingSourceOptions,
        authorization: AuthorizationLinks,
    ) -> Result<Location, Error> {
        validate::funding_source(options)?;

        let path = format!("customers/{}/funding-sources", options.customer_id);
        let request = FundingSourceRequest {
            name: &options.funding_source_name,
            plaid_token: &options.plaid_token,
            links: authorization,
        };

        self.post(&path, Some(&request))
            .await
            .and_then(|response| response.location(&path))
            .map_err(|e| {
                tracing::event!(Level::ERROR, error = %e, "creating a funding source failed");
                e.into()
            })
    }

    /// Link a bank account to a customer record.
    ///
    /// Obtains a fresh single-use authorization grant, then exchanges it
    /// along with the processor token for a funding source named after the
    /// bank. The grant is always obtained first: a stale or reused grant
    /// is rejected by the network with an authorization error rather than
    /// a validation error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] when either network call fails (when the
    /// authorization call fails, the creation call is never issued) and
    /// [`Error::Validation`] when the derived options are incomplete.
    #[instrument(skip(self, params))]
    pub async fn add_funding_source(
        &self,
        params: &AddFundingSourceParams,
    ) -> Result<Location, Error> {
        let authorization = self.create_on_demand_authorization().await?;

        let options = CreateFundingSourceOptions {
            customer_id: params.customer_id.clone(),
            funding_source_name: params.bank_name.clone(),
            plaid_token: params.processor_token.clone(),
        };

        self.create_funding_source(&options, authorization).await
    }
}
