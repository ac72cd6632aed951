//! Moving funds between funding sources

use serde::Serialize;
use tracing::{instrument, Level};

use crate::{client::Location, validate, Client, Error};

/// Parameters accepted by [`Client::create_transfer`]
#[derive(Debug)]
pub struct TransferParams {
    /// The location of the funding source to draw from
    pub source_funding_source_url: String,

    /// The location of the funding source to deposit into
    pub destination_funding_source_url: String,

    /// The amount to move, as a decimal string (e.g. `"150.00"`)
    pub amount: String,
}

#[derive(Debug, Serialize)]
struct TransferRequest<'a> {
    #[serde(rename = "_links")]
    links: TransferLinks<'a>,
    amount: Amount<'a>,
}

#[derive(Debug, Serialize)]
struct TransferLinks<'a> {
    source: Href<'a>,
    destination: Href<'a>,
}

#[derive(Debug, Serialize)]
struct Href<'a> {
    href: &'a str,
}

#[derive(Debug, Serialize)]
struct Amount<'a> {
    currency: &'static str,
    value: &'a str,
}

impl Client {
    /// Submit a transfer between two funding sources, returning the
    /// location of the created transfer.
    ///
    /// All transfers are denominated in USD; the amount string is
    /// transmitted verbatim. Submitting the same parameters twice creates
    /// two distinct transfers; deduplication is the caller's concern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when an endpoint is missing or the
    /// amount is not a positive number (no network call is issued) and
    /// [`Error::Network`] when the call fails.
    #[instrument(skip(self, params))]
    pub async fn create_transfer(&self, params: &TransferParams) -> Result<Location, Error> {
        validate::transfer(params)?;

        let request = TransferRequest {
            links: TransferLinks {
                source: Href {
                    href: &params.source_funding_source_url,
                },
                destination: Href {
                    href: &params.destination_funding_source_url,
                },
            },
            amount: Amount {
                currency: "USD",
                value: &params.amount,
            },
        };

        self.post("transfers", Some(&request))
            .await
            .and_then(|response| response.location("transfers"))
            .map_err(|e| {
                tracing::event!(Level::ERROR, error = %e, "transferring funds failed");
                e.into()
            })
    }
}
