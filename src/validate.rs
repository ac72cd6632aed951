//! Parameter checks that run before any network request is issued
//!
//! All checks are pure and synchronous. An operation with invalid
//! parameters fails here and never issues a partial network call.

use rust_decimal::Decimal;

use crate::{funding_sources::CreateFundingSourceOptions, transfers::TransferParams};

/// The errors that may occur when checking caller-supplied parameters
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The funding source options are missing the customer id
    #[error("customerId is required")]
    MissingCustomerId,

    /// The funding source options are missing a display name
    #[error("fundingSourceName is required")]
    MissingFundingSourceName,

    /// The funding source options are missing the processor token
    #[error("plaidToken is required")]
    MissingPlaidToken,

    /// A transfer needs both of its endpoints
    #[error("Both source and destination funding source URLs are required")]
    MissingTransferEndpoint,

    /// A transfer amount must be a positive number
    #[error("Valid transfer amount is required")]
    InvalidAmount,
}

/// Check funding source options field by field. The first missing field
/// wins.
pub(crate) fn funding_source(options: &CreateFundingSourceOptions) -> Result<(), Error> {
    if options.customer_id.is_empty() {
        return Err(Error::MissingCustomerId);
    }
    if options.funding_source_name.is_empty() {
        return Err(Error::MissingFundingSourceName);
    }
    if options.plaid_token.is_empty() {
        return Err(Error::MissingPlaidToken);
    }
    Ok(())
}

/// Check transfer endpoints and amount.
///
/// A non-numeric, zero or negative amount is treated identically to a
/// missing one.
pub(crate) fn transfer(params: &TransferParams) -> Result<(), Error> {
    if params.source_funding_source_url.is_empty()
        || params.destination_funding_source_url.is_empty()
    {
        return Err(Error::MissingTransferEndpoint);
    }

    match params.amount.parse::<Decimal>() {
        Ok(amount) if amount > Decimal::ZERO => Ok(()),
        _ => Err(Error::InvalidAmount),
    }
}
