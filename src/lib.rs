//! A library for linking bank accounts to the Dwolla payment network and
//! moving funds between them

#![deny(
    clippy::all,
    missing_debug_implementations,
    missing_copy_implementations,
    missing_docs
)]
#![warn(clippy::pedantic)]

mod authorization;
pub use authorization::AuthorizationLinks;
mod client;
pub use client::{Client, Credentials, Error as NetworkError, Location};
mod customers;
pub use customers::NewCustomerParams;
mod environment;
pub use environment::{Environment, Error as ConfigurationError, ENVIRONMENT_VAR};
mod funding_sources;
pub use funding_sources::{AddFundingSourceParams, CreateFundingSourceOptions};
mod transfers;
pub use transfers::TransferParams;
mod validate;
pub use validate::Error as ValidationError;

/// The errors that may occur while orchestrating the payment network
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The process environment is missing or malformed.
    ///
    /// Fatal: no operation can be served until the configuration is fixed.
    #[error(transparent)]
    Configuration(#[from] environment::Error),

    /// The caller supplied malformed parameters.
    ///
    /// Recoverable: correct the parameters and retry. No network call was
    /// issued.
    #[error(transparent)]
    Validation(#[from] validate::Error),

    /// A call to the payment network failed.
    ///
    /// Whether to retry is the caller's decision; see
    /// [`NetworkError::is_retryable`].
    #[error(transparent)]
    Network(#[from] client::Error),
}
