//! Deployment environment resolution
//!
//! The environment is resolved once, at process start, and fixes the API
//! base endpoint for the lifetime of the [`Client`](crate::Client). It is
//! never re-resolved mid-process.

use std::{env, str::FromStr};

/// The process variable selecting the deployment environment
pub const ENVIRONMENT_VAR: &str = "DWOLLA_ENV";

/// The deployment environments recognised by the payment network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// The test environment. No real money moves
    Sandbox,

    /// The live environment
    Production,
}

impl Environment {
    /// Read and parse [`ENVIRONMENT_VAR`] from the process environment.
    ///
    /// Intended to run eagerly at process initialisation, so that a
    /// misconfigured deployment surfaces before any user-facing action is
    /// attempted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EnvironmentNotSet`] when the variable is unset, and
    /// [`Error::UnrecognisedEnvironment`] when it is set to anything other
    /// than `sandbox` or `production`.
    pub fn resolve() -> Result<Self, Error> {
        from_value(env::var(ENVIRONMENT_VAR).ok())
    }

    /// The base URL of the API for this environment
    #[must_use]
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => "https://api-sandbox.dwolla.com",
            Self::Production => "https://api.dwolla.com",
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(Error::UnrecognisedEnvironment(other.to_string())),
        }
    }
}

fn from_value(value: Option<String>) -> Result<Environment, Error> {
    value.ok_or(Error::EnvironmentNotSet)?.parse()
}

/// The errors that may occur while resolving the process configuration
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// [`ENVIRONMENT_VAR`] is not set at all
    #[error("DWOLLA_ENV is not set")]
    EnvironmentNotSet,

    /// [`ENVIRONMENT_VAR`] is set to a value other than the two recognised
    /// ones
    #[error("environment should either be set to `sandbox` or `production` (got `{0}`)")]
    UnrecognisedEnvironment(String),

    /// One or both halves of the API credentials are missing
    #[error("DWOLLA_KEY and DWOLLA_SECRET must be set")]
    MissingCredentials,
}
