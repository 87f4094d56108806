//! Error types for address generation and dispatch.
//!
//! ## Error Cases
//! - `Configuration`: the dispatch plan was rejected before any worker started.
//! - `KeyGeneration`: secure randomness was unavailable while creating a v3
//!   key. Fatal for the worker and cancels the rest of the run.
//! - `Sink`: the output sink failed to persist a shard.
//! - `Cancelled`: a worker observed cancellation and stopped early.
//! - `WorkerPanicked`: a blocking worker task panicked.
//! - `Worker`: wraps any of the above with the failing worker's identity.
//! - `Base32` / `InvalidAddress`: decoding or validating an existing address.

use crate::{AddressVersion, base32::Base32Error};

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Boxed error used for sources the core does not know the type of.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Unified error type for `onionfix`.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The dispatch plan is invalid.
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    /// Secure randomness was unavailable during v3 key generation.
    #[error("key generation failed: secure randomness unavailable")]
    KeyGeneration(#[source] BoxError),

    /// The output sink could not persist a shard.
    #[error("failed to persist shard {shard}")]
    Sink {
        shard: String,
        #[source]
        source: BoxError,
    },

    /// The run was cancelled before this unit of work finished.
    #[error("generation cancelled")]
    Cancelled,

    /// A worker task panicked.
    #[error("worker task panicked: {reason}")]
    WorkerPanicked { reason: String },

    /// A worker failed; `source` holds the underlying cause.
    #[error("{version} worker {worker_index} failed")]
    Worker {
        version: AddressVersion,
        worker_index: usize,
        #[source]
        source: Box<Error>,
    },

    /// The address is not valid base32 of the expected length.
    #[error("base32 error: {0}")]
    Base32(#[from] Base32Error),

    /// The address decoded but failed structural validation.
    #[error("invalid address: {reason}")]
    InvalidAddress { reason: String },
}

impl Error {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_address(reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            reason: reason.into(),
        }
    }

    /// Returns the innermost error, looking through [`Error::Worker`].
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Worker { source, .. } => source.root(),
            other => other,
        }
    }
}
