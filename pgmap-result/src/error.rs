use std::fmt;

use thiserror::Error;

/// Unified error type for the pgmap mapping and translation core.
///
/// Only structural failures surface as errors. An unmappable store type or an
/// inapplicable translation is an ordinary `None` return at the call site,
/// never an `Err` — the caller decides whether that is fatal for its query.
///
/// # Error Handling Strategy
///
/// Errors propagate upward with the `?` operator. Configuration errors are
/// raised eagerly at registration or translation time; data-shape errors are
/// raised the moment a value reaches a mapping that cannot represent it.
/// Nothing in this core retries: every operation is deterministic,
/// synchronous, and in-memory.
#[derive(Error, Debug)]
pub enum Error {
    /// A requested mapping or translation is structurally impossible.
    ///
    /// Raised for container-of-container mappings, multi-dimensional
    /// containers, and translator arguments that must be compile-time
    /// constants but were supplied as arbitrary expressions. These indicate
    /// misconfiguration of the host model, not bad data, and must never
    /// silently degrade.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A value handed to literal or parameter generation has a shape the
    /// mapping cannot represent (e.g. a text value reaching an integer
    /// mapping, or a scalar reaching a container mapping).
    ///
    /// This is an upstream contract violation: the registry resolved a
    /// mapping for one in-memory type and the pipeline supplied another.
    #[error("value shape mismatch for {store_type}: {detail}")]
    DataShape { store_type: String, detail: String },

    /// Invariant violation inside the core itself. Should never occur during
    /// normal operation; indicates a bug worth reporting.
    #[error("an internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Build a data-shape error naming the offending store type.
    #[inline]
    pub fn data_shape<D: fmt::Display>(store_type: &str, detail: D) -> Self {
        Error::DataShape {
            store_type: store_type.to_string(),
            detail: detail.to_string(),
        }
    }

    /// Build a configuration error from any displayable message.
    #[inline]
    pub fn configuration<D: fmt::Display>(detail: D) -> Self {
        Error::Configuration(detail.to_string())
    }
}
