//! Shared error and result types for the pgmap workspace.

#![forbid(unsafe_code)]

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
