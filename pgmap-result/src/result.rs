/// Convenience alias used across the pgmap crates.
pub type Result<T> = std::result::Result<T, crate::Error>;
