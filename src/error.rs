use std::fmt;

/// Type alias for results returned by this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Special values a host format may or may not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Infinity,
    NaN,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Infinity => f.write_str("infinity"),
            Capability::NaN => f.write_str("NaN"),
        }
    }
}

/// Errors returned by the classification, decomposition and hex codec operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("operation is undefined for NaN")]
    NotANumber,

    #[error("argument must be finite and nonzero")]
    NotFiniteNonzero,

    #[error("exponent {exp} outside representable range {min}..={max}")]
    ExponentOutOfRange { exp: i32, min: i32, max: i32 },

    #[error("host floating point format has no {0}")]
    UnsupportedCapability(Capability),

    #[error("invalid hex format configuration: {0}")]
    InvalidConfiguration(String),

    #[error("malformed hex float: {0:?}")]
    MalformedInput(String),
}
