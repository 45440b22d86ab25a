use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("site {index} has a non-finite coordinate ({x}, {y})")]
    NonFiniteSite { index: usize, x: f64, y: f64 },

    #[error("sweep margin must be positive and finite, got {0}")]
    InvalidMargin(f64),

    #[error("beach line invariant broken: {0}")]
    BrokenInvariant(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
