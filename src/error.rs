// RSA Error Types
// Errors surfaced by key generation and the raw RSA primitive

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RsaError {
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: u64,
        reason: &'static str,
    },
    #[error("no prime found for bit length {bits} across {workers} workers")]
    SearchExhausted { bits: usize, workers: usize },
    #[error("operand is not smaller than the modulus")]
    OutOfRange,
    #[error("no modular inverse exists for the given exponent and totient")]
    NoInverse,
}

pub type Result<T> = std::result::Result<T, RsaError>;
