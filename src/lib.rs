//! Textbook RSA built from first principles: parallel probabilistic prime
//! search, exponent selection, modular inverse and raw modular
//! exponentiation. No padding is applied; a single big integer is the unit
//! of encryption.

pub mod config;
pub mod error;
pub mod rsa;

pub use config::{KeygenConfig, SearchConfig};
pub use error::{Result, RsaError};
pub use rsa::{
    decrypt, decrypt_value, encrypt, encrypt_value, generate_keys, try_decrypt, try_encrypt,
    KeyGenerator, KeyMaterial, MillerRabin, ParallelPrimeSearch, PrimalityTester,
};
