// RSA Module - Main module file
// Exports key generation, the prime search and the raw RSA primitive

pub mod bigint;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod primality;
pub mod prime_search;

pub use decrypt::{decrypt, decrypt_value, try_decrypt};
pub use encrypt::{encrypt, encrypt_value, try_encrypt};
pub use keygen::{generate_keys, KeyGenerator, KeyMaterial};
pub use primality::{MillerRabin, PrimalityTester};
pub use prime_search::{ParallelPrimeSearch, PrimeSearchResult, SearchBounds};
