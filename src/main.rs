use std::process;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use textbook_rsa::rsa::bigint::{from_u64, RsaBigInt};
use textbook_rsa::{
    try_decrypt, try_encrypt, KeyGenerator, KeygenConfig, MillerRabin, SearchConfig,
};

/// Generate textbook RSA key material and round-trip one integer through it.
#[derive(Parser, Debug)]
#[command(name = "textbook-rsa", about = "Generate raw RSA key material and test it")]
struct Args {
    /// Bit count of the key; each prime is searched with half of it.
    #[arg(short = 'b', long = "bits", default_value_t = 1024)]
    bits: usize,

    /// Draw a random public exponent instead of 65537.
    #[arg(long = "random-exponent")]
    random_exponent: bool,

    /// Number of prime search workers.
    #[arg(long = "workers", default_value_t = 4)]
    workers: usize,

    /// Miller-Rabin rounds per candidate.
    #[arg(long = "rounds", default_value_t = 32)]
    rounds: u32,

    /// Integer message to encrypt and decrypt.
    #[arg(short = 'm', long = "message", default_value_t = 42)]
    message: u64,
}

fn hex_of(n: &RsaBigInt) -> String {
    hex::encode(n.to_bytes_be())
}

fn run(args: Args) -> Result<()> {
    let config =
        KeygenConfig::default().with_search(SearchConfig::default().with_workers(args.workers));
    let generator = KeyGenerator::new(config, Box::new(MillerRabin::new(args.rounds)));

    let keys = generator
        .generate_keys(args.bits, !args.random_exponent)
        .context("key generation failed")?;

    println!("modulus_bits={}", keys.bit_length());
    println!("n={}", hex_of(&keys.modulus));
    println!("e={}", hex_of(&keys.encrypt_exponent));
    println!("d={}", hex_of(&keys.decrypt_exponent));

    let message = from_u64(args.message);
    let ciphertext = try_encrypt(&message, &keys.encrypt_exponent, &keys.modulus)
        .context("message does not fit below the modulus")?;
    let plaintext = try_decrypt(&ciphertext, &keys.decrypt_exponent, &keys.modulus)?;

    println!("ciphertext={}", hex_of(&ciphertext));
    ensure!(plaintext == message, "round trip produced {} instead of {}", plaintext, message);
    println!("plaintext={}", plaintext);

    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
