//! Small interactive front end for the bcrypt library: prompts for a
//! password, hashes it with a fresh salt, then verifies a second entry
//! against the stored hash.

use std::io::{self, Write};

use bcrypt_core::{checkpw, gensalt, hashpw, DEFAULT_COST};
use rpassword::read_password;
use unicode_normalization::UnicodeNormalization;

/// Reads a password without echo, NFKC-normalized.
///
/// Normalization happens here, at the keyboard boundary, so that the same
/// password typed through different input methods yields the same bytes.
/// The library itself hashes whatever bytes it is handed.
fn prompt(label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    Ok(read_password()?.nfkc().collect())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let password = prompt("Enter password to hash")?;

    let salt = gensalt(DEFAULT_COST)?;
    let hashed = hashpw(password.as_str(), &salt)?;
    println!("\nHashed password: {hashed}");

    let candidate = prompt("\nEnter password to verify")?;
    let is_valid = checkpw(candidate.as_str(), &hashed)?;
    println!(
        "\nPassword verification: {}",
        if is_valid { "success" } else { "failed" }
    );

    Ok(())
}
