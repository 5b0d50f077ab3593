//! `pulse token` - manage publisher tokens offline.

use anyhow::Result;

use pulse::token::{derive_public_id, generate_secret_token, validate_secret_token};

/// Print a fresh secret token and its public id.
pub fn new() {
    let token = generate_secret_token();
    println!("Secret token: {}", token.expose());
    println!("Public id:    {}", token.public_id());
    println!();
    println!("Keep the secret token private; put the public id in badge URLs.");
}

/// Print the public id of an existing token.
pub fn id(token: &str) -> Result<()> {
    let token = token.trim();
    if !validate_secret_token(token) {
        anyhow::bail!("Invalid token format: expected sk_live_<uuid v4>");
    }
    println!("{}", derive_public_id(token));
    Ok(())
}
