//! Keypair and public key loading by logical name.
//!
//! A keypair named `creator` is read from the `CREATOR_SECRET_KEY` environment variable if it's set
//! (base58 or a JSON byte array), and otherwise from `<keys-dir>/creator.json`. Public keys are read
//! from `<keys-dir>/<name>_pub.json`, which holds a single JSON string.

use std::{
    path::Path,
    str::FromStr,
};

use anyhow::{
    anyhow,
    Context,
};
use solana_address::Address;
use solana_sdk::{
    bs58,
    signature::Keypair,
};

fn secret_key_var(name: &str) -> String {
    format!("{}_SECRET_KEY", name.to_uppercase())
}

fn keypair_from_str(kp_str: &str) -> anyhow::Result<Keypair> {
    let kp_str = kp_str.trim();
    let byte_vec: Vec<u8> = if kp_str.starts_with('[') {
        serde_json::from_str(kp_str).context("Invalid JSON keypair")?
    } else {
        bs58::decode(kp_str)
            .into_vec()
            .context("Invalid base58 keypair")?
    };

    Keypair::try_from(byte_vec.as_slice()).map_err(|e| anyhow!("Invalid keypair bytes: {e}"))
}

pub fn load_keypair(keys_dir: &Path, name: &str) -> anyhow::Result<Keypair> {
    if let Ok(kp_str) = std::env::var(secret_key_var(name)) {
        return keypair_from_str(&kp_str)
            .with_context(|| format!("Failed to load {name} from {}", secret_key_var(name)));
    }

    let path = keys_dir.join(format!("{name}.json"));
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    keypair_from_str(&contents).with_context(|| format!("Failed to load {}", path.display()))
}

/// Reads `<keys-dir>/<name>_pub.json`, returning `None` if the file doesn't exist.
pub fn load_pubkey(keys_dir: &Path, name: &str) -> anyhow::Result<Option<Address>> {
    let path = keys_dir.join(format!("{name}_pub.json"));
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let encoded: String = serde_json::from_str(&contents)
        .with_context(|| format!("{} must hold a JSON string", path.display()))?;
    let address = Address::from_str(encoded.trim())
        .map_err(|e| anyhow!("Invalid address in {}: {e}", path.display()))?;

    Ok(Some(address))
}
