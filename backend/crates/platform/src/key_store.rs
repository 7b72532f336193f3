//! Key File Storage
//!
//! Keys are persisted as base64-encoded raw key bytes in a flat file.
//! A signing key file holds the 32-byte seed; its public half is written
//! alongside with a `.pub` suffix.

use std::fs;
use std::path::{Path, PathBuf};

use ed25519_dalek::{SigningKey, VerifyingKey};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::{KEY_LEN, from_base64, generate_signing_key, to_base64, verifying_key_from_bytes};

/// Errors when reading or writing key files
#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("Key file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Key file is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),
}

pub type KeyStoreResult<T> = Result<T, KeyStoreError>;

/// Store a public key as base64 of its raw bytes
pub fn store_public_key(key: &VerifyingKey, path: &Path) -> KeyStoreResult<()> {
    write_key_file(path, key.as_bytes())
}

/// Load a public key written by [`store_public_key`]
pub fn load_public_key(path: &Path) -> KeyStoreResult<VerifyingKey> {
    let bytes = read_key_file(path)?;
    verifying_key_from_bytes(&bytes)
        .ok_or_else(|| KeyStoreError::InvalidKey(format!("{} is not an ed25519 public key", path.display())))
}

/// Store a signing key seed
pub fn store_signing_key(key: &SigningKey, path: &Path) -> KeyStoreResult<()> {
    let seed = Zeroizing::new(key.to_bytes());
    write_key_file(path, seed.as_ref())
}

/// Load a signing key seed written by [`store_signing_key`]
pub fn load_signing_key(path: &Path) -> KeyStoreResult<SigningKey> {
    let bytes = Zeroizing::new(read_key_file(path)?);
    let seed: [u8; KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
        KeyStoreError::InvalidKey(format!(
            "{} must hold a {}-byte seed, found {} bytes",
            path.display(),
            KEY_LEN,
            bytes.len()
        ))
    })?;
    Ok(SigningKey::from_bytes(&seed))
}

/// Load the signing key at `path`, generating and storing one if absent
///
/// The public half is (re)written to `<path>.pub` so clients can verify
/// server signatures.
pub fn load_or_generate_signing_key(path: &Path) -> KeyStoreResult<SigningKey> {
    let key = if path.exists() {
        load_signing_key(path)?
    } else {
        let key = generate_signing_key();
        store_signing_key(&key, path)?;
        tracing::info!(path = %path.display(), "Generated new server signing key");
        key
    };

    store_public_key(&key.verifying_key(), &public_key_path(path))?;
    Ok(key)
}

/// Path of the public key file belonging to a signing key file
pub fn public_key_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".pub");
    PathBuf::from(name)
}

fn write_key_file(path: &Path, bytes: &[u8]) -> KeyStoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, to_base64(bytes))?;
    Ok(())
}

fn read_key_file(path: &Path) -> KeyStoreResult<Vec<u8>> {
    let contents = fs::read_to_string(path)?;
    Ok(from_base64(contents.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{sign, verify};

    #[test]
    fn test_public_key_file_is_flat_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.pub");
        let key = generate_signing_key().verifying_key();

        store_public_key(&key, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, to_base64(key.as_bytes()));
        assert_eq!(load_public_key(&path).unwrap(), key);
    }

    #[test]
    fn test_signing_key_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys").join("server.key");
        let key = generate_signing_key();

        store_signing_key(&key, &path).unwrap();
        let loaded = load_signing_key(&path).unwrap();

        let signature = sign(&loaded, b"nonce");
        assert!(verify(&key.verifying_key(), b"nonce", &signature));
    }

    #[test]
    fn test_load_or_generate_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.key");

        let first = load_or_generate_signing_key(&path).unwrap();
        let second = load_or_generate_signing_key(&path).unwrap();
        assert_eq!(first.to_bytes(), second.to_bytes());

        let public = load_public_key(&public_key_path(&path)).unwrap();
        assert_eq!(public, first.verifying_key());
    }

    #[test]
    fn test_load_rejects_wrong_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.key");
        fs::write(&path, to_base64(&[1, 2, 3])).unwrap();

        assert!(matches!(
            load_signing_key(&path),
            Err(KeyStoreError::InvalidKey(_))
        ));
        assert!(matches!(
            load_public_key(&path),
            Err(KeyStoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_public_key(&dir.path().join("absent.pub"));
        assert!(matches!(result, Err(KeyStoreError::Io(_))));
    }

    #[test]
    fn test_public_key_path() {
        let path = public_key_path(Path::new("keys/server.key"));
        assert_eq!(path, PathBuf::from("keys/server.key.pub"));
    }
}
