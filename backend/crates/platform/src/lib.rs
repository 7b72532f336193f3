//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random nonces, SHA-256, Base64, ed25519)
//! - Key file storage (base64 flat files)
//! - The name-to-endpoint Directory (trait, in-memory registry, HTTP client/router)
//! - HTTP RPC plumbing for the Auction contract (client handle and router)

pub mod crypto;
pub mod directory;
pub mod key_store;
pub mod rpc;
