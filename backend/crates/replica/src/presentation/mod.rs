//! Presentation Layer
//!
//! Replication routes and the combined replica router.

pub mod dto;
pub mod handlers;
pub mod router;
