//! Shared error handling for CertMint
//!
//! This crate provides the common error type used across the CertMint
//! workspace, including the HTTP response mapping used by the relay.

pub mod error;

pub use error::{Error, Result};
