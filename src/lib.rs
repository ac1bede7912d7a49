//! Screenguard - video upload validation for digital signage screens
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod error;
pub mod probe;
pub mod requirements;
pub mod server;
pub mod service;
pub mod upload;
pub mod validation;

pub use error::{Error, Result};
