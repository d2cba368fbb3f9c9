//! Common utilities module
//!
//! This module contains shared utilities used across the aerial pipeline.

pub mod error;

pub use error::{ErrorKind, Result, SceneError};
