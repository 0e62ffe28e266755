//! HTML page handlers, one module per public route.

pub mod contact;
pub mod home;
pub mod portfolio;
pub mod project;
pub mod resume;

use crate::error::Error;

/// Router fallback for unknown paths.
pub async fn not_found() -> Error { Error::NotFound }
