//! Core types and trait definitions for the Folio portfolio site.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Every other crate depends on it: the domain entities, form validation,
//! the [`store::PortfolioStore`] abstraction, the read-side content queries
//! and the admin model-view metadata all live here.

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// returned futures instead.
#![allow(async_fn_in_trait)]

pub mod admin;
pub mod contact;
pub mod content;
pub mod error;
pub mod experience;
pub mod project;
pub mod settings;
pub mod skill;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
pub use validation::ValidationErrors;
