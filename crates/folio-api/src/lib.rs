//! JSON routers for Folio.
//!
//! Exposes axum [`Router`]s backed by any
//! [`folio_core::store::PortfolioStore`]: the public project listing and the
//! generic admin CRUD surface. Authentication is the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", folio_api::api_router(store.clone()))
//! .merge(folio_api::admin_router(store.clone()).route_layer(auth))
//! ```

pub mod admin;
pub mod error;
pub mod projects;

use std::sync::Arc;

use axum::{Router, routing::get};
use folio_core::store::PortfolioStore;

pub use error::ApiError;

/// Build the public API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PortfolioStore + 'static,
{
  Router::new()
    .route("/projects", get(projects::list::<S>))
    .with_state(store)
}

/// Build the admin router for `store`. Routes carry their full `/admin`
/// prefix so the dashboard answers on both `/admin` and `/admin/`; merge it
/// rather than nesting it.
pub fn admin_router<S>(store: Arc<S>) -> Router<()>
where
  S: PortfolioStore + 'static,
{
  Router::new()
    .route("/admin", get(admin::dashboard::<S>))
    .route("/admin/", get(admin::dashboard::<S>))
    .route("/admin/{entity}/schema", get(admin::schema))
    .route("/admin/{entity}", get(admin::list::<S>).post(admin::create::<S>))
    .route(
      "/admin/{entity}/{id}",
      get(admin::get_one::<S>)
        .put(admin::update::<S>)
        .patch(admin::patch::<S>)
        .delete(admin::delete::<S>),
    )
    .with_state(store)
}
