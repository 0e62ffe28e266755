//! `GET /project/{id}`: project detail with related projects.

use axum::{
  extract::{Path, State},
  response::Html,
};
use folio_core::{content::related_projects, store::PortfolioStore};

use crate::{AppState, error::Error, render};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Html<String>, Error>
where
  S: PortfolioStore + 'static,
{
  // Non-numeric ids name no project.
  let id: i64 = id.parse().map_err(|_| Error::NotFound)?;
  let store = state.store.as_ref();

  let project = store
    .get_project(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  let related = related_projects(store, &project)
    .await
    .map_err(Error::store)?;

  Ok(Html(render::project(&project, &related)))
}
