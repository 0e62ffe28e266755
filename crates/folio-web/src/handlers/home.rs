use axum::{extract::State, response::Html};
use folio_core::{content::HomeContent, store::PortfolioStore};

use crate::{AppState, error::Error, render};

pub async fn handler<S>(State(state): State<AppState<S>>) -> Result<Html<String>, Error>
where
  S: PortfolioStore + 'static,
{
  let content = HomeContent::load(state.store.as_ref())
    .await
    .map_err(Error::store)?;
  Ok(Html(render::home(&content)))
}
