//! `GET /resume`: redirect to the configured resume file, or render the
//! timeline and skills.

use axum::{
  extract::State,
  http::{HeaderValue, StatusCode, header},
  response::{Html, IntoResponse, Response},
};
use folio_core::{
  content::ResumeContent,
  settings::{find_setting, keys},
  store::PortfolioStore,
};

use crate::{AppState, error::Error, render};

pub async fn handler<S>(State(state): State<AppState<S>>) -> Result<Response, Error>
where
  S: PortfolioStore + 'static,
{
  let store = state.store.as_ref();
  if let Some(url) = find_setting(store, keys::RESUME_URL)
    .await
    .map_err(Error::store)?
  {
    match HeaderValue::try_from(url.trim()) {
      Ok(location) => {
        return Ok((StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response());
      }
      Err(_) => tracing::warn!(url = %url, "resume_url is not a valid Location header; ignoring it"),
    }
  }

  let content = ResumeContent::load(store).await.map_err(Error::store)?;
  Ok(Html(render::resume(&content)).into_response())
}
