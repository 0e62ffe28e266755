//! `GET /contact` renders the form; `POST /contact` runs the submission
//! pipeline and redirects with a status flash.

use axum::{
  Form,
  extract::{Query, State},
  http::StatusCode,
  response::{Html, IntoResponse, Redirect, Response},
};
use folio_core::{contact::ContactForm, store::PortfolioStore};
use serde::Deserialize;

use crate::{
  AppState,
  contact::{SubmitError, submit},
  error::Error,
  render::{self, Flash},
};

#[derive(Debug, Default, Deserialize)]
pub struct Params {
  pub status: Option<String>,
}

pub async fn show(Query(params): Query<Params>) -> Html<String> {
  let flash = params.status.as_deref().and_then(Flash::from_status);
  Html(render::contact(&ContactForm::default(), None, flash))
}

pub async fn submit_form<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<ContactForm>,
) -> Result<Response, Error>
where
  S: PortfolioStore + 'static,
{
  let result = submit(
    state.store.as_ref(),
    state.notifier.as_ref(),
    state.notify_timeout,
    &form,
  )
  .await;

  match result {
    Ok(outcome) => {
      let location = format!("/contact?status={}", outcome.status());
      Ok(Redirect::to(&location).into_response())
    }
    Err(SubmitError::Invalid(errors)) => {
      let page = render::contact(&form, Some(&errors), None);
      Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response())
    }
    Err(SubmitError::Store(e)) => Err(Error::store(e)),
  }
}
