//! `GET /portfolio?page=&tech=`: paginated listing with technology facets.

use axum::{
  extract::{Query, State},
  response::Html,
};
use folio_core::{
  content::{portfolio_page, technology_facets},
  store::PortfolioStore,
};
use serde::Deserialize;

use crate::{AppState, error::Error, render};

#[derive(Debug, Default, Deserialize)]
pub struct Params {
  pub page: Option<String>,
  pub tech: Option<String>,
}

impl Params {
  /// Missing or malformed pages fall back to the first page.
  pub fn page(&self) -> u32 {
    self
      .page
      .as_deref()
      .and_then(|p| p.trim().parse().ok())
      .unwrap_or(1)
      .max(1)
  }

  pub fn tech(&self) -> Option<&str> {
    self.tech.as_deref().map(str::trim).filter(|t| !t.is_empty())
  }
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<Params>,
) -> Result<Html<String>, Error>
where
  S: PortfolioStore + 'static,
{
  let store = state.store.as_ref();
  let tech = params.tech();
  let page = portfolio_page(store, params.page(), tech)
    .await
    .map_err(Error::store)?;
  let facets = technology_facets(store).await.map_err(Error::store)?;

  Ok(Html(render::portfolio(&page, &facets, tech)))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params(page: Option<&str>, tech: Option<&str>) -> Params {
    Params {
      page: page.map(str::to_owned),
      tech: tech.map(str::to_owned),
    }
  }

  #[test]
  fn page_falls_back_to_one() {
    assert_eq!(params(None, None).page(), 1);
    assert_eq!(params(Some("abc"), None).page(), 1);
    assert_eq!(params(Some("0"), None).page(), 1);
    assert_eq!(params(Some("-3"), None).page(), 1);
    assert_eq!(params(Some(" 4 "), None).page(), 4);
  }

  #[test]
  fn blank_tech_means_no_filter() {
    assert_eq!(params(None, Some("  ")).tech(), None);
    assert_eq!(params(None, Some(" Rust ")).tech(), Some("Rust"));
  }
}
