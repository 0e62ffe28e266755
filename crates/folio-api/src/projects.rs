//! Handlers for `/projects`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/projects` | Every project, featured first, then by `order_index` |

use std::sync::Arc;

use axum::{Json, extract::State};
use folio_core::{content, project::Project, store::PortfolioStore};
use serde::Serialize;

use crate::error::ApiError;

/// Public JSON shape of a project.
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
  pub id:                i64,
  pub title:             String,
  pub short_description: Option<String>,
  pub image_url:         Option<String>,
  pub demo_url:          Option<String>,
  pub github_url:        Option<String>,
  pub technologies:      Vec<String>,
  pub featured:          bool,
}

impl From<Project> for ProjectSummary {
  fn from(p: Project) -> Self {
    Self {
      id:                p.id,
      title:             p.title,
      short_description: p.short_description,
      image_url:         p.image_url,
      demo_url:          p.demo_url,
      github_url:        p.github_url,
      technologies:      p.technologies.into_vec(),
      featured:          p.featured,
    }
  }
}

/// `GET /projects`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<ProjectSummary>>, ApiError>
where
  S: PortfolioStore,
{
  let projects = content::all_projects(store.as_ref())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(projects.into_iter().map(ProjectSummary::from).collect()))
}
