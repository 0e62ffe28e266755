//! Generic admin CRUD handlers.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/admin/` | Dashboard counts |
//! | `GET`    | `/admin/{entity}/schema` | Model view: columns, filters, form |
//! | `GET`    | `/admin/{entity}` | `?q=&page=&sort=&desc=&<filter>=` |
//! | `POST`   | `/admin/{entity}` | Full form; settings upsert by key |
//! | `GET`    | `/admin/{entity}/{id}` | 404 if missing |
//! | `PUT`    | `/admin/{entity}/{id}` | Full form |
//! | `PATCH`  | `/admin/{entity}/{id}` | `{"column": .., "value": ..}` |
//! | `DELETE` | `/admin/{entity}/{id}` | 204, or 404 if missing |
//!
//! Every entity-specific decision (which columns, which operations) is read
//! from the entity's [`ModelView`](folio_core::admin::ModelView).

use std::{collections::BTreeMap, sync::Arc};

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use folio_core::{
  admin::{AdminQuery, DashboardStats, Entity, ModelView, Operation, Record},
  experience::ExperienceForm,
  project::NewProject,
  settings::{SettingInput, SettingUpdate},
  skill::NewSkill,
  store::{Page, PortfolioStore},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::ApiError;

fn entity(slug: &str) -> Result<Entity, ApiError> { Ok(Entity::from_slug(slug)?) }

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
  serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn not_found(entity: Entity, id: i64) -> ApiError {
  ApiError::NotFound(format!("{entity} {id} not found"))
}

// ─── Dashboard & schema ──────────────────────────────────────────────────────

/// `GET /admin/`
pub async fn dashboard<S>(State(store): State<Arc<S>>) -> Result<Json<DashboardStats>, ApiError>
where
  S: PortfolioStore,
{
  let stats = store.dashboard_stats().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}

/// `GET /admin/{entity}/schema`
pub async fn schema(Path(slug): Path<String>) -> Result<Json<&'static ModelView>, ApiError> {
  Ok(Json(entity(&slug)?.view()))
}

// ─── List & get ──────────────────────────────────────────────────────────────

/// `GET /admin/{entity}`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(slug): Path<String>,
  Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<Page<Record>>, ApiError>
where
  S: PortfolioStore,
{
  let view = entity(&slug)?.view();
  let query = AdminQuery::from_params(view, &params)?;
  let page = store.admin_list(view, &query).await.map_err(ApiError::store)?;
  Ok(Json(page))
}

/// `GET /admin/{entity}/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path((slug, id)): Path<(String, i64)>,
) -> Result<Json<Record>, ApiError>
where
  S: PortfolioStore,
{
  let entity = entity(&slug)?;
  let record = store
    .admin_get(entity, id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(entity, id))?;
  Ok(Json(record))
}

// ─── Create & update ─────────────────────────────────────────────────────────

/// `POST /admin/{entity}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(slug): Path<String>,
  Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortfolioStore,
{
  let entity = entity(&slug)?;
  entity.view().permits(Operation::Create)?;

  let record = match entity {
    Entity::Project => {
      let input = decode::<NewProject>(body)?.validate()?;
      Record::Project(store.create_project(input).await.map_err(ApiError::store)?)
    }
    Entity::Experience => {
      let input = decode::<ExperienceForm>(body)?.validate()?;
      Record::Experience(store.create_experience(input).await.map_err(ApiError::store)?)
    }
    Entity::Skill => {
      let input = decode::<NewSkill>(body)?.validate()?;
      Record::Skill(store.create_skill(input).await.map_err(ApiError::store)?)
    }
    Entity::Setting => {
      let input = decode::<SettingInput>(body)?.validate()?;
      Record::Setting(
        store
          .set_setting(&input.key, &input.value)
          .await
          .map_err(ApiError::store)?,
      )
    }
    Entity::Message => return Err(ApiError::MethodNotAllowed(format!("create {entity}"))),
  };

  tracing::info!(%entity, id = record.id(), "admin record created");
  Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /admin/{entity}/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path((slug, id)): Path<(String, i64)>,
  Json(body): Json<Value>,
) -> Result<Json<Record>, ApiError>
where
  S: PortfolioStore,
{
  let entity = entity(&slug)?;
  entity.view().permits(Operation::Edit)?;

  let record = match entity {
    Entity::Project => {
      let input = decode::<NewProject>(body)?.validate()?;
      store
        .update_project(id, input)
        .await
        .map_err(ApiError::store)?
        .map(Record::Project)
    }
    Entity::Experience => {
      let input = decode::<ExperienceForm>(body)?.validate()?;
      store
        .update_experience(id, input)
        .await
        .map_err(ApiError::store)?
        .map(Record::Experience)
    }
    Entity::Skill => {
      let input = decode::<NewSkill>(body)?.validate()?;
      store
        .update_skill(id, input)
        .await
        .map_err(ApiError::store)?
        .map(Record::Skill)
    }
    Entity::Setting => {
      let input = decode::<SettingInput>(body)?.validate()?;
      let key = input.key.clone();
      match store.update_setting(id, input).await.map_err(ApiError::store)? {
        SettingUpdate::Updated(setting) => Some(Record::Setting(setting)),
        SettingUpdate::NotFound => None,
        SettingUpdate::KeyTaken => {
          return Err(ApiError::Conflict(format!("setting key {key:?} already exists")));
        }
      }
    }
    Entity::Message => return Err(ApiError::MethodNotAllowed(format!("edit {entity}"))),
  };

  record.map(Json).ok_or_else(|| not_found(entity, id))
}

// ─── Inline edit & delete ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InlineEdit {
  pub column: String,
  pub value:  Value,
}

/// `PATCH /admin/{entity}/{id}`; body `{"column": "featured", "value": true}`
pub async fn patch<S>(
  State(store): State<Arc<S>>,
  Path((slug, id)): Path<(String, i64)>,
  Json(edit): Json<InlineEdit>,
) -> Result<Json<Record>, ApiError>
where
  S: PortfolioStore,
{
  let entity = entity(&slug)?;
  let (column, value) = entity.view().inline_value(&edit.column, &edit.value)?;
  let record = store
    .admin_update_column(entity, id, column, value)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(entity, id))?;
  Ok(Json(record))
}

/// `DELETE /admin/{entity}/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path((slug, id)): Path<(String, i64)>,
) -> Result<StatusCode, ApiError>
where
  S: PortfolioStore,
{
  let entity = entity(&slug)?;
  entity.view().permits(Operation::Delete)?;
  if store.admin_delete(entity, id).await.map_err(ApiError::store)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(not_found(entity, id))
  }
}
