//! The `PortfolioStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `folio-store-sqlite`).
//! The content service, the API routers and the web server depend on this
//! abstraction, never on a concrete backend.

use std::future::Future;

use serde::Serialize;

use crate::{
  admin::{AdminQuery, DashboardStats, Entity, FieldValue, ModelView, Record},
  contact::{ContactMessage, NewContactMessage},
  experience::{Experience, NewExperience},
  project::{NewProject, Project},
  settings::{Setting, SettingInput, SettingUpdate},
  skill::{NewSkill, Skill},
};

// ─── Query types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectOrder {
  /// `order_index` ascending.
  #[default]
  OrderIndex,
  /// `featured` first, then `order_index` ascending.
  FeaturedFirst,
}

/// Parameters for [`PortfolioStore::list_projects`] and
/// [`PortfolioStore::count_projects`].
#[derive(Debug, Clone, Default)]
pub struct ProjectQuery {
  pub featured:   Option<bool>,
  /// Whole-tag, case-insensitive technology match.
  pub technology: Option<String>,
  pub exclude_id: Option<i64>,
  pub order:      ProjectOrder,
  /// Ignored by `count_projects`.
  pub limit:      Option<u32>,
  /// Ignored by `count_projects`.
  pub offset:     Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkillOrder {
  /// `(category, order_index)` ascending; the home page grouping order.
  #[default]
  CategoryThenOrderIndex,
  /// Category ascending, then proficiency descending; the resume order.
  CategoryThenProficiency,
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// One page of a paginated listing. `page` is 1-indexed.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
  pub items:    Vec<T>,
  pub page:     u32,
  pub per_page: u32,
  pub total:    u64,
  pub pages:    u32,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
    let pages = if per_page == 0 {
      0
    } else {
      total.div_ceil(u64::from(per_page)) as u32
    };
    Self { items, page, per_page, total, pages }
  }

  /// Row offset of the first item on `page` (pages below 1 count as 1).
  pub fn offset(page: u32, per_page: u32) -> u32 {
    page.max(1).saturating_sub(1).saturating_mul(per_page)
  }

  pub fn has_prev(&self) -> bool { self.page > 1 }

  pub fn has_next(&self) -> bool { self.page < self.pages }

  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items:    self.items.into_iter().map(f).collect(),
      page:     self.page,
      per_page: self.per_page,
      total:    self.total,
      pages:    self.pages,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Folio storage backend.
///
/// Every write commits before its future resolves. A failed write leaves no
/// partial state behind.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PortfolioStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Projects ──────────────────────────────────────────────────────────

  /// Persist a new project. `created_at` is set by the store.
  fn create_project(
    &self,
    input: NewProject,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  fn get_project(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  /// Replace every editable field. `created_at` is preserved. Returns `None`
  /// if the project does not exist.
  fn update_project(
    &self,
    id: i64,
    input: NewProject,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  fn list_projects<'a>(
    &'a self,
    query: &'a ProjectQuery,
  ) -> impl Future<Output = Result<Vec<Project>, Self::Error>> + Send + 'a;

  fn count_projects<'a>(
    &'a self,
    query: &'a ProjectQuery,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Every distinct technology tag attached to any project, unordered.
  fn list_technologies(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Experience ────────────────────────────────────────────────────────

  fn create_experience(
    &self,
    input: NewExperience,
  ) -> impl Future<Output = Result<Experience, Self::Error>> + Send + '_;

  fn update_experience(
    &self,
    id: i64,
    input: NewExperience,
  ) -> impl Future<Output = Result<Option<Experience>, Self::Error>> + Send + '_;

  /// All entries, most recent `start_date` first.
  fn list_experiences(
    &self,
  ) -> impl Future<Output = Result<Vec<Experience>, Self::Error>> + Send + '_;

  // ── Skills ────────────────────────────────────────────────────────────

  fn create_skill(
    &self,
    input: NewSkill,
  ) -> impl Future<Output = Result<Skill, Self::Error>> + Send + '_;

  fn update_skill(
    &self,
    id: i64,
    input: NewSkill,
  ) -> impl Future<Output = Result<Option<Skill>, Self::Error>> + Send + '_;

  fn list_skills(
    &self,
    order: SkillOrder,
  ) -> impl Future<Output = Result<Vec<Skill>, Self::Error>> + Send + '_;

  // ── Contact messages ──────────────────────────────────────────────────

  /// Persist a submission with `read = false` and a server-assigned
  /// `created_at`.
  fn create_message(
    &self,
    input: NewContactMessage,
  ) -> impl Future<Output = Result<ContactMessage, Self::Error>> + Send + '_;

  // ── Settings ──────────────────────────────────────────────────────────

  fn get_setting<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Insert `key` or update its value in place.
  fn set_setting<'a>(
    &'a self,
    key: &'a str,
    value: &'a str,
  ) -> impl Future<Output = Result<Setting, Self::Error>> + Send + 'a;

  /// Replace key and value of an existing row. Leaves the row untouched if
  /// the new key belongs to another row.
  fn update_setting(
    &self,
    id: i64,
    input: SettingInput,
  ) -> impl Future<Output = Result<SettingUpdate, Self::Error>> + Send + '_;

  // ── Admin (generic over entities) ─────────────────────────────────────

  /// List records of `view.entity` with search, filters, sort and paging
  /// applied. Column names in `query` have already been checked against
  /// `view`.
  fn admin_list<'a>(
    &'a self,
    view: &'static ModelView,
    query: &'a AdminQuery,
  ) -> impl Future<Output = Result<Page<Record>, Self::Error>> + Send + 'a;

  fn admin_get(
    &self,
    entity: Entity,
    id: i64,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  /// Set a single inline-editable column. Returns the updated record, or
  /// `None` if the row does not exist.
  fn admin_update_column(
    &self,
    entity: Entity,
    id: i64,
    column: &'static str,
    value: FieldValue,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  /// Returns `false` if the row did not exist.
  fn admin_delete(
    &self,
    entity: Entity,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Row counts for the dashboard, computed at call time.
  fn dashboard_stats(
    &self,
  ) -> impl Future<Output = Result<DashboardStats, Self::Error>> + Send + '_;
}
