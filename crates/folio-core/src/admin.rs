//! Admin model views: per-entity metadata that drives the generic CRUD
//! surface.
//!
//! A [`ModelView`] names the visible columns, the free-text searchable
//! columns, the categorical filters, the inline-editable columns, the default
//! sort and the capabilities of one entity. Every column name that reaches the
//! store has been resolved against a view first, so backends can interpolate
//! them into queries as static identifiers.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
  Error, Result,
  contact::ContactMessage,
  experience::{EXPERIENCE_TYPES, Experience},
  project::Project,
  settings::Setting,
  skill::Skill,
  validation::ValidationErrors,
};

pub const ADMIN_PAGE_SIZE: u32 = 20;

// ─── Entity ──────────────────────────────────────────────────────────────────

/// The entities exposed by the admin surface, named by their URL slug.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
pub enum Entity {
  #[serde(rename = "projects")]
  #[strum(serialize = "projects")]
  Project,
  #[serde(rename = "experience")]
  #[strum(serialize = "experience")]
  Experience,
  #[serde(rename = "skills")]
  #[strum(serialize = "skills")]
  Skill,
  #[serde(rename = "messages")]
  #[strum(serialize = "messages")]
  Message,
  #[serde(rename = "settings")]
  #[strum(serialize = "settings")]
  Setting,
}

impl Entity {
  pub fn from_slug(slug: &str) -> Result<Self> {
    slug.parse().map_err(|_| Error::UnknownEntity(slug.to_owned()))
  }

  pub fn slug(self) -> &'static str { self.into() }

  pub fn view(self) -> &'static ModelView {
    match self {
      Self::Project => &PROJECTS,
      Self::Experience => &EXPERIENCE,
      Self::Skill => &SKILLS,
      Self::Message => &MESSAGES,
      Self::Setting => &SETTINGS,
    }
  }
}

/// Operations gated by a view's capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
  Create,
  Edit,
  Delete,
}

// ─── Columns ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
  Text,
  LongText,
  /// A technology tag list; searchable but not sortable or filterable.
  Tags,
  Bool,
  Int,
  Date,
  DateTime,
}

#[derive(Debug, Serialize)]
pub struct Column {
  pub name:  &'static str,
  pub label: &'static str,
  pub kind:  ColumnKind,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min:   Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max:   Option<i64>,
}

const fn col(name: &'static str, label: &'static str, kind: ColumnKind) -> Column {
  Column { name, label, kind, min: None, max: None }
}

const fn int(name: &'static str, label: &'static str, min: i64, max: Option<i64>) -> Column {
  Column { name, label, kind: ColumnKind::Int, min: Some(min), max }
}

/// A typed column value, used for filters and inline edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
  Bool(bool),
  Int(i64),
  Text(String),
  Date(NaiveDate),
}

impl Column {
  pub fn sortable(&self) -> bool {
    !matches!(self.kind, ColumnKind::Tags | ColumnKind::LongText)
  }

  /// Parse a query-string value. `DateTime` columns are filtered by their
  /// calendar date.
  pub fn parse_text(&self, raw: &str) -> Result<FieldValue, String> {
    let raw = raw.trim();
    match self.kind {
      ColumnKind::Bool => parse_bool(raw)
        .map(FieldValue::Bool)
        .ok_or_else(|| format!("expected a boolean, got {raw:?}")),
      ColumnKind::Int => raw
        .parse::<i64>()
        .map_err(|_| format!("expected an integer, got {raw:?}"))
        .and_then(|n| self.check_range(n))
        .map(FieldValue::Int),
      ColumnKind::Date | ColumnKind::DateTime => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(FieldValue::Date)
        .map_err(|_| format!("expected a YYYY-MM-DD date, got {raw:?}")),
      ColumnKind::Text | ColumnKind::LongText | ColumnKind::Tags => {
        Ok(FieldValue::Text(raw.to_owned()))
      }
    }
  }

  /// Parse a JSON value from an inline edit.
  pub fn parse_json(&self, value: &Value) -> Result<FieldValue, String> {
    match (self.kind, value) {
      (ColumnKind::Bool, Value::Bool(b)) => Ok(FieldValue::Bool(*b)),
      (ColumnKind::Int, Value::Number(n)) => n
        .as_i64()
        .ok_or_else(|| format!("expected an integer, got {n}"))
        .and_then(|n| self.check_range(n))
        .map(FieldValue::Int),
      (_, Value::String(s)) => self.parse_text(s),
      (_, other) => Err(format!("unexpected value {other}")),
    }
  }

  fn check_range(&self, n: i64) -> Result<i64, String> {
    match (self.min, self.max) {
      (Some(min), Some(max)) if n < min || n > max => {
        Err(format!("Number must be between {min} and {max}."))
      }
      (Some(min), None) if n < min => Err(format!("Number must be at least {min}.")),
      _ => Ok(n),
    }
  }
}

fn parse_bool(raw: &str) -> Option<bool> {
  match raw.to_ascii_lowercase().as_str() {
    "true" | "1" | "yes" | "y" | "on" => Some(true),
    "false" | "0" | "no" | "n" | "off" => Some(false),
    _ => None,
  }
}

// ─── Forms ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
  Text,
  TextArea,
  Url,
  Checkbox,
  Number,
  Date,
  /// Comma-separated tag input.
  Tags,
  Select { choices: &'static [&'static str] },
}

#[derive(Debug, Serialize)]
pub struct FormField {
  pub name:     &'static str,
  pub label:    &'static str,
  #[serde(flatten)]
  pub widget:   Widget,
  pub required: bool,
}

const fn field(name: &'static str, label: &'static str, widget: Widget) -> FormField {
  FormField { name, label, widget, required: false }
}

const fn required(name: &'static str, label: &'static str, widget: Widget) -> FormField {
  FormField { name, label, widget, required: true }
}

// ─── ModelView ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
  Asc,
  Desc,
}

#[derive(Debug, Serialize)]
pub struct ModelView {
  pub entity:       Entity,
  pub name:         &'static str,
  /// Every column the backend knows about, with its kind.
  pub columns:      &'static [Column],
  /// Columns shown in the list view.
  pub list_columns: &'static [&'static str],
  /// OR-combined, case-insensitive substring search.
  pub searchable:   &'static [&'static str],
  /// Exact-match filters.
  pub filters:      &'static [&'static str],
  /// Editable from the list view without the full form.
  pub editable:     &'static [&'static str],
  pub default_sort: &'static [(&'static str, SortDir)],
  pub can_create:   bool,
  pub can_edit:     bool,
  pub can_delete:   bool,
  pub form:         &'static [FormField],
}

impl ModelView {
  pub fn column(&'static self, name: &str) -> Result<&'static Column> {
    self
      .columns
      .iter()
      .find(|c| c.name == name)
      .ok_or_else(|| Error::UnknownColumn {
        entity: self.entity,
        column: name.to_owned(),
      })
  }

  pub fn permits(&self, operation: Operation) -> Result<()> {
    let allowed = match operation {
      Operation::Create => self.can_create,
      Operation::Edit => self.can_edit,
      Operation::Delete => self.can_delete,
    };
    if allowed {
      Ok(())
    } else {
      Err(Error::NotPermitted { entity: self.entity, operation })
    }
  }

  /// Resolve an inline edit against the `editable` whitelist.
  pub fn inline_value(
    &'static self,
    column: &str,
    value: &Value,
  ) -> Result<(&'static str, FieldValue)> {
    let col = self.column(column)?;
    if !self.editable.contains(&col.name) {
      return Err(Error::NotEditable {
        entity: self.entity,
        column: column.to_owned(),
      });
    }
    let parsed = col.parse_json(value).map_err(|m| single_error(col.name, m))?;
    Ok((col.name, parsed))
  }

  fn filter_value(&'static self, column: &str, raw: &str) -> Result<(&'static str, FieldValue)> {
    let col = self.column(column)?;
    if !self.filters.contains(&col.name) {
      return Err(Error::NotFilterable {
        entity: self.entity,
        column: column.to_owned(),
      });
    }
    let parsed = col.parse_text(raw).map_err(|m| single_error(col.name, m))?;
    Ok((col.name, parsed))
  }

  fn sort_column(&'static self, column: &str) -> Result<&'static str> {
    let col = self.column(column)?;
    if !col.sortable() {
      return Err(Error::NotSortable {
        entity: self.entity,
        column: column.to_owned(),
      });
    }
    Ok(col.name)
  }
}

fn single_error(field: &str, message: String) -> Error {
  let mut errors = ValidationErrors::new();
  errors.add(field, message);
  Error::Validation(errors)
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// A resolved admin list query.
#[derive(Debug, Clone)]
pub struct AdminQuery {
  pub search:   Option<String>,
  pub filters:  Vec<(&'static str, FieldValue)>,
  pub sort:     Vec<(&'static str, SortDir)>,
  /// 1-indexed.
  pub page:     u32,
  pub per_page: u32,
}

impl AdminQuery {
  /// Build a query from list-view parameters:
  /// `q` (search), `page`, `sort`, `desc`, and one key per filter column.
  pub fn from_params(
    view: &'static ModelView,
    params: &BTreeMap<String, String>,
  ) -> Result<Self> {
    let mut query = Self {
      search:   None,
      filters:  Vec::new(),
      sort:     view.default_sort.to_vec(),
      page:     1,
      per_page: ADMIN_PAGE_SIZE,
    };
    let descending = params.get("desc").and_then(|d| parse_bool(d)).unwrap_or(false);

    for (key, value) in params {
      match key.as_str() {
        "q" => {
          query.search = Some(value.trim().to_owned()).filter(|s| !s.is_empty());
        }
        "page" => {
          query.page = value.trim().parse::<u32>().unwrap_or(1).max(1);
        }
        "desc" => {}
        "sort" => {
          let dir = if descending { SortDir::Desc } else { SortDir::Asc };
          query.sort = vec![(view.sort_column(value)?, dir)];
        }
        column => query.filters.push(view.filter_value(column, value)?),
      }
    }

    Ok(query)
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// Any admin-managed row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
  Project(Project),
  Experience(Experience),
  Skill(Skill),
  Message(ContactMessage),
  Setting(Setting),
}

impl Record {
  pub fn id(&self) -> i64 {
    match self {
      Self::Project(r) => r.id,
      Self::Experience(r) => r.id,
      Self::Skill(r) => r.id,
      Self::Message(r) => r.id,
      Self::Setting(r) => r.id,
    }
  }
}

/// Read-only aggregate for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
  pub project_count:    u64,
  pub experience_count: u64,
  pub skill_count:      u64,
  pub unread_messages:  u64,
}

// ─── Views ───────────────────────────────────────────────────────────────────

pub static PROJECTS: ModelView = ModelView {
  entity:       Entity::Project,
  name:         "Projects",
  columns:      &[
    col("id", "ID", ColumnKind::Int),
    col("title", "Title", ColumnKind::Text),
    col("description", "Description", ColumnKind::LongText),
    col("short_description", "Short Description", ColumnKind::Text),
    col("image_url", "Image URL", ColumnKind::Text),
    col("demo_url", "Demo URL", ColumnKind::Text),
    col("github_url", "GitHub URL", ColumnKind::Text),
    col("technologies", "Technologies", ColumnKind::Tags),
    col("featured", "Featured", ColumnKind::Bool),
    col("created_at", "Created", ColumnKind::DateTime),
    int("order_index", "Order", 0, None),
  ],
  list_columns: &["title", "short_description", "featured", "technologies", "created_at"],
  searchable:   &["title", "description", "technologies"],
  filters:      &["featured", "created_at"],
  editable:     &["featured", "order_index"],
  default_sort: &[("order_index", SortDir::Asc)],
  can_create:   true,
  can_edit:     true,
  can_delete:   true,
  form:         &[
    required("title", "Project Title", Widget::Text),
    field("short_description", "Short Description", Widget::Text),
    required("description", "Description", Widget::TextArea),
    field("image_url", "Image URL", Widget::Url),
    field("demo_url", "Demo URL", Widget::Url),
    field("github_url", "GitHub URL", Widget::Url),
    field("technologies", "Technologies (comma-separated)", Widget::Tags),
    field("featured", "Featured Project", Widget::Checkbox),
    field("order_index", "Order Index", Widget::Number),
  ],
};

pub static EXPERIENCE: ModelView = ModelView {
  entity:       Entity::Experience,
  name:         "Experience",
  columns:      &[
    col("id", "ID", ColumnKind::Int),
    col("title", "Title", ColumnKind::Text),
    col("company", "Company", ColumnKind::Text),
    col("company_url", "Company URL", ColumnKind::Text),
    col("company_logo", "Company Logo", ColumnKind::Text),
    col("location", "Location", ColumnKind::Text),
    col("start_date", "Start Date", ColumnKind::Date),
    col("end_date", "End Date", ColumnKind::Date),
    col("description", "Description", ColumnKind::LongText),
    col("experience_type", "Type", ColumnKind::Text),
    int("order_index", "Order", 0, None),
  ],
  list_columns: &["title", "company", "start_date", "end_date", "experience_type"],
  searchable:   &["title", "company", "description"],
  filters:      &["experience_type", "start_date"],
  editable:     &[],
  default_sort: &[("start_date", SortDir::Desc)],
  can_create:   true,
  can_edit:     true,
  can_delete:   true,
  form:         &[
    required("title", "Job Title", Widget::Text),
    required("company", "Company", Widget::Text),
    field("company_url", "Company URL", Widget::Url),
    field("company_logo", "Company Logo URL", Widget::Url),
    field("location", "Location", Widget::Text),
    required("start_date", "Start Date", Widget::Date),
    field("end_date", "End Date", Widget::Date),
    field("description", "Description", Widget::TextArea),
    field("experience_type", "Type", Widget::Select { choices: EXPERIENCE_TYPES }),
    field("order_index", "Order Index", Widget::Number),
  ],
};

pub static SKILLS: ModelView = ModelView {
  entity:       Entity::Skill,
  name:         "Skills",
  columns:      &[
    col("id", "ID", ColumnKind::Int),
    col("name", "Name", ColumnKind::Text),
    col("category", "Category", ColumnKind::Text),
    int("proficiency", "Proficiency", 0, Some(100)),
    col("icon_class", "Icon Class", ColumnKind::Text),
    int("order_index", "Order", 0, None),
  ],
  list_columns: &["name", "category", "proficiency", "order_index"],
  searchable:   &["name", "category"],
  filters:      &["category"],
  editable:     &["proficiency", "order_index"],
  default_sort: &[("category", SortDir::Asc), ("order_index", SortDir::Asc)],
  can_create:   true,
  can_edit:     true,
  can_delete:   true,
  form:         &[
    required("name", "Skill Name", Widget::Text),
    required("category", "Category", Widget::Text),
    field("proficiency", "Proficiency (0-100)", Widget::Number),
    field("icon_class", "Icon Class", Widget::Text),
    field("order_index", "Order Index", Widget::Number),
  ],
};

pub static MESSAGES: ModelView = ModelView {
  entity:       Entity::Message,
  name:         "Messages",
  columns:      &[
    col("id", "ID", ColumnKind::Int),
    col("name", "Name", ColumnKind::Text),
    col("email", "Email", ColumnKind::Text),
    col("subject", "Subject", ColumnKind::Text),
    col("message", "Message", ColumnKind::LongText),
    col("created_at", "Received", ColumnKind::DateTime),
    col("read", "Read", ColumnKind::Bool),
  ],
  list_columns: &["name", "email", "subject", "created_at", "read"],
  searchable:   &["name", "email", "subject", "message"],
  filters:      &["read", "created_at"],
  editable:     &["read"],
  default_sort: &[("created_at", SortDir::Desc)],
  can_create:   false,
  can_edit:     false,
  can_delete:   true,
  form:         &[],
};

pub static SETTINGS: ModelView = ModelView {
  entity:       Entity::Setting,
  name:         "Site Settings",
  columns:      &[
    col("id", "ID", ColumnKind::Int),
    col("key", "Key", ColumnKind::Text),
    col("value", "Value", ColumnKind::LongText),
  ],
  list_columns: &["key", "value"],
  searchable:   &["key", "value"],
  filters:      &[],
  editable:     &[],
  default_sort: &[("key", SortDir::Asc)],
  can_create:   true,
  can_edit:     true,
  can_delete:   true,
  form:         &[
    required("key", "Key", Widget::Text),
    field("value", "Value", Widget::TextArea),
  ],
};
