//! Key-value site settings and the accessor used for editable site copy.
//!
//! The accessor is a stateless facade: every call goes to the store.

use serde::{Deserialize, Serialize};

use crate::{
  store::PortfolioStore,
  validation::ValidationErrors,
};

pub const KEY_MAX: usize = 50;

/// Well-known setting keys read by the public pages.
pub mod keys {
  pub const HERO_TITLE: &str = "hero_title";
  pub const HERO_SUBTITLE: &str = "hero_subtitle";
  pub const ABOUT_TEXT: &str = "about_text";
  pub const RESUME_URL: &str = "resume_url";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
  pub id:    i64,
  pub key:   String,
  pub value: String,
}

/// Admin form input for a setting.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingInput {
  #[serde(default)]
  pub key:   String,
  #[serde(default)]
  pub value: String,
}

/// Outcome of replacing an existing setting row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingUpdate {
  Updated(Setting),
  NotFound,
  /// The requested key already belongs to another row.
  KeyTaken,
}

impl SettingInput {
  pub fn validate(self) -> Result<Self, ValidationErrors> {
    let input = Self { key: self.key.trim().to_owned(), ..self };
    let mut errors = ValidationErrors::new();
    if errors.required("key", &input.key) {
      errors.max_len("key", &input.key, KEY_MAX);
    }
    errors.finish(input)
  }
}

/// The stored value for `key`, or `default` when the key is absent.
pub async fn get_setting<S: PortfolioStore>(
  store: &S,
  key: &str,
  default: &str,
) -> Result<String, S::Error> {
  Ok(store.get_setting(key).await?.unwrap_or_else(|| default.to_owned()))
}

/// The stored value for `key` if present and not blank.
pub async fn find_setting<S: PortfolioStore>(
  store: &S,
  key: &str,
) -> Result<Option<String>, S::Error> {
  Ok(store.get_setting(key).await?.filter(|v| !v.trim().is_empty()))
}

/// Upsert `key`; the write is durable when this returns.
pub async fn set_setting<S: PortfolioStore>(
  store: &S,
  key: &str,
  value: &str,
) -> Result<Setting, S::Error> {
  store.set_setting(key, value).await
}
