//! Skills shown on the home and resume pages.

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationErrors, clean_optional};

pub const NAME_MAX: usize = 50;
pub const CATEGORY_MAX: usize = 50;
pub const ICON_CLASS_MAX: usize = 50;
pub const DEFAULT_PROFICIENCY: i64 = 50;

/// Category suggestions offered by the admin form; any label is accepted.
pub const CATEGORY_SUGGESTIONS: &[&str] =
  &["frontend", "backend", "database", "tools", "languages", "other"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
  pub id:          i64,
  pub name:        String,
  /// Grouping key for display.
  pub category:    String,
  /// 0–100.
  pub proficiency: u8,
  /// Optional icon style hint, e.g. `"fab fa-rust"`.
  pub icon_class:  Option<String>,
  pub order_index: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSkill {
  #[serde(default)]
  pub name:        String,
  #[serde(default)]
  pub category:    String,
  #[serde(default = "default_proficiency")]
  pub proficiency: i64,
  #[serde(default)]
  pub icon_class:  Option<String>,
  #[serde(default)]
  pub order_index: i64,
}

fn default_proficiency() -> i64 { DEFAULT_PROFICIENCY }

impl NewSkill {
  pub fn new(name: impl Into<String>, category: impl Into<String>, proficiency: i64) -> Self {
    Self {
      name: name.into(),
      category: category.into(),
      proficiency,
      icon_class: None,
      order_index: 0,
    }
  }

  pub fn validate(self) -> Result<Self, ValidationErrors> {
    let input = Self {
      name: self.name.trim().to_owned(),
      category: self.category.trim().to_owned(),
      icon_class: clean_optional(self.icon_class),
      ..self
    };

    let mut errors = ValidationErrors::new();
    if errors.required("name", &input.name) {
      errors.max_len("name", &input.name, NAME_MAX);
    }
    if errors.required("category", &input.category) {
      errors.max_len("category", &input.category, CATEGORY_MAX);
    }
    errors.in_range("proficiency", input.proficiency, 0, 100);
    errors.max_len_opt("icon_class", input.icon_class.as_deref(), ICON_CLASS_MAX);
    errors.in_range("order_index", input.order_index, 0, i64::MAX);

    errors.finish(input)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn proficiency_must_be_a_percentage() {
    assert!(NewSkill::new("Rust", "languages", 100).validate().is_ok());
    assert!(NewSkill::new("Rust", "languages", 0).validate().is_ok());

    let errors = NewSkill::new("Rust", "languages", 101).validate().unwrap_err();
    assert_eq!(errors.field("proficiency"), ["Number must be between 0 and 100."]);
  }

  #[test]
  fn proficiency_defaults_to_fifty() {
    let input: NewSkill =
      serde_json::from_str(r#"{"name":"Go","category":"languages"}"#).unwrap();
    assert_eq!(input.proficiency, 50);
  }
}
