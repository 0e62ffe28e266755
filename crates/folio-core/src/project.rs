//! Projects and their technology tags.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::validation::{ValidationErrors, clean_optional};

pub const TITLE_MAX: usize = 100;
pub const SHORT_DESCRIPTION_MAX: usize = 200;
pub const URL_MAX: usize = 200;
pub const TECHNOLOGIES_MAX: usize = 300;

// ─── TechList ────────────────────────────────────────────────────────────────

/// An ordered list of technology tags.
///
/// Tags are trimmed, blank entries are dropped and duplicates (compared
/// case-insensitively) keep their first occurrence. Accepts either a
/// comma-separated string or a JSON array on input; always serialises as an
/// array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TechList(Vec<String>);

impl TechList {
  /// Parse a comma-separated tag string, e.g. `"Python, Docker ,  , AWS"`.
  pub fn parse(raw: &str) -> Self { Self::from_tags(raw.split(',')) }

  pub fn from_tags<I, T>(tags: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
  {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
      let tag = tag.as_ref().trim();
      if tag.is_empty() || out.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
        continue;
      }
      out.push(tag.to_owned());
    }
    Self(out)
  }

  pub fn as_slice(&self) -> &[String] { &self.0 }

  pub fn iter(&self) -> std::slice::Iter<'_, String> { self.0.iter() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Case-insensitive whole-tag membership.
  pub fn contains(&self, tag: &str) -> bool {
    self.0.iter().any(|t| t.eq_ignore_ascii_case(tag.trim()))
  }

  /// The tags joined back into the `", "`-separated form used by forms.
  pub fn joined(&self) -> String { self.0.join(", ") }

  pub fn into_vec(self) -> Vec<String> { self.0 }
}

impl fmt::Display for TechList {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.joined())
  }
}

impl<'a> IntoIterator for &'a TechList {
  type Item = &'a String;
  type IntoIter = std::slice::Iter<'a, String>;

  fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

impl<'de> Deserialize<'de> for TechList {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
      Text(String),
      Tags(Vec<String>),
    }

    Ok(match Raw::deserialize(deserializer)? {
      Raw::Text(s) => Self::parse(&s),
      Raw::Tags(v) => Self::from_tags(v),
    })
  }
}

// ─── Project ─────────────────────────────────────────────────────────────────

/// A portfolio project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
  pub id:                i64,
  pub title:             String,
  pub description:       String,
  pub short_description: Option<String>,
  pub image_url:         Option<String>,
  pub demo_url:          Option<String>,
  pub github_url:        Option<String>,
  pub technologies:      TechList,
  pub featured:          bool,
  /// Set by the store on creation; never changes afterwards.
  pub created_at:        DateTime<Utc>,
  /// Display position, ascending.
  pub order_index:       i64,
}

// ─── NewProject ──────────────────────────────────────────────────────────────

/// Input to project create and full-edit operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProject {
  #[serde(default)]
  pub title:             String,
  #[serde(default)]
  pub description:       String,
  #[serde(default)]
  pub short_description: Option<String>,
  #[serde(default)]
  pub image_url:         Option<String>,
  #[serde(default)]
  pub demo_url:          Option<String>,
  #[serde(default)]
  pub github_url:        Option<String>,
  #[serde(default)]
  pub technologies:      TechList,
  #[serde(default)]
  pub featured:          bool,
  #[serde(default)]
  pub order_index:       i64,
}

impl NewProject {
  pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      description: description.into(),
      ..Self::default()
    }
  }

  /// Normalise whitespace and check every field against the form rules.
  pub fn validate(self) -> Result<Self, ValidationErrors> {
    let input = Self {
      title: self.title.trim().to_owned(),
      description: self.description.trim().to_owned(),
      short_description: clean_optional(self.short_description),
      image_url: clean_optional(self.image_url),
      demo_url: clean_optional(self.demo_url),
      github_url: clean_optional(self.github_url),
      ..self
    };

    let mut errors = ValidationErrors::new();
    if errors.required("title", &input.title) {
      errors.max_len("title", &input.title, TITLE_MAX);
    }
    errors.required("description", &input.description);
    errors.max_len_opt(
      "short_description",
      input.short_description.as_deref(),
      SHORT_DESCRIPTION_MAX,
    );
    errors.max_len_opt("image_url", input.image_url.as_deref(), URL_MAX);
    errors.max_len_opt("demo_url", input.demo_url.as_deref(), URL_MAX);
    errors.max_len_opt("github_url", input.github_url.as_deref(), URL_MAX);
    errors.max_len("technologies", &input.technologies.joined(), TECHNOLOGIES_MAX);
    errors.in_range("order_index", input.order_index, 0, i64::MAX);

    errors.finish(input)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tech_list_trims_and_drops_blank_segments() {
    let tags = TechList::parse("Python, Docker ,  , AWS");
    assert_eq!(tags.as_slice(), ["Python", "Docker", "AWS"]);
  }

  #[test]
  fn tech_list_of_empty_string_is_empty() {
    assert!(TechList::parse("").is_empty());
    assert!(TechList::parse(" , ,").is_empty());
  }

  #[test]
  fn tech_list_drops_case_insensitive_duplicates() {
    let tags = TechList::parse("Rust, rust, Go, RUST");
    assert_eq!(tags.as_slice(), ["Rust", "Go"]);
  }

  #[test]
  fn tech_list_contains_matches_whole_tags_only() {
    let tags = TechList::parse("JavaScript, TypeScript");
    assert!(tags.contains("javascript"));
    assert!(!tags.contains("Java"));
  }

  #[test]
  fn tech_list_deserialises_from_string_or_array() {
    let from_str: TechList = serde_json::from_str(r#""Linux, Docker""#).unwrap();
    let from_arr: TechList = serde_json::from_str(r#"["Linux", " Docker "]"#).unwrap();
    assert_eq!(from_str, from_arr);
    assert_eq!(serde_json::to_string(&from_str).unwrap(), r#"["Linux","Docker"]"#);
  }

  #[test]
  fn validate_reports_every_bad_field() {
    let input = NewProject {
      title: "x".repeat(101),
      description: "   ".into(),
      short_description: Some("y".repeat(201)),
      order_index: -1,
      ..NewProject::default()
    };
    let errors = input.validate().unwrap_err();
    assert_eq!(errors.field("title").len(), 1);
    assert_eq!(errors.field("description").len(), 1);
    assert_eq!(errors.field("short_description").len(), 1);
    assert_eq!(errors.field("order_index").len(), 1);
  }

  #[test]
  fn validate_blanks_optional_urls() {
    let mut input = NewProject::new(" Homelab ", "Self-hosted services");
    input.demo_url = Some("  ".into());
    let input = input.validate().unwrap();
    assert_eq!(input.title, "Homelab");
    assert_eq!(input.demo_url, None);
  }
}
