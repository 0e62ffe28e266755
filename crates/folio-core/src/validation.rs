//! Field-level validation shared by the contact form and the admin forms.
//!
//! Errors are collected per field rather than failing on the first problem so
//! a form can be re-rendered with every message at once.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_owned()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Append every message of `other`.
  pub fn merge(&mut self, other: Self) {
    for (field, messages) in other.0 {
      self.0.entry(field).or_default().extend(messages);
    }
  }

  /// Messages for a single field; empty if the field is valid.
  pub fn field(&self, field: &str) -> &[String] {
    self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
  }

  /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`.
  pub fn finish<T>(self, value: T) -> Result<T, Self> {
    if self.is_empty() { Ok(value) } else { Err(self) }
  }

  // ── Checks ────────────────────────────────────────────────────────────────

  pub fn required(&mut self, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
      self.add(field, "This field is required.");
      return false;
    }
    true
  }

  pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
      self.add(field, format!("Field cannot be longer than {max} characters."));
    }
  }

  pub fn max_len_opt(&mut self, field: &str, value: Option<&str>, max: usize) {
    if let Some(v) = value {
      self.max_len(field, v, max);
    }
  }

  pub fn len_between(&mut self, field: &str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len < min || len > max {
      self.add(
        field,
        format!("Field must be between {min} and {max} characters long."),
      );
    }
  }

  pub fn in_range(&mut self, field: &str, value: i64, min: i64, max: i64) {
    if value < min || value > max {
      if max == i64::MAX {
        self.add(field, format!("Number must be at least {min}."));
      } else {
        self.add(field, format!("Number must be between {min} and {max}."));
      }
    }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in self.iter() {
      for m in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{field}: {m}")?;
        first = false;
      }
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

/// Trim an optional text input, mapping blank values to `None`.
pub fn clean_optional(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

/// Syntactic e-mail check: one `@`, a dot-atom local part of ASCII `atext`
/// characters and a dotted domain of ASCII alphanumeric/hyphen labels.
/// Quoted local parts and internationalised domains are rejected, so every
/// accepted address is also one the notifier can send a reply-to for.
pub fn is_valid_email(address: &str) -> bool {
  if !address.is_ascii() || address.chars().any(|c| c.is_whitespace() || c.is_control()) {
    return false;
  }
  let Some((local, domain)) = address.split_once('@') else {
    return false;
  };
  if local.is_empty()
    || local.len() > 64
    || local.starts_with('.')
    || local.ends_with('.')
    || local.contains("..")
    || !local.chars().all(is_atext)
    || domain.contains('@')
    || domain.len() > 255
  {
    return false;
  }

  let labels: Vec<&str> = domain.split('.').collect();
  labels.len() >= 2
    && labels.iter().all(|label| {
      !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// RFC 5322 `atext`, plus `.` between atoms.
fn is_atext(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '.' || "!#$%&'*+/=?^_`{|}~-".contains(c)
}
