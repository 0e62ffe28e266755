//! Contact messages submitted through the public form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationErrors, is_valid_email};

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const EMAIL_MAX: usize = 120;
pub const SUBJECT_MAX: usize = 200;
pub const MESSAGE_MIN: usize = 10;
pub const MESSAGE_MAX: usize = 1000;

/// A persisted contact submission. Admins may toggle `read` or delete it but
/// never create one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
  pub id:         i64,
  pub name:       String,
  pub email:      String,
  pub subject:    Option<String>,
  pub message:    String,
  pub created_at: DateTime<Utc>,
  pub read:       bool,
}

/// Raw form state exactly as submitted. Kept around so a rejected form can be
/// rendered again with the visitor's input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
  #[serde(default)]
  pub name:    String,
  #[serde(default)]
  pub email:   String,
  #[serde(default)]
  pub subject: String,
  #[serde(default)]
  pub message: String,
}

/// A validated submission, ready to persist. `created_at` and `read` are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactMessage {
  pub name:    String,
  pub email:   String,
  pub subject: Option<String>,
  pub message: String,
}

impl ContactForm {
  pub fn validate(&self) -> Result<NewContactMessage, ValidationErrors> {
    let name = self.name.trim();
    let email = self.email.trim();
    let subject = self.subject.trim();
    let message = self.message.trim();

    let mut errors = ValidationErrors::new();
    if errors.required("name", name) {
      errors.len_between("name", name, NAME_MIN, NAME_MAX);
    }
    if errors.required("email", email) {
      if !is_valid_email(email) {
        errors.add("email", "Invalid email address.");
      } else {
        errors.max_len("email", email, EMAIL_MAX);
      }
    }
    errors.max_len("subject", subject, SUBJECT_MAX);
    if errors.required("message", message) {
      errors.len_between("message", message, MESSAGE_MIN, MESSAGE_MAX);
    }

    errors.finish(NewContactMessage {
      name:    name.to_owned(),
      email:   email.to_owned(),
      subject: (!subject.is_empty()).then(|| subject.to_owned()),
      message: message.to_owned(),
    })
  }
}
