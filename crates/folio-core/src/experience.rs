//! Work, education and volunteer history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::validation::{ValidationErrors, clean_optional};

pub const TITLE_MAX: usize = 100;
pub const COMPANY_MAX: usize = 100;
pub const URL_MAX: usize = 200;
pub const LOCATION_MAX: usize = 100;

/// Values accepted for [`ExperienceType`], as offered by the admin form.
pub const EXPERIENCE_TYPES: &[&str] = &["work", "education", "volunteer"];

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExperienceType {
  #[default]
  Work,
  Education,
  Volunteer,
}

/// One entry of the experience timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
  pub id:              i64,
  pub title:           String,
  pub company:         String,
  pub company_url:     Option<String>,
  pub company_logo:    Option<String>,
  pub location:        Option<String>,
  pub start_date:      NaiveDate,
  /// `None` means the position is ongoing.
  pub end_date:        Option<NaiveDate>,
  pub description:     Option<String>,
  pub experience_type: ExperienceType,
  pub order_index:     i64,
}

impl Experience {
  pub fn is_current(&self) -> bool { self.end_date.is_none() }

  /// `"Mar 2025 - Present"` or `"Aug 2019 - Nov 2023"`.
  pub fn duration(&self) -> String {
    let start = self.start_date.format("%b %Y");
    match self.end_date {
      Some(end) => format!("{start} - {}", end.format("%b %Y")),
      None => format!("{start} - Present"),
    }
  }
}

/// Input to experience create and full-edit operations.
#[derive(Debug, Clone)]
pub struct NewExperience {
  pub title:           String,
  pub company:         String,
  pub company_url:     Option<String>,
  pub company_logo:    Option<String>,
  pub location:        Option<String>,
  pub start_date:      NaiveDate,
  pub end_date:        Option<NaiveDate>,
  pub description:     Option<String>,
  pub experience_type: ExperienceType,
  pub order_index:     i64,
}

/// Admin form state for an experience entry. Dates and the type arrive as
/// text so a missing or malformed value is reported against its field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperienceForm {
  #[serde(default)]
  pub title:           String,
  #[serde(default)]
  pub company:         String,
  #[serde(default)]
  pub company_url:     Option<String>,
  #[serde(default)]
  pub company_logo:    Option<String>,
  #[serde(default)]
  pub location:        Option<String>,
  /// `YYYY-MM-DD`
  #[serde(default)]
  pub start_date:      Option<String>,
  #[serde(default)]
  pub end_date:        Option<String>,
  #[serde(default)]
  pub description:     Option<String>,
  #[serde(default)]
  pub experience_type: Option<String>,
  #[serde(default)]
  pub order_index:     i64,
}

impl ExperienceForm {
  pub fn validate(self) -> Result<NewExperience, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let start_date = parse_date(&mut errors, "start_date", self.start_date.as_deref());
    if start_date.is_none() && errors.field("start_date").is_empty() {
      errors.add("start_date", "This field is required.");
    }
    let end_date = parse_date(&mut errors, "end_date", self.end_date.as_deref());

    let experience_type = match self.experience_type.as_deref().map(str::trim) {
      None | Some("") => ExperienceType::default(),
      Some(raw) => raw.parse().unwrap_or_else(|_| {
        errors.add("experience_type", "Not a valid choice.");
        ExperienceType::default()
      }),
    };

    let input = NewExperience {
      title: self.title,
      company: self.company,
      company_url: self.company_url,
      company_logo: self.company_logo,
      location: self.location,
      // Stand-in only; a missing start date has already been reported.
      start_date: start_date.unwrap_or(NaiveDate::MIN),
      end_date,
      description: self.description,
      experience_type,
      order_index: self.order_index,
    };

    match input.validate() {
      Ok(input) => errors.finish(input),
      Err(more) => {
        errors.merge(more);
        Err(errors)
      }
    }
  }
}

/// Blank values are `None`; anything else must be an ISO date.
fn parse_date(errors: &mut ValidationErrors, field: &str, raw: Option<&str>) -> Option<NaiveDate> {
  let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;
  match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    Ok(date) => Some(date),
    Err(_) => {
      errors.add(field, "Not a valid date value.");
      None
    }
  }
}

impl NewExperience {
  pub fn new(
    title: impl Into<String>,
    company: impl Into<String>,
    start_date: NaiveDate,
  ) -> Self {
    Self {
      title: title.into(),
      company: company.into(),
      company_url: None,
      company_logo: None,
      location: None,
      start_date,
      end_date: None,
      description: None,
      experience_type: ExperienceType::default(),
      order_index: 0,
    }
  }

  pub fn validate(self) -> Result<Self, ValidationErrors> {
    let input = Self {
      title: self.title.trim().to_owned(),
      company: self.company.trim().to_owned(),
      company_url: clean_optional(self.company_url),
      company_logo: clean_optional(self.company_logo),
      location: clean_optional(self.location),
      description: clean_optional(self.description),
      ..self
    };

    let mut errors = ValidationErrors::new();
    if errors.required("title", &input.title) {
      errors.max_len("title", &input.title, TITLE_MAX);
    }
    if errors.required("company", &input.company) {
      errors.max_len("company", &input.company, COMPANY_MAX);
    }
    errors.max_len_opt("company_url", input.company_url.as_deref(), URL_MAX);
    errors.max_len_opt("company_logo", input.company_logo.as_deref(), URL_MAX);
    errors.max_len_opt("location", input.location.as_deref(), LOCATION_MAX);
    if let Some(end) = input.end_date
      && end < input.start_date
    {
      errors.add("end_date", "End date must not be before the start date.");
    }
    errors.in_range("order_index", input.order_index, 0, i64::MAX);

    errors.finish(input)
  }
}
