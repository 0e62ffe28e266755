//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 UTC strings with fixed microsecond precision, so
//! lexical order matches chronological order. Calendar dates are
//! `YYYY-MM-DD`. Booleans are `0`/`1` integers.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use folio_core::{
  admin::{FieldValue, Record},
  contact::ContactMessage,
  experience::{Experience, ExperienceType},
  project::{Project, TechList},
  settings::Setting,
  skill::Skill,
};
use rusqlite::{Row, types::Value};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Enums and values ────────────────────────────────────────────────────────

pub fn encode_experience_type(t: ExperienceType) -> &'static str {
  match t {
    ExperienceType::Work => "work",
    ExperienceType::Education => "education",
    ExperienceType::Volunteer => "volunteer",
  }
}

pub fn decode_experience_type(s: &str) -> Result<ExperienceType> {
  s.parse().map_err(|_| Error::Decode {
    column: "experience_type",
    value:  s.to_owned(),
  })
}

/// Bind value for a filter or inline edit.
pub fn encode_field(value: &FieldValue) -> Value {
  match value {
    FieldValue::Bool(b) => Value::Integer(i64::from(*b)),
    FieldValue::Int(n) => Value::Integer(*n),
    FieldValue::Text(s) => Value::Text(s.clone()),
    FieldValue::Date(d) => Value::Text(encode_date(*d)),
  }
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// Column list matching [`RawProject::from_row`].
pub const PROJECT_COLUMNS: &str = "id, title, description, short_description, image_url, \
                                   demo_url, github_url, featured, created_at, order_index";

/// Raw values read directly from a `projects` row plus its tags.
pub struct RawProject {
  pub id:                i64,
  pub title:             String,
  pub description:       String,
  pub short_description: Option<String>,
  pub image_url:         Option<String>,
  pub demo_url:          Option<String>,
  pub github_url:        Option<String>,
  pub featured:          bool,
  pub created_at:        String,
  pub order_index:       i64,
  pub technologies:      Vec<String>,
}

impl RawProject {
  /// `technologies` is filled in separately from `project_technologies`.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      title:             row.get(1)?,
      description:       row.get(2)?,
      short_description: row.get(3)?,
      image_url:         row.get(4)?,
      demo_url:          row.get(5)?,
      github_url:        row.get(6)?,
      featured:          row.get(7)?,
      created_at:        row.get(8)?,
      order_index:       row.get(9)?,
      technologies:      Vec::new(),
    })
  }

  pub fn into_project(self) -> Result<Project> {
    Ok(Project {
      id:                self.id,
      title:             self.title,
      description:       self.description,
      short_description: self.short_description,
      image_url:         self.image_url,
      demo_url:          self.demo_url,
      github_url:        self.github_url,
      technologies:      TechList::from_tags(self.technologies),
      featured:          self.featured,
      created_at:        decode_dt(&self.created_at)?,
      order_index:       self.order_index,
    })
  }
}

pub const EXPERIENCE_COLUMNS: &str = "id, title, company, company_url, company_logo, location, \
                                      start_date, end_date, description, experience_type, \
                                      order_index";

pub struct RawExperience {
  pub id:              i64,
  pub title:           String,
  pub company:         String,
  pub company_url:     Option<String>,
  pub company_logo:    Option<String>,
  pub location:        Option<String>,
  pub start_date:      String,
  pub end_date:        Option<String>,
  pub description:     Option<String>,
  pub experience_type: String,
  pub order_index:     i64,
}

impl RawExperience {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      title:           row.get(1)?,
      company:         row.get(2)?,
      company_url:     row.get(3)?,
      company_logo:    row.get(4)?,
      location:        row.get(5)?,
      start_date:      row.get(6)?,
      end_date:        row.get(7)?,
      description:     row.get(8)?,
      experience_type: row.get(9)?,
      order_index:     row.get(10)?,
    })
  }

  pub fn into_experience(self) -> Result<Experience> {
    Ok(Experience {
      id:              self.id,
      title:           self.title,
      company:         self.company,
      company_url:     self.company_url,
      company_logo:    self.company_logo,
      location:        self.location,
      start_date:      decode_date(&self.start_date)?,
      end_date:        self.end_date.as_deref().map(decode_date).transpose()?,
      description:     self.description,
      experience_type: decode_experience_type(&self.experience_type)?,
      order_index:     self.order_index,
    })
  }
}

pub const SKILL_COLUMNS: &str = "id, name, category, proficiency, icon_class, order_index";

pub struct RawSkill {
  pub id:          i64,
  pub name:        String,
  pub category:    String,
  pub proficiency: i64,
  pub icon_class:  Option<String>,
  pub order_index: i64,
}

impl RawSkill {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      category:    row.get(2)?,
      proficiency: row.get(3)?,
      icon_class:  row.get(4)?,
      order_index: row.get(5)?,
    })
  }

  pub fn into_skill(self) -> Result<Skill> {
    let proficiency = u8::try_from(self.proficiency)
      .ok()
      .filter(|p| *p <= 100)
      .ok_or_else(|| Error::Decode {
        column: "proficiency",
        value:  self.proficiency.to_string(),
      })?;
    Ok(Skill {
      id: self.id,
      name: self.name,
      category: self.category,
      proficiency,
      icon_class: self.icon_class,
      order_index: self.order_index,
    })
  }
}

pub const MESSAGE_COLUMNS: &str = "id, name, email, subject, message, created_at, read";

pub struct RawMessage {
  pub id:         i64,
  pub name:       String,
  pub email:      String,
  pub subject:    Option<String>,
  pub message:    String,
  pub created_at: String,
  pub read:       bool,
}

impl RawMessage {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      subject:    row.get(3)?,
      message:    row.get(4)?,
      created_at: row.get(5)?,
      read:       row.get(6)?,
    })
  }

  pub fn into_message(self) -> Result<ContactMessage> {
    Ok(ContactMessage {
      id:         self.id,
      name:       self.name,
      email:      self.email,
      subject:    self.subject,
      message:    self.message,
      created_at: decode_dt(&self.created_at)?,
      read:       self.read,
    })
  }
}

pub const SETTING_COLUMNS: &str = "id, key, value";

pub fn setting_from_row(row: &Row<'_>) -> rusqlite::Result<Setting> {
  Ok(Setting {
    id:    row.get(0)?,
    key:   row.get(1)?,
    value: row.get(2)?,
  })
}

/// Any raw admin row; decoded outside the connection thread.
pub enum RawRecord {
  Project(RawProject),
  Experience(RawExperience),
  Skill(RawSkill),
  Message(RawMessage),
  Setting(Setting),
}

impl RawRecord {
  pub fn into_record(self) -> Result<Record> {
    Ok(match self {
      Self::Project(r) => Record::Project(r.into_project()?),
      Self::Experience(r) => Record::Experience(r.into_experience()?),
      Self::Skill(r) => Record::Skill(r.into_skill()?),
      Self::Message(r) => Record::Message(r.into_message()?),
      Self::Setting(s) => Record::Setting(s),
    })
  }
}
