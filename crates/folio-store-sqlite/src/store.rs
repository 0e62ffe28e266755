//! [`SqliteStore`]: the SQLite implementation of [`PortfolioStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use rusqlite::params;

use folio_core::{
  admin::{AdminQuery, DashboardStats, Entity, FieldValue, ModelView, Record},
  contact::{ContactMessage, NewContactMessage},
  experience::{Experience, NewExperience},
  project::{NewProject, Project},
  settings::{Setting, SettingInput, SettingUpdate},
  skill::{NewSkill, Skill},
  store::{Page, PortfolioStore, ProjectQuery, SkillOrder},
};

use crate::{
  Error, Result, admin,
  encode::{RawRecord, RawSkill, encode_dt, encode_field},
  queries,
  schema::SCHEMA,
  seed::{self, SeedReport},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Folio portfolio store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection handle is shared.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Flush and close the connection. Pending calls on clones fail afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  /// Insert the starter content. Rows that already exist (matched on their
  /// natural key) are left untouched, so running this twice is harmless.
  pub async fn seed(&self) -> Result<SeedReport> {
    let now = encode_dt(Utc::now());
    let report = self
      .conn
      .call(move |conn| Ok(seed::apply(conn, &now)?))
      .await?;
    tracing::info!(
      projects = report.projects,
      experience = report.experience,
      skills = report.skills,
      settings = report.settings,
      "seeded starter content"
    );
    Ok(report)
  }

  async fn record(&self, entity: Entity, id: i64) -> Result<Option<Record>> {
    let raw = self
      .conn
      .call(move |conn| Ok(queries::fetch_record(conn, entity, id)?))
      .await?;
    raw.map(RawRecord::into_record).transpose()
  }
}

// ─── PortfolioStore impl ─────────────────────────────────────────────────────

impl PortfolioStore for SqliteStore {
  type Error = Error;

  // ── Projects ──────────────────────────────────────────────────────────────

  async fn create_project(&self, input: NewProject) -> Result<Project> {
    let created_at = Utc::now().trunc_subsecs(6);
    let at_str = encode_dt(created_at);

    let (id, input) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let id = queries::insert_project(&tx, &input, &at_str)?;
        tx.commit()?;
        Ok((id, input))
      })
      .await?;

    Ok(Project {
      id,
      title: input.title,
      description: input.description,
      short_description: input.short_description,
      image_url: input.image_url,
      demo_url: input.demo_url,
      github_url: input.github_url,
      technologies: input.technologies,
      featured: input.featured,
      created_at,
      order_index: input.order_index,
    })
  }

  async fn get_project(&self, id: i64) -> Result<Option<Project>> {
    let raw = self
      .conn
      .call(move |conn| Ok(queries::fetch_project(conn, id)?))
      .await?;
    raw.map(|r| r.into_project()).transpose()
  }

  async fn update_project(&self, id: i64, input: NewProject) -> Result<Option<Project>> {
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !queries::update_project(&tx, id, &input)? {
          return Ok(None);
        }
        let raw = queries::fetch_project(&tx, id)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;
    raw.map(|r| r.into_project()).transpose()
  }

  async fn list_projects<'a>(&'a self, query: &'a ProjectQuery) -> Result<Vec<Project>> {
    let query = query.clone();
    let raws = self
      .conn
      .call(move |conn| Ok(queries::list_projects(conn, &query)?))
      .await?;
    raws.into_iter().map(|r| r.into_project()).collect()
  }

  async fn count_projects<'a>(&'a self, query: &'a ProjectQuery) -> Result<u64> {
    let query = query.clone();
    let n = self
      .conn
      .call(move |conn| Ok(queries::count_projects(conn, &query)?))
      .await?;
    Ok(n)
  }

  async fn list_technologies(&self) -> Result<Vec<String>> {
    let tags = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT DISTINCT name FROM project_technologies")?;
        let tags = stmt
          .query_map([], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(tags)
      })
      .await?;
    Ok(tags)
  }

  // ── Experience ────────────────────────────────────────────────────────────

  async fn create_experience(&self, input: NewExperience) -> Result<Experience> {
    let (id, input) = self
      .conn
      .call(move |conn| {
        let id = queries::insert_experience(conn, &input)?;
        Ok((id, input))
      })
      .await?;

    Ok(Experience {
      id,
      title: input.title,
      company: input.company,
      company_url: input.company_url,
      company_logo: input.company_logo,
      location: input.location,
      start_date: input.start_date,
      end_date: input.end_date,
      description: input.description,
      experience_type: input.experience_type,
      order_index: input.order_index,
    })
  }

  async fn update_experience(
    &self,
    id: i64,
    input: NewExperience,
  ) -> Result<Option<Experience>> {
    let raw = self
      .conn
      .call(move |conn| {
        if !queries::update_experience(conn, id, &input)? {
          return Ok(None);
        }
        Ok(queries::fetch_experience(conn, id)?)
      })
      .await?;
    raw.map(|r| r.into_experience()).transpose()
  }

  async fn list_experiences(&self) -> Result<Vec<Experience>> {
    let raws = self
      .conn
      .call(|conn| Ok(queries::list_experiences(conn)?))
      .await?;
    raws.into_iter().map(|r| r.into_experience()).collect()
  }

  // ── Skills ────────────────────────────────────────────────────────────────

  async fn create_skill(&self, input: NewSkill) -> Result<Skill> {
    let (id, input) = self
      .conn
      .call(move |conn| {
        let id = queries::insert_skill(conn, &input)?;
        Ok((id, input))
      })
      .await?;

    RawSkill {
      id,
      name: input.name,
      category: input.category,
      proficiency: input.proficiency,
      icon_class: input.icon_class,
      order_index: input.order_index,
    }
    .into_skill()
  }

  async fn update_skill(&self, id: i64, input: NewSkill) -> Result<Option<Skill>> {
    let raw = self
      .conn
      .call(move |conn| {
        if !queries::update_skill(conn, id, &input)? {
          return Ok(None);
        }
        Ok(queries::fetch_skill(conn, id)?)
      })
      .await?;
    raw.map(|r| r.into_skill()).transpose()
  }

  async fn list_skills(&self, order: SkillOrder) -> Result<Vec<Skill>> {
    let raws = self
      .conn
      .call(move |conn| Ok(queries::list_skills(conn, order)?))
      .await?;
    raws.into_iter().map(|r| r.into_skill()).collect()
  }

  // ── Contact messages ──────────────────────────────────────────────────────

  async fn create_message(&self, input: NewContactMessage) -> Result<ContactMessage> {
    let created_at = Utc::now().trunc_subsecs(6);
    let at_str = encode_dt(created_at);

    let (id, input) = self
      .conn
      .call(move |conn| {
        let id = queries::insert_message(conn, &input, &at_str)?;
        Ok((id, input))
      })
      .await?;

    Ok(ContactMessage {
      id,
      name: input.name,
      email: input.email,
      subject: input.subject,
      message: input.message,
      created_at,
      read: false,
    })
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn get_setting<'a>(&'a self, key: &'a str) -> Result<Option<String>> {
    let key = key.to_owned();
    let value = self
      .conn
      .call(move |conn| Ok(queries::setting_value(conn, &key)?))
      .await?;
    Ok(value)
  }

  async fn set_setting<'a>(&'a self, key: &'a str, value: &'a str) -> Result<Setting> {
    let key = key.to_owned();
    let value = value.to_owned();
    let setting = self
      .conn
      .call(move |conn| Ok(queries::upsert_setting(conn, &key, &value)?))
      .await?;
    Ok(setting)
  }

  async fn update_setting(&self, id: i64, input: SettingInput) -> Result<SettingUpdate> {
    let outcome = self
      .conn
      .call(move |conn| {
        let taken: bool = conn.query_row(
          "SELECT EXISTS (SELECT 1 FROM site_settings WHERE key = ?1 AND id != ?2)",
          params![input.key, id],
          |r| r.get(0),
        )?;
        if taken {
          return Ok(SettingUpdate::KeyTaken);
        }
        let changed = conn.execute(
          "UPDATE site_settings SET key = ?2, value = ?3 WHERE id = ?1",
          params![id, input.key, input.value],
        )?;
        if changed == 0 {
          return Ok(SettingUpdate::NotFound);
        }
        Ok(SettingUpdate::Updated(Setting {
          id,
          key: input.key,
          value: input.value,
        }))
      })
      .await?;
    Ok(outcome)
  }

  // ── Admin ─────────────────────────────────────────────────────────────────

  async fn admin_list<'a>(
    &'a self,
    view: &'static ModelView,
    query: &'a AdminQuery,
  ) -> Result<Page<Record>> {
    let q = query.clone();
    let (raws, total) = self
      .conn
      .call(move |conn| {
        let (ids, total) = admin::list_ids(conn, view, &q)?;
        let mut raws = Vec::with_capacity(ids.len());
        for id in ids {
          if let Some(raw) = queries::fetch_record(conn, view.entity, id)? {
            raws.push(raw);
          }
        }
        Ok((raws, total))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawRecord::into_record)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, query.page, query.per_page, total))
  }

  async fn admin_get(&self, entity: Entity, id: i64) -> Result<Option<Record>> {
    self.record(entity, id).await
  }

  async fn admin_update_column(
    &self,
    entity: Entity,
    id: i64,
    column: &'static str,
    value: FieldValue,
  ) -> Result<Option<Record>> {
    let table = queries::table(entity);
    let value = encode_field(&value);
    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          &format!("UPDATE \"{table}\" SET \"{column}\" = ?1 WHERE id = ?2"),
          params![value, id],
        )?;
        Ok(n > 0)
      })
      .await?;
    if !changed {
      return Ok(None);
    }
    self.record(entity, id).await
  }

  async fn admin_delete(&self, entity: Entity, id: i64) -> Result<bool> {
    let table = queries::table(entity);
    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(&format!("DELETE FROM \"{table}\" WHERE id = ?1"), [id])?;
        Ok(n > 0)
      })
      .await?;
    Ok(deleted)
  }

  async fn dashboard_stats(&self) -> Result<DashboardStats> {
    let (projects, experience, skills, unread): (i64, i64, i64, i64) = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT
             (SELECT COUNT(*) FROM projects),
             (SELECT COUNT(*) FROM experience),
             (SELECT COUNT(*) FROM skills),
             (SELECT COUNT(*) FROM contact_messages WHERE read = 0)",
          [],
          |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )?)
      })
      .await?;

    Ok(DashboardStats {
      project_count:    projects as u64,
      experience_count: experience as u64,
      skill_count:      skills as u64,
      unread_messages:  unread as u64,
    })
  }
}
