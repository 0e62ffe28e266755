//! Synchronous row-level helpers run on the connection thread.
//!
//! Shared by the [`PortfolioStore`](folio_core::store::PortfolioStore) impl
//! and the seeder so both write rows the same way.

use folio_core::{
  admin::Entity,
  contact::NewContactMessage,
  experience::NewExperience,
  project::NewProject,
  settings::Setting,
  skill::NewSkill,
  store::{ProjectOrder, ProjectQuery, SkillOrder},
};
use rusqlite::{Connection, OptionalExtension as _, params, types::Value};

use crate::encode::{
  EXPERIENCE_COLUMNS, MESSAGE_COLUMNS, PROJECT_COLUMNS, RawExperience, RawMessage, RawProject,
  RawRecord, RawSkill, SETTING_COLUMNS, SKILL_COLUMNS, encode_date, encode_experience_type,
  setting_from_row,
};

// ─── Projects ────────────────────────────────────────────────────────────────

pub fn load_tags(conn: &Connection, project_id: i64) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare_cached(
    "SELECT name FROM project_technologies WHERE project_id = ?1 ORDER BY position",
  )?;
  let tags = stmt
    .query_map([project_id], |r| r.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;
  Ok(tags)
}

fn replace_tags(conn: &Connection, project_id: i64, tags: &[String]) -> rusqlite::Result<()> {
  conn.execute("DELETE FROM project_technologies WHERE project_id = ?1", [project_id])?;
  let mut stmt = conn.prepare_cached(
    "INSERT INTO project_technologies (project_id, position, name) VALUES (?1, ?2, ?3)",
  )?;
  for (position, name) in tags.iter().enumerate() {
    stmt.execute(params![project_id, position as i64, name])?;
  }
  Ok(())
}

fn with_tags(conn: &Connection, mut raw: RawProject) -> rusqlite::Result<RawProject> {
  raw.technologies = load_tags(conn, raw.id)?;
  Ok(raw)
}

pub fn fetch_project(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawProject>> {
  conn
    .query_row(
      &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
      [id],
      RawProject::from_row,
    )
    .optional()?
    .map(|raw| with_tags(conn, raw))
    .transpose()
}

pub fn insert_project(
  conn: &Connection,
  input: &NewProject,
  created_at: &str,
) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO projects (
       title, description, short_description, image_url, demo_url, github_url,
       featured, created_at, order_index
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    params![
      input.title,
      input.description,
      input.short_description,
      input.image_url,
      input.demo_url,
      input.github_url,
      input.featured,
      created_at,
      input.order_index,
    ],
  )?;
  let id = conn.last_insert_rowid();
  replace_tags(conn, id, input.technologies.as_slice())?;
  Ok(id)
}

/// Returns `false` if no row has `id`.
pub fn update_project(conn: &Connection, id: i64, input: &NewProject) -> rusqlite::Result<bool> {
  let changed = conn.execute(
    "UPDATE projects SET
       title = ?2, description = ?3, short_description = ?4, image_url = ?5,
       demo_url = ?6, github_url = ?7, featured = ?8, order_index = ?9
     WHERE id = ?1",
    params![
      id,
      input.title,
      input.description,
      input.short_description,
      input.image_url,
      input.demo_url,
      input.github_url,
      input.featured,
      input.order_index,
    ],
  )?;
  if changed == 0 {
    return Ok(false);
  }
  replace_tags(conn, id, input.technologies.as_slice())?;
  Ok(true)
}

/// `WHERE` clause (possibly empty) and bind values for a project query.
pub fn project_conditions(query: &ProjectQuery) -> (String, Vec<Value>) {
  let mut conds: Vec<&str> = Vec::new();
  let mut values: Vec<Value> = Vec::new();

  if let Some(featured) = query.featured {
    conds.push("p.featured = ?");
    values.push(Value::Integer(i64::from(featured)));
  }
  if let Some(tech) = query.technology.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
    conds.push(
      "EXISTS (SELECT 1 FROM project_technologies t
               WHERE t.project_id = p.id AND t.name = ? COLLATE NOCASE)",
    );
    values.push(Value::Text(tech.to_owned()));
  }
  if let Some(id) = query.exclude_id {
    conds.push("p.id != ?");
    values.push(Value::Integer(id));
  }

  let clause = if conds.is_empty() {
    String::new()
  } else {
    format!(" WHERE {}", conds.join(" AND "))
  };
  (clause, values)
}

pub fn project_order(order: ProjectOrder) -> &'static str {
  match order {
    ProjectOrder::OrderIndex => " ORDER BY p.order_index ASC, p.id ASC",
    ProjectOrder::FeaturedFirst => " ORDER BY p.featured DESC, p.order_index ASC, p.id ASC",
  }
}

/// `LIMIT`/`OFFSET` suffix; an offset without a limit reads to the end.
pub fn limit_clause(limit: Option<u32>, offset: Option<u32>) -> String {
  match (limit, offset) {
    (Some(l), Some(o)) => format!(" LIMIT {l} OFFSET {o}"),
    (Some(l), None) => format!(" LIMIT {l}"),
    (None, Some(o)) => format!(" LIMIT -1 OFFSET {o}"),
    (None, None) => String::new(),
  }
}

pub fn list_projects(conn: &Connection, query: &ProjectQuery) -> rusqlite::Result<Vec<RawProject>> {
  let (clause, values) = project_conditions(query);
  let sql = format!(
    "SELECT {cols} FROM projects p{clause}{order}{limit}",
    cols = prefixed(PROJECT_COLUMNS, "p"),
    order = project_order(query.order),
    limit = limit_clause(query.limit, query.offset),
  );
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(rusqlite::params_from_iter(values), RawProject::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  rows.into_iter().map(|raw| with_tags(conn, raw)).collect()
}

pub fn count_projects(conn: &Connection, query: &ProjectQuery) -> rusqlite::Result<u64> {
  let (clause, values) = project_conditions(query);
  let n: i64 = conn.query_row(
    &format!("SELECT COUNT(*) FROM projects p{clause}"),
    rusqlite::params_from_iter(values),
    |r| r.get(0),
  )?;
  Ok(n as u64)
}

/// `"id, title"` with alias `p` becomes `"p.id, p.title"`.
fn prefixed(columns: &str, alias: &str) -> String {
  columns
    .split(',')
    .map(|c| format!("{alias}.{}", c.trim()))
    .collect::<Vec<_>>()
    .join(", ")
}

// ─── Experience ──────────────────────────────────────────────────────────────

pub fn fetch_experience(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawExperience>> {
  conn
    .query_row(
      &format!("SELECT {EXPERIENCE_COLUMNS} FROM experience WHERE id = ?1"),
      [id],
      RawExperience::from_row,
    )
    .optional()
}

pub fn insert_experience(conn: &Connection, input: &NewExperience) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO experience (
       title, company, company_url, company_logo, location,
       start_date, end_date, description, experience_type, order_index
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    params![
      input.title,
      input.company,
      input.company_url,
      input.company_logo,
      input.location,
      encode_date(input.start_date),
      input.end_date.map(encode_date),
      input.description,
      encode_experience_type(input.experience_type),
      input.order_index,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn update_experience(
  conn: &Connection,
  id: i64,
  input: &NewExperience,
) -> rusqlite::Result<bool> {
  let changed = conn.execute(
    "UPDATE experience SET
       title = ?2, company = ?3, company_url = ?4, company_logo = ?5, location = ?6,
       start_date = ?7, end_date = ?8, description = ?9, experience_type = ?10,
       order_index = ?11
     WHERE id = ?1",
    params![
      id,
      input.title,
      input.company,
      input.company_url,
      input.company_logo,
      input.location,
      encode_date(input.start_date),
      input.end_date.map(encode_date),
      input.description,
      encode_experience_type(input.experience_type),
      input.order_index,
    ],
  )?;
  Ok(changed > 0)
}

pub fn list_experiences(conn: &Connection) -> rusqlite::Result<Vec<RawExperience>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {EXPERIENCE_COLUMNS} FROM experience
     ORDER BY start_date DESC, order_index ASC, id ASC"
  ))?;
  let rows = stmt
    .query_map([], RawExperience::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

// ─── Skills ──────────────────────────────────────────────────────────────────

pub fn fetch_skill(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawSkill>> {
  conn
    .query_row(
      &format!("SELECT {SKILL_COLUMNS} FROM skills WHERE id = ?1"),
      [id],
      RawSkill::from_row,
    )
    .optional()
}

pub fn insert_skill(conn: &Connection, input: &NewSkill) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO skills (name, category, proficiency, icon_class, order_index)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      input.name,
      input.category,
      input.proficiency,
      input.icon_class,
      input.order_index,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn update_skill(conn: &Connection, id: i64, input: &NewSkill) -> rusqlite::Result<bool> {
  let changed = conn.execute(
    "UPDATE skills SET
       name = ?2, category = ?3, proficiency = ?4, icon_class = ?5, order_index = ?6
     WHERE id = ?1",
    params![
      id,
      input.name,
      input.category,
      input.proficiency,
      input.icon_class,
      input.order_index,
    ],
  )?;
  Ok(changed > 0)
}

pub fn list_skills(conn: &Connection, order: SkillOrder) -> rusqlite::Result<Vec<RawSkill>> {
  let order = match order {
    SkillOrder::CategoryThenOrderIndex => "category ASC, order_index ASC, id ASC",
    SkillOrder::CategoryThenProficiency => {
      "category ASC, proficiency DESC, order_index ASC, id ASC"
    }
  };
  let mut stmt = conn.prepare(&format!("SELECT {SKILL_COLUMNS} FROM skills ORDER BY {order}"))?;
  let rows = stmt
    .query_map([], RawSkill::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

// ─── Messages ────────────────────────────────────────────────────────────────

pub fn fetch_message(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawMessage>> {
  conn
    .query_row(
      &format!("SELECT {MESSAGE_COLUMNS} FROM contact_messages WHERE id = ?1"),
      [id],
      RawMessage::from_row,
    )
    .optional()
}

pub fn insert_message(
  conn: &Connection,
  input: &NewContactMessage,
  created_at: &str,
) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO contact_messages (name, email, subject, message, created_at, read)
     VALUES (?1, ?2, ?3, ?4, ?5, 0)",
    params![input.name, input.email, input.subject, input.message, created_at],
  )?;
  Ok(conn.last_insert_rowid())
}

// ─── Settings ────────────────────────────────────────────────────────────────

pub fn fetch_setting(conn: &Connection, id: i64) -> rusqlite::Result<Option<Setting>> {
  conn
    .query_row(
      &format!("SELECT {SETTING_COLUMNS} FROM site_settings WHERE id = ?1"),
      [id],
      setting_from_row,
    )
    .optional()
}

pub fn setting_value(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
  conn
    .query_row("SELECT value FROM site_settings WHERE key = ?1", [key], |r| r.get(0))
    .optional()
}

pub fn upsert_setting(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<Setting> {
  conn.query_row(
    "INSERT INTO site_settings (key, value) VALUES (?1, ?2)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value
     RETURNING id, key, value",
    params![key, value],
    setting_from_row,
  )
}

// ─── Any entity ──────────────────────────────────────────────────────────────

pub fn table(entity: Entity) -> &'static str {
  match entity {
    Entity::Project => "projects",
    Entity::Experience => "experience",
    Entity::Skill => "skills",
    Entity::Message => "contact_messages",
    Entity::Setting => "site_settings",
  }
}

pub fn fetch_record(
  conn: &Connection,
  entity: Entity,
  id: i64,
) -> rusqlite::Result<Option<RawRecord>> {
  Ok(match entity {
    Entity::Project => fetch_project(conn, id)?.map(RawRecord::Project),
    Entity::Experience => fetch_experience(conn, id)?.map(RawRecord::Experience),
    Entity::Skill => fetch_skill(conn, id)?.map(RawRecord::Skill),
    Entity::Message => fetch_message(conn, id)?.map(RawRecord::Message),
    Entity::Setting => fetch_setting(conn, id)?.map(RawRecord::Setting),
  })
}
