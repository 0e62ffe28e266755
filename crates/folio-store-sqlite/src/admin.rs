//! SQL for the generic admin list view.
//!
//! Column names arrive already resolved against a [`ModelView`], so they are
//! interpolated as quoted identifiers. Values are always bound.

use folio_core::{
  admin::{AdminQuery, ColumnKind, ModelView, SortDir},
  store::Page,
};
use rusqlite::{Connection, types::Value};

use crate::{encode::encode_field, queries::table};

fn kind_of(view: &ModelView, column: &str) -> ColumnKind {
  view
    .columns
    .iter()
    .find(|c| c.name == column)
    .map_or(ColumnKind::Text, |c| c.kind)
}

/// Escape `%`, `_` and `\` so the term matches literally inside `LIKE`.
pub fn like_pattern(term: &str) -> String {
  let mut out = String::with_capacity(term.len() + 2);
  out.push('%');
  for ch in term.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(ch);
  }
  out.push('%');
  out
}

/// `WHERE` clause (possibly empty) and bind values for an admin query.
fn conditions(view: &ModelView, query: &AdminQuery) -> (String, Vec<Value>) {
  let table = table(view.entity);
  let mut conds: Vec<String> = Vec::new();
  let mut values: Vec<Value> = Vec::new();

  if let Some(term) = query.search.as_deref() {
    let pattern = like_pattern(term);
    let mut any: Vec<String> = Vec::new();
    for column in view.searchable {
      any.push(match kind_of(view, column) {
        ColumnKind::Tags => format!(
          "EXISTS (SELECT 1 FROM project_technologies t
                   WHERE t.project_id = \"{table}\".id AND t.name LIKE ? ESCAPE '\\')"
        ),
        _ => format!("\"{table}\".\"{column}\" LIKE ? ESCAPE '\\'"),
      });
      values.push(Value::Text(pattern.clone()));
    }
    if !any.is_empty() {
      conds.push(format!("({})", any.join(" OR ")));
    }
  }

  for (column, value) in &query.filters {
    conds.push(match kind_of(view, column) {
      ColumnKind::DateTime => format!("substr(\"{table}\".\"{column}\", 1, 10) = ?"),
      _ => format!("\"{table}\".\"{column}\" = ?"),
    });
    values.push(encode_field(value));
  }

  let clause = if conds.is_empty() {
    String::new()
  } else {
    format!(" WHERE {}", conds.join(" AND "))
  };
  (clause, values)
}

fn order_by(view: &ModelView, query: &AdminQuery) -> String {
  let table = table(view.entity);
  let mut terms: Vec<String> = query
    .sort
    .iter()
    .map(|(column, dir)| {
      let dir = match dir {
        SortDir::Asc => "ASC",
        SortDir::Desc => "DESC",
      };
      format!("\"{table}\".\"{column}\" {dir}")
    })
    .collect();
  terms.push(format!("\"{table}\".id ASC"));
  format!(" ORDER BY {}", terms.join(", "))
}

/// Ids on the requested page, plus the total number of matching rows.
pub fn list_ids(
  conn: &Connection,
  view: &ModelView,
  query: &AdminQuery,
) -> rusqlite::Result<(Vec<i64>, u64)> {
  let table = table(view.entity);
  let (clause, values) = conditions(view, query);

  let total: i64 = conn.query_row(
    &format!("SELECT COUNT(*) FROM \"{table}\"{clause}"),
    rusqlite::params_from_iter(values.iter()),
    |r| r.get(0),
  )?;

  let sql = format!(
    "SELECT \"{table}\".id FROM \"{table}\"{clause}{order} LIMIT {limit} OFFSET {offset}",
    order = order_by(view, query),
    limit = query.per_page,
    offset = Page::<()>::offset(query.page, query.per_page),
  );
  let mut stmt = conn.prepare(&sql)?;
  let ids = stmt
    .query_map(rusqlite::params_from_iter(values.iter()), |r| r.get(0))?
    .collect::<rusqlite::Result<Vec<i64>>>()?;

  Ok((ids, total as u64))
}
