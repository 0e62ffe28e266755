//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use folio_core::{
  admin::{AdminQuery, Entity, FieldValue, Record},
  contact::ContactForm,
  content,
  experience::{ExperienceType, NewExperience},
  project::{NewProject, TechList},
  settings::{self, SettingInput, SettingUpdate},
  skill::NewSkill,
  store::{PortfolioStore, ProjectQuery, SkillOrder},
};

use crate::{SeedReport, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn project(title: &str, techs: &str, featured: bool, order_index: i64) -> NewProject {
  NewProject {
    technologies: TechList::parse(techs),
    featured,
    order_index,
    ..NewProject::new(title, format!("{title} description"))
  }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
  pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

fn titles(projects: &[folio_core::project::Project]) -> Vec<&str> {
  projects.iter().map(|p| p.title.as_str()).collect()
}

// ─── Projects ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_project() {
  let s = store().await;
  let created = s
    .create_project(project("Homelab", "Linux, Docker ,  , AWS", true, 1))
    .await
    .unwrap();

  let fetched = s.get_project(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
  assert_eq!(fetched.technologies.as_slice(), ["Linux", "Docker", "AWS"]);
}

#[tokio::test]
async fn get_project_missing_returns_none() {
  let s = store().await;
  assert!(s.get_project(42).await.unwrap().is_none());
}

#[tokio::test]
async fn update_project_replaces_tags_and_keeps_created_at() {
  let s = store().await;
  let created = s.create_project(project("Scraper", "Python, Docker", false, 0)).await.unwrap();

  let updated = s
    .update_project(created.id, project("Scraper v2", "Rust", true, 3))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.title, "Scraper v2");
  assert_eq!(updated.technologies.as_slice(), ["Rust"]);
  assert_eq!(updated.created_at, created.created_at);

  let mut techs = s.list_technologies().await.unwrap();
  techs.sort();
  assert_eq!(techs, ["Rust"]);

  assert!(s.update_project(999, project("x", "", false, 0)).await.unwrap().is_none());
}

#[tokio::test]
async fn technology_filter_matches_whole_tags_only() {
  let s = store().await;
  s.create_project(project("Backend", "Java, Spring", false, 1)).await.unwrap();
  s.create_project(project("Frontend", "JavaScript, React", false, 2)).await.unwrap();

  let java = s
    .list_projects(&ProjectQuery {
      technology: Some("java".into()),
      ..ProjectQuery::default()
    })
    .await
    .unwrap();
  assert_eq!(titles(&java), ["Backend"]);
}

#[tokio::test]
async fn featured_projects_fall_back_to_order_index() {
  let s = store().await;
  for i in 0..8 {
    s.create_project(project(&format!("P{i}"), "", false, 8 - i)).await.unwrap();
  }

  let fallback = content::featured_projects(&s, content::FEATURED_LIMIT).await.unwrap();
  assert_eq!(fallback.len(), 6);
  assert_eq!(fallback[0].title, "P7");
  assert!(fallback.windows(2).all(|w| w[0].order_index <= w[1].order_index));

  s.create_project(project("Star", "", true, 99)).await.unwrap();
  let featured = content::featured_projects(&s, content::FEATURED_LIMIT).await.unwrap();
  assert_eq!(titles(&featured), ["Star"]);
}

#[tokio::test]
async fn related_projects_exclude_self_and_cap_at_three() {
  let s = store().await;
  let source = s.create_project(project("Source", "Python, Docker, AWS", false, 0)).await.unwrap();
  s.create_project(project("A", "Python", false, 1)).await.unwrap();
  s.create_project(project("B", "Python, Docker", false, 2)).await.unwrap();
  s.create_project(project("C", "Docker", false, 3)).await.unwrap();
  s.create_project(project("D", "Docker", false, 4)).await.unwrap();
  s.create_project(project("E", "AWS", false, 5)).await.unwrap();

  let related = content::related_projects(&s, &source).await.unwrap();
  assert_eq!(titles(&related), ["A", "B", "C"]);
  assert!(related.iter().all(|p| p.id != source.id));
}

#[tokio::test]
async fn technology_facets_are_sorted_and_distinct() {
  let s = store().await;
  s.create_project(project("One", "Python, Docker", false, 0)).await.unwrap();
  s.create_project(project("Two", "AWS, Python", false, 0)).await.unwrap();

  let facets = content::technology_facets(&s).await.unwrap();
  assert_eq!(facets, ["AWS", "Docker", "Python"]);
}

#[tokio::test]
async fn portfolio_pages_featured_first() {
  let s = store().await;
  for i in 0..11 {
    s.create_project(project(&format!("P{i:02}"), "Rust", i == 10, i)).await.unwrap();
  }

  let first = content::portfolio_page(&s, 0, None).await.unwrap();
  assert_eq!(first.page, 1);
  assert_eq!(first.total, 11);
  assert_eq!(first.pages, 2);
  assert_eq!(first.items.len(), 9);
  assert_eq!(first.items[0].title, "P10");

  let second = content::portfolio_page(&s, 2, Some("rust")).await.unwrap();
  assert_eq!(second.items.len(), 2);

  let beyond = content::portfolio_page(&s, 5, None).await.unwrap();
  assert!(beyond.items.is_empty());
  assert_eq!(beyond.total, 11);

  let none = content::portfolio_page(&s, 1, Some("Cobol")).await.unwrap();
  assert_eq!(none.total, 0);
  assert!(none.items.is_empty());
}

// ─── Experience & skills ─────────────────────────────────────────────────────

#[tokio::test]
async fn timeline_is_most_recent_first() {
  let s = store().await;
  for (title, start, end) in [
    ("2018", ymd(2018, 6, 1), Some(ymd(2019, 8, 31))),
    ("2025", ymd(2025, 3, 1), None),
    ("2019", ymd(2019, 8, 1), Some(ymd(2023, 11, 30))),
    ("2023", ymd(2023, 12, 1), Some(ymd(2025, 2, 1))),
  ] {
    s.create_experience(NewExperience {
      end_date: end,
      ..NewExperience::new(title, "Example Co", start)
    })
    .await
    .unwrap();
  }

  let timeline = content::experience_timeline(&s).await.unwrap();
  let order: Vec<&str> = timeline.iter().map(|e| e.title.as_str()).collect();
  assert_eq!(order, ["2025", "2023", "2019", "2018"]);
  assert!(timeline[0].is_current());
}

#[tokio::test]
async fn update_experience_round_trips_type() {
  let s = store().await;
  let e = s
    .create_experience(NewExperience::new("Student", "Example University", ymd(2014, 8, 1)))
    .await
    .unwrap();
  let updated = s
    .update_experience(e.id, NewExperience {
      experience_type: ExperienceType::Education,
      end_date: Some(ymd(2018, 5, 31)),
      ..NewExperience::new("B.S.", "Example University", ymd(2014, 8, 1))
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.experience_type, ExperienceType::Education);
  assert_eq!(updated.end_date, Some(ymd(2018, 5, 31)));
}

#[tokio::test]
async fn skills_group_by_category_in_order() {
  let s = store().await;
  for (name, cat, prof, order) in [
    ("SQL", "languages", 90, 3),
    ("Python", "languages", 95, 1),
    ("Docker", "tools", 80, 1),
    ("Java", "languages", 85, 2),
  ] {
    s.create_skill(NewSkill { order_index: order, ..NewSkill::new(name, cat, prof) })
      .await
      .unwrap();
  }

  let groups = content::skills_by_category(&s).await.unwrap();
  let languages: Vec<&str> = groups["languages"].iter().map(|s| s.name.as_str()).collect();
  assert_eq!(languages, ["Python", "Java", "SQL"]);
  assert_eq!(groups["tools"].len(), 1);

  let resume = s.list_skills(SkillOrder::CategoryThenProficiency).await.unwrap();
  let by_prof: Vec<&str> = resume.iter().map(|s| s.name.as_str()).collect();
  assert_eq!(by_prof, ["Python", "SQL", "Java", "Docker"]);
}

// ─── Settings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn settings_default_and_upsert() {
  let s = store().await;
  assert_eq!(
    settings::get_setting(&s, "nonexistent_key", "fallback").await.unwrap(),
    "fallback"
  );

  let first = settings::set_setting(&s, "x", "v1").await.unwrap();
  let second = settings::set_setting(&s, "x", "v2").await.unwrap();
  assert_eq!(first.id, second.id);
  assert_eq!(settings::get_setting(&s, "x", "").await.unwrap(), "v2");

  let view = Entity::Setting.view();
  let all = s
    .admin_list(view, &AdminQuery::from_params(view, &params(&[])).unwrap())
    .await
    .unwrap();
  assert_eq!(all.total, 1);
}

#[tokio::test]
async fn blank_setting_is_not_found() {
  let s = store().await;
  settings::set_setting(&s, "resume_url", "  ").await.unwrap();
  assert_eq!(settings::find_setting(&s, "resume_url").await.unwrap(), None);
}

#[tokio::test]
async fn update_setting_refuses_taken_key() {
  let s = store().await;
  settings::set_setting(&s, "a", "1").await.unwrap();
  let b = settings::set_setting(&s, "b", "2").await.unwrap();

  let clash = s
    .update_setting(b.id, SettingInput { key: "a".into(), value: "3".into() })
    .await
    .unwrap();
  assert_eq!(clash, SettingUpdate::KeyTaken);
  assert_eq!(settings::get_setting(&s, "b", "").await.unwrap(), "2");

  let renamed = s
    .update_setting(b.id, SettingInput { key: "c".into(), value: "3".into() })
    .await
    .unwrap();
  assert!(matches!(renamed, SettingUpdate::Updated(ref st) if st.key == "c"));

  let missing = s
    .update_setting(999, SettingInput { key: "z".into(), value: String::new() })
    .await
    .unwrap();
  assert_eq!(missing, SettingUpdate::NotFound);
}

// ─── Messages & dashboard ────────────────────────────────────────────────────

fn contact(name: &str) -> ContactForm {
  ContactForm {
    name:    name.into(),
    email:   "visitor@example.com".into(),
    subject: String::new(),
    message: "Hello there, nice portfolio.".into(),
  }
}

#[tokio::test]
async fn new_messages_are_unread() {
  let s = store().await;
  let msg = s.create_message(contact("Ada").validate().unwrap()).await.unwrap();
  assert!(!msg.read);
  assert_eq!(msg.subject, None);

  let Some(Record::Message(stored)) = s.admin_get(Entity::Message, msg.id).await.unwrap() else {
    panic!("expected a message record");
  };
  assert_eq!(stored, msg);
}

#[tokio::test]
async fn dashboard_unread_count_tracks_read_flag() {
  let s = store().await;
  s.create_project(project("P", "", false, 0)).await.unwrap();
  let first = s.create_message(contact("Ada").validate().unwrap()).await.unwrap();
  s.create_message(contact("Grace").validate().unwrap()).await.unwrap();

  let before = s.dashboard_stats().await.unwrap();
  assert_eq!(before.project_count, 1);
  assert_eq!(before.unread_messages, 2);

  let updated = s
    .admin_update_column(Entity::Message, first.id, "read", FieldValue::Bool(true))
    .await
    .unwrap();
  assert!(matches!(updated, Some(Record::Message(ref m)) if m.read));

  let after = s.dashboard_stats().await.unwrap();
  assert_eq!(after.unread_messages, 1);
}

// ─── Admin ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_search_covers_technologies() {
  let s = store().await;
  s.create_project(project("Homelab", "Linux, Docker", true, 1)).await.unwrap();
  s.create_project(project("Scraper", "Python", false, 2)).await.unwrap();

  let view = Entity::Project.view();
  let page = s
    .admin_list(view, &AdminQuery::from_params(view, &params(&[("q", "dock")])).unwrap())
    .await
    .unwrap();
  assert_eq!(page.total, 1);
  assert!(matches!(&page.items[0], Record::Project(p) if p.title == "Homelab"));

  let page = s
    .admin_list(view, &AdminQuery::from_params(view, &params(&[("q", "SCRAP")])).unwrap())
    .await
    .unwrap();
  assert_eq!(page.total, 1);
}

#[tokio::test]
async fn admin_filters_and_sorts() {
  let s = store().await;
  s.create_project(project("Beta", "", true, 1)).await.unwrap();
  s.create_project(project("Alpha", "", true, 2)).await.unwrap();
  s.create_project(project("Gamma", "", false, 3)).await.unwrap();

  let view = Entity::Project.view();
  let query =
    AdminQuery::from_params(view, &params(&[("featured", "true"), ("sort", "title")])).unwrap();
  let page = s.admin_list(view, &query).await.unwrap();
  let ids: Vec<&str> = page
    .items
    .iter()
    .map(|r| match r {
      Record::Project(p) => p.title.as_str(),
      _ => "",
    })
    .collect();
  assert_eq!(ids, ["Alpha", "Beta"]);

  let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
  let query = AdminQuery::from_params(view, &params(&[("created_at", today.as_str())])).unwrap();
  assert_eq!(s.admin_list(view, &query).await.unwrap().total, 3);
}

#[tokio::test]
async fn admin_list_pages_past_the_end_are_empty() {
  let s = store().await;
  s.create_skill(NewSkill::new("Rust", "languages", 70)).await.unwrap();

  let view = Entity::Skill.view();
  let page = s
    .admin_list(view, &AdminQuery::from_params(view, &params(&[("page", "3")])).unwrap())
    .await
    .unwrap();
  assert!(page.items.is_empty());
  assert_eq!(page.total, 1);
}

#[tokio::test]
async fn admin_delete_removes_project_and_tags() {
  let s = store().await;
  let p = s.create_project(project("Gone", "Erlang", false, 0)).await.unwrap();

  assert!(s.admin_delete(Entity::Project, p.id).await.unwrap());
  assert!(!s.admin_delete(Entity::Project, p.id).await.unwrap());
  assert!(s.get_project(p.id).await.unwrap().is_none());
  assert!(s.list_technologies().await.unwrap().is_empty());
}

#[tokio::test]
async fn admin_inline_edit_missing_row_returns_none() {
  let s = store().await;
  let result = s
    .admin_update_column(Entity::Skill, 7, "proficiency", FieldValue::Int(80))
    .await
    .unwrap();
  assert!(result.is_none());
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seed_is_idempotent() {
  let s = store().await;
  let first = s.seed().await.unwrap();
  assert!(first.projects > 0);
  assert!(first.experience > 0);
  assert!(first.skills > 0);
  assert!(first.settings > 0);

  let second = s.seed().await.unwrap();
  assert_eq!(second, SeedReport::default());
  assert_eq!(second.total(), 0);

  let stats = s.dashboard_stats().await.unwrap();
  assert_eq!(stats.project_count, first.projects as u64);
}

#[tokio::test]
async fn seed_keeps_edited_settings() {
  let s = store().await;
  settings::set_setting(&s, "hero_title", "Custom").await.unwrap();
  s.seed().await.unwrap();
  assert_eq!(settings::get_setting(&s, "hero_title", "").await.unwrap(), "Custom");
}

#[tokio::test]
async fn close_consumes_store() {
  let s = store().await;
  s.close().await.unwrap();
}
