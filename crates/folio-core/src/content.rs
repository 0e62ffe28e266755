//! Read-side content queries used by the public pages.
//!
//! Stateless functions over any [`PortfolioStore`]; nothing is cached.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::{
  experience::Experience,
  project::Project,
  settings::{get_setting, keys},
  skill::Skill,
  store::{Page, PortfolioStore, ProjectOrder, ProjectQuery, SkillOrder},
};

/// Projects shown on the home page.
pub const FEATURED_LIMIT: u32 = 6;
/// Page size of the portfolio listing.
pub const PORTFOLIO_PAGE_SIZE: u32 = 9;
/// Maximum related projects on a detail page.
pub const RELATED_LIMIT: usize = 3;
/// Only the first few technologies of a project are used to find relatives.
const RELATED_TECH_PROBES: usize = 2;

pub const DEFAULT_HERO_TITLE: &str = "Software Developer";
pub const DEFAULT_HERO_SUBTITLE: &str = "Building amazing digital experiences";
pub const DEFAULT_ABOUT_TEXT: &str =
  "Passionate developer with experience in modern web technologies.";

/// Skills keyed by category, each list in display order.
pub type SkillsByCategory = BTreeMap<String, Vec<Skill>>;

// ─── Projects ────────────────────────────────────────────────────────────────

/// Featured projects by `order_index`, at most `limit`. If no project is
/// featured, the first `limit` projects are returned instead so the home page
/// is never empty.
pub async fn featured_projects<S: PortfolioStore>(
  store: &S,
  limit: u32,
) -> Result<Vec<Project>, S::Error> {
  let featured = store
    .list_projects(&ProjectQuery {
      featured: Some(true),
      limit: Some(limit),
      ..ProjectQuery::default()
    })
    .await?;
  if !featured.is_empty() {
    return Ok(featured);
  }

  store
    .list_projects(&ProjectQuery {
      limit: Some(limit),
      ..ProjectQuery::default()
    })
    .await
}

/// Up to [`RELATED_LIMIT`] other projects sharing one of the first two
/// technologies of `project`, in first-seen order.
pub async fn related_projects<S: PortfolioStore>(
  store: &S,
  project: &Project,
) -> Result<Vec<Project>, S::Error> {
  let mut found = Vec::new();
  for tech in project.technologies.iter().take(RELATED_TECH_PROBES) {
    let batch = store
      .list_projects(&ProjectQuery {
        technology: Some(tech.clone()),
        exclude_id: Some(project.id),
        limit: Some(RELATED_LIMIT as u32),
        ..ProjectQuery::default()
      })
      .await?;
    found.extend(batch);
  }
  Ok(dedup_by_id(found, RELATED_LIMIT))
}

/// Drop repeated ids keeping the first occurrence, then truncate.
pub fn dedup_by_id(projects: Vec<Project>, limit: usize) -> Vec<Project> {
  let mut seen = HashSet::new();
  projects
    .into_iter()
    .filter(|p| seen.insert(p.id))
    .take(limit)
    .collect()
}

/// Every technology tag in use, sorted.
pub async fn technology_facets<S: PortfolioStore>(store: &S) -> Result<Vec<String>, S::Error> {
  let tags: BTreeSet<String> = store.list_technologies().await?.into_iter().collect();
  Ok(tags.into_iter().collect())
}

/// One page of the portfolio listing, featured first. Pages below 1 are
/// treated as 1; pages past the end are empty.
pub async fn portfolio_page<S: PortfolioStore>(
  store: &S,
  page: u32,
  technology: Option<&str>,
) -> Result<Page<Project>, S::Error> {
  let page = page.max(1);
  let mut query = ProjectQuery {
    technology: technology
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(str::to_owned),
    order: ProjectOrder::FeaturedFirst,
    ..ProjectQuery::default()
  };

  let total = store.count_projects(&query).await?;
  query.limit = Some(PORTFOLIO_PAGE_SIZE);
  query.offset = Some(Page::<Project>::offset(page, PORTFOLIO_PAGE_SIZE));
  let items = store.list_projects(&query).await?;

  Ok(Page::new(items, page, PORTFOLIO_PAGE_SIZE, total))
}

/// Every project, featured first; the `/api/projects` listing.
pub async fn all_projects<S: PortfolioStore>(store: &S) -> Result<Vec<Project>, S::Error> {
  store
    .list_projects(&ProjectQuery {
      order: ProjectOrder::FeaturedFirst,
      ..ProjectQuery::default()
    })
    .await
}

// ─── Experience & skills ─────────────────────────────────────────────────────

/// Most recent first, ongoing positions included by their start date.
pub async fn experience_timeline<S: PortfolioStore>(
  store: &S,
) -> Result<Vec<Experience>, S::Error> {
  store.list_experiences().await
}

pub async fn skills_by_category<S: PortfolioStore>(
  store: &S,
) -> Result<SkillsByCategory, S::Error> {
  let skills = store.list_skills(SkillOrder::CategoryThenOrderIndex).await?;
  Ok(group_by_category(skills))
}

/// Group already-ordered skills, preserving their order within each category.
pub fn group_by_category(skills: Vec<Skill>) -> SkillsByCategory {
  let mut groups = SkillsByCategory::new();
  for skill in skills {
    groups.entry(skill.category.clone()).or_default().push(skill);
  }
  groups
}

// ─── Pages ───────────────────────────────────────────────────────────────────

/// Editable copy on the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteCopy {
  pub hero_title:    String,
  pub hero_subtitle: String,
  pub about_text:    String,
}

impl SiteCopy {
  pub async fn load<S: PortfolioStore>(store: &S) -> Result<Self, S::Error> {
    Ok(Self {
      hero_title:    get_setting(store, keys::HERO_TITLE, DEFAULT_HERO_TITLE).await?,
      hero_subtitle: get_setting(store, keys::HERO_SUBTITLE, DEFAULT_HERO_SUBTITLE).await?,
      about_text:    get_setting(store, keys::ABOUT_TEXT, DEFAULT_ABOUT_TEXT).await?,
    })
  }
}

/// Everything the home page renders.
#[derive(Debug, Clone)]
pub struct HomeContent {
  pub projects:    Vec<Project>,
  pub experiences: Vec<Experience>,
  pub skills:      SkillsByCategory,
  pub copy:        SiteCopy,
}

impl HomeContent {
  pub async fn load<S: PortfolioStore>(store: &S) -> Result<Self, S::Error> {
    Ok(Self {
      projects:    featured_projects(store, FEATURED_LIMIT).await?,
      experiences: experience_timeline(store).await?,
      skills:      skills_by_category(store).await?,
      copy:        SiteCopy::load(store).await?,
    })
  }
}

/// Everything the resume page renders when no external resume is configured.
#[derive(Debug, Clone)]
pub struct ResumeContent {
  pub experiences: Vec<Experience>,
  /// Category ascending, proficiency descending.
  pub skills:      Vec<Skill>,
}

impl ResumeContent {
  pub async fn load<S: PortfolioStore>(store: &S) -> Result<Self, S::Error> {
    Ok(Self {
      experiences: experience_timeline(store).await?,
      skills:      store.list_skills(SkillOrder::CategoryThenProficiency).await?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::project::TechList;

  fn project(id: i64) -> Project {
    Project {
      id,
      title: format!("Project {id}"),
      description: String::new(),
      short_description: None,
      image_url: None,
      demo_url: None,
      github_url: None,
      technologies: TechList::default(),
      featured: false,
      created_at: Utc::now(),
      order_index: 0,
    }
  }

  fn skill(name: &str, category: &str) -> Skill {
    Skill {
      id: 0,
      name: name.into(),
      category: category.into(),
      proficiency: 50,
      icon_class: None,
      order_index: 0,
    }
  }

  #[test]
  fn dedup_keeps_first_seen_order_and_truncates() {
    let input = vec![project(4), project(2), project(4), project(7), project(2), project(9)];
    let ids: Vec<i64> = dedup_by_id(input, 3).into_iter().map(|p| p.id).collect();
    assert_eq!(ids, [4, 2, 7]);
  }

  #[test]
  fn grouping_preserves_order_within_category() {
    let groups = group_by_category(vec![
      skill("AWS Lambda", "aws"),
      skill("S3", "aws"),
      skill("Python", "languages"),
      skill("Java", "languages"),
    ]);
    assert_eq!(groups.len(), 2);
    let names: Vec<&str> = groups["languages"].iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Python", "Java"]);
  }
}
