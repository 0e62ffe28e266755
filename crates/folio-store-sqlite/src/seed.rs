//! Starter content, inserted on request with `--seed`.
//!
//! Each row is matched on its natural key before insertion, so re-running the
//! seed against a populated store inserts nothing.

use chrono::NaiveDate;
use folio_core::{
  experience::{ExperienceType, NewExperience},
  project::{NewProject, TechList},
  settings::keys,
  skill::NewSkill,
};
use rusqlite::{Connection, params};

use crate::{encode::encode_date, queries};

/// Rows inserted per entity by one seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
  pub projects:   usize,
  pub experience: usize,
  pub skills:     usize,
  pub settings:   usize,
}

impl SeedReport {
  pub fn total(&self) -> usize {
    self.projects + self.experience + self.skills + self.settings
  }
}

struct SeedProject {
  title:        &'static str,
  short:        &'static str,
  description:  &'static str,
  github_url:   Option<&'static str>,
  technologies: &'static str,
  featured:     bool,
}

const PROJECTS: &[SeedProject] = &[
  SeedProject {
    title:        "Homelab Server",
    short:        "Self-hosted home infrastructure running a handful of services",
    description:  "A Linux box running containerised services for file storage, media, \
                   monitoring and automation, with backups and remote access.",
    github_url:   Some("https://github.com/example/homelab"),
    technologies: "Linux, Docker, Self-hosting, Networking",
    featured:     true,
  },
  SeedProject {
    title:        "Rental Market Scraper",
    short:        "A scraping service that tracks apartment listings and prices",
    description:  "Collects rental listings from several sources on a schedule, \
                   normalises them and stores price history for trend analysis.",
    github_url:   Some("https://github.com/example/rental-scraper"),
    technologies: "Python, Web Scraping, PostgreSQL, Automation",
    featured:     true,
  },
  SeedProject {
    title:        "Sensor Dashboard",
    short:        "Environmental sensors feeding a home automation dashboard",
    description:  "Microcontroller-based temperature, humidity and presence \
                   sensors reporting to a central dashboard that drives \
                   automation rules.",
    github_url:   None,
    technologies: "IoT, ESP32, Raspberry Pi, Home Assistant",
    featured:     true,
  },
  SeedProject {
    title:        "Local LLM Lab",
    short:        "Experiments with self-hosted language and image models",
    description:  "A workstation setup for running and tuning open models \
                   locally, with a small web front-end for prompt testing.",
    github_url:   None,
    technologies: "Python, LLMs, Self-hosting, Docker",
    featured:     false,
  },
];

struct SeedExperience {
  title:       &'static str,
  company:     &'static str,
  location:    &'static str,
  start:       (i32, u32, u32),
  end:         Option<(i32, u32, u32)>,
  description: &'static str,
  kind:        ExperienceType,
}

const EXPERIENCE: &[SeedExperience] = &[
  SeedExperience {
    title:       "Software Engineer",
    company:     "Example Bank",
    location:    "Chicago, IL",
    start:       (2025, 3, 1),
    end:         None,
    description: "Builds and maintains ETL pipelines for identity systems.",
    kind:        ExperienceType::Work,
  },
  SeedExperience {
    title:       "Software Engineer",
    company:     "Example Financial",
    location:    "Chicago, IL",
    start:       (2019, 8, 1),
    end:         Some((2023, 11, 30)),
    description: "Built cloud data pipelines and customer communication services.",
    kind:        ExperienceType::Work,
  },
  SeedExperience {
    title:       "Operations Lead",
    company:     "Example Insurance",
    location:    "Milwaukee, WI",
    start:       (2018, 6, 1),
    end:         Some((2019, 8, 31)),
    description: "Managed deployment of internal mobile applications.",
    kind:        ExperienceType::Work,
  },
  SeedExperience {
    title:       "B.S. Statistics & Computer Science",
    company:     "Example University",
    location:    "Madison, WI",
    start:       (2014, 8, 1),
    end:         Some((2018, 5, 31)),
    description: "Data analysis, statistical modelling and software development.",
    kind:        ExperienceType::Education,
  },
];

/// `(name, category, proficiency, icon_class)`
const SKILLS: &[(&str, &str, i64, &str)] = &[
  ("Python", "languages", 95, "fab fa-python"),
  ("Java", "languages", 85, "fab fa-java"),
  ("SQL", "languages", 90, "fas fa-database"),
  ("Rust", "languages", 70, "fab fa-rust"),
  ("PostgreSQL", "databases", 85, "fas fa-database"),
  ("SQLite", "databases", 80, "fas fa-database"),
  ("Docker", "tools", 80, "fab fa-docker"),
  ("Linux", "tools", 85, "fab fa-linux"),
  ("Git", "tools", 90, "fab fa-git-alt"),
];

const SETTINGS: &[(&str, &str)] = &[
  (keys::HERO_TITLE, "Software Engineer"),
  (
    keys::HERO_SUBTITLE,
    "Building reliable data pipelines and the services around them",
  ),
  (
    keys::ABOUT_TEXT,
    "Software engineer working on data pipelines, cloud infrastructure and \
     self-hosted tooling.",
  ),
];

fn date((y, m, d): (i32, u32, u32)) -> rusqlite::Result<NaiveDate> {
  NaiveDate::from_ymd_opt(y, m, d)
    .ok_or_else(|| rusqlite::Error::ToSqlConversionFailure(format!("bad date {y}-{m}-{d}").into()))
}

fn exists(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> rusqlite::Result<bool> {
  conn.query_row(&format!("SELECT EXISTS ({sql})"), params, |r| r.get(0))
}

/// Insert every missing starter row inside one transaction.
pub fn apply(conn: &mut Connection, now: &str) -> rusqlite::Result<SeedReport> {
  let tx = conn.transaction()?;
  let mut report = SeedReport::default();

  for (i, p) in PROJECTS.iter().enumerate() {
    if exists(&tx, "SELECT 1 FROM projects WHERE title = ?1", [p.title])? {
      continue;
    }
    let input = NewProject {
      short_description: Some(p.short.to_owned()),
      github_url: p.github_url.map(str::to_owned),
      technologies: TechList::parse(p.technologies),
      featured: p.featured,
      order_index: i as i64 + 1,
      ..NewProject::new(p.title, p.description)
    };
    queries::insert_project(&tx, &input, now)?;
    report.projects += 1;
  }

  for (i, e) in EXPERIENCE.iter().enumerate() {
    let start = date(e.start)?;
    if exists(
      &tx,
      "SELECT 1 FROM experience WHERE title = ?1 AND company = ?2 AND start_date = ?3",
      params![e.title, e.company, encode_date(start)],
    )? {
      continue;
    }
    let input = NewExperience {
      location: Some(e.location.to_owned()),
      end_date: e.end.map(date).transpose()?,
      description: Some(e.description.to_owned()),
      experience_type: e.kind,
      order_index: i as i64 + 1,
      ..NewExperience::new(e.title, e.company, start)
    };
    queries::insert_experience(&tx, &input)?;
    report.experience += 1;
  }

  for (i, (name, category, proficiency, icon)) in SKILLS.iter().enumerate() {
    if exists(
      &tx,
      "SELECT 1 FROM skills WHERE name = ?1 AND category = ?2",
      params![name, category],
    )? {
      continue;
    }
    let input = NewSkill {
      icon_class: Some((*icon).to_owned()),
      order_index: i as i64 + 1,
      ..NewSkill::new(*name, *category, *proficiency)
    };
    queries::insert_skill(&tx, &input)?;
    report.skills += 1;
  }

  for (key, value) in SETTINGS {
    report.settings += tx.execute(
      "INSERT INTO site_settings (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO NOTHING",
      params![key, value],
    )?;
  }

  tx.commit()?;
  Ok(report)
}
