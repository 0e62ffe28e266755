//! Server-rendered HTML pages.
//!
//! Markup is produced with `quick-xml`'s writer, so every piece of text and
//! every attribute value is escaped on the way out. Only void elements are
//! written as empty tags.

use std::io::Cursor;

use folio_core::{
  ValidationErrors,
  contact::ContactForm,
  content::{HomeContent, ResumeContent, SkillsByCategory},
  experience::Experience,
  project::{Project, TechList},
  store::Page,
};
use quick_xml::{
  Writer,
  escape::partial_escape,
  events::{BytesEnd, BytesStart, BytesText, Event},
};

const SITE_NAME: &str = "Portfolio";

const STYLESHEET: &str = "\
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2933; }
header, main, footer { max-width: 60rem; margin: 0 auto; padding: 1rem; }
nav a { margin-right: 1rem; }
.cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); gap: 1rem; }
.card { border: 1px solid #d9e2ec; border-radius: 6px; padding: 1rem; }
.tags { list-style: none; padding: 0; display: flex; flex-wrap: wrap; gap: 0.5rem; }
.active { font-weight: bold; }
.flash-success { background: #e3f9e5; padding: 0.75rem; }
.flash-warning { background: #fffbea; padding: 0.75rem; }
.errors { color: #ab091e; }
";

// ─── Builder ──────────────────────────────────────────────────────────────────

/// Minimal HTML builder over a `quick-xml` writer.
pub struct Html {
  writer: Writer<Cursor<Vec<u8>>>,
}

impl Html {
  fn new() -> Self {
    let mut html = Self { writer: Writer::new(Cursor::new(Vec::new())) };
    html.emit(Event::DocType(BytesText::from_escaped("html")));
    html
  }

  fn emit(&mut self, event: Event<'_>) {
    // Writes into a Vec<u8> cannot fail.
    let _ = self.writer.write_event(event);
  }

  fn start<'a>(tag: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut el = BytesStart::new(tag);
    for attr in attrs {
      el.push_attribute(*attr);
    }
    el
  }

  pub fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
    self.emit(Event::Start(Self::start(tag, attrs)));
    self
  }

  pub fn close(&mut self, tag: &str) -> &mut Self {
    self.emit(Event::End(BytesEnd::new(tag)));
    self
  }

  pub fn text(&mut self, text: &str) -> &mut Self {
    self.emit(Event::Text(BytesText::from_escaped(partial_escape(text))));
    self
  }

  /// `<tag ..attrs>text</tag>`
  pub fn elem(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) -> &mut Self {
    self.open(tag, attrs).text(text).close(tag)
  }

  /// A void element such as `img` or `input`.
  pub fn void(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
    self.emit(Event::Empty(Self::start(tag, attrs)));
    self
  }

  fn into_string(self) -> String {
    let bytes = self.writer.into_inner().into_inner();
    String::from_utf8_lossy(&bytes).into_owned()
  }
}

/// Wrap `body` in the shared page layout.
fn document(title: &str, body: impl FnOnce(&mut Html)) -> String {
  let mut h = Html::new();
  let full_title = format!("{title} | {SITE_NAME}");

  h.open("html", &[("lang", "en")]).open("head", &[]);
  h.void("meta", &[("charset", "utf-8")]);
  h.void("meta", &[("name", "viewport"), ("content", "width=device-width, initial-scale=1")]);
  h.elem("title", &[], &full_title);
  h.elem("style", &[], STYLESHEET);
  h.close("head").open("body", &[]);

  h.open("header", &[]).open("nav", &[]);
  for (href, label) in [
    ("/", "Home"),
    ("/portfolio", "Portfolio"),
    ("/resume", "Resume"),
    ("/contact", "Contact"),
  ] {
    h.elem("a", &[("href", href)], label);
  }
  h.close("nav").close("header");

  h.open("main", &[]);
  body(&mut h);
  h.close("main");

  h.open("footer", &[]).elem("p", &[], SITE_NAME).close("footer");
  h.close("body").close("html");
  h.into_string()
}

// ─── Fragments ────────────────────────────────────────────────────────────────

/// Percent-encode a query-string value. Unreserved characters pass through.
pub fn query_escape(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for byte in value.bytes() {
    match byte {
      b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
        out.push(char::from(byte))
      }
      _ => out.push_str(&format!("%{byte:02X}")),
    }
  }
  out
}

pub fn portfolio_href(page: u32, tech: Option<&str>) -> String {
  match tech {
    Some(t) => format!("/portfolio?page={page}&tech={}", query_escape(t)),
    None => format!("/portfolio?page={page}"),
  }
}

fn tech_tags(h: &mut Html, technologies: &TechList) {
  if technologies.is_empty() {
    return;
  }
  h.open("ul", &[("class", "tags")]);
  for tech in technologies {
    let href = format!("/portfolio?tech={}", query_escape(tech));
    h.open("li", &[]).elem("a", &[("href", &href)], tech).close("li");
  }
  h.close("ul");
}

fn project_card(h: &mut Html, project: &Project) {
  let href = format!("/project/{}", project.id);
  h.open("article", &[("class", "card")]);
  if let Some(image) = &project.image_url {
    h.void("img", &[("src", image), ("alt", &project.title)]);
  }
  h.open("h3", &[])
    .elem("a", &[("href", &href)], &project.title)
    .close("h3");
  let summary = project
    .short_description
    .as_deref()
    .unwrap_or(&project.description);
  h.elem("p", &[], summary);
  tech_tags(h, &project.technologies);
  h.close("article");
}

fn project_cards(h: &mut Html, projects: &[Project]) {
  h.open("div", &[("class", "cards")]);
  for project in projects {
    project_card(h, project);
  }
  h.close("div");
}

fn experience_entry(h: &mut Html, exp: &Experience) {
  h.open("article", &[("class", "experience")]);
  h.elem("h3", &[], &exp.title);

  h.open("p", &[]);
  match &exp.company_url {
    Some(url) => h.elem("a", &[("href", url)], &exp.company),
    None => h.text(&exp.company),
  };
  if let Some(location) = &exp.location {
    h.text(&format!(" · {location}"));
  }
  h.close("p");

  h.elem("p", &[("class", "duration")], &exp.duration());
  h.elem("span", &[("class", "badge")], exp.experience_type.as_ref());
  if let Some(description) = &exp.description {
    h.elem("p", &[], description);
  }
  h.close("article");
}

fn skill_groups(h: &mut Html, groups: &SkillsByCategory) {
  for (category, skills) in groups {
    h.elem("h3", &[], category);
    h.open("ul", &[("class", "skills")]);
    for skill in skills {
      let level = format!("{}%", skill.proficiency);
      h.open("li", &[]).text(&skill.name).text(" ");
      h.elem("span", &[("class", "proficiency")], &level);
      h.close("li");
    }
    h.close("ul");
  }
}

fn paragraphs(h: &mut Html, text: &str) {
  for para in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
    h.elem("p", &[], para);
  }
}

// ─── Pages ────────────────────────────────────────────────────────────────────

pub fn home(content: &HomeContent) -> String {
  document("Home", |h| {
    h.open("section", &[("class", "hero")]);
    h.elem("h1", &[], &content.copy.hero_title);
    h.elem("p", &[], &content.copy.hero_subtitle);
    h.close("section");

    h.open("section", &[("id", "about")]);
    h.elem("h2", &[], "About");
    paragraphs(h, &content.copy.about_text);
    h.close("section");

    h.open("section", &[("id", "projects")]);
    h.elem("h2", &[], "Featured Projects");
    project_cards(h, &content.projects);
    h.elem("a", &[("href", "/portfolio")], "View all projects");
    h.close("section");

    if !content.experiences.is_empty() {
      h.open("section", &[("id", "experience")]);
      h.elem("h2", &[], "Experience");
      for exp in &content.experiences {
        experience_entry(h, exp);
      }
      h.close("section");
    }

    if !content.skills.is_empty() {
      h.open("section", &[("id", "skills")]);
      h.elem("h2", &[], "Skills");
      skill_groups(h, &content.skills);
      h.close("section");
    }
  })
}

pub fn project(project: &Project, related: &[Project]) -> String {
  document(&project.title, |h| {
    h.open("article", &[("class", "project")]);
    h.elem("h1", &[], &project.title);
    let created = project.created_at.format("%B %Y").to_string();
    h.elem("p", &[("class", "meta")], &created);
    if let Some(image) = &project.image_url {
      h.void("img", &[("src", image), ("alt", &project.title)]);
    }
    paragraphs(h, &project.description);
    tech_tags(h, &project.technologies);

    h.open("p", &[("class", "links")]);
    if let Some(demo) = &project.demo_url {
      h.elem("a", &[("href", demo)], "Live demo");
    }
    if let Some(github) = &project.github_url {
      h.elem("a", &[("href", github)], "Source code");
    }
    h.close("p");
    h.close("article");

    if !related.is_empty() {
      h.open("section", &[("id", "related")]);
      h.elem("h2", &[], "Related Projects");
      project_cards(h, related);
      h.close("section");
    }
  })
}

pub fn portfolio(page: &Page<Project>, facets: &[String], current: Option<&str>) -> String {
  document("Portfolio", |h| {
    h.elem("h1", &[], "Portfolio");

    h.open("nav", &[("class", "filters")]);
    let all_class = if current.is_none() { "active" } else { "" };
    h.elem("a", &[("href", "/portfolio"), ("class", all_class)], "All");
    for tech in facets {
      let href = portfolio_href(1, Some(tech));
      let is_current = current.is_some_and(|c| c.eq_ignore_ascii_case(tech));
      let class = if is_current { "active" } else { "" };
      h.elem("a", &[("href", &href), ("class", class)], tech);
    }
    h.close("nav");

    if let Some(tech) = current {
      h.elem("p", &[("class", "filter")], &format!("Showing projects using {tech}"));
    }

    if page.items.is_empty() {
      h.elem("p", &[], "No projects found.");
    } else {
      project_cards(h, &page.items);
    }

    if page.pages > 1 {
      h.open("nav", &[("class", "pagination")]);
      if page.has_prev() {
        let href = portfolio_href(page.page - 1, current);
        h.elem("a", &[("href", &href), ("rel", "prev")], "Previous");
      }
      let label = format!("Page {} of {}", page.page, page.pages);
      h.elem("span", &[], &label);
      if page.has_next() {
        let href = portfolio_href(page.page + 1, current);
        h.elem("a", &[("href", &href), ("rel", "next")], "Next");
      }
      h.close("nav");
    }
  })
}

/// Status shown above the contact form after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
  Sent,
  Saved,
}

impl Flash {
  pub fn from_status(status: &str) -> Option<Self> {
    match status {
      "sent" => Some(Self::Sent),
      "saved" => Some(Self::Saved),
      _ => None,
    }
  }

  fn class(self) -> &'static str {
    match self {
      Self::Sent => "flash-success",
      Self::Saved => "flash-warning",
    }
  }

  fn text(self) -> &'static str {
    match self {
      Self::Sent => "Thank you for your message! I will get back to you soon.",
      Self::Saved => {
        "Message saved, but the email notification failed. I will still see your message!"
      }
    }
  }
}

pub fn contact(form: &ContactForm, errors: Option<&ValidationErrors>, flash: Option<Flash>) -> String {
  let no_errors = ValidationErrors::new();
  let errors = errors.unwrap_or(&no_errors);

  document("Contact", |h| {
    h.elem("h1", &[], "Contact");
    if let Some(flash) = flash {
      h.elem("p", &[("class", flash.class())], flash.text());
    }

    h.open("form", &[("method", "post"), ("action", "/contact")]);
    input_field(h, "name", "Name", "text", &form.name, errors);
    input_field(h, "email", "Email", "email", &form.email, errors);
    input_field(h, "subject", "Subject", "text", &form.subject, errors);

    h.open("p", &[]);
    h.elem("label", &[("for", "message")], "Message");
    h.elem("textarea", &[("id", "message"), ("name", "message"), ("rows", "6")], &form.message);
    field_errors(h, errors.field("message"));
    h.close("p");

    h.elem("button", &[("type", "submit")], "Send");
    h.close("form");
  })
}

fn input_field(
  h: &mut Html,
  name: &str,
  label: &str,
  kind: &str,
  value: &str,
  errors: &ValidationErrors,
) {
  h.open("p", &[]);
  h.elem("label", &[("for", name)], label);
  h.void("input", &[("id", name), ("name", name), ("type", kind), ("value", value)]);
  field_errors(h, errors.field(name));
  h.close("p");
}

fn field_errors(h: &mut Html, messages: &[String]) {
  if messages.is_empty() {
    return;
  }
  h.open("ul", &[("class", "errors")]);
  for message in messages {
    h.elem("li", &[], message);
  }
  h.close("ul");
}

pub fn resume(content: &ResumeContent) -> String {
  document("Resume", |h| {
    h.elem("h1", &[], "Resume");

    h.open("section", &[("id", "experience")]);
    h.elem("h2", &[], "Experience");
    for exp in &content.experiences {
      experience_entry(h, exp);
    }
    h.close("section");

    h.open("section", &[("id", "skills")]);
    h.elem("h2", &[], "Skills");
    h.open("table", &[]).open("tbody", &[]);
    for skill in &content.skills {
      let level = format!("{}%", skill.proficiency);
      h.open("tr", &[]);
      h.elem("td", &[], &skill.category);
      h.elem("td", &[], &skill.name);
      h.elem("td", &[], &level);
      h.close("tr");
    }
    h.close("tbody").close("table");
    h.close("section");
  })
}

pub fn not_found() -> String {
  document("Not Found", |h| {
    h.elem("h1", &[], "Page not found");
    h.elem("p", &[], "The page you were looking for does not exist.");
    h.elem("a", &[("href", "/")], "Back to the home page");
  })
}

pub fn server_error() -> String {
  document("Error", |h| {
    h.elem("h1", &[], "Something went wrong");
    h.elem("p", &[], "Please try again later.");
  })
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;

  fn project(id: i64, title: &str, techs: &str) -> Project {
    Project {
      id,
      title: title.into(),
      description: "First paragraph.\n\nSecond paragraph.".into(),
      short_description: None,
      image_url: None,
      demo_url: Some("https://demo.example.com/?a=1&b=2".into()),
      github_url: None,
      technologies: TechList::parse(techs),
      featured: false,
      created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
      order_index: 0,
    }
  }

  #[test]
  fn text_and_attributes_are_escaped() {
    let p = project(1, "<script>alert(1)</script>", "C++, C#");
    let html = super::project(&p, &[]);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>"));
    assert!(html.contains("href=\"https://demo.example.com/?a=1&amp;b=2\""));
    assert!(html.contains("href=\"/portfolio?tech=C%2B%2B\""));
    assert!(html.contains("href=\"/portfolio?tech=C%23\""));
  }

  #[test]
  fn project_page_lists_paragraphs_and_date() {
    let p = project(1, "Homelab", "Rust");
    let html = super::project(&p, &[project(2, "Sensors", "Rust")]);
    assert!(html.contains("<p>First paragraph.</p><p>Second paragraph.</p>"));
    assert!(html.contains("March 2024"));
    assert!(html.contains("Related Projects"));
    assert!(html.contains("href=\"/project/2\""));
  }

  #[test]
  fn query_escape_keeps_unreserved() {
    assert_eq!(query_escape("Node.js"), "Node.js");
    assert_eq!(query_escape("Machine Learning"), "Machine%20Learning");
    assert_eq!(query_escape("a&b=c"), "a%26b%3Dc");
    assert_eq!(portfolio_href(2, Some("Rust")), "/portfolio?page=2&tech=Rust");
    assert_eq!(portfolio_href(1, None), "/portfolio?page=1");
  }

  #[test]
  fn portfolio_pagination_keeps_filter() {
    let page = Page::new(vec![project(1, "Homelab", "Rust")], 2, 9, 30);
    let facets = vec!["Python".to_string(), "Rust".to_string()];
    let html = portfolio(&page, &facets, Some("Rust"));
    assert!(html.contains("Page 2 of 4"));
    assert!(html.contains("href=\"/portfolio?page=1&amp;tech=Rust\""));
    assert!(html.contains("href=\"/portfolio?page=3&amp;tech=Rust\""));
    assert!(html.contains("Showing projects using Rust"));
  }

  #[test]
  fn empty_portfolio_has_no_pagination() {
    let page: Page<Project> = Page::new(Vec::new(), 1, 9, 0);
    let html = portfolio(&page, &[], None);
    assert!(html.contains("No projects found."));
    assert!(!html.contains("pagination"));
  }

  #[test]
  fn contact_form_shows_values_and_errors() {
    let form = ContactForm {
      name:    "A".into(),
      email:   "a\"b@example.com".into(),
      subject: String::new(),
      message: "<b>hi</b>".into(),
    };
    let errors = form.validate().unwrap_err();
    let html = contact(&form, Some(&errors), None);
    assert!(html.contains("value=\"a&quot;b@example.com\""));
    assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;</textarea>"));
    assert!(html.contains("Field must be between 2 and 100 characters long."));
    assert!(!html.contains("flash-"));
  }

  #[test]
  fn flash_statuses() {
    assert_eq!(Flash::from_status("sent"), Some(Flash::Sent));
    assert_eq!(Flash::from_status("saved"), Some(Flash::Saved));
    assert_eq!(Flash::from_status("other"), None);

    let html = contact(&ContactForm::default(), None, Some(Flash::Saved));
    assert!(html.contains("class=\"flash-warning\""));
  }
}
