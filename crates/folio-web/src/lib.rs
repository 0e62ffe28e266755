//! The Folio web server.
//!
//! Serves the public HTML pages, the contact form, the JSON project listing
//! and the Basic-auth protected admin surface, all backed by any
//! [`PortfolioStore`].

pub mod auth;
pub mod contact;
pub mod error;
pub mod handlers;
pub mod mail;
pub mod render;

pub use error::Error;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{Router, middleware, routing::get};
use folio_core::store::PortfolioStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_admin};
use mail::{MailConfig, Notifier};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `FOLIO_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  #[serde(default = "default_store_path")]
  pub store_path:          PathBuf,
  /// Required to serve; `--seed` runs without it.
  #[serde(default)]
  pub admin_username:      String,
  #[serde(default)]
  pub admin_password_hash: String,
  /// Notifications are disabled when absent.
  #[serde(default)]
  pub mail:                Option<MailConfig>,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 5005 }
fn default_store_path() -> PathBuf { PathBuf::from("portfolio.db") }

/// Used only when no `mail` section is configured.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all page handlers.
pub struct AppState<S> {
  pub store:          Arc<S>,
  pub auth:           Arc<AuthConfig>,
  pub notifier:       Arc<dyn Notifier>,
  pub notify_timeout: Duration,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:          self.store.clone(),
      auth:           self.auth.clone(),
      notifier:       self.notifier.clone(),
      notify_timeout: self.notify_timeout,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete site router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PortfolioStore + 'static,
{
  let admin = folio_api::admin_router(state.store.clone()).route_layer(
    middleware::from_fn_with_state(state.auth.clone(), require_admin),
  );

  Router::new()
    .route("/",             get(handlers::home::handler::<S>))
    .route("/project/{id}", get(handlers::project::handler::<S>))
    .route("/portfolio",    get(handlers::portfolio::handler::<S>))
    .route(
      "/contact",
      get(handlers::contact::show).post(handlers::contact::submit_form::<S>),
    )
    .route("/resume",       get(handlers::resume::handler::<S>))
    .with_state(state.clone())
    .nest("/api", folio_api::api_router(state.store))
    .merge(admin)
    .fallback(handlers::not_found)
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
  use folio_core::{
    contact::ContactMessage,
    experience::{ExperienceType, NewExperience},
    project::{NewProject, TechList},
    settings::keys,
    skill::NewSkill,
  };
  use folio_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use tower::ServiceExt as _;

  use super::*;
  use crate::mail::{DisabledNotifier, NotifyFuture};

  struct AlwaysDelivers;

  impl Notifier for AlwaysDelivers {
    fn notify<'a>(&'a self, _message: &'a ContactMessage) -> NotifyFuture<'a> {
      Box::pin(async { Ok(()) })
    }
  }

  fn auth_config() -> AuthConfig {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(b"hunter2", &salt)
      .unwrap()
      .to_string();
    AuthConfig {
      username:      "admin".to_string(),
      password_hash: hash,
    }
  }

  async fn make_state(notifier: Arc<dyn Notifier>) -> AppState<SqliteStore> {
    AppState {
      store: Arc::new(SqliteStore::open_in_memory().await.unwrap()),
      auth: Arc::new(auth_config()),
      notifier,
      notify_timeout: Duration::from_millis(100),
    }
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn get_page(state: &AppState<SqliteStore>, uri: &str) -> Response {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router(state.clone()).oneshot(req).await.unwrap()
  }

  async fn post_form(state: &AppState<SqliteStore>, uri: &str, body: &str) -> Response {
    let req = Request::builder()
      .method("POST")
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
      .body(Body::from(body.to_owned()))
      .unwrap();
    router(state.clone()).oneshot(req).await.unwrap()
  }

  async fn text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  fn location(resp: &Response) -> &str {
    resp.headers()[header::LOCATION].to_str().unwrap()
  }

  async fn add_project(store: &SqliteStore, title: &str, techs: &str, featured: bool) -> i64 {
    store
      .create_project(NewProject {
        technologies: TechList::parse(techs),
        featured,
        ..NewProject::new(title, "A description")
      })
      .await
      .unwrap()
      .id
  }

  // ── Public pages ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn home_page_uses_defaults_and_featured_fallback() {
    let state = make_state(Arc::new(DisabledNotifier)).await;
    add_project(&state.store, "Homelab Server", "Docker", false).await;

    let resp = get_page(&state, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = text(resp).await;
    assert!(body.contains("Software Developer"));
    assert!(body.contains("Building amazing digital experiences"));
    assert!(body.contains("Homelab Server"));
  }

  #[tokio::test]
  async fn home_page_renders_timeline_and_skills() {
    let state = make_state(Arc::new(DisabledNotifier)).await;
    state
      .store
      .set_setting(keys::HERO_TITLE, "Systems Tinkerer")
      .await
      .unwrap();
    state
      .store
      .create_experience(NewExperience {
        experience_type: ExperienceType::Education,
        ..NewExperience::new(
          "BSc Computer Science",
          "Example University",
          chrono::NaiveDate::from_ymd_opt(2014, 9, 1).unwrap(),
        )
      })
      .await
      .unwrap();
    state
      .store
      .create_skill(NewSkill::new("Rust", "languages", 80))
      .await
      .unwrap();

    let body = text(get_page(&state, "/").await).await;
    assert!(body.contains("Systems Tinkerer"));
    assert!(body.contains("Example University"));
    assert!(body.contains("Sep 2014 - Present"));
    assert!(body.contains("languages"));
    assert!(body.contains("80%"));
  }

  #[tokio::test]
  async fn project_detail_and_missing_ids() {
    let state = make_state(Arc::new(DisabledNotifier)).await;
    let id = add_project(&state.store, "Sensor Dashboard", "Python, Grafana", true).await;
    add_project(&state.store, "Scraper", "python", false).await;

    let resp = get_page(&state, &format!("/project/{id}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = text(resp).await;
    assert!(body.contains("Sensor Dashboard"));
    assert!(body.contains("Related Projects"));
    assert!(body.contains("Scraper"));

    assert_eq!(get_page(&state, "/project/9999").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get_page(&state, "/project/abc").await.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn portfolio_filters_by_whole_tag() {
    let state = make_state(Arc::new(DisabledNotifier)).await;
    add_project(&state.store, "Legacy Service", "Java", false).await;
    add_project(&state.store, "Web Widget", "JavaScript", false).await;

    let resp = get_page(&state, "/portfolio?tech=java&page=junk").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = text(resp).await;
    assert!(body.contains("Legacy Service"));
    assert!(!body.contains("Web Widget</a>"));
    // Facets still list every tag.
    assert!(body.contains("href=\"/portfolio?page=1&amp;tech=JavaScript\""));
  }

  #[tokio::test]
  async fn portfolio_past_the_end_is_empty() {
    let state = make_state(Arc::new(DisabledNotifier)).await;
    add_project(&state.store, "Only One", "Rust", false).await;

    let body = text(get_page(&state, "/portfolio?page=5").await).await;
    assert!(body.contains("No projects found."));
  }

  #[tokio::test]
  async fn resume_redirects_only_when_url_is_set() {
    let state = make_state(Arc::new(DisabledNotifier)).await;

    let resp = get_page(&state, "/resume").await;
    assert_eq!(resp.status(), StatusCode::OK);

    state.store.set_setting(keys::RESUME_URL, "   ").await.unwrap();
    assert_eq!(get_page(&state, "/resume").await.status(), StatusCode::OK);

    state
      .store
      .set_setting(keys::RESUME_URL, "https://files.example.com/cv.pdf")
      .await
      .unwrap();
    let resp = get_page(&state, "/resume").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "https://files.example.com/cv.pdf");
  }

  #[tokio::test]
  async fn unusable_resume_url_renders_builtin_resume() {
    let state = make_state(Arc::new(DisabledNotifier)).await;
    state
      .store
      .set_setting(keys::RESUME_URL, "https://files.example.com/a\nb.pdf")
      .await
      .unwrap();

    let resp = get_page(&state, "/resume").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!resp.headers().contains_key(header::LOCATION));
    assert!(text(resp).await.contains("<h1>Resume</h1>"));
  }

  #[tokio::test]
  async fn api_projects_is_public() {
    let state = make_state(Arc::new(DisabledNotifier)).await;
    add_project(&state.store, "Homelab Server", "Docker", true).await;

    let resp = get_page(&state, "/api/projects").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(text(resp).await.contains("\"Homelab Server\""));
  }

  #[tokio::test]
  async fn unknown_route_is_html_404() {
    let state = make_state(Arc::new(DisabledNotifier)).await;
    let resp = get_page(&state, "/no/such/page").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(text(resp).await.contains("Page not found"));
  }

  // ── Contact ────────────────────────────────────────────────────────────────

  const VALID_FORM: &str =
    "name=Ada+Lovelace&email=ada%40example.com&subject=&message=Hello+there%2C+nice+site%21";

  #[tokio::test]
  async fn contact_submission_with_delivery_redirects_sent() {
    let state = make_state(Arc::new(AlwaysDelivers)).await;

    let resp = post_form(&state, "/contact", VALID_FORM).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/contact?status=sent");

    let body = text(get_page(&state, "/contact?status=sent").await).await;
    assert!(body.contains("flash-success"));
  }

  #[tokio::test]
  async fn contact_submission_without_mail_is_saved() {
    let state = make_state(Arc::new(DisabledNotifier)).await;

    let resp = post_form(&state, "/contact", VALID_FORM).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/contact?status=saved");
    assert_eq!(state.store.dashboard_stats().await.unwrap().unread_messages, 1);
  }

  #[tokio::test]
  async fn invalid_contact_submission_rerenders_form() {
    let state = make_state(Arc::new(AlwaysDelivers)).await;

    let resp = post_form(&state, "/contact", "name=A&email=bad&message=short").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = text(resp).await;
    assert!(body.contains("Invalid email address."));
    assert!(body.contains("value=\"bad\""));
    assert!(body.contains(">short</textarea>"));
    assert_eq!(state.store.dashboard_stats().await.unwrap().unread_messages, 0);
  }

  // ── Admin auth ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_requires_credentials() {
    let state = make_state(Arc::new(DisabledNotifier)).await;

    let resp = get_page(&state, "/admin/").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let req = Request::builder()
      .uri("/admin/projects")
      .header(header::AUTHORIZATION, auth_header("admin", "wrong"))
      .body(Body::empty())
      .unwrap();
    let resp = router(state.clone()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn admin_dashboard_with_credentials() {
    let state = make_state(Arc::new(DisabledNotifier)).await;
    add_project(&state.store, "Homelab Server", "Docker", true).await;

    for uri in ["/admin", "/admin/"] {
      let req = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, auth_header("admin", "hunter2"))
        .body(Body::empty())
        .unwrap();
      let resp = router(state.clone()).oneshot(req).await.unwrap();
      assert_eq!(resp.status(), StatusCode::OK);
      assert!(text(resp).await.contains("\"project_count\":1"));
    }
  }
}
