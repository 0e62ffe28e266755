//! Outbound notification of new contact messages.
//!
//! The pipeline only sees the object-safe [`Notifier`] trait; the server
//! binary picks [`SmtpNotifier`] when a `mail` section is configured and
//! [`DisabledNotifier`] otherwise.

use std::{future::Future, pin::Pin, time::Duration};

use folio_core::contact::ContactMessage;
use lettre::{
  AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
  message::{Mailbox, header::ContentType},
  transport::smtp::authentication::Credentials,
};
use serde::Deserialize;
use thiserror::Error;

pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<(), MailError>> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum MailError {
  #[error("mail notifications are not configured")]
  Disabled,
  #[error("invalid address: {0}")]
  Address(#[from] lettre::address::AddressError),
  #[error("failed to build message: {0}")]
  Build(#[from] lettre::error::Error),
  #[error("smtp: {0}")]
  Smtp(#[from] lettre::transport::smtp::Error),
}

/// Tells the site owner about a freshly persisted contact message.
pub trait Notifier: Send + Sync {
  fn notify<'a>(&'a self, message: &'a ContactMessage) -> NotifyFuture<'a>;
}

// ─── Configuration ────────────────────────────────────────────────────────────

/// The `mail` section of the server configuration.
#[derive(Deserialize, Clone)]
pub struct MailConfig {
  pub smtp_host:     String,
  #[serde(default = "default_smtp_port")]
  pub smtp_port:     u16,
  #[serde(default)]
  pub smtp_username: Option<String>,
  #[serde(default)]
  pub smtp_password: Option<String>,
  /// Envelope sender, e.g. `Folio <noreply@example.com>`.
  pub from:          String,
  /// Where notifications are delivered.
  pub admin_email:   String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs:  u64,
  #[serde(default = "default_starttls")]
  pub starttls:      bool,
}

fn default_smtp_port() -> u16 { 587 }
fn default_timeout_secs() -> u64 { 10 }
fn default_starttls() -> bool { true }

impl MailConfig {
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

// ─── SMTP ─────────────────────────────────────────────────────────────────────

pub struct SmtpNotifier {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from:      Mailbox,
  to:        Mailbox,
}

impl SmtpNotifier {
  pub fn new(config: &MailConfig) -> Result<Self, MailError> {
    let mut builder = if config.starttls {
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
    };
    builder = builder
      .port(config.smtp_port)
      .timeout(Some(config.timeout()));
    if let Some(username) = &config.smtp_username {
      let password = config.smtp_password.clone().unwrap_or_default();
      builder = builder.credentials(Credentials::new(username.clone(), password));
    }

    Ok(Self {
      transport: builder.build(),
      from:      config.from.parse()?,
      to:        config.admin_email.parse()?,
    })
  }
}

impl Notifier for SmtpNotifier {
  fn notify<'a>(&'a self, message: &'a ContactMessage) -> NotifyFuture<'a> {
    Box::pin(async move {
      let email = compose(self.from.clone(), self.to.clone(), message)?;
      self.transport.send(email).await?;
      Ok(())
    })
  }
}

/// Used when no `mail` section is configured; every attempt fails.
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
  fn notify<'a>(&'a self, _message: &'a ContactMessage) -> NotifyFuture<'a> {
    Box::pin(async { Err(MailError::Disabled) })
  }
}

// ─── Composition ──────────────────────────────────────────────────────────────

pub fn subject_line(message: &ContactMessage) -> String {
  format!(
    "Portfolio Contact: {}",
    message.subject.as_deref().unwrap_or("New Message")
  )
}

pub fn body_text(message: &ContactMessage) -> String {
  format!(
    "New contact form submission:\n\n\
     Name: {}\n\
     Email: {}\n\
     Subject: {}\n\n\
     Message:\n{}\n",
    message.name,
    message.email,
    message.subject.as_deref().unwrap_or(""),
    message.message,
  )
}

/// Build the notification; replies go straight to the submitter.
pub fn compose(from: Mailbox, to: Mailbox, message: &ContactMessage) -> Result<Message, MailError> {
  let reply_to = Mailbox::new(Some(message.name.clone()), message.email.parse()?);
  let email = Message::builder()
    .from(from)
    .to(to)
    .reply_to(reply_to)
    .subject(subject_line(message))
    .header(ContentType::TEXT_PLAIN)
    .body(body_text(message))?;
  Ok(email)
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use folio_core::validation::is_valid_email;

  use super::*;

  fn message(subject: Option<&str>) -> ContactMessage {
    ContactMessage {
      id:         1,
      name:       "Grace Hopper".into(),
      email:      "grace@example.com".into(),
      subject:    subject.map(str::to_owned),
      message:    "Would you like to talk about compilers?".into(),
      created_at: Utc::now(),
      read:       false,
    }
  }

  fn mailboxes() -> (Mailbox, Mailbox) {
    (
      "Folio <noreply@example.com>".parse().unwrap(),
      "owner@example.com".parse().unwrap(),
    )
  }

  #[test]
  fn subject_defaults_when_blank() {
    assert_eq!(subject_line(&message(None)), "Portfolio Contact: New Message");
    assert_eq!(subject_line(&message(Some("Hiring"))), "Portfolio Contact: Hiring");
  }

  #[test]
  fn body_lists_every_field() {
    let body = body_text(&message(Some("Hiring")));
    assert!(body.contains("Name: Grace Hopper"));
    assert!(body.contains("Email: grace@example.com"));
    assert!(body.contains("Subject: Hiring"));
    assert!(body.ends_with("Would you like to talk about compilers?\n"));
  }

  #[test]
  fn composed_message_replies_to_submitter() {
    let (from, to) = mailboxes();
    let email = compose(from, to, &message(None)).unwrap();
    let raw = String::from_utf8(email.formatted()).unwrap();
    assert!(raw.contains("owner@example.com"));
    let reply_to = raw
      .lines()
      .find(|l| l.starts_with("Reply-To:"))
      .unwrap();
    assert!(reply_to.contains("<grace@example.com>"));
    assert!(raw.contains("Subject: Portfolio Contact: New Message"));
  }

  #[test]
  fn invalid_submitter_address_fails_to_compose() {
    let (from, to) = mailboxes();
    let mut msg = message(None);
    msg.email = "not an address".into();
    assert!(matches!(compose(from, to, &msg), Err(MailError::Address(_))));
  }

  #[test]
  fn form_accepted_addresses_are_sendable() {
    let candidates = [
      "jane@example.com",
      "first.last+tag@mail.example.co.uk",
      "o'brien@example.ie",
      "a!#$%&*/=?^_`{|}~-b@example.com",
      "x@sub-domain.example.org",
      "a\"b@example.com",
      "a(b)c@example.com",
      "a,b@example.com",
      "jos\u{e9}@example.com",
    ];
    for address in candidates {
      if !is_valid_email(address) {
        continue;
      }
      let (from, to) = mailboxes();
      let mut msg = message(None);
      msg.email = address.to_owned();
      assert!(
        compose(from, to, &msg).is_ok(),
        "{address} passes form validation but cannot be used as Reply-To"
      );
    }
  }

  #[tokio::test]
  async fn disabled_notifier_always_fails() {
    let result = DisabledNotifier.notify(&message(None)).await;
    assert!(matches!(result, Err(MailError::Disabled)));
  }
}
