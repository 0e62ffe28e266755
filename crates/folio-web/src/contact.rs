//! The contact submission pipeline: validate, persist, then notify on a
//! best-effort basis.
//!
//! A valid submission is always committed before the notifier runs, and a
//! notification failure or timeout never undoes it.

use std::time::Duration;

use folio_core::{
  ValidationErrors,
  contact::{ContactForm, ContactMessage},
  store::PortfolioStore,
};
use thiserror::Error;

use crate::mail::Notifier;

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
  /// Persisted and the owner was notified.
  Acknowledged(ContactMessage),
  /// Persisted, but the notification failed or timed out.
  AcknowledgedWithWarning(ContactMessage),
}

impl SubmitOutcome {
  pub fn message(&self) -> &ContactMessage {
    match self {
      Self::Acknowledged(m) | Self::AcknowledgedWithWarning(m) => m,
    }
  }

  /// Value of the `status` query parameter the visitor is redirected with.
  pub fn status(&self) -> &'static str {
    match self {
      Self::Acknowledged(_) => "sent",
      Self::AcknowledgedWithWarning(_) => "saved",
    }
  }
}

#[derive(Debug, Error)]
pub enum SubmitError<E> {
  #[error("invalid submission: {0}")]
  Invalid(ValidationErrors),
  #[error("failed to persist submission: {0}")]
  Store(#[source] E),
}

pub async fn submit<S: PortfolioStore>(
  store: &S,
  notifier: &dyn Notifier,
  timeout: Duration,
  form: &ContactForm,
) -> Result<SubmitOutcome, SubmitError<S::Error>> {
  let input = form.validate().map_err(SubmitError::Invalid)?;
  let message = store
    .create_message(input)
    .await
    .map_err(SubmitError::Store)?;
  tracing::info!(id = message.id, "contact message stored");

  match tokio::time::timeout(timeout, notifier.notify(&message)).await {
    Ok(Ok(())) => Ok(SubmitOutcome::Acknowledged(message)),
    Ok(Err(e)) => {
      tracing::warn!(id = message.id, error = %e, "contact notification failed");
      Ok(SubmitOutcome::AcknowledgedWithWarning(message))
    }
    Err(_) => {
      tracing::warn!(id = message.id, ?timeout, "contact notification timed out");
      Ok(SubmitOutcome::AcknowledgedWithWarning(message))
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{
    collections::BTreeMap,
    sync::{
      Mutex,
      atomic::{AtomicUsize, Ordering},
    },
  };

  use folio_core::admin::{AdminQuery, Entity};
  use folio_store_sqlite::SqliteStore;

  use super::*;
  use crate::mail::{DisabledNotifier, MailError, NotifyFuture};

  #[derive(Default)]
  struct Recording {
    subjects: Mutex<Vec<Option<String>>>,
  }

  impl Notifier for Recording {
    fn notify<'a>(&'a self, message: &'a ContactMessage) -> NotifyFuture<'a> {
      Box::pin(async move {
        self.subjects.lock().unwrap().push(message.subject.clone());
        Ok(())
      })
    }
  }

  #[derive(Default)]
  struct Hanging {
    calls: AtomicUsize,
  }

  impl Notifier for Hanging {
    fn notify<'a>(&'a self, _message: &'a ContactMessage) -> NotifyFuture<'a> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Box::pin(std::future::pending::<Result<(), MailError>>())
    }
  }

  const TIMEOUT: Duration = Duration::from_millis(50);

  fn form() -> ContactForm {
    ContactForm {
      name:    "Ada Lovelace".into(),
      email:   "ada@example.com".into(),
      subject: "Engines".into(),
      message: "I would love to hear more about your projects.".into(),
    }
  }

  async fn message_count(store: &SqliteStore) -> u64 {
    let view = Entity::Message.view();
    let query = AdminQuery::from_params(view, &BTreeMap::new()).unwrap();
    store.admin_list(view, &query).await.unwrap().total
  }

  #[tokio::test]
  async fn delivered_notification_acknowledges() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let notifier = Recording::default();

    let outcome = submit(&store, &notifier, TIMEOUT, &form()).await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::Acknowledged(_)));
    assert_eq!(outcome.status(), "sent");
    assert!(!outcome.message().read);
    assert_eq!(*notifier.subjects.lock().unwrap(), [Some("Engines".to_string())]);
    assert_eq!(message_count(&store).await, 1);
  }

  #[tokio::test]
  async fn failed_notification_keeps_message() {
    let store = SqliteStore::open_in_memory().await.unwrap();

    let outcome = submit(&store, &DisabledNotifier, TIMEOUT, &form()).await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::AcknowledgedWithWarning(_)));
    assert_eq!(outcome.status(), "saved");
    assert_eq!(message_count(&store).await, 1);
    assert_eq!(store.dashboard_stats().await.unwrap().unread_messages, 1);
  }

  #[tokio::test]
  async fn hanging_notification_times_out() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let notifier = Hanging::default();

    let outcome = submit(&store, &notifier, TIMEOUT, &form()).await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::AcknowledgedWithWarning(_)));
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    assert_eq!(message_count(&store).await, 1);
  }

  #[tokio::test]
  async fn invalid_form_has_no_side_effects() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let notifier = Recording::default();
    let mut bad = form();
    bad.email = "nope".into();

    let err = submit(&store, &notifier, TIMEOUT, &bad).await.unwrap_err();

    let SubmitError::Invalid(errors) = err else {
      panic!("expected validation failure");
    };
    assert_eq!(errors.field("email"), ["Invalid email address."]);
    assert!(notifier.subjects.lock().unwrap().is_empty());
    assert_eq!(message_count(&store).await, 0);
  }

  #[tokio::test]
  async fn blank_subject_is_stored_as_none() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let notifier = Recording::default();
    let mut f = form();
    f.subject = "   ".into();

    let outcome = submit(&store, &notifier, TIMEOUT, &f).await.unwrap();

    assert_eq!(outcome.message().subject, None);
    let stored = store
      .admin_get(Entity::Message, outcome.message().id)
      .await
      .unwrap();
    assert!(stored.is_some());
  }
}
