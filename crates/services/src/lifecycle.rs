//! # Take Lifecycle Service
//!
//! Orchestrates a submission end to end: validate input → invoke the
//! moderation classifier → construct the record → persist → return a
//! client-ready projection. Moderation is a hard prerequisite to
//! persistence: no take is ever stored unmoderated while moderation is
//! enabled.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    ModerationClassifier, ModerationVerdict, NewTake, Result, Take, TakeError, TakeStore, Votes,
};

pub struct TakeLifecycleService {
    classifier: Arc<dyn ModerationClassifier>,
    store: Arc<dyn TakeStore>,
    /// When false the classifier is skipped entirely and takes persist
    /// with `is_flagged = false`.
    moderation_enabled: bool,
}

impl TakeLifecycleService {
    pub fn new(
        classifier: Arc<dyn ModerationClassifier>,
        store: Arc<dyn TakeStore>,
        moderation_enabled: bool,
    ) -> Self {
        Self {
            classifier,
            store,
            moderation_enabled,
        }
    }

    /// Submits one take.
    ///
    /// Side effects per invocation: at most one classifier call and, only
    /// after a successful classification, at most one store insert. There
    /// are no partial writes and no retries; every failure is terminal for
    /// this single action.
    ///
    /// The returned projection carries the store-generated id but a
    /// client-side `created_at` approximation; the canonical store
    /// timestamp becomes visible on the next full load.
    pub async fn submit_take(&self, text: &str) -> Result<Take> {
        if text.trim().is_empty() {
            return Err(TakeError::EmptyInput);
        }

        let verdict = if self.moderation_enabled {
            self.classifier
                .classify(text)
                .await
                .map_err(TakeError::ModerationUnavailable)?
        } else {
            ModerationVerdict {
                flag_for_review: false,
                reason: None,
            }
        };

        if verdict.flag_for_review {
            tracing::info!(
                reason = verdict.reason.as_deref().unwrap_or(""),
                "take flagged for review"
            );
        }

        let is_flagged = verdict.flag_for_review;
        let flag_reason = verdict.reason.unwrap_or_default();

        let id = self
            .store
            .insert(NewTake {
                text: text.to_string(),
                is_flagged,
                flag_reason: flag_reason.clone(),
            })
            .await
            .map_err(TakeError::PersistenceFailure)?;

        Ok(Take {
            id,
            text: text.to_string(),
            votes: Votes::default(),
            comments: Vec::new(),
            created_at: Utc::now(),
            is_flagged,
            flag_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockModerationClassifier, MockTakeStore};
    use mockall::predicate::*;
    use uuid::Uuid;

    fn verdict(flag: bool, reason: Option<&str>) -> ModerationVerdict {
        ModerationVerdict {
            flag_for_review: flag,
            reason: reason.map(String::from),
        }
    }

    #[tokio::test]
    async fn submit_calls_classifier_once_then_inserts_once() {
        let mut classifier = MockModerationClassifier::new();
        classifier
            .expect_classify()
            .with(eq("Pineapple belongs on pizza"))
            .times(1)
            .returning(|_| Ok(verdict(false, None)));

        let mut store = MockTakeStore::new();
        store
            .expect_insert()
            .withf(|new| {
                new.text == "Pineapple belongs on pizza"
                    && !new.is_flagged
                    && new.flag_reason.is_empty()
            })
            .times(1)
            .returning(|_| Ok(Uuid::now_v7()));

        let svc = TakeLifecycleService::new(Arc::new(classifier), Arc::new(store), true);
        let take = svc.submit_take("Pineapple belongs on pizza").await.unwrap();

        assert_eq!(take.text, "Pineapple belongs on pizza");
        assert!(!take.is_flagged);
        assert_eq!(take.flag_reason, "");
        assert_eq!(take.votes, Votes::default());
        assert!(take.comments.is_empty());
    }

    #[tokio::test]
    async fn flagged_takes_still_persist_with_reason() {
        let mut classifier = MockModerationClassifier::new();
        classifier
            .expect_classify()
            .times(1)
            .returning(|_| Ok(verdict(true, Some("negativity"))));

        let mut store = MockTakeStore::new();
        store
            .expect_insert()
            .withf(|new| new.is_flagged && new.flag_reason == "negativity")
            .times(1)
            .returning(|_| Ok(Uuid::now_v7()));

        let svc = TakeLifecycleService::new(Arc::new(classifier), Arc::new(store), true);
        let take = svc.submit_take("Refs decide every game").await.unwrap();

        assert!(take.is_flagged);
        assert_eq!(take.flag_reason, "negativity");
    }

    #[tokio::test]
    async fn empty_or_whitespace_input_never_reaches_remote_calls() {
        let mut classifier = MockModerationClassifier::new();
        classifier.expect_classify().times(0);
        let mut store = MockTakeStore::new();
        store.expect_insert().times(0);

        let svc = TakeLifecycleService::new(Arc::new(classifier), Arc::new(store), true);

        for input in ["", "   ", "\t\n"] {
            let err = svc.submit_take(input).await.unwrap_err();
            assert!(matches!(err, TakeError::EmptyInput));
        }
    }

    #[tokio::test]
    async fn classifier_failure_aborts_before_insert() {
        let mut classifier = MockModerationClassifier::new();
        classifier
            .expect_classify()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("quota exceeded")));

        let mut store = MockTakeStore::new();
        store.expect_insert().times(0);

        let svc = TakeLifecycleService::new(Arc::new(classifier), Arc::new(store), true);
        let err = svc.submit_take("hot take").await.unwrap_err();
        assert!(matches!(err, TakeError::ModerationUnavailable(_)));
    }

    #[tokio::test]
    async fn insert_failure_surfaces_as_persistence_failure() {
        let mut classifier = MockModerationClassifier::new();
        classifier
            .expect_classify()
            .times(1)
            .returning(|_| Ok(verdict(false, None)));

        let mut store = MockTakeStore::new();
        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("connection reset")));

        let svc = TakeLifecycleService::new(Arc::new(classifier), Arc::new(store), true);
        let err = svc.submit_take("hot take").await.unwrap_err();
        assert!(matches!(err, TakeError::PersistenceFailure(_)));
    }

    #[tokio::test]
    async fn moderation_disabled_skips_classifier_and_persists_unflagged() {
        let mut classifier = MockModerationClassifier::new();
        classifier.expect_classify().times(0);

        let mut store = MockTakeStore::new();
        store
            .expect_insert()
            .withf(|new| !new.is_flagged && new.flag_reason.is_empty())
            .times(1)
            .returning(|_| Ok(Uuid::now_v7()));

        let svc = TakeLifecycleService::new(Arc::new(classifier), Arc::new(store), false);
        let take = svc.submit_take("hot take").await.unwrap();
        assert!(!take.is_flagged);
    }

    #[tokio::test]
    async fn schema_valid_verdict_without_reason_yields_empty_reason() {
        let mut classifier = MockModerationClassifier::new();
        classifier
            .expect_classify()
            .times(1)
            .returning(|_| Ok(verdict(true, None)));

        let mut store = MockTakeStore::new();
        store
            .expect_insert()
            .withf(|new| new.is_flagged && new.flag_reason.is_empty())
            .times(1)
            .returning(|_| Ok(Uuid::now_v7()));

        let svc = TakeLifecycleService::new(Arc::new(classifier), Arc::new(store), true);
        let take = svc.submit_take("hot take").await.unwrap();
        assert!(take.is_flagged);
        assert_eq!(take.flag_reason, "");
    }
}
