//! # Take Feed Controller
//!
//! Session-scoped state container over the take collection: loads the
//! full list once, applies optimistic local mutations on vote/comment/
//! submit, and derives sorted views without touching stored order.
//!
//! Local `votes` and `comments` are a display cache, eventually
//! consistent with the store. The store stays authoritative for
//! concurrent sessions; `load()` is the only reconciling operation.

use std::sync::Arc;

use domains::{Result, SortKey, Take, TakeError, TakeStore, VoteChoice};
use uuid::Uuid;

use crate::lifecycle::TakeLifecycleService;

pub struct TakeFeed {
    lifecycle: Arc<TakeLifecycleService>,
    store: Arc<dyn TakeStore>,
    takes: Vec<Take>,
    draft: String,
    sort_key: SortKey,
    is_loading: bool,
    /// Advisory only: the presentation layer may disable controls while a
    /// call is in flight, but nothing here enforces mutual exclusion.
    is_busy: bool,
}

impl TakeFeed {
    pub fn new(lifecycle: Arc<TakeLifecycleService>, store: Arc<dyn TakeStore>) -> Self {
        Self {
            lifecycle,
            store,
            takes: Vec::new(),
            draft: String::new(),
            sort_key: SortKey::default(),
            is_loading: false,
            is_busy: false,
        }
    }

    pub fn takes(&self) -> &[Take] {
        &self.takes
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_busy(&self) -> bool {
        self.is_busy
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    /// Replaces in-memory state with a fresh full scan. On failure the
    /// previous list is kept untouched.
    pub async fn load(&mut self) -> Result<()> {
        self.is_loading = true;
        let fetched = self.store.list_all().await;
        self.is_loading = false;

        match fetched {
            Ok(takes) => {
                self.takes = takes;
                Ok(())
            }
            Err(e) => Err(TakeError::FetchFailure(e)),
        }
    }

    /// Submits via the lifecycle service. On success the returned take is
    /// prepended (newest-first insertion regardless of the displayed sort)
    /// and the draft buffer is cleared.
    pub async fn submit(&mut self, text: &str) -> Result<Take> {
        self.is_busy = true;
        let result = self.lifecycle.submit_take(text).await;
        self.is_busy = false;

        let take = result?;
        self.takes.insert(0, take.clone());
        self.draft.clear();
        Ok(take)
    }

    /// Store increment first, then an optimistic local +1. A failed
    /// increment leaves the local counter untouched; a divergent counter
    /// from other sessions' votes resolves on the next `load()`.
    pub async fn vote(&mut self, id: Uuid, choice: VoteChoice) -> Result<()> {
        self.is_busy = true;
        let result = self.store.increment_vote(id, choice).await;
        self.is_busy = false;

        result.map_err(TakeError::VoteFailure)?;

        if let Some(take) = self.takes.iter_mut().find(|t| t.id == id) {
            match choice {
                VoteChoice::Yes => take.votes.yes += 1,
                VoteChoice::No => take.votes.no += 1,
            }
        }
        Ok(())
    }

    /// Empty comment text is a silent no-op. Otherwise: store append
    /// first, then an optimistic local append.
    pub async fn add_comment(&mut self, id: Uuid, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        self.is_busy = true;
        let result = self.store.append_comment(id, text).await;
        self.is_busy = false;

        result.map_err(TakeError::CommentFailure)?;

        if let Some(take) = self.takes.iter_mut().find(|t| t.id == id) {
            take.comments.push(text.to_string());
        }
        Ok(())
    }

    /// Pure derivation of the current sort over the current list. Stored
    /// order never changes; `Vec::sort_by` is stable, so ties keep their
    /// original relative order.
    pub fn sorted_view(&self) -> Vec<Take> {
        sorted_by(&self.takes, self.sort_key)
    }
}

/// Stable sort of a take list by the given key; `Unsorted` is identity.
pub fn sorted_by(takes: &[Take], key: SortKey) -> Vec<Take> {
    let mut view = takes.to_vec();
    match key {
        SortKey::Newest => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => view.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::MostVotesTotal => view.sort_by(|a, b| b.votes.total().cmp(&a.votes.total())),
        SortKey::MostApproved => view.sort_by(|a, b| b.votes.yes.cmp(&a.votes.yes)),
        SortKey::MostDisapproved => view.sort_by(|a, b| b.votes.no.cmp(&a.votes.no)),
        SortKey::MostDiscussed => view.sort_by(|a, b| b.comments.len().cmp(&a.comments.len())),
        SortKey::Unsorted => {}
    }
    view
}
