//! Fetched collections kept in sync with confirmed server mutations.
//!
//! A [`ListController`] owns one collection loaded from a [`ListSource`].
//! Local state only changes after the server has acknowledged a write, so
//! a failed call never leaves the collection half-updated.

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::error::{ClientError, Result};

/// Something with a stable identifier inside its collection
pub trait Keyed {
    fn key(&self) -> &str;
}

/// What to do with the held collection after a confirmed create or update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationPolicy {
    /// Splice the confirmed item into the collection
    #[default]
    Splice,
    /// Reload the whole collection from the server
    Refetch,
}

/// A remote collection the controller can read and mutate
#[async_trait]
pub trait ListSource: Send + Sync {
    type Item: Keyed + Clone + Send + Sync;

    /// Human name of one item, used in confirmation prompts
    fn noun(&self) -> &str;

    fn policy(&self) -> MutationPolicy {
        MutationPolicy::Splice
    }

    async fn list(&self) -> Result<Vec<Self::Item>>;

    async fn create(&self, item: &Self::Item) -> Result<Self::Item>;

    async fn replace(&self, key: &str, _item: &Self::Item) -> Result<Self::Item> {
        Err(ClientError::Validation(format!(
            "{} '{}' cannot be updated",
            self.noun(),
            key
        )))
    }

    async fn delete(&self, key: &str) -> Result<()>;
}

/// Injected approval step for destructive actions
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// Outcome of [`ListController::remove`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The server confirmed and the item left the collection
    Removed,
    /// The server confirmed but nothing local carried that key
    NotHeld,
    /// Confirmation was refused; no request was made
    Declined,
}

/// Sequence number of one load request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

pub struct ListController<S: ListSource> {
    source: S,
    items: Vec<S::Item>,
    state: ListState,
    notice: Option<String>,
    issued: u64,
}

impl<S: ListSource> ListController<S> {
    pub fn new(source: S) -> Self {
        ListController {
            source,
            items: Vec::new(),
            state: ListState::Idle,
            notice: None,
            issued: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Last successfully loaded collection, with confirmed mutations applied
    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    /// Message from the last failed mutation, if any
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Held items that satisfy `predicate`
    pub fn visible<P>(&self, predicate: P) -> Vec<&S::Item>
    where
        P: Fn(&S::Item) -> bool,
    {
        self.items.iter().filter(|item| predicate(item)).collect()
    }

    /// Fetch the collection and apply the result
    pub async fn load(&mut self) -> &ListState {
        let ticket = self.begin_load();
        let result = self.source.list().await;
        self.finish_load(ticket, result);
        &self.state
    }

    /// Start a load. Only the most recently issued ticket can apply its
    /// result.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.state = ListState::Loading;
        debug!("loading {} list (request {})", self.source.noun(), self.issued);
        LoadTicket(self.issued)
    }

    /// Apply the outcome of the load identified by `ticket`.
    ///
    /// Returns `false` when a newer load has been issued since, in which
    /// case the result is dropped.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<S::Item>>) -> bool {
        if ticket.0 != self.issued {
            warn!(
                "discarding stale {} list (request {}, latest {})",
                self.source.noun(),
                ticket.0,
                self.issued
            );
            return false;
        }

        match result {
            Ok(items) => {
                debug!("loaded {} {} item(s)", items.len(), self.source.noun());
                self.items = items;
                self.state = ListState::Loaded;
            }
            Err(e) => {
                warn!("loading {} list failed: {}", self.source.noun(), e);
                self.state = ListState::Error(e.to_string());
            }
        }
        true
    }

    /// Delete the item with `key` once `confirm` approves and the server
    /// acknowledges.
    ///
    /// On failure the collection and state are left as they were and the
    /// message is kept as a notice.
    pub async fn remove<C>(&mut self, key: &str, confirm: &C) -> Result<Removal>
    where
        C: Confirm + ?Sized,
    {
        self.require_key(key)?;
        let prompt = format!("Delete {} '{}'?", self.source.noun(), key);
        if !confirm.confirm(&prompt) {
            debug!("delete of {} '{}' declined", self.source.noun(), key);
            return Ok(Removal::Declined);
        }

        if let Err(e) = self.source.delete(key).await {
            self.notice = Some(format!("Delete failed: {}", e));
            return Err(e);
        }

        let before = self.items.len();
        self.items.retain(|item| item.key() != key);
        info!("deleted {} '{}'", self.source.noun(), key);

        Ok(if self.items.len() < before {
            Removal::Removed
        } else {
            Removal::NotHeld
        })
    }

    // Items without an identifier (a recipe not yet saved) all share the
    // empty key, so it can never name a single item.
    fn require_key(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(ClientError::Validation(format!(
                "{} has no identifier",
                self.source.noun()
            )));
        }
        Ok(())
    }

    /// Create `item` on the server and reflect the confirmed result locally
    pub async fn add(&mut self, item: S::Item) -> Result<S::Item> {
        let created = match self.source.create(&item).await {
            Ok(created) => created,
            Err(e) => {
                self.notice = Some(e.to_string());
                return Err(e);
            }
        };
        info!("created {} '{}'", self.source.noun(), created.key());

        match self.source.policy() {
            MutationPolicy::Splice => self.items.push(created.clone()),
            MutationPolicy::Refetch => {
                self.load().await;
            }
        }
        Ok(created)
    }

    /// Replace the item held under `key` with `item` on the server, then
    /// locally
    pub async fn replace(&mut self, key: &str, item: S::Item) -> Result<S::Item> {
        self.require_key(key)?;
        let updated = match self.source.replace(key, &item).await {
            Ok(updated) => updated,
            Err(e) => {
                self.notice = Some(e.to_string());
                return Err(e);
            }
        };
        info!("updated {} '{}'", self.source.noun(), key);

        match self.source.policy() {
            MutationPolicy::Splice => {
                match self.items.iter().position(|held| held.key() == key) {
                    Some(idx) => self.items[idx] = updated.clone(),
                    None => self.items.push(updated.clone()),
                }
            }
            MutationPolicy::Refetch => {
                self.load().await;
            }
        }
        Ok(updated)
    }
}
