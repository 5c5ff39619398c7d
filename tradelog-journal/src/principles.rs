//! Principle authoring — remote backend trait, HTTP implementation, and an
//! optimistic local book.
//!
//! The portal backend owns principle ids and sequence numbers; we talk to it
//! behind the `PrincipleBackend` trait so tests can mock it. Local state is
//! updated optimistically and rolled back when the remote call fails, so a
//! failed save or delete never leaves the book lying about what the server
//! holds.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use tradelog_core::domain::{EntityId, PrincipleCategory, PrincipleEntry};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend rejected the operation: {message}")]
    Rejected { message: String },

    #[error("unexpected backend response: {0}")]
    BadResponse(String),
}

/// Remote CRUD for principles. Implementations handle one transport; the
/// book above this trait handles optimistic state.
pub trait PrincipleBackend {
    /// Persist a new principle; the backend assigns id and sequence number.
    fn save(&self, text: &str, category: PrincipleCategory)
        -> Result<PrincipleEntry, RemoteError>;

    fn delete(&self, id: EntityId) -> Result<(), RemoteError>;

    fn list(&self) -> Result<Vec<PrincipleEntry>, RemoteError>;
}

// ── Portal wire format ───────────────────────────────────────────────

/// Principle object as the portal API serves it. Ids are decimal strings
/// (millisecond timestamps) and the display number is pre-formatted.
#[derive(Debug, Deserialize)]
struct WirePrinciple {
    id: String,
    content: String,
    category: String,
    number: String,
}

impl WirePrinciple {
    fn into_entry(self) -> Result<PrincipleEntry, RemoteError> {
        let id: EntityId = self
            .id
            .parse()
            .map_err(|_| RemoteError::BadResponse(format!("non-numeric principle id '{}'", self.id)))?;
        let category: PrincipleCategory = self
            .category
            .parse()
            .map_err(RemoteError::BadResponse)?;
        Ok(PrincipleEntry {
            id,
            sequence_number: self.number,
            category,
            text: self.content,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SaveEnvelope {
    success: bool,
    #[serde(default)]
    message: String,
    principle: Option<WirePrinciple>,
}

#[derive(Debug, Deserialize)]
struct DeleteEnvelope {
    success: bool,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    text: &'a str,
    category: String,
}

/// Blocking HTTP backend against the portal API.
#[derive(Debug)]
pub struct HttpBackend {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/principles", self.base_url.trim_end_matches('/'))
    }
}

impl PrincipleBackend for HttpBackend {
    fn save(
        &self,
        text: &str,
        category: PrincipleCategory,
    ) -> Result<PrincipleEntry, RemoteError> {
        let body = SaveRequest {
            text,
            category: category.to_string(),
        };
        let envelope: SaveEnvelope = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()?
            .json()?;
        if !envelope.success {
            return Err(RemoteError::Rejected {
                message: envelope.message,
            });
        }
        envelope
            .principle
            .ok_or_else(|| RemoteError::BadResponse("save succeeded without a principle".into()))?
            .into_entry()
    }

    fn delete(&self, id: EntityId) -> Result<(), RemoteError> {
        let envelope: DeleteEnvelope = self
            .client
            .delete(self.endpoint())
            .query(&[("id", id.to_string())])
            .send()?
            .json()?;
        if !envelope.success {
            return Err(RemoteError::Rejected {
                message: envelope.message,
            });
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<PrincipleEntry>, RemoteError> {
        let wire: Vec<WirePrinciple> = self.client.get(self.endpoint()).send()?.json()?;
        wire.into_iter().map(WirePrinciple::into_entry).collect()
    }
}

// ── Optimistic local book ────────────────────────────────────────────

/// Local cache of principle entries over a backend.
///
/// `&mut self` on every remote operation gives the "no duplicate submission
/// while in flight" guarantee for free under the single-threaded
/// cooperative model.
pub struct PrincipleBook<B: PrincipleBackend> {
    entries: Vec<PrincipleEntry>,
    backend: B,
}

impl<B: PrincipleBackend> PrincipleBook<B> {
    pub fn new(backend: B) -> Self {
        Self {
            entries: Vec::new(),
            backend,
        }
    }

    /// Replace local state with the backend's list.
    pub fn refresh(&mut self) -> Result<(), RemoteError> {
        self.entries = self.backend.list()?;
        Ok(())
    }

    /// Create a principle: provisional local insert, then the remote call.
    /// On success the provisional entry is replaced with the backend's
    /// authoritative one; on failure it is removed again.
    pub fn create(
        &mut self,
        text: &str,
        category: PrincipleCategory,
    ) -> Result<&PrincipleEntry, RemoteError> {
        let position = self
            .entries
            .iter()
            .filter(|p| p.category == category)
            .count()
            + 1;
        let provisional = PrincipleEntry {
            id: 0, // replaced by the backend-assigned id on success
            sequence_number: PrincipleEntry::sequence_number_for(category, position),
            category,
            text: text.into(),
        };
        self.entries.push(provisional);

        match self.backend.save(text, category) {
            Ok(entry) => {
                let last = self.entries.last_mut().expect("provisional just pushed");
                *last = entry;
                Ok(self.entries.last().expect("provisional just pushed"))
            }
            Err(err) => {
                self.entries.pop();
                warn!(error = %err, "principle save failed, optimistic insert rolled back");
                Err(err)
            }
        }
    }

    /// Delete a principle: optimistic local removal, re-inserted at its old
    /// position if the remote call fails. Trade refs pointing at the id are
    /// left dangling on purpose (weak references).
    pub fn delete(&mut self, id: EntityId) -> Result<(), RemoteError> {
        let Some(index) = self.entries.iter().position(|p| p.id == id) else {
            return Err(RemoteError::Rejected {
                message: format!("principle {id} not found"),
            });
        };
        let removed = self.entries.remove(index);

        match self.backend.delete(id) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.entries.insert(index, removed);
                warn!(error = %err, id, "principle delete failed, local removal rolled back");
                Err(err)
            }
        }
    }

    pub fn entries(&self) -> &[PrincipleEntry] {
        &self.entries
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.iter().any(|p| p.id == id)
    }

    /// Ids of all known principles, for selector restore checks.
    pub fn known_ids(&self) -> Vec<EntityId> {
        self.entries.iter().map(|p| p.id).collect()
    }
}
