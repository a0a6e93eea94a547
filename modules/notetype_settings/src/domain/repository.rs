//! Repository traits for data access
//!
//! These traits define the interface to the host collection and to the
//! authored template families. Implementations are in infra/.

use crate::contract::Notetype;
use anyhow::Result;
use async_trait::async_trait;

/// Notetypes stored in the host collection
#[async_trait]
pub trait NotetypeRepository: Send + Sync {
    /// Find a notetype by identifier
    async fn find_by_id(&self, id: i64) -> Result<Option<Notetype>>;

    /// Find a notetype by its unique name
    async fn find_by_name(&self, name: &str) -> Result<Option<Notetype>>;

    /// Names and identifiers of all notetypes
    async fn list_names_and_ids(&self) -> Result<Vec<(String, i64)>>;

    /// Add a notetype; an id of `0` asks the repository for a fresh id
    async fn add(&self, notetype: &Notetype) -> Result<Notetype>;

    /// Replace a whole notetype record
    async fn update(&self, notetype: &Notetype) -> Result<Notetype>;

    /// Remove a notetype
    async fn remove(&self, id: i64) -> Result<()>;

    /// Notes using a notetype
    async fn note_ids(&self, notetype_id: i64) -> Result<Vec<i64>>;

    /// Move notes to another notetype with the same fields
    async fn change_notetype(&self, note_ids: &[i64], to_notetype_id: i64) -> Result<()>;
}

/// Newest authored version of every template family
pub trait TemplateCatalog: Send + Sync {
    /// Canonical family names, sorted
    fn family_names(&self) -> Vec<String>;

    /// Newest authored notetype of a family, with id `0`
    fn newest(&self, family: &str) -> Option<Notetype>;

    /// All authored families
    fn families(&self) -> Vec<Notetype> {
        self.family_names()
            .iter()
            .filter_map(|name| self.newest(name))
            .collect()
    }
}
