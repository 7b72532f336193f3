//! In-memory Directory
//!
//! Backs the directory service process and in-process test clusters.

use tokio::sync::RwLock;

use super::{Directory, DirectoryResult, Endpoint, validate_name};

/// Registration-ordered name table
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    entries: RwLock<Vec<(String, Endpoint)>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Directory for InMemoryDirectory {
    async fn register(&self, name: &str, endpoint: &Endpoint) -> DirectoryResult<()> {
        validate_name(name)?;
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, bound)) => *bound = endpoint.clone(),
            None => entries.push((name.to_string(), endpoint.clone())),
        }
        tracing::debug!(name, endpoint = %endpoint, "Directory entry bound");
        Ok(())
    }

    async fn lookup(&self, name: &str) -> DirectoryResult<Option<Endpoint>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, endpoint)| endpoint.clone()))
    }

    async fn list(&self) -> DirectoryResult<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn unbind(&self, name: &str) -> DirectoryResult<()> {
        let mut entries = self.entries.write().await;
        entries.retain(|(existing, _)| existing != name);
        tracing::debug!(name, "Directory entry unbound");
        Ok(())
    }
}
