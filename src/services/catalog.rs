use crate::models::Caregiver;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when loading the caregiver catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// In-memory caregiver catalog.
///
/// Discovery treats the catalog as a read-only ordered sequence, consistent
/// for the duration of one recomputation. Catalog order is the tie-break order
/// for ranking, so it is preserved exactly as loaded.
pub struct CatalogStore {
    caregivers: Arc<Vec<Caregiver>>,
}

impl CatalogStore {
    /// Load the catalog from a JSON file (an array of caregiver records)
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let store = Self::load_from_str(&raw)?;
        tracing::info!(
            "Loaded {} caregivers from {}",
            store.len(),
            path.as_ref().display()
        );
        Ok(store)
    }

    pub fn load_from_str(raw: &str) -> Result<Self, CatalogError> {
        let caregivers: Vec<Caregiver> = serde_json::from_str(raw)?;
        Ok(Self {
            caregivers: Arc::new(caregivers),
        })
    }

    pub fn from_caregivers(caregivers: Vec<Caregiver>) -> Self {
        Self {
            caregivers: Arc::new(caregivers),
        }
    }

    /// Shared snapshot of the ordered catalog
    pub fn caregivers(&self) -> Arc<Vec<Caregiver>> {
        Arc::clone(&self.caregivers)
    }

    /// The set of cities with at least one registered caregiver, used by the
    /// location resolver to decide whether a resolved city is recognized
    pub fn city_set(&self) -> HashSet<String> {
        self.caregivers.iter().map(|c| c.city.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.caregivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caregivers.is_empty()
    }
}
