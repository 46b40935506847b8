//! Durable record store for places and their details.
//!
//! The store is opened once at startup and owned as a resource. Mutations
//! only touch memory; [`PlaceStore::commit`] writes the whole store as JSON
//! by replacing the file atomically.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::place::{Detail, DetailId, Place, PlaceId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access store file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Store file {path:?} is corrupted: {message}")]
    Corrupt { path: PathBuf, message: String },
    #[error("Place {0:?} does not exist")]
    MissingPlace(PlaceId),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    places: Vec<Place>,
    #[serde(default)]
    details: Vec<Detail>,
}

#[derive(Resource, Debug)]
pub struct PlaceStore {
    /// Backing file, `None` for a memory-only store
    path: Option<PathBuf>,
    data: StoreData,
}

impl PlaceStore {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: StoreData::default(),
        }
    }

    /// Open the store at `path`; a missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = if path.exists() {
            let json = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&json).map_err(|e| StoreError::Corrupt {
                path: path.clone(),
                message: e.to_string(),
            })?
        } else {
            info!("No store at {:?}, starting empty", path);
            StoreData::default()
        };

        Ok(Self {
            path: Some(path),
            data,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.data.next_id;
        self.data.next_id += 1;
        id
    }

    /// Create an empty place (not yet committed).
    pub fn create_place(&mut self) -> PlaceId {
        let id = PlaceId(self.next_id());
        self.data.places.push(Place::new(id));
        id
    }

    /// Create a detail owned by `parent` (not yet committed).
    pub fn create_detail(
        &mut self,
        parent: PlaceId,
        text: impl Into<String>,
    ) -> Result<DetailId, StoreError> {
        if self.place(parent).is_none() {
            return Err(StoreError::MissingPlace(parent));
        }
        let id = DetailId(self.next_id());
        self.data.details.push(Detail {
            id,
            text: text.into(),
            place: parent,
        });
        Ok(id)
    }

    /// Append a detail to `parent` and commit.
    pub fn add_detail(
        &mut self,
        parent: PlaceId,
        text: impl Into<String>,
    ) -> Result<DetailId, StoreError> {
        let id = self.create_detail(parent, text)?;
        self.commit()?;
        Ok(id)
    }

    pub fn place(&self, id: PlaceId) -> Option<&Place> {
        self.data.places.iter().find(|p| p.id == id)
    }

    pub fn place_mut(&mut self, id: PlaceId) -> Option<&mut Place> {
        self.data.places.iter_mut().find(|p| p.id == id)
    }

    pub fn detail(&self, id: DetailId) -> Option<&Detail> {
        self.data.details.iter().find(|d| d.id == id)
    }

    /// All places ordered by name; unnamed places come first.
    pub fn fetch_sorted_by_name(&self) -> Vec<&Place> {
        let mut places: Vec<&Place> = self.data.places.iter().collect();
        places.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        places
    }

    /// Details of `place` in creation order.
    pub fn details_of(&self, place: PlaceId) -> Vec<&Detail> {
        self.data
            .details
            .iter()
            .filter(|d| d.place == place)
            .collect()
    }

    /// Remove a place together with all of its details.
    pub fn delete_place(&mut self, id: PlaceId) -> bool {
        let before = self.data.places.len();
        self.data.places.retain(|p| p.id != id);
        if self.data.places.len() == before {
            return false;
        }
        self.data.details.retain(|d| d.place != id);
        true
    }

    /// Remove a single detail; its place is untouched.
    pub fn delete_detail(&mut self, id: DetailId) -> bool {
        let before = self.data.details.len();
        self.data.details.retain(|d| d.id != id);
        self.data.details.len() != before
    }

    pub fn place_count(&self) -> usize {
        self.data.places.len()
    }

    pub fn detail_count(&self) -> usize {
        self.data.details.len()
    }

    /// Persist the current state.
    ///
    /// The file is written next to the target and renamed over it, so a
    /// failed commit leaves the previous contents intact.
    pub fn commit(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(&self.data)?;
        let tmp_path = path.with_extension("json.tmp");

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(&tmp_path, json).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        std::fs::rename(&tmp_path, path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(
            "Committed {} places and {} details to {:?}",
            self.data.places.len(),
            self.data.details.len(),
            path
        );
        Ok(())
    }
}
