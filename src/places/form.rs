//! Batch edit of a place's fields, as submitted from the detail screen.

use super::place::{Place, PlaceId};
use super::store::{PlaceStore, StoreError};

/// Text fields of the place editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceForm {
    pub name: String,
    pub url: String,
    pub latitude: String,
    pub longitude: String,
    /// Text of a detail to append, ignored when empty
    pub new_detail: String,
}

impl PlaceForm {
    /// Populate the form from the record's current text views.
    pub fn from_place(place: &Place) -> Self {
        Self {
            name: place.display_name().to_string(),
            url: place.url_text(),
            latitude: place.latitude_text(),
            longitude: place.longitude_text(),
            new_detail: String::new(),
        }
    }

    /// Write every field through the validated views and commit.
    ///
    /// Fields that fail validation keep their stored value. Returns
    /// `Ok(false)` when the place no longer exists.
    pub fn apply(&self, store: &mut PlaceStore, id: PlaceId) -> Result<bool, StoreError> {
        let Some(place) = store.place_mut(id) else {
            return Ok(false);
        };

        place.set_name(self.name.clone());
        // Empty URL text means "leave the image alone"
        if !self.url.is_empty() {
            let _ = place.set_url_text(&self.url);
        }
        let _ = place.set_longitude_text(&self.longitude);
        let _ = place.set_latitude_text(&self.latitude);

        if !self.new_detail.is_empty() {
            store.add_detail(id, self.new_detail.clone())?;
        }

        store.commit()?;
        Ok(true)
    }
}
