//! Label editor targeted at a single saved photo.

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::photo::PhotoId;
use crate::store::PhotoStore;

/// The editable view of one photo.
///
/// The editor remembers the photo by id, so edits keep landing on the right
/// record even if its list position were ever to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelEditor {
    photo_id: PhotoId,
}

impl LabelEditor {
    /// Open the editor on the photo at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if there is no photo at `index`.
    pub fn open(store: &PhotoStore, index: usize) -> Result<Self> {
        let photo = store.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: store.len(),
        })?;
        debug!(index, id = %photo.id, "Editor opened");
        Ok(Self { photo_id: photo.id })
    }

    /// Open the editor on the photo carrying `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PhotoNotFound`] if no photo has that id.
    pub fn open_id(store: &PhotoStore, id: PhotoId) -> Result<Self> {
        if store.find(id).is_none() {
            return Err(Error::PhotoNotFound(id));
        }
        debug!(%id, "Editor opened");
        Ok(Self { photo_id: id })
    }

    /// The photo being edited.
    #[must_use]
    pub fn photo_id(&self) -> PhotoId {
        self.photo_id
    }

    /// Current position of the photo being edited.
    #[must_use]
    pub fn index(&self, store: &PhotoStore) -> Option<usize> {
        store.index_of(self.photo_id)
    }

    /// Replace the label of the photo being edited.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PhotoNotFound`] if the photo is no longer in `store`.
    pub fn edit(&self, store: &mut PhotoStore, text: &str) -> Result<()> {
        store.relabel(self.photo_id, text)
    }
}
