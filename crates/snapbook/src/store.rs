//! In-memory photo list.
//!
//! The store holds saved photos in capture order and is mutated only
//! through [`PhotoAction`]s: appending a new photo and relabelling an
//! existing one. There is deliberately no removal.

use tracing::debug;

use crate::error::{Error, Result};
use crate::photo::{clamp_label, LabelPolicy, PhotoId, PhotoRecord};

/// Default maximum label length, in characters.
pub const DEFAULT_MAX_LABEL_LENGTH: usize = 40;

/// A mutation of the photo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoAction {
    /// Append a photo referencing `uri`.
    AddPhoto {
        /// Image reference.
        uri: String,
    },
    /// Replace the label of the photo at `index`.
    EditPhotoLabel {
        /// Position in the list.
        index: usize,
        /// New label text.
        label: String,
    },
}

/// Ordered collection of saved photos.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    photos: Vec<PhotoRecord>,
    policy: LabelPolicy,
    max_label_length: usize,
    revision: u64,
}

impl Default for PhotoStore {
    fn default() -> Self {
        Self::new(LabelPolicy::default())
    }
}

impl PhotoStore {
    /// Create an empty store naming new photos with `policy`.
    #[must_use]
    pub fn new(policy: LabelPolicy) -> Self {
        Self {
            photos: Vec::new(),
            policy,
            max_label_length: DEFAULT_MAX_LABEL_LENGTH,
            revision: 0,
        }
    }

    /// Set the label length limit (zero disables it).
    #[must_use]
    pub fn with_max_label_length(mut self, max_label_length: usize) -> Self {
        self.max_label_length = max_label_length;
        self
    }

    /// Apply an action to the list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if an edit addresses a position
    /// past the end of the list.
    pub fn dispatch(&mut self, action: PhotoAction) -> Result<()> {
        match action {
            PhotoAction::AddPhoto { uri } => {
                self.append_photo(uri);
                Ok(())
            }
            PhotoAction::EditPhotoLabel { index, label } => self.relabel_photo(index, &label),
        }
    }

    /// Append a photo with the policy's default label.
    pub fn append_photo(&mut self, uri: impl Into<String>) -> &PhotoRecord {
        let label = self.policy.label_for(self.photos.len() + 1);
        let record = PhotoRecord::new(uri, clamp_label(&label, self.max_label_length));
        debug!(id = %record.id, uri = %record.uri, "Appending photo");

        self.photos.push(record);
        self.revision += 1;
        &self.photos[self.photos.len() - 1]
    }

    /// Relabel the photo at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn relabel_photo(&mut self, index: usize, label: &str) -> Result<()> {
        let len = self.photos.len();
        let max = self.max_label_length;
        let record = self
            .photos
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;

        record.label = clamp_label(label, max);
        debug!(index, id = %record.id, "Relabelled photo");
        self.revision += 1;
        Ok(())
    }

    /// Relabel the photo carrying `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PhotoNotFound`] if no photo has that id.
    pub fn relabel(&mut self, id: PhotoId, label: &str) -> Result<()> {
        let index = self.index_of(id).ok_or(Error::PhotoNotFound(id))?;
        self.relabel_photo(index, label)
    }

    /// Number of saved photos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// Whether no photo has been saved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Photo at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PhotoRecord> {
        self.photos.get(index)
    }

    /// Photo carrying `id`, if any.
    #[must_use]
    pub fn find(&self, id: PhotoId) -> Option<&PhotoRecord> {
        self.photos.iter().find(|p| p.id == id)
    }

    /// Current position of the photo carrying `id`.
    #[must_use]
    pub fn index_of(&self, id: PhotoId) -> Option<usize> {
        self.photos.iter().position(|p| p.id == id)
    }

    /// All photos in capture order.
    #[must_use]
    pub fn photos(&self) -> &[PhotoRecord] {
        &self.photos
    }

    /// Iterate over photos in capture order.
    pub fn iter(&self) -> std::slice::Iter<'_, PhotoRecord> {
        self.photos.iter()
    }

    /// Counter bumped on every mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The labelling policy in effect.
    #[must_use]
    pub fn policy(&self) -> &LabelPolicy {
        &self.policy
    }
}

impl<'a> IntoIterator for &'a PhotoStore {
    type Item = &'a PhotoRecord;
    type IntoIter = std::slice::Iter<'a, PhotoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.photos.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uris(store: &PhotoStore) -> Vec<&str> {
        store.iter().map(|p| p.uri.as_str()).collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = PhotoStore::default();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_append_preserves_count_and_order() {
        let mut store = PhotoStore::default();
        let names: Vec<String> = (0..25).map(|i| format!("img-{i}.jpg")).collect();
        for name in &names {
            store.append_photo(name.clone());
        }

        assert_eq!(store.len(), names.len());
        assert_eq!(
            uris(&store),
            names.iter().map(String::as_str).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_two_appends_with_numbered_labels() {
        let mut store = PhotoStore::new(LabelPolicy::numbered());
        store.append_photo("a.jpg");
        store.append_photo("b.jpg");

        let photos = store.photos();
        assert_eq!(photos[0].uri, "a.jpg");
        assert_eq!(photos[0].label, "Photo number 1");
        assert_eq!(photos[1].uri, "b.jpg");
        assert_eq!(photos[1].label, "Photo number 2");
    }

    #[test]
    fn test_two_appends_with_static_labels() {
        let mut store = PhotoStore::default();
        store.append_photo("a.jpg");
        store.append_photo("b.jpg");

        assert!(store.iter().all(|p| p.label == "New photo"));
    }

    #[test]
    fn test_append_then_relabel() {
        let mut store = PhotoStore::default();
        store.append_photo("a.jpg");
        store.relabel_photo(0, "Sunset").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.photos()[0].uri, "a.jpg");
        assert_eq!(store.photos()[0].label, "Sunset");
    }

    #[test]
    fn test_relabel_touches_only_target() {
        let mut store = PhotoStore::default();
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            store.append_photo(name);
        }
        let before = store.photos().to_vec();

        store.relabel_photo(1, "Beach").unwrap();

        for (i, (old, new)) in before.iter().zip(store.photos()).enumerate() {
            assert_eq!(old.uri, new.uri);
            assert_eq!(old.id, new.id);
            if i == 1 {
                assert_eq!(new.label, "Beach");
            } else {
                assert_eq!(old.label, new.label);
            }
        }
    }

    #[test]
    fn test_relabel_out_of_range() {
        let mut store = PhotoStore::default();
        store.append_photo("a.jpg");

        let err = store.relabel_photo(1, "nope").unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(store.photos()[0].label, "New photo");
    }

    #[test]
    fn test_relabel_by_id() {
        let mut store = PhotoStore::default();
        store.append_photo("a.jpg");
        let id = store.append_photo("b.jpg").id;

        store.relabel(id, "Mountains").unwrap();
        assert_eq!(store.find(id).unwrap().label, "Mountains");
        assert_eq!(store.index_of(id), Some(1));
    }

    #[test]
    fn test_relabel_unknown_id() {
        let mut store = PhotoStore::default();
        let err = store.relabel(PhotoId::new(), "x").unwrap_err();
        assert!(matches!(err, Error::PhotoNotFound(_)));
    }

    #[test]
    fn test_dispatch_actions() {
        let mut store = PhotoStore::default();
        store
            .dispatch(PhotoAction::AddPhoto {
                uri: "a.jpg".to_string(),
            })
            .unwrap();
        store
            .dispatch(PhotoAction::EditPhotoLabel {
                index: 0,
                label: "Sunset".to_string(),
            })
            .unwrap();

        assert_eq!(store.photos()[0].label, "Sunset");
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_dispatch_edit_out_of_range() {
        let mut store = PhotoStore::default();
        let result = store.dispatch(PhotoAction::EditPhotoLabel {
            index: 0,
            label: "x".to_string(),
        });
        assert!(result.is_err());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_labels_are_truncated() {
        let mut store = PhotoStore::default().with_max_label_length(5);
        store.append_photo("a.jpg");
        assert_eq!(store.photos()[0].label, "New p");

        store.relabel_photo(0, "A very long caption").unwrap();
        assert_eq!(store.photos()[0].label, "A ver");
    }

    #[test]
    fn test_default_label_limit() {
        let mut store = PhotoStore::default();
        store.append_photo("a.jpg");
        store.relabel_photo(0, &"x".repeat(100)).unwrap();
        assert_eq!(store.photos()[0].label.len(), DEFAULT_MAX_LABEL_LENGTH);
    }

    #[test]
    fn test_into_iterator() {
        let mut store = PhotoStore::default();
        store.append_photo("a.jpg");
        store.append_photo("b.jpg");

        let mut count = 0;
        for photo in &store {
            assert!(photo.uri.ends_with(".jpg"));
            count += 1;
        }
        assert_eq!(count, 2);
    }
}
