//! Application session tying the capture workflow, the photo list and the
//! label editor together.
//!
//! The presentation layer sends [`Intent`]s in and renders the [`AppView`]
//! published after every intent.

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::camera::Camera;
use crate::config::Config;
use crate::editor::LabelEditor;
use crate::error::{Error, Result};
use crate::photo::PhotoId;
use crate::store::PhotoStore;
use crate::workflow::{CaptureState, CaptureWorkflow};

/// A user action coming from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Open the camera.
    StartCamera,
    /// Take a picture with the open camera.
    TakePicture,
    /// Discard the picture under review and reopen the camera.
    RetakePicture,
    /// Save the picture under review.
    SavePicture,
    /// Close the camera without taking a picture.
    CancelCamera,
    /// Open the label editor on the photo at this position.
    SelectPhoto(usize),
    /// Relabel the photo at `index`.
    RelabelPhoto {
        /// Position in the list.
        index: usize,
        /// New label text.
        label: String,
    },
    /// Replace the label of the photo open in the editor.
    EditLabel(String),
    /// Close the label editor.
    CloseEditor,
}

/// A one-shot message for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// Camera access was refused.
    AccessDenied,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessDenied => write!(f, "Access denied"),
        }
    }
}

/// Which screen should be showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// The photo list.
    List,
    /// The live camera.
    Camera,
    /// The full-screen review of a fresh capture.
    Review,
}

impl From<&CaptureState> for Screen {
    fn from(state: &CaptureState) -> Self {
        match state {
            CaptureState::Idle => Self::List,
            CaptureState::CameraActive => Self::Camera,
            CaptureState::ReviewingCapture { .. } => Self::Review,
        }
    }
}

/// One row of the photo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoRow {
    /// 1-based display position.
    pub position: usize,
    /// Stable identifier.
    pub id: PhotoId,
    /// Image reference.
    pub uri: String,
    /// Current label.
    pub label: String,
    /// Display title, e.g. `"1.  Sunset"`.
    pub title: String,
}

/// The photo open in the label editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorView {
    /// Position in the list.
    pub index: usize,
    /// Stable identifier.
    pub id: PhotoId,
    /// Image reference.
    pub uri: String,
    /// Current label.
    pub label: String,
}

/// Everything the presentation layer needs to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppView {
    /// Current screen.
    pub screen: Screen,
    /// The capture under review, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_uri: Option<String>,
    /// Saved photos in capture order.
    pub photos: Vec<PhotoRow>,
    /// The label editor, when open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<EditorView>,
    /// Photo list revision.
    pub revision: u64,
}

/// A running snapbook session.
#[derive(Debug)]
pub struct PhotoApp<C> {
    store: PhotoStore,
    workflow: CaptureWorkflow<C>,
    editor: Option<LabelEditor>,
    notices: Vec<Notice>,
    view_tx: watch::Sender<AppView>,
}

impl<C: Camera> PhotoApp<C> {
    /// Create a session around `camera` using `config`.
    #[must_use]
    pub fn new(camera: C, config: &Config) -> Self {
        let store = PhotoStore::new(config.labels.policy.clone())
            .with_max_label_length(config.labels.max_length);
        let workflow = CaptureWorkflow::from_config(camera, &config.camera);
        Self::with_parts(store, workflow)
    }

    /// Create a session from an existing store and workflow.
    #[must_use]
    pub fn with_parts(store: PhotoStore, workflow: CaptureWorkflow<C>) -> Self {
        let initial = build_view(&store, &workflow, None);
        let (view_tx, _) = watch::channel(initial);
        Self {
            store,
            workflow,
            editor: None,
            notices: Vec::new(),
            view_tx,
        }
    }

    /// Handle one user intent and publish the resulting view.
    ///
    /// A refused camera permission is not an error: it queues
    /// [`Notice::AccessDenied`] and leaves the session on the list screen.
    ///
    /// # Errors
    ///
    /// Returns an error for refused transitions, bad photo positions,
    /// label edits with no open editor, and camera failures.
    pub async fn handle(&mut self, intent: Intent) -> Result<()> {
        debug!(?intent, state = self.workflow.state().name(), "Handling intent");
        let result = self.apply(intent).await;
        self.publish();
        result
    }

    async fn apply(&mut self, intent: Intent) -> Result<()> {
        match intent {
            Intent::StartCamera => {
                let started = self.workflow.start_camera().await;
                self.notify_on_denial(started)
            }
            Intent::TakePicture => self.workflow.take_picture().await,
            Intent::RetakePicture => {
                let restarted = self.workflow.retake().await;
                self.notify_on_denial(restarted)
            }
            Intent::SavePicture => {
                let saved = self.workflow.save(&mut self.store)?;
                self.editor = Some(LabelEditor::open_id(&self.store, saved.id)?);
                Ok(())
            }
            Intent::CancelCamera => self.workflow.cancel(),
            Intent::SelectPhoto(index) => {
                self.require_list("select a photo")?;
                self.editor = Some(LabelEditor::open(&self.store, index)?);
                Ok(())
            }
            Intent::RelabelPhoto { index, label } => {
                self.require_list("relabel a photo")?;
                self.store.relabel_photo(index, &label)
            }
            Intent::EditLabel(text) => {
                self.require_list("edit a label")?;
                let editor = self.editor.as_ref().ok_or(Error::EditorClosed)?;
                editor.edit(&mut self.store, &text)
            }
            Intent::CloseEditor => {
                self.editor = None;
                Ok(())
            }
        }
    }

    fn notify_on_denial(&mut self, result: Result<()>) -> Result<()> {
        match result {
            Err(Error::PermissionDenied) => {
                info!("Camera access denied, staying on the photo list");
                self.notices.push(Notice::AccessDenied);
                Ok(())
            }
            other => other,
        }
    }

    fn require_list(&self, action: &'static str) -> Result<()> {
        match self.workflow.state() {
            CaptureState::Idle => Ok(()),
            state => Err(Error::InvalidTransition {
                state: state.name(),
                action,
            }),
        }
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.view());
    }

    /// Take the notices queued since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Snapshot of the current view.
    #[must_use]
    pub fn view(&self) -> AppView {
        build_view(&self.store, &self.workflow, self.editor.as_ref())
    }

    /// Receive a fresh [`AppView`] after every handled intent.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppView> {
        self.view_tx.subscribe()
    }

    /// The photo list.
    #[must_use]
    pub fn store(&self) -> &PhotoStore {
        &self.store
    }

    /// The capture workflow.
    #[must_use]
    pub fn workflow(&self) -> &CaptureWorkflow<C> {
        &self.workflow
    }

    /// The open label editor, if any.
    #[must_use]
    pub fn editor(&self) -> Option<&LabelEditor> {
        self.editor.as_ref()
    }
}

fn build_view<C: Camera>(
    store: &PhotoStore,
    workflow: &CaptureWorkflow<C>,
    editor: Option<&LabelEditor>,
) -> AppView {
    let photos = store
        .iter()
        .enumerate()
        .map(|(i, photo)| PhotoRow {
            position: i + 1,
            id: photo.id,
            uri: photo.uri.clone(),
            label: photo.label.clone(),
            title: format!("{}.  {}", i + 1, photo.label),
        })
        .collect();

    let screen = Screen::from(workflow.state());
    let editor = editor.filter(|_| screen == Screen::List).and_then(|editor| {
        let index = editor.index(store)?;
        let photo = store.get(index)?;
        Some(EditorView {
            index,
            id: photo.id,
            uri: photo.uri.clone(),
            label: photo.label.clone(),
        })
    });

    AppView {
        screen,
        pending_uri: workflow.pending_image().map(|image| image.uri.clone()),
        photos,
        editor,
        revision: store.revision(),
    }
}
