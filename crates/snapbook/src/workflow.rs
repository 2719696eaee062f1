//! Capture workflow state machine.
//!
//! ```text
//!          start_camera            take_picture
//!   Idle ───────────────> CameraActive ───────────> ReviewingCapture
//!    ^  <─────────────────     ^     <──────────────────   │
//!    │        cancel           └──────── retake ───────────┤
//!    └───────────────────────── save ──────────────────────┘
//! ```
//!
//! The pending picture lives inside [`CaptureState::ReviewingCapture`], so
//! a preview without an active session cannot be represented.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::camera::{Camera, CapturedImage, PermissionStatus};
use crate::config::CameraConfig;
use crate::error::{Error, Result};
use crate::photo::PhotoId;
use crate::store::PhotoStore;

/// Where the user is in the capture flow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CaptureState {
    /// Camera off, photo list visible.
    #[default]
    Idle,
    /// Permission granted, live preview showing.
    CameraActive,
    /// A picture was taken and is shown for review.
    ReviewingCapture {
        /// The picture awaiting retake or save.
        image: CapturedImage,
    },
}

impl CaptureState {
    /// Short human-readable name, used in errors and logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CameraActive => "camera active",
            Self::ReviewingCapture { .. } => "reviewing a capture",
        }
    }
}

impl std::fmt::Display for CaptureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedPhoto {
    /// Position of the new photo in the list.
    pub index: usize,
    /// Identifier of the new photo.
    pub id: PhotoId,
}

/// Drives a [`Camera`] through the capture, review and save steps.
#[derive(Debug)]
pub struct CaptureWorkflow<C> {
    camera: C,
    state: CaptureState,
    permission_timeout: Option<Duration>,
    capture_timeout: Option<Duration>,
}

impl<C: Camera> CaptureWorkflow<C> {
    /// Create an idle workflow with no timeouts.
    #[must_use]
    pub fn new(camera: C) -> Self {
        Self {
            camera,
            state: CaptureState::Idle,
            permission_timeout: None,
            capture_timeout: None,
        }
    }

    /// Create an idle workflow using the timeouts from `config`.
    #[must_use]
    pub fn from_config(camera: C, config: &CameraConfig) -> Self {
        Self::new(camera)
            .with_permission_timeout(config.permission_timeout())
            .with_capture_timeout(config.capture_timeout())
    }

    /// Bound permission requests by `timeout`.
    #[must_use]
    pub fn with_permission_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.permission_timeout = timeout;
        self
    }

    /// Bound picture captures by `timeout`.
    #[must_use]
    pub fn with_capture_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.capture_timeout = timeout;
        self
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// The picture under review, if any.
    #[must_use]
    pub fn pending_image(&self) -> Option<&CapturedImage> {
        match &self.state {
            CaptureState::ReviewingCapture { image } => Some(image),
            _ => None,
        }
    }

    /// The underlying camera.
    #[must_use]
    pub fn camera(&self) -> &C {
        &self.camera
    }

    /// Open the camera.
    ///
    /// Calling this while the camera is already active does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PermissionDenied`] if access is refused, or the
    /// camera's error or [`Error::Timeout`] if the request fails; the
    /// workflow stays idle in all these cases. Returns
    /// [`Error::InvalidTransition`] while reviewing a capture.
    pub async fn start_camera(&mut self) -> Result<()> {
        match self.state {
            CaptureState::Idle => self.activate().await,
            CaptureState::CameraActive => {
                debug!("Camera already active");
                Ok(())
            }
            CaptureState::ReviewingCapture { .. } => Err(self.refuse("start the camera")),
        }
    }

    /// Take a picture and show it for review.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the camera is active.
    /// Capture failures and timeouts leave the camera active.
    pub async fn take_picture(&mut self) -> Result<()> {
        if self.state != CaptureState::CameraActive {
            return Err(self.refuse("take a picture"));
        }

        let image = match bounded(
            self.capture_timeout,
            "picture capture",
            self.camera.take_picture(),
        )
        .await
        {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "Capture failed");
                return Err(e);
            }
        };

        debug!(uri = %image.uri, "Reviewing capture");
        self.state = CaptureState::ReviewingCapture { image };
        Ok(())
    }

    /// Discard the picture under review and reopen the camera.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless a capture is under
    /// review. If reopening fails the workflow ends up idle and the error
    /// from [`Self::start_camera`] is returned.
    pub async fn retake(&mut self) -> Result<()> {
        if !matches!(self.state, CaptureState::ReviewingCapture { .. }) {
            return Err(self.refuse("retake"));
        }

        debug!("Discarding capture for retake");
        self.state = CaptureState::Idle;
        self.activate().await
    }

    /// Save the picture under review into `store` and return to idle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless a capture is under
    /// review.
    pub fn save(&mut self, store: &mut PhotoStore) -> Result<SavedPhoto> {
        let image = match std::mem::take(&mut self.state) {
            CaptureState::ReviewingCapture { image } => image,
            other => {
                self.state = other;
                return Err(self.refuse("save"));
            }
        };

        let id = store.append_photo(image.uri).id;
        let index = store.len() - 1;
        info!(%id, index, "Photo saved");
        Ok(SavedPhoto { index, id })
    }

    /// Close the live camera without taking a picture.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the camera is active.
    pub fn cancel(&mut self) -> Result<()> {
        if self.state != CaptureState::CameraActive {
            return Err(self.refuse("cancel"));
        }
        debug!("Camera dismissed");
        self.state = CaptureState::Idle;
        Ok(())
    }

    async fn activate(&mut self) -> Result<()> {
        let answer = bounded(
            self.permission_timeout,
            "camera permission request",
            self.camera.request_permission(),
        )
        .await;

        match answer {
            Ok(PermissionStatus::Granted) => {
                debug!(camera = self.camera.name(), "Camera active");
                self.state = CaptureState::CameraActive;
                Ok(())
            }
            Ok(PermissionStatus::Denied) => {
                warn!("Camera access denied");
                self.state = CaptureState::Idle;
                Err(Error::PermissionDenied)
            }
            Err(e) => {
                warn!(error = %e, "Camera permission request failed");
                self.state = CaptureState::Idle;
                Err(e)
            }
        }
    }

    fn refuse(&self, action: &'static str) -> Error {
        debug!(state = self.state.name(), action, "Transition refused");
        Error::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }
}

async fn bounded<T>(
    limit: Option<Duration>,
    operation: &str,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| Error::timeout(operation))?,
        None => fut.await,
    }
}
