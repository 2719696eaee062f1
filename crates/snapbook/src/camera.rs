//! Platform-agnostic camera abstraction.
//!
//! This module defines the trait a platform camera must fulfil (permission
//! request and picture capture, both suspending) and a scripted in-process
//! camera used by the CLI and by tests.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Default prefix for generated image references.
pub const DEFAULT_URI_PREFIX: &str = "file:///snapbook";

/// Answer to a camera permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// Camera access was granted.
    Granted,
    /// Camera access was refused.
    Denied,
}

impl PermissionStatus {
    /// Whether access was granted.
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// A picture returned by the camera, not yet saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedImage {
    /// Opaque reference to the image resource.
    pub uri: String,

    /// Width in pixels, when the platform reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Height in pixels, when the platform reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl CapturedImage {
    /// Create an image reference without dimensions.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            width: None,
            height: None,
        }
    }
}

/// A trait for platform cameras.
///
/// Both operations suspend the caller until the platform answers; callers
/// that need a bound apply their own timeout.
#[async_trait::async_trait]
pub trait Camera: Send {
    /// Name of this camera (for logging).
    fn name(&self) -> &str;

    /// Ask the platform for camera access.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot answer at all (as opposed to
    /// answering [`PermissionStatus::Denied`]).
    async fn request_permission(&mut self) -> Result<PermissionStatus>;

    /// Take a picture with the active camera session.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform fails to produce an image.
    async fn take_picture(&mut self) -> Result<CapturedImage>;
}

/// An in-process camera whose answers are scripted up front.
///
/// Permission answers are taken from a queue and fall back to a default
/// once the queue is empty. Captures produce sequential references such as
/// `file:///snapbook/IMG_0001.jpg`.
#[derive(Debug, Clone)]
pub struct ScriptedCamera {
    default_permission: PermissionStatus,
    permission_answers: VecDeque<PermissionStatus>,
    capture_failures: VecDeque<String>,
    latency: Duration,
    stall_captures: bool,
    detached: bool,
    uri_prefix: String,
    sequence: u32,
    permission_requests: usize,
    capture_requests: usize,
}

impl Default for ScriptedCamera {
    fn default() -> Self {
        Self::granting()
    }
}

impl ScriptedCamera {
    /// A camera that always grants access.
    #[must_use]
    pub fn granting() -> Self {
        Self::with_permission(PermissionStatus::Granted)
    }

    /// A camera that always refuses access.
    #[must_use]
    pub fn denying() -> Self {
        Self::with_permission(PermissionStatus::Denied)
    }

    /// A camera answering every permission request with `status`.
    #[must_use]
    pub fn with_permission(status: PermissionStatus) -> Self {
        Self {
            default_permission: status,
            permission_answers: VecDeque::new(),
            capture_failures: VecDeque::new(),
            latency: Duration::ZERO,
            stall_captures: false,
            detached: false,
            uri_prefix: DEFAULT_URI_PREFIX.to_string(),
            sequence: 0,
            permission_requests: 0,
            capture_requests: 0,
        }
    }

    /// Queue answers for the next permission requests, in order.
    #[must_use]
    pub fn answering(mut self, answers: impl IntoIterator<Item = PermissionStatus>) -> Self {
        self.permission_answers.extend(answers);
        self
    }

    /// Make the next capture fail with `message`.
    #[must_use]
    pub fn failing_next_capture(mut self, message: impl Into<String>) -> Self {
        self.capture_failures.push_back(message.into());
        self
    }

    /// Delay every answer by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Never return from `take_picture`.
    #[must_use]
    pub fn stalling_captures(mut self) -> Self {
        self.stall_captures = true;
        self
    }

    /// Report the device as missing on every request.
    #[must_use]
    pub fn without_device(mut self) -> Self {
        self.detached = true;
        self
    }

    /// Use `prefix` for generated image references.
    #[must_use]
    pub fn with_uri_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.uri_prefix = prefix.into();
        self
    }

    /// How many permission requests have been made.
    #[must_use]
    pub fn permission_requests(&self) -> usize {
        self.permission_requests
    }

    /// How many captures have been attempted.
    #[must_use]
    pub fn capture_requests(&self) -> usize {
        self.capture_requests
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait::async_trait]
impl Camera for ScriptedCamera {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn request_permission(&mut self) -> Result<PermissionStatus> {
        self.permission_requests += 1;
        self.simulate_latency().await;
        if self.detached {
            return Err(Error::camera_unavailable("no camera device attached"));
        }

        let status = self
            .permission_answers
            .pop_front()
            .unwrap_or(self.default_permission);
        debug!(%status, "Camera permission answered");
        Ok(status)
    }

    async fn take_picture(&mut self) -> Result<CapturedImage> {
        self.capture_requests += 1;
        if self.stall_captures {
            trace!("Capture stalled");
            std::future::pending::<()>().await;
        }
        self.simulate_latency().await;
        if self.detached {
            return Err(Error::camera_unavailable("no camera device attached"));
        }

        if let Some(message) = self.capture_failures.pop_front() {
            return Err(Error::capture_failed(message));
        }

        self.sequence += 1;
        let uri = format!("{}/IMG_{:04}.jpg", self.uri_prefix, self.sequence);
        debug!(%uri, "Picture taken");
        Ok(CapturedImage {
            uri,
            width: Some(3024),
            height: Some(4032),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_status_display() {
        assert_eq!(PermissionStatus::Granted.to_string(), "granted");
        assert_eq!(PermissionStatus::Denied.to_string(), "denied");
        assert!(PermissionStatus::Granted.is_granted());
        assert!(!PermissionStatus::Denied.is_granted());
    }

    #[test]
    fn test_captured_image_new() {
        let image = CapturedImage::new("a.jpg");
        assert_eq!(image.uri, "a.jpg");
        assert!(image.width.is_none());
        assert!(image.height.is_none());
    }

    #[tokio::test]
    async fn test_scripted_camera_grants() {
        let mut camera = ScriptedCamera::granting();
        assert_eq!(
            camera.request_permission().await.unwrap(),
            PermissionStatus::Granted
        );
        assert_eq!(camera.permission_requests(), 1);
    }

    #[tokio::test]
    async fn test_scripted_camera_denies() {
        let mut camera = ScriptedCamera::denying();
        assert_eq!(
            camera.request_permission().await.unwrap(),
            PermissionStatus::Denied
        );
    }

    #[tokio::test]
    async fn test_scripted_answers_then_default() {
        let mut camera = ScriptedCamera::granting().answering([PermissionStatus::Denied]);
        assert_eq!(
            camera.request_permission().await.unwrap(),
            PermissionStatus::Denied
        );
        assert_eq!(
            camera.request_permission().await.unwrap(),
            PermissionStatus::Granted
        );
        assert_eq!(camera.permission_requests(), 2);
    }

    #[tokio::test]
    async fn test_sequential_uris() {
        let mut camera = ScriptedCamera::granting().with_uri_prefix("mem://roll");
        let first = camera.take_picture().await.unwrap();
        let second = camera.take_picture().await.unwrap();

        assert_eq!(first.uri, "mem://roll/IMG_0001.jpg");
        assert_eq!(second.uri, "mem://roll/IMG_0002.jpg");
        assert_eq!(camera.capture_requests(), 2);
    }

    #[tokio::test]
    async fn test_scripted_capture_failure() {
        let mut camera = ScriptedCamera::granting().failing_next_capture("lens cap on");
        let err = camera.take_picture().await.unwrap_err();
        assert!(err.to_string().contains("lens cap on"));

        let image = camera.take_picture().await.unwrap();
        assert!(image.uri.ends_with("IMG_0001.jpg"));
    }

    #[tokio::test]
    async fn test_missing_device_is_unavailable() {
        let mut camera = ScriptedCamera::granting().without_device();
        let err = camera.request_permission().await.unwrap_err();
        assert!(matches!(err, Error::CameraUnavailable(_)));
        assert!(camera.take_picture().await.is_err());
        assert_eq!(camera.permission_requests(), 1);
        assert_eq!(camera.capture_requests(), 1);
    }

    #[tokio::test]
    async fn test_latency_is_applied() {
        let mut camera = ScriptedCamera::granting().with_latency(Duration::from_millis(10));
        let started = std::time::Instant::now();
        camera.take_picture().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(10));
    }
}
