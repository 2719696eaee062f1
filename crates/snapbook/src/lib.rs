//! `snapbook` - photo capture, review and labelling core
//!
//! This library provides the capture workflow (camera permission, picture,
//! review, retake, save), the in-memory photo list it saves into, and the
//! label editor, behind a single [`PhotoApp`] session driven by intents.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod camera;
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod photo;
pub mod store;
pub mod workflow;

pub use app::{AppView, Intent, Notice, PhotoApp, Screen};
pub use camera::{Camera, CapturedImage, PermissionStatus, ScriptedCamera};
pub use config::Config;
pub use editor::LabelEditor;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use photo::{LabelPolicy, PhotoId, PhotoRecord};
pub use store::{PhotoAction, PhotoStore};
pub use workflow::{CaptureState, CaptureWorkflow, SavedPhoto};
