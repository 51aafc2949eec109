//! Wallpaper rotation.
//!
//! - [`images`] - image discovery and decode validation
//! - [`manager`] - single rotation passes, the rotation worker and its thread handle

pub mod images;
pub mod manager;

pub use images::{ImageError, is_supported_image, list_images_in_directory, validate_image};
pub use manager::{
    CycleOutcome, RotationHandle, RotationWorker, apply_next, apply_next_with, list_candidates,
    select_image, sort_candidates,
};
