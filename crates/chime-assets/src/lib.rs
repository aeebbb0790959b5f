//! Chime Assets - audio clip loading and management
//!
//! Resolves sound names to files (directly or through a TOML manifest),
//! decodes them once, and hands out typed handles to the decoded clips.

mod clip;
mod error;
mod handle;
mod manifest;
mod server;

#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_support;

pub use clip::AudioClip;
pub use error::AssetError;
pub use handle::{AssetHandle, AssetId};
pub use manifest::ClipManifest;
pub use server::AssetServer;
