//! Chime Scene - scene objects and components
//!
//! A small object/component store in the spirit of an ECS: generational
//! object ids, sparse-set component storage, type-keyed resources, and
//! immediate or delayed destruction driven by the scene's game clock.

mod component;
mod error;
mod object;
mod resource;
mod scene;

pub use component::Component;
pub use error::SceneError;
pub use object::ObjectId;
pub use resource::Resources;
pub use scene::{Name, Scene};
