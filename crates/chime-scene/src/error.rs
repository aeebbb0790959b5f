use crate::object::ObjectId;

/// Errors raised by scene operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("scene object {0} does not exist")]
    DeadObject(ObjectId),
}
