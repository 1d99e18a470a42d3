mod collider;
pub use collider::{Collider, ColliderKey};

pub mod query;
