pub use super::ColliderId;
pub use crate::colliders::Collider;
pub use crate::plugin::{ColliderBundle, ColliderComponent, CollisionPlugin};
pub use crate::shapes::{ColliderShape, ColliderShapeType};
pub use crate::store::{ColliderIdResolver, ColliderStore};
