//! Deterministic simulation module
//!
//! Everything that moves lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by projectile slot)
//! - No rendering or platform dependencies
//!
//! Two physics domains exist side by side: the live world the player sees and
//! the shadow world used for speculative trajectory previews.

pub mod charge;
pub mod collision;
pub mod projectile;
pub mod rate_limiter;
pub mod sdf;
pub mod shadow;
pub mod shape;
pub mod tick;
pub mod trajectory;
pub mod world;

pub use charge::{Aim, ChargePhase, PowerBarSink, PowerChargeController, TrajectorySink};
pub use collision::{Collider, CollisionResult, ball_collider_collision};
pub use projectile::{Projectile, ProjectileId};
pub use rate_limiter::RateLimiter;
pub use sdf::{raymarch_collision, reflect, sd_box, sd_capsule, sd_plane, sd_sphere};
pub use shadow::{ObstacleClone, ShadowWorld};
pub use shape::{Shape, Transform};
pub use tick::{TickHandle, TickSource, TickSubscription};
pub use trajectory::TrajectorySampler;
pub use world::PhysicsWorld;
