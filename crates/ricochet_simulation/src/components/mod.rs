//! ECS Components боевого ядра
//!
//! Организация по доменам:
//! - shooter: weapon state machine (ammo, cooldown, пассивная перезарядка),
//!   Muzzle, TeamColor
//! - projectile: снаряд в полёте (lifetime, bounce budget), Destroyed маркер
//! - surface: классификация поверхностей (Bounceable)
//! - target: HitTarget capability + Health

pub mod projectile;
pub mod shooter;
pub mod surface;
pub mod target;

// Re-exports для удобного импорта
pub use projectile::*;
pub use shooter::*;
pub use surface::*;
pub use target::*;
