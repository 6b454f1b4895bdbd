//! Combat core module (host-driven detection, core-driven rules)
//!
//! Ядро отвечает за:
//! - Weapon state: ammo, cooldown, пассивная перезарядка
//! - Projectile rules: движение, lifetime, bounce budget, owner-фильтр
//! - Events: ProjectileHit, DamageDealt, EntityDied
//!
//! Хост отвечает за:
//! - Input: FireIntent с aim direction
//! - Collision detection: ProjectileContact с точкой и нормалью
//! - Рендер/звук по событиям WeaponFired / ProjectileBounced /
//!   ProjectileDespawned

use bevy::prelude::*;

pub mod collision;
pub mod damage;
pub mod projectile;
pub mod shooting;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod collision_tests;

// Re-export основных типов
pub use collision::{ProjectileBounced, ProjectileContact, ProjectileHit};
pub use damage::{DamageDealt, Dead, EntityDied};
pub use projectile::ProjectileDespawned;
pub use shooting::{FireIntent, WeaponFired};

/// Combat Plugin
///
/// Регистрирует боевые системы в FixedUpdate (60Hz).
///
/// Порядок выполнения (строгий, через chain):
/// 1. process_fire_intents — выстрелы (до перезарядки: выстрел отменяет
///    перезарядку, назначенную на этот же тик)
/// 2. tick_passive_reload — пассивная перезарядка
/// 3. advance_projectiles — движение + lifetime (истечение вытесняет
///    обработку контактов этого тика)
/// 4. resolve_projectile_contacts — ветвление bounce/destroy/hit
/// 5. apply_projectile_damage — встроенный потребитель попаданий
/// 6. despawn_destroyed_projectiles — дерегистрация + удаление
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<FireIntent>()
            .add_event::<WeaponFired>()
            .add_event::<ProjectileContact>()
            .add_event::<ProjectileHit>()
            .add_event::<ProjectileBounced>()
            .add_event::<ProjectileDespawned>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        // Регистрация систем в FixedUpdate
        app.add_systems(
            FixedUpdate,
            (
                shooting::process_fire_intents,
                shooting::tick_passive_reload,
                projectile::advance_projectiles,
                collision::resolve_projectile_contacts,
                damage::apply_projectile_damage,
                projectile::despawn_destroyed_projectiles,
            )
                .chain(), // Последовательное выполнение
        );
    }
}
