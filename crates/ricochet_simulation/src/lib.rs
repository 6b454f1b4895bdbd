//! RICOCHET Combat Core
//!
//! ECS-симуляция боя top-down арены на Bevy 0.16: weapon state machines
//! (ammo, cooldown, пассивная перезарядка) + снаряды (полёт, рикошеты,
//! lifetime, owner-фильтр коллизий).
//!
//! HYBRID ARCHITECTURE:
//! - ECS = боевые правила и состояние (этот crate)
//! - Хост = рендер, input devices, collision detection, камера, звук
//! - Граница — Bevy events: хост пишет FireIntent/ProjectileContact,
//!   читает WeaponFired/ProjectileBounced/ProjectileDespawned/DamageDealt
//!   и published read contract стрелков (ammo display)

use bevy::prelude::*;

// Публичные модули
pub mod combat;
pub mod components;
pub mod logger;
pub mod ui;

// Re-export базовых типов для удобства
pub use combat::{
    CombatPlugin, DamageDealt, Dead, EntityDied, FireIntent, ProjectileBounced,
    ProjectileContact, ProjectileDespawned, ProjectileHit, WeaponFired,
};
pub use components::*;
pub use ui::{AmmoDisplay, AmmoDisplayPlugin, AmmoSlot};

// Re-export log функций (хостовые bridge-крейты зовут их напрямую)
pub use logger::{init_logger, log, log_error, log_info, log_warning};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Подсистемы
            .add_plugins((CombatPlugin, AmmoDisplayPlugin));
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Snapshot компонентов мира для сравнения детерминизма
///
/// Сортировка по Entity ID, сериализация через Debug — достаточно для
/// побайтового сравнения двух прогонов
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
