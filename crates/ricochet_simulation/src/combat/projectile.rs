//! Projectile systems: движение, lifetime, despawn с дерегистрацией
//!
//! Порядок в тике: advance (движение + lifetime) идёт ДО contact resolution —
//! снаряд, истёкший в этом тике, получает `Destroyed` и его контакты
//! игнорируются. Despawn-система замыкает цепочку: дерегистрация у владельца
//! ровно один раз, каким бы путём снаряд ни был уничтожен.

use bevy::prelude::*;

use crate::components::{Destroyed, DespawnReason, Projectile, Shooter};
use crate::logger;

/// Event: снаряд удалён из мира (ядро → хост, взрыв/затухание по reason)
#[derive(Event, Debug, Clone)]
pub struct ProjectileDespawned {
    pub projectile: Entity,
    /// Владелец (может уже не существовать)
    pub shooter: Entity,
    /// Последняя позиция (для VFX)
    pub position: Vec3,
    pub reason: DespawnReason,
}

/// System: интеграция движения + тик времени жизни
///
/// position += direction × speed × dt каждый fixed тик, независимо от
/// коллизий. Истечение lifetime уничтожает снаряд в любом состоянии полёта.
pub fn advance_projectiles(
    mut commands: Commands,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform), Without<Destroyed>>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.delta_secs();

    for (entity, mut projectile, mut transform) in projectiles.iter_mut() {
        let step = projectile.velocity() * dt;
        transform.translation += step;

        if projectile.tick_lifetime(dt) {
            commands.entity(entity).insert(Destroyed {
                reason: DespawnReason::Expired,
            });
        }
    }
}

/// System: удаление уничтоженных снарядов
///
/// Побочный эффект терминального состояния — ровно одна дерегистрация у
/// владельца. Владелец мог быть уничтожен раньше снаряда: тогда
/// дерегистрация — no-op, не ошибка.
pub fn despawn_destroyed_projectiles(
    mut commands: Commands,
    destroyed: Query<(Entity, &Projectile, &Transform, &Destroyed)>,
    mut shooters: Query<&mut Shooter>,
    mut despawned: EventWriter<ProjectileDespawned>,
) {
    for (entity, projectile, transform, marker) in destroyed.iter() {
        if let Ok(mut shooter) = shooters.get_mut(projectile.shooter) {
            shooter.deregister_projectile(entity);
        }

        despawned.write(ProjectileDespawned {
            projectile: entity,
            shooter: projectile.shooter,
            position: transform.translation,
            reason: marker.reason,
        });

        logger::log(&format!(
            "🗑️ Projectile {:?} despawned ({:?})",
            entity, marker.reason
        ));

        commands.entity(entity).despawn();
    }
}
