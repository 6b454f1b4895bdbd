//! Встроенный потребитель ProjectileHit — урон по Health
//!
//! Снаряд не знает damage-семантику: сколько урона получает цель, решает
//! сама цель (`HitTarget::impact_damage`). Цель без Health — silent no-op
//! (попадание всё равно было, событие уже ушло).

use bevy::prelude::*;

use crate::components::{Health, HitTarget};
use crate::combat::collision::ProjectileHit;
use crate::logger;

/// Событие: урон нанесён (для UI, звуков, эффектов)
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub target_died: bool,
}

/// Событие: цель умерла (health == 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: цель мертва
///
/// Despawn не автоматический — обломки остаются на арене, хост решает
/// что с ними делать (death VFX, fade-out).
#[derive(Component, Debug)]
pub struct Dead;

/// System: ProjectileHit → урон по Health цели
pub fn apply_projectile_damage(
    mut commands: Commands,
    mut hits: EventReader<ProjectileHit>,
    mut targets: Query<(&HitTarget, Option<&mut Health>)>,
    mut damage_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<EntityDied>,
) {
    for hit in hits.read() {
        let Ok((hit_target, health)) = targets.get_mut(hit.target) else {
            continue; // Цель исчезла между resolution и damage
        };

        let Some(mut health) = health else {
            continue; // Hit-eligible, но без Health — реакция цели пустая
        };

        let damage = hit_target.impact_damage;
        let was_alive = health.is_alive();
        health.take_damage(damage);
        let died = was_alive && !health.is_alive();

        damage_events.write(DamageDealt {
            attacker: hit.shooter,
            target: hit.target,
            damage,
            target_died: died,
        });

        logger::log(&format!(
            "💥 Projectile hit {:?} for {} damage (HP: {}/{})",
            hit.target, damage, health.current, health.max
        ));

        if died {
            commands.entity(hit.target).insert(Dead);
            died_events.write(EntityDied {
                entity: hit.target,
                killer: Some(hit.shooter),
            });

            logger::log_info(&format!(
                "☠️ Entity {:?} destroyed by {:?}",
                hit.target, hit.shooter
            ));
        }
    }
}
