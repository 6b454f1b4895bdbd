//! Contact resolution — ветвление снаряда на контакте
//!
//! Архитектура: collision DETECTION принадлежит хосту (физический слой
//! шлёт `ProjectileContact`), RESOLUTION — ядру. Порядок ветвления строгий:
//! 1. Owner-фильтр (сам владелец, его потомки, sibling-снаряды) → игнор
//! 2. Hit notification (если у цели есть HitTarget) — всегда, один раз
//! 3. Бюджет рикошетов исчерпан → уничтожение
//! 4. Bounceable поверхность → отражение (вырожденное → уничтожение)
//! 5. Иначе → уничтожение

use bevy::prelude::*;

use crate::components::{Bounceable, Destroyed, DespawnReason, HitTarget, Projectile, Shooter};
use crate::logger;

/// Event: хостовая физика сообщает о контакте снаряда (хост → ядро)
#[derive(Event, Debug, Clone)]
pub struct ProjectileContact {
    pub projectile: Entity,
    /// С кем столкнулись
    pub other: Entity,
    /// Точка контакта (мировые координаты)
    pub point: Vec3,
    /// Нормаль поверхности в точке контакта
    pub normal: Vec3,
}

/// Event: снаряд попал в hit-eligible цель (ядро → потребители HitTarget)
///
/// Ровно один на каждый контакт, прошедший owner-фильтр — независимо от
/// того, отрикошетит снаряд дальше или уничтожится. Потребитель не должен
/// рассчитывать, что снаряд ещё существует.
#[derive(Event, Debug, Clone)]
pub struct ProjectileHit {
    pub projectile: Entity,
    pub target: Entity,
    /// Владелец снаряда (damage attribution)
    pub shooter: Entity,
    pub impact_point: Vec3,
    pub impact_normal: Vec3,
}

/// Event: снаряд отрикошетил (ядро → хост, звук/искры)
#[derive(Event, Debug, Clone)]
pub struct ProjectileBounced {
    pub projectile: Entity,
    pub position: Vec3,
    pub normal: Vec3,
}

/// System: разбор контактов этого тика
///
/// Снаряды с маркером `Destroyed` (истёкший lifetime этого же тика) уже
/// вне игры — истечение вытесняет обработку коллизии.
pub fn resolve_projectile_contacts(
    mut commands: Commands,
    mut contacts: EventReader<ProjectileContact>,
    mut projectiles: Query<&mut Projectile, Without<Destroyed>>,
    shooters: Query<&Shooter>,
    parents: Query<&ChildOf>,
    hit_targets: Query<(), With<HitTarget>>,
    bounceable: Query<(), With<Bounceable>>,
    mut hits: EventWriter<ProjectileHit>,
    mut bounces: EventWriter<ProjectileBounced>,
) {
    // Уничтоженные в ЭТОМ проходе: маркер через Commands ещё не применён,
    // а хост мог прислать несколько контактов на один снаряд за тик
    let mut destroyed_now: Vec<Entity> = Vec::new();

    for contact in contacts.read() {
        if destroyed_now.contains(&contact.projectile) {
            continue;
        }
        let Ok(mut projectile) = projectiles.get_mut(contact.projectile) else {
            continue; // Уже уничтожен или не снаряд
        };

        // 1. Owner-фильтр: свои контакты не считаются ни попаданием, ни рикошетом
        if is_owner_contact(&projectile, contact.other, &shooters, &parents) {
            continue;
        }

        // 2. Hit notification — до ветвления bounce/destroy, всегда один раз.
        //    Реакция (урон, эффекты) — дело цели, не снаряда.
        if hit_targets.contains(contact.other) {
            hits.write(ProjectileHit {
                projectile: contact.projectile,
                target: contact.other,
                shooter: projectile.shooter,
                impact_point: contact.point,
                impact_normal: contact.normal,
            });
        }

        // 3. Бюджет рикошетов имеет приоритет над типом поверхности
        if projectile.out_of_bounces() {
            commands.entity(contact.projectile).insert(Destroyed {
                reason: DespawnReason::OutOfBounces,
            });
            destroyed_now.push(contact.projectile);
            continue;
        }

        // 4. Bounceable → отражение
        if bounceable.contains(contact.other) {
            if projectile.try_bounce(contact.normal) {
                bounces.write(ProjectileBounced {
                    projectile: contact.projectile,
                    position: contact.point,
                    normal: contact.normal,
                });
            } else {
                // Вырожденное отражение: уничтожаем вместо нулевого направления
                logger::log_warning(&format!(
                    "⚠️ Projectile {:?}: degenerate reflection off normal {:?}, destroying",
                    contact.projectile, contact.normal
                ));
                commands.entity(contact.projectile).insert(Destroyed {
                    reason: DespawnReason::DegenerateBounce,
                });
                destroyed_now.push(contact.projectile);
            }
            continue;
        }

        // 5. Небьющаяся поверхность
        commands.entity(contact.projectile).insert(Destroyed {
            reason: DespawnReason::Impact,
        });
        destroyed_now.push(contact.projectile);
    }
}

/// Контакт с владельцем, его потомком или sibling-снарядом того же владельца?
///
/// Мёртвый владелец = back-reference отсутствует: sibling-фильтр не работает
/// (и не нужен — его set умер вместе с ним), краша нет.
fn is_owner_contact(
    projectile: &Projectile,
    other: Entity,
    shooters: &Query<&Shooter>,
    parents: &Query<&ChildOf>,
) -> bool {
    if other == projectile.shooter {
        return true;
    }

    // Потомок владельца (башня, хитбокс-ребёнок)
    let mut current = other;
    while let Ok(child_of) = parents.get(current) {
        let parent = child_of.parent();
        if parent == projectile.shooter {
            return true;
        }
        current = parent;
    }

    // Sibling-снаряд: живой снаряд того же владельца
    if let Ok(shooter) = shooters.get(projectile.shooter) {
        if shooter.owns_projectile(other) {
            return true;
        }
    }

    false
}
