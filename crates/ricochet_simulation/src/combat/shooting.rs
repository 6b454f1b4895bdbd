//! Shooting systems: обработка fire intents + пассивная перезарядка
//!
//! Хостовый input layer пишет `FireIntent` каждый тик пока кнопка зажата —
//! неудачная попытка (пустой магазин, cooldown) просто повторится на
//! следующем тике. Ядро в ответ шлёт `WeaponFired` для VFX/audio хоста.

use bevy::prelude::*;

use crate::components::{Muzzle, Projectile, ProjectileConfig, Shooter, TeamColor};
use crate::logger;

/// Event: хост хочет выстрелить этим стрелком (intent зажатой кнопки)
#[derive(Event, Debug, Clone)]
pub struct FireIntent {
    /// Кто стреляет
    pub shooter: Entity,
    /// Aim direction в мировых координатах (вертикальная составляющая
    /// отбрасывается, бой идёт в горизонтальной плоскости)
    pub aim: Vec3,
}

/// Event: выстрел состоялся (ядро → хост, для дульной вспышки и звука)
#[derive(Event, Debug, Clone)]
pub struct WeaponFired {
    pub shooter: Entity,
    pub projectile: Entity,
    /// Позиция среза ствола
    pub origin: Vec3,
    /// Направление вылета (unit, горизонтальное)
    pub direction: Vec3,
}

/// System: обработка fire intents
///
/// Порядок в тике: до `tick_passive_reload` — выстрел, случившийся в том же
/// тике, на который была назначена перезарядка, отменяет её (расписание
/// стартует заново от выстрела).
pub fn process_fire_intents(
    mut commands: Commands,
    mut intents: EventReader<FireIntent>,
    mut shooters: Query<(&mut Shooter, &Transform, &Muzzle, &TeamColor, &ProjectileConfig)>,
    mut fired: EventWriter<WeaponFired>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for intent in intents.read() {
        let Ok((mut shooter, transform, muzzle, color, shell)) = shooters.get_mut(intent.shooter)
        else {
            continue; // Стрелок исчез — intent устарел
        };

        // Вырожденный aim — transient no-op, как пустой магазин
        let mut aim = intent.aim;
        aim.y = 0.0;
        let Some(direction) = aim.try_normalize() else {
            continue;
        };

        if !shooter.try_fire(now) {
            continue; // Пустой магазин или cooldown — обычный no-op
        }

        let origin = muzzle.world_position(transform, direction);

        // Спавним снаряд: tuning из шаблона стрелка, цвет команды копируем
        // чтобы хостовый рендер мог тонировать его без lookup владельца
        let projectile = commands
            .spawn((
                Projectile::from_config(intent.shooter, direction, shell),
                Transform::from_translation(origin),
                *color,
            ))
            .id();

        shooter.register_projectile(projectile);

        fired.write(WeaponFired {
            shooter: intent.shooter,
            projectile,
            origin,
            direction,
        });

        logger::log(&format!(
            "🔫 Shooter {:?} fired {:?} ({}/{} ammo left)",
            intent.shooter,
            projectile,
            shooter.current_ammo(),
            shooter.max_ammo()
        ));
    }
}

/// System: пассивная перезарядка (максимум +1 патрон на стрелка за тик)
pub fn tick_passive_reload(mut shooters: Query<(Entity, &mut Shooter)>, time: Res<Time<Fixed>>) {
    let now = time.elapsed_secs();

    for (entity, mut shooter) in shooters.iter_mut() {
        if shooter.tick_reload(now) {
            logger::log(&format!(
                "🔄 Shooter {:?} reloaded ({}/{})",
                entity,
                shooter.current_ammo(),
                shooter.max_ammo()
            ));
        }
    }
}
