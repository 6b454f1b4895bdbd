//! Ammo display adapter — пассивная read-model для хостового HUD
//!
//! Адаптер каждый тик опрашивает published read contract стрелка
//! (current_ammo / max_ammo / TeamColor) и держит готовый список слотов:
//! первые `current_ammo` — в цвете команды, остальные — полупрозрачные.
//! Хостовый рендер просто рисует `slots()`, никакой записи обратно.
//!
//! Пересборка только при изменениях (lastKnownAmmo-паттерн), плюс
//! `force_refresh()` если хост поменял max_ammo снаружи.

use bevy::prelude::*;

use crate::components::{Shooter, TeamColor};
use crate::logger;

/// Один индикатор патрона
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmmoSlot {
    pub color: TeamColor,
    pub loaded: bool,
}

/// Display-адаптер, привязанный к одному стрелку
#[derive(Component, Debug, Clone)]
pub struct AmmoDisplay {
    /// За кем следим
    pub target: Entity,
    /// Прозрачность "пустых" слотов
    pub unloaded_alpha: f32,
    /// false = ошибка конфигурации при setup, адаптер выключен
    pub enabled: bool,
    slots: Vec<AmmoSlot>,
    last_known_ammo: Option<u32>,
    last_color: TeamColor,
    needs_refresh: bool,
}

impl AmmoDisplay {
    pub fn new(target: Entity) -> Self {
        Self {
            target,
            unloaded_alpha: 0.3,
            enabled: true,
            slots: Vec::new(),
            last_known_ammo: None,
            last_color: TeamColor::default(),
            needs_refresh: true,
        }
    }

    /// Готовые слоты для рендера
    pub fn slots(&self) -> &[AmmoSlot] {
        &self.slots
    }

    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.loaded).count()
    }

    /// Принудительная пересборка на следующем тике
    /// (хост поменял max_ammo снаружи)
    pub fn force_refresh(&mut self) {
        self.last_known_ammo = None;
        self.needs_refresh = true;
    }

    fn rebuild(&mut self, shooter: &Shooter, color: TeamColor) {
        let ammo = shooter.current_ammo();
        let unloaded = color.with_alpha(self.unloaded_alpha);

        self.slots = (0..shooter.max_ammo())
            .map(|index| AmmoSlot {
                loaded: index < ammo,
                color: if index < ammo { color } else { unloaded },
            })
            .collect();

        self.last_known_ammo = Some(ammo);
        self.last_color = color;
        self.needs_refresh = false;
    }
}

/// System: проверка setup новых адаптеров
///
/// Цель не-стрелок — ошибка конфигурации: логируем и выключаем адаптер,
/// симуляцию не трогаем.
pub fn validate_ammo_displays(
    mut displays: Query<(Entity, &mut AmmoDisplay), Added<AmmoDisplay>>,
    shooters: Query<(), With<Shooter>>,
) {
    for (entity, mut display) in displays.iter_mut() {
        if !shooters.contains(display.target) {
            logger::log_error(&format!(
                "AmmoDisplay {:?}: target {:?} is not a Shooter — disabling",
                entity, display.target
            ));
            display.enabled = false;
        }
    }
}

/// System: опрос стрелков и обновление слотов
pub fn update_ammo_displays(
    mut displays: Query<&mut AmmoDisplay>,
    shooters: Query<(&Shooter, &TeamColor)>,
) {
    for mut display in displays.iter_mut() {
        if !display.enabled {
            continue;
        }
        let Ok((shooter, color)) = shooters.get(display.target) else {
            continue; // Стрелок уничтожен после setup — просто не обновляемся
        };

        // max_ammo поменялся снаружи → полная пересборка
        if display.slots.len() != shooter.max_ammo() as usize {
            display.needs_refresh = true;
        }

        if display.last_known_ammo != Some(shooter.current_ammo()) || display.last_color != *color
        {
            display.needs_refresh = true;
        }

        if display.needs_refresh {
            display.rebuild(shooter, *color);
        }
    }
}

/// Plugin display-адаптера
///
/// Обновление после боевой цепочки, чтобы HUD видел состояние этого тика.
pub struct AmmoDisplayPlugin;

impl Plugin for AmmoDisplayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (validate_ammo_displays, update_ammo_displays)
                .chain()
                .after(crate::combat::projectile::despawn_destroyed_projectiles),
        );
    }
}
