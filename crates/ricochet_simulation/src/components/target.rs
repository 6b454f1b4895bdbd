//! HitTarget capability + Health
//!
//! Любой объект мира с компонентом `HitTarget` hit-eligible: контакт снаряда
//! с ним (прошедший owner-фильтр) генерирует ровно один `ProjectileHit`.
//! Что делать с попаданием — дело самой цели: снаряд не знает про
//! damage/health семантику. Встроенный потребитель (combat::damage) читает
//! `impact_damage` цели и бьёт по её Health; хост может игнорировать его
//! и подписаться на `ProjectileHit` сам.

use bevy::prelude::*;

/// Способность получать попадания снарядов
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HitTarget {
    /// Сколько урона ЭТА цель получает с одного попадания
    /// (реакция на попадание принадлежит цели, не снаряду)
    pub impact_damage: u32,
}

impl Default for HitTarget {
    fn default() -> Self {
        Self { impact_damage: 25 }
    }
}

/// Здоровье цели
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.max);
    }
}
