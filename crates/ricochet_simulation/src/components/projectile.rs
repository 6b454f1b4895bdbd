//! Projectile — состояние одного снаряда в полёте
//!
//! Архитектура:
//! - Снаряд сам владеет своим lifecycle: lifetime, bounce budget, реакция
//!   на контакт. Стрелок держит только lookup-ссылку для фильтра коллизий.
//! - `shooter` — слабая back-reference: стрелок может умереть раньше снаряда,
//!   тогда дерегистрация превращается в no-op.
//! - Движение: direction (unit, горизонтальный) × speed, интегрируется
//!   каждый fixed тик. Bounce отражает direction, скорость не меняет.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Порог вырождения отражения: если горизонтальная проекция короче этого,
/// направление после рикошета не определено и снаряд уничтожается
const DEGENERATE_REFLECTION_SQ: f32 = 0.01;

/// Tuning снаряда — "шаблон спавна" на entity стрелка
/// (Required Component у Shooter, поэтому шаблон не может отсутствовать)
#[derive(Component, Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct ProjectileConfig {
    /// Скорость полёта (м/с)
    pub speed: f32,
    /// Сколько рикошетов разрешено до уничтожения
    pub max_bounces: u32,
    /// Время жизни (секунды)
    pub lifetime: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 20.0,
            max_bounces: 3,
            lifetime: 15.0,
        }
    }
}

/// Снаряд в полёте
///
/// State machine: Flying → {Flying (после рикошета), Destroyed}.
/// Destroyed — терминальное состояние (маркер [`Destroyed`]), побочный
/// эффект дерегистрации у владельца срабатывает ровно один раз.
#[derive(Component, Debug, Clone)]
pub struct Projectile {
    /// Кто выстрелил (слабая ссылка, владелец может уже не существовать)
    pub shooter: Entity,
    /// Направление полёта (unit, y == 0)
    pub direction: Vec3,
    /// Скорость (м/с)
    pub speed: f32,
    /// Оставшееся время жизни (секунды, тикает вниз)
    pub lifetime: f32,
    /// Сколько рикошетов уже случилось
    pub bounce_count: u32,
    /// Бюджет рикошетов
    pub max_bounces: u32,
}

impl Projectile {
    pub fn from_config(shooter: Entity, direction: Vec3, config: &ProjectileConfig) -> Self {
        Self {
            shooter,
            direction,
            speed: config.speed,
            lifetime: config.lifetime,
            bounce_count: 0,
            max_bounces: config.max_bounces,
        }
    }

    /// Скорость как вектор (для интеграции позиции)
    pub fn velocity(&self) -> Vec3 {
        self.direction * self.speed
    }

    /// Тик времени жизни. true = снаряд истёк (уничтожить независимо
    /// от любых контактов этого тика)
    pub fn tick_lifetime(&mut self, dt: f32) -> bool {
        self.lifetime -= dt;
        self.lifetime <= 0.0
    }

    /// Бюджет рикошетов исчерпан — следующий валидный контакт уничтожает,
    /// даже если поверхность bounceable
    pub fn out_of_bounces(&self) -> bool {
        self.bounce_count >= self.max_bounces
    }

    /// Рикошет от поверхности с данной нормалью.
    ///
    /// true — direction отражён (горизонтально, unit) и счётчик увеличен.
    /// false — отражение вырождено (почти вертикальная нормаль);
    /// вызывающий обязан уничтожить снаряд, нулевое направление недопустимо.
    pub fn try_bounce(&mut self, normal: Vec3) -> bool {
        match reflect_horizontal(self.direction, normal) {
            Some(direction) => {
                self.direction = direction;
                self.bounce_count += 1;
                true
            }
            None => false,
        }
    }
}

/// Отражение направления о нормаль с проекцией на горизонтальную плоскость
///
/// d' = d − 2(d·n)n, затем y := 0 и нормализация. None если горизонтальная
/// проекция численно вырождена.
pub fn reflect_horizontal(direction: Vec3, normal: Vec3) -> Option<Vec3> {
    let reflected = direction - 2.0 * direction.dot(normal) * normal;
    let flat = Vec3::new(reflected.x, 0.0, reflected.z);

    if flat.length_squared() < DEGENERATE_REFLECTION_SQ {
        return None;
    }
    Some(flat.normalize())
}

/// Причина уничтожения снаряда (уходит хосту в ProjectileDespawned для VFX)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DespawnReason {
    /// Время жизни истекло
    Expired,
    /// Бюджет рикошетов исчерпан на валидном контакте
    OutOfBounces,
    /// Попадание в небьющуюся поверхность
    Impact,
    /// Вырожденное отражение (fail-safe вместо нулевого направления)
    DegenerateBounce,
}

/// Маркер: снаряд уничтожен в этом тике
///
/// Ставится любым путём уничтожения; despawn-система дерегистрирует снаряд
/// у владельца и удаляет entity. Контакты снарядов с этим маркером
/// игнорируются (истечение lifetime вытесняет обработку коллизии).
#[derive(Component, Debug, Clone, Copy)]
pub struct Destroyed {
    pub reason: DespawnReason,
}
