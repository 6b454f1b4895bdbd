//! Shooter — weapon state machine танка
//!
//! Архитектура:
//! - ECS хранит: ammo pool, cooldown/reload timestamps, registry живых снарядов
//! - Хост поставляет: fire intent (кнопка зажата) + aim direction
//! - Пассивная перезарядка: первый патрон через `reload_initial_delay` после
//!   ПОСЛЕДНЕГО выстрела, каждый следующий через `reload_subsequent_delay`
//!   от предыдущего патрона. Любой выстрел сбрасывает всю последовательность.
//!
//! Время — абсолютные timestamps (секунды от старта симуляции), не countdown
//! таймеры: расписание перезарядки определено в абсолютных моментах, и
//! `f32::INFINITY` естественно кодирует "перезарядка приостановлена".

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Конфиг стрелка (tuning, загружается хостом из data files)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShooterConfig {
    /// Ёмкость магазина (0 = стрелок никогда не стреляет, это легально)
    pub max_ammo: u32,
    /// Минимальный интервал между выстрелами (секунды)
    pub shoot_cooldown: f32,
    /// Пауза после последнего выстрела до ПЕРВОГО патрона перезарядки
    pub reload_initial_delay: f32,
    /// Пауза между последующими патронами перезарядки
    pub reload_subsequent_delay: f32,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self::light_cannon()
    }
}

impl ShooterConfig {
    /// Лёгкая пушка — быстрая перезарядка, стандартный магазин
    pub fn light_cannon() -> Self {
        Self {
            max_ammo: 4,
            shoot_cooldown: 0.5,
            reload_initial_delay: 1.5,
            reload_subsequent_delay: 0.5,
        }
    }

    /// Тяжёлая пушка — два снаряда, долгая перезарядка
    pub fn heavy_cannon() -> Self {
        Self {
            max_ammo: 2,
            shoot_cooldown: 1.2,
            reload_initial_delay: 3.0,
            reload_subsequent_delay: 1.5,
        }
    }

    /// Отрицательные длительности — ошибка конфига: зажимаем в 0 и логируем,
    /// симуляцию не роняем
    pub fn sanitized(mut self) -> Self {
        for value in [
            &mut self.shoot_cooldown,
            &mut self.reload_initial_delay,
            &mut self.reload_subsequent_delay,
        ] {
            if *value < 0.0 {
                crate::logger::log_warning(&format!(
                    "⚠️ ShooterConfig: отрицательная длительность {} зажата в 0.0",
                    value
                ));
                *value = 0.0;
            }
        }
        self
    }
}

/// Смещение точки выстрела относительно позиции стрелка
///
/// Снаряд спавнится на `forward_offset` вдоль aim direction и `height` вверх —
/// за пределами корпуса, чтобы хостовая физика не выдала контакт в первом же тике.
#[derive(Component, Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Muzzle {
    /// Вынос вперёд вдоль направления выстрела (метры)
    pub forward_offset: f32,
    /// Высота над позицией стрелка (метры)
    pub height: f32,
}

impl Default for Muzzle {
    fn default() -> Self {
        Self {
            forward_offset: 1.2,
            height: 0.5,
        }
    }
}

impl Muzzle {
    /// Мировая позиция точки выстрела для данного aim direction
    pub fn world_position(&self, transform: &Transform, direction: Vec3) -> Vec3 {
        transform.translation + direction * self.forward_offset + Vec3::Y * self.height
    }
}

/// Цвет команды (published read contract для display и хостового рендера)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct TeamColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for TeamColor {
    fn default() -> Self {
        Self::BLUE
    }
}

impl TeamColor {
    pub const BLUE: Self = Self::rgb(0.2, 0.4, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.25, 0.2);
    pub const GREEN: Self = Self::rgb(0.2, 0.9, 0.3);
    pub const YELLOW: Self = Self::rgb(1.0, 0.85, 0.2);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Тот же цвет с другой прозрачностью (unloaded tint для ammo display)
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }
}

/// Weapon state machine одного комбатанта
///
/// Инварианты:
/// - 0 ≤ current_ammo ≤ max_ammo, меняется ровно на ±1 за переход
/// - `next_reload_time == f32::INFINITY` ⇔ перезарядка приостановлена
///   (магазин полон, либо ещё не стреляли после спавна)
/// - `active_projectiles` — только для фильтра same-owner коллизий;
///   lifecycle снарядов этот set НЕ контролирует
#[derive(Component, Debug, Clone)]
#[require(Muzzle, TeamColor, crate::components::ProjectileConfig, Transform)]
pub struct Shooter {
    max_ammo: u32,
    current_ammo: u32,
    shoot_cooldown: f32,
    reload_initial_delay: f32,
    reload_subsequent_delay: f32,
    /// Раньше этого момента новый выстрел невозможен
    next_shoot_time: f32,
    /// Момент следующего патрона перезарядки; INFINITY = приостановлена
    next_reload_time: f32,
    /// Живые снаряды этого стрелка (для фильтра self/sibling коллизий)
    active_projectiles: HashSet<Entity>,
}

impl Default for Shooter {
    fn default() -> Self {
        Self::from_config(ShooterConfig::default())
    }
}

impl Shooter {
    pub fn from_config(config: ShooterConfig) -> Self {
        let config = config.sanitized();
        Self {
            max_ammo: config.max_ammo,
            current_ammo: config.max_ammo,
            shoot_cooldown: config.shoot_cooldown,
            reload_initial_delay: config.reload_initial_delay,
            reload_subsequent_delay: config.reload_subsequent_delay,
            next_shoot_time: 0.0,
            next_reload_time: f32::INFINITY,
            active_projectiles: HashSet::new(),
        }
    }

    // === Published read contract (display adapter, host UI) ===

    pub fn current_ammo(&self) -> u32 {
        self.current_ammo
    }

    pub fn max_ammo(&self) -> u32 {
        self.max_ammo
    }

    pub fn is_full(&self) -> bool {
        self.current_ammo == self.max_ammo
    }

    pub fn active_projectile_count(&self) -> usize {
        self.active_projectiles.len()
    }

    // === Firing ===

    /// Можно ли стрелять прямо сейчас
    pub fn can_fire(&self, now: f32) -> bool {
        self.current_ammo > 0 && now >= self.next_shoot_time
    }

    /// Попытка выстрела. Пустой магазин или cooldown — обычный no-op
    /// (intent зажат, попытка повторится на следующем тике), не ошибка.
    ///
    /// При успехе: -1 патрон, взводится shoot cooldown, и расписание
    /// перезарядки стартует заново от ЭТОГО выстрела.
    pub fn try_fire(&mut self, now: f32) -> bool {
        if !self.can_fire(now) {
            return false;
        }

        self.current_ammo -= 1;
        self.next_shoot_time = now + self.shoot_cooldown;
        self.next_reload_time = now + self.reload_initial_delay;
        true
    }

    // === Passive reload ===

    /// Один шаг пассивной перезарядки. Максимум +1 патрон за вызов.
    ///
    /// Возвращает true если патрон добавлен. При достижении максимума
    /// перезарядка приостанавливается до следующего выстрела.
    pub fn tick_reload(&mut self, now: f32) -> bool {
        if self.current_ammo >= self.max_ammo || now < self.next_reload_time {
            return false;
        }

        self.current_ammo += 1;
        self.next_reload_time = if self.is_full() {
            f32::INFINITY
        } else {
            now + self.reload_subsequent_delay
        };
        true
    }

    // === Projectile registry ===

    pub fn register_projectile(&mut self, projectile: Entity) {
        self.active_projectiles.insert(projectile);
    }

    /// Идемпотентно: снятие отсутствующего id — no-op, не ошибка
    pub fn deregister_projectile(&mut self, projectile: Entity) -> bool {
        self.active_projectiles.remove(&projectile)
    }

    pub fn owns_projectile(&self, projectile: Entity) -> bool {
        self.active_projectiles.contains(&projectile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light() -> Shooter {
        Shooter::from_config(ShooterConfig::light_cannon())
    }

    #[test]
    fn test_spawns_full_with_reload_suspended() {
        let mut shooter = light();
        assert_eq!(shooter.current_ammo(), 4);
        assert!(shooter.is_full());
        // Без единого выстрела перезарядка не тикает никогда
        assert!(!shooter.tick_reload(1000.0));
    }

    #[test]
    fn test_fire_decrements_by_exactly_one() {
        let mut shooter = light();
        assert!(shooter.try_fire(0.0));
        assert_eq!(shooter.current_ammo(), 3);
    }

    #[test]
    fn test_second_shot_within_cooldown_is_noop() {
        let mut shooter = light();
        assert!(shooter.try_fire(0.0));
        assert!(!shooter.try_fire(0.3)); // cooldown 0.5 ещё не прошёл
        assert_eq!(shooter.current_ammo(), 3);
        assert!(shooter.try_fire(0.5));
        assert_eq!(shooter.current_ammo(), 2);
    }

    #[test]
    fn test_fire_with_empty_magazine_is_noop() {
        let mut shooter = light();
        for i in 0..4 {
            assert!(shooter.try_fire(i as f32));
        }
        assert_eq!(shooter.current_ammo(), 0);
        assert!(!shooter.try_fire(10.0));
        assert_eq!(shooter.current_ammo(), 0);
    }

    #[test]
    fn test_ammo_stays_in_bounds_under_mixed_sequences() {
        let mut shooter = light();
        let mut now = 0.0;
        for step in 0..200 {
            if step % 3 == 0 {
                shooter.try_fire(now);
            }
            shooter.tick_reload(now);
            assert!(shooter.current_ammo() <= shooter.max_ammo());
            now += 0.25;
        }
    }

    #[test]
    fn test_staggered_reload_schedule() {
        let mut shooter = light();
        // Два выстрела: 4 → 2
        assert!(shooter.try_fire(0.0));
        assert!(shooter.try_fire(0.5));

        // Первый патрон ровно через reload_initial_delay от ПОСЛЕДНЕГО выстрела
        assert!(!shooter.tick_reload(1.99));
        assert!(shooter.tick_reload(2.0)); // 0.5 + 1.5
        assert_eq!(shooter.current_ammo(), 3);

        // Второй — через reload_subsequent_delay от предыдущего патрона
        assert!(!shooter.tick_reload(2.4));
        assert!(shooter.tick_reload(2.5));
        assert_eq!(shooter.current_ammo(), 4);

        // Полный магазин — перезарядка приостановлена
        assert!(!shooter.tick_reload(100.0));
        assert_eq!(shooter.current_ammo(), 4);
    }

    #[test]
    fn test_shot_resets_reload_sequence() {
        let mut shooter = light();
        assert!(shooter.try_fire(0.0)); // ammo 3, reload в 1.5

        // Выстрел в 1.0 сбрасывает расписание: теперь reload в 1.0 + 1.5 = 2.5
        assert!(shooter.try_fire(1.0)); // ammo 2
        assert!(!shooter.tick_reload(1.5));
        assert!(!shooter.tick_reload(2.4));
        assert!(shooter.tick_reload(2.5));
        assert_eq!(shooter.current_ammo(), 3);
    }

    #[test]
    fn test_single_shot_refill_example() {
        // max_ammo=4, cooldown=0.5, initial=1.5, subsequent=0.5
        let mut shooter = light();

        // t=0: выстрел, 4 → 3
        assert!(shooter.try_fire(0.0));
        assert_eq!(shooter.current_ammo(), 3);

        // t=1.5: патрон вернулся, магазин полон, перезарядка приостановлена
        assert!(!shooter.tick_reload(1.4));
        assert!(shooter.tick_reload(1.5));
        assert_eq!(shooter.current_ammo(), 4);
        assert!(!shooter.tick_reload(2.0));
        assert_eq!(shooter.current_ammo(), 4);
    }

    #[test]
    fn test_reload_adds_at_most_one_per_tick_even_when_overdue() {
        let mut shooter = light();
        for i in 0..3 {
            assert!(shooter.try_fire(i as f32));
        }
        assert_eq!(shooter.current_ammo(), 1);

        // Симуляция "зависла" на 100 секунд — догоняем по одному патрону за тик
        assert!(shooter.tick_reload(100.0));
        assert_eq!(shooter.current_ammo(), 2);
        assert!(shooter.tick_reload(100.5));
        assert!(shooter.tick_reload(101.0));
        assert_eq!(shooter.current_ammo(), 4);
    }

    #[test]
    fn test_deregister_is_idempotent() {
        let mut shooter = light();
        let id = Entity::from_raw(7);

        shooter.register_projectile(id);
        assert!(shooter.owns_projectile(id));

        assert!(shooter.deregister_projectile(id));
        assert!(!shooter.deregister_projectile(id)); // повторное снятие — no-op
        assert!(!shooter.owns_projectile(id));
    }

    #[test]
    fn test_zero_capacity_shooter_never_fires() {
        let mut shooter = Shooter::from_config(ShooterConfig {
            max_ammo: 0,
            ..ShooterConfig::light_cannon()
        });
        assert!(!shooter.try_fire(0.0));
        assert!(!shooter.tick_reload(10.0));
    }

    #[test]
    fn test_negative_durations_clamped() {
        let config = ShooterConfig {
            shoot_cooldown: -1.0,
            reload_initial_delay: -2.0,
            ..ShooterConfig::light_cannon()
        }
        .sanitized();
        assert_eq!(config.shoot_cooldown, 0.0);
        assert_eq!(config.reload_initial_delay, 0.0);
    }
}
