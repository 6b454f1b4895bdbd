//! Tests for contact resolution (owner filter, hit notification, bounce/destroy).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use std::time::Duration;

    use crate::combat::{
        FireIntent, ProjectileBounced, ProjectileContact, ProjectileDespawned, ProjectileHit,
        WeaponFired,
    };
    use crate::components::*;

    const DT: f32 = 0.05;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(crate::SimulationPlugin);
        app
    }

    fn step(app: &mut App) {
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(Duration::from_secs_f32(DT));
        app.world_mut().run_schedule(FixedUpdate);
    }

    fn spawn_shooter(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Shooter::from_config(ShooterConfig::light_cannon()),
                TeamColor::BLUE,
                Transform::default(),
            ))
            .id()
    }

    /// Выстрел + один тик; возвращает entity снаряда из WeaponFired
    fn fire(app: &mut App, shooter: Entity, aim: Vec3) -> Entity {
        app.world_mut().send_event(FireIntent { shooter, aim });
        step(app);

        app.world()
            .resource::<Events<WeaponFired>>()
            .iter_current_update_events()
            .last()
            .expect("выстрел должен был состояться")
            .projectile
    }

    fn contact(app: &mut App, projectile: Entity, other: Entity, normal: Vec3) {
        app.world_mut().send_event(ProjectileContact {
            projectile,
            other,
            point: Vec3::new(5.0, 0.5, 0.0),
            normal,
        });
    }

    fn hit_events(app: &App) -> Vec<ProjectileHit> {
        app.world()
            .resource::<Events<ProjectileHit>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    fn despawn_events(app: &App) -> Vec<ProjectileDespawned> {
        app.world()
            .resource::<Events<ProjectileDespawned>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    fn is_alive(app: &App, entity: Entity) -> bool {
        app.world().get::<Projectile>(entity).is_some()
    }

    #[test]
    fn test_owner_contact_fully_ignored() {
        let mut app = test_app();
        let shooter = spawn_shooter(&mut app);
        let projectile = fire(&mut app, shooter, Vec3::X);

        contact(&mut app, projectile, shooter, Vec3::NEG_X);
        step(&mut app);

        assert!(is_alive(&app, projectile));
        assert!(hit_events(&app).is_empty());
        assert_eq!(app.world().get::<Projectile>(projectile).unwrap().bounce_count, 0);
    }

    #[test]
    fn test_owner_descendant_contact_ignored() {
        let mut app = test_app();
        let shooter = spawn_shooter(&mut app);
        // Башня — ребёнок танка, hit-eligible сама по себе
        let turret = app
            .world_mut()
            .spawn((ChildOf(shooter), HitTarget::default()))
            .id();

        let projectile = fire(&mut app, shooter, Vec3::X);
        contact(&mut app, projectile, turret, Vec3::NEG_X);
        step(&mut app);

        assert!(is_alive(&app, projectile));
        assert!(hit_events(&app).is_empty(), "свой потомок — не цель");
    }

    #[test]
    fn test_sibling_projectile_contact_ignored() {
        let mut app = test_app();
        let shooter = spawn_shooter(&mut app);

        let first = fire(&mut app, shooter, Vec3::X);
        // Пережидаем cooldown (0.5s)
        for _ in 0..11 {
            step(&mut app);
        }
        let second = fire(&mut app, shooter, Vec3::Z);

        contact(&mut app, first, second, Vec3::NEG_X);
        step(&mut app);

        assert!(is_alive(&app, first));
        assert!(is_alive(&app, second));
        assert!(hit_events(&app).is_empty());
    }

    #[test]
    fn test_hit_notification_once_with_attribution() {
        let mut app = test_app();
        let shooter = spawn_shooter(&mut app);
        let victim = app
            .world_mut()
            .spawn((HitTarget::default(), Health::new(100)))
            .id();

        let projectile = fire(&mut app, shooter, Vec3::X);
        contact(&mut app, projectile, victim, Vec3::NEG_X);
        step(&mut app);

        let hits = hit_events(&app);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].projectile, projectile);
        assert_eq!(hits[0].target, victim);
        assert_eq!(hits[0].shooter, shooter);
        assert_eq!(hits[0].impact_normal, Vec3::NEG_X);

        // Небьющаяся цель: снаряд уничтожен и снят с учёта владельца
        assert!(!is_alive(&app, projectile));
        let despawns = despawn_events(&app);
        assert_eq!(despawns.len(), 1);
        assert_eq!(despawns[0].reason, DespawnReason::Impact);

        let shooter_state = app.world().get::<Shooter>(shooter).unwrap();
        assert_eq!(shooter_state.active_projectile_count(), 0);
    }

    #[test]
    fn test_entity_without_hit_target_gets_no_notification() {
        let mut app = test_app();
        let shooter = spawn_shooter(&mut app);
        let crate_entity = app.world_mut().spawn(Transform::default()).id();

        let projectile = fire(&mut app, shooter, Vec3::X);
        contact(&mut app, projectile, crate_entity, Vec3::NEG_X);
        step(&mut app);

        assert!(hit_events(&app).is_empty());
        assert!(!is_alive(&app, projectile)); // но снаряд всё равно разбился
    }

    #[test]
    fn test_bounceable_surface_reflects() {
        let mut app = test_app();
        let shooter = spawn_shooter(&mut app);
        let wall = app.world_mut().spawn(Bounceable).id();

        let projectile = fire(&mut app, shooter, Vec3::X);
        contact(&mut app, projectile, wall, Vec3::NEG_X);
        step(&mut app);

        assert!(is_alive(&app, projectile));
        let state = app.world().get::<Projectile>(projectile).unwrap();
        assert_eq!(state.bounce_count, 1);
        assert!((state.direction - Vec3::NEG_X).length() < 1e-5);

        let bounces: Vec<ProjectileBounced> = app
            .world()
            .resource::<Events<ProjectileBounced>>()
            .iter_current_update_events()
            .cloned()
            .collect();
        assert_eq!(bounces.len(), 1);
    }

    #[test]
    fn test_exhausted_bounce_budget_destroys_on_bounceable() {
        let mut app = test_app();
        let shooter = app
            .world_mut()
            .spawn((
                Shooter::from_config(ShooterConfig::light_cannon()),
                ProjectileConfig {
                    max_bounces: 0,
                    ..ProjectileConfig::default()
                },
                Transform::default(),
            ))
            .id();
        let wall = app.world_mut().spawn(Bounceable).id();

        let projectile = fire(&mut app, shooter, Vec3::X);
        contact(&mut app, projectile, wall, Vec3::NEG_X);
        step(&mut app);

        assert!(!is_alive(&app, projectile));
        let despawns = despawn_events(&app);
        assert_eq!(despawns.len(), 1);
        assert_eq!(despawns[0].reason, DespawnReason::OutOfBounces);
    }

    #[test]
    fn test_hit_notification_fires_even_when_bouncing() {
        let mut app = test_app();
        let shooter = spawn_shooter(&mut app);
        // Бронированная цель: и hit-eligible, и отражает
        let armored = app
            .world_mut()
            .spawn((HitTarget::default(), Bounceable))
            .id();

        let projectile = fire(&mut app, shooter, Vec3::X);
        contact(&mut app, projectile, armored, Vec3::NEG_X);
        step(&mut app);

        assert_eq!(hit_events(&app).len(), 1);
        assert!(is_alive(&app, projectile));
        assert_eq!(app.world().get::<Projectile>(projectile).unwrap().bounce_count, 1);
    }

    #[test]
    fn test_degenerate_reflection_destroys() {
        let mut app = test_app();
        let shooter = spawn_shooter(&mut app);
        let wall = app.world_mut().spawn(Bounceable).id();

        let projectile = fire(&mut app, shooter, Vec3::X);
        // Рамп 45°: отражение уходит вертикально, направление вырождается
        contact(&mut app, projectile, wall, Vec3::new(-0.7071, 0.7071, 0.0));
        step(&mut app);

        assert!(!is_alive(&app, projectile));
        let despawns = despawn_events(&app);
        assert_eq!(despawns.len(), 1);
        assert_eq!(despawns[0].reason, DespawnReason::DegenerateBounce);
    }

    #[test]
    fn test_owner_despawned_midflight_is_harmless() {
        let mut app = test_app();
        let shooter = spawn_shooter(&mut app);
        let wall = app.world_mut().spawn(Bounceable).id();

        let projectile = fire(&mut app, shooter, Vec3::X);
        app.world_mut().despawn(shooter);

        // Рикошет работает без владельца
        contact(&mut app, projectile, wall, Vec3::NEG_X);
        step(&mut app);
        assert!(is_alive(&app, projectile));

        // И уничтожение: дерегистрация — no-op, события уходят как обычно
        let crate_entity = app.world_mut().spawn(Transform::default()).id();
        contact(&mut app, projectile, crate_entity, Vec3::X);
        step(&mut app);

        assert!(!is_alive(&app, projectile));
        assert_eq!(despawn_events(&app).len(), 1);
    }

    #[test]
    fn test_two_contacts_same_tick_resolve_once() {
        let mut app = test_app();
        let shooter = spawn_shooter(&mut app);
        let crate_a = app.world_mut().spawn(Transform::default()).id();
        let crate_b = app.world_mut().spawn(Transform::default()).id();

        let projectile = fire(&mut app, shooter, Vec3::X);
        // Хост прислал два контакта за один тик — второй игнорируется
        contact(&mut app, projectile, crate_a, Vec3::NEG_X);
        contact(&mut app, projectile, crate_b, Vec3::NEG_Z);
        step(&mut app);

        assert!(!is_alive(&app, projectile));
        assert_eq!(despawn_events(&app).len(), 1);
    }
}
