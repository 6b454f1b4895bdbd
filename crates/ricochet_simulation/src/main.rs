//! Headless демо боевого ядра
//!
//! Мини-хост: арена из 4 bounceable стен, синий танк стреляет в красный,
//! toy collision detection (границы арены + круг цели) шлёт
//! `ProjectileContact` — ровно то, что в игре делает физический слой хоста.
//!
//! Фиксированный шаг продвигаем вручную: прогон детерминирован и не
//! зависит от wall-clock.

use std::time::Duration;

use bevy::prelude::*;
use ricochet_simulation::*;

const ARENA_HALF: f32 = 20.0;
const TANK_RADIUS: f32 = 1.0;
const TICK: f64 = 1.0 / 60.0;

struct ArenaWalls {
    east: Entity,
    west: Entity,
    north: Entity,
    south: Entity,
}

fn main() {
    println!("Starting RICOCHET headless arena demo");

    let mut app = create_headless_app();
    app.add_plugins(SimulationPlugin);

    let world = app.world_mut();

    // Арена: 4 стены, от всех рикошетит
    let walls = ArenaWalls {
        east: spawn_wall(world, Vec3::new(ARENA_HALF, 0.0, 0.0)),
        west: spawn_wall(world, Vec3::new(-ARENA_HALF, 0.0, 0.0)),
        north: spawn_wall(world, Vec3::new(0.0, 0.0, ARENA_HALF)),
        south: spawn_wall(world, Vec3::new(0.0, 0.0, -ARENA_HALF)),
    };

    // Синий стреляет, красный терпит
    let blue_pos = Vec3::new(-12.0, 0.0, 0.0);
    let red_pos = Vec3::new(12.0, 0.0, 0.0);

    let blue = world
        .spawn((
            Shooter::from_config(ShooterConfig::light_cannon()),
            TeamColor::BLUE,
            Transform::from_translation(blue_pos),
        ))
        .id();

    let red = world
        .spawn((
            Shooter::from_config(ShooterConfig::heavy_cannon()),
            TeamColor::RED,
            HitTarget::default(),
            Health::new(100),
            Transform::from_translation(red_pos),
        ))
        .id();

    let hud = world.spawn(AmmoDisplay::new(blue)).id();

    // Стреляем под углом, чтобы снаряды рикошетили от стен
    let aim = Vec3::new(1.0, 0.0, 0.35);

    for tick in 0..900u32 {
        let elapsed = app.world().resource::<Time<Fixed>>().elapsed_secs();

        // Первые 2 секунды гашетка зажата
        if elapsed < 2.0 {
            app.world_mut().send_event(FireIntent { shooter: blue, aim });
        }

        detect_arena_contacts(app.world_mut(), &walls, red, red_pos);
        step(&mut app);

        if tick % 90 == 0 {
            print_status(&mut app, tick, hud, red);
        }
    }

    println!("Simulation complete!");
}

fn spawn_wall(world: &mut World, position: Vec3) -> Entity {
    world
        .spawn((Bounceable, Transform::from_translation(position)))
        .id()
}

/// Один fixed тик симуляции
fn step(app: &mut App) {
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(Duration::from_secs_f64(TICK));
    app.world_mut().run_schedule(FixedUpdate);
}

/// Toy detection хоста: границы арены (плоскости) + круг цели.
///
/// Контакт со стеной только при движении В стену — после рикошета снаряд
/// может ещё находиться за границей, повторный контакт не шлём.
fn detect_arena_contacts(world: &mut World, walls: &ArenaWalls, target: Entity, target_pos: Vec3) {
    let mut contacts = Vec::new();

    let mut projectiles = world.query_filtered::<(Entity, &Transform, &Projectile), Without<Destroyed>>();
    for (entity, transform, projectile) in projectiles.iter(world) {
        let pos = transform.translation;
        let dir = projectile.direction;

        if pos.x > ARENA_HALF && dir.x > 0.0 {
            contacts.push(ProjectileContact {
                projectile: entity,
                other: walls.east,
                point: Vec3::new(ARENA_HALF, pos.y, pos.z),
                normal: Vec3::NEG_X,
            });
        } else if pos.x < -ARENA_HALF && dir.x < 0.0 {
            contacts.push(ProjectileContact {
                projectile: entity,
                other: walls.west,
                point: Vec3::new(-ARENA_HALF, pos.y, pos.z),
                normal: Vec3::X,
            });
        } else if pos.z > ARENA_HALF && dir.z > 0.0 {
            contacts.push(ProjectileContact {
                projectile: entity,
                other: walls.north,
                point: Vec3::new(pos.x, pos.y, ARENA_HALF),
                normal: Vec3::NEG_Z,
            });
        } else if pos.z < -ARENA_HALF && dir.z < 0.0 {
            contacts.push(ProjectileContact {
                projectile: entity,
                other: walls.south,
                point: Vec3::new(pos.x, pos.y, -ARENA_HALF),
                normal: Vec3::Z,
            });
        }

        let flat_delta = Vec3::new(pos.x - target_pos.x, 0.0, pos.z - target_pos.z);
        if flat_delta.length() < TANK_RADIUS {
            contacts.push(ProjectileContact {
                projectile: entity,
                other: target,
                point: pos,
                normal: flat_delta.normalize_or_zero(),
            });
        }
    }

    for contact in contacts {
        world.send_event(contact);
    }
}

fn print_status(app: &mut App, tick: u32, hud: Entity, red: Entity) {
    let world = app.world_mut();

    let live_projectiles = world
        .query_filtered::<(), With<Projectile>>()
        .iter(world)
        .count();

    let ammo = world
        .get::<AmmoDisplay>(hud)
        .map(|display| (display.loaded_count(), display.slots().len()));

    let red_hp = world.get::<Health>(red).map(|health| health.current);

    println!(
        "Tick {}: blue ammo {:?}, red HP {:?}, projectiles in flight {}",
        tick, ammo, red_hp, live_projectiles
    );
}
