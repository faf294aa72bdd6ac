//! Collision detection and response
//!
//! Everything in the world is an axis-aligned box. Each resolver re-checks
//! `active` flags before acting, so nothing relies on the previous frame's
//! view of an entity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{
    GameEvent, GamePhase, ItemKind, ParticleColor, PlatformKind, ProjectileKind, World,
};
use crate::consts::*;

/// Extra depth below a platform top that still counts as landing on it
const LANDING_TOLERANCE: f32 = 20.0;
/// Enemy hitboxes are shrunk by this much on every side
const ENEMY_HITBOX_PADDING: f32 = 8.0;
/// Stomps must land above the enemy midpoint plus this margin
const STOMP_MARGIN: f32 = 10.0;
/// Projectiles further than this below the viewport are retired
const PROJECTILE_BOTTOM_MARGIN: f32 = 100.0;
/// ... or this far above it
const PROJECTILE_TOP_MARGIN: f32 = 200.0;

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Shrink by `padding` on every side
    pub fn inset(&self, padding: f32) -> Self {
        Self::new(
            self.min + Vec2::splat(padding),
            self.size - Vec2::splat(2.0 * padding),
        )
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Where a damaging hit pushes the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Knockback {
    /// No velocity change
    None,
    /// Upward kick
    Up(f32),
    /// Upward kick plus a horizontal shove away from `from_x`
    Away { from_x: f32, up: f32, side: f32 },
}

/// Shared damage rule
///
/// Ignored entirely while invulnerable. Otherwise costs one life, grants a
/// fresh immunity window and applies the knockback; losing the last life
/// ends the run. Returns whether the hit landed; the caller owns the impact
/// particles.
pub fn damage_player(world: &mut World, now: f64, knockback: Knockback) -> bool {
    if world.player.is_invulnerable(now) {
        return false;
    }

    let player = &mut world.player;
    player.lives = player.lives.saturating_sub(1);
    player.invulnerable_until = now + INVULNERABILITY_MS;
    match knockback {
        Knockback::None => {}
        Knockback::Up(force) => player.vel.y = force,
        Knockback::Away { from_x, up, side } => {
            player.vel.y = up;
            player.vel.x = if player.pos.x < from_x { -side } else { side };
        }
    }

    world.emit(GameEvent::Hurt);
    if world.player.lives == 0 {
        end_run(world);
    }
    true
}

fn end_run(world: &mut World) {
    world.phase = GamePhase::GameOver;
    world.emit(GameEvent::GameOver);
    log::info!("Run over at score {} (level {})", world.score, world.level);
}

/// Step 1: land on the first platform under a falling player
///
/// Returns the index of the platform landed on.
pub fn land_on_platforms(world: &mut World) -> Option<usize> {
    if !world.player.is_falling() {
        return None;
    }

    let player = &world.player;
    let (left, right, bottom) = (player.pos.x, player.pos.x + player.size.x, player.bottom());
    let index = world.platforms.iter().position(|p| {
        p.active
            && left < p.pos.x + p.size.x
            && right > p.pos.x
            && bottom > p.pos.y
            && bottom < p.pos.y + p.size.y + LANDING_TOLERANCE
    })?;

    let platform = &mut world.platforms[index];
    let kind = platform.kind;
    let top = platform.pos.y;
    let debris_at = Vec2::new(platform.pos.x + platform.size.x / 2.0, top);
    if kind == PlatformKind::Breakable {
        platform.active = false;
    }

    let golden = world.player.golden;
    let force = match (kind, golden) {
        (PlatformKind::Boost, true) => GOLDEN_JUMP_FORCE * 1.2,
        (PlatformKind::Boost, false) => BOOST_FORCE,
        (_, true) => GOLDEN_JUMP_FORCE,
        (_, false) => JUMP_FORCE,
    };

    let player = &mut world.player;
    player.vel.y = force;
    player.pos.y = top - player.size.y;
    player.has_moved = true;
    let feet = Vec2::new(player.center_x(), player.bottom());

    if kind == PlatformKind::Breakable {
        world.burst(debris_at, ParticleColor::Debris, 8);
    }
    if kind == PlatformKind::Boost {
        world.burst(feet, ParticleColor::Boost, 12);
    } else {
        world.burst(feet, ParticleColor::Grass, 4);
    }
    world.emit(GameEvent::Jumped);
    Some(index)
}

/// Step 2: pick up overlapping items
pub fn collect_items(world: &mut World, now: f64) {
    let player_rect = world.player.rect();
    let mut collected = Vec::new();
    for item in world.items.iter_mut().filter(|i| i.active) {
        if item.rect().overlaps(&player_rect) {
            item.active = false;
            collected.push(item.kind);
        }
    }

    for kind in collected {
        let at = Vec2::new(world.player.center_x(), world.player.pos.y);
        match kind {
            ItemKind::GoldenPowerup => {
                // Re-acquiring refreshes the expiry
                let player = &mut world.player;
                player.golden = true;
                player.golden_until = Some(now + GOLDEN_DURATION_MS);
                player.vel.y = GOLDEN_JUMP_FORCE;
                world.emit(GameEvent::PowerUp);
                world.burst(at, ParticleColor::Golden, 20);
            }
            ItemKind::HealthPickup => {
                world.player.lives = (world.player.lives + 1).min(MAX_LIVES);
                world.emit(GameEvent::LifeUp);
                world.burst(at, ParticleColor::Carrot, 10);
            }
        }
    }
}

/// Step 4: advance projectiles, hit the player, retire strays
pub fn update_projectiles(world: &mut World, now: f64) {
    let player_rect = world.player.rect();
    let lower = world.camera_bottom() + PROJECTILE_BOTTOM_MARGIN;
    let upper = world.camera_y - PROJECTILE_TOP_MARGIN;

    let mut hits = Vec::new();
    for projectile in world.projectiles.iter_mut().filter(|p| p.active) {
        projectile.pos += projectile.vel;
        if projectile.kind == ProjectileKind::BossRay && projectile.rect().overlaps(&player_rect) {
            projectile.active = false;
            hits.push(projectile.pos.y);
        }
        if projectile.pos.y > lower || projectile.pos.y < upper {
            projectile.active = false;
        }
    }
    world.projectiles.retain(|p| p.active);

    for hit_y in hits {
        if world.phase != GamePhase::Playing {
            break;
        }
        if damage_player(world, now, Knockback::None) {
            let at = Vec2::new(world.player.pos.x, hit_y);
            world.burst(at, ParticleColor::White, 8);
        }
    }
}

/// Step 5: patrol enemies and resolve contact
pub fn update_enemies(world: &mut World, now: f64) {
    for index in 0..world.enemies.len() {
        if !world.enemies[index].active {
            continue;
        }

        let enemy = &mut world.enemies[index];
        enemy.pos.x += enemy.speed;
        if enemy.pos.x > enemy.origin_x + enemy.range
            || enemy.pos.x < enemy.origin_x - enemy.range
            || enemy.pos.x > GAME_WIDTH
            || enemy.pos.x < 0.0
        {
            enemy.speed = -enemy.speed;
        }

        let enemy_rect = enemy.rect();
        let hitbox = enemy_rect.inset(ENEMY_HITBOX_PADDING);
        if !world.player.rect().inset(ENEMY_HITBOX_PADDING).overlaps(&hitbox) {
            continue;
        }

        let player = &world.player;
        let stomp = player.is_falling()
            && player.bottom() < enemy_rect.min.y + enemy_rect.size.y / 2.0 + STOMP_MARGIN;
        if player.golden {
            world.enemies[index].active = false;
            world.burst(enemy_rect.min, ParticleColor::Enemy, 15);
            world.emit(GameEvent::Jumped);
        } else if stomp {
            world.enemies[index].active = false;
            world.player.vel.y = JUMP_FORCE;
            world.burst(enemy_rect.min, ParticleColor::Enemy, 10);
            world.emit(GameEvent::Jumped);
        } else {
            if damage_player(world, now, Knockback::Up(JUMP_FORCE)) {
                let at = world.player.pos;
                world.burst(at, ParticleColor::Enemy, 10);
            }
            if world.phase != GamePhase::Playing {
                return;
            }
        }
    }
}

/// Step 7: the player dropped below the viewport
///
/// Golden players bounce back for free. Otherwise a life is lost even while
/// invulnerable; survivors get a rescue bounce and fresh immunity.
pub fn check_fall(world: &mut World, now: f64) {
    if world.player.pos.y <= world.camera_bottom() {
        return;
    }

    let at = Vec2::new(world.player.center_x(), world.player.pos.y);
    if world.player.golden {
        world.player.vel.y = GOLDEN_JUMP_FORCE * 1.5;
        world.emit(GameEvent::PowerUp);
        world.burst(at, ParticleColor::Golden, 10);
        return;
    }

    let player = &mut world.player;
    player.lives = player.lives.saturating_sub(1);
    world.emit(GameEvent::Hurt);
    if world.player.lives > 0 {
        world.player.vel.y = GOLDEN_JUMP_FORCE;
        world.player.invulnerable_until = now + INVULNERABILITY_MS;
        world.burst(at, ParticleColor::White, 15);
    } else {
        end_run(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, Item, Platform, Projectile};

    fn playing_world() -> World {
        let mut world = World::new(1);
        world.phase = GamePhase::Playing;
        world.player.vel = Vec2::ZERO;
        world
    }

    fn platform(kind: PlatformKind, x: f32, y: f32) -> Platform {
        Platform {
            id: 1,
            pos: Vec2::new(x, y),
            size: PLATFORM_SIZE,
            kind,
            active: true,
            speed: 0.0,
            permanent: false,
        }
    }

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy {
            id: 9,
            pos: Vec2::new(x, y),
            size: ENEMY_SIZE,
            speed: 0.0,
            range: 100.0,
            origin_x: x,
            active: true,
        }
    }

    /// Falling player whose feet are at `bottom`, horizontally over x=100
    fn falling_onto(world: &mut World, bottom: f32, vy: f32) {
        world.player.pos = Vec2::new(100.0, bottom - world.player.size.y);
        world.player.vel.y = vy;
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Rect::new(Vec2::new(9.0, 9.0), Vec2::splat(10.0));
        let c = Rect::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c), "touching edges must not overlap");
        assert!(!a.inset(1.0).overlaps(&b.inset(1.0)));
    }

    #[test]
    fn test_normal_landing_snaps_and_jumps() {
        let mut world = playing_world();
        world.platforms.push(platform(PlatformKind::Normal, 90.0, 104.0));
        falling_onto(&mut world, 105.0, 5.0);

        assert_eq!(land_on_platforms(&mut world), Some(0));
        assert_eq!(world.player.vel.y, JUMP_FORCE);
        assert_eq!(world.player.pos.y, 104.0 - world.player.size.y);
        assert!(world.events.contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_no_landing_while_rising() {
        let mut world = playing_world();
        world.platforms.push(platform(PlatformKind::Normal, 90.0, 104.0));
        falling_onto(&mut world, 110.0, -3.0);
        assert_eq!(land_on_platforms(&mut world), None);
    }

    #[test]
    fn test_landing_band_limits() {
        let mut world = playing_world();
        world.platforms.push(platform(PlatformKind::Normal, 90.0, 104.0));
        // Deeper than height + tolerance: fell through already
        falling_onto(&mut world, 104.0 + 16.0 + 20.0, 5.0);
        assert_eq!(land_on_platforms(&mut world), None);
        // Feet still above the top
        falling_onto(&mut world, 103.0, 5.0);
        assert_eq!(land_on_platforms(&mut world), None);
    }

    #[test]
    fn test_first_platform_wins() {
        let mut world = playing_world();
        world.platforms.push(platform(PlatformKind::Boost, 90.0, 110.0));
        world.platforms.push(platform(PlatformKind::Normal, 90.0, 104.0));
        falling_onto(&mut world, 112.0, 5.0);
        assert_eq!(land_on_platforms(&mut world), Some(0));
        assert_eq!(world.player.vel.y, BOOST_FORCE);
        assert_eq!(world.player.pos.y, 110.0 - world.player.size.y);
    }

    #[test]
    fn test_golden_boost_beats_plain_boost() {
        let mut plain = playing_world();
        plain.platforms.push(platform(PlatformKind::Boost, 90.0, 104.0));
        falling_onto(&mut plain, 105.0, 5.0);
        land_on_platforms(&mut plain);

        let mut golden = playing_world();
        golden.player.golden = true;
        golden.platforms.push(platform(PlatformKind::Boost, 90.0, 104.0));
        falling_onto(&mut golden, 105.0, 5.0);
        land_on_platforms(&mut golden);

        assert!(golden.player.vel.y.abs() > plain.player.vel.y.abs());
        assert_eq!(golden.player.vel.y, GOLDEN_JUMP_FORCE * 1.2);
    }

    #[test]
    fn test_breakable_only_once() {
        let mut world = playing_world();
        world.platforms.push(platform(PlatformKind::Breakable, 90.0, 104.0));
        falling_onto(&mut world, 105.0, 5.0);
        assert_eq!(land_on_platforms(&mut world), Some(0));
        assert!(!world.platforms[0].active);
        assert!(!world.particles.is_empty());

        falling_onto(&mut world, 105.0, 5.0);
        assert_eq!(land_on_platforms(&mut world), None);
    }

    #[test]
    fn test_golden_pickup_refreshes_expiry() {
        let mut world = playing_world();
        world.player.pos = Vec2::new(100.0, 100.0);
        for (id, x) in [(1, 100.0), (2, 110.0)] {
            world.items.push(Item {
                id,
                pos: Vec2::new(x, 100.0),
                size: ITEM_SIZE,
                kind: ItemKind::GoldenPowerup,
                active: false,
            });
        }

        world.items[0].active = true;
        collect_items(&mut world, 1000.0);
        assert!(world.player.golden);
        assert_eq!(world.player.golden_until, Some(1000.0 + GOLDEN_DURATION_MS));
        assert_eq!(world.player.vel.y, GOLDEN_JUMP_FORCE);

        world.items[1].active = true;
        collect_items(&mut world, 5000.0);
        assert_eq!(world.player.golden_until, Some(5000.0 + GOLDEN_DURATION_MS));
        assert!(world.items.iter().all(|i| !i.active));
    }

    #[test]
    fn test_health_pickup_caps_lives() {
        let mut world = playing_world();
        world.player.pos = Vec2::new(100.0, 100.0);
        world.player.lives = MAX_LIVES;
        world.items.push(Item {
            id: 1,
            pos: Vec2::new(100.0, 100.0),
            size: ITEM_SIZE,
            kind: ItemKind::HealthPickup,
            active: true,
        });
        collect_items(&mut world, 0.0);
        assert_eq!(world.player.lives, MAX_LIVES);
        assert!(world.events.contains(&GameEvent::LifeUp));
    }

    #[test]
    fn test_damage_respects_invulnerability() {
        let mut world = playing_world();
        assert!(damage_player(&mut world, 1000.0, Knockback::None));
        assert_eq!(world.player.lives, INITIAL_LIVES - 1);
        assert_eq!(world.player.invulnerable_until, 1000.0 + INVULNERABILITY_MS);

        assert!(!damage_player(&mut world, 2000.0, Knockback::None));
        assert_eq!(world.player.lives, INITIAL_LIVES - 1);

        assert!(damage_player(&mut world, 2500.0, Knockback::None));
        assert_eq!(world.player.lives, INITIAL_LIVES - 2);
    }

    #[test]
    fn test_last_life_ends_run() {
        let mut world = playing_world();
        world.player.lives = 1;
        damage_player(&mut world, 0.0, Knockback::Up(JUMP_FORCE));
        assert_eq!(world.player.lives, 0);
        assert_eq!(world.phase, GamePhase::GameOver);
        assert!(world.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_knockback_away_from_source() {
        let mut world = playing_world();
        world.player.pos.x = 50.0;
        damage_player(
            &mut world,
            0.0,
            Knockback::Away {
                from_x: 200.0,
                up: JUMP_FORCE,
                side: 8.0,
            },
        );
        assert_eq!(world.player.vel, Vec2::new(-8.0, JUMP_FORCE));
    }

    #[test]
    fn test_golden_player_rams_enemy() {
        let mut world = playing_world();
        world.player.golden = true;
        world.player.pos = Vec2::new(100.0, 100.0);
        // Rising into the enemy from below would normally hurt
        world.player.vel.y = -5.0;
        world.enemies.push(enemy_at(100.0, 90.0));

        update_enemies(&mut world, 0.0);
        assert!(!world.enemies[0].active);
        assert_eq!(world.player.lives, INITIAL_LIVES);
    }

    #[test]
    fn test_stomp_defeats_enemy() {
        let mut world = playing_world();
        world.enemies.push(enemy_at(100.0, 100.0));
        // Feet at 120: above midpoint 116 + 10
        falling_onto(&mut world, 120.0, 4.0);

        update_enemies(&mut world, 0.0);
        assert!(!world.enemies[0].active);
        assert_eq!(world.player.vel.y, JUMP_FORCE);
        assert_eq!(world.player.lives, INITIAL_LIVES);
    }

    #[test]
    fn test_side_contact_hurts() {
        let mut world = playing_world();
        world.enemies.push(enemy_at(100.0, 100.0));
        world.player.pos = Vec2::new(110.0, 100.0);
        world.player.vel.y = 2.0;

        update_enemies(&mut world, 0.0);
        assert!(world.enemies[0].active);
        assert_eq!(world.player.lives, INITIAL_LIVES - 1);
        assert_eq!(world.player.vel.y, JUMP_FORCE);
        assert_eq!(world.particles.len(), 10);
        assert!(world.particles.iter().all(|p| p.color == ParticleColor::Enemy));
    }

    #[test]
    fn test_enemy_turns_at_patrol_edge() {
        let mut world = playing_world();
        let mut enemy = enemy_at(200.0, -500.0);
        enemy.speed = 3.0;
        enemy.range = 2.0;
        world.enemies.push(enemy);
        update_enemies(&mut world, 0.0);
        assert_eq!(world.enemies[0].speed, -3.0);
    }

    #[test]
    fn test_projectile_hits_once_then_retires() {
        let mut world = playing_world();
        world.player.pos = Vec2::new(100.0, 100.0);
        world.projectiles.push(Projectile {
            pos: Vec2::new(110.0, 90.0),
            size: PROJECTILE_SIZE,
            vel: Vec2::new(0.0, 8.0),
            kind: ProjectileKind::BossRay,
            active: true,
        });
        update_projectiles(&mut world, 0.0);
        assert!(world.projectiles.is_empty());
        assert_eq!(world.player.lives, INITIAL_LIVES - 1);
        assert_eq!(world.particles.len(), 8);
        assert!(world.particles.iter().all(|p| p.color == ParticleColor::White));
    }

    #[test]
    fn test_projectile_leaves_view() {
        let mut world = playing_world();
        world.player.pos = Vec2::new(0.0, 0.0);
        world.projectiles.push(Projectile {
            pos: Vec2::new(300.0, world.camera_bottom() + 99.0),
            size: PROJECTILE_SIZE,
            vel: Vec2::new(0.0, 8.0),
            kind: ProjectileKind::BossRay,
            active: true,
        });
        update_projectiles(&mut world, 0.0);
        assert!(world.projectiles.is_empty());
        assert_eq!(world.player.lives, INITIAL_LIVES);
    }

    #[test]
    fn test_fall_with_last_life_ends_run() {
        let mut world = playing_world();
        world.player.lives = 1;
        world.player.pos.y = world.camera_bottom() + 1.0;
        check_fall(&mut world, 0.0);
        assert_eq!(world.player.lives, 0);
        assert_eq!(world.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_fall_ignores_invulnerability_and_rescues() {
        let mut world = playing_world();
        world.player.invulnerable_until = 10_000.0;
        world.player.pos.y = world.camera_bottom() + 1.0;
        check_fall(&mut world, 500.0);
        assert_eq!(world.player.lives, INITIAL_LIVES - 1);
        assert_eq!(world.player.vel.y, GOLDEN_JUMP_FORCE);
        assert_eq!(world.player.invulnerable_until, 500.0 + INVULNERABILITY_MS);
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_golden_fall_is_free() {
        let mut world = playing_world();
        world.player.golden = true;
        world.player.pos.y = world.camera_bottom() + 1.0;
        check_fall(&mut world, 0.0);
        assert_eq!(world.player.lives, INITIAL_LIVES);
        assert_eq!(world.player.vel.y, GOLDEN_JUMP_FORCE * 1.5);
    }
}
