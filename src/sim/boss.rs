//! End-game boss: spawn, patrol, volleys and the headbutt exchange
//!
//! Lifecycle is `None` (not yet spawned) -> `Active` -> `Defeated`. The win
//! itself is not declared here; `BossDefeated` is raised and the owner of the
//! world schedules the win on the real-time clock.

use glam::Vec2;

use super::collision::{Knockback, damage_player};
use super::state::{
    Boss, BossPhase, GameEvent, ParticleColor, Platform, Projectile, ProjectileKind, World,
};
use crate::consts::*;

/// How far above the camera top the boss enters
const SPAWN_ABOVE_CAMERA: f32 = 300.0;
/// Hover height below the camera top
const HOVER_OFFSET: f32 = 100.0;
/// Fraction of the remaining distance closed per frame
const FOLLOW_RATE: f32 = 0.05;
/// Hitbox shrink on every side
const HITBOX_PADDING: f32 = 5.0;
/// Headbutts must land with the feet above this fraction of the boss height
const HEADBUTT_DEPTH: f32 = 0.7;
/// Sideways shove when the boss hurts the player
const CONTACT_KNOCKBACK: f32 = 8.0;
/// Arena floor sits this far above the viewport bottom
const ARENA_FLOOR_OFFSET: f32 = 60.0;

/// Volley pattern: straight down, down-left, down-right
const VOLLEY: [Vec2; 3] = [
    Vec2::new(0.0, 8.0),
    Vec2::new(-3.0, 7.0),
    Vec2::new(3.0, 7.0),
];

/// Bring in the boss and turn the level into an arena
///
/// No-op if a boss already exists this run. Returns whether it spawned.
pub fn spawn_boss(world: &mut World) -> bool {
    if world.boss.is_some() {
        return false;
    }

    world.boss = Some(Boss {
        pos: Vec2::new(GAME_WIDTH / 2.0 - BOSS_SIZE.x / 2.0, world.camera_y - SPAWN_ABOVE_CAMERA),
        size: BOSS_SIZE,
        hp: BOSS_HP,
        max_hp: BOSS_HP,
        speed: BOSS_SPEED,
        phase: BossPhase::Active,
        invulnerable_frames: 0,
        attack_frames: BOSS_FIRST_ATTACK,
    });

    // Golden for the rest of the fight
    world.player.golden = true;
    world.player.golden_until = None;
    let at = world.player.pos;
    world.burst(at, ParticleColor::Golden, 50);

    let camera_y = world.camera_y;
    world.platforms.retain(|p| p.pos.y > camera_y);
    let id = world.next_entity_id();
    world.platforms.push(Platform::floor(
        id,
        camera_y + GAME_HEIGHT - ARENA_FLOOR_OFFSET,
        true,
    ));

    world.emit(GameEvent::PowerUp);
    world.emit(GameEvent::BossSpawned);
    log::info!("Boss spawned at level {}", world.level);
    true
}

/// Step 3: boss movement, volleys and contact with the player
pub fn update_boss(world: &mut World, now: f64) {
    let camera_y = world.camera_y;
    let Some(boss) = world.boss.as_mut().filter(|b| b.is_active()) else {
        return;
    };

    boss.invulnerable_frames = boss.invulnerable_frames.saturating_sub(1);

    boss.pos.x += boss.speed;
    if boss.pos.x < 0.0 || boss.pos.x + boss.size.x > GAME_WIDTH {
        boss.speed = -boss.speed;
    }

    // Per-frame damping toward a hover point that moves with the camera
    let target_y = camera_y + HOVER_OFFSET;
    boss.pos.y += (target_y - boss.pos.y) * FOLLOW_RATE;

    if boss.attack_frames > 0 {
        boss.attack_frames -= 1;
    } else {
        let origin = boss.center();
        boss.attack_frames = BOSS_ATTACK_INTERVAL;
        world.projectiles.extend(VOLLEY.iter().map(|&vel| Projectile {
            pos: origin,
            size: PROJECTILE_SIZE,
            vel,
            kind: ProjectileKind::BossRay,
            active: true,
        }));
    }

    resolve_contact(world, now);
}

fn resolve_contact(world: &mut World, now: f64) {
    let Some(boss) = world.boss.as_mut() else {
        return;
    };
    let boss_rect = boss.rect().inset(HITBOX_PADDING);
    let player = &mut world.player;
    if !player.rect().overlaps(&boss_rect) {
        return;
    }

    let headbutt = player.is_falling()
        && player.bottom() < boss.pos.y + boss.size.y * HEADBUTT_DEPTH
        && !boss.is_invulnerable();

    if headbutt {
        boss.hp = boss.hp.saturating_sub(1);
        boss.invulnerable_frames = BOSS_HIT_INVULNERABILITY;
        player.vel.y = GOLDEN_JUMP_FORCE * 0.8;
        let center = boss.center();
        let defeated = boss.hp == 0;
        if defeated {
            boss.phase = BossPhase::Defeated;
        }

        world.emit(GameEvent::BossHit);
        world.burst(center, ParticleColor::Enemy, 20);
        if defeated {
            world.burst(center, ParticleColor::White, 50);
            world.emit(GameEvent::BossDefeated);
            log::info!("Boss defeated");
        }
    } else if !boss.is_invulnerable() {
        let from_x = boss.pos.x;
        let knockback = Knockback::Away {
            from_x,
            up: JUMP_FORCE,
            side: CONTACT_KNOCKBACK,
        };
        if damage_player(world, now, knockback) {
            let at = world.player.pos;
            world.burst(at, ParticleColor::Enemy, 10);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;

    fn arena() -> World {
        let mut world = World::new(1);
        world.phase = GamePhase::Playing;
        world.camera_y = -20_000.0;
        world.level = MAX_LEVEL;
        world.player.pos = Vec2::new(0.0, world.camera_y + 600.0);
        world.player.vel = Vec2::ZERO;
        world
    }

    /// Park the boss in front of the player so the next update overlaps
    fn boss_over_player(world: &mut World, hp: u8) {
        spawn_boss(world);
        let boss = world.boss.as_mut().unwrap();
        boss.hp = hp;
        boss.speed = 0.0;
        boss.pos = Vec2::new(100.0, world.camera_y + HOVER_OFFSET);
    }

    #[test]
    fn test_spawn_sets_up_arena() {
        let mut world = arena();
        world.platforms.push(Platform::floor(1, world.camera_y - 10.0, false));
        world.platforms.push(Platform::floor(2, world.camera_y + 400.0, false));

        assert!(spawn_boss(&mut world));
        let boss = world.boss.as_ref().unwrap();
        assert_eq!(boss.hp, BOSS_HP);
        assert_eq!(boss.pos.y, world.camera_y - SPAWN_ABOVE_CAMERA);
        assert!(world.player.golden);
        assert_eq!(world.player.golden_until, None);

        let ids: Vec<u32> = world.platforms.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], 2);
        assert!(world.platforms[1].permanent);
        assert!(world.events.contains(&GameEvent::BossSpawned));
    }

    #[test]
    fn test_spawn_only_once() {
        let mut world = arena();
        assert!(spawn_boss(&mut world));
        assert!(!spawn_boss(&mut world));
        world.boss.as_mut().unwrap().phase = BossPhase::Defeated;
        assert!(!spawn_boss(&mut world));
    }

    #[test]
    fn test_eases_toward_hover_point() {
        let mut world = arena();
        spawn_boss(&mut world);
        let start = world.boss.as_ref().unwrap().pos.y;
        update_boss(&mut world, 0.0);
        let after = world.boss.as_ref().unwrap().pos.y;
        let target = world.camera_y + HOVER_OFFSET;
        assert!((after - (start + (target - start) * FOLLOW_RATE)).abs() < 1e-3);
    }

    #[test]
    fn test_volley_after_countdown() {
        let mut world = arena();
        spawn_boss(&mut world);
        for _ in 0..BOSS_FIRST_ATTACK {
            update_boss(&mut world, 0.0);
        }
        assert!(world.projectiles.is_empty());
        update_boss(&mut world, 0.0);
        assert_eq!(world.projectiles.len(), 3);
        let vels: Vec<Vec2> = world.projectiles.iter().map(|p| p.vel).collect();
        assert_eq!(vels, VOLLEY.to_vec());
        assert_eq!(world.boss.as_ref().unwrap().attack_frames, BOSS_ATTACK_INTERVAL);
    }

    #[test]
    fn test_patrol_bounces() {
        let mut world = arena();
        spawn_boss(&mut world);
        let boss = world.boss.as_mut().unwrap();
        boss.pos.x = GAME_WIDTH - BOSS_SIZE.x;
        update_boss(&mut world, 0.0);
        assert_eq!(world.boss.as_ref().unwrap().speed, -BOSS_SPEED);
    }

    #[test]
    fn test_final_headbutt_defeats() {
        let mut world = arena();
        boss_over_player(&mut world, 1);
        let boss_y = world.boss.as_ref().unwrap().pos.y;
        world.player.pos = Vec2::new(110.0, boss_y + 20.0 - PLAYER_SIZE.y);
        world.player.vel.y = 3.0;

        update_boss(&mut world, 0.0);
        let boss = world.boss.as_ref().unwrap();
        assert_eq!(boss.hp, 0);
        assert!(!boss.is_active());
        assert_eq!(world.player.vel.y, GOLDEN_JUMP_FORCE * 0.8);
        assert!(world.events.contains(&GameEvent::BossDefeated));
    }

    #[test]
    fn test_invulnerable_boss_ignores_headbutt() {
        let mut world = arena();
        boss_over_player(&mut world, 3);
        world.boss.as_mut().unwrap().invulnerable_frames = 10;
        let boss_y = world.boss.as_ref().unwrap().pos.y;
        world.player.pos = Vec2::new(110.0, boss_y + 20.0 - PLAYER_SIZE.y);
        world.player.vel.y = 3.0;
        let lives = world.player.lives;

        update_boss(&mut world, 0.0);
        assert_eq!(world.boss.as_ref().unwrap().hp, 3);
        assert_eq!(world.player.lives, lives);
    }

    #[test]
    fn test_body_contact_hurts_and_pushes_away() {
        let mut world = arena();
        boss_over_player(&mut world, 3);
        let boss = world.boss.as_ref().unwrap();
        // Level with the boss, rising: not a headbutt
        world.player.pos = Vec2::new(80.0, boss.pos.y + 40.0);
        world.player.vel.y = -2.0;

        update_boss(&mut world, 0.0);
        assert_eq!(world.player.lives, INITIAL_LIVES - 1);
        assert_eq!(world.player.vel, Vec2::new(-CONTACT_KNOCKBACK, JUMP_FORCE));
        assert_eq!(world.boss.as_ref().unwrap().hp, 3);
    }

    #[test]
    fn test_defeated_boss_is_inert() {
        let mut world = arena();
        spawn_boss(&mut world);
        world.boss.as_mut().unwrap().phase = BossPhase::Defeated;
        let before = world.boss.as_ref().unwrap().pos;
        for _ in 0..300 {
            update_boss(&mut world, 0.0);
        }
        assert_eq!(world.boss.as_ref().unwrap().pos, before);
        assert!(world.projectiles.is_empty());
    }
}
