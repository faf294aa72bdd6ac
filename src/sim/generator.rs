//! Procedural level generation
//!
//! Platforms, enemies and items are only ever placed above the current
//! top-most platform, so the level grows upward ahead of the camera and
//! nothing needs overlap checks. Everything that scrolls far enough below the
//! viewport is collected.

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{Enemy, Item, ItemKind, Platform, PlatformKind, World};
use crate::consts::*;

/// Generate while the top platform is within this distance of the camera top
const GENERATION_LEAD: f32 = 100.0;
/// Vertical gap between consecutive platforms
const MIN_GAP: f32 = 65.0;
const MAX_GAP: f32 = 110.0;
/// Entities this far below the viewport are dropped
const COLLECT_MARGIN: f32 = 100.0;

/// Roll thresholds for platform variants
const BOOST_ROLL: f32 = 0.95;
const BREAKABLE_ROLL: f32 = 0.80;
const MOVING_ROLL: f32 = 0.70;
const BREAKABLE_MIN_LEVEL: u32 = 5;
const MOVING_MIN_LEVEL: u32 = 2;
const MOVING_PLATFORM_SPEED: f32 = 2.0;

/// Enemies only appear past this level
const ENEMY_MIN_LEVEL: u32 = 2;
const ENEMY_CHANCE: f32 = 0.2;
/// Chance on every fifth level
const SWARM_ENEMY_CHANCE: f32 = 0.6;
const SWARM_LEVEL_PERIOD: u32 = 5;

const GOLDEN_ROLL: f32 = 0.994;
const HEALTH_ROLL: f32 = 0.985;

/// Snap to the art grid
fn snap(v: f32) -> f32 {
    (v / PIXEL_SCALE).floor() * PIXEL_SCALE
}

/// Pick a platform variant for a uniform `roll`, gated by level
pub fn platform_kind_for(roll: f32, level: u32) -> PlatformKind {
    if roll > BOOST_ROLL {
        PlatformKind::Boost
    } else if roll > BREAKABLE_ROLL && level > BREAKABLE_MIN_LEVEL {
        PlatformKind::Breakable
    } else if roll > MOVING_ROLL && level > MOVING_MIN_LEVEL {
        PlatformKind::Moving
    } else {
        PlatformKind::Normal
    }
}

/// Build a platform at height `y`
pub fn generate_platform(id: u32, y: f32, level: u32, rng: &mut dyn RandomSource) -> Platform {
    let width = rng.range(PLATFORM_SIZE.x, PLATFORM_SIZE.x * 1.5);
    let x = rng.next_f32() * (GAME_WIDTH - width);
    let kind = platform_kind_for(rng.next_f32(), level);
    let speed = if kind == PlatformKind::Moving {
        if rng.coin() {
            MOVING_PLATFORM_SPEED
        } else {
            -MOVING_PLATFORM_SPEED
        }
    } else {
        0.0
    };

    Platform {
        id,
        pos: Vec2::new(snap(x), snap(y)),
        size: Vec2::new(width, PLATFORM_SIZE.y),
        kind,
        active: true,
        speed,
        permanent: false,
    }
}

/// Build a patrolling enemy at height `y`
pub fn generate_enemy(id: u32, y: f32, rng: &mut dyn RandomSource) -> Enemy {
    let x = rng.next_f32() * (GAME_WIDTH - ENEMY_SIZE.x);
    let speed = rng.range(2.0, 4.0);
    let range = rng.range(100.0, 200.0);
    Enemy {
        id,
        pos: Vec2::new(x, y),
        size: ENEMY_SIZE,
        speed,
        range,
        origin_x: x,
        active: true,
    }
}

/// Item kind for a uniform `roll`, if any
pub fn item_kind_for(roll: f32) -> Option<ItemKind> {
    if roll > GOLDEN_ROLL {
        Some(ItemKind::GoldenPowerup)
    } else if roll > HEALTH_ROLL {
        Some(ItemKind::HealthPickup)
    } else {
        None
    }
}

/// Extend the level upward until it leads the camera again
///
/// Does nothing once the boss level is reached. Returns how many platforms
/// were added.
pub fn spawn_ahead(world: &mut World, rng: &mut dyn RandomSource) -> usize {
    if world.level >= MAX_LEVEL || world.boss.is_some() {
        return 0;
    }

    let mut spawned = 0;
    let mut highest = world.highest_platform_y().unwrap_or(0.0);
    while highest > world.camera_y - GENERATION_LEAD {
        let new_y = highest - rng.range(MIN_GAP, MAX_GAP);
        let id = world.next_entity_id();
        let platform = generate_platform(id, new_y, world.level, rng);
        // Grid snapping floors, so the snapped top is never below new_y
        highest = platform.pos.y;
        world.platforms.push(platform);
        spawned += 1;

        spawn_enemies(world, new_y, rng);
        spawn_item(world, new_y, rng);
    }
    spawned
}

fn spawn_enemies(world: &mut World, platform_y: f32, rng: &mut dyn RandomSource) {
    if world.level <= ENEMY_MIN_LEVEL {
        return;
    }
    let swarm_level = world.level % SWARM_LEVEL_PERIOD == 0;
    let chance = if swarm_level {
        SWARM_ENEMY_CHANCE
    } else {
        ENEMY_CHANCE
    };
    if rng.next_f32() >= chance {
        return;
    }

    let id = world.next_entity_id();
    world.enemies.push(generate_enemy(id, platform_y - 50.0, rng));
    if swarm_level && rng.coin() {
        let id = world.next_entity_id();
        world.enemies.push(generate_enemy(id, platform_y - 150.0, rng));
    }
}

fn spawn_item(world: &mut World, platform_y: f32, rng: &mut dyn RandomSource) {
    if world.player.golden {
        return;
    }
    let Some(kind) = item_kind_for(rng.next_f32()) else {
        return;
    };
    let x = rng.next_f32() * (GAME_WIDTH - ITEM_SIZE.x);
    let id = world.next_entity_id();
    world.items.push(Item {
        id,
        pos: Vec2::new(x, platform_y - 60.0),
        size: ITEM_SIZE,
        kind,
        active: true,
    });
}

/// Drop everything that scrolled out below the viewport, plus consumed
/// enemies and items
pub fn collect_garbage(world: &mut World) {
    let limit = world.camera_bottom() + COLLECT_MARGIN;
    world
        .platforms
        .retain(|p| p.permanent || p.pos.y < limit);
    world.enemies.retain(|e| e.active && e.pos.y < limit);
    world.items.retain(|i| i.active && i.pos.y < limit);
}

/// Slide moving platforms, bouncing at the screen edges
pub fn move_platforms(world: &mut World) {
    for platform in world
        .platforms
        .iter_mut()
        .filter(|p| p.kind == PlatformKind::Moving && p.speed != 0.0)
    {
        platform.pos.x += platform.speed;
        if platform.pos.x < 0.0 || platform.pos.x + platform.size.x > GAME_WIDTH {
            platform.speed = -platform.speed;
        }
    }
}
