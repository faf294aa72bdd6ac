//! Fixed-order frame update
//!
//! One call advances the world by exactly one simulation frame. The step
//! order is significant: items are collected after landing (a landing can
//! carry the player into an item) and before any damage is resolved.

use glam::Vec2;

use super::boss::update_boss;
use super::collision::{check_fall, collect_items, land_on_platforms, update_enemies, update_projectiles};
use super::generator::{collect_garbage, move_platforms, spawn_ahead};
use super::physics::{Intent, integrate_player};
use super::progression::{follow_camera, update_progress};
use super::rng::RandomSource;
use super::state::{GameEvent, GamePhase, ParticleColor, World};

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Polled horizontal intent
    pub intent: Intent,
    /// Wall-clock time in milliseconds; timed effects expire against it
    pub now_ms: f64,
}

/// Advance the world by one frame
///
/// Does nothing unless the run is in `Playing`. Stops early on the frame the
/// run ends.
pub fn tick(world: &mut World, input: &TickInput, rng: &mut dyn RandomSource) {
    if world.phase != GamePhase::Playing {
        return;
    }
    let now = input.now_ms;
    world.frame += 1;

    expire_golden(world, now);
    integrate_player(&mut world.player, input.intent);
    land_on_platforms(world);
    collect_items(world, now);

    update_boss(world, now);
    if world.phase != GamePhase::Playing {
        return;
    }
    update_projectiles(world, now);
    if world.phase != GamePhase::Playing {
        return;
    }
    update_enemies(world, now);
    if world.phase != GamePhase::Playing {
        return;
    }

    follow_camera(world);
    update_progress(world);
    spawn_ahead(world, rng);
    collect_garbage(world);
    move_platforms(world);

    check_fall(world, now);

    world.update_particles();
    world.update_clouds();
}

/// Golden mode ends once its expiry passes, except during the boss fight
fn expire_golden(world: &mut World, now: f64) {
    if world.boss.is_some() {
        return;
    }
    let player = &mut world.player;
    let Some(until) = player.golden_until.filter(|_| player.golden) else {
        return;
    };
    if now > until {
        player.golden = false;
        player.golden_until = None;
        let at = Vec2::new(player.center_x(), player.pos.y);
        world.emit(GameEvent::PowerDown);
        world.burst(at, ParticleColor::White, 10);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::rng::SeededRng;
    use crate::sim::state::{Enemy, Item, ItemKind, Platform, PlatformKind};
    use proptest::prelude::*;

    fn started(seed: u64) -> (World, SeededRng) {
        let mut rng = SeededRng::new(seed);
        let mut world = World::new(seed);
        world.begin_run(&mut rng);
        (world, rng)
    }

    fn frame(ms: f64) -> TickInput {
        TickInput {
            intent: Intent::None,
            now_ms: ms,
        }
    }

    #[test]
    fn test_idle_world_does_not_tick() {
        let mut world = World::new(1);
        let mut rng = SeededRng::new(1);
        tick(&mut world, &frame(0.0), &mut rng);
        assert_eq!(world.frame, 0);
        assert_eq!(world.phase, GamePhase::Start);
    }

    #[test]
    fn test_run_climbs_and_generates() {
        let (mut world, mut rng) = started(12345);
        let start_y = world.player.pos.y;
        for i in 0..30 {
            tick(&mut world, &frame(i as f64 * SIM_DT_MS), &mut rng);
        }
        assert!(world.player.pos.y < start_y);
        let top = world.highest_platform_y().unwrap();
        assert!(top <= world.camera_y - 100.0);
    }

    #[test]
    fn test_golden_expires_with_power_down() {
        let (mut world, mut rng) = started(3);
        world.player.golden = true;
        world.player.golden_until = Some(1000.0);

        tick(&mut world, &frame(999.0), &mut rng);
        assert!(world.player.golden);

        tick(&mut world, &frame(1001.0), &mut rng);
        assert!(!world.player.golden);
        assert!(world.drain_events().contains(&GameEvent::PowerDown));
    }

    #[test]
    fn test_boss_golden_never_expires() {
        let (mut world, mut rng) = started(3);
        world.player.golden = true;
        world.player.golden_until = Some(0.0);
        world.camera_y = -100.0;
        crate::sim::boss::spawn_boss(&mut world);
        world.player.golden_until = Some(0.0);

        tick(&mut world, &frame(1_000_000.0), &mut rng);
        assert!(world.player.golden);
    }

    #[test]
    fn test_landing_reaches_item_same_frame() {
        let (mut world, mut rng) = started(8);
        world.platforms.clear();
        world.platforms.push(Platform {
            id: 500,
            pos: Vec2::new(100.0, 300.0),
            size: PLATFORM_SIZE,
            kind: PlatformKind::Normal,
            active: true,
            speed: 0.0,
            permanent: false,
        });
        // Snapped onto the platform the player overlaps this item
        world.items.push(Item {
            id: 501,
            pos: Vec2::new(110.0, 270.0),
            size: ITEM_SIZE,
            kind: ItemKind::HealthPickup,
            active: true,
        });
        world.player.lives = 2;
        world.player.pos = Vec2::new(110.0, 300.0 - PLAYER_SIZE.y - 2.0);
        world.player.vel = Vec2::new(0.0, 3.0);

        tick(&mut world, &frame(0.0), &mut rng);
        assert_eq!(world.player.lives, 3);
        assert_eq!(world.player.vel.y, JUMP_FORCE);
    }

    #[test]
    fn test_game_over_stops_frame() {
        let (mut world, mut rng) = started(4);
        world.player.lives = 1;
        world.player.pos = Vec2::new(100.0, 100.0);
        world.player.vel = Vec2::new(0.0, -1.0);
        world.enemies.push(Enemy {
            id: 77,
            pos: Vec2::new(100.0, 95.0),
            size: ENEMY_SIZE,
            speed: 0.0,
            range: 50.0,
            origin_x: 100.0,
            active: true,
        });
        let frame_before = world.frame;
        tick(&mut world, &frame(0.0), &mut rng);
        assert_eq!(world.phase, GamePhase::GameOver);
        assert_eq!(world.player.lives, 0);

        tick(&mut world, &frame(16.0), &mut rng);
        assert_eq!(world.frame, frame_before + 1);
    }

    #[test]
    fn test_determinism() {
        let (mut a, mut rng_a) = started(99_999);
        let (mut b, mut rng_b) = started(99_999);
        let intents = [Intent::Left, Intent::None, Intent::Right, Intent::Right];
        for i in 0..400 {
            let input = TickInput {
                intent: intents[i % intents.len()],
                now_ms: i as f64 * SIM_DT_MS,
            };
            tick(&mut a, &input, &mut rng_a);
            tick(&mut b, &input, &mut rng_b);
        }
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.score, b.score);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.platforms.len(), b.platforms.len());
    }

    fn intent_strategy() -> impl Strategy<Value = Intent> {
        prop_oneof![Just(Intent::Left), Just(Intent::None), Just(Intent::Right)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_run_invariants(
            seed in any::<u64>(),
            intents in prop::collection::vec(intent_strategy(), 1..600),
        ) {
            let (mut world, mut rng) = started(seed);
            let mut last_score = 0;
            let mut last_camera = world.camera_y;
            for (i, intent) in intents.into_iter().enumerate() {
                let input = TickInput { intent, now_ms: i as f64 * SIM_DT_MS };
                tick(&mut world, &input, &mut rng);

                prop_assert!(world.player.lives <= MAX_LIVES);
                prop_assert_eq!(world.player.lives == 0, world.phase == GamePhase::GameOver);
                prop_assert!(world.score >= last_score);
                prop_assert_eq!(world.level, world.score / LEVEL_HEIGHT_THRESHOLD + 1);
                prop_assert!(world.camera_y <= last_camera);
                last_score = world.score;
                last_camera = world.camera_y;
            }
        }
    }
}
