//! Score, level and the boss trigger

use super::boss::spawn_boss;
use super::state::{GameEvent, World};
use crate::consts::*;

/// Level for a given score
pub fn level_for_score(score: u32) -> u32 {
    score / LEVEL_HEIGHT_THRESHOLD + 1
}

/// Height reached by the player (world y above zero counts, below is 0)
pub fn height_of(y: f32) -> u32 {
    (-y).max(0.0).floor() as u32
}

/// Scroll the camera up to keep the player in the upper half of the view.
/// Never scrolls back down.
pub fn follow_camera(world: &mut World) {
    let target = world.player.pos.y - GAME_HEIGHT / 2.0;
    world.camera_y = world.camera_y.min(target);
}

/// Raise the score to the current height and re-derive the level
///
/// The first time the level reaches `MAX_LEVEL` the boss is spawned.
pub fn update_progress(world: &mut World) {
    let height = height_of(world.player.pos.y);
    if height <= world.score {
        return;
    }
    world.score = height;

    let level = level_for_score(world.score);
    if level == world.level {
        return;
    }
    world.level = level;
    world.emit(GameEvent::LevelUp(level));
    log::debug!("Level {} reached at height {}", level, height);

    if level >= MAX_LEVEL && world.boss.is_none() {
        spawn_boss(world);
    }
}
