//! Player integration: horizontal input, friction, wrap-around and gravity

use super::state::{Motion, Player};
use crate::consts::*;

/// Horizontal intent polled from the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    Left,
    #[default]
    None,
    Right,
}

impl Intent {
    /// -1, 0 or 1
    pub fn axis(self) -> f32 {
        match self {
            Intent::Left => -1.0,
            Intent::None => 0.0,
            Intent::Right => 1.0,
        }
    }

    pub fn from_axis(axis: i8) -> Self {
        match axis.signum() {
            -1 => Intent::Left,
            1 => Intent::Right,
            _ => Intent::None,
        }
    }
}

/// Advance the player by one frame
pub fn integrate_player(player: &mut Player, intent: Intent) {
    if intent != Intent::None {
        player.vel.x += intent.axis() * MOVE_ACCEL;
        player.facing_right = intent == Intent::Right;
        player.has_moved = true;
    }

    player.vel.x = (player.vel.x * FRICTION).clamp(-MOVE_SPEED, MOVE_SPEED);
    player.pos.x += player.vel.x;

    // Leaving fully through one side re-enters from the other
    if player.pos.x + player.size.x < 0.0 {
        player.pos.x = GAME_WIDTH;
    } else if player.pos.x > GAME_WIDTH {
        player.pos.x = -player.size.x;
    }

    player.vel.y += GRAVITY;
    player.pos.y += player.vel.y;
    player.motion = if player.vel.y < 0.0 {
        Motion::Rising
    } else {
        Motion::Falling
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn resting_player() -> Player {
        let mut player = Player::spawn();
        player.vel = Vec2::ZERO;
        player.pos = Vec2::new(100.0, 100.0);
        player
    }

    #[test]
    fn test_gravity_accumulates() {
        let mut player = resting_player();
        integrate_player(&mut player, Intent::None);
        assert_eq!(player.vel.y, GRAVITY);
        integrate_player(&mut player, Intent::None);
        assert!((player.vel.y - 2.0 * GRAVITY).abs() < 1e-6);
        assert_eq!(player.motion, Motion::Falling);
    }

    #[test]
    fn test_rising_while_moving_up() {
        let mut player = resting_player();
        player.vel.y = JUMP_FORCE;
        integrate_player(&mut player, Intent::None);
        assert_eq!(player.motion, Motion::Rising);
        assert!(player.pos.y < 100.0);
    }

    #[test]
    fn test_input_accelerates_and_faces() {
        let mut player = resting_player();
        integrate_player(&mut player, Intent::Left);
        assert!(player.vel.x < 0.0);
        assert!(!player.facing_right);
        assert!(player.has_moved);
        assert!((player.vel.x + MOVE_ACCEL * FRICTION).abs() < 1e-6);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut player = resting_player();
        for _ in 0..200 {
            integrate_player(&mut player, Intent::Right);
            assert!(player.vel.x <= MOVE_SPEED);
        }
    }

    #[test]
    fn test_friction_stops_drift() {
        let mut player = resting_player();
        player.vel.x = MOVE_SPEED;
        for _ in 0..120 {
            integrate_player(&mut player, Intent::None);
        }
        assert!(player.vel.x.abs() < 0.01);
        assert!(!player.has_moved);
    }

    #[test]
    fn test_wraps_horizontally() {
        let mut player = resting_player();
        player.pos.x = -player.size.x - 1.0;
        integrate_player(&mut player, Intent::None);
        assert_eq!(player.pos.x, GAME_WIDTH);

        player.pos.x = GAME_WIDTH + 1.0;
        integrate_player(&mut player, Intent::None);
        assert_eq!(player.pos.x, -player.size.x);
    }

    #[test]
    fn test_intent_from_axis() {
        assert_eq!(Intent::from_axis(-3), Intent::Left);
        assert_eq!(Intent::from_axis(0), Intent::None);
        assert_eq!(Intent::from_axis(1), Intent::Right);
    }
}
