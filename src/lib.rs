//! Capi Jump - a vertical endless jumper
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, generation, collisions, boss)
//! - `session`: Owns a run and wires the simulation to its collaborators
//! - `platform`: Input state and real-time timers
//! - `audio`: Chiptune sequencer and sound effects
//! - `renderer`: Draw list construction and the canvas backend

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use session::{HudSnapshot, Session};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// Velocities and accelerations are per simulation frame (60 Hz); the world
/// uses screen coordinates, so "up" is negative y.
pub mod consts {
    use glam::Vec2;

    /// Simulation frames per second
    pub const SIM_HZ: f64 = 60.0;
    /// Fixed simulation timestep in milliseconds
    pub const SIM_DT_MS: f64 = 1000.0 / SIM_HZ;
    /// Maximum substeps per display refresh to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Virtual resolution
    pub const GAME_WIDTH: f32 = 400.0;
    pub const GAME_HEIGHT: f32 = 800.0;

    pub const GRAVITY: f32 = 0.35;
    pub const JUMP_FORCE: f32 = -13.0;
    pub const BOOST_FORCE: f32 = -22.0;
    pub const GOLDEN_JUMP_FORCE: f32 = -24.0;
    pub const GOLDEN_DURATION_MS: f64 = 30_000.0;

    /// Maximum horizontal speed
    pub const MOVE_SPEED: f32 = 6.0;
    /// Horizontal acceleration per frame of held input
    pub const MOVE_ACCEL: f32 = 0.8;
    /// Horizontal velocity multiplier applied every frame
    pub const FRICTION: f32 = 0.85;

    /// Art grid; platform positions snap to it
    pub const PIXEL_SCALE: f32 = 4.0;

    pub const PLAYER_SIZE: Vec2 = Vec2::new(40.0, 40.0);
    pub const PLATFORM_SIZE: Vec2 = Vec2::new(72.0, 16.0);
    pub const ENEMY_SIZE: Vec2 = Vec2::new(32.0, 32.0);
    pub const ITEM_SIZE: Vec2 = Vec2::new(24.0, 24.0);
    pub const BOSS_SIZE: Vec2 = Vec2::new(80.0, 100.0);
    pub const PROJECTILE_SIZE: Vec2 = Vec2::new(16.0, 20.0);

    pub const LEVEL_HEIGHT_THRESHOLD: u32 = 200;
    pub const MAX_LEVEL: u32 = 100;

    pub const MAX_LIVES: u8 = 5;
    pub const INITIAL_LIVES: u8 = 3;
    /// Damage immunity after a hit
    pub const INVULNERABILITY_MS: f64 = 1500.0;

    pub const BOSS_HP: u8 = 5;
    pub const BOSS_SPEED: f32 = 4.0;
    /// Frames before the first volley
    pub const BOSS_FIRST_ATTACK: u32 = 100;
    /// Frames between volleys
    pub const BOSS_ATTACK_INTERVAL: u32 = 180;
    /// Frames of boss immunity after a headbutt
    pub const BOSS_HIT_INVULNERABILITY: u32 = 40;
    /// Real-time delay between boss defeat and the win screen
    pub const WIN_DELAY_MS: f64 = 1000.0;

    /// HUD sampling period
    pub const HUD_SAMPLE_MS: f64 = 100.0;
}
