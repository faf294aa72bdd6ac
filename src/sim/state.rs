//! Game state and core simulation types
//!
//! `World` is the single aggregate the frame orchestrator mutates. Renderers
//! and the HUD only ever read it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::generator::generate_platform;
use super::rng::RandomSource;
use crate::consts::*;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the activate event
    Start,
    /// Active gameplay
    Playing,
    /// Out of lives
    GameOver,
    /// Boss defeated
    Win,
}

/// Vertical movement state (drives the sprite pose)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Motion {
    #[default]
    Idle,
    Rising,
    Falling,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub facing_right: bool,
    pub motion: Motion,
    pub golden: bool,
    /// Absolute expiry of golden mode; `None` while golden means no expiry
    pub golden_until: Option<f64>,
    pub lives: u8,
    /// Absolute end of damage immunity
    pub invulnerable_until: f64,
    /// Set once any horizontal input or landing happened (pose only)
    pub has_moved: bool,
}

impl Player {
    /// Player at the start of a run, already jumping
    pub fn spawn() -> Self {
        Self {
            pos: Vec2::new(GAME_WIDTH / 2.0 - PLAYER_SIZE.x / 2.0, GAME_HEIGHT - 200.0),
            vel: Vec2::new(0.0, JUMP_FORCE),
            size: PLAYER_SIZE,
            facing_right: true,
            motion: Motion::Rising,
            golden: false,
            golden_until: None,
            lives: INITIAL_LIVES,
            invulnerable_until: 0.0,
            has_moved: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    pub fn is_falling(&self) -> bool {
        self.vel.y > 0.0
    }

    pub fn is_invulnerable(&self, now: f64) -> bool {
        now < self.invulnerable_until
    }
}

/// Platform variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Normal,
    /// Patrols horizontally between the screen edges
    Moving,
    /// Consumed by the first landing
    Breakable,
    /// Stronger jump
    Boost,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PlatformKind,
    pub active: bool,
    /// Signed horizontal speed (Moving only, zero otherwise)
    pub speed: f32,
    /// Exempt from off-screen collection (boss arena floor)
    pub permanent: bool,
}

impl Platform {
    /// Full-width floor (run start and boss arena)
    pub fn floor(id: u32, y: f32, permanent: bool) -> Self {
        Self {
            id,
            pos: Vec2::new(0.0, y),
            size: Vec2::new(GAME_WIDTH, 20.0),
            kind: PlatformKind::Normal,
            active: true,
            speed: 0.0,
            permanent,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Signed patrol speed
    pub speed: f32,
    pub range: f32,
    pub origin_x: f32,
    /// Cleared when stomped or rammed; compacted away by garbage collection
    pub active: bool,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    GoldenPowerup,
    HealthPickup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ItemKind,
    pub active: bool,
}

impl Item {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    BossRay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub kind: ProjectileKind,
    pub active: bool,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Boss lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    Active,
    /// Terminal for the run
    Defeated,
}

/// The end-game boss. Absent (`World::boss == None`) until the final level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: u8,
    pub max_hp: u8,
    /// Signed horizontal speed
    pub speed: f32,
    pub phase: BossPhase,
    /// Frames of immunity left after a headbutt
    pub invulnerable_frames: u32,
    /// Frames until the next volley
    pub attack_frames: u32,
}

impl Boss {
    pub fn is_active(&self) -> bool {
        self.phase == BossPhase::Active
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_frames > 0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Palette slot for particles (resolved to a color by the renderer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Grass,
    Boost,
    Debris,
    Golden,
    Carrot,
    Enemy,
    White,
}

/// A particle for visual effects (never collides)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: ParticleColor,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Background decoration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub speed: f32,
    pub wide: bool,
}

/// Default particle cap
pub const MAX_PARTICLES: usize = 256;
/// Number of background clouds
pub const CLOUD_COUNT: usize = 10;

/// Something the collaborators (audio, scheduler, logging) must react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Landed on a platform or stomped an enemy
    Jumped,
    /// Golden power-up collected (or forced on by the boss)
    PowerUp,
    LifeUp,
    Hurt,
    PowerDown,
    LevelUp(u32),
    BossSpawned,
    BossHit,
    /// Boss hp reached zero; the win follows after a real-time delay
    BossDefeated,
    GameOver,
}

/// Complete simulation state of one run
#[derive(Debug, Clone)]
pub struct World {
    pub phase: GamePhase,
    pub player: Player,
    /// In generation order; landing honours the first match
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub items: Vec<Item>,
    pub projectiles: Vec<Projectile>,
    /// At most one per run
    pub boss: Option<Boss>,
    pub particles: Vec<Particle>,
    pub clouds: Vec<Cloud>,
    /// Top of the viewport in world space; never increases during a run
    pub camera_y: f32,
    /// Furthest height reached
    pub score: u32,
    pub level: u32,
    /// Simulation frame counter
    pub frame: u64,
    pub max_particles: usize,
    /// Events raised since the owner last drained them
    pub events: Vec<GameEvent>,
    /// Decorative randomness (particles, clouds); never feeds generation
    fx_rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Empty world on the title screen
    pub fn new(fx_seed: u64) -> Self {
        Self {
            phase: GamePhase::Start,
            player: Player::spawn(),
            platforms: Vec::new(),
            enemies: Vec::new(),
            items: Vec::new(),
            projectiles: Vec::new(),
            boss: None,
            particles: Vec::new(),
            clouds: Vec::new(),
            camera_y: 0.0,
            score: 0,
            level: 1,
            frame: 0,
            max_particles: MAX_PARTICLES,
            events: Vec::new(),
            fx_rng: Pcg32::seed_from_u64(fx_seed),
            next_id: 1,
        }
    }

    /// Lay out a fresh run: starting floor, a column of platforms above it
    /// and the cloud layer. Leaves the world in `Playing`.
    pub fn begin_run(&mut self, rng: &mut dyn RandomSource) {
        let max_particles = self.max_particles;
        let fx_rng = self.fx_rng.clone();
        *self = Self {
            max_particles,
            fx_rng,
            ..Self::new(0)
        };

        let ground = Platform::floor(0, GAME_HEIGHT - 50.0, false);
        self.platforms.push(ground);
        for i in 1..10 {
            let y = GAME_HEIGHT - 50.0 - i as f32 * 120.0;
            let id = self.next_entity_id();
            self.platforms.push(generate_platform(id, y, self.level, rng));
        }

        for _ in 0..CLOUD_COUNT {
            let cloud = Cloud {
                pos: Vec2::new(
                    self.fx_rng.random::<f32>() * GAME_WIDTH,
                    self.fx_rng.random::<f32>() * GAME_HEIGHT,
                ),
                speed: 0.2 + self.fx_rng.random::<f32>() * 0.5,
                wide: self.fx_rng.random::<bool>(),
            };
            self.clouds.push(cloud);
        }

        self.phase = GamePhase::Playing;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Bottom edge of the viewport
    pub fn camera_bottom(&self) -> f32 {
        self.camera_y + GAME_HEIGHT
    }

    /// Top-most platform y (smallest), if any
    pub fn highest_platform_y(&self) -> Option<f32> {
        self.platforms.iter().map(|p| p.pos.y).reduce(f32::min)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Emit a burst of `count` particles at `at`
    pub fn burst(&mut self, at: Vec2, color: ParticleColor, count: usize) {
        for _ in 0..count {
            if self.particles.len() >= self.max_particles {
                break;
            }
            let vel = Vec2::new(
                (self.fx_rng.random::<f32>() - 0.5) * 8.0,
                (self.fx_rng.random::<f32>() - 0.5) * 8.0,
            );
            let size = self.fx_rng.random::<f32>() * 6.0 + 4.0;
            self.particles.push(Particle {
                pos: at,
                vel,
                color,
                life: 1.0,
                size,
            });
        }
    }

    /// Advance particles and drop the expired ones
    pub fn update_particles(&mut self) {
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.life -= 0.05;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    /// Drift clouds downward, recycling them above the viewport
    pub fn update_clouds(&mut self) {
        let recycle_below = self.camera_bottom() + 100.0;
        let respawn_y = self.camera_y - 100.0;
        for cloud in &mut self.clouds {
            cloud.pos.y += cloud.speed;
            if cloud.pos.y > recycle_below {
                cloud.pos.y = respawn_y;
                cloud.pos.x = self.fx_rng.random::<f32>() * GAME_WIDTH;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::SeededRng;

    #[test]
    fn test_begin_run_layout() {
        let mut world = World::new(7);
        assert_eq!(world.phase, GamePhase::Start);

        world.begin_run(&mut SeededRng::new(1));
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.platforms.len(), 10);
        assert_eq!(world.platforms[0].size.x, GAME_WIDTH);
        assert_eq!(world.clouds.len(), CLOUD_COUNT);
        assert_eq!(world.player.lives, INITIAL_LIVES);
        assert_eq!(world.player.vel.y, JUMP_FORCE);
        assert_eq!(world.level, 1);
        assert!(world.boss.is_none());
    }

    #[test]
    fn test_begin_run_resets_previous_run() {
        let mut world = World::new(7);
        let mut rng = SeededRng::new(3);
        world.begin_run(&mut rng);
        world.score = 5000;
        world.player.lives = 0;
        world.camera_y = -4000.0;
        world.phase = GamePhase::GameOver;

        world.begin_run(&mut rng);
        assert_eq!(world.score, 0);
        assert_eq!(world.camera_y, 0.0);
        assert_eq!(world.player.lives, INITIAL_LIVES);
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_burst_respects_cap() {
        let mut world = World::new(1);
        world.max_particles = 5;
        world.burst(Vec2::ZERO, ParticleColor::White, 20);
        assert_eq!(world.particles.len(), 5);
    }

    #[test]
    fn test_particles_expire() {
        let mut world = World::new(1);
        world.burst(Vec2::ZERO, ParticleColor::Grass, 4);
        for _ in 0..25 {
            world.update_particles();
        }
        assert!(world.particles.is_empty());
    }

    #[test]
    fn test_clouds_drift_and_recycle_above_camera() {
        let mut world = World::new(7);
        world.camera_y = -1000.0;
        world.clouds = vec![
            Cloud {
                pos: Vec2::new(50.0, -500.0),
                speed: 0.5,
                wide: false,
            },
            Cloud {
                pos: Vec2::new(50.0, world.camera_bottom() + 100.0),
                speed: 0.5,
                wide: true,
            },
        ];

        world.update_clouds();
        assert_eq!(world.clouds[0].pos.y, -499.5);
        assert_eq!(world.clouds[1].pos.y, world.camera_y - 100.0);
        assert!((0.0..GAME_WIDTH).contains(&world.clouds[1].pos.x));
    }
}
