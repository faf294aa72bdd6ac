//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - One call to [`tick`] is one frame
//! - Level generation draws only from the injected [`RandomSource`]
//! - Time-based effects compare against the caller's clock, never a global one

pub mod boss;
pub mod collision;
pub mod generator;
pub mod physics;
pub mod progression;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::{Knockback, Rect, damage_player};
pub use physics::Intent;
pub use progression::level_for_score;
pub use rng::{RandomSource, ScriptedRng, SeededRng};
pub use state::{
    Boss, BossPhase, Cloud, Enemy, GameEvent, GamePhase, Item, ItemKind, Motion, Particle,
    ParticleColor, Platform, PlatformKind, Player, Projectile, ProjectileKind, World,
};
pub use tick::{TickInput, tick};
