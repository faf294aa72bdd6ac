//! Game session
//!
//! Owns one `World` plus every collaborator that reacts to it: the random
//! source, the real-time scheduler, the HUD sampler, the best-score table and
//! the audio device. It is the only writer of simulation state; the frame
//! loop in `main.rs` just forwards time and input.

use crate::audio::{Audio, MusicTrack, SoundEffect};
use crate::consts::*;
use crate::highscores::{HighScores, RunOutcome};
use crate::platform::{FixedTimestep, Interval, Scheduler};
use crate::renderer::{DrawCmd, SceneOptions, build_scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, Intent, SeededRng, TickInput, World, tick};

/// Real-time follow-ups owned by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionTask {
    /// Boss defeated a moment ago; show the win screen
    DeclareWin,
}

/// Read-only view for the HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u8,
    pub level: u32,
    /// Whole seconds of golden mode left; `None` when not timed
    pub golden_secs: Option<u32>,
    /// (hp, max hp) while the boss fight is on
    pub boss_hp: Option<(u8, u8)>,
    /// Best finished run of this session
    pub high_score: Option<u32>,
    pub music_on: bool,
}

/// One player's game from title screen to teardown
pub struct Session<A: Audio> {
    world: World,
    rng: SeededRng,
    fixed_seed: Option<u64>,
    scheduler: Scheduler<SessionTask>,
    hud_interval: Interval,
    timestep: FixedTimestep,
    high_scores: HighScores,
    audio: A,
    music_on: bool,
    reduced_motion: bool,
    runs: u32,
}

impl<A: Audio> Session<A> {
    pub fn new(settings: &Settings, audio: A) -> Self {
        let seed = settings.seed.unwrap_or(0);
        let mut world = World::new(seed);
        world.max_particles = settings.max_particles();

        Self {
            world,
            rng: SeededRng::new(seed),
            fixed_seed: settings.seed,
            scheduler: Scheduler::new(),
            hud_interval: Interval::new(HUD_SAMPLE_MS),
            timestep: FixedTimestep::new(SIM_DT_MS, MAX_SUBSTEPS),
            high_scores: HighScores::new(),
            audio,
            music_on: settings.music_enabled,
            reduced_motion: settings.reduced_motion,
            runs: 0,
        }
    }

    /// Start (or restart) a run. Ignored while a run is in progress.
    ///
    /// `seed` is used unless the settings pinned one.
    pub fn activate(&mut self, now_ms: f64, seed: u64) -> bool {
        if self.world.phase == GamePhase::Playing {
            return false;
        }

        let seed = self.fixed_seed.unwrap_or(seed);
        self.rng = SeededRng::new(seed);
        self.scheduler.cancel_all();
        self.timestep.reset();
        self.world.begin_run(&mut self.rng);
        self.runs += 1;

        self.audio.start_track(MusicTrack::Main);
        self.audio.play(SoundEffect::Jump);
        log::info!("Run {} started (seed {}) at {:.0}ms", self.runs, seed, now_ms);
        true
    }

    /// Advance to `now_ms`: fire due tasks, run whole simulation frames and
    /// route the events they raised.
    pub fn frame(&mut self, now_ms: f64, intent: Intent) {
        for task in self.scheduler.poll(now_ms) {
            match task {
                SessionTask::DeclareWin => self.declare_win(),
            }
        }

        let steps = self.timestep.advance(now_ms);
        let input = TickInput { intent, now_ms };
        for _ in 0..steps {
            if self.world.phase != GamePhase::Playing {
                break;
            }
            tick(&mut self.world, &input, &mut self.rng);
        }

        for event in self.world.drain_events() {
            self.handle_event(event, now_ms);
        }
        self.audio.pump();
    }

    fn handle_event(&mut self, event: GameEvent, now_ms: f64) {
        match event {
            GameEvent::Jumped => self.audio.play(SoundEffect::Jump),
            GameEvent::PowerUp => self.audio.play(SoundEffect::PowerUp),
            GameEvent::LifeUp => self.audio.play(SoundEffect::LifeUp),
            GameEvent::Hurt => self.audio.play(SoundEffect::Hurt),
            GameEvent::PowerDown => self.audio.play(SoundEffect::PowerDown),
            GameEvent::BossHit => self.audio.play(SoundEffect::BossHit),
            GameEvent::LevelUp(level) => log::debug!("Level {}", level),
            GameEvent::BossSpawned => {
                log::info!("Boss fight at score {}", self.world.score);
                self.audio.start_track(MusicTrack::Boss);
            }
            GameEvent::BossDefeated => {
                self.scheduler
                    .schedule(now_ms + WIN_DELAY_MS, SessionTask::DeclareWin);
            }
            GameEvent::GameOver => {
                self.audio.stop_all_tracks();
                self.audio.play(SoundEffect::Death);
                self.record(RunOutcome::Fell);
            }
        }
    }

    fn declare_win(&mut self) {
        // A fall during the delay already ended the run
        if self.world.phase != GamePhase::Playing {
            return;
        }
        self.world.phase = GamePhase::Win;
        log::info!("Run won at score {}", self.world.score);
        self.record(RunOutcome::Won);
    }

    fn record(&mut self, outcome: RunOutcome) {
        let rank = self
            .high_scores
            .add_score(self.world.score, self.world.level, outcome);
        if let Some(rank) = rank {
            log::info!("Score {} ranked #{}", self.world.score, rank);
        }
    }

    /// HUD values at `now_ms`
    pub fn hud(&self, now_ms: f64) -> HudSnapshot {
        let world = &self.world;
        let player = &world.player;

        let golden_secs = match player.golden_until {
            Some(until) if player.golden && world.boss.is_none() => {
                Some(((until - now_ms) / 1000.0).ceil().max(0.0) as u32)
            }
            _ => None,
        };
        let boss_hp = world
            .boss
            .as_ref()
            .filter(|b| b.is_active())
            .map(|b| (b.hp, b.max_hp));

        HudSnapshot {
            phase: world.phase,
            score: world.score,
            lives: player.lives,
            level: world.level,
            golden_secs,
            boss_hp,
            high_score: self.high_scores.top_score(),
            music_on: self.music_on,
        }
    }

    /// HUD values, at most once per sampling period (for loops without a timer of their own)
    pub fn sample_hud(&mut self, now_ms: f64) -> Option<HudSnapshot> {
        if self.hud_interval.ready(now_ms) {
            Some(self.hud(now_ms))
        } else {
            None
        }
    }

    /// Draw list for the current world
    pub fn scene(&self, now_ms: f64) -> Vec<DrawCmd> {
        let options = SceneOptions {
            now_ms,
            reduced_motion: self.reduced_motion,
        };
        build_scene(&self.world, &options)
    }

    pub fn toggle_music(&mut self) -> bool {
        self.music_on = self.audio.toggle_music();
        log::info!("Music {}", if self.music_on { "on" } else { "off" });
        self.music_on
    }

    /// Cancel pending tasks and silence audio; the session stays usable
    pub fn dispose(&mut self) {
        self.scheduler.cancel_all();
        self.audio.stop_all_tracks();
        self.timestep.reset();
        self.hud_interval.reset();
        log::info!("Session disposed");
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}

/// Steer toward the nearest platform above the player's feet
///
/// Drives the headless runner; a human plays through `InputState`.
pub fn autopilot(world: &World) -> Intent {
    const DEAD_ZONE: f32 = 8.0;

    let player = &world.player;
    let feet = player.bottom();
    let target = world
        .platforms
        .iter()
        .filter(|p| p.active && p.pos.y < feet)
        .min_by(|a, b| b.pos.y.total_cmp(&a.pos.y));

    let Some(platform) = target else {
        return Intent::None;
    };
    let dx = (platform.pos.x + platform.size.x / 2.0) - player.center_x();
    if dx > DEAD_ZONE {
        Intent::Right
    } else if dx < -DEAD_ZONE {
        Intent::Left
    } else {
        Intent::None
    }
}
