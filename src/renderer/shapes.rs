//! Draw list generation
//!
//! Turns a read-only view of the world into screen-space primitives. Nothing
//! here touches a browser API, so the whole scene can be inspected in tests.

use glam::Vec2;

use crate::consts::*;
use crate::sim::{
    Boss, Cloud, Enemy, Item, ItemKind, Particle, ParticleColor, Platform, PlatformKind, Player,
    Projectile, Rect, World,
};

/// Straight RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS color string
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const SKY_TOP: Color = Color::hex(0x60a5fa);
    pub const SKY_BOTTOM: Color = Color::hex(0xbfdbfe);
    pub const BOSS_SKY_TOP: Color = Color::hex(0x450a0a);
    pub const BOSS_SKY_BOTTOM: Color = Color::hex(0x7f1d1d);
    pub const CLOUD: Color = Color::hex(0xffffff).with_alpha(0.6);
    pub const SHADE: Color = Color::hex(0x000000).with_alpha(0.2);

    pub const GRASS_TOP: Color = Color::hex(0x4ade80);
    pub const GRASS_LIGHT: Color = Color::hex(0x86efac);
    pub const DIRT: Color = Color::hex(0x854d0e);
    pub const MOVING_TOP: Color = Color::hex(0x0ea5e9);
    pub const MOVING_LIGHT: Color = Color::hex(0x7dd3fc);
    pub const MOVING_BODY: Color = Color::hex(0x0369a1);
    pub const BREAKABLE_TOP: Color = Color::hex(0x94a3b8);
    pub const BREAKABLE_LIGHT: Color = Color::hex(0xcbd5e1);
    pub const BREAKABLE_BODY: Color = Color::hex(0x475569);
    pub const BOOST_TOP: Color = Color::hex(0xf472b6);
    pub const BOOST_LIGHT: Color = Color::hex(0xfbcfe8);
    pub const BOOST_BODY: Color = Color::hex(0xbe185d);

    pub const SUIT: Color = Color::hex(0xb45309);
    pub const SUIT_DARK: Color = Color::hex(0x451a03);
    pub const SKIN: Color = Color::hex(0xffe4e6);
    pub const HAIR: Color = Color::hex(0xfde047);
    pub const BOOTS: Color = Color::hex(0xfbbf24);
    pub const GLOVES: Color = Color::hex(0x374151);
    pub const BLUSH: Color = Color::hex(0xf9a8d4);
    pub const NOSE: Color = Color::hex(0xa67c52);
    pub const GOLDEN_SUIT: Color = Color::hex(0xfacc15);
    pub const GOLDEN_DARK: Color = Color::hex(0xb45309);
    pub const GOLDEN_GLOW: Color = Color::hex(0xfef08a);

    pub const CARROT: Color = Color::hex(0xf97316);
    pub const LEAF: Color = Color::hex(0x4ade80);
    pub const ENEMY: Color = Color::hex(0xef4444);
    pub const EGG: Color = Color::hex(0xf1f5f9);
    pub const WHITE: Color = Color::hex(0xffffff);
    pub const BLACK: Color = Color::hex(0x000000);
    pub const HP_BACK: Color = Color::hex(0x450a0a);
    pub const HP_FRONT: Color = Color::hex(0xef4444);
}

/// One drawing primitive in screen space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Full-screen vertical gradient
    Sky { top: Color, bottom: Color },
    Rect { rect: Rect, color: Color },
    /// Ellipse inscribed in `rect`
    Ellipse { rect: Rect, color: Color },
    Text {
        text: &'static str,
        pos: Vec2,
        color: Color,
    },
}

/// Presentation options that do not affect the simulation
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneOptions {
    /// Wall-clock time driving blinks and bobbing
    pub now_ms: f64,
    /// Disable blinking, flashing and bobbing
    pub reduced_motion: bool,
}

impl SceneOptions {
    /// Square wave with the given half-period; always "off" under reduced motion
    fn blink(&self, half_period_ms: f64) -> bool {
        !self.reduced_motion && (self.now_ms / half_period_ms).floor() as i64 % 2 == 0
    }
}

const HP_BAR_WIDTH: f32 = 200.0;
const HP_BAR_Y: f32 = 60.0;
const BOSS_LABEL: &str = "HUEVO MALVADO";
/// Golden mode flashes during its final stretch
const GOLDEN_WARNING_MS: f64 = 5000.0;

/// Draw list builder with a fixed camera offset
struct Painter {
    cmds: Vec<DrawCmd>,
    camera_y: f32,
}

impl Painter {
    /// World-space rectangle, pixel snapped
    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let min = Vec2::new(x.floor(), (y - self.camera_y).floor());
        self.cmds.push(DrawCmd::Rect {
            rect: Rect::new(min, Vec2::new(w.floor(), h.floor())),
            color,
        });
    }

    /// Screen-space rectangle (HUD overlays)
    fn overlay(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.cmds.push(DrawCmd::Rect {
            rect: Rect::new(Vec2::new(x, y), Vec2::new(w, h)),
            color,
        });
    }

    fn ellipse(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.cmds.push(DrawCmd::Ellipse {
            rect: Rect::new(Vec2::new(min.x, min.y - self.camera_y), size),
            color,
        });
    }
}

/// Build the frame's draw list, back to front
pub fn build_scene(world: &World, options: &SceneOptions) -> Vec<DrawCmd> {
    let boss_level = world.level >= MAX_LEVEL;
    let mut painter = Painter {
        cmds: Vec::with_capacity(256),
        camera_y: world.camera_y.floor(),
    };

    painter.cmds.push(if boss_level {
        DrawCmd::Sky {
            top: colors::BOSS_SKY_TOP,
            bottom: colors::BOSS_SKY_BOTTOM,
        }
    } else {
        DrawCmd::Sky {
            top: colors::SKY_TOP,
            bottom: colors::SKY_BOTTOM,
        }
    });

    if !boss_level {
        for cloud in &world.clouds {
            draw_cloud(&mut painter, cloud);
        }
    }
    for platform in world.platforms.iter().filter(|p| p.active) {
        draw_platform(&mut painter, platform);
    }
    if let Some(boss) = world.boss.as_ref().filter(|b| b.is_active()) {
        if !(boss.is_invulnerable() && options.blink(50.0)) {
            draw_boss(&mut painter, boss);
        }
    }
    let bob = if options.reduced_motion {
        0.0
    } else {
        ((options.now_ms / 200.0).sin() * 4.0) as f32
    };
    for item in world.items.iter().filter(|i| i.active) {
        draw_item(&mut painter, item, bob);
    }
    for projectile in world.projectiles.iter().filter(|p| p.active) {
        draw_projectile(&mut painter, projectile);
    }
    let legs_up = options.blink(150.0);
    for enemy in world.enemies.iter().filter(|e| e.active) {
        draw_enemy(&mut painter, enemy, legs_up);
    }
    for particle in &world.particles {
        draw_particle(&mut painter, particle);
    }
    draw_player(&mut painter, &world.player, options);

    if let Some(boss) = world.boss.as_ref().filter(|b| b.is_active()) {
        draw_boss_hp(&mut painter, boss);
    }

    painter.cmds
}

fn draw_cloud(painter: &mut Painter, cloud: &Cloud) {
    let width = if cloud.wide { 100.0 } else { 60.0 };
    painter.rect(cloud.pos.x, cloud.pos.y, width, 24.0, colors::CLOUD);
    painter.rect(cloud.pos.x + 10.0, cloud.pos.y - 10.0, width - 20.0, 10.0, colors::CLOUD);
}

fn draw_platform(painter: &mut Painter, p: &Platform) {
    let (top, light, body) = match p.kind {
        PlatformKind::Normal => (colors::GRASS_TOP, colors::GRASS_LIGHT, colors::DIRT),
        PlatformKind::Moving => (colors::MOVING_TOP, colors::MOVING_LIGHT, colors::MOVING_BODY),
        PlatformKind::Breakable => (
            colors::BREAKABLE_TOP,
            colors::BREAKABLE_LIGHT,
            colors::BREAKABLE_BODY,
        ),
        PlatformKind::Boost => (colors::BOOST_TOP, colors::BOOST_LIGHT, colors::BOOST_BODY),
    };
    let (x, y, w, h) = (p.pos.x, p.pos.y, p.size.x, p.size.y);
    painter.rect(x, y + 4.0, w, h - 4.0, body);
    painter.rect(x + w - 4.0, y + 4.0, 4.0, h - 4.0, colors::SHADE);
    painter.rect(x, y + h - 4.0, w, 4.0, colors::SHADE);
    painter.rect(x, y, w, 6.0, top);
    painter.rect(x, y, w, 2.0, light);
}

fn draw_boss(painter: &mut Painter, boss: &Boss) {
    let (x, y) = (boss.pos.x.floor(), boss.pos.y.floor());
    painter.ellipse(Vec2::new(x, y), boss.size, colors::EGG);
    painter.rect(x + 20.0, y + 30.0, 10.0, 10.0, colors::ENEMY);
    painter.rect(x + 50.0, y + 30.0, 10.0, 10.0, colors::ENEMY);
    // Angry brows
    painter.rect(x + 15.0, y + 25.0, 20.0, 3.0, colors::BLACK);
    painter.rect(x + 45.0, y + 25.0, 20.0, 3.0, colors::BLACK);
}

fn draw_item(painter: &mut Painter, item: &Item, bob: f32) {
    let body = match item.kind {
        ItemKind::GoldenPowerup => colors::GOLDEN_SUIT,
        ItemKind::HealthPickup => colors::CARROT,
    };
    let (x, y) = (item.pos.x.floor(), item.pos.y.floor() + bob);
    if item.kind == ItemKind::GoldenPowerup {
        painter.rect(x, y, item.size.x, item.size.y + 6.0, colors::GOLDEN_GLOW.with_alpha(0.4));
    }
    painter.rect(x + 6.0, y + 8.0, 12.0, 16.0, body);
    painter.rect(x + 8.0, y + 24.0, 8.0, 4.0, body);
    painter.rect(x + 10.0, y + 28.0, 4.0, 2.0, body);
    painter.rect(x + 4.0, y, 8.0, 8.0, colors::LEAF);
    painter.rect(x + 12.0, y, 8.0, 8.0, colors::LEAF);
}

fn draw_projectile(painter: &mut Painter, p: &Projectile) {
    painter.rect(p.pos.x, p.pos.y, p.size.x, p.size.y, colors::WHITE.with_alpha(0.7));
    painter.rect(p.pos.x + 2.0, p.pos.y, p.size.x - 4.0, p.size.y, colors::WHITE);
}

fn draw_enemy(painter: &mut Painter, enemy: &Enemy, legs_up: bool) {
    let (x, y) = (enemy.pos.x.floor(), enemy.pos.y.floor());
    let leg_y = if legs_up { y - 2.0 } else { y + 8.0 };
    painter.rect(x - 4.0, leg_y, 8.0, 12.0, colors::BLACK);
    painter.rect(x + 28.0, leg_y, 8.0, 12.0, colors::BLACK);
    painter.rect(x + 4.0, y, 24.0, 32.0, colors::EGG);
    painter.rect(x + 8.0, y + 12.0, 6.0, 4.0, colors::ENEMY);
    painter.rect(x + 18.0, y + 12.0, 6.0, 4.0, colors::ENEMY);
    painter.rect(x + 8.0, y + 10.0, 6.0, 2.0, colors::BLACK);
    painter.rect(x + 18.0, y + 10.0, 6.0, 2.0, colors::BLACK);
    painter.rect(x + 14.0, y + 20.0, 4.0, 2.0, colors::BLACK);
}

pub fn particle_color(color: ParticleColor) -> Color {
    match color {
        ParticleColor::Grass => colors::GRASS_TOP,
        ParticleColor::Boost => colors::BOOST_TOP,
        ParticleColor::Debris => colors::BREAKABLE_TOP,
        ParticleColor::Golden => colors::GOLDEN_GLOW,
        ParticleColor::Carrot => colors::CARROT,
        ParticleColor::Enemy => colors::ENEMY,
        ParticleColor::White => colors::WHITE,
    }
}

fn draw_particle(painter: &mut Painter, p: &Particle) {
    painter.rect(p.pos.x, p.pos.y, p.size, p.size, particle_color(p.color));
}

/// Sprite palette slots
#[derive(Clone, Copy)]
enum Part {
    Suit,
    Dark,
    Skin,
    Hair,
    Blush,
    Gloves,
    Boots,
    Nose,
    Eye,
    Shine,
}

type Sprite = &'static [(f32, f32, f32, f32, Part)];

/// Head and face, shared by both poses
const HEAD: Sprite = &[
    (6.0, 2.0, 28.0, 22.0, Part::Suit),
    (4.0, 2.0, 6.0, 8.0, Part::Suit),
    (30.0, 2.0, 6.0, 8.0, Part::Suit),
    (14.0, 0.0, 12.0, 6.0, Part::Suit),
    (12.0, 6.0, 16.0, 8.0, Part::Dark),
    (14.0, 10.0, 2.0, 3.0, Part::Eye),
    (24.0, 10.0, 2.0, 3.0, Part::Eye),
    (8.0, 8.0, 3.0, 3.0, Part::Eye),
    (29.0, 8.0, 3.0, 3.0, Part::Eye),
    (10.0, 16.0, 20.0, 10.0, Part::Skin),
    (10.0, 16.0, 20.0, 4.0, Part::Hair),
    (8.0, 18.0, 4.0, 8.0, Part::Hair),
    (28.0, 18.0, 4.0, 8.0, Part::Hair),
    (14.0, 21.0, 2.0, 3.0, Part::Eye),
    (24.0, 21.0, 2.0, 3.0, Part::Eye),
    (12.0, 23.0, 3.0, 2.0, Part::Blush),
    (25.0, 23.0, 3.0, 2.0, Part::Blush),
];

/// Arms out, mid-jump
const BODY_ACTIVE: Sprite = &[
    (12.0, 26.0, 16.0, 10.0, Part::Suit),
    (2.0, 18.0, 8.0, 6.0, Part::Suit),
    (0.0, 16.0, 4.0, 4.0, Part::Gloves),
    (30.0, 18.0, 8.0, 6.0, Part::Suit),
    (36.0, 16.0, 4.0, 4.0, Part::Gloves),
    (6.0, 32.0, 8.0, 6.0, Part::Suit),
    (26.0, 32.0, 8.0, 6.0, Part::Suit),
    (4.0, 36.0, 6.0, 6.0, Part::Boots),
    (30.0, 36.0, 6.0, 6.0, Part::Boots),
    (19.0, 24.0, 2.0, 2.0, Part::Shine),
];

/// Standing still before the first move
const BODY_IDLE: Sprite = &[
    (10.0, 26.0, 20.0, 12.0, Part::Suit),
    (4.0, 26.0, 6.0, 8.0, Part::Suit),
    (4.0, 34.0, 6.0, 4.0, Part::Gloves),
    (30.0, 26.0, 6.0, 8.0, Part::Suit),
    (30.0, 34.0, 6.0, 4.0, Part::Gloves),
    (12.0, 36.0, 6.0, 4.0, Part::Suit),
    (22.0, 36.0, 6.0, 4.0, Part::Suit),
    (10.0, 38.0, 8.0, 4.0, Part::Boots),
    (22.0, 38.0, 8.0, 4.0, Part::Boots),
    (19.0, 24.0, 2.0, 1.0, Part::Nose),
    (18.0, 32.0, 4.0, 4.0, Part::Dark),
];

fn draw_player(painter: &mut Painter, player: &Player, options: &SceneOptions) {
    if player.is_invulnerable(options.now_ms) && options.blink(50.0) {
        return;
    }

    let expiring = player
        .golden_until
        .is_some_and(|until| until - options.now_ms < GOLDEN_WARNING_MS);
    let (suit, dark) = if player.golden && !(expiring && options.blink(200.0)) {
        (colors::GOLDEN_SUIT, colors::GOLDEN_DARK)
    } else {
        (colors::SUIT, colors::SUIT_DARK)
    };

    let (x, y) = (player.pos.x.floor(), player.pos.y.floor());
    let (w, h) = (player.size.x, player.size.y);
    painter.ellipse(
        Vec2::new(x + w / 2.0 - 14.0, y + h - 6.0),
        Vec2::new(28.0, 8.0),
        colors::BLACK.with_alpha(0.3),
    );
    if player.golden {
        painter.rect(x - 2.0, y - 2.0, w + 4.0, h + 4.0, colors::GOLDEN_GLOW.with_alpha(0.5));
    }

    let body = if player.has_moved { BODY_ACTIVE } else { BODY_IDLE };
    for &(rx, ry, rw, rh, part) in HEAD.iter().chain(body) {
        let color = match part {
            Part::Suit => suit,
            Part::Dark => dark,
            Part::Skin => colors::SKIN,
            Part::Hair => colors::HAIR,
            Part::Blush => colors::BLUSH,
            Part::Gloves => colors::GLOVES,
            Part::Boots => colors::BOOTS,
            Part::Nose => colors::NOSE,
            Part::Eye => colors::BLACK,
            Part::Shine => colors::WHITE,
        };
        // Sprites face right; mirror for left
        let rx = if player.facing_right { rx } else { w - rx - rw };
        painter.rect(x + rx, y + ry, rw, rh, color);
    }
}

fn draw_boss_hp(painter: &mut Painter, boss: &Boss) {
    let left = GAME_WIDTH / 2.0 - HP_BAR_WIDTH / 2.0;
    let filled = HP_BAR_WIDTH * boss.hp as f32 / boss.max_hp.max(1) as f32;
    painter.overlay(left, HP_BAR_Y, HP_BAR_WIDTH, 20.0, colors::HP_BACK);
    painter.overlay(left, HP_BAR_Y, filled, 20.0, colors::HP_FRONT);
    painter.cmds.push(DrawCmd::Text {
        text: BOSS_LABEL,
        pos: Vec2::new(GAME_WIDTH / 2.0 - 60.0, HP_BAR_Y - 10.0),
        color: colors::WHITE,
    });
}
