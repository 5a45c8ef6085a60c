//! Portal Arena - two-player platform arena simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, rooms, combat)
//! - `tuning`: Data-driven game balance and variant presets
//!
//! Rendering, input capture and the HUD live outside this crate. They feed
//! `sim::TickInput` in and read `sim::GameState` views out.

pub mod sim;
pub mod tuning;

pub use tuning::{ConfigError, SimConfig, Variant};

use glam::Vec2;

/// Default game constants (all timings in frames, speeds in units/frame)
pub mod consts {
    /// Frames per second the frame driver is expected to run at
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Arena bounds (world units)
    pub const ARENA_LEFT: f32 = -10.0;
    pub const ARENA_RIGHT: f32 = 10.0;
    pub const ARENA_FLOOR: f32 = 0.0;
    pub const ARENA_CEILING: f32 = 7.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 0.5;
    pub const PLAYER_MAX_HEALTH: u32 = 10;
    pub const GRAVITY: f32 = 0.015;
    pub const JUMP_SPEED: f32 = 0.4;
    pub const MOVE_SPEED: f32 = 0.15;
    /// Horizontal velocity multiplier per frame for the arena variant
    pub const ARENA_DAMPING: f32 = 0.85;

    /// Melee
    pub const MELEE_RANGE: f32 = 1.2;
    pub const MELEE_DAMAGE: u32 = 2;
    pub const ATTACK_COOLDOWN: u32 = 30; // 0.5s

    /// Bombs
    pub const BOMB_FUSE: u32 = 300; // 5s
    pub const BOMB_COOLDOWN: u32 = 180; // 3s
    pub const BOMB_RADIUS: f32 = 2.0;
    pub const BOMB_DAMAGE: u32 = 9;

    /// Spells
    pub const SPELL_SPEED: f32 = 0.3;
    pub const SPELL_LIFETIME: u32 = 45;
    pub const SPELL_COOLDOWN: u32 = 40;
    pub const SPELL_RADIUS: f32 = 1.5;
    pub const SPELL_KNOCKBACK: f32 = 0.25;

    /// Explosion display/hit window
    pub const EXPLOSION_FRAMES: u32 = 30;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.3;
    pub const BALL_MIN_SPEED: f32 = 0.08;
    pub const BALL_MAX_SPEED: f32 = 0.45;
    pub const PLAYER_BOUNCE_SCALE: f32 = 1.1;
    pub const EXPLOSION_BOUNCE_SCALE: f32 = 1.6;

    /// Goal mouth (arena variant)
    pub const GOAL_LINE: f32 = 8.5;
    pub const GOAL_MOUTH_BOTTOM: f32 = 1.3;
    pub const GOAL_MOUTH_TOP: f32 = 3.7;

    /// Pickups and doors
    pub const PICKUP_RADIUS: f32 = 1.0;
    pub const DOOR_X: f32 = 9.0;
    pub const DOOR_Y: f32 = 1.0;
    pub const DOOR_RADIUS: f32 = 1.0;
    pub const DOOR_EXIT_X: f32 = 8.0;

    /// Room grid (3 columns x 4 rows, 10 rooms)
    pub const ROOM_COLUMNS: u32 = 3;
    pub const ROOM_ROWS: u32 = 4;
    pub const ROOM_COUNT: u32 = 10;

    /// Platform thickness for generated layouts
    pub const PLATFORM_THICKNESS: f32 = 0.2;

    /// Slack used by collision tests
    pub const COLLISION_EPSILON: f32 = 1e-4;
}

/// Unit vector from `from` toward `to`, or `fallback` when they coincide
#[inline]
pub fn direction_or(from: Vec2, to: Vec2, fallback: Vec2) -> Vec2 {
    let delta = to - from;
    if delta.length_squared() < 1e-12 {
        fallback
    } else {
        delta.normalize()
    }
}

/// Sign of a facing value, treating zero as facing right
#[inline]
pub fn facing_sign(x: f32) -> f32 {
    if x < 0.0 { -1.0 } else { 1.0 }
}
