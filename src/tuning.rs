//! Game balance and variant presets
//!
//! Every constant that differs between the spy platformer and the portal pong
//! arena lives here, so one simulation core serves both.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::ProjectileKind;

/// Errors raised while loading or validating a config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Game variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Platformer: rooms, doors, clues and bombs
    #[default]
    Spy,
    /// Single arena: a ball, goals and spells
    PortalPong,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Spy => "Spy",
            Variant::PortalPong => "PortalPong",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "spy" | "spygame" => Some(Variant::Spy),
            "pong" | "portalpong" | "portal_pong" => Some(Variant::PortalPong),
            _ => None,
        }
    }
}

/// How a room's platforms are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlatformLayout {
    /// Independent random platforms anywhere in the x range
    #[default]
    Random,
    /// Random platforms on the right half, mirrored onto the left
    Mirrored,
}

/// Arena bounds shared by every room
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArenaTuning {
    pub left: f32,
    pub right: f32,
    pub floor: f32,
    pub ceiling: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            left: ARENA_LEFT,
            right: ARENA_RIGHT,
            floor: ARENA_FLOOR,
            ceiling: ARENA_CEILING,
        }
    }
}

/// Player movement and health
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerTuning {
    pub radius: f32,
    pub max_health: u32,
    /// Downward acceleration per frame while airborne
    pub gravity: f32,
    pub jump_speed: f32,
    pub move_speed: f32,
    /// `None` keeps horizontal velocity until changed, `Some(f)` multiplies it by `f` each frame
    pub horizontal_damping: Option<f32>,
    /// Spawn distance from the room center (player one on the left)
    pub spawn_x: f32,
    pub spawn_y: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: PLAYER_RADIUS,
            max_health: PLAYER_MAX_HEALTH,
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,
            move_speed: MOVE_SPEED,
            horizontal_damping: None,
            spawn_x: 5.0,
            spawn_y: 1.0,
        }
    }
}

/// Melee punch
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MeleeTuning {
    pub range: f32,
    pub damage: u32,
    pub cooldown: u32,
}

impl Default for MeleeTuning {
    fn default() -> Self {
        Self {
            range: MELEE_RANGE,
            damage: MELEE_DAMAGE,
            cooldown: ATTACK_COOLDOWN,
        }
    }
}

/// One projectile kind (bomb or spell)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProjectileTuning {
    /// Frames of flight before forced detonation
    pub lifetime: u32,
    /// Frames before the owner may spawn another one
    pub cooldown: u32,
    /// Flight speed along the owner's facing (0 = planted)
    pub speed: f32,
    /// Spawn distance ahead of the owner
    pub spawn_offset: f32,
    /// Explosion radius
    pub radius: f32,
    /// Health removed from each opponent inside the radius
    pub damage: u32,
    /// Impulse given to opponents inside the radius
    pub knockback: f32,
    /// Frames the explosion record stays alive after detonation
    pub display_frames: u32,
    /// Early detonation distance to the ball or an opponent
    pub trigger_radius: Option<f32>,
}

impl ProjectileTuning {
    pub fn bomb() -> Self {
        Self {
            lifetime: BOMB_FUSE,
            cooldown: BOMB_COOLDOWN,
            speed: 0.0,
            spawn_offset: 0.0,
            radius: BOMB_RADIUS,
            damage: BOMB_DAMAGE,
            knockback: 0.0,
            display_frames: EXPLOSION_FRAMES,
            trigger_radius: None,
        }
    }

    pub fn spell() -> Self {
        Self {
            lifetime: SPELL_LIFETIME,
            cooldown: SPELL_COOLDOWN,
            speed: SPELL_SPEED,
            spawn_offset: PLAYER_RADIUS + 0.3,
            radius: SPELL_RADIUS,
            damage: 0,
            knockback: SPELL_KNOCKBACK,
            display_frames: EXPLOSION_FRAMES / 2,
            trigger_radius: Some(0.6),
        }
    }
}

/// Ball (arena variant only)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BallTuning {
    pub radius: f32,
    pub spawn: Vec2,
    pub gravity: f32,
    /// Horizontal launch speed is sampled from `min_speed..max_launch_speed`
    pub min_speed: f32,
    pub max_launch_speed: f32,
    /// Vertical launch speed is sampled from `-max_launch_rise..max_launch_rise`
    pub max_launch_rise: f32,
    /// Hard speed cap after deflections
    pub max_speed: f32,
    pub player_bounce_scale: f32,
    pub explosion_bounce_scale: f32,
    /// Frames a player contact is ignored after a deflection
    pub contact_cooldown: u32,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            spawn: Vec2::new(0.0, 2.5),
            gravity: 0.0,
            min_speed: BALL_MIN_SPEED,
            max_launch_speed: 0.15,
            max_launch_rise: 0.06,
            max_speed: BALL_MAX_SPEED,
            player_bounce_scale: PLAYER_BOUNCE_SCALE,
            explosion_bounce_scale: EXPLOSION_BOUNCE_SCALE,
            contact_cooldown: 10,
        }
    }
}

/// Goal mouths at both arena ends
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GoalTuning {
    /// |x| beyond which the ball is inside a goal band
    pub line: f32,
    pub mouth_bottom: f32,
    pub mouth_top: f32,
}

impl Default for GoalTuning {
    fn default() -> Self {
        Self {
            line: GOAL_LINE,
            mouth_bottom: GOAL_MOUTH_BOTTOM,
            mouth_top: GOAL_MOUTH_TOP,
        }
    }
}

/// Room grid and doors
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoomTuning {
    pub columns: u32,
    pub rows: u32,
    pub count: u32,
    pub door_x: f32,
    pub door_y: f32,
    pub door_radius: f32,
    /// |x| a player lands at in the target room
    pub exit_x: f32,
    pub clues_per_room: u32,
}

impl Default for RoomTuning {
    fn default() -> Self {
        Self {
            columns: ROOM_COLUMNS,
            rows: ROOM_ROWS,
            count: ROOM_COUNT,
            door_x: DOOR_X,
            door_y: DOOR_Y,
            door_radius: DOOR_RADIUS,
            exit_x: DOOR_EXIT_X,
            clues_per_room: 2,
        }
    }
}

/// Platform generator ranges
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlatformTuning {
    pub layout: PlatformLayout,
    /// Platforms (or mirrored pairs) per room: `min_count..=min_count + extra_count`
    pub min_count: u32,
    pub extra_count: u32,
    pub min_width: f32,
    pub max_width: f32,
    /// Center x range (for `Mirrored`, the right half only)
    pub min_x: f32,
    pub max_x: f32,
    /// Center y range
    pub min_y: f32,
    pub max_y: f32,
    pub thickness: f32,
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self {
            layout: PlatformLayout::Random,
            min_count: 3,
            extra_count: 4,
            min_width: 2.0,
            max_width: 5.0,
            min_x: -8.0,
            max_x: 8.0,
            min_y: 1.0,
            max_y: 5.0,
            thickness: PLATFORM_THICKNESS,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub variant: Variant,
    pub arena: ArenaTuning,
    pub player: PlayerTuning,
    pub melee: MeleeTuning,
    /// Projectile spawned by the ability action
    pub ability: ProjectileKind,
    pub bomb: ProjectileTuning,
    pub spell: ProjectileTuning,
    /// Present only for variants that play with a ball
    pub ball: Option<BallTuning>,
    pub goal: GoalTuning,
    pub rooms: RoomTuning,
    pub platforms: PlatformTuning,
    pub pickup_radius: f32,
    /// Score that ends the match (ball variant)
    pub score_to_win: Option<u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::spy()
    }
}

impl SimConfig {
    /// Platformer preset: rooms, clues, bombs, persistent horizontal velocity
    pub fn spy() -> Self {
        Self {
            variant: Variant::Spy,
            arena: ArenaTuning::default(),
            player: PlayerTuning::default(),
            melee: MeleeTuning::default(),
            ability: ProjectileKind::Bomb,
            bomb: ProjectileTuning::bomb(),
            spell: ProjectileTuning::spell(),
            ball: None,
            goal: GoalTuning::default(),
            rooms: RoomTuning::default(),
            platforms: PlatformTuning::default(),
            pickup_radius: PICKUP_RADIUS,
            score_to_win: None,
        }
    }

    /// Arena preset: one room, mirrored platforms, a ball, goals and spells
    pub fn portal_pong() -> Self {
        Self {
            variant: Variant::PortalPong,
            player: PlayerTuning {
                horizontal_damping: Some(ARENA_DAMPING),
                ..PlayerTuning::default()
            },
            ability: ProjectileKind::Spell,
            ball: Some(BallTuning::default()),
            rooms: RoomTuning {
                columns: 1,
                rows: 1,
                count: 1,
                clues_per_room: 0,
                ..RoomTuning::default()
            },
            platforms: PlatformTuning {
                layout: PlatformLayout::Mirrored,
                min_count: 1,
                extra_count: 2,
                min_width: 1.5,
                max_width: 3.0,
                min_x: 2.0,
                max_x: 6.5,
                min_y: 4.2,
                max_y: 5.5,
                ..PlatformTuning::default()
            },
            score_to_win: Some(5),
            ..Self::spy()
        }
    }

    /// Create a config from a variant preset
    pub fn from_preset(variant: Variant) -> Self {
        match variant {
            Variant::Spy => Self::spy(),
            Variant::PortalPong => Self::portal_pong(),
        }
    }

    /// Parse and validate a JSON config (missing fields take spy defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Tuning for the given projectile kind
    pub fn projectile(&self, kind: ProjectileKind) -> &ProjectileTuning {
        match kind {
            ProjectileKind::Bomb => &self.bomb,
            ProjectileKind::Spell => &self.spell,
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.arena.left >= self.arena.right {
            return Err(invalid("arena", "left bound must be below right bound"));
        }
        if self.arena.floor >= self.arena.ceiling {
            return Err(invalid("arena", "floor must be below ceiling"));
        }
        if self.player.radius <= 0.0 {
            return Err(invalid("player.radius", "must be positive"));
        }
        if self.player.max_health == 0 {
            return Err(invalid("player.max_health", "must be at least 1"));
        }
        if let Some(damping) = self.player.horizontal_damping {
            if !(0.0..=1.0).contains(&damping) {
                return Err(invalid(
                    "player.horizontal_damping",
                    format!("{damping} is outside 0..=1"),
                ));
            }
        }
        if self.rooms.columns == 0 || self.rooms.rows == 0 || self.rooms.count == 0 {
            return Err(invalid("rooms", "grid needs at least one room"));
        }
        if self.rooms.count > self.rooms.columns * self.rooms.rows {
            return Err(invalid(
                "rooms.count",
                format!(
                    "{} rooms do not fit a {}x{} grid",
                    self.rooms.count, self.rooms.columns, self.rooms.rows
                ),
            ));
        }
        let p = &self.platforms;
        if p.min_width <= 0.0 || p.min_width > p.max_width {
            return Err(invalid("platforms.width", "needs 0 < min_width <= max_width"));
        }
        if p.min_x > p.max_x || p.min_y > p.max_y {
            return Err(invalid("platforms", "inverted position range"));
        }
        if p.thickness <= 0.0 {
            return Err(invalid("platforms.thickness", "must be positive"));
        }
        for (field, tuning) in [("bomb", &self.bomb), ("spell", &self.spell)] {
            if tuning.lifetime == 0 {
                return Err(invalid(field, "lifetime must be at least one frame"));
            }
            if tuning.radius <= 0.0 {
                return Err(invalid(field, "explosion radius must be positive"));
            }
        }
        if let Some(ball) = &self.ball {
            if ball.radius <= 0.0 {
                return Err(invalid("ball.radius", "must be positive"));
            }
            if ball.min_speed <= 0.0 || ball.min_speed > ball.max_launch_speed {
                return Err(invalid(
                    "ball.min_speed",
                    "needs 0 < min_speed <= max_launch_speed",
                ));
            }
            if ball.max_launch_speed > ball.max_speed {
                return Err(invalid("ball.max_speed", "below the launch speed"));
            }
            if self.goal.mouth_bottom >= self.goal.mouth_top {
                return Err(invalid("goal", "mouth bottom must be below mouth top"));
            }
            // The ball never travels through doors
            if self.rooms.count > 1 {
                return Err(invalid(
                    "rooms.count",
                    format!("the ball plays in a single room, not {}", self.rooms.count),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(SimConfig::spy().validate().is_ok());
        assert!(SimConfig::portal_pong().validate().is_ok());
        assert_eq!(SimConfig::default().variant, Variant::Spy);
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!(Variant::from_str("SPY"), Some(Variant::Spy));
        assert_eq!(Variant::from_str("pong"), Some(Variant::PortalPong));
        assert_eq!(Variant::from_str("chess"), None);
        for variant in [Variant::Spy, Variant::PortalPong] {
            assert_eq!(Variant::from_str(variant.as_str()), Some(variant));
        }
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let config = SimConfig::from_json(r#"{ "pickup_radius": 2.5 }"#).unwrap();
        assert_eq!(config.pickup_radius, 2.5);
        assert_eq!(config.rooms.count, ROOM_COUNT);
        assert_eq!(config.ability, ProjectileKind::Bomb);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = SimConfig::from_json(r#"{ "rooms": { "columns": 2, "rows": 2, "count": 5,
            "door_x": 9.0, "door_y": 1.0, "door_radius": 1.0, "exit_x": 8.0, "clues_per_room": 0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "rooms.count", .. }));

        let err = SimConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = SimConfig::from_file("/nonexistent/portal-arena.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_ball_needs_a_single_room() {
        let mut config = SimConfig::spy();
        config.ball = SimConfig::portal_pong().ball;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "rooms.count", .. }));

        config.rooms.count = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_keeps_variant() {
        let json = serde_json::to_string(&SimConfig::portal_pong()).unwrap();
        let config = SimConfig::from_json(&json).unwrap();
        assert_eq!(config.variant, Variant::PortalPong);
        assert!(config.ball.is_some());
        assert_eq!(config.player.horizontal_damping, Some(ARENA_DAMPING));
    }
}
