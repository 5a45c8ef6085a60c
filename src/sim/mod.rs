//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-counted timing only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod collision;
pub mod combat;
pub mod entity;
pub mod platforms;
pub mod projectile;
pub mod rooms;
pub mod state;
pub mod tick;
pub mod view;

pub use aabb::Aabb;
pub use collision::{Contacts, Motion, Response};
pub use entity::{Ball, Body, Player, PlayerId};
pub use projectile::{Explosion, Projectile, ProjectileKind};
pub use rooms::{Clue, Door, DoorSide, Room, RoomGraph, RoomId};
pub use state::{GameEvent, GameState, GameStatus, HitCause};
pub use tick::{PlayerInput, TickInput, step, tick};
pub use view::{MinimapCell, PlayerCard, RenderItem, RenderKind, Scoreboard};
