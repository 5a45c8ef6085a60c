//! Read-only views for render, HUD and minimap collaborators
//!
//! Nothing here mutates the session. Render items cover only the viewed room.

use glam::Vec2;
use serde::Serialize;

use super::entity::PlayerId;
use super::projectile::ProjectileKind;
use super::rooms::{DoorSide, RoomId};
use super::state::{BALL_ENTITY_ID, GameState, GameStatus};

/// Drawn size of a projectile in flight
const PROJECTILE_HALF_SIZE: f32 = 0.2;

/// What a render item depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderKind {
    Player(PlayerId),
    Ball,
    Projectile(ProjectileKind),
    Platform,
    Door { side: DoorSide, connected: bool },
    Clue,
}

/// One drawable thing in the viewed room
///
/// `id` is unique within its kind: entity ids for players, the ball,
/// projectiles and clues; list indices for platforms and doors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderItem {
    pub id: u32,
    pub kind: RenderKind,
    pub pos: Vec2,
    pub half_size: Vec2,
    /// Projectile has detonated (draw the blast, `half_size` is its radius)
    pub exploded: bool,
}

/// HUD numbers for one player
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerCard {
    pub health: u32,
    pub max_health: u32,
    pub score: u32,
    pub clues: u32,
    pub room: RoomId,
}

/// HUD snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scoreboard {
    pub players: [PlayerCard; 2],
    pub status: GameStatus,
    pub frame: u64,
}

/// One minimap cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinimapCell {
    pub room: RoomId,
    pub x: u32,
    pub y: u32,
    pub discovered: bool,
    /// The room currently viewed
    pub current: bool,
    pub connections: Vec<RoomId>,
    pub remaining_clues: usize,
}

impl GameState {
    /// Everything visible in the viewed room, static geometry first
    pub fn render_items(&self) -> Vec<RenderItem> {
        let room_id = self.viewed_room;
        let room = self.rooms.room(room_id);
        let mut items = Vec::new();

        items.extend(room.platforms.iter().enumerate().map(|(i, p)| RenderItem {
            id: i as u32,
            kind: RenderKind::Platform,
            pos: p.center(),
            half_size: p.half_size(),
            exploded: false,
        }));

        let door_half = Vec2::splat(self.config.rooms.door_radius);
        items.extend(room.doors().into_iter().enumerate().map(|(i, door)| RenderItem {
            id: i as u32,
            kind: RenderKind::Door {
                side: door.side,
                connected: door.is_connected(),
            },
            pos: door.pos,
            half_size: door_half,
            exploded: false,
        }));

        // Collected clues leave the visible world
        let clue_half = Vec2::splat(self.config.pickup_radius / 2.0);
        items.extend(room.clues.iter().filter(|c| !c.collected).map(|c| RenderItem {
            id: c.id,
            kind: RenderKind::Clue,
            pos: c.pos,
            half_size: clue_half,
            exploded: false,
        }));

        items.extend(
            self.projectiles
                .iter()
                .filter(|p| p.room == room_id)
                .map(|p| {
                    let half = match p.explosion {
                        Some(explosion) => Vec2::splat(explosion.radius),
                        None => Vec2::splat(PROJECTILE_HALF_SIZE),
                    };
                    RenderItem {
                        id: p.id,
                        kind: RenderKind::Projectile(p.kind),
                        pos: p.pos,
                        half_size: half,
                        exploded: p.is_exploded(),
                    }
                }),
        );

        if let Some(ball) = self.ball.as_ref().filter(|b| b.room == room_id) {
            items.push(RenderItem {
                id: BALL_ENTITY_ID,
                kind: RenderKind::Ball,
                pos: ball.pos(),
                half_size: Vec2::splat(ball.body.radius),
                exploded: false,
            });
        }

        items.extend(
            self.players
                .iter()
                .filter(|p| p.room == room_id)
                .map(|p| RenderItem {
                    id: p.id.entity_id(),
                    kind: RenderKind::Player(p.id),
                    pos: p.pos(),
                    half_size: Vec2::splat(p.body.radius),
                    exploded: false,
                }),
        );

        items
    }

    pub fn scoreboard(&self) -> Scoreboard {
        let card = |id: PlayerId| {
            let player = self.player(id);
            PlayerCard {
                health: player.health,
                max_health: self.config.player.max_health,
                score: player.score,
                clues: player.clues,
                room: player.room,
            }
        };
        Scoreboard {
            players: [card(PlayerId::One), card(PlayerId::Two)],
            status: self.status,
            frame: self.frame,
        }
    }

    /// One cell per room, in room id order
    pub fn minimap(&self) -> Vec<MinimapCell> {
        self.rooms
            .rooms()
            .iter()
            .map(|room| MinimapCell {
                room: room.id,
                x: room.x,
                y: room.y,
                discovered: room.discovered,
                current: room.id == self.viewed_room,
                connections: room.connections.clone(),
                remaining_clues: room.remaining_clues(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::SimConfig;

    #[test]
    fn test_render_items_cover_viewed_room_only() {
        let state = GameState::new(21);
        let items = state.render_items();
        let room = state.current_room();

        let players: Vec<_> = items
            .iter()
            .filter(|i| matches!(i.kind, RenderKind::Player(_)))
            .collect();
        // Player two spawns in another room
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, PlayerId::One.entity_id());

        let platforms = items.iter().filter(|i| i.kind == RenderKind::Platform).count();
        assert_eq!(platforms, room.platforms.len());
        let clues = items.iter().filter(|i| i.kind == RenderKind::Clue).count();
        assert_eq!(clues, room.remaining_clues());
        assert!(items.iter().any(|i| i.kind
            == RenderKind::Door {
                side: DoorSide::Left,
                connected: false
            }));
    }

    #[test]
    fn test_collected_clue_is_hidden() {
        let mut state = GameState::new(22);
        let before = state.render_items().len();
        state.rooms.room_mut(0).clues[0].collect();
        assert_eq!(state.render_items().len(), before - 1);
    }

    #[test]
    fn test_pong_view_has_ball_and_both_players() {
        let state = GameState::with_config(SimConfig::portal_pong(), 23);
        let items = state.render_items();
        assert!(items.iter().any(|i| i.kind == RenderKind::Ball && i.id == BALL_ENTITY_ID));
        assert_eq!(
            items
                .iter()
                .filter(|i| matches!(i.kind, RenderKind::Player(_)))
                .count(),
            2
        );
    }

    #[test]
    fn test_scoreboard_and_minimap() {
        let mut state = GameState::new(24);
        state.players[1].score = 3;
        let board = state.scoreboard();
        assert_eq!(board.players[1].score, 3);
        assert_eq!(board.players[0].health, state.config.player.max_health);
        assert_eq!(board.status, GameStatus::Playing);

        let map = state.minimap();
        assert_eq!(map.len(), state.rooms.len());
        assert!(map[0].current && map[0].discovered);
        assert!(map[1..].iter().all(|cell| !cell.current));
        assert_eq!(map[9].y, 3);
    }
}
