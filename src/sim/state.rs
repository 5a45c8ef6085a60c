//! Game state and core simulation types
//!
//! Everything needed to replay a session deterministically lives here:
//! config, RNG, entities, rooms and the frame counter.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Ball, Player, PlayerId, launch_velocity};
use super::projectile::{Projectile, ProjectileKind};
use super::rooms::{Room, RoomGraph, RoomId};
use crate::tuning::SimConfig;

/// First id handed out to clues and projectiles (players and the ball use the ones below)
const FIRST_DYNAMIC_ID: u32 = 10;

/// Entity id of the ball
pub const BALL_ENTITY_ID: u32 = 3;

/// Match status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Paused,
    Player1Won,
    Player2Won,
}

impl GameStatus {
    pub fn won_by(player: PlayerId) -> Self {
        match player {
            PlayerId::One => GameStatus::Player1Won,
            PlayerId::Two => GameStatus::Player2Won,
        }
    }

    pub fn winner(self) -> Option<PlayerId> {
        match self {
            GameStatus::Player1Won => Some(PlayerId::One),
            GameStatus::Player2Won => Some(PlayerId::Two),
            _ => None,
        }
    }

    #[inline]
    pub fn is_over(self) -> bool {
        self.winner().is_some()
    }
}

/// What dealt a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitCause {
    Melee,
    Explosion,
}

/// Something that happened during the last tick (for audio/effects collaborators)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ProjectileSpawned {
        id: u32,
        kind: ProjectileKind,
        owner: PlayerId,
    },
    Detonated {
        id: u32,
        kind: ProjectileKind,
        owner: PlayerId,
        pos: Vec2,
    },
    ExplosionExpired {
        id: u32,
    },
    PlayerHit {
        attacker: PlayerId,
        victim: PlayerId,
        damage: u32,
        cause: HitCause,
    },
    KnockedBack {
        attacker: PlayerId,
        victim: PlayerId,
    },
    /// Ball deflected by a player, or by an explosion that player owns
    BallDeflected {
        by: PlayerId,
        explosion: bool,
    },
    Goal {
        scorer: PlayerId,
    },
    ClueCollected {
        player: PlayerId,
        room: RoomId,
        clue: u32,
    },
    RoomEntered {
        player: PlayerId,
        from: RoomId,
        to: RoomId,
        first_visit: bool,
    },
    ViewChanged {
        room: RoomId,
    },
    StatusChanged {
        status: GameStatus,
    },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: SimConfig,
    /// Session seed for reproducibility
    pub seed: u64,
    /// Sole source of randomness after creation
    pub rng: Pcg32,
    /// Frames simulated so far
    pub frame: u64,
    pub status: GameStatus,
    /// Indexed by `PlayerId::index`
    pub players: [Player; 2],
    pub ball: Option<Ball>,
    /// Active projectiles (sorted by id for determinism)
    pub projectiles: Vec<Projectile>,
    pub rooms: RoomGraph,
    /// Room presented to the render collaborator
    pub viewed_room: RoomId,
    /// Player whose room the view follows
    pub followed: PlayerId,
    /// Events of the last tick only
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    pub(crate) next_id: u32,
}

impl GameState {
    /// New session with the default (spy) config
    pub fn new(seed: u64) -> Self {
        Self::with_config(SimConfig::default(), seed)
    }

    /// New session: rooms, layouts and the first serve are all rolled from `seed`
    pub fn with_config(config: SimConfig, seed: u64) -> Self {
        debug_assert!(config.validate().is_ok(), "config must be validated before use");

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut next_id = FIRST_DYNAMIC_ID;
        let mut rooms = RoomGraph::generate(&config, &mut rng, &mut next_id);
        let (first_room, second_room) = rooms.spawn_rooms();
        rooms.discover(first_room);

        let spawn = Vec2::new(config.player.spawn_x, config.player.spawn_y);
        let mut players = [
            Player::new(
                PlayerId::One,
                Vec2::new(-spawn.x, spawn.y),
                first_room,
                &config.player,
            ),
            Player::new(PlayerId::Two, spawn, second_room, &config.player),
        ];
        // Random layouts may cover a spawn point
        for player in players.iter_mut() {
            if player.body.settle_on(&rooms.room(player.room).platforms) {
                log::debug!("{:?} spawn lifted onto a platform", player.id);
            }
        }

        let ball = config.ball.map(|tuning| {
            let vel = launch_velocity(&tuning, &mut rng);
            Ball::new(tuning.spawn, vel, tuning.radius, first_room)
        });

        log::info!(
            "New {} session (seed {seed}): {} rooms, players in rooms {first_room} and {second_room}",
            config.variant.as_str(),
            rooms.len()
        );

        Self {
            config,
            seed,
            rng,
            frame: 0,
            status: GameStatus::Playing,
            players,
            ball,
            projectiles: Vec::new(),
            rooms,
            viewed_room: first_room,
            followed: PlayerId::One,
            events: Vec::new(),
            next_id,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    #[inline]
    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    /// The room currently presented
    pub fn current_room(&self) -> &Room {
        self.rooms.room(self.viewed_room)
    }

    /// Point the view at another player's room
    pub fn follow(&mut self, player: PlayerId) {
        self.followed = player;
        let room = self.player(player).room;
        if room != self.viewed_room {
            self.viewed_room = room;
            self.events.push(GameEvent::ViewChanged { room });
        }
    }

    /// Ensure projectiles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.projectiles.sort_by_key(|p| p.id);
    }

    pub(crate) fn set_status(&mut self, status: GameStatus) {
        if self.status == status {
            return;
        }
        log::info!("Frame {}: {:?} -> {:?}", self.frame, self.status, status);
        self.status = status;
        self.events.push(GameEvent::StatusChanged { status });
    }
}
