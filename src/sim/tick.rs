//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one frame. The phase order is
//! fixed: inputs, integration, projectiles, combat, room transitions.

use super::combat;
use super::entity::PlayerId;
use super::projectile::{Projectile, advance_projectiles};
use super::state::{GameEvent, GameState, GameStatus};

/// One player's intents for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    /// Punch
    pub attack: bool,
    /// Bomb or spell, depending on the variant
    pub ability: bool,
    /// Fall through the platform underfoot
    pub drop_down: bool,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Indexed by `PlayerId::index`
    pub players: [PlayerInput; 2],
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// Input where only `player` does something
    pub fn for_player(player: PlayerId, input: PlayerInput) -> Self {
        let mut tick = Self::default();
        tick.players[player.index()] = input;
        tick
    }

    #[inline]
    pub fn player(&self, id: PlayerId) -> &PlayerInput {
        &self.players[id.index()]
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.status {
            GameStatus::Playing => {
                state.set_status(GameStatus::Paused);
                return;
            }
            GameStatus::Paused => state.set_status(GameStatus::Playing),
            _ => {}
        }
    }

    // Frozen while paused and after the match is decided
    if state.status != GameStatus::Playing {
        return;
    }

    state.frame += 1;

    apply_inputs(state, input);
    integrate(state);
    advance_projectiles(state);
    combat::resolve(state);
    resolve_room_transitions(state);

    state.normalize_order();
}

/// Value-in, value-out form of [`tick`]
pub fn step(mut state: GameState, input: &TickInput) -> GameState {
    tick(&mut state, input);
    state
}

fn apply_inputs(state: &mut GameState, input: &TickInput) {
    let kind = state.config.ability;
    let ability = *state.config.projectile(kind);
    let tuning = state.config.player;
    let melee = state.config.melee;

    for id in PlayerId::ALL {
        let intents = input.player(id);
        let player = state.player_mut(id);

        match (intents.move_left, intents.move_right) {
            (true, false) => player.move_left(tuning.move_speed),
            (false, true) => player.move_right(tuning.move_speed),
            _ => {}
        }
        if intents.jump {
            player.jump(tuning.jump_speed);
        }
        if intents.drop_down {
            player.dropping = true;
        }
        if intents.attack {
            player.punch(melee.cooldown);
        }

        if intents.ability && player.try_ability(ability.cooldown) {
            let (room, pos, facing) = (player.room, player.pos(), player.facing);
            let projectile_id = state.next_entity_id();
            state.projectiles.push(Projectile::spawn(
                projectile_id,
                kind,
                id,
                room,
                pos,
                facing,
                &ability,
            ));
            log::debug!("{id:?} spawned {kind:?} {projectile_id} in room {room}");
            state.events.push(GameEvent::ProjectileSpawned {
                id: projectile_id,
                kind,
                owner: id,
            });
        }
    }
}

/// Move players against their own room's platforms, then the ball
fn integrate(state: &mut GameState) {
    for player in state.players.iter_mut() {
        let platforms = &state.rooms.room(player.room).platforms;
        player.update(platforms, &state.config);
    }

    if let (Some(ball), Some(tuning)) = (state.ball.as_mut(), state.config.ball.as_ref()) {
        let platforms = &state.rooms.room(ball.room).platforms;
        ball.update(platforms, &state.config, tuning);
    }
}

/// Walk players through connected doors they are standing in
fn resolve_room_transitions(state: &mut GameState) {
    let doors = state.config.rooms;

    for id in PlayerId::ALL {
        let player = state.player(id);
        let Some(transit) =
            state
                .rooms
                .crossing(player.room, player.pos(), doors.door_radius, doors.exit_x)
        else {
            continue;
        };

        let platforms = &state.rooms.room(transit.to).platforms;
        let player = &mut state.players[id.index()];
        player.room = transit.to;
        player.body.pos.x = transit.arrival_x;
        player.body.settle_on(platforms);
        let first_visit = state.rooms.discover(transit.to);
        log::info!(
            "Frame {}: {id:?} moved from room {} to room {}{}",
            state.frame,
            transit.from,
            transit.to,
            if first_visit { " (discovered)" } else { "" }
        );
        state.events.push(GameEvent::RoomEntered {
            player: id,
            from: transit.from,
            to: transit.to,
            first_visit,
        });

        if id == state.followed {
            state.viewed_room = transit.to;
            state.events.push(GameEvent::ViewChanged { room: transit.to });
        }
    }
}
