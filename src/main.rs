//! Portal Arena headless runner
//!
//! Plays a scripted match between two simple bots and logs what happens.
//!
//! Usage: `portal-arena [VARIANT | CONFIG.json] [SEED] [FRAMES]`

use std::process::ExitCode;

use portal_arena::consts::FRAMES_PER_SECOND;
use portal_arena::sim::{GameState, PlayerId, PlayerInput, TickInput, tick};
use portal_arena::{ConfigError, SimConfig, Variant};

/// Default match length (two minutes)
const DEFAULT_FRAMES: u64 = 120 * FRAMES_PER_SECOND as u64;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(arg) => match load_config(&arg) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let frames = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    log::info!(
        "Portal Arena (native) starting: {} seed {seed}, {frames} frames",
        config.variant.as_str()
    );

    let mut state = GameState::with_config(config, seed);
    for _ in 0..frames {
        let input = TickInput {
            players: [bot_input(&state, PlayerId::One), bot_input(&state, PlayerId::Two)],
            pause: false,
        };
        tick(&mut state, &input);
        for event in &state.events {
            log::debug!("frame {}: {event:?}", state.frame);
        }
        if state.status.is_over() {
            break;
        }
    }

    let board = state.scoreboard();
    for (id, card) in PlayerId::ALL.iter().zip(board.players) {
        println!(
            "{id:?}: health {}/{} score {} clues {} room {}",
            card.health, card.max_health, card.score, card.clues, card.room
        );
    }
    println!("Status after {} frames: {:?}", board.frame, board.status);
    let discovered = state.minimap().iter().filter(|cell| cell.discovered).count();
    println!("Rooms discovered: {discovered}/{}", state.rooms.len());

    ExitCode::SUCCESS
}

/// A variant name, or a path to a JSON config file
fn load_config(arg: &str) -> Result<SimConfig, ConfigError> {
    match Variant::from_str(arg) {
        Some(variant) => Ok(SimConfig::from_preset(variant)),
        None => SimConfig::from_file(arg),
    }
}

/// Chase the opponent when sharing a room, otherwise head for the right-hand door
fn bot_input(state: &GameState, id: PlayerId) -> PlayerInput {
    let me = state.player(id);
    let rival = state.player(id.other());
    let frame = state.frame;

    let target = if me.room == rival.room {
        match &state.ball {
            // Stay between the ball and our own goal
            Some(ball) => ball.pos().x + if id == PlayerId::One { -0.8 } else { 0.8 },
            None => rival.pos().x,
        }
    } else {
        state.config.rooms.door_x
    };
    let dx = target - me.pos().x;
    let close = (rival.pos() - me.pos()).length() < state.config.melee.range;

    PlayerInput {
        move_left: dx < -0.3,
        move_right: dx > 0.3,
        jump: frame % 90 == u64::from(id.entity_id()) * 20,
        attack: close && me.room == rival.room,
        ability: me.room == rival.room && frame % 50 == 0,
        drop_down: frame % 240 == 120,
    }
}
