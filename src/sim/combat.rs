//! Combat and score resolution
//!
//! Runs once per tick after everything has moved. Order matters for
//! determinism: melee, explosions, ball contacts, goals, pickups, and
//! finally the win check.

use glam::Vec2;

use super::collision::within_radius;
use super::entity::PlayerId;
use super::projectile::ProjectileKind;
use super::rooms::RoomId;
use super::state::{GameEvent, GameState, GameStatus, HitCause};
use crate::direction_or;

/// Resolve every interaction of this tick
pub fn resolve(state: &mut GameState) {
    resolve_melee(state);
    resolve_explosions(state);
    resolve_ball_contacts(state);
    resolve_goals(state);
    resolve_pickups(state);
    check_terminal(state);
}

/// Punches land on an opponent in the same room within melee range
///
/// Attack flags are consumed here whether or not the punch connects.
fn resolve_melee(state: &mut GameState) {
    let melee = state.config.melee;
    let [one, two] = &mut state.players;
    let swings = [one.take_attack(), two.take_attack()];

    if one.room != two.room || !within_radius(one.pos(), two.pos(), melee.range) {
        return;
    }

    for attacker in PlayerId::ALL {
        if !swings[attacker.index()] {
            continue;
        }
        let victim = attacker.other();
        let lost = state.players[victim.index()].apply_damage(melee.damage);
        log::debug!("{attacker:?} punched {victim:?} for {lost}");
        state.events.push(GameEvent::PlayerHit {
            attacker,
            victim,
            damage: lost,
            cause: HitCause::Melee,
        });
    }
}

/// Hand out the effect of every explosion that has not been applied yet
fn resolve_explosions(state: &mut GameState) {
    let GameState {
        config,
        projectiles,
        players,
        ball,
        events,
        ..
    } = state;

    for projectile in projectiles.iter_mut() {
        let Some(explosion) = projectile.explosion.as_mut() else {
            continue;
        };
        if explosion.applied {
            continue;
        }
        explosion.applied = true;

        let tuning = config.projectile(projectile.kind);
        let center = projectile.pos;

        for player in players.iter_mut() {
            if player.id == projectile.owner
                || player.room != projectile.room
                || !within_radius(player.pos(), center, explosion.radius)
            {
                continue;
            }
            if tuning.damage > 0 {
                let lost = player.apply_damage(tuning.damage);
                log::debug!(
                    "{:?} {} hit {:?} for {lost}",
                    projectile.kind,
                    projectile.id,
                    player.id
                );
                events.push(GameEvent::PlayerHit {
                    attacker: projectile.owner,
                    victim: player.id,
                    damage: lost,
                    cause: HitCause::Explosion,
                });
            }
            if tuning.knockback > 0.0 {
                let dir = direction_or(center, player.pos(), Vec2::Y);
                player.knock_back(dir, tuning.knockback);
                events.push(GameEvent::KnockedBack {
                    attacker: projectile.owner,
                    victim: player.id,
                });
            }
        }

        // Only spells push the ball around
        if projectile.kind != ProjectileKind::Spell {
            continue;
        }
        let (Some(ball), Some(ball_tuning)) = (ball.as_mut(), config.ball.as_ref()) else {
            continue;
        };
        if ball.room != projectile.room
            || !within_radius(ball.pos(), center, explosion.radius + ball.body.radius)
        {
            continue;
        }
        let normal = direction_or(center, ball.pos(), Vec2::Y);
        if ball.body.vel.dot(normal) < 0.0 {
            ball.bounce(normal, ball_tuning.explosion_bounce_scale);
        } else {
            ball.body.vel *= ball_tuning.explosion_bounce_scale;
        }
        ball.clamp_speed(ball_tuning.max_speed);
        events.push(GameEvent::BallDeflected {
            by: projectile.owner,
            explosion: true,
        });
    }
}

/// Ball bounces off the first player it touches (by id), then ignores players briefly
fn resolve_ball_contacts(state: &mut GameState) {
    let GameState {
        config,
        players,
        ball,
        events,
        ..
    } = state;
    let (Some(ball), Some(tuning)) = (ball.as_mut(), config.ball.as_ref()) else {
        return;
    };
    if ball.contact_cooldown > 0 {
        return;
    }

    for player in players.iter() {
        if player.room != ball.room {
            continue;
        }
        let reach = player.body.radius + ball.body.radius;
        if !within_radius(ball.pos(), player.pos(), reach) {
            continue;
        }

        let normal = direction_or(player.pos(), ball.pos(), Vec2::new(player.facing, 0.0));
        if ball.body.vel.dot(normal) < 0.0 {
            ball.bounce(normal, tuning.player_bounce_scale);
        } else {
            ball.body.vel *= tuning.player_bounce_scale;
        }
        ball.clamp_speed(tuning.max_speed);
        ball.body.pos = player.pos() + normal * reach;
        ball.contact_cooldown = tuning.contact_cooldown;
        events.push(GameEvent::BallDeflected {
            by: player.id,
            explosion: false,
        });
        break;
    }
}

/// A ball inside a goal band and between the mouth heights scores for the far side
fn resolve_goals(state: &mut GameState) {
    let GameState {
        config,
        rng,
        players,
        ball,
        events,
        frame,
        ..
    } = state;
    let (Some(ball), Some(tuning)) = (ball.as_mut(), config.ball.as_ref()) else {
        return;
    };

    let goal = &config.goal;
    let pos = ball.pos();
    let in_mouth = pos.y > goal.mouth_bottom && pos.y < goal.mouth_top;
    let scorer = if !in_mouth {
        None
    } else if pos.x < -goal.line {
        Some(PlayerId::Two)
    } else if pos.x > goal.line {
        Some(PlayerId::One)
    } else {
        None
    };

    if let Some(scorer) = scorer {
        let player = &mut players[scorer.index()];
        player.score = player.score.saturating_add(1);
        log::info!("Frame {frame}: goal for {scorer:?} ({} total)", player.score);
        ball.reset(tuning, rng);
        events.push(GameEvent::Goal { scorer });
    }
}

/// Closest player in the same room within pickup radius takes each clue; ties go to player one
fn resolve_pickups(state: &mut GameState) {
    let GameState {
        config,
        players,
        rooms,
        events,
        ..
    } = state;

    let mut occupied: Vec<RoomId> = players.iter().map(|p| p.room).collect();
    occupied.dedup();

    for room_id in occupied {
        let room = rooms.room_mut(room_id);
        for clue in room.clues.iter_mut().filter(|c| !c.collected) {
            let winner = players
                .iter()
                .filter(|p| p.room == room_id)
                .map(|p| (p.pos().distance(clue.pos), p.id))
                .filter(|(distance, _)| *distance < config.pickup_radius)
                .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

            let Some((_, id)) = winner else {
                continue;
            };
            if clue.collect() {
                players[id.index()].clues += 1;
                log::debug!("{id:?} collected clue {} in room {room_id}", clue.id);
                events.push(GameEvent::ClueCollected {
                    player: id,
                    room: room_id,
                    clue: clue.id,
                });
            }
        }
    }
}

/// Health at zero ends the match; so does reaching the score limit
///
/// Player one is checked first, so a double knockout goes to player two.
fn check_terminal(state: &mut GameState) {
    if state.status != GameStatus::Playing {
        return;
    }

    for id in PlayerId::ALL {
        if !state.player(id).is_alive() {
            state.set_status(GameStatus::won_by(id.other()));
            return;
        }
    }

    if let Some(limit) = state.config.score_to_win {
        for id in PlayerId::ALL {
            if state.player(id).score >= limit {
                state.set_status(GameStatus::won_by(id));
                return;
            }
        }
    }
}
