//! Bombs and spells
//!
//! A projectile flies (or sits, for planted bombs) until its lifetime runs
//! out or something sets it off, then turns into an explosion record that
//! lingers for a fixed number of frames before it is dropped. The explosion's
//! effect is applied once, by the combat resolver.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::within_radius;
use super::entity::PlayerId;
use super::rooms::RoomId;
use super::state::{GameEvent, GameState};
use crate::facing_sign;
use crate::tuning::ProjectileTuning;

/// Projectile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProjectileKind {
    /// Planted, long fuse, damages opponents
    #[default]
    Bomb,
    /// Thrown, short flight, knocks opponents and the ball away
    Spell,
}

/// Area effect left behind by a detonation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub radius: f32,
    /// Frames left before the record is dropped
    pub remaining: u32,
    /// Damage/deflection already handed out
    pub applied: bool,
}

/// A bomb or spell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    /// Never affected by its own explosion
    pub owner: PlayerId,
    pub room: RoomId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames of flight left
    pub lifetime: u32,
    /// Set once detonated
    pub explosion: Option<Explosion>,
}

impl Projectile {
    /// Place a projectile ahead of its owner along the owner's facing
    pub fn spawn(
        id: u32,
        kind: ProjectileKind,
        owner: PlayerId,
        room: RoomId,
        owner_pos: Vec2,
        facing: f32,
        tuning: &ProjectileTuning,
    ) -> Self {
        let dir = Vec2::new(facing_sign(facing), 0.0);
        Self {
            id,
            kind,
            owner,
            room,
            pos: owner_pos + dir * tuning.spawn_offset,
            vel: dir * tuning.speed,
            lifetime: tuning.lifetime,
            explosion: None,
        }
    }

    #[inline]
    pub fn is_exploded(&self) -> bool {
        self.explosion.is_some()
    }

    /// Switch to the exploded state; false if already exploded
    pub fn detonate(&mut self, tuning: &ProjectileTuning) -> bool {
        if self.is_exploded() {
            return false;
        }
        self.lifetime = 0;
        self.vel = Vec2::ZERO;
        self.explosion = Some(Explosion {
            radius: tuning.radius,
            remaining: tuning.display_frames,
            applied: false,
        });
        true
    }

    /// Advance one frame, returning true once the projectile should be removed
    pub fn update(&mut self, tuning: &ProjectileTuning) -> bool {
        match self.explosion.as_mut() {
            None => {
                self.pos += self.vel;
                self.lifetime = self.lifetime.saturating_sub(1);
                if self.lifetime == 0 {
                    self.detonate(tuning);
                }
                false
            }
            Some(explosion) => {
                explosion.remaining = explosion.remaining.saturating_sub(1);
                explosion.remaining == 0
            }
        }
    }
}

/// Move every projectile, set off the ones that hit something, drop expired explosions
pub fn advance_projectiles(state: &mut GameState) {
    let GameState {
        config,
        projectiles,
        rooms,
        players,
        ball,
        events,
        ..
    } = state;

    projectiles.retain_mut(|p| {
        let tuning = config.projectile(p.kind);
        let was_flying = !p.is_exploded();
        let remove = p.update(tuning);

        if was_flying && !p.is_exploded() {
            let room = rooms.room(p.room);
            let out_of_arena = p.pos.x < config.arena.left || p.pos.x > config.arena.right;
            let hit_platform = p.kind == ProjectileKind::Spell
                && room.platforms.iter().any(|platform| platform.contains_point(p.pos));
            let triggered = tuning.trigger_radius.is_some_and(|trigger| {
                let near_opponent = players.iter().any(|player| {
                    player.id != p.owner
                        && player.room == p.room
                        && within_radius(player.pos(), p.pos, trigger + player.body.radius)
                });
                let near_ball = ball.as_ref().is_some_and(|b| {
                    b.room == p.room && within_radius(b.pos(), p.pos, trigger + b.body.radius)
                });
                near_opponent || near_ball
            });
            if out_of_arena || hit_platform || triggered {
                p.detonate(tuning);
            }
        }

        if was_flying && p.is_exploded() {
            log::debug!("{:?} {} from {:?} detonated at {}", p.kind, p.id, p.owner, p.pos);
            events.push(GameEvent::Detonated {
                id: p.id,
                kind: p.kind,
                owner: p.owner,
                pos: p.pos,
            });
        }
        if remove {
            events.push(GameEvent::ExplosionExpired { id: p.id });
        }
        !remove
    });
}
