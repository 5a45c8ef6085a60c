//! Kinematic entities: players and the ball
//!
//! Both integrate the same way (gravity, tentative move, floor, platforms),
//! they only differ in how an impact changes their velocity.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::collision::{
    Contacts, Motion, Response, is_supported, reflect_velocity, resolve_ceiling, resolve_floor,
    resolve_platforms, resolve_side_walls,
};
use super::rooms::RoomId;
use crate::consts::COLLISION_EPSILON;
use crate::tuning::{BallTuning, PlayerTuning, SimConfig};

/// Distance a dropping player sinks into the platform it stands on
const DROP_NUDGE: f32 = 0.05;

/// Position and velocity shared by every moving entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Half extent of the square bounds
    pub radius: f32,
    /// Grounded (true) or airborne (false)
    pub on_ground: bool,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            on_ground: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::around(self.pos, self.radius)
    }

    /// Stand the body on top of any platform it is embedded in
    ///
    /// Used after placing a body by hand (spawns, door arrivals): the
    /// resolvers only stop bodies on their way in and never push one out.
    /// Returns whether the body moved.
    pub fn settle_on(&mut self, platforms: &[Aabb]) -> bool {
        let mut moved = false;
        // Each lift clears at least one platform for good
        for _ in 0..platforms.len() {
            let bounds = self.bounds();
            let Some(top) = platforms
                .iter()
                .filter(|p| bounds.penetrates(p, COLLISION_EPSILON))
                .map(|p| p.top)
                .reduce(f32::max)
            else {
                break;
            };
            self.pos.y = top + self.radius;
            self.vel.y = 0.0;
            self.on_ground = true;
            moved = true;
        }
        moved
    }
}

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Stable entity id handed to render collaborators
    #[inline]
    pub fn entity_id(self) -> u32 {
        self.index() as u32 + 1
    }
}

/// A player-controlled fighter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub body: Body,
    /// -1.0 (left) or 1.0 (right)
    pub facing: f32,
    pub health: u32,
    pub score: u32,
    pub clues: u32,
    /// Frames until the next punch
    pub attack_cooldown: u32,
    /// Frames until the next bomb/spell
    pub ability_cooldown: u32,
    /// Set by `punch` for exactly one combat evaluation
    pub attacking: bool,
    /// Drop through platforms this frame instead of landing on them
    pub dropping: bool,
    /// Room this player is in
    pub room: RoomId,
}

impl Player {
    pub fn new(id: PlayerId, pos: Vec2, room: RoomId, tuning: &PlayerTuning) -> Self {
        Self {
            id,
            body: Body::new(pos, tuning.radius),
            facing: if id == PlayerId::One { 1.0 } else { -1.0 },
            health: tuning.max_health,
            score: 0,
            clues: 0,
            attack_cooldown: 0,
            ability_cooldown: 0,
            attacking: false,
            dropping: false,
            room,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.body.on_ground
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn move_left(&mut self, speed: f32) {
        self.body.vel.x = -speed;
        self.facing = -1.0;
    }

    pub fn move_right(&mut self, speed: f32) {
        self.body.vel.x = speed;
        self.facing = 1.0;
    }

    /// Launch upward if grounded
    pub fn jump(&mut self, speed: f32) -> bool {
        if !self.body.on_ground {
            return false;
        }
        self.body.vel.y = speed;
        self.body.on_ground = false;
        true
    }

    /// Start a punch unless on cooldown
    pub fn punch(&mut self, cooldown: u32) -> bool {
        if self.attack_cooldown > 0 {
            return false;
        }
        self.attacking = true;
        self.attack_cooldown = cooldown;
        true
    }

    /// Consume the ability cooldown, returning whether the ability fires
    pub fn try_ability(&mut self, cooldown: u32) -> bool {
        if self.ability_cooldown > 0 {
            return false;
        }
        self.ability_cooldown = cooldown;
        true
    }

    /// Read and clear the one-frame attack flag
    pub fn take_attack(&mut self) -> bool {
        std::mem::take(&mut self.attacking)
    }

    /// Remove health (floored at zero), returning the amount actually lost
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.health);
        self.health -= lost;
        lost
    }

    /// Push the player away from an impact point
    pub fn knock_back(&mut self, direction: Vec2, strength: f32) {
        self.body.vel += direction * strength;
        if direction.y > 0.0 {
            self.body.on_ground = false;
        }
    }

    /// Whether one of `platforms` is directly underfoot (the floor does not count)
    pub fn standing_on_platform(&self, platforms: &[Aabb]) -> bool {
        platforms
            .iter()
            .any(|p| is_supported(self.body.pos, self.body.radius, p))
    }

    /// Integrate one frame against the platforms of the player's room
    pub fn update(&mut self, platforms: &[Aabb], config: &SimConfig) -> Contacts {
        let tuning = &config.player;
        if self.dropping && self.body.on_ground && self.standing_on_platform(platforms) {
            // Sink below the surface so the landing test no longer sees us above it
            self.body.pos.y -= DROP_NUDGE;
            self.body.on_ground = false;
        }
        if !self.body.on_ground {
            self.body.vel.y -= tuning.gravity;
        }

        let mut motion = Motion::new(self.body.pos, self.body.vel, self.body.radius);
        let mut contacts = resolve_floor(&mut motion, config.arena.floor, Response::Stop);
        contacts.merge(resolve_platforms(
            &mut motion,
            platforms,
            Response::Stop,
            !self.dropping,
        ));
        contacts.merge(resolve_side_walls(
            &mut motion,
            config.arena.left,
            config.arena.right,
        ));

        self.body.pos = motion.next;
        self.body.vel = motion.vel;
        // Grounded only while something was found beneath this frame
        self.body.on_ground = contacts.landed;

        if let Some(damping) = tuning.horizontal_damping {
            self.body.vel.x *= damping;
            if self.body.vel.x.abs() < 1e-3 {
                self.body.vel.x = 0.0;
            }
        }

        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
        self.ability_cooldown = self.ability_cooldown.saturating_sub(1);
        self.dropping = false;

        contacts
    }
}

/// The arena ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub body: Body,
    /// Room the ball plays in
    pub room: RoomId,
    /// Frames during which player contact is ignored
    pub contact_cooldown: u32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, room: RoomId) -> Self {
        let mut body = Body::new(pos, radius);
        body.vel = vel;
        Self {
            body,
            room,
            contact_cooldown: 0,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Reflect velocity about `normal` and scale its magnitude by `speed_scale`
    pub fn bounce(&mut self, normal: Vec2, speed_scale: f32) {
        let n = normal.normalize_or_zero();
        self.body.vel = reflect_velocity(self.body.vel, n) * speed_scale;
    }

    pub fn clamp_speed(&mut self, max_speed: f32) {
        self.body.vel = self.body.vel.clamp_length_max(max_speed);
    }

    /// Back to the spawn point with a new random velocity
    pub fn reset<R: Rng>(&mut self, tuning: &BallTuning, rng: &mut R) {
        self.body.pos = tuning.spawn;
        self.body.vel = launch_velocity(tuning, rng);
        self.contact_cooldown = 0;
    }

    /// Integrate one frame: platforms and floor/ceiling reflect, side bounds wrap
    pub fn update(&mut self, platforms: &[Aabb], config: &SimConfig, tuning: &BallTuning) -> Contacts {
        self.body.vel.y -= tuning.gravity;

        let mut motion = Motion::new(self.body.pos, self.body.vel, self.body.radius);
        let mut contacts = resolve_floor(&mut motion, config.arena.floor, Response::Reflect);
        contacts.merge(resolve_ceiling(
            &mut motion,
            config.arena.ceiling,
            Response::Reflect,
        ));
        contacts.merge(resolve_platforms(
            &mut motion,
            platforms,
            Response::Reflect,
            true,
        ));

        if motion.next.x < config.arena.left {
            motion.next.x = config.arena.right;
        } else if motion.next.x > config.arena.right {
            motion.next.x = config.arena.left;
        }

        self.body.pos = motion.next;
        self.body.vel = motion.vel;
        self.body.on_ground = false;
        self.contact_cooldown = self.contact_cooldown.saturating_sub(1);
        contacts
    }
}

/// Sample a serve velocity: random side, |vx| in the launch band, small rise
pub fn launch_velocity<R: Rng>(tuning: &BallTuning, rng: &mut R) -> Vec2 {
    let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let vx = rng.random_range(tuning.min_speed..=tuning.max_launch_speed) * side;
    let vy = if tuning.max_launch_rise > 0.0 {
        rng.random_range(-tuning.max_launch_rise..=tuning.max_launch_rise)
    } else {
        0.0
    };
    Vec2::new(vx, vy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spy() -> SimConfig {
        SimConfig::spy()
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(PlayerId::One, Vec2::new(x, y), 0, &spy().player)
    }

    #[test]
    fn test_player_falls_and_lands_on_floor() {
        let config = spy();
        let mut player = player_at(0.0, 3.0);
        for _ in 0..120 {
            player.update(&[], &config);
        }
        assert!(player.is_grounded());
        assert!((player.pos().y - config.player.radius).abs() < 1e-5);
        assert_eq!(player.body.vel.y, 0.0);
    }

    #[test]
    fn test_rests_on_higher_of_two_platforms() {
        let config = spy();
        let low = Aabb::new(-3.0, 1.9, 3.0, 2.1);
        let high = Aabb::new(-1.0, 3.9, 1.0, 4.1);
        let mut player = player_at(0.0, 6.0);
        for _ in 0..200 {
            player.update(&[low, high], &config);
        }
        assert!(player.is_grounded());
        assert!((player.pos().y - (high.top + config.player.radius)).abs() < 1e-5);
        assert_eq!(player.body.vel.y, 0.0);
    }

    #[test]
    fn test_walking_off_edge_becomes_airborne() {
        let config = spy();
        let ledge = Aabb::new(-1.0, 1.9, 1.0, 2.1);
        let mut player = player_at(0.0, 2.6);
        player.update(&[ledge], &config);
        assert!(player.is_grounded());

        player.move_right(config.player.move_speed);
        let mut left_ground = false;
        for _ in 0..40 {
            player.update(&[ledge], &config);
            if !player.is_grounded() {
                left_ground = true;
                break;
            }
        }
        assert!(left_ground);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let config = spy();
        let mut player = player_at(0.0, 0.5);
        player.update(&[], &config);
        assert!(player.jump(config.player.jump_speed));
        assert!(!player.is_grounded());
        assert!(!player.jump(config.player.jump_speed));
        player.update(&[], &config);
        assert!(player.pos().y > 0.5);
    }

    #[test]
    fn test_drop_through_platform() {
        let config = spy();
        let ledge = Aabb::new(-1.0, 1.9, 1.0, 2.1);
        let mut player = player_at(0.0, 2.6);
        player.update(&[ledge], &config);
        assert!(player.is_grounded());

        player.dropping = true;
        player.update(&[ledge], &config);
        assert!(!player.is_grounded());
        for _ in 0..120 {
            player.update(&[ledge], &config);
        }
        assert!((player.pos().y - config.player.radius).abs() < 1e-5);
    }

    #[test]
    fn test_drop_needs_a_platform_underfoot() {
        let config = spy();
        // Standing on the floor beside a ledge
        let ledge = Aabb::new(2.0, 1.9, 4.0, 2.1);
        let mut player = player_at(0.0, 0.5);
        player.update(&[ledge], &config);
        assert!(!player.standing_on_platform(&[ledge]));

        player.dropping = true;
        player.update(&[ledge], &config);
        assert!(player.is_grounded());
        assert!((player.pos().y - config.player.radius).abs() < 1e-5);

        let mut on_ledge = player_at(3.0, 2.6);
        on_ledge.update(&[ledge], &config);
        assert!(on_ledge.standing_on_platform(&[ledge]));
    }

    #[test]
    fn test_settle_lifts_body_out_of_platforms() {
        // Second platform sits right on top of the first
        let low = Aabb::new(-2.0, 0.9, 2.0, 1.1);
        let stacked = Aabb::new(-1.0, 1.5, 1.0, 1.7);
        let mut body = Body::new(Vec2::new(0.0, 1.0), 0.5);
        body.vel = Vec2::new(0.1, -0.2);

        assert!(body.settle_on(&[low, stacked]));
        assert!((body.pos.y - 2.2).abs() < 1e-5);
        assert_eq!(body.vel, Vec2::new(0.1, 0.0));
        assert!(body.on_ground);
        for platform in [low, stacked] {
            assert!(!body.bounds().penetrates(&platform, COLLISION_EPSILON));
        }

        // Already clear: untouched
        let before = body;
        assert!(!body.settle_on(&[low, stacked]));
        assert_eq!(body, before);
    }

    #[test]
    fn test_settled_player_stays_on_platform() {
        let config = spy();
        let ledge = Aabb::new(4.0, 0.9, 7.0, 1.1);
        let mut player = player_at(5.0, 1.0);
        player.body.settle_on(&[ledge]);
        for _ in 0..30 {
            player.update(&[ledge], &config);
        }
        assert!(player.is_grounded());
        assert!((player.pos().y - (ledge.top + config.player.radius)).abs() < 1e-5);
    }

    #[test]
    fn test_punch_cooldown_counts_down() {
        let config = spy();
        let mut player = player_at(0.0, 1.0);
        assert!(player.punch(config.melee.cooldown));
        assert!(player.attacking);
        assert_eq!(player.attack_cooldown, config.melee.cooldown);
        assert!(!player.punch(config.melee.cooldown));

        for _ in 0..config.melee.cooldown {
            player.update(&[], &config);
        }
        assert_eq!(player.attack_cooldown, 0);
        assert!(player.take_attack());
        assert!(!player.take_attack());
    }

    #[test]
    fn test_damping_is_configurable() {
        let mut config = spy();
        let mut player = player_at(0.0, 0.5);
        player.move_right(config.player.move_speed);
        player.update(&[], &config);
        assert_eq!(player.body.vel.x, config.player.move_speed);

        config.player.horizontal_damping = Some(0.5);
        player.update(&[], &config);
        assert!((player.body.vel.x - config.player.move_speed * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_side_walls_clamp_player() {
        let config = spy();
        let mut player = player_at(9.4, 0.5);
        player.move_right(config.player.move_speed);
        player.update(&[], &config);
        assert!((player.pos().x - (config.arena.right - config.player.radius)).abs() < 1e-5);
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut player = player_at(0.0, 0.5);
        assert_eq!(player.apply_damage(9), 9);
        assert_eq!(player.apply_damage(9), 1);
        assert_eq!(player.health, 0);
        assert!(!player.is_alive());
    }

    #[test]
    fn test_ball_wraps_horizontally() {
        let config = SimConfig::portal_pong();
        let tuning = config.ball.unwrap();
        let mut ball = Ball::new(Vec2::new(-9.95, 2.0), Vec2::new(-0.1, 0.0), tuning.radius, 0);
        ball.update(&[], &config, &tuning);
        assert_eq!(ball.pos().x, config.arena.right);
        assert!((ball.body.vel.x + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_ball_bounces_off_floor_and_ceiling() {
        let config = SimConfig::portal_pong();
        let tuning = config.ball.unwrap();
        let mut ball = Ball::new(Vec2::new(0.0, 0.35), Vec2::new(0.0, -0.1), tuning.radius, 0);
        ball.update(&[], &config, &tuning);
        assert!(ball.body.vel.y > 0.0);

        let mut ball = Ball::new(Vec2::new(0.0, 6.65), Vec2::new(0.0, 0.1), tuning.radius, 0);
        ball.update(&[], &config, &tuning);
        assert!(ball.body.vel.y < 0.0);
        assert!(ball.pos().y + tuning.radius <= config.arena.ceiling + 1e-5);
    }

    #[test]
    fn test_launch_velocity_in_range() {
        let tuning = BallTuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let v = launch_velocity(&tuning, &mut rng);
            assert!(v.x.abs() >= tuning.min_speed && v.x.abs() <= tuning.max_launch_speed);
            assert!(v.y.abs() <= tuning.max_launch_rise);
        }
    }

    proptest! {
        #[test]
        fn prop_bounce_mirrors_and_scales(
            vx in -1.0f32..1.0,
            vy in -1.0f32..1.0,
            angle in 0.0f32..std::f32::consts::TAU,
            scale in 0.5f32..2.0,
        ) {
            let v = Vec2::new(vx, vy);
            let n = Vec2::new(angle.cos(), angle.sin());
            let mut ball = Ball::new(Vec2::ZERO, v, 0.3, 0);
            ball.bounce(n, scale);
            let out = ball.body.vel;
            prop_assert!((out.length() - v.length() * scale).abs() < 1e-4);
            // Mirror: normal component flips, tangential component is kept
            prop_assert!((out.dot(n) + v.dot(n) * scale).abs() < 1e-4);
            let t = n.perp();
            prop_assert!((out.dot(t) - v.dot(t) * scale).abs() < 1e-4);
        }

        #[test]
        fn prop_health_stays_in_range(hits in proptest::collection::vec(0u32..12, 0..20)) {
            let config = SimConfig::spy();
            let mut player = Player::new(PlayerId::Two, Vec2::new(0.0, 0.5), 0, &config.player);
            for hit in hits {
                player.apply_damage(hit);
                prop_assert!(player.health <= config.player.max_health);
            }
        }
    }
}
