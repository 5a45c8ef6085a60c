//! Collision detection and response against static platforms
//!
//! Entities are circles approximated by their square bounds. Each frame a body
//! proposes a move from `prev` to `next`; the resolvers below correct `next`
//! and the velocity. Vertical contacts are resolved before horizontal ones and
//! the pre-move position decides which side a body came from, so a body that
//! is already overlapping a platform is never misclassified as landing on it.

use glam::Vec2;

use super::aabb::Aabb;
use crate::consts::COLLISION_EPSILON;

/// What happens to the velocity component on the axis of impact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Zero it (players)
    Stop,
    /// Flip its sign (ball)
    Reflect,
}

impl Response {
    #[inline]
    fn apply(self, v: f32) -> f32 {
        match self {
            Response::Stop => 0.0,
            Response::Reflect => -v,
        }
    }
}

/// A tentative move for one frame
#[derive(Debug, Clone, Copy)]
pub struct Motion {
    /// Position before the move
    pub prev: Vec2,
    /// Proposed position, corrected in place
    pub next: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Motion {
    pub fn new(prev: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            prev,
            next: prev + vel,
            vel,
            radius,
        }
    }

    #[inline]
    fn bounds(&self) -> Aabb {
        Aabb::around(self.next, self.radius)
    }

    #[inline]
    fn prev_bounds(&self) -> Aabb {
        Aabb::around(self.prev, self.radius)
    }
}

/// Sides blocked while resolving one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Came to rest on top of a platform or the floor
    pub landed: bool,
    /// Hit the underside of a platform or the ceiling
    pub ceiling: bool,
    /// Blocked while moving left
    pub wall_left: bool,
    /// Blocked while moving right
    pub wall_right: bool,
}

impl Contacts {
    pub fn merge(&mut self, other: Contacts) {
        self.landed |= other.landed;
        self.ceiling |= other.ceiling;
        self.wall_left |= other.wall_left;
        self.wall_right |= other.wall_right;
    }
}

/// Resolve the vertical axis against one platform
///
/// A body lands only if its previous bottom was at or above the platform top,
/// and bumps its head only if its previous top was at or below the bottom.
pub fn resolve_vertical(
    motion: &mut Motion,
    platform: &Aabb,
    response: Response,
    allow_landing: bool,
) -> Contacts {
    let mut contacts = Contacts::default();
    let body = motion.bounds();
    if !body.overlaps_x(platform) {
        return contacts;
    }

    let prev = motion.prev_bounds();
    if allow_landing
        && body.bottom <= platform.top + COLLISION_EPSILON
        && prev.bottom >= platform.top - COLLISION_EPSILON
    {
        motion.next.y = platform.top + motion.radius;
        motion.vel.y = response.apply(motion.vel.y);
        contacts.landed = true;
    } else if body.top >= platform.bottom && prev.top <= platform.bottom + COLLISION_EPSILON {
        motion.next.y = platform.bottom - motion.radius;
        motion.vel.y = response.apply(motion.vel.y);
        contacts.ceiling = true;
    }
    contacts
}

/// Resolve the horizontal axis against one platform
///
/// Only bodies overlapping the platform vertically (deeper than the collision
/// epsilon) can be blocked, so a body resting on a top edge slides freely.
pub fn resolve_horizontal(motion: &mut Motion, platform: &Aabb, response: Response) -> Contacts {
    let mut contacts = Contacts::default();
    let body = motion.bounds();
    if body.penetration(platform).y <= COLLISION_EPSILON {
        return contacts;
    }

    let prev = motion.prev_bounds();
    if body.right >= platform.left && prev.right <= platform.left + COLLISION_EPSILON {
        motion.next.x = platform.left - motion.radius;
        motion.vel.x = response.apply(motion.vel.x);
        contacts.wall_right = true;
    } else if body.left <= platform.right && prev.left >= platform.right - COLLISION_EPSILON {
        motion.next.x = platform.right + motion.radius;
        motion.vel.x = response.apply(motion.vel.x);
        contacts.wall_left = true;
    }
    contacts
}

/// Resolve a move against a platform set: every vertical contact first, then
/// every horizontal one, then vertical again if a wall moved the body back
pub fn resolve_platforms(
    motion: &mut Motion,
    platforms: &[Aabb],
    response: Response,
    allow_landing: bool,
) -> Contacts {
    let mut contacts = Contacts::default();
    for platform in platforms {
        contacts.merge(resolve_vertical(motion, platform, response, allow_landing));
    }
    let mut sideways = Contacts::default();
    for platform in platforms {
        sideways.merge(resolve_horizontal(motion, platform, response));
    }
    if sideways.wall_left || sideways.wall_right {
        // Pushed back into a platform the first pass did not overlap
        for platform in platforms {
            if motion.bounds().penetrates(platform, COLLISION_EPSILON) {
                contacts.merge(resolve_vertical(motion, platform, response, allow_landing));
            }
        }
    }
    contacts.merge(sideways);
    contacts
}

/// Keep a body above the floor (hard lower bound)
pub fn resolve_floor(motion: &mut Motion, floor: f32, response: Response) -> Contacts {
    let mut contacts = Contacts::default();
    if motion.next.y - motion.radius <= floor + COLLISION_EPSILON {
        motion.next.y = floor + motion.radius;
        motion.vel.y = match response {
            Response::Stop => 0.0,
            Response::Reflect => motion.vel.y.abs(),
        };
        contacts.landed = true;
    }
    contacts
}

/// Keep a body below the ceiling
pub fn resolve_ceiling(motion: &mut Motion, ceiling: f32, response: Response) -> Contacts {
    let mut contacts = Contacts::default();
    if motion.next.y + motion.radius >= ceiling {
        motion.next.y = ceiling - motion.radius;
        motion.vel.y = match response {
            Response::Stop => motion.vel.y.min(0.0),
            Response::Reflect => -motion.vel.y.abs(),
        };
        contacts.ceiling = true;
    }
    contacts
}

/// Clamp a body between two side walls
pub fn resolve_side_walls(motion: &mut Motion, left: f32, right: f32) -> Contacts {
    let mut contacts = Contacts::default();
    if motion.next.x - motion.radius < left {
        motion.next.x = left + motion.radius;
        motion.vel.x = motion.vel.x.max(0.0);
        contacts.wall_left = true;
    } else if motion.next.x + motion.radius > right {
        motion.next.x = right - motion.radius;
        motion.vel.x = motion.vel.x.min(0.0);
        contacts.wall_right = true;
    }
    contacts
}

/// Whether a body at `pos` stands on top of `platform`
pub fn is_supported(pos: Vec2, radius: f32, platform: &Aabb) -> bool {
    let body = Aabb::around(pos, radius);
    body.overlaps_x(platform) && (body.bottom - platform.top).abs() <= COLLISION_EPSILON
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Circle-vs-point proximity
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}
