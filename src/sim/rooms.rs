//! Room graph and door transitions
//!
//! Rooms sit on a fixed grid. Each room has a left and a right door leading
//! to the room beside it on the same row; doors at the grid edge lead
//! nowhere and are inert. Corridor `connections` are rolled separately and
//! only feed the minimap. Player two spawns in a room player one can walk to.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::platforms::{clue_spots, generate_platforms};
use crate::tuning::SimConfig;

/// Index of a room in the graph
pub type RoomId = usize;

/// Which wall a door is set in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorSide {
    Left,
    Right,
}

/// A door (portal) to a neighbouring room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Door {
    pub pos: Vec2,
    pub side: DoorSide,
    /// `None` for doors at the edge of the grid
    pub target: Option<RoomId>,
}

impl Door {
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.target.is_some()
    }

    /// x coordinate a traveller lands at in the target room (the opposite wall)
    pub fn arrival_x(&self, exit_x: f32) -> f32 {
        match self.side {
            DoorSide::Right => -exit_x,
            DoorSide::Left => exit_x,
        }
    }
}

/// A collectible clue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clue {
    pub id: u32,
    pub pos: Vec2,
    pub collected: bool,
}

impl Clue {
    /// Mark collected; false if it already was
    pub fn collect(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }
}

/// A single room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Grid column
    pub x: u32,
    /// Grid row
    pub y: u32,
    pub platforms: Vec<Aabb>,
    pub left_door: Door,
    pub right_door: Door,
    pub clues: Vec<Clue>,
    pub discovered: bool,
    /// Corridor links to grid neighbours
    pub connections: Vec<RoomId>,
}

impl Room {
    pub fn doors(&self) -> [&Door; 2] {
        [&self.left_door, &self.right_door]
    }

    pub fn remaining_clues(&self) -> usize {
        self.clues.iter().filter(|c| !c.collected).count()
    }
}

/// Where a player ends up after walking through a door
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transit {
    pub from: RoomId,
    pub to: RoomId,
    pub arrival_x: f32,
}

/// All rooms of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomGraph {
    rooms: Vec<Room>,
    columns: u32,
    rows: u32,
}

impl RoomGraph {
    /// Build the grid, roll corridors, then give every room its layout and doors
    pub fn generate<R: Rng>(config: &SimConfig, rng: &mut R, next_id: &mut u32) -> Self {
        let tuning = &config.rooms;
        let mut rooms: Vec<Room> = (0..tuning.count)
            .map(|i| {
                let (x, y) = (i % tuning.columns, i / tuning.columns);
                Room {
                    id: i as RoomId,
                    x,
                    y,
                    platforms: Vec::new(),
                    left_door: Door {
                        pos: Vec2::new(-tuning.door_x, tuning.door_y),
                        side: DoorSide::Left,
                        target: None,
                    },
                    right_door: Door {
                        pos: Vec2::new(tuning.door_x, tuning.door_y),
                        side: DoorSide::Right,
                        target: None,
                    },
                    clues: Vec::new(),
                    discovered: i == 0,
                    connections: Vec::new(),
                }
            })
            .collect();

        // Each room links to one random neighbour it is not linked to yet
        for i in 0..rooms.len() {
            let candidates: Vec<RoomId> = rooms
                .iter()
                .filter(|r| {
                    r.id != i
                        && manhattan(&rooms[i], r) == 1
                        && !rooms[i].connections.contains(&r.id)
                })
                .map(|r| r.id)
                .collect();
            if candidates.is_empty() {
                continue;
            }
            let target = candidates[rng.random_range(0..candidates.len())];
            rooms[i].connections.push(target);
            rooms[target].connections.push(i);
        }

        let mut graph = Self {
            rooms,
            columns: tuning.columns,
            rows: tuning.rows,
        };

        for i in 0..graph.rooms.len() {
            let platforms = generate_platforms(&config.platforms, rng);
            let spots = clue_spots(&platforms, tuning.clues_per_room, config.arena.floor, rng);
            let (x, y) = (graph.rooms[i].x, graph.rooms[i].y);
            let left = x.checked_sub(1).and_then(|lx| graph.room_at(lx, y));
            let right = graph.room_at(x + 1, y);

            let room = &mut graph.rooms[i];
            room.platforms = platforms;
            room.clues = spots
                .into_iter()
                .map(|pos| {
                    let id = *next_id;
                    *next_id += 1;
                    Clue {
                        id,
                        pos,
                        collected: false,
                    }
                })
                .collect();
            room.left_door.target = left;
            room.right_door.target = right;
        }

        log::info!(
            "Generated {} rooms on a {}x{} grid",
            graph.rooms.len(),
            graph.columns,
            graph.rows
        );
        graph
    }

    /// Look up a room
    ///
    /// # Panics
    /// If `id` is not in the graph; a dangling id means the graph is corrupt.
    pub fn room(&self, id: RoomId) -> &Room {
        match self.rooms.get(id) {
            Some(room) => room,
            None => panic!("room {id} does not exist ({} rooms)", self.rooms.len()),
        }
    }

    /// Mutable variant of [`RoomGraph::room`]
    ///
    /// # Panics
    /// If `id` is not in the graph.
    pub fn room_mut(&mut self, id: RoomId) -> &mut Room {
        let len = self.rooms.len();
        match self.rooms.get_mut(id) {
            Some(room) => room,
            None => panic!("room {id} does not exist ({len} rooms)"),
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Room at a grid cell, if the grid has one there
    pub fn room_at(&self, x: u32, y: u32) -> Option<RoomId> {
        if x >= self.columns {
            return None;
        }
        let id = (y * self.columns + x) as RoomId;
        (id < self.rooms.len()).then_some(id)
    }

    /// Rooms at Manhattan distance 1
    pub fn neighbors(&self, id: RoomId) -> Vec<RoomId> {
        let room = self.room(id);
        self.rooms
            .iter()
            .filter(|r| manhattan(room, r) == 1)
            .map(|r| r.id)
            .collect()
    }

    /// Rooms a player in `start` can walk to through doors, in id order
    pub fn reachable_from(&self, start: RoomId) -> Vec<RoomId> {
        let mut seen = vec![false; self.rooms.len()];
        let mut queue = VecDeque::from([start]);
        seen[self.room(start).id] = true;
        while let Some(id) = queue.pop_front() {
            for door in self.room(id).doors() {
                if let Some(to) = door.target.filter(|&to| !seen[to]) {
                    seen[to] = true;
                    queue.push_back(to);
                }
            }
        }
        seen.iter()
            .enumerate()
            .filter_map(|(id, &reached)| reached.then_some(id))
            .collect()
    }

    /// Spawn rooms: the top-left corner for player one, and for player two the
    /// highest-numbered room player one can walk to (the same room if none)
    pub fn spawn_rooms(&self) -> (RoomId, RoomId) {
        let first = self.room_at(0, 0).unwrap_or(0);
        let second = self
            .reachable_from(first)
            .last()
            .copied()
            .unwrap_or(first);
        (first, second)
    }

    /// Mark a room discovered, returning true on first discovery
    pub fn discover(&mut self, id: RoomId) -> bool {
        !std::mem::replace(&mut self.room_mut(id).discovered, true)
    }

    /// First connected door of `room` within `radius` of `pos`
    pub fn crossing(&self, room: RoomId, pos: Vec2, radius: f32, exit_x: f32) -> Option<Transit> {
        self.room(room)
            .doors()
            .into_iter()
            .filter(|door| door.pos.distance(pos) < radius)
            .find_map(|door| {
                door.target.map(|to| Transit {
                    from: room,
                    to,
                    arrival_x: door.arrival_x(exit_x),
                })
            })
    }
}

fn manhattan(a: &Room, b: &Room) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}
