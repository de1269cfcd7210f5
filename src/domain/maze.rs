//! Maze assembly: rooms with walls and doors, built through a validating builder.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::optional::OptionalBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    Up,
    Down,
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Up => Side::Down,
            Side::Down => Side::Up,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Up => "up",
            Side::Down => "down",
            Side::Left => "left",
            Side::Right => "right",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wall {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Door {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: u32,
    pub name: String,
    pub walls: BTreeMap<Side, Wall>,
    pub doors: BTreeMap<Side, Door>,
}

impl Room {
    fn new(id: u32) -> Self {
        Self {
            id,
            name: format!("room-{id}"),
            walls: BTreeMap::new(),
            doors: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Maze {
    pub rooms: BTreeMap<u32, Room>,
}

impl Maze {
    pub fn room(&self, id: u32) -> OptionalBox<&Room> {
        self.rooms.get(&id).into()
    }

    pub fn door_count(&self) -> usize {
        self.rooms.values().map(|r| r.doors.len()).sum()
    }
}

/// Builds a [`Maze`] step by step, rejecting inconsistent calls.
///
/// A rejected call leaves the maze under construction unchanged.
#[derive(Debug, Default)]
pub struct MazeBuilder {
    maze: Maze,
}

impl MazeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.maze = Maze::default();
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_room(&mut self, id: u32) -> DomainResult<&mut Self> {
        if self.maze.rooms.contains_key(&id) {
            return Err(DomainError::duplicate("room", id));
        }
        self.maze.rooms.insert(id, Room::new(id));
        Ok(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_wall(&mut self, room_id: u32, side: Side, wall_id: u32) -> DomainResult<&mut Self> {
        let room = self.room_mut(room_id)?;
        if room.walls.contains_key(&side) {
            return Err(DomainError::structural(format!(
                "room {room_id} already has a wall on the {side} side"
            )));
        }
        room.walls.insert(
            side,
            Wall {
                id: wall_id,
                name: format!("wall-{wall_id}-{side}"),
            },
        );
        Ok(self)
    }

    /// Place a door in an existing wall.
    ///
    /// Some other room must have a wall on the opposite side, otherwise the
    /// door would lead nowhere.
    #[instrument(level = "debug", skip(self))]
    pub fn add_door(&mut self, room_id: u32, side: Side, door_id: u32) -> DomainResult<&mut Self> {
        let room = self
            .maze
            .rooms
            .get(&room_id)
            .ok_or_else(|| missing_room(room_id))?;
        if room.doors.contains_key(&side) {
            return Err(DomainError::structural(format!(
                "room {room_id} already has a door on the {side} side"
            )));
        }
        if !room.walls.contains_key(&side) {
            return Err(DomainError::structural(format!(
                "door {door_id}: room {room_id} has no wall on the {side} side"
            )));
        }
        let opposite = side.opposite();
        let has_neighbor = self
            .maze
            .rooms
            .values()
            .any(|other| other.id != room_id && other.walls.contains_key(&opposite));
        if !has_neighbor {
            return Err(DomainError::structural(format!(
                "no room connected on the {side} side of room {room_id}"
            )));
        }

        debug!("placing door {} in room {}", door_id, room_id);
        self.room_mut(room_id)?.doors.insert(
            side,
            Door {
                id: door_id,
                name: format!("door-{door_id}-{side}"),
            },
        );
        Ok(self)
    }

    /// Hand out the maze and start over with an empty one.
    pub fn build(&mut self) -> Maze {
        std::mem::take(&mut self.maze)
    }

    fn room_mut(&mut self, id: u32) -> DomainResult<&mut Room> {
        self.maze.rooms.get_mut(&id).ok_or_else(|| missing_room(id))
    }
}

fn missing_room(id: u32) -> DomainError {
    DomainError::structural(format!("room {id} does not exist"))
}
