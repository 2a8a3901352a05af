//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Side length of the square board
pub const GRID_SIZE: usize = 20;

/// Rows owned by the AI, at the top of the board
pub const AI_ZONE: ZoneBounds = ZoneBounds { start: 0, end: 7 };
/// Combat band in the middle of the board
pub const NEUTRAL_ZONE: ZoneBounds = ZoneBounds { start: 8, end: 11 };
/// Rows owned by the player, at the bottom of the board
pub const PLAYER_ZONE: ZoneBounds = ZoneBounds { start: 12, end: 19 };

/// Unique identifier for a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub Uuid);

impl MatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The side a live cell belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Owner {
    #[default]
    None,
    Player,
    Ai,
    Neutral,
}

/// One of the two competing sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub fn owner(self) -> Owner {
        match self {
            Side::Player => Owner::Player,
            Side::Ai => Owner::Ai,
        }
    }

    /// The band this side seeds during placement
    pub fn home_zone(self) -> Zone {
        match self {
            Side::Player => Zone::Player,
            Side::Ai => Zone::Ai,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Ai => write!(f, "ai"),
        }
    }
}

/// Board cell state. A dead cell never carries an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub alive: bool,
    pub owner: Owner,
}

impl Cell {
    pub fn empty() -> Self {
        Self {
            alive: false,
            owner: Owner::None,
        }
    }

    pub fn alive(owner: Owner) -> Self {
        if owner == Owner::None {
            return Self::empty();
        }
        Self { alive: true, owner }
    }

    /// Enforce `!alive => owner == None` (and the converse)
    pub fn normalized(self) -> Self {
        if self.alive {
            Self::alive(self.owner)
        } else {
            Self::empty()
        }
    }
}

/// Horizontal band of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Ai,
    Neutral,
    Player,
}

impl Zone {
    pub fn of_row(row: usize) -> Zone {
        if row <= AI_ZONE.end {
            Zone::Ai
        } else if row <= NEUTRAL_ZONE.end {
            Zone::Neutral
        } else {
            Zone::Player
        }
    }

    pub fn bounds(self) -> ZoneBounds {
        match self {
            Zone::Ai => AI_ZONE,
            Zone::Neutral => NEUTRAL_ZONE,
            Zone::Player => PLAYER_ZONE,
        }
    }

    /// Owner given to cells born in this band outside the combat rules
    pub fn native_owner(self) -> Owner {
        match self {
            Zone::Ai => Owner::Ai,
            Zone::Neutral => Owner::Neutral,
            Zone::Player => Owner::Player,
        }
    }
}

/// Inclusive row range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneBounds {
    pub start: usize,
    pub end: usize,
}

impl ZoneBounds {
    pub fn contains(&self, row: usize) -> bool {
        row >= self.start && row <= self.end
    }

    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Board coordinate, row 0 at the AI edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offset by a signed delta, `None` when it leaves the board
    pub fn offset(&self, dr: i32, dc: i32) -> Option<Coord> {
        let row = self.row as i32 + dr;
        let col = self.col as i32 + dc;
        let size = GRID_SIZE as i32;
        if row < 0 || row >= size || col < 0 || col >= size {
            return None;
        }
        Some(Coord::new(row as usize, col as usize))
    }

    /// The 8-connected Moore neighborhood clipped to the board
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        NEIGHBOR_DELTAS
            .iter()
            .filter_map(move |&(dr, dc)| self.offset(dr, dc))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

const NEIGHBOR_DELTAS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Alive-cell tally per owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OwnerCounts {
    pub player: usize,
    pub ai: usize,
    pub neutral: usize,
}

impl OwnerCounts {
    pub fn new(player: usize, ai: usize, neutral: usize) -> Self {
        Self {
            player,
            ai,
            neutral,
        }
    }

    pub fn add(&mut self, owner: Owner) {
        match owner {
            Owner::Player => self.player += 1,
            Owner::Ai => self.ai += 1,
            Owner::Neutral => self.neutral += 1,
            Owner::None => {}
        }
    }

    pub fn get(&self, owner: Owner) -> usize {
        match owner {
            Owner::Player => self.player,
            Owner::Ai => self.ai,
            Owner::Neutral => self.neutral,
            Owner::None => 0,
        }
    }

    pub fn side(&self, side: Side) -> usize {
        self.get(side.owner())
    }

    pub fn total(&self) -> usize {
        self.player + self.ai + self.neutral
    }

    /// Owner whose count strictly exceeds both others; any tie goes to Neutral
    pub fn dominant(&self) -> Owner {
        if self.player > self.ai && self.player > self.neutral {
            Owner::Player
        } else if self.ai > self.player && self.ai > self.neutral {
            Owner::Ai
        } else {
            Owner::Neutral
        }
    }
}

impl FromIterator<Owner> for OwnerCounts {
    fn from_iter<I: IntoIterator<Item = Owner>>(iter: I) -> Self {
        let mut counts = OwnerCounts::default();
        for owner in iter {
            counts.add(owner);
        }
        counts
    }
}

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Placement,
    Combat,
    RoundEnding,
    Ended,
}

/// Outcome of a round or a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player,
    Ai,
    Draw,
}

impl Winner {
    pub fn from_scores(player: i64, ai: i64) -> Self {
        if player > ai {
            Winner::Player
        } else if ai > player {
            Winner::Ai
        } else {
            Winner::Draw
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Player => write!(f, "player"),
            Winner::Ai => write!(f, "ai"),
            Winner::Draw => write!(f, "draw"),
        }
    }
}
