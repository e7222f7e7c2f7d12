//! The six canonical camera views and a fixed-size map keyed by them.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the six orthogonal views every object is photographed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
    Left,
    Right,
    Top,
    Down,
}

impl Side {
    /// All sides in canonical order
    pub const ALL: [Side; 6] = [
        Side::Front,
        Side::Back,
        Side::Left,
        Side::Right,
        Side::Top,
        Side::Down,
    ];

    /// Lowercase name used in file names and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
            Side::Left => "left",
            Side::Right => "right",
            Side::Top => "top",
            Side::Down => "down",
        }
    }

    /// Parse a side name, ignoring case
    pub fn parse(name: &str) -> Option<Self> {
        Side::ALL
            .into_iter()
            .find(|side| side.as_str().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per side.
///
/// Cardinality is fixed at six, so lookups can never miss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideMap<T> {
    pub front: T,
    pub back: T,
    pub left: T,
    pub right: T,
    pub top: T,
    pub down: T,
}

impl<T> SideMap<T> {
    /// Build a map by evaluating `f` for every side in canonical order
    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Self {
            front: f(Side::Front),
            back: f(Side::Back),
            left: f(Side::Left),
            right: f(Side::Right),
            top: f(Side::Top),
            down: f(Side::Down),
        }
    }

    /// Like [`SideMap::from_fn`], stopping at the first error
    pub fn try_from_fn<E>(mut f: impl FnMut(Side) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            front: f(Side::Front)?,
            back: f(Side::Back)?,
            left: f(Side::Left)?,
            right: f(Side::Right)?,
            top: f(Side::Top)?,
            down: f(Side::Down)?,
        })
    }

    /// Iterate `(side, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> + '_ {
        Side::ALL.into_iter().map(move |side| (side, &self[side]))
    }
}

impl<T: Clone> SideMap<T> {
    /// The same value on every side
    pub fn uniform(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
            Side::Left => &self.left,
            Side::Right => &self.right,
            Side::Top => &self.top,
            Side::Down => &self.down,
        }
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Front => &mut self.front,
            Side::Back => &mut self.back,
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
            Side::Top => &mut self.top,
            Side::Down => &mut self.down,
        }
    }
}
