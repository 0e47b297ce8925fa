//! Suspension corners and per-corner containers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the four suspension positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Corner {
    Lf,
    Rf,
    Lr,
    Rr,
}

/// Lateral side of the car
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Front or rear subassembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axle {
    Front,
    Rear,
}

impl Corner {
    /// All corners in survey order
    pub const ALL: [Corner; 4] = [Corner::Lf, Corner::Rf, Corner::Lr, Corner::Rr];

    pub fn side(self) -> Side {
        match self {
            Corner::Lf | Corner::Lr => Side::Left,
            Corner::Rf | Corner::Rr => Side::Right,
        }
    }

    pub fn axle(self) -> Axle {
        match self {
            Corner::Lf | Corner::Rf => Axle::Front,
            Corner::Lr | Corner::Rr => Axle::Rear,
        }
    }

    /// Lowercase key used in column mapping field names ("lf", "rf", ...)
    pub fn key(self) -> &'static str {
        match self {
            Corner::Lf => "lf",
            Corner::Rf => "rf",
            Corner::Lr => "lr",
            Corner::Rr => "rr",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corner::Lf => write!(f, "LF"),
            Corner::Rf => write!(f, "RF"),
            Corner::Lr => write!(f, "LR"),
            Corner::Rr => write!(f, "RR"),
        }
    }
}

impl Axle {
    /// The axle's (left, right) corners. The left corner carries double
    /// weight in axle scores.
    pub fn corners(self) -> [Corner; 2] {
        match self {
            Axle::Front => [Corner::Lf, Corner::Rf],
            Axle::Rear => [Corner::Lr, Corner::Rr],
        }
    }
}

impl fmt::Display for Axle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axle::Front => write!(f, "front"),
            Axle::Rear => write!(f, "rear"),
        }
    }
}

/// One value per corner, indexable by [`Corner`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerCorner<T> {
    pub lf: T,
    pub rf: T,
    pub lr: T,
    pub rr: T,
}

impl<T> PerCorner<T> {
    pub fn new(lf: T, rf: T, lr: T, rr: T) -> Self {
        Self { lf, rf, lr, rr }
    }

    /// Build by evaluating `f` for each corner
    pub fn from_fn(mut f: impl FnMut(Corner) -> T) -> Self {
        Self {
            lf: f(Corner::Lf),
            rf: f(Corner::Rf),
            lr: f(Corner::Lr),
            rr: f(Corner::Rr),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Corner, &T) -> U) -> PerCorner<U> {
        PerCorner {
            lf: f(Corner::Lf, &self.lf),
            rf: f(Corner::Rf, &self.rf),
            lr: f(Corner::Lr, &self.lr),
            rr: f(Corner::Rr, &self.rr),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Corner, &T)> {
        Corner::ALL.into_iter().map(move |c| (c, &self[c]))
    }
}

impl<T> Index<Corner> for PerCorner<T> {
    type Output = T;

    fn index(&self, corner: Corner) -> &T {
        match corner {
            Corner::Lf => &self.lf,
            Corner::Rf => &self.rf,
            Corner::Lr => &self.lr,
            Corner::Rr => &self.rr,
        }
    }
}

impl<T> IndexMut<Corner> for PerCorner<T> {
    fn index_mut(&mut self, corner: Corner) -> &mut T {
        match corner {
            Corner::Lf => &mut self.lf,
            Corner::Rf => &mut self.rf,
            Corner::Lr => &mut self.lr,
            Corner::Rr => &mut self.rr,
        }
    }
}
