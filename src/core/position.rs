//! Grid Position
//!
//! Integer 2D vector used both as an absolute grid coordinate and as a
//! displacement. Rows grow downwards: `y + 1` is the cell below.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};
use serde::{Serialize, Deserialize};

/// 2D integer vector on the tile grid.
///
/// The derived `Ord` is lexicographic and only exists so positions can live
/// in ordered sets. Use [`Position::magnitude_cmp`] to compare lengths.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Column
    pub x: i32,
    /// Row (grows downwards)
    pub y: i32,
}

impl Position {
    /// Zero displacement
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// One row up
    pub const UP: Self = Self { x: 0, y: -1 };

    /// One row down
    pub const DOWN: Self = Self { x: 0, y: 1 };

    /// One column left
    pub const LEFT: Self = Self { x: -1, y: 0 };

    /// One column right
    pub const RIGHT: Self = Self { x: 1, y: 0 };

    /// Create a new position.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Add another position.
    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self {
            x: self.x.wrapping_add(other.x),
            y: self.y.wrapping_add(other.y),
        }
    }

    /// Subtract another position.
    #[inline]
    pub fn sub(self, other: Self) -> Self {
        Self {
            x: self.x.wrapping_sub(other.x),
            y: self.y.wrapping_sub(other.y),
        }
    }

    /// Negate both components.
    #[inline]
    pub fn negate(self) -> Self {
        Self {
            x: self.x.wrapping_neg(),
            y: self.y.wrapping_neg(),
        }
    }

    /// Squared length. Widened to avoid overflow on large coordinates.
    #[inline]
    pub fn length_squared(self) -> i64 {
        let x = self.x as i64;
        let y = self.y as i64;
        x * x + y * y
    }

    /// Compare by squared magnitude.
    #[inline]
    pub fn magnitude_cmp(self, other: Self) -> Ordering {
        self.length_squared().cmp(&other.length_squared())
    }

    /// True for the zero displacement.
    #[inline]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl Add for Position {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Position::add(self, rhs)
    }
}

impl AddAssign for Position {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = Position::add(*self, rhs);
    }
}

impl Sub for Position {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Position::sub(self, rhs)
    }
}

impl Neg for Position {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.negate()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// =============================================================================
// TESTS
// =============================================================================
