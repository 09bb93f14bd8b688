use std::ops::{Add, Sub};

/// A location, relative to some origin.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Point {
    /// Horizontal offset from the origin.
    pub x: i32,
    /// Vertical offset from the origin.
    pub y: i32,
}

impl Point {
    /// Construct a point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The origin point.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Shift the point by an offset.
    pub fn shift(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl From<(i32, i32)> for Point {
    #[inline]
    fn from(v: (i32, i32)) -> Self {
        Self { x: v.0, y: v.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        assert_eq!(Point::zero() + (1, 2).into(), (1, 2).into());
        assert_eq!(Point::new(3, 4) - Point::new(1, 1), (2, 3).into());
        assert_eq!(Point::new(0, 0).shift(-5, 2), (-5, 2).into());
    }
}
