//! Integer 3D vectors and the six axis directions.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// An integer point or extent in world space.
///
/// `x` grows toward the viewer's lower right (south), `y` toward the lower
/// left (west), `z` straight up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector3 {
    /// South/north axis.
    pub x: i32,
    /// West/east axis.
    pub y: i32,
    /// Vertical axis.
    pub z: i32,
}

impl Vector3 {
    /// The origin.
    pub const ZERO: Self = Self::new(0, 0, 0);
    /// Unit vector pointing south.
    pub const SOUTH: Self = Self::new(1, 0, 0);
    /// Unit vector pointing north.
    pub const NORTH: Self = Self::new(-1, 0, 0);
    /// Unit vector pointing west.
    pub const WEST: Self = Self::new(0, 1, 0);
    /// Unit vector pointing east.
    pub const EAST: Self = Self::new(0, -1, 0);
    /// Unit vector pointing up.
    pub const UP: Self = Self::new(0, 0, 1);
    /// Unit vector pointing down.
    pub const DOWN: Self = Self::new(0, 0, -1);

    /// Build a vector from its components.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The same value on every axis.
    pub const fn splat(v: i32) -> Self {
        Self::new(v, v, v)
    }

    /// Apply `f` to each component.
    pub fn map(self, f: impl Fn(i32) -> i32) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }

    /// The components as an array, indexed by axis.
    pub fn to_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    /// Sign of each component (`-1`, `0` or `1`).
    pub fn remove_magnitude(self) -> Self {
        self.map(squish)
    }

    /// Sum of the squared components.
    pub fn squared_magnitude(self) -> i64 {
        self.to_array()
            .iter()
            .map(|&c| i64::from(c) * i64::from(c))
            .sum()
    }

    /// Unit vector along the axis with the greatest absolute value, keeping
    /// that component's sign. Earlier axes win ties; the zero vector maps to
    /// zero.
    pub fn largest_component(self) -> Self {
        let parts = self.to_array();
        let mut axis = 0;
        for i in 1..3 {
            if parts[i].abs() > parts[axis].abs() {
                axis = i;
            }
        }
        let mut unit = Self::ZERO;
        unit[axis] = squish(parts[axis]);
        unit
    }

    /// Centre point of the box with this min-corner and `size`.
    pub fn centre_of(self, size: Self) -> Self {
        self + size / Self::splat(2)
    }
}

/// Sign of `a`: `-1`, `0` or `1`.
pub fn squish(a: i32) -> i32 {
    a.signum()
}

/// Unit-per-axis vector pointing the opposite way of `v1 - v2`.
///
/// With `v1 = ZERO` this is the heading of `v2`.
pub fn reverse_direction(v1: Vector3, v2: Vector3) -> Vector3 {
    -(v1 - v2).remove_magnitude()
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul for Vector3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Mul<i32> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        self.map(|c| c * rhs)
    }
}

/// Element-wise division, truncating toward zero.
impl Div for Vector3 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y, self.z / rhs.z)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|c| -c)
    }
}

impl Index<usize> for Vector3 {
    type Output = i32;

    fn index(&self, axis: usize) -> &i32 {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("axis {axis} out of range for Vector3"),
        }
    }
}

impl IndexMut<usize> for Vector3 {
    fn index_mut(&mut self, axis: usize) -> &mut i32 {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("axis {axis} out of range for Vector3"),
        }
    }
}

/// One of the six faces of a box, numbered `axis * 2 + side` where side 0
/// is the positive end of the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Positive x.
    South = 0,
    /// Negative x.
    North = 1,
    /// Positive y.
    West = 2,
    /// Negative y.
    East = 3,
    /// Positive z.
    Up = 4,
    /// Negative z; the bottom side of a box.
    Down = 5,
}

impl Direction {
    /// All directions in face order.
    pub const ALL: [Direction; 6] = [
        Self::South,
        Self::North,
        Self::West,
        Self::East,
        Self::Up,
        Self::Down,
    ];

    /// The face number, `0..=5`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Face for a face number; `None` outside `0..=5`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Face on the given axis and side.
    pub fn from_axis(axis: usize, negative: bool) -> Self {
        Self::ALL[(axis % 3) * 2 + usize::from(negative)]
    }

    /// Axis this face is perpendicular to.
    pub fn axis(self) -> usize {
        self.index() / 2
    }

    /// Whether this face sits on the negative end of its axis.
    pub fn is_negative(self) -> bool {
        self.index() % 2 == 1
    }

    /// The face on the other end of the same axis.
    pub fn opposite(self) -> Self {
        Self::from_axis(self.axis(), !self.is_negative())
    }

    /// Unit vector pointing out of this face.
    pub fn vector(self) -> Vector3 {
        match self {
            Self::South => Vector3::SOUTH,
            Self::North => Vector3::NORTH,
            Self::West => Vector3::WEST,
            Self::East => Vector3::EAST,
            Self::Up => Vector3::UP,
            Self::Down => Vector3::DOWN,
        }
    }

    /// Face that `v` mostly points out of. The zero vector maps to `South`.
    pub fn from_vector(v: Vector3) -> Self {
        let unit = v.largest_component();
        for axis in 0..3 {
            if unit[axis] != 0 {
                return Self::from_axis(axis, unit[axis] < 0);
            }
        }
        Self::South
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::South => "south",
            Self::North => "north",
            Self::West => "west",
            Self::East => "east",
            Self::Up => "up",
            Self::Down => "down",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small() -> impl Strategy<Value = Vector3> {
        (-1000..1000, -1000..1000, -1000..1000).prop_map(|(x, y, z)| Vector3::new(x, y, z))
    }

    #[test]
    fn element_wise_ops() {
        let a = Vector3::new(4, -6, 9);
        let b = Vector3::new(2, 3, -4);
        assert_eq!(a + b, Vector3::new(6, -3, 5));
        assert_eq!(a - b, Vector3::new(2, -9, 13));
        assert_eq!(a * b, Vector3::new(8, -18, -36));
        assert_eq!(a / b, Vector3::new(2, -2, -2));
        assert_eq!(a * 2, Vector3::new(8, -12, 18));
    }

    #[test]
    fn largest_component_prefers_earlier_axis() {
        assert_eq!(Vector3::new(3, -3, 3).largest_component(), Vector3::SOUTH);
        assert_eq!(Vector3::new(1, -5, 5).largest_component(), Vector3::EAST);
        assert_eq!(Vector3::new(0, 0, -2).largest_component(), Vector3::DOWN);
        assert_eq!(Vector3::ZERO.largest_component(), Vector3::ZERO);
    }

    #[test]
    fn reverse_direction_of_offset_is_heading() {
        assert_eq!(
            reverse_direction(Vector3::ZERO, Vector3::new(-2, 0, 0)),
            Vector3::NORTH
        );
        assert_eq!(
            reverse_direction(Vector3::new(10, 0, 5), Vector3::new(3, 0, 9)),
            Vector3::new(-1, 0, 1)
        );
    }

    #[test]
    fn vector_to_direction_faces() {
        assert_eq!(Direction::from_vector(Vector3::ZERO), Direction::South);
        assert_eq!(Direction::from_vector(Vector3::new(-7, 3, 0)), Direction::North);
        assert_eq!(Direction::from_vector(Vector3::new(0, -1, -1)), Direction::East);
        assert_eq!(Direction::from_vector(Vector3::new(0, 0, -9)).index(), 5);
    }

    #[test]
    fn opposite_faces() {
        assert_eq!(Direction::South.opposite(), Direction::North);
        assert_eq!(Direction::East.opposite(), Direction::West);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
    }

    #[test]
    fn squared_magnitude_does_not_overflow() {
        let v = Vector3::splat(i32::MAX);
        assert_eq!(v.squared_magnitude(), 3 * i64::from(i32::MAX) * i64::from(i32::MAX));
    }

    #[test]
    fn direction_round_trip_on_unit_vectors() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_vector(dir.vector()), dir);
            assert_eq!(Direction::from_index(dir.index()), Some(dir));
        }
    }

    proptest! {
        #[test]
        fn add_undoes_sub(a in small(), b in small()) {
            prop_assert_eq!((a - b) + b, a);
        }

        #[test]
        fn largest_component_is_unit_or_zero(v in small()) {
            let unit = v.largest_component();
            prop_assert!(unit.squared_magnitude() <= 1);
            prop_assert_eq!(unit == Vector3::ZERO, v == Vector3::ZERO);
        }
    }
}
