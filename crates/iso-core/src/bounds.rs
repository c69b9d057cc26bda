//! Axis-aligned bounding boxes.

use crate::vector::Vector3;

/// Anything occupying an axis-aligned box in world space.
pub trait Bounds {
    /// Min-corner of the box.
    fn location(&self) -> Vector3;

    /// Extent of the box on each axis.
    fn size(&self) -> Vector3;

    /// Centre of the box, truncated toward the min-corner.
    fn centre(&self) -> Vector3 {
        self.location().centre_of(self.size())
    }

    /// Inclusive max-corner: `location + size - 1` on each axis.
    fn front(&self) -> Vector3 {
        self.location() + self.size() - Vector3::splat(1)
    }

    /// Strict overlap test on all three axes. Boxes that share a face do not
    /// intersect.
    fn intersects(&self, other: &dyn Bounds) -> bool {
        let (a, sa) = (self.location(), self.size());
        let (b, sb) = (other.location(), other.size());
        (0..3).all(|i| a[i] < b[i] + sb[i] && b[i] < a[i] + sa[i])
    }
}

/// A free-standing box, used for sensing and placement tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Min-corner.
    pub location: Vector3,
    /// Extent per axis.
    pub size: Vector3,
}

impl BoundingBox {
    /// A box at `location` with extent `size`.
    pub fn new(location: Vector3, size: Vector3) -> Self {
        Self { location, size }
    }
}

impl Bounds for BoundingBox {
    fn location(&self) -> Vector3 {
        self.location
    }

    fn size(&self) -> Vector3 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_faces_do_not_intersect() {
        let a = BoundingBox::new(Vector3::ZERO, Vector3::splat(10));
        let b = BoundingBox::new(Vector3::new(10, 0, 0), Vector3::splat(10));
        let c = BoundingBox::new(Vector3::new(9, 9, 9), Vector3::splat(10));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn centre_and_front() {
        let a = BoundingBox::new(Vector3::new(100, 100, 100), Vector3::new(14, 14, 50));
        assert_eq!(a.centre(), Vector3::new(107, 107, 125));
        assert_eq!(a.front(), Vector3::new(113, 113, 149));
    }
}
