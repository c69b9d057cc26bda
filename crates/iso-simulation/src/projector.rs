//! Isometric projection and painter's-algorithm depth ordering.

use iso_core::bounds::Bounds;
use iso_core::vector::Vector3;

/// Screen position of a world point. `>>` is an arithmetic shift, so odd
/// negative sums round toward negative infinity.
pub fn transform(p: Vector3, offset: [i32; 2]) -> (i32, i32) {
    let u = (p.x - p.y) + offset[0];
    let v = ((p.x + p.y) >> 1) - p.z + offset[1];
    (u, v)
}

/// A screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl Rect {
    /// A rectangle.
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        Rect::new(
            left,
            top,
            self.right().max(other.right()) - left,
            self.bottom().max(other.bottom()) - top,
        )
    }
}

/// Screen rectangle covered by the sprite of a box.
pub fn sprite_rect(location: Vector3, size: Vector3, offset: [i32; 2]) -> Rect {
    let (u, v) = transform(location, offset);
    let width = size.x + size.y;
    Rect::new(u - size.y, v - size.z, width, (width >> 1) + size.z)
}

/// Union `new` and `old` index-wise; the surplus of the longer list is kept
/// as is. Covers both where sprites are and where they were.
pub fn combine_rects(new: &[Rect], old: &[Rect]) -> Vec<Rect> {
    let mut combined: Vec<Rect> = new.iter().zip(old).map(|(a, b)| a.union(b)).collect();
    let shared = combined.len();
    combined.extend_from_slice(&new[shared..]);
    combined.extend_from_slice(&old[shared..]);
    combined
}

/// Back-to-front drawing order of `boxes`, as indices into the slice.
///
/// Runs `n` bubble passes. Adjacent entries swap when, on the first axis
/// where it happens, the earlier box starts beyond the later box's far
/// corner.
pub fn depth_order<B: Bounds>(boxes: &[B]) -> Vec<usize> {
    let n = boxes.len();
    let mut order: Vec<usize> = (0..n).collect();
    let location: Vec<Vector3> = boxes.iter().map(Bounds::location).collect();
    let front: Vec<Vector3> = boxes.iter().map(Bounds::front).collect();

    for _ in 0..n {
        for j in 0..n.saturating_sub(1) {
            let (a, b) = (order[j], order[j + 1]);
            for axis in 0..3 {
                if location[a][axis] > front[b][axis] {
                    order.swap(j, j + 1);
                    break;
                }
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use iso_core::bounds::BoundingBox;
    use proptest::prelude::*;

    #[test]
    fn transform_baseline() {
        assert_eq!(transform(Vector3::ZERO, [0, 0]), (0, 0));
        assert_eq!(transform(Vector3::new(2, 4, 8), [1, 0]), (-1, -5));
    }

    #[test]
    fn transform_shift_is_arithmetic() {
        assert_eq!(transform(Vector3::new(-3, 0, 0), [0, 0]), (-3, -2));
    }

    #[test]
    fn sprite_rect_spans_the_box() {
        let rect = sprite_rect(Vector3::new(0, 100, 0), Vector3::new(70, 52, 28), [200, 120]);
        assert_eq!(rect, Rect::new(48, 142, 122, 89));
    }

    #[test]
    fn combine_keeps_surplus() {
        let new = [Rect::new(0, 0, 10, 10), Rect::new(50, 50, 5, 5)];
        let old = [Rect::new(5, 5, 10, 10)];
        assert_eq!(
            combine_rects(&new, &old),
            vec![Rect::new(0, 0, 15, 15), Rect::new(50, 50, 5, 5)]
        );
        assert_eq!(combine_rects(&old, &new)[1], Rect::new(50, 50, 5, 5));
    }

    #[test]
    fn farther_boxes_paint_first() {
        let near = BoundingBox::new(Vector3::new(50, 0, 0), Vector3::splat(10));
        let far = BoundingBox::new(Vector3::ZERO, Vector3::splat(10));
        let high = BoundingBox::new(Vector3::new(0, 0, 40), Vector3::splat(10));
        assert_eq!(depth_order(&[near, far]), vec![1, 0]);
        assert_eq!(depth_order(&[high, far]), vec![1, 0]);
        assert_eq!(depth_order::<BoundingBox>(&[]), Vec::<usize>::new());
    }

    fn boxes() -> impl Strategy<Value = Vec<BoundingBox>> {
        prop::collection::vec(
            ((-200..200, -200..200, -50..50), (1..60, 1..60, 1..60)).prop_map(
                |((x, y, z), (w, d, h))| {
                    BoundingBox::new(Vector3::new(x, y, z), Vector3::new(w, d, h))
                },
            ),
            0..12,
        )
    }

    fn crowded() -> impl Strategy<Value = Vec<BoundingBox>> {
        prop::collection::vec(
            ((-20..20, -20..20, -10..10), (1..10, 1..10, 1..10)).prop_map(
                |((x, y, z), (w, d, h))| {
                    BoundingBox::new(Vector3::new(x, y, z), Vector3::new(w, d, h))
                },
            ),
            0..12,
        )
    }

    proptest! {
        #[test]
        fn depth_order_is_a_permutation(boxes in boxes()) {
            let mut order = depth_order(&boxes);
            order.sort_unstable();
            prop_assert_eq!(order, (0..boxes.len()).collect::<Vec<_>>());
        }

        #[test]
        fn no_box_paints_after_one_it_is_wholly_in_front_of(boxes in prop_oneof![boxes(), crowded()]) {
            let order = depth_order(&boxes);
            for pair in order.windows(2) {
                let (a, b) = (&boxes[pair[0]], &boxes[pair[1]]);
                let ahead = (0..3).all(|axis| a.location()[axis] > b.front()[axis]);
                prop_assert!(!ahead, "{:?} painted before {:?}", a, b);
            }
        }
    }
}
