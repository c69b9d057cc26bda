//! Axis-aligned box physics: overlap detection, penetration resolution, the
//! collision fix-point, touch sensing, and drop placement.

use iso_core::bounds::{BoundingBox, Bounds};
use iso_core::entity::Thing;
use iso_core::vector::{Direction, Vector3, reverse_direction};

use crate::behavior::{Collide, Touch};
use crate::context::ReactionContext;

/// The shallowest overlap between two boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// Penetration depth along the contact axis.
    pub depth: i32,
    /// Face of the first box involved.
    pub face_a: Direction,
    /// Face of the second box involved.
    pub face_b: Direction,
}

impl Contact {
    /// Axis the contact lies on.
    pub fn axis(&self) -> usize {
        self.face_a.axis()
    }
}

/// Overlap between `a` and `b`, if any. Picks the axis and side with the
/// smallest penetration; ties go to `b`'s positive face within an axis and
/// to the earlier axis across axes.
pub fn detect_collision(a: &dyn Bounds, b: &dyn Bounds) -> Option<Contact> {
    if !a.intersects(b) {
        return None;
    }
    let (la, sa) = (a.location(), a.size());
    let (lb, sb) = (b.location(), b.size());

    let mut best: Option<Contact> = None;
    for axis in 0..3 {
        let d1 = la[axis] + sa[axis] - lb[axis];
        let d2 = lb[axis] + sb[axis] - la[axis];
        let candidate = if d1 < d2 {
            Contact {
                depth: d1,
                face_a: Direction::from_axis(axis, false),
                face_b: Direction::from_axis(axis, true),
            }
        } else {
            Contact {
                depth: d2,
                face_a: Direction::from_axis(axis, true),
                face_b: Direction::from_axis(axis, false),
            }
        };
        if best.is_none_or(|c| candidate.depth < c.depth) {
            best = Some(candidate);
        }
    }
    best
}

/// Move `a` and `b` apart along the contact axis. Fixed things never move.
pub fn resolve_penetration(a: &mut Thing, b: &mut Thing, contact: &Contact) {
    let (a_held, b_held) = (a.fixed, b.fixed);
    separate(a, b, contact, a_held, b_held);
}

/// Separate `a` and `b`, moving only the sides not `held`. Two loose things
/// split the overlap: the front one backs off by half of it, the back one
/// advances by half plus one, both truncated toward zero.
fn separate(a: &mut Thing, b: &mut Thing, contact: &Contact, a_held: bool, b_held: bool) {
    let axis = contact.axis();
    match (a_held, b_held) {
        (true, true) => {}
        (false, true) => push_against(a, contact.face_a, b),
        (true, false) => push_against(b, contact.face_b, a),
        (false, false) => {
            let (front, back) = if contact.face_a.is_negative() {
                (b, a)
            } else {
                (a, b)
            };
            let delta = front.location[axis] + front.size[axis] - back.location[axis];
            let half = f64::from(delta) / 2.0;
            front.location[axis] = (f64::from(front.location[axis]) - half) as i32;
            back.location[axis] = (f64::from(back.location[axis]) + half + 1.0) as i32;
        }
    }
}

fn push_against(moving: &mut Thing, face: Direction, fixed: &Thing) {
    let axis = face.axis();
    moving.location[axis] = if face.is_negative() {
        fixed.location[axis] + fixed.size[axis]
    } else {
        fixed.location[axis] - moving.size[axis] - 1
    };
}

/// Outcome of [`collision_processor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Passes run, including the final clean one.
    pub passes: usize,
    /// Whether the last pass found no overlap. `false` means the cap was hit.
    pub settled: bool,
}

/// Resolve collisions pairwise until a full pass finds none, telling both
/// things of each pair about the impact.
///
/// Loose pairs split their overlap, which can undo an earlier push off a
/// fixed thing and cycle forever. Once the pass count exceeds the number of
/// things, a loose thing pushed off a fixed (or already pinned) thing is
/// pinned for the rest of the call, and loose things meeting it are pushed
/// the whole depth instead of splitting. Scenes with no room for their loose
/// things still stop after `max_passes` with `settled == false`.
pub fn collision_processor(things: &mut [Thing], ctx: &mut ReactionContext, max_passes: usize) -> Settlement {
    let pin_after = things.len() + 1;
    let mut pinned = vec![false; things.len()];
    let mut passes = 0;
    loop {
        if passes >= max_passes {
            tracing::warn!(passes, things = things.len(), "collision pass cap reached");
            return Settlement { passes, settled: false };
        }
        passes += 1;
        let pinning = passes > pin_after;

        let mut clean = true;
        for j in 1..things.len() {
            let (head, tail) = things.split_at_mut(j);
            let b = &mut tail[0];
            for (i, a) in head.iter_mut().enumerate() {
                if a.fixed && b.fixed {
                    continue;
                }
                let Some(contact) = detect_collision(&*a, &*b) else {
                    continue;
                };
                let (a_held, b_held) = if a.fixed || b.fixed || !pinning {
                    (a.fixed, b.fixed)
                } else if pinned[i] && pinned[j] {
                    (false, false)
                } else {
                    (pinned[i], pinned[j])
                };
                separate(a, b, &contact, a_held, b_held);
                if pinning && a_held != b_held {
                    let moved = if a_held { j } else { i };
                    pinned[moved] = true;
                }
                a.on_collision(b, contact.face_a, ctx);
                b.on_collision(a, contact.face_b, ctx);
                clean = false;
            }
        }
        if clean {
            tracing::trace!(passes, "collisions settled");
            return Settlement { passes, settled: true };
        }
    }
}

/// Contact between `a`'s sense box and `b`. The sense box is `a` shifted two
/// units per axis toward `b`'s centre, so the face found is the face of `a`
/// pointing at `b`.
///
/// Two small fast bodies can pass each other without a touch.
pub fn sense(a: &dyn Bounds, b: &dyn Bounds) -> Option<Contact> {
    let toward = reverse_direction(a.centre(), b.centre()) * 2;
    let candidate = BoundingBox::new(a.location() + toward, a.size());
    detect_collision(&candidate, b)
}

/// Sense every pair and tell both things of each touching pair.
pub fn touch_processor(things: &mut [Thing], ctx: &mut ReactionContext) {
    for j in 1..things.len() {
        let (head, tail) = things.split_at_mut(j);
        let b = &mut tail[0];
        for a in head.iter_mut() {
            if let Some(contact) = sense(&*a, &*b) {
                a.on_touch(b, contact.face_a, ctx);
                b.on_touch(a, contact.face_b, ctx);
            }
        }
    }
}

/// Whether `candidate` overlaps any of `things`.
pub fn collision_checker(candidate: &dyn Bounds, things: &[Thing]) -> bool {
    things.iter().any(|t| detect_collision(candidate, t).is_some())
}

/// Min-corner for an item of `item_size` set down in front of `source`:
/// the item's centre lies past the source's centre by both half extents plus
/// `separation` along `facing`.
pub fn drop_position(source: &dyn Bounds, item_size: Vector3, facing: Vector3, separation: i32) -> Vector3 {
    let two = Vector3::splat(2);
    let item_half = item_size / two;
    let source_half = source.size() / two;
    let centre = source.location() + source_half;
    let reach = facing * item_half + facing * source_half + facing * separation;
    centre + reach - item_half
}
