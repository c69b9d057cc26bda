//! Per-thing reactions, composed from the thing's kind and components.
//!
//! Falling, moving, and walking are plain functions applied in a fixed order
//! by [`Respond::respond`]; collision and touch reactions key off the fall,
//! actor, and portal components.

use iso_core::entity::{Thing, ThingKind};
use iso_core::error::IsoResult;
use iso_core::skin::{Frame, Skin};
use iso_core::vector::{Direction, Vector3, reverse_direction};

use crate::context::ReactionContext;
use crate::event::Event;
use crate::frontend::SoundCue;

/// Per-tick update.
pub trait Respond {
    /// Advance one tick.
    fn respond(&mut self, ctx: &mut ReactionContext);
}

/// Reaction to being pushed out of another box.
pub trait Collide {
    /// `face` is this thing's face that hit `other`.
    fn on_collision(&mut self, other: &Thing, face: Direction, ctx: &mut ReactionContext);
}

/// Reaction to resting against another box.
pub trait Touch {
    /// `face` is this thing's face that touches `other`.
    fn on_touch(&mut self, other: &Thing, face: Direction, ctx: &mut ReactionContext);
}

/// Frame selection for painting.
pub trait Render {
    /// Frame to paint this tick; `None` for things without a skin.
    fn current_frame(&mut self) -> IsoResult<Option<Frame>>;
}

impl Respond for Thing {
    fn respond(&mut self, _ctx: &mut ReactionContext) {
        if self.kind.is_walker() {
            animate_walk(self);
        }
        if self.fall.is_some() {
            fall_step(self);
        }
        if self.kind.is_movable() {
            move_step(self);
        }
    }
}

impl Collide for Thing {
    fn on_collision(&mut self, _other: &Thing, face: Direction, ctx: &mut ReactionContext) {
        if let Some(fall) = &mut self.fall {
            if face == Direction::Down && fall.falling {
                self.velocity.z = 0;
                fall.falling = false;
            }
            fall.collision_tick = Some(ctx.tick());
        }
        if self.kind == ThingKind::Npc {
            turn_around(self, face, ctx.tick());
        }
    }
}

impl Touch for Thing {
    fn on_touch(&mut self, other: &Thing, face: Direction, ctx: &mut ReactionContext) {
        if let Some(fall) = &mut self.fall {
            fall.touched.push((other.id, face));
            if face == Direction::Down {
                self.velocity.z = 0;
                fall.touching = true;
                fall.falling = false;
            }
        }
        if other.kind != ThingKind::Player {
            return;
        }
        let Some(link) = &self.portal else {
            return;
        };
        let Some(to_scene) = link.to_scene.clone().or_else(|| self.scene.clone()) else {
            return;
        };
        ctx.publish(Event::PlayerTouchPortal {
            player: other.id,
            portal: self.id,
            to_scene,
            to_location: link.to_location,
        });
    }
}

impl Render for Thing {
    fn current_frame(&mut self) -> IsoResult<Option<Frame>> {
        let facing = self.facing();
        let cycle = self.actor.as_ref().map_or(0, |a| a.cycle);
        match &mut self.skin {
            Some(skin) => skin.frame(facing, cycle),
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// Gravity: anything not resting on something falls one unit per tick
/// faster. Clears last tick's touches.
pub fn fall_step(thing: &mut Thing) {
    let Some(fall) = &mut thing.fall else {
        return;
    };
    if !fall.touching {
        fall.falling = true;
    }
    if fall.falling {
        thing.velocity.z -= 1;
    }
    fall.clear_touches();
}

/// Apply velocity.
pub fn move_step(thing: &mut Thing) {
    thing.last_location = thing.location;
    thing.location += thing.velocity;
}

/// Step the walk cycle if the thing moved horizontally last tick, otherwise
/// rest on the first step.
pub fn animate_walk(thing: &mut Thing) {
    let frames = thing.skin.as_ref().map_or(1, Skin::frames_per_cycle).max(1);
    let moved = thing.location.x != thing.last_location.x || thing.location.y != thing.last_location.y;
    if let Some(actor) = &mut thing.actor {
        actor.cycle = if moved { (actor.cycle + 1) % frames } else { 0 };
    }
}

/// Walk with velocity `offset`, facing the way of travel. Ignored while
/// falling. A zero offset keeps the current facing. Returns the step sound
/// when one is due.
pub fn update_position(thing: &mut Thing, offset: Vector3, now_ms: u64) -> Option<SoundCue> {
    if thing.fall.is_none() || thing.is_falling() {
        return None;
    }
    thing.velocity = offset;
    let actor = thing.actor.as_mut()?;
    if offset != Vector3::ZERO {
        actor.facing = reverse_direction(Vector3::ZERO, offset);
    }
    let sound = actor.walk_sound.as_mut()?;
    sound.poll(now_ms).then(|| SoundCue {
        sound: sound.sound,
        volume: sound.volume,
    })
}

/// Stand still, unless falling.
pub fn stop(thing: &mut Thing) {
    if thing.fall.is_some() && !thing.is_falling() {
        thing.velocity = Vector3::ZERO;
    }
}

/// Leap upward with `impulse`, unless already falling.
pub fn jump(thing: &mut Thing, impulse: i32) {
    let Some(fall) = &mut thing.fall else {
        return;
    };
    if !fall.falling {
        thing.velocity.z += impulse;
        fall.falling = true;
    }
}

/// NPCs walking along x reverse when they bump into something ahead. At
/// most one turn per tick.
fn turn_around(npc: &mut Thing, face: Direction, tick: u64) {
    let speed = npc.speed;
    let Some(actor) = &mut npc.actor else {
        return;
    };
    if actor.turned_at == Some(tick) {
        return;
    }
    let (velocity_x, facing) = match (actor.facing, face) {
        (Vector3::SOUTH, Direction::South) => (-speed, Vector3::NORTH),
        (Vector3::NORTH, Direction::North) => (speed, Vector3::SOUTH),
        _ => return,
    };
    npc.velocity.x = velocity_x;
    actor.facing = facing;
    actor.turned_at = Some(tick);
}
