use crate::entity::{EntityId, Thing};
use crate::resource::CyclicSound;
use crate::vector::{Direction, Vector3};

/// Captions shown when the player interacts with a thing. Unset captions
/// fall back to the engine's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThingText {
    /// Shown when the thing is picked up.
    pub picked_up: Option<String>,
    /// Shown when the thing is examined.
    pub examined: Option<String>,
    /// Shown when the thing becomes the item in use.
    pub used: Option<String>,
    /// Shown when the thing is dropped.
    pub dropped: Option<String>,
    /// Shown when the player passes through this portal.
    pub entered: Option<String>,
    /// Shown when the player leaves a scene through this portal.
    pub exited: Option<String>,
}

impl ThingText {
    /// Set the pick-up caption.
    pub fn with_picked_up(mut self, text: impl Into<String>) -> Self {
        self.picked_up = Some(text.into());
        self
    }

    /// Set the examine caption.
    pub fn with_examined(mut self, text: impl Into<String>) -> Self {
        self.examined = Some(text.into());
        self
    }

    /// Set the use caption.
    pub fn with_used(mut self, text: impl Into<String>) -> Self {
        self.used = Some(text.into());
        self
    }

    /// Set the drop caption.
    pub fn with_dropped(mut self, text: impl Into<String>) -> Self {
        self.dropped = Some(text.into());
        self
    }

    /// Set the portal entry caption.
    pub fn with_entered(mut self, text: impl Into<String>) -> Self {
        self.entered = Some(text.into());
        self
    }

    /// Set the portal exit caption.
    pub fn with_exited(mut self, text: impl Into<String>) -> Self {
        self.exited = Some(text.into());
        self
    }
}

/// Gravity and contact bookkeeping for things that fall.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallState {
    /// Whether gravity is currently pulling the thing down.
    pub falling: bool,
    /// Whether the thing rested on something at the last touch pass.
    pub touching: bool,
    /// Things touched at the last touch pass, with the face of this thing
    /// that touched them, in sensing order.
    pub touched: Vec<(EntityId, Direction)>,
    /// Tick of the most recent collision.
    pub collision_tick: Option<u64>,
}

impl FallState {
    /// Forget last tick's contacts.
    pub fn clear_touches(&mut self) {
        self.touched.clear();
        self.touching = false;
    }
}

/// Facing and animation state of actors.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorState {
    /// Unit heading the actor faces.
    pub facing: Vector3,
    /// Current walk-cycle step.
    pub cycle: usize,
    /// Step sound played while walking.
    pub walk_sound: Option<CyclicSound>,
    /// Tick at which an NPC last reversed its heading.
    pub turned_at: Option<u64>,
}

impl Default for ActorState {
    fn default() -> Self {
        Self {
            facing: Vector3::SOUTH,
            cycle: 0,
            walk_sound: None,
            turned_at: None,
        }
    }
}

/// Pick-up state of portable things.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarryState {
    /// Whether the thing is currently carried.
    pub picked_up: bool,
    /// Who carries it.
    pub carrier: Option<EntityId>,
}

/// Default number of inventory slots.
pub const DEFAULT_MAX_INVENTORY: usize = 4;

/// Inventory and scene-migration state of the player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Carried things, in pick-up order.
    pub inventory: Vec<Thing>,
    /// Index of the selected inventory slot.
    pub using: usize,
    /// Inventory capacity.
    pub max_inventory: usize,
    /// Scene the player belongs in; differs from the thing's scene while a
    /// migration is pending.
    pub current_scene: Option<String>,
    /// Location to take on the next migration.
    pub current_location: Option<Vector3>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            inventory: Vec::new(),
            using: 0,
            max_inventory: DEFAULT_MAX_INVENTORY,
            current_scene: None,
            current_location: None,
        }
    }
}

impl PlayerState {
    /// Whether another item fits.
    pub fn has_room(&self) -> bool {
        self.inventory.len() < self.max_inventory
    }

    /// The selected item.
    pub fn selected(&self) -> Option<&Thing> {
        self.inventory.get(self.using)
    }

    /// Whether a portal transit is waiting to be applied.
    pub fn migration_pending(&self, scene: Option<&str>) -> bool {
        self.current_location.is_some() || self.current_scene.as_deref() != scene
    }
}

/// Where a portal leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalLink {
    /// Destination scene; `None` stays in the portal's own scene.
    pub to_scene: Option<String>,
    /// Where the player arrives.
    pub to_location: Vector3,
}
