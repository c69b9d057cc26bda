use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bounds::Bounds;
use crate::component::{ActorState, CarryState, FallState, PlayerState, PortalLink, ThingText};
use crate::resource::CyclicSound;
use crate::skin::Skin;
use crate::vector::Vector3;

/// Unique identifier for every thing in a universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Generate a new random ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Behavior variant of a thing. Each variant includes the capabilities of
/// the ones it builds on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThingKind {
    /// Collidable box that never moves by itself.
    Physical,
    /// Applies its velocity every tick.
    Movable,
    /// Movable under gravity.
    Fallable,
    /// Fallable, and can be picked up by the player.
    Portable,
    /// Fallable with a facing and an animation cycle.
    Actor,
    /// Actor that animates while walking.
    WalkingActor,
    /// Walking actor that turns around when it bumps into something.
    Npc,
    /// The walking actor controlled by the user.
    Player,
    /// Physical thing that moves the player to another scene on touch.
    Portal,
}

impl ThingKind {
    /// Whether velocity is applied each tick.
    pub fn is_movable(self) -> bool {
        !matches!(self, Self::Physical | Self::Portal)
    }

    /// Whether gravity applies.
    pub fn is_fallable(self) -> bool {
        self.is_movable() && self != Self::Movable
    }

    /// Whether the thing has a facing and a walk cycle.
    pub fn is_actor(self) -> bool {
        matches!(
            self,
            Self::Actor | Self::WalkingActor | Self::Npc | Self::Player
        )
    }

    /// Whether the thing animates while walking.
    pub fn is_walker(self) -> bool {
        matches!(self, Self::WalkingActor | Self::Npc | Self::Player)
    }

    /// Whether things of this kind start out immovable by collisions.
    pub fn fixed_by_default(self) -> bool {
        !self.is_movable()
    }
}

impl fmt::Display for ThingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Physical => "physical",
            Self::Movable => "movable",
            Self::Fallable => "fallable",
            Self::Portable => "portable",
            Self::Actor => "actor",
            Self::WalkingActor => "walking actor",
            Self::Npc => "npc",
            Self::Player => "player",
            Self::Portal => "portal",
        };
        f.write_str(name)
    }
}

/// A box-shaped object in a scene: scenery, props, actors, portals, and the
/// player.
#[derive(Debug, Clone, PartialEq)]
pub struct Thing {
    /// Identity, stable across scene and inventory moves.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Behavior variant.
    pub kind: ThingKind,
    /// Min-corner.
    pub location: Vector3,
    /// Location before the last movement step.
    pub last_location: Vector3,
    /// Extent per axis; strictly positive.
    pub size: Vector3,
    /// Movement applied per tick.
    pub velocity: Vector3,
    /// Whether collision response leaves this thing in place.
    pub fixed: bool,
    /// Walking speed multiplier.
    pub speed: i32,
    /// Optional weight.
    pub weight: Option<f64>,
    /// Renderable aspect.
    pub skin: Option<Skin>,
    /// Interaction captions.
    pub text: ThingText,
    /// Name of the scene listing this thing, if any.
    pub scene: Option<String>,
    /// Gravity state, for fallable kinds.
    pub fall: Option<FallState>,
    /// Facing and animation, for actors.
    pub actor: Option<ActorState>,
    /// Carry state, for portable things.
    pub carry: Option<CarryState>,
    /// Inventory and migration state, for the player.
    pub player: Option<PlayerState>,
    /// Destination, for portals.
    pub portal: Option<PortalLink>,
}

impl Thing {
    /// A thing of the given kind with the components that kind needs.
    pub fn new(kind: ThingKind, name: impl Into<String>, location: Vector3, size: Vector3) -> Self {
        let actor = kind.is_actor().then(ActorState::default);
        let velocity = if actor.is_some() {
            Vector3::SOUTH
        } else {
            Vector3::ZERO
        };
        Self {
            id: EntityId::new(),
            name: name.into(),
            kind,
            location,
            last_location: location,
            size,
            velocity,
            fixed: kind.fixed_by_default(),
            speed: 1,
            weight: None,
            skin: None,
            text: ThingText::default(),
            scene: None,
            fall: kind.is_fallable().then(FallState::default),
            actor,
            carry: (kind == ThingKind::Portable).then(CarryState::default),
            player: (kind == ThingKind::Player).then(PlayerState::default),
            portal: None,
        }
    }

    /// Immovable scenery.
    pub fn physical(name: impl Into<String>, location: Vector3, size: Vector3) -> Self {
        Self::new(ThingKind::Physical, name, location, size)
    }

    /// A thing that drifts by its velocity.
    pub fn movable(name: impl Into<String>, location: Vector3, size: Vector3) -> Self {
        Self::new(ThingKind::Movable, name, location, size)
    }

    /// A thing that falls.
    pub fn fallable(name: impl Into<String>, location: Vector3, size: Vector3) -> Self {
        Self::new(ThingKind::Fallable, name, location, size)
    }

    /// A thing the player can pick up.
    pub fn portable(name: impl Into<String>, location: Vector3, size: Vector3) -> Self {
        Self::new(ThingKind::Portable, name, location, size)
    }

    /// A walking non-player character.
    pub fn npc(name: impl Into<String>, location: Vector3, size: Vector3) -> Self {
        Self::new(ThingKind::Npc, name, location, size)
    }

    /// The player.
    pub fn player(name: impl Into<String>, location: Vector3, size: Vector3) -> Self {
        Self::new(ThingKind::Player, name, location, size)
    }

    /// A portal leading to `to_scene` (or its own scene when `None`).
    pub fn portal(
        name: impl Into<String>,
        location: Vector3,
        size: Vector3,
        to_scene: Option<&str>,
        to_location: Vector3,
    ) -> Self {
        let mut portal = Self::new(ThingKind::Portal, name, location, size);
        portal.portal = Some(PortalLink {
            to_scene: to_scene.map(str::to_owned),
            to_location,
        });
        portal
    }

    /// Set the skin.
    pub fn with_skin(mut self, skin: Skin) -> Self {
        self.skin = Some(skin);
        self
    }

    /// Set the captions.
    pub fn with_text(mut self, text: ThingText) -> Self {
        self.text = text;
        self
    }

    /// Override whether collisions can move this thing.
    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set the walking speed. Actors restart moving along their facing at
    /// the new speed.
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        if let Some(actor) = &self.actor {
            self.velocity = actor.facing * speed;
        }
        self
    }

    /// Set the initial velocity.
    pub fn with_velocity(mut self, velocity: Vector3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the initial facing of an actor.
    pub fn with_facing(mut self, facing: Vector3) -> Self {
        if let Some(actor) = &mut self.actor {
            actor.facing = facing;
        }
        self
    }

    /// Set the step sound of an actor.
    pub fn with_walk_sound(mut self, sound: CyclicSound) -> Self {
        if let Some(actor) = &mut self.actor {
            actor.walk_sound = Some(sound);
        }
        self
    }

    /// Set the inventory capacity of a player.
    pub fn with_max_inventory(mut self, max: usize) -> Self {
        if let Some(player) = &mut self.player {
            player.max_inventory = max;
        }
        self
    }

    /// Facing of an actor; non-actors face south.
    pub fn facing(&self) -> Vector3 {
        self.actor.as_ref().map_or(Vector3::SOUTH, |a| a.facing)
    }

    /// Whether gravity is pulling this thing down.
    pub fn is_falling(&self) -> bool {
        self.fall.as_ref().is_some_and(|f| f.falling)
    }

    /// Ask a portable thing to be picked up by `carrier`. Returns whether it
    /// agreed.
    pub fn request_pick_up(&mut self, carrier: EntityId) -> bool {
        match &mut self.carry {
            Some(carry) => {
                carry.picked_up = true;
                carry.carrier = Some(carrier);
                true
            }
            None => false,
        }
    }

    /// Ask a carried thing to be dropped. Returns whether it agreed.
    pub fn request_drop(&mut self) -> bool {
        match &mut self.carry {
            Some(carry) => {
                *carry = CarryState::default();
                true
            }
            None => false,
        }
    }

    /// Whether every extent is positive.
    pub fn has_valid_size(&self) -> bool {
        self.size.x > 0 && self.size.y > 0 && self.size.z > 0
    }
}

impl Bounds for Thing {
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
    fn entity_id_display_is_short() {
        let id = EntityId::new();
        assert_eq!(id.to_string().len(), 8);
    }

    #[test]
    fn kinds_get_their_components() {
        let size = Vector3::splat(10);
        let wall = Thing::physical("wall", Vector3::ZERO, size);
        assert!(wall.fixed);
        assert!(wall.fall.is_none() && wall.actor.is_none());

        let cup = Thing::portable("cup", Vector3::ZERO, size);
        assert!(!cup.fixed);
        assert!(cup.fall.is_some() && cup.carry.is_some());

        let hero = Thing::player("hero", Vector3::ZERO, size);
        assert!(hero.player.is_some() && hero.actor.is_some());
        assert_eq!(hero.velocity, Vector3::SOUTH);
        assert_eq!(hero.facing(), Vector3::SOUTH);

        let door = Thing::portal("door", Vector3::ZERO, size, Some("Lounge"), Vector3::ZERO);
        assert!(door.fixed);
        assert_eq!(
            door.portal.and_then(|p| p.to_scene).as_deref(),
            Some("Lounge")
        );
    }

    #[test]
    fn speed_scales_actor_velocity() {
        let npc = Thing::npc("cat", Vector3::ZERO, Vector3::splat(5)).with_speed(3);
        assert_eq!(npc.velocity, Vector3::new(3, 0, 0));
        let crate_ = Thing::movable("crate", Vector3::ZERO, Vector3::splat(5)).with_speed(3);
        assert_eq!(crate_.velocity, Vector3::ZERO);
    }

    #[test]
    fn pick_up_and_drop_requests() {
        let carrier = EntityId::new();
        let mut cup = Thing::portable("cup", Vector3::ZERO, Vector3::splat(4));
        assert!(cup.request_pick_up(carrier));
        assert_eq!(cup.carry.map(|c| c.carrier), Some(Some(carrier)));
        assert!(cup.request_drop());
        assert_eq!(cup.carry, Some(CarryState::default()));

        let mut rock = Thing::physical("rock", Vector3::ZERO, Vector3::splat(4));
        assert!(!rock.request_pick_up(carrier));
    }

    #[test]
    fn kind_capabilities() {
        assert!(ThingKind::Npc.is_walker());
        assert!(!ThingKind::Actor.is_walker());
        assert!(ThingKind::Portable.is_fallable());
        assert!(!ThingKind::Movable.is_fallable());
        assert!(!ThingKind::Portal.is_movable());
    }
}
