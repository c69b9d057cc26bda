//! Core types for Isoscape: vectors, things, scenes, worlds, and time.
//!
//! This crate holds the game model that the tick engine in `iso-simulation`
//! drives. It knows nothing about frontends or pacing; a [`Universe`] can be
//! built and queried entirely in memory.

/// Axis-aligned boxes and the strict intersection test.
pub mod bounds;
/// The in-game calendar, date arithmetic, and time-event classification.
pub mod calendar;
/// Per-kind state attached to things (falling, carrying, inventory, portals).
pub mod component;
/// Things, their kinds, and identifiers.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Number formatting helpers.
pub mod numbers;
/// Opaque frontend resource handles and cyclic sounds.
pub mod resource;
/// Scenes: ordered lists of things.
pub mod scene;
/// Skins: the renderable aspect of things.
pub mod skin;
/// Universes, solar systems, and stars.
pub mod universe;
/// Integer 3-vectors and the six axis directions.
pub mod vector;
/// Weather formulas.
pub mod weather;
/// Worlds: scenes sharing a player and a calendar.
pub mod world;

/// Re-exports of bounds types.
pub use bounds::{BoundingBox, Bounds};
/// Re-exports of calendar types.
pub use calendar::{
    Calendar, CalendarSpec, DateTime, GameSpeed, TimeChange, TimeEvent, TimeEventClass,
    TimeScale, TimeTrigger,
};
/// Re-exports of core entity types.
pub use entity::{EntityId, Thing, ThingKind};
/// Re-export error types.
pub use error::{IsoError, IsoResult};
/// Re-export of [`scene::Scene`].
pub use scene::Scene;
/// Re-exports of skin types.
pub use skin::{Frame, Skin};
/// Re-exports of universe types.
pub use universe::{SolarSystem, Star, Universe};
/// Re-exports of vector types.
pub use vector::{Direction, Vector3};
/// Re-export of [`world::World`].
pub use world::World;
