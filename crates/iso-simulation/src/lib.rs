//! Tick engine for Isoscape.
//!
//! Drives an [`iso_core::Universe`]: per tick it reads input, lets every thing
//! in the player's scene respond, resolves collisions to a fixed point,
//! senses touches, and hands a depth-ordered paint list to a [`Frontend`].
//! Between ticks it paces to the frame budget and advances the calendars,
//! publishing scheduled time events on the [`EventBus`].

/// Per-thing reactions: falling, moving, walking, NPC turns, portals.
pub mod behavior;
/// Wall-clock sources and frame pacing.
pub mod clock;
/// Engine settings.
pub mod config;
/// Mutable contexts handed to subscribers and reactions.
pub mod context;
/// The tick loop.
pub mod engine;
/// Error types for the simulation crate.
pub mod error;
/// Events, the event bus, and the event log.
pub mod event;
/// Seams implemented by windowing or headless frontends.
pub mod frontend;
/// Default event subscribers.
pub mod handlers;
/// Frontend-neutral heads-up display state.
pub mod hud;
/// Player controls and per-tick input.
pub mod input;
/// Pick up, drop, use, and scene migration.
pub mod interaction;
/// Collision detection and resolution, touch sensing, drop placement.
pub mod physics;
/// Isometric projection and depth ordering.
pub mod projector;
/// Scene composition into paint lists.
pub mod render;

/// Re-exports of clock types.
pub use clock::{Clock, FramePacer, ManualClock, SystemClock};
/// Re-export of [`config::EngineConfig`].
pub use config::EngineConfig;
/// Re-exports of [`context::EventContext`] and [`context::ReactionContext`].
pub use context::{EventContext, ReactionContext};
/// Re-exports of engine types.
pub use engine::{Engine, ExitCode, StepOutcome};
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of event types.
pub use event::{Event, EventBus, EventKind, EventLog, EventRecord, Subscriber, SubscriptionId};
/// Re-exports of frontend seams.
pub use frontend::{Frontend, ResourceLoader, SoundCue};
/// Re-export of [`handlers::TimeAnnouncer`].
pub use handlers::TimeAnnouncer;
/// Re-export of [`hud::Hud`].
pub use hud::Hud;
/// Re-exports of input types.
pub use input::{Action, InputEvent, InputFrame};
/// Re-exports of render types.
pub use render::{SceneFrame, Sprite};
