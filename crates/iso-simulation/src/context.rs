use iso_core::world::World;

use crate::config::EngineConfig;
use crate::event::Event;
use crate::hud::Hud;

/// Mutable context passed to event subscribers.
///
/// Events published here are delivered after the current event has reached
/// all of its subscribers.
pub struct EventContext<'a> {
    /// The world the event happened in.
    pub world: &'a mut World,
    /// The heads-up display.
    pub hud: &'a mut Hud,
    /// Engine settings.
    pub config: &'a EngineConfig,
    tick: u64,
    outbox: Vec<Event>,
}

impl<'a> EventContext<'a> {
    /// A context for dispatching during `tick`.
    pub fn new(world: &'a mut World, hud: &'a mut Hud, config: &'a EngineConfig, tick: u64) -> Self {
        Self {
            world,
            hud,
            config,
            tick,
            outbox: Vec::new(),
        }
    }

    /// Queue a follow-up event.
    pub fn publish(&mut self, event: Event) {
        self.outbox.push(event);
    }

    /// Take the queued events.
    pub fn take_outbox(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }

    /// The current tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

/// Context passed to per-thing reactions (respond, collide, touch).
///
/// Reactions cannot reach the scene; anything they want to change beyond
/// the things involved goes out as an event after the physics step.
#[derive(Debug, Default)]
pub struct ReactionContext {
    tick: u64,
    outbox: Vec<Event>,
}

impl ReactionContext {
    /// A context for `tick`.
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            outbox: Vec::new(),
        }
    }

    /// The current tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Queue an event for publication after the physics step.
    pub fn publish(&mut self, event: Event) {
        self.outbox.push(event);
    }

    /// Take the queued events.
    pub fn take_outbox(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }
}
