//! Engine events, the publish/subscribe bus, and the event log.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use iso_core::calendar::{TimeEvent, TimeEventClass};
use iso_core::entity::EntityId;
use iso_core::vector::Vector3;

use crate::context::EventContext;
use crate::error::{SimError, SimResult};

/// Something that happened in a world and that subscribers react to.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The player touched a portal.
    PlayerTouchPortal {
        /// The player.
        player: EntityId,
        /// The portal.
        portal: EntityId,
        /// Scene the portal leads to.
        to_scene: String,
        /// Where the player arrives.
        to_location: Vector3,
    },
    /// The player's inventory changed.
    InventoryUpdate {
        /// The player.
        player: EntityId,
    },
    /// The player asked to select the next item.
    UsingItem {
        /// The player.
        player: EntityId,
        /// The item selected before the request.
        item: EntityId,
    },
    /// The player asked to pick something up.
    PickUpItem {
        /// The player.
        player: EntityId,
    },
    /// The player asked to drop the selected item.
    DropItem {
        /// The player.
        player: EntityId,
    },
    /// The player asked to examine the selected item.
    ExamineItem {
        /// The player.
        player: EntityId,
        /// The selected item.
        item: EntityId,
    },
    /// A scheduled calendar trigger fired.
    Time {
        /// World whose calendar fired.
        world: String,
        /// That world's player, if any.
        player: Option<EntityId>,
        /// The fired event.
        event: TimeEvent,
    },
}

impl Event {
    /// The kind subscribers register for.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PlayerTouchPortal { .. } => EventKind::PlayerTouchPortal,
            Self::InventoryUpdate { .. } => EventKind::InventoryUpdate,
            Self::UsingItem { .. } => EventKind::UsingItem,
            Self::PickUpItem { .. } => EventKind::PickUpItem,
            Self::DropItem { .. } => EventKind::DropItem,
            Self::ExamineItem { .. } => EventKind::ExamineItem,
            Self::Time { event, .. } => EventKind::Time(event.class.clone()),
        }
    }

    /// Check whether a given entity is involved in this event.
    pub fn involves(&self, id: EntityId) -> bool {
        match self {
            Self::PlayerTouchPortal { player, portal, .. } => *player == id || *portal == id,
            Self::InventoryUpdate { player }
            | Self::PickUpItem { player }
            | Self::DropItem { player } => *player == id,
            Self::UsingItem { player, item } | Self::ExamineItem { player, item } => {
                *player == id || *item == id
            }
            Self::Time { player, .. } => *player == Some(id),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayerTouchPortal {
                player,
                to_scene,
                to_location,
                ..
            } => write!(f, "{player} touched a portal to '{to_scene}' at {to_location}"),
            Self::InventoryUpdate { player } => write!(f, "inventory of {player} changed"),
            Self::UsingItem { player, item } => write!(f, "{player} uses {item}"),
            Self::PickUpItem { player } => write!(f, "{player} reaches for an item"),
            Self::DropItem { player } => write!(f, "{player} drops an item"),
            Self::ExamineItem { player, item } => write!(f, "{player} examines {item}"),
            Self::Time { world, event, .. } => {
                write!(f, "{} in '{world}' at {}", event.class, event.time)
            }
        }
    }
}

/// Dispatch key of an [`Event`]. Time events are keyed by their class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`Event::PlayerTouchPortal`].
    PlayerTouchPortal,
    /// See [`Event::InventoryUpdate`].
    InventoryUpdate,
    /// See [`Event::UsingItem`].
    UsingItem,
    /// See [`Event::PickUpItem`].
    PickUpItem,
    /// See [`Event::DropItem`].
    DropItem,
    /// See [`Event::ExamineItem`].
    ExamineItem,
    /// See [`Event::Time`].
    Time(TimeEventClass),
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayerTouchPortal => f.write_str("player-touch-portal"),
            Self::InventoryUpdate => f.write_str("inventory-update"),
            Self::UsingItem => f.write_str("using-item"),
            Self::PickUpItem => f.write_str("pick-up-item"),
            Self::DropItem => f.write_str("drop-item"),
            Self::ExamineItem => f.write_str("examine-item"),
            Self::Time(class) => write!(f, "time ({class})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reacts to events of the kinds it is subscribed to.
pub trait Subscriber {
    /// Handle one event.
    fn on_notice(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> SimResult<()>;
}

impl<F> Subscriber for F
where
    F: FnMut(&Event, &mut EventContext<'_>) -> SimResult<()>,
{
    fn on_notice(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> SimResult<()> {
        self(event, ctx)
    }
}

type Subscription = (SubscriptionId, Box<dyn Subscriber>);

/// Per-kind ordered subscriber lists.
#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<EventKind, Vec<Subscription>>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&EventKind, usize> =
            self.subscribers.iter().map(|(k, v)| (k, v.len())).collect();
        f.debug_struct("EventBus")
            .field("subscribers", &counts)
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl EventBus {
    /// An empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscriber to `kind`'s list.
    pub fn subscribe(&mut self, kind: EventKind, subscriber: impl Subscriber + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers
            .entry(kind)
            .or_default()
            .push((id, Box::new(subscriber)));
        id
    }

    /// Append a closure subscriber to `kind`'s list.
    pub fn subscribe_fn<F>(&mut self, kind: EventKind, f: F) -> SubscriptionId
    where
        F: FnMut(&Event, &mut EventContext<'_>) -> SimResult<()> + 'static,
    {
        self.subscribe(kind, f)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, kind: &EventKind, id: SubscriptionId) -> SimResult<()> {
        let list = self
            .subscribers
            .get_mut(kind)
            .ok_or(SimError::SubscriptionNotFound(id))?;
        let index = list
            .iter()
            .position(|(sub, _)| *sub == id)
            .ok_or(SimError::SubscriptionNotFound(id))?;
        list.remove(index);
        if list.is_empty() {
            self.subscribers.remove(kind);
        }
        Ok(())
    }

    /// Whether anyone listens for `kind`.
    pub fn has_subscribers(&self, kind: &EventKind) -> bool {
        self.subscribers.get(kind).is_some_and(|l| !l.is_empty())
    }

    /// Number of subscribers for `kind`.
    pub fn subscriber_count(&self, kind: &EventKind) -> usize {
        self.subscribers.get(kind).map_or(0, Vec::len)
    }

    /// Deliver one event to its kind's subscribers in registration order.
    /// Events the subscribers publish stay queued in `ctx`.
    pub fn notify(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> SimResult<()> {
        let kind = event.kind();
        let list = match self.subscribers.get_mut(&kind) {
            Some(list) if !list.is_empty() => list,
            _ => return Err(SimError::EventSubscriberNotFound(kind)),
        };
        for (_, subscriber) in list.iter_mut() {
            subscriber.on_notice(event, ctx)?;
        }
        Ok(())
    }

    /// Deliver an event and everything its subscribers publish, breadth
    /// first, recording each delivered event in `log`.
    pub fn publish(&mut self, event: Event, ctx: &mut EventContext<'_>, log: &mut EventLog) -> SimResult<()> {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            tracing::debug!(kind = %event.kind(), tick = ctx.tick(), "dispatching {event}");
            self.notify(&event, ctx)?;
            log.push(EventRecord::new(ctx.tick(), event));
            queue.extend(ctx.take_outbox());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

/// A delivered event and the tick it was delivered at.
#[derive(Debug, Clone)]
pub struct EventRecord {
    /// The engine tick when this event was delivered.
    pub tick: u64,
    /// The event.
    pub event: Event,
    /// A human-readable description of the event.
    pub description: String,
}

impl EventRecord {
    /// Record an event delivered at `tick`.
    pub fn new(tick: u64, event: Event) -> Self {
        let description = event.to_string();
        Self {
            tick,
            event,
            description,
        }
    }
}

/// Delivered events, newest last.
///
/// Keeps at most `capacity` records (0 keeps everything), dropping the oldest.
/// Quiet kinds are counted by [`EventLog::delivered`] but never stored; the
/// engine keeps `InventoryUpdate` quiet since one follows every pick-up,
/// drop, and use.
#[derive(Debug, Default)]
pub struct EventLog {
    records: VecDeque<EventRecord>,
    capacity: usize,
    quiet: HashSet<EventKind>,
    delivered: HashMap<EventKind, u64>,
}

impl EventLog {
    /// An empty log holding at most `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Count `kind` without storing it.
    pub fn with_quiet(mut self, kind: EventKind) -> Self {
        self.quiet.insert(kind);
        self
    }

    /// Record a delivery.
    pub fn push(&mut self, record: EventRecord) {
        let kind = record.event.kind();
        let quiet = self.quiet.contains(&kind);
        *self.delivered.entry(kind).or_default() += 1;
        if quiet {
            return;
        }
        if self.capacity > 0 && self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Stored records, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// The newest stored record.
    pub fn last(&self) -> Option<&EventRecord> {
        self.records.back()
    }

    /// Stored records delivered at `tick`.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&EventRecord> {
        self.records.iter().filter(|r| r.tick == tick).collect()
    }

    /// Stored records involving `id`.
    pub fn events_for_entity(&self, id: EntityId) -> Vec<&EventRecord> {
        self.records.iter().filter(|r| r.event.involves(id)).collect()
    }

    /// Stored records of `kind`.
    pub fn events_of_kind(&self, kind: &EventKind) -> Vec<&EventRecord> {
        self.records.iter().filter(|r| r.event.kind() == *kind).collect()
    }

    /// How many `kind` events were ever delivered, stored or not.
    pub fn delivered(&self, kind: &EventKind) -> u64 {
        self.delivered.get(kind).copied().unwrap_or(0)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forget every record and count.
    pub fn clear(&mut self) {
        self.records.clear();
        self.delivered.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::EngineConfig;
    use crate::hud::Hud;
    use iso_core::world::World;

    fn fixtures() -> (World, Hud, EngineConfig) {
        (World::new("Earth"), Hud::new(10), EngineConfig::default())
    }

    #[test]
    fn notify_without_subscribers_fails() {
        let (mut world, mut hud, config) = fixtures();
        let mut ctx = EventContext::new(&mut world, &mut hud, &config, 0);
        let mut bus = EventBus::new();
        let player = EntityId::new();
        let err = bus
            .notify(&Event::DropItem { player }, &mut ctx)
            .unwrap_err();
        assert!(matches!(err, SimError::EventSubscriberNotFound(EventKind::DropItem)));
    }

    #[test]
    fn delivery_follows_registration_order() {
        let (mut world, mut hud, config) = fixtures();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for label in ["first", "second", "third"] {
            let seen = Rc::clone(&seen);
            bus.subscribe_fn(EventKind::InventoryUpdate, move |_, _| {
                seen.borrow_mut().push(label);
                Ok(())
            });
        }
        let mut ctx = EventContext::new(&mut world, &mut hud, &config, 0);
        bus.notify(&Event::InventoryUpdate { player: EntityId::new() }, &mut ctx)
            .unwrap();
        assert_eq!(*seen.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribe_removes_only_that_subscription() {
        let mut bus = EventBus::new();
        let a = bus.subscribe_fn(EventKind::DropItem, |_, _| Ok(()));
        let b = bus.subscribe_fn(EventKind::DropItem, |_, _| Ok(()));
        bus.unsubscribe(&EventKind::DropItem, a).unwrap();
        assert_eq!(bus.subscriber_count(&EventKind::DropItem), 1);
        assert!(matches!(
            bus.unsubscribe(&EventKind::DropItem, a),
            Err(SimError::SubscriptionNotFound(id)) if id == a
        ));
        bus.unsubscribe(&EventKind::DropItem, b).unwrap();
        assert!(!bus.has_subscribers(&EventKind::DropItem));
    }

    #[test]
    fn published_follow_ups_are_delivered_breadth_first() {
        let (mut world, mut hud, config) = fixtures();
        let player = EntityId::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let log_seen = Rc::clone(&seen);
        bus.subscribe_fn(EventKind::DropItem, move |_, ctx| {
            log_seen.borrow_mut().push("drop");
            ctx.publish(Event::InventoryUpdate { player });
            Ok(())
        });
        let log_seen = Rc::clone(&seen);
        bus.subscribe_fn(EventKind::DropItem, move |_, _| {
            log_seen.borrow_mut().push("drop-2");
            Ok(())
        });
        let log_seen = Rc::clone(&seen);
        bus.subscribe_fn(EventKind::InventoryUpdate, move |_, _| {
            log_seen.borrow_mut().push("inventory");
            Ok(())
        });

        let mut log = EventLog::new(0);
        let mut ctx = EventContext::new(&mut world, &mut hud, &config, 7);
        bus.publish(Event::DropItem { player }, &mut ctx, &mut log)
            .unwrap();
        assert_eq!(*seen.borrow(), vec!["drop", "drop-2", "inventory"]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.events_at_tick(7).len(), 2);
        assert_eq!(log.events_of_kind(&EventKind::InventoryUpdate).len(), 1);
    }

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        let player = EntityId::new();
        let item = EntityId::new();
        log.push(EventRecord::new(1, Event::UsingItem { player, item }));
        assert_eq!(log.len(), 1);
        assert_eq!(log.events_at_tick(1).len(), 1);
        assert_eq!(log.events_for_entity(item).len(), 1);
        assert!(log.events_for_entity(EntityId::new()).is_empty());
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        let player = EntityId::new();
        for i in 0..5 {
            log.push(EventRecord::new(i, Event::PickUpItem { player }));
        }
        assert_eq!(log.len(), 2);
        assert_eq!(log.records().next().map(|r| r.tick), Some(3));
        assert_eq!(log.last().map(|r| r.tick), Some(4));
        assert_eq!(log.delivered(&EventKind::PickUpItem), 5);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.delivered(&EventKind::PickUpItem), 0);
    }

    #[test]
    fn quiet_kinds_are_counted_not_kept() {
        let mut log = EventLog::new(0).with_quiet(EventKind::InventoryUpdate);
        let player = EntityId::new();
        log.push(EventRecord::new(1, Event::DropItem { player }));
        log.push(EventRecord::new(1, Event::InventoryUpdate { player }));
        log.push(EventRecord::new(2, Event::InventoryUpdate { player }));
        assert_eq!(log.len(), 1);
        assert!(log.events_of_kind(&EventKind::InventoryUpdate).is_empty());
        assert_eq!(log.delivered(&EventKind::InventoryUpdate), 2);
        assert_eq!(log.delivered(&EventKind::DropItem), 1);
    }
}
