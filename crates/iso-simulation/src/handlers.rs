//! Default event subscribers: portal transit, inventory bookkeeping, and the
//! time announcer.

use std::collections::HashMap;

use iso_core::calendar::{TimeChange, TimeTrigger};
use iso_core::entity::{EntityId, Thing};
use iso_core::error::IsoError;

use crate::context::EventContext;
use crate::error::SimResult;
use crate::event::{Event, EventBus, EventKind, Subscriber};
use crate::interaction::{cycle_using, drop_item, pick_up};

/// Subscribe the default handlers, one per player event kind.
pub fn register_default_handlers(bus: &mut EventBus) {
    bus.subscribe(EventKind::PlayerTouchPortal, PortalTransit);
    bus.subscribe(EventKind::InventoryUpdate, InventoryRefresh);
    bus.subscribe(EventKind::UsingItem, UseItem);
    bus.subscribe(EventKind::PickUpItem, PickUp);
    bus.subscribe(EventKind::DropItem, Drop);
    bus.subscribe(EventKind::ExamineItem, Examine);
}

fn inventory_item(ctx: &EventContext<'_>, player: EntityId, item: EntityId) -> Option<Thing> {
    ctx.world
        .thing(player)
        .and_then(|p| p.player.as_ref())
        .and_then(|state| state.inventory.iter().find(|t| t.id == item))
        .cloned()
}

/// Records the portal's destination on the player; the move itself happens
/// at the start of the next tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortalTransit;

impl Subscriber for PortalTransit {
    fn on_notice(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> SimResult<()> {
        let Event::PlayerTouchPortal {
            player,
            portal,
            to_scene,
            to_location,
        } = event
        else {
            return Ok(());
        };
        if ctx.world.scene(to_scene).is_none() {
            return Err(IsoError::ObjectNotFound(to_scene.clone()).into());
        }
        let text = ctx.world.thing(*portal).map(|p| p.text.clone()).unwrap_or_default();

        let hero = ctx
            .world
            .thing_mut(*player)
            .ok_or_else(|| IsoError::ObjectNotFound(player.to_string()))?;
        let state = hero
            .player
            .as_mut()
            .ok_or_else(|| IsoError::NotAPlayer(hero.name.clone()))?;
        state.current_scene = Some(to_scene.clone());
        state.current_location = Some(*to_location);

        if let Some(exited) = text.exited {
            ctx.hud.push_caption(exited);
        }
        ctx.hud.push_caption(
            text.entered
                .unwrap_or_else(|| format!("You are in '{to_scene}'.")),
        );
        ctx.hud.set_scene_title(to_scene.clone());
        Ok(())
    }
}

/// Rebuilds the HUD inventory strip.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryRefresh;

impl Subscriber for InventoryRefresh {
    fn on_notice(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> SimResult<()> {
        let Event::InventoryUpdate { player } = event else {
            return Ok(());
        };
        if let Some(hero) = ctx.world.thing(*player) {
            ctx.hud.set_inventory(hero);
        }
        Ok(())
    }
}

/// Selects the next inventory item.
#[derive(Debug, Clone, Copy, Default)]
pub struct UseItem;

impl Subscriber for UseItem {
    fn on_notice(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> SimResult<()> {
        let Event::UsingItem { player, item } = event else {
            return Ok(());
        };
        let used = inventory_item(ctx, *player, *item);
        cycle_using(ctx.world, *player)?;
        if let Some(used) = used {
            ctx.hud.push_caption(
                used.text
                    .used
                    .unwrap_or_else(|| format!("You are using the {}.", used.name)),
            );
        }
        ctx.publish(Event::InventoryUpdate { player: *player });
        Ok(())
    }
}

/// Takes the item the player faces.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickUp;

impl Subscriber for PickUp {
    fn on_notice(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> SimResult<()> {
        let Event::PickUpItem { player } = event else {
            return Ok(());
        };
        let Some(id) = pick_up(ctx.world, *player)? else {
            return Ok(());
        };
        if let Some(item) = inventory_item(ctx, *player, id) {
            ctx.hud.push_caption(
                item.text
                    .picked_up
                    .unwrap_or_else(|| format!("You picked up the {}.", item.name)),
            );
        }
        ctx.publish(Event::InventoryUpdate { player: *player });
        Ok(())
    }
}

/// Sets the selected item down.
#[derive(Debug, Clone, Copy, Default)]
pub struct Drop;

impl Subscriber for Drop {
    fn on_notice(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> SimResult<()> {
        let Event::DropItem { player } = event else {
            return Ok(());
        };
        let separation = ctx.config.drop_separation;
        let Some(id) = drop_item(ctx.world, *player, separation)? else {
            return Ok(());
        };
        if let Some(item) = ctx.world.thing(id) {
            let caption = item
                .text
                .dropped
                .clone()
                .unwrap_or_else(|| format!("You dropped the {}.", item.name));
            ctx.hud.push_caption(caption);
        }
        ctx.publish(Event::InventoryUpdate { player: *player });
        Ok(())
    }
}

/// Opens the close-up view of an examinable item.
#[derive(Debug, Clone, Copy, Default)]
pub struct Examine;

impl Subscriber for Examine {
    fn on_notice(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> SimResult<()> {
        let Event::ExamineItem { player, item } = event else {
            return Ok(());
        };
        let Some(item) = inventory_item(ctx, *player, *item) else {
            return Ok(());
        };
        let Some(frames) = item.skin.as_ref().and_then(|s| s.examine_frames()) else {
            return Ok(());
        };
        ctx.hud.open_examine(&item, frames.to_vec());
        if let Some(text) = &item.text.examined {
            ctx.hud.push_caption(text.clone());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Announces calendar events as captions.
#[derive(Debug, Clone, Default)]
pub struct TimeAnnouncer {
    hour_messages: HashMap<i64, String>,
}

impl TimeAnnouncer {
    /// An announcer with the stock lines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce `message` instead of the stock line when `hour` strikes.
    pub fn with_hour_message(mut self, hour: i64, message: impl Into<String>) -> Self {
        self.hour_messages.insert(hour, message.into());
        self
    }
}

impl Subscriber for TimeAnnouncer {
    fn on_notice(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> SimResult<()> {
        let Event::Time { event: time, .. } = event else {
            return Ok(());
        };
        let line = match time.trigger {
            TimeTrigger::Change(TimeChange::Hour) => {
                let hour = time.time.hours;
                self.hour_messages
                    .get(&hour)
                    .cloned()
                    .unwrap_or_else(|| format!("It is now {hour} o'clock."))
            }
            TimeTrigger::Change(TimeChange::Day) => format!("It is {}.", time.time.friendly_date()),
            TimeTrigger::Change(TimeChange::Season) => match ctx.world.calendar().current_season() {
                Some(season) => format!("{} has begun.", season.name),
                None => format!("The season turns on {}.", time.time.friendly_date()),
            },
            _ => format!("{}: it is {}.", time.class, time.time),
        };
        ctx.hud.push_caption(line);
        Ok(())
    }
}
