//! Player interactions that change which container owns a thing: picking
//! up, dropping, selecting, and moving between scenes.

use iso_core::bounds::BoundingBox;
use iso_core::component::PlayerState;
use iso_core::entity::{EntityId, Thing, ThingKind};
use iso_core::error::IsoError;
use iso_core::vector::{Direction, Vector3};
use iso_core::world::World;

use crate::error::SimResult;
use crate::physics::{collision_checker, drop_position};

fn scene_of(world: &World, id: EntityId) -> SimResult<String> {
    world
        .locate(id)
        .map(|(scene, _)| scene.to_owned())
        .ok_or_else(|| IsoError::ObjectNotFound(id.to_string()).into())
}

fn player_state(thing: &Thing) -> SimResult<&PlayerState> {
    thing
        .player
        .as_ref()
        .ok_or_else(|| IsoError::NotAPlayer(thing.name.clone()).into())
}

fn player_state_mut(thing: &mut Thing) -> SimResult<&mut PlayerState> {
    match &mut thing.player {
        Some(state) => Ok(state),
        None => Err(IsoError::NotAPlayer(thing.name.clone()).into()),
    }
}

/// Pick up the first touched portable thing the player faces, if there is
/// room. Returns the item taken.
pub fn pick_up(world: &mut World, player: EntityId) -> SimResult<Option<EntityId>> {
    let scene_name = scene_of(world, player)?;
    let scene = world.require_scene_mut(&scene_name)?;
    let hero = scene
        .get(player)
        .ok_or_else(|| IsoError::ObjectNotFound(player.to_string()))?;
    if !player_state(hero)?.has_room() {
        tracing::debug!(player = %hero.name, "inventory full");
        return Ok(None);
    }
    let face = Direction::from_vector(hero.facing());
    let touched = hero.fall.as_ref().map(|f| f.touched.clone()).unwrap_or_default();

    for (id, touched_face) in touched {
        if touched_face != face {
            continue;
        }
        let agreed = match scene.get_mut(id) {
            Some(item) if item.kind == ThingKind::Portable => item.request_pick_up(player),
            _ => false,
        };
        if !agreed {
            continue;
        }
        let item = scene.remove_object(id)?;
        tracing::debug!(item = %item.name, "picked up");
        let hero = scene
            .get_mut(player)
            .ok_or_else(|| IsoError::ObjectNotFound(player.to_string()))?;
        player_state_mut(hero)?.inventory.push(item);
        return Ok(Some(id));
    }
    tracing::debug!(?face, "nothing to pick up");
    Ok(None)
}

/// Set the selected item down in front of the player. Refused when the
/// spot is taken. Returns the item dropped.
pub fn drop_item(world: &mut World, player: EntityId, separation: i32) -> SimResult<Option<EntityId>> {
    let scene_name = scene_of(world, player)?;
    let scene = world.require_scene_mut(&scene_name)?;
    let hero = scene
        .get(player)
        .ok_or_else(|| IsoError::ObjectNotFound(player.to_string()))?;
    let state = player_state(hero)?;
    let Some(item) = state.selected() else {
        return Ok(None);
    };
    let spot = drop_position(hero, item.size, hero.facing(), separation);
    let candidate = BoundingBox::new(spot, item.size);
    if collision_checker(&candidate, scene.objects()) {
        tracing::debug!(item = %item.name, %spot, "no room to drop");
        return Ok(None);
    }

    let hero = scene
        .get_mut(player)
        .ok_or_else(|| IsoError::ObjectNotFound(player.to_string()))?;
    let state = player_state_mut(hero)?;
    let using = state.using;
    if !state.inventory[using].request_drop() {
        return Ok(None);
    }
    let mut item = state.inventory.remove(using);
    if state.using > 0 {
        state.using -= 1;
    }
    item.location = spot;
    item.last_location = spot;
    item.velocity = Vector3::ZERO;
    let id = scene.add_object(item)?;
    Ok(Some(id))
}

/// Select the next inventory item, wrapping around. Returns the newly
/// selected item.
pub fn cycle_using(world: &mut World, player: EntityId) -> SimResult<Option<EntityId>> {
    let hero = world
        .thing_mut(player)
        .ok_or_else(|| IsoError::ObjectNotFound(player.to_string()))?;
    let state = player_state_mut(hero)?;
    if state.inventory.is_empty() {
        return Ok(None);
    }
    state.using = (state.using + 1) % state.inventory.len();
    Ok(state.selected().map(|item| item.id))
}

/// Apply a pending portal transit: move the player into its recorded scene
/// at its recorded location. Returns whether anything moved.
pub fn reconcile_migration(world: &mut World, player: EntityId) -> SimResult<bool> {
    let hero = world
        .thing(player)
        .ok_or_else(|| IsoError::ObjectNotFound(player.to_string()))?;
    let state = player_state(hero)?;
    if !state.migration_pending(hero.scene.as_deref()) {
        return Ok(false);
    }
    let Some(target) = state.current_scene.clone().or_else(|| hero.scene.clone()) else {
        return Ok(false);
    };
    let location = state.current_location.unwrap_or(hero.location);
    let from = hero.scene.clone();

    world.transfer(player, &target, location)?;
    if let Some(hero) = world.thing_mut(player) {
        let state = player_state_mut(hero)?;
        state.current_scene = Some(target.clone());
        state.current_location = None;
    }
    tracing::info!(from = ?from, to = %target, %location, "player changed scene");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iso_core::scene::Scene;

    struct Fixture {
        world: World,
        hero: EntityId,
        guitar: EntityId,
    }

    fn bedroom() -> Fixture {
        let mut world = World::new("Earth");
        let scene = world.add_scene(Scene::new("Bedroom")).unwrap();
        let guitar = scene
            .add_object(Thing::portable("guitar", Vector3::new(30, 0, 0), Vector3::new(20, 12, 20)))
            .unwrap();
        world.add_scene(Scene::new("Lounge")).unwrap();
        let hero = world
            .add_player(
                "Bedroom",
                Thing::player("hero", Vector3::new(50, 0, 0), Vector3::new(14, 14, 50)),
            )
            .unwrap();
        Fixture { world, hero, guitar }
    }

    fn touch(world: &mut World, hero: EntityId, other: EntityId, face: Direction) {
        let thing = world.thing_mut(hero).unwrap();
        thing.fall.as_mut().unwrap().touched.push((other, face));
    }

    fn face(world: &mut World, hero: EntityId, facing: Vector3) {
        world.thing_mut(hero).unwrap().actor.as_mut().unwrap().facing = facing;
    }

    #[test]
    fn pick_up_requires_facing_the_item() {
        let Fixture { mut world, hero, guitar } = bedroom();
        touch(&mut world, hero, guitar, Direction::North);

        assert_eq!(pick_up(&mut world, hero).unwrap(), None);
        face(&mut world, hero, Vector3::NORTH);
        assert_eq!(pick_up(&mut world, hero).unwrap(), Some(guitar));

        let scene = world.scene("Bedroom").unwrap();
        assert!(scene.get(guitar).is_none());
        let state = world.player().unwrap().player.as_ref().unwrap();
        assert_eq!(state.inventory.len(), 1);
        assert_eq!(state.inventory[0].carry.unwrap().carrier, Some(hero));
    }

    #[test]
    fn pick_up_respects_capacity_and_kind() {
        let Fixture { mut world, hero, guitar } = bedroom();
        let wall = world
            .scene_mut("Bedroom")
            .unwrap()
            .add_object(Thing::physical("wall", Vector3::new(0, 20, 0), Vector3::splat(10)))
            .unwrap();
        face(&mut world, hero, Vector3::NORTH);
        touch(&mut world, hero, wall, Direction::North);
        assert_eq!(pick_up(&mut world, hero).unwrap(), None);

        world.player_mut().unwrap().player.as_mut().unwrap().max_inventory = 0;
        touch(&mut world, hero, guitar, Direction::North);
        assert_eq!(pick_up(&mut world, hero).unwrap(), None);
    }

    #[test]
    fn drop_places_the_item_ahead() {
        let Fixture { mut world, hero, guitar } = bedroom();
        face(&mut world, hero, Vector3::NORTH);
        touch(&mut world, hero, guitar, Direction::North);
        pick_up(&mut world, hero).unwrap();

        face(&mut world, hero, Vector3::SOUTH);
        assert_eq!(drop_item(&mut world, hero, 4).unwrap(), Some(guitar));
        let item = world.scene("Bedroom").unwrap().get(guitar).unwrap();
        assert_eq!(item.location, Vector3::new(68, 1, 15));
        assert_eq!(item.scene.as_deref(), Some("Bedroom"));
        assert!(!item.carry.unwrap().picked_up);
        assert!(world.player().unwrap().player.as_ref().unwrap().inventory.is_empty());
        assert_eq!(drop_item(&mut world, hero, 4).unwrap(), None);
    }

    #[test]
    fn drop_is_refused_against_a_wall() {
        let Fixture { mut world, hero, guitar } = bedroom();
        face(&mut world, hero, Vector3::NORTH);
        touch(&mut world, hero, guitar, Direction::North);
        pick_up(&mut world, hero).unwrap();
        world
            .scene_mut("Bedroom")
            .unwrap()
            .add_object(Thing::physical("wall", Vector3::new(70, -50, 0), Vector3::new(10, 100, 50)))
            .unwrap();

        face(&mut world, hero, Vector3::SOUTH);
        assert_eq!(drop_item(&mut world, hero, 4).unwrap(), None);
        let state = world.player().unwrap().player.as_ref().unwrap();
        assert_eq!(state.inventory.len(), 1);
    }

    #[test]
    fn using_cycles_and_dropping_steps_back() {
        let Fixture { mut world, hero, .. } = bedroom();
        let state = world.player_mut().unwrap().player.as_mut().unwrap();
        for name in ["cup", "amp", "pick"] {
            state.inventory.push(Thing::portable(name, Vector3::ZERO, Vector3::splat(2)));
        }
        let selected = cycle_using(&mut world, hero).unwrap();
        let state = world.player().unwrap().player.as_ref().unwrap();
        assert_eq!(state.using, 1);
        assert_eq!(selected, Some(state.inventory[1].id));

        face(&mut world, hero, Vector3::WEST);
        drop_item(&mut world, hero, 4).unwrap().unwrap();
        let state = world.player().unwrap().player.as_ref().unwrap();
        assert_eq!(state.using, 0);
        assert_eq!(state.inventory.len(), 2);

        cycle_using(&mut world, hero).unwrap();
        cycle_using(&mut world, hero).unwrap();
        let state = world.player().unwrap().player.as_ref().unwrap();
        assert_eq!(state.using, 0);
    }

    #[test]
    fn pending_migration_moves_the_player() {
        let Fixture { mut world, hero, .. } = bedroom();
        assert!(!reconcile_migration(&mut world, hero).unwrap());

        let state = world.player_mut().unwrap().player.as_mut().unwrap();
        state.current_scene = Some("Lounge".into());
        state.current_location = Some(Vector3::new(160, 115, 0));
        assert!(reconcile_migration(&mut world, hero).unwrap());

        assert_eq!(world.player_scene_name(), Some("Lounge"));
        let player = world.player().unwrap();
        assert_eq!(player.location, Vector3::new(160, 115, 0));
        assert_eq!(player.player.as_ref().unwrap().current_location, None);
        assert!(world.scene("Bedroom").unwrap().get(hero).is_none());
    }
}
