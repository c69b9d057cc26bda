//! Worlds: named scenes, one player, and a calendar.

use crate::calendar::{Calendar, DateTime};
use crate::entity::{EntityId, Thing, ThingKind};
use crate::error::{IsoError, IsoResult};
use crate::scene::Scene;
use crate::vector::Vector3;

/// Default axial tilt of a world, in degrees.
pub const DEFAULT_AXIAL_TILT: f64 = 23.0;

/// A named set of scenes sharing one player and one calendar.
#[derive(Debug, Clone)]
pub struct World {
    /// Name, unique within the universe.
    pub name: String,
    /// Axial tilt in degrees.
    pub axial_tilt: f64,
    /// Name of the solar system this world orbits in.
    pub solar_system: Option<String>,
    /// Name of the universe holding this world.
    pub universe: Option<String>,
    scenes: Vec<Scene>,
    player: Option<EntityId>,
    calendar: Calendar,
}

impl World {
    /// An empty world whose calendar starts at the current local time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            axial_tilt: DEFAULT_AXIAL_TILT,
            solar_system: None,
            universe: None,
            scenes: Vec::new(),
            player: None,
            calendar: Calendar::default(),
        }
    }

    /// Replace the calendar.
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Set the axial tilt.
    pub fn with_axial_tilt(mut self, degrees: f64) -> Self {
        self.axial_tilt = degrees;
        self
    }

    // -----------------------------------------------------------------------
    // Scenes
    // -----------------------------------------------------------------------

    /// Add a scene. Scene names are unique within a world.
    pub fn add_scene(&mut self, mut scene: Scene) -> IsoResult<&mut Scene> {
        if self.scene(&scene.name).is_some() {
            return Err(IsoError::DuplicateObject(scene.name));
        }
        scene.world = Some(self.name.clone());
        self.scenes.push(scene);
        let last = self.scenes.len() - 1;
        Ok(&mut self.scenes[last])
    }

    /// Scene by name.
    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.name == name)
    }

    /// Mutable scene by name.
    pub fn scene_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.name == name)
    }

    /// Scene by name, or [`IsoError::ObjectNotFound`].
    pub fn require_scene_mut(&mut self, name: &str) -> IsoResult<&mut Scene> {
        self.scene_mut(name)
            .ok_or_else(|| IsoError::ObjectNotFound(name.to_owned()))
    }

    /// All scenes in insertion order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// All scenes, mutably.
    pub fn scenes_mut(&mut self) -> &mut [Scene] {
        &mut self.scenes
    }

    // -----------------------------------------------------------------------
    // Things
    // -----------------------------------------------------------------------

    /// Name of the scene listing `id` and its position there.
    pub fn locate(&self, id: EntityId) -> Option<(&str, usize)> {
        self.scenes
            .iter()
            .find_map(|s| s.position(id).map(|i| (s.name.as_str(), i)))
    }

    /// Thing by id, in any scene.
    pub fn thing(&self, id: EntityId) -> Option<&Thing> {
        self.scenes.iter().find_map(|s| s.get(id))
    }

    /// Mutable thing by id, in any scene.
    pub fn thing_mut(&mut self, id: EntityId) -> Option<&mut Thing> {
        self.scenes.iter_mut().find_map(|s| s.get_mut(id))
    }

    /// Move a thing to `scene` at `location`. Moving within the same scene
    /// only relocates it.
    pub fn transfer(&mut self, id: EntityId, scene: &str, location: Vector3) -> IsoResult<()> {
        if self.scene(scene).is_none() {
            return Err(IsoError::ObjectNotFound(scene.to_owned()));
        }
        let from = self
            .locate(id)
            .map(|(name, _)| name.to_owned())
            .ok_or_else(|| IsoError::ObjectNotFound(id.to_string()))?;
        if from != scene {
            let thing = self.require_scene_mut(&from)?.remove_object(id)?;
            self.require_scene_mut(scene)?.add_object(thing)?;
        }
        let thing = self
            .thing_mut(id)
            .ok_or_else(|| IsoError::ObjectNotFound(id.to_string()))?;
        thing.location = location;
        thing.last_location = location;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Player
    // -----------------------------------------------------------------------

    /// Put the player into `scene` and make it this world's player.
    pub fn add_player(&mut self, scene: &str, player: Thing) -> IsoResult<EntityId> {
        if player.kind != ThingKind::Player {
            return Err(IsoError::NotAPlayer(player.name));
        }
        let id = self.require_scene_mut(scene)?.add_object(player)?;
        self.player = Some(id);
        Ok(id)
    }

    /// Id of the active player.
    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    /// The active player.
    pub fn player(&self) -> Option<&Thing> {
        self.player.and_then(|id| self.thing(id))
    }

    /// The active player, mutably.
    pub fn player_mut(&mut self) -> Option<&mut Thing> {
        let id = self.player?;
        self.thing_mut(id)
    }

    /// Scene currently listing the player.
    pub fn player_scene_name(&self) -> Option<&str> {
        self.player
            .and_then(|id| self.locate(id))
            .map(|(scene, _)| scene)
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    /// The world's calendar.
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// The world's calendar, mutably.
    pub fn calendar_mut(&mut self) -> &mut Calendar {
        &mut self.calendar
    }

    /// Set the world clock, defaulting to the current local time. No time
    /// events fire.
    pub fn set_world_time(&mut self, time: Option<DateTime>) {
        self.calendar.reset(time.unwrap_or_else(DateTime::now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_rooms() -> World {
        let mut world = World::new("Earth");
        world.add_scene(Scene::new("Bedroom")).unwrap();
        world.add_scene(Scene::new("Lounge")).unwrap();
        world
    }

    #[test]
    fn scene_names_are_unique() {
        let mut world = two_rooms();
        assert_eq!(
            world.add_scene(Scene::new("Lounge")).map(|_| ()),
            Err(IsoError::DuplicateObject("Lounge".into()))
        );
        assert_eq!(world.scene("Lounge").and_then(|s| s.world.as_deref()), Some("Earth"));
        assert_eq!(world.axial_tilt, 23.0);
    }

    #[test]
    fn add_player_requires_player_kind_and_scene() {
        let mut world = two_rooms();
        let rock = Thing::physical("rock", Vector3::ZERO, Vector3::splat(3));
        assert_eq!(
            world.add_player("Bedroom", rock),
            Err(IsoError::NotAPlayer("rock".into()))
        );
        let hero = Thing::player("hero", Vector3::ZERO, Vector3::splat(3));
        assert_eq!(
            world.add_player("Attic", hero.clone()),
            Err(IsoError::ObjectNotFound("Attic".into()))
        );
        let id = world.add_player("Bedroom", hero).unwrap();
        assert_eq!(world.player_id(), Some(id));
        assert_eq!(world.player_scene_name(), Some("Bedroom"));
    }

    #[test]
    fn transfer_moves_between_scenes() {
        let mut world = two_rooms();
        let hero = Thing::player("hero", Vector3::ZERO, Vector3::splat(3));
        let id = world.add_player("Bedroom", hero).unwrap();

        world.transfer(id, "Lounge", Vector3::new(160, 115, 0)).unwrap();
        assert_eq!(world.player_scene_name(), Some("Lounge"));
        assert!(world.scene("Bedroom").unwrap().is_empty());
        let player = world.player().unwrap();
        assert_eq!(player.location, Vector3::new(160, 115, 0));
        assert_eq!(player.scene.as_deref(), Some("Lounge"));

        world.transfer(id, "Lounge", Vector3::new(1, 2, 3)).unwrap();
        assert_eq!(world.scene("Lounge").unwrap().len(), 1);
        assert_eq!(world.player().unwrap().location, Vector3::new(1, 2, 3));
    }

    #[test]
    fn set_world_time_resets_calendar() {
        let mut world = World::new("Earth");
        world.set_world_time(Some(DateTime::new(1972, 8, 17, 4, 30, 0)));
        assert_eq!(world.calendar().time().hours, 4);
        assert!(world.calendar().last_time().is_none());
    }
}
