//! Scenes: the rooms things live in.

use crate::entity::{EntityId, Thing};
use crate::error::{IsoError, IsoResult};
use crate::skin::Skin;

/// A room or map tile: the unit of physics and painting.
///
/// The object list order is the painter's input order; new things are
/// appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Name, unique within its world.
    pub name: String,
    /// Background image.
    pub skin: Option<Skin>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Altitude in metres.
    pub altitude: Option<f64>,
    /// Name of the world that holds this scene.
    pub world: Option<String>,
    objects: Vec<Thing>,
}

impl Scene {
    /// An empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skin: None,
            latitude: None,
            altitude: None,
            world: None,
            objects: Vec::new(),
        }
    }

    /// Set the background.
    pub fn with_skin(mut self, skin: Skin) -> Self {
        self.skin = Some(skin);
        self
    }

    /// Set latitude and altitude.
    pub fn with_position(mut self, latitude: f64, altitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.altitude = Some(altitude);
        self
    }

    // -----------------------------------------------------------------------
    // Object list
    // -----------------------------------------------------------------------

    /// Append `thing` and point it at this scene. A thing already listed
    /// (same id) is left where it is.
    pub fn add_object(&mut self, mut thing: Thing) -> IsoResult<EntityId> {
        let id = thing.id;
        if self.get(id).is_some() {
            return Ok(id);
        }
        if !thing.has_valid_size() {
            return Err(IsoError::InvalidSize {
                name: thing.name,
                size: thing.size,
            });
        }
        thing.scene = Some(self.name.clone());
        if let Some(player) = &mut thing.player {
            player.current_scene = Some(self.name.clone());
        }
        self.objects.push(thing);
        Ok(id)
    }

    /// Append several things in order.
    pub fn add_objects(&mut self, things: impl IntoIterator<Item = Thing>) -> IsoResult<()> {
        for thing in things {
            self.add_object(thing)?;
        }
        Ok(())
    }

    /// Things in painter-input order.
    pub fn objects(&self) -> &[Thing] {
        &self.objects
    }

    /// Mutable view of the things; the list itself cannot grow or shrink
    /// through it.
    pub fn objects_mut(&mut self) -> &mut [Thing] {
        &mut self.objects
    }

    /// Number of things.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene holds nothing.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// First thing with the given name.
    pub fn object(&self, name: &str) -> Option<&Thing> {
        self.objects.iter().find(|t| t.name == name)
    }

    /// Position of the first thing with the given name.
    pub fn object_index(&self, name: &str) -> IsoResult<usize> {
        self.objects
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| IsoError::ObjectNotFound(name.to_owned()))
    }

    /// Thing with the given id.
    pub fn get(&self, id: EntityId) -> Option<&Thing> {
        self.objects.iter().find(|t| t.id == id)
    }

    /// Mutable thing with the given id.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Thing> {
        self.objects.iter_mut().find(|t| t.id == id)
    }

    /// Position of the thing with the given id.
    pub fn position(&self, id: EntityId) -> Option<usize> {
        self.objects.iter().position(|t| t.id == id)
    }

    /// Take a thing out of the scene, clearing its scene pointer.
    pub fn remove_object(&mut self, id: EntityId) -> IsoResult<Thing> {
        let index = self
            .position(id)
            .ok_or_else(|| IsoError::ObjectNotFound(id.to_string()))?;
        let mut thing = self.objects.remove(index);
        thing.scene = None;
        Ok(thing)
    }

    /// Take the first thing with the given name out of the scene.
    pub fn remove_object_by_name(&mut self, name: &str) -> IsoResult<Thing> {
        let index = self.object_index(name)?;
        let mut thing = self.objects.remove(index);
        thing.scene = None;
        Ok(thing)
    }

    /// Things that have a skin and therefore get painted.
    pub fn updatable_objects(&self) -> impl Iterator<Item = &Thing> {
        self.objects.iter().filter(|t| t.skin.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ImageHandle;
    use crate::vector::Vector3;

    fn block(name: &str) -> Thing {
        Thing::physical(name, Vector3::ZERO, Vector3::splat(10))
    }

    #[test]
    fn add_sets_back_reference_and_appends() {
        let mut scene = Scene::new("Bedroom");
        scene.add_object(block("floor")).unwrap();
        scene.add_object(block("wall")).unwrap();
        let names: Vec<&str> = scene.objects().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["floor", "wall"]);
        assert_eq!(scene.object("wall").and_then(|t| t.scene.as_deref()), Some("Bedroom"));
    }

    #[test]
    fn adding_twice_is_a_no_op() {
        let mut scene = Scene::new("Bedroom");
        let thing = block("floor");
        scene.add_object(thing.clone()).unwrap();
        scene.add_object(thing).unwrap();
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn rejects_non_positive_size() {
        let mut scene = Scene::new("Bedroom");
        let flat = Thing::physical("rug", Vector3::ZERO, Vector3::new(10, 10, 0));
        assert!(matches!(
            scene.add_object(flat),
            Err(IsoError::InvalidSize { .. })
        ));
    }

    #[test]
    fn player_gets_current_scene() {
        let mut scene = Scene::new("Lounge");
        let id = scene
            .add_object(Thing::player("hero", Vector3::ZERO, Vector3::splat(5)))
            .unwrap();
        let player = scene.get(id).and_then(|t| t.player.as_ref()).unwrap();
        assert_eq!(player.current_scene.as_deref(), Some("Lounge"));
    }

    #[test]
    fn removal_by_name_and_id() {
        let mut scene = Scene::new("Bedroom");
        scene.add_object(block("a")).unwrap();
        let b = scene.add_object(block("b")).unwrap();
        scene.add_object(block("a")).unwrap();

        let removed = scene.remove_object(b).unwrap();
        assert!(removed.scene.is_none());
        assert_eq!(scene.object_index("a").unwrap(), 0);
        scene.remove_object_by_name("a").unwrap();
        assert_eq!(scene.len(), 1);
        assert_eq!(
            scene.remove_object_by_name("zzz"),
            Err(IsoError::ObjectNotFound("zzz".into()))
        );
    }

    #[test]
    fn updatable_objects_have_skins() {
        let mut scene = Scene::new("Bedroom");
        scene.add_object(block("invisible")).unwrap();
        scene
            .add_object(block("bed").with_skin(Skin::image(ImageHandle(1))))
            .unwrap();
        let names: Vec<&str> = scene.updatable_objects().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["bed"]);
    }
}
