use crate::entity::Thing;
use crate::error::{IsoError, IsoResult};
use crate::resource::Rgb;
use crate::world::World;

/// Mass density of empty space, in g/cm³.
pub const COSMOLOGICAL_CONSTANT: f64 = 1e-29;
/// Speed of light, in m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Spectral class used when none is given.
pub const STAR_TYPE_M: &str = "M";

/// A sun.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    /// Spectral class.
    pub star_type: String,
    /// Apparent colour.
    pub color: Option<Rgb>,
    /// Mass in solar masses.
    pub mass: Option<f64>,
    /// Radius in solar radii.
    pub radius: Option<f64>,
    /// Luminosity in solar luminosities.
    pub luminosity: Option<f64>,
    /// Surface temperature in kelvin.
    pub temperature: Option<f64>,
}

impl Default for Star {
    fn default() -> Self {
        Self {
            star_type: STAR_TYPE_M.to_owned(),
            color: None,
            mass: None,
            radius: None,
            luminosity: None,
            temperature: None,
        }
    }
}

/// A sun and the worlds orbiting it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolarSystem {
    /// Name, unique within the universe.
    pub name: String,
    /// The central star.
    pub sun: Option<Star>,
    planets: Vec<String>,
}

impl SolarSystem {
    /// A solar system without planets.
    pub fn new(name: impl Into<String>, sun: Option<Star>) -> Self {
        Self {
            name: name.into(),
            sun,
            planets: Vec::new(),
        }
    }

    /// Names of the worlds in this system.
    pub fn planets(&self) -> &[String] {
        &self.planets
    }
}

/// The top-level container of a game.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    /// Name of the game universe.
    pub name: String,
    worlds: Vec<World>,
    solar_systems: Vec<SolarSystem>,
}

impl Universe {
    /// An empty universe.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a world. World names are unique.
    pub fn add_world(&mut self, mut world: World) -> IsoResult<&mut World> {
        if self.world(&world.name).is_some() {
            return Err(IsoError::DuplicateObject(world.name));
        }
        world.universe = Some(self.name.clone());
        self.worlds.push(world);
        let last = self.worlds.len() - 1;
        Ok(&mut self.worlds[last])
    }

    /// World by name.
    pub fn world(&self, name: &str) -> Option<&World> {
        self.worlds.iter().find(|w| w.name == name)
    }

    /// Mutable world by name.
    pub fn world_mut(&mut self, name: &str) -> Option<&mut World> {
        self.worlds.iter_mut().find(|w| w.name == name)
    }

    /// The first world added.
    pub fn first_world(&self) -> Option<&World> {
        self.worlds.first()
    }

    /// All worlds in insertion order.
    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    /// All worlds, mutably.
    pub fn worlds_mut(&mut self) -> &mut [World] {
        &mut self.worlds
    }

    /// The first world's player.
    pub fn player(&self) -> Option<&Thing> {
        self.first_world().and_then(World::player)
    }

    /// Add a solar system. Names are unique.
    pub fn add_solar_system(&mut self, system: SolarSystem) -> IsoResult<&mut SolarSystem> {
        if self.solar_system(&system.name).is_some() {
            return Err(IsoError::DuplicateObject(system.name));
        }
        self.solar_systems.push(system);
        let last = self.solar_systems.len() - 1;
        Ok(&mut self.solar_systems[last])
    }

    /// Solar system by name.
    pub fn solar_system(&self, name: &str) -> Option<&SolarSystem> {
        self.solar_systems.iter().find(|s| s.name == name)
    }

    /// Put a world into orbit in a solar system.
    pub fn place_world(&mut self, world: &str, system: &str) -> IsoResult<()> {
        let planet = self
            .world_mut(world)
            .ok_or_else(|| IsoError::ObjectNotFound(world.to_owned()))?;
        planet.solar_system = Some(system.to_owned());
        let system = self
            .solar_systems
            .iter_mut()
            .find(|s| s.name == system)
            .ok_or_else(|| IsoError::ObjectNotFound(system.to_owned()))?;
        if !system.planets.iter().any(|p| p == world) {
            system.planets.push(world.to_owned());
        }
        Ok(())
    }

    /// The sun a world orbits.
    pub fn sun_of(&self, world: &str) -> Option<&Star> {
        let system = self.world(world)?.solar_system.as_deref()?;
        self.solar_system(system)?.sun.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_names_are_unique() {
        let mut universe = Universe::new("Isoscape");
        universe.add_world(World::new("Earth")).unwrap();
        assert!(matches!(
            universe.add_world(World::new("Earth")),
            Err(IsoError::DuplicateObject(_))
        ));
        assert_eq!(
            universe.first_world().and_then(|w| w.universe.as_deref()),
            Some("Isoscape")
        );
    }

    #[test]
    fn worlds_find_their_sun() {
        let mut universe = Universe::new("Isoscape");
        universe.add_world(World::new("Earth")).unwrap();
        universe
            .add_solar_system(SolarSystem::new("Sol", Some(Star::default())))
            .unwrap();
        universe.place_world("Earth", "Sol").unwrap();
        universe.place_world("Earth", "Sol").unwrap();

        assert_eq!(universe.sun_of("Earth").map(|s| s.star_type.as_str()), Some("M"));
        assert_eq!(universe.solar_system("Sol").unwrap().planets(), ["Earth"]);
        assert!(universe.place_world("Mars", "Sol").is_err());
    }
}
