//! The two-room demo: a bedroom and a lounge joined by a door.

use iso_core::calendar::{Calendar, DateTime, Season, TimeOfDay};
use iso_core::component::ThingText;
use iso_core::entity::Thing;
use iso_core::resource::{CyclicSound, Rgb};
use iso_core::scene::Scene;
use iso_core::skin::{DirectionalSkin, ExaminableSkin, Frame, Skin};
use iso_core::universe::Universe;
use iso_core::vector::Vector3;
use iso_core::world::World;
use iso_simulation::ResourceLoader;

/// Name of the demo world.
pub const WORLD: &str = "Earth";
/// The scene the player starts in.
pub const BEDROOM: &str = "The Bedroom";
/// The scene behind the door.
pub const LOUNGE: &str = "The Lounge";

const MAGENTA: Option<Rgb> = Some(Rgb(255, 0, 255));

fn image<L: ResourceLoader<Error = String>>(loader: &mut L, path: &str) -> Result<Frame, String> {
    loader.load_image(path, MAGENTA).map(Frame::new)
}

fn skin<L: ResourceLoader<Error = String>>(loader: &mut L, path: &str) -> Result<Skin, String> {
    Ok(Skin::Static(vec![image(loader, path)?]))
}

fn frames<L: ResourceLoader<Error = String>>(loader: &mut L, paths: &[&str]) -> Result<Vec<Frame>, String> {
    paths.iter().map(|p| image(loader, p)).collect()
}

fn ground() -> Thing {
    Thing::physical(
        "ground",
        Vector3::new(-1000, -1000, -100),
        Vector3::new(2000, 2000, 100),
    )
}

/// Four walls around the 180 x 180 floor.
fn walls() -> Vec<Thing> {
    vec![
        Thing::physical("east wall", Vector3::new(180, 0, -20), Vector3::new(20, 180, 120)),
        Thing::physical("south wall", Vector3::new(0, 180, -20), Vector3::new(180, 20, 120)),
        Thing::physical("north wall", Vector3::new(0, -20, -20), Vector3::new(180, 20, 120)),
        Thing::physical("west wall", Vector3::new(-20, 0, -20), Vector3::new(20, 180, 120)),
    ]
}

fn bedroom<L: ResourceLoader<Error = String>>(loader: &mut L) -> Result<Scene, String> {
    let mut scene = Scene::new(BEDROOM).with_skin(skin(loader, "images/bedroom.png")?);
    scene.add_object(ground()).map_err(|e| e.to_string())?;
    scene.add_objects(walls()).map_err(|e| e.to_string())?;

    let door = Thing::portal(
        "door",
        Vector3::new(180, 105, 0),
        Vector3::new(10, 30, 56),
        Some(LOUNGE),
        Vector3::new(20, 115, 0),
    )
    .with_skin(skin(loader, "images/door.png")?)
    .with_text(ThingText::default().with_exited("The door creaks shut behind you."));

    let bed = Thing::movable("bed", Vector3::new(0, 100, 0), Vector3::new(70, 52, 28))
        .with_skin(skin(loader, "images/bed.png")?);

    let guitar = Thing::portable("guitar", Vector3::new(60, 0, 40), Vector3::new(20, 12, 20))
        .with_skin(Skin::Examinable(ExaminableSkin::new(
            frames(loader, &["images/guitar.png"])?,
            frames(loader, &["images/guitar-front.png", "images/guitar-back.png"])?,
        )))
        .with_text(
            ThingText::default()
                .with_examined("An old acoustic guitar. Someone carved initials into the back.")
                .with_used("You strum a chord. It is badly out of tune."),
        );

    scene
        .add_objects([door, bed, guitar])
        .map_err(|e| e.to_string())?;
    Ok(scene)
}

fn lounge<L: ResourceLoader<Error = String>>(loader: &mut L) -> Result<Scene, String> {
    let mut scene = Scene::new(LOUNGE).with_skin(skin(loader, "images/lounge.png")?);
    scene.add_object(ground()).map_err(|e| e.to_string())?;
    scene.add_objects(walls()).map_err(|e| e.to_string())?;

    let door = Thing::portal(
        "door",
        Vector3::new(0, 105, 0),
        Vector3::new(10, 30, 56),
        Some(BEDROOM),
        Vector3::new(160, 115, 0),
    )
    .with_skin(skin(loader, "images/door.png")?);

    let sofa = Thing::physical("sofa", Vector3::new(0, 0, 0), Vector3::new(39, 66, 37))
        .with_skin(skin(loader, "images/sofa.png")?);

    let amp = Thing::portable("amp", Vector3::new(60, 0, 25), Vector3::new(16, 10, 18))
        .with_skin(skin(loader, "images/amp.png")?)
        .with_text(ThingText::default().with_picked_up("The amp is heavier than it looks."));

    scene
        .add_objects([door, sofa, amp])
        .map_err(|e| e.to_string())?;
    Ok(scene)
}

fn player<L: ResourceLoader<Error = String>>(loader: &mut L) -> Result<Thing, String> {
    let south = frames(loader, &["images/hero-s0.png", "images/hero-s1.png", "images/hero-s2.png"])?;
    let east = frames(loader, &["images/hero-e0.png", "images/hero-e1.png", "images/hero-e2.png"])?;
    let skin = DirectionalSkin::builder(south, east)
        .frame_sequence(vec![0, 1, 0, 2])
        .build()
        .map_err(|e| e.to_string())?;
    let step = loader.load_sound("sounds/step.wav")?;

    Ok(
        Thing::player("hero", Vector3::new(90, 90, 100), Vector3::new(14, 14, 50))
            .with_speed(2)
            .with_skin(Skin::Directional(skin))
            .with_walk_sound(CyclicSound::new(step, 400)),
    )
}

/// Build the demo universe, loading its resources through `loader`.
pub fn build<L: ResourceLoader<Error = String>>(loader: &mut L, start: DateTime) -> Result<Universe, String> {
    let calendar = Calendar::new(start)
        .with_dawn(TimeOfDay::new(6, 0, 0))
        .with_dusk(TimeOfDay::new(20, 30, 0))
        .with_seasons(vec![
            Season::new("Spring", 3, 20),
            Season::new("Summer", 6, 21),
            Season::new("Autumn", 9, 22),
            Season::new("Winter", 12, 21),
        ]);
    let mut world = World::new(WORLD).with_calendar(calendar);
    world.add_scene(bedroom(loader)?).map_err(|e| e.to_string())?;
    world.add_scene(lounge(loader)?).map_err(|e| e.to_string())?;
    world
        .add_player(BEDROOM, player(loader)?)
        .map_err(|e| e.to_string())?;

    let mut universe = Universe::new("Isoscape");
    universe.add_world(world).map_err(|e| e.to_string())?;
    Ok(universe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessFrontend;

    #[test]
    fn demo_has_two_linked_rooms() {
        let mut loader = HeadlessFrontend::default();
        let universe = build(&mut loader, DateTime::new(1972, 8, 17, 4, 30, 0)).unwrap();
        let world = universe.world(WORLD).unwrap();
        assert_eq!(world.player_scene_name(), Some(BEDROOM));

        let door = world.scene(BEDROOM).unwrap().object("door").unwrap();
        assert_eq!(door.portal.as_ref().unwrap().to_scene.as_deref(), Some(LOUNGE));
        assert!(world.scene(LOUNGE).unwrap().object("amp").is_some());
        assert_eq!(world.calendar().current_season().unwrap().name, "Summer");
        assert!(loader.images_loaded() > 10);
    }
}
