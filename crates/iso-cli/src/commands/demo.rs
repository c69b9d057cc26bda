use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use iso_core::calendar::{DateTime, GameSpeed};
use iso_simulation::{Clock, Engine, ManualClock, StepOutcome, SystemClock};

use crate::demo_world::{self, WORLD};
use crate::headless::{HeadlessFrontend, parse_script};

/// Options of the `demo` command.
pub struct DemoOptions<'a> {
    pub ticks: u64,
    pub script: Option<&'a str>,
    pub speed: Option<u32>,
    pub config: Option<&'a Path>,
    pub realtime: bool,
}

pub fn run(options: &DemoOptions<'_>) -> Result<(), String> {
    let mut config = super::load_config(options.config)?;
    if let Some(speed) = options.speed {
        config.game_speed = GameSpeed(speed);
    }

    let script = parse_script(options.script.unwrap_or_default())?;
    let mut frontend = HeadlessFrontend::new(script, true);
    let start = DateTime::new(1972, 8, 17, 4, 30, 0);
    let universe = demo_world::build(&mut frontend, start.clone())?;

    let mut engine = Engine::new(universe, config);
    engine
        .set_starting_world(WORLD, Some(start), Some("Welcome to Isoscape!"))
        .map_err(|e| e.to_string())?;

    let mut clock: Box<dyn Clock> = if options.realtime {
        Box::new(SystemClock::new())
    } else {
        Box::new(ManualClock::default())
    };

    let mut exit = None;
    for _ in 0..options.ticks {
        if let StepOutcome::Exit(code) = engine.tick(&mut frontend, clock.as_mut()).map_err(|e| e.to_string())? {
            exit = Some(code);
            break;
        }
    }

    print_summary(&engine, &frontend);
    match exit {
        Some(code) => println!("  Stopped by the player ({code:?}, exit code {})", code.code()),
        None => println!("  Stopped after {} ticks", engine.tick_count()),
    }
    Ok(())
}

fn print_summary(engine: &Engine, frontend: &HeadlessFrontend) {
    let Some(world) = engine.universe().world(WORLD) else {
        return;
    };
    let scene_name = world.player_scene_name().unwrap_or("nowhere");

    println!();
    println!("  {}", scene_name.bold().underline());
    println!("  {}", world.calendar().time().friendly_date().dimmed());
    if let Some(player) = engine.player() {
        println!("  Player at {}", player.location);
    }
    println!();

    if let Some(scene) = world.scene(scene_name) {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Name", "Kind", "Location", "Size"]);
        for thing in scene.objects() {
            table.add_row(vec![
                thing.name.clone(),
                thing.kind.to_string(),
                thing.location.to_string(),
                thing.size.to_string(),
            ]);
        }
        println!("{table}");
        println!();
    }

    let inventory = engine.hud().inventory();
    if inventory.is_empty() {
        println!("  Carrying nothing.");
    } else {
        let names: Vec<&str> = inventory.iter().map(|slot| slot.name.as_str()).collect();
        println!("  Carrying: {}", names.join(", "));
    }

    println!(
        "  {} captions, {} events, {} frames ({} full), {} sprites, {} sounds, {} images",
        frontend.transcript().len(),
        engine.events().len(),
        frontend.scene_paints(),
        frontend.full_redraws(),
        frontend.sprites_painted(),
        frontend.sounds_played(),
        frontend.images_loaded(),
    );
}
