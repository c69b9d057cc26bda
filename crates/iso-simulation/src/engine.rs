//! The tick loop: input, simulation, painting, pacing, and calendar time.

use iso_core::calendar::{DateTime, TimeEventClass, TimeTrigger};
use iso_core::entity::{EntityId, Thing};
use iso_core::error::IsoError;
use iso_core::universe::Universe;

use crate::behavior::{Respond, jump, stop, update_position};
use crate::clock::{Clock, FramePacer};
use crate::config::EngineConfig;
use crate::context::{EventContext, ReactionContext};
use crate::error::{SimError, SimResult};
use crate::event::{Event, EventBus, EventKind, EventLog, Subscriber, SubscriptionId};
use crate::frontend::Frontend;
use crate::handlers::register_default_handlers;
use crate::hud::Hud;
use crate::input::{Action, InputEvent, InputFrame};
use crate::interaction::reconcile_migration;
use crate::physics::{collision_processor, touch_processor};
use crate::projector::Rect;
use crate::render::compose;

/// Why the game loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    /// The window was closed.
    WindowClosed = 1,
    /// The player pressed escape.
    Escaped = 2,
}

impl ExitCode {
    /// Numeric process exit code.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Keep running.
    Continue,
    /// Stop with the given code.
    Exit(ExitCode),
}

/// The game engine.
///
/// Owns the universe, the event bus, and the HUD. Drives the per-tick
/// schedule: input, respond, collisions, touches, paint, pacing, calendar.
pub struct Engine {
    universe: Universe,
    config: EngineConfig,
    bus: EventBus,
    hud: Hud,
    events: EventLog,
    pacer: FramePacer,
    active_world: Option<String>,
    welcome: Option<String>,
    previous_rects: Vec<Rect>,
    last_scene: Option<String>,
    time_carry_ms: u64,
    tick: u64,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("universe", &self.universe.name)
            .field("active_world", &self.active_world)
            .field("tick", &self.tick)
            .field("events", &self.events.len())
            .field("bus", &self.bus)
            .finish()
    }
}

impl Engine {
    /// Create an engine over `universe` with the default event handlers.
    pub fn new(universe: Universe, config: EngineConfig) -> Self {
        let mut bus = EventBus::new();
        register_default_handlers(&mut bus);
        Self {
            universe,
            hud: Hud::new(config.caption_capacity),
            events: EventLog::new(config.max_events).with_quiet(EventKind::InventoryUpdate),
            pacer: FramePacer::new(config.frame_budget_ms),
            config,
            bus,
            active_world: None,
            welcome: None,
            previous_rects: Vec::new(),
            last_scene: None,
            time_carry_ms: 0,
            tick: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    /// Register a subscriber for `kind`.
    pub fn subscribe(&mut self, kind: EventKind, subscriber: impl Subscriber + 'static) -> SubscriptionId {
        self.bus.subscribe(kind, subscriber)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, kind: &EventKind, id: SubscriptionId) -> SimResult<()> {
        self.bus.unsubscribe(kind, id)
    }

    /// Publish `class` from `world`'s calendar whenever `trigger` fires and
    /// deliver it to `subscriber`.
    pub fn set_time_event(
        &mut self,
        world: &str,
        trigger: TimeTrigger,
        class: TimeEventClass,
        subscriber: impl Subscriber + 'static,
    ) -> SimResult<SubscriptionId> {
        let world = self
            .universe
            .world_mut(world)
            .ok_or_else(|| IsoError::ObjectNotFound(world.to_owned()))?;
        world.calendar_mut().set_time_event(trigger, class.clone());
        Ok(self.bus.subscribe(EventKind::Time(class), subscriber))
    }

    /// Set the caption shown when the game starts.
    pub fn set_welcome_message(&mut self, message: impl Into<String>) {
        self.welcome = Some(message.into());
    }

    /// Make `name` the world the player starts in and set its clock
    /// (defaulting to now). `welcome` overrides the welcome message.
    pub fn set_starting_world(&mut self, name: &str, time: Option<DateTime>, welcome: Option<&str>) -> SimResult<()> {
        if let Some(welcome) = welcome {
            self.welcome = Some(welcome.to_owned());
        }
        let world = self
            .universe
            .world_mut(name)
            .ok_or_else(|| IsoError::ObjectNotFound(name.to_owned()))?;
        world.set_world_time(time);
        let player = world.player().ok_or_else(|| SimError::NoPlayer(name.to_owned()))?;
        let scene = world
            .player_scene_name()
            .ok_or_else(|| SimError::NoPlayer(name.to_owned()))?;

        if let Some(welcome) = &self.welcome {
            self.hud.push_caption(welcome.clone());
        }
        self.hud.push_caption(format!("You are in '{scene}'."));
        self.hud.set_scene_title(scene);
        self.hud.set_inventory(player);

        tracing::info!(world = name, scene, time = %world.calendar().time(), "starting world set");
        self.active_world = Some(name.to_owned());
        self.last_scene = None;
        self.previous_rects.clear();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Loop
    // -----------------------------------------------------------------------

    /// Run ticks until the player quits.
    pub fn run(&mut self, frontend: &mut dyn Frontend, clock: &mut dyn Clock) -> SimResult<ExitCode> {
        tracing::info!(
            world = ?self.active_world,
            budget_ms = self.config.frame_budget_ms,
            "game loop started"
        );
        loop {
            if let StepOutcome::Exit(code) = self.tick(frontend, clock)? {
                tracing::info!(
                    ?code,
                    ticks = self.tick,
                    overruns = self.pacer.overruns(),
                    "game loop stopped"
                );
                return Ok(code);
            }
        }
    }

    /// One paced tick: poll, step, sleep out the frame budget, advance the
    /// calendars by the wall time spent.
    pub fn tick(&mut self, frontend: &mut dyn Frontend, clock: &mut dyn Clock) -> SimResult<StepOutcome> {
        let started = clock.monotonic_millis();
        let input = frontend.poll_input();
        let outcome = self.step(&input, frontend, started)?;
        if outcome != StepOutcome::Continue {
            return Ok(outcome);
        }
        let elapsed = self.pacer.pace(clock, started);
        self.advance_calendars(elapsed)?;
        Ok(outcome)
    }

    /// One tick without pacing or calendar: input, respond, collisions,
    /// touches, paint. `now_ms` drives step sounds.
    pub fn step(&mut self, input: &InputFrame, frontend: &mut dyn Frontend, now_ms: u64) -> SimResult<StepOutcome> {
        let world_name = self.active_world.clone().ok_or(SimError::NoActiveWorld)?;
        self.tick += 1;

        if self.hud.is_examining() {
            return self.step_examining(input, frontend);
        }

        let player = self.control(&world_name, input, frontend, now_ms)?;
        for event in &input.events {
            match event {
                InputEvent::Quit => return Ok(StepOutcome::Exit(ExitCode::WindowClosed)),
                InputEvent::Escape => return Ok(StepOutcome::Exit(ExitCode::Escaped)),
                InputEvent::KeyDown(action) => {
                    if let Some(event) = self.action_event(&world_name, player, *action) {
                        self.publish_in(&world_name, event)?;
                    }
                }
            }
        }

        self.simulate(&world_name, player)?;
        self.paint(&world_name, frontend)?;
        Ok(StepOutcome::Continue)
    }

    /// Advance every world's calendar by `elapsed_ms` of wall time scaled by
    /// the game speed, publishing the time events that have subscribers.
    /// Sub-second remainders carry over to the next call.
    pub fn advance_calendars(&mut self, elapsed_ms: u64) -> SimResult<()> {
        let world_ms = elapsed_ms
            .saturating_mul(u64::from(self.config.game_speed.0))
            .saturating_add(self.time_carry_ms);
        self.time_carry_ms = world_ms % 1000;
        let seconds = i64::try_from(world_ms / 1000).unwrap_or(i64::MAX);
        if seconds == 0 {
            return Ok(());
        }

        let mut fired = Vec::new();
        for world in self.universe.worlds_mut() {
            let player = world.player_id();
            for event in world.calendar_mut().advance(seconds) {
                fired.push(Event::Time {
                    world: world.name.clone(),
                    player,
                    event,
                });
            }
        }
        for event in fired {
            if !self.bus.has_subscribers(&event.kind()) {
                continue;
            }
            let Event::Time { world, .. } = &event else {
                continue;
            };
            let world = world.clone();
            self.publish_in(&world, event)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Phases
    // -----------------------------------------------------------------------

    fn step_examining(&mut self, input: &InputFrame, frontend: &mut dyn Frontend) -> SimResult<StepOutcome> {
        for event in &input.events {
            match event {
                InputEvent::Quit => return Ok(StepOutcome::Exit(ExitCode::WindowClosed)),
                InputEvent::Escape => return Ok(StepOutcome::Exit(ExitCode::Escaped)),
                InputEvent::KeyDown(_) if !self.hud.is_examining() => {}
                InputEvent::KeyDown(Action::Examine) => {
                    self.hud.close_examine();
                    self.previous_rects.clear();
                }
                InputEvent::KeyDown(_) => self.hud.advance_examine(),
            }
        }
        if self.hud.is_dirty() {
            frontend.paint_hud(&self.hud);
            self.hud.mark_clean();
        }
        frontend.flip_display();
        Ok(StepOutcome::Continue)
    }

    /// Walk, stop, and jump from held controls. Returns the player's id.
    fn control(
        &mut self,
        world_name: &str,
        input: &InputFrame,
        frontend: &mut dyn Frontend,
        now_ms: u64,
    ) -> SimResult<EntityId> {
        let world = self
            .universe
            .world_mut(world_name)
            .ok_or_else(|| IsoError::ObjectNotFound(world_name.to_owned()))?;
        let id = world
            .player_id()
            .ok_or_else(|| SimError::NoPlayer(world_name.to_owned()))?;
        let hero = world
            .thing_mut(id)
            .ok_or_else(|| IsoError::ObjectNotFound(id.to_string()))?;

        let speed = hero.speed;
        let mut walking = false;
        for action in Action::WALK {
            let Some(heading) = action.heading() else {
                continue;
            };
            if !input.is_held(action) {
                continue;
            }
            walking = true;
            if let Some(cue) = update_position(hero, heading * speed, now_ms) {
                frontend.play_sound(cue);
            }
        }
        if !walking {
            stop(hero);
        }
        if input.is_held(Action::Jump) {
            jump(hero, self.config.jump_impulse);
        }
        Ok(id)
    }

    fn action_event(&self, world_name: &str, player: EntityId, action: Action) -> Option<Event> {
        match action {
            Action::PickUp => Some(Event::PickUpItem { player }),
            Action::Drop => Some(Event::DropItem { player }),
            Action::Use | Action::Examine => {
                let hero = self.universe.world(world_name)?.thing(player)?;
                let item = hero.player.as_ref()?.selected()?;
                if action == Action::Use {
                    return Some(Event::UsingItem { player, item: item.id });
                }
                item.skin
                    .as_ref()
                    .and_then(|s| s.examine_frames())
                    .map(|_| Event::ExamineItem { player, item: item.id })
            }
            _ => None,
        }
    }

    /// Migrate the player if a portal moved it, then run the physics step
    /// on the player's scene and publish what the reactions raised.
    fn simulate(&mut self, world_name: &str, player: EntityId) -> SimResult<()> {
        let world = self
            .universe
            .world_mut(world_name)
            .ok_or_else(|| IsoError::ObjectNotFound(world_name.to_owned()))?;
        reconcile_migration(world, player)?;
        let scene_name = world
            .player_scene_name()
            .map(str::to_owned)
            .ok_or_else(|| SimError::NoPlayer(world_name.to_owned()))?;
        let scene = world.require_scene_mut(&scene_name)?;

        let mut ctx = ReactionContext::new(self.tick);
        for thing in scene.objects_mut() {
            thing.respond(&mut ctx);
        }
        collision_processor(scene.objects_mut(), &mut ctx, self.config.max_collision_passes);
        touch_processor(scene.objects_mut(), &mut ctx);

        for event in ctx.take_outbox() {
            self.publish_in(world_name, event)?;
        }
        Ok(())
    }

    fn paint(&mut self, world_name: &str, frontend: &mut dyn Frontend) -> SimResult<()> {
        let world = self
            .universe
            .world_mut(world_name)
            .ok_or_else(|| IsoError::ObjectNotFound(world_name.to_owned()))?;
        let scene_name = world
            .player_scene_name()
            .map(str::to_owned)
            .ok_or_else(|| SimError::NoPlayer(world_name.to_owned()))?;
        let changed = self.last_scene.as_deref() != Some(scene_name.as_str());
        let scene = world.require_scene_mut(&scene_name)?;

        let frame = compose(scene, self.config.display_offset, &self.previous_rects, changed)?;
        self.previous_rects = frame.sprite_rects();
        self.last_scene = Some(scene_name);

        frontend.paint_scene(&frame);
        if self.hud.is_dirty() {
            frontend.paint_hud(&self.hud);
            self.hud.mark_clean();
        }
        frontend.flip_display();
        Ok(())
    }

    fn publish_in(&mut self, world_name: &str, event: Event) -> SimResult<()> {
        let Self {
            universe,
            config,
            bus,
            hud,
            events,
            tick,
            ..
        } = self;
        let world = universe
            .world_mut(world_name)
            .ok_or_else(|| IsoError::ObjectNotFound(world_name.to_owned()))?;
        let mut ctx = EventContext::new(world, hud, config, *tick);
        bus.publish(event, &mut ctx, events)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The universe.
    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// The universe, mutably.
    pub fn universe_mut(&mut self) -> &mut Universe {
        &mut self.universe
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The heads-up display.
    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    /// Every delivered event.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Number of ticks stepped.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Name of the world being played.
    pub fn active_world(&self) -> Option<&str> {
        self.active_world.as_deref()
    }

    /// The active world's player.
    pub fn player(&self) -> Option<&Thing> {
        let name = self.active_world.as_deref()?;
        self.universe.world(name)?.player()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SceneFrame;
    use iso_core::calendar::TimeChange;
    use iso_core::resource::ImageHandle;
    use iso_core::scene::Scene;
    use iso_core::skin::{ExaminableSkin, Frame, Skin};
    use iso_core::vector::Vector3;
    use iso_core::world::World;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct NullFrontend {
        scenes: usize,
        huds: usize,
        flips: usize,
    }

    impl Frontend for NullFrontend {
        fn poll_input(&mut self) -> InputFrame {
            InputFrame::default()
        }
        fn paint_scene(&mut self, _frame: &SceneFrame) {
            self.scenes += 1;
        }
        fn paint_hud(&mut self, _hud: &Hud) {
            self.huds += 1;
        }
        fn flip_display(&mut self) {
            self.flips += 1;
        }
        fn play_sound(&mut self, _cue: crate::frontend::SoundCue) {}
    }

    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl Subscriber for Recorder {
        fn on_notice(&mut self, event: &Event, _ctx: &mut EventContext<'_>) -> SimResult<()> {
            self.0.borrow_mut().push(event.clone());
            Ok(())
        }
    }

    fn engine() -> Engine {
        let mut world = World::new("Earth");
        world.add_scene(Scene::new("Bedroom")).unwrap();
        world
            .scene_mut("Bedroom")
            .unwrap()
            .add_object(Thing::physical(
                "ground",
                Vector3::new(-1000, -1000, -100),
                Vector3::new(2000, 2000, 100),
            ))
            .unwrap();
        world
            .add_player("Bedroom", Thing::player("hero", Vector3::ZERO, Vector3::new(14, 14, 50)))
            .unwrap();
        let mut universe = Universe::new("Cosmos");
        universe.add_world(world).unwrap();
        let mut engine = Engine::new(universe, EngineConfig::default().with_frame_budget_ms(0));
        engine
            .set_starting_world("Earth", Some(DateTime::new(1972, 8, 17, 4, 30, 0)), Some("Welcome!"))
            .unwrap();
        engine
    }

    #[test]
    fn step_requires_a_starting_world() {
        let mut engine = Engine::new(Universe::new("Empty"), EngineConfig::default());
        let err = engine
            .step(&InputFrame::default(), &mut NullFrontend::default(), 0)
            .unwrap_err();
        assert!(matches!(err, SimError::NoActiveWorld));
    }

    #[test]
    fn starting_world_greets_the_player() {
        let engine = engine();
        let captions: Vec<&str> = engine.hud().captions().map(|c| c.text.as_str()).collect();
        assert_eq!(captions, vec!["Welcome!", "You are in 'Bedroom'."]);
        assert_eq!(engine.hud().scene_title(), Some("Bedroom"));
    }

    #[test]
    fn quit_and_escape_map_to_exit_codes() {
        let mut engine = engine();
        let mut frontend = NullFrontend::default();
        let quit = InputFrame::default().with_event(InputEvent::Quit);
        let escape = InputFrame::default().with_event(InputEvent::Escape);
        assert_eq!(
            engine.step(&quit, &mut frontend, 0).unwrap(),
            StepOutcome::Exit(ExitCode::WindowClosed)
        );
        assert_eq!(
            engine.step(&escape, &mut frontend, 0).unwrap(),
            StepOutcome::Exit(ExitCode::Escaped)
        );
        assert_eq!(ExitCode::Escaped.code(), 2);
        assert_eq!(frontend.scenes, 0);
    }

    #[test]
    fn step_paints_hud_only_when_dirty() {
        let mut engine = engine();
        let mut frontend = NullFrontend::default();
        engine.step(&InputFrame::default(), &mut frontend, 0).unwrap();
        engine.step(&InputFrame::default(), &mut frontend, 50).unwrap();
        assert_eq!(frontend.scenes, 2);
        assert_eq!(frontend.flips, 2);
        assert_eq!(frontend.huds, 1);
    }

    #[test]
    fn calendar_carries_partial_seconds() {
        let mut engine = engine();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        engine
            .set_time_event(
                "Earth",
                TimeTrigger::Change(TimeChange::Hour),
                TimeEventClass::HourChange,
                Recorder(sink),
            )
            .unwrap();
        engine.config.game_speed = iso_core::calendar::GameSpeed::SPEED_00;

        engine.advance_calendars(1_799_600).unwrap();
        assert!(seen.borrow().is_empty());
        engine.advance_calendars(1_400).unwrap();
        assert_eq!(seen.borrow().len(), 1);
        let time = engine.universe().world("Earth").unwrap().calendar().time().clone();
        assert_eq!((time.hours, time.minutes, time.seconds), (5, 0, 1));
    }

    #[test]
    fn examine_freezes_the_scene() {
        let mut engine = engine();
        let letter = Thing::portable("letter", Vector3::ZERO, Vector3::splat(2)).with_skin(Skin::Examinable(
            ExaminableSkin::new(
                vec![Frame::new(ImageHandle(1))],
                vec![Frame::new(ImageHandle(2)), Frame::new(ImageHandle(3))],
            ),
        ));
        let world = engine.universe_mut().world_mut("Earth").unwrap();
        world.player_mut().unwrap().player.as_mut().unwrap().inventory.push(letter);
        world.player_mut().unwrap().location = Vector3::new(0, 0, 40);

        let mut frontend = NullFrontend::default();
        let examine = InputFrame::default().with_event(InputEvent::KeyDown(Action::Examine));
        engine.step(&examine, &mut frontend, 0).unwrap();
        assert!(engine.hud().is_examining());
        let z = engine.player().unwrap().location.z;

        let other = InputFrame::default().with_event(InputEvent::KeyDown(Action::Jump));
        engine.step(&other, &mut frontend, 0).unwrap();
        assert_eq!(engine.hud().examine().unwrap().index, 1);
        assert_eq!(engine.player().unwrap().location.z, z);

        engine.step(&examine, &mut frontend, 0).unwrap();
        assert!(!engine.hud().is_examining());
    }
}
