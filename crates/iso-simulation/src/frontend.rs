//! Seams a windowing or headless frontend implements to drive the engine.

use iso_core::resource::{FontHandle, ImageHandle, Rgb, SoundHandle, Volume};

use crate::hud::Hud;
use crate::input::InputFrame;
use crate::render::SceneFrame;

/// A sound the engine asks the frontend to play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCue {
    /// The sound.
    pub sound: SoundHandle,
    /// Left and right channel levels.
    pub volume: Volume,
}

/// Input, painting, and audio for one running game.
pub trait Frontend {
    /// Input gathered since the last poll.
    fn poll_input(&mut self) -> InputFrame;

    /// Paint the scene. Only `frame.update_rects` need repainting unless
    /// `frame.full_redraw` is set.
    fn paint_scene(&mut self, frame: &SceneFrame);

    /// Paint the title, inventory strip, captions, and examine view.
    fn paint_hud(&mut self, hud: &Hud);

    /// Present what was painted this tick.
    fn flip_display(&mut self);

    /// Play a sound.
    fn play_sound(&mut self, cue: SoundCue);
}

/// Loads game resources and hands out opaque handles.
pub trait ResourceLoader {
    /// Load failure.
    type Error;

    /// Load an image; `transparent` is the colour key, if any.
    fn load_image(&mut self, path: &str, transparent: Option<Rgb>) -> Result<ImageHandle, Self::Error>;

    /// Load a sound.
    fn load_sound(&mut self, path: &str) -> Result<SoundHandle, Self::Error>;

    /// Load a font at a point size.
    fn load_font(&mut self, name: &str, size: u32) -> Result<FontHandle, Self::Error>;
}
