//! A frontend without a window: input comes from a script, painting is
//! counted, captions go to stdout.

use std::collections::{HashMap, VecDeque};
use std::str::FromStr;

use iso_core::resource::{FontHandle, ImageHandle, Rgb, SoundHandle};
use iso_simulation::{Action, Frontend, Hud, InputEvent, InputFrame, ResourceLoader, SceneFrame, SoundCue};

/// One scripted tick.
pub type Script = VecDeque<InputFrame>;

/// Parse a demo script: comma-separated `action*count` tokens.
///
/// Walking and `jump` are held for `count` ticks; `pick_up`, `drop`, `use`
/// and `examine` press the key once per tick for `count` ticks. `wait*n`
/// idles, `quit` closes the window, `escape` leaves the game.
pub fn parse_script(source: &str) -> Result<Script, String> {
    let mut script = Script::new();
    for token in source.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (name, count) = match token.split_once('*') {
            Some((name, count)) => {
                let count: usize = count
                    .trim()
                    .parse()
                    .map_err(|_| format!("bad repeat count in '{token}'"))?;
                (name.trim(), count)
            }
            None => (token, 1),
        };

        let frame = match name {
            "wait" => InputFrame::default(),
            "quit" => InputFrame::default().with_event(InputEvent::Quit),
            "escape" => InputFrame::default().with_event(InputEvent::Escape),
            _ => {
                let action = Action::from_str(name).map_err(|e| e.to_string())?;
                if action.heading().is_some() || action == Action::Jump {
                    InputFrame::default().with_held(action)
                } else {
                    InputFrame::default().with_event(InputEvent::KeyDown(action))
                }
            }
        };
        script.extend(std::iter::repeat_n(frame, count));
    }
    Ok(script)
}

/// Scripted, windowless frontend.
#[derive(Debug, Default)]
pub struct HeadlessFrontend {
    script: Script,
    echo: bool,
    last_serial: u64,
    transcript: Vec<String>,
    scene_paints: usize,
    full_redraws: usize,
    sprites_painted: usize,
    sounds_played: usize,
    images: HashMap<String, ImageHandle>,
    sounds: HashMap<String, SoundHandle>,
    next_handle: u32,
}

impl HeadlessFrontend {
    /// A frontend playing `script`, printing captions when `echo` is set.
    pub fn new(script: Script, echo: bool) -> Self {
        Self {
            script,
            echo,
            ..Self::default()
        }
    }

    /// Every caption shown so far.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Number of scene paints.
    pub fn scene_paints(&self) -> usize {
        self.scene_paints
    }

    /// Number of scene paints that redrew everything.
    pub fn full_redraws(&self) -> usize {
        self.full_redraws
    }

    /// Number of sprites painted across all frames.
    pub fn sprites_painted(&self) -> usize {
        self.sprites_painted
    }

    /// Number of sounds played.
    pub fn sounds_played(&self) -> usize {
        self.sounds_played
    }

    /// Number of distinct images loaded.
    pub fn images_loaded(&self) -> usize {
        self.images.len()
    }

    fn handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl Frontend for HeadlessFrontend {
    fn poll_input(&mut self) -> InputFrame {
        self.script.pop_front().unwrap_or_default()
    }

    fn paint_scene(&mut self, frame: &SceneFrame) {
        self.scene_paints += 1;
        if frame.full_redraw {
            self.full_redraws += 1;
        }
        self.sprites_painted += frame.sprites.len();
    }

    fn paint_hud(&mut self, hud: &Hud) {
        for caption in hud.captions_since(self.last_serial) {
            if self.echo {
                println!("  > {}", caption.text);
            }
            self.transcript.push(caption.text.clone());
        }
        self.last_serial = hud.last_serial();
    }

    fn flip_display(&mut self) {}

    fn play_sound(&mut self, cue: SoundCue) {
        tracing::trace!(sound = cue.sound.0, "play");
        self.sounds_played += 1;
    }
}

impl ResourceLoader for HeadlessFrontend {
    type Error = String;

    fn load_image(&mut self, path: &str, _transparent: Option<Rgb>) -> Result<ImageHandle, String> {
        if path.is_empty() {
            return Err("empty image path".into());
        }
        if let Some(handle) = self.images.get(path) {
            return Ok(*handle);
        }
        let handle = ImageHandle(self.handle());
        self.images.insert(path.to_owned(), handle);
        Ok(handle)
    }

    fn load_sound(&mut self, path: &str) -> Result<SoundHandle, String> {
        if path.is_empty() {
            return Err("empty sound path".into());
        }
        if let Some(handle) = self.sounds.get(path) {
            return Ok(*handle);
        }
        let handle = SoundHandle(self.handle());
        self.sounds.insert(path.to_owned(), handle);
        Ok(handle)
    }

    fn load_font(&mut self, name: &str, size: u32) -> Result<FontHandle, String> {
        if name.is_empty() || size == 0 {
            return Err(format!("bad font '{name}' at {size}pt"));
        }
        Ok(FontHandle(self.handle()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_expands_counts() {
        let script = parse_script("wait*2, down*3,pick_up,quit").unwrap();
        assert_eq!(script.len(), 7);
        assert!(script[2].is_held(Action::Down));
        assert_eq!(script[5].events, vec![InputEvent::KeyDown(Action::PickUp)]);
        assert_eq!(script[6].events, vec![InputEvent::Quit]);
    }

    #[test]
    fn script_rejects_unknown_actions() {
        assert!(parse_script("dance*2").unwrap_err().contains("dance"));
        assert!(parse_script("up*x").is_err());
        assert!(parse_script("").unwrap().is_empty());
    }

    #[test]
    fn loader_reuses_handles() {
        let mut frontend = HeadlessFrontend::default();
        let a = frontend.load_image("bed.png", None).unwrap();
        let b = frontend.load_image("bed.png", Some(Rgb(255, 0, 255))).unwrap();
        let c = frontend.load_image("sofa.png", None).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(frontend.images_loaded(), 2);
        assert!(frontend.load_font("", 12).is_err());
    }
}
