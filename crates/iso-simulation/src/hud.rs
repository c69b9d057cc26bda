//! Frontend-neutral heads-up display state.
//!
//! The engine writes captions, the inventory strip, and the examine view
//! here; frontends read it in [`crate::frontend::Frontend::paint_hud`].

use std::collections::VecDeque;

use iso_core::entity::{EntityId, Thing};
use iso_core::skin::Frame;

/// A line of text in the caption scrollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    /// Increasing sequence number, starting at 1.
    pub serial: u64,
    /// The text.
    pub text: String,
}

/// One item in the inventory strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySlot {
    /// The item.
    pub item: EntityId,
    /// Its display name.
    pub name: String,
    /// Its icon.
    pub frame: Option<Frame>,
}

/// Close-up images of the item being examined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamineView {
    /// The examined item.
    pub item: EntityId,
    /// Its display name.
    pub name: String,
    /// Close-up images.
    pub frames: Vec<Frame>,
    /// Index of the image on display.
    pub index: usize,
}

impl ExamineView {
    /// The image on display.
    pub fn current(&self) -> Option<Frame> {
        self.frames.get(self.index).copied()
    }
}

/// Everything drawn around the scene.
#[derive(Debug, Clone, Default)]
pub struct Hud {
    captions: VecDeque<Caption>,
    capacity: usize,
    last_serial: u64,
    inventory: Vec<InventorySlot>,
    selected: usize,
    examine: Option<ExamineView>,
    scene_title: Option<String>,
    dirty: bool,
}

impl Hud {
    /// An empty HUD keeping at most `capacity` captions (0 = unlimited).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    // -----------------------------------------------------------------------
    // Captions
    // -----------------------------------------------------------------------

    /// Append a caption; empty text is ignored.
    pub fn push_caption(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.last_serial += 1;
        self.captions.push_back(Caption {
            serial: self.last_serial,
            text,
        });
        if self.capacity > 0 && self.captions.len() > self.capacity {
            let excess = self.captions.len() - self.capacity;
            self.captions.drain(..excess);
        }
        self.dirty = true;
    }

    /// Retained captions, oldest first.
    pub fn captions(&self) -> impl Iterator<Item = &Caption> {
        self.captions.iter()
    }

    /// Retained captions newer than `serial`.
    pub fn captions_since(&self, serial: u64) -> impl Iterator<Item = &Caption> {
        self.captions.iter().filter(move |c| c.serial > serial)
    }

    /// The newest caption.
    pub fn latest_caption(&self) -> Option<&str> {
        self.captions.back().map(|c| c.text.as_str())
    }

    /// Serial of the newest caption ever pushed, 0 if none.
    pub fn last_serial(&self) -> u64 {
        self.last_serial
    }

    // -----------------------------------------------------------------------
    // Inventory strip
    // -----------------------------------------------------------------------

    /// Rebuild the strip from a player's inventory. Slots are ordered from
    /// the selected item onwards, wrapping around.
    pub fn set_inventory(&mut self, player: &Thing) {
        let Some(state) = &player.player else {
            return;
        };
        let n = state.inventory.len();
        self.inventory = (0..n)
            .map(|i| &state.inventory[(state.using + i) % n])
            .map(|item| InventorySlot {
                item: item.id,
                name: item.name.clone(),
                frame: item.skin.as_ref().and_then(|s| s.first_frame()),
            })
            .collect();
        self.selected = state.using;
        self.dirty = true;
    }

    /// Inventory slots, selected item first.
    pub fn inventory(&self) -> &[InventorySlot] {
        &self.inventory
    }

    /// Index of the selected item in the player's inventory.
    pub fn selected(&self) -> usize {
        self.selected
    }

    // -----------------------------------------------------------------------
    // Examine view
    // -----------------------------------------------------------------------

    /// Show close-up images of an item.
    pub fn open_examine(&mut self, item: &Thing, frames: Vec<Frame>) {
        self.examine = Some(ExamineView {
            item: item.id,
            name: item.name.clone(),
            frames,
            index: 0,
        });
        self.dirty = true;
    }

    /// The open examine view.
    pub fn examine(&self) -> Option<&ExamineView> {
        self.examine.as_ref()
    }

    /// Whether an examine view is open.
    pub fn is_examining(&self) -> bool {
        self.examine.is_some()
    }

    /// Show the next close-up image, wrapping around.
    pub fn advance_examine(&mut self) {
        if let Some(view) = &mut self.examine {
            if !view.frames.is_empty() {
                view.index = (view.index + 1) % view.frames.len();
            }
            self.dirty = true;
        }
    }

    /// Close the examine view.
    pub fn close_examine(&mut self) {
        if self.examine.take().is_some() {
            self.dirty = true;
        }
    }

    // -----------------------------------------------------------------------
    // Title and repaint tracking
    // -----------------------------------------------------------------------

    /// Set the title shown above the scene.
    pub fn set_scene_title(&mut self, title: impl Into<String>) {
        self.scene_title = Some(title.into());
        self.dirty = true;
    }

    /// The scene title.
    pub fn scene_title(&self) -> Option<&str> {
        self.scene_title.as_deref()
    }

    /// Whether anything changed since the last [`Hud::mark_clean`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the HUD has been painted.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iso_core::resource::ImageHandle;
    use iso_core::skin::Skin;
    use iso_core::vector::Vector3;

    #[test]
    fn captions_are_bounded_and_numbered() {
        let mut hud = Hud::new(2);
        hud.push_caption("one");
        hud.push_caption("");
        hud.push_caption("two");
        hud.push_caption("three");
        let texts: Vec<&str> = hud.captions().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "three"]);
        assert_eq!(hud.last_serial(), 3);
        assert_eq!(hud.captions_since(2).count(), 1);
        assert_eq!(hud.latest_caption(), Some("three"));
    }

    #[test]
    fn inventory_strip_starts_at_selected_item() {
        let mut player = Thing::player("hero", Vector3::ZERO, Vector3::splat(10));
        let state = player.player.as_mut().unwrap();
        for name in ["guitar", "amp", "cup"] {
            state.inventory.push(
                Thing::portable(name, Vector3::ZERO, Vector3::splat(2))
                    .with_skin(Skin::image(ImageHandle(7))),
            );
        }
        state.using = 1;

        let mut hud = Hud::new(10);
        hud.set_inventory(&player);
        let names: Vec<&str> = hud.inventory().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["amp", "cup", "guitar"]);
        assert_eq!(hud.selected(), 1);
        assert_eq!(hud.inventory()[0].frame, Some(Frame::new(ImageHandle(7))));
    }

    #[test]
    fn examine_view_cycles_and_closes() {
        let item = Thing::portable("letter", Vector3::ZERO, Vector3::splat(2));
        let frames = vec![Frame::new(ImageHandle(1)), Frame::new(ImageHandle(2))];
        let mut hud = Hud::new(10);
        hud.open_examine(&item, frames);
        hud.mark_clean();

        hud.advance_examine();
        assert!(hud.is_dirty());
        assert_eq!(hud.examine().and_then(ExamineView::current), Some(Frame::new(ImageHandle(2))));
        hud.advance_examine();
        assert_eq!(hud.examine().map(|v| v.index), Some(0));
        hud.close_examine();
        assert!(!hud.is_examining());
    }
}
