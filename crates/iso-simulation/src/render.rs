//! Composes a scene into a paint list for the frontend.

use iso_core::bounds::BoundingBox;
use iso_core::error::IsoResult;
use iso_core::entity::EntityId;
use iso_core::scene::Scene;
use iso_core::skin::Frame;

use crate::behavior::Render;
use crate::projector::{Rect, combine_rects, depth_order, sprite_rect};

/// One thing's image and where it goes on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    /// The thing painted.
    pub thing: EntityId,
    /// Its frame this tick.
    pub frame: Frame,
    /// Where it lands.
    pub rect: Rect,
}

/// Everything the frontend needs to paint one tick of a scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneFrame {
    /// Scene backdrop, if the scene has a skin.
    pub background: Option<Frame>,
    /// Sprites back to front.
    pub sprites: Vec<Sprite>,
    /// Regions that changed since the previous frame.
    pub update_rects: Vec<Rect>,
    /// Repaint everything, e.g. after a scene change.
    pub full_redraw: bool,
}

impl SceneFrame {
    /// Screen rectangles of this frame's sprites, in paint order.
    pub fn sprite_rects(&self) -> Vec<Rect> {
        self.sprites.iter().map(|s| s.rect).collect()
    }
}

/// Compose `scene` for painting. `previous` holds the sprite rectangles of
/// the last painted frame; an empty slice forces a full redraw.
pub fn compose(scene: &mut Scene, offset: [i32; 2], previous: &[Rect], scene_changed: bool) -> IsoResult<SceneFrame> {
    let background = scene.skin.as_ref().and_then(|s| s.first_frame());

    let skinned: Vec<usize> = scene
        .objects()
        .iter()
        .enumerate()
        .filter(|(_, t)| t.skin.is_some())
        .map(|(i, _)| i)
        .collect();
    let boxes: Vec<BoundingBox> = skinned
        .iter()
        .map(|&i| {
            let t = &scene.objects()[i];
            BoundingBox::new(t.location, t.size)
        })
        .collect();

    let mut sprites = Vec::with_capacity(skinned.len());
    for slot in depth_order(&boxes) {
        let thing = &mut scene.objects_mut()[skinned[slot]];
        let Some(frame) = thing.current_frame()? else {
            continue;
        };
        sprites.push(Sprite {
            thing: thing.id,
            frame,
            rect: sprite_rect(thing.location, thing.size, offset),
        });
    }

    let rects: Vec<Rect> = sprites.iter().map(|s| s.rect).collect();
    Ok(SceneFrame {
        background,
        sprites,
        update_rects: combine_rects(&rects, previous),
        full_redraw: scene_changed || previous.is_empty(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use iso_core::entity::Thing;
    use iso_core::resource::ImageHandle;
    use iso_core::skin::Skin;
    use iso_core::vector::Vector3;

    fn room() -> Scene {
        let mut scene = Scene::new("Bedroom").with_skin(Skin::image(ImageHandle(1)));
        scene
            .add_object(
                Thing::physical("bed", Vector3::new(0, 100, 0), Vector3::new(70, 52, 28))
                    .with_skin(Skin::image(ImageHandle(2))),
            )
            .unwrap();
        scene
            .add_object(
                Thing::physical("rug", Vector3::new(0, 0, 0), Vector3::new(20, 20, 1))
                    .with_skin(Skin::image(ImageHandle(3))),
            )
            .unwrap();
        scene
            .add_object(Thing::physical("ground", Vector3::new(-1000, -1000, -100), Vector3::new(2000, 2000, 100)))
            .unwrap();
        scene
    }

    #[test]
    fn unskinned_things_are_not_painted() {
        let mut scene = room();
        let frame = compose(&mut scene, [200, 120], &[], false).unwrap();
        assert_eq!(frame.background, Some(Frame::new(ImageHandle(1))));
        let images: Vec<u32> = frame.sprites.iter().map(|s| s.frame.image.0).collect();
        assert_eq!(images, vec![3, 2]);
        assert!(frame.full_redraw);
        assert_eq!(frame.sprites[1].rect, Rect::new(48, 142, 122, 89));
    }

    #[test]
    fn update_rects_cover_old_and_new_positions() {
        let mut scene = room();
        let first = compose(&mut scene, [200, 120], &[], false).unwrap();
        let rug = scene.object("rug").unwrap().id;
        scene.get_mut(rug).unwrap().location = Vector3::new(10, 0, 0);

        let second = compose(&mut scene, [200, 120], &first.sprite_rects(), false).unwrap();
        assert!(!second.full_redraw);
        let old = first.sprites[0].rect;
        let new = second.sprites[0].rect;
        assert_eq!(second.update_rects[0], old.union(&new));
    }

    #[test]
    fn scene_change_forces_full_redraw() {
        let mut scene = room();
        let frame = compose(&mut scene, [0, 0], &[Rect::new(0, 0, 1, 1)], true).unwrap();
        assert!(frame.full_redraw);
    }
}
