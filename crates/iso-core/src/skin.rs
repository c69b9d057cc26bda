use std::collections::BTreeSet;

use crate::error::{IsoError, IsoResult};
use crate::resource::ImageHandle;
use crate::vector::Vector3;

/// One drawable image, optionally mirrored left-to-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    /// The image to draw.
    pub image: ImageHandle,
    /// Whether the frontend should flip the image horizontally.
    pub mirrored: bool,
}

impl Frame {
    /// An unmirrored frame.
    pub fn new(image: ImageHandle) -> Self {
        Self {
            image,
            mirrored: false,
        }
    }

    /// This frame flipped horizontally.
    pub fn flipped(self) -> Self {
        Self {
            mirrored: !self.mirrored,
            ..self
        }
    }
}

/// The renderable aspect of a thing.
#[derive(Debug, Clone, PartialEq)]
pub enum Skin {
    /// Always the first image.
    Static(Vec<Frame>),
    /// Cycles through its images as it is painted.
    Animated(AnimatedSkin),
    /// Different frames per facing and per walk-cycle step.
    Directional(DirectionalSkin),
    /// A static skin with extra close-up images for examine mode.
    Examinable(ExaminableSkin),
}

impl Skin {
    /// A single-image static skin.
    pub fn image(image: ImageHandle) -> Self {
        Self::Static(vec![Frame::new(image)])
    }

    /// Number of walk-cycle frames; 1 for anything but a directional skin.
    pub fn frames_per_cycle(&self) -> usize {
        match self {
            Self::Directional(skin) => skin.frames_per_cycle,
            _ => 1,
        }
    }

    /// First image of the skin, used for inventory strips and backgrounds.
    pub fn first_frame(&self) -> Option<Frame> {
        match self {
            Self::Static(images) => images.first().copied(),
            Self::Animated(skin) => skin.images.first().copied(),
            Self::Directional(skin) => skin.south.first().copied(),
            Self::Examinable(skin) => skin.images.first().copied(),
        }
    }

    /// Close-up images, if this skin can be examined.
    pub fn examine_frames(&self) -> Option<&[Frame]> {
        match self {
            Self::Examinable(skin) => Some(&skin.examine_images),
            _ => None,
        }
    }

    /// Frame to paint this tick for a wearer facing `facing` at walk-cycle
    /// step `cycle`. Animated skins advance on every call.
    pub fn frame(&mut self, facing: Vector3, cycle: usize) -> IsoResult<Option<Frame>> {
        match self {
            Self::Static(images) => Ok(images.first().copied()),
            Self::Animated(skin) => Ok(skin.next_frame()),
            Self::Directional(skin) => skin.frame(facing, cycle).map(Some),
            Self::Examinable(skin) => Ok(skin.images.first().copied()),
        }
    }
}

/// Cycled animation, stepping at half the paint rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedSkin {
    /// Images in playback order.
    pub images: Vec<Frame>,
    /// Images advanced per painted frame.
    pub speed: f32,
    index: usize,
    counter: usize,
}

impl AnimatedSkin {
    /// Animation over `images` at the default speed of one image every two
    /// frames.
    pub fn new(images: Vec<Frame>) -> Self {
        Self {
            images,
            speed: 0.5,
            index: 0,
            counter: 0,
        }
    }

    /// Current image, then step the animation.
    pub fn next_frame(&mut self) -> Option<Frame> {
        let frame = self.images.get(self.index).copied()?;
        let len = self.images.len();
        self.counter += 1;
        if self.counter as f32 > len as f32 / self.speed {
            self.counter = 0;
        }
        self.index = (self.counter as f32 * self.speed) as usize % len;
        Some(frame)
    }
}

/// Frames for each of the four horizontal facings.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalSkin {
    south: Vec<Frame>,
    east: Vec<Frame>,
    north: Vec<Frame>,
    west: Vec<Frame>,
    frame_sequence: Vec<usize>,
    frames_per_cycle: usize,
}

impl DirectionalSkin {
    /// Start building a directional skin from its south and east frames.
    pub fn builder(south: Vec<Frame>, east: Vec<Frame>) -> DirectionalSkinBuilder {
        DirectionalSkinBuilder {
            south,
            east,
            north: None,
            west: None,
            frame_sequence: None,
            frames_per_cycle: None,
        }
    }

    /// Frames per walk cycle.
    pub fn frames_per_cycle(&self) -> usize {
        self.frames_per_cycle
    }

    /// Image index shown at each cycle step.
    pub fn frame_sequence(&self) -> &[usize] {
        &self.frame_sequence
    }

    /// Frame for `facing` at walk-cycle step `cycle`.
    pub fn frame(&self, facing: Vector3, cycle: usize) -> IsoResult<Frame> {
        let images = match facing {
            Vector3::SOUTH => &self.south,
            Vector3::EAST => &self.east,
            Vector3::WEST => &self.west,
            Vector3::NORTH => &self.north,
            _ => return Err(IsoError::SkinDirectionalImage { facing }),
        };
        let step = self.frame_sequence[cycle % self.frames_per_cycle];
        images
            .get(step)
            .copied()
            .ok_or(IsoError::SkinDirectionalImage { facing })
    }
}

/// Validating builder for [`DirectionalSkin`].
#[derive(Debug, Clone)]
pub struct DirectionalSkinBuilder {
    south: Vec<Frame>,
    east: Vec<Frame>,
    north: Option<Vec<Frame>>,
    west: Option<Vec<Frame>>,
    frame_sequence: Option<Vec<usize>>,
    frames_per_cycle: Option<usize>,
}

impl DirectionalSkinBuilder {
    /// North frames. Defaults to the east frames mirrored.
    pub fn north(mut self, frames: Vec<Frame>) -> Self {
        self.north = Some(frames);
        self
    }

    /// West frames. Defaults to the south frames mirrored.
    pub fn west(mut self, frames: Vec<Frame>) -> Self {
        self.west = Some(frames);
        self
    }

    /// Order in which images are shown across one walk cycle, e.g. `[0, 1, 0, 2]`.
    pub fn frame_sequence(mut self, sequence: Vec<usize>) -> Self {
        self.frame_sequence = Some(sequence);
        self
    }

    /// Number of steps in one walk cycle.
    pub fn frames_per_cycle(mut self, frames: usize) -> Self {
        self.frames_per_cycle = Some(frames);
        self
    }

    /// Validate the frame sets and build the skin.
    pub fn build(self) -> IsoResult<DirectionalSkin> {
        let north = self
            .north
            .filter(|frames| !frames.is_empty())
            .unwrap_or_else(|| self.east.iter().map(|f| f.flipped()).collect());
        let west = self
            .west
            .filter(|frames| !frames.is_empty())
            .unwrap_or_else(|| self.south.iter().map(|f| f.flipped()).collect());

        let per_direction = self.south.len();
        if [self.east.len(), north.len(), west.len()]
            .iter()
            .any(|&n| n != per_direction)
        {
            return Err(IsoError::SkinImageCorrelationMismatch {
                south: self.south.len(),
                east: self.east.len(),
                north: north.len(),
                west: west.len(),
            });
        }
        let image_count = per_direction * 4;

        let frames_per_cycle = match (self.frames_per_cycle, &self.frame_sequence) {
            (Some(n), _) if n > 0 => n,
            (_, Some(sequence)) if !sequence.is_empty() => sequence.len(),
            _ => per_direction,
        };
        let frame_sequence = self
            .frame_sequence
            .filter(|sequence| !sequence.is_empty())
            .unwrap_or_else(|| (0..frames_per_cycle).collect());
        if frame_sequence.len() != frames_per_cycle || frames_per_cycle == 0 {
            return Err(IsoError::SkinCycleSequenceMismatch {
                sequence: frame_sequence,
                frames_per_cycle,
            });
        }

        let unique: BTreeSet<usize> = frame_sequence.iter().copied().collect();
        let expected = unique.len() * 4;
        let in_range = unique.iter().all(|&step| step < per_direction);
        if image_count != expected || !in_range {
            return Err(IsoError::SkinImageCount {
                expected,
                actual: image_count,
            });
        }

        Ok(DirectionalSkin {
            south: self.south,
            east: self.east,
            north,
            west,
            frame_sequence,
            frames_per_cycle,
        })
    }
}

/// A static skin with close-up images shown while the item is examined.
#[derive(Debug, Clone, PartialEq)]
pub struct ExaminableSkin {
    /// Images shown in the scene.
    pub images: Vec<Frame>,
    /// Close-up images, cycled by key presses in examine mode.
    pub examine_images: Vec<Frame>,
}

impl ExaminableSkin {
    /// An examinable skin.
    pub fn new(images: Vec<Frame>, examine_images: Vec<Frame>) -> Self {
        Self {
            images,
            examine_images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(start: u32, n: u32) -> Vec<Frame> {
        (start..start + n).map(|i| Frame::new(ImageHandle(i))).collect()
    }

    #[test]
    fn directional_defaults_mirror_east_and_south() {
        let skin = DirectionalSkin::builder(frames(0, 3), frames(10, 3))
            .frame_sequence(vec![0, 1, 0, 2])
            .build()
            .unwrap();
        assert_eq!(skin.frames_per_cycle(), 4);
        let north = skin.frame(Vector3::NORTH, 1).unwrap();
        assert_eq!(north.image, ImageHandle(11));
        assert!(north.mirrored);
        let west = skin.frame(Vector3::WEST, 3).unwrap();
        assert_eq!(west.image, ImageHandle(2));
        assert!(west.mirrored);
        assert_eq!(skin.frame(Vector3::SOUTH, 6).unwrap().image, ImageHandle(0));
    }

    #[test]
    fn directional_rejects_uneven_directions() {
        let err = DirectionalSkin::builder(frames(0, 3), frames(10, 2))
            .build()
            .unwrap_err();
        assert!(matches!(err, IsoError::SkinImageCorrelationMismatch { .. }));
    }

    #[test]
    fn directional_rejects_sequence_length_mismatch() {
        let err = DirectionalSkin::builder(frames(0, 3), frames(10, 3))
            .frame_sequence(vec![0, 1, 0, 2])
            .frames_per_cycle(3)
            .build()
            .unwrap_err();
        assert!(matches!(err, IsoError::SkinCycleSequenceMismatch { .. }));
    }

    #[test]
    fn directional_rejects_unused_images() {
        let err = DirectionalSkin::builder(frames(0, 3), frames(10, 3))
            .frame_sequence(vec![0, 1, 0, 1])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            IsoError::SkinImageCount {
                expected: 8,
                actual: 12
            }
        );
    }

    #[test]
    fn directional_has_no_vertical_image() {
        let skin = DirectionalSkin::builder(frames(0, 1), frames(10, 1))
            .build()
            .unwrap();
        assert_eq!(
            skin.frame(Vector3::UP, 0),
            Err(IsoError::SkinDirectionalImage {
                facing: Vector3::UP
            })
        );
    }

    #[test]
    fn animated_skin_steps_every_other_frame() {
        let mut skin = AnimatedSkin::new(frames(0, 2));
        let shown: Vec<u32> = (0..6)
            .filter_map(|_| skin.next_frame())
            .map(|f| f.image.0)
            .collect();
        assert_eq!(shown, vec![0, 0, 1, 1, 0, 0]);
    }

    #[test]
    fn frames_per_cycle_defaults_to_one() {
        assert_eq!(Skin::image(ImageHandle(1)).frames_per_cycle(), 1);
    }
}
