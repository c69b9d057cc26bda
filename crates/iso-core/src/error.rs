use crate::vector::Vector3;

/// Alias for `Result<T, IsoError>`.
pub type IsoResult<T> = Result<T, IsoError>;

/// Errors that can occur when building or querying the game model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IsoError {
    /// A lookup by name missed.
    #[error("object not found: \"{0}\"")]
    ObjectNotFound(String),

    /// A name that must be unique within its container is already taken.
    #[error("object already exists: \"{0}\"")]
    DuplicateObject(String),

    /// A directional skin does not hold four images per cycle frame.
    #[error("skin image count mismatch: expected {expected} images, found {actual}")]
    SkinImageCount {
        /// Number of images the frame sequence requires.
        expected: usize,
        /// Number of images supplied.
        actual: usize,
    },

    /// A directional skin was asked for a facing it has no images for.
    #[error("skin has no image for facing {facing}")]
    SkinDirectionalImage {
        /// The facing vector that could not be matched.
        facing: Vector3,
    },

    /// The frame sequence length disagrees with frames-per-cycle.
    #[error("frame sequence {sequence:?} does not match {frames_per_cycle} frames per cycle")]
    SkinCycleSequenceMismatch {
        /// The offending frame sequence.
        sequence: Vec<usize>,
        /// The declared number of frames per cycle.
        frames_per_cycle: usize,
    },

    /// The four directions of a skin have different frame counts.
    #[error(
        "directional image counts differ: south {south}, east {east}, north {north}, west {west}"
    )]
    SkinImageCorrelationMismatch {
        /// Number of south-facing images.
        south: usize,
        /// Number of east-facing images.
        east: usize,
        /// Number of north-facing images.
        north: usize,
        /// Number of west-facing images.
        west: usize,
    },

    /// Two date-times with different calendar definitions were compared.
    #[error("date-times belong to different calendars")]
    CalendarMismatch,

    /// A dew-point computation was asked for out-of-range input.
    #[error("invalid dew point: {0}")]
    InvalidDewPoint(String),

    /// A thing has a non-positive extent on some axis.
    #[error("thing \"{name}\" has invalid size {size}")]
    InvalidSize {
        /// Name of the offending thing.
        name: String,
        /// Its size vector.
        size: Vector3,
    },

    /// A thing that is not a player was used where a player is required.
    #[error("thing \"{0}\" is not a player")]
    NotAPlayer(String),
}
