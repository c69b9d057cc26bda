use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use iso_core::vector::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// One of the nine player controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Walk west.
    Left,
    /// Walk east.
    Right,
    /// Walk north.
    Up,
    /// Walk south.
    Down,
    /// Jump.
    Jump,
    /// Pick up the touched item the player faces.
    PickUp,
    /// Drop the selected item.
    Drop,
    /// Examine the selected item.
    Examine,
    /// Select the next item.
    Use,
}

impl Action {
    /// All actions.
    pub const ALL: [Action; 9] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Jump,
        Action::PickUp,
        Action::Drop,
        Action::Examine,
        Action::Use,
    ];

    /// The four walking actions in the order they are applied.
    pub const WALK: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Unit heading of a walking action.
    pub fn heading(self) -> Option<Vector3> {
        match self {
            Self::Up => Some(Vector3::NORTH),
            Self::Down => Some(Vector3::SOUTH),
            Self::Left => Some(Vector3::WEST),
            Self::Right => Some(Vector3::EAST),
            _ => None,
        }
    }

    /// Snake-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::Jump => "jump",
            Self::PickUp => "pick_up",
            Self::Drop => "drop",
            Self::Examine => "examine",
            Self::Use => "use",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| SimError::UnknownAction(s.to_owned()))
    }
}

/// A discrete input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// The window was closed.
    Quit,
    /// The player asked to leave the game.
    Escape,
    /// A control key went down.
    KeyDown(Action),
}

/// Input polled for one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// Controls held down.
    pub held: BTreeSet<Action>,
    /// Discrete events, oldest first.
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    /// Add a held control.
    pub fn with_held(mut self, action: Action) -> Self {
        self.held.insert(action);
        self
    }

    /// Add a discrete event.
    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Whether a control is held.
    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Whether any walking control is held.
    pub fn is_walking(&self) -> bool {
        Action::WALK.iter().any(|a| self.is_held(*a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_parse_from_snake_case() {
        assert_eq!("pick_up".parse::<Action>().unwrap(), Action::PickUp);
        assert_eq!("use".parse::<Action>().unwrap(), Action::Use);
        assert!(matches!(
            "fly".parse::<Action>(),
            Err(SimError::UnknownAction(name)) if name == "fly"
        ));
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn walking_headings() {
        assert_eq!(Action::Up.heading(), Some(Vector3::NORTH));
        assert_eq!(Action::Right.heading(), Some(Vector3::EAST));
        assert_eq!(Action::Jump.heading(), None);
    }

    #[test]
    fn input_frame_builders() {
        let frame = InputFrame::default()
            .with_held(Action::Left)
            .with_event(InputEvent::KeyDown(Action::Drop));
        assert!(frame.is_walking());
        assert!(!frame.is_held(Action::Jump));
        assert_eq!(frame.events, vec![InputEvent::KeyDown(Action::Drop)]);
    }
}
