use iso_core::error::IsoError;

use crate::event::{EventKind, SubscriptionId};

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while running the engine.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// An event was published for a kind nobody subscribed to.
    #[error("no subscriber registered for {0} events")]
    EventSubscriberNotFound(EventKind),

    /// An unsubscribe named a subscription that does not exist.
    #[error("subscription {0} not found")]
    SubscriptionNotFound(SubscriptionId),

    /// The engine was stepped before a starting world was set.
    #[error("no active world; call set_starting_world first")]
    NoActiveWorld,

    /// The named world has no player.
    #[error("world \"{0}\" has no player")]
    NoPlayer(String),

    /// An input action name could not be parsed.
    #[error("unknown action: \"{0}\"")]
    UnknownAction(String),

    /// A game-model error.
    #[error(transparent)]
    Core(#[from] IsoError),
}
