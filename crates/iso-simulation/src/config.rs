use iso_core::calendar::GameSpeed;
use serde::{Deserialize, Serialize};

/// Configuration for an engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum wall-clock duration of one tick, in milliseconds.
    pub frame_budget_ms: u64,
    /// World seconds per wall-clock second.
    pub game_speed: GameSpeed,
    /// Screen position of the world origin.
    pub display_offset: [i32; 2],
    /// Gap between the player and an item it drops.
    pub drop_separation: i32,
    /// Upward velocity added by a jump.
    pub jump_impulse: i32,
    /// Upper bound on collision passes per tick.
    pub max_collision_passes: usize,
    /// Number of captions the HUD keeps.
    pub caption_capacity: usize,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_budget_ms: 50,
            game_speed: GameSpeed::SPEED_03,
            display_offset: [200, 120],
            drop_separation: 4,
            jump_impulse: 8,
            max_collision_passes: 1000,
            caption_capacity: 50,
            max_events: 0,
        }
    }
}

impl EngineConfig {
    /// Set the per-tick frame budget.
    pub fn with_frame_budget_ms(mut self, ms: u64) -> Self {
        self.frame_budget_ms = ms;
        self
    }

    /// Set the game speed.
    pub fn with_game_speed(mut self, speed: GameSpeed) -> Self {
        self.game_speed = speed;
        self
    }

    /// Set the projection offset.
    pub fn with_display_offset(mut self, x: i32, y: i32) -> Self {
        self.display_offset = [x, y];
        self
    }

    /// Set the drop separation.
    pub fn with_drop_separation(mut self, separation: i32) -> Self {
        self.drop_separation = separation;
        self
    }

    /// Set the jump impulse.
    pub fn with_jump_impulse(mut self, impulse: i32) -> Self {
        self.jump_impulse = impulse;
        self
    }

    /// Set the collision pass cap.
    pub fn with_max_collision_passes(mut self, passes: usize) -> Self {
        self.max_collision_passes = passes;
        self
    }

    /// Set the HUD caption scrollback length.
    pub fn with_caption_capacity(mut self, capacity: usize) -> Self {
        self.caption_capacity = capacity;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.frame_budget_ms, 50);
        assert_eq!(config.game_speed, GameSpeed(72));
        assert_eq!(config.display_offset, [200, 120]);
        assert_eq!(config.drop_separation, 4);
        assert_eq!(config.jump_impulse, 8);
        assert_eq!(config.max_events, 0);
    }

    #[test]
    fn config_builder_chain() {
        let config = EngineConfig::default()
            .with_frame_budget_ms(0)
            .with_game_speed(GameSpeed::SPEED_04)
            .with_display_offset(10, 20)
            .with_max_events(500);
        assert_eq!(config.frame_budget_ms, 0);
        assert_eq!(config.game_speed.0, 168);
        assert_eq!(config.display_offset, [10, 20]);
        assert_eq!(config.max_events, 500);
    }

    #[test]
    fn config_partial_json_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "game_speed": 1, "jump_impulse": 5 }"#).unwrap();
        assert_eq!(config.game_speed, GameSpeed::SPEED_00);
        assert_eq!(config.jump_impulse, 5);
        assert_eq!(config.frame_budget_ms, 50);
        assert_eq!(config.caption_capacity, 50);
    }
}
