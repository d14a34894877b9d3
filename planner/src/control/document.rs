use anyhow::bail;
use chrono::{DateTime, Local};
use rostercore::TaskMode;
use serde::{Deserialize, Serialize};

pub const SPEED_PRESETS: [f64; 3] = [0.5, 1.0, 1.5];

/// Control state polled by the external simulation process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlDocument {
    pub paused: bool,
    pub speed_multiplier: f64,
    /// Local time, ISO-8601 without offset.
    pub timestamp: String,
    pub blue_task_mode: TaskMode,
}

impl ControlDocument {
    pub fn new(paused: bool, speed_multiplier: f64, blue_task_mode: TaskMode) -> anyhow::Result<Self> {
        Self::stamped(paused, speed_multiplier, blue_task_mode, Local::now())
    }

    pub fn stamped(
        paused: bool,
        speed_multiplier: f64,
        blue_task_mode: TaskMode,
        at: DateTime<Local>,
    ) -> anyhow::Result<Self> {
        if !speed_multiplier.is_finite() || speed_multiplier <= 0.0 {
            bail!("speed multiplier must be positive, got {}", speed_multiplier);
        }
        Ok(Self {
            paused,
            speed_multiplier,
            timestamp: at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            blue_task_mode,
        })
    }
}

impl Default for ControlDocument {
    fn default() -> Self {
        Self {
            paused: false,
            speed_multiplier: 1.0,
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            blue_task_mode: TaskMode::Confrontation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn control_document_uses_expected_keys() {
        let at = Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let doc = ControlDocument::stamped(true, 1.5, TaskMode::Attack, at).unwrap();
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["paused"], true);
        assert_eq!(value["speed_multiplier"], 1.5);
        assert_eq!(value["timestamp"], "2025-03-14T09:26:53");
        assert_eq!(value["blue_task_mode"], "attack");
    }

    #[test]
    fn non_positive_speed_is_rejected() {
        assert!(ControlDocument::new(false, 0.0, TaskMode::Defense).is_err());
        assert!(ControlDocument::new(false, f64::INFINITY, TaskMode::Defense).is_err());
        for speed in SPEED_PRESETS {
            assert!(ControlDocument::new(false, speed, TaskMode::Defense).is_ok());
        }
    }
}
