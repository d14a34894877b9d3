use crate::model::aircraft::AircraftRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two opposing forces of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red,
    Blue,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Red => "red",
            Side::Blue => "blue",
        })
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(Side::Red),
            "blue" => Ok(Side::Blue),
            other => Err(format!("unknown side '{}'", other)),
        }
    }
}

/// Task posture handed to the blue force by the external simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskMode {
    Attack,
    Defense,
    Confrontation,
}

impl TaskMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskMode::Attack => "attack",
            TaskMode::Defense => "defense",
            TaskMode::Confrontation => "confrontation",
        }
    }
}

impl fmt::Display for TaskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attack" => Ok(TaskMode::Attack),
            "defense" => Ok(TaskMode::Defense),
            "confrontation" => Ok(TaskMode::Confrontation),
            other => Err(format!("unknown task mode '{}'", other)),
        }
    }
}

/// Generation parameters persisted alongside the rosters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub blue_count: i64,
    pub strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_mode: Option<TaskMode>,
}

/// Persisted bundle of both rosters and the generation parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SituationDocument {
    pub red: Vec<AircraftRecord>,
    pub blue: Vec<AircraftRecord>,
    pub parameters: Parameters,
}

impl SituationDocument {
    pub fn new(red: Vec<AircraftRecord>, blue: Vec<AircraftRecord>, parameters: Parameters) -> Self {
        Self {
            red,
            blue,
            parameters,
        }
    }

    /// Document produced by the legacy red-only file shapes.
    pub fn red_only(red: Vec<AircraftRecord>) -> Self {
        Self {
            red,
            ..Default::default()
        }
    }

    pub fn side(&self, side: Side) -> &[AircraftRecord] {
        match side {
            Side::Red => &self.red,
            Side::Blue => &self.blue,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut Vec<AircraftRecord> {
        match side {
            Side::Red => &mut self.red,
            Side::Blue => &mut self.blue,
        }
    }
}
