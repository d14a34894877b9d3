pub mod aircraft;
pub mod situation;

pub use aircraft::{AircraftRecord, Field, FieldValue};
pub use situation::{Parameters, Side, SituationDocument, TaskMode};
