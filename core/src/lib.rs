//! Core model and persistence for the red/blue force scenario planner.
//!
//! Rosters of aircraft records are edited through validated setters,
//! an opposing force is derived from a roster snapshot, situations are
//! stored as JSON or XML, and red forces can be lifted out of foreign
//! scenario XML.

pub mod codec;
pub mod generator;
pub mod importer;
pub mod model;
pub mod prelude;
pub mod roster;
pub mod telemetry;

pub use codec::{Format, SituationStore};
pub use generator::{GenerationRequest, GenerationResult, GeneratorConfig, SituationGenerator};
pub use importer::{ScenarioImporter, ScenarioVocabulary};
pub use model::{AircraftRecord, Field, FieldValue, Parameters, Side, SituationDocument, TaskMode};
pub use prelude::{CoreError, CoreResult, ParseError, ValidationError, ValidationReason};
pub use roster::{Roster, RosterEvent, SubscriptionId};
