//! Red-force extraction from third-party scenario XML.
//!
//! Only `RedSide → AirDomain → Entity` content is read. Each entity needs a
//! `Position` of exactly three comma-separated numbers
//! (`longitude,latitude,altitude`); entities that fail this are skipped
//! with a warning rather than failing the whole import.

pub mod state;

pub use state::{EntityDraft, EntityField, ImportState, Tag};

use crate::codec::xml::element_name;
use crate::model::{AircraftRecord, Side};
use crate::prelude::{CoreError, CoreResult, ParseError};
use crate::roster::Roster;
use crate::telemetry::log::LogManager;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

pub const IMPORTED_SPEED: f64 = 200.0;
pub const IMPORTED_HEADING: f64 = 0.0;
pub const IMPORTED_STATUS: &str = "standby";
pub const FALLBACK_TYPE: &str = "drone";

/// Tag and attribute names of the scenario dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioVocabulary {
    pub red_side: String,
    pub air_domain: String,
    pub entity: String,
    pub name: String,
    pub model: String,
    pub position: String,
    pub id_attribute: String,
}

impl ScenarioVocabulary {
    pub fn english() -> Self {
        Self {
            red_side: "RedSide".into(),
            air_domain: "AirDomain".into(),
            entity: "Entity".into(),
            name: "Name".into(),
            model: "Model".into(),
            position: "Position".into(),
            id_attribute: "ID".into(),
        }
    }

    /// Tag names used by the authoring tool's native scenario files.
    pub fn legacy() -> Self {
        Self {
            red_side: "红方".into(),
            air_domain: "空中".into(),
            entity: "实体".into(),
            name: "名称".into(),
            model: "型号".into(),
            position: "位置".into(),
            id_attribute: "ID".into(),
        }
    }

    fn classify(&self, name: &str) -> Tag {
        if name == self.red_side {
            Tag::RedSide
        } else if name == self.air_domain {
            Tag::AirDomain
        } else if name == self.entity {
            Tag::Entity
        } else if name == self.name {
            Tag::Name
        } else if name == self.model {
            Tag::Model
        } else if name == self.position {
            Tag::Position
        } else {
            Tag::Other
        }
    }
}

impl Default for ScenarioVocabulary {
    fn default() -> Self {
        Self::english()
    }
}

/// Named vocabularies selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabularyPreset {
    #[default]
    English,
    Legacy,
}

impl VocabularyPreset {
    pub fn vocabulary(self) -> ScenarioVocabulary {
        match self {
            VocabularyPreset::English => ScenarioVocabulary::english(),
            VocabularyPreset::Legacy => ScenarioVocabulary::legacy(),
        }
    }
}

pub struct ScenarioImporter {
    vocabulary: ScenarioVocabulary,
    logger: LogManager,
}

impl ScenarioImporter {
    pub fn new(vocabulary: ScenarioVocabulary) -> Self {
        Self {
            vocabulary,
            logger: LogManager::new("importer"),
        }
    }

    pub fn vocabulary(&self) -> &ScenarioVocabulary {
        &self.vocabulary
    }

    /// Extracts the red air force as a fresh roster with ids `1..=n`.
    ///
    /// Fails with [`CoreError::Parse`] on malformed XML and with
    /// [`CoreError::PartialExtraction`] when no entity survives.
    pub fn import_red_force(&self, bytes: &[u8]) -> CoreResult<Roster> {
        let text = std::str::from_utf8(bytes)
            .map_err(|err| ParseError::scenario(format!("invalid UTF-8: {}", err)))?;
        let drafts = self.collect_drafts(text)?;

        let mut records = Vec::with_capacity(drafts.len());
        let mut dropped = 0;
        for draft in drafts {
            match parse_position(&draft.position) {
                Some((longitude, latitude, altitude)) => {
                    let id = records.len() as u32 + 1;
                    records.push(self.synthesize(id, &draft, longitude, latitude, altitude));
                }
                None => {
                    dropped += 1;
                    self.logger.warn(&format!(
                        "dropping entity {}: unusable position '{}'",
                        draft.id.as_deref().unwrap_or("<no id>"),
                        draft.position
                    ));
                }
            }
        }

        if records.is_empty() {
            return Err(CoreError::PartialExtraction { dropped });
        }
        self.logger.record(&format!(
            "imported {} red entities ({} dropped)",
            records.len(),
            dropped
        ));
        Ok(Roster::with_records(Side::Red, records))
    }

    fn synthesize(
        &self,
        id: u32,
        draft: &EntityDraft,
        longitude: f64,
        latitude: f64,
        altitude: f64,
    ) -> AircraftRecord {
        let name = draft.name.trim();
        let kind = if name.is_empty() { FALLBACK_TYPE } else { name };
        self.logger.detail(&format!(
            "entity {} -> id {} ({}, model '{}')",
            draft.id.as_deref().unwrap_or("<no id>"),
            id,
            kind,
            draft.model.trim()
        ));
        AircraftRecord::new(kind, IMPORTED_STATUS)
            .with_id(id)
            .with_position(longitude, latitude, altitude)
            .with_motion(IMPORTED_SPEED, IMPORTED_HEADING)
    }

    /// Runs the state machine over the document and returns every closed entity.
    fn collect_drafts(&self, text: &str) -> Result<Vec<EntityDraft>, ParseError> {
        let mut reader = Reader::from_str(text);
        let mut state = ImportState::Outside;
        let mut drafts = Vec::new();
        let mut open_elements: Vec<String> = Vec::new();

        let fail = |reader: &Reader<&[u8]>, message: String| {
            ParseError::scenario(format!("{} (at byte {})", message, reader.buffer_position()))
        };

        loop {
            let event = reader
                .read_event()
                .map_err(|err| fail(&reader, err.to_string()))?;
            match event {
                Event::Start(start) => {
                    let name = element_name(&start);
                    let tag = self.vocabulary.classify(&name);
                    let id = self
                        .entity_id(tag, &start)
                        .map_err(|message| fail(&reader, message))?;
                    state = state.open(tag, id);
                    open_elements.push(name);
                }
                Event::Empty(start) => {
                    let tag = self.vocabulary.classify(&element_name(&start));
                    let id = self
                        .entity_id(tag, &start)
                        .map_err(|message| fail(&reader, message))?;
                    let (next, draft) = state.open(tag, id).close(tag);
                    state = next;
                    drafts.extend(draft);
                }
                Event::Text(content) => {
                    let value = content
                        .unescape()
                        .map_err(|err| fail(&reader, err.to_string()))?;
                    state.text(&value);
                }
                Event::CData(content) => {
                    let bytes: &[u8] = &content;
                    let value = std::str::from_utf8(bytes)
                        .map_err(|err| fail(&reader, err.to_string()))?;
                    state.text(value);
                }
                Event::End(end) => {
                    let name = String::from_utf8_lossy(end.local_name().as_ref()).into_owned();
                    open_elements.pop();
                    let (next, draft) = state.close(self.vocabulary.classify(&name));
                    state = next;
                    drafts.extend(draft);
                }
                Event::Eof => break,
                Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
            }
        }

        if let Some(open) = open_elements.last() {
            return Err(ParseError::scenario(format!(
                "document ends inside <{}>",
                open
            )));
        }
        Ok(drafts)
    }

    fn entity_id(&self, tag: Tag, start: &BytesStart<'_>) -> Result<Option<String>, String> {
        if tag != Tag::Entity {
            return Ok(None);
        }
        let attribute = start
            .try_get_attribute(self.vocabulary.id_attribute.as_str())
            .map_err(|err| err.to_string())?;
        match attribute {
            Some(attribute) => attribute
                .unescape_value()
                .map(|value| Some(value.into_owned()))
                .map_err(|err| err.to_string()),
            None => Ok(None),
        }
    }
}

impl Default for ScenarioImporter {
    fn default() -> Self {
        Self::new(ScenarioVocabulary::english())
    }
}

/// `"lon,lat,alt"` with exactly three finite numeric components.
pub fn parse_position(text: &str) -> Option<(f64, f64, f64)> {
    let parts = text
        .split(',')
        .map(|part| part.trim().parse::<f64>().ok().filter(|value| value.is_finite()))
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [longitude, latitude, altitude] => Some((*longitude, *latitude, *altitude)),
        _ => None,
    }
}
