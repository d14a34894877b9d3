use crate::model::{AircraftRecord, Parameters, SituationDocument};
use crate::prelude::{CoreError, CoreResult, ParseError};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const RED_KEY: &str = "red_aircraft";
pub const BLUE_KEY: &str = "blue_aircraft";
pub const PARAMETERS_KEY: &str = "parameters";

#[derive(Serialize)]
struct SituationOut<'a> {
    red_aircraft: &'a [AircraftRecord],
    blue_aircraft: &'a [AircraftRecord],
    parameters: &'a Parameters,
}

#[derive(Deserialize)]
struct SituationIn {
    #[serde(default)]
    red_aircraft: Vec<AircraftRecord>,
    #[serde(default)]
    blue_aircraft: Vec<AircraftRecord>,
    #[serde(default)]
    parameters: Parameters,
}

/// Fails on NaN or infinite kinematics, which JSON cannot carry.
pub fn encode(document: &SituationDocument) -> CoreResult<Vec<u8>> {
    ensure_finite(RED_KEY, &document.red)?;
    ensure_finite(BLUE_KEY, &document.blue)?;
    let out = SituationOut {
        red_aircraft: &document.red,
        blue_aircraft: &document.blue,
        parameters: &document.parameters,
    };
    serde_json::to_vec_pretty(&out).map_err(|err| CoreError::Encode(err.to_string()))
}

fn ensure_finite(key: &str, records: &[AircraftRecord]) -> CoreResult<()> {
    match records
        .iter()
        .find_map(|record| record.non_finite_field().map(|field| (record.id, field)))
    {
        Some((id, field)) => Err(CoreError::Encode(format!(
            "{} record {}: {} is not a finite number",
            key, id, field
        ))),
        None => Ok(()),
    }
}

/// Accepts the full object shape and the legacy bare array of red records.
///
/// Entries of a bare array that are not objects are skipped.
pub fn decode(bytes: &[u8]) -> Result<SituationDocument, ParseError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|err| ParseError::json(err.to_string()))?;

    match value {
        Value::Array(entries) => legacy_red(entries).map(SituationDocument::red_only),
        Value::Object(map) => {
            if !map.contains_key(RED_KEY) && !map.contains_key(BLUE_KEY) {
                return Err(ParseError::json(format!(
                    "object has neither '{}' nor '{}'",
                    RED_KEY, BLUE_KEY
                )));
            }
            let parsed: SituationIn = serde_json::from_value(Value::Object(map))
                .map_err(|err| ParseError::json(err.to_string()))?;
            Ok(SituationDocument::new(
                parsed.red_aircraft,
                parsed.blue_aircraft,
                parsed.parameters,
            ))
        }
        other => Err(ParseError::json(format!(
            "expected an object or an array, found {}",
            value_kind(&other)
        ))),
    }
}

fn legacy_red(entries: Vec<Value>) -> Result<Vec<AircraftRecord>, ParseError> {
    let total = entries.len();
    let red = entries
        .into_iter()
        .filter(Value::is_object)
        .map(|entry| {
            serde_json::from_value(entry)
                .map_err(|err| ParseError::json(format!("red roster: {}", err)))
        })
        .collect::<Result<Vec<AircraftRecord>, _>>()?;
    if red.len() < total {
        LogManager::new("codec").warn(&format!(
            "skipped {} non-object entries in red roster array",
            total - red.len()
        ));
    }
    Ok(red)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskMode;

    fn record(id: u32, kind: &str) -> AircraftRecord {
        AircraftRecord::new(kind, "cruise")
            .with_id(id)
            .with_position(116.391, 39.907, 8500.5)
            .with_motion(480.25, 270.0)
    }

    #[test]
    fn encodes_the_documented_keys() {
        let doc = SituationDocument::new(
            vec![record(1, "J-10")],
            vec![],
            Parameters {
                blue_count: 3,
                strategy: "medium".into(),
                task_mode: Some(TaskMode::Attack),
            },
        );
        let value: Value = serde_json::from_slice(&encode(&doc).unwrap()).unwrap();

        assert_eq!(value[RED_KEY][0]["type"], "J-10");
        assert_eq!(value[RED_KEY][0]["heading"], 270.0);
        assert_eq!(value[BLUE_KEY].as_array().unwrap().len(), 0);
        assert_eq!(value[PARAMETERS_KEY]["blue_count"], 3);
        assert_eq!(value[PARAMETERS_KEY]["task_mode"], "attack");
    }

    #[test]
    fn decodes_legacy_bare_array() {
        let text = r#"[{"id":3,"type":"Su-35","longitude":1,"latitude":2,
            "altitude":3,"speed":4,"heading":5,"status":"standby"}]"#;
        let doc = decode(text.as_bytes()).unwrap();
        assert_eq!(doc.red.len(), 1);
        assert_eq!(doc.red[0].id, 3);
        assert_eq!(doc.red[0].longitude, 1.0);
        assert!(doc.blue.is_empty());
        assert_eq!(doc.parameters, Parameters::default());
    }

    #[test]
    fn decodes_red_only_object() {
        let text = r#"{"red_aircraft":[]}"#;
        let doc = decode(text.as_bytes()).unwrap();
        assert!(doc.red.is_empty());
        assert_eq!(doc.parameters.task_mode, None);
    }

    #[test]
    fn rejects_malformed_content() {
        assert!(decode(b"{not json").is_err());
        assert!(decode(b"42").is_err());
        assert!(decode(br#"{"aircraft":[]}"#).is_err());
        assert!(decode(br#"[{"id":"one"}]"#).is_err());
        assert!(decode(br#"{"red_aircraft":[],"parameters":{"task_mode":"retreat"}}"#).is_err());
    }

    #[test]
    fn legacy_array_defaults_missing_fields_and_skips_non_objects() {
        let text = r#"[{"id":1,"type":"J-10","longitude":116.0,"latitude":39.0},
            7, "noise", null,
            {"id":2,"type":"J-11","longitude":1,"latitude":2,
             "altitude":3,"speed":4,"heading":5,"status":"cruise"}]"#;
        let doc = decode(text.as_bytes()).unwrap();

        assert_eq!(doc.red.len(), 2);
        let expected = AircraftRecord::new("J-10", "")
            .with_id(1)
            .with_position(116.0, 39.0, 0.0);
        assert_eq!(doc.red[0], expected);
        assert_eq!(doc.red[1].status, "cruise");
    }

    #[test]
    fn non_finite_kinematics_are_not_encoded() {
        let mut bad = record(4, "J-16");
        bad.longitude = f64::NAN;
        let doc = SituationDocument::new(vec![], vec![bad], Parameters::default());

        let err = encode(&doc).unwrap_err();
        assert!(matches!(err, CoreError::Encode(ref message) if message.contains("longitude")));

        let mut doc = doc;
        doc.blue[0].longitude = 10.0;
        doc.blue[0].altitude = f64::INFINITY;
        assert!(encode(&doc).is_err());
    }

    #[test]
    fn thirds_survive_a_round_trip_exactly() {
        let thirds = AircraftRecord::new("blue-1", "standby")
            .with_id(1)
            .with_position(100.0 + 1.0 / 3.0, 100.0 + 2.0 / 3.0, 5_000.0 + 1.0 / 7.0)
            .with_motion(400.0 + 1.0 / 9.0, 359.0 + 1.0 / 11.0);
        let doc = SituationDocument::new(vec![], vec![thirds], Parameters::default());
        assert_eq!(decode(&encode(&doc).unwrap()).unwrap(), doc);
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let doc = SituationDocument::new(
            vec![record(1, "J-10"), record(2, "J-20")],
            vec![record(1, "F-16"), record(2, "F-15"), record(3, "F-22")],
            Parameters {
                blue_count: 3,
                strategy: "hard".into(),
                task_mode: Some(TaskMode::Confrontation),
            },
        );
        let once = decode(&encode(&doc).unwrap()).unwrap();
        let twice = decode(&encode(&once).unwrap()).unwrap();
        assert_eq!(once, doc);
        assert_eq!(twice, doc);
    }
}
