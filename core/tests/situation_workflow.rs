//! End-to-end flows across roster, generator, codecs and importer.
//!
//! Run with: `cargo test -p rostercore --test situation_workflow`

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use rostercore::codec::{self, Format};
use rostercore::generator::{GenerationRequest, SituationGenerator};
use rostercore::{
    AircraftRecord, CoreError, Field, Roster, RosterEvent, ScenarioImporter, Side,
    SituationDocument, SituationStore, TaskMode,
};

fn red_roster() -> Roster {
    let mut roster = Roster::new(Side::Red);
    for (kind, lon, lat) in [("J-10", 116.4, 39.9), ("J-11", 117.2, 40.1), ("J-16", 118.0, 38.5)] {
        let record = AircraftRecord::new(kind, "cruise")
            .with_position(lon, lat, 8000.0)
            .with_motion(520.0, 90.0);
        roster.append(record).unwrap();
    }
    roster
}

#[test]
fn edit_generate_save_and_reload() {
    let mut red = red_roster();
    let changes = Rc::new(RefCell::new(0));
    let counter = changes.clone();
    red.subscribe(move |event| {
        if *event == RosterEvent::ContentChanged {
            *counter.borrow_mut() += 1;
        }
    });

    red.set_field(1, Field::Altitude, "9500.5").unwrap();
    assert!(red.set_field(1, Field::Heading, "360").is_err());
    assert_eq!(*changes.borrow(), 1);

    let generator = SituationGenerator::new();
    let result = generator
        .generate(&red.snapshot(), &GenerationRequest::default(), &mut StdRng::seed_from_u64(8))
        .unwrap();
    assert_eq!(result.recommended_count, 5);
    assert_eq!(result.recommended_difficulty, "medium");

    let mut blue = Roster::new(Side::Blue);
    blue.replace_all(result.records.clone());

    let document = SituationDocument::new(
        red.snapshot(),
        blue.snapshot(),
        result.parameters(Some(TaskMode::Confrontation)),
    );

    let dir = tempfile::tempdir().unwrap();
    let store = SituationStore::new(dir.path());
    store.save("plan.json", &document).unwrap();
    store.save("plan.xml", &document).unwrap();

    let from_json = store.load("plan.json").unwrap();
    let from_xml = store.load("plan.xml").unwrap();
    assert_eq!(from_json, document);
    assert_eq!(from_xml, document);
    assert_eq!(from_json.red[1].altitude, 9500.5);
}

#[test]
fn cross_format_round_trip_preserves_records_and_parameters() {
    let red = red_roster().snapshot();
    let blue = SituationGenerator::new()
        .generate(&red, &GenerationRequest::new(Some(3), Some("hard".into())), &mut StdRng::seed_from_u64(1))
        .unwrap();
    let original = SituationDocument::new(red, blue.records.clone(), blue.parameters(Some(TaskMode::Attack)));

    let xml = codec::encode(&original, Format::Xml).unwrap();
    let decoded = codec::decode(&xml, Format::Xml).unwrap();
    let json = codec::encode(&decoded, Format::Json).unwrap();
    let final_doc = codec::decode(&json, Format::Json).unwrap();

    assert_eq!(final_doc, original);
    assert_eq!(final_doc.parameters.strategy, "hard");
    assert_eq!(final_doc.parameters.blue_count, 3);
}

#[test]
fn imported_force_feeds_the_generator() {
    let scenario = r#"<Scenario><RedSide><AirDomain>
        <Entity ID="1"><Name>Scout</Name><Position>100.5,20.5,1500</Position></Entity>
        <Entity ID="2"><Name>Bad</Name><Position>12.0,34.0</Position></Entity>
        </AirDomain></RedSide></Scenario>"#;
    let imported = ScenarioImporter::default()
        .import_red_force(scenario.as_bytes())
        .unwrap();
    assert_eq!(imported.len(), 1);

    let result = SituationGenerator::new()
        .generate(&imported.snapshot(), &GenerationRequest::default(), &mut StdRng::seed_from_u64(4))
        .unwrap();
    assert_eq!(result.records.len(), 3);
}

#[test]
fn empty_scenario_and_empty_roster_fail_cleanly() {
    let err = ScenarioImporter::default()
        .import_red_force(b"<Scenario/>")
        .unwrap_err();
    assert!(matches!(err, CoreError::PartialExtraction { .. }));

    let err = SituationGenerator::new()
        .generate(&[], &GenerationRequest::default(), &mut StdRng::seed_from_u64(0))
        .unwrap_err();
    assert!(matches!(err, CoreError::EmptyInput));
}
