use crate::model::{AircraftRecord, Field, Parameters, SituationDocument, TaskMode};
use crate::prelude::{CoreError, CoreResult, DocumentKind, ParseError};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;

pub const ROOT_TAG: &str = "situation";
pub const RED_TAG: &str = "red_aircraft";
pub const BLUE_TAG: &str = "blue_aircraft";
pub const RECORD_TAG: &str = "aircraft";
pub const PARAMETERS_TAG: &str = "parameters";
pub const BLUE_COUNT_TAG: &str = "blue_count";
pub const STRATEGY_TAG: &str = "strategy";
pub const TASK_MODE_TAG: &str = "task_mode";

/// Minimal element tree used to decode situation documents.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

pub fn encode(document: &SituationDocument) -> CoreResult<Vec<u8>> {
    write_document(document).map_err(|err| CoreError::Encode(err.to_string()))
}

pub fn decode(bytes: &[u8]) -> Result<SituationDocument, ParseError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|err| ParseError::xml(format!("invalid UTF-8: {}", err)))?;
    let root = parse_tree(text, DocumentKind::Xml)?;
    document_from_tree(&root)
}

fn write_document(document: &SituationDocument) -> quick_xml::Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT_TAG)))?;

    write_roster(&mut writer, RED_TAG, &document.red)?;
    write_roster(&mut writer, BLUE_TAG, &document.blue)?;

    let params = &document.parameters;
    writer.write_event(Event::Start(BytesStart::new(PARAMETERS_TAG)))?;
    write_text(&mut writer, BLUE_COUNT_TAG, params.blue_count)?;
    write_text(&mut writer, STRATEGY_TAG, &params.strategy)?;
    if let Some(mode) = params.task_mode {
        write_text(&mut writer, TASK_MODE_TAG, mode)?;
    }
    writer.write_event(Event::End(BytesEnd::new(PARAMETERS_TAG)))?;

    writer.write_event(Event::End(BytesEnd::new(ROOT_TAG)))?;
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn write_roster(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    records: &[AircraftRecord],
) -> quick_xml::Result<()> {
    if records.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(tag)))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    for record in records {
        writer.write_event(Event::Start(BytesStart::new(RECORD_TAG)))?;
        write_text(writer, Field::Id.name(), record.id)?;
        write_text(writer, Field::Type.name(), &record.kind)?;
        write_text(writer, Field::Longitude.name(), record.longitude)?;
        write_text(writer, Field::Latitude.name(), record.latitude)?;
        write_text(writer, Field::Altitude.name(), record.altitude)?;
        write_text(writer, Field::Speed.name(), record.speed)?;
        write_text(writer, Field::Heading.name(), record.heading)?;
        write_text(writer, Field::Status.name(), &record.status)?;
        writer.write_event(Event::End(BytesEnd::new(RECORD_TAG)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_text<T: Display>(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    value: T,
) -> quick_xml::Result<()> {
    let text = value.to_string();
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(&text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Builds an element tree, rejecting anything that is not well-formed.
///
/// Text is kept verbatim; whitespace between elements ends up in the
/// parent's `text` and is ignored by the decoders.
pub fn parse_tree(text: &str, kind: DocumentKind) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    let fail = |reader: &Reader<&[u8]>, message: String| {
        ParseError::new(
            kind,
            format!("{} (at byte {})", message, reader.buffer_position()),
        )
    };

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => return Err(fail(&reader, err.to_string())),
        };
        match event {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(fail(&reader, "more than one root element".into()));
                }
                stack.push(Element::new(element_name(&start)));
            }
            Event::Empty(start) => {
                let element = Element::new(element_name(&start));
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => return Err(fail(&reader, "more than one root element".into())),
                }
            }
            Event::Text(content) => {
                let value = content
                    .unescape()
                    .map_err(|err| fail(&reader, err.to_string()))?;
                match stack.last_mut() {
                    Some(open) => open.text.push_str(&value),
                    None if value.trim().is_empty() => {}
                    None => return Err(fail(&reader, "text outside the root element".into())),
                }
            }
            Event::CData(content) => {
                let bytes: &[u8] = &content;
                let value = std::str::from_utf8(bytes)
                    .map_err(|err| fail(&reader, err.to_string()))?;
                match stack.last_mut() {
                    Some(open) => open.text.push_str(value),
                    None => return Err(fail(&reader, "CDATA outside the root element".into())),
                }
            }
            Event::End(_) => {
                let closed = stack
                    .pop()
                    .ok_or_else(|| fail(&reader, "unbalanced closing tag".into()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(closed),
                    None => root = Some(closed),
                }
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::new(
            kind,
            format!("document ends inside <{}>", open.name),
        ));
    }
    root.ok_or_else(|| ParseError::new(kind, "document has no root element"))
}

pub(crate) fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn document_from_tree(root: &Element) -> Result<SituationDocument, ParseError> {
    if root.name != ROOT_TAG {
        return Err(ParseError::xml(format!(
            "root element is <{}>, expected <{}>",
            root.name, ROOT_TAG
        )));
    }

    let red = roster_from(root.child(RED_TAG))?;
    let blue = roster_from(root.child(BLUE_TAG))?;
    let parameters = match root.child(PARAMETERS_TAG) {
        Some(element) => parameters_from(element)?,
        None => Parameters::default(),
    };
    Ok(SituationDocument::new(red, blue, parameters))
}

fn roster_from(element: Option<&Element>) -> Result<Vec<AircraftRecord>, ParseError> {
    let Some(element) = element else {
        return Ok(Vec::new());
    };
    element
        .children_named(RECORD_TAG)
        .enumerate()
        .map(|(index, record)| {
            record_from(record).map_err(|message| {
                ParseError::xml(format!("<{}> record {}: {}", element.name, index, message))
            })
        })
        .collect()
}

fn record_from(element: &Element) -> Result<AircraftRecord, String> {
    let text = |field: Field| {
        element
            .child(field.name())
            .map(|child| child.text.as_str())
            .ok_or_else(|| format!("missing <{}>", field))
    };
    let number = |field: Field| {
        let raw = text(field)?;
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(_) => Err(format!("<{}> is not a finite number: '{}'", field, raw)),
            Err(_) => Err(format!("<{}> is not a number: '{}'", field, raw)),
        }
    };

    let raw_id = text(Field::Id)?;
    let id = raw_id
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("<id> is not an unsigned integer: '{}'", raw_id))?;

    Ok(AircraftRecord {
        id,
        kind: text(Field::Type)?.to_string(),
        longitude: number(Field::Longitude)?,
        latitude: number(Field::Latitude)?,
        altitude: number(Field::Altitude)?,
        speed: number(Field::Speed)?,
        heading: number(Field::Heading)?,
        status: text(Field::Status)?.to_string(),
    })
}

fn parameters_from(element: &Element) -> Result<Parameters, ParseError> {
    let blue_count = match element.child(BLUE_COUNT_TAG) {
        Some(child) => child.text.trim().parse::<i64>().map_err(|_| {
            ParseError::xml(format!("<{}> is not an integer: '{}'", BLUE_COUNT_TAG, child.text))
        })?,
        None => 0,
    };
    let strategy = element
        .child(STRATEGY_TAG)
        .map(|child| child.text.clone())
        .unwrap_or_default();
    let task_mode = match element.child(TASK_MODE_TAG) {
        Some(child) if !child.text.trim().is_empty() => {
            Some(child.text.parse::<TaskMode>().map_err(ParseError::xml)?)
        }
        _ => None,
    };

    Ok(Parameters {
        blue_count,
        strategy,
        task_mode,
    })
}
