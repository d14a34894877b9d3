use crate::prelude::{ValidationError, ValidationReason};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref SIGNED_DECIMAL_RE: Regex = Regex::new(r"^-?\d+(\.\d+)?$").unwrap();
    static ref UNSIGNED_DECIMAL_RE: Regex = Regex::new(r"^\d+(\.\d+)?$").unwrap();
    static ref UNSIGNED_INTEGER_RE: Regex = Regex::new(r"^\d+$").unwrap();
}

pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
/// Heading is half-open: 360 itself is rejected.
pub const HEADING_RANGE: (f64, f64) = (0.0, 360.0);

/// Columns of an aircraft record, in display and serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Id,
    Type,
    Longitude,
    Latitude,
    Altitude,
    Speed,
    Heading,
    Status,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Id,
        Field::Type,
        Field::Longitude,
        Field::Latitude,
        Field::Altitude,
        Field::Speed,
        Field::Heading,
        Field::Status,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Type => "type",
            Field::Longitude => "longitude",
            Field::Latitude => "latitude",
            Field::Altitude => "altitude",
            Field::Speed => "speed",
            Field::Heading => "heading",
            Field::Status => "status",
        }
    }

    pub fn from_column(column: usize) -> Option<Field> {
        Self::ALL.get(column).copied()
    }

    pub fn column(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or_default()
    }

    fn is_numeric(self) -> bool {
        matches!(
            self,
            Field::Longitude | Field::Latitude | Field::Altitude | Field::Speed | Field::Heading
        )
    }

    /// Fields that accept a leading minus sign in textual input.
    fn is_signed(self) -> bool {
        matches!(self, Field::Longitude | Field::Latitude | Field::Heading)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// Typed input for [`AircraftRecord::set_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(u32),
    Number(f64),
    Text(String),
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// One entity of a force roster.
///
/// Fields missing from a stored JSON object take their zero value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AircraftRecord {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
    pub speed: f64,
    pub heading: f64,
    pub status: String,
}

impl AircraftRecord {
    pub fn new(kind: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            status: status.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    pub fn with_position(mut self, longitude: f64, latitude: f64, altitude: f64) -> Self {
        self.longitude = longitude;
        self.latitude = latitude;
        self.altitude = altitude;
        self
    }

    pub fn with_motion(mut self, speed: f64, heading: f64) -> Self {
        self.speed = speed;
        self.heading = heading;
        self
    }

    /// Parses `raw` with the field's textual grammar and commits it.
    ///
    /// Numeric fields accept only `-?\d+(\.\d+)?` (longitude, latitude,
    /// heading) or `\d+(\.\d+)?` (altitude, speed); no exponent, no
    /// surrounding whitespace, decimal point regardless of locale. On
    /// rejection the record is left untouched.
    pub fn set_field(&mut self, field: Field, raw: &str) -> Result<(), ValidationError> {
        let reject = |reason| ValidationError::new(field, reason);
        match field {
            Field::Id => {
                if raw.is_empty() {
                    return Err(reject(ValidationReason::Empty));
                }
                if !UNSIGNED_INTEGER_RE.is_match(raw) {
                    return Err(reject(ValidationReason::NotInteger));
                }
                self.id = raw
                    .parse::<u32>()
                    .map_err(|_| reject(ValidationReason::NotInteger))?;
            }
            Field::Type => self.kind = raw.to_string(),
            Field::Status => self.status = raw.to_string(),
            _ => {
                let value = parse_decimal(field, raw).map_err(reject)?;
                self.commit_number(field, value)?;
            }
        }
        Ok(())
    }

    /// Typed counterpart of [`set_field`](Self::set_field); same bounds apply.
    pub fn set_value(
        &mut self,
        field: Field,
        value: impl Into<FieldValue>,
    ) -> Result<(), ValidationError> {
        let reject = |reason| ValidationError::new(field, reason);
        match (field, value.into()) {
            (_, FieldValue::Text(raw)) => self.set_field(field, &raw),
            (Field::Id, FieldValue::Integer(id)) => {
                self.id = id;
                Ok(())
            }
            (Field::Id, FieldValue::Number(number)) => {
                if number.fract() != 0.0 || number < 0.0 || number > u32::MAX as f64 {
                    return Err(reject(ValidationReason::NotInteger));
                }
                self.id = number as u32;
                Ok(())
            }
            (Field::Type, other) => {
                self.kind = display_value(&other);
                Ok(())
            }
            (Field::Status, other) => {
                self.status = display_value(&other);
                Ok(())
            }
            (_, FieldValue::Integer(number)) => self.commit_number(field, number as f64),
            (_, FieldValue::Number(number)) => self.commit_number(field, number),
        }
    }

    /// Returns the display text of one column, formatted as the roster table shows it.
    pub fn field_text(&self, field: Field) -> String {
        match field {
            Field::Id => self.id.to_string(),
            Field::Type => self.kind.clone(),
            Field::Longitude => format!("{:.6}", self.longitude),
            Field::Latitude => format!("{:.6}", self.latitude),
            Field::Altitude => format!("{:.2}", self.altitude),
            Field::Speed => format!("{:.2}", self.speed),
            Field::Heading => format!("{:.2}", self.heading),
            Field::Status => self.status.clone(),
        }
    }

    /// Numeric value of a kinematic column; `None` for id and text columns.
    pub fn number(&self, field: Field) -> Option<f64> {
        match field {
            Field::Longitude => Some(self.longitude),
            Field::Latitude => Some(self.latitude),
            Field::Altitude => Some(self.altitude),
            Field::Speed => Some(self.speed),
            Field::Heading => Some(self.heading),
            Field::Id | Field::Type | Field::Status => None,
        }
    }

    /// First kinematic column holding NaN or an infinity.
    pub fn non_finite_field(&self) -> Option<Field> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| self.number(*field).map_or(false, |value| !value.is_finite()))
    }

    fn commit_number(&mut self, field: Field, value: f64) -> Result<(), ValidationError> {
        check_bounds(field, value).map_err(|reason| ValidationError::new(field, reason))?;
        match field {
            Field::Longitude => self.longitude = value,
            Field::Latitude => self.latitude = value,
            Field::Altitude => self.altitude = value,
            Field::Speed => self.speed = value,
            Field::Heading => self.heading = value,
            Field::Id | Field::Type | Field::Status => {
                return Err(ValidationError::new(field, ValidationReason::NotNumeric))
            }
        }
        Ok(())
    }
}

impl fmt::Display for AircraftRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4}  {:<18} {:>12} {:>11} {:>9} {:>8} {:>7}  {}",
            self.id,
            self.kind,
            self.field_text(Field::Longitude),
            self.field_text(Field::Latitude),
            self.field_text(Field::Altitude),
            self.field_text(Field::Speed),
            self.field_text(Field::Heading),
            self.status
        )
    }
}

fn display_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Integer(number) => number.to_string(),
        FieldValue::Number(number) => number.to_string(),
        FieldValue::Text(text) => text.clone(),
    }
}

fn parse_decimal(field: Field, raw: &str) -> Result<f64, ValidationReason> {
    if raw.is_empty() {
        return Err(ValidationReason::Empty);
    }
    if !field.is_numeric() {
        return Err(ValidationReason::NotNumeric);
    }
    if !field.is_signed() {
        if let Some(magnitude) = raw.strip_prefix('-') {
            return Err(if UNSIGNED_DECIMAL_RE.is_match(magnitude) {
                ValidationReason::Negative
            } else {
                ValidationReason::NotNumeric
            });
        }
        if !UNSIGNED_DECIMAL_RE.is_match(raw) {
            return Err(ValidationReason::NotNumeric);
        }
    } else if !SIGNED_DECIMAL_RE.is_match(raw) {
        return Err(ValidationReason::NotNumeric);
    }
    raw.parse::<f64>().map_err(|_| ValidationReason::NotNumeric)
}

fn check_bounds(field: Field, value: f64) -> Result<(), ValidationReason> {
    if !value.is_finite() {
        return Err(ValidationReason::NotFinite);
    }
    let inclusive = |(min, max): (f64, f64)| {
        if value < min || value > max {
            Err(ValidationReason::OutOfRange { min, max })
        } else {
            Ok(())
        }
    };
    match field {
        Field::Longitude => inclusive(LONGITUDE_RANGE),
        Field::Latitude => inclusive(LATITUDE_RANGE),
        Field::Altitude | Field::Speed if value < 0.0 => Err(ValidationReason::Negative),
        Field::Heading if value < HEADING_RANGE.0 => Err(ValidationReason::Negative),
        Field::Heading if value >= HEADING_RANGE.1 => Err(ValidationReason::OutOfRange {
            min: HEADING_RANGE.0,
            max: HEADING_RANGE.1,
        }),
        _ => Ok(()),
    }
}
