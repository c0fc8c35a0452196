//! Custom GraphQL scalars.

use {
    async_graphql::{InputValueError, InputValueResult, Number, Scalar, ScalarType, Value},
    chrono::{DateTime, NaiveDate, SecondsFormat, Utc},
    quill_config::DateFormat,
};

/// GraphQL name of the [`Date`] scalar.
pub const DATE_SCALAR: &str = "Date";

/// `0000-01-01T00:00:00.000Z`. RFC 3339 has no room for earlier years.
const MIN_MILLIS: i64 = -62_167_219_200_000;
/// `9999-12-31T23:59:59.999Z`. Later years need the extended-year form.
const MAX_MILLIS: i64 = 253_402_300_799_999;

/// Why a value could not be coerced into a [`Date`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("invalid Date value: timestamp {0} is out of range")]
    OutOfRange(String),

    #[error("invalid Date value: {0:?} is not an ISO-8601 date or date-time")]
    Unparseable(String),

    #[error("invalid Date value: expected an epoch-millis number or an ISO-8601 string")]
    UnsupportedValueType,
}

// ── JSON ────────────────────────────────────────────────────────────────────

/// Untyped JSON document, for payloads whose shape is only known at runtime
/// such as imported messages that do not say which variant they are.
#[derive(Debug, Clone)]
pub struct Json(pub serde_json::Value);

/// Enum tokens and binary blobs have no JSON counterpart.
fn is_plain_json(value: &Value) -> bool {
    match value {
        Value::Enum(_) | Value::Binary(_) => false,
        Value::List(items) => items.iter().all(is_plain_json),
        Value::Object(fields) => fields.values().all(is_plain_json),
        _ => true,
    }
}

#[Scalar(name = "JSON")]
impl ScalarType for Json {
    fn parse(value: Value) -> InputValueResult<Self> {
        if !is_plain_json(&value) {
            return Err(InputValueError::custom(
                "JSON documents cannot hold enum or binary values",
            ));
        }
        value.into_json().map(Json).map_err(InputValueError::custom)
    }

    fn to_value(&self) -> Value {
        Value::from_json(self.0.clone()).unwrap_or(Value::Null)
    }
}

// ── Literal tokens ──────────────────────────────────────────────────────────

/// Lexical kind of a value written inline in a query document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    String,
    Boolean,
    Null,
    Enum,
    List,
    Object,
}

/// An inline query literal: its token kind plus the raw source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub raw: String,
}

impl Literal {
    pub fn new(kind: LiteralKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }
}

// ── Date ────────────────────────────────────────────────────────────────────

/// Date custom scalar type.
///
/// Internally a UTC instant. On input it accepts epoch milliseconds or an
/// ISO-8601 string; inline query literals must be integer tokens. On output it
/// is written in the [`DateFormat`] it carries (epoch millis unless the schema
/// was built with another format).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    instant: DateTime<Utc>,
    format: DateFormat,
}

impl Date {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            format: DateFormat::default(),
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: DateFormat) -> Self {
        self.format = format;
        self
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn format(&self) -> DateFormat {
        self.format
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.instant.timestamp_millis()
    }

    /// Instants outside years 0000 to 9999 are rejected, so every accepted
    /// value also reads back from its ISO-8601 output.
    pub fn from_timestamp_millis(millis: i64) -> Result<Self, DateError> {
        if !(MIN_MILLIS..=MAX_MILLIS).contains(&millis) {
            return Err(DateError::OutOfRange(millis.to_string()));
        }
        DateTime::from_timestamp_millis(millis)
            .map(Self::new)
            .ok_or_else(|| DateError::OutOfRange(millis.to_string()))
    }

    /// Coerce a caller-supplied value (variable or input-object field).
    pub fn coerce_input(value: &Value) -> Result<Self, DateError> {
        match value {
            Value::Number(n) => Self::from_number(n),
            Value::String(s) => Self::from_text(s),
            _ => Err(DateError::UnsupportedValueType),
        }
    }

    /// Same rules as [`Date::coerce_input`], for values inside JSON documents.
    pub fn coerce_json(value: &serde_json::Value) -> Result<Self, DateError> {
        match value {
            serde_json::Value::Number(n) => Self::from_number(n),
            serde_json::Value::String(s) => Self::from_text(s),
            _ => Err(DateError::UnsupportedValueType),
        }
    }

    /// Coerce a literal written directly in a query document.
    ///
    /// Only integer tokens are accepted; their text is read as base-10 epoch
    /// milliseconds. Every other token kind yields `None`.
    pub fn parse_literal(literal: &Literal) -> Option<Self> {
        match literal.kind {
            LiteralKind::Int => literal
                .raw
                .parse::<i64>()
                .ok()
                .and_then(|millis| Self::from_timestamp_millis(millis).ok()),
            _ => None,
        }
    }

    fn from_number(n: &Number) -> Result<Self, DateError> {
        if let Some(millis) = n.as_i64() {
            return Self::from_timestamp_millis(millis);
        }
        match n.as_f64() {
            Some(f) if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                Self::from_timestamp_millis(f.trunc() as i64)
            },
            _ => Err(DateError::OutOfRange(n.to_string())),
        }
    }

    fn from_text(s: &str) -> Result<Self, DateError> {
        let s = s.trim();
        let instant = DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc())
            })
            .ok_or_else(|| DateError::Unparseable(s.to_string()))?;
        Self::from_timestamp_millis(instant.timestamp_millis())
    }
}

impl From<DateTime<Utc>> for Date {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::new(instant)
    }
}

/// Date custom scalar type
#[Scalar(name = "Date")]
impl ScalarType for Date {
    fn parse(value: Value) -> InputValueResult<Self> {
        Date::coerce_input(&value).map_err(InputValueError::custom)
    }

    fn is_valid(value: &Value) -> bool {
        matches!(value, Value::Number(_) | Value::String(_))
    }

    fn to_value(&self) -> Value {
        match self.format {
            DateFormat::EpochMillis => Value::Number(self.timestamp_millis().into()),
            DateFormat::Iso8601 => {
                Value::String(self.instant.to_rfc3339_opts(SecondsFormat::Millis, true))
            },
        }
    }
}
