//! Type coercion from raw vendor text to typed values.
//!
//! Every coercion accepts either the raw text found in a document or an
//! already-typed value ([`RawValue`]), and is idempotent: coercing an
//! already-typed value returns it unchanged.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use super::path::WindowsPath;
use super::{CoercionError, XmlElement};

/// Input to a coercion: raw document text, or a value that is already typed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a, T> {
    /// Text as found in the XML document
    Text(&'a str),
    /// Value that has already been coerced
    Typed(T),
}

impl<'a, T> From<&'a str> for RawValue<'a, T> {
    fn from(text: &'a str) -> Self {
        RawValue::Text(text)
    }
}

impl<'a, T> From<&'a String> for RawValue<'a, T> {
    fn from(text: &'a String) -> Self {
        RawValue::Text(text.as_str())
    }
}

impl From<bool> for RawValue<'_, bool> {
    fn from(value: bool) -> Self {
        RawValue::Typed(value)
    }
}

impl From<Duration> for RawValue<'_, Duration> {
    fn from(value: Duration) -> Self {
        RawValue::Typed(value)
    }
}

/// Parse a vendor boolean.
///
/// `"-1"` is the vendor's non-standard spelling of true; everything else goes
/// through [`strtobool`].
pub fn to_bool<'a>(value: impl Into<RawValue<'a, bool>>) -> Result<bool, CoercionError> {
    match value.into() {
        RawValue::Typed(value) => Ok(value),
        RawValue::Text(text) if text.trim() == "-1" => Ok(true),
        RawValue::Text(text) => strtobool(text),
    }
}

/// Parse a conventional boolean word, case-insensitively.
///
/// True values are `y`, `yes`, `t`, `true`, `on` and `1`; false values are
/// `n`, `no`, `f`, `false`, `off` and `0`.
pub fn strtobool(text: &str) -> Result<bool, CoercionError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(false),
        _ => Err(CoercionError::InvalidBool(text.to_string())),
    }
}

/// Parse an integer, allowing surrounding whitespace
pub fn to_int<T: FromStr>(text: &str) -> Result<T, CoercionError> {
    text.trim()
        .parse()
        .map_err(|_| CoercionError::InvalidNumber(text.to_string()))
}

/// Parse a floating-point number, allowing surrounding whitespace
pub fn to_float(text: &str) -> Result<f64, CoercionError> {
    text.trim()
        .parse()
        .map_err(|_| CoercionError::InvalidNumber(text.to_string()))
}

fn duration_from(
    value: RawValue<'_, Duration>,
    seconds_per_unit: f64,
) -> Result<Duration, CoercionError> {
    match value {
        RawValue::Typed(duration) => Ok(duration),
        RawValue::Text(text) => {
            let amount = to_float(text)?;
            Duration::try_from_secs_f64(amount * seconds_per_unit)
                .map_err(|_| CoercionError::InvalidDuration(text.to_string()))
        }
    }
}

/// Construct a duration from a number of minutes
pub fn to_duration_minutes<'a>(
    value: impl Into<RawValue<'a, Duration>>,
) -> Result<Duration, CoercionError> {
    duration_from(value.into(), 60.0)
}

/// Construct a duration from a number of seconds
pub fn to_duration_seconds<'a>(
    value: impl Into<RawValue<'a, Duration>>,
) -> Result<Duration, CoercionError> {
    duration_from(value.into(), 1.0)
}

/// Windows-style path for the given text, or `None` if it is blank
pub fn to_windows_path(text: &str) -> Option<WindowsPath> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(WindowsPath::new(text))
    }
}

/// Parse a vendor timestamp such as `2019-09-09T13:14:36.9085672+01:00`.
///
/// Fractional seconds are discarded; the UTC offset is kept.
pub fn parse_vendor_datetime(text: &str) -> Result<DateTime<FixedOffset>, CoercionError> {
    let trimmed = text.trim();
    let invalid = || CoercionError::InvalidDateTime(text.to_string());

    let parsed = DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map_err(|_| invalid())?;

    parsed.with_nanosecond(0).ok_or_else(invalid)
}

/// An enumeration (or flag set) with a fixed set of vendor codes
pub trait VendorEnum: Copy + Sized + 'static {
    /// Type of the raw code stored in the documents (commonly an integer or a string)
    type Underlying: FromStr;

    /// Name used in error messages
    const NAME: &'static str;

    /// Member for the given code, if there is one
    fn from_underlying(value: &Self::Underlying) -> Option<Self>;

    /// Code for this member
    fn to_underlying(&self) -> Self::Underlying;
}

/// Input to [`enum_from_value_or_member`]: a member, or its raw code as text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MemberOr<'a, E> {
    /// Already a member of the enumeration
    Member(E),
    /// Raw code as found in the document
    Value(&'a str),
}

impl<'a, E: VendorEnum> From<&'a str> for MemberOr<'a, E> {
    fn from(value: &'a str) -> Self {
        MemberOr::Value(value)
    }
}

/// Resolve a value to a member of `E`.
///
/// Members are returned as-is; text is first parsed as `E::Underlying` and
/// then looked up. Unknown codes are an error, never a default.
pub fn enum_from_value_or_member<'a, E: VendorEnum>(
    value: impl Into<MemberOr<'a, E>>,
) -> Result<E, CoercionError> {
    match value.into() {
        MemberOr::Member(member) => Ok(member),
        MemberOr::Value(text) => {
            let underlying: E::Underlying = text.trim().parse().map_err(|_| {
                CoercionError::UnknownMember {
                    enum_name: E::NAME,
                    value: text.to_string(),
                }
            })?;
            E::from_underlying(&underlying).ok_or_else(|| CoercionError::UnknownMember {
                enum_name: E::NAME,
                value: text.to_string(),
            })
        }
    }
}

/// Convert a vendor CamelCase tag into a snake_case key.
///
/// `ModuleDisplayName` becomes `module_display_name`, `RepeaterID1` becomes
/// `repeater_id1` and `IsRCDevice` becomes `is_rc_device`.
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();

    // Pass 1: split before a capitalised word, i.e. an upper-case letter
    // followed by lower-case ones.
    let mut first = String::with_capacity(name.len() + 4);
    let mut i = 0;
    while i < chars.len() {
        let starts_word = i + 1 < chars.len()
            && chars[i + 1].is_ascii_lowercase()
            && chars[i].is_ascii_uppercase();
        if i > 0 && starts_word {
            first.push('_');
            first.push(chars[i]);
            i += 1;
            while i < chars.len() && chars[i].is_ascii_lowercase() {
                first.push(chars[i]);
                i += 1;
            }
            // A split needs an unconsumed preceding character, so the
            // character straight after a word never starts the next one.
            if i < chars.len() {
                first.push(chars[i]);
                i += 1;
            }
        } else {
            first.push(chars[i]);
            i += 1;
        }
    }

    // Pass 2: split between a lower-case letter or digit and an upper-case letter.
    let chars: Vec<char> = first.chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);
    for (idx, c) in chars.iter().enumerate() {
        if idx > 0 && c.is_ascii_uppercase() {
            let prev = chars[idx - 1];
            if prev.is_ascii_lowercase() || prev.is_ascii_digit() {
                out.push('_');
            }
        }
        out.push(*c);
    }

    out.to_lowercase()
}

/// Typed value of a leaf element, inferred from its text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Element had no text
    Empty,
    /// Text was an integer
    Int(i64),
    /// Text was a floating-point number
    Float(f64),
    /// Any other text, kept verbatim
    Text(String),
}

impl ScalarValue {
    /// Infer a value from element text: integer, then float, else the text itself
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return ScalarValue::Empty;
        }
        let trimmed = text.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            ScalarValue::Int(value)
        } else if let Ok(value) = trimmed.parse::<f64>() {
            ScalarValue::Float(value)
        } else {
            ScalarValue::Text(text.to_string())
        }
    }

    /// Text value, if this is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Integer value, if this is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ScalarValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric value, if this is an integer or a float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Int(value) => Some(*value as f64),
            ScalarValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Whether the element had no text
    pub fn is_empty(&self) -> bool {
        matches!(self, ScalarValue::Empty)
    }
}

impl Default for ScalarValue {
    fn default() -> Self {
        ScalarValue::Empty
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Empty => Ok(()),
            ScalarValue::Int(value) => write!(f, "{}", value),
            ScalarValue::Float(value) => write!(f, "{}", value),
            ScalarValue::Text(text) => f.write_str(text),
        }
    }
}

/// Map each child element to a snake_case key and its inferred value.
///
/// `lookup` overrides the key for specific tags. Later children with the same
/// key replace earlier ones.
pub fn tag_to_map(
    element: &XmlElement,
    lookup: &[(&str, &str)],
) -> BTreeMap<String, ScalarValue> {
    element
        .children()
        .iter()
        .map(|child| {
            let key = lookup
                .iter()
                .find(|(tag, _)| *tag == child.name())
                .map(|(_, key)| key.to_string())
                .unwrap_or_else(|| camel_to_snake(child.name()));
            (key, ScalarValue::from_text(child.text()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bool() {
        assert!(to_bool("-1").unwrap());
        assert!(to_bool(" -1 ").unwrap());
        assert!(to_bool("True").unwrap());
        assert!(to_bool("1").unwrap());
        assert!(!to_bool("false").unwrap());
        assert!(!to_bool("0").unwrap());
        assert!(to_bool(true).unwrap());
        assert!(matches!(to_bool("maybe"), Err(CoercionError::InvalidBool(_))));
        assert!(to_bool("").is_err());
    }

    #[test]
    fn test_strtobool_rejects_vendor_true() {
        assert!(strtobool("yes").unwrap());
        assert!(!strtobool("OFF").unwrap());
        assert!(strtobool("-1").is_err());
    }

    #[test]
    fn test_durations() {
        assert_eq!(to_duration_minutes("2").unwrap(), Duration::from_secs(120));
        assert_eq!(to_duration_minutes("0.5").unwrap(), Duration::from_secs(30));
        assert_eq!(to_duration_seconds("816.2").unwrap(), Duration::from_secs_f64(816.2));

        let already = Duration::from_millis(1500);
        assert_eq!(to_duration_minutes(already).unwrap(), already);
        assert_eq!(to_duration_seconds(already).unwrap(), already);

        assert!(matches!(
            to_duration_minutes("ten"),
            Err(CoercionError::InvalidNumber(_))
        ));
        assert!(matches!(
            to_duration_minutes("-1"),
            Err(CoercionError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_windows_path() {
        assert_eq!(to_windows_path(""), None);
        assert_eq!(to_windows_path("   "), None);

        let path = to_windows_path(r"D:\MassHunter\Methods\Positive.m").unwrap();
        assert_eq!(path.file_name(), Some("Positive.m"));
    }

    #[test]
    fn test_vendor_datetime_truncates_fraction() {
        let parsed = parse_vendor_datetime("2019-09-09T13:14:36.9085672+01:00").unwrap();
        let expected = DateTime::parse_from_rfc3339("2019-09-09T12:14:36Z").unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.offset().local_minus_utc(), 3600);

        let plain = parse_vendor_datetime("2020-01-24T10:36:01+00:00").unwrap();
        assert_eq!(plain.timestamp(), 1579862161);

        assert!(matches!(
            parse_vendor_datetime("yesterday"),
            Err(CoercionError::InvalidDateTime(_))
        ));
    }

    #[test]
    fn test_camel_to_snake() {
        assert_eq!(camel_to_snake("ModuleDisplayName"), "module_display_name");
        assert_eq!(camel_to_snake("RepeaterID1"), "repeater_id1");
        assert_eq!(camel_to_snake("IsRCDevice"), "is_rc_device");
        assert_eq!(camel_to_snake("DeviceID"), "device_id");
        assert_eq!(camel_to_snake("GrannySmith"), "granny_smith");
        assert_eq!(camel_to_snake("Apple"), "apple");
        assert_eq!(camel_to_snake("name"), "name");
    }

    #[test]
    fn test_scalar_value_inference() {
        assert_eq!(ScalarValue::from_text("123"), ScalarValue::Int(123));
        assert_eq!(ScalarValue::from_text("12.34"), ScalarValue::Float(12.34));
        assert_eq!(
            ScalarValue::from_text("abcdefg"),
            ScalarValue::Text("abcdefg".to_string())
        );
        assert_eq!(ScalarValue::from_text(""), ScalarValue::Empty);
        assert_eq!(
            ScalarValue::from_text("\n    "),
            ScalarValue::Text("\n    ".to_string())
        );
    }

    #[test]
    fn test_tag_to_map() {
        let element = XmlElement::new("Fruits")
            .with_text_child("Apple", "123")
            .with_text_child("Orange", "12.34")
            .with_text_child("Strawberry", "abcdefg")
            .with_text_child("GrannySmith", "delicious")
            .with_child(XmlElement::new("Grapes"));

        let map = tag_to_map(&element, &[]);
        assert_eq!(map["apple"], ScalarValue::Int(123));
        assert_eq!(map["orange"], ScalarValue::Float(12.34));
        assert_eq!(map["strawberry"], ScalarValue::Text("abcdefg".into()));
        assert_eq!(map["granny_smith"], ScalarValue::Text("delicious".into()));
        assert_eq!(map["grapes"], ScalarValue::Empty);

        let map = tag_to_map(&element, &[("GrannySmith", "granny smith")]);
        assert!(map.contains_key("granny smith"));
        assert!(!map.contains_key("granny_smith"));
    }

    #[test]
    fn test_scalar_value_json() {
        let values = vec![
            ScalarValue::Empty,
            ScalarValue::Int(7),
            ScalarValue::Float(0.5),
            ScalarValue::Text("x".into()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,7,0.5,"x"]"#);
        let restored: Vec<ScalarValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, values);
    }
}
