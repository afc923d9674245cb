//! Attribute codec.
//!
//! Pure functions converting between dynamic [`Value`]s and the store's
//! tagged [`WireValue`] encoding. These are testable in isolation without
//! store access.
//!
//! Encoding is lossy in two documented ways: empty maps, lists, and sets all
//! collapse to the null marker, and a number's integer/float subtype survives
//! only through the presence of a `.` in its decimal-string encoding.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use dynamap_core::error::FormatError;
use dynamap_core::value::Value;
use dynamap_core::wire::{Item, WireValue};

/// A dynamic field map, as produced by flattening a model's attributes.
pub type FieldMap = HashMap<String, Value>;

// ============================================================================
// Formatting (dynamic value -> wire value)
// ============================================================================

/// Convert a dynamic value into the store's tagged wire encoding.
///
/// Instants encode as Unix epoch seconds truncated to an integer; calendar
/// dates are first normalized to their UTC midnight instant. Empty maps,
/// lists, and sets encode as the null marker.
pub fn format(value: &Value) -> Result<WireValue, FormatError> {
    match value {
        Value::Bool(flag) => Ok(WireValue::Bool(*flag)),
        Value::Null => Ok(WireValue::Null(true)),
        Value::String(text) => Ok(WireValue::S(text.clone())),
        Value::Int(number) => Ok(WireValue::N(number.to_string())),
        Value::Float(number) => Ok(WireValue::N(float_to_decimal(*number)?)),
        Value::Timestamp(instant) => Ok(WireValue::N(instant.timestamp().to_string())),
        Value::Date(date) => format(&Value::Timestamp(date_to_instant(*date))),
        Value::Map(entries) => format_map(entries),
        Value::List(elements) => format_list(elements),
        Value::Set(members) => format_set(members),
    }
}

/// Format every field of a dynamic field map into a wire item.
pub fn format_item(fields: &FieldMap) -> Result<Item, FormatError> {
    let mut item = Item::with_capacity(fields.len());
    for (name, value) in fields {
        item.insert(name.clone(), format(value)?);
    }
    Ok(item)
}

fn format_map(entries: &BTreeMap<String, Value>) -> Result<WireValue, FormatError> {
    if entries.is_empty() {
        return Ok(WireValue::Null(true));
    }
    let mut formatted = HashMap::with_capacity(entries.len());
    for (key, value) in entries {
        formatted.insert(key.clone(), format(value)?);
    }
    Ok(WireValue::M(formatted))
}

fn format_list(elements: &[Value]) -> Result<WireValue, FormatError> {
    if elements.is_empty() {
        return Ok(WireValue::Null(true));
    }
    let formatted = elements.iter().map(format).collect::<Result<Vec<_>, _>>()?;
    Ok(WireValue::L(formatted))
}

fn format_set(members: &[Value]) -> Result<WireValue, FormatError> {
    if members.is_empty() {
        return Ok(WireValue::Null(true));
    }

    if members.iter().all(Value::is_text) {
        let mut encoded: Vec<String> = Vec::with_capacity(members.len());
        for member in members {
            if let Value::String(text) = member {
                if !encoded.contains(text) {
                    encoded.push(text.clone());
                }
            }
        }
        return Ok(WireValue::Ss(encoded));
    }

    // Integer and float members may mix freely within a number set.
    if members.iter().all(Value::is_numeric) {
        let mut encoded: Vec<String> = Vec::with_capacity(members.len());
        for member in members {
            let decimal = numeric_to_decimal(member)?;
            if !encoded.contains(&decimal) {
                encoded.push(decimal);
            }
        }
        return Ok(WireValue::Ns(encoded));
    }

    let mut kinds: Vec<&'static str> = Vec::new();
    for member in members {
        if !kinds.contains(&member.kind()) {
            kinds.push(member.kind());
        }
    }
    if kinds.len() == 1 {
        Err(FormatError::UnsupportedSetElement(kinds[0]))
    } else {
        Err(FormatError::HeterogeneousSet(kinds.join(", ")))
    }
}

fn numeric_to_decimal(value: &Value) -> Result<String, FormatError> {
    match value {
        Value::Int(number) => Ok(number.to_string()),
        Value::Float(number) => float_to_decimal(*number),
        other => Err(FormatError::UnsupportedSetElement(other.kind())),
    }
}

fn float_to_decimal(number: f64) -> Result<String, FormatError> {
    if !number.is_finite() {
        return Err(FormatError::NonFiniteNumber(number.to_string()));
    }
    Ok(number.to_string())
}

fn date_to_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

// ============================================================================
// Flattening (wire value -> dynamic value)
// ============================================================================

/// Convert a wire value back into a dynamic value.
///
/// The decimal string decides the numeric subtype: a `.` yields a float,
/// otherwise an integer. The wire null marker flattens to the distinguishable
/// [`Value::Null`] placeholder, not to an absent value.
pub fn flatten(value: &WireValue) -> Result<Value, FormatError> {
    match value {
        WireValue::S(text) => Ok(Value::String(text.clone())),
        WireValue::N(text) => decimal_to_value(text),
        // The wire never carries an empty set; one showing up means the
        // value's tag and payload disagree.
        WireValue::Ss(members) if members.is_empty() => Err(FormatError::UnexpectedWireValue),
        WireValue::Ns(members) if members.is_empty() => Err(FormatError::UnexpectedWireValue),
        WireValue::Ss(members) => Ok(Value::Set(
            members.iter().map(|m| Value::String(m.clone())).collect(),
        )),
        WireValue::Ns(members) => {
            let parsed = members
                .iter()
                .map(|m| decimal_to_value(m))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Set(parsed))
        }
        WireValue::M(entries) => {
            let mut flattened = BTreeMap::new();
            for (key, value) in entries {
                flattened.insert(key.clone(), flatten(value)?);
            }
            Ok(Value::Map(flattened))
        }
        WireValue::L(elements) => {
            let flattened = elements.iter().map(flatten).collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(flattened))
        }
        WireValue::Null(true) => Ok(Value::Null),
        // A tagged value with nothing populated is not a value at all.
        WireValue::Null(false) => Err(FormatError::UnexpectedWireValue),
        WireValue::Bool(flag) => Ok(Value::Bool(*flag)),
    }
}

/// Flatten every attribute of a raw wire item into a dynamic field map.
pub fn flatten_item(item: &Item) -> Result<FieldMap, FormatError> {
    let mut fields = FieldMap::with_capacity(item.len());
    for (name, value) in item {
        fields.insert(name.clone(), flatten(value)?);
    }
    Ok(fields)
}

fn decimal_to_value(text: &str) -> Result<Value, FormatError> {
    if !text.contains('.') {
        if let Ok(number) = text.parse::<i64>() {
            return Ok(Value::Int(number));
        }
    }
    // The store holds numbers wider than i64; integer forms beyond its range
    // come back as floats.
    match text.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Value::Float(number)),
        _ => Err(FormatError::InvalidNumber(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(members: Vec<Value>) -> Value {
        Value::Set(members)
    }

    // ------------------------------------------------------------------
    // format
    // ------------------------------------------------------------------

    #[test]
    fn test_format_bool() {
        assert_eq!(format(&Value::Bool(true)).unwrap(), WireValue::Bool(true));
        assert_eq!(format(&Value::Bool(false)).unwrap(), WireValue::Bool(false));
    }

    #[test]
    fn test_format_null() {
        assert_eq!(format(&Value::Null).unwrap(), WireValue::Null(true));
    }

    #[test]
    fn test_format_string() {
        assert_eq!(
            format(&Value::from("foo")).unwrap(),
            WireValue::S("foo".to_string())
        );
    }

    #[test]
    fn test_format_numbers() {
        assert_eq!(format(&Value::Int(100)).unwrap(), WireValue::N("100".into()));
        assert_eq!(
            format(&Value::Float(1.2)).unwrap(),
            WireValue::N("1.2".into())
        );
        // Trailing zeroes are not preserved by the canonical decimal form.
        assert_eq!(
            format(&Value::Float(1.20)).unwrap(),
            WireValue::N("1.2".into())
        );
    }

    #[test]
    fn test_format_non_finite_float_fails() {
        assert!(matches!(
            format(&Value::Float(f64::NAN)),
            Err(FormatError::NonFiniteNumber(_))
        ));
        assert!(matches!(
            format(&Value::Float(f64::INFINITY)),
            Err(FormatError::NonFiniteNumber(_))
        ));
    }

    #[test]
    fn test_format_timestamp_as_epoch_seconds() {
        let instant = DateTime::from_timestamp(1_544_634_052, 0).unwrap();
        assert_eq!(
            format(&Value::Timestamp(instant)).unwrap(),
            WireValue::N("1544634052".into())
        );
    }

    #[test]
    fn test_format_date_as_utc_midnight_epoch() {
        let date = NaiveDate::from_ymd_opt(2018, 12, 12).unwrap();
        // 2018-12-12T00:00:00Z
        assert_eq!(
            format(&Value::Date(date)).unwrap(),
            WireValue::N("1544572800".into())
        );
    }

    #[test]
    fn test_format_empty_collections_collapse_to_null() {
        assert_eq!(
            format(&Value::Map(BTreeMap::new())).unwrap(),
            WireValue::Null(true)
        );
        assert_eq!(
            format(&Value::List(Vec::new())).unwrap(),
            WireValue::Null(true)
        );
        assert_eq!(format(&set(Vec::new())).unwrap(), WireValue::Null(true));
    }

    #[test]
    fn test_format_map_recurses() {
        let mut entries = BTreeMap::new();
        entries.insert("foo".to_string(), Value::from("bar"));
        entries.insert("baz".to_string(), Value::Bool(true));

        let mut expected = HashMap::new();
        expected.insert("foo".to_string(), WireValue::S("bar".into()));
        expected.insert("baz".to_string(), WireValue::Bool(true));

        assert_eq!(
            format(&Value::Map(entries)).unwrap(),
            WireValue::M(expected)
        );
    }

    #[test]
    fn test_format_list_recurses_in_order() {
        let list = Value::List(vec![Value::from("foo"), Value::Int(1)]);
        assert_eq!(
            format(&list).unwrap(),
            WireValue::L(vec![WireValue::S("foo".into()), WireValue::N("1".into())])
        );
    }

    #[test]
    fn test_format_string_set() {
        assert_eq!(
            format(&set(vec![Value::from("foo"), Value::from("bar")])).unwrap(),
            WireValue::Ss(vec!["foo".into(), "bar".into()])
        );
    }

    #[test]
    fn test_format_number_set_mixes_integer_and_float() {
        assert_eq!(
            format(&set(vec![Value::Int(42), Value::Float(13.37)])).unwrap(),
            WireValue::Ns(vec!["42".into(), "13.37".into()])
        );
    }

    #[test]
    fn test_format_set_deduplicates_members() {
        assert_eq!(
            format(&set(vec![
                Value::from("foo"),
                Value::from("foo"),
                Value::from("bar")
            ]))
            .unwrap(),
            WireValue::Ss(vec!["foo".into(), "bar".into()])
        );
        assert_eq!(
            format(&set(vec![Value::Int(42), Value::Float(42.0)])).unwrap(),
            WireValue::Ns(vec!["42".into()])
        );
    }

    #[test]
    fn test_format_mixed_set_fails() {
        let err = format(&set(vec![Value::from("foo"), Value::Int(12)])).unwrap_err();
        assert_eq!(
            err,
            FormatError::HeterogeneousSet("string, integer".to_string())
        );
    }

    #[test]
    fn test_format_uniform_unsupported_set_fails() {
        let err = format(&set(vec![Value::Bool(true), Value::Bool(false)])).unwrap_err();
        assert_eq!(err, FormatError::UnsupportedSetElement("bool"));
    }

    #[test]
    fn test_format_item_formats_every_field() {
        let mut fields = FieldMap::new();
        fields.insert("name".to_string(), Value::from("Ada"));
        fields.insert("age".to_string(), Value::Int(30));

        let item = format_item(&fields).unwrap();
        assert_eq!(item.get("name").unwrap(), &WireValue::S("Ada".into()));
        assert_eq!(item.get("age").unwrap(), &WireValue::N("30".into()));
    }

    // ------------------------------------------------------------------
    // flatten
    // ------------------------------------------------------------------

    #[test]
    fn test_flatten_string() {
        assert_eq!(
            flatten(&WireValue::S("Testing".into())).unwrap(),
            Value::from("Testing")
        );
    }

    #[test]
    fn test_flatten_number_by_separator() {
        assert_eq!(flatten(&WireValue::N("42".into())).unwrap(), Value::Int(42));
        assert_eq!(
            flatten(&WireValue::N("42.42".into())).unwrap(),
            Value::Float(42.42)
        );
    }

    #[test]
    fn test_flatten_garbage_number_fails() {
        assert!(matches!(
            flatten(&WireValue::N("12x".into())),
            Err(FormatError::InvalidNumber(_))
        ));
        assert!(matches!(
            flatten(&WireValue::Ns(vec!["1.2.3".into()])),
            Err(FormatError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_flatten_integer_form_wider_than_i64_as_float() {
        // 38 digits of stored precision exceed i64's 19.
        assert_eq!(
            flatten(&WireValue::N("12345678901234567890123".into())).unwrap(),
            Value::Float(12345678901234567890123f64)
        );
        assert_eq!(
            flatten(&WireValue::Ns(vec!["99999999999999999999".into()])).unwrap(),
            set(vec![Value::Float(99999999999999999999f64)])
        );
    }

    #[test]
    fn test_flatten_non_finite_decimal_fails() {
        assert!(matches!(
            flatten(&WireValue::N("inf".into())),
            Err(FormatError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_flatten_string_set() {
        assert_eq!(
            flatten(&WireValue::Ss(vec!["one".into(), "two".into()])).unwrap(),
            set(vec![Value::from("one"), Value::from("two")])
        );
    }

    #[test]
    fn test_flatten_number_set() {
        assert_eq!(
            flatten(&WireValue::Ns(vec!["42".into(), "42.42".into()])).unwrap(),
            set(vec![Value::Int(42), Value::Float(42.42)])
        );
    }

    #[test]
    fn test_flatten_map_preserves_keys() {
        let mut entries = HashMap::new();
        entries.insert("string".to_string(), WireValue::S("Testing".into()));
        entries.insert("number".to_string(), WireValue::N("42.42".into()));

        let mut expected = BTreeMap::new();
        expected.insert("string".to_string(), Value::from("Testing"));
        expected.insert("number".to_string(), Value::Float(42.42));

        assert_eq!(flatten(&WireValue::M(entries)).unwrap(), Value::Map(expected));
    }

    #[test]
    fn test_flatten_list_preserves_order() {
        let list = WireValue::L(vec![
            WireValue::S("Testing".into()),
            WireValue::N("42.42".into()),
        ]);
        assert_eq!(
            flatten(&list).unwrap(),
            Value::List(vec![Value::from("Testing"), Value::Float(42.42)])
        );
    }

    #[test]
    fn test_flatten_null_marker_is_distinguishable() {
        assert_eq!(flatten(&WireValue::Null(true)).unwrap(), Value::Null);
    }

    #[test]
    fn test_flatten_bools_including_false() {
        assert_eq!(flatten(&WireValue::Bool(true)).unwrap(), Value::Bool(true));
        assert_eq!(flatten(&WireValue::Bool(false)).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_flatten_unpopulated_value_fails() {
        assert_eq!(
            flatten(&WireValue::Null(false)).unwrap_err(),
            FormatError::UnexpectedWireValue
        );
    }

    #[test]
    fn test_flatten_empty_sets_fail() {
        assert_eq!(
            flatten(&WireValue::Ss(Vec::new())).unwrap_err(),
            FormatError::UnexpectedWireValue
        );
        assert_eq!(
            flatten(&WireValue::Ns(Vec::new())).unwrap_err(),
            FormatError::UnexpectedWireValue
        );
    }

    // ------------------------------------------------------------------
    // round trips
    // ------------------------------------------------------------------

    #[test]
    fn test_round_trip_preserves_logical_values() {
        let mut entries = BTreeMap::new();
        entries.insert("flag".to_string(), Value::Bool(false));
        entries.insert("name".to_string(), Value::from("Person"));
        entries.insert(
            "scores".to_string(),
            set(vec![Value::Int(42), Value::Float(13.37)]),
        );
        let original = Value::Map(entries);

        let decoded = flatten(&format(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_round_trip_integer_stays_integer() {
        let decoded = flatten(&format(&Value::Int(100)).unwrap()).unwrap();
        assert_eq!(decoded, Value::Int(100));
    }

    #[test]
    fn test_round_trip_large_float() {
        let decoded = flatten(&format(&Value::Float(1e30)).unwrap()).unwrap();
        assert_eq!(decoded, Value::Float(1e30));
    }

    #[test]
    fn test_round_trip_drops_trailing_zero_subtype_detail() {
        // 1.20 encodes as "1.2"; the separator keeps it a float.
        let decoded = flatten(&format(&Value::Float(1.20)).unwrap()).unwrap();
        assert_eq!(decoded, Value::Float(1.2));
    }

    #[test]
    fn test_item_round_trip() {
        let mut fields = FieldMap::new();
        fields.insert("title".to_string(), Value::from("Standup"));
        fields.insert("count".to_string(), Value::Int(3));
        fields.insert("ratio".to_string(), Value::Float(0.5));

        let recovered = flatten_item(&format_item(&fields).unwrap()).unwrap();
        assert_eq!(recovered, fields);
    }
}
