//! Opaque primary-key identifiers.
//!
//! A model's identity is the triple (type name, partition key, sort key).
//! `encode` serializes it as a compact JSON array and wraps it in URL-safe,
//! unpadded base64 so it can travel in URLs and external references.
//!
//! The type-name field is asymmetric on purpose: the stored payload carries
//! the snake_case canonical form, while decoding yields the camelized display
//! form derived from it. Absent partition/sort keys are stored as empty
//! strings, so an empty string and "absent" are indistinguishable after a
//! round trip.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use dynamap_core::error::KeyDecodeError;

/// The canonical payload of an opaque identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimaryKey {
    /// Display-form type name, e.g. `CalendarEntry`.
    pub type_name: String,
    pub partition_key: Option<String>,
    pub sort_key: Option<String>,
}

impl PrimaryKey {
    pub fn new(
        type_name: impl Into<String>,
        partition_key: Option<String>,
        sort_key: Option<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            partition_key,
            sort_key,
        }
    }

    /// Encode into the opaque URL-safe text form.
    ///
    /// The payload is `[snake_case(type_name), partition_key, sort_key]` with
    /// absent keys as empty strings, serialized compactly and base64-encoded
    /// with the URL-safe alphabet and no padding.
    pub fn encode(&self) -> String {
        let payload = [
            snake_case(&self.type_name),
            self.partition_key.clone().unwrap_or_default(),
            self.sort_key.clone().unwrap_or_default(),
        ];
        let json =
            serde_json::to_string(&payload).expect("a JSON array of strings always serializes");
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode an opaque identifier back into a descriptor.
    ///
    /// The type name comes back camelized; blank partition/sort components
    /// decode to `None`.
    pub fn decode(encoded: &str) -> Result<Self, KeyDecodeError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|err| KeyDecodeError::Base64(err.to_string()))?;
        let parts: Vec<String> = serde_json::from_slice(&bytes)
            .map_err(|err| KeyDecodeError::Payload(err.to_string()))?;
        if parts.len() != 3 {
            return Err(KeyDecodeError::Shape(parts.len()));
        }

        Ok(Self {
            type_name: camelize(&parts[0]),
            partition_key: presence(&parts[1]),
            sort_key: presence(&parts[2]),
        })
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

fn presence(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Convert a display-form type name to its lowercase underscore form,
/// e.g. `CalendarEntry` -> `calendar_entry`.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let after_lower = i > 0 && chars[i - 1].is_lowercase();
            let before_lower = i > 0 && i + 1 < chars.len() && chars[i + 1].is_lowercase();
            if after_lower || before_lower {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(*ch);
        }
    }
    out
}

/// Convert a lowercase underscore name to its capitalized display form,
/// e.g. `calendar_entry` -> `CalendarEntry`.
pub fn camelize(name: &str) -> String {
    name.split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
