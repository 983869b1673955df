use std::collections::HashSet;

use crate::types::{CandidateSource, UiElementSpec, ValueType};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("element '{element}': {field} is not a valid {expected} value")]
    TypeMismatch {
        element: String,
        field: &'static str,
        expected: ValueType,
    },

    #[error("duplicate element name: {0}")]
    DuplicateElement(String),
}

/// Parse a JSON array of element constraint sets.
///
/// Declared values are coerced to each element's value type, so `"2024-01-01"`
/// becomes a date for a date element and stays a string for a string element.
pub fn parse_elements(json: &str) -> Result<Vec<UiElementSpec>, ParseError> {
    let raw: Vec<UiElementSpec> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    let mut elements = Vec::with_capacity(raw.len());
    for element in raw {
        if !seen.insert(element.name.clone()) {
            return Err(ParseError::DuplicateElement(element.name));
        }
        elements.push(normalize(element)?);
    }
    Ok(elements)
}

/// Coerce every declared value of an element to its value type.
pub fn normalize(mut element: UiElementSpec) -> Result<UiElementSpec, ParseError> {
    let vt = element.value_type;
    let mismatch = |name: &str, field| ParseError::TypeMismatch {
        element: name.to_string(),
        field,
        expected: vt,
    };

    if let Some(v) = element.min_value.take() {
        element.min_value = Some(v.coerce(vt).ok_or_else(|| mismatch(&element.name, "min_value"))?);
    }
    if let Some(v) = element.max_value.take() {
        element.max_value = Some(v.coerce(vt).ok_or_else(|| mismatch(&element.name, "max_value"))?);
    }
    if let Some(v) = element.computed.take() {
        element.computed = Some(v.coerce(vt).ok_or_else(|| mismatch(&element.name, "computed"))?);
    }
    element.set = match element.set.take() {
        Some(CandidateSource::List(values)) => {
            let coerced = values
                .into_iter()
                .map(|v| v.coerce(vt))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| mismatch(&element.name, "set"))?;
            Some(CandidateSource::List(coerced))
        }
        other => other,
    };
    Ok(element)
}
