use std::fmt;

use serde::{Deserialize, Serialize};

use super::span::Span;

/// Typed fields recognized inside a block definition.
///
/// Every field is optional: `None` means the pattern was not found (or not
/// evaluated by the strategy that produced the record), never an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fields {
    /// Block shape, e.g. `"basic_event"`.
    pub skeleton: Option<String>,

    /// Palette class, e.g. `"event"`.
    pub class: Option<String>,

    /// Event the block listens to, e.g. `"start"`.
    pub event: Option<String>,

    /// Trailing component of the color path
    /// (`EntryStatic.colorSet.block.default.START` becomes `"START"`).
    pub color: Option<String>,

    /// Whether a `func(...)` definition occurs anywhere in the block.
    pub has_func: Option<bool>,

    /// Literal value of a single-line `name: "value"` declaration.
    pub value: Option<String>,
}

impl Fields {
    /// Returns `true` if no field was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skeleton.is_none()
            && self.class.is_none()
            && self.event.is_none()
            && self.color.is_none()
            && self.has_func.is_none()
            && self.value.is_none()
    }
}

/// One named block definition extracted from source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Block identifier, unique within one catalog.
    pub name: String,

    /// Extracted fields.
    pub fields: Fields,

    /// Category label the record is filed under.
    pub category: String,

    /// Byte range of the record body in the source input.
    pub source_span: Span,
}

impl Record {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        fields: Fields,
        category: impl Into<String>,
        source_span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            fields,
            category: category.into(),
            source_span,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.name)?;
        if let Some(ref skeleton) = self.fields.skeleton {
            write!(f, " skeleton={skeleton}")?;
        }
        if let Some(has_func) = self.fields.has_func {
            write!(f, " func={has_func}")?;
        }
        if let Some(ref event) = self.fields.event {
            write!(f, " event={event}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fields_are_unset() {
        let fields = Fields::default();
        assert!(fields.is_empty());

        let fields = Fields {
            has_func: Some(false),
            ..Fields::default()
        };
        assert!(!fields.is_empty());
    }

    #[test]
    fn record_display() {
        let record = Record::new(
            "when_run_button_click",
            Fields {
                skeleton: Some("basic_event".into()),
                event: Some("start".into()),
                has_func: Some(true),
                ..Fields::default()
            },
            "start",
            Span::new(10, 90),
        );
        let display = record.to_string();
        assert!(display.starts_with("start/when_run_button_click"));
        assert!(display.contains("skeleton=basic_event"));
        assert!(display.contains("func=true"));
        assert!(display.contains("event=start"));
    }

    #[test]
    fn record_serialization_roundtrip() {
        let record = Record::new(
            "move_direction",
            Fields {
                skeleton: Some("basic".into()),
                color: Some("MOVING".into()),
                has_func: Some(true),
                ..Fields::default()
            },
            "moving",
            Span::new(0, 12),
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
