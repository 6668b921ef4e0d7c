use regex::Regex;

use crate::error::Result;
use crate::types::Fields;

/// Pulls the recognized fields out of a block body.
///
/// Each field is searched independently over the whole body, so the order
/// of declarations does not matter and nested sub-objects are searched too.
/// For string fields the first match wins.
pub struct FieldExtractor {
    re_skeleton: Regex,
    re_class: Regex,
    re_event: Regex,
    re_color: Regex,
    re_func: Regex,
}

impl FieldExtractor {
    /// Constructs a new `FieldExtractor` with pre-compiled regex patterns.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::RegexError` if any pattern fails to compile
    /// (should never happen with the static patterns defined here).
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_skeleton: quoted_field("skeleton")?,
            re_class: quoted_field("class")?,
            re_event: quoted_field("event")?,
            re_color: Regex::new(
                r"\bcolor\s*:\s*[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*\.([A-Za-z_$][\w$]*)",
            )?,
            // `func(...)`, `func: function (...)`, `func: async (...) =>`
            re_func: Regex::new(
                r"\bfunc\s*(?::\s*(?:async\s+)?(?:function\b\s*)?)?\([^)]*\)",
            )?,
        })
    }

    /// Extracts all recognized fields from `body`.
    ///
    /// `has_func` is always evaluated; the other fields stay `None` when
    /// their pattern is absent.
    pub fn extract(&self, body: &str) -> Fields {
        Fields {
            skeleton: first_capture(&self.re_skeleton, body),
            class: first_capture(&self.re_class, body),
            event: first_capture(&self.re_event, body),
            color: first_capture(&self.re_color, body),
            has_func: Some(self.re_func.is_match(body)),
            value: None,
        }
    }
}

fn quoted_field(key: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(r#"\b{key}\s*:\s*['"]([^'"]+)['"]"#))?)
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHEN_RUN: &str = r#"
        color: EntryStatic.colorSet.block.default.START,
        outerLine: EntryStatic.colorSet.block.darken.START,
        skeleton: 'basic_event',
        statements: [],
        params: [
            {
                type: 'Indicator',
                img: 'block_icon/start_icon_play.svg',
                size: 14,
                position: { x: 0, y: -2 },
            },
        ],
        event: 'start',
        class: 'event',
        isNotFor: [],
        func(sprite, script) {
            return script.callReturn();
        },
    "#;

    fn extractor() -> FieldExtractor {
        FieldExtractor::new().unwrap()
    }

    #[test]
    fn entry_block_body() {
        let fields = extractor().extract(WHEN_RUN);

        assert_eq!(fields.skeleton.as_deref(), Some("basic_event"));
        assert_eq!(fields.event.as_deref(), Some("start"));
        assert_eq!(fields.class.as_deref(), Some("event"));
        assert_eq!(fields.color.as_deref(), Some("START"));
        assert_eq!(fields.has_func, Some(true));
        assert_eq!(fields.value, None);
    }

    #[test]
    fn missing_fields_stay_unset() {
        let fields = extractor().extract("template: '%1', params: []");

        assert_eq!(fields.skeleton, None);
        assert_eq!(fields.class, None);
        assert_eq!(fields.event, None);
        assert_eq!(fields.color, None);
        assert_eq!(fields.has_func, Some(false));
    }

    #[test]
    fn field_order_does_not_matter() {
        let a = "skeleton: \"basic\", class: 'moving', color: A.b.C, func(s) {}";
        let b = "func(s) {}, color: A.b.C, class: 'moving', skeleton: \"basic\"";
        assert_eq!(extractor().extract(a), extractor().extract(b));
    }

    #[test]
    fn first_string_match_wins() {
        let fields = extractor().extract("event: 'first', sub: { event: 'second' }");
        assert_eq!(fields.event.as_deref(), Some("first"));
    }

    #[test]
    fn func_detected_in_nested_object() {
        let body = "skeleton: 'basic', paramsKeyMap: { VALUE: 0 }, helper: { func: function (sprite) { return 1; } }";
        assert_eq!(extractor().extract(body).has_func, Some(true));
    }

    #[test]
    fn func_variants() {
        let p = extractor();
        for body in [
            "func(sprite, script) {}",
            "func (sprite) {}",
            "func: function(sprite, script) {}",
            "func: async function (sprite) {}",
            "func: (sprite, script) => {}",
        ] {
            assert_eq!(p.extract(body).has_func, Some(true), "failed for body: {body}");
        }

        for body in ["funcName: 'x'", "myfunc(sprite)", "func: null", "function(sprite) {}"] {
            assert_eq!(p.extract(body).has_func, Some(false), "false positive for body: {body}");
        }
    }

    #[test]
    fn color_takes_trailing_component_only() {
        let p = extractor();
        assert_eq!(
            p.extract("color: EntryStatic.colorSet.block.default.MOVING").color.as_deref(),
            Some("MOVING")
        );
        assert_eq!(p.extract("color: '#FF9B00'").color, None);
        assert_eq!(p.extract("color: plain").color, None);
    }

    #[test]
    fn prefixed_keys_do_not_match() {
        let fields = extractor().extract("subclass: 'x', fontColor: A.B, innerSkeleton: 'y'");
        assert_eq!(fields.class, None);
        assert_eq!(fields.color, None);
        assert_eq!(fields.skeleton, None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn declarations() -> Vec<&'static str> {
        vec![
            "skeleton: 'basic_string_field'",
            "class: \"text\"",
            "event: 'when_some_key_pressed'",
            "color: EntryStatic.colorSet.block.default.TEXT",
            "func(sprite, script) { return script; }",
            "params: [{ type: 'Block' }]",
        ]
    }

    proptest! {
        #[test]
        fn permutations_yield_identical_fields(order in Just(declarations()).prop_shuffle()) {
            let p = FieldExtractor::new().unwrap();
            let canonical = p.extract(&declarations().join(",\n"));
            let shuffled = p.extract(&order.join(",\n"));
            prop_assert_eq!(canonical, shuffled);
        }
    }
}
