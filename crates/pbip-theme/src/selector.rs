//! Selector classification for property items.
//!
//! Each item in a visual's object set may carry a `selector` that scopes its
//! properties (to a data point, a series, a metadata column). Only items that
//! apply to the whole visual belong in a theme:
//!
//! | `selector`                     | Scope                     |
//! |--------------------------------|---------------------------|
//! | absent or `null`               | [`SelectorScope::Unset`]  |
//! | object without `id` (or `null`)| [`SelectorScope::Unset`]  |
//! | `{"id": "default"}`            | [`SelectorScope::Default`]|
//! | `{"id": "<other>"}`            | [`SelectorScope::Named`]  |
//! | anything else                  | [`SelectorScope::Unrecognized`] |

use serde_json::{Map, Value};

/// Selector id marking the visual-wide default rule.
pub const DEFAULT_SELECTOR_ID: &str = "default";

/// How a property item is scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorScope<'a> {
    /// No selector, or a selector with no id.
    Unset,
    /// The literal `"default"` selector id.
    Default,
    /// Any other selector id.
    Named(&'a str),
    /// A selector that is not an object, or whose id is not a string.
    Unrecognized,
}

impl<'a> SelectorScope<'a> {
    /// Classify the selector of one property item.
    pub fn of(item: &'a Map<String, Value>) -> Self {
        let selector = match item.get("selector") {
            None | Some(Value::Null) => return SelectorScope::Unset,
            Some(Value::Object(selector)) => selector,
            Some(_) => return SelectorScope::Unrecognized,
        };

        match selector.get("id") {
            None | Some(Value::Null) => SelectorScope::Unset,
            Some(Value::String(id)) if id == DEFAULT_SELECTOR_ID => SelectorScope::Default,
            Some(Value::String(id)) => SelectorScope::Named(id),
            Some(_) => SelectorScope::Unrecognized,
        }
    }

    /// Returns `true` if the item applies to the whole visual and belongs in a theme.
    pub fn is_visual_wide(&self) -> bool {
        matches!(self, SelectorScope::Unset | SelectorScope::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_scope(item: Value, expected: SelectorScope<'_>) {
        assert_eq!(SelectorScope::of(item.as_object().unwrap()), expected);
    }

    #[test]
    fn missing_selector_is_unset() {
        assert_scope(json!({"properties": {}}), SelectorScope::Unset);
        assert_scope(json!({"selector": null}), SelectorScope::Unset);
    }

    #[test]
    fn selector_without_id_is_unset() {
        assert_scope(
            json!({"selector": {"metadata": "Sales.Amount"}}),
            SelectorScope::Unset,
        );
        assert_scope(json!({"selector": {"id": null}}), SelectorScope::Unset);
    }

    #[test]
    fn default_id_is_default() {
        assert_scope(json!({"selector": {"id": "default"}}), SelectorScope::Default);
    }

    #[test]
    fn default_match_is_case_sensitive() {
        assert_scope(
            json!({"selector": {"id": "Default"}}),
            SelectorScope::Named("Default"),
        );
    }

    #[test]
    fn other_ids_are_named() {
        assert_scope(json!({"selector": {"id": "foo"}}), SelectorScope::Named("foo"));
    }

    #[test]
    fn malformed_selectors_are_unrecognized() {
        assert_scope(json!({"selector": "default"}), SelectorScope::Unrecognized);
        assert_scope(json!({"selector": {"id": 3}}), SelectorScope::Unrecognized);
    }

    #[test]
    fn only_unset_and_default_are_visual_wide() {
        assert!(SelectorScope::Unset.is_visual_wide());
        assert!(SelectorScope::Default.is_visual_wide());
        assert!(!SelectorScope::Named("foo").is_visual_wide());
        assert!(!SelectorScope::Unrecognized.is_visual_wide());
    }
}
