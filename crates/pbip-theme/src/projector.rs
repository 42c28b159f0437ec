//! Projection of a visual's object set into a theme fragment.
//!
//! A visual's `objects` map property groups to lists of items:
//!
//! ```text
//! {
//!   "background": [
//!     {"properties": {"color": {"expr": {"Literal": {"Value": "'#FFFFFF'"}}}}},
//!     {"selector": {"id": "foo"}, "properties": {...}}
//!   ]
//! }
//! ```
//!
//! [`ThemeProjector::project`] keeps the items that apply to the whole visual
//! (see [`SelectorScope`]), flattens each item's properties through the
//! [`ValueCoercer`], and collects the distinct results per group:
//!
//! ```text
//! {"visualStyles": {"card": {"*": {"background": [{"color": "#FFFFFF"}]}}}}
//! ```

use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::selector::SelectorScope;
use crate::value::ValueCoercer;

/// Top-level key of a theme document.
pub const VISUAL_STYLES_KEY: &str = "visualStyles";

/// Selector bucket holding visual-wide styles.
pub const VISUAL_WIDE_BUCKET: &str = "*";

/// One item's properties after coercion: property name to native value.
pub type PropertySet = Map<String, Value>;

/// The distinct property sets collected for one property group.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleGroup {
    name: String,
    entries: Vec<PropertySet>,
}

impl StyleGroup {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// The property group name (`background`, `title`, ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property sets in order of first appearance.
    pub fn entries(&self) -> &[PropertySet] {
        &self.entries
    }
}

/// Visual-wide styles for one visual type.
///
/// Serializes as `{<visualType>: {"*": {<group>: [<property set>, ...]}}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeFragment {
    visual_type: String,
    groups: Vec<StyleGroup>,
}

impl ThemeFragment {
    /// Create an empty fragment for a visual type.
    pub fn new(visual_type: impl Into<String>) -> Self {
        Self {
            visual_type: visual_type.into(),
            groups: Vec::new(),
        }
    }

    pub fn visual_type(&self) -> &str {
        &self.visual_type
    }

    /// Groups in order of first use.
    pub fn groups(&self) -> &[StyleGroup] {
        &self.groups
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<&StyleGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Returns `true` if no group has been populated.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Add a property set to a group, creating the group on first use.
    ///
    /// Returns `false` if an equal set is already in the group.
    pub fn insert(&mut self, group: &str, entry: PropertySet) -> bool {
        let index = match self.groups.iter().position(|g| g.name == group) {
            Some(index) => index,
            None => {
                self.groups.push(StyleGroup::new(group));
                self.groups.len() - 1
            }
        };

        let entries = &mut self.groups[index].entries;
        if entries.contains(&entry) {
            return false;
        }
        entries.push(entry);
        true
    }

    /// Wrap this fragment under the `visualStyles` key.
    pub fn into_document(self) -> ThemeDocument {
        ThemeDocument {
            visual_styles: self,
        }
    }
}

impl Serialize for ThemeFragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.visual_type, &Buckets(&self.groups))?;
        map.end()
    }
}

struct Buckets<'a>(&'a [StyleGroup]);

impl Serialize for Buckets<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(VISUAL_WIDE_BUCKET, &Groups(self.0))?;
        map.end()
    }
}

struct Groups<'a>(&'a [StyleGroup]);

impl Serialize for Groups<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for group in self.0 {
            map.serialize_entry(&group.name, &group.entries)?;
        }
        map.end()
    }
}

/// A theme fragment wrapped for output: `{"visualStyles": {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeDocument {
    pub visual_styles: ThemeFragment,
}

impl Serialize for ThemeDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(VISUAL_STYLES_KEY, &self.visual_styles)?;
        map.end()
    }
}

/// The two outputs produced for one visual.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// The input object set, unmodified.
    pub raw_objects: Map<String, Value>,
    /// The visual-wide styles, wrapped under `visualStyles`.
    pub theme: ThemeDocument,
}

/// Filters and flattens visual object sets into theme fragments.
#[derive(Debug, Clone, Default)]
pub struct ThemeProjector {
    coercer: ValueCoercer,
}

impl ThemeProjector {
    /// Create a projector that coerces property values with `coercer`.
    pub fn new(coercer: ValueCoercer) -> Self {
        Self { coercer }
    }

    /// Project one visual's object set.
    pub fn project(&self, visual_type: &str, objects: &Map<String, Value>) -> Projection {
        Projection {
            raw_objects: objects.clone(),
            theme: self.fragment(visual_type, objects).into_document(),
        }
    }

    /// Build the theme fragment for one visual's object set.
    pub fn fragment(&self, visual_type: &str, objects: &Map<String, Value>) -> ThemeFragment {
        let mut fragment = ThemeFragment::new(visual_type);

        for (group, items) in objects {
            let Some(items) = items.as_array() else {
                debug!("{visual_type}: group {group:?} is not a list, skipping");
                continue;
            };

            for item in items {
                let Some(item) = item.as_object() else {
                    debug!("{visual_type}: non-object item in {group:?}, skipping");
                    continue;
                };

                let scope = SelectorScope::of(item);
                if !scope.is_visual_wide() {
                    debug!("{visual_type}: dropping {group:?} item scoped to {scope:?}");
                    continue;
                }

                if !fragment.insert(group, self.flatten(item)) {
                    debug!("{visual_type}: duplicate {group:?} entry collapsed");
                }
            }
        }

        fragment
    }

    /// Coerce every value of an item's `properties`.
    fn flatten(&self, item: &Map<String, Value>) -> PropertySet {
        match item.get("properties") {
            Some(Value::Object(properties)) => properties
                .iter()
                .map(|(name, value)| (name.clone(), self.coercer.coerce(value)))
                .collect(),
            None | Some(Value::Null) => PropertySet::new(),
            Some(other) => {
                debug!("ignoring non-object properties: {other}");
                PropertySet::new()
            }
        }
    }
}

/// Project one visual's object set with the standard coercion rules.
pub fn project(visual_type: &str, objects: &Map<String, Value>) -> Projection {
    ThemeProjector::default().project(visual_type, objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn objects(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn set(value: Value) -> PropertySet {
        objects(value)
    }

    #[test]
    fn insert_creates_group_on_first_use() {
        let mut fragment = ThemeFragment::new("card");
        assert!(fragment.is_empty());
        assert!(fragment.insert("title", set(json!({"show": true}))));
        assert_eq!(fragment.groups().len(), 1);
        assert_eq!(fragment.group("title").unwrap().entries().len(), 1);
    }

    #[test]
    fn insert_rejects_equal_sets() {
        let mut fragment = ThemeFragment::new("card");
        assert!(fragment.insert("title", set(json!({"show": true, "fontSize": 12}))));
        assert!(!fragment.insert("title", set(json!({"fontSize": 12, "show": true}))));
        assert!(fragment.insert("title", set(json!({"show": false}))));
        assert_eq!(fragment.group("title").unwrap().entries().len(), 2);
    }

    #[test]
    fn dedup_is_scoped_to_group() {
        let mut fragment = ThemeFragment::new("card");
        assert!(fragment.insert("title", set(json!({"show": true}))));
        assert!(fragment.insert("legend", set(json!({"show": true}))));
        assert_eq!(fragment.groups().len(), 2);
    }

    #[test]
    fn fragment_serializes_under_visual_wide_bucket() {
        let mut fragment = ThemeFragment::new("card");
        fragment.insert("background", set(json!({"color": "#FFFFFF"})));
        assert_eq!(
            serde_json::to_value(&fragment).unwrap(),
            json!({"card": {"*": {"background": [{"color": "#FFFFFF"}]}}})
        );
    }

    #[test]
    fn empty_fragment_keeps_bucket() {
        let doc = ThemeFragment::new("slicer").into_document();
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"visualStyles": {"slicer": {"*": {}}}})
        );
    }

    #[test]
    fn document_is_keyed_by_visual_styles() {
        let doc = ThemeFragment::new("card").into_document();
        let value = serde_json::to_value(&doc).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, [VISUAL_STYLES_KEY]);
        assert_eq!(value[VISUAL_STYLES_KEY], json!({"card": {"*": {}}}));
    }

    #[test]
    fn project_keeps_raw_objects() {
        let input = objects(json!({
            "title": [
                {"properties": {"show": {"expr": {"Literal": {"Value": "true"}}}}},
                {"selector": {"id": "foo"}, "properties": {}}
            ]
        }));
        let projection = project("card", &input);
        assert_eq!(projection.raw_objects, input);
    }

    #[test]
    fn named_selectors_are_dropped() {
        let input = objects(json!({
            "dataPoint": [
                {"properties": {"fill": {"expr": {"Literal": {"Value": "'#000000'"}}}}},
                {"selector": {"id": "foo"}, "properties": {"fill": {"expr": {"Literal": {"Value": "'#FF0000'"}}}}},
                {"selector": {"id": "default"}, "properties": {"fill": {"expr": {"Literal": {"Value": "'#00FF00'"}}}}}
            ]
        }));
        let fragment = ThemeProjector::default().fragment("columnChart", &input);
        let entries = fragment.group("dataPoint").unwrap().entries();
        assert_eq!(
            entries,
            [set(json!({"fill": "#000000"})), set(json!({"fill": "#00FF00"}))]
        );
    }

    #[test]
    fn group_with_no_visual_wide_items_is_absent() {
        let input = objects(json!({
            "dataPoint": [{"selector": {"id": "foo"}, "properties": {}}]
        }));
        let fragment = ThemeProjector::default().fragment("columnChart", &input);
        assert!(fragment.group("dataPoint").is_none());
        assert!(fragment.is_empty());
    }

    #[test]
    fn missing_properties_flatten_to_empty_set() {
        let input = objects(json!({"general": [{}]}));
        let fragment = ThemeProjector::default().fragment("card", &input);
        assert_eq!(fragment.group("general").unwrap().entries(), [PropertySet::new()]);
    }

    #[test]
    fn malformed_groups_and_items_are_skipped() {
        let input = objects(json!({
            "title": "not a list",
            "legend": [42, {"properties": {"show": {"expr": {"Literal": {"Value": "false"}}}}}]
        }));
        let fragment = ThemeProjector::default().fragment("card", &input);
        assert!(fragment.group("title").is_none());
        assert_eq!(
            fragment.group("legend").unwrap().entries(),
            [set(json!({"show": false}))]
        );
    }

    #[test]
    fn groups_keep_input_order() {
        let input = objects(json!({
            "title": [{}],
            "background": [{}],
            "border": [{}]
        }));
        let fragment = ThemeProjector::default().fragment("card", &input);
        let names: Vec<&str> = fragment.groups().iter().map(StyleGroup::name).collect();
        assert_eq!(names, ["title", "background", "border"]);
    }

    #[test]
    fn projector_uses_its_coercer() {
        let input = objects(json!({
            "labels": [{"properties": {"fontSize": {"expr": {"Literal": {"Value": "9D"}}}}}]
        }));
        let fragment = ThemeProjector::new(ValueCoercer::empty()).fragment("card", &input);
        assert_eq!(
            fragment.group("labels").unwrap().entries(),
            [set(json!({"fontSize": "9D"}))]
        );
    }
}
