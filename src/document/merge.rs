//! Shallow (top-level, last-write-wins) merge of documents

use super::Document;

/// Merge `overlay` into `base` in place.
///
/// Every top-level field of `overlay` replaces the field of the same name in
/// `base`; fields only present in `base` are kept. Nested objects are replaced
/// wholesale, never merged recursively.
pub fn shallow_merge(base: &mut Document, overlay: Document) {
    for (field, value) in overlay {
        base.insert(field, value);
    }
}

/// Owned variant of [`shallow_merge`]
pub fn shallow_merged(mut base: Document, overlay: Document) -> Document {
    shallow_merge(&mut base, overlay);
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("fixture is not an object: {other}"),
        }
    }

    #[test]
    fn overlay_fields_win_and_untouched_fields_survive() {
        let merged = shallow_merged(doc(json!({"x": 1, "z": 3})), doc(json!({"x": 9})));
        assert_eq!(serde_json::Value::Object(merged), json!({"x": 9, "z": 3}));
    }

    #[test]
    fn nested_objects_are_replaced_not_merged() {
        let merged = shallow_merged(
            doc(json!({"quiz": {"a": {"x": 1}}, "title": "intro"})),
            doc(json!({"quiz": {"b": {"y": 2}}})),
        );
        assert_eq!(
            serde_json::Value::Object(merged),
            json!({"quiz": {"b": {"y": 2}}, "title": "intro"})
        );
    }

    #[test]
    fn explicit_null_overwrites() {
        let merged = shallow_merged(doc(json!({"completedAt": "2025-01-01"})), doc(json!({"completedAt": null})));
        assert_eq!(merged.get("completedAt"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn merging_into_empty_base_copies_overlay() {
        let mut base = Document::new();
        shallow_merge(&mut base, doc(json!({"id": "q1"})));
        assert_eq!(base.len(), 1);
    }
}
