//! Tags attached to a monitor

use crate::RelationSpec;
use crate::references::TagReference;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// MonitorTagsSpec declares the tags of a monitor and their optional values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MonitorTagsSpec {
    /// Monitor ID (immutable; changing it replaces the resource)
    pub monitor_id: i64,

    /// Tags, each a bare tag ID or a tag ID with a value
    pub tags: Vec<TagReference>,
}

impl RelationSpec for MonitorTagsSpec {
    const RESOURCE_TYPE: &'static str = "kuma_monitor_tags";

    fn parent_id(&self) -> i64 {
        self.monitor_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_tag_entries_deserialize() {
        let spec: MonitorTagsSpec = serde_json::from_str(
            r#"{"monitor_id": 4, "tags": [1, {"tag_id": 2}, {"tag_id": 3, "value": null}, {"tag_id": 5, "value": ""}, {"tag_id": 6, "value": "eu"}]}"#,
        )
        .unwrap();

        assert_eq!(
            spec.tags,
            vec![
                TagReference::Id(1),
                TagReference::with_value(2, None),
                TagReference::with_value(3, None),
                TagReference::with_value(5, Some(String::new())),
                TagReference::with_value(6, Some("eu".to_string())),
            ]
        );
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<MonitorTagsSpec, _> =
            serde_json::from_str(r#"{"monitor_id": 4, "tags": [], "tag": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_misspelled_tag_key_rejected() {
        let result: Result<MonitorTagsSpec, _> = serde_json::from_str(
            r#"{"monitor_id": 4, "tags": [1, {"tag_id": 2, "valu": "eu"}]}"#,
        );
        assert!(result.is_err());
    }
}
