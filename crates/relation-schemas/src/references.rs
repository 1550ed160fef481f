//! Child references in declared configuration
//!
//! A child entry is either a bare identifier or an identifier with an optional
//! attribute value. An omitted value and an explicit `null` both mean "unset";
//! `""` is an explicit empty value.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tag attached to a monitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum TagReference {
    /// Bare tag ID, no value
    Id(i64),

    /// Tag ID with an optional value
    WithValue(TagValue),
}

/// Object form of a tag entry
///
/// Unknown keys are rejected so that a misspelled `value` is not read as unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TagValue {
    pub tag_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TagReference {
    /// Object form entry
    pub fn with_value(tag_id: i64, value: Option<String>) -> Self {
        TagReference::WithValue(TagValue { tag_id, value })
    }

    pub fn tag_id(&self) -> i64 {
        match self {
            TagReference::Id(tag_id) => *tag_id,
            TagReference::WithValue(tag) => tag.tag_id,
        }
    }

    /// Declared value; `None` when unset
    pub fn value(&self) -> Option<&str> {
        match self {
            TagReference::Id(_) => None,
            TagReference::WithValue(tag) => tag.value.as_deref(),
        }
    }
}
