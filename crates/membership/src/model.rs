//! Membership Model
//!
//! Typed, comparable representation of the set of children related to one parent.

use crate::error::MembershipError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Identifier of a related entity.
///
/// Relations over numeric remote ids use `Int`; relations keyed by names or
/// slugs use `Str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChildId {
    Int(i64),
    Str(String),
}

impl ChildId {
    /// Returns the numeric id, if this is an integer id.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ChildId::Int(id) => Some(*id),
            ChildId::Str(_) => None,
        }
    }
}

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildId::Int(id) => write!(f, "{}", id),
            ChildId::Str(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for ChildId {
    fn from(id: i64) -> Self {
        ChildId::Int(id)
    }
}

impl From<&str> for ChildId {
    fn from(id: &str) -> Self {
        ChildId::Str(id.to_string())
    }
}

impl From<String> for ChildId {
    fn from(id: String) -> Self {
        ChildId::Str(id)
    }
}

/// Tri-state optional attribute value.
///
/// `Unset` and `Empty` are distinct: an operator who writes `value = ""` has
/// declared something different from one who left `value` out. The gateway
/// boundary maps these onto the wire (`null` / `""` / string).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum AttrValue {
    #[default]
    Unset,
    Empty,
    Value(String),
}

impl AttrValue {
    /// Whether this value is `Unset`.
    pub fn is_unset(&self) -> bool {
        matches!(self, AttrValue::Unset)
    }

    /// Borrow the value as a string, `Empty` yielding `""` and `Unset` yielding `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Unset => None,
            AttrValue::Empty => Some(""),
            AttrValue::Value(v) => Some(v),
        }
    }
}

impl From<Option<String>> for AttrValue {
    fn from(value: Option<String>) -> Self {
        match value {
            None => AttrValue::Unset,
            Some(v) if v.is_empty() => AttrValue::Empty,
            Some(v) => AttrValue::Value(v),
        }
    }
}

impl From<AttrValue> for Option<String> {
    fn from(value: AttrValue) -> Self {
        match value {
            AttrValue::Unset => None,
            AttrValue::Empty => Some(String::new()),
            AttrValue::Value(v) => Some(v),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::from(Some(value.to_string()))
    }
}

static UNSET: AttrValue = AttrValue::Unset;

/// Per-membership metadata, keyed by attribute name.
///
/// `Unset` values are never stored, so a map that only ever received unset
/// values compares equal to "no attributes".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, AttrValue>")]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    /// No attributes set.
    pub fn none() -> Self {
        Self::default()
    }

    /// Set an attribute; setting `Unset` removes it.
    pub fn set(&mut self, name: impl Into<String>, value: AttrValue) {
        let name = name.into();
        if value.is_unset() {
            self.0.remove(&name);
        } else {
            self.0.insert(name, value);
        }
    }

    /// Get an attribute, `Unset` when absent.
    pub fn get(&self, name: &str) -> &AttrValue {
        self.0.get(name).unwrap_or(&UNSET)
    }

    /// Whether no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over set attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        self.0.iter()
    }
}

impl From<BTreeMap<String, AttrValue>> for Attributes {
    fn from(map: BTreeMap<String, AttrValue>) -> Self {
        let mut attributes = Attributes::none();
        for (name, value) in map {
            attributes.set(name, value);
        }
        attributes
    }
}

/// One related entity reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub child_id: ChildId,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl Member {
    /// A member without attributes.
    pub fn new(child_id: impl Into<ChildId>) -> Self {
        Self {
            child_id: child_id.into(),
            attributes: Attributes::none(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.set(name, value.into());
        self
    }
}

/// The complete membership of one parent.
///
/// Child ids are unique. Whether sequence order is part of equality is decided
/// per resource type and carried on the set itself.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipSet {
    members: Vec<Member>,
    order_significant: bool,
}

impl MembershipSet {
    /// Build a set, rejecting duplicate child ids.
    pub fn new(members: Vec<Member>, order_significant: bool) -> Result<Self, MembershipError> {
        let mut seen = BTreeSet::new();
        for member in &members {
            if !seen.insert(&member.child_id) {
                return Err(MembershipError::DuplicateMember {
                    child_id: member.child_id.clone(),
                });
            }
        }
        Ok(Self {
            members,
            order_significant,
        })
    }

    /// A set with no members.
    pub fn empty(order_significant: bool) -> Self {
        Self {
            members: Vec::new(),
            order_significant,
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn into_members(self) -> Vec<Member> {
        self.members
    }

    pub fn order_significant(&self) -> bool {
        self.order_significant
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Child ids in set order.
    pub fn child_ids(&self) -> Vec<&ChildId> {
        self.members.iter().map(|m| &m.child_id).collect()
    }

    /// Look up a member by child id.
    pub fn get(&self, child_id: &ChildId) -> Option<&Member> {
        self.members.iter().find(|m| &m.child_id == child_id)
    }

    /// Set equality.
    ///
    /// Sequences are compared when both sides are order-significant; otherwise
    /// members are matched by child id and their attributes compared.
    pub fn equal(a: &MembershipSet, b: &MembershipSet) -> bool {
        if a.members.len() != b.members.len() {
            return false;
        }
        if a.order_significant && b.order_significant {
            return a.members == b.members;
        }
        let theirs: HashMap<&ChildId, &Attributes> = b
            .members
            .iter()
            .map(|m| (&m.child_id, &m.attributes))
            .collect();
        a.members
            .iter()
            .all(|m| theirs.get(&m.child_id) == Some(&&m.attributes))
    }

    /// Reorder this set to follow `prior`.
    ///
    /// Members already present in `prior` keep prior's relative order; members
    /// new to `prior` follow in their current order. Order-significant sets are
    /// returned unchanged, their order is the remote's answer.
    #[must_use]
    pub fn aligned_to(&self, prior: &MembershipSet) -> MembershipSet {
        if self.order_significant {
            return self.clone();
        }
        let rank: HashMap<&ChildId, usize> = prior
            .members
            .iter()
            .enumerate()
            .map(|(i, m)| (&m.child_id, i))
            .collect();
        let mut members = self.members.clone();
        members.sort_by_key(|m| rank.get(&m.child_id).copied().unwrap_or(usize::MAX));
        MembershipSet {
            members,
            order_significant: self.order_significant,
        }
    }
}

impl PartialEq for MembershipSet {
    fn eq(&self, other: &Self) -> bool {
        MembershipSet::equal(self, other)
    }
}

/// Semantic difference between a desired and an observed set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDiff {
    /// Desired members whose child id is not observed.
    pub to_add: Vec<Member>,
    /// Observed members whose child id is not desired.
    pub to_remove: Vec<Member>,
    /// Desired members observed with different attributes (desired version).
    pub to_update_attrs: Vec<Member>,
    /// Same members, different sequence, on an order-significant relation.
    pub reordered: bool,
}

impl MembershipDiff {
    /// Whether the observed set already satisfies the desired one.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty()
            && self.to_remove.is_empty()
            && self.to_update_attrs.is_empty()
            && !self.reordered
    }
}

impl fmt::Display for MembershipDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "+{} -{} ~{}",
            self.to_add.len(),
            self.to_remove.len(),
            self.to_update_attrs.len()
        )?;
        if self.reordered {
            write!(f, " (reordered)")?;
        }
        Ok(())
    }
}

/// Compute what separates `observed` from `desired`.
///
/// Pure: the only place where "did anything actually change" is decided.
/// Order only matters when `desired` is order-significant.
pub fn diff(desired: &MembershipSet, observed: &MembershipSet) -> MembershipDiff {
    let observed_by_id: HashMap<&ChildId, &Member> = observed
        .members
        .iter()
        .map(|m| (&m.child_id, m))
        .collect();
    let desired_ids: BTreeSet<&ChildId> = desired.members.iter().map(|m| &m.child_id).collect();

    let mut result = MembershipDiff::default();
    for member in &desired.members {
        match observed_by_id.get(&member.child_id) {
            None => result.to_add.push(member.clone()),
            Some(current) if current.attributes != member.attributes => {
                result.to_update_attrs.push(member.clone());
            }
            Some(_) => {}
        }
    }
    result.to_remove = observed
        .members
        .iter()
        .filter(|m| !desired_ids.contains(&m.child_id))
        .cloned()
        .collect();

    if desired.order_significant && result.is_empty() {
        result.reordered = desired.child_ids() != observed.child_ids();
    }
    result
}
