//! What the tracker knows, suspects, and has ruled out about a Pokemon

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Items that lock their holder into one move
pub const CHOICE_ITEMS: [&str; 3] = ["choiceband", "choicescarf", "choicespecs"];

/// A held item as far as the tracker can tell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Item {
    /// Never revealed
    #[default]
    Unknown,
    /// Known to hold nothing (consumed, knocked off, Unburden)
    Empty,
    /// Known item id
    Held(String),
}

impl Item {
    pub fn held(id: impl Into<String>) -> Self {
        Item::Held(id.into())
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Item::Held(id) => Some(id),
            _ => None,
        }
    }

    pub fn is(&self, id: &str) -> bool {
        self.id() == Some(id)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Item::Unknown)
    }

    pub fn is_choice(&self) -> bool {
        self.id().is_some_and(|id| CHOICE_ITEMS.contains(&id))
    }
}

/// Candidates ruled out by observed behaviour
///
/// Inference can only add to the set. An authoritative protocol reveal may
/// re-admit the revealed value through [`ExclusionSet::readmit`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSet(BTreeSet<String>);

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rule out a candidate; returns true if it was newly excluded
    pub fn exclude(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The protocol revealed `id`, so it can no longer be excluded
    pub(crate) fn readmit(&mut self, id: &str) {
        self.0.remove(id);
    }
}

impl<'a> FromIterator<&'a str> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

/// Closed interval of possible speed stats; `max == None` is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl Default for SpeedRange {
    fn default() -> Self {
        Self { min: 0, max: None }
    }
}

impl SpeedRange {
    pub fn contains(&self, speed: u32) -> bool {
        speed >= self.min && self.max.is_none_or(|max| speed <= max)
    }

    /// Raise the lower bound; a bound above the current max is refused
    pub fn raise_min(&mut self, min: u32) -> bool {
        if self.max.is_some_and(|max| min > max) {
            tracing::warn!(min, max = ?self.max, "refusing contradictory speed lower bound");
            return false;
        }
        if min > self.min {
            self.min = min;
            return true;
        }
        false
    }

    /// Lower the upper bound; a bound below the current min is refused
    pub fn lower_max(&mut self, max: u32) -> bool {
        if max < self.min {
            tracing::warn!(max, min = self.min, "refusing contradictory speed upper bound");
            return false;
        }
        if self.max.is_none_or(|current| max < current) {
            self.max = Some(max);
            return true;
        }
        false
    }
}
