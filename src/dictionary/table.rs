//! Dictionary implementation
//!
//! HashMap lookup for string → id, Vec for id → string.

use std::collections::HashMap;

use crate::error::{Result, TsbError};

/// Interning table: strings to dense ids in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    /// id → string (position is the id)
    strings: Vec<String>,

    /// string → id
    ids: HashMap<String, u32>,
}

impl Dictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a dictionary from an ordered string list (ids = positions)
    ///
    /// A string listed twice keeps the id of its first occurrence; the later
    /// slot still occupies its position so that every id in the list stays
    /// addressable through `string_at`.
    pub fn from_strings(strings: Vec<String>) -> Self {
        let mut ids = HashMap::with_capacity(strings.len());
        for (id, s) in strings.iter().enumerate() {
            ids.entry(s.clone()).or_insert(id as u32);
        }
        Self { strings, ids }
    }

    /// Intern a string, returning its id
    ///
    /// Returns the existing id if the string was seen before, otherwise
    /// appends it with id `len()`.
    pub fn intern(&mut self, value: &str) -> u32 {
        if let Some(&id) = self.ids.get(value) {
            return id;
        }

        let id = self.strings.len() as u32;
        self.strings.push(value.to_string());
        self.ids.insert(value.to_string(), id);
        id
    }

    /// Look up the id of a string that must already be interned
    pub fn id_of(&self, value: &str) -> Result<u32> {
        self.ids
            .get(value)
            .copied()
            .ok_or_else(|| TsbError::UnknownString(value.to_string()))
    }

    /// Resolve an id back to its string
    pub fn string_at(&self, id: u32) -> Result<&str> {
        self.strings
            .get(id as usize)
            .map(|s| s.as_str())
            .ok_or(TsbError::IdOutOfRange {
                id,
                len: self.strings.len(),
            })
    }

    /// Check whether a string has been interned
    pub fn contains(&self, value: &str) -> bool {
        self.ids.contains_key(value)
    }

    /// Number of interned strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Strings in id order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(|s| s.as_str())
    }

    /// Ordered string list, as written to the header
    pub fn strings(&self) -> &[String] {
        &self.strings
    }
}
