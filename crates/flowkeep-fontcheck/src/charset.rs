// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

/// Characters assumed renderable when the supported list cannot be read.
pub const FALLBACK_SUPPORTED_CHARS: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A set of Unicode scalar values read from a flat list of raw glyphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharSet {
    chars: HashSet<char>,
}

impl CharSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every non-whitespace character of `text`; line breaks and duplicates are ignored.
    #[must_use]
    pub fn from_flat_text(text: &str) -> Self {
        Self {
            chars: text.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    #[must_use]
    pub fn fallback() -> Self {
        Self::from_flat_text(FALLBACK_SUPPORTED_CHARS)
    }

    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// Returns `false` for whitespace or already present characters.
    pub fn insert(&mut self, c: char) -> bool {
        !c.is_whitespace() && self.chars.insert(c)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    #[must_use]
    pub fn sorted(&self) -> Vec<char> {
        let mut out: Vec<char> = self.chars.iter().copied().collect();
        out.sort_unstable();
        out
    }
}

impl FromIterator<char> for CharSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut set = Self::new();
        for c in iter {
            set.insert(c);
        }
        set
    }
}

/// Unique non-whitespace code points of `text` in first-seen order.
#[must_use]
pub fn unique_units(text: &str) -> Vec<char> {
    let mut seen = HashSet::new();
    text.chars()
        .filter(|c| !c.is_whitespace() && seen.insert(*c))
        .collect()
}
