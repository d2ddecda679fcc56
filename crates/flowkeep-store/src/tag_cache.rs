// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use flowkeep_model::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Projects,
    AdminPasscode,
}

impl CacheTag {
    pub const ALL: [Self; 2] = [Self::Projects, Self::AdminPasscode];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::AdminPasscode => "admin_passcode",
        }
    }
}

#[derive(Debug, Clone)]
pub enum CachedValue {
    Projects(Arc<Vec<Project>>),
    AdminPasscode(String),
}

#[derive(Debug)]
struct Entry {
    value: CachedValue,
    stored_at: Instant,
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<CacheTag, Entry>,
    generations: HashMap<CacheTag, u64>,
}

impl State {
    fn bump(&mut self, tag: CacheTag) {
        self.entries.remove(&tag);
        *self.generations.entry(tag).or_default() += 1;
    }
}

/// Whole-listing cache keyed by tag. Mutations invalidate by tag, never by row.
///
/// Each tag carries a generation that every invalidation bumps. A reader takes
/// the generation before hitting the backend and stores its result with
/// [`TagCache::put_if_current`], so a listing read across a write is dropped
/// instead of cached.
#[derive(Debug, Default)]
pub struct TagCache {
    state: Mutex<State>,
    ttl: Option<Duration>,
}

impl TagCache {
    /// `None` keeps entries until invalidated; a zero TTL never serves them.
    #[must_use]
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            ttl,
        }
    }

    #[must_use]
    pub fn get(&self, tag: CacheTag) -> Option<CachedValue> {
        let mut state = self.state.lock().ok()?;
        let expired = match (state.entries.get(&tag), self.ttl) {
            (None, _) => return None,
            (Some(entry), Some(ttl)) => entry.stored_at.elapsed() >= ttl,
            (Some(_), None) => false,
        };
        if expired {
            state.entries.remove(&tag);
            return None;
        }
        state.entries.get(&tag).map(|entry| entry.value.clone())
    }

    /// Current generation of `tag`; pass it back to [`TagCache::put_if_current`].
    #[must_use]
    pub fn generation(&self, tag: CacheTag) -> u64 {
        self.state
            .lock()
            .map(|state| state.generations.get(&tag).copied().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Stores `value` only if `tag` has not been invalidated since `generation`
    /// was taken. Returns whether the value was stored.
    pub fn put_if_current(&self, tag: CacheTag, generation: u64, value: CachedValue) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        if state.generations.get(&tag).copied().unwrap_or_default() != generation {
            return false;
        }
        state.entries.insert(
            tag,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
        true
    }

    pub fn invalidate(&self, tag: CacheTag) {
        if let Ok(mut state) = self.state.lock() {
            state.bump(tag);
        }
    }

    pub fn invalidate_all(&self) {
        if let Ok(mut state) = self.state.lock() {
            for tag in CacheTag::ALL {
                state.bump(tag);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidate_drops_only_the_named_tag() {
        let cache = TagCache::new(None);
        cache.put_if_current(
            CacheTag::AdminPasscode,
            0,
            CachedValue::AdminPasscode("123456".to_string()),
        );
        cache.put_if_current(CacheTag::Projects, 0, CachedValue::Projects(Arc::new(Vec::new())));
        cache.invalidate(CacheTag::Projects);
        assert!(cache.get(CacheTag::Projects).is_none());
        assert!(matches!(
            cache.get(CacheTag::AdminPasscode),
            Some(CachedValue::AdminPasscode(p)) if p == "123456"
        ));
        cache.invalidate_all();
        assert!(cache.get(CacheTag::AdminPasscode).is_none());
    }

    #[test]
    fn zero_ttl_never_serves_entries() {
        let cache = TagCache::new(Some(Duration::ZERO));
        assert!(cache.put_if_current(
            CacheTag::Projects,
            0,
            CachedValue::Projects(Arc::new(Vec::new()))
        ));
        assert!(cache.get(CacheTag::Projects).is_none());
    }

    #[test]
    fn values_read_before_an_invalidation_are_not_stored() {
        let cache = TagCache::new(None);
        let before = cache.generation(CacheTag::Projects);
        cache.invalidate(CacheTag::Projects);
        assert!(!cache.put_if_current(
            CacheTag::Projects,
            before,
            CachedValue::Projects(Arc::new(Vec::new()))
        ));
        assert!(cache.get(CacheTag::Projects).is_none());

        let after = cache.generation(CacheTag::Projects);
        assert_eq!(after, before + 1);
        assert!(cache.put_if_current(
            CacheTag::Projects,
            after,
            CachedValue::Projects(Arc::new(Vec::new()))
        ));
        assert!(cache.get(CacheTag::Projects).is_some());
    }

    #[test]
    fn invalidate_all_bumps_tags_never_stored() {
        let cache = TagCache::new(None);
        let admin = cache.generation(CacheTag::AdminPasscode);
        cache.invalidate_all();
        assert!(!cache.put_if_current(
            CacheTag::AdminPasscode,
            admin,
            CachedValue::AdminPasscode("x".to_string())
        ));
    }
}
