// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 7;

/// Source of opaque row identifiers.
pub trait IdGenerator: Send + Sync + 'static {
    fn next_id(&self) -> String;
}

/// Millisecond timestamp followed by a short base36 suffix, e.g. `1718000000000k3j9x2a`.
#[derive(Debug, Default)]
pub struct TimeSeededIdGenerator {
    counter: AtomicU64,
}

impl TimeSeededIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimeSeededIdGenerator {
    fn next_id(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let seed = format!("{}:{}:{}", now.as_nanos(), seq, std::process::id());
        format!("{}{}", now.as_millis(), base36_suffix(&seed))
    }
}

fn base36_suffix(seed: &str) -> String {
    Sha256::digest(seed.as_bytes())
        .iter()
        .take(SUFFIX_LEN)
        .map(|byte| BASE36[usize::from(*byte) % BASE36.len()] as char)
        .collect()
}

/// Deterministic ids (`<prefix>-1`, `<prefix>-2`, ...) for tests and fixtures.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            counter: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}
