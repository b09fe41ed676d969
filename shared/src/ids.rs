use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::CaseId;

/// Hands out case ids. Every id returned by one generator is distinct.
pub trait IdGenerator: Send + Sync {
    fn next_id(&mut self) -> CaseId;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdScheme {
    #[default]
    Timestamp,
    Uuid,
}

impl IdScheme {
    #[must_use]
    pub fn generator(self) -> Box<dyn IdGenerator> {
        match self {
            Self::Timestamp => Box::new(TimestampIds::default()),
            Self::Uuid => Box::new(UuidIds),
        }
    }
}

/// Millisecond timestamps, bumped forward when two submissions land in the
/// same millisecond (or the clock steps back).
#[derive(Debug, Default, Clone)]
pub struct TimestampIds {
    last_ms: i64,
}

impl TimestampIds {
    fn next_from(&mut self, now_ms: i64) -> CaseId {
        let id = now_ms.max(self.last_ms.saturating_add(1));
        self.last_ms = id;
        CaseId::new(id.to_string())
    }
}

impl IdGenerator for TimestampIds {
    fn next_id(&mut self) -> CaseId {
        self.next_from(chrono::Utc::now().timestamp_millis())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> CaseId {
        CaseId::new(Uuid::new_v4().to_string())
    }
}

/// Deterministic `1, 2, 3, ...` ids.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    #[must_use]
    pub const fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> CaseId {
        let id = self.next;
        self.next += 1;
        CaseId::new(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_timestamp_ids_same_millisecond_are_distinct() {
        let mut ids = TimestampIds::default();
        let a = ids.next_from(1_700_000_000_000);
        let b = ids.next_from(1_700_000_000_000);
        let c = ids.next_from(1_700_000_000_000);
        assert_eq!(a.as_str(), "1700000000000");
        assert_eq!(b.as_str(), "1700000000001");
        assert_eq!(c.as_str(), "1700000000002");
    }

    #[test]
    fn test_timestamp_ids_survive_clock_going_back() {
        let mut ids = TimestampIds::default();
        let a = ids.next_from(2_000);
        let b = ids.next_from(1_000);
        assert_ne!(a, b);
        assert_eq!(b.as_str(), "2001");
    }

    #[test]
    fn test_rapid_timestamp_ids_unique() {
        let mut ids = TimestampIds::default();
        let seen: HashSet<_> = (0..1_000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 1_000);
    }

    #[test]
    fn test_uuid_ids_unique() {
        let mut ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::default();
        assert_eq!(ids.next_id().as_str(), "1");
        assert_eq!(ids.next_id().as_str(), "2");
        let mut ids = SequentialIds::starting_at(40);
        assert_eq!(ids.next_id().as_str(), "40");
    }

    #[test]
    fn test_scheme_deserializes_snake_case() {
        let scheme: IdScheme = serde_json::from_str("\"uuid\"").unwrap();
        assert_eq!(scheme, IdScheme::Uuid);
    }
}
