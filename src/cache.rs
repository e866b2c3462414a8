//! Insight cache
//!
//! Composed payloads keyed by request and stamped with the store revision
//! they were derived from. An entry whose revision differs from the user's
//! current revision is never served. The cache is bounded; once full the
//! least recently used entry is evicted.

use std::num::NonZeroUsize;

use chrono::NaiveDate;
use lru::LruCache;
use tokio::sync::RwLock;

use crate::insight::{InsightContext, InsightRequest};
use crate::models::InsightPayload;
use crate::phrases::Language;

/// Fallback capacity when a zero capacity is requested
const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
  Some(n) => n,
  None => unreachable!(),
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
  user_id: String,
  context: InsightContext,
  as_of: NaiveDate,
  window_days: i64,
  language: Language,
}

impl CacheKey {
  fn new(user_id: &str, request: &InsightRequest, window_days: i64) -> Self {
    Self {
      user_id: user_id.to_string(),
      context: request.context.clone(),
      as_of: request.as_of,
      window_days,
      language: request.language,
    }
  }
}

#[derive(Debug, Clone)]
struct CacheEntry {
  revision: i64,
  payload: InsightPayload,
}

#[derive(Debug)]
pub struct InsightCache {
  /// Baseline window the cached payloads were composed with
  window_days: i64,
  entries: RwLock<LruCache<CacheKey, CacheEntry>>,
}

impl InsightCache {
  pub fn new(window_days: i64, max_entries: usize) -> Self {
    let capacity = NonZeroUsize::new(max_entries).unwrap_or(DEFAULT_CACHE_CAPACITY);
    Self {
      window_days,
      entries: RwLock::new(LruCache::new(capacity)),
    }
  }

  /// Cached payload, only if it was derived at `revision`
  pub async fn get(&self, user_id: &str, request: &InsightRequest, revision: i64) -> Option<InsightPayload> {
    // LruCache::get promotes the entry, so it needs the write lock
    let mut entries = self.entries.write().await;
    match entries.get(&CacheKey::new(user_id, request, self.window_days)) {
      Some(entry) if entry.revision == revision => {
        tracing::debug!(user_id, revision, "insight cache hit");
        Some(entry.payload.clone())
      }
      Some(entry) => {
        tracing::debug!(user_id, cached = entry.revision, current = revision, "insight cache entry stale");
        None
      }
      None => {
        tracing::debug!(user_id, revision, "insight cache miss");
        None
      }
    }
  }

  pub async fn put(&self, user_id: &str, request: &InsightRequest, revision: i64, payload: InsightPayload) {
    let key = CacheKey::new(user_id, request, self.window_days);
    let evicted = self
      .entries
      .write()
      .await
      .push(key.clone(), CacheEntry { revision, payload });
    // push hands back the replaced entry too; only a different key is an eviction
    if let Some((old, _)) = evicted.filter(|(old, _)| *old != key) {
      tracing::debug!(user_id = %old.user_id, as_of = %old.as_of, "insight cache evicted least recently used entry");
    }
  }

  /// Drop every entry for a user that was not derived at `revision`
  pub async fn invalidate_user(&self, user_id: &str, revision: i64) -> usize {
    let mut entries = self.entries.write().await;
    let stale: Vec<CacheKey> = entries
      .iter()
      .filter(|(key, entry)| key.user_id == user_id && entry.revision != revision)
      .map(|(key, _)| key.clone())
      .collect();
    let dropped = stale.len();
    for key in &stale {
      entries.pop(key);
    }
    if dropped > 0 {
      tracing::debug!(user_id, revision, dropped, "insight cache invalidated");
    }
    dropped
  }

  pub async fn len(&self) -> usize {
    self.entries.read().await.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::payload::{DigestMetrics, WeeklyDigest};
  use crate::test_utils::*;

  fn digest_payload(summary: &str) -> InsightPayload {
    let d = date(2024, 6, 30);
    InsightPayload::WeeklyDigest(WeeklyDigest {
      digest_id: format!("{}:{}", TEST_USER, d),
      period_start: d,
      period_end: d,
      coach_summary: summary.to_string(),
      signals: vec![],
      metrics: DigestMetrics {
        total_sessions: 0,
        total_distance_km: 0.0,
        total_duration_min: 0.0,
      },
      recommendations: vec![],
      insight: None,
    })
  }

  fn digest_request() -> InsightRequest {
    InsightRequest {
      context: InsightContext::WeeklyDigest,
      as_of: date(2024, 6, 30),
      language: Language::En,
    }
  }

  #[tokio::test]
  async fn test_stale_revision_is_not_served() {
    let cache = InsightCache::new(14, 100);
    let request = digest_request();
    cache.put(TEST_USER, &request, 3, digest_payload("week")).await;

    assert!(cache.get(TEST_USER, &request, 3).await.is_some());
    assert!(cache.get(TEST_USER, &request, 4).await.is_none());
    assert!(cache.get("someone-else", &request, 3).await.is_none());
  }

  #[tokio::test]
  async fn test_language_is_part_of_the_key() {
    let cache = InsightCache::new(14, 100);
    let request = digest_request();
    cache.put(TEST_USER, &request, 1, digest_payload("week")).await;

    let german = InsightRequest {
      language: Language::De,
      ..digest_request()
    };
    assert!(cache.get(TEST_USER, &german, 1).await.is_none());
  }

  #[tokio::test]
  async fn test_invalidate_user_keeps_other_users() {
    let cache = InsightCache::new(14, 100);
    let request = digest_request();
    cache.put(TEST_USER, &request, 1, digest_payload("a")).await;
    cache.put("user-2", &request, 1, digest_payload("b")).await;

    assert_eq!(cache.invalidate_user(TEST_USER, 2).await, 1);
    assert_eq!(cache.len().await, 1);
    assert!(cache.get("user-2", &request, 1).await.is_some());
  }

  #[tokio::test]
  async fn test_capacity_evicts_least_recently_used() {
    // Arrange
    let cache = InsightCache::new(14, 3);
    let request_for = |day: u32| InsightRequest {
      as_of: date(2024, 6, day),
      ..digest_request()
    };

    // Act
    for day in 1..=5 {
      cache.put(TEST_USER, &request_for(day), 1, digest_payload("week")).await;
    }

    // Assert
    assert_eq!(cache.len().await, 3);
    assert!(cache.get(TEST_USER, &request_for(1), 1).await.is_none());
    assert!(cache.get(TEST_USER, &request_for(2), 1).await.is_none());
    assert!(cache.get(TEST_USER, &request_for(5), 1).await.is_some());
  }

  #[tokio::test]
  async fn test_read_keeps_entry_from_eviction() {
    let cache = InsightCache::new(14, 2);
    let request_for = |day: u32| InsightRequest {
      as_of: date(2024, 6, day),
      ..digest_request()
    };
    cache.put(TEST_USER, &request_for(1), 1, digest_payload("a")).await;
    cache.put(TEST_USER, &request_for(2), 1, digest_payload("b")).await;

    assert!(cache.get(TEST_USER, &request_for(1), 1).await.is_some());
    cache.put(TEST_USER, &request_for(3), 1, digest_payload("c")).await;

    assert!(cache.get(TEST_USER, &request_for(1), 1).await.is_some());
    assert!(cache.get(TEST_USER, &request_for(2), 1).await.is_none());
  }

  #[test]
  fn test_zero_capacity_falls_back_to_default() {
    let cache = InsightCache::new(14, 0);
    assert_eq!(cache.entries.try_read().unwrap().cap(), DEFAULT_CACHE_CAPACITY);
  }
}
