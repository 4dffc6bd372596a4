use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use mealdeck_shared::mealplan::{PlanDetail, PlanSummary};
use parking_lot::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

/// Summaries change rarely but are read on every navigation.
pub const SUMMARY_TTL: Duration = Duration::from_secs(30);
/// Full plan details only change on an explicit mutation.
pub const DETAIL_TTL: Duration = Duration::from_secs(300);

struct CacheEntry<T> {
    value: T,
    inserted_at: Instant,
}

/// Map of timestamped entries judged against a fixed TTL on read.
///
/// Expiry is lazy: there is no background sweeper, an entry past its TTL
/// simply stops being returned. Entries are replaced wholesale on `put`
/// and removed on `invalidate`, never patched in place.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns the cached value only while it is younger than the TTL.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let entry = self.entries.get(key)?;
        if entry.inserted_at.elapsed() < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Overwrites any existing entry with a freshly timestamped one.
    pub fn put(&mut self, key: K, value: V) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn invalidate<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Two-tier cache over one user's plans: a short-lived listing of
/// summaries per owner and a longer-lived map of full details per plan.
pub struct PlanCache {
    summaries: TtlCache<String, Vec<PlanSummary>>,
    details: TtlCache<Uuid, PlanDetail>,
}

/// The cache behind the single serializing lock every component mutates
/// it through. Critical sections stay synchronous and short; fetches
/// happen outside the lock.
pub type SharedPlanCache = Arc<Mutex<PlanCache>>;

impl PlanCache {
    pub fn new() -> Self {
        Self::with_ttls(SUMMARY_TTL, DETAIL_TTL)
    }

    pub fn with_ttls(summary_ttl: Duration, detail_ttl: Duration) -> Self {
        Self {
            summaries: TtlCache::new(summary_ttl),
            details: TtlCache::new(detail_ttl),
        }
    }

    pub fn shared(self) -> SharedPlanCache {
        Arc::new(Mutex::new(self))
    }

    pub fn summaries(&self, owner_id: &str) -> Option<Vec<PlanSummary>> {
        self.summaries.get(owner_id)
    }

    pub fn put_summaries(&mut self, owner_id: impl Into<String>, summaries: Vec<PlanSummary>) {
        self.summaries.put(owner_id.into(), summaries);
    }

    pub fn detail(&self, plan_id: &Uuid) -> Option<PlanDetail> {
        self.details.get(plan_id)
    }

    pub fn put_detail(&mut self, detail: PlanDetail) {
        self.details.put(detail.id, detail);
    }

    pub fn invalidate_summaries(&mut self, owner_id: &str) {
        self.summaries.invalidate(owner_id);
    }

    pub fn invalidate_detail(&mut self, plan_id: &Uuid) {
        self.details.invalidate(plan_id);
    }

    /// Drops everything cached for `owner_id`. Details are keyed by plan
    /// id, not owner, and this is a single-user cache, so they all go.
    pub fn invalidate_owner(&mut self, owner_id: &str) {
        self.summaries.invalidate(owner_id);
        self.details.clear();
    }

    pub fn invalidate_all(&mut self) {
        self.summaries.clear();
        self.details.clear();
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new()
    }
}
