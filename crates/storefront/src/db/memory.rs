//! In-memory store repository.
//!
//! Used by unit and integration tests. Counts reads and writes so tests can
//! assert that an operation touched storage (or did not), and can be told to
//! fail lookups, reads, or writes.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shopforge_core::{DnsIp, Store, StoreId};

use super::{DnsConfigUpdate, NewStore, RepositoryError, StoreRepository};

/// `StoreRepository` over a `Vec<Store>`.
#[derive(Default)]
pub struct InMemoryStoreRepository {
    stores: Mutex<Vec<Store>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_lookups: AtomicBool,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryStoreRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with `stores`.
    #[must_use]
    pub fn with_stores(stores: Vec<Store>) -> Self {
        Self {
            stores: Mutex::new(stores),
            ..Self::default()
        }
    }

    /// Number of `get_by_id` calls.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of update calls, successful or not.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make `find_by_domain` fail.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Make `get_by_id` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make the update methods fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Copy of a stored record, bypassing the read counter.
    #[must_use]
    pub fn snapshot(&self, id: StoreId) -> Option<Store> {
        self.lock().iter().find(|s| s.id == id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Store>> {
        // A panic while holding the lock leaves the Vec intact
        self.stores
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn unavailable(what: &str) -> RepositoryError {
        RepositoryError::Unavailable(format!("in-memory {what} failure"))
    }

    fn update(&self, id: StoreId, apply: impl FnOnce(&mut Store)) -> Result<(), RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::unavailable("write"));
        }
        let mut stores = self.lock();
        let store = stores
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RepositoryError::NotFound)?;
        apply(store);
        store.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl StoreRepository for InMemoryStoreRepository {
    async fn find_by_domain(&self, domain: &str) -> Result<Vec<Store>, RepositoryError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(Self::unavailable("lookup"));
        }
        let mut matches: Vec<Store> = self
            .lock()
            .iter()
            .filter(|s| s.domain.as_deref() == Some(domain))
            .cloned()
            .collect();
        matches.sort_by_key(|s| s.id);
        Ok(matches)
    }

    async fn get_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable("read"));
        }
        Ok(self.snapshot(id))
    }

    async fn update_dns_ip(
        &self,
        id: StoreId,
        ip: &DnsIp,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.update(id, |store| {
            store.vercel_dns_ip = Some(ip.to_string());
            store.last_dns_config_fetch = Some(fetched_at);
        })
    }

    async fn update_dns_config(
        &self,
        id: StoreId,
        update: &DnsConfigUpdate,
    ) -> Result<(), RepositoryError> {
        self.update(id, |store| {
            store.vercel_dns_ip = Some(update.dns_ip.clone());
            store.vercel_cname = Some(update.cname.clone());
            store.vercel_domain_config = Some(update.domain_config.clone());
            store.last_dns_config_fetch = Some(update.fetched_at);
        })
    }

    async fn create(&self, store: &NewStore) -> Result<Store, RepositoryError> {
        let mut stores = self.lock();
        let next_id = stores.iter().map(|s| s.id.as_i32()).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let created = Store {
            id: StoreId::new(next_id),
            name: store.name.clone(),
            domain: store.domain.clone(),
            vercel_dns_ip: None,
            vercel_cname: None,
            vercel_domain_config: None,
            last_dns_config_fetch: None,
            created_at: now,
            updated_at: now,
        };
        stores.push(created.clone());
        Ok(created)
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
