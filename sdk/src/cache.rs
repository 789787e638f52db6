// Copyright 2024-2025 Contributors to Edugrant
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A throttled cache over the composed scholarship read-model.
//!
//! Reads are served from the last built view; rebuilds are limited to one
//! per minimum interval so periodic polling cannot hammer the backend. A
//! forced refresh (used right after a caller's own mutation) bypasses the
//! throttle once. When the backend is unreachable the cache serves its
//! previous contents, or the fixed seed set if it never loaded. This is a
//! deliberate degraded mode, never a hard failure.

use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime};

use crate::scholarships::store::{ScholarshipStore, ScholarshipStoreError};
use crate::scholarships::{build_scholarships, seed_scholarships, Scholarship};

struct CacheState {
    scholarships: Vec<Scholarship>,
    last_refresh: Option<Instant>,
    populated: bool,
}

pub struct ScholarshipCache {
    min_refresh_interval: Duration,
    inner: Mutex<CacheState>,
}

impl ScholarshipCache {
    pub fn new(min_refresh_interval: Duration) -> Self {
        ScholarshipCache {
            min_refresh_interval,
            inner: Mutex::new(CacheState {
                scholarships: Vec::new(),
                last_refresh: None,
                populated: false,
            }),
        }
    }

    /// Returns the current read-model, rebuilding it from the store if the
    /// throttle allows (or unconditionally when `force` is set).
    pub fn refresh(&self, store: &dyn ScholarshipStore, force: bool) -> Vec<Scholarship> {
        let mut state = match self.inner.lock() {
            Ok(state) => state,
            Err(_) => {
                warn!("Scholarship cache lock poisoned; serving seed data");
                return seed_scholarships(SystemTime::now());
            }
        };

        if !force {
            if let Some(last_refresh) = state.last_refresh {
                if last_refresh.elapsed() < self.min_refresh_interval {
                    return state.scholarships.clone();
                }
            }
        }

        // The timer restarts on failed attempts too, bounding backend load
        // while it is down.
        state.last_refresh = Some(Instant::now());

        match load(store) {
            Ok(scholarships) => {
                state.scholarships = scholarships;
                state.populated = true;
            }
            Err(err) => {
                if state.populated {
                    warn!("Unable to refresh scholarships, serving cached data: {}", err);
                } else {
                    warn!("Unable to refresh scholarships, serving seed data: {}", err);
                    state.scholarships = seed_scholarships(SystemTime::now());
                }
            }
        }

        state.scholarships.clone()
    }
}

fn load(store: &dyn ScholarshipStore) -> Result<Vec<Scholarship>, ScholarshipStoreError> {
    Ok(build_scholarships(
        store.list_scholarships()?,
        store.list_applications()?,
        store.list_votes()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::SystemTime;

    use crate::error::InternalError;
    use crate::scholarships::store::memory::MemoryScholarshipStore;
    use crate::scholarships::store::{
        ApplicationRecord, ApplicationStatus, NewApplicationRecord, NewScholarshipRecord,
        NewTransactionRecord, NewVoteRecord, ScholarshipRecord, ScholarshipStatus,
        TransactionRecord, TransactionStatus, VoteRecord,
    };

    /// Counts read-model loads against a real memory store.
    struct CountingStore {
        inner: MemoryScholarshipStore,
        loads: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            CountingStore {
                inner: MemoryScholarshipStore::new(),
                loads: AtomicUsize::new(0),
            }
        }

        fn loads(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    impl ScholarshipStore for CountingStore {
        fn add_scholarship(
            &self,
            scholarship: NewScholarshipRecord,
        ) -> Result<ScholarshipRecord, ScholarshipStoreError> {
            self.inner.add_scholarship(scholarship)
        }

        fn list_scholarships(&self) -> Result<Vec<ScholarshipRecord>, ScholarshipStoreError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.inner.list_scholarships()
        }

        fn fetch_scholarship(
            &self,
            _scholarship_id: &str,
        ) -> Result<Option<ScholarshipRecord>, ScholarshipStoreError> {
            unimplemented!()
        }

        fn update_scholarship_status(
            &self,
            _scholarship_id: &str,
            _status: ScholarshipStatus,
        ) -> Result<(), ScholarshipStoreError> {
            unimplemented!()
        }

        fn add_application(
            &self,
            _application: NewApplicationRecord,
        ) -> Result<ApplicationRecord, ScholarshipStoreError> {
            unimplemented!()
        }

        fn list_applications(&self) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError> {
            self.inner.list_applications()
        }

        fn list_applications_for_scholarship(
            &self,
            _scholarship_id: &str,
        ) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError> {
            unimplemented!()
        }

        fn list_applications_for_applicant(
            &self,
            _applicant_address: &str,
        ) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError> {
            unimplemented!()
        }

        fn fetch_application(
            &self,
            _application_id: &str,
        ) -> Result<Option<ApplicationRecord>, ScholarshipStoreError> {
            unimplemented!()
        }

        fn update_application_status(
            &self,
            _application_id: &str,
            _status: ApplicationStatus,
        ) -> Result<(), ScholarshipStoreError> {
            unimplemented!()
        }

        fn add_vote(&self, _vote: NewVoteRecord) -> Result<VoteRecord, ScholarshipStoreError> {
            unimplemented!()
        }

        fn list_votes(&self) -> Result<Vec<VoteRecord>, ScholarshipStoreError> {
            self.inner.list_votes()
        }

        fn fetch_vote(
            &self,
            _scholarship_id: &str,
            _voter_address: &str,
        ) -> Result<Option<VoteRecord>, ScholarshipStoreError> {
            unimplemented!()
        }

        fn add_transaction(
            &self,
            _transaction: NewTransactionRecord,
        ) -> Result<TransactionRecord, ScholarshipStoreError> {
            unimplemented!()
        }

        fn list_transactions_for_scholarship(
            &self,
            _scholarship_id: &str,
        ) -> Result<Vec<TransactionRecord>, ScholarshipStoreError> {
            unimplemented!()
        }

        fn update_transaction_status(
            &self,
            _transaction_id: &str,
            _status: TransactionStatus,
            _transaction_hash: Option<&str>,
        ) -> Result<(), ScholarshipStoreError> {
            unimplemented!()
        }
    }

    /// A store whose every read fails, standing in for an unreachable
    /// backend.
    struct BrokenStore;

    impl ScholarshipStore for BrokenStore {
        fn add_scholarship(
            &self,
            _scholarship: NewScholarshipRecord,
        ) -> Result<ScholarshipRecord, ScholarshipStoreError> {
            Err(unavailable())
        }

        fn list_scholarships(&self) -> Result<Vec<ScholarshipRecord>, ScholarshipStoreError> {
            Err(unavailable())
        }

        fn fetch_scholarship(
            &self,
            _scholarship_id: &str,
        ) -> Result<Option<ScholarshipRecord>, ScholarshipStoreError> {
            Err(unavailable())
        }

        fn update_scholarship_status(
            &self,
            _scholarship_id: &str,
            _status: ScholarshipStatus,
        ) -> Result<(), ScholarshipStoreError> {
            Err(unavailable())
        }

        fn add_application(
            &self,
            _application: NewApplicationRecord,
        ) -> Result<ApplicationRecord, ScholarshipStoreError> {
            Err(unavailable())
        }

        fn list_applications(&self) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError> {
            Err(unavailable())
        }

        fn list_applications_for_scholarship(
            &self,
            _scholarship_id: &str,
        ) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError> {
            Err(unavailable())
        }

        fn list_applications_for_applicant(
            &self,
            _applicant_address: &str,
        ) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError> {
            Err(unavailable())
        }

        fn fetch_application(
            &self,
            _application_id: &str,
        ) -> Result<Option<ApplicationRecord>, ScholarshipStoreError> {
            Err(unavailable())
        }

        fn update_application_status(
            &self,
            _application_id: &str,
            _status: ApplicationStatus,
        ) -> Result<(), ScholarshipStoreError> {
            Err(unavailable())
        }

        fn add_vote(&self, _vote: NewVoteRecord) -> Result<VoteRecord, ScholarshipStoreError> {
            Err(unavailable())
        }

        fn list_votes(&self) -> Result<Vec<VoteRecord>, ScholarshipStoreError> {
            Err(unavailable())
        }

        fn fetch_vote(
            &self,
            _scholarship_id: &str,
            _voter_address: &str,
        ) -> Result<Option<VoteRecord>, ScholarshipStoreError> {
            Err(unavailable())
        }

        fn add_transaction(
            &self,
            _transaction: NewTransactionRecord,
        ) -> Result<TransactionRecord, ScholarshipStoreError> {
            Err(unavailable())
        }

        fn list_transactions_for_scholarship(
            &self,
            _scholarship_id: &str,
        ) -> Result<Vec<TransactionRecord>, ScholarshipStoreError> {
            Err(unavailable())
        }

        fn update_transaction_status(
            &self,
            _transaction_id: &str,
            _status: TransactionStatus,
            _transaction_hash: Option<&str>,
        ) -> Result<(), ScholarshipStoreError> {
            Err(unavailable())
        }
    }

    fn unavailable() -> ScholarshipStoreError {
        ScholarshipStoreError::InternalError(InternalError::with_message(
            "connection refused".to_string(),
        ))
    }

    fn add_scholarship(store: &dyn ScholarshipStore) {
        store
            .add_scholarship(NewScholarshipRecord {
                title: "CS Scholarship".to_string(),
                description: "For computer science students".to_string(),
                amount: 0.5,
                creator_address: "0x303C226B1b66F07717D35f5E7243028950Eb1ff1".to_string(),
                status: ScholarshipStatus::Pending,
                deadline: SystemTime::now() + Duration::from_secs(3600),
            })
            .expect("Unable to add scholarship");
    }

    /// Unforced refreshes inside the minimum interval are served from the
    /// cache; a forced refresh bypasses the throttle once.
    #[test]
    fn test_refresh_throttling() {
        let store = CountingStore::new();
        add_scholarship(&store);
        let cache = ScholarshipCache::new(Duration::from_secs(60));

        assert_eq!(cache.refresh(&store, false).len(), 1);
        assert_eq!(store.loads(), 1);

        assert_eq!(cache.refresh(&store, false).len(), 1);
        assert_eq!(cache.refresh(&store, false).len(), 1);
        assert_eq!(store.loads(), 1);

        assert_eq!(cache.refresh(&store, true).len(), 1);
        assert_eq!(store.loads(), 2);
    }

    /// A cache that never managed to load serves the seed set when the
    /// backend is unreachable.
    #[test]
    fn test_seed_fallback_when_never_loaded() {
        let cache = ScholarshipCache::new(Duration::from_secs(0));
        let scholarships = cache.refresh(&BrokenStore, false);

        assert_eq!(scholarships.len(), 3);
        assert!(scholarships.iter().any(|s| s.id == "seed-1"));
    }

    /// A cache that has loaded real data keeps serving it when the backend
    /// later becomes unreachable, rather than reverting to seeds.
    #[test]
    fn test_stale_data_preferred_over_seeds() {
        let store = CountingStore::new();
        add_scholarship(&store);
        let cache = ScholarshipCache::new(Duration::from_secs(0));

        let loaded = cache.refresh(&store, true);
        assert_eq!(loaded.len(), 1);
        let id = loaded[0].id.clone();

        let after_outage = cache.refresh(&BrokenStore, true);
        assert_eq!(after_outage.len(), 1);
        assert_eq!(after_outage[0].id, id);
    }
}
