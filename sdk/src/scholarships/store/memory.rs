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

//! A memory-backed implementation of the scholarship store.
//!
//! This is the well-defined fake used in tests and for demo deployments
//! without a database. It enforces the same uniqueness constraints as the
//! PostgreSQL implementation.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use uuid::Uuid;

use crate::error::InternalError;
use crate::scholarships::store::{
    ApplicationRecord, ApplicationStatus, NewApplicationRecord, NewScholarshipRecord,
    NewTransactionRecord, NewVoteRecord, ScholarshipRecord, ScholarshipStatus, ScholarshipStore,
    ScholarshipStoreError, TransactionRecord, TransactionStatus, VoteRecord,
};

#[derive(Default)]
struct MemoryStoreState {
    scholarships: Vec<ScholarshipRecord>,
    applications: Vec<ApplicationRecord>,
    votes: Vec<VoteRecord>,
    transactions: Vec<TransactionRecord>,
}

#[derive(Clone, Default)]
pub struct MemoryScholarshipStore {
    inner: Arc<Mutex<MemoryStoreState>>,
}

impl MemoryScholarshipStore {
    pub fn new() -> Self {
        MemoryScholarshipStore {
            inner: Arc::new(Mutex::new(MemoryStoreState::default())),
        }
    }

    fn state(&self) -> Result<MutexGuard<MemoryStoreState>, ScholarshipStoreError> {
        self.inner.lock().map_err(|_| {
            ScholarshipStoreError::InternalError(InternalError::with_message(
                "Cannot access scholarship store: mutex lock poisoned".to_string(),
            ))
        })
    }
}

impl ScholarshipStore for MemoryScholarshipStore {
    fn add_scholarship(
        &self,
        scholarship: NewScholarshipRecord,
    ) -> Result<ScholarshipRecord, ScholarshipStoreError> {
        let mut state = self.state()?;

        let record = ScholarshipRecord {
            id: Uuid::new_v4().to_string(),
            title: scholarship.title,
            description: scholarship.description,
            amount: scholarship.amount,
            creator_address: scholarship.creator_address,
            status: scholarship.status,
            deadline: scholarship.deadline,
            created_at: SystemTime::now(),
        };

        state.scholarships.push(record.clone());

        Ok(record)
    }

    fn list_scholarships(&self) -> Result<Vec<ScholarshipRecord>, ScholarshipStoreError> {
        Ok(self.state()?.scholarships.to_vec())
    }

    fn fetch_scholarship(
        &self,
        scholarship_id: &str,
    ) -> Result<Option<ScholarshipRecord>, ScholarshipStoreError> {
        Ok(self
            .state()?
            .scholarships
            .iter()
            .find(|s| s.id == scholarship_id)
            .map(ScholarshipRecord::clone))
    }

    fn update_scholarship_status(
        &self,
        scholarship_id: &str,
        status: ScholarshipStatus,
    ) -> Result<(), ScholarshipStoreError> {
        let mut state = self.state()?;

        match state.scholarships.iter_mut().find(|s| s.id == scholarship_id) {
            Some(scholarship) => {
                scholarship.status = status;
                Ok(())
            }
            None => Err(ScholarshipStoreError::NotFoundError(format!(
                "Scholarship with id {} not found",
                scholarship_id
            ))),
        }
    }

    fn add_application(
        &self,
        application: NewApplicationRecord,
    ) -> Result<ApplicationRecord, ScholarshipStoreError> {
        let mut state = self.state()?;

        if state.applications.iter().any(|a| {
            a.scholarship_id == application.scholarship_id
                && a.applicant_address == application.applicant_address
        }) {
            return Err(ScholarshipStoreError::ConstraintViolationError(format!(
                "Application already exists for scholarship {} and applicant {}",
                application.scholarship_id, application.applicant_address
            )));
        }

        let record = ApplicationRecord {
            id: Uuid::new_v4().to_string(),
            scholarship_id: application.scholarship_id,
            applicant_address: application.applicant_address,
            status: application.status,
            created_at: SystemTime::now(),
        };

        state.applications.push(record.clone());

        Ok(record)
    }

    fn list_applications(&self) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError> {
        Ok(self.state()?.applications.to_vec())
    }

    fn list_applications_for_scholarship(
        &self,
        scholarship_id: &str,
    ) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError> {
        Ok(self
            .state()?
            .applications
            .iter()
            .filter(|a| a.scholarship_id == scholarship_id)
            .map(ApplicationRecord::clone)
            .collect())
    }

    fn list_applications_for_applicant(
        &self,
        applicant_address: &str,
    ) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError> {
        Ok(self
            .state()?
            .applications
            .iter()
            .filter(|a| a.applicant_address == applicant_address)
            .map(ApplicationRecord::clone)
            .collect())
    }

    fn fetch_application(
        &self,
        application_id: &str,
    ) -> Result<Option<ApplicationRecord>, ScholarshipStoreError> {
        Ok(self
            .state()?
            .applications
            .iter()
            .find(|a| a.id == application_id)
            .map(ApplicationRecord::clone))
    }

    fn update_application_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> Result<(), ScholarshipStoreError> {
        let mut state = self.state()?;

        match state.applications.iter_mut().find(|a| a.id == application_id) {
            Some(application) => {
                application.status = status;
                Ok(())
            }
            None => Err(ScholarshipStoreError::NotFoundError(format!(
                "Application with id {} not found",
                application_id
            ))),
        }
    }

    fn add_vote(&self, vote: NewVoteRecord) -> Result<VoteRecord, ScholarshipStoreError> {
        let mut state = self.state()?;

        if state
            .votes
            .iter()
            .any(|v| v.scholarship_id == vote.scholarship_id && v.voter_address == vote.voter_address)
        {
            return Err(ScholarshipStoreError::ConstraintViolationError(format!(
                "Vote already exists for scholarship {} and voter {}",
                vote.scholarship_id, vote.voter_address
            )));
        }

        let record = VoteRecord {
            id: Uuid::new_v4().to_string(),
            scholarship_id: vote.scholarship_id,
            voter_address: vote.voter_address,
            vote_type: vote.vote_type,
            created_at: SystemTime::now(),
        };

        state.votes.push(record.clone());

        Ok(record)
    }

    fn list_votes(&self) -> Result<Vec<VoteRecord>, ScholarshipStoreError> {
        Ok(self.state()?.votes.to_vec())
    }

    fn fetch_vote(
        &self,
        scholarship_id: &str,
        voter_address: &str,
    ) -> Result<Option<VoteRecord>, ScholarshipStoreError> {
        Ok(self
            .state()?
            .votes
            .iter()
            .find(|v| v.scholarship_id == scholarship_id && v.voter_address == voter_address)
            .map(VoteRecord::clone))
    }

    fn add_transaction(
        &self,
        transaction: NewTransactionRecord,
    ) -> Result<TransactionRecord, ScholarshipStoreError> {
        let mut state = self.state()?;

        let record = TransactionRecord {
            id: Uuid::new_v4().to_string(),
            scholarship_id: transaction.scholarship_id,
            application_id: transaction.application_id,
            financier_address: transaction.financier_address,
            recipient_address: transaction.recipient_address,
            amount: transaction.amount,
            transaction_hash: transaction.transaction_hash,
            status: transaction.status,
            created_at: SystemTime::now(),
        };

        state.transactions.push(record.clone());

        Ok(record)
    }

    fn list_transactions_for_scholarship(
        &self,
        scholarship_id: &str,
    ) -> Result<Vec<TransactionRecord>, ScholarshipStoreError> {
        Ok(self
            .state()?
            .transactions
            .iter()
            .filter(|t| t.scholarship_id == scholarship_id)
            .map(TransactionRecord::clone)
            .collect())
    }

    fn update_transaction_status(
        &self,
        transaction_id: &str,
        status: TransactionStatus,
        transaction_hash: Option<&str>,
    ) -> Result<(), ScholarshipStoreError> {
        let mut state = self.state()?;

        match state.transactions.iter_mut().find(|t| t.id == transaction_id) {
            Some(transaction) => {
                transaction.status = status;
                if let Some(hash) = transaction_hash {
                    transaction.transaction_hash = Some(hash.to_string());
                }
                Ok(())
            }
            None => Err(ScholarshipStoreError::NotFoundError(format!(
                "Transaction with id {} not found",
                transaction_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    fn new_scholarship() -> NewScholarshipRecord {
        NewScholarshipRecord {
            title: "Computer Science Scholarship".to_string(),
            description: "For students pursuing a degree in computer science".to_string(),
            amount: 0.5,
            creator_address: "0x303C226B1b66F07717D35f5E7243028950Eb1ff1".to_string(),
            status: ScholarshipStatus::Pending,
            deadline: SystemTime::now() + Duration::from_secs(30 * 24 * 60 * 60),
        }
    }

    /// add_scholarship() assigns a unique id to each inserted record and
    /// the record is visible to list and fetch.
    #[test]
    fn test_add_and_fetch_scholarship() {
        let store = MemoryScholarshipStore::new();

        let first = store.add_scholarship(new_scholarship()).unwrap();
        let second = store.add_scholarship(new_scholarship()).unwrap();
        assert_ne!(first.id, second.id);

        assert_eq!(store.list_scholarships().unwrap().len(), 2);
        assert_eq!(
            store.fetch_scholarship(&first.id).unwrap(),
            Some(first.clone())
        );
        assert_eq!(store.fetch_scholarship("no-such-id").unwrap(), None);
    }

    /// add_vote() enforces the (scholarship_id, voter_address) uniqueness
    /// constraint: a second vote from the same address is rejected and only
    /// one row remains.
    #[test]
    fn test_duplicate_vote_is_constraint_violation() {
        let store = MemoryScholarshipStore::new();
        let scholarship = store.add_scholarship(new_scholarship()).unwrap();

        let vote = NewVoteRecord {
            scholarship_id: scholarship.id.clone(),
            voter_address: "0xaaa".to_string(),
            vote_type: true,
        };
        store.add_vote(vote.clone()).unwrap();

        let second = NewVoteRecord {
            vote_type: false,
            ..vote
        };
        match store.add_vote(second) {
            Err(ScholarshipStoreError::ConstraintViolationError(_)) => (),
            res => panic!("Expected constraint violation, got {:?}", res),
        }

        assert_eq!(store.list_votes().unwrap().len(), 1);
    }

    /// add_application() enforces the (scholarship_id, applicant_address)
    /// uniqueness constraint, while the same applicant may still apply to a
    /// different scholarship.
    #[test]
    fn test_duplicate_application_is_constraint_violation() {
        let store = MemoryScholarshipStore::new();
        let scholarship = store.add_scholarship(new_scholarship()).unwrap();
        let other = store.add_scholarship(new_scholarship()).unwrap();

        let application = NewApplicationRecord {
            scholarship_id: scholarship.id.clone(),
            applicant_address: "0xbbb".to_string(),
            status: ApplicationStatus::Pending,
        };
        store.add_application(application.clone()).unwrap();

        match store.add_application(application) {
            Err(ScholarshipStoreError::ConstraintViolationError(_)) => (),
            res => panic!("Expected constraint violation, got {:?}", res),
        }

        store
            .add_application(NewApplicationRecord {
                scholarship_id: other.id,
                applicant_address: "0xbbb".to_string(),
                status: ApplicationStatus::Pending,
            })
            .unwrap();

        assert_eq!(store.list_applications().unwrap().len(), 2);
        assert_eq!(
            store
                .list_applications_for_applicant("0xbbb")
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            store
                .list_applications_for_scholarship(&scholarship.id)
                .unwrap()
                .len(),
            1
        );
    }

    /// Updates against records that do not exist report NotFoundError.
    #[test]
    fn test_update_missing_records() {
        let store = MemoryScholarshipStore::new();

        match store.update_scholarship_status("missing", ScholarshipStatus::Approved) {
            Err(ScholarshipStoreError::NotFoundError(_)) => (),
            res => panic!("Expected not found, got {:?}", res),
        }
        match store.update_application_status("missing", ApplicationStatus::Approved) {
            Err(ScholarshipStoreError::NotFoundError(_)) => (),
            res => panic!("Expected not found, got {:?}", res),
        }
        match store.update_transaction_status("missing", TransactionStatus::Confirmed, None) {
            Err(ScholarshipStoreError::NotFoundError(_)) => (),
            res => panic!("Expected not found, got {:?}", res),
        }
    }

    /// update_transaction_status() records the on-chain hash when the
    /// payment confirms and leaves the hash untouched when reconciling a
    /// failure.
    #[test]
    fn test_transaction_reconciliation() {
        let store = MemoryScholarshipStore::new();

        let transaction = store
            .add_transaction(NewTransactionRecord {
                scholarship_id: "s1".to_string(),
                application_id: "a1".to_string(),
                financier_address: "0xfff".to_string(),
                recipient_address: "0xbbb".to_string(),
                amount: 0.5,
                transaction_hash: None,
                status: TransactionStatus::Pending,
            })
            .unwrap();

        store
            .update_transaction_status(&transaction.id, TransactionStatus::Confirmed, Some("0x1234"))
            .unwrap();

        let transactions = store.list_transactions_for_scholarship("s1").unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].status, TransactionStatus::Confirmed);
        assert_eq!(transactions[0].transaction_hash.as_deref(), Some("0x1234"));
    }
}
