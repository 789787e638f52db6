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

//! The persistence collaborator: four collections (scholarships,
//! applications, votes, transactions) behind a narrow typed interface.
//!
//! The store performs no joins; all relational composition happens in the
//! read-model builder. The uniqueness of (scholarship_id, voter_address)
//! and (scholarship_id, applicant_address) is enforced here, not in the
//! workflow, so that concurrent duplicate submissions surface as
//! [`ScholarshipStoreError::ConstraintViolationError`].

#[cfg(feature = "postgres")]
pub mod diesel;
mod error;
pub mod memory;

use std::str::FromStr;
use std::time::SystemTime;

use crate::error::InternalError;

pub use error::ScholarshipStoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScholarshipStatus {
    Pending,
    Approved,
    /// Reserved terminal state; no exposed operation produces it.
    Rejected,
    Completed,
}

impl ScholarshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScholarshipStatus::Pending => "pending",
            ScholarshipStatus::Approved => "approved",
            ScholarshipStatus::Rejected => "rejected",
            ScholarshipStatus::Completed => "completed",
        }
    }
}

impl FromStr for ScholarshipStatus {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ScholarshipStatus::Pending),
            "approved" => Ok(ScholarshipStatus::Approved),
            "rejected" => Ok(ScholarshipStatus::Rejected),
            "completed" => Ok(ScholarshipStatus::Completed),
            _ => Err(InternalError::with_message(format!(
                "Invalid scholarship status: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            _ => Err(InternalError::with_message(format!(
                "Invalid application status: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// The receipt has been written but the payment has not yet been
    /// confirmed on chain.
    Pending,
    Confirmed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Confirmed => "confirmed",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "confirmed" => Ok(TransactionStatus::Confirmed),
            "failed" => Ok(TransactionStatus::Failed),
            _ => Err(InternalError::with_message(format!(
                "Invalid transaction status: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScholarshipRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub creator_address: String,
    pub status: ScholarshipStatus,
    pub deadline: SystemTime,
    pub created_at: SystemTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewScholarshipRecord {
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub creator_address: String,
    pub status: ScholarshipStatus,
    pub deadline: SystemTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationRecord {
    pub id: String,
    pub scholarship_id: String,
    pub applicant_address: String,
    pub status: ApplicationStatus,
    pub created_at: SystemTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewApplicationRecord {
    pub scholarship_id: String,
    pub applicant_address: String,
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoteRecord {
    pub id: String,
    pub scholarship_id: String,
    pub voter_address: String,
    pub vote_type: bool,
    pub created_at: SystemTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVoteRecord {
    pub scholarship_id: String,
    pub voter_address: String,
    pub vote_type: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub id: String,
    pub scholarship_id: String,
    pub application_id: String,
    pub financier_address: String,
    pub recipient_address: String,
    pub amount: f64,
    pub transaction_hash: Option<String>,
    pub status: TransactionStatus,
    pub created_at: SystemTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransactionRecord {
    pub scholarship_id: String,
    pub application_id: String,
    pub financier_address: String,
    pub recipient_address: String,
    pub amount: f64,
    pub transaction_hash: Option<String>,
    pub status: TransactionStatus,
}

pub trait ScholarshipStore: Send + Sync {
    /// Adds a new scholarship to underlying storage, assigning its id and
    /// creation time.
    fn add_scholarship(
        &self,
        scholarship: NewScholarshipRecord,
    ) -> Result<ScholarshipRecord, ScholarshipStoreError>;

    /// List all scholarships in underlying storage.
    fn list_scholarships(&self) -> Result<Vec<ScholarshipRecord>, ScholarshipStoreError>;

    /// Retrieve a scholarship by id.
    fn fetch_scholarship(
        &self,
        scholarship_id: &str,
    ) -> Result<Option<ScholarshipRecord>, ScholarshipStoreError>;

    /// Update a scholarship's lifecycle status.
    fn update_scholarship_status(
        &self,
        scholarship_id: &str,
        status: ScholarshipStatus,
    ) -> Result<(), ScholarshipStoreError>;

    /// Adds a new application, assigning its id and creation time.
    ///
    /// Returns `ConstraintViolationError` if an application already exists
    /// for the same (scholarship_id, applicant_address) pair.
    fn add_application(
        &self,
        application: NewApplicationRecord,
    ) -> Result<ApplicationRecord, ScholarshipStoreError>;

    /// List all applications in underlying storage.
    fn list_applications(&self) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError>;

    /// List the applications submitted for a particular scholarship.
    fn list_applications_for_scholarship(
        &self,
        scholarship_id: &str,
    ) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError>;

    /// List the applications submitted by a particular applicant.
    fn list_applications_for_applicant(
        &self,
        applicant_address: &str,
    ) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError>;

    /// Retrieve an application by id.
    fn fetch_application(
        &self,
        application_id: &str,
    ) -> Result<Option<ApplicationRecord>, ScholarshipStoreError>;

    /// Update an application's status.
    fn update_application_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> Result<(), ScholarshipStoreError>;

    /// Adds a new vote, assigning its id and creation time. Votes are
    /// immutable once cast; no update or delete operation exists.
    ///
    /// Returns `ConstraintViolationError` if a vote already exists for the
    /// same (scholarship_id, voter_address) pair.
    fn add_vote(&self, vote: NewVoteRecord) -> Result<VoteRecord, ScholarshipStoreError>;

    /// List all votes in underlying storage.
    fn list_votes(&self) -> Result<Vec<VoteRecord>, ScholarshipStoreError>;

    /// Retrieve the vote cast by a voter on a scholarship, if any.
    fn fetch_vote(
        &self,
        scholarship_id: &str,
        voter_address: &str,
    ) -> Result<Option<VoteRecord>, ScholarshipStoreError>;

    /// Adds a new funding receipt, assigning its id and creation time.
    fn add_transaction(
        &self,
        transaction: NewTransactionRecord,
    ) -> Result<TransactionRecord, ScholarshipStoreError>;

    /// List the funding receipts recorded for a particular scholarship.
    fn list_transactions_for_scholarship(
        &self,
        scholarship_id: &str,
    ) -> Result<Vec<TransactionRecord>, ScholarshipStoreError>;

    /// Reconcile a funding receipt after the payment settles, recording the
    /// final status and, when confirmed, the on-chain transaction hash.
    fn update_transaction_status(
        &self,
        transaction_id: &str,
        status: TransactionStatus,
        transaction_hash: Option<&str>,
    ) -> Result<(), ScholarshipStoreError>;
}

/// The possible connection types and identifiers for a scholarship store.
#[derive(Clone)]
pub enum ConnectionUri {
    Memory,
    #[cfg(feature = "postgres")]
    Postgres(String),
}

impl FromStr for ConnectionUri {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(ConnectionUri::Memory),
            #[cfg(feature = "postgres")]
            _ if s.starts_with("postgres://") => Ok(ConnectionUri::Postgres(s.into())),
            _ => Err(InternalError::with_message(format!(
                "No compatible connection type: {}",
                s
            ))),
        }
    }
}

/// Creates a `ScholarshipStore` backed by the given connection.
pub fn create_store(
    connection_uri: &ConnectionUri,
) -> Result<Box<dyn ScholarshipStore>, InternalError> {
    match connection_uri {
        ConnectionUri::Memory => Ok(Box::new(memory::MemoryScholarshipStore::new())),
        #[cfg(feature = "postgres")]
        ConnectionUri::Postgres(url) => Ok(Box::new(diesel::PgScholarshipStore::new(url)?)),
    }
}
