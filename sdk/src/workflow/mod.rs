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

//! The scholarship workflow engine.
//!
//! Each operation is a guarded transition over the lifecycle
//! `pending → approved → completed` (with `rejected` as a reserved
//! terminal). Guards run in a fixed order (connected, verified, role,
//! state, duplicate) so a caller always receives the most actionable
//! failure first.

mod error;

use std::time::SystemTime;

use crate::roles::{Role, Session};
use crate::scholarships::store::{
    ApplicationRecord, ApplicationStatus, NewApplicationRecord, NewScholarshipRecord,
    NewTransactionRecord, NewVoteRecord, ScholarshipRecord, ScholarshipStatus, ScholarshipStore,
    TransactionRecord, TransactionStatus, VoteRecord,
};
use crate::wallet::WalletClient;

pub use error::WorkflowError;

pub struct WorkflowEngine<'a> {
    store: &'a dyn ScholarshipStore,
    wallet: &'a dyn WalletClient,
}

impl<'a> WorkflowEngine<'a> {
    pub fn new(store: &'a dyn ScholarshipStore, wallet: &'a dyn WalletClient) -> WorkflowEngine<'a> {
        WorkflowEngine { store, wallet }
    }

    /// Creates a new scholarship proposal in the `pending` state.
    ///
    /// Only the government officer may create proposals; title and
    /// description must be non-empty, the amount positive, and the deadline
    /// in the future.
    pub fn create_scholarship(
        &self,
        session: &Session,
        title: &str,
        description: &str,
        amount: f64,
        deadline: SystemTime,
    ) -> Result<ScholarshipRecord, WorkflowError> {
        let address = connected(session)?;
        verified(session)?;

        if session.role() != Role::Government {
            return Err(WorkflowError::NotAuthorized(
                "Only government officers can create scholarships".to_string(),
            ));
        }

        if title.trim().is_empty() {
            return Err(WorkflowError::ValidationError(
                "A title is required".to_string(),
            ));
        }
        if description.trim().is_empty() {
            return Err(WorkflowError::ValidationError(
                "A description is required".to_string(),
            ));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(WorkflowError::ValidationError(
                "The amount must be greater than zero".to_string(),
            ));
        }
        if deadline <= SystemTime::now() {
            return Err(WorkflowError::ValidationError(
                "The deadline must be in the future".to_string(),
            ));
        }

        let record = self.store.add_scholarship(NewScholarshipRecord {
            title: title.to_string(),
            description: description.to_string(),
            amount,
            creator_address: address.to_string(),
            status: ScholarshipStatus::Pending,
            deadline,
        })?;

        info!("Created scholarship {} ({})", record.id, record.title);

        Ok(record)
    }

    /// Casts a for/against vote on a scholarship.
    ///
    /// Voting is advisory: it never changes the scholarship's status. A
    /// caller may vote at most once per scholarship; a repeat vote is the
    /// benign `AlreadyDone` outcome, enforced both by a pre-check and by
    /// the store's uniqueness constraint.
    pub fn vote(
        &self,
        session: &Session,
        scholarship_id: &str,
        vote_for: bool,
    ) -> Result<VoteRecord, WorkflowError> {
        let address = connected(session)?;
        verified(session)?;

        if self.store.fetch_scholarship(scholarship_id)?.is_none() {
            return Err(WorkflowError::NotFound(format!(
                "Scholarship with id {} not found",
                scholarship_id
            )));
        }

        if self.store.fetch_vote(scholarship_id, address)?.is_some() {
            return Err(WorkflowError::AlreadyDone(
                "You have already voted on this scholarship".to_string(),
            ));
        }

        let record = self.store.add_vote(NewVoteRecord {
            scholarship_id: scholarship_id.to_string(),
            voter_address: address.to_string(),
            vote_type: vote_for,
        })?;

        debug!(
            "Recorded {} vote on scholarship {} by {}",
            if vote_for { "for" } else { "against" },
            scholarship_id,
            address
        );

        Ok(record)
    }

    /// Applies to be the recipient of a scholarship.
    ///
    /// One application per (scholarship, applicant) pair; a repeat
    /// application is the benign `AlreadyDone` outcome.
    pub fn apply(
        &self,
        session: &Session,
        scholarship_id: &str,
    ) -> Result<ApplicationRecord, WorkflowError> {
        let address = connected(session)?;
        verified(session)?;

        if self.store.fetch_scholarship(scholarship_id)?.is_none() {
            return Err(WorkflowError::NotFound(format!(
                "Scholarship with id {} not found",
                scholarship_id
            )));
        }

        let already_applied = self
            .store
            .list_applications_for_scholarship(scholarship_id)?
            .iter()
            .any(|application| application.applicant_address == address);
        if already_applied {
            return Err(WorkflowError::AlreadyDone(
                "You have already applied for this scholarship".to_string(),
            ));
        }

        let record = self.store.add_application(NewApplicationRecord {
            scholarship_id: scholarship_id.to_string(),
            applicant_address: address.to_string(),
            status: ApplicationStatus::Pending,
        })?;

        Ok(record)
    }

    /// Approves a scholarship for a recipient.
    ///
    /// The recipient must have applied. Approval is permitted while the
    /// scholarship is `pending` or `approved` (a second approve re-targets
    /// the recipient before funding); `completed` and `rejected` proposals
    /// can no longer be approved.
    pub fn approve(
        &self,
        session: &Session,
        scholarship_id: &str,
        recipient_address: &str,
    ) -> Result<ApplicationRecord, WorkflowError> {
        connected(session)?;
        verified(session)?;

        if session.role() != Role::Government {
            return Err(WorkflowError::NotAuthorized(
                "Only government officers can approve scholarships".to_string(),
            ));
        }

        let scholarship = self
            .store
            .fetch_scholarship(scholarship_id)?
            .ok_or_else(|| {
                WorkflowError::NotFound(format!(
                    "Scholarship with id {} not found",
                    scholarship_id
                ))
            })?;

        match scholarship.status {
            ScholarshipStatus::Pending | ScholarshipStatus::Approved => (),
            status => {
                return Err(WorkflowError::InvalidState(format!(
                    "Cannot approve a scholarship whose status is {}",
                    status.as_str()
                )));
            }
        }

        let candidates: Vec<ApplicationRecord> = self
            .store
            .list_applications_for_scholarship(scholarship_id)?
            .into_iter()
            .filter(|application| application.applicant_address == recipient_address)
            .collect();

        // Prefer a row that is already approved; otherwise the first match.
        let target = candidates
            .iter()
            .find(|application| application.status == ApplicationStatus::Approved)
            .or_else(|| candidates.first())
            .ok_or_else(|| WorkflowError::NotFound("Application not found".to_string()))?;

        self.store
            .update_application_status(&target.id, ApplicationStatus::Approved)?;
        self.store
            .update_scholarship_status(scholarship_id, ScholarshipStatus::Approved)?;

        info!(
            "Approved scholarship {} for recipient {}",
            scholarship_id, recipient_address
        );

        Ok(ApplicationRecord {
            status: ApplicationStatus::Approved,
            ..target.clone()
        })
    }

    /// Funds an approved scholarship, transferring its amount to the
    /// approved applicant and completing the proposal.
    ///
    /// The funding receipt is written with status `pending` before the
    /// payment is submitted and reconciled to `confirmed` or `failed`
    /// afterward, so an interrupted funding run leaves an auditable row
    /// rather than an untracked transfer.
    pub fn fund(
        &self,
        session: &Session,
        scholarship_id: &str,
        application_id: &str,
    ) -> Result<TransactionRecord, WorkflowError> {
        let address = connected(session)?;
        verified(session)?;

        if session.role() != Role::Financier {
            return Err(WorkflowError::NotAuthorized(
                "Only financiers can fund scholarships".to_string(),
            ));
        }

        let application = match self.store.fetch_application(application_id)? {
            Some(application) if application.status == ApplicationStatus::Approved => application,
            _ => {
                return Err(WorkflowError::NotFound(
                    "Approved application not found".to_string(),
                ));
            }
        };

        let scholarship = match self.store.fetch_scholarship(scholarship_id)? {
            Some(scholarship) if scholarship.status == ScholarshipStatus::Approved => scholarship,
            _ => {
                return Err(WorkflowError::NotFound(
                    "Approved scholarship not found".to_string(),
                ));
            }
        };

        let mut receipt = self.store.add_transaction(NewTransactionRecord {
            scholarship_id: scholarship_id.to_string(),
            application_id: application_id.to_string(),
            financier_address: address.to_string(),
            recipient_address: application.applicant_address.to_string(),
            amount: scholarship.amount,
            transaction_hash: None,
            status: TransactionStatus::Pending,
        })?;

        let payment = match self
            .wallet
            .send_payment(&application.applicant_address, scholarship.amount)
        {
            Ok(payment) => payment,
            Err(err) => {
                if let Err(update_err) = self.store.update_transaction_status(
                    &receipt.id,
                    TransactionStatus::Failed,
                    None,
                ) {
                    warn!(
                        "Unable to reconcile failed payment for transaction {}: {}",
                        receipt.id, update_err
                    );
                }
                return Err(err.into());
            }
        };

        self.store.update_transaction_status(
            &receipt.id,
            TransactionStatus::Confirmed,
            Some(&payment.transaction_hash),
        )?;
        self.store
            .update_scholarship_status(scholarship_id, ScholarshipStatus::Completed)?;

        info!(
            "Funded scholarship {} with {} to {} ({})",
            scholarship_id, scholarship.amount, application.applicant_address,
            payment.transaction_hash
        );

        receipt.status = TransactionStatus::Confirmed;
        receipt.transaction_hash = Some(payment.transaction_hash);

        Ok(receipt)
    }
}

fn connected(session: &Session) -> Result<&str, WorkflowError> {
    session.address().ok_or(WorkflowError::NotConnected)
}

fn verified(session: &Session) -> Result<(), WorkflowError> {
    if session.is_verified() {
        Ok(())
    } else {
        Err(WorkflowError::NotVerified)
    }
}
