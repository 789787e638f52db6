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

use std::error::Error;
use std::fmt;

use crate::scholarships::store::ScholarshipStoreError;
use crate::wallet::PaymentError;

/// The failure taxonomy every workflow operation reports.
///
/// Collaborator errors are translated into these variants at the engine
/// boundary; none of them should crash a caller. `AlreadyDone` is a benign
/// outcome rather than a hard failure.
#[derive(Debug)]
pub enum WorkflowError {
    NotConnected,
    NotVerified,
    NotAuthorized(String),
    ValidationError(String),
    InvalidState(String),
    AlreadyDone(String),
    NotFound(String),
    WalletUnavailable(String),
    PaymentRejected(String),
    PaymentFailed(String),
    BackendUnavailable(String),
}

impl Error for WorkflowError {}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WorkflowError::NotConnected => write!(f, "Please connect your wallet first"),
            WorkflowError::NotVerified => write!(f, "Please verify your identity first"),
            WorkflowError::NotAuthorized(msg) => write!(f, "{}", msg),
            WorkflowError::ValidationError(msg) => write!(f, "{}", msg),
            WorkflowError::InvalidState(msg) => write!(f, "{}", msg),
            WorkflowError::AlreadyDone(msg) => write!(f, "{}", msg),
            WorkflowError::NotFound(msg) => write!(f, "{}", msg),
            WorkflowError::WalletUnavailable(msg) => write!(f, "Wallet unavailable: {}", msg),
            WorkflowError::PaymentRejected(msg) => write!(f, "Payment rejected: {}", msg),
            WorkflowError::PaymentFailed(msg) => write!(f, "Payment failed: {}", msg),
            WorkflowError::BackendUnavailable(msg) => write!(f, "Backend unavailable: {}", msg),
        }
    }
}

impl From<ScholarshipStoreError> for WorkflowError {
    fn from(err: ScholarshipStoreError) -> Self {
        match err {
            // The store's uniqueness constraints back the duplicate checks
            // for vote and apply, so a violation is the AlreadyDone outcome.
            ScholarshipStoreError::ConstraintViolationError(msg) => {
                WorkflowError::AlreadyDone(msg)
            }
            ScholarshipStoreError::NotFoundError(msg) => WorkflowError::NotFound(msg),
            ScholarshipStoreError::InternalError(err) => {
                WorkflowError::BackendUnavailable(err.to_string())
            }
        }
    }
}

impl From<PaymentError> for WorkflowError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Unavailable(msg) => WorkflowError::WalletUnavailable(msg),
            PaymentError::Rejected(msg) => WorkflowError::PaymentRejected(msg),
            PaymentError::Failed(msg) => WorkflowError::PaymentFailed(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A store constraint violation maps to the benign AlreadyDone outcome,
    /// closing the check-then-insert race at the store layer.
    #[test]
    fn test_constraint_violation_maps_to_already_done() {
        let err = WorkflowError::from(ScholarshipStoreError::ConstraintViolationError(
            "duplicate vote".to_string(),
        ));
        match err {
            WorkflowError::AlreadyDone(_) => (),
            err => panic!("Expected AlreadyDone, got {:?}", err),
        }
    }

    /// Payment errors map onto the wallet branch of the taxonomy with the
    /// user-rejection case kept distinct.
    #[test]
    fn test_payment_error_mapping() {
        match WorkflowError::from(PaymentError::Rejected("declined".to_string())) {
            WorkflowError::PaymentRejected(_) => (),
            err => panic!("Expected PaymentRejected, got {:?}", err),
        }
        match WorkflowError::from(PaymentError::Unavailable("no provider".to_string())) {
            WorkflowError::WalletUnavailable(_) => (),
            err => panic!("Expected WalletUnavailable, got {:?}", err),
        }
        match WorkflowError::from(PaymentError::Failed("reverted".to_string())) {
            WorkflowError::PaymentFailed(_) => (),
            err => panic!("Expected PaymentFailed, got {:?}", err),
        }
    }
}
