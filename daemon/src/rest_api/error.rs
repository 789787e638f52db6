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

use edugrant_sdk::scholarships::store::ScholarshipStoreError;
use edugrant_sdk::workflow::WorkflowError;

#[derive(Debug)]
pub enum RestApiServerError {
    StartUpError(String),
    StdError(std::io::Error),
}

impl Error for RestApiServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RestApiServerError::StartUpError(_) => None,
            RestApiServerError::StdError(err) => Some(err),
        }
    }
}

impl fmt::Display for RestApiServerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RestApiServerError::StartUpError(e) => write!(f, "Start-up Error: {}", e),
            RestApiServerError::StdError(e) => write!(f, "Std Error: {}", e),
        }
    }
}

impl From<std::io::Error> for RestApiServerError {
    fn from(err: std::io::Error) -> RestApiServerError {
        RestApiServerError::StdError(err)
    }
}

/// A request failure, carrying only the strings the response needs so it
/// can cross the blocking-pool boundary.
#[derive(Debug)]
pub enum RestApiResponseError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    BadGateway(String),
    ServiceUnavailable(String),
    InternalError(String),
}

impl Error for RestApiResponseError {}

impl fmt::Display for RestApiResponseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RestApiResponseError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            RestApiResponseError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            RestApiResponseError::NotFound(msg) => write!(f, "Not found: {}", msg),
            RestApiResponseError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            RestApiResponseError::BadGateway(msg) => write!(f, "Bad gateway: {}", msg),
            RestApiResponseError::ServiceUnavailable(msg) => {
                write!(f, "Service unavailable: {}", msg)
            }
            RestApiResponseError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl From<WorkflowError> for RestApiResponseError {
    fn from(err: WorkflowError) -> Self {
        match &err {
            WorkflowError::NotConnected
            | WorkflowError::NotVerified
            | WorkflowError::ValidationError(_) => {
                RestApiResponseError::BadRequest(err.to_string())
            }
            WorkflowError::NotAuthorized(_) => RestApiResponseError::Unauthorized(err.to_string()),
            WorkflowError::NotFound(_) => RestApiResponseError::NotFound(err.to_string()),
            WorkflowError::InvalidState(_) | WorkflowError::AlreadyDone(_) => {
                RestApiResponseError::Conflict(err.to_string())
            }
            WorkflowError::WalletUnavailable(_)
            | WorkflowError::PaymentRejected(_)
            | WorkflowError::PaymentFailed(_) => RestApiResponseError::BadGateway(err.to_string()),
            WorkflowError::BackendUnavailable(_) => {
                RestApiResponseError::ServiceUnavailable(err.to_string())
            }
        }
    }
}

impl From<ScholarshipStoreError> for RestApiResponseError {
    fn from(err: ScholarshipStoreError) -> Self {
        match err {
            ScholarshipStoreError::ConstraintViolationError(msg) => {
                RestApiResponseError::Conflict(msg)
            }
            ScholarshipStoreError::NotFoundError(msg) => RestApiResponseError::NotFound(msg),
            ScholarshipStoreError::InternalError(err) => {
                RestApiResponseError::ServiceUnavailable(err.to_string())
            }
        }
    }
}
