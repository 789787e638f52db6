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

use crate::error::InternalError;

/// Represents ScholarshipStore errors
#[derive(Debug)]
pub enum ScholarshipStoreError {
    InternalError(InternalError),
    /// A store-enforced uniqueness constraint was violated by the write.
    ConstraintViolationError(String),
    /// The record targeted by an update does not exist.
    NotFoundError(String),
}

impl Error for ScholarshipStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScholarshipStoreError::InternalError(err) => Some(err),
            ScholarshipStoreError::ConstraintViolationError(_) => None,
            ScholarshipStoreError::NotFoundError(_) => None,
        }
    }
}

impl fmt::Display for ScholarshipStoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScholarshipStoreError::InternalError(err) => write!(f, "{}", err),
            ScholarshipStoreError::ConstraintViolationError(msg) => {
                write!(f, "Constraint violation: {}", msg)
            }
            ScholarshipStoreError::NotFoundError(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl From<InternalError> for ScholarshipStoreError {
    fn from(err: InternalError) -> Self {
        ScholarshipStoreError::InternalError(err)
    }
}
