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

//! Table definitions for the PostgreSQL store.
//!
//! The backing database is expected to declare
//! `UNIQUE (scholarship_id, voter_address)` on `votes` and
//! `UNIQUE (scholarship_id, applicant_address)` on `applications`; the
//! store maps violations of either constraint to
//! `ScholarshipStoreError::ConstraintViolationError`.

table! {
    scholarships (id) {
        id -> Text,
        title -> Text,
        description -> Text,
        amount -> Double,
        creator_address -> Text,
        status -> Text,
        deadline -> Timestamp,
        created_at -> Timestamp,
    }
}

table! {
    applications (id) {
        id -> Text,
        scholarship_id -> Text,
        applicant_address -> Text,
        status -> Text,
        created_at -> Timestamp,
    }
}

table! {
    votes (id) {
        id -> Text,
        scholarship_id -> Text,
        voter_address -> Text,
        vote_type -> Bool,
        created_at -> Timestamp,
    }
}

table! {
    transactions (id) {
        id -> Text,
        scholarship_id -> Text,
        application_id -> Text,
        financier_address -> Text,
        recipient_address -> Text,
        amount -> Double,
        transaction_hash -> Nullable<Text>,
        status -> Text,
        created_at -> Timestamp,
    }
}
