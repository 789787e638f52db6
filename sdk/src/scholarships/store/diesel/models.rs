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

use std::convert::TryFrom;
use std::time::SystemTime;

use super::schema::*;
use crate::scholarships::store::{
    ApplicationRecord, ScholarshipRecord, ScholarshipStoreError, TransactionRecord, VoteRecord,
};

#[derive(Insertable, Queryable, PartialEq, Debug)]
#[table_name = "scholarships"]
pub struct ScholarshipModel {
    pub id: String,
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub creator_address: String,
    pub status: String,
    pub deadline: SystemTime,
    pub created_at: SystemTime,
}

#[derive(Insertable, Queryable, PartialEq, Debug)]
#[table_name = "applications"]
pub struct ApplicationModel {
    pub id: String,
    pub scholarship_id: String,
    pub applicant_address: String,
    pub status: String,
    pub created_at: SystemTime,
}

#[derive(Insertable, Queryable, PartialEq, Debug)]
#[table_name = "votes"]
pub struct VoteModel {
    pub id: String,
    pub scholarship_id: String,
    pub voter_address: String,
    pub vote_type: bool,
    pub created_at: SystemTime,
}

#[derive(Insertable, Queryable, PartialEq, Debug)]
#[table_name = "transactions"]
pub struct TransactionModel {
    pub id: String,
    pub scholarship_id: String,
    pub application_id: String,
    pub financier_address: String,
    pub recipient_address: String,
    pub amount: f64,
    pub transaction_hash: Option<String>,
    pub status: String,
    pub created_at: SystemTime,
}

impl From<ScholarshipRecord> for ScholarshipModel {
    fn from(record: ScholarshipRecord) -> Self {
        ScholarshipModel {
            id: record.id,
            title: record.title,
            description: record.description,
            amount: record.amount,
            creator_address: record.creator_address,
            status: record.status.as_str().to_string(),
            deadline: record.deadline,
            created_at: record.created_at,
        }
    }
}

impl TryFrom<ScholarshipModel> for ScholarshipRecord {
    type Error = ScholarshipStoreError;

    fn try_from(model: ScholarshipModel) -> Result<Self, Self::Error> {
        Ok(ScholarshipRecord {
            status: model.status.parse().map_err(ScholarshipStoreError::from)?,
            id: model.id,
            title: model.title,
            description: model.description,
            amount: model.amount,
            creator_address: model.creator_address,
            deadline: model.deadline,
            created_at: model.created_at,
        })
    }
}

impl From<ApplicationRecord> for ApplicationModel {
    fn from(record: ApplicationRecord) -> Self {
        ApplicationModel {
            id: record.id,
            scholarship_id: record.scholarship_id,
            applicant_address: record.applicant_address,
            status: record.status.as_str().to_string(),
            created_at: record.created_at,
        }
    }
}

impl TryFrom<ApplicationModel> for ApplicationRecord {
    type Error = ScholarshipStoreError;

    fn try_from(model: ApplicationModel) -> Result<Self, Self::Error> {
        Ok(ApplicationRecord {
            status: model.status.parse().map_err(ScholarshipStoreError::from)?,
            id: model.id,
            scholarship_id: model.scholarship_id,
            applicant_address: model.applicant_address,
            created_at: model.created_at,
        })
    }
}

impl From<VoteRecord> for VoteModel {
    fn from(record: VoteRecord) -> Self {
        VoteModel {
            id: record.id,
            scholarship_id: record.scholarship_id,
            voter_address: record.voter_address,
            vote_type: record.vote_type,
            created_at: record.created_at,
        }
    }
}

impl From<VoteModel> for VoteRecord {
    fn from(model: VoteModel) -> Self {
        VoteRecord {
            id: model.id,
            scholarship_id: model.scholarship_id,
            voter_address: model.voter_address,
            vote_type: model.vote_type,
            created_at: model.created_at,
        }
    }
}

impl From<TransactionRecord> for TransactionModel {
    fn from(record: TransactionRecord) -> Self {
        TransactionModel {
            id: record.id,
            scholarship_id: record.scholarship_id,
            application_id: record.application_id,
            financier_address: record.financier_address,
            recipient_address: record.recipient_address,
            amount: record.amount,
            transaction_hash: record.transaction_hash,
            status: record.status.as_str().to_string(),
            created_at: record.created_at,
        }
    }
}

impl TryFrom<TransactionModel> for TransactionRecord {
    type Error = ScholarshipStoreError;

    fn try_from(model: TransactionModel) -> Result<Self, Self::Error> {
        Ok(TransactionRecord {
            status: model.status.parse().map_err(ScholarshipStoreError::from)?,
            id: model.id,
            scholarship_id: model.scholarship_id,
            application_id: model.application_id,
            financier_address: model.financier_address,
            recipient_address: model.recipient_address,
            amount: model.amount,
            transaction_hash: model.transaction_hash,
            created_at: model.created_at,
        })
    }
}
