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

//! A PostgreSQL-backed implementation of the scholarship store.

pub mod models;
pub mod schema;

use std::convert::TryFrom;
use std::time::SystemTime;

use diesel::{
    dsl::insert_into,
    pg::PgConnection,
    prelude::*,
    r2d2::{ConnectionManager, Pool, PooledConnection},
    result::{DatabaseErrorKind, Error as DieselError},
};
use uuid::Uuid;

use crate::error::InternalError;
use crate::scholarships::store::{
    ApplicationRecord, ApplicationStatus, NewApplicationRecord, NewScholarshipRecord,
    NewTransactionRecord, NewVoteRecord, ScholarshipRecord, ScholarshipStatus, ScholarshipStore,
    ScholarshipStoreError, TransactionRecord, TransactionStatus, VoteRecord,
};

use models::{ApplicationModel, ScholarshipModel, TransactionModel, VoteModel};
use schema::{applications, scholarships, transactions, votes};

#[derive(Clone)]
pub struct PgScholarshipStore {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl PgScholarshipStore {
    pub fn new(database_url: &str) -> Result<Self, InternalError> {
        let connection_manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder().build(connection_manager).map_err(|err| {
            InternalError::from_source_with_prefix(
                Box::new(err),
                "Failed to build connection pool".to_string(),
            )
        })?;
        Ok(PgScholarshipStore { pool })
    }

    pub fn new_with_pool(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        PgScholarshipStore { pool }
    }

    fn connection(
        &self,
    ) -> Result<PooledConnection<ConnectionManager<PgConnection>>, ScholarshipStoreError> {
        self.pool.get().map_err(|err| {
            ScholarshipStoreError::InternalError(InternalError::from_source_with_prefix(
                Box::new(err),
                "Failed to get connection from pool".to_string(),
            ))
        })
    }
}

fn map_diesel_error(err: DieselError) -> ScholarshipStoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            ScholarshipStoreError::ConstraintViolationError(info.message().to_string())
        }
        err => ScholarshipStoreError::InternalError(InternalError::from_source(Box::new(err))),
    }
}

impl ScholarshipStore for PgScholarshipStore {
    fn add_scholarship(
        &self,
        scholarship: NewScholarshipRecord,
    ) -> Result<ScholarshipRecord, ScholarshipStoreError> {
        let conn = self.connection()?;

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

        insert_into(scholarships::table)
            .values(ScholarshipModel::from(record.clone()))
            .execute(&*conn)
            .map_err(map_diesel_error)?;

        Ok(record)
    }

    fn list_scholarships(&self) -> Result<Vec<ScholarshipRecord>, ScholarshipStoreError> {
        let conn = self.connection()?;

        scholarships::table
            .load::<ScholarshipModel>(&*conn)
            .map_err(map_diesel_error)?
            .into_iter()
            .map(ScholarshipRecord::try_from)
            .collect()
    }

    fn fetch_scholarship(
        &self,
        scholarship_id: &str,
    ) -> Result<Option<ScholarshipRecord>, ScholarshipStoreError> {
        let conn = self.connection()?;

        scholarships::table
            .filter(scholarships::id.eq(scholarship_id))
            .first::<ScholarshipModel>(&*conn)
            .map(Some)
            .or_else(|err| {
                if err == DieselError::NotFound {
                    Ok(None)
                } else {
                    Err(err)
                }
            })
            .map_err(map_diesel_error)?
            .map(ScholarshipRecord::try_from)
            .transpose()
    }

    fn update_scholarship_status(
        &self,
        scholarship_id: &str,
        status: ScholarshipStatus,
    ) -> Result<(), ScholarshipStoreError> {
        let conn = self.connection()?;

        let updated = diesel::update(scholarships::table.find(scholarship_id))
            .set(scholarships::status.eq(status.as_str()))
            .execute(&*conn)
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(ScholarshipStoreError::NotFoundError(format!(
                "Scholarship with id {} not found",
                scholarship_id
            )));
        }

        Ok(())
    }

    fn add_application(
        &self,
        application: NewApplicationRecord,
    ) -> Result<ApplicationRecord, ScholarshipStoreError> {
        let conn = self.connection()?;

        let record = ApplicationRecord {
            id: Uuid::new_v4().to_string(),
            scholarship_id: application.scholarship_id,
            applicant_address: application.applicant_address,
            status: application.status,
            created_at: SystemTime::now(),
        };

        insert_into(applications::table)
            .values(ApplicationModel::from(record.clone()))
            .execute(&*conn)
            .map_err(map_diesel_error)?;

        Ok(record)
    }

    fn list_applications(&self) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError> {
        let conn = self.connection()?;

        applications::table
            .load::<ApplicationModel>(&*conn)
            .map_err(map_diesel_error)?
            .into_iter()
            .map(ApplicationRecord::try_from)
            .collect()
    }

    fn list_applications_for_scholarship(
        &self,
        scholarship_id: &str,
    ) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError> {
        let conn = self.connection()?;

        applications::table
            .filter(applications::scholarship_id.eq(scholarship_id))
            .load::<ApplicationModel>(&*conn)
            .map_err(map_diesel_error)?
            .into_iter()
            .map(ApplicationRecord::try_from)
            .collect()
    }

    fn list_applications_for_applicant(
        &self,
        applicant_address: &str,
    ) -> Result<Vec<ApplicationRecord>, ScholarshipStoreError> {
        let conn = self.connection()?;

        applications::table
            .filter(applications::applicant_address.eq(applicant_address))
            .load::<ApplicationModel>(&*conn)
            .map_err(map_diesel_error)?
            .into_iter()
            .map(ApplicationRecord::try_from)
            .collect()
    }

    fn fetch_application(
        &self,
        application_id: &str,
    ) -> Result<Option<ApplicationRecord>, ScholarshipStoreError> {
        let conn = self.connection()?;

        applications::table
            .filter(applications::id.eq(application_id))
            .first::<ApplicationModel>(&*conn)
            .map(Some)
            .or_else(|err| {
                if err == DieselError::NotFound {
                    Ok(None)
                } else {
                    Err(err)
                }
            })
            .map_err(map_diesel_error)?
            .map(ApplicationRecord::try_from)
            .transpose()
    }

    fn update_application_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> Result<(), ScholarshipStoreError> {
        let conn = self.connection()?;

        let updated = diesel::update(applications::table.find(application_id))
            .set(applications::status.eq(status.as_str()))
            .execute(&*conn)
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(ScholarshipStoreError::NotFoundError(format!(
                "Application with id {} not found",
                application_id
            )));
        }

        Ok(())
    }

    fn add_vote(&self, vote: NewVoteRecord) -> Result<VoteRecord, ScholarshipStoreError> {
        let conn = self.connection()?;

        let record = VoteRecord {
            id: Uuid::new_v4().to_string(),
            scholarship_id: vote.scholarship_id,
            voter_address: vote.voter_address,
            vote_type: vote.vote_type,
            created_at: SystemTime::now(),
        };

        insert_into(votes::table)
            .values(VoteModel::from(record.clone()))
            .execute(&*conn)
            .map_err(map_diesel_error)?;

        Ok(record)
    }

    fn list_votes(&self) -> Result<Vec<VoteRecord>, ScholarshipStoreError> {
        let conn = self.connection()?;

        Ok(votes::table
            .load::<VoteModel>(&*conn)
            .map_err(map_diesel_error)?
            .into_iter()
            .map(VoteRecord::from)
            .collect())
    }

    fn fetch_vote(
        &self,
        scholarship_id: &str,
        voter_address: &str,
    ) -> Result<Option<VoteRecord>, ScholarshipStoreError> {
        let conn = self.connection()?;

        Ok(votes::table
            .filter(
                votes::scholarship_id
                    .eq(scholarship_id)
                    .and(votes::voter_address.eq(voter_address)),
            )
            .first::<VoteModel>(&*conn)
            .map(Some)
            .or_else(|err| {
                if err == DieselError::NotFound {
                    Ok(None)
                } else {
                    Err(err)
                }
            })
            .map_err(map_diesel_error)?
            .map(VoteRecord::from))
    }

    fn add_transaction(
        &self,
        transaction: NewTransactionRecord,
    ) -> Result<TransactionRecord, ScholarshipStoreError> {
        let conn = self.connection()?;

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

        insert_into(transactions::table)
            .values(TransactionModel::from(record.clone()))
            .execute(&*conn)
            .map_err(map_diesel_error)?;

        Ok(record)
    }

    fn list_transactions_for_scholarship(
        &self,
        scholarship_id: &str,
    ) -> Result<Vec<TransactionRecord>, ScholarshipStoreError> {
        let conn = self.connection()?;

        transactions::table
            .filter(transactions::scholarship_id.eq(scholarship_id))
            .load::<TransactionModel>(&*conn)
            .map_err(map_diesel_error)?
            .into_iter()
            .map(TransactionRecord::try_from)
            .collect()
    }

    fn update_transaction_status(
        &self,
        transaction_id: &str,
        status: TransactionStatus,
        transaction_hash: Option<&str>,
    ) -> Result<(), ScholarshipStoreError> {
        let conn = self.connection()?;

        let updated = match transaction_hash {
            Some(hash) => diesel::update(transactions::table.find(transaction_id))
                .set((
                    transactions::status.eq(status.as_str()),
                    transactions::transaction_hash.eq(hash),
                ))
                .execute(&*conn)
                .map_err(map_diesel_error)?,
            None => diesel::update(transactions::table.find(transaction_id))
                .set(transactions::status.eq(status.as_str()))
                .execute(&*conn)
                .map_err(map_diesel_error)?,
        };

        if updated == 0 {
            return Err(ScholarshipStoreError::NotFoundError(format!(
                "Transaction with id {} not found",
                transaction_id
            )));
        }

        Ok(())
    }
}
