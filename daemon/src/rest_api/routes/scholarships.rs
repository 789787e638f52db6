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

use std::time::{Duration, SystemTime};

use actix_web::{error, web, Error, HttpResponse};

use edugrant_sdk::scholarships::store::{ScholarshipStatus, TransactionRecord, TransactionStatus};
use edugrant_sdk::scholarships::Scholarship;
use edugrant_sdk::workflow::WorkflowEngine;

use super::{
    build_session, error_response, get_response_paging_info, ApiApplication, ErrorResponse,
    SuccessResponse, DEFAULT_LIMIT, DEFAULT_OFFSET,
};
use crate::rest_api::{AppState, RestApiResponseError};

#[derive(Debug, Deserialize)]
pub struct ListScholarshipsQuery {
    status: Option<String>,
    active: Option<bool>,
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CreateScholarshipPayload {
    caller_address: Option<String>,
    verified: Option<bool>,
    title: String,
    description: String,
    amount: f64,
    deadline: u64,
}

#[derive(Debug, Deserialize)]
pub struct ApproveScholarshipPayload {
    caller_address: Option<String>,
    verified: Option<bool>,
    recipient_address: String,
}

#[derive(Debug, Deserialize)]
pub struct FundScholarshipPayload {
    caller_address: Option<String>,
    verified: Option<bool>,
    application_id: String,
}

#[derive(Debug, Serialize)]
pub struct ApiTransaction {
    transaction_id: String,
    scholarship_id: String,
    application_id: String,
    financier_address: String,
    recipient_address: String,
    amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_hash: Option<String>,
    status: TransactionStatus,
    created_at: u64,
}

impl ApiTransaction {
    fn from(record: TransactionRecord) -> Self {
        ApiTransaction {
            transaction_id: record.id.to_string(),
            scholarship_id: record.scholarship_id.to_string(),
            application_id: record.application_id.to_string(),
            financier_address: record.financier_address.to_string(),
            recipient_address: record.recipient_address.to_string(),
            amount: record.amount,
            transaction_hash: record.transaction_hash,
            status: record.status,
            created_at: record
                .created_at
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or_else(|_| Duration::new(0, 0))
                .as_secs(),
        }
    }
}

pub async fn list_scholarships(
    state: web::Data<AppState>,
    query: web::Query<ListScholarshipsQuery>,
) -> Result<HttpResponse, Error> {
    let query = query.into_inner();
    let limit = query.limit;
    let offset = query.offset;

    match web::block(move || list_scholarships_from_cache(&state, query)).await {
        Ok((scholarships, query_count)) => {
            let paging_info =
                get_response_paging_info(limit, offset, "/scholarships?", query_count);
            Ok(HttpResponse::Ok().json(SuccessResponse::list(scholarships, paging_info)))
        }
        Err(err) => match err {
            error::BlockingError::Error(err) => Ok(error_response(&err)),
            error::BlockingError::Canceled => {
                debug!("Internal Server Error: {}", err);
                Ok(HttpResponse::InternalServerError().json(ErrorResponse::internal_error()))
            }
        },
    }
}

fn list_scholarships_from_cache(
    state: &AppState,
    query: ListScholarshipsQuery,
) -> Result<(Vec<Scholarship>, usize), RestApiResponseError> {
    let status_filter = match &query.status {
        Some(status) => Some(status.parse::<ScholarshipStatus>().map_err(|_| {
            RestApiResponseError::BadRequest(format!("Invalid status filter: {}", status))
        })?),
        None => None,
    };

    let now = SystemTime::now();
    let scholarships: Vec<Scholarship> = state
        .cache
        .refresh(state.store.as_ref(), false)
        .into_iter()
        .filter(|scholarship| match status_filter {
            Some(status) => scholarship.status == status,
            None => true,
        })
        .filter(|scholarship| match query.active {
            Some(true) => scholarship.is_active(now),
            _ => true,
        })
        .collect();

    let query_count = scholarships.len();
    let page = scholarships
        .into_iter()
        .skip(query.offset.unwrap_or(DEFAULT_OFFSET))
        .take(query.limit.unwrap_or(DEFAULT_LIMIT))
        .collect();

    Ok((page, query_count))
}

pub async fn fetch_scholarship(
    state: web::Data<AppState>,
    scholarship_id: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let scholarship_id = scholarship_id.into_inner();

    match web::block(move || {
        state
            .cache
            .refresh(state.store.as_ref(), false)
            .into_iter()
            .find(|scholarship| scholarship.id == scholarship_id)
            .ok_or_else(|| {
                RestApiResponseError::NotFound(format!(
                    "Scholarship with id {} not found",
                    scholarship_id
                ))
            })
    })
    .await
    {
        Ok(scholarship) => Ok(HttpResponse::Ok().json(SuccessResponse::new(scholarship))),
        Err(err) => match err {
            error::BlockingError::Error(err) => Ok(error_response(&err)),
            error::BlockingError::Canceled => {
                debug!("Internal Server Error: {}", err);
                Ok(HttpResponse::InternalServerError().json(ErrorResponse::internal_error()))
            }
        },
    }
}

pub async fn create_scholarship(
    state: web::Data<AppState>,
    payload: web::Json<CreateScholarshipPayload>,
) -> Result<HttpResponse, Error> {
    let payload = payload.into_inner();

    match web::block(move || {
        let session = build_session(&state, payload.caller_address.clone(), payload.verified);
        let engine = WorkflowEngine::new(state.store.as_ref(), state.wallet.as_ref());
        let deadline = SystemTime::UNIX_EPOCH + Duration::from_secs(payload.deadline);

        let record = engine
            .create_scholarship(
                &session,
                &payload.title,
                &payload.description,
                payload.amount,
                deadline,
            )
            .map_err(RestApiResponseError::from)?;

        state.cache.refresh(state.store.as_ref(), true);

        Ok(Scholarship::build(record, vec![], vec![]))
    })
    .await
    {
        Ok(scholarship) => Ok(HttpResponse::Ok().json(SuccessResponse::new(scholarship))),
        Err(err) => match err {
            error::BlockingError::Error(err) => Ok(error_response(&err)),
            error::BlockingError::Canceled => {
                debug!("Internal Server Error: {}", err);
                Ok(HttpResponse::InternalServerError().json(ErrorResponse::internal_error()))
            }
        },
    }
}

pub async fn approve_scholarship(
    state: web::Data<AppState>,
    scholarship_id: web::Path<String>,
    payload: web::Json<ApproveScholarshipPayload>,
) -> Result<HttpResponse, Error> {
    let scholarship_id = scholarship_id.into_inner();
    let payload = payload.into_inner();

    match web::block(move || {
        let session = build_session(&state, payload.caller_address.clone(), payload.verified);
        let engine = WorkflowEngine::new(state.store.as_ref(), state.wallet.as_ref());

        let application = engine
            .approve(&session, &scholarship_id, &payload.recipient_address)
            .map_err(RestApiResponseError::from)?;

        state.cache.refresh(state.store.as_ref(), true);

        Ok(ApiApplication::from(application))
    })
    .await
    {
        Ok(application) => Ok(HttpResponse::Ok().json(SuccessResponse::new(application))),
        Err(err) => match err {
            error::BlockingError::Error(err) => Ok(error_response(&err)),
            error::BlockingError::Canceled => {
                debug!("Internal Server Error: {}", err);
                Ok(HttpResponse::InternalServerError().json(ErrorResponse::internal_error()))
            }
        },
    }
}

pub async fn fund_scholarship(
    state: web::Data<AppState>,
    scholarship_id: web::Path<String>,
    payload: web::Json<FundScholarshipPayload>,
) -> Result<HttpResponse, Error> {
    let scholarship_id = scholarship_id.into_inner();
    let payload = payload.into_inner();

    match web::block(move || {
        let session = build_session(&state, payload.caller_address.clone(), payload.verified);
        let engine = WorkflowEngine::new(state.store.as_ref(), state.wallet.as_ref());

        let receipt = engine
            .fund(&session, &scholarship_id, &payload.application_id)
            .map_err(RestApiResponseError::from)?;

        state.cache.refresh(state.store.as_ref(), true);

        Ok(ApiTransaction::from(receipt))
    })
    .await
    {
        Ok(transaction) => Ok(HttpResponse::Ok().json(SuccessResponse::new(transaction))),
        Err(err) => match err {
            error::BlockingError::Error(err) => Ok(error_response(&err)),
            error::BlockingError::Canceled => {
                debug!("Internal Server Error: {}", err);
                Ok(HttpResponse::InternalServerError().json(ErrorResponse::internal_error()))
            }
        },
    }
}

pub async fn list_transactions(
    state: web::Data<AppState>,
    scholarship_id: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let scholarship_id = scholarship_id.into_inner();

    match web::block(move || list_transactions_from_store(&state, &scholarship_id)).await {
        Ok(transactions) => Ok(HttpResponse::Ok().json(SuccessResponse::new(transactions))),
        Err(err) => match err {
            error::BlockingError::Error(err) => Ok(error_response(&err)),
            error::BlockingError::Canceled => {
                debug!("Internal Server Error: {}", err);
                Ok(HttpResponse::InternalServerError().json(ErrorResponse::internal_error()))
            }
        },
    }
}

fn list_transactions_from_store(
    state: &AppState,
    scholarship_id: &str,
) -> Result<Vec<ApiTransaction>, RestApiResponseError> {
    if state.store.fetch_scholarship(scholarship_id)?.is_none() {
        return Err(RestApiResponseError::NotFound(format!(
            "Scholarship with id {} not found",
            scholarship_id
        )));
    }

    Ok(state
        .store
        .list_transactions_for_scholarship(scholarship_id)?
        .into_iter()
        .map(ApiTransaction::from)
        .collect())
}
