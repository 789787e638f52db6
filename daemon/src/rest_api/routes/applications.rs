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

use edugrant_sdk::scholarships::store::{ApplicationRecord, ApplicationStatus};
use edugrant_sdk::workflow::WorkflowEngine;

use super::{build_session, error_response, ErrorResponse, SuccessResponse};
use crate::rest_api::{AppState, RestApiResponseError};

#[derive(Debug, Deserialize)]
pub struct ApplyPayload {
    caller_address: Option<String>,
    verified: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListApplicationsQuery {
    applicant: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiApplication {
    application_id: String,
    scholarship_id: String,
    applicant_address: String,
    status: ApplicationStatus,
    created_at: u64,
}

impl ApiApplication {
    pub fn from(record: ApplicationRecord) -> Self {
        ApiApplication {
            application_id: record.id.to_string(),
            scholarship_id: record.scholarship_id.to_string(),
            applicant_address: record.applicant_address.to_string(),
            status: record.status,
            created_at: record
                .created_at
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or_else(|_| Duration::new(0, 0))
                .as_secs(),
        }
    }
}

pub async fn apply(
    state: web::Data<AppState>,
    scholarship_id: web::Path<String>,
    payload: web::Json<ApplyPayload>,
) -> Result<HttpResponse, Error> {
    let scholarship_id = scholarship_id.into_inner();
    let payload = payload.into_inner();

    match web::block(move || {
        let session = build_session(&state, payload.caller_address.clone(), payload.verified);
        let engine = WorkflowEngine::new(state.store.as_ref(), state.wallet.as_ref());

        let application = engine
            .apply(&session, &scholarship_id)
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

pub async fn list_applications(
    state: web::Data<AppState>,
    query: web::Query<ListApplicationsQuery>,
) -> Result<HttpResponse, Error> {
    let query = query.into_inner();

    match web::block(move || {
        let applicant = query.applicant.as_deref().ok_or_else(|| {
            RestApiResponseError::BadRequest(
                "An applicant address query parameter is required".to_string(),
            )
        })?;

        Ok(state
            .store
            .list_applications_for_applicant(applicant)?
            .into_iter()
            .map(ApiApplication::from)
            .collect::<Vec<_>>())
    })
    .await
    {
        Ok(applications) => Ok(HttpResponse::Ok().json(SuccessResponse::new(applications))),
        Err(err) => match err {
            error::BlockingError::Error(err) => Ok(error_response(&err)),
            error::BlockingError::Canceled => {
                debug!("Internal Server Error: {}", err);
                Ok(HttpResponse::InternalServerError().json(ErrorResponse::internal_error()))
            }
        },
    }
}
