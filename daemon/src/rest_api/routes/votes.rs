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

use edugrant_sdk::scholarships::store::VoteRecord;
use edugrant_sdk::workflow::WorkflowEngine;

use super::{build_session, error_response, ErrorResponse, SuccessResponse};
use crate::rest_api::{AppState, RestApiResponseError};

#[derive(Debug, Deserialize)]
pub struct VotePayload {
    caller_address: Option<String>,
    verified: Option<bool>,
    vote_for: bool,
}

#[derive(Debug, Serialize)]
pub struct ApiVote {
    vote_id: String,
    scholarship_id: String,
    voter_address: String,
    vote_type: bool,
    created_at: u64,
}

impl ApiVote {
    fn from(record: VoteRecord) -> Self {
        ApiVote {
            vote_id: record.id.to_string(),
            scholarship_id: record.scholarship_id.to_string(),
            voter_address: record.voter_address.to_string(),
            vote_type: record.vote_type,
            created_at: record
                .created_at
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or_else(|_| Duration::new(0, 0))
                .as_secs(),
        }
    }
}

pub async fn vote(
    state: web::Data<AppState>,
    scholarship_id: web::Path<String>,
    payload: web::Json<VotePayload>,
) -> Result<HttpResponse, Error> {
    let scholarship_id = scholarship_id.into_inner();
    let payload = payload.into_inner();

    match web::block(move || {
        let session = build_session(&state, payload.caller_address.clone(), payload.verified);
        let engine = WorkflowEngine::new(state.store.as_ref(), state.wallet.as_ref());

        let vote = engine
            .vote(&session, &scholarship_id, payload.vote_for)
            .map_err(RestApiResponseError::from)?;

        state.cache.refresh(state.store.as_ref(), true);

        Ok(ApiVote::from(vote))
    })
    .await
    {
        Ok(vote) => Ok(HttpResponse::Ok().json(SuccessResponse::new(vote))),
        Err(err) => match err {
            error::BlockingError::Error(err) => Ok(error_response(&err)),
            error::BlockingError::Canceled => {
                debug!("Internal Server Error: {}", err);
                Ok(HttpResponse::InternalServerError().json(ErrorResponse::internal_error()))
            }
        },
    }
}
