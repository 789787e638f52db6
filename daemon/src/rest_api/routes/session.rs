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

use actix_web::{error, web, Error, HttpResponse};

use edugrant_sdk::identity::VerificationStatus;
use edugrant_sdk::roles::{resolve_role, Role};

use super::{error_response, ErrorResponse, SuccessResponse};
use crate::rest_api::{AppState, RestApiResponseError};

#[derive(Debug, Serialize)]
pub struct ApiSession {
    address: String,
    role: Role,
    verification: VerificationStatus,
}

/// Resolves the role and verification status for an address so the
/// front-end can pick the dashboard to render.
pub async fn fetch_session(
    state: web::Data<AppState>,
    address: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let address = address.into_inner();

    match web::block(move || {
        let role = resolve_role(Some(&address), &state.role_config);
        let verification = state
            .identity
            .verification_status(&address)
            .map_err(|err| RestApiResponseError::InternalError(err.to_string()))?;

        Ok(ApiSession {
            address,
            role,
            verification,
        })
    })
    .await
    {
        Ok(session) => Ok(HttpResponse::Ok().json(SuccessResponse::new(session))),
        Err(err) => match err {
            error::BlockingError::Error(err) => Ok(error_response(&err)),
            error::BlockingError::Canceled => {
                debug!("Internal Server Error: {}", err);
                Ok(HttpResponse::InternalServerError().json(ErrorResponse::internal_error()))
            }
        },
    }
}
