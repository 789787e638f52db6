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

mod applications;
mod scholarships;
mod session;
mod votes;

pub use applications::*;
pub use scholarships::*;
pub use session::*;
pub use votes::*;

use actix_web::HttpResponse;
use serde::Serialize;

use edugrant_sdk::roles::Session;

use crate::rest_api::{AppState, RestApiResponseError};

pub const DEFAULT_LIMIT: usize = 100;
pub const DEFAULT_OFFSET: usize = 0;

#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    paging: Option<Paging>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> SuccessResponse<T> {
        SuccessResponse { data, paging: None }
    }

    pub fn list(data: T, paging: Paging) -> SuccessResponse<T> {
        SuccessResponse {
            data,
            paging: Some(paging),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    code: String,
    message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: &str) -> ErrorResponse {
        ErrorResponse {
            code: "400".to_string(),
            message: message.to_string(),
        }
    }

    pub fn unauthorized(message: &str) -> ErrorResponse {
        ErrorResponse {
            code: "401".to_string(),
            message: message.to_string(),
        }
    }

    pub fn not_found(message: &str) -> ErrorResponse {
        ErrorResponse {
            code: "404".to_string(),
            message: message.to_string(),
        }
    }

    pub fn conflict(message: &str) -> ErrorResponse {
        ErrorResponse {
            code: "409".to_string(),
            message: message.to_string(),
        }
    }

    pub fn bad_gateway(message: &str) -> ErrorResponse {
        ErrorResponse {
            code: "502".to_string(),
            message: message.to_string(),
        }
    }

    pub fn service_unavailable(message: &str) -> ErrorResponse {
        ErrorResponse {
            code: "503".to_string(),
            message: message.to_string(),
        }
    }

    pub fn internal_error() -> ErrorResponse {
        ErrorResponse {
            code: "500".to_string(),
            message: "The server encountered an error".to_string(),
        }
    }
}

/// Renders a response failure with the status the taxonomy maps to.
pub fn error_response(err: &RestApiResponseError) -> HttpResponse {
    match err {
        RestApiResponseError::BadRequest(msg) => {
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(msg))
        }
        RestApiResponseError::Unauthorized(msg) => {
            HttpResponse::Unauthorized().json(ErrorResponse::unauthorized(msg))
        }
        RestApiResponseError::NotFound(msg) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found(msg))
        }
        RestApiResponseError::Conflict(msg) => {
            HttpResponse::Conflict().json(ErrorResponse::conflict(msg))
        }
        RestApiResponseError::BadGateway(msg) => {
            HttpResponse::BadGateway().json(ErrorResponse::bad_gateway(msg))
        }
        RestApiResponseError::ServiceUnavailable(msg) => {
            HttpResponse::ServiceUnavailable().json(ErrorResponse::service_unavailable(msg))
        }
        RestApiResponseError::InternalError(_) => {
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error())
        }
    }
}

/// Builds the caller's session from the payload's address and verification
/// flag, consulting the identity collaborator when the flag is absent.
pub fn build_session(
    state: &AppState,
    caller_address: Option<String>,
    verified: Option<bool>,
) -> Session {
    let verified = match (verified, caller_address.as_deref()) {
        (Some(verified), _) => verified,
        (None, Some(address)) => state
            .identity
            .verification_status(address)
            .map(|status| status.verified)
            .unwrap_or(false),
        (None, None) => false,
    };

    Session::new(caller_address, &state.role_config, verified)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Paging {
    current: String,
    offset: usize,
    limit: usize,
    total: usize,
    first: String,
    prev: String,
    next: String,
    last: String,
}

pub fn get_response_paging_info(
    limit: Option<usize>,
    offset: Option<usize>,
    link: &str,
    query_count: usize,
) -> Paging {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    let offset = offset.unwrap_or(DEFAULT_OFFSET);

    let base_link = {
        // if the link does not already contain ? add it to the end
        if !link.contains('?') {
            format!("{}?limit={}&", link, limit)
        } else {
            format!("{}limit={}&", link, limit)
        }
    };

    let current_link = format!("{}offset={}", base_link, offset);

    let first_link = format!("{}offset=0", base_link);

    let previous_offset = if offset > limit { offset - limit } else { 0 };

    let previous_link = format!("{}offset={}", base_link, previous_offset);

    let last_offset = if query_count > 0 {
        ((query_count - 1) / limit) * limit
    } else {
        0
    };
    let last_link = format!("{}offset={}", base_link, last_offset);

    let next_offset = if offset + limit > last_offset {
        last_offset
    } else {
        offset + limit
    };

    let next_link = format!("{}offset={}", base_link, next_offset);

    Paging {
        current: current_link,
        offset,
        limit,
        total: query_count,
        first: first_link,
        prev: previous_link,
        next: next_link,
        last: last_link,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_LINK: &str = "/scholarships?";

    /// Paging from the default limit and offset over a 1000-row result.
    #[test]
    fn test_default_paging_response() {
        let test_paging_response = get_response_paging_info(None, None, TEST_LINK, 1000);
        let generated_paging_response =
            create_test_paging_response(DEFAULT_OFFSET, DEFAULT_LIMIT, 100, 0, 900);
        assert_eq!(test_paging_response, generated_paging_response);
    }

    /// Paging from an offset near the end of the result clamps the next
    /// link to the last page.
    #[test]
    fn test_950offset_paging_response() {
        let test_paging_response = get_response_paging_info(None, Some(950), TEST_LINK, 1000);
        let generated_paging_response =
            create_test_paging_response(950, DEFAULT_LIMIT, 900, 850, 900);
        assert_eq!(test_paging_response, generated_paging_response);
    }

    /// Paging with a custom limit and offset.
    #[test]
    fn test_50limit_150offset_paging_response() {
        let test_paging_response = get_response_paging_info(Some(50), Some(150), TEST_LINK, 1000);
        let generated_paging_response = create_test_paging_response(150, 50, 200, 100, 950);
        assert_eq!(test_paging_response, generated_paging_response);
    }

    fn create_test_paging_response(
        offset: usize,
        limit: usize,
        next_offset: usize,
        previous_offset: usize,
        last_offset: usize,
    ) -> Paging {
        let base_link = format!("{}limit={}&", TEST_LINK, limit);
        let current_link = format!("{}offset={}", base_link, offset);
        let first_link = format!("{}offset=0", base_link);
        let next_link = format!("{}offset={}", base_link, next_offset);
        let previous_link = format!("{}offset={}", base_link, previous_offset);
        let last_link = format!("{}offset={}", base_link, last_offset);

        Paging {
            current: current_link,
            offset,
            limit,
            total: 1000,
            first: first_link,
            prev: previous_link,
            next: next_link,
            last: last_link,
        }
    }
}
