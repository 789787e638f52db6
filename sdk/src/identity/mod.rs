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

//! The identity collaborator: a black box producing a verified flag and
//! the attributes the holder chose to disclose during the zero-knowledge
//! credential flow.

use std::collections::HashMap;

use crate::error::InternalError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisclosedAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_above_18: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationStatus {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclosed: Option<DisclosedAttributes>,
}

pub trait IdentityClient: Send + Sync {
    /// The verification status the credential flow produced for an address.
    /// Unknown addresses are unverified.
    fn verification_status(&self, address: &str) -> Result<VerificationStatus, InternalError>;
}

/// An identity client over a fixed table of verified addresses.
///
/// The credential proof itself is produced in the holder's browser; the
/// daemon only needs the resulting statuses, so deployments load them here
/// and tests set up whichever statuses a scenario needs.
#[derive(Default)]
pub struct StaticIdentityClient {
    statuses: HashMap<String, VerificationStatus>,
}

impl StaticIdentityClient {
    pub fn new() -> Self {
        StaticIdentityClient {
            statuses: HashMap::new(),
        }
    }

    pub fn with_status(mut self, address: &str, status: VerificationStatus) -> Self {
        self.statuses.insert(address.to_lowercase(), status);
        self
    }
}

impl IdentityClient for StaticIdentityClient {
    fn verification_status(&self, address: &str) -> Result<VerificationStatus, InternalError> {
        Ok(self
            .statuses
            .get(&address.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Addresses the client has no status for report as unverified with no
    /// disclosed attributes.
    #[test]
    fn test_unknown_address_is_unverified() {
        let client = StaticIdentityClient::new();
        let status = client.verification_status("0xabc").unwrap();
        assert!(!status.verified);
        assert_eq!(status.disclosed, None);
    }

    /// Statuses are looked up case-insensitively on the address, matching
    /// role resolution.
    #[test]
    fn test_status_lookup_is_case_insensitive() {
        let client = StaticIdentityClient::new().with_status(
            "0xABCDEF",
            VerificationStatus {
                verified: true,
                disclosed: Some(DisclosedAttributes {
                    age_above_18: Some(true),
                    state: Some("Karnataka".to_string()),
                    pin_code: None,
                }),
            },
        );

        let status = client.verification_status("0xabcdef").unwrap();
        assert!(status.verified);
        assert_eq!(
            status.disclosed.and_then(|d| d.state),
            Some("Karnataka".to_string())
        );
    }
}
