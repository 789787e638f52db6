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

//! Role resolution from a connected wallet address.
//!
//! The role table is two fixed well-known addresses: the government officer
//! and the financier. Any other connected address is a student; a
//! disconnected caller is a regular visitor. Address comparison is
//! case-insensitive; wallet providers do not agree on checksum casing.

use std::fmt;

/// The default government officer address, overridable through
/// [`RoleConfig`].
pub const DEFAULT_GOVERNMENT_ADDRESS: &str = "0x303C226B1b66F07717D35f5E7243028950Eb1ff1";

/// The default financier address, overridable through [`RoleConfig`].
pub const DEFAULT_FINANCIER_ADDRESS: &str = "0x8464135c8F25Da09e49BC8782676a84730C318bC";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Government,
    Financier,
    Student,
    Regular,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::Government => write!(f, "government"),
            Role::Financier => write!(f, "financier"),
            Role::Student => write!(f, "student"),
            Role::Regular => write!(f, "regular"),
        }
    }
}

/// The two well-known addresses that designate the privileged roles.
#[derive(Debug, Clone)]
pub struct RoleConfig {
    government_address: String,
    financier_address: String,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            government_address: DEFAULT_GOVERNMENT_ADDRESS.to_string(),
            financier_address: DEFAULT_FINANCIER_ADDRESS.to_string(),
        }
    }
}

impl RoleConfig {
    pub fn new(government_address: String, financier_address: String) -> Self {
        Self {
            government_address,
            financier_address,
        }
    }

    pub fn government_address(&self) -> &str {
        &self.government_address
    }

    pub fn financier_address(&self) -> &str {
        &self.financier_address
    }
}

/// Resolves a wallet address to its role.
///
/// A missing or empty address resolves to `Regular`; the configured
/// government and financier addresses resolve to their roles regardless of
/// casing; every other address is a `Student`. Pure and total.
pub fn resolve_role(address: Option<&str>, config: &RoleConfig) -> Role {
    match address {
        None => Role::Regular,
        Some(addr) if addr.is_empty() => Role::Regular,
        Some(addr) if addr.eq_ignore_ascii_case(&config.government_address) => Role::Government,
        Some(addr) if addr.eq_ignore_ascii_case(&config.financier_address) => Role::Financier,
        Some(_) => Role::Student,
    }
}

/// The explicit caller context passed into every workflow operation.
///
/// Built once per request from the connected address and the identity
/// verifier's signal; operations never consult ambient wallet state.
#[derive(Debug, Clone)]
pub struct Session {
    address: Option<String>,
    role: Role,
    verified: bool,
}

impl Session {
    pub fn new(address: Option<String>, config: &RoleConfig, verified: bool) -> Self {
        let role = resolve_role(address.as_deref(), config);
        Self {
            address,
            role,
            verified,
        }
    }

    /// The connected address, if any. An empty string is treated as
    /// disconnected.
    pub fn address(&self) -> Option<&str> {
        match self.address.as_deref() {
            Some("") | None => None,
            Some(addr) => Some(addr),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOVERNMENT: &str = "0x303C226B1b66F07717D35f5E7243028950Eb1ff1";
    const FINANCIER: &str = "0x8464135c8F25Da09e49BC8782676a84730C318bC";
    const STUDENT: &str = "0x388175a170a0d8fcb99ff8867c00860fcf95a7cc";

    /// resolve_role() maps a disconnected caller (no address or an empty
    /// address) to the regular role.
    #[test]
    fn test_resolve_disconnected() {
        let config = RoleConfig::default();
        assert_eq!(resolve_role(None, &config), Role::Regular);
        assert_eq!(resolve_role(Some(""), &config), Role::Regular);
    }

    /// resolve_role() maps the configured government and financier addresses
    /// to their roles and any other address to student.
    #[test]
    fn test_resolve_configured_addresses() {
        let config = RoleConfig::default();
        assert_eq!(resolve_role(Some(GOVERNMENT), &config), Role::Government);
        assert_eq!(resolve_role(Some(FINANCIER), &config), Role::Financier);
        assert_eq!(resolve_role(Some(STUDENT), &config), Role::Student);
    }

    /// resolve_role() compares addresses case-insensitively, so the same
    /// address resolves identically regardless of checksum casing.
    #[test]
    fn test_resolve_is_case_insensitive() {
        let config = RoleConfig::default();
        assert_eq!(
            resolve_role(Some(&GOVERNMENT.to_lowercase()), &config),
            Role::Government
        );
        assert_eq!(
            resolve_role(Some(&GOVERNMENT.to_uppercase().replace("0X", "0x")), &config),
            Role::Government
        );
        assert_eq!(
            resolve_role(Some(&FINANCIER.to_lowercase()), &config),
            Role::Financier
        );
    }

    /// resolve_role() is deterministic: repeated calls with the same inputs
    /// return the same role.
    #[test]
    fn test_resolve_is_deterministic() {
        let config = RoleConfig::default();
        let first = resolve_role(Some(STUDENT), &config);
        for _ in 0..10 {
            assert_eq!(resolve_role(Some(STUDENT), &config), first);
        }
    }

    /// Session::new resolves the role once from the supplied address and
    /// reports an empty address as disconnected.
    #[test]
    fn test_session_resolves_role() {
        let config = RoleConfig::default();
        let session = Session::new(Some(GOVERNMENT.to_string()), &config, true);
        assert_eq!(session.role(), Role::Government);
        assert_eq!(session.address(), Some(GOVERNMENT));
        assert!(session.is_verified());

        let disconnected = Session::new(Some(String::new()), &config, false);
        assert_eq!(disconnected.role(), Role::Regular);
        assert_eq!(disconnected.address(), None);
    }
}
