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

//! The wallet collaborator: the connected account, the network identity,
//! and the native-currency payment used by the funding step.
//!
//! A user declining the payment prompt is surfaced as
//! [`PaymentError::Rejected`], distinct from every other payment failure,
//! so the funding workflow can report it separately.

#[cfg(feature = "client-reqwest")]
pub mod reqwest;

use std::error::Error;
use std::fmt;

/// The EIP-1193 code a provider returns when the user declines a request.
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// The provider code for a chain the wallet does not know yet; the client
/// responds by asking the provider to add it.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

const WEI_PER_UNIT: f64 = 1e18;

#[derive(Debug)]
pub enum PaymentError {
    /// No wallet provider could be reached.
    Unavailable(String),
    /// The user declined the payment prompt.
    Rejected(String),
    /// Any other submission failure.
    Failed(String),
}

impl Error for PaymentError {}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PaymentError::Unavailable(msg) => write!(f, "Wallet unavailable: {}", msg),
            PaymentError::Rejected(msg) => write!(f, "Payment rejected: {}", msg),
            PaymentError::Failed(msg) => write!(f, "Payment failed: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub transaction_hash: String,
}

/// The network the funding step expects the wallet provider to be on.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub chain_name: String,
    pub currency_name: String,
    pub currency_symbol: String,
    pub currency_decimals: u32,
    pub rpc_url: String,
    pub block_explorer_url: String,
}

impl NetworkConfig {
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }
}

/// The EDU Chain testnet, the network the original deployment funds on.
pub fn educhain_testnet() -> NetworkConfig {
    NetworkConfig {
        chain_id: 656_476,
        chain_name: "EDU Chain Testnet".to_string(),
        currency_name: "EduChain Ether".to_string(),
        currency_symbol: "EDU".to_string(),
        currency_decimals: 18,
        rpc_url: "https://open-campus-codex-sepolia.drpc.org".to_string(),
        block_explorer_url: "https://opencampus-codex.blockscout.com/".to_string(),
    }
}

pub trait WalletClient: Send + Sync {
    /// The currently connected account address, if any.
    fn connected_address(&self) -> Result<Option<String>, PaymentError>;

    /// Prompts the provider to connect an account and returns the selected
    /// address.
    fn request_connect(&self) -> Result<String, PaymentError>;

    /// The chain id the provider is currently on.
    fn chain_id(&self) -> Result<u64, PaymentError>;

    /// Verifies the provider is on the expected network, prompting it to
    /// switch (or add the chain) if not.
    fn ensure_network(&self, network: &NetworkConfig) -> Result<(), PaymentError>;

    /// Sends `amount` native units to `to_address` and waits for the
    /// provider to return the transaction hash.
    fn send_payment(&self, to_address: &str, amount: f64) -> Result<PaymentReceipt, PaymentError>;
}

/// Converts a native-unit amount to the 0x-prefixed wei value string the
/// provider expects.
pub fn amount_to_wei_hex(amount: f64) -> Result<String, PaymentError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(PaymentError::Failed(format!(
            "Invalid payment amount: {}",
            amount
        )));
    }

    let wei = (amount * WEI_PER_UNIT).round();
    if wei > u128::max_value() as f64 {
        return Err(PaymentError::Failed(format!(
            "Payment amount out of range: {}",
            amount
        )));
    }

    Ok(format!("{:#x}", wei as u128))
}

/// Maps a provider error object to the payment failure taxonomy.
pub fn classify_provider_error(code: i64, message: &str) -> PaymentError {
    if code == USER_REJECTED_REQUEST {
        PaymentError::Rejected(message.to_string())
    } else {
        PaymentError::Failed(format!("{} (code {})", message, code))
    }
}
