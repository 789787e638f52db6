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

//! A reqwest-backed wallet client speaking the provider's JSON-RPC
//! protocol (EIP-1193 request shapes over HTTP).

use reqwest::blocking::Client;
use serde_json::{json, Value};

use crate::wallet::{
    amount_to_wei_hex, classify_provider_error, NetworkConfig, PaymentError, PaymentReceipt,
    WalletClient, UNRECOGNIZED_CHAIN,
};

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

enum RpcError {
    Transport(String),
    Provider { code: i64, message: String },
    Protocol(String),
}

impl RpcError {
    fn into_payment_error(self) -> PaymentError {
        match self {
            RpcError::Transport(msg) => PaymentError::Unavailable(msg),
            RpcError::Provider { code, message } => classify_provider_error(code, &message),
            RpcError::Protocol(msg) => PaymentError::Failed(msg),
        }
    }
}

pub struct ReqwestWalletClient {
    url: String,
    client: Client,
}

impl ReqwestWalletClient {
    pub fn new(url: String) -> Self {
        ReqwestWalletClient {
            url,
            client: Client::new(),
        }
    }

    fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|err| {
                RpcError::Transport(format!("Wallet provider is unreachable: {}", err))
            })?;

        let rpc: JsonRpcResponse = response.json().map_err(|err| {
            RpcError::Protocol(format!("Invalid response from wallet provider: {}", err))
        })?;

        if let Some(error) = rpc.error {
            return Err(RpcError::Provider {
                code: error.code,
                message: error.message,
            });
        }

        rpc.result.ok_or_else(|| {
            RpcError::Protocol(format!(
                "Wallet provider returned no result for {}",
                method
            ))
        })
    }
}

impl WalletClient for ReqwestWalletClient {
    fn connected_address(&self) -> Result<Option<String>, PaymentError> {
        let accounts = self
            .call("eth_accounts", json!([]))
            .map_err(RpcError::into_payment_error)?;

        Ok(accounts
            .as_array()
            .and_then(|accounts| accounts.first())
            .and_then(Value::as_str)
            .map(String::from))
    }

    fn request_connect(&self) -> Result<String, PaymentError> {
        let accounts = self
            .call("eth_requestAccounts", json!([]))
            .map_err(RpcError::into_payment_error)?;

        accounts
            .as_array()
            .and_then(|accounts| accounts.first())
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| {
                PaymentError::Unavailable(
                    "The wallet provider connected no account".to_string(),
                )
            })
    }

    fn chain_id(&self) -> Result<u64, PaymentError> {
        let chain_id = self
            .call("eth_chainId", json!([]))
            .map_err(RpcError::into_payment_error)?;

        let chain_id = chain_id.as_str().ok_or_else(|| {
            PaymentError::Failed("Wallet provider returned a non-string chain id".to_string())
        })?;

        u64::from_str_radix(chain_id.trim_start_matches("0x"), 16).map_err(|err| {
            PaymentError::Failed(format!("Invalid chain id {}: {}", chain_id, err))
        })
    }

    fn ensure_network(&self, network: &NetworkConfig) -> Result<(), PaymentError> {
        if self.chain_id()? == network.chain_id {
            return Ok(());
        }

        match self.call(
            "wallet_switchEthereumChain",
            json!([{ "chainId": network.chain_id_hex() }]),
        ) {
            Ok(_) => Ok(()),
            Err(RpcError::Provider { code, .. }) if code == UNRECOGNIZED_CHAIN => {
                self.call(
                    "wallet_addEthereumChain",
                    json!([{
                        "chainId": network.chain_id_hex(),
                        "chainName": network.chain_name,
                        "nativeCurrency": {
                            "name": network.currency_name,
                            "symbol": network.currency_symbol,
                            "decimals": network.currency_decimals,
                        },
                        "rpcUrls": [network.rpc_url],
                        "blockExplorerUrls": [network.block_explorer_url],
                    }]),
                )
                .map(|_| ())
                .map_err(RpcError::into_payment_error)
            }
            Err(err) => Err(err.into_payment_error()),
        }
    }

    fn send_payment(&self, to_address: &str, amount: f64) -> Result<PaymentReceipt, PaymentError> {
        let from = self.connected_address()?.ok_or_else(|| {
            PaymentError::Unavailable(
                "No account is connected to the wallet provider".to_string(),
            )
        })?;

        let value = amount_to_wei_hex(amount)?;

        debug!(
            "Submitting payment of {} ({}) from {} to {}",
            amount, value, from, to_address
        );

        let result = self
            .call(
                "eth_sendTransaction",
                json!([{
                    "from": from,
                    "to": to_address,
                    "value": value,
                }]),
            )
            .map_err(RpcError::into_payment_error)?;

        let transaction_hash = result
            .as_str()
            .ok_or_else(|| {
                PaymentError::Failed(
                    "Wallet provider returned a non-string transaction hash".to_string(),
                )
            })?
            .to_string();

        Ok(PaymentReceipt { transaction_hash })
    }
}
