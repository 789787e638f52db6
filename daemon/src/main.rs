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

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod config;
mod error;
mod rest_api;

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use flexi_logger::{LogSpecBuilder, Logger};

use edugrant_sdk::cache::ScholarshipCache;
use edugrant_sdk::identity::{IdentityClient, StaticIdentityClient};
use edugrant_sdk::roles::RoleConfig;
use edugrant_sdk::scholarships::store::{create_store, ConnectionUri, ScholarshipStore};
use edugrant_sdk::wallet::reqwest::ReqwestWalletClient;
use edugrant_sdk::wallet::{educhain_testnet, WalletClient};

use crate::config::EdugrantConfigBuilder;
use crate::error::DaemonError;
use crate::rest_api::AppState;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

// Mutations force a cache rebuild; unforced rebuilds are limited to one per
// this interval.
const REFRESH_THROTTLE: Duration = Duration::from_secs(5);

fn run() -> Result<(), DaemonError> {
    let matches = clap_app!(myapp =>
        (name: APP_NAME)
        (version: VERSION)
        (author: "Contributors to Edugrant")
        (about: "Daemon Package for Edugrant")
        (@arg verbose: -v +multiple "Log verbosely")
        (@arg bind: -b --bind +takes_value "connection endpoint for the rest API")
        (@arg database_url: --("database-url") +takes_value
         "specifies the database URL to connect to, or 'memory'")
        (@arg wallet_rpc_url: --("wallet-rpc-url") +takes_value
         "connection endpoint for the wallet provider's JSON-RPC interface")
        (@arg government_address: --("government-address") +takes_value
         "wallet address designating the government officer role")
        (@arg financier_address: --("financier-address") +takes_value
         "wallet address designating the financier role")
        (@arg refresh_interval: --("refresh-interval") +takes_value
         "seconds between background read-model refreshes"))
    .get_matches();

    let log_level = match matches.occurrences_of("verbose") {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let mut log_spec_builder = LogSpecBuilder::new();
    log_spec_builder.default(log_level);
    log_spec_builder.module("hyper", log::LevelFilter::Warn);
    log_spec_builder.module("tokio", log::LevelFilter::Warn);

    Logger::with(log_spec_builder.build()).start()?;

    let config = EdugrantConfigBuilder::default()
        .with_cli_args(&matches)
        .build()?;

    let connection_uri: ConnectionUri = config
        .database_url()
        .parse()
        .map_err(|err| DaemonError::StartUpError(Box::new(err)))?;
    let store: Arc<dyn ScholarshipStore> = Arc::from(
        create_store(&connection_uri).map_err(|err| DaemonError::StartUpError(Box::new(err)))?,
    );

    let wallet: Arc<dyn WalletClient> =
        Arc::new(ReqwestWalletClient::new(config.wallet_rpc_url().to_string()));
    if let Err(err) = wallet.ensure_network(&educhain_testnet()) {
        warn!("Wallet provider is not ready; funding will fail until it is: {}", err);
    }

    let identity: Arc<dyn IdentityClient> = Arc::new(StaticIdentityClient::new());
    let role_config = RoleConfig::new(
        config.government_address().to_string(),
        config.financier_address().to_string(),
    );

    let cache = Arc::new(ScholarshipCache::new(REFRESH_THROTTLE));
    cache.refresh(store.as_ref(), true);

    let (rest_api_shutdown_handle, rest_api_join_handle) = rest_api::run(
        config.rest_api_endpoint(),
        AppState {
            store: store.clone(),
            wallet,
            identity,
            cache: cache.clone(),
            role_config,
        },
    )?;

    let running = Arc::new(AtomicBool::new(true));

    let refresh_running = running.clone();
    let refresh_interval = config.refresh_interval();
    let refresh_join_handle = thread::Builder::new()
        .name("EdugrantReadModelRefresh".into())
        .spawn(move || {
            let mut since_refresh = Duration::from_secs(0);
            while refresh_running.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_secs(1));
                since_refresh += Duration::from_secs(1);
                if since_refresh >= refresh_interval {
                    cache.refresh(store.as_ref(), false);
                    since_refresh = Duration::from_secs(0);
                }
            }
        })
        .map_err(|err| DaemonError::StartUpError(Box::new(err)))?;

    let ctrlc_triggered = AtomicBool::new(false);
    let ctrlc_running = running.clone();
    ctrlc::set_handler(move || {
        if ctrlc_triggered.load(Ordering::SeqCst) {
            eprintln!("Aborting due to multiple Ctrl-C events");
            process::exit(1);
        }

        ctrlc_triggered.store(true, Ordering::SeqCst);
        ctrlc_running.store(false, Ordering::SeqCst);

        if let Err(err) = rest_api_shutdown_handle.shutdown() {
            error!("Unable to gracefully shutdown Rest API: {}", err);
        }
    })
    .map_err(|err| DaemonError::StartUpError(Box::new(err)))?;

    rest_api_join_handle
        .join()
        .map_err(|_| {
            DaemonError::ShutdownError("Unable to cleanly join the REST API thread".into())
        })
        .and_then(|res| res.map_err(DaemonError::from))?;

    running.store(false, Ordering::SeqCst);
    refresh_join_handle.join().map_err(|_| {
        DaemonError::ShutdownError("Unable to cleanly join the read-model refresh thread".into())
    })?;

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
