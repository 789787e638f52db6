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

mod error;
mod routes;

use std::sync::{mpsc, Arc};
use std::thread;

use actix_web::{web, App, HttpServer};

use edugrant_sdk::cache::ScholarshipCache;
use edugrant_sdk::identity::IdentityClient;
use edugrant_sdk::roles::RoleConfig;
use edugrant_sdk::scholarships::store::ScholarshipStore;
use edugrant_sdk::wallet::WalletClient;

pub use error::{RestApiResponseError, RestApiServerError};

/// The collaborators every route handler works against.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ScholarshipStore>,
    pub wallet: Arc<dyn WalletClient>,
    pub identity: Arc<dyn IdentityClient>,
    pub cache: Arc<ScholarshipCache>,
    pub role_config: RoleConfig,
}

pub struct RestApiShutdownHandle {
    do_shutdown: Box<dyn Fn() -> Result<(), RestApiServerError> + Send>,
}

impl RestApiShutdownHandle {
    pub fn shutdown(&self) -> Result<(), RestApiServerError> {
        (*self.do_shutdown)()
    }
}

pub fn run(
    bind_url: &str,
    state: AppState,
) -> Result<
    (
        RestApiShutdownHandle,
        thread::JoinHandle<Result<(), RestApiServerError>>,
    ),
    RestApiServerError,
> {
    let bind_url = bind_url.to_owned();
    let (tx, rx) = mpsc::channel();
    let join_handle = thread::Builder::new()
        .name("EdugrantRestApi".into())
        .spawn(move || {
            let sys = actix_rt::System::new("Edugrant-Rest-API");

            info!("Starting Rest API at {}", &bind_url);
            let addr = HttpServer::new(move || {
                App::new()
                    .data(state.clone())
                    .service(
                        web::scope("/scholarships")
                            .service(
                                web::resource("")
                                    .route(web::get().to(routes::list_scholarships))
                                    .route(web::post().to(routes::create_scholarship)),
                            )
                            .service(
                                web::resource("/{scholarship_id}")
                                    .route(web::get().to(routes::fetch_scholarship)),
                            )
                            .service(
                                web::resource("/{scholarship_id}/votes")
                                    .route(web::post().to(routes::vote)),
                            )
                            .service(
                                web::resource("/{scholarship_id}/applications")
                                    .route(web::post().to(routes::apply)),
                            )
                            .service(
                                web::resource("/{scholarship_id}/approve")
                                    .route(web::post().to(routes::approve_scholarship)),
                            )
                            .service(
                                web::resource("/{scholarship_id}/fund")
                                    .route(web::post().to(routes::fund_scholarship)),
                            )
                            .service(
                                web::resource("/{scholarship_id}/transactions")
                                    .route(web::get().to(routes::list_transactions)),
                            ),
                    )
                    .service(
                        web::resource("/applications")
                            .route(web::get().to(routes::list_applications)),
                    )
                    .service(
                        web::resource("/sessions/{address}")
                            .route(web::get().to(routes::fetch_session)),
                    )
            })
            .bind(bind_url)?
            .disable_signals()
            .system_exit()
            .run();

            tx.send(addr).map_err(|err| {
                RestApiServerError::StartUpError(format!("Unable to send Server Addr: {}", err))
            })?;
            sys.run()?;

            info!("Rest API terminating");

            Ok(())
        })?;

    let addr = rx.recv().map_err(|err| {
        RestApiServerError::StartUpError(format!("Unable to receive Server Addr: {}", err))
    })?;

    let do_shutdown = Box::new(move || {
        debug!("Shutting down Rest API");
        let _ = addr.stop(true);
        debug!("Graceful signal sent to Rest API");

        Ok(())
    });

    Ok((RestApiShutdownHandle { do_shutdown }, join_handle))
}
