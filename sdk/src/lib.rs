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

//! Edugrant SDK
//!
//! The SDK implements the scholarship lifecycle workflow: role resolution
//! from a connected wallet address, the guarded state-transition operations
//! (create, vote, apply, approve, fund), and the composed read-model built
//! from the raw scholarship, application, and vote rows. Persistence, the
//! wallet provider, and the identity verifier are collaborators consumed
//! through the typed interfaces in `scholarships::store`, `wallet`, and
//! `identity`.

#[cfg(feature = "postgres")]
#[macro_use]
extern crate diesel;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod cache;
pub mod error;
pub mod identity;
pub mod roles;
pub mod scholarships;
pub mod wallet;
pub mod workflow;
