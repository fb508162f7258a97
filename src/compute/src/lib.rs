// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fluent resource-management client library for compute control planes.
//!
//! This crate manages virtual machines and their satellite resources
//! (disks, snapshots, images, scale sets, availability sets) through
//! typed, chainable builders over the control plane's JSON REST API.
//!
//! Two pieces do the heavy lifting:
//!
//! * the image catalog traversal in [catalog], which flattens the nested
//!   publisher → offer → sku → image listings into one lazy sequence, and
//! * the external child resource engine in [external], which stages
//!   creations, updates, and removals of per-call child resources (such
//!   as guest extensions) and reconciles them against the service in one
//!   concurrent batch with per-child outcome tracking.
//!
//! # Example
//! ```no_run
//! # use compute_mgmt::client::Compute;
//! # async fn example() -> anyhow::Result<()> {
//! let client = Compute::builder().build()?;
//! let mut update = client
//!     .virtual_machines("my-project", "zone-a")
//!     .update("vm-1")
//!     .define_extension("monitoring-agent")?
//!     .set_publisher("observability.example.com")
//!     .set_extension_type("metrics")
//!     .attach()?;
//! update.apply().await?;
//! # Ok(()) }
//! ```

/// An alias of [std::result::Result] where the error is always
/// [Error].
pub use mgx::Result;

/// The core error returned by remote operations.
pub use mgx::error::Error;

/// Fluent definition and update flows for virtual machines.
pub mod builder;

/// The machine image catalog and its flattened traversal.
pub mod catalog;

/// The client and the per-scope resource collections.
pub mod client;

/// Credentials for the compute management client.
pub mod credentials;

/// Staging and commit errors of the child-resource engine.
pub mod error;

/// Management of external child resources.
pub mod external;

/// The resource model.
pub mod model;

/// The transport stub, replaceable in tests.
pub mod stub;

mod transport;
