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

//! Management API extensions.
//!
//! This crate contains the service-independent types and functions used in
//! the implementation of the fluent resource-management client libraries.
//! Application code rarely depends on this crate directly: the per-service
//! crates re-export the handful of types (notably [Result], [error::Error],
//! and the pagination adapters) that appear in their public signatures.

/// An alias of [std::result::Result] where the error is always [error::Error].
///
/// This is the result type used by all functions wrapping remote calls.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// The core error type used by the client libraries.
pub mod error;

/// The response envelope returned by remote operations.
pub mod response;

/// Per-request configuration.
pub mod options;

/// Types for client construction.
pub mod client_builder;

/// Adapters to consume paginated list operations as async streams.
pub mod paginator;

/// Flattening of two-level (parent, then children-per-parent) listings.
pub mod flatten;
