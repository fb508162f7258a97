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

//! Management of external child resources.
//!
//! Some satellite resources of a parent (for example the guest extensions
//! of a virtual machine) are not embedded in the parent's own payload:
//! each one is created, updated, or deleted with its own remote call,
//! scoped to the parent. The types in this module stage such changes
//! locally and reconcile them against the service in one concurrent batch,
//! tracking the outcome of every child individually.

pub mod child;
pub mod set;

pub use child::{ChildOperations, ExternalChild, NamedResource, PendingState};
pub use set::ExternalChildSet;
