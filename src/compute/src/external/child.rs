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

//! The lifecycle of a single external child resource.

/// The pending local change of one child resource.
///
/// A child in `None` matches the state of the service, as far as this
/// client knows. The other states record a staged change that a commit of
/// the owning collection will realize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PendingState {
    /// No change is staged.
    #[default]
    None,
    /// The child will be created; it does not exist remotely yet.
    ToBeCreated,
    /// The child exists remotely and an update is staged.
    ToBeUpdated,
    /// The child exists remotely and its removal is staged.
    ToBeRemoved,
}

/// One external child resource of a parent, with its staged state.
#[derive(Clone, Debug)]
pub struct ExternalChild<T> {
    name: String,
    payload: T,
    state: PendingState,
}

impl<T> ExternalChild<T> {
    pub(crate) fn new(name: String, payload: T, state: PendingState) -> Self {
        Self {
            name,
            payload,
            state,
        }
    }

    /// The name of this child, unique within the owning collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The staged state of this child.
    pub fn state(&self) -> PendingState {
        self.state
    }

    /// The typed payload of this child.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// The typed payload of this child, for mutation while staging.
    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    /// Consumes the child, returning its payload.
    pub fn into_payload(self) -> T {
        self.payload
    }

    pub(crate) fn set_state(&mut self, state: PendingState) {
        self.state = state;
    }

    pub(crate) fn set_payload(&mut self, payload: T) {
        self.payload = payload;
    }
}

/// A payload type that knows its own resource name.
///
/// Used to key children when reloading a collection from the service.
pub trait NamedResource {
    /// The resource name of this payload.
    fn resource_name(&self) -> &str;
}

impl NamedResource for crate::model::Extension {
    fn resource_name(&self) -> &str {
        &self.name
    }
}

/// The remote operations for one kind of external child resource.
///
/// Implementations are scoped to one parent: the parent's identity is
/// captured at construction time and every call operates on that parent's
/// children only. There is one capability per method rather than a wider
/// resource interface, so alternative transports and tests only implement
/// what the collection actually uses.
#[async_trait::async_trait]
pub trait ChildOperations<T>: std::fmt::Debug + Send + Sync {
    /// Creates the child remotely, returning the created payload.
    async fn create(&self, name: String, payload: T) -> mgx::Result<T>;

    /// Updates the child remotely, returning the updated payload.
    ///
    /// Services without a distinct update verb may implement this as an
    /// idempotent upsert.
    async fn update(&self, name: String, payload: T) -> mgx::Result<T>;

    /// Deletes the child remotely.
    async fn delete(&self, name: String) -> mgx::Result<()>;

    /// Lists the current children of the parent.
    async fn list(&self) -> mgx::Result<Vec<T>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Extension;

    #[test]
    fn accessors() {
        let mut child = ExternalChild::new(
            "agent".to_string(),
            Extension::new().set_name("agent"),
            PendingState::ToBeCreated,
        );
        assert_eq!(child.name(), "agent");
        assert_eq!(child.state(), PendingState::ToBeCreated);
        assert_eq!(child.payload().name, "agent");

        child.payload_mut().publisher = "example".to_string();
        child.set_state(PendingState::None);
        assert_eq!(child.state(), PendingState::None);
        assert_eq!(child.into_payload().publisher, "example");
    }

    #[test]
    fn named_resource() {
        let ext = Extension::new().set_name("agent");
        assert_eq!(ext.resource_name(), "agent");
    }
}
