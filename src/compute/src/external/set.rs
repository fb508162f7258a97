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

//! The collection of external child resources owned by one parent.

use super::child::{ChildOperations, ExternalChild, NamedResource, PendingState};
use crate::error::{ChildFailure, ChildOperation, CommitError, StagingError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;

/// The external child resources of one parent, with staged local changes.
///
/// The collection is owned by exactly one parent builder and is not meant
/// for concurrent staging: callers serialize `prepare_*` calls themselves.
/// Only the remote fan-out inside [commit][ExternalChildSet::commit] runs
/// concurrently, which is safe because each child's remote operation
/// touches only that child's own server-side sub-resource.
///
/// Names are compared case-insensitively: a collection holding `Agent`
/// rejects a definition of `agent`.
#[derive(Debug)]
pub struct ExternalChildSet<T> {
    ops: Arc<dyn ChildOperations<T>>,
    children: HashMap<String, ExternalChild<T>>,
}

fn key(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// The successful result of one remote child operation.
enum Done<T> {
    Created(T),
    Updated(T),
    Removed,
}

impl<T> ExternalChildSet<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty collection using the given remote operations.
    pub fn new(ops: Arc<dyn ChildOperations<T>>) -> Self {
        Self {
            ops,
            children: HashMap::new(),
        }
    }

    /// Looks up a child by (case-insensitive) name.
    pub fn get(&self, name: &str) -> Option<&ExternalChild<T>> {
        self.children.get(&key(name))
    }

    /// Iterates over the children currently in the collection.
    pub fn iter(&self) -> impl Iterator<Item = &ExternalChild<T>> {
        self.children.values()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Stages the definition of a new child.
    ///
    /// The returned child is **not** part of the collection yet: mutate its
    /// payload as needed and then [attach][ExternalChildSet::attach] it.
    /// This mirrors the attach step of the fluent builders, which hand the
    /// staged child to the application for further configuration first.
    pub fn prepare_define<N: Into<String>>(
        &self,
        name: N,
        payload: T,
    ) -> Result<ExternalChild<T>, StagingError> {
        let name = name.into();
        if self.children.contains_key(&key(&name)) {
            return Err(StagingError::duplicate(name));
        }
        Ok(ExternalChild::new(name, payload, PendingState::ToBeCreated))
    }

    /// Adds a child staged by [prepare_define][ExternalChildSet::prepare_define]
    /// to the collection.
    pub fn attach(&mut self, child: ExternalChild<T>) -> Result<(), StagingError> {
        let child_key = key(child.name());
        if self.children.contains_key(&child_key) {
            return Err(StagingError::duplicate(child.name().to_string()));
        }
        self.children.insert(child_key, child);
        Ok(())
    }

    /// Stages an update of an existing child, returning it for mutation.
    ///
    /// Fails if the name is unknown, if the child is itself only staged for
    /// creation, or if the child is staged for removal.
    pub fn prepare_update(&mut self, name: &str) -> Result<&mut ExternalChild<T>, StagingError> {
        let Some(child) = self.children.get_mut(&key(name)) else {
            return Err(StagingError::not_found(name, false));
        };
        match child.state() {
            PendingState::ToBeCreated => Err(StagingError::not_found(name, true)),
            PendingState::ToBeRemoved => Err(StagingError::pending_removal(name)),
            PendingState::None | PendingState::ToBeUpdated => {
                child.set_state(PendingState::ToBeUpdated);
                Ok(child)
            }
        }
    }

    /// Stages the removal of an existing child.
    ///
    /// Fails if the name is unknown or if the child is only staged for
    /// creation. Staging the removal of a child already staged for removal
    /// is a no-op.
    pub fn prepare_remove(&mut self, name: &str) -> Result<(), StagingError> {
        let Some(child) = self.children.get_mut(&key(name)) else {
            return Err(StagingError::not_found(name, false));
        };
        match child.state() {
            PendingState::ToBeCreated => Err(StagingError::not_found(name, true)),
            _ => {
                child.set_state(PendingState::ToBeRemoved);
                Ok(())
            }
        }
    }

    /// Discards all staged changes and reloads the collection from the
    /// service.
    pub async fn refresh(&mut self) -> mgx::Result<()>
    where
        T: NamedResource,
    {
        let listed = self.ops.list().await?;
        tracing::debug!(count = listed.len(), "reloaded external child resources");
        self.children.clear();
        for payload in listed {
            let name = payload.resource_name().to_string();
            self.children.insert(
                key(&name),
                ExternalChild::new(name, payload, PendingState::None),
            );
        }
        Ok(())
    }

    /// Applies every staged change against the service.
    ///
    /// The staged children are partitioned into removals, creations, and
    /// updates, and all remote calls are issued concurrently; there is no
    /// ordering guarantee across or within the groups. Each child resolves
    /// on its own:
    ///
    /// * a successful removal evicts the child from the collection,
    /// * a successful creation or update resets the child to
    ///   [PendingState::None] with the payload returned by the service,
    /// * a failed creation evicts the child (it never existed remotely),
    /// * a failed removal resets the child to [PendingState::None] (it
    ///   still exists remotely),
    /// * a failed update keeps the child in [PendingState::ToBeUpdated], so
    ///   a later commit resubmits it.
    ///
    /// On full success the committed children are returned. If any
    /// operation failed the result is a [CommitError] carrying every
    /// individual failure and the names of the children that did commit;
    /// the collection reflects all successes either way.
    pub async fn commit(&mut self) -> Result<Vec<ExternalChild<T>>, CommitError> {
        let mut tasks = JoinSet::new();
        for (child_key, child) in self.children.iter() {
            let operation = match child.state() {
                PendingState::None => continue,
                PendingState::ToBeCreated => ChildOperation::Create,
                PendingState::ToBeUpdated => ChildOperation::Update,
                PendingState::ToBeRemoved => ChildOperation::Delete,
            };
            let ops = self.ops.clone();
            let child_key = child_key.clone();
            let name = child.name().to_string();
            let payload = child.payload().clone();
            tasks.spawn(async move {
                let outcome = match operation {
                    ChildOperation::Create => ops.create(name, payload).await.map(Done::Created),
                    ChildOperation::Update => ops.update(name, payload).await.map(Done::Updated),
                    ChildOperation::Delete => ops.delete(name).await.map(|()| Done::Removed),
                };
                (child_key, operation, outcome)
            });
        }
        tracing::debug!(staged = tasks.len(), "committing external child resources");

        let mut committed = Vec::new();
        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let (child_key, operation, outcome) =
                joined.expect("child operations are plain futures and do not panic");
            match outcome {
                Ok(Done::Removed) => {
                    if let Some(mut child) = self.children.remove(&child_key) {
                        child.set_state(PendingState::None);
                        committed.push(child);
                    }
                }
                Ok(Done::Created(fresh)) | Ok(Done::Updated(fresh)) => {
                    if let Some(child) = self.children.get_mut(&child_key) {
                        child.set_payload(fresh);
                        child.set_state(PendingState::None);
                        committed.push(child.clone());
                    }
                }
                Err(error) => {
                    let name = self
                        .children
                        .get(&child_key)
                        .map(|c| c.name().to_string())
                        .unwrap_or(child_key.clone());
                    tracing::warn!(child = name.as_str(), operation = %operation, %error,
                        "external child operation failed");
                    match operation {
                        // The child never existed remotely.
                        ChildOperation::Create => {
                            self.children.remove(&child_key);
                        }
                        // Keep the staged update for a later retry.
                        ChildOperation::Update => {}
                        // The child still exists remotely.
                        ChildOperation::Delete => {
                            if let Some(child) = self.children.get_mut(&child_key) {
                                child.set_state(PendingState::None);
                            }
                        }
                    }
                    failures.push(ChildFailure::new(name, operation, error));
                }
            }
        }

        if failures.is_empty() {
            Ok(committed)
        } else {
            let committed = committed
                .into_iter()
                .map(|child| child.name().to_string())
                .collect();
            Err(CommitError::new(committed, failures))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Extension;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Remote operations over an in-memory listing, with per-name failure
    /// injection and a call log.
    #[derive(Debug, Default)]
    struct FakeOps {
        fail: Mutex<HashSet<String>>,
        listing: Mutex<Vec<Extension>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeOps {
        fn with_listing(names: &[&str]) -> Arc<Self> {
            let ops = Self::default();
            *ops.listing.lock().unwrap() = names
                .iter()
                .map(|name| Extension::new().set_name(*name))
                .collect();
            Arc::new(ops)
        }

        fn fail_on(&self, name: &str) {
            self.fail.lock().unwrap().insert(name.to_string());
        }

        fn clear_failures(&self) {
            self.fail.lock().unwrap().clear();
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn check(&self, verb: &str, name: &str) -> mgx::Result<()> {
            self.calls.lock().unwrap().push(format!("{verb}:{name}"));
            if self.fail.lock().unwrap().contains(name) {
                return Err(mgx::error::Error::other(format!("{verb} of {name} failed")));
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl ChildOperations<Extension> for FakeOps {
        async fn create(&self, name: String, payload: Extension) -> mgx::Result<Extension> {
            self.check("create", &name)?;
            Ok(payload.set_name(name))
        }

        async fn update(&self, name: String, payload: Extension) -> mgx::Result<Extension> {
            self.check("update", &name)?;
            let mut payload = payload.set_name(name);
            payload.provisioning_state = "updated".to_string();
            Ok(payload)
        }

        async fn delete(&self, name: String) -> mgx::Result<()> {
            self.check("delete", &name)
        }

        async fn list(&self) -> mgx::Result<Vec<Extension>> {
            self.calls.lock().unwrap().push("list".to_string());
            Ok(self.listing.lock().unwrap().clone())
        }
    }

    fn staged(set: &ExternalChildSet<Extension>, name: &str) -> PendingState {
        set.get(name).expect("child should be present").state()
    }

    #[tokio::test]
    async fn define_rejects_duplicates_case_insensitively() {
        let ops = FakeOps::with_listing(&[]);
        let mut set = ExternalChildSet::new(ops);
        let child = set.prepare_define("agent", Extension::new()).unwrap();
        set.attach(child).unwrap();

        let err = set.prepare_define("agent", Extension::new()).unwrap_err();
        assert_eq!(
            err,
            StagingError::DuplicateChild {
                name: "agent".to_string()
            }
        );
        let err = set.prepare_define("AGENT", Extension::new()).unwrap_err();
        assert_eq!(
            err,
            StagingError::DuplicateChild {
                name: "AGENT".to_string()
            }
        );
    }

    #[tokio::test]
    async fn attach_rejects_duplicates() {
        let ops = FakeOps::with_listing(&[]);
        let mut set = ExternalChildSet::new(ops);
        // Two definitions staged before either is attached.
        let first = set.prepare_define("agent", Extension::new()).unwrap();
        let second = set.prepare_define("Agent", Extension::new()).unwrap();
        set.attach(first).unwrap();
        let err = set.attach(second).unwrap_err();
        assert_eq!(
            err,
            StagingError::DuplicateChild {
                name: "Agent".to_string()
            }
        );
    }

    #[tokio::test]
    async fn update_validations() {
        let ops = FakeOps::with_listing(&["existing"]);
        let mut set = ExternalChildSet::new(ops);
        set.refresh().await.unwrap();

        let err = set.prepare_update("missing").unwrap_err();
        assert_eq!(
            err,
            StagingError::ChildNotFound {
                name: "missing".to_string(),
                staged_only: false,
            }
        );

        let child = set.prepare_define("fresh", Extension::new()).unwrap();
        set.attach(child).unwrap();
        let err = set.prepare_update("fresh").unwrap_err();
        assert_eq!(
            err,
            StagingError::ChildNotFound {
                name: "fresh".to_string(),
                staged_only: true,
            }
        );

        set.prepare_remove("existing").unwrap();
        let err = set.prepare_update("existing").unwrap_err();
        assert_eq!(
            err,
            StagingError::ChildPendingRemoval {
                name: "existing".to_string()
            }
        );
    }

    #[tokio::test]
    async fn remove_validations() {
        let ops = FakeOps::with_listing(&["existing"]);
        let mut set = ExternalChildSet::new(ops);
        set.refresh().await.unwrap();

        let err = set.prepare_remove("missing").unwrap_err();
        assert!(matches!(err, StagingError::ChildNotFound { .. }));

        let child = set.prepare_define("fresh", Extension::new()).unwrap();
        set.attach(child).unwrap();
        let err = set.prepare_remove("fresh").unwrap_err();
        assert_eq!(
            err,
            StagingError::ChildNotFound {
                name: "fresh".to_string(),
                staged_only: true,
            }
        );

        // Removing an updated child, and re-removing, are both fine.
        set.prepare_update("existing").unwrap();
        set.prepare_remove("existing").unwrap();
        set.prepare_remove("existing").unwrap();
        assert_eq!(staged(&set, "existing"), PendingState::ToBeRemoved);
    }

    #[tokio::test]
    async fn commit_resets_state_and_evicts_removed() {
        let ops = FakeOps::with_listing(&["keep", "drop"]);
        let mut set = ExternalChildSet::new(ops.clone());
        set.refresh().await.unwrap();

        let child = set
            .prepare_define("fresh", Extension::new().set_publisher("example"))
            .unwrap();
        set.attach(child).unwrap();
        set.prepare_update("keep").unwrap();
        set.prepare_remove("drop").unwrap();

        let committed = set.commit().await.unwrap();
        let mut names = committed
            .iter()
            .map(|c| c.name().to_string())
            .collect::<Vec<_>>();
        names.sort();
        assert_eq!(names, ["drop", "fresh", "keep"]);
        assert!(committed.iter().all(|c| c.state() == PendingState::None));

        assert_eq!(set.len(), 2);
        assert_eq!(staged(&set, "keep"), PendingState::None);
        assert_eq!(staged(&set, "fresh"), PendingState::None);
        assert!(set.get("drop").is_none());
        // The payload reflects what the service returned.
        assert_eq!(set.get("keep").unwrap().payload().provisioning_state, "updated");
    }

    #[tokio::test]
    async fn commit_isolates_partial_failures() {
        let ops = FakeOps::with_listing(&[]);
        let mut set = ExternalChildSet::new(ops.clone());
        for name in ["one", "two", "three"] {
            let child = set.prepare_define(name, Extension::new()).unwrap();
            set.attach(child).unwrap();
        }
        ops.fail_on("two");

        let err = set.commit().await.unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].name(), "two");
        assert_eq!(err.failures()[0].operation(), ChildOperation::Create);
        let mut committed = err.committed().to_vec();
        committed.sort();
        assert_eq!(committed, ["one", "three"]);

        // The failed creation is evicted; the successes are settled.
        assert!(set.get("two").is_none());
        assert_eq!(staged(&set, "one"), PendingState::None);
        assert_eq!(staged(&set, "three"), PendingState::None);
    }

    #[tokio::test]
    async fn commit_retries_failed_update() {
        let ops = FakeOps::with_listing(&["agent"]);
        let mut set = ExternalChildSet::new(ops.clone());
        set.refresh().await.unwrap();
        set.prepare_update("agent").unwrap();
        ops.fail_on("agent");

        let err = set.commit().await.unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].operation(), ChildOperation::Update);
        // The staged update survives for a retry.
        assert_eq!(staged(&set, "agent"), PendingState::ToBeUpdated);

        ops.clear_failures();
        let committed = set.commit().await.unwrap();
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].name(), "agent");
        assert_eq!(staged(&set, "agent"), PendingState::None);
        // The retry resubmitted the update; nothing was ever created.
        let calls = ops.calls();
        assert_eq!(
            calls.iter().filter(|c| *c == "update:agent").count(),
            2,
            "{calls:?}"
        );
        assert!(calls.iter().all(|c| !c.starts_with("create")), "{calls:?}");
    }

    #[tokio::test]
    async fn commit_reverts_failed_removal() {
        let ops = FakeOps::with_listing(&["agent"]);
        let mut set = ExternalChildSet::new(ops.clone());
        set.refresh().await.unwrap();
        set.prepare_remove("agent").unwrap();
        ops.fail_on("agent");

        let err = set.commit().await.unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].operation(), ChildOperation::Delete);
        // The child still exists remotely, so it reverts to settled.
        assert_eq!(staged(&set, "agent"), PendingState::None);
    }

    #[tokio::test]
    async fn commit_without_staged_changes_is_a_noop() {
        let ops = FakeOps::with_listing(&["agent"]);
        let mut set = ExternalChildSet::new(ops.clone());
        set.refresh().await.unwrap();
        let committed = set.commit().await.unwrap();
        assert!(committed.is_empty());
        assert_eq!(ops.calls(), ["list"]);
    }

    #[tokio::test]
    async fn refresh_discards_staged_changes() {
        let ops = FakeOps::with_listing(&["existing"]);
        let mut set = ExternalChildSet::new(ops.clone());
        set.refresh().await.unwrap();
        let child = set.prepare_define("fresh", Extension::new()).unwrap();
        set.attach(child).unwrap();
        set.prepare_remove("existing").unwrap();

        set.refresh().await.unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.get("fresh").is_none());
        assert_eq!(staged(&set, "existing"), PendingState::None);
    }
}
