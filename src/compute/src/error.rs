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

//! Custom errors for the compute management client.
//!
//! The child-resource reconciliation engine defines additional error types.
//! Staging errors are raised synchronously while building up a batch of
//! changes; [CommitError] aggregates every remote failure observed while
//! applying one batch.

/// Indicates an invalid staging call on a child-resource collection.
///
/// These errors are detected locally, before any remote call is made, and
/// are returned directly from the staging methods.
#[derive(Debug, PartialEq)]
#[non_exhaustive]
pub enum StagingError {
    /// A child with the same (case-insensitive) name is already present.
    DuplicateChild {
        /// The conflicting name, as supplied by the caller.
        name: String,
    },

    /// No committed child with this name exists.
    ///
    /// `staged_only` is true when the name matches a child that is staged
    /// for creation but not created yet; such a child cannot be updated or
    /// removed before it exists remotely.
    ChildNotFound {
        /// The name that failed to resolve.
        name: String,
        /// True if the name is present but only as a pending creation.
        staged_only: bool,
    },

    /// The child is staged for removal and cannot be updated.
    ChildPendingRemoval {
        /// The name of the child staged for removal.
        name: String,
    },
}

impl std::fmt::Display for StagingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateChild { name } => {
                write!(f, "a child resource named `{name}` already exists in this collection")
            }
            Self::ChildNotFound { name, staged_only } => {
                write!(f, "no child resource named `{name}` exists")?;
                if *staged_only {
                    write!(f, " (it is only staged for creation)")?;
                }
                Ok(())
            }
            Self::ChildPendingRemoval { name } => {
                write!(f, "child resource `{name}` is marked for removal")
            }
        }
    }
}

impl std::error::Error for StagingError {}

impl StagingError {
    pub(crate) fn duplicate<T: Into<String>>(name: T) -> Self {
        Self::DuplicateChild { name: name.into() }
    }

    pub(crate) fn not_found<T: Into<String>>(name: T, staged_only: bool) -> Self {
        Self::ChildNotFound {
            name: name.into(),
            staged_only,
        }
    }

    pub(crate) fn pending_removal<T: Into<String>>(name: T) -> Self {
        Self::ChildPendingRemoval { name: name.into() }
    }
}

/// The remote operation attempted for one child resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChildOperation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for ChildOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// One failed child operation within a batched commit.
#[derive(Debug)]
pub struct ChildFailure {
    name: String,
    operation: ChildOperation,
    error: mgx::error::Error,
}

impl ChildFailure {
    pub(crate) fn new(name: String, operation: ChildOperation, error: mgx::error::Error) -> Self {
        Self {
            name,
            operation,
            error,
        }
    }

    /// The name of the child whose operation failed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The operation that failed.
    pub fn operation(&self) -> ChildOperation {
        self.operation
    }

    /// The underlying transport or service error.
    pub fn error(&self) -> &mgx::error::Error {
        &self.error
    }
}

impl std::fmt::Display for ChildFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of `{}` failed: {}", self.operation, self.name, self.error)
    }
}

/// The aggregate outcome of a commit where at least one child operation
/// failed.
///
/// A commit applies every staged operation even when some of them fail.
/// This error preserves each individual failure, and the names of the
/// children that did commit, so callers can decide what to retry without
/// resubmitting work that already succeeded.
#[derive(Debug)]
pub struct CommitError {
    committed: Vec<String>,
    failures: Vec<ChildFailure>,
}

impl CommitError {
    pub(crate) fn new(committed: Vec<String>, failures: Vec<ChildFailure>) -> Self {
        Self {
            committed,
            failures,
        }
    }

    /// The names of the children whose operations succeeded in this commit.
    pub fn committed(&self) -> &[String] {
        &self.committed
    }

    /// Every failure observed in this commit.
    pub fn failures(&self) -> &[ChildFailure] {
        &self.failures
    }
}

impl std::fmt::Display for CommitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} child operation(s) failed ({} succeeded): ",
            self.failures.len(),
            self.committed.len()
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i != 0 {
                write!(f, "; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CommitError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_display() {
        let e = StagingError::duplicate("ext-1");
        assert!(e.to_string().contains("`ext-1`"), "{e}");

        let e = StagingError::not_found("ext-2", false);
        assert!(e.to_string().contains("`ext-2`"), "{e}");
        assert!(!e.to_string().contains("staged"), "{e}");

        let e = StagingError::not_found("ext-3", true);
        assert!(e.to_string().contains("staged for creation"), "{e}");

        let e = StagingError::pending_removal("ext-4");
        assert!(e.to_string().contains("marked for removal"), "{e}");
    }

    #[test]
    fn commit_error_display() {
        let failures = vec![
            ChildFailure::new(
                "a".to_string(),
                ChildOperation::Create,
                mgx::error::Error::other("boom"),
            ),
            ChildFailure::new(
                "b".to_string(),
                ChildOperation::Delete,
                mgx::error::Error::other("bang"),
            ),
        ];
        let e = CommitError::new(vec!["c".to_string()], failures);
        let display = e.to_string();
        assert!(display.contains("2 child operation(s) failed"), "{display}");
        assert!(display.contains("(1 succeeded)"), "{display}");
        assert!(display.contains("create of `a`"), "{display}");
        assert!(display.contains("delete of `b`"), "{display}");
        assert_eq!(e.committed(), ["c".to_string()]);
        assert_eq!(e.failures().len(), 2);
    }
}
