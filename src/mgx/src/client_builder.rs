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

//! Types for client construction.
//!
//! Some applications need to construct clients with custom configuration,
//! for example, to override the endpoint or the credentials. Each service
//! crate defines a `builder()` function returning the concrete builder
//! type; the builders in the service crates report problems using the
//! [Error] type in this module.

/// The result type for this module.
pub type Result<T> = std::result::Result<T, Error>;

/// Indicates a problem while constructing a client.
///
/// # Example
/// ```
/// use mgx::client_builder::Error;
/// fn report(e: Error) {
///     if e.is_credentials() {
///         println!("could not initialize the credentials: {e}");
///     } else {
///         println!("error during client initialization: {e}");
///     }
/// }
/// ```
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// If true, the builder could not initialize the credentials.
    pub fn is_credentials(&self) -> bool {
        matches!(&self.0, ErrorKind::Credentials(_))
    }

    /// If true, the builder could not initialize the transport client.
    pub fn is_transport(&self) -> bool {
        matches!(&self.0, ErrorKind::Transport(_))
    }

    /// Creates an error indicating the credentials could not be initialized.
    pub fn cred<T: Into<BoxError>>(source: T) -> Self {
        Self(ErrorKind::Credentials(source.into()))
    }

    /// Creates an error indicating the transport could not be initialized.
    pub fn transport<T: Into<BoxError>>(source: T) -> Self {
        Self(ErrorKind::Transport(source.into()))
    }
}

#[derive(thiserror::Error, Debug)]
enum ErrorKind {
    #[error("could not initialize the credentials")]
    Credentials(#[source] BoxError),
    #[error("could not initialize the transport client")]
    Transport(#[source] BoxError),
}

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        let error = Error::cred("simulated failure");
        assert!(error.is_credentials());
        assert!(!error.is_transport());

        let error = Error::transport("simulated failure");
        assert!(error.is_transport());
        assert!(!error.is_credentials());
    }
}
