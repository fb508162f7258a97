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

//! Credentials for the compute management client.
//!
//! The full credential exchange (token acquisition, refresh, impersonation)
//! lives in a separate authentication library. This module only defines the
//! narrow seam the transport needs: something that can produce request
//! headers.

use http::{HeaderMap, HeaderName, HeaderValue};

/// The credentials attached to every request.
///
/// # Example
/// ```
/// use compute_mgmt::credentials::Credentials;
/// let credentials = Credentials::bearer("a-service-token");
/// ```
#[derive(Clone)]
pub struct Credentials {
    inner: Inner,
}

#[derive(Clone)]
enum Inner {
    Anonymous,
    Bearer(String),
}

impl Credentials {
    /// Credentials that attach no headers.
    ///
    /// Useful for emulators and local test servers.
    pub fn anonymous() -> Self {
        Self {
            inner: Inner::Anonymous,
        }
    }

    /// Credentials using a fixed bearer token.
    pub fn bearer<T: Into<String>>(token: T) -> Self {
        Self {
            inner: Inner::Bearer(token.into()),
        }
    }

    /// The headers to attach to a request.
    pub(crate) fn headers(&self) -> mgx::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        match &self.inner {
            Inner::Anonymous => {}
            Inner::Bearer(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(mgx::error::Error::ser)?;
                headers.insert(HeaderName::from_static("authorization"), value);
            }
        }
        Ok(headers)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token.
        match &self.inner {
            Inner::Anonymous => f.debug_struct("Anonymous").finish(),
            Inner::Bearer(_) => f.debug_struct("Bearer").finish_non_exhaustive(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::anonymous()
    }
}
