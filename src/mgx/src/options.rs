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

//! Per-request configuration.

use std::time::Duration;

/// The configuration applied to a single request.
///
/// Every operation on the transport stubs receives a `RequestOptions`
/// value. The fluent request builders populate it from any per-call
/// overrides the application supplies; unset fields fall back to the
/// client defaults.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    attempt_timeout: Option<Duration>,
    user_agent: Option<String>,
    idempotent: Option<bool>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout for this request.
    ///
    /// The deadline covers one attempt only; this layer performs no
    /// retries.
    pub fn set_attempt_timeout<T: Into<Duration>>(mut self, v: T) -> Self {
        self.attempt_timeout = Some(v.into());
        self
    }

    /// The configured attempt timeout, if any.
    pub fn attempt_timeout(&self) -> Option<&Duration> {
        self.attempt_timeout.as_ref()
    }

    /// Prepends a value to the `User-Agent` header for this request.
    pub fn set_user_agent<T: Into<String>>(mut self, v: T) -> Self {
        self.user_agent = Some(v.into());
        self
    }

    /// The configured user agent, if any.
    pub fn user_agent(&self) -> Option<&String> {
        self.user_agent.as_ref()
    }

    /// Declares whether the request is idempotent.
    ///
    /// The transport collaborator may use this to decide whether a failed
    /// request is safe to resend.
    pub fn set_idempotent<T: Into<bool>>(mut self, v: T) -> Self {
        self.idempotent = Some(v.into());
        self
    }

    /// The configured idempotency, if any.
    pub fn idempotent(&self) -> Option<bool> {
        self.idempotent
    }
}
