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

//! The core error types used by the client libraries.

use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The error details returned by the service as part of an unsuccessful
/// HTTP response.
///
/// Services return a JSON payload describing the failure. The client
/// libraries deserialize this payload, when present, and attach it to the
/// [Error] returned to the application.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct Status {
    /// The numeric status code, matching the HTTP status of the response.
    #[serde(default)]
    pub code: u16,
    /// A developer-facing description of the failure.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// The symbolic name of the status code, e.g. `NOT_FOUND`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

impl Status {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [code][Status::code].
    pub fn set_code<T: Into<u16>>(mut self, v: T) -> Self {
        self.code = v.into();
        self
    }

    /// Sets the value of [message][Status::message].
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }

    /// Sets the value of [status][Status::status].
    pub fn set_status<T: Into<String>>(mut self, v: T) -> Self {
        self.status = v.into();
        self
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.code, self.status, self.message)
    }
}

/// The core error returned by all remote operations.
///
/// The client libraries report errors from multiple sources. The service may
/// reject a request, the transport may be unable to complete it, or the
/// library may fail to serialize the request or deserialize the response.
/// This type offers a series of predicates to determine the error kind, and
/// accessors to query the most common error details. Applications can query
/// the error [source][std::error::Error::source] for deeper information.
///
/// # Example
/// ```
/// use mgx::error::Error;
/// fn handle(e: Error) {
///     if let Some(status) = e.status() {
///         println!("the service rejected the request: {status}");
///     } else if e.is_timeout() {
///         println!("not enough time: {e}");
///     } else {
///         println!("some other error: {e}");
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error with the details returned by the service.
    ///
    /// # Example
    /// ```
    /// use mgx::error::{Error, Status};
    /// let status = Status::new().set_code(404_u16).set_message("not found");
    /// let error = Error::service(status.clone());
    /// assert_eq!(error.status(), Some(&status));
    /// ```
    pub fn service(status: Status) -> Self {
        Self {
            kind: ErrorKind::Service(status),
            source: None,
        }
    }

    /// The details returned by the service, if this is a service error.
    pub fn status(&self) -> Option<&Status> {
        match &self.kind {
            ErrorKind::Service(status) => Some(status),
            _ => None,
        }
    }

    /// The HTTP status code of the service error, if any.
    pub fn http_status_code(&self) -> Option<u16> {
        self.status().map(|s| s.code)
    }

    /// Creates an error representing a timeout.
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            source: Some(source.into()),
        }
    }

    /// The request could not be completed before its deadline.
    ///
    /// Note that the request may or may not have started, and may or may not
    /// complete in the service.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Creates an error representing a transport problem.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Io,
            source: Some(source.into()),
        }
    }

    /// The request could not be sent, or the response could not be received.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io)
    }

    /// Creates an error representing a serialization problem.
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Serialization,
            source: Some(source.into()),
        }
    }

    /// The request could not be serialized.
    ///
    /// This error is never transient: it will fail on future attempts with
    /// the same input data.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Serialization)
    }

    /// Creates an error representing a deserialization problem.
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// The response could not be deserialized.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// Creates an error from a problem that does not fit the other kinds.
    ///
    /// # Example
    /// ```
    /// use mgx::error::Error;
    /// let error = Error::other("simulated failure");
    /// ```
    pub fn other<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Other,
            source: Some(source.into()),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ErrorKind::Service(status) => write!(f, "the service reported an error: {status}"),
            ErrorKind::Timeout => write!(f, "the request exceeded its deadline"),
            ErrorKind::Io => write!(f, "the transport reported an error"),
            ErrorKind::Serialization => write!(f, "cannot serialize the request"),
            ErrorKind::Deserialization => write!(f, "cannot deserialize the response"),
            ErrorKind::Other => write!(f, "the operation failed"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

#[derive(Debug)]
enum ErrorKind {
    Service(Status),
    Timeout,
    Io,
    Serialization,
    Deserialization,
    Other,
}
