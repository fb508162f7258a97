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

//! Response types.
//!
//! A response from the service consists of a body (potentially the unit
//! type) and some metadata, currently just headers. Typically you get a
//! response as the result of a remote operation. You may also create
//! responses directly when mocking clients in your own tests.

/// Represents a service response.
///
/// # Example
/// ```
/// # use mgx::response::Response;
/// #[derive(Clone, Default)]
/// struct Resource {
///     // ...
/// }
/// fn make_mock_response(body: Resource) -> Response<Resource> {
///     Response::from(body)
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Response<T> {
    parts: Parts,
    body: T,
}

impl<T> Response<T> {
    /// Creates a response from the body, with empty metadata.
    pub fn from(body: T) -> Self {
        Self {
            parts: Parts::default(),
            body,
        }
    }

    /// Creates a response from the given parts.
    pub fn from_parts(parts: Parts, body: T) -> Self {
        Self { parts, body }
    }

    /// Returns the headers associated with this response.
    pub fn headers(&self) -> &http::HeaderMap<http::HeaderValue> {
        &self.parts.headers
    }

    /// Returns the body associated with this response.
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Consumes the response, returning the metadata and body.
    pub fn into_parts(self) -> (Parts, T) {
        (self.parts, self.body)
    }

    /// Consumes the response, returning just the body.
    ///
    /// # Example
    /// ```
    /// # use mgx::response::Response;
    /// let response = Response::from("test".to_string());
    /// assert_eq!(response.into_body().as_str(), "test");
    /// ```
    pub fn into_body(self) -> T {
        self.body
    }

    /// Applies a function to the body, preserving the metadata.
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            parts: self.parts,
            body: f(self.body),
        }
    }
}

/// The metadata of a service response.
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct Parts {
    /// The headers returned with the response.
    pub headers: http::HeaderMap<http::HeaderValue>,
}

impl Parts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the headers on these parts.
    pub fn set_headers<T: Into<http::HeaderMap<http::HeaderValue>>>(mut self, v: T) -> Self {
        self.headers = v.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_body() {
        let response = Response::from("abc".to_string());
        assert_eq!(response.body().as_str(), "abc");
        assert!(response.headers().is_empty());
        let (parts, body) = response.into_parts();
        assert_eq!(body.as_str(), "abc");
        assert!(parts.headers.is_empty());
    }

    #[test]
    fn response_map() {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        let response = Response::from_parts(Parts::new().set_headers(headers), 42_i32);
        let response = response.map(|v| v.to_string());
        assert_eq!(response.body().as_str(), "42");
        assert!(
            response
                .headers()
                .get(http::header::CONTENT_TYPE)
                .is_some()
        );
    }
}
