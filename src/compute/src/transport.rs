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

//! The default HTTP transport for the compute management client.

use crate::credentials::Credentials;
use crate::model::*;
use crate::stub;
use mgx::Result;
use mgx::error::Error;
use mgx::options::RequestOptions;
use mgx::response::{Parts, Response};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// The characters that must be escaped inside a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

fn enc(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: mgx::error::Status,
}

/// A [stub::Compute] implementation over HTTP and JSON.
#[derive(Clone, Debug)]
pub(crate) struct ReqwestCompute {
    inner: reqwest::Client,
    endpoint: String,
    credentials: Credentials,
}

impl ReqwestCompute {
    pub(crate) fn new(
        endpoint: String,
        credentials: Credentials,
    ) -> mgx::client_builder::Result<Self> {
        let inner = reqwest::Client::builder()
            .build()
            .map_err(mgx::client_builder::Error::transport)?;
        Ok(Self {
            inner,
            endpoint,
            credentials,
        })
    }

    fn builder(&self, method: reqwest::Method, path: String) -> reqwest::RequestBuilder {
        self.inner.request(method, format!("{}{path}", &self.endpoint))
    }

    async fn execute<I, O>(
        &self,
        mut builder: reqwest::RequestBuilder,
        body: Option<I>,
        options: RequestOptions,
    ) -> Result<Response<O>>
    where
        I: serde::ser::Serialize,
        O: serde::de::DeserializeOwned + Default,
    {
        if let Some(timeout) = options.attempt_timeout() {
            builder = builder.timeout(*timeout);
        }
        if let Some(user_agent) = options.user_agent() {
            builder = builder.header(
                reqwest::header::USER_AGENT,
                reqwest::header::HeaderValue::from_str(user_agent).map_err(Error::ser)?,
            );
        }
        for (key, value) in self.credentials.headers()?.iter() {
            builder = builder.header(key, value);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        let response = builder.send().await.map_err(Self::map_send_error)?;
        if !response.status().is_success() {
            return Self::to_http_error(response).await;
        }
        Self::to_http_response(response).await
    }

    fn map_send_error(err: reqwest::Error) -> Error {
        match err {
            e if e.is_timeout() => Error::timeout(e),
            e => Error::io(e),
        }
    }

    async fn to_http_error<O>(response: reqwest::Response) -> Result<Response<O>> {
        let code = response.status().as_u16();
        let bytes = response.bytes().await.map_err(Error::io)?;
        let status = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                mgx::error::Status::new()
                    .set_code(code)
                    .set_message(String::from_utf8_lossy(&bytes).into_owned())
            });
        // Services occasionally omit the numeric code from the payload.
        let status = if status.code == 0 {
            status.set_code(code)
        } else {
            status
        };
        Err(Error::service(status))
    }

    async fn to_http_response<O>(response: reqwest::Response) -> Result<Response<O>>
    where
        O: serde::de::DeserializeOwned + Default,
    {
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(Error::io)?;
        let body = if bytes.is_empty() {
            O::default()
        } else {
            serde_json::from_slice::<O>(&bytes).map_err(Error::deser)?
        };
        Ok(Response::from_parts(Parts::new().set_headers(headers), body))
    }

    fn paged(builder: reqwest::RequestBuilder, page_token: &str) -> reqwest::RequestBuilder {
        if page_token.is_empty() {
            builder
        } else {
            builder.query(&[("pageToken", page_token)])
        }
    }
}

#[async_trait::async_trait]
impl stub::Compute for ReqwestCompute {
    async fn list_virtual_machines(
        &self,
        project: String,
        zone: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListVirtualMachinesResponse>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!(
                "/v1/projects/{}/zones/{}/virtualMachines",
                enc(&project),
                enc(&zone)
            ),
        );
        let builder = Self::paged(builder, &page_token);
        self.execute(builder, None::<()>, options).await
    }

    async fn get_virtual_machine(
        &self,
        project: String,
        zone: String,
        name: String,
        options: RequestOptions,
    ) -> Result<Response<VirtualMachine>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!(
                "/v1/projects/{}/zones/{}/virtualMachines/{}",
                enc(&project),
                enc(&zone),
                enc(&name)
            ),
        );
        self.execute(builder, None::<()>, options).await
    }

    async fn insert_virtual_machine(
        &self,
        project: String,
        zone: String,
        payload: VirtualMachine,
        options: RequestOptions,
    ) -> Result<Response<VirtualMachine>> {
        let builder = self.builder(
            reqwest::Method::POST,
            format!(
                "/v1/projects/{}/zones/{}/virtualMachines",
                enc(&project),
                enc(&zone)
            ),
        );
        self.execute(builder, Some(payload), options).await
    }

    async fn patch_virtual_machine(
        &self,
        project: String,
        zone: String,
        name: String,
        payload: VirtualMachine,
        options: RequestOptions,
    ) -> Result<Response<VirtualMachine>> {
        let builder = self.builder(
            reqwest::Method::PATCH,
            format!(
                "/v1/projects/{}/zones/{}/virtualMachines/{}",
                enc(&project),
                enc(&zone),
                enc(&name)
            ),
        );
        self.execute(builder, Some(payload), options).await
    }

    async fn delete_virtual_machine(
        &self,
        project: String,
        zone: String,
        name: String,
        options: RequestOptions,
    ) -> Result<Response<()>> {
        let builder = self.builder(
            reqwest::Method::DELETE,
            format!(
                "/v1/projects/{}/zones/{}/virtualMachines/{}",
                enc(&project),
                enc(&zone),
                enc(&name)
            ),
        );
        self.execute(builder, None::<()>, options).await
    }

    async fn list_extensions(
        &self,
        project: String,
        zone: String,
        virtual_machine: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListExtensionsResponse>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!(
                "/v1/projects/{}/zones/{}/virtualMachines/{}/extensions",
                enc(&project),
                enc(&zone),
                enc(&virtual_machine)
            ),
        );
        let builder = Self::paged(builder, &page_token);
        self.execute(builder, None::<()>, options).await
    }

    async fn insert_extension(
        &self,
        project: String,
        zone: String,
        virtual_machine: String,
        payload: Extension,
        options: RequestOptions,
    ) -> Result<Response<Extension>> {
        let builder = self.builder(
            reqwest::Method::POST,
            format!(
                "/v1/projects/{}/zones/{}/virtualMachines/{}/extensions",
                enc(&project),
                enc(&zone),
                enc(&virtual_machine)
            ),
        );
        self.execute(builder, Some(payload), options).await
    }

    async fn patch_extension(
        &self,
        project: String,
        zone: String,
        virtual_machine: String,
        name: String,
        payload: Extension,
        options: RequestOptions,
    ) -> Result<Response<Extension>> {
        let builder = self.builder(
            reqwest::Method::PATCH,
            format!(
                "/v1/projects/{}/zones/{}/virtualMachines/{}/extensions/{}",
                enc(&project),
                enc(&zone),
                enc(&virtual_machine),
                enc(&name)
            ),
        );
        self.execute(builder, Some(payload), options).await
    }

    async fn delete_extension(
        &self,
        project: String,
        zone: String,
        virtual_machine: String,
        name: String,
        options: RequestOptions,
    ) -> Result<Response<()>> {
        let builder = self.builder(
            reqwest::Method::DELETE,
            format!(
                "/v1/projects/{}/zones/{}/virtualMachines/{}/extensions/{}",
                enc(&project),
                enc(&zone),
                enc(&virtual_machine),
                enc(&name)
            ),
        );
        self.execute(builder, None::<()>, options).await
    }

    async fn list_disks(
        &self,
        project: String,
        zone: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListDisksResponse>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!("/v1/projects/{}/zones/{}/disks", enc(&project), enc(&zone)),
        );
        let builder = Self::paged(builder, &page_token);
        self.execute(builder, None::<()>, options).await
    }

    async fn get_disk(
        &self,
        project: String,
        zone: String,
        name: String,
        options: RequestOptions,
    ) -> Result<Response<Disk>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!(
                "/v1/projects/{}/zones/{}/disks/{}",
                enc(&project),
                enc(&zone),
                enc(&name)
            ),
        );
        self.execute(builder, None::<()>, options).await
    }

    async fn list_snapshots(
        &self,
        project: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListSnapshotsResponse>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!("/v1/projects/{}/snapshots", enc(&project)),
        );
        let builder = Self::paged(builder, &page_token);
        self.execute(builder, None::<()>, options).await
    }

    async fn get_snapshot(
        &self,
        project: String,
        name: String,
        options: RequestOptions,
    ) -> Result<Response<Snapshot>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!("/v1/projects/{}/snapshots/{}", enc(&project), enc(&name)),
        );
        self.execute(builder, None::<()>, options).await
    }

    async fn list_scale_sets(
        &self,
        project: String,
        zone: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListScaleSetsResponse>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!(
                "/v1/projects/{}/zones/{}/scaleSets",
                enc(&project),
                enc(&zone)
            ),
        );
        let builder = Self::paged(builder, &page_token);
        self.execute(builder, None::<()>, options).await
    }

    async fn get_scale_set(
        &self,
        project: String,
        zone: String,
        name: String,
        options: RequestOptions,
    ) -> Result<Response<ScaleSet>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!(
                "/v1/projects/{}/zones/{}/scaleSets/{}",
                enc(&project),
                enc(&zone),
                enc(&name)
            ),
        );
        self.execute(builder, None::<()>, options).await
    }

    async fn list_availability_sets(
        &self,
        project: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListAvailabilitySetsResponse>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!("/v1/projects/{}/availabilitySets", enc(&project)),
        );
        let builder = Self::paged(builder, &page_token);
        self.execute(builder, None::<()>, options).await
    }

    async fn get_availability_set(
        &self,
        project: String,
        name: String,
        options: RequestOptions,
    ) -> Result<Response<AvailabilitySet>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!(
                "/v1/projects/{}/availabilitySets/{}",
                enc(&project),
                enc(&name)
            ),
        );
        self.execute(builder, None::<()>, options).await
    }

    async fn list_publishers(
        &self,
        location: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListPublishersResponse>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!("/v1/locations/{}/publishers", enc(&location)),
        );
        let builder = Self::paged(builder, &page_token);
        self.execute(builder, None::<()>, options).await
    }

    async fn list_offers(
        &self,
        location: String,
        publisher: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListOffersResponse>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!(
                "/v1/locations/{}/publishers/{}/offers",
                enc(&location),
                enc(&publisher)
            ),
        );
        let builder = Self::paged(builder, &page_token);
        self.execute(builder, None::<()>, options).await
    }

    async fn list_skus(
        &self,
        location: String,
        publisher: String,
        offer: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListSkusResponse>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!(
                "/v1/locations/{}/publishers/{}/offers/{}/skus",
                enc(&location),
                enc(&publisher),
                enc(&offer)
            ),
        );
        let builder = Self::paged(builder, &page_token);
        self.execute(builder, None::<()>, options).await
    }

    async fn list_sku_images(
        &self,
        location: String,
        publisher: String,
        offer: String,
        sku: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListImagesResponse>> {
        let builder = self.builder(
            reqwest::Method::GET,
            format!(
                "/v1/locations/{}/publishers/{}/offers/{}/skus/{}/images",
                enc(&location),
                enc(&publisher),
                enc(&offer),
                enc(&sku)
            ),
        );
        let builder = Self::paged(builder, &page_token);
        self.execute(builder, None::<()>, options).await
    }
}
