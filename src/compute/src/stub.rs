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

//! The transport stub for the compute management service.
//!
//! [Compute](crate::client::Compute) delegates every remote operation to an
//! implementation of the [Compute](trait@Compute) trait in this module. The
//! default implementation sends HTTP requests; tests substitute a mock, for
//! example with [mockall]:
//!
//! [mockall]: https://docs.rs/mockall

use crate::model::*;
use mgx::Result;
use mgx::options::RequestOptions;
use mgx::response::Response;

/// Defines the remote operations used by the compute management client.
///
/// Each list operation returns one page of results; an empty
/// `next_page_token` on the response indicates the last page. Operations on
/// extensions are scoped to one owning virtual machine; the service exposes
/// no bulk endpoint for them.
#[async_trait::async_trait]
pub trait Compute: std::fmt::Debug + Send + Sync {
    async fn list_virtual_machines(
        &self,
        project: String,
        zone: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListVirtualMachinesResponse>>;

    async fn get_virtual_machine(
        &self,
        project: String,
        zone: String,
        name: String,
        options: RequestOptions,
    ) -> Result<Response<VirtualMachine>>;

    async fn insert_virtual_machine(
        &self,
        project: String,
        zone: String,
        payload: VirtualMachine,
        options: RequestOptions,
    ) -> Result<Response<VirtualMachine>>;

    async fn patch_virtual_machine(
        &self,
        project: String,
        zone: String,
        name: String,
        payload: VirtualMachine,
        options: RequestOptions,
    ) -> Result<Response<VirtualMachine>>;

    async fn delete_virtual_machine(
        &self,
        project: String,
        zone: String,
        name: String,
        options: RequestOptions,
    ) -> Result<Response<()>>;

    async fn list_extensions(
        &self,
        project: String,
        zone: String,
        virtual_machine: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListExtensionsResponse>>;

    async fn insert_extension(
        &self,
        project: String,
        zone: String,
        virtual_machine: String,
        payload: Extension,
        options: RequestOptions,
    ) -> Result<Response<Extension>>;

    async fn patch_extension(
        &self,
        project: String,
        zone: String,
        virtual_machine: String,
        name: String,
        payload: Extension,
        options: RequestOptions,
    ) -> Result<Response<Extension>>;

    async fn delete_extension(
        &self,
        project: String,
        zone: String,
        virtual_machine: String,
        name: String,
        options: RequestOptions,
    ) -> Result<Response<()>>;

    async fn list_disks(
        &self,
        project: String,
        zone: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListDisksResponse>>;

    async fn get_disk(
        &self,
        project: String,
        zone: String,
        name: String,
        options: RequestOptions,
    ) -> Result<Response<Disk>>;

    async fn list_snapshots(
        &self,
        project: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListSnapshotsResponse>>;

    async fn get_snapshot(
        &self,
        project: String,
        name: String,
        options: RequestOptions,
    ) -> Result<Response<Snapshot>>;

    async fn list_scale_sets(
        &self,
        project: String,
        zone: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListScaleSetsResponse>>;

    async fn get_scale_set(
        &self,
        project: String,
        zone: String,
        name: String,
        options: RequestOptions,
    ) -> Result<Response<ScaleSet>>;

    async fn list_availability_sets(
        &self,
        project: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListAvailabilitySetsResponse>>;

    async fn get_availability_set(
        &self,
        project: String,
        name: String,
        options: RequestOptions,
    ) -> Result<Response<AvailabilitySet>>;

    async fn list_publishers(
        &self,
        location: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListPublishersResponse>>;

    async fn list_offers(
        &self,
        location: String,
        publisher: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListOffersResponse>>;

    async fn list_skus(
        &self,
        location: String,
        publisher: String,
        offer: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListSkusResponse>>;

    async fn list_sku_images(
        &self,
        location: String,
        publisher: String,
        offer: String,
        sku: String,
        page_token: String,
        options: RequestOptions,
    ) -> Result<Response<ListImagesResponse>>;
}
