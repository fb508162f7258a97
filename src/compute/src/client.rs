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

//! Contains the compute management client and related types.

use crate::builder::{VirtualMachineDefinition, VirtualMachineUpdate};
use crate::credentials::Credentials;
use crate::model::*;
use crate::stub;
use crate::transport::ReqwestCompute;
use mgx::Result;
use mgx::options::RequestOptions;
use mgx::paginator::Paginator;
use std::sync::Arc;

/// The default endpoint of the compute management service.
const DEFAULT_ENDPOINT: &str = "https://compute.management.example.com";

/// Implements a client for the compute management service.
///
/// # Example
/// ```
/// # use compute_mgmt::client::Compute;
/// # fn example() -> mgx::client_builder::Result<()> {
/// let client = Compute::builder().build()?;
/// // use `client` to manage compute resources.
/// # Ok(()) }
/// ```
///
/// # Configuration
///
/// To configure `Compute` use the `with_*` methods on the builder returned
/// by [builder()][Compute::builder]. Common configuration changes include
///
/// * [with_endpoint()][ClientBuilder::with_endpoint]: applications running
///   against a regional or private endpoint must override the default.
/// * [with_credentials()][ClientBuilder::with_credentials]: by default no
///   credentials are attached; most applications supply a bearer token.
///
/// # Pooling and Cloning
///
/// `Compute` holds a connection pool internally, it is advised to create
/// one and then reuse it. You do not need to wrap `Compute` in an
/// [Rc](std::rc::Rc) or [Arc](std::sync::Arc) to reuse it, because it
/// already uses an `Arc` internally.
#[derive(Clone, Debug)]
pub struct Compute {
    stub: Arc<dyn stub::Compute>,
}

impl Compute {
    /// Returns a builder for [Compute].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client from a custom transport stub.
    ///
    /// Useful for tests, which typically pass a mock of
    /// [stub::Compute](crate::stub::Compute).
    pub fn from_stub<T>(stub: T) -> Self
    where
        T: stub::Compute + 'static,
    {
        Self {
            stub: Arc::new(stub),
        }
    }

    /// The virtual machines in one project and zone.
    pub fn virtual_machines<P, Z>(&self, project: P, zone: Z) -> VirtualMachines
    where
        P: Into<String>,
        Z: Into<String>,
    {
        VirtualMachines {
            stub: self.stub.clone(),
            project: project.into(),
            zone: zone.into(),
        }
    }

    /// The managed disks in one project and zone.
    pub fn disks<P, Z>(&self, project: P, zone: Z) -> Disks
    where
        P: Into<String>,
        Z: Into<String>,
    {
        Disks {
            stub: self.stub.clone(),
            project: project.into(),
            zone: zone.into(),
        }
    }

    /// The snapshots in one project.
    pub fn snapshots<P: Into<String>>(&self, project: P) -> Snapshots {
        Snapshots {
            stub: self.stub.clone(),
            project: project.into(),
        }
    }

    /// The scale sets in one project and zone.
    pub fn scale_sets<P, Z>(&self, project: P, zone: Z) -> ScaleSets
    where
        P: Into<String>,
        Z: Into<String>,
    {
        ScaleSets {
            stub: self.stub.clone(),
            project: project.into(),
            zone: zone.into(),
        }
    }

    /// The availability sets in one project.
    pub fn availability_sets<P: Into<String>>(&self, project: P) -> AvailabilitySets {
        AvailabilitySets {
            stub: self.stub.clone(),
            project: project.into(),
        }
    }

    /// The image catalog of one location.
    pub fn images<L: Into<String>>(&self, location: L) -> crate::catalog::Images {
        crate::catalog::Images::new(self.stub.clone(), location.into())
    }
}

/// A builder for [Compute].
pub struct ClientBuilder {
    endpoint: Option<String>,
    credentials: Option<Credentials>,
}

impl ClientBuilder {
    fn new() -> Self {
        Self {
            endpoint: None,
            credentials: None,
        }
    }

    /// Overrides the default endpoint.
    pub fn with_endpoint<T: Into<String>>(mut self, v: T) -> Self {
        self.endpoint = Some(v.into());
        self
    }

    /// Sets the credentials attached to every request.
    pub fn with_credentials<T: Into<Credentials>>(mut self, v: T) -> Self {
        self.credentials = Some(v.into());
        self
    }

    /// Creates the client.
    pub fn build(self) -> mgx::client_builder::Result<Compute> {
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let credentials = self.credentials.unwrap_or_default();
        let transport = ReqwestCompute::new(endpoint, credentials)?;
        Ok(Compute {
            stub: Arc::new(transport),
        })
    }
}

/// The virtual machines of one project and zone.
pub struct VirtualMachines {
    stub: Arc<dyn stub::Compute>,
    project: String,
    zone: String,
}

impl VirtualMachines {
    /// Lists the machines, one page at a time.
    pub fn list(&self) -> Paginator<ListVirtualMachinesResponse, mgx::error::Error> {
        let stub = self.stub.clone();
        let project = self.project.clone();
        let zone = self.zone.clone();
        Paginator::new(String::new(), move |page_token| {
            let stub = stub.clone();
            let project = project.clone();
            let zone = zone.clone();
            async move {
                stub.list_virtual_machines(
                    project,
                    zone,
                    page_token,
                    RequestOptions::new().set_idempotent(true),
                )
                .await
                .map(|r| r.into_body())
            }
        })
    }

    /// Fetches one machine.
    pub async fn get<N: Into<String>>(&self, name: N) -> Result<VirtualMachine> {
        self.stub
            .get_virtual_machine(
                self.project.clone(),
                self.zone.clone(),
                name.into(),
                RequestOptions::new().set_idempotent(true),
            )
            .await
            .map(|r| r.into_body())
    }

    /// Deletes one machine.
    pub async fn delete<N: Into<String>>(&self, name: N) -> Result<()> {
        self.stub
            .delete_virtual_machine(
                self.project.clone(),
                self.zone.clone(),
                name.into(),
                RequestOptions::new().set_idempotent(true),
            )
            .await
            .map(|r| r.into_body())
    }

    /// Starts the fluent definition of a new machine.
    pub fn define<N: Into<String>>(&self, name: N) -> VirtualMachineDefinition {
        VirtualMachineDefinition::new(
            self.stub.clone(),
            self.project.clone(),
            self.zone.clone(),
            name.into(),
        )
    }

    /// Starts a fluent update of an existing machine.
    pub fn update<N: Into<String>>(&self, name: N) -> VirtualMachineUpdate {
        VirtualMachineUpdate::new(
            self.stub.clone(),
            self.project.clone(),
            self.zone.clone(),
            name.into(),
        )
    }
}

/// The managed disks of one project and zone.
pub struct Disks {
    stub: Arc<dyn stub::Compute>,
    project: String,
    zone: String,
}

impl Disks {
    /// Lists the disks, one page at a time.
    pub fn list(&self) -> Paginator<ListDisksResponse, mgx::error::Error> {
        let stub = self.stub.clone();
        let project = self.project.clone();
        let zone = self.zone.clone();
        Paginator::new(String::new(), move |page_token| {
            let stub = stub.clone();
            let project = project.clone();
            let zone = zone.clone();
            async move {
                stub.list_disks(
                    project,
                    zone,
                    page_token,
                    RequestOptions::new().set_idempotent(true),
                )
                .await
                .map(|r| r.into_body())
            }
        })
    }

    /// Fetches one disk.
    pub async fn get<N: Into<String>>(&self, name: N) -> Result<Disk> {
        self.stub
            .get_disk(
                self.project.clone(),
                self.zone.clone(),
                name.into(),
                RequestOptions::new().set_idempotent(true),
            )
            .await
            .map(|r| r.into_body())
    }
}

/// The snapshots of one project.
pub struct Snapshots {
    stub: Arc<dyn stub::Compute>,
    project: String,
}

impl Snapshots {
    /// Lists the snapshots, one page at a time.
    pub fn list(&self) -> Paginator<ListSnapshotsResponse, mgx::error::Error> {
        let stub = self.stub.clone();
        let project = self.project.clone();
        Paginator::new(String::new(), move |page_token| {
            let stub = stub.clone();
            let project = project.clone();
            async move {
                stub.list_snapshots(
                    project,
                    page_token,
                    RequestOptions::new().set_idempotent(true),
                )
                .await
                .map(|r| r.into_body())
            }
        })
    }

    /// Fetches one snapshot.
    pub async fn get<N: Into<String>>(&self, name: N) -> Result<Snapshot> {
        self.stub
            .get_snapshot(
                self.project.clone(),
                name.into(),
                RequestOptions::new().set_idempotent(true),
            )
            .await
            .map(|r| r.into_body())
    }
}

/// The scale sets of one project and zone.
pub struct ScaleSets {
    stub: Arc<dyn stub::Compute>,
    project: String,
    zone: String,
}

impl ScaleSets {
    /// Lists the scale sets, one page at a time.
    pub fn list(&self) -> Paginator<ListScaleSetsResponse, mgx::error::Error> {
        let stub = self.stub.clone();
        let project = self.project.clone();
        let zone = self.zone.clone();
        Paginator::new(String::new(), move |page_token| {
            let stub = stub.clone();
            let project = project.clone();
            let zone = zone.clone();
            async move {
                stub.list_scale_sets(
                    project,
                    zone,
                    page_token,
                    RequestOptions::new().set_idempotent(true),
                )
                .await
                .map(|r| r.into_body())
            }
        })
    }

    /// Fetches one scale set.
    pub async fn get<N: Into<String>>(&self, name: N) -> Result<ScaleSet> {
        self.stub
            .get_scale_set(
                self.project.clone(),
                self.zone.clone(),
                name.into(),
                RequestOptions::new().set_idempotent(true),
            )
            .await
            .map(|r| r.into_body())
    }
}

/// The availability sets of one project.
pub struct AvailabilitySets {
    stub: Arc<dyn stub::Compute>,
    project: String,
}

impl AvailabilitySets {
    /// Lists the availability sets, one page at a time.
    pub fn list(&self) -> Paginator<ListAvailabilitySetsResponse, mgx::error::Error> {
        let stub = self.stub.clone();
        let project = self.project.clone();
        Paginator::new(String::new(), move |page_token| {
            let stub = stub.clone();
            let project = project.clone();
            async move {
                stub.list_availability_sets(
                    project,
                    page_token,
                    RequestOptions::new().set_idempotent(true),
                )
                .await
                .map(|r| r.into_body())
            }
        })
    }

    /// Fetches one availability set.
    pub async fn get<N: Into<String>>(&self, name: N) -> Result<AvailabilitySet> {
        self.stub
            .get_availability_set(
                self.project.clone(),
                name.into(),
                RequestOptions::new().set_idempotent(true),
            )
            .await
            .map(|r| r.into_body())
    }
}
