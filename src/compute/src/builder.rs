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

//! Fluent definition and update flows for virtual machines.
//!
//! A definition stages a brand-new machine and creates it with one call.
//! An update stages changes to an existing machine, including its guest
//! extensions, and applies everything with [VirtualMachineUpdate::apply]:
//! the machine's own changes go out as one patch, the extension changes
//! are reconciled through the external child resource engine.

use crate::error::StagingError;
use crate::external::{ChildOperations, ExternalChildSet};
use crate::model::{AttachedDisk, Extension, VirtualMachine};
use crate::stub;
use mgx::options::RequestOptions;
use std::sync::Arc;

/// A fluent definition of a virtual machine that does not exist yet.
///
/// # Example
/// ```no_run
/// # use compute_mgmt::client::Compute;
/// # async fn example(client: &Compute) -> mgx::Result<()> {
/// let machine = client
///     .virtual_machines("my-project", "zone-a")
///     .define("vm-1")
///     .set_machine_size("standard-4")
///     .create()
///     .await?;
/// println!("created {}", machine.name);
/// # Ok(()) }
/// ```
pub struct VirtualMachineDefinition {
    stub: Arc<dyn stub::Compute>,
    project: String,
    zone: String,
    payload: VirtualMachine,
}

impl VirtualMachineDefinition {
    pub(crate) fn new(
        stub: Arc<dyn stub::Compute>,
        project: String,
        zone: String,
        name: String,
    ) -> Self {
        let payload = VirtualMachine::new().set_name(name).set_zone(zone.clone());
        Self {
            stub,
            project,
            zone,
            payload,
        }
    }

    /// Sets the machine size of the new machine.
    pub fn set_machine_size<T: Into<String>>(mut self, v: T) -> Self {
        self.payload = self.payload.set_machine_size(v);
        self
    }

    /// Sets the OS disk of the new machine.
    pub fn set_os_disk<T: Into<AttachedDisk>>(mut self, v: T) -> Self {
        self.payload = self.payload.set_os_disk(v);
        self
    }

    /// Adds a data disk to the new machine.
    pub fn add_data_disk<T: Into<AttachedDisk>>(mut self, v: T) -> Self {
        self.payload.data_disks.push(v.into());
        self
    }

    /// Sets the tags of the new machine.
    pub fn set_tags<T, K, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.payload = self.payload.set_tags(v);
        self
    }

    /// Creates the machine.
    pub async fn create(self) -> mgx::Result<VirtualMachine> {
        self.stub
            .insert_virtual_machine(
                self.project,
                self.zone,
                self.payload,
                RequestOptions::new().set_idempotent(false),
            )
            .await
            .map(|r| r.into_body())
    }
}

/// A fluent update of an existing virtual machine and its extensions.
///
/// Changes to the machine itself are accumulated into one patch. Changes
/// to extensions are staged in an owned collection and reconciled when
/// [apply][VirtualMachineUpdate::apply] runs. On a partial extension
/// failure the update keeps its staged state, so inspecting the
/// [extensions][VirtualMachineUpdate::extensions] collection and calling
/// `apply` again retries only what did not commit.
pub struct VirtualMachineUpdate {
    stub: Arc<dyn stub::Compute>,
    project: String,
    zone: String,
    name: String,
    patch: VirtualMachine,
    extensions: ExternalChildSet<Extension>,
}

impl VirtualMachineUpdate {
    pub(crate) fn new(
        stub: Arc<dyn stub::Compute>,
        project: String,
        zone: String,
        name: String,
    ) -> Self {
        let ops = ExtensionOperations {
            stub: stub.clone(),
            project: project.clone(),
            zone: zone.clone(),
            virtual_machine: name.clone(),
        };
        Self {
            stub,
            project,
            zone,
            name,
            patch: VirtualMachine::new(),
            extensions: ExternalChildSet::new(Arc::new(ops)),
        }
    }

    /// Stages a new machine size.
    pub fn set_machine_size<T: Into<String>>(mut self, v: T) -> Self {
        self.patch = self.patch.set_machine_size(v);
        self
    }

    /// Stages new tags, replacing the current ones.
    pub fn set_tags<T, K, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.patch = self.patch.set_tags(v);
        self
    }

    /// The extension collection of this machine, with any staged changes.
    pub fn extensions(&self) -> &ExternalChildSet<Extension> {
        &self.extensions
    }

    /// Reloads the extension collection from the service.
    ///
    /// Call this before staging updates or removals of extensions that
    /// were not defined through this builder. Discards staged extension
    /// changes.
    pub async fn refresh_extensions(&mut self) -> mgx::Result<()> {
        self.extensions.refresh().await
    }

    /// Starts the definition of a new extension on this machine.
    ///
    /// Fails if an extension with this (case-insensitive) name is already
    /// present. The extension joins the staged set when the definition is
    /// [attached][ExtensionDefinition::attach].
    pub fn define_extension<N: Into<String>>(
        self,
        name: N,
    ) -> Result<ExtensionDefinition, StagingError> {
        let name = name.into();
        let child = self
            .extensions
            .prepare_define(name.clone(), Extension::new().set_name(name))?;
        Ok(ExtensionDefinition {
            update: self,
            child,
        })
    }

    /// Stages an update of an existing extension, returning its payload
    /// for mutation.
    pub fn update_extension(&mut self, name: &str) -> Result<&mut Extension, StagingError> {
        self.extensions
            .prepare_update(name)
            .map(|child| child.payload_mut())
    }

    /// Stages the removal of an existing extension.
    pub fn remove_extension(&mut self, name: &str) -> Result<(), StagingError> {
        self.extensions.prepare_remove(name)
    }

    /// Applies every staged change.
    ///
    /// The machine patch goes out first (skipped when nothing on the
    /// machine itself changed), then all staged extension changes are
    /// reconciled concurrently. When one or more extension operations
    /// fail, the returned error wraps a
    /// [CommitError](crate::error::CommitError) as its
    /// [source](std::error::Error::source); the extensions that did commit
    /// are settled and will not be resubmitted by a retry.
    pub async fn apply(&mut self) -> mgx::Result<VirtualMachine> {
        let machine = if self.patch == VirtualMachine::new() {
            self.stub
                .get_virtual_machine(
                    self.project.clone(),
                    self.zone.clone(),
                    self.name.clone(),
                    RequestOptions::new().set_idempotent(true),
                )
                .await?
        } else {
            self.stub
                .patch_virtual_machine(
                    self.project.clone(),
                    self.zone.clone(),
                    self.name.clone(),
                    self.patch.clone(),
                    RequestOptions::new().set_idempotent(false),
                )
                .await?
        }
        .into_body();
        self.extensions
            .commit()
            .await
            .map_err(mgx::error::Error::other)?;
        Ok(machine)
    }
}

/// A fluent definition of one new extension, attached to a machine update.
pub struct ExtensionDefinition {
    update: VirtualMachineUpdate,
    child: crate::external::ExternalChild<Extension>,
}

impl ExtensionDefinition {
    /// Sets the publisher of the new extension.
    pub fn set_publisher<T: Into<String>>(mut self, v: T) -> Self {
        self.child.payload_mut().publisher = v.into();
        self
    }

    /// Sets the type of the new extension.
    pub fn set_extension_type<T: Into<String>>(mut self, v: T) -> Self {
        self.child.payload_mut().extension_type = v.into();
        self
    }

    /// Sets the handler version of the new extension.
    pub fn set_type_handler_version<T: Into<String>>(mut self, v: T) -> Self {
        self.child.payload_mut().type_handler_version = v.into();
        self
    }

    /// Sets whether minor versions upgrade automatically.
    pub fn set_auto_upgrade_minor_version<T: Into<bool>>(mut self, v: T) -> Self {
        self.child.payload_mut().auto_upgrade_minor_version = v.into();
        self
    }

    /// Sets the public settings of the new extension.
    pub fn set_settings<T: Into<serde_json::Value>>(mut self, v: T) -> Self {
        self.child.payload_mut().settings = Some(v.into());
        self
    }

    /// Attaches the staged extension to the machine update.
    pub fn attach(self) -> Result<VirtualMachineUpdate, StagingError> {
        let Self { mut update, child } = self;
        update.extensions.attach(child)?;
        Ok(update)
    }
}

/// The remote operations for the extensions of one virtual machine.
#[derive(Clone, Debug)]
struct ExtensionOperations {
    stub: Arc<dyn stub::Compute>,
    project: String,
    zone: String,
    virtual_machine: String,
}

#[async_trait::async_trait]
impl ChildOperations<Extension> for ExtensionOperations {
    async fn create(&self, name: String, payload: Extension) -> mgx::Result<Extension> {
        self.stub
            .insert_extension(
                self.project.clone(),
                self.zone.clone(),
                self.virtual_machine.clone(),
                payload.set_name(name),
                RequestOptions::new().set_idempotent(false),
            )
            .await
            .map(|r| r.into_body())
    }

    async fn update(&self, name: String, payload: Extension) -> mgx::Result<Extension> {
        self.stub
            .patch_extension(
                self.project.clone(),
                self.zone.clone(),
                self.virtual_machine.clone(),
                name,
                payload,
                RequestOptions::new().set_idempotent(false),
            )
            .await
            .map(|r| r.into_body())
    }

    async fn delete(&self, name: String) -> mgx::Result<()> {
        self.stub
            .delete_extension(
                self.project.clone(),
                self.zone.clone(),
                self.virtual_machine.clone(),
                name,
                RequestOptions::new().set_idempotent(true),
            )
            .await
            .map(|_| ())
    }

    async fn list(&self) -> mgx::Result<Vec<Extension>> {
        let mut items = Vec::new();
        let mut page_token = String::new();
        loop {
            let response = self
                .stub
                .list_extensions(
                    self.project.clone(),
                    self.zone.clone(),
                    self.virtual_machine.clone(),
                    page_token,
                    RequestOptions::new().set_idempotent(true),
                )
                .await?
                .into_body();
            items.extend(response.items);
            page_token = response.next_page_token;
            if page_token.is_empty() {
                break;
            }
        }
        Ok(items)
    }
}
