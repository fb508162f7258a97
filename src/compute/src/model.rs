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

//! The resource model for the compute management service.
//!
//! All types serialize to the JSON representation used on the wire. The
//! `set_*` methods are chainable and follow the builder style used across
//! these client libraries.

use std::collections::HashMap;

/// A virtual machine resource.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct VirtualMachine {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,

    /// The machine size, e.g. `standard-4`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub machine_size: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_disk: Option<AttachedDisk>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_disks: Vec<AttachedDisk>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,

    /// Output only. The lifecycle state reported by the service.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provisioning_state: String,
}

impl VirtualMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][VirtualMachine::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [zone][VirtualMachine::zone].
    pub fn set_zone<T: Into<String>>(mut self, v: T) -> Self {
        self.zone = v.into();
        self
    }

    /// Sets the value of [machine_size][VirtualMachine::machine_size].
    pub fn set_machine_size<T: Into<String>>(mut self, v: T) -> Self {
        self.machine_size = v.into();
        self
    }

    /// Sets the value of [os_disk][VirtualMachine::os_disk].
    pub fn set_os_disk<T: Into<AttachedDisk>>(mut self, v: T) -> Self {
        self.os_disk = Some(v.into());
        self
    }

    /// Sets the value of [data_disks][VirtualMachine::data_disks].
    pub fn set_data_disks<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<AttachedDisk>,
    {
        self.data_disks = v.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the value of [tags][VirtualMachine::tags].
    pub fn set_tags<T, K, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.tags = v.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }
}

/// A disk attached to a virtual machine, inline in the machine payload.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct AttachedDisk {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<i64>,

    /// The source disk resource, when attaching an existing disk.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
}

impl AttachedDisk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][AttachedDisk::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [size_gb][AttachedDisk::size_gb].
    pub fn set_size_gb<T: Into<i64>>(mut self, v: T) -> Self {
        self.size_gb = Some(v.into());
        self
    }

    /// Sets the value of [source][AttachedDisk::source].
    pub fn set_source<T: Into<String>>(mut self, v: T) -> Self {
        self.source = v.into();
        self
    }
}

/// A guest extension installed on a virtual machine.
///
/// Extensions are managed as external child resources of the machine: each
/// one is created, updated, or deleted with its own remote call, scoped to
/// the owning machine.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Extension {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publisher: String,

    /// The extension type, e.g. `guest-agent`.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub extension_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub type_handler_version: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub auto_upgrade_minor_version: bool,

    /// Free-form public settings for the extension handler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,

    /// Output only. The lifecycle state reported by the service.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provisioning_state: String,
}

impl Extension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Extension::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [publisher][Extension::publisher].
    pub fn set_publisher<T: Into<String>>(mut self, v: T) -> Self {
        self.publisher = v.into();
        self
    }

    /// Sets the value of [extension_type][Extension::extension_type].
    pub fn set_extension_type<T: Into<String>>(mut self, v: T) -> Self {
        self.extension_type = v.into();
        self
    }

    /// Sets the value of [type_handler_version][Extension::type_handler_version].
    pub fn set_type_handler_version<T: Into<String>>(mut self, v: T) -> Self {
        self.type_handler_version = v.into();
        self
    }

    /// Sets the value of [auto_upgrade_minor_version][Extension::auto_upgrade_minor_version].
    pub fn set_auto_upgrade_minor_version<T: Into<bool>>(mut self, v: T) -> Self {
        self.auto_upgrade_minor_version = v.into();
        self
    }

    /// Sets the value of [settings][Extension::settings].
    pub fn set_settings<T: Into<serde_json::Value>>(mut self, v: T) -> Self {
        self.settings = Some(v.into());
        self
    }
}

/// A standalone managed disk.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Disk {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<i64>,

    /// The snapshot this disk was created from, if any.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_snapshot: String,
}

impl Disk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Disk::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [zone][Disk::zone].
    pub fn set_zone<T: Into<String>>(mut self, v: T) -> Self {
        self.zone = v.into();
        self
    }

    /// Sets the value of [size_gb][Disk::size_gb].
    pub fn set_size_gb<T: Into<i64>>(mut self, v: T) -> Self {
        self.size_gb = Some(v.into());
        self
    }

    /// Sets the value of [source_snapshot][Disk::source_snapshot].
    pub fn set_source_snapshot<T: Into<String>>(mut self, v: T) -> Self {
        self.source_snapshot = v.into();
        self
    }
}

/// A point-in-time snapshot of a disk.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_disk: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<i64>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Snapshot::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [source_disk][Snapshot::source_disk].
    pub fn set_source_disk<T: Into<String>>(mut self, v: T) -> Self {
        self.source_disk = v.into();
        self
    }

    /// Sets the value of [disk_size_gb][Snapshot::disk_size_gb].
    pub fn set_disk_size_gb<T: Into<i64>>(mut self, v: T) -> Self {
        self.disk_size_gb = Some(v.into());
        self
    }
}

/// A machine image in the catalog.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Image {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publisher: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub offer: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sku: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
}

impl Image {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Image::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [publisher][Image::publisher].
    pub fn set_publisher<T: Into<String>>(mut self, v: T) -> Self {
        self.publisher = v.into();
        self
    }

    /// Sets the value of [offer][Image::offer].
    pub fn set_offer<T: Into<String>>(mut self, v: T) -> Self {
        self.offer = v.into();
        self
    }

    /// Sets the value of [sku][Image::sku].
    pub fn set_sku<T: Into<String>>(mut self, v: T) -> Self {
        self.sku = v.into();
        self
    }

    /// Sets the value of [version][Image::version].
    pub fn set_version<T: Into<String>>(mut self, v: T) -> Self {
        self.version = v.into();
        self
    }
}

/// A group of identical virtual machines scaled as one unit.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ScaleSet {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i64>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub machine_size: String,
}

impl ScaleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][ScaleSet::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [zone][ScaleSet::zone].
    pub fn set_zone<T: Into<String>>(mut self, v: T) -> Self {
        self.zone = v.into();
        self
    }

    /// Sets the value of [capacity][ScaleSet::capacity].
    pub fn set_capacity<T: Into<i64>>(mut self, v: T) -> Self {
        self.capacity = Some(v.into());
        self
    }

    /// Sets the value of [machine_size][ScaleSet::machine_size].
    pub fn set_machine_size<T: Into<String>>(mut self, v: T) -> Self {
        self.machine_size = v.into();
        self
    }
}

/// A placement group constraining how machines share fault domains.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct AvailabilitySet {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_domain_count: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_domain_count: Option<i32>,
}

impl AvailabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][AvailabilitySet::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [fault_domain_count][AvailabilitySet::fault_domain_count].
    pub fn set_fault_domain_count<T: Into<i32>>(mut self, v: T) -> Self {
        self.fault_domain_count = Some(v.into());
        self
    }

    /// Sets the value of [update_domain_count][AvailabilitySet::update_domain_count].
    pub fn set_update_domain_count<T: Into<i32>>(mut self, v: T) -> Self {
        self.update_domain_count = Some(v.into());
        self
    }
}

/// An image publisher in the catalog.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Publisher {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl Publisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Publisher::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }
}

/// An offer published under one publisher.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Offer {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publisher: String,
}

impl Offer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Offer::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [publisher][Offer::publisher].
    pub fn set_publisher<T: Into<String>>(mut self, v: T) -> Self {
        self.publisher = v.into();
        self
    }
}

/// A stock-keeping unit of an offer.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Sku {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub offer: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publisher: String,
}

impl Sku {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Sku::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [offer][Sku::offer].
    pub fn set_offer<T: Into<String>>(mut self, v: T) -> Self {
        self.offer = v.into();
        self
    }

    /// Sets the value of [publisher][Sku::publisher].
    pub fn set_publisher<T: Into<String>>(mut self, v: T) -> Self {
        self.publisher = v.into();
        self
    }
}

macro_rules! list_response {
    ($(#[$meta:meta])* $name:ident, $item:ty) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        #[non_exhaustive]
        pub struct $name {
            #[serde(default, skip_serializing_if = "Vec::is_empty")]
            pub items: Vec<$item>,

            #[serde(default, skip_serializing_if = "String::is_empty")]
            pub next_page_token: String,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            /// Sets the items in this page.
            pub fn set_items<T, V>(mut self, v: T) -> Self
            where
                T: IntoIterator<Item = V>,
                V: Into<$item>,
            {
                self.items = v.into_iter().map(Into::into).collect();
                self
            }

            /// Sets the continuation token of this page.
            pub fn set_next_page_token<T: Into<String>>(mut self, v: T) -> Self {
                self.next_page_token = v.into();
                self
            }
        }

        impl mgx::paginator::PageableResponse for $name {
            type PageItem = $item;

            fn items(self) -> Vec<$item> {
                self.items
            }

            fn next_page_token(&self) -> String {
                self.next_page_token.clone()
            }
        }
    };
}

list_response!(
    /// The response of a virtual machine list operation.
    ListVirtualMachinesResponse,
    VirtualMachine
);
list_response!(
    /// The response of an extension list operation.
    ListExtensionsResponse,
    Extension
);
list_response!(
    /// The response of a disk list operation.
    ListDisksResponse,
    Disk
);
list_response!(
    /// The response of a snapshot list operation.
    ListSnapshotsResponse,
    Snapshot
);
list_response!(
    /// The response of an image list operation.
    ListImagesResponse,
    Image
);
list_response!(
    /// The response of a scale set list operation.
    ListScaleSetsResponse,
    ScaleSet
);
list_response!(
    /// The response of an availability set list operation.
    ListAvailabilitySetsResponse,
    AvailabilitySet
);
list_response!(
    /// The response of a publisher list operation.
    ListPublishersResponse,
    Publisher
);
list_response!(
    /// The response of an offer list operation.
    ListOffersResponse,
    Offer
);
list_response!(
    /// The response of a sku list operation.
    ListSkusResponse,
    Sku
);

#[cfg(test)]
mod tests {
    use super::*;
    use mgx::paginator::PageableResponse as _;

    #[test]
    fn virtual_machine_roundtrip() {
        let vm = VirtualMachine::new()
            .set_name("vm-1")
            .set_zone("zone-a")
            .set_machine_size("standard-4")
            .set_os_disk(AttachedDisk::new().set_name("os").set_size_gb(64_i64))
            .set_tags([("env", "test")]);
        let json = serde_json::to_value(&vm).unwrap();
        assert_eq!(json["name"], "vm-1");
        assert_eq!(json["machineSize"], "standard-4");
        assert_eq!(json["osDisk"]["sizeGb"], 64);
        let back = serde_json::from_value::<VirtualMachine>(json).unwrap();
        assert_eq!(back, vm);
    }

    #[test]
    fn extension_type_field_rename() {
        let ext = Extension::new()
            .set_name("agent")
            .set_extension_type("guest-agent")
            .set_auto_upgrade_minor_version(true)
            .set_settings(serde_json::json!({"interval": 30}));
        let json = serde_json::to_value(&ext).unwrap();
        assert_eq!(json["type"], "guest-agent");
        assert_eq!(json["autoUpgradeMinorVersion"], true);
        let back = serde_json::from_value::<Extension>(json).unwrap();
        assert_eq!(back, ext);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = serde_json::json!({
            "name": "vm-2",
            "somethingNewer": {"a": 1},
        });
        let vm = serde_json::from_value::<VirtualMachine>(json).unwrap();
        assert_eq!(vm.name, "vm-2");
    }

    #[test]
    fn list_response_is_pageable() {
        let response = ListVirtualMachinesResponse::new()
            .set_items([VirtualMachine::new().set_name("vm-1")])
            .set_next_page_token("token-1");
        assert_eq!(response.next_page_token(), "token-1");
        let items = response.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "vm-1");
    }
}
