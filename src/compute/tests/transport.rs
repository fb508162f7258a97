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

//! Exercises the HTTP transport against a local server.

use compute_mgmt::client::Compute;
use compute_mgmt::credentials::Credentials;
use httptest::{Expectation, Server, matchers::*, responders::*};
use serde_json::json;

fn test_client(server: &Server) -> Compute {
    Compute::builder()
        .with_endpoint(format!("http://{}", server.addr()))
        .with_credentials(Credentials::bearer("test-token"))
        .build()
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn get_sends_credentials_and_decodes_the_body() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/v1/projects/my-project/zones/zone-a/virtualMachines/vm-1"),
            request::headers(contains(("authorization", "Bearer test-token"))),
        ])
        .respond_with(json_encoded(json!({
            "name": "vm-1",
            "machineSize": "standard-4",
            "provisioningState": "succeeded",
        }))),
    );

    let client = test_client(&server);
    let machine = client
        .virtual_machines("my-project", "zone-a")
        .get("vm-1")
        .await
        .unwrap();
    assert_eq!(machine.name, "vm-1");
    assert_eq!(machine.machine_size, "standard-4");
    assert_eq!(machine.provisioning_state, "succeeded");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn insert_serializes_the_payload() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/v1/projects/my-project/zones/zone-a/virtualMachines"),
            request::body(json_decoded(eq(json!({
                "name": "vm-9",
                "zone": "zone-a",
                "machineSize": "standard-2",
            })))),
        ])
        .respond_with(json_encoded(json!({
            "name": "vm-9",
            "provisioningState": "creating",
        }))),
    );

    let client = test_client(&server);
    let machine = client
        .virtual_machines("my-project", "zone-a")
        .define("vm-9")
        .set_machine_size("standard-2")
        .create()
        .await
        .unwrap();
    assert_eq!(machine.provisioning_state, "creating");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn service_errors_carry_the_status_payload() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path(
            "GET",
            "/v1/projects/my-project/zones/zone-a/virtualMachines/missing",
        ))
        .respond_with(
            status_code(404).body(
                json!({
                    "error": {
                        "code": 404,
                        "message": "virtual machine `missing` was not found",
                        "status": "NOT_FOUND",
                    }
                })
                .to_string(),
            ),
        ),
    );

    let client = test_client(&server);
    let err = client
        .virtual_machines("my-project", "zone-a")
        .get("missing")
        .await
        .unwrap_err();
    let status = err.status().expect("a service error should carry a status");
    assert_eq!(status.code, 404);
    assert_eq!(status.status, "NOT_FOUND");
    assert!(status.message.contains("missing"), "{status}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn delete_accepts_an_empty_body() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path(
            "DELETE",
            "/v1/projects/my-project/zones/zone-a/virtualMachines/vm-1",
        ))
        .respond_with(status_code(200)),
    );

    let client = test_client(&server);
    client
        .virtual_machines("my-project", "zone-a")
        .delete("vm-1")
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn list_follows_page_tokens() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path(
            "GET",
            "/v1/projects/my-project/zones/zone-a/virtualMachines",
        ))
        .times(2)
        .respond_with(cycle![
            json_encoded(json!({
                "items": [{"name": "vm-1"}],
                "nextPageToken": "page-2",
            })),
            json_encoded(json!({
                "items": [{"name": "vm-2"}],
            })),
        ]),
    );

    let client = test_client(&server);
    let mut items = client.virtual_machines("my-project", "zone-a").list().items();
    let mut names = Vec::new();
    while let Some(machine) = items.next().await.transpose().unwrap() {
        names.push(machine.name);
    }
    assert_eq!(names, ["vm-1", "vm-2"]);
}
