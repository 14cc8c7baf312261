//! Provider layer tests: dispatcher semantics and resource mapping against
//! wiremock endpoints

use pam_provider::pam::{ClientOptions, PamClient, RetryPolicy};
use pam_provider::resource::{self, Operation, ResourceData, Severity};
use serde_json::{json, Value};
use wiremock::matchers::{any, body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> PamClient {
    let options = ClientOptions::new(server.uri(), "test-token").with_retry(RetryPolicy::none());
    PamClient::new(options).unwrap()
}

fn state(value: Value) -> ResourceData {
    ResourceData::from_value(value).unwrap()
}

mod dispatcher_tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_type_is_an_error_diagnostic() {
        let server = MockServer::start().await;
        let outcome =
            resource::run_resource(&client_for(&server), "cluster", Operation::Read, ResourceData::with_id("c1")).await;

        assert!(outcome.state.is_none());
        assert!(outcome.has_error());
        let first = outcome.diagnostics.iter().next().unwrap();
        assert_eq!(first.severity, Severity::Error);
        assert!(first.detail.contains("cluster"));

        let outcome = resource::read_data_source(&client_for(&server), "cluster", ResourceData::new()).await;
        assert!(outcome.has_error());
    }

    /// A vanished object reads as an empty state, not an error
    #[tokio::test]
    async fn test_read_not_found_drops_state() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user-tags/T1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let outcome =
            resource::run_resource(&client_for(&server), "tag", Operation::Read, ResourceData::with_id("T1")).await;
        assert!(outcome.state.is_none());
        assert!(!outcome.has_error());
    }

    #[tokio::test]
    async fn test_read_sets_attributes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user-tags/T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "userTagId": "T1",
                "name": "admins",
                "description": "platform admins",
                "status": "ACTIVE",
                "userTagIdentityProviders": [{"identityProvider": {"id": "I1"}}]
            })))
            .mount(&server)
            .await;

        let outcome =
            resource::run_resource(&client_for(&server), "tag", Operation::Read, ResourceData::with_id("T1")).await;
        let data = outcome.state.unwrap();
        assert_eq!(data.id(), Some("T1"));
        assert_eq!(data.get_string("name").as_deref(), Some("admins"));
        assert_eq!(data.get_string("identity_provider_id").as_deref(), Some("I1"));
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_object() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/user-tags/T1"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let outcome =
            resource::run_resource(&client_for(&server), "tag", Operation::Delete, ResourceData::with_id("T1")).await;
        assert!(outcome.state.is_none());
        assert!(!outcome.has_error());
    }

    #[tokio::test]
    async fn test_server_error_becomes_diagnostic() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user-tags/T1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let outcome =
            resource::run_resource(&client_for(&server), "tag", Operation::Read, ResourceData::with_id("T1")).await;
        assert!(outcome.has_error());
        let first = outcome.diagnostics.iter().next().unwrap();
        assert!(first.detail.contains("500"));
        assert!(first.detail.contains("boom"));
    }

    #[tokio::test]
    async fn test_import_rejects_malformed_id_without_request() {
        let server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = resource::run_resource(
            &client_for(&server),
            "profile_policy",
            Operation::Import,
            ResourceData::with_id("POL1"),
        )
        .await;
        assert!(outcome.has_error());
        assert_eq!(outcome.diagnostics.iter().next().unwrap().summary, "Invalid configuration");
    }
}

mod resource_mapping_tests {
    use super::*;

    #[tokio::test]
    async fn test_server_resource_labels_are_flattened() {
        let server = MockServer::start().await;
        let record = json!({
            "resourceId": "R1",
            "name": "db",
            "resourceType": {"id": "RT1", "name": "postgres"},
            "parameterValues": {"host": "db.internal"},
            "resourceLabels": {"env": ["prod", "eu"], "team": ["data"]}
        });

        Mock::given(method("POST"))
            .and(path("/api/resource-manager/resources"))
            .and(body_partial_json(json!({
                "name": "db",
                "resourceLabels": {"env": ["prod", "eu"], "team": ["data"]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&record))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/resource-manager/resources/R1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&record))
            .mount(&server)
            .await;

        let desired = state(json!({
            "name": "db",
            "resource_type_id": "RT1",
            "parameter_values": {"host": "db.internal"},
            "labels": {"env": "prod, eu", "team": "data"}
        }));
        let outcome = resource::apply(&client_for(&server), "resource_manager_resource", desired).await;

        assert!(!outcome.has_error(), "{:?}", outcome.diagnostics);
        let data = outcome.state.unwrap();
        assert_eq!(data.id(), Some("R1"));
        assert_eq!(data.get_str_map("labels")["env"], "prod,eu");
    }

    #[tokio::test]
    async fn test_profile_with_unknown_association_creates_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/apps/A1/root-environment-group"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "environmentGroups": [{"id": "G1", "name": "prod"}],
                "environments": [{"id": "E1", "name": "eu-west", "parentGroupId": "G1"}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/apps/A1/paps"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let desired = state(json!({
            "app_id": "A1",
            "name": "p",
            "expiration_duration": 60000,
            "associations": [{"type": "Environment", "value": "us-east"}]
        }));
        let outcome = resource::apply(&client_for(&server), "profile", desired).await;
        assert!(outcome.has_error());
        assert!(outcome.diagnostics.iter().next().unwrap().detail.contains("us-east"));
    }

    #[tokio::test]
    async fn test_advanced_settings_state_skips_inherited() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/paps/P1/advanced-settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "settings": [
                    {
                        "settingsType": "JUSTIFICATION",
                        "entityId": "A1",
                        "entityType": "APPLICATION",
                        "isInherited": true,
                        "value": {"isJustificationRequired": true}
                    },
                    {
                        "settingsType": "JUSTIFICATION",
                        "entityId": "P1",
                        "entityType": "PROFILE",
                        "value": {"isJustificationRequired": false}
                    }
                ]
            })))
            .mount(&server)
            .await;

        let outcome = resource::run_resource(
            &client_for(&server),
            "advanced_settings",
            Operation::Import,
            ResourceData::with_id("PROFILE:P1"),
        )
        .await;

        let data = outcome.state.unwrap();
        let settings = data.get_value("settings").and_then(Value::as_array).unwrap();
        assert_eq!(settings.len(), 1);
        assert_eq!(settings[0]["entityId"], "P1");
        assert_eq!(data.get_string("resource_type").as_deref(), Some("PROFILE"));
    }

    #[tokio::test]
    async fn test_broker_pools_delete_posts_empty_list() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/resource-manager/resources/R1/broker-pools"))
            .and(body_json(json!([])))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = resource::run_resource(
            &client_for(&server),
            "resource_manager_resource_broker_pools",
            Operation::Delete,
            ResourceData::with_id("resource-manager/resources/R1/broker-pools"),
        )
        .await;
        assert!(!outcome.has_error(), "{:?}", outcome.diagnostics);
    }

    #[tokio::test]
    async fn test_escalation_policy_data_source() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/im-manager/escalation-policies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "more": false,
                "policies": [{"id": "EP1", "name": "Primary On-Call"}]
            })))
            .mount(&server)
            .await;

        let args = state(json!({"connection_id": "C1", "name": "primary on-call"}));
        let outcome = resource::read_data_source(&client_for(&server), "escalation_policy", args).await;
        assert_eq!(outcome.state.unwrap().id(), Some("EP1"));
    }
}

mod update_and_recovery_tests {
    use super::*;

    fn profile_body() -> Value {
        json!({"papId": "P1", "name": "p", "expirationDuration": 60000})
    }

    async fn mount_tree(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/apps/A1/root-environment-group"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "environmentGroups": [{"id": "G1", "name": "prod"}],
                "environments": [{"id": "E1", "name": "eu-west", "parentGroupId": "G1"}]
            })))
            .mount(server)
            .await;
    }

    /// Clearing every association still replaces the remote list
    #[tokio::test]
    async fn test_profile_update_clears_associations() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/paps/P1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/paps/P1/scopes"))
            .and(body_json(json!([])))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/paps/P1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/paps/P1/scopes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let desired = state(json!({
            "id": "apps/A1/paps/P1",
            "app_id": "A1",
            "name": "p",
            "expiration_duration": 60000,
            "associations": []
        }));
        let outcome = resource::apply(&client_for(&server), "profile", desired).await;

        assert!(!outcome.has_error(), "{:?}", outcome.diagnostics);
        let data = outcome.state.unwrap();
        assert_eq!(data.get_value("associations"), Some(&json!([])));
    }

    /// A profile created remotely stays tracked when its associations fail
    #[tokio::test]
    async fn test_failed_create_keeps_created_profile() {
        let server = MockServer::start().await;
        mount_tree(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/apps/A1/paps"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/paps/P1/scopes"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad scope"))
            .mount(&server)
            .await;

        let desired = state(json!({
            "app_id": "A1",
            "name": "p",
            "expiration_duration": 60000,
            "associations": [{"type": "Environment", "value": "eu-west"}]
        }));
        let outcome = resource::apply(&client_for(&server), "profile", desired).await;

        assert!(outcome.has_error());
        assert_eq!(outcome.state.unwrap().id(), Some("apps/A1/paps/P1"));
    }

    #[tokio::test]
    async fn test_failed_icon_upload_keeps_resource_type() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/resource-manager/resource-types"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resourceTypeId": "RT1", "name": "pg"})))
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/api/resource-manager/resource-types/RT1/icon-data"))
            .respond_with(ResponseTemplate::new(400).set_body_string("not an svg"))
            .expect(1)
            .mount(&server)
            .await;

        let desired = state(json!({"name": "pg", "icon": "<svg/>"}));
        let outcome = resource::apply(&client_for(&server), "resource_manager_resource_type", desired).await;

        assert!(outcome.has_error());
        assert_eq!(outcome.state.unwrap().id(), Some("RT1"));
    }

    /// A failure before any id exists still yields no state
    #[tokio::test]
    async fn test_failed_create_without_id_has_no_state() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user-tags"))
            .respond_with(ResponseTemplate::new(400).set_body_string("duplicate"))
            .mount(&server)
            .await;

        let outcome = resource::apply(&client_for(&server), "tag", state(json!({"name": "admins"}))).await;
        assert!(outcome.has_error());
        assert!(outcome.state.is_none());
    }

    #[tokio::test]
    async fn test_link_update_rejects_key_change() {
        let server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let identity = state(json!({"id": "paps/P1/users/U1", "profile_id": "P1", "user_id": "U2"}));
        let outcome = resource::apply(&client, "profile_identity", identity).await;
        assert!(outcome.has_error());
        assert!(outcome.diagnostics.iter().next().unwrap().detail.contains("requires replacement"));

        let tag = state(json!({"id": "paps/P1/user-tags/T1", "profile_id": "P2", "tag_id": "T1"}));
        let outcome = resource::apply(&client, "profile_tag", tag).await;
        assert!(outcome.has_error());
        assert!(outcome.diagnostics.iter().next().unwrap().detail.contains("profile_id"));
    }

    fn constraint_state(value: &str) -> ResourceData {
        state(json!({
            "id": "paps/P1/permissions/viewer/aws/constraints/bigquery.datasets/ds1",
            "profile_id": "P1",
            "permission_name": "viewer",
            "permission_type": "aws",
            "constraint_type": "bigquery.datasets",
            "value": value
        }))
    }

    /// The old constraint is only removed once the new one is in place
    #[tokio::test]
    async fn test_constraint_update_failed_add_keeps_old() {
        let server = MockServer::start().await;
        let constraints_path = "/api/paps/P1/permissions/viewer/aws/constraints/bigquery.datasets";

        Mock::given(method("PUT"))
            .and(path(constraints_path))
            .and(query_param("operation", "add"))
            .and(body_json(json!({"name": "ds2"})))
            .respond_with(ResponseTemplate::new(400).set_body_string("unknown dataset"))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path(constraints_path))
            .and(query_param("operation", "remove"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = resource::apply(&client_for(&server), "constraint", constraint_state("ds2")).await;
        assert!(outcome.has_error());
    }

    #[tokio::test]
    async fn test_constraint_update_with_same_key_sends_nothing() {
        let server = MockServer::start().await;
        let constraints_path = "/api/paps/P1/permissions/viewer/aws/constraints/bigquery.datasets";

        Mock::given(method("PUT"))
            .and(path(constraints_path))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(constraints_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": [{"name": "ds1"}]})))
            .mount(&server)
            .await;

        let outcome = resource::apply(&client_for(&server), "constraint", constraint_state("ds1")).await;
        assert!(!outcome.has_error(), "{:?}", outcome.diagnostics);
        assert_eq!(outcome.state.unwrap().get_string("value").as_deref(), Some("ds1"));
    }
}
