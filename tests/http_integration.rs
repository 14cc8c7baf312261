//! Integration tests for the PAM client using wiremock
//!
//! These tests drive the typed operations against mocked endpoints and check
//! headers, URL templates, status classification and retries.

use pam_provider::api::PermissionRef;
use pam_provider::model::{AdvancedSettings, Constraint, Profile, SettingsTarget};
use pam_provider::pam::{ApiError, ClientOptions, PamClient, RetryPolicy};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, body_string, body_string_contains, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn client_for(server: &MockServer) -> PamClient {
    let options = ClientOptions::new(server.uri(), TOKEN).with_retry(RetryPolicy::new(3, Duration::from_millis(10)));
    PamClient::new(options).expect("client should build")
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map(|r| r.len()).unwrap_or_default()
}

/// Test module for transport contract tests
mod transport_tests {
    use super::*;

    /// Every request carries the token, JSON content type and versioned user agent
    #[tokio::test]
    async fn test_standard_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/apps"))
            .and(header("authorization", "TOKEN test-token"))
            .and(header("content-type", "application/json"))
            .and(header_regex("user-agent", r"^pam-provider/\S+ rust/\S+ \S+/\S+ orchestrator/unknown$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let apps = client_for(&server).get_applications().await.unwrap();
        assert!(apps.is_empty());
    }

    #[tokio::test]
    async fn test_host_agent_is_appended() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/apps"))
            .and(header_regex("user-agent", r" terraform/1\.9$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let options = ClientOptions::new(server.uri(), TOKEN).with_host_agent("terraform/1.9");
        PamClient::new(options).unwrap().get_applications().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_body_on_lookup_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/apps/A1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = client_for(&server).get_application("A1").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_not_supported_sentinel() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/itsm-manager/connections"))
            .and(query_param("settingType", "IM"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": 400,
                "errorCode": "PAM_SETTING_TYPE",
                "message": "Setting type IM is not supported for this tenant"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_connections(pam_provider::model::SettingKind::Im)
            .await
            .unwrap_err();
        assert!(err.is_not_supported(), "unexpected {:?}", err);
    }

    /// Permanent failures carry method, URL, status and the body verbatim
    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let server = MockServer::start().await;
        let body = r#"{"status":400,"message":"name is required","errorCode":"VALIDATION"}"#;

        Mock::given(method("PATCH"))
            .and(path("/api/paps/P1"))
            .respond_with(ResponseTemplate::new(400).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .update_profile("P1", &Profile::default())
            .await
            .unwrap_err();

        match &err {
            ApiError::Status { method, status, body: got, url } => {
                assert_eq!(method, "PATCH");
                assert_eq!(*status, 400);
                assert_eq!(got, body);
                assert!(url.ends_with("/api/paps/P1"));
            },
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.error_code().as_deref(), Some("VALIDATION"));
        assert!(err.to_string().contains("PATCH"));
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/user-tags/T1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).delete_tag("T1").await.unwrap();
    }
}

/// Test module for the concrete end-to-end scenarios
mod scenario_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_read_delete_profile() {
        let server = MockServer::start().await;
        let record = json!({
            "papId": "P1",
            "appContainerId": "A1",
            "name": "p",
            "expirationDuration": 1500000,
            "extendable": false
        });

        Mock::given(method("POST"))
            .and(path("/api/apps/A1/paps"))
            .and(body_partial_json(json!({"name": "p", "expirationDuration": 1500000, "extendable": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(&record))
            .expect(1)
            .mount(&server)
            .await;

        // served once, then the 404 fallback takes over
        Mock::given(method("GET"))
            .and(path("/api/paps/P1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&record))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/paps/P1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/apps/A1/paps/P1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let input = Profile {
            name: "p".into(),
            expiration_duration: 1_500_000,
            extendable: false,
            ..Default::default()
        };

        let created = client.create_profile("A1", &input).await.unwrap();
        assert_eq!(created.pap_id.as_deref(), Some("P1"));

        let read = client.get_profile("P1").await.unwrap();
        assert_eq!(read, created);

        client.delete_profile("A1", "P1").await.unwrap();
        assert!(client.get_profile("P1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_retry_then_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/paps/P1"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/paps/P1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "papId": "P1", "name": "p", "expirationDuration": 60000
            })))
            .mount(&server)
            .await;

        let profile = client_for(&server).get_profile("P1").await.unwrap();
        assert_eq!(profile.pap_id.as_deref(), Some("P1"));
        assert_eq!(request_count(&server).await, 3);
    }

    #[tokio::test]
    async fn test_retry_exhaustion() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/paps/P1"))
            .respond_with(ResponseTemplate::new(429))
            .expect(4)
            .mount(&server)
            .await;

        let err = client_for(&server).get_profile("P1").await.unwrap_err();
        match err {
            ApiError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 4);
                assert_eq!(last.status(), Some(429));
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_constraint_add_then_remove() {
        let server = MockServer::start().await;
        let constraints_path = "/api/paps/P1/permissions/viewer/aws/constraints/bigquery.datasets";

        for operation in ["add", "remove"] {
            Mock::given(method("PUT"))
                .and(path(constraints_path))
                .and(query_param("operation", operation))
                .and(body_json(json!({"name": "ds1"})))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = client_for(&server);
        let permission = PermissionRef {
            profile_id: "P1",
            name: "viewer",
            permission_type: "aws",
        };
        let constraint = Constraint::for_type("bigquery.datasets", "ds1", "", "");

        client
            .add_constraint(&permission, "bigquery.datasets", &constraint)
            .await
            .unwrap();
        client
            .remove_constraint(&permission, "bigquery.datasets", &constraint)
            .await
            .unwrap();
    }

    /// The condition variant is chosen by type name in any case and keyed by title
    #[tokio::test]
    async fn test_condition_constraint_body_carries_title() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/paps/P1/permissions/viewer/aws/constraints/Condition"))
            .and(query_param("operation", "remove"))
            .and(body_partial_json(json!({"title": "office-hours"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let permission = PermissionRef {
            profile_id: "P1",
            name: "viewer",
            permission_type: "aws",
        };
        let constraint = Constraint::for_type("Condition", "office-hours", "weekdays", "request.time < 18");
        client_for(&server)
            .remove_constraint(&permission, "Condition", &constraint)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_advanced_settings_policy_multiplex() {
        let server = MockServer::start().await;
        let payload = json!({
            "settings": [{
                "settingsType": "JUSTIFICATION",
                "value": {"isJustificationRequired": true}
            }]
        });
        let settings: AdvancedSettings = serde_json::from_value(payload.clone()).unwrap();

        Mock::given(method("PATCH"))
            .and(path("/api/paps/P1/policies/POL1"))
            .and(body_partial_json(json!({"settings": [{"settingsType": "JUSTIFICATION"}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
            .expect(1)
            .mount(&server)
            .await;

        let saved = client_for(&server)
            .save_advanced_settings(SettingsTarget::ProfilePolicy, "paps/P1/policies/POL1", &settings, true)
            .await
            .unwrap();
        assert_eq!(saved, settings);
        assert_eq!(request_count(&server).await, 1);
    }

    #[tokio::test]
    async fn test_advanced_settings_without_profile_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .save_advanced_settings(SettingsTarget::ProfilePolicy, "POL1", &AdvancedSettings::default(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_application_settings_post_then_put() {
        let server = MockServer::start().await;

        for verb in ["POST", "PUT"] {
            Mock::given(method(verb))
                .and(path("/api/apps/A1/advanced-settings"))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = client_for(&server);
        let settings = AdvancedSettings::default();
        client
            .save_advanced_settings(SettingsTarget::Application, "A1", &settings, false)
            .await
            .unwrap();
        client
            .save_advanced_settings(SettingsTarget::Application, "A1", &settings, true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_root_environment_group_is_fetched_once() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/apps/A1/root-environment-group"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "environmentGroups": [{"id": "G1", "name": "prod"}],
                        "environments": [{"id": "E1", "name": "eu", "parentGroupId": "G1"}]
                    }))
                    .set_delay(Duration::from_millis(50)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let results = futures::future::join_all(
            (0..10).map(|_| client.get_application_root_environment_group("A1")),
        )
        .await;

        let first = results[0].as_ref().unwrap();
        for result in &results {
            assert_eq!(result.as_ref().unwrap(), first);
        }
        assert!(first.group("G1").is_some());
    }

    async fn mount_escalation_pages(server: &MockServer, pages: &[(&[&str], bool)]) {
        for (index, (names, more)) in pages.iter().enumerate() {
            let policies: Vec<_> = names
                .iter()
                .enumerate()
                .map(|(i, name)| json!({"id": format!("EP{}{}", index, i), "name": name}))
                .collect();
            Mock::given(method("GET"))
                .and(path("/api/im-manager/escalation-policies"))
                .and(query_param("page", index.to_string()))
                .and(query_param("connectionId", "C1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"more": more, "policies": policies})))
                .mount(server)
                .await;
        }
    }

    #[tokio::test]
    async fn test_paged_lookup_miss() {
        let server = MockServer::start().await;
        mount_escalation_pages(
            &server,
            &[(&["a", "b"], true), (&["c"], true), (&["d"], true), (&["e"], false)],
        )
        .await;

        let err = client_for(&server).find_escalation_policy("C1", "foo").await.unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, ApiError::NoMatch(_)));
        assert!(message.contains("try with"));
        assert!(message.contains("a,b,c,d,e"));
        assert_eq!(request_count(&server).await, 4);
    }

    #[tokio::test]
    async fn test_paged_lookup_stops_on_match() {
        let server = MockServer::start().await;
        mount_escalation_pages(
            &server,
            &[(&["a"], true), (&["Primary"], true), (&["c"], true), (&["d"], false)],
        )
        .await;

        let found = client_for(&server).find_escalation_policy("C1", "primary").await.unwrap();
        assert_eq!(found.id, "EP10");
        assert_eq!(request_count(&server).await, 2);
    }
}

/// Test module for name lookups and non-JSON bodies
mod lookup_and_body_tests {
    use super::*;

    #[tokio::test]
    async fn test_identity_provider_lookup_ignores_case() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/identity-providers"))
            .and(query_param("metadata", "false"))
            .and(query_param("name", "Okta Prod"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "I0", "name": "okta"},
                {"id": "I1", "name": "OKTA PROD"}
            ])))
            .mount(&server)
            .await;

        let provider = client_for(&server).get_identity_provider_by_name("Okta Prod").await.unwrap();
        assert_eq!(provider.id, "I1");
    }

    #[tokio::test]
    async fn test_empty_array_lookup_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/apps"))
            .and(query_param("name", "missing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = client_for(&server).get_application_by_name("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_connection_miss_lists_known_names() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/itsm-manager/connections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "C1", "name": "servicenow", "type": "ITSM"},
                {"id": "C2", "name": "jira", "type": "ITSM"}
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let found = client
            .get_connection_by_name(pam_provider::model::SettingKind::Itsm, "JIRA")
            .await
            .unwrap();
        assert_eq!(found.id, "C2");

        let err = client
            .get_connection_by_name(pam_provider::model::SettingKind::Itsm, "zendesk")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("try with one of: servicenow, jira"));
    }

    /// IM connections share the ITSM collection, selected by setting type
    #[tokio::test]
    async fn test_im_connections_use_itsm_collection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/itsm-manager/connections"))
            .and(query_param("settingType", "IM"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "C1", "name": "servicenow", "type": "ITSM"},
                {"id": "C3", "name": "pagerduty", "type": "IM"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let connections = client_for(&server)
            .get_connections(pam_provider::model::SettingKind::Im)
            .await
            .unwrap();
        let names: Vec<&str> = connections.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["pagerduty"]);
    }

    #[tokio::test]
    async fn test_template_upload_is_multipart() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generic-apps/templates"))
            .and(header("authorization", "TOKEN test-token"))
            .and(header_regex("content-type", "^multipart/form-data; boundary="))
            .and(body_string_contains("name=\"templateFile\""))
            .and(body_string_contains("filename=\"app.yaml\""))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .upload_custom_template("app.yaml", b"name: custom".to_vec())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_icon_upload_and_removal_are_xml() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/resource-manager/resource-types/RT1/icon-data"))
            .and(header("content-type", "text/xml"))
            .and(body_string("<svg/>"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/resource-manager/resource-types/RT1/icon-data"))
            .and(header("content-type", "text/xml"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.upload_resource_type_icon("RT1", "<svg/>").await.unwrap();
        client.delete_resource_type_icon("RT1").await.unwrap();
    }
}
