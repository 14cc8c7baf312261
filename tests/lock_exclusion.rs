//! Lock exclusion through the client, driven by a fake transport

use async_trait::async_trait;
use pam_provider::pam::{ApiRequest, ApiResult, ClientOptions, PamClient, RawResponse, RetryPolicy, Transport};
use reqwest::Method;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Counts in-flight requests and stamps each one with a serial number
#[derive(Default)]
struct Recording {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    serial: AtomicUsize,
    order: Mutex<Vec<usize>>,
}

#[async_trait]
impl Transport for Recording {
    async fn send(&self, _request: &ApiRequest) -> ApiResult<RawResponse> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let serial = self.serial.fetch_add(1, Ordering::SeqCst);
        self.order.lock().unwrap().push(serial);

        tokio::time::sleep(Duration::from_millis(5)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(RawResponse {
            status: 204,
            body: Vec::new(),
        })
    }
}

fn client(transport: Arc<Recording>) -> PamClient {
    let options = ClientOptions::new("https://acme.example.com", "tok").with_retry(RetryPolicy::none());
    PamClient::with_transport(options, transport).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_lock_name_serializes_mutations() {
    let transport = Arc::new(Recording::default());
    let client = client(transport.clone());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                let url = client.api_url(&format!("paps/P{}", i));
                client.mutate(Method::PATCH, &url, &json!({"name": "p"}), "profile").await
            })
        })
        .collect();
    for result in futures::future::join_all(handles).await {
        assert_eq!(result.unwrap().unwrap(), json!({"name": "p"}));
    }

    assert_eq!(transport.max_in_flight.load(Ordering::SeqCst), 1);
    let order = transport.order.lock().unwrap().clone();
    assert_eq!(order, (0..8).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_different_lock_names_run_concurrently() {
    let transport = Arc::new(Recording::default());
    let client = client(transport.clone());

    let handles: Vec<_> = ["tag", "role", "policy", "constraint"]
        .into_iter()
        .map(|lock| {
            let client = client.clone();
            tokio::spawn(async move {
                let url = client.api_url(lock);
                client.mutate(Method::PATCH, &url, &json!({"name": "x"}), lock).await
            })
        })
        .collect();
    for result in futures::future::join_all(handles).await {
        result.unwrap().unwrap();
    }

    assert!(transport.max_in_flight.load(Ordering::SeqCst) > 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reads_take_no_lock() {
    let transport = Arc::new(Recording::default());
    let client = client(transport.clone());

    let guard = client.locks().acquire("profile").await;
    // 204 on a lookup surfaces as the no-content sentinel
    let result: ApiResult<serde_json::Value> = client.get_json(&client.api_url("paps/P1")).await;
    assert!(result.unwrap_err().is_no_content());
    drop(guard);
}
