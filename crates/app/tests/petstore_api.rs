//! Live tests against the public Swagger Petstore.
//!
//! Each catalog group is one test. Run with
//! `cargo test -p petstore-e2e -- --ignored`.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use petstore_domain::{ApiMessage, Pet, PetStatus, Scenario, SuiteFixture};
use petstore_e2e::catalog::{self, PET_NAME};
use petstore_e2e::{petstore_suite, suite_runner};
use serde_json::json;
use petstore_infrastructure::{ConfigLoader, HarnessConfig, ReqwestHttpClient, SuiteRunner};
use pretty_assertions::assert_eq;

fn config() -> HarnessConfig {
    ConfigLoader::from_env()
        .load()
        .expect("configuration should load")
}

fn runner(config: &HarnessConfig) -> SuiteRunner<ReqwestHttpClient> {
    suite_runner(config).expect("client should build")
}

async fn assert_all_pass(scenarios: Vec<Scenario>, fixture: &SuiteFixture) {
    let runner = runner(&config());
    let mut failures = Vec::new();
    for scenario in &scenarios {
        let outcome = runner.run_scenario(scenario, fixture).await;
        if !outcome.passed() {
            failures.push(format!("{outcome:#?}"));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[tokio::test]
#[ignore = "requires network access to petstore.swagger.io"]
async fn create_pet() {
    assert_all_pass(catalog::create_pet(), &SuiteFixture::empty()).await;
}

#[tokio::test]
#[ignore = "requires network access to petstore.swagger.io"]
async fn delete_pet() {
    let config = config();
    assert_all_pass(catalog::delete_pet(&config.api_key), &SuiteFixture::empty()).await;
}

#[tokio::test]
#[ignore = "requires network access to petstore.swagger.io"]
async fn find_pets_by_status() {
    assert_all_pass(catalog::find_by_status(), &SuiteFixture::empty()).await;
}

#[tokio::test]
#[ignore = "requires network access to petstore.swagger.io"]
async fn invalid_status_is_empty_on_every_call() {
    let config = config();
    let client = reqwest_client(&config);
    let url = format!(
        "{}/pet/findByStatus?status={}",
        config.base_url,
        catalog::INVALID_STATUS
    );

    for attempt in 1..=2 {
        let response = client
            .get(&url)
            .send()
            .await
            .expect("request should complete");
        assert_eq!(response.status().as_u16(), 200, "attempt {attempt}");

        let body: serde_json::Value = response.json().await.expect("body should be JSON");
        assert_eq!(body, json!([]), "attempt {attempt}");
    }

    let scenario = catalog::find_by_status()
        .into_iter()
        .find(|s| s.name == "invalid status")
        .expect("invalid status scenario");
    assert_all_pass(vec![scenario.clone(), scenario], &SuiteFixture::empty()).await;
}

#[tokio::test]
#[ignore = "requires network access to petstore.swagger.io"]
async fn find_pet_by_id() {
    assert_all_pass(catalog::find_by_id(), &SuiteFixture::empty()).await;
}

#[tokio::test]
#[ignore = "requires network access to petstore.swagger.io"]
async fn update_pet() {
    let config = config();
    let fixture = runner(&config)
        .prepare(&petstore_suite(&config.api_key))
        .await
        .expect("setup should create a pet");
    assert!(fixture.pet_id().is_some());

    assert_all_pass(catalog::update_pet(), &fixture).await;
}

#[tokio::test]
#[ignore = "requires network access to petstore.swagger.io"]
async fn created_pet_deserializes_as_pet() {
    let config = config();
    let client = reqwest_client(&config);
    let url = format!("{}/pet", config.base_url);

    let response = client
        .post(&url)
        .json(&Pet::named(PET_NAME, PetStatus::Available))
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status().as_u16(), 200);

    let pet: Pet = response.json().await.expect("body should be a pet");
    assert!(pet.id.is_some());
    assert_eq!(pet.name.as_deref(), Some(PET_NAME));
    assert_eq!(pet.status.as_deref(), Some("available"));
}

#[tokio::test]
#[ignore = "requires network access to petstore.swagger.io"]
async fn missing_pet_message_deserializes() {
    let config = config();
    let client = reqwest_client(&config);
    let url = format!("{}/pet/{}", config.base_url, catalog::NON_EXISTING_ID);

    let response = client.get(&url).send().await.expect("request should complete");
    assert_eq!(response.status().as_u16(), 404);

    let message: ApiMessage = response.json().await.expect("body should be a message");
    assert_eq!(message.message.as_deref(), Some(catalog::PET_NOT_FOUND));
}

fn reqwest_client(config: &HarnessConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .build()
        .expect("client should build")
}
