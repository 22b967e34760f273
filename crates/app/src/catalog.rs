//! The petstore scenario catalog.
//!
//! Every scenario is a plain [`Scenario`] value; the only one that depends
//! on setup is "Update Pet > valid id", which references `{{pet_id}}`.

use petstore_domain::request::HttpMethod;
use petstore_domain::{
    Assertion, Extraction, FieldExpectation, FixtureSetup, JsonKind, PET_ID, PetStatus, Scenario,
    Suite,
};
use serde_json::{Value, json};

/// Name of the suite in reports.
pub const SUITE_NAME: &str = "Petstore API";

/// Name used for created pets.
pub const PET_NAME: &str = "KOER";

/// Name sent by the update scenarios.
pub const UPDATED_NAME: &str = "UpdatedName";

/// Numeric id the public petstore does not hold.
pub const NON_EXISTING_ID: i64 = 999_999;

/// Path segment that is not a number.
pub const INVALID_ID: &str = "invalid_id";

/// Status value the service does not recognize.
pub const INVALID_STATUS: &str = "invalid_status";

/// Message for unknown numeric ids.
pub const PET_NOT_FOUND: &str = "Pet not found";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "api_key";

/// Group names, in catalog order.
pub mod groups {
    /// `POST /pet`
    pub const CREATE_PET: &str = "Create Pet";
    /// `DELETE /pet/{id}`
    pub const DELETE_PET: &str = "Delete Pet";
    /// `GET /pet/findByStatus`
    pub const FIND_BY_STATUS: &str = "Find Pets by Status";
    /// `GET /pet/{id}`
    pub const FIND_BY_ID: &str = "Find Pet by ID";
    /// `PUT /pet`
    pub const UPDATE_PET: &str = "Update Pet";
}

/// The message the service returns when an id segment is not a number.
///
/// This exposes the service's Java internals and will break if the service
/// changes its error text.
#[must_use]
pub fn number_format_message(literal: &str) -> String {
    format!("java.lang.NumberFormatException: For input string: \"{literal}\"")
}

/// Body `{name, status}` for a pet.
fn pet_body(name: &str, status: PetStatus) -> Value {
    json!({"name": name, "status": status.as_str()})
}

fn message_is(message: &str) -> Assertion {
    Assertion::contains(&json!({ "message": message }))
}

/// Setup: create a pet and bind its numeric id to `pet_id`.
#[must_use]
pub fn setup() -> FixtureSetup {
    FixtureSetup::new(
        Scenario::new("Setup", "create fixture pet", HttpMethod::Post, "/pet")
            .with_json(pet_body(PET_NAME, PetStatus::Available)),
        vec![Extraction::new(PET_ID, "$.id", JsonKind::Number)],
    )
}

/// `POST /pet` scenarios.
#[must_use]
pub fn create_pet() -> Vec<Scenario> {
    let full = pet_body(PET_NAME, PetStatus::Available);
    vec![
        Scenario::new(
            groups::CREATE_PET,
            "creates a pet when all fields are provided",
            HttpMethod::Post,
            "/pet",
        )
        .with_json(full.clone())
        .expect_status(200)
        .expect(Assertion::contains(&full))
        .expect(Assertion::JsonFieldKind {
            field: "id".to_string(),
            kind: JsonKind::Number,
        }),
        Scenario::new(
            groups::CREATE_PET,
            "returns a default pet when data is empty",
            HttpMethod::Post,
            "/pet",
        )
        .with_json(json!({}))
        .expect_status(200)
        .expect(Assertion::JsonContains {
            fields: vec![
                FieldExpectation::kind("id", JsonKind::Number),
                FieldExpectation::equals("photoUrls", json!([])),
                FieldExpectation::equals("tags", json!([])),
            ],
        }),
    ]
}

/// `DELETE /pet/{id}` scenarios.
#[must_use]
pub fn delete_pet(api_key: &str) -> Vec<Scenario> {
    vec![
        Scenario::new(
            groups::DELETE_PET,
            "non-existing id",
            HttpMethod::Delete,
            format!("/pet/{NON_EXISTING_ID}"),
        )
        .with_header(API_KEY_HEADER, api_key)
        .expect_status(200)
        .expect(message_is(PET_NOT_FOUND)),
        Scenario::new(
            groups::DELETE_PET,
            "invalid id",
            HttpMethod::Delete,
            format!("/pet/{INVALID_ID}"),
        )
        .with_header(API_KEY_HEADER, api_key)
        .expect_status(404)
        .expect(message_is(&number_format_message(INVALID_ID))),
    ]
}

/// `GET /pet/findByStatus` scenarios: one per status plus an unknown one.
#[must_use]
pub fn find_by_status() -> Vec<Scenario> {
    let mut scenarios: Vec<Scenario> = PetStatus::ALL
        .iter()
        .map(|status| {
            Scenario::new(
                groups::FIND_BY_STATUS,
                format!("status {status}"),
                HttpMethod::Get,
                "/pet/findByStatus",
            )
            .with_query("status", status.as_str())
            .expect_status(200)
            .expect(Assertion::JsonIsArray)
            .expect(Assertion::JsonEachField {
                field: "status".to_string(),
                expected: json!(status.as_str()),
            })
        })
        .collect();

    scenarios.push(
        Scenario::new(
            groups::FIND_BY_STATUS,
            "invalid status",
            HttpMethod::Get,
            "/pet/findByStatus",
        )
        .with_query("status", INVALID_STATUS)
        .expect_status(200)
        .expect(Assertion::JsonIsEmptyArray),
    );
    scenarios
}

/// `GET /pet/{id}` scenarios.
#[must_use]
pub fn find_by_id() -> Vec<Scenario> {
    vec![
        Scenario::new(
            groups::FIND_BY_ID,
            "non-existing id",
            HttpMethod::Get,
            format!("/pet/{NON_EXISTING_ID}"),
        )
        .expect_status(404)
        .expect(message_is(PET_NOT_FOUND)),
        Scenario::new(
            groups::FIND_BY_ID,
            "invalid id",
            HttpMethod::Get,
            format!("/pet/{INVALID_ID}"),
        )
        .expect_status(404)
        .expect(message_is(&number_format_message(INVALID_ID))),
        Scenario::new(groups::FIND_BY_ID, "id not provided", HttpMethod::Get, "/pet/")
            .expect_status(405),
    ]
}

/// `PUT /pet` scenarios.
#[must_use]
pub fn update_pet() -> Vec<Scenario> {
    let with_fixture_id = json!({
        "id": format!("{{{{{PET_ID}}}}}"),
        "name": UPDATED_NAME,
        "status": PetStatus::Sold.as_str(),
    });
    let with_unknown_id = json!({
        "id": NON_EXISTING_ID,
        "name": UPDATED_NAME,
        "status": PetStatus::Sold.as_str(),
    });
    let without_id = pet_body(UPDATED_NAME, PetStatus::Sold);

    vec![
        Scenario::new(groups::UPDATE_PET, "valid id", HttpMethod::Put, "/pet")
            .with_json(with_fixture_id.clone())
            .expect_status(200)
            .expect(Assertion::contains(&with_fixture_id)),
        Scenario::new(groups::UPDATE_PET, "non-existing id", HttpMethod::Put, "/pet")
            .with_json(with_unknown_id.clone())
            .expect_status(200)
            .expect(Assertion::contains(&with_unknown_id)),
        Scenario::new(groups::UPDATE_PET, "id not provided", HttpMethod::Put, "/pet/")
            .with_json(without_id.clone())
            .expect_status(200)
            .expect(Assertion::contains(&without_id)),
    ]
}

/// The full suite: setup followed by every group in catalog order.
#[must_use]
pub fn petstore_suite(api_key: &str) -> Suite {
    Suite::new(SUITE_NAME).with_setup(setup()).with_scenarios(
        create_pet()
            .into_iter()
            .chain(delete_pet(api_key))
            .chain(find_by_status())
            .chain(find_by_id())
            .chain(update_pet()),
    )
}
