//! Form input composition across benefits, person-scoped parameters and the
//! published snapshot.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use screener_builder::domain::{CallerId, EligibilityCheck};
use screener_builder::evaluation::{
    DecisionEngine, DecisionRequest, EvaluationError, EvaluationResult,
};
use screener_builder::library::LibraryCatalog;
use screener_builder::schema::FormPath;
use screener_builder::service::{CheckService, NewBenefit, NewCheck, ScreenerService};
use screener_builder::store::{BlobStore, DocumentStore, InMemoryBlobStore, InMemoryDocumentStore};

struct Eligible;

impl DecisionEngine for Eligible {
    fn evaluate(&self, _request: &DecisionRequest) -> Result<EvaluationResult, EvaluationError> {
        Ok(EvaluationResult::True)
    }
}

fn services() -> (ScreenerService, CheckService) {
    let documents: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::default());
    let blobs: Arc<dyn BlobStore> = Arc::new(InMemoryBlobStore::default());
    let library = Arc::new(LibraryCatalog::from_checks([EligibilityCheck {
        id: "lib-household-size".to_string(),
        name: "household-size".to_string(),
        module: "household".to_string(),
        version: "1".to_string(),
        input_definition: json!({
            "type": "object",
            "properties": { "householdSize": { "type": "integer" } }
        }),
        ..EligibilityCheck::default()
    }]));

    (
        ScreenerService::new(
            documents.clone(),
            blobs.clone(),
            library.clone(),
            Arc::new(Eligible),
        ),
        CheckService::new(documents, blobs, library),
    )
}

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("object")
}

#[test]
fn person_scoped_checks_expand_per_person_and_deduplicate() {
    let (screeners, checks) = services();
    let author = CallerId::new("author-3");

    let working = checks
        .create_check(
            &author,
            NewCheck {
                name: "senior".to_string(),
                module: "age".to_string(),
                input_definition: json!({
                    "type": "object",
                    "properties": {
                        "people": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "id": { "type": "string" },
                                    "dateOfBirth": { "type": "string", "format": "date" }
                                }
                            }
                        },
                        "enrollments": { "type": "array", "items": { "type": "string" } },
                        "householdSize": { "type": "integer" }
                    }
                }),
                ..NewCheck::default()
            },
        )
        .expect("check created");
    let published = checks.publish_check(&author, &working.id).expect("published");

    let screener = screeners.create_screener(&author, "Seniors").unwrap();
    screeners
        .save_form_schema(&author, &screener.id, &json!({ "components": [] }))
        .unwrap();
    let senior = screeners
        .create_benefit(
            &author,
            &screener.id,
            NewBenefit {
                name: "Senior freeze".to_string(),
                description: String::new(),
            },
        )
        .unwrap();
    let household = screeners
        .create_benefit(
            &author,
            &screener.id,
            NewBenefit {
                name: "Household credit".to_string(),
                description: String::new(),
            },
        )
        .unwrap();

    screeners
        .add_check(&author, &screener.id, &senior.id, &published.id)
        .expect("custom check attaches");
    screeners
        .update_check_parameters(
            &author,
            &screener.id,
            &senior.id,
            &published.id,
            object(json!({ "peopleIds": ["applicant", "spouse"] })),
        )
        .unwrap();
    screeners
        .add_check(&author, &screener.id, &household.id, "lib-household-size")
        .unwrap();

    let expected = vec![
        FormPath::new("householdSize", "integer"),
        FormPath::new("people.applicant.dateOfBirth", "date"),
        FormPath::new("people.applicant.enrollments", "array:string"),
        FormPath::new("people.spouse.dateOfBirth", "date"),
        FormPath::new("people.spouse.enrollments", "array:string"),
    ];
    assert_eq!(screeners.form_paths(&author, &screener.id).unwrap(), expected);

    let report = screeners.publish(&author, &screener.id).unwrap();
    assert_eq!(
        screeners
            .published_form_paths(&report.published_screener_id)
            .unwrap(),
        expected
    );

    let evaluation = screeners
        .evaluate_published_benefit(
            &report.published_screener_id,
            &senior.id,
            &object(json!({
                "people": [{ "id": "applicant", "dateOfBirth": "1950-01-01" }],
                "householdSize": 2
            })),
        )
        .unwrap();
    assert_eq!(evaluation.result, EvaluationResult::True);
}

#[test]
fn screener_without_checks_needs_no_inputs() {
    let (screeners, _) = services();
    let author = CallerId::new("author-3");
    let screener = screeners.create_screener(&author, "Empty").unwrap();
    screeners
        .create_benefit(
            &author,
            &screener.id,
            NewBenefit {
                name: "Placeholder".to_string(),
                description: String::new(),
            },
        )
        .unwrap();

    assert!(screeners.form_paths(&author, &screener.id).unwrap().is_empty());
}
