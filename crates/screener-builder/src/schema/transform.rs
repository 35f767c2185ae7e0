use serde_json::{json, Map, Value};

use crate::domain::CheckConfig;

fn properties(schema: &Value) -> Option<&Map<String, Value>> {
    schema.get("properties").and_then(Value::as_object)
}

/// Items schema of a `people` property shaped as an array of objects.
fn people_items(people: &Value) -> Option<&Value> {
    if people.get("type").and_then(Value::as_str) != Some("array") {
        return None;
    }
    let items = people.get("items")?;
    let is_object = items.get("type").and_then(Value::as_str) == Some("object")
        || items.get("properties").is_some_and(Value::is_object);
    is_object.then_some(items)
}

/// Rewrite the household `people` array into an object keyed by `person_id`.
///
/// The schema is returned unchanged when it has no array-of-objects `people`
/// property or when no person id is known.
pub fn transform_people_schema(schema: &Value, person_id: Option<&str>) -> Value {
    match person_id.filter(|id| !id.is_empty()) {
        Some(id) => transform_people_schema_for(schema, &[id.to_string()]),
        None => schema.clone(),
    }
}

/// Multi-person form of [`transform_people_schema`]: every id receives its
/// own copy of the item schema.
pub fn transform_people_schema_for(schema: &Value, person_ids: &[String]) -> Value {
    let mut transformed = schema.clone();
    if person_ids.is_empty() {
        return transformed;
    }
    let Some(items) = properties(schema)
        .and_then(|props| props.get("people"))
        .and_then(people_items)
    else {
        return transformed;
    };

    let keyed: Map<String, Value> = person_ids
        .iter()
        .map(|id| (id.clone(), items.clone()))
        .collect();

    if let Some(props) = transformed
        .get_mut("properties")
        .and_then(Value::as_object_mut)
    {
        props.insert(
            "people".to_string(),
            json!({ "type": "object", "properties": keyed }),
        );
    }
    transformed
}

/// Move a top-level `enrollments` property under each person as a list of
/// benefit names: `people.<id>.enrollments: string[]`.
///
/// Existing person entries are merged into, missing ones are created. The
/// schema is left as is when there are no person ids or when `people` exists
/// but is not object-shaped.
pub fn transform_enrollments_schema(schema: &Value, person_ids: &[String]) -> Value {
    let mut transformed = schema.clone();
    let has_enrollments = properties(schema).is_some_and(|props| props.contains_key("enrollments"));
    if person_ids.is_empty() || !has_enrollments {
        return transformed;
    }

    let Some(props) = transformed
        .get_mut("properties")
        .and_then(Value::as_object_mut)
    else {
        return transformed;
    };

    let people = props
        .entry("people")
        .or_insert_with(|| json!({ "type": "object", "properties": {} }));
    let people_is_object = people.get("type").and_then(Value::as_str) == Some("object");
    let Some(people_props) = people
        .get_mut("properties")
        .and_then(Value::as_object_mut)
        .filter(|_| people_is_object)
    else {
        return schema.clone();
    };

    for id in person_ids {
        let person = people_props
            .entry(id.clone())
            .or_insert_with(|| json!({ "type": "object", "properties": {} }));
        let Some(person) = person.as_object_mut() else {
            continue;
        };
        let person_props = person
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(person_props) = person_props.as_object_mut() {
            person_props.insert(
                "enrollments".to_string(),
                json!({ "type": "array", "items": { "type": "string" } }),
            );
        }
    }

    props.remove("enrollments");
    transformed
}

/// Input definition of a check as the form sees it: people keyed by the
/// configured person ids, enrollments nested under each person.
pub fn transform_input_definition(config: &CheckConfig) -> Value {
    let person_ids = config.person_ids();
    let people = transform_people_schema_for(&config.input_definition, &person_ids);
    transform_enrollments_schema(&people, &person_ids)
}
