use serde_json::{json, Map, Value};

/// Convert submitted form data back into the household shape rule models
/// expect: `people` becomes an array of objects carrying `id`, and per-person
/// enrollment lists become one flat `enrollments` array of
/// `{personId, benefit}` entries.
pub fn transform_form_data(form_data: &Map<String, Value>) -> Map<String, Value> {
    let mut result = form_data.clone();

    let Some(Value::Object(people)) = form_data.get("people") else {
        return result;
    };

    let mut household = Vec::with_capacity(people.len());
    let mut enrollments = Vec::new();

    for (person_id, person) in people {
        let mut entry = person.as_object().cloned().unwrap_or_default();
        entry.insert("id".to_string(), Value::String(person_id.clone()));

        if let Some(Value::Array(benefits)) = entry.remove("enrollments") {
            enrollments.extend(
                benefits
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|benefit| json!({ "personId": person_id, "benefit": benefit })),
            );
        }
        household.push(Value::Object(entry));
    }

    result.insert("people".to_string(), Value::Array(household));
    if !enrollments.is_empty() {
        result.insert("enrollments".to_string(), Value::Array(enrollments));
    }
    result
}
