use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::transform::transform_input_definition;
use crate::domain::Benefit;

/// Dotted input path plus the type a form field should use for it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FormPath {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FormPath {
    pub fn new(path: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: kind.into(),
        }
    }
}

const DATE_FORMATS: [&str; 3] = ["date", "date-time", "time"];

fn declared_type(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(kind) => Some(kind.as_str()),
        Value::Array(kinds) => kinds
            .iter()
            .filter_map(Value::as_str)
            .find(|kind| *kind != "null"),
        _ => None,
    }
}

fn effective_type(schema: &Value) -> String {
    match declared_type(schema) {
        Some("string") => schema
            .get("format")
            .and_then(Value::as_str)
            .filter(|format| DATE_FORMATS.contains(format))
            .unwrap_or("string")
            .to_string(),
        Some(kind) => kind.to_string(),
        None => "any".to_string(),
    }
}

fn has_properties(schema: &Value) -> bool {
    schema.get("properties").is_some_and(Value::is_object)
}

fn walk(schema: &Value, parent: &str, out: &mut Vec<FormPath>) {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };

    for (key, property) in properties {
        if key == "id" || (parent.is_empty() && key == "parameters") {
            continue;
        }
        let path = if parent.is_empty() {
            key.clone()
        } else {
            format!("{parent}.{key}")
        };

        if has_properties(property) {
            walk(property, &path, out);
            continue;
        }

        if declared_type(property) == Some("array") {
            match property.get("items") {
                Some(items) if has_properties(items) => walk(items, &path, out),
                Some(items) => out.push(FormPath::new(
                    path,
                    format!("array:{}", effective_type(items)),
                )),
                None => out.push(FormPath::new(path, "array")),
            }
            continue;
        }

        out.push(FormPath::new(path, effective_type(property)));
    }
}

/// Leaf paths of a JSON schema with their effective types, depth first.
///
/// `id` keys are skipped at every level and `parameters` at the top level.
/// Arrays of objects are transparent: their item properties are reported
/// under the array's own path.
pub fn extract_json_schema_paths_with_types(schema: &Value) -> Vec<FormPath> {
    let mut out = Vec::new();
    walk(schema, "", &mut out);
    out
}

pub fn extract_json_schema_paths(schema: &Value) -> Vec<String> {
    extract_json_schema_paths_with_types(schema)
        .into_iter()
        .map(|form_path| form_path.path)
        .collect()
}

/// Union of the form paths required by every check of every benefit, sorted
/// by path.
pub fn extract_unique_input_paths(benefits: &[Benefit]) -> Vec<FormPath> {
    let unique: BTreeSet<FormPath> = benefits
        .iter()
        .flat_map(|benefit| benefit.checks.iter())
        .flat_map(|config| extract_json_schema_paths_with_types(&transform_input_definition(config)))
        .collect();
    unique.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CheckConfig;
    use crate::schema::transform_people_schema;
    use serde_json::json;

    fn config(schema: Value, person_id: Option<&str>) -> CheckConfig {
        let mut config = CheckConfig {
            input_definition: schema,
            ..CheckConfig::default()
        };
        if let Some(id) = person_id {
            config.parameters.insert("personId".to_string(), json!(id));
        }
        config
    }

    fn benefit(checks: Vec<CheckConfig>) -> Benefit {
        Benefit {
            checks,
            ..Benefit::default()
        }
    }

    #[test]
    fn transformed_people_paths_report_date_format() {
        let schema = json!({
            "properties": {
                "people": {
                    "type": "array",
                    "items": {
                        "properties": {
                            "dateOfBirth": { "type": "string", "format": "date" }
                        }
                    }
                }
            }
        });
        let transformed = transform_people_schema(&schema, Some("applicant"));

        assert_eq!(
            extract_json_schema_paths(&transformed),
            vec!["people.applicant.dateOfBirth"]
        );
        assert_eq!(
            extract_json_schema_paths_with_types(&transformed),
            vec![FormPath::new("people.applicant.dateOfBirth", "date")]
        );
    }

    #[test]
    fn skips_top_level_parameters_and_every_id() {
        let schema = json!({
            "properties": {
                "parameters": { "properties": { "minAge": { "type": "number" } } },
                "id": { "type": "string" },
                "household": {
                    "properties": {
                        "id": { "type": "string" },
                        "size": { "type": "integer" },
                        "parameters": { "type": "string" }
                    }
                }
            }
        });

        let paths = extract_json_schema_paths(&schema);
        assert_eq!(paths, vec!["household.parameters", "household.size"]);
        assert!(paths.iter().all(|path| !path.ends_with(".id")));
    }

    #[test]
    fn arrays_are_transparent_or_typed_by_item() {
        let schema = json!({
            "properties": {
                "vehicles": {
                    "type": "array",
                    "items": { "properties": { "value": { "type": "number" } } }
                },
                "languages": { "type": "array", "items": { "type": "string" } },
                "appointments": { "type": "array", "items": { "type": "string", "format": "date-time" } },
                "tags": { "type": "array" },
                "notes": { "type": ["null", "string"] },
                "wakeTime": { "type": "string", "format": "time" },
                "email": { "type": "string", "format": "email" },
                "anything": {}
            }
        });

        assert_eq!(
            extract_json_schema_paths_with_types(&schema),
            vec![
                FormPath::new("anything", "any"),
                FormPath::new("appointments", "array:date-time"),
                FormPath::new("email", "string"),
                FormPath::new("languages", "array:string"),
                FormPath::new("notes", "string"),
                FormPath::new("tags", "array"),
                FormPath::new("vehicles.value", "number"),
                FormPath::new("wakeTime", "time"),
            ]
        );
    }

    #[test]
    fn schema_without_properties_yields_nothing() {
        assert!(extract_json_schema_paths(&json!({ "type": "object" })).is_empty());
        assert!(extract_json_schema_paths(&Value::Null).is_empty());
    }

    #[test]
    fn union_across_benefits_is_deduplicated_and_sorted() {
        let people = json!({
            "properties": {
                "income": { "type": "number" },
                "people": {
                    "type": "array",
                    "items": {
                        "properties": {
                            "dateOfBirth": { "type": "string", "format": "date" }
                        }
                    }
                }
            }
        });
        let income = json!({ "properties": { "income": { "type": "number" } } });

        let forward = vec![
            benefit(vec![config(people.clone(), Some("applicant"))]),
            benefit(vec![config(income.clone(), None)]),
        ];
        let reversed = vec![
            benefit(vec![config(income, None)]),
            benefit(vec![config(people, Some("applicant"))]),
        ];

        let expected = vec![
            FormPath::new("income", "number"),
            FormPath::new("people.applicant.dateOfBirth", "date"),
        ];
        assert_eq!(extract_unique_input_paths(&forward), expected);
        assert_eq!(extract_unique_input_paths(&reversed), expected);
    }
}
