//! Schema composition engine.
//!
//! Check input definitions describe a household as an array of people. Forms
//! address a specific person instead, so definitions are first rewritten into
//! person-keyed objects and then flattened into dotted [`FormPath`]s.
//! Submitted form data travels the opposite way through
//! [`transform_form_data`] before it reaches a rule model.

mod form_data;
mod paths;
mod transform;

pub use form_data::transform_form_data;
pub use paths::{
    extract_json_schema_paths, extract_json_schema_paths_with_types, extract_unique_input_paths,
    FormPath,
};
pub use transform::{
    transform_enrollments_schema, transform_input_definition, transform_people_schema,
    transform_people_schema_for,
};
