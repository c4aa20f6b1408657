//! Validation of the OpenAPI document before it is deployed.
//!
//! A structural walk reports located violations for the parts the
//! documentation platform renders: the version marker, `info`, the `paths`
//! tree with its parameters and responses, and every `$ref`. A 3.0 document
//! that passes the walk is then deserialized into the typed `openapiv3`
//! model, which rejects anything else the OpenAPI schema does not allow.
//! All violations are collected so one run reports everything.

use crate::error::{Result, SpecError};
use serde_yaml::{Mapping, Value};
use std::path::Path;

const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Summary of a valid document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSummary {
    /// `openapi` version string
    pub openapi: String,
    /// `info.title`
    pub title: String,
    /// `info.version`
    pub version: String,
    /// Number of operations across all paths
    pub operations: usize,
}

/// Validate the document at `path`
pub fn validate_spec_file(path: &Path) -> Result<SpecSummary> {
    let content = std::fs::read_to_string(path).map_err(|source| SpecError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    validate_spec(&content, path)
}

/// Validate document text; `path` is only used for messages
pub fn validate_spec(content: &str, path: &Path) -> Result<SpecSummary> {
    let document: Value = serde_yaml::from_str(content).map_err(|source| SpecError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut violations = Vec::new();
    let summary = check_document(&document, &mut violations);

    // the typed model covers 3.0; its errors only add noise to structural ones
    if violations.is_empty()
        && summary
            .as_ref()
            .is_some_and(|summary| summary.openapi.starts_with("3.0"))
    {
        check_schema(content, &mut violations);
    }

    match summary {
        Some(summary) if violations.is_empty() => Ok(summary),
        _ => Err(SpecError::Invalid {
            path: path.to_path_buf(),
            violations,
        }
        .into()),
    }
}

fn check_document(document: &Value, violations: &mut Vec<String>) -> Option<SpecSummary> {
    let Some(root) = document.as_mapping() else {
        violations.push("$: document must be a mapping".to_string());
        return None;
    };

    let openapi = match get(root, "openapi") {
        Some(Value::String(version)) if version.starts_with("3.") => version.clone(),
        Some(Value::String(version)) => {
            violations.push(format!("$.openapi: unsupported version '{}'", version));
            String::new()
        }
        // `openapi: 3.0` without quotes arrives as a number
        Some(_) => {
            violations.push("$.openapi: must be a string".to_string());
            String::new()
        }
        None => {
            violations.push("$.openapi: required field missing".to_string());
            String::new()
        }
    };

    let (title, version) = check_info(get(root, "info"), violations);
    let operations = check_paths(get(root, "paths"), violations);

    if let Some(components) = get(root, "components")
        && !components.is_mapping()
    {
        violations.push("$.components: must be a mapping".to_string());
    }

    check_references(document, document, "$", violations);

    Some(SpecSummary {
        openapi,
        title,
        version,
        operations,
    })
}

/// Check the document against the typed OpenAPI 3.0 model.
///
/// Catches what the structural walk does not look at: wrongly typed fields,
/// malformed schemas, parameters and media types anywhere in the tree.
fn check_schema(content: &str, violations: &mut Vec<String>) {
    if let Err(e) = serde_yaml::from_str::<openapiv3::OpenAPI>(content) {
        violations.push(format!("$: does not match the OpenAPI 3.0 schema: {}", e));
    }
}

fn check_info(info: Option<&Value>, violations: &mut Vec<String>) -> (String, String) {
    let Some(info) = info else {
        violations.push("$.info: required field missing".to_string());
        return (String::new(), String::new());
    };
    let Some(info) = info.as_mapping() else {
        violations.push("$.info: must be a mapping".to_string());
        return (String::new(), String::new());
    };

    let mut field = |name: &str| match get(info, name) {
        Some(Value::String(value)) => value.clone(),
        Some(_) => {
            violations.push(format!("$.info.{}: must be a string", name));
            String::new()
        }
        None => {
            violations.push(format!("$.info.{}: required field missing", name));
            String::new()
        }
    };

    let title = field("title");
    let version = field("version");
    (title, version)
}

fn check_paths(paths: Option<&Value>, violations: &mut Vec<String>) -> usize {
    let Some(paths) = paths else {
        violations.push("$.paths: required field missing".to_string());
        return 0;
    };
    let Some(paths) = paths.as_mapping() else {
        violations.push("$.paths: must be a mapping".to_string());
        return 0;
    };

    let mut operations = 0;
    for (key, item) in paths {
        let Some(route) = key.as_str() else {
            violations.push("$.paths: keys must be strings".to_string());
            continue;
        };
        let route_location = format!("$.paths['{}']", route);
        if !route.starts_with('/') {
            violations.push(format!("{}: path must start with '/'", route_location));
        }
        let Some(item) = item.as_mapping() else {
            violations.push(format!("{}: must be a mapping", route_location));
            continue;
        };
        check_parameters(get(item, "parameters"), &route_location, violations);

        for method in HTTP_METHODS {
            let Some(operation) = get(item, method) else {
                continue;
            };
            operations += 1;
            let location = format!("{}.{}", route_location, method);
            let Some(operation) = operation.as_mapping() else {
                violations.push(format!("{}: must be a mapping", location));
                continue;
            };
            check_parameters(get(operation, "parameters"), &location, violations);
            match get(operation, "responses").map(Value::as_mapping) {
                Some(Some(responses)) if !responses.is_empty() => {
                    check_responses(responses, &location, violations)
                }
                Some(Some(_)) => {
                    violations.push(format!("{}.responses: must not be empty", location))
                }
                Some(None) => violations.push(format!("{}.responses: must be a mapping", location)),
                None => {
                    violations.push(format!("{}.responses: required field missing", location))
                }
            }
        }
    }
    operations
}

fn check_responses(responses: &Mapping, location: &str, violations: &mut Vec<String>) {
    for (code, response) in responses {
        let code = match code {
            Value::String(code) => code.clone(),
            Value::Number(code) => code.to_string(),
            _ => {
                violations.push(format!("{}.responses: status codes must be strings", location));
                continue;
            }
        };
        if code.starts_with("x-") {
            continue;
        }
        let response_location = format!("{}.responses['{}']", location, code);
        let Some(response) = response.as_mapping() else {
            violations.push(format!("{}: must be a mapping", response_location));
            continue;
        };
        if get(response, "$ref").is_some() {
            continue;
        }
        match get(response, "description") {
            Some(Value::String(_)) => {}
            Some(_) => violations.push(format!("{}.description: must be a string", response_location)),
            None => violations.push(format!(
                "{}.description: required field missing",
                response_location
            )),
        }
    }
}

fn check_parameters(parameters: Option<&Value>, location: &str, violations: &mut Vec<String>) {
    let Some(parameters) = parameters else {
        return;
    };
    let Some(parameters) = parameters.as_sequence() else {
        violations.push(format!("{}.parameters: must be a list", location));
        return;
    };

    for (index, parameter) in parameters.iter().enumerate() {
        let parameter_location = format!("{}.parameters[{}]", location, index);
        let Some(parameter) = parameter.as_mapping() else {
            violations.push(format!("{}: must be a mapping", parameter_location));
            continue;
        };
        if get(parameter, "$ref").is_some() {
            continue;
        }
        if !matches!(get(parameter, "name"), Some(Value::String(_))) {
            violations.push(format!("{}.name: required string missing", parameter_location));
        }
        match get(parameter, "in").and_then(Value::as_str) {
            Some("query" | "header" | "path" | "cookie") => {}
            Some(other) => violations.push(format!(
                "{}.in: '{}' is not one of query, header, path, cookie",
                parameter_location, other
            )),
            None => violations.push(format!("{}.in: required field missing", parameter_location)),
        }
    }
}

/// Every `$ref` below `node` must point at an existing part of `root`
fn check_references(root: &Value, node: &Value, location: &str, violations: &mut Vec<String>) {
    match node {
        Value::Mapping(mapping) => {
            if let Some(reference) = get(mapping, "$ref") {
                match reference.as_str() {
                    Some(target) if resolve_reference(root, target).is_some() => {}
                    Some(target) => violations.push(format!(
                        "{}.$ref: '{}' does not resolve within the document",
                        location, target
                    )),
                    None => violations.push(format!("{}.$ref: must be a string", location)),
                }
            }
            for (key, value) in mapping {
                let child = match key {
                    Value::String(key) if key == "$ref" => continue,
                    Value::String(key) if is_plain_key(key) => format!("{}.{}", location, key),
                    Value::String(key) => format!("{}['{}']", location, key),
                    Value::Number(key) => format!("{}['{}']", location, key),
                    _ => format!("{}[?]", location),
                };
                check_references(root, value, &child, violations);
            }
        }
        Value::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                check_references(root, item, &format!("{}[{}]", location, index), violations);
            }
        }
        Value::Tagged(tagged) => check_references(root, &tagged.value, location, violations),
        _ => {}
    }
}

/// Resolve a local JSON pointer reference such as `#/components/schemas/Camera`.
/// External references are not resolvable: only this file is deployed.
fn resolve_reference<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer = reference.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root);
    }
    let pointer = pointer.strip_prefix('/')?;

    pointer.split('/').try_fold(root, |node, segment| {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        match node {
            Value::Mapping(mapping) => get(mapping, &segment),
            Value::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    })
}

fn is_plain_key(key: &str) -> bool {
    key.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn get<'a>(mapping: &'a Mapping, key: &str) -> Option<&'a Value> {
    mapping.get(Value::String(key.to_string()))
}
