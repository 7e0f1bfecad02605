//! Parsed API contract types.
//!
//! The contract is produced by an external parser and consumed here as plain
//! data: a list of endpoints plus a registry of named schemas used for `$ref`
//! resolution. Schema nodes are kept as raw `serde_json::Value` so the engine
//! can work with any JSON-Schema-flavored input without a full type model.

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// A parsed API contract: endpoints plus the shared schema registry.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Contract {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    #[serde(default)]
    pub components: Components,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Components {
    /// Named schema definitions, the lookup target for `$ref` nodes.
    #[serde(default)]
    pub schemas: HashMap<String, Value>,
}

/// Closed set of HTTP methods the dispatcher handles.
///
/// Routes are resolved against this enum once at registration time; there is
/// no per-request string lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    #[serde(alias = "GET")]
    Get,
    #[serde(alias = "POST")]
    Post,
    #[serde(alias = "PUT")]
    Put,
    #[serde(alias = "PATCH")]
    Patch,
    #[serde(alias = "DELETE")]
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// True for methods that carry a request body worth validating.
    pub fn has_request_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operation in the contract.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "operationId")]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, rename = "requestBody")]
    pub request_body: Option<RequestBodySpec>,
    /// Status code (as declared, e.g. "200") to response description.
    #[serde(default)]
    pub responses: BTreeMap<String, ResponseSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default, rename = "in")]
    pub location: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub schema: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RequestBodySpec {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub schema: Option<Value>,
    #[serde(default)]
    pub content: Option<HashMap<String, MediaType>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResponseSpec {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schema: Option<Value>,
    #[serde(default)]
    pub content: Option<HashMap<String, MediaType>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<Value>,
}

impl RequestBodySpec {
    /// The body schema, whether declared inline or under a JSON content type.
    pub fn schema(&self) -> Option<&Value> {
        self.schema
            .as_ref()
            .or_else(|| self.content.as_ref()?.get("application/json")?.schema.as_ref())
    }
}

impl ResponseSpec {
    pub fn schema(&self) -> Option<&Value> {
        self.schema
            .as_ref()
            .or_else(|| self.content.as_ref()?.get("application/json")?.schema.as_ref())
    }
}

impl Endpoint {
    /// Name of the trailing `{param}` path segment, if the path ends in one.
    ///
    /// `/pets/{id}` -> `Some("id")`, `/pets` -> `None`.
    pub fn path_id_param(&self) -> Option<&str> {
        let last = self.path.trim_end_matches('/').rsplit('/').next()?;
        last.strip_prefix('{')?.strip_suffix('}')
    }

    /// Translate OpenAPI `{param}` segments into axum `:param` syntax.
    pub fn axum_path(&self) -> String {
        self.path
            .split('/')
            .map(|seg| match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => format!(":{name}"),
                None => seg.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Schema of the success response: the lowest declared 2xx code that
    /// carries one.
    pub fn success_schema(&self) -> Option<&Value> {
        self.responses
            .iter()
            .filter(|(code, _)| code.starts_with('2'))
            .find_map(|(_, spec)| spec.schema())
    }

    /// Declared error responses (4xx/5xx) that carry a numeric status code.
    pub fn error_responses(&self) -> Vec<(u16, &ResponseSpec)> {
        self.responses
            .iter()
            .filter_map(|(code, spec)| {
                let status: u16 = code.parse().ok()?;
                (status >= 400).then_some((status, spec))
            })
            .collect()
    }
}

impl Contract {
    /// Load a contract from a JSON or YAML file, chosen by extension.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read contract file {}", path.display()))?;
        let contract = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)
                .with_context(|| format!("Invalid YAML contract in {}", path.display()))?,
            _ => serde_json::from_str(&raw)
                .with_context(|| format!("Invalid JSON contract in {}", path.display()))?,
        };
        Ok(contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_axum_path_translation() {
        let endpoint: Endpoint = serde_json::from_value(json!({
            "path": "/users/{userId}/orders/{id}",
            "method": "get"
        }))
        .unwrap();
        assert_eq!(endpoint.axum_path(), "/users/:userId/orders/:id");
        assert_eq!(endpoint.path_id_param(), Some("id"));
    }

    #[test]
    fn test_method_aliases() {
        let endpoint: Endpoint =
            serde_json::from_value(json!({ "path": "/pets", "method": "DELETE" })).unwrap();
        assert_eq!(endpoint.method, HttpMethod::Delete);
    }

    #[test]
    fn test_response_schema_under_content() {
        let endpoint: Endpoint = serde_json::from_value(json!({
            "path": "/pets",
            "method": "get",
            "responses": {
                "200": {
                    "content": {
                        "application/json": { "schema": { "type": "array" } }
                    }
                },
                "404": { "description": "not found" }
            }
        }))
        .unwrap();
        assert_eq!(endpoint.success_schema().unwrap()["type"], "array");
        assert_eq!(endpoint.error_responses().len(), 1);
    }
}
