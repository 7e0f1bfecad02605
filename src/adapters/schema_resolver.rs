//! Schema resolution.
//!
//! Expands `$ref`, `oneOf`/`anyOf`, and `allOf` constructs into a concrete
//! shape the generator can walk. Resolution is pure aside from warning logs
//! and never fails: an unresolvable reference falls back to a generic
//! `{id, name}` shape, favoring availability over strictness.

use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Guard against `$ref` chains that loop back on themselves.
const MAX_REF_DEPTH: usize = 16;

#[derive(Clone)]
pub struct SchemaResolver {
    registry: Arc<HashMap<String, Value>>,
}

impl SchemaResolver {
    /// Build a resolver over the contract's `components.schemas` registry.
    pub fn new(schemas: HashMap<String, Value>) -> Self {
        Self {
            registry: Arc::new(schemas),
        }
    }

    /// Resolve one schema node into a directly generatable shape.
    ///
    /// Nested property and item schemas are left as-is; the generator calls
    /// back into the resolver as it descends, so reference cycles are bounded
    /// by the generation depth guard rather than eagerly expanded here.
    pub fn resolve(&self, node: &Value) -> Value {
        self.resolve_at(node, 0)
    }

    fn resolve_at(&self, node: &Value, depth: usize) -> Value {
        if depth > MAX_REF_DEPTH {
            warn!("Schema reference chain exceeded depth {MAX_REF_DEPTH}, using fallback shape");
            return fallback_schema();
        }

        let Some(map) = node.as_object() else {
            return node.clone();
        };

        if let Some(Value::String(reference)) = map.get("$ref") {
            return self.resolve_ref(reference, depth);
        }

        // oneOf/anyOf: deterministically take the first variant. Snapshot
        // reproducibility is worth more to a mock server than branch variety.
        for key in ["oneOf", "anyOf"] {
            if let Some(variants) = map.get(key).and_then(Value::as_array) {
                return match variants.first() {
                    Some(first) => self.resolve_at(first, depth + 1),
                    None => {
                        warn!("Empty {key} in schema, using fallback shape");
                        fallback_schema()
                    }
                };
            }
        }

        if let Some(parts) = map.get("allOf").and_then(Value::as_array) {
            return self.merge_all_of(parts, depth);
        }

        node.clone()
    }

    fn resolve_ref(&self, reference: &str, depth: usize) -> Value {
        // Accept both "#/components/schemas/Name" and a bare "Name".
        let name = reference.rsplit('/').next().unwrap_or(reference);
        match self.registry.get(name) {
            Some(target) => self.resolve_at(target, depth + 1),
            None => {
                warn!("Unresolvable schema reference '{reference}', using fallback shape");
                fallback_schema()
            }
        }
    }

    /// Field-by-field merge of resolved `allOf` members, last write wins.
    /// Only meaningful for object sub-schemas; non-objects are skipped.
    fn merge_all_of(&self, parts: &[Value], depth: usize) -> Value {
        let mut properties = Map::new();
        let mut required: Vec<Value> = Vec::new();

        for part in parts {
            let resolved = self.resolve_at(part, depth + 1);
            let Some(obj) = resolved.as_object() else {
                continue;
            };
            if let Some(props) = obj.get("properties").and_then(Value::as_object) {
                for (key, prop) in props {
                    properties.insert(key.clone(), prop.clone());
                }
            }
            if let Some(reqs) = obj.get("required").and_then(Value::as_array) {
                for req in reqs {
                    if !required.contains(req) {
                        required.push(req.clone());
                    }
                }
            }
        }

        if properties.is_empty() && required.is_empty() {
            warn!("allOf resolved to no object members, using fallback shape");
            return fallback_schema();
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Generic shape served when a schema cannot be resolved.
pub fn fallback_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string", "format": "uuid" },
            "name": { "type": "string" }
        }
    })
}
