//! Semantic context inference for generated data.
//!
//! Every endpoint gets a `GenerationContext` describing what kind of thing it
//! serves ("commerce/product", "users/user", ...). The generator threads the
//! context through recursive descent and re-derives it when entering a nested
//! object whose property name looks like a different entity, so an order's
//! embedded `customer` gets person-flavored fields while the order itself
//! gets order-flavored ones. Context values are never mutated in place.

use crate::domain::contract::{Endpoint, HttpMethod};
use regex::Regex;
use std::collections::HashMap;

/// How the correlated path-parameter id was spelled by the client.
///
/// Only consulted when the schema itself declares no type for the `id` field;
/// the schema-declared type always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRepr {
    Numeric,
    Text,
}

/// Immutable per-request generation context.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub domain: String,
    pub entity: String,
    pub tags: Vec<String>,
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    /// Path-parameter value that must surface as the generated record's id.
    pub correlation_id: Option<String>,
    pub correlation_id_repr: Option<IdRepr>,
}

impl GenerationContext {
    /// Copy of this context carrying a correlated id from a path parameter.
    pub fn with_correlation_id(&self, id: &str) -> Self {
        let mut ctx = self.clone();
        ctx.correlation_id = Some(id.to_string());
        ctx.correlation_id_repr = Some(if id.trim().parse::<i64>().is_ok() {
            IdRepr::Numeric
        } else {
            IdRepr::Text
        });
        ctx
    }
}

/// One entry in the nested-entity detection table.
pub struct EntityPattern {
    pub pattern: Regex,
    pub entity: String,
    pub domain: String,
}

impl EntityPattern {
    pub fn new(pattern: &str, entity: &str, domain: &str) -> Self {
        Self {
            // Table entries are code-supplied; a bad override pattern is a
            // programming error worth failing loudly on at construction.
            pattern: Regex::new(pattern).expect("invalid entity pattern"),
            entity: entity.to_string(),
            domain: domain.to_string(),
        }
    }
}

/// Derives generation contexts from endpoint metadata and property names.
pub struct ContextInferencer {
    tag_map: HashMap<String, (String, String)>,
    entity_patterns: Vec<EntityPattern>,
}

impl ContextInferencer {
    pub fn new() -> Self {
        Self {
            tag_map: Self::default_tag_map(),
            entity_patterns: Self::default_entity_patterns(),
        }
    }

    /// Replace the nested-entity detection table. Patterns are checked in
    /// order; the first match wins.
    pub fn with_entity_patterns(mut self, patterns: Vec<EntityPattern>) -> Self {
        self.entity_patterns = patterns;
        self
    }

    /// Replace the tag-to-(domain, entity) lookup table.
    pub fn with_tag_map(mut self, map: HashMap<String, (String, String)>) -> Self {
        self.tag_map = map;
        self
    }

    fn default_tag_map() -> HashMap<String, (String, String)> {
        [
            ("categories", ("commerce", "category")),
            ("products", ("commerce", "product")),
            ("orders", ("commerce", "order")),
            ("reviews", ("commerce", "review")),
            ("cart", ("commerce", "cart")),
            ("users", ("users", "user")),
            ("authentication", ("auth", "auth")),
        ]
        .into_iter()
        .map(|(tag, (domain, entity))| (tag.to_string(), (domain.to_string(), entity.to_string())))
        .collect()
    }

    fn default_entity_patterns() -> Vec<EntityPattern> {
        vec![
            EntityPattern::new(r"(?i)(user|customer|author|owner|buyer)", "user", "users"),
            EntityPattern::new(r"(?i)categor", "category", "commerce"),
            EntityPattern::new(r"(?i)(product|item)", "product", "commerce"),
            EntityPattern::new(r"(?i)review", "review", "commerce"),
            EntityPattern::new(r"(?i)order", "order", "commerce"),
            EntityPattern::new(r"(?i)cart", "cart", "commerce"),
        ]
    }

    /// Build the base context for an endpoint.
    ///
    /// Tags are authoritative when the first one maps through the tag table;
    /// otherwise the context is inferred from the path shape.
    pub fn extract_endpoint_context(&self, endpoint: &Endpoint) -> GenerationContext {
        let tagged = endpoint
            .tags
            .first()
            .and_then(|tag| self.tag_map.get(&tag.to_lowercase()).cloned());

        let (domain, entity) = match tagged {
            Some(pair) => pair,
            None => self.infer_from_path(&endpoint.path),
        };

        GenerationContext {
            domain,
            entity,
            tags: endpoint.tags.clone(),
            path: endpoint.path.clone(),
            method: endpoint.method,
            operation_id: endpoint.operation_id.clone(),
            correlation_id: None,
            correlation_id_repr: None,
        }
    }

    /// Context for a nested object property: re-tagged when the property name
    /// matches an entity pattern, otherwise the parent context unchanged.
    pub fn infer_nested_context(
        &self,
        property_name: &str,
        parent: &GenerationContext,
    ) -> GenerationContext {
        for entry in &self.entity_patterns {
            if entry.pattern.is_match(property_name) {
                let mut ctx = parent.clone();
                ctx.entity = entry.entity.clone();
                ctx.domain = entry.domain.clone();
                return ctx;
            }
        }
        parent.clone()
    }

    fn infer_from_path(&self, path: &str) -> (String, String) {
        // Parameter segments say nothing about the entity.
        let segments: Vec<&str> = path
            .split('/')
            .filter(|seg| !seg.is_empty() && !seg.starts_with('{'))
            .collect();
        let flat = segments.join("/").to_lowercase();

        let domain = if ["products", "categories", "orders", "cart"]
            .iter()
            .any(|kw| flat.contains(kw))
        {
            "commerce"
        } else if flat.contains("users") || flat.contains("profile") {
            "users"
        } else if flat.contains("auth") {
            "auth"
        } else {
            "generic"
        };

        let entity = segments
            .last()
            .map(|seg| singularize(&seg.to_lowercase()))
            .unwrap_or_else(|| "resource".to_string());

        (domain.to_string(), entity)
    }
}

impl Default for ContextInferencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Naive English singularization: `categories` -> `category`, `pets` -> `pet`.
fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        format!("{stem}y")
    } else if word.len() > 1 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn endpoint(path: &str, tags: &[&str]) -> Endpoint {
        serde_json::from_value(json!({
            "path": path,
            "method": "get",
            "tags": tags,
        }))
        .unwrap()
    }

    #[test]
    fn test_tag_lookup_wins() {
        let inferencer = ContextInferencer::new();
        let ctx = inferencer.extract_endpoint_context(&endpoint("/v1/stuff", &["Products"]));
        assert_eq!(ctx.domain, "commerce");
        assert_eq!(ctx.entity, "product");
    }

    #[test]
    fn test_path_inference() {
        let inferencer = ContextInferencer::new();
        let ctx = inferencer.extract_endpoint_context(&endpoint("/categories/{id}", &[]));
        assert_eq!(ctx.domain, "commerce");
        assert_eq!(ctx.entity, "category");

        let ctx = inferencer.extract_endpoint_context(&endpoint("/users/{id}/profile", &[]));
        assert_eq!(ctx.domain, "users");
        assert_eq!(ctx.entity, "profile");

        let ctx = inferencer.extract_endpoint_context(&endpoint("/pets", &["pets"]));
        assert_eq!(ctx.domain, "generic");
        assert_eq!(ctx.entity, "pet");
    }

    #[test]
    fn test_nested_context_retag() {
        let inferencer = ContextInferencer::new();
        let parent = inferencer.extract_endpoint_context(&endpoint("/orders/{id}", &["orders"]));
        assert_eq!(parent.entity, "order");

        let nested = inferencer.infer_nested_context("customer", &parent);
        assert_eq!(nested.entity, "user");
        assert_eq!(nested.domain, "users");

        let unchanged = inferencer.infer_nested_context("shippingAddress", &parent);
        assert_eq!(unchanged.entity, "order");
    }

    #[test]
    fn test_override_patterns() {
        let inferencer = ContextInferencer::new().with_entity_patterns(vec![EntityPattern::new(
            r"(?i)widget",
            "widget",
            "inventory",
        )]);
        let parent = inferencer.extract_endpoint_context(&endpoint("/things", &[]));
        let nested = inferencer.infer_nested_context("primaryWidget", &parent);
        assert_eq!(nested.entity, "widget");
        assert_eq!(nested.domain, "inventory");
        // Built-in patterns were replaced, not extended.
        let nested = inferencer.infer_nested_context("customer", &parent);
        assert_eq!(nested.entity, parent.entity);
    }

    #[test]
    fn test_correlation_repr() {
        let inferencer = ContextInferencer::new();
        let base = inferencer.extract_endpoint_context(&endpoint("/pets/{id}", &[]));
        let ctx = base.with_correlation_id("7");
        assert_eq!(ctx.correlation_id_repr, Some(IdRepr::Numeric));
        let ctx = base.with_correlation_id("a1b2");
        assert_eq!(ctx.correlation_id_repr, Some(IdRepr::Text));
    }
}
