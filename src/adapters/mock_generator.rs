//! Recursive schema-driven mock data generation.
//!
//! The generator is total: for any schema input, including unresolved refs,
//! empty unions, or unknown types, it returns a defined JSON value. Failure
//! modes are absorbed by fallback values long before they become errors.
//!
//! Value heuristics apply in a fixed precedence so output is deterministic
//! for the same inputs:
//! 1. entity-specific generators keyed by the context entity and the
//!    property's semantic role,
//! 2. format/property-name heuristics independent of entity,
//! 3. a generic per-declared-type fallback sensitive to the scenario.
//!
//! All randomness flows through the injected `StdRng`, so a seeded server
//! produces reproducible data.

use crate::adapters::schema_resolver::{fallback_schema, SchemaResolver};
use crate::domain::context::IdRepr;
use crate::domain::{ContextInferencer, GenerationContext, Scenario};
use fake::faker::address::en::{CityName, CountryName, PostCode, StateAbbr, StreetName};
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::warn;

/// Recursion bound for nested/self-referential schemas.
pub const MAX_DEPTH: usize = 10;

/// Hard item-count cap, regardless of scenario.
const ABSOLUTE_MAX_ITEMS: usize = 100;

const CATEGORY_NAMES: &[&str] = &[
    "Electronics",
    "Books",
    "Clothing",
    "Home & Garden",
    "Sports",
    "Toys",
    "Beauty",
    "Automotive",
];

const PRODUCT_ADJECTIVES: &[&str] = &[
    "Ergonomic",
    "Sleek",
    "Rustic",
    "Durable",
    "Compact",
    "Wireless",
    "Premium",
    "Handcrafted",
];

const PRODUCT_NOUNS: &[&str] = &[
    "Keyboard",
    "Lamp",
    "Backpack",
    "Water Bottle",
    "Desk",
    "Headphones",
    "Notebook",
    "Chair",
];

const REVIEW_TITLES: &[&str] = &[
    "Exceeded my expectations",
    "Solid value for the price",
    "Would buy again",
    "Not quite what I hoped for",
    "Great quality overall",
];

const ORDER_STATUSES: &[&str] = &["pending", "processing", "shipped", "delivered", "cancelled"];

const CART_STATUSES: &[&str] = &["active", "checked_out", "abandoned"];

pub struct MockGenerator {
    scenario: Scenario,
    resolver: SchemaResolver,
    inferencer: Arc<ContextInferencer>,
}

impl MockGenerator {
    pub fn new(
        scenario: Scenario,
        resolver: SchemaResolver,
        inferencer: Arc<ContextInferencer>,
    ) -> Self {
        Self {
            scenario,
            resolver,
            inferencer,
        }
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// Generate a value conforming to `schema` under the given context.
    pub fn generate(&self, schema: &Value, ctx: &GenerationContext, rng: &mut StdRng) -> Value {
        self.generate_value(schema, "", ctx, rng, 0)
    }

    fn generate_value(
        &self,
        schema: &Value,
        prop: &str,
        ctx: &GenerationContext,
        rng: &mut StdRng,
        depth: usize,
    ) -> Value {
        if depth >= MAX_DEPTH {
            return fallback_object(rng);
        }

        let schema = self.resolver.resolve(schema);

        if let Some(options) = schema.get("enum").and_then(Value::as_array) {
            if !options.is_empty() {
                return match self.scenario {
                    Scenario::Demo => options[0].clone(),
                    _ => options[rng.gen_range(0..options.len())].clone(),
                };
            }
        }

        if is_id_field(prop) && !is_structured(&schema) {
            return self.generate_id(prop, &schema, rng);
        }

        match schema.get("type").and_then(Value::as_str) {
            Some("object") => self.generate_object(&schema, ctx, rng, depth),
            Some("array") => self.generate_array(&schema, prop, ctx, rng, depth),
            Some("string") => self.generate_string(prop, &schema, ctx, rng),
            Some("integer") => self.generate_integer(prop, &schema, rng),
            Some("number") => self.generate_number(prop, &schema, rng),
            Some("boolean") => self.generate_boolean(prop, rng),
            None if schema.get("properties").is_some() => {
                self.generate_object(&schema, ctx, rng, depth)
            }
            None if schema.get("items").is_some() => {
                self.generate_array(&schema, prop, ctx, rng, depth)
            }
            _ => fallback_object(rng),
        }
    }

    fn generate_object(
        &self,
        schema: &Value,
        ctx: &GenerationContext,
        rng: &mut StdRng,
        depth: usize,
    ) -> Value {
        let mut out = Map::new();

        if let Some(props) = schema.get("properties").and_then(Value::as_object) {
            for (name, prop_schema) in props {
                let resolved = self.resolver.resolve(prop_schema);
                let value = if name == "id" && ctx.correlation_id.is_some() {
                    self.correlated_id(&resolved, ctx)
                } else if is_structured(&resolved) {
                    // Nested entities get their own context; the correlated id
                    // belongs to the top-level record only.
                    let mut child_ctx = self.inferencer.infer_nested_context(name, ctx);
                    child_ctx.correlation_id = None;
                    child_ctx.correlation_id_repr = None;
                    self.generate_value(&resolved, name, &child_ctx, rng, depth + 1)
                } else {
                    self.generate_value(&resolved, name, ctx, rng, depth + 1)
                };
                out.insert(name.clone(), value);
            }
        }

        // Some contracts require fields they never declare under properties.
        if let Some(required) = schema.get("required").and_then(Value::as_array) {
            for name in required.iter().filter_map(Value::as_str) {
                if !out.contains_key(name) {
                    out.insert(name.to_string(), Value::String(format!("{name} value")));
                }
            }
        }

        Value::Object(out)
    }

    fn generate_array(
        &self,
        schema: &Value,
        prop: &str,
        ctx: &GenerationContext,
        rng: &mut StdRng,
        depth: usize,
    ) -> Value {
        let items_schema = match schema.get("items") {
            Some(items) => self.resolver.resolve(items),
            None => fallback_schema(),
        };

        let ceiling = complexity_ceiling(&items_schema);
        let count = self
            .scenario
            .item_count(rng)
            .min(ceiling)
            .min(ABSOLUTE_MAX_ITEMS);

        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let item = self.generate_value(&items_schema, prop, ctx, rng, depth + 1);
            // The generator is total, but never push an empty slot either way.
            if item.is_null() {
                out.push(fallback_object(rng));
            } else {
                out.push(item);
            }
        }
        Value::Array(out)
    }

    fn generate_string(
        &self,
        prop: &str,
        schema: &Value,
        ctx: &GenerationContext,
        rng: &mut StdRng,
    ) -> Value {
        if let Some(value) = self.entity_value(ctx, prop, rng) {
            return value;
        }

        let format = schema.get("format").and_then(Value::as_str);
        if let Some(value) = self.format_value(prop, format, rng) {
            return value;
        }

        match self.scenario {
            Scenario::Demo => {
                let subject = if prop.is_empty() { "text" } else { prop };
                Value::String(format!("Sample {subject}"))
            }
            _ => Value::String(Sentence(2..6).fake_with_rng::<String, _>(rng)),
        }
    }

    /// Domain-specific values keyed by the context entity and property role.
    fn entity_value(&self, ctx: &GenerationContext, prop: &str, rng: &mut StdRng) -> Option<Value> {
        let p = prop.to_lowercase();
        let value = match ctx.entity.as_str() {
            "category" if p == "name" => json!(self.pick(CATEGORY_NAMES, rng)),
            "product" if p == "name" || p == "title" => json!(format!(
                "{} {}",
                self.pick(PRODUCT_ADJECTIVES, rng),
                self.pick(PRODUCT_NOUNS, rng)
            )),
            "review" if p == "title" => json!(self.pick(REVIEW_TITLES, rng)),
            "review" if p == "content" || p == "comment" || p == "body" || p == "text" => {
                json!(Paragraph(1..3).fake_with_rng::<String, _>(rng))
            }
            "order" if p == "status" => json!(self.pick(ORDER_STATUSES, rng)),
            "cart" if p == "status" => json!(self.pick(CART_STATUSES, rng)),
            "user" if p == "name" || p == "fullname" || p == "full_name" => {
                json!(Name().fake_with_rng::<String, _>(rng))
            }
            "user" if p == "username" => json!(Username().fake_with_rng::<String, _>(rng)),
            _ => return None,
        };
        Some(value)
    }

    /// Entity-independent heuristics over declared format and property name.
    fn format_value(&self, prop: &str, format: Option<&str>, rng: &mut StdRng) -> Option<Value> {
        let p = prop.to_lowercase();

        if format == Some("email") || p.contains("email") {
            return Some(json!(SafeEmail().fake_with_rng::<String, _>(rng)));
        }
        if format == Some("uuid") {
            return Some(json!(random_uuid(rng)));
        }
        if format == Some("date") || p.ends_with("date") || p == "dob" || p.contains("birthday") {
            return Some(json!(self.random_date(rng)));
        }
        if format == Some("date-time")
            || p.ends_with("_at")
            || p.ends_with("at") && (p.starts_with("created") || p.starts_with("updated"))
            || p.contains("timestamp")
        {
            return Some(json!(self.random_datetime(rng)));
        }
        if format == Some("uri") || p.contains("url") || p.contains("website") || p.contains("link")
        {
            let slug: String = Word().fake_with_rng(rng);
            return Some(json!(format!("https://example.com/{slug}")));
        }
        if p.contains("token") || p.contains("secret") || p.contains("bearer") || p.contains("apikey")
            || p.contains("api_key")
        {
            return Some(json!(alphanumeric(rng, 32)));
        }
        if p.contains("first") && p.contains("name") {
            return Some(json!(FirstName().fake_with_rng::<String, _>(rng)));
        }
        if p.contains("last") && p.contains("name") {
            return Some(json!(LastName().fake_with_rng::<String, _>(rng)));
        }
        if p == "fullname" || p == "full_name" {
            return Some(json!(Name().fake_with_rng::<String, _>(rng)));
        }
        if p.contains("address") || p.contains("street") {
            return Some(json!(StreetName().fake_with_rng::<String, _>(rng)));
        }
        if p == "city" {
            return Some(json!(CityName().fake_with_rng::<String, _>(rng)));
        }
        if p == "country" {
            return Some(json!(CountryName().fake_with_rng::<String, _>(rng)));
        }
        if p == "state" {
            return Some(json!(StateAbbr().fake_with_rng::<String, _>(rng)));
        }
        if p.contains("zip") || p.contains("postal") {
            return Some(json!(PostCode().fake_with_rng::<String, _>(rng)));
        }
        if p.contains("phone") {
            return Some(json!(PhoneNumber().fake_with_rng::<String, _>(rng)));
        }
        if p.contains("description") || p == "bio" || p == "summary" || p == "about" {
            return Some(match self.scenario {
                Scenario::Demo => json!(Sentence(4..8).fake_with_rng::<String, _>(rng)),
                _ => json!(Paragraph(1..3).fake_with_rng::<String, _>(rng)),
            });
        }
        None
    }

    /// Id value for a non-correlated `id`/`*Id` property.
    ///
    /// The schema-declared type always wins; the implicit scenario heuristic
    /// only applies when the schema is silent, and the guess is logged.
    fn generate_id(&self, prop: &str, schema: &Value, rng: &mut StdRng) -> Value {
        let format = schema.get("format").and_then(Value::as_str);
        match schema.get("type").and_then(Value::as_str) {
            Some("integer") | Some("number") => json!(rng.gen_range(1..=100_000i64)),
            Some("string") if format == Some("uuid") => json!(random_uuid(rng)),
            Some("string") => json!(alphanumeric(rng, 12)),
            Some(_) => json!(alphanumeric(rng, 12)),
            None => {
                warn!("No declared type for id field '{prop}', guessing from scenario");
                match self.scenario {
                    Scenario::Demo => json!(rng.gen_range(1..=1000i64)),
                    _ => json!(random_uuid(rng)),
                }
            }
        }
    }

    /// The requested path-parameter id, coerced to the schema-declared type.
    fn correlated_id(&self, schema: &Value, ctx: &GenerationContext) -> Value {
        let raw = ctx.correlation_id.as_deref().unwrap_or_default();
        let as_integer = || {
            raw.trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(raw.to_string()))
        };

        match schema.get("type").and_then(Value::as_str) {
            Some("integer") | Some("number") => as_integer(),
            Some(_) => Value::String(raw.to_string()),
            // No declared type: fall back to how the client spelled it.
            None if ctx.correlation_id_repr == Some(IdRepr::Numeric) => as_integer(),
            None => Value::String(raw.to_string()),
        }
    }

    fn generate_integer(&self, prop: &str, schema: &Value, rng: &mut StdRng) -> Value {
        let p = prop.to_lowercase();
        let (min, max) = if p.contains("rating") || p.contains("stars") {
            (1, 5)
        } else if p.contains("quantity") || p.contains("count") || p.contains("stock") {
            (1, 100)
        } else if p == "age" {
            (18, 80)
        } else if p == "year" {
            (1990, 2025)
        } else {
            (
                schema.get("minimum").and_then(Value::as_i64).unwrap_or(1),
                schema.get("maximum").and_then(Value::as_i64).unwrap_or(1000),
            )
        };
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        json!(rng.gen_range(min..=max))
    }

    fn generate_number(&self, prop: &str, schema: &Value, rng: &mut StdRng) -> Value {
        let p = prop.to_lowercase();
        let money_like = p.contains("price")
            || p.contains("amount")
            || p.contains("cost")
            || p.contains("total")
            || p.contains("subtotal");
        let (min, max) = if money_like {
            (1.0, 999.0)
        } else {
            (
                schema.get("minimum").and_then(Value::as_f64).unwrap_or(0.0),
                schema.get("maximum").and_then(Value::as_f64).unwrap_or(1000.0),
            )
        };
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        let raw: f64 = rng.gen_range(min..=max);
        json!((raw * 100.0).round() / 100.0)
    }

    fn generate_boolean(&self, prop: &str, rng: &mut StdRng) -> Value {
        if self.scenario == Scenario::Demo {
            return json!(true);
        }
        let p = prop.to_lowercase();
        let flag_like = p.contains("active")
            || p.contains("enabled")
            || p.contains("verified")
            || p.contains("available")
            || p.contains("instock")
            || p.contains("in_stock");
        if flag_like {
            json!(rng.gen_bool(0.8))
        } else {
            json!(rng.gen_bool(0.5))
        }
    }

    fn pick<'a>(&self, options: &'a [&str], rng: &mut StdRng) -> &'a str {
        match self.scenario {
            Scenario::Demo => options[0],
            _ => options[rng.gen_range(0..options.len())],
        }
    }

    fn random_date(&self, rng: &mut StdRng) -> String {
        let days = match self.scenario {
            Scenario::Demo => 30,
            _ => rng.gen_range(0..365),
        };
        (chrono::Utc::now() - chrono::Duration::days(days))
            .format("%Y-%m-%d")
            .to_string()
    }

    fn random_datetime(&self, rng: &mut StdRng) -> String {
        let seconds = match self.scenario {
            Scenario::Demo => 86_400,
            _ => rng.gen_range(0..30 * 86_400),
        };
        (chrono::Utc::now() - chrono::Duration::seconds(seconds)).to_rfc3339()
    }
}

fn is_id_field(prop: &str) -> bool {
    prop == "id" || prop.ends_with("Id") || prop.ends_with("_id")
}

fn is_structured(schema: &Value) -> bool {
    matches!(
        schema.get("type").and_then(Value::as_str),
        Some("object") | Some("array")
    ) || schema.get("properties").is_some()
        || schema.get("items").is_some()
}

/// Item-complexity ceiling: wide item objects get short lists so generated
/// collections stay bounded in memory.
fn complexity_ceiling(items_schema: &Value) -> usize {
    let prop_count = items_schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.len())
        .unwrap_or(0);
    if prop_count > 10 {
        5
    } else if prop_count > 5 {
        25
    } else {
        100
    }
}

/// Minimal object substituted when generation cannot do better.
fn fallback_object(rng: &mut StdRng) -> Value {
    json!({
        "id": random_uuid(rng),
        "name": "fallback",
        "_fallback": true,
    })
}

fn random_uuid(rng: &mut StdRng) -> String {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid().to_string()
}

fn alphanumeric(rng: &mut StdRng, len: usize) -> String {
    (0..len).map(|_| rng.sample(Alphanumeric) as char).collect()
}
