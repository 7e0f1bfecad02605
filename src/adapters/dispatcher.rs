//! Per-request dispatch: routes contract endpoints to store operations.
//!
//! Each request runs the same state machine: scenario error injection, then
//! body validation, then a method switch keyed by (HTTP method, path-id
//! presence). Every failure mode is converted to a well-formed JSON response
//! at this boundary; nothing escapes to crash the host process.
//!
//! Routes are resolved once at registration time against the closed
//! `HttpMethod` enum; there is no dynamic method lookup per request.

use crate::adapters::mock_generator::MockGenerator;
use crate::adapters::record_store::RecordStore;
use crate::adapters::schema_resolver::{fallback_schema, SchemaResolver};
use crate::adapters::validation::validate_body;
use crate::domain::{
    ContextInferencer, Contract, Endpoint, FieldError, GenerationContext, HttpMethod, MockError,
    Scenario,
};
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Probability of a synthetic failure under the `errors` scenario.
const ERROR_INJECTION_RATE: f64 = 0.3;

pub struct RequestDispatcher {
    scenario: Scenario,
    resolver: SchemaResolver,
    generator: MockGenerator,
    store: RecordStore,
    inferencer: Arc<ContextInferencer>,
    rng: Arc<Mutex<StdRng>>,
}

impl RequestDispatcher {
    /// Build a dispatcher over a contract. A `seed` makes all generated data
    /// reproducible; without one the RNG is seeded from entropy.
    pub fn new(
        contract: &Contract,
        scenario: Scenario,
        seed: Option<u64>,
        inferencer: Arc<ContextInferencer>,
    ) -> Self {
        let resolver = SchemaResolver::new(contract.components.schemas.clone());
        let generator = MockGenerator::new(scenario, resolver.clone(), inferencer.clone());
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            scenario,
            resolver,
            generator,
            store: RecordStore::new(),
            inferencer,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// One route per contract endpoint, method resolved at registration.
    pub fn router(self: &Arc<Self>, contract: &Contract) -> Router {
        let mut router = Router::new();
        for endpoint in &contract.endpoints {
            let path = endpoint.axum_path();
            let ep = Arc::new(endpoint.clone());
            let dispatcher = self.clone();
            let handler = move |params: Option<Path<HashMap<String, String>>>,
                                body: Option<Json<Value>>| {
                let dispatcher = dispatcher.clone();
                let ep = ep.clone();
                async move {
                    let params = params.map(|Path(map)| map).unwrap_or_default();
                    let body = body.map(|Json(value)| value);
                    dispatcher.dispatch(&ep, params, body).await
                }
            };
            let method_router = match endpoint.method {
                HttpMethod::Get => get(handler),
                HttpMethod::Post => post(handler),
                HttpMethod::Put => put(handler),
                HttpMethod::Patch => patch(handler),
                HttpMethod::Delete => delete(handler),
            };
            info!("Mock route {} {}", endpoint.method, endpoint.path);
            router = router.route(&path, method_router);
        }
        router
    }

    /// The per-request state machine.
    pub async fn dispatch(
        &self,
        endpoint: &Endpoint,
        params: HashMap<String, String>,
        body: Option<Value>,
    ) -> Response {
        let ctx = self.inferencer.extract_endpoint_context(endpoint);
        let entity = ctx.entity.clone();
        let id = endpoint
            .path_id_param()
            .and_then(|name| params.get(name))
            .cloned();

        let mut rng = self.rng.lock().await;

        if self.scenario.injects_errors() {
            if let Some(response) = self.inject_error(endpoint, &ctx, &mut rng) {
                return response;
            }
        }

        if let Some(response) = self.validate_request(endpoint, body.as_ref()) {
            return response;
        }

        match (endpoint.method, id) {
            (HttpMethod::Get, Some(id)) => {
                self.get_by_id(endpoint, &ctx, &entity, &id, &mut rng).await
            }
            (HttpMethod::Get, None) => self.get_collection(endpoint, &ctx, &entity, &mut rng).await,
            (HttpMethod::Post, _) => self.create(endpoint, &ctx, &entity, body, &mut rng).await,
            (HttpMethod::Put | HttpMethod::Patch, Some(id)) => {
                self.update(&entity, &id, body).await
            }
            (HttpMethod::Delete, Some(id)) => self.delete_by_id(&entity, &id).await,
            (HttpMethod::Put | HttpMethod::Patch | HttpMethod::Delete, None) => {
                error_response(&MockError::not_found(&entity, ""))
            }
        }
    }

    /// Step 1: scenario-driven synthetic failures. Prefers the endpoint's own
    /// declared error responses; falls back to a pool weighted toward 404.
    fn inject_error(
        &self,
        endpoint: &Endpoint,
        ctx: &GenerationContext,
        rng: &mut StdRng,
    ) -> Option<Response> {
        if !rng.gen_bool(ERROR_INJECTION_RATE) {
            return None;
        }

        let declared = endpoint.error_responses();
        if !declared.is_empty() {
            let (status, spec) = declared[rng.gen_range(0..declared.len())];
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = match spec.schema() {
                Some(schema) => self.generator.generate(schema, ctx, rng),
                None => json!({
                    "message": spec
                        .description
                        .clone()
                        .unwrap_or_else(|| "Injected error".to_string()),
                    "code": "INJECTED_ERROR",
                }),
            };
            return Some(json_response(status, body));
        }

        let roll: f64 = rng.gen();
        let (status, message) = if roll < 0.7 {
            (StatusCode::NOT_FOUND, "Resource not found")
        } else if roll < 0.85 {
            (StatusCode::BAD_REQUEST, "Bad request")
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        };
        Some(json_response(
            status,
            json!({ "message": message, "code": "INJECTED_ERROR" }),
        ))
    }

    /// Step 2: body validation for mutating methods with a required body.
    /// Terminal on failure; the store is untouched.
    fn validate_request(&self, endpoint: &Endpoint, body: Option<&Value>) -> Option<Response> {
        if !endpoint.method.has_request_body() {
            return None;
        }
        let spec = endpoint.request_body.as_ref()?;
        if !spec.required {
            return None;
        }

        let Some(body) = body else {
            return Some(error_response(&MockError::Validation {
                errors: vec![FieldError::new(
                    "body",
                    "Request body is required",
                    "MISSING_BODY",
                )],
            }));
        };

        let schema = spec.schema()?;
        let resolved = self.resolver.resolve(schema);
        let errors = validate_body(&resolved, body);
        if errors.is_empty() {
            None
        } else {
            Some(error_response(&MockError::Validation { errors }))
        }
    }

    async fn get_by_id(
        &self,
        endpoint: &Endpoint,
        ctx: &GenerationContext,
        entity: &str,
        id: &str,
        rng: &mut StdRng,
    ) -> Response {
        if self.store.is_record_deleted(entity, id).await {
            return error_response(&MockError::not_found(entity, id));
        }
        if let Some(record) = self.store.get_record(entity, id).await {
            return json_response(StatusCode::OK, record);
        }

        // Lazy materialization: invent the record the client asked for,
        // correlated to the requested id, and keep it for replay.
        let ctx = ctx.with_correlation_id(id);
        let schema = self.success_schema(endpoint);
        let generated = match self.generate_safe(&schema, &ctx, rng) {
            Ok(value) => value,
            Err(err) => return error_response(&err),
        };
        // Primitive response shapes carry no id field; key them under the
        // requested id so repeat fetches still replay the stored value.
        let stored = if generated.is_object() {
            self.store.store_record(entity, generated).await
        } else {
            self.store.store_value(entity, id, generated).await
        };
        json_response(StatusCode::OK, stored)
    }

    async fn get_collection(
        &self,
        endpoint: &Endpoint,
        ctx: &GenerationContext,
        entity: &str,
        rng: &mut StdRng,
    ) -> Response {
        let schema = self.success_schema(endpoint);
        let generated = match self.generate_safe(&schema, ctx, rng) {
            Ok(value) => value,
            Err(err) => return error_response(&err),
        };

        // Persist everything we hand out so later id-based lookups replay it.
        match generated {
            Value::Array(items) => {
                let mut stored = Vec::with_capacity(items.len());
                for item in items {
                    if item.is_object() {
                        stored.push(self.store.store_record(entity, item).await);
                    } else {
                        stored.push(item);
                    }
                }
                json_response(StatusCode::OK, Value::Array(stored))
            }
            value if value.is_object() => {
                let stored = self.store.store_record(entity, value).await;
                json_response(StatusCode::OK, stored)
            }
            value => json_response(StatusCode::OK, value),
        }
    }

    async fn create(
        &self,
        endpoint: &Endpoint,
        ctx: &GenerationContext,
        entity: &str,
        body: Option<Value>,
        rng: &mut StdRng,
    ) -> Response {
        let schema = self.post_schema(endpoint);
        let resolved = self.resolver.resolve(&schema);

        // Action endpoints whose response is a bare acknowledgment do not
        // create anything worth storing.
        if is_ack_schema(&resolved) {
            return json_response(
                StatusCode::CREATED,
                json!({ "success": true, "message": "Operation completed successfully" }),
            );
        }

        let mut record = match self.generate_safe(&resolved, ctx, rng) {
            Ok(value) => value,
            Err(err) => return error_response(&err),
        };
        if !record.is_object() {
            record = json!({});
        }

        // Request data wins over generated fields.
        if let (Some(target), Some(fields)) = (
            record.as_object_mut(),
            body.as_ref().and_then(Value::as_object),
        ) {
            for (name, value) in fields {
                target.insert(name.clone(), value.clone());
            }
        }

        let stored = self.store.store_record(entity, record).await;
        json_response(StatusCode::CREATED, stored)
    }

    async fn update(&self, entity: &str, id: &str, body: Option<Value>) -> Response {
        if self.store.is_record_deleted(entity, id).await {
            return error_response(&MockError::not_found(entity, id));
        }

        let mut patch = body.unwrap_or_else(|| json!({}));
        if let Some(fields) = patch.as_object_mut() {
            fields.insert(
                "updatedAt".to_string(),
                json!(chrono::Utc::now().to_rfc3339()),
            );
        }

        match self.store.update_record(entity, id, &patch).await {
            Some(updated) => json_response(StatusCode::OK, updated),
            None => error_response(&MockError::not_found(entity, id)),
        }
    }

    async fn delete_by_id(&self, entity: &str, id: &str) -> Response {
        if self.store.delete_record(entity, id).await {
            StatusCode::NO_CONTENT.into_response()
        } else {
            error_response(&MockError::not_found(entity, id))
        }
    }

    /// Generation wrapped so an engine bug becomes a 500, never a crash.
    fn generate_safe(
        &self,
        schema: &Value,
        ctx: &GenerationContext,
        rng: &mut StdRng,
    ) -> Result<Value, MockError> {
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.generator.generate(schema, ctx, rng)
        }))
        .map_err(|_| MockError::Internal("Mock data generation failed".to_string()))
    }

    fn success_schema(&self, endpoint: &Endpoint) -> Value {
        endpoint
            .success_schema()
            .cloned()
            .unwrap_or_else(fallback_schema)
    }

    /// POST prefers the declared 201 shape over other 2xx responses.
    fn post_schema(&self, endpoint: &Endpoint) -> Value {
        endpoint
            .responses
            .get("201")
            .and_then(|spec| spec.schema())
            .cloned()
            .unwrap_or_else(|| self.success_schema(endpoint))
    }
}

/// A response schema that models "operation acknowledged" rather than a
/// stored resource: message-ish fields only, no id.
fn is_ack_schema(schema: &Value) -> bool {
    let Some(props) = schema.get("properties").and_then(Value::as_object) else {
        return false;
    };
    !props.is_empty()
        && !props.contains_key("id")
        && props
            .keys()
            .all(|key| matches!(key.as_str(), "success" | "message" | "status" | "code" | "detail"))
}

fn json_response(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn error_response(err: &MockError) -> Response {
    (err.status_code(), Json(err.to_body())).into_response()
}
