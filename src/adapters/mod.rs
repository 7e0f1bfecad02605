pub mod dispatcher;
pub mod health_handler;
pub mod mock_generator;
pub mod record_store;
pub mod schema_resolver;
pub mod validation;

#[cfg(test)]
mod record_store_test;
