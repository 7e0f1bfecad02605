pub mod context;
pub mod contract;
pub mod error;
pub mod scenario;

pub use context::{ContextInferencer, EntityPattern, GenerationContext, IdRepr};
pub use contract::{Contract, Endpoint, HttpMethod};
pub use error::{FieldError, MockError};
pub use scenario::Scenario;
