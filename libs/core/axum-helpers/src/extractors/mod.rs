//! Custom extractors for Axum handlers.
//!
//! Both extractors deserialize and then run `validator` rules, so handlers only
//! ever see input that passed field-level validation.

pub mod validated_json;
pub mod validated_query;

pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;
