//! Custom request extractors.

mod path;
mod validated_json;

pub use path::PathParams;
pub use validated_json::ValidatedJson;
