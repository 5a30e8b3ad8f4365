//! Custom axum extractors.

mod post_id;
mod session;
mod validated_json;

pub use post_id::PostId;
pub use session::Viewer;
pub use validated_json::ValidatedJson;
