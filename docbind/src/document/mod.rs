pub mod document;
pub mod model_id;

pub use document::*;
pub use model_id::*;
