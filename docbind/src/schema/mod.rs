pub mod model_type;
pub mod registry;

pub use model_type::*;
pub use registry::*;
