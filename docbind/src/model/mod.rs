pub mod attribute;
pub mod instance;
pub mod state;

pub use attribute::*;
pub use instance::*;
pub use state::*;
