pub mod constants;
pub mod locale;
pub mod type_utils;
pub mod value;

pub use constants::*;
pub use locale::*;
pub use type_utils::*;
pub use value::*;
