pub mod builder;
pub mod copyable;
pub mod mapper;

pub use builder::*;
pub use mapper::*;
