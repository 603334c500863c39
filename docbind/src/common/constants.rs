// doc constants
pub const DOC_ID: &str = "_id";
pub const DEFAULT_DISCRIMINATOR_KEY: &str = "_type";
pub const RESERVED_FIELDS: [&str; 1] = [DOC_ID];

// locale constants
pub const DEFAULT_LOCALE: &str = "en";

pub const DOCBIND_VERSION: &str = env!("CARGO_PKG_VERSION");
