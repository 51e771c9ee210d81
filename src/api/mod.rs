pub mod extract;

pub use extract::{parse_filter_id, JsonBody, PathId};
