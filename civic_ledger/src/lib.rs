mod config;
pub mod contributions;
pub mod elections;
pub mod fields;
pub mod flat;
pub mod manual;
pub mod records;

pub use crate::config::*;
pub use crate::contributions::summarize_contributions;
pub use crate::elections::summarize_elections;
pub use crate::records::{parse_records, read_rows, Records};
