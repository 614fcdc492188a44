//! Purchase order matching: lookup seam, strategy cascade, and line-item
//! validation reports.

mod lookup;
mod matcher;
mod result;
pub mod similarity;

pub use lookup::*;
pub use matcher::*;
pub use result::*;
pub use similarity::{text_similarity, vendor_similarity};
