//! Docblock model: parsing comment text into description and pragmas, and
//! rendering it back into a `/** ... */` block.

pub mod pragma;
pub mod render;

pub use pragma::{parse, parse_line, Docblock, Pragma, PragmaLine, PragmaValue};
pub use render::{
    insertion_fix, placeholder_docblock, rewrite_fix, with_placeholder_group,
    DEFAULT_DESCRIPTION, GROUP_PRAGMA, PLACEHOLDER_GROUP,
};
