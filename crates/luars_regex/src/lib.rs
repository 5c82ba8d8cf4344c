// Regex extension for luars
// Byte-oriented compiled patterns with reusable capture buffers, exposed to Lua
// as `regex.expr`.

#[cfg(test)]
mod test;

pub mod error;
pub mod lua;
pub mod matcher;
pub mod module_info;

pub use error::{MatcherError, MatcherResult};
pub use lua::open_regex;
pub use lua::expr::RegexExpr;
pub use matcher::{Captures, MatcherOptions, PatternMatcher};
pub use module_info::{ModuleInfo, ModuleVersion, query_info};
