pub mod editor;
pub mod errors;
pub mod locator;
pub mod query;
pub mod rewriter;

pub use editor::{YamlEditor, YamlPlan};
pub use errors::YamlError;
pub use locator::{locate, MatchResult};
pub use query::KeyPath;
pub use rewriter::{plan_rewrite, quote_value, rewrite};
