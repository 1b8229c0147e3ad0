//! Repository naming: path normalization, path-pattern templating, the
//! rewrite chain, and the validated [`RepoName`] they produce.

pub mod path;
pub mod pattern;
pub mod repo_name;
pub mod rewrite;

pub use path::*;
pub use pattern::*;
pub use repo_name::*;
pub use rewrite::*;
