//! Docgroup - Test Group Linter
//!
//! Checks that every JavaScript/TypeScript test file declares the runner
//! groups it belongs to in a leading docblock, and that each declared group
//! is one of the names a project allows.
//!
//! # Architecture
//!
//! ```text
//! CLI/API -> Engine -> FileFilter -> SourceFile -> LintRule -> Diagnostic
//! ```
//!
//! The engine loads configuration and the group vocabulary once per run,
//! scans each eligible file for its leading comments and runs the two rules
//! over them:
//!
//! - `top-level` requires a docblock with at least one `@group` tag and
//!   offers a fix that inserts or rewrites one.
//! - `must-match` validates every `@group` value against the vocabulary.
//!
//! ```javascript
//! /**
//!  * Checkout flow tests.
//!  *
//!  * @group Fast
//!  * @group Payments
//!  */
//! describe("checkout", () => {});
//! ```
//!
//! The vocabulary lives in a JSON manifest, by default the `squadGroups`
//! property of `package.json`:
//!
//! ```json
//! { "squadGroups": ["Fast", "Slow", "Payments"] }
//! ```

pub mod config;
pub mod diagnostic;
pub mod discover;
pub mod docblock;
pub mod engine;
pub mod filter;
pub mod fixer;
pub mod locate;
pub mod output;
pub mod rule;
pub mod rules;
pub mod selector;
pub mod source;
pub mod suggest;
pub mod validator;
pub mod vocabulary;

// Re-export main types
pub use config::Config;
pub use diagnostic::{Diagnostic, Fix, Location, MessageId, Position, Severity};
pub use engine::{Engine, LintResult};
pub use filter::FileFilter;
pub use fixer::{apply_fixes, FixMode, FixResult, Fixer};
pub use output::OutputFormatter;
pub use rule::{Rule, RuleCategory};
pub use rules::{LintRule, RuleContext};
pub use source::SourceFile;
pub use validator::{validate, Verdict};
pub use vocabulary::{AllowedVocabulary, VocabularyCache};
