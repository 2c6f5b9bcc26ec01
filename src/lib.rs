//! SYSDIFF - Semantic diff for system descriptions.
//!
//! This library models a machine's configuration snapshot ("system
//! description") as a generic typed tree of records and collections, compares
//! two such snapshots structurally into only-in-A / only-in-B / changed /
//! common partitions, and filters entries by path-addressed match rules.
//!
//! # Example
//!
//! ```no_run
//! use sysdiff::{compare_scope, format_comparison, OutputFormat, OutputOptions, SystemDescription};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Load two snapshots
//! let a = SystemDescription::load(Path::new("machine_a.json"))?;
//! let b = SystemDescription::load(Path::new("machine_b.json"))?;
//!
//! // Compare one scope
//! let comparison = compare_scope(&a, &b, "packages")?;
//!
//! // Format the output
//! let output = format_comparison(
//!     &comparison,
//!     &OutputFormat::Terminal,
//!     &OutputOptions::default(),
//!     None,
//! )?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod comparison;
pub mod description;
pub mod error;
pub mod filter;
pub mod output;
pub mod record;
pub mod schema;
pub mod scopes;
pub mod value;

// Re-export commonly used types for convenience
pub use collection::Collection;
pub use comparison::{
    compare_scope, compare_values, extract_changed_pairs, Comparison, ScopeComparison,
};
pub use description::SystemDescription;
pub use error::{
    CompareError, FilterError, ModelError, OutputError, ParseError, SysdiffError,
};
pub use filter::{Filter, Matcher};
pub use output::{format_comparison, OutputFormat, OutputOptions};
pub use record::Record;
pub use schema::{
    decode_value, AttributePolicy, AttributeSpec, CollectionSchema, CompareMode, ElementRule,
    ElementType, RecordSchema, RulePredicate,
};
pub use value::{ScopeRef, Value};
