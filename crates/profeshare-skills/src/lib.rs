//! Skills normalization for Profeshare.
//!
//! A student profile stores its skills in whatever shape the writer
//! happened to use: a JSON array, a JSON-encoded string (sometimes encoded
//! twice), an object of category → list, or nothing at all. This crate
//! turns any of those into a flat, ordered list of [`SkillName`]s and then
//! groups that list into a fixed [`SkillCategory`] taxonomy.
//!
//! - **Parsing**: [`parse`] never fails. Malformed input degrades to a
//!   single literal skill or an empty list.
//!
//! - **Categorization**: [`categorize`] assigns every skill to exactly one
//!   category using case-insensitive, symmetric substring matching against
//!   static keyword lists. The first matching category wins; anything
//!   unmatched lands in [`SkillCategory::Other`].
//!
//! Both functions are pure and hold no state, so they can be called on
//! every request or render without coordination.
//!
//! # Example
//!
//! ```rust
//! use profeshare_skills::{RawSkillsValue, SkillCategory, categorize, parse};
//!
//! let raw = RawSkillsValue::from(r#"["JavaScript","React","Nmap"]"#);
//! let skills = parse(&raw);
//! assert_eq!(skills.len(), 3);
//!
//! let grouped = categorize(&skills);
//! assert_eq!(grouped.get(SkillCategory::WebTechnologies).unwrap()[0], "React");
//! ```

pub mod categorize;
pub mod parser;
pub mod taxonomy;
pub mod types;

pub use categorize::{CategorizedSkills, SkillEntry, SkillsOverview, annotate, categorize, classify};
pub use parser::parse;
pub use taxonomy::SkillCategory;
pub use types::{RawSkillsValue, SkillName};
