//! # SQL Review Library
//!
//! Static risk review for MySQL, PostgreSQL and MongoDB change scripts.
//!
//! The analysis core ([`segment`], [`terminator`], [`rules`], [`report`]) is
//! a pure, synchronous function of the script, the engine and the disabled
//! rule set. It never fails: every problem with a script is reported as an
//! issue. The remaining modules make up the command-line front end.
//!
//! ```
//! let analysis = sql_review::rules::analyze("mysql", "UPDATE users SET active = 0", ["select_star"]);
//! let codes: Vec<_> = analysis.result.issues.iter().map(|i| i.rule_code).collect();
//! assert!(codes.contains(&"update_without_where"));
//! assert!(codes.contains(&"missing_statement_terminator"));
//! ```
//!
//! # Modules
//!
//! - [`engine`] - engine selector and alias normalization
//! - [`segment`] - statement segmentation for SQL and Mongo scripts
//! - [`terminator`] - missing and full-width terminator detection
//! - [`rules`] - rule catalogs, evaluators and the [`rules::Analyzer`]
//! - [`report`] - summary counts, ordering and advice
//! - [`config`] - configuration loading
//! - [`output`] - text, JSON and YAML rendering
//! - [`app`] - command implementations
//! - [`error`] - error types and constructors

pub mod app;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod report;
pub mod rules;
pub mod segment;
pub mod terminator;
