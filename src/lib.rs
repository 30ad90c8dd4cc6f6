//! Scan Go sources for unused function parameters.

mod binding;
mod check;
mod closure;
mod collector;
mod error;
mod files;
pub mod lexer;
pub mod parser;
mod parser_tests;
pub mod report;
mod resolve;
mod resolve_tests;
mod scope;
mod signature;
pub mod syntax;
mod unused;
mod unused_tests;
mod walker;

pub use binding::{Binding, BindingId, BindingKind};
pub use check::{check_file, check_source, check_unused_params, FileReport, Outcome};
pub use error::Error;
pub use files::go_files;
pub use resolve::Resolution;
pub use scope::Scope;
pub use unused::{Settings, UnusedParam};
