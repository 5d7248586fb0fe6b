//! Engine crate for `argwise`.
//! See the `argwise` documentation root for full details.
#![deny(missing_docs)]
mod api;
mod error;
mod filter;
mod help;
mod model;
mod plugin;
mod rule;
mod tokens;
mod validator;
pub mod prelude;

pub use api::*;
pub use error::*;
pub use filter::*;
pub use help::{ConsoleInterface, Printer};
pub use model::*;
pub use plugin::{Factories, FilterFactory, Node, RuleFactory};
pub use rule::*;
pub use tokens::{split_line, tokenize, tokenize_line, END_OF_OPTIONS};
pub use validator::{FieldKind, Validator};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
