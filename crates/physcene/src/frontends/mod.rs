//! Reference frontends
//!
//! Both produce the same `RawNode` vocabulary, so a program written in
//! either spelling normalizes to the same AST.

pub mod sexp;
pub mod text;

pub use sexp::SexpFrontend;
pub use text::TextFrontend;
