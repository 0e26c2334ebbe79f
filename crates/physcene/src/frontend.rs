//! Scene frontend trait
//!
//! This module defines the `SceneFrontend` trait that lets any surface
//! syntax target the scene evaluator. A frontend turns source text into a
//! raw parse tree; everything after that is shared.
//!
//! # Architecture
//!
//! ```text
//! Source Code → [Frontend] → RawNode → [normalize] → Node → [eval] → Scene
//! ```
//!
//! Frontends are responsible for:
//! - Parsing source text into a `RawNode` tree using the shared tag vocabulary
//! - Reporting where parsing failed
//!
//! The core is responsible for:
//! - Normalizing the raw tree into the evaluator AST
//! - Evaluating it into entities
//! - Hydrating the entities into an engine world

use std::fmt;

use crate::ast::RawNode;
use crate::error::SceneError;

// ═══════════════════════════════════════════════════════════════════════
// ERROR TYPES
// ═══════════════════════════════════════════════════════════════════════

/// Error that occurred during parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Human-readable error message
    pub message: String,

    /// Optional source location
    pub location: Option<SourceLocation>,
}

impl ParseError {
    /// Create a new parse error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Add location information to the error.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Build an error pointing at the start of `remaining` within `source`.
    ///
    /// `remaining` must be a suffix of `source`, which is what nom hands
    /// back on failure.
    pub fn at_remaining(message: impl Into<String>, source: &str, remaining: &str) -> Self {
        let offset = source.len().saturating_sub(remaining.len());
        Self::new(message).with_location(SourceLocation::from_offset(source, offset))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error: {}", self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}:{}", loc.line, loc.column)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Source code location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,

    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Line and column of a byte offset into `source`.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let consumed = source.get(..offset).unwrap_or(source);
        let line = consumed.matches('\n').count() + 1;
        let column = match consumed.rfind('\n') {
            Some(nl) => consumed[nl + 1..].chars().count() + 1,
            None => consumed.chars().count() + 1,
        };
        Self { line, column }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SCENE FRONTEND TRAIT
// ═══════════════════════════════════════════════════════════════════════

/// Surface-syntax interface for the scene evaluator.
///
/// # Example Implementation
///
/// ```rust
/// use physcene::frontend::{ParseError, SceneFrontend};
/// use physcene::RawNode;
///
/// struct EmptyFrontend;
///
/// impl SceneFrontend for EmptyFrontend {
///     fn parse(&self, _source: &str) -> Result<RawNode, ParseError> {
///         Ok(RawNode::new("composite", vec![]))
///     }
///
///     fn name(&self) -> &str {
///         "empty"
///     }
/// }
///
/// let program = EmptyFrontend.parse_program("").unwrap();
/// assert_eq!(program, physcene::Node::Composite(vec![]));
/// ```
pub trait SceneFrontend: Send + Sync {
    /// Parse source text into a raw parse tree rooted at a `composite`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the source cannot be parsed.
    fn parse(&self, source: &str) -> Result<RawNode, ParseError>;

    /// Return the name of this frontend.
    fn name(&self) -> &str;

    /// Parse and normalize in one step.
    ///
    /// # Errors
    ///
    /// Returns a `SceneError` wrapping either the parse or normalize failure.
    fn parse_program(&self, source: &str) -> Result<crate::ast::Node, SceneError> {
        let raw = self.parse(source)?;
        Ok(crate::normalize::normalize(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_creation() {
        let err = ParseError::new("unexpected token");
        assert_eq!(err.message, "unexpected token");
        assert!(err.location.is_none());
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("unexpected `;`").with_location(SourceLocation::new(3, 7));
        assert_eq!(err.to_string(), "Parse error: unexpected `;` at 3:7");
    }

    #[test]
    fn test_location_from_offset() {
        let source = "a: 1;\nb: 2;\n  c";
        assert_eq!(SourceLocation::from_offset(source, 0), SourceLocation::new(1, 1));
        assert_eq!(SourceLocation::from_offset(source, 6), SourceLocation::new(2, 1));
        assert_eq!(SourceLocation::from_offset(source, 14), SourceLocation::new(3, 3));
    }

    #[test]
    fn test_at_remaining() {
        let source = "a: 1;\n  ?";
        let err = ParseError::at_remaining("bad", source, "?");
        assert_eq!(err.location, Some(SourceLocation::new(2, 3)));
    }
}
