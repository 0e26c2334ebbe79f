//! Raw parse trees and the normalized scene AST
//!
//! Frontends produce [`RawNode`] trees using a fixed tag vocabulary. The
//! normalizer rewrites them into [`Node`], the closed sum type the evaluator
//! matches over.

use std::fmt;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════
// Raw Parse Tree
// ═══════════════════════════════════════════════════════════════════════

/// A node of the raw parse tree produced by a frontend.
///
/// Terminal nodes (`symbol`, `number`, `string`) carry their token in
/// `text`; every other node carries ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNode {
    /// Grammar rule tag (e.g. `"body"`, `"constraint"`, `"symbol"`)
    pub tag: String,

    /// Token text for terminals
    pub text: Option<String>,

    /// Ordered children
    pub children: Vec<RawNode>,
}

impl RawNode {
    /// Create a non-terminal node.
    pub fn new(tag: impl Into<String>, children: Vec<RawNode>) -> Self {
        Self {
            tag: tag.into(),
            text: None,
            children,
        }
    }

    /// Create a terminal node carrying token text.
    pub fn leaf(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    /// Shorthand for a `symbol` terminal.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::leaf("symbol", name)
    }

    /// Shorthand for a `number` terminal.
    pub fn number(text: impl Into<String>) -> Self {
        Self::leaf("number", text)
    }

    /// Shorthand for a `string` terminal.
    pub fn string(text: impl Into<String>) -> Self {
        Self::leaf("string", text)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Normalized AST
// ═══════════════════════════════════════════════════════════════════════

/// The kind of edge a constraint forms between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Stiff link that keeps its initial length
    Rigid,
    /// Soft, low-stiffness link
    Spring,
    /// Zero-length link pinning two points together
    Pin,
    /// Damped, slack link
    Rope,
}

impl EdgeKind {
    /// Parse an edge-kind tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "rigid" => Some(EdgeKind::Rigid),
            "spring" => Some(EdgeKind::Spring),
            "pin" => Some(EdgeKind::Pin),
            "rope" => Some(EdgeKind::Rope),
            _ => None,
        }
    }

    /// The tag this kind is spelled with in raw parse trees.
    pub fn tag(&self) -> &'static str {
        match self {
            EdgeKind::Rigid => "rigid",
            EdgeKind::Spring => "spring",
            EdgeKind::Pin => "pin",
            EdgeKind::Rope => "rope",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A `key value` attribute attached to a body, constraint, or scope.
///
/// Flags normalize to attributes whose value is `Node::Bool(true)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    /// Attribute name
    pub key: String,

    /// Unevaluated attribute value
    pub value: Node,
}

impl Attr {
    /// Create an attribute pair.
    pub fn new(key: impl Into<String>, value: Node) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Create a flag attribute.
    pub fn flag(key: impl Into<String>) -> Self {
        Self::new(key, Node::Bool(true))
    }
}

/// A function literal: parameter names plus a body expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FnDef {
    /// Parameter names in declaration order
    pub params: Vec<String>,

    /// The function body
    pub body: Arc<Node>,
}

/// A normalized scene AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Sequence of statements; the program itself is the root composite
    Composite(Vec<Node>),

    /// Body construction: shape name, positional arguments, attributes
    Body {
        /// Shape name, checked against the signature table at evaluation
        shape: String,
        /// Positional shape parameters
        args: Vec<Node>,
        /// Physical and rendering properties
        attrs: Vec<Attr>,
    },

    /// Edge between two entity references
    Constraint {
        /// First endpoint
        from: Box<Node>,
        /// Edge kind
        kind: EdgeKind,
        /// Second endpoint
        to: Box<Node>,
        /// Override attributes
        attrs: Vec<Attr>,
    },

    /// Isolated block whose entities are grouped into a nested composite
    Scope {
        /// Block contents
        body: Box<Node>,
        /// Placement and grouping attributes
        attrs: Vec<Attr>,
    },

    /// `name: value`
    Label {
        /// Declared name
        name: String,
        /// Labelled expression
        value: Box<Node>,
    },

    /// Function literal
    Fn(FnDef),

    /// Call by name
    Call {
        /// Callee name
        callee: String,
        /// Unevaluated arguments
        args: Vec<Node>,
    },

    /// Two-element point literal
    Vector(Box<Node>, Box<Node>),

    /// Bare identifier
    Symbol(String),

    /// Numeric literal
    Number(f64),

    /// String literal
    Str(String),

    /// Boolean literal (flags)
    Bool(bool),
}

impl Node {
    /// Human-readable kind name, used in diagnostics and trace output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Composite(_) => "composite",
            Node::Body { .. } => "body",
            Node::Constraint { .. } => "constraint",
            Node::Scope { .. } => "scope",
            Node::Label { .. } => "label",
            Node::Fn(_) => "fn",
            Node::Call { .. } => "call",
            Node::Vector(..) => "vector",
            Node::Symbol(_) => "symbol",
            Node::Number(_) => "number",
            Node::Str(_) => "string",
            Node::Bool(_) => "bool",
        }
    }

    /// Shorthand for a symbol node.
    pub fn symbol(name: impl Into<String>) -> Self {
        Node::Symbol(name.into())
    }

    /// Shorthand for a string node.
    pub fn string(text: impl Into<String>) -> Self {
        Node::Str(text.into())
    }

    /// Shorthand for a body node without attributes.
    pub fn body(shape: impl Into<String>, args: Vec<Node>) -> Self {
        Node::Body {
            shape: shape.into(),
            args,
            attrs: Vec::new(),
        }
    }

    /// Shorthand for a call node.
    pub fn call(callee: impl Into<String>, args: Vec<Node>) -> Self {
        Node::Call {
            callee: callee.into(),
            args,
        }
    }

    /// Shorthand for a label node.
    pub fn label(name: impl Into<String>, value: Node) -> Self {
        Node::Label {
            name: name.into(),
            value: Box::new(value),
        }
    }

    /// Shorthand for a function literal.
    pub fn function(params: Vec<&str>, body: Node) -> Self {
        Node::Fn(FnDef {
            params: params.into_iter().map(String::from).collect(),
            body: Arc::new(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_kind_tags_round_trip() {
        for kind in [EdgeKind::Rigid, EdgeKind::Spring, EdgeKind::Pin, EdgeKind::Rope] {
            assert_eq!(EdgeKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(EdgeKind::from_tag("glue"), None);
    }

    #[test]
    fn test_raw_leaf_carries_text() {
        let node = RawNode::number("4.5");
        assert_eq!(node.tag, "number");
        assert_eq!(node.text.as_deref(), Some("4.5"));
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(Node::body("circle", vec![]).kind_name(), "body");
        assert_eq!(Node::Number(1.0).kind_name(), "number");
    }
}
