//! # physcene
//!
//! A tree-walking evaluator for a small declarative physics-scene language.
//!
//! Programs describe rigid bodies, the constraints between them, groups of
//! both, and reusable functions that stamp out more of each. Evaluation
//! produces a [`Scene`]; hydration turns a scene into a live world inside a
//! physics [`Engine`](hydrate::Engine).
//!
//! ## Architecture
//!
//! - **Frontend**: parse source text into a [`RawNode`] tree
//! - **Normalizer**: rewrite the raw tree into the closed [`Node`] AST
//! - **Evaluator**: walk the AST, threading an [`Environment`] that
//!   accumulates entities
//! - **Hydrator**: create engine bodies first, then constraints
//! - **Lifecycle**: a [`WorldHandle`](hydrate::WorldHandle) owns each live world
//!
//! ## Example
//!
//! ```
//! use physcene::frontends::TextFrontend;
//! use physcene::hydrate::{HydrateOptions, SceneWorld, WorldHandle};
//! use physcene::{eval_program, EvalContext, SceneFrontend};
//!
//! let program = TextFrontend::new()
//!     .parse_program("a: rectangle 0 0 10 10; b: rectangle 50 0 10 10; a -- b;")
//!     .unwrap();
//! let scene = eval_program(&program, &EvalContext::new()).unwrap();
//!
//! let world = WorldHandle::start(SceneWorld::new(), &scene, HydrateOptions::default()).unwrap();
//! assert_eq!(world.engine().bodies().len(), 2);
//! assert_eq!(world.engine().constraints()[0].spec.stiffness, 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod config;
pub mod context;
pub mod environment;
pub mod error;
pub mod eval;
pub mod frontend;
pub mod frontends;
pub mod hydrate;
pub mod normalize;
pub mod value;

// Re-export main types
pub use ast::{Attr, EdgeKind, FnDef, Node, RawNode};
pub use config::SceneConfig;
pub use context::{EvalContext, LabelPolicy};
pub use environment::{builtin, builtin_names, Environment};
pub use error::{EvalError, HydrateError, NormalizeError, Result, SceneError};
pub use eval::{eval_program, eval_program_in, EvalResult, Evaluate};
pub use frontend::{ParseError, SceneFrontend, SourceLocation};
pub use hydrate::{EndpointPolicy, HydrateOptions, Hydrator};
pub use normalize::normalize;
pub use value::{
    Body, BuiltinFn, BuiltinFnPtr, Closure, Composite, Constraint, Endpoint, EntityId, Labels,
    Point, Scene, Shape, Transform, Value,
};

/// physcene version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
