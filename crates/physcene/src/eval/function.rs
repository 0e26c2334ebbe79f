//! Function literal evaluation

use std::sync::Arc;

use crate::ast::FnDef;
use crate::value::{Closure, Value};
use crate::Environment;

/// Create a closure from a `fn` node.
///
/// Closures are values, never accumulated as entities.
pub fn eval_fn(def: &FnDef, env: Environment) -> (Environment, Value) {
    let closure = Closure::new(def, Arc::clone(env.labels()));
    (env, Value::Closure(Arc::new(closure)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;

    #[test]
    fn test_eval_fn_captures_labels() {
        let env = Environment::new().define("k", Value::Number(2.0));
        let def = match Node::function(vec!["x"], Node::symbol("x")) {
            Node::Fn(def) => def,
            _ => unreachable!(),
        };

        let (env, value) = eval_fn(&def, env);
        match value {
            Value::Closure(c) => {
                assert_eq!(c.params, vec!["x"]);
                assert_eq!(c.captured.get("k"), Some(&Value::Number(2.0)));
            }
            other => panic!("expected closure, got {:?}", other),
        }
        assert_eq!(env.entity_count(), 0);
    }
}
