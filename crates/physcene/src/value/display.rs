//! Display implementation for Value

use std::fmt;

use super::*;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Vector(p) => write!(f, "[{}, {}]", p.x, p.y),

            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }

            Value::Body(b) => match &b.label {
                Some(label) => write!(f, "<{} {} {}>", b.shape, label, b.id),
                None => write!(f, "<{} {}>", b.shape, b.id),
            },

            Value::Constraint(c) => write!(f, "<{} {} {}>", c.from, c.kind, c.to),

            Value::Composite(c) => {
                let name = c.label.as_deref().unwrap_or("composite");
                write!(
                    f,
                    "<{} {}: {} bodies, {} constraints>",
                    name,
                    c.id,
                    c.bodies.len(),
                    c.constraints.len()
                )
            }

            Value::Closure(c) => write!(f, "<fn({})>", c.params.join(", ")),
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::string("red").to_string(), "red");
        assert_eq!(Value::vector(1.0, 2.0).to_string(), "[1, 2]");
        assert_eq!(
            Value::list(vec![Value::Number(1.0), Value::Unit]).to_string(),
            "[1, ()]"
        );
    }

    #[test]
    fn test_display_labelled_body() {
        let body = Body {
            id: EntityId(4),
            shape: Shape::Circle,
            params: IndexMap::new(),
            props: IndexMap::new(),
            label: Some("ball".to_string()),
        };
        assert_eq!(Value::from(body).to_string(), "<circle ball #4>");
    }
}
