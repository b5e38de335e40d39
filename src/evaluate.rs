use crate::types::{CompiledExpr, Schema};

/// Walk the compiled tree against one record. `AND` and `OR` short-circuit.
///
/// Both sides of every comparison share the field's declared type, so
/// `compare` only yields `None` for NaN floats, which never match.
pub(crate) fn evaluate<T>(expr: &CompiledExpr, schema: &Schema<T>, record: &T) -> bool {
    match expr {
        CompiledExpr::Compare {
            field_index,
            op,
            value,
            ..
        } => schema
            .read(*field_index, record)
            .compare(*op, value)
            .unwrap_or(false),
        CompiledExpr::And(a, b) => evaluate(a, schema, record) && evaluate(b, schema, record),
        CompiledExpr::Or(a, b) => evaluate(a, schema, record) || evaluate(b, schema, record),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::types::{CompareOp, Value};

    struct Point {
        x: i64,
        y: i64,
    }

    fn schema() -> Schema<Point> {
        Schema::builder("Point")
            .field("x", |p: &Point| p.x)
            .field("y", |p: &Point| p.y)
            .build()
    }

    fn cmp(field_index: usize, field: &'static str, op: CompareOp, value: i64) -> CompiledExpr {
        CompiledExpr::Compare {
            field_index,
            field,
            op,
            value: Value::Int(value),
        }
    }

    #[test]
    fn eval_all_compare_ops() {
        let s = schema();
        let p = Point { x: 10, y: 0 };
        let cases = [
            (CompareOp::Eq, 10, true),
            (CompareOp::Gt, 5, true),
            (CompareOp::Gte, 10, true),
            (CompareOp::Gte, 11, false),
            (CompareOp::Lt, 20, true),
            (CompareOp::Lte, 10, true),
            (CompareOp::Lte, 9, false),
        ];
        for (op, value, expected) in cases {
            assert_eq!(
                evaluate(&cmp(0, "x", op, value), &s, &p),
                expected,
                "x {op} {value}"
            );
        }
    }

    #[test]
    fn eval_and_or() {
        let s = schema();
        let p = Point { x: 1, y: 2 };
        let both = cmp(0, "x", CompareOp::Eq, 1).and(cmp(1, "y", CompareOp::Eq, 2));
        assert!(evaluate(&both, &s, &p));
        let one = cmp(0, "x", CompareOp::Eq, 1).and(cmp(1, "y", CompareOp::Eq, 3));
        assert!(!evaluate(&one, &s, &p));
        let either = cmp(0, "x", CompareOp::Eq, 9).or(cmp(1, "y", CompareOp::Eq, 2));
        assert!(evaluate(&either, &s, &p));
    }

    #[test]
    fn or_short_circuits() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reads);
        let s: Schema<Point> = Schema::builder("Point")
            .field("x", |p: &Point| p.x)
            .field("y", move |p: &Point| {
                counter.fetch_add(1, Ordering::SeqCst);
                p.y
            })
            .build();
        let expr = cmp(0, "x", CompareOp::Eq, 1).or(cmp(1, "y", CompareOp::Eq, 2));
        assert!(evaluate(&expr, &s, &Point { x: 1, y: 0 }));
        assert_eq!(reads.load(Ordering::SeqCst), 0);
    }
}
