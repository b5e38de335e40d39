use tracing::trace;

use crate::coerce::coerce;
use crate::types::{
    CoercionError, CompareOp, CompileError, CompiledExpr, Condition, FieldType, LogicalOperator,
    Operator, Predicate, Schema, ValidationError, Value,
};

/// Translate an ordered condition list into one predicate.
///
/// Conditions fold left to right over the running accumulator, so
/// `[a, b OR, c AND]` becomes `((a OR b) AND c)`. The first condition's
/// connector is never consulted.
pub(crate) fn compile<T>(
    schema: &Schema<T>,
    conditions: &[Condition],
    date_formats: &[String],
) -> Result<Predicate<T>, CompileError> {
    let translator = Translator {
        schema,
        date_formats,
    };

    let mut acc: Option<CompiledExpr> = None;
    for (i, condition) in conditions.iter().enumerate() {
        let expr = translator.condition(condition, &format!("[{i}]"))?;
        acc = Some(match acc {
            None => expr,
            Some(prev) => match condition.logical_operator {
                LogicalOperator::And => prev.and(expr),
                LogicalOperator::Or => prev.or(expr),
            },
        });
    }

    let expr = acc.ok_or(ValidationError::EmptyConditions)?;
    Ok(Predicate::new(schema.clone(), expr))
}

struct Translator<'a, T> {
    schema: &'a Schema<T>,
    date_formats: &'a [String],
}

/// A condition's target field, resolved against the schema.
struct Target<'c> {
    index: usize,
    name: &'static str,
    field_type: FieldType,
    position: &'c str,
}

impl<T> Translator<'_, T> {
    /// The condition's own comparison with every nested condition AND-ed on,
    /// left to right, whatever connector the nested ones carry.
    fn condition(&self, condition: &Condition, position: &str) -> Result<CompiledExpr, CompileError> {
        let own = self.comparison(condition, position)?;
        condition
            .additional_conditions
            .iter()
            .enumerate()
            .try_fold(own, |acc, (i, nested)| -> Result<CompiledExpr, CompileError> {
                let nested_position = format!("{position}.additional[{i}]");
                Ok(acc.and(self.condition(nested, &nested_position)?))
            })
    }

    fn comparison(&self, condition: &Condition, position: &str) -> Result<CompiledExpr, CompileError> {
        let target = self.resolve(condition, position)?;
        trace!(
            position,
            field = target.name,
            operator = %condition.operator,
            "translating condition"
        );

        let value = self.coerce(&target, condition.value.as_deref())?;
        let min = self.coerce(&target, condition.min_value.as_deref())?;
        let max = self.coerce(&target, condition.max_value.as_deref())?;

        // Bounds win over the declared operator.
        if min.is_some() || max.is_some() {
            require_ordered(&target, "range bounds")?;
        }
        match (min, max) {
            (Some(lo), Some(hi)) => {
                let lower = compare(&target, CompareOp::Gte, lo);
                return Ok(lower.and(compare(&target, CompareOp::Lte, hi)));
            }
            (Some(lo), None) => return Ok(compare(&target, CompareOp::Gte, lo)),
            (None, Some(hi)) => return Ok(compare(&target, CompareOp::Lte, hi)),
            (None, None) => {}
        }

        let op = match condition.operator {
            Operator::Equals => CompareOp::Eq,
            Operator::GreaterThan => CompareOp::Gt,
            Operator::LessThan => CompareOp::Lt,
            Operator::GreaterThanOrEqualTo => CompareOp::Gte,
            Operator::LessThanOrEqualTo => CompareOp::Lte,
            Operator::In => return self.any_of(&target, &condition.values),
            Operator::Between => {
                require_ordered(&target, "Between")?;
                return Err(missing_operand(&target, Operator::Between));
            }
        };
        if condition.operator.is_ordering() {
            require_ordered(&target, &condition.operator.to_string())?;
        }
        let value = value.ok_or_else(|| missing_operand(&target, condition.operator))?;
        Ok(compare(&target, op, value))
    }

    /// `In`: one equality per candidate, OR-ed in order.
    fn any_of(&self, target: &Target<'_>, values: &[String]) -> Result<CompiledExpr, CompileError> {
        let mut acc: Option<CompiledExpr> = None;
        for raw in values {
            let Some(value) = self.coerce(target, Some(raw))? else {
                continue;
            };
            let eq = compare(target, CompareOp::Eq, value);
            acc = Some(match acc {
                None => eq,
                Some(prev) => prev.or(eq),
            });
        }
        acc.ok_or_else(|| {
            ValidationError::EmptyInValues {
                field: target.name.to_owned(),
                position: target.position.to_owned(),
            }
            .into()
        })
    }

    fn resolve<'c>(&self, condition: &Condition, position: &'c str) -> Result<Target<'c>, CompileError> {
        if condition.property_name.is_empty() {
            return Err(ValidationError::EmptyPropertyName {
                position: position.to_owned(),
            }
            .into());
        }
        let (index, name, field_type) = self
            .schema
            .resolve(&condition.property_name)
            .ok_or_else(|| ValidationError::UnknownField {
                field: condition.property_name.clone(),
                record: self.schema.name().to_owned(),
                position: position.to_owned(),
            })?;
        Ok(Target {
            index,
            name,
            field_type,
            position,
        })
    }

    fn coerce(&self, target: &Target<'_>, raw: Option<&str>) -> Result<Option<Value>, CompileError> {
        coerce(raw, target.field_type, self.date_formats).map_err(|source| {
            CompileError::from(CoercionError {
                field: target.name.to_owned(),
                raw: raw.unwrap_or_default().to_owned(),
                target: target.field_type.name().to_owned(),
                position: target.position.to_owned(),
                source,
            })
        })
    }
}

fn compare(target: &Target<'_>, op: CompareOp, value: Value) -> CompiledExpr {
    CompiledExpr::Compare {
        field_index: target.index,
        field: target.name,
        op,
        value,
    }
}

fn require_ordered(target: &Target<'_>, operator: &str) -> Result<(), CompileError> {
    if target.field_type.is_ordered() {
        return Ok(());
    }
    Err(ValidationError::UnsupportedOperator {
        field: target.name.to_owned(),
        operator: operator.to_owned(),
        field_type: target.field_type.name().to_owned(),
        position: target.position.to_owned(),
    }
    .into())
}

fn missing_operand(target: &Target<'_>, operator: Operator) -> CompileError {
    ValidationError::MissingOperand {
        field: target.name.to_owned(),
        operator,
        position: target.position.to_owned(),
    }
    .into()
}
