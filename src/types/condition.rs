use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison operator of a single [`Condition`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    Equals,
    GreaterThan,
    LessThan,
    GreaterThanOrEqualTo,
    LessThanOrEqualTo,
    In,
    Between,
}

impl Operator {
    /// Whether the operator needs an ordering on the field type.
    #[must_use]
    pub fn is_ordering(self) -> bool {
        !matches!(self, Operator::Equals | Operator::In)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::Equals => "Equals",
            Operator::GreaterThan => "GreaterThan",
            Operator::LessThan => "LessThan",
            Operator::GreaterThanOrEqualTo => "GreaterThanOrEqualTo",
            Operator::LessThanOrEqualTo => "LessThanOrEqualTo",
            Operator::In => "In",
            Operator::Between => "Between",
        };
        f.write_str(name)
    }
}

/// Connector joining a condition to everything folded before it.
///
/// `Or` is the default, matching the zero value of the connector in rule data
/// that omits it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[default]
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "AND")]
    And,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::Or => f.write_str("OR"),
            LogicalOperator::And => f.write_str("AND"),
        }
    }
}

/// One declarative comparison rule.
///
/// Plain data: the compiler only reads it. Field names follow the camelCase
/// layout used by stored rule sets, so a list of conditions can be loaded
/// straight from JSON.
///
/// # Example
///
/// ```
/// use predicata::{Condition, Operator};
///
/// let rule = Condition::new("Balance", Operator::GreaterThan)
///     .value("100")
///     .data_type("decimal")
///     .and();
/// assert_eq!(rule.property_name, "Balance");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Condition {
    pub id: Option<u32>,
    pub property_name: String,
    pub operator: Operator,
    pub value: Option<String>,
    pub values: Vec<String>,
    pub min_value: Option<String>,
    pub max_value: Option<String>,
    /// Nominal type tag. Informational only; the field's declared type wins.
    pub data_type: Option<String>,
    pub logical_operator: LogicalOperator,
    pub parent_id: Option<u32>,
    pub additional_conditions: Vec<Condition>,
}

impl Condition {
    #[must_use]
    pub fn new(property_name: &str, operator: Operator) -> Self {
        Self {
            property_name: property_name.to_owned(),
            operator,
            ..Self::default()
        }
    }

    /// A bounds-only condition. Bounds take precedence over the operator, so
    /// this is range-checked whatever operator it carries.
    #[must_use]
    pub fn between(property_name: &str, min: &str, max: &str) -> Self {
        Self::new(property_name, Operator::Between).min(min).max(max)
    }

    #[must_use]
    pub fn id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_owned());
        self
    }

    #[must_use]
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn min(mut self, min: &str) -> Self {
        self.min_value = Some(min.to_owned());
        self
    }

    #[must_use]
    pub fn max(mut self, max: &str) -> Self {
        self.max_value = Some(max.to_owned());
        self
    }

    #[must_use]
    pub fn data_type(mut self, data_type: &str) -> Self {
        self.data_type = Some(data_type.to_owned());
        self
    }

    /// Join this condition to the accumulated result with AND.
    #[must_use]
    pub fn and(mut self) -> Self {
        self.logical_operator = LogicalOperator::And;
        self
    }

    /// Join this condition to the accumulated result with OR.
    #[must_use]
    pub fn or(mut self) -> Self {
        self.logical_operator = LogicalOperator::Or;
        self
    }

    #[must_use]
    pub fn parent(mut self, parent_id: u32) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Attach a nested condition. Nested conditions are always AND-ed onto
    /// this one, whatever their own connector says.
    #[must_use]
    pub fn with(mut self, nested: Condition) -> Self {
        self.additional_conditions.push(nested);
        self
    }
}
