use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::types::{FieldType, OperandError, Value};

/// Convert a textual operand to the field's declared type.
///
/// An absent or empty operand is "no value", not an error. Surrounding
/// whitespace is ignored for every type except text.
pub(crate) fn coerce(
    raw: Option<&str>,
    field_type: FieldType,
    date_formats: &[String],
) -> Result<Option<Value>, OperandError> {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    let trimmed = raw.trim();

    let value = match field_type {
        FieldType::Text => Value::Text(raw.to_owned()),
        FieldType::Int => Value::Int(trimmed.parse()?),
        FieldType::Float => Value::Float(trimmed.parse()?),
        FieldType::Decimal => Value::Decimal(Decimal::from_str(trimmed)?),
        FieldType::Bool => Value::Bool(parse_bool(trimmed)?),
        FieldType::DateTime => Value::DateTime(parse_datetime(trimmed, date_formats)?),
        FieldType::Enum(e) => {
            let member = e
                .members
                .iter()
                .find(|m| **m == trimmed)
                .ok_or(OperandError::EnumMember {
                    name: e.name,
                    members: e.members,
                })?;
            Value::Enum(*member)
        }
    };
    Ok(Some(value))
}

fn parse_bool(s: &str) -> Result<bool, OperandError> {
    if s.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if s.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(OperandError::Bool)
    }
}

/// RFC 3339 first (converted to UTC), then each configured format as a
/// date-time and, failing that, as a date at midnight.
fn parse_datetime(s: &str, formats: &[String]) -> Result<NaiveDateTime, OperandError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }
    let mut tried = vec!["RFC 3339".to_owned()];
    tried.extend(formats.iter().cloned());
    Err(OperandError::DateTime { formats: tried })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DEFAULT_DATE_FORMATS, EnumType};

    fn formats() -> Vec<String> {
        DEFAULT_DATE_FORMATS.iter().map(|f| (*f).to_owned()).collect()
    }

    fn midnight(y: i32, m: u32, d: u32) -> Value {
        Value::from(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    const ACCOUNT_TYPE: FieldType = FieldType::Enum(EnumType {
        name: "AccountType",
        members: &["Savings", "Checking"],
    });

    #[test]
    fn absent_and_empty_are_no_value() {
        assert_eq!(coerce(None, FieldType::Int, &formats()).unwrap(), None);
        assert_eq!(coerce(Some(""), FieldType::Decimal, &formats()).unwrap(), None);
    }

    #[test]
    fn numbers() {
        assert_eq!(
            coerce(Some(" 42 "), FieldType::Int, &formats()).unwrap(),
            Some(Value::Int(42))
        );
        assert_eq!(
            coerce(Some("3.25"), FieldType::Float, &formats()).unwrap(),
            Some(Value::Float(3.25))
        );
        assert_eq!(
            coerce(Some("100.50"), FieldType::Decimal, &formats()).unwrap(),
            Some(Value::Decimal(Decimal::new(10050, 2)))
        );
    }

    #[test]
    fn non_numeric_text_fails() {
        let err = coerce(Some("notanumber"), FieldType::Int, &formats()).unwrap_err();
        assert!(matches!(err, OperandError::Int(_)));
        let err = coerce(Some("notanumber"), FieldType::Decimal, &formats()).unwrap_err();
        assert!(matches!(err, OperandError::Decimal(_)));
    }

    #[test]
    fn bools_ignore_ascii_case() {
        assert_eq!(
            coerce(Some("True"), FieldType::Bool, &formats()).unwrap(),
            Some(Value::Bool(true))
        );
        assert_eq!(
            coerce(Some("FALSE"), FieldType::Bool, &formats()).unwrap(),
            Some(Value::Bool(false))
        );
        assert!(matches!(
            coerce(Some("yes"), FieldType::Bool, &formats()),
            Err(OperandError::Bool)
        ));
    }

    #[test]
    fn iso_and_us_dates() {
        assert_eq!(
            coerce(Some("2023-05-28"), FieldType::DateTime, &formats()).unwrap(),
            Some(midnight(2023, 5, 28))
        );
        assert_eq!(
            coerce(Some("5/28/2023"), FieldType::DateTime, &formats()).unwrap(),
            Some(midnight(2023, 5, 28))
        );
        assert_eq!(
            coerce(Some("11/28/2023"), FieldType::DateTime, &formats()).unwrap(),
            Some(midnight(2023, 11, 28))
        );
    }

    #[test]
    fn date_times() {
        let expected = NaiveDate::from_ymd_opt(2023, 5, 28)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(
            coerce(Some("2023-05-28T14:30:00"), FieldType::DateTime, &formats()).unwrap(),
            Some(Value::DateTime(expected))
        );
        assert_eq!(
            coerce(Some("2023-05-28T16:30:00+02:00"), FieldType::DateTime, &formats()).unwrap(),
            Some(Value::DateTime(expected))
        );
    }

    #[test]
    fn bad_date_lists_formats() {
        match coerce(Some("28th of May"), FieldType::DateTime, &formats()) {
            Err(OperandError::DateTime { formats }) => {
                assert_eq!(formats[0], "RFC 3339");
                assert_eq!(formats.len(), DEFAULT_DATE_FORMATS.len() + 1);
            }
            other => panic!("expected date error, got {other:?}"),
        }
    }

    #[test]
    fn custom_date_format() {
        let custom = vec!["%d.%m.%Y".to_owned()];
        assert_eq!(
            coerce(Some("28.05.2023"), FieldType::DateTime, &custom).unwrap(),
            Some(midnight(2023, 5, 28))
        );
        assert!(coerce(Some("5/28/2023"), FieldType::DateTime, &custom).is_err());
    }

    #[test]
    fn enum_members_by_exact_name() {
        assert_eq!(
            coerce(Some("Checking"), ACCOUNT_TYPE, &formats()).unwrap(),
            Some(Value::Enum("Checking"))
        );
        assert!(matches!(
            coerce(Some("checking"), ACCOUNT_TYPE, &formats()),
            Err(OperandError::EnumMember { name: "AccountType", .. })
        ));
    }

    #[test]
    fn text_is_kept_verbatim() {
        assert_eq!(
            coerce(Some(" padded "), FieldType::Text, &formats()).unwrap(),
            Some(Value::Text(" padded ".to_owned()))
        );
    }
}
