use crate::types::{CacheKeyMode, Condition};

/// Order-preserving BLAKE3 digest of a condition list.
///
/// Every string and list is length-prefixed so adjacent fields cannot run
/// into each other. `data_type` and `parent_id` never affect the compiled
/// predicate and are left out in both modes.
pub(crate) fn fingerprint(conditions: &[Condition], mode: CacheKeyMode) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[mode as u8]);
    write_len(&mut hasher, conditions.len());
    for condition in conditions {
        match mode {
            CacheKeyMode::Structural => write_structure(&mut hasher, condition),
            CacheKeyMode::Content => write_content(&mut hasher, condition),
        }
    }
    hasher.finalize()
}

fn write_structure(hasher: &mut blake3::Hasher, condition: &Condition) {
    write_str(hasher, &condition.property_name);
    hasher.update(&[condition.operator as u8]);
    write_opt_u32(hasher, condition.id);
}

fn write_content(hasher: &mut blake3::Hasher, condition: &Condition) {
    write_structure(hasher, condition);
    hasher.update(&[condition.logical_operator as u8]);
    write_opt_str(hasher, condition.value.as_deref());
    write_len(hasher, condition.values.len());
    for value in &condition.values {
        write_str(hasher, value);
    }
    write_opt_str(hasher, condition.min_value.as_deref());
    write_opt_str(hasher, condition.max_value.as_deref());
    write_len(hasher, condition.additional_conditions.len());
    for nested in &condition.additional_conditions {
        write_content(hasher, nested);
    }
}

fn write_len(hasher: &mut blake3::Hasher, len: usize) {
    hasher.update(&(len as u64).to_le_bytes());
}

fn write_str(hasher: &mut blake3::Hasher, s: &str) {
    write_len(hasher, s.len());
    hasher.update(s.as_bytes());
}

fn write_opt_str(hasher: &mut blake3::Hasher, s: Option<&str>) {
    match s {
        Some(s) => {
            hasher.update(&[1]);
            write_str(hasher, s);
        }
        None => {
            hasher.update(&[0]);
        }
    }
}

fn write_opt_u32(hasher: &mut blake3::Hasher, v: Option<u32>) {
    match v {
        Some(v) => {
            hasher.update(&[1]);
            hasher.update(&v.to_le_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Operator;

    fn balance_over(threshold: &str) -> Vec<Condition> {
        vec![
            Condition::new("Balance", Operator::GreaterThan).value(threshold).and(),
            Condition::new("IsActive", Operator::Equals).value("true").and(),
        ]
    }

    #[test]
    fn identical_lists_match() {
        for mode in [CacheKeyMode::Structural, CacheKeyMode::Content] {
            assert_eq!(
                fingerprint(&balance_over("100"), mode),
                fingerprint(&balance_over("100"), mode)
            );
        }
    }

    #[test]
    fn structural_ignores_operands() {
        assert_eq!(
            fingerprint(&balance_over("100"), CacheKeyMode::Structural),
            fingerprint(&balance_over("5000"), CacheKeyMode::Structural)
        );
    }

    #[test]
    fn content_sees_operands() {
        assert_ne!(
            fingerprint(&balance_over("100"), CacheKeyMode::Content),
            fingerprint(&balance_over("5000"), CacheKeyMode::Content)
        );
    }

    #[test]
    fn content_sees_nested_conditions() {
        let plain = balance_over("100");
        let mut nested = balance_over("100");
        nested[0] = nested[0]
            .clone()
            .with(Condition::new("CreditScore", Operator::LessThan).value("600"));
        assert_eq!(
            fingerprint(&plain, CacheKeyMode::Structural),
            fingerprint(&nested, CacheKeyMode::Structural)
        );
        assert_ne!(
            fingerprint(&plain, CacheKeyMode::Content),
            fingerprint(&nested, CacheKeyMode::Content)
        );
    }

    #[test]
    fn order_matters() {
        let mut reversed = balance_over("100");
        reversed.reverse();
        assert_ne!(
            fingerprint(&balance_over("100"), CacheKeyMode::Structural),
            fingerprint(&reversed, CacheKeyMode::Structural)
        );
    }

    #[test]
    fn id_is_part_of_structure() {
        let a = vec![Condition::new("Balance", Operator::Equals).id(1)];
        let b = vec![Condition::new("Balance", Operator::Equals).id(2)];
        assert_ne!(
            fingerprint(&a, CacheKeyMode::Structural),
            fingerprint(&b, CacheKeyMode::Structural)
        );
    }

    #[test]
    fn field_boundaries_do_not_blur() {
        let a = vec![Condition::new("ab", Operator::Equals).value("c")];
        let b = vec![Condition::new("a", Operator::Equals).value("bc")];
        assert_ne!(
            fingerprint(&a, CacheKeyMode::Content),
            fingerprint(&b, CacheKeyMode::Content)
        );
    }

    #[test]
    fn modes_never_collide() {
        let list = balance_over("100");
        assert_ne!(
            fingerprint(&list, CacheKeyMode::Structural),
            fingerprint(&list, CacheKeyMode::Content)
        );
    }
}
