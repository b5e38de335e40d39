use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use super::Value;

/// Declared type of a record field. Drives operand coercion and decides which
/// operators a condition on the field may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Int,
    Float,
    Decimal,
    Bool,
    DateTime,
    Text,
    Enum(EnumType),
}

/// Name and member list of an enumeration-typed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumType {
    pub name: &'static str,
    pub members: &'static [&'static str],
}

impl FieldType {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Decimal => "decimal",
            FieldType::Bool => "bool",
            FieldType::DateTime => "datetime",
            FieldType::Text => "text",
            FieldType::Enum(e) => e.name,
        }
    }

    /// Whether `>`, `<`, bounds and ranges are defined for this type.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            FieldType::Int | FieldType::Float | FieldType::Decimal | FieldType::DateTime
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Rust type that can back a record field.
pub trait FieldKind {
    const FIELD_TYPE: FieldType;

    fn into_value(self) -> Value;
}

macro_rules! field_kind {
    ($($ty:ty => $field_type:ident),* $(,)?) => {
        $(
            impl FieldKind for $ty {
                const FIELD_TYPE: FieldType = FieldType::$field_type;

                fn into_value(self) -> Value {
                    Value::from(self)
                }
            }
        )*
    };
}

field_kind! {
    i64 => Int,
    i32 => Int,
    f64 => Float,
    Decimal => Decimal,
    bool => Bool,
    NaiveDateTime => DateTime,
    NaiveDate => DateTime,
    String => Text,
}

impl FieldKind for u32 {
    const FIELD_TYPE: FieldType = FieldType::Int;

    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

/// An enumeration usable as a record field. Operands name members exactly.
///
/// ```
/// use predicata::RuleEnum;
///
/// #[derive(Clone, Copy)]
/// enum AccountType { Savings, Checking }
///
/// impl RuleEnum for AccountType {
///     const TYPE_NAME: &'static str = "AccountType";
///     const MEMBERS: &'static [&'static str] = &["Savings", "Checking"];
///
///     fn member_name(self) -> &'static str {
///         Self::MEMBERS[self as usize]
///     }
/// }
/// ```
pub trait RuleEnum: Copy {
    const TYPE_NAME: &'static str;
    const MEMBERS: &'static [&'static str];

    fn member_name(self) -> &'static str;
}

/// A record type with a field table the compiler can resolve names against.
pub trait Record: Sized + 'static {
    fn schema() -> Schema<Self>;
}

type Getter<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;

struct FieldDef<T> {
    name: &'static str,
    field_type: FieldType,
    getter: Getter<T>,
}

struct SchemaInner<T> {
    name: &'static str,
    fields: Vec<FieldDef<T>>,
    index: AHashMap<&'static str, usize>,
}

/// Field table of a record type: name, declared type and typed getter per
/// field. Cheap to clone; compiled predicates hold one.
pub struct Schema<T> {
    inner: Arc<SchemaInner<T>>,
}

impl<T> Clone for Schema<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.inner.name)
            .field(
                "fields",
                &self
                    .inner
                    .fields
                    .iter()
                    .map(|d| (d.name, d.field_type))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<T> Schema<T> {
    #[must_use]
    pub fn builder(name: &'static str) -> SchemaBuilder<T> {
        SchemaBuilder {
            name,
            fields: Vec::new(),
        }
    }

    /// Record type name, used in diagnostics and in the cache key.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// Declared type of a field, or `None` if the record has no such field.
    #[must_use]
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.resolve(name).map(|(_, _, ty)| ty)
    }

    /// Field names in registration order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.inner.fields.iter().map(|d| d.name)
    }

    pub(crate) fn resolve(&self, name: &str) -> Option<(usize, &'static str, FieldType)> {
        let idx = *self.inner.index.get(name)?;
        let def = &self.inner.fields[idx];
        Some((idx, def.name, def.field_type))
    }

    /// Address of the shared field table. Clones share it; separately built
    /// schemas never do while both are alive.
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    #[inline]
    pub(crate) fn read(&self, index: usize, record: &T) -> Value {
        (self.inner.fields[index].getter)(record)
    }
}

/// Builder for a [`Schema`]. Registering a name twice replaces the earlier
/// field.
pub struct SchemaBuilder<T> {
    name: &'static str,
    fields: Vec<FieldDef<T>>,
}

impl<T> SchemaBuilder<T> {
    #[must_use]
    pub fn field<F, G>(self, name: &'static str, getter: G) -> Self
    where
        F: FieldKind,
        G: Fn(&T) -> F + Send + Sync + 'static,
    {
        self.push(name, F::FIELD_TYPE, Arc::new(move |r| getter(r).into_value()))
    }

    #[must_use]
    pub fn enum_field<E, G>(self, name: &'static str, getter: G) -> Self
    where
        E: RuleEnum,
        G: Fn(&T) -> E + Send + Sync + 'static,
    {
        let field_type = FieldType::Enum(EnumType {
            name: E::TYPE_NAME,
            members: E::MEMBERS,
        });
        self.push(
            name,
            field_type,
            Arc::new(move |r| Value::Enum(getter(r).member_name())),
        )
    }

    fn push(mut self, name: &'static str, field_type: FieldType, getter: Getter<T>) -> Self {
        let def = FieldDef {
            name,
            field_type,
            getter,
        };
        match self.fields.iter_mut().find(|d| d.name == name) {
            Some(existing) => *existing = def,
            None => self.fields.push(def),
        }
        self
    }

    #[must_use]
    pub fn build(self) -> Schema<T> {
        let index = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name, i))
            .collect();
        Schema {
            inner: Arc::new(SchemaInner {
                name: self.name,
                fields: self.fields,
                index,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    enum Tier {
        Gold,
        Silver,
    }

    impl RuleEnum for Tier {
        const TYPE_NAME: &'static str = "Tier";
        const MEMBERS: &'static [&'static str] = &["Gold", "Silver"];

        fn member_name(self) -> &'static str {
            Self::MEMBERS[self as usize]
        }
    }

    struct Member {
        age: i32,
        name: String,
        tier: Tier,
    }

    fn schema() -> Schema<Member> {
        Schema::builder("Member")
            .field("age", |m: &Member| m.age)
            .field("name", |m: &Member| m.name.clone())
            .enum_field("tier", |m: &Member| m.tier)
            .build()
    }

    #[test]
    fn resolve_and_read() {
        let s = schema();
        let m = Member {
            age: 30,
            name: "ada".into(),
            tier: Tier::Silver,
        };
        let (idx, name, ty) = s.resolve("age").unwrap();
        assert_eq!(name, "age");
        assert_eq!(ty, FieldType::Int);
        assert_eq!(s.read(idx, &m), Value::Int(30));

        let (idx, _, _) = s.resolve("tier").unwrap();
        assert_eq!(s.read(idx, &m), Value::Enum("Silver"));
    }

    #[test]
    fn unknown_field_is_none() {
        let s = schema();
        assert!(s.resolve("Age").is_none());
        assert_eq!(s.field_type("missing"), None);
    }

    #[test]
    fn enum_field_type_carries_members() {
        match schema().field_type("tier") {
            Some(FieldType::Enum(e)) => {
                assert_eq!(e.name, "Tier");
                assert_eq!(e.members, &["Gold", "Silver"]);
            }
            other => panic!("expected enum field, got {other:?}"),
        }
        let _ = Tier::Gold;
    }

    #[test]
    fn duplicate_registration_replaces() {
        let s: Schema<Member> = Schema::builder("Member")
            .field("age", |m: &Member| m.age)
            .field("age", |m: &Member| m.name.clone())
            .build();
        assert_eq!(s.len(), 1);
        assert_eq!(s.field_type("age"), Some(FieldType::Text));
    }

    #[test]
    fn field_names_in_order() {
        let names: Vec<_> = schema().field_names().collect();
        assert_eq!(names, vec!["age", "name", "tier"]);
    }

    #[test]
    fn ordered_types() {
        assert!(FieldType::Decimal.is_ordered());
        assert!(FieldType::DateTime.is_ordered());
        assert!(!FieldType::Bool.is_ordered());
        assert!(!FieldType::Text.is_ordered());
    }
}
