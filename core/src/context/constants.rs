use hashbrown::HashMap;

use super::ConstantResolver;
use crate::types::ValueKind;
use crate::values::Value;

/// A table of named constants.
#[derive(Debug, Clone, Default)]
pub struct ConstantTable {
    constants: HashMap<String, Value>,
}

/// Kind names usable as the kind argument of `eval` and `attribute`.
const KIND_NAMES: &[&str] = &[
    "REAL",
    "DOUBLE",
    "NUMERICAL",
    "INTEGER",
    "NOMINAL",
    "POLYNOMINAL",
    "STRING",
    "TEXT",
    "BINOMINAL",
    "BOOLEAN",
    "DATE_TIME",
    "DATE",
    "TIME",
];

const DATE_CONSTANTS: &[(&str, &str)] = &[
    ("DATE_UNIT_YEAR", "year"),
    ("DATE_UNIT_MONTH", "month"),
    ("DATE_UNIT_WEEK", "week"),
    ("DATE_UNIT_DAY", "day"),
    ("DATE_UNIT_HOUR", "hour"),
    ("DATE_UNIT_MINUTE", "minute"),
    ("DATE_UNIT_SECOND", "second"),
    ("DATE_UNIT_MILLISECOND", "millisecond"),
    ("DATE_SHORT", "short"),
    ("DATE_MEDIUM", "medium"),
    ("DATE_LONG", "long"),
    ("DATE_FULL", "full"),
    ("DATE_SHOW_DATE_ONLY", "date"),
    ("DATE_SHOW_TIME_ONLY", "time"),
    ("DATE_SHOW_DATE_AND_TIME", "date_time"),
];

impl ConstantTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Booleans, missing values, mathematical constants, kind names and date names.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.insert("TRUE", Value::boolean(true));
        table.insert("true", Value::boolean(true));
        table.insert("FALSE", Value::boolean(false));
        table.insert("false", Value::boolean(false));
        table.insert("MISSING_NUMERIC", Value::missing(ValueKind::Double));
        table.insert("MISSING_NOMINAL", Value::missing(ValueKind::String));
        table.insert("MISSING_DATE", Value::missing(ValueKind::Date));
        table.insert("e", Value::double(std::f64::consts::E));
        table.insert("pi", Value::double(std::f64::consts::PI));
        table.insert("INFINITY", Value::double(f64::INFINITY));
        table.insert("NaN", Value::double(f64::NAN));
        for name in KIND_NAMES {
            table.insert(*name, Value::string(*name));
        }
        for (name, value) in DATE_CONSTANTS {
            table.insert(*name, Value::string(*value));
        }
        table
    }

    /// Adds or replaces a constant.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.constants.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }
}

impl ConstantResolver for ConstantTable {
    fn constant(&self, name: &str) -> Option<Value> {
        self.constants.get(name).cloned()
    }

    fn constant_names(&self) -> Vec<String> {
        self.constants.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_kind_name;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_constants() {
        let table = ConstantTable::standard();
        assert_eq!(table.constant("TRUE"), Some(Value::boolean(true)));
        assert_eq!(table.constant("false"), Some(Value::boolean(false)));
        assert_eq!(table.constant("pi"), Some(Value::double(std::f64::consts::PI)));
        assert!(table.constant("MISSING_NUMERIC").unwrap().is_missing());
        assert_eq!(
            table.constant("MISSING_DATE").map(|v| v.kind()),
            Some(ValueKind::Date)
        );
        assert_eq!(table.constant("Pi"), None);
    }

    #[test]
    fn test_kind_name_constants_parse() {
        let table = ConstantTable::standard();
        for name in KIND_NAMES {
            let value = table.constant(name).unwrap();
            assert!(
                parse_kind_name(value.as_str().unwrap()).is_some(),
                "{} should name a kind",
                name
            );
        }
    }

    #[test]
    fn test_insert_overrides() {
        let table = ConstantTable::standard().with("pi", Value::integer(3.0));
        assert_eq!(table.constant("pi"), Some(Value::integer(3.0)));
    }
}
