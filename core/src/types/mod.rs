//! Value-kinds and the kind lattice.
//!
//! Every expression node carries exactly one [`ValueKind`], fixed at resolution time.
//! `Integer` is a refinement of `Double`: both are stored as `f64` at runtime, but the
//! distinction survives through arithmetic so that results can be displayed and rounded
//! as whole numbers.

mod unification;

pub use unification::{arithmetic_result, parse_kind_name, promote, unify};

use bitflags::bitflags;
use core::fmt;
use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueKind {
    Integer,
    Double,
    Boolean,
    String,
    Date,
}

impl ValueKind {
    pub const ALL: [ValueKind; 5] = [
        ValueKind::Integer,
        ValueKind::Double,
        ValueKind::Boolean,
        ValueKind::String,
        ValueKind::Date,
    ];

    pub fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Double)
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Integer => "INTEGER",
            ValueKind::Double => "DOUBLE",
            ValueKind::Boolean => "BOOLEAN",
            ValueKind::String => "STRING",
            ValueKind::Date => "DATE",
        }
    }

    fn flag(self) -> KindSet {
        match self {
            ValueKind::Integer => KindSet::INTEGER,
            ValueKind::Double => KindSet::DOUBLE,
            ValueKind::Boolean => KindSet::BOOLEAN,
            ValueKind::String => KindSet::STRING,
            ValueKind::Date => KindSet::DATE,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Set of kinds accepted at one argument position of a function.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct KindSet: u8 {
        const INTEGER = 1 << 0;
        const DOUBLE = 1 << 1;
        const BOOLEAN = 1 << 2;
        const STRING = 1 << 3;
        const DATE = 1 << 4;

        const NUMERIC = Self::INTEGER.bits() | Self::DOUBLE.bits();
        const ANY = Self::NUMERIC.bits()
            | Self::BOOLEAN.bits()
            | Self::STRING.bits()
            | Self::DATE.bits();
    }
}

impl KindSet {
    /// Whether a value of `kind` may be passed where this set is expected.
    ///
    /// `Integer` is implicitly promoted wherever `Double` is accepted.
    pub fn accepts(self, kind: ValueKind) -> bool {
        self.contains(kind.flag())
            || (kind == ValueKind::Integer && self.contains(KindSet::DOUBLE))
    }
}

impl From<ValueKind> for KindSet {
    fn from(kind: ValueKind) -> Self {
        kind.flag()
    }
}

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(KindSet::ANY) {
            return f.write_str("any kind");
        }
        let mut names: Vec<&str> = Vec::new();
        if self.contains(KindSet::NUMERIC) {
            names.push("numeric");
        } else if self.contains(KindSet::INTEGER) {
            names.push(ValueKind::Integer.name());
        } else if self.contains(KindSet::DOUBLE) {
            names.push(ValueKind::Double.name());
        }
        for kind in [ValueKind::Boolean, ValueKind::String, ValueKind::Date] {
            if self.contains(kind.flag()) {
                names.push(kind.name());
            }
        }
        match names.split_last() {
            None => f.write_str("nothing"),
            Some((last, [])) => f.write_str(last),
            Some((last, rest)) => write!(f, "{} or {}", rest.join(", "), last),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_integer_promotes_to_double() {
        assert!(KindSet::DOUBLE.accepts(ValueKind::Integer));
        assert!(!KindSet::INTEGER.accepts(ValueKind::Double));
        assert!(KindSet::NUMERIC.accepts(ValueKind::Double));
        assert!(!KindSet::NUMERIC.accepts(ValueKind::String));
    }

    #[test]
    fn test_kind_set_display() {
        assert_eq!(KindSet::NUMERIC.to_string(), "numeric");
        assert_eq!(KindSet::ANY.to_string(), "any kind");
        assert_eq!(
            (KindSet::NUMERIC | KindSet::STRING).to_string(),
            "numeric or STRING"
        );
        assert_eq!(
            (KindSet::BOOLEAN | KindSet::STRING | KindSet::DATE).to_string(),
            "BOOLEAN, STRING or DATE"
        );
    }

    #[test]
    fn test_kind_display_is_upper_case() {
        assert_eq!(ValueKind::Date.to_string(), "DATE");
    }
}
