//! Command-line descriptions of a row, its macros and process parameters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use formula::{Bindings, Engine, Value, ValueKind};
use formula_core::types::parse_kind_name;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum ArgError {
    #[error("expected NAME:KIND=VALUE, got '{0}'")]
    #[diagnostic(code(cli::attr), help("e.g. --attr age:integer=42 or --attr name:nominal="))]
    MalformedAttribute(String),

    #[error("unknown value kind '{0}'")]
    #[diagnostic(
        code(cli::kind),
        help("use one of integer, real, nominal, binominal or date_time")
    )]
    UnknownKind(String),

    #[error("cannot read '{text}' as {kind}")]
    #[diagnostic(code(cli::value))]
    BadValue { text: String, kind: ValueKind },

    #[error("expected NAME=VALUE, got '{0}'")]
    #[diagnostic(code("cli::macro"))]
    MalformedMacro(String),

    #[error("expected OPERATOR.PARAMETER=VALUE, got '{0}'")]
    #[diagnostic(code(cli::param))]
    MalformedParameter(String),
}

/// One attribute of the row, e.g. `age:integer=42`.
///
/// An empty value (`age:integer=`) or `?` declares the attribute as missing.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeArg {
    pub name: String,
    pub value: Value,
}

impl std::str::FromStr for AttributeArg {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (declaration, text) = s
            .split_once('=')
            .ok_or_else(|| ArgError::MalformedAttribute(s.to_string()))?;
        let (name, kind) = declaration
            .rsplit_once(':')
            .ok_or_else(|| ArgError::MalformedAttribute(s.to_string()))?;
        if name.is_empty() {
            return Err(ArgError::MalformedAttribute(s.to_string()));
        }
        let kind = parse_kind_name(kind).ok_or_else(|| ArgError::UnknownKind(kind.to_string()))?;
        Ok(AttributeArg {
            name: name.to_string(),
            value: parse_value(text, kind)?,
        })
    }
}

fn parse_value(text: &str, kind: ValueKind) -> Result<Value, ArgError> {
    if text.is_empty() || text == "?" {
        return Ok(Value::missing(kind));
    }
    let bad = || ArgError::BadValue {
        text: text.to_string(),
        kind,
    };
    match kind {
        ValueKind::Integer | ValueKind::Double => text
            .trim()
            .parse::<f64>()
            .map(|v| Value::number(kind, v))
            .map_err(|_| bad()),
        ValueKind::Boolean => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Value::boolean(true)),
            "false" => Ok(Value::boolean(false)),
            _ => Err(bad()),
        },
        ValueKind::String => Ok(Value::string(text)),
        ValueKind::Date => parse_date(text.trim()).map(Value::date).ok_or_else(bad),
    }
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(date.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

/// A macro definition, `NAME=VALUE`.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroArg {
    pub name: String,
    pub value: String,
}

impl std::str::FromStr for MacroArg {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok(MacroArg {
                name: name.to_string(),
                value: value.to_string(),
            }),
            _ => Err(ArgError::MalformedMacro(s.to_string())),
        }
    }
}

/// A process parameter, `OPERATOR.PARAMETER=VALUE`. The operator name may contain dots;
/// the parameter name is everything after the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamArg {
    pub operator: String,
    pub parameter: String,
    pub value: String,
}

impl std::str::FromStr for ParamArg {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ArgError::MalformedParameter(s.to_string());
        let (key, value) = s.split_once('=').ok_or_else(malformed)?;
        let (operator, parameter) = key.rsplit_once('.').ok_or_else(malformed)?;
        if operator.is_empty() || parameter.is_empty() {
            return Err(malformed());
        }
        Ok(ParamArg {
            operator: operator.to_string(),
            parameter: parameter.to_string(),
            value: value.to_string(),
        })
    }
}

pub fn build_row(attributes: &[AttributeArg]) -> Bindings {
    let mut row = Bindings::new();
    for attribute in attributes {
        row.insert(attribute.name.clone(), attribute.value.clone());
    }
    row
}

pub fn configure_engine(engine: &mut Engine, macros: &[MacroArg], params: &[ParamArg]) {
    for m in macros {
        engine.define_macro(m.name.clone(), m.value.clone());
    }
    for p in params {
        engine.set_parameter(p.operator.clone(), p.parameter.clone(), p.value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_attribute_args() {
        let arg: AttributeArg = "age:integer=42".parse().unwrap();
        assert_eq!(arg.name, "age");
        assert_eq!(arg.value, Value::integer(42.0));

        let arg: AttributeArg = "price:real=".parse().unwrap();
        assert_eq!(arg.value, Value::missing(ValueKind::Double));

        let arg: AttributeArg = "note:nominal=a=b".parse().unwrap();
        assert_eq!(arg.value, Value::string("a=b"));

        let arg: AttributeArg = "time:of:day:nominal=noon".parse().unwrap();
        assert_eq!(arg.name, "time:of:day");

        let arg: AttributeArg = "ok:binominal=TRUE".parse().unwrap();
        assert_eq!(arg.value, Value::boolean(true));
    }

    #[test]
    fn test_attribute_dates() {
        let arg: AttributeArg = "when:date_time=2024-03-15".parse().unwrap();
        assert_eq!(arg.value.kind(), ValueKind::Date);
        assert!(!arg.value.is_missing());

        let arg: AttributeArg = "when:date=2024-03-15T12:30:00Z".parse().unwrap();
        assert!(!arg.value.is_missing());
    }

    #[test]
    fn test_attribute_errors() {
        assert_eq!(
            "age=3".parse::<AttributeArg>(),
            Err(ArgError::MalformedAttribute("age=3".to_string()))
        );
        assert_eq!(
            "age:widget=3".parse::<AttributeArg>(),
            Err(ArgError::UnknownKind("widget".to_string()))
        );
        assert!(matches!(
            "age:integer=abc".parse::<AttributeArg>(),
            Err(ArgError::BadValue { .. })
        ));
    }

    #[test]
    fn test_macro_and_param_args() {
        let m: MacroArg = "mode=fast".parse().unwrap();
        assert_eq!((m.name.as_str(), m.value.as_str()), ("mode", "fast"));
        assert!("=x".parse::<MacroArg>().is_err());

        let p: ParamArg = "Read CSV.file=data.csv".parse().unwrap();
        assert_eq!(p.operator, "Read CSV");
        assert_eq!(p.parameter, "file");
        assert_eq!(p.value, "data.csv");
        assert!("nodot=1".parse::<ParamArg>().is_err());
    }

    #[test]
    fn test_configured_engine_runs() {
        let mut engine = Engine::default();
        configure_engine(
            &mut engine,
            &["greeting=hi".parse().unwrap()],
            &["Op.key=v".parse().unwrap()],
        );
        let row = build_row(&["n:integer=2".parse().unwrap()]);
        let formula = engine
            .compile(r#"%{greeting} + param("Op", "key") + [n]"#, &row)
            .unwrap();
        assert_eq!(formula.run(&row).unwrap(), Value::string("hiv2"));
    }
}
