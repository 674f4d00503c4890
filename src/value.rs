use std::fmt;
use std::rc::Rc;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    pub fn as_number(&self) -> Option<f64> {
        if let Value::Number(numeric_value) = self {
            Some(*numeric_value)
        } else {
            None
        }
    }

    /// `nil` and `false` are falsey; everything else, `0` and `""` included, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Nil => false,
            _ => true,
        }
    }
}

/// Renders a number the way `scream` shows it: integral values drop the `.0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n.fract() != 0.0 {
        n.to_string()
    } else {
        format!("{:.0}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::string("").is_truthy());
    }

    #[test]
    fn test_number_display_drops_integral_fraction() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(-12.0).to_string(), "-12");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(0.1 + 0.2).to_string(), "0.30000000000000004");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_number_display_never_uses_exponent() {
        assert_eq!(Value::Number(1e21).to_string(), "1000000000000000000000");
        assert_eq!(Value::Number(1e-7).to_string(), "0.0000001");
        assert_eq!(Value::Number(-1.5e10).to_string(), "-15000000000");
    }

    #[test]
    fn test_display_other_values() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::string("hi there").to_string(), "hi there");
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Nil, Value::Nil);
        assert_eq!(Value::string("a"), Value::from("a"));
        assert_ne!(Value::Nil, Value::Bool(false));
        assert_ne!(Value::Number(1.0), Value::string("1"));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }
}
