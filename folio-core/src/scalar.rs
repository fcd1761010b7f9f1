use std::borrow::Cow;
use std::fmt;

/// An enum of the values a record field may hold.
///
/// Integers and floats are kept apart on purpose: a holding quantity of `5` and one of `5.0`
/// are both valid input, but only the latter is displayed with two decimals.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar<'a> {
    Null,
    Bool(bool),
    Integer(i128),
    Float(f64),
    Text(Cow<'a, str>),
}

impl Scalar<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn into_owned(self) -> Scalar<'static> {
        match self {
            Scalar::Null => Scalar::Null,
            Scalar::Bool(b) => Scalar::Bool(b),
            Scalar::Integer(i) => Scalar::Integer(i),
            Scalar::Float(f) => Scalar::Float(f),
            Scalar::Text(t) => Scalar::Text(Cow::Owned(t.into_owned())),
        }
    }
}

/// Formats a field for a table cell. Absent fields render the same as `null`.
pub fn cell_text(value: Option<&Scalar<'_>>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{:.2}", x),
            Scalar::Text(t) => write!(f, "{}", t),
        }
    }
}

impl<'a> From<&'a str> for Scalar<'a> {
    fn from(s: &'a str) -> Self {
        Scalar::Text(Cow::Borrowed(s))
    }
}

impl From<String> for Scalar<'_> {
    fn from(s: String) -> Self {
        Scalar::Text(Cow::Owned(s))
    }
}

impl<'a> From<Cow<'a, str>> for Scalar<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Scalar::Text(s)
    }
}

impl From<f64> for Scalar<'_> {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

impl From<i64> for Scalar<'_> {
    fn from(i: i64) -> Self {
        Scalar::Integer(i.into())
    }
}

impl From<u64> for Scalar<'_> {
    fn from(i: u64) -> Self {
        Scalar::Integer(i.into())
    }
}

impl From<bool> for Scalar<'_> {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl<'a, T: Into<Scalar<'a>>> From<Option<T>> for Scalar<'a> {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Scalar::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_have_two_decimals() {
        assert_eq!(Scalar::from(3.1).to_string(), "3.10");
        assert_eq!(Scalar::from(5.0).to_string(), "5.00");
        assert_eq!(Scalar::from(1234.5678).to_string(), "1234.57");
    }

    #[test]
    fn integers_keep_their_digits() {
        assert_eq!(Scalar::from(5i64).to_string(), "5");
        assert_eq!(Scalar::from(u64::MAX).to_string(), "18446744073709551615");
    }

    #[test]
    fn null_and_absent_are_empty() {
        assert_eq!(Scalar::Null.to_string(), "");
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(&Scalar::Null)), "");
        assert_eq!(Scalar::from(None::<&str>), Scalar::Null);
    }

    #[test]
    fn text_and_bool() {
        assert_eq!(cell_text(Some(&"NABIL".into())), "NABIL");
        assert_eq!(Scalar::from(true).to_string(), "true");
        assert_eq!(Scalar::from(false).to_string(), "false");
    }

    #[test]
    fn into_owned_detaches_borrowed_text() {
        let owned = {
            let s = String::from("bob");
            Scalar::from(s.as_str()).into_owned()
        };
        assert_eq!(owned, Scalar::Text(Cow::Owned("bob".to_string())));
    }
}
