use std::borrow::Cow;
use std::collections::HashMap;

use typed_builder::TypedBuilder;

use super::scalar::{cell_text, Scalar};

/// Field values of a single record, keyed by field name.
pub type Record<'a> = HashMap<Cow<'a, str>, Scalar<'a>>;

/// A portfolio position, the top-level unit of a ledger.
///
/// A holding may carry per-user sub-transactions. When it does, each of them is displayed in
/// place of the holding itself:
///
/// ```text
/// {"symbol": "NABIL", "quantity": 30.0, "user_transactions": [
///     {"user_name": "bob", "quantity": 10.0},
///     {"user_name": "alice", "quantity": 20.0}
/// ]}
/// ```
#[derive(Clone, Debug, Default, PartialEq, TypedBuilder)]
pub struct Holding<'a> {
    #[builder(default)]
    pub fields: Record<'a>,

    /// Sub-transactions in their original order. Empty when the holding has none.
    #[builder(default)]
    pub sub_transactions: Vec<SubTransaction<'a>>,
}

impl<'a> Holding<'a> {
    pub fn get(&self, key: &str) -> Option<&Scalar<'a>> {
        self.fields.get(key)
    }

    pub fn has_sub_transactions(&self) -> bool {
        !self.sub_transactions.is_empty()
    }
}

/// One user's transaction against its parent holding.
#[derive(Clone, Debug, Default, PartialEq, TypedBuilder)]
pub struct SubTransaction<'a> {
    /// Name shown in the identity column of the row this sub-transaction produces.
    #[builder(default, setter(into))]
    pub display_name: Option<Scalar<'a>>,

    #[builder(default)]
    pub fields: Record<'a>,
}

impl<'a> SubTransaction<'a> {
    pub fn get(&self, key: &str) -> Option<&Scalar<'a>> {
        self.fields.get(key)
    }

    /// The display name as cell text, empty when the name is absent or null.
    pub fn display_name_text(&self) -> String {
        cell_text(self.display_name.as_ref())
    }
}

/// Builds a [`Record`] from `key => value` pairs.
///
/// ```
/// use folio_core::{record, Scalar};
///
/// let r = record! { "symbol" => "AAA", "quantity" => 5.0 };
/// assert_eq!(r.get("quantity"), Some(&Scalar::Float(5.0)));
/// ```
#[macro_export]
macro_rules! record {
    () => { $crate::Record::new() };
    ( $( $key:expr => $value:expr ),+ $(,)? ) => {{
        let mut r = $crate::Record::new();
        $(
            r.insert(::std::borrow::Cow::from($key), $crate::Scalar::from($value));
        )+
        r
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    #[test]
    fn display_name_defaults_to_empty() {
        let sub = SubTransaction::builder()
            .fields(record! { "quantity" => 2.0 })
            .build();
        assert_eq!(sub.display_name_text(), "");

        let sub = SubTransaction::builder()
            .display_name(Scalar::Null)
            .build();
        assert_eq!(sub.display_name_text(), "");

        let sub = SubTransaction::builder()
            .display_name(Scalar::from("bob"))
            .build();
        assert_eq!(sub.display_name_text(), "bob");
    }

    #[test]
    fn holding_lookup() {
        let holding = Holding::builder()
            .fields(record! { "symbol" => "AAA", "quantity" => 5.0 })
            .build();
        assert_eq!(holding.get("symbol"), Some(&Scalar::from("AAA")));
        assert_eq!(holding.get("price"), None);
        assert!(!holding.has_sub_transactions());
    }
}
