use std::borrow::Cow;

use log::{debug, warn};
use serde_json::{Map, Number, Value};
use typed_builder::TypedBuilder;

use folio_core as fc;

use crate::error::{ParseError, ParseResult};

/// Field names that give a ledger document its structure.
#[derive(Clone, Debug, Eq, PartialEq, TypedBuilder)]
pub struct LedgerOptions {
    /// Field of a holding that lists its sub-transactions.
    #[builder(default = "user_transactions".to_string(), setter(into))]
    pub sub_transactions_key: String,

    /// Field of a sub-transaction that names the user it belongs to.
    #[builder(default = "user_name".to_string(), setter(into))]
    pub display_name_key: String,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        LedgerOptions::builder().build()
    }
}

/// Decodes JSON text into a document that [`parse_ledger`] can borrow from.
pub fn read_json(input: &str) -> ParseResult<Value> {
    Ok(serde_json::from_str(input)?)
}

/// Builds a typed ledger over a decoded JSON document.
///
/// The document must be an array of holding objects. Decoding stops at the first record that
/// does not have the shape of a holding or sub-transaction.
pub fn parse_ledger<'a>(document: &'a Value, options: &LedgerOptions) -> ParseResult<fc::Ledger<'a>> {
    let items = document.as_array().ok_or_else(|| {
        ParseError::invalid_input(format!(
            "expected an array of holdings, found {}",
            kind_of(document)
        ))
    })?;

    let holdings = items
        .iter()
        .enumerate()
        .map(|(i, item)| holding(item, &format!("[{}]", i), options))
        .collect::<ParseResult<Vec<_>>>()?;

    let ledger = fc::Ledger::builder().holdings(holdings).build();
    debug!(
        "decoded {} holdings with {} sub-transactions",
        ledger.len(),
        ledger.sub_transaction_count()
    );
    Ok(ledger)
}

fn holding<'a>(value: &'a Value, path: &str, options: &LedgerOptions) -> ParseResult<fc::Holding<'a>> {
    let object = as_record(value, path)?;
    let mut sub_transactions = Vec::new();
    let mut fields = fc::Record::new();

    for (key, value) in object {
        let field_path = format!("{}.{}", path, key);
        if *key == options.sub_transactions_key {
            sub_transactions = sub_transaction_list(value, &field_path, options)?;
        } else {
            fields.insert(Cow::Borrowed(key.as_str()), scalar(value, &field_path)?);
        }
    }

    Ok(fc::Holding::builder()
        .fields(fields)
        .sub_transactions(sub_transactions)
        .build())
}

fn sub_transaction_list<'a>(
    value: &'a Value,
    path: &str,
    options: &LedgerOptions,
) -> ParseResult<Vec<fc::SubTransaction<'a>>> {
    match value {
        Value::Null => {
            warn!("{} is null, treating it as an empty list", path);
            Ok(Vec::new())
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(j, item)| sub_transaction(item, &format!("{}[{}]", path, j), options))
            .collect(),
        other => Err(ParseError::invalid_record(
            path,
            format!("expected a list of sub-transactions, found {}", kind_of(other)),
        )),
    }
}

fn sub_transaction<'a>(
    value: &'a Value,
    path: &str,
    options: &LedgerOptions,
) -> ParseResult<fc::SubTransaction<'a>> {
    let object = as_record(value, path)?;
    let fields = object
        .iter()
        .map(|(key, value)| {
            let field_path = format!("{}.{}", path, key);
            Ok((Cow::Borrowed(key.as_str()), scalar(value, &field_path)?))
        })
        .collect::<ParseResult<fc::Record<'a>>>()?;
    let display_name = fields.get(options.display_name_key.as_str()).cloned();

    Ok(fc::SubTransaction::builder()
        .display_name(display_name)
        .fields(fields)
        .build())
}

fn as_record<'a>(value: &'a Value, path: &str) -> ParseResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        ParseError::invalid_record(path, format!("expected an object, found {}", kind_of(value)))
    })
}

fn scalar<'a>(value: &'a Value, path: &str) -> ParseResult<fc::Scalar<'a>> {
    let scalar = match value {
        Value::Null => fc::Scalar::Null,
        Value::Bool(b) => fc::Scalar::Bool(*b),
        Value::Number(n) => number(n, path)?,
        Value::String(s) => fc::Scalar::Text(Cow::Borrowed(s.as_str())),
        other => {
            return Err(ParseError::invalid_record(
                path,
                format!("expected a scalar value, found {}", kind_of(other)),
            ))
        }
    };
    Ok(scalar)
}

/// Integer literals keep every digit: they become `Integer` when they fit an i128 and `Text`
/// otherwise. Everything else is a float.
fn number<'a>(n: &Number, path: &str) -> ParseResult<fc::Scalar<'a>> {
    let literal = n.to_string();
    if !literal.contains(|c: char| matches!(c, '.' | 'e' | 'E')) {
        return Ok(match literal.parse::<i128>() {
            Ok(i) => fc::Scalar::Integer(i),
            Err(_) => {
                debug!("{} does not fit an i128, keeping its digits as text", path);
                fc::Scalar::Text(Cow::Owned(literal))
            }
        });
    }
    n.as_f64()
        .filter(|f| f.is_finite())
        .map(fc::Scalar::Float)
        .ok_or_else(|| ParseError::invalid_record(path, format!("unrepresentable number {}", literal)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
