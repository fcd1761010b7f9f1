use std::borrow::Cow;
use std::collections::HashSet;

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;

use folio_core as fc;

use error::{ParseError, ParseResult};

pub use ledger::{parse_ledger, read_json, LedgerOptions};

pub mod error;
mod ledger;

#[derive(PestParser)]
#[grammar = "columns.pest"]
pub struct ColumnSpecParser;

/// Parses a column specification such as `symbol = Sym, quantity = Q`.
///
/// Keys and labels borrow from `input`. A column without a label uses its key as label.
pub fn parse_columns<'i>(input: &'i str) -> ParseResult<fc::ColumnSpec<'i>> {
    let parsed = ColumnSpecParser::parse(Rule::columns, input)?;

    let mut seen = HashSet::new();
    let mut columns = Vec::new();

    for pair in parsed.flat_map(|columns| columns.into_inner()) {
        match pair.as_rule() {
            Rule::EOI => break,
            Rule::column => {
                let span = pair.as_span();
                let column = column(pair)?;
                if column.key.is_empty() {
                    return Err(ParseError::invalid_input_with_span("column key may not be empty", span));
                }
                if !seen.insert(column.key.clone()) {
                    return Err(ParseError::invalid_input_with_span(
                        format!("column key '{}' is used twice", column.key),
                        span,
                    ));
                }
                columns.push(column);
            }
            _ => return Err(ParseError::invalid_state_with_span("column", pair.as_span())),
        }
    }

    fc::ColumnSpec::new(columns).map_err(ParseError::invalid_input)
}

fn column<'i>(pair: Pair<'i, Rule>) -> ParseResult<fc::Column<'i>> {
    debug_assert!(pair.as_rule() == Rule::column);
    let span = pair.as_span();
    let mut inner = pair.into_inner();
    let key = inner
        .next()
        .map(name)
        .transpose()?
        .ok_or_else(|| ParseError::invalid_state_with_span("column key", span))?;
    let label = inner.next().map(name).transpose()?.unwrap_or_else(|| key.clone());
    Ok(fc::Column::builder().key(key).label(label).build())
}

fn name<'i>(pair: Pair<'i, Rule>) -> ParseResult<Cow<'i, str>> {
    let span = pair.as_span();
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| ParseError::invalid_state_with_span("bare word or quoted string", span.clone()))?;
    match inner.as_rule() {
        Rule::bare_word => Ok(inner.as_str().into()),
        Rule::quoted_str => get_quoted_str(inner),
        _ => Err(ParseError::invalid_state_with_span("bare word or quoted string", span)),
    }
}

fn get_quoted_str<'i>(pair: Pair<'i, Rule>) -> ParseResult<Cow<'i, str>> {
    debug_assert!(pair.as_rule() == Rule::quoted_str);
    let span = pair.as_span();
    Ok(pair
        .into_inner()
        .next()
        .ok_or_else(|| ParseError::invalid_state_with_span("quoted string", span))?
        .as_str()
        .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    macro_rules! parse_ok {
        ( $rule:ident, $input:expr ) => {
            assert_eq!(
                ColumnSpecParser::parse(Rule::$rule, $input)
                    .unwrap()
                    .as_str(),
                $input
            );
        };
        ( $rule:ident, $input:expr, $output:expr ) => {
            assert_eq!(
                ColumnSpecParser::parse(Rule::$rule, $input)
                    .unwrap()
                    .as_str(),
                $output
            );
        };
    }

    macro_rules! parse_fail {
        ( $rule:ident, $input:expr ) => {
            assert!(ColumnSpecParser::parse(Rule::$rule, $input).is_err());
        };
    }

    fn pairs<'a>(spec: &'a fc::ColumnSpec<'_>) -> Vec<(&'a str, &'a str)> {
        spec.iter()
            .map(|c| (c.key.as_ref(), c.label.as_ref()))
            .collect()
    }

    #[test]
    fn bare_word() {
        parse_ok!(bare_word, "symbol");
        parse_ok!(bare_word, "P/E");
        parse_ok!(bare_word, "%C");
        parse_ok!(bare_word, "Cash-E");
        parse_ok!(bare_word, "a.b_c");
        parse_ok!(bare_word, "Total In", "Total");

        parse_fail!(bare_word, "");
        parse_fail!(bare_word, "\"quoted\"");
        parse_fail!(bare_word, "=");
    }

    #[test]
    fn quoted_str() {
        parse_ok!(quoted_str, r#""""#);
        parse_ok!(quoted_str, r#""Unreal %""#);
        parse_ok!(quoted_str, r#""Security Name""#);
        parse_ok!(quoted_str, r#""€☃""#);

        parse_fail!(quoted_str, r#""unterminated"#);
        parse_fail!(quoted_str, "\"line\nbreak\"");
    }

    #[test]
    fn column() {
        parse_ok!(column, "symbol");
        parse_ok!(column, "symbol = Sym");
        parse_ok!(column, "symbol=Sym");
        parse_ok!(column, "symbol: Sym");
        parse_ok!(column, r#""unrealProfitPer" = "Unreal %""#);

        parse_fail!(column, "= Sym");
    }

    #[test]
    fn inline_spec() {
        let spec = parse_columns("symbol = Sym, quantity = Q").unwrap();
        assert_eq!(pairs(&spec), vec![("symbol", "Sym"), ("quantity", "Q")]);
    }

    #[test]
    fn multiline_spec_with_comments() {
        let input = indoc! {r#"
            # identity first
            symbol = Sym
            quantity = Q,
            "unrealProfitPer" = "Unreal %"
            sectorName            # label defaults to the key
        "#};
        let spec = parse_columns(input).unwrap();
        assert_eq!(
            pairs(&spec),
            vec![
                ("symbol", "Sym"),
                ("quantity", "Q"),
                ("unrealProfitPer", "Unreal %"),
                ("sectorName", "sectorName"),
            ]
        );
    }

    #[test]
    fn labels_borrow_from_input() {
        let input = String::from("symbol = Sym");
        let spec = parse_columns(&input).unwrap();
        let column = spec.iter().next().unwrap();
        assert!(matches!(column.label, Cow::Borrowed("Sym")));
    }

    #[test]
    fn duplicate_key_is_reported_where_it_occurs() {
        let err = parse_columns("symbol = Sym,\nquantity = Q,\nsymbol = S").unwrap_err();
        assert_eq!(err.location, (3, 1));
        assert!(err.to_string().contains("'symbol' is used twice"));
    }

    #[test]
    fn empty_spec_fails() {
        assert!(parse_columns("").is_err());
        assert!(parse_columns("  # nothing here\n").is_err());
        assert!(parse_columns(r#""" = Empty"#).is_err());
    }

    #[test]
    fn syntax_errors_name_the_expected_rule() {
        let err = parse_columns("symbol = = Sym").unwrap_err();
        assert_eq!(err.location, (1, 10));
        assert!(err.to_string().contains("column label"));
    }
}
