//! Simple recursive-descent parsing of the rule mini-language:
//!
//! ```text
//! vp(E1) -> verb(E1, E2), np(E2)
//! operator -> 'divided' 'by'
//! ```
use regex::Regex;

use crate::rules::{Nonterminal, Symbol};

type Infallible<'a, T> = (T, &'a str);
type ParseResult<'a, T> = Result<(T, &'a str), String>;

/// A rule head and its right-hand side, not yet validated
pub type RawRule = (Nonterminal, Vec<Symbol>);

/// helper macro for initializing a regex with lazy_static!
macro_rules! regex_static {
  ($name:ident, $pattern:expr) => {
    lazy_static! {
      static ref $name: Regex = Regex::new($pattern).unwrap();
    }
  };
}

/// Try to consume a regex anchored at the start of `s`, returning None if it doesn't match
fn optional_re<'a>(re: &'static Regex, s: &'a str) -> Infallible<'a, Option<&'a str>> {
  match re.find(s) {
    Some(m) if m.start() == 0 => {
      let (matched, rest) = s.split_at(m.end());
      (Some(matched), rest)
    }
    _ => (None, s),
  }
}

/// Try to consume a regex, failing if it doesn't match
fn needed_re<'a>(re: &'static Regex, what: &str, s: &'a str) -> ParseResult<'a, &'a str> {
  if let (Some(c), rest) = optional_re(re, s) {
    Ok((c, rest))
  } else {
    Err(format!("expected {} at `{}`", what, s))
  }
}

/// Try to consume a char, returning None if it doesn't match
fn optional_char(c: char, s: &str) -> Infallible<'_, Option<char>> {
  match s.strip_prefix(c) {
    Some(rest) => (Some(c), rest),
    None => (None, s),
  }
}

/// Skips spaces and tabs, but not newlines, which end a rule
fn skip_inline_whitespace(s: &str) -> &str {
  regex_static!(INLINE_WHITESPACE, r"^[ \t\r]+");
  optional_re(&*INLINE_WHITESPACE, s).1
}

/// Skips any whitespace and `//` comments between rules
fn skip_whitespace(s: &str) -> &str {
  regex_static!(WHITESPACE_OR_COMMENT, r"^(\s+|//[^\n]*)+");
  optional_re(&*WHITESPACE_OR_COMMENT, s).1
}

/// Tries to parse a name made of letters, numbers, - and _
fn parse_name(s: &str) -> ParseResult<'_, &str> {
  regex_static!(NAME, r"^[a-zA-Z_][a-zA-Z0-9\-_]*");
  needed_re(&*NAME, "a name", s)
}

/// Parses a quoted literal, 'word' or "word", returning the text between the quotes
fn parse_literal(s: &str) -> ParseResult<'_, String> {
  regex_static!(LITERAL, r#"^('[^']*'|"[^"]*")"#);
  let (quoted, rest) = needed_re(&*LITERAL, "a quoted literal", s)?;
  let inner = &quoted[1..quoted.len() - 1];
  if inner.is_empty() {
    Err(format!("empty literal at `{}`", s))
  } else {
    Ok((inner.to_string(), rest))
  }
}

/// Parses an optional parenthesized variable list: `(E1, E2)`
fn parse_args(s: &str) -> ParseResult<'_, Vec<String>> {
  let (open, s) = optional_char('(', s);
  if open.is_none() {
    return Ok((Vec::new(), s));
  }

  let mut args = Vec::new();
  let mut rem = s;
  loop {
    rem = skip_inline_whitespace(rem);
    if let (Some(_), rest) = optional_char(')', rem) {
      return Ok((args, rest));
    }
    let (name, rest) = parse_name(rem).map_err(|e| format!("argument: {}", e))?;
    args.push(name.to_string());
    rem = skip_inline_whitespace(rest);
    rem = optional_char(',', rem).1;
  }
}

fn parse_nonterminal(s: &str) -> ParseResult<'_, Nonterminal> {
  let (name, s) = parse_name(s)?;
  let s = skip_inline_whitespace(s);
  let (args, s) = parse_args(s)?;
  Ok((Nonterminal::new(name, args), s))
}

fn parse_symbol(s: &str) -> ParseResult<'_, Symbol> {
  if s.starts_with('\'') || s.starts_with('"') {
    let (lit, s) = parse_literal(s)?;
    Ok((Symbol::Terminal(lit), s))
  } else {
    let (nt, s) = parse_nonterminal(s)?;
    Ok((Symbol::Nonterminal(nt), s))
  }
}

/// Head, arrow, symbols; terminated by `;`, a newline, a comment, or the end of input
fn parse_rule(s: &str) -> ParseResult<'_, RawRule> {
  #![allow(clippy::trivial_regex)]
  regex_static!(ARROW, r"^->");

  let (lhs, s) = parse_nonterminal(s).map_err(|e| format!("rule head: {}", e))?;
  let s = skip_inline_whitespace(s);
  let (_, s) = needed_re(&*ARROW, "`->`", s).map_err(|e| format!("rule arrow: {}", e))?;

  let mut rhs = Vec::new();
  let mut rem = s;
  loop {
    rem = skip_inline_whitespace(rem);
    if rem.is_empty() || rem.starts_with('\n') || rem.starts_with("//") {
      break;
    }
    if let (Some(_), rest) = optional_char(';', rem) {
      rem = rest;
      break;
    }
    // commas between symbols are optional
    if let (Some(_), rest) = optional_char(',', rem) {
      rem = rest;
      continue;
    }
    let (symbol, rest) = parse_symbol(rem).map_err(|e| format!("rule symbol: {}", e))?;
    rhs.push(symbol);
    rem = rest;
  }

  Ok(((lhs, rhs), rem))
}

/// Parses exactly one rule. Trailing text other than whitespace or `;` is an error.
pub fn parse_rule_syntax(s: &str) -> Result<RawRule, String> {
  let (rule, rest) = parse_rule(skip_whitespace(s))?;
  let rest = skip_whitespace(rest);
  let rest = optional_char(';', rest).1;
  if skip_whitespace(rest).is_empty() {
    Ok(rule)
  } else {
    Err(format!("unexpected trailing input `{}`", rest))
  }
}

/// Parses a whole grammar source, one rule per line or `;`
pub fn parse_rules(s: &str) -> Result<Vec<RawRule>, String> {
  let mut rules = Vec::new();
  let mut rem = s;
  loop {
    rem = skip_whitespace(rem);
    if rem.is_empty() {
      return Ok(rules);
    }
    let (rule, s) = parse_rule(rem)?;
    rules.push(rule);
    rem = s;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn nt(name: &str, args: &[&str]) -> Symbol {
    Symbol::Nonterminal(Nonterminal::new(
      name,
      args.iter().map(|s| s.to_string()).collect(),
    ))
  }

  #[test]
  fn test_parse_rule_with_args() {
    let (lhs, rhs) = parse_rule_syntax("vp(E1) -> verb(E1, E2), np(E2)").unwrap();
    assert_eq!(lhs, Nonterminal::new("vp", vec!["E1".into()]));
    assert_eq!(rhs, vec![nt("verb", &["E1", "E2"]), nt("np", &["E2"])]);
  }

  #[test]
  fn test_parse_rule_literals() {
    let (lhs, rhs) = parse_rule_syntax("operator -> 'divided' \"by\"").unwrap();
    assert_eq!(lhs.arity(), 0);
    assert_eq!(
      rhs,
      vec![
        Symbol::Terminal("divided".into()),
        Symbol::Terminal("by".into())
      ]
    );
  }

  #[test]
  fn test_parse_rule_errors() {
    assert!(parse_rule_syntax("s np vp").is_err());
    assert!(parse_rule_syntax("s -> 'unterminated").is_err());
    assert!(parse_rule_syntax("s -> np(E1").is_err());
    assert!(parse_rule_syntax("s -> ''").is_err());
    assert!(parse_rule_syntax("s -> a; b -> c").is_err());
  }

  #[test]
  fn test_parse_rules() {
    let rules = parse_rules(
      r#"
      // sentence
      s -> np vp;  vp -> verb np
      np -> noun // comment after a rule
      verb -> 'loves'
    "#,
    )
    .unwrap();

    let heads = rules.iter().map(|(l, _)| l.name.as_str()).collect::<Vec<_>>();
    assert_eq!(heads, vec!["s", "vp", "np", "verb"]);
    assert_eq!(rules[2].1, vec![nt("noun", &[])]);
  }
}
