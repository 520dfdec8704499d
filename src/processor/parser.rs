use std::rc::Rc;

use crate::error::ProcessError;
use crate::grammar::Grammar;
use crate::processor::{Alternatives, Processor};
use crate::request::{Product, Request};
use crate::syntree::ParseNode;

/// Parses every token sequence its source produced, offering each complete
/// derivation as an alternative. An ungrammatical input simply has none.
///
/// Derivations are numbered here, in order; later stages keep the numbering.
#[derive(Debug, Clone)]
pub struct BasicParser {
  key: String,
  source: String,
  grammar: Rc<Grammar>,
}

impl BasicParser {
  pub fn new<P: Processor + ?Sized>(grammar: impl Into<Rc<Grammar>>, source: &P) -> Self {
    Self {
      key: "parser".to_string(),
      source: source.key().to_string(),
      grammar: grammar.into(),
    }
  }

  pub fn named(mut self, key: impl Into<String>) -> Self {
    self.key = key.into();
    self
  }

  pub fn grammar(&self) -> &Grammar {
    &self.grammar
  }

  pub fn get_tree<'r>(&self, request: &'r Request) -> Option<&'r ParseNode> {
    request.get_result(self).and_then(Product::as_tree)
  }
}

impl Processor for BasicParser {
  fn key(&self) -> &str {
    &self.key
  }

  fn alternatives<'r>(&'r self, request: &'r Request) -> Alternatives<'r> {
    Box::new(
      request
        .products(&self.source)
        .iter()
        .filter_map(Product::as_tokens)
        .flat_map(move |tokens| {
          self
            .grammar
            .parse(tokens)
            .into_iter()
            .map(Product::Tree)
        })
        .enumerate()
        .map(Ok::<_, ProcessError>),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::processor::{BasicTokenizer, FindOne};

  #[test]
  fn test_find_one_stops_at_first() {
    let g: Grammar = r#"
      S -> 'x'
      S -> S S
    "#
    .parse()
    .unwrap();

    let tokenizer = BasicTokenizer::new();
    let parser = BasicParser::new(g, &tokenizer);

    let mut request = Request::new("x x x x");
    tokenizer.process(&mut request);

    parser.process(&mut request);
    let all = request
      .get_alternatives(&parser)
      .iter()
      .map(|p| p.as_tree().unwrap().to_string())
      .collect::<Vec<_>>();
    assert_eq!(all.len(), 5);

    FindOne::new(&parser).process(&mut request);
    assert_eq!(request.get_alternatives(&parser).len(), 1);
    assert_eq!(parser.get_tree(&request).unwrap().to_string(), all[0]);
    assert_eq!(request.stage(parser.key()).unwrap().derivations, vec![0]);
  }

  #[test]
  fn test_no_parse_is_empty() {
    let g: Grammar = "s -> 'hello'".parse().unwrap();
    let tokenizer = BasicTokenizer::new();
    let parser = BasicParser::new(g, &tokenizer);

    let mut request = Request::new("goodbye");
    tokenizer.process(&mut request);
    FindOne::new(&parser).process(&mut request);

    assert!(parser.get_tree(&request).is_none());
    assert!(request.errors(&parser).is_empty());
  }
}
