use std::iter;

use regex::Regex;

use crate::processor::{Alternatives, Processor};
use crate::request::{Product, Request};
use crate::token::{Token, Tokenizer};

lazy_static! {
  /// A double-quoted string, a run of word characters, or a single punctuation mark
  static ref TOKEN: Regex = Regex::new(r#""([^"]*)"|\w+|[^\w\s]"#).unwrap();
}

/// Splits on whitespace and punctuation. Quoted strings become a single token, kept
/// verbatim without the quotes; everything else is lowercased unless told otherwise.
#[derive(Debug, Clone)]
pub struct BasicTokenizer {
  key: String,
  lowercase: bool,
}

impl Default for BasicTokenizer {
  fn default() -> Self {
    Self {
      key: "tokenizer".to_string(),
      lowercase: true,
    }
  }
}

impl BasicTokenizer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn named(mut self, key: impl Into<String>) -> Self {
    self.key = key.into();
    self
  }

  pub fn lowercase(mut self, lowercase: bool) -> Self {
    self.lowercase = lowercase;
    self
  }

  pub fn get_tokens<'r>(&self, request: &'r Request) -> Option<&'r [Token]> {
    request.get_result(self).and_then(Product::as_tokens)
  }
}

impl Tokenizer for BasicTokenizer {
  fn tokenize(&self, text: &str) -> Vec<Token> {
    TOKEN
      .captures_iter(text)
      .enumerate()
      .map(|(position, caps)| {
        let text = match caps.get(1) {
          Some(quoted) => quoted.as_str().to_string(),
          None if self.lowercase => caps[0].to_lowercase(),
          None => caps[0].to_string(),
        };
        Token::new(text, position)
      })
      .collect()
  }
}

impl Processor for BasicTokenizer {
  fn key(&self) -> &str {
    &self.key
  }

  fn alternatives<'r>(&'r self, request: &'r Request) -> Alternatives<'r> {
    let tokens = self.tokenize(request.input());
    Box::new(iter::once(Ok((0, Product::Tokens(tokens)))))
  }
}
