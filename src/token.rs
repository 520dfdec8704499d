use std::fmt;

/// One lexical unit of the input, with its index in the token stream
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
  pub text: String,
  pub position: usize,
}

impl Token {
  pub fn new(text: impl Into<String>, position: usize) -> Self {
    Self {
      text: text.into(),
      position,
    }
  }

  /// Builds a token stream from already-split words
  pub fn from_words(words: &[&str]) -> Vec<Token> {
    words
      .iter()
      .enumerate()
      .map(|(position, w)| Token::new(*w, position))
      .collect()
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.text)
  }
}

/// Splits raw text into tokens. Normalization (case, punctuation) is up to the implementor;
/// the parser only compares token text against rule literals.
pub trait Tokenizer {
  fn tokenize(&self, text: &str) -> Vec<Token>;
}
