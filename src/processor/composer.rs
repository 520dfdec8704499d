use crate::error::ProcessError;
use crate::processor::{Alternatives, Processor};
use crate::request::{Product, Request};
use crate::semantics::{compose, SemanticValue};

/// Composes the semantics of every derivation its source produced. A derivation
/// that fails to compose is reported and skipped.
#[derive(Debug, Clone)]
pub struct SemanticComposer {
  key: String,
  source: String,
}

impl SemanticComposer {
  pub fn new<P: Processor + ?Sized>(source: &P) -> Self {
    Self {
      key: "composer".to_string(),
      source: source.key().to_string(),
    }
  }

  pub fn named(mut self, key: impl Into<String>) -> Self {
    self.key = key.into();
    self
  }

  pub fn get_semantics<'r>(&self, request: &'r Request) -> Option<&'r SemanticValue> {
    request.get_result(self).and_then(Product::as_semantics)
  }
}

impl Processor for SemanticComposer {
  fn key(&self) -> &str {
    &self.key
  }

  fn alternatives<'r>(&'r self, request: &'r Request) -> Alternatives<'r> {
    Box::new(
      request
        .derived(&self.source)
        .filter_map(|(derivation, product)| Some((derivation, product.as_tree()?)))
        .map(|(derivation, tree)| {
          compose(tree)
            .map(|value| (derivation, Product::Semantics(value)))
            .map_err(|source| ProcessError::Composition { derivation, source })
        }),
    )
  }
}
