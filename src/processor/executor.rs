use crate::error::ProcessError;
use crate::processor::{Alternatives, Processor};
use crate::request::{Product, Request};
use crate::semantics::Value;

/// Executes every composed value its source produced. A value that fails to
/// execute is reported and skipped; its siblings still run.
#[derive(Debug, Clone)]
pub struct SemanticExecutor {
  key: String,
  source: String,
}

impl SemanticExecutor {
  pub fn new<P: Processor + ?Sized>(source: &P) -> Self {
    Self {
      key: "executor".to_string(),
      source: source.key().to_string(),
    }
  }

  pub fn named(mut self, key: impl Into<String>) -> Self {
    self.key = key.into();
    self
  }

  /// The executed values, honouring the request's `find_all` option
  pub fn get_results<'r>(&self, request: &'r Request) -> Vec<&'r Value> {
    request
      .get_alternative_products(self)
      .iter()
      .filter_map(Product::as_value)
      .collect()
  }
}

impl Processor for SemanticExecutor {
  fn key(&self) -> &str {
    &self.key
  }

  fn alternatives<'r>(&'r self, request: &'r Request) -> Alternatives<'r> {
    Box::new(
      request
        .derived(&self.source)
        .filter_map(|(derivation, product)| Some((derivation, product.as_semantics()?)))
        .map(|(derivation, value)| {
          value
            .force()
            .map(|value| (derivation, Product::Value(value)))
            .map_err(|source| ProcessError::Execution { derivation, source })
        }),
    )
  }
}
