use std::collections::HashMap;

use crate::error::ProcessError;
use crate::processor::Processor;
use crate::semantics::{SemanticValue, Value};
use crate::syntree::ParseNode;
use crate::token::Token;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
  /// Surface every alternative from `get_alternative_products`, not just the first
  pub find_all: bool,
}

/// One output of one processor
#[derive(Debug, Clone)]
pub enum Product {
  Tokens(Vec<Token>),
  Tree(ParseNode),
  Semantics(SemanticValue),
  Value(Value),
}

impl Product {
  pub fn as_tokens(&self) -> Option<&[Token]> {
    match self {
      Self::Tokens(t) => Some(t),
      _ => None,
    }
  }

  pub fn as_tree(&self) -> Option<&ParseNode> {
    match self {
      Self::Tree(t) => Some(t),
      _ => None,
    }
  }

  pub fn as_semantics(&self) -> Option<&SemanticValue> {
    match self {
      Self::Semantics(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_value(&self) -> Option<&Value> {
    match self {
      Self::Value(v) => Some(v),
      _ => None,
    }
  }
}

/// What a processor left on the request
#[derive(Debug, Clone, Default)]
pub struct Stage {
  pub products: Vec<Product>,
  /// For each product, the derivation it belongs to
  pub derivations: Vec<usize>,
  pub errors: Vec<ProcessError>,
}

/// Per-sentence context. Each processor reads its predecessor's products from here
/// and writes its own back.
#[derive(Debug, Clone)]
pub struct Request {
  input: String,
  options: RequestOptions,
  stages: HashMap<String, Stage>,
}

impl Request {
  pub fn new(input: impl Into<String>) -> Self {
    Self::with_options(input, RequestOptions::default())
  }

  pub fn with_options(input: impl Into<String>, options: RequestOptions) -> Self {
    Self {
      input: input.into(),
      options,
      stages: HashMap::new(),
    }
  }

  pub fn find_all(input: impl Into<String>) -> Self {
    Self::with_options(input, RequestOptions { find_all: true })
  }

  pub fn input(&self) -> &str {
    &self.input
  }

  pub fn options(&self) -> RequestOptions {
    self.options
  }

  /// Drops every stage's output, keeping the input and options
  pub fn clear(&mut self) {
    self.stages.clear();
  }

  /// Stores a processor's output. Each product is paired with the index of the
  /// derivation it came from, so later stages can report failures against it.
  pub fn set_alternatives(
    &mut self,
    key: &str,
    alternatives: Vec<(usize, Product)>,
    errors: Vec<ProcessError>,
  ) {
    let (derivations, products) = alternatives.into_iter().unzip();
    self.stages.insert(
      key.to_string(),
      Stage {
        products,
        derivations,
        errors,
      },
    );
  }

  pub fn set_result(
    &mut self,
    key: &str,
    alternative: Option<(usize, Product)>,
    errors: Vec<ProcessError>,
  ) {
    self.set_alternatives(key, alternative.into_iter().collect(), errors);
  }

  pub fn stage(&self, key: &str) -> Option<&Stage> {
    self.stages.get(key)
  }

  /// Products stored under `key`; empty if that stage produced nothing or never ran
  pub fn products(&self, key: &str) -> &[Product] {
    self
      .stages
      .get(key)
      .map(|s| s.products.as_slice())
      .unwrap_or(&[])
  }

  /// Products stored under `key`, each with the derivation it belongs to
  pub fn derived<'s>(
    &'s self,
    key: &str,
  ) -> impl Iterator<Item = (usize, &'s Product)> + use<'s> {
    self
      .stages
      .get(key)
      .into_iter()
      .flat_map(|s| s.derivations.iter().copied().zip(s.products.iter()))
  }

  pub fn get_result<P: Processor + ?Sized>(&self, processor: &P) -> Option<&Product> {
    self.products(processor.key()).first()
  }

  pub fn get_alternatives<P: Processor + ?Sized>(&self, processor: &P) -> &[Product] {
    self.products(processor.key())
  }

  /// All of a processor's products when `find_all` is set, otherwise at most the first
  pub fn get_alternative_products<P: Processor + ?Sized>(&self, processor: &P) -> &[Product] {
    let products = self.products(processor.key());
    if self.options.find_all {
      products
    } else {
      &products[..products.len().min(1)]
    }
  }

  /// Failures of individual alternatives, in the order they were met
  pub fn errors<P: Processor + ?Sized>(&self, processor: &P) -> &[ProcessError] {
    self
      .stages
      .get(processor.key())
      .map(|s| s.errors.as_slice())
      .unwrap_or(&[])
  }
}
