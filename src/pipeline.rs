use tracing::debug;

use crate::processor::Processor;
use crate::request::{Product, Request};

/// An ordered list of processors, run once each over a request
#[derive(Default)]
pub struct Pipeline<'a> {
  processors: Vec<Box<dyn Processor + 'a>>,
}

impl<'a> Pipeline<'a> {
  pub fn new() -> Self {
    Self {
      processors: Vec::new(),
    }
  }

  /// Appends a stage. Stages run in the order they were added.
  pub fn then(mut self, processor: impl Processor + 'a) -> Self {
    self.processors.push(Box::new(processor));
    self
  }

  pub fn len(&self) -> usize {
    self.processors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.processors.is_empty()
  }

  /// Runs every stage over `request` and returns what the last stage produced.
  /// Output left on the request by an earlier run is discarded first, so entering
  /// the same request twice gives the same products.
  ///
  /// A stage that finds nothing doesn't stop the run; the stages after it just see
  /// no input and produce nothing themselves.
  pub fn enter<'r>(&self, request: &'r mut Request) -> &'r [Product] {
    request.clear();
    for processor in self.processors.iter() {
      processor.process(request);
      debug!(
        processor = processor.key(),
        products = request.products(processor.key()).len(),
        errors = request.errors(processor).len(),
        "stage done"
      );
    }

    match self.processors.last() {
      Some(last) => request.products(last.key()),
      None => &[],
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grammar::Grammar;
  use crate::processor::{BasicParser, BasicTokenizer, FindOne};

  #[test]
  fn test_empty_pipeline() {
    let mut request = Request::new("anything");
    assert!(Pipeline::new().enter(&mut request).is_empty());
  }

  #[test]
  fn test_no_result_flows_downstream() {
    let g: Grammar = "s -> 'yes'".parse().unwrap();
    let tokenizer = BasicTokenizer::new();
    let parser = BasicParser::new(g, &tokenizer);
    let pipeline = Pipeline::new().then(&tokenizer).then(FindOne::new(&parser));
    assert_eq!(pipeline.len(), 2);

    let mut request = Request::new("no");
    assert!(pipeline.enter(&mut request).is_empty());
    assert_eq!(request.get_alternatives(&tokenizer).len(), 1);

    let mut request = Request::new("yes");
    assert_eq!(pipeline.enter(&mut request).len(), 1);
  }
}
