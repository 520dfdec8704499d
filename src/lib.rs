#[macro_use]
extern crate lazy_static;

pub mod chart;
pub mod error;
pub mod forest;
pub mod grammar;
pub mod parse_grammar;
pub mod pipeline;
pub mod processor;
pub mod request;
pub mod rules;
pub mod sample_grammars;
pub mod semantics;
pub mod syntree;
pub mod token;

pub use crate::chart::Chart;
pub use crate::error::{CompositionError, Err, ExecutionError, GrammarError, ProcessError};
pub use crate::forest::Derivations;
pub use crate::grammar::{Grammar, RuleSpec};
pub use crate::pipeline::Pipeline;
pub use crate::processor::{
  BasicParser, BasicTokenizer, FindOne, Processor, SemanticComposer, SemanticExecutor,
};
pub use crate::request::{Product, Request, RequestOptions};
pub use crate::semantics::{SemanticValue, Value};
pub use crate::syntree::{ParseNode, Variable};
pub use crate::token::{Token, Tokenizer};
