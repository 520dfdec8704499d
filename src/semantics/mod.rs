//! Semantic values, the actions that build them, and the composer and executor
//! that run over derivations.

mod action;
mod compose;
mod execute;
mod template;
mod value;

pub use action::{action0, action1, action2, action3, Scope, SemanticAction};
pub use compose::compose;
pub use execute::execute;
pub use template::{apply, Template, TemplateBody};
pub use value::{Atom, Composite, SemanticValue, Thunk, Value};
