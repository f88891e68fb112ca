//! GIR Codegen - Wrapper Synthesis
//!
//! Generates host-language wrappers over the `gi` dynamic invocation layer
//! from introspection descriptors.
//!
//! # Pipeline
//!
//! For each declared function, [`Synthesizer::synthesize`]:
//! 1. checks the [`Policy`] block list (blocked functions only leave a comment)
//! 2. consumes one function id from the [`Session`]
//! 3. classifies the call form ([`classify`])
//! 4. maps every argument and the return value ([`mapping`])
//! 5. emits one [`SourceBlock`]
//!
//! Unmappable types never abort a run. They produce placeholder text marked
//! `TODO` and count towards [`Metrics::incomplete`].
//!
//! # Id Stability
//!
//! Function and type ids are positions in the runtime's invocation cache. They
//! are allocated strictly in visit order and never reused, so callers must
//! visit declarations in metadata order and persist [`Counters`] between runs.

pub mod block;
pub mod classify;
mod function;
mod gtype;
pub mod mapping;
mod names;
mod policy;
mod session;
mod vars;

pub use block::SourceBlock;
pub use classify::{classify, CallForm, Classification, Rule};
pub use function::{LookupHint, Outcome, Synthesized, Synthesizer};
pub use gtype::type_getter;
pub use names::{camel_case, constructor_name, TypeNamer};
pub use policy::Policy;
pub use session::{Counters, Metrics, Session};
pub use vars::VarRegistry;
