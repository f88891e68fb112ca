//! Type-id getters.
//!
//! `func ButtonGetType() gi.GType` for every registered type entity. Each
//! getter consumes one type id, which indexes the runtime's type cache the
//! same way function ids index the invocation cache.

use gir_ir::TypeEntity;
use tracing::trace;

use crate::block::SourceBlock;
use crate::session::Session;

/// Synthesize the getter for `entity`, or `None` when it has no type-init symbol.
pub fn type_getter(session: &mut Session, entity: &TypeEntity) -> Option<SourceBlock> {
    if !entity.is_registered_type() {
        return None;
    }
    let id = session.next_type_id();
    trace!(id, entity = %entity.name, "type getter");
    session.record_type_getter();

    let mut block = SourceBlock::new();
    block.line(format!("func {}GetType() gi.GType {{", entity.name));
    block.with_indent(|b| {
        b.line(format!("ret := _I.GetGType({id}, {:?})", entity.name));
        b.line("return ret");
    });
    block.line("}");
    Some(block)
}
