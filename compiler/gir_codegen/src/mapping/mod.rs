//! Type/ABI Mapping
//!
//! Pure mapping from a foreign type (plus direction, ownership transfer and
//! caller-allocation) to the host type and the marshaling fragments the
//! synthesizer stitches into a wrapper:
//!
//! - [`map_argument`]: one declared argument, dispatched on direction
//! - [`map_return`]: the function's return value
//! - [`map_length_from_handle`]: an implicit length argument derived from its array
//!
//! Every match over [`TypeKind`] is exhaustive. Combinations that have no host
//! rendering never fail: they produce a placeholder type/expression carrying
//! the offending tag values and a [`Gap`] the caller counts.
//!
//! Mapping reads and writes only through [`MapCx`]: the namer records imports
//! for foreign type names, the variable registry mints temporaries and
//! recalls parameter names, and the handle-length table resolves elided
//! length arguments.

mod input;
mod output;
mod ret;

use std::fmt;

use gir_ir::{
    ArgumentDescriptor, ArrayKind, Direction, EntityKind, Primitive, TypeDescriptor, TypeKind,
};

use rustc_hash::FxHashMap;

use crate::names::TypeNamer;
use crate::vars::VarRegistry;

pub use ret::{map_return, MappedReturn};

/// Elided length arguments, keyed by argument index, mapped to the array
/// handle parameter that carries their value.
pub type HandleLengths = FxHashMap<usize, String>;

/// Mutable context shared by all mapping calls of one wrapper.
pub struct MapCx<'a> {
    pub namer: &'a mut TypeNamer,
    pub vars: &'a mut VarRegistry,
    pub handle_lengths: &'a HandleLengths,
}

impl MapCx<'_> {
    /// Host `int` expression for the length argument at `index`.
    ///
    /// An elided length reads its handle's `Len`; any other length is the
    /// local bound to that argument.
    pub(crate) fn length_expr(&self, index: usize) -> Option<String> {
        if let Some(handle) = self.handle_lengths.get(&index) {
            return Some(format!("{handle}.Len"));
        }
        self.vars.param(index).map(|name| format!("int({name})"))
    }
}

/// A type combination the mapping engine could not render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gap {
    pub detail: String,
}

impl Gap {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

/// Marshaling plan for one argument.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MappedArg {
    /// Host type of the parameter or result.
    pub host_type: String,
    /// Statements before argument construction.
    pub pre_statements: Vec<String>,
    /// `in`: the `gi.Argument` constructor expression.
    /// `out` surfaced: the scratch-slot reader (`Int32()`).
    /// `out` kept as parameter: the pointer handed to the callee.
    pub expr: String,
    /// Statements after the call (freeing transient buffers).
    pub post_call: Vec<String>,
    /// Statements just before `return` (length fixups).
    pub pre_return: Vec<String>,
    /// Field of the host value the read expression assigns (`.P`).
    pub field: &'static str,
    /// The read expression needs a conversion to `host_type`.
    pub needs_cast: bool,
    /// The value occupies a scratch slot and is returned to the caller.
    pub surfaced: bool,
    pub gap: Option<Gap>,
}

/// Map one declared argument bound to the parameter name `param`.
pub fn map_argument(cx: &mut MapCx<'_>, param: &str, arg: &ArgumentDescriptor) -> MappedArg {
    match arg.direction {
        Direction::In => input::map_in(cx, param, &arg.ty, arg.transfer),
        Direction::Out => output::map_out(cx, param, &arg.ty, arg.caller_allocates, arg.transfer),
        Direction::InOut => map_inout(&arg.ty),
    }
}

/// Inout arguments have no marshaling yet: a placeholder parameter that still
/// owns one scratch slot.
fn map_inout(ty: &TypeDescriptor) -> MappedArg {
    let gap = Gap::new(format!("dir: inout, tag: {}", ty.kind));
    MappedArg {
        host_type: placeholder_type(&gap.detail),
        surfaced: true,
        gap: Some(gap),
        ..MappedArg::default()
    }
}

/// Whether an `out` argument becomes an extra return value.
///
/// Caller-allocated structs and arrays stay ordinary parameters.
pub fn is_surfaced_out(ty: &TypeDescriptor, caller_allocates: bool) -> bool {
    if !caller_allocates {
        return true;
    }
    match &ty.kind {
        TypeKind::Interface(entity) => !matches!(entity.kind, EntityKind::Struct),
        TypeKind::Array(_) => false,
        _ => true,
    }
}

/// Whether the host value of `ty` is a handle carrying its own `Len`.
pub fn exposes_length(ty: &TypeDescriptor) -> bool {
    match &ty.kind {
        TypeKind::Array(array) => {
            array.kind == ArrayKind::C && ElementForm::of(&array.element).is_handle()
        }
        _ => false,
    }
}

/// Argument expression for an implicit `in` length taken from its array handle.
///
/// `gi.NewInt32Argument(int32(data.Len))`
pub fn map_length_from_handle(length_ty: &TypeDescriptor, handle: &str) -> (String, Option<Gap>) {
    match &length_ty.kind {
        TypeKind::Primitive { prim } if !length_ty.pointer && prim.is_integer() => {
            let kind = argument_kind(*prim);
            let host = primitive_host_type(*prim);
            (format!("gi.New{kind}Argument({host}({handle}.Len))"), None)
        }
        other => {
            let gap = Gap::new(format!("array length tag: {other}, isPtr: {}", length_ty.pointer));
            (
                format!("gi.NewIntArgument({handle}.Len)/*TODO {}*/", gap.detail),
                Some(gap),
            )
        }
    }
}

/// Host spelling of a primitive tag.
pub fn primitive_host_type(prim: Primitive) -> &'static str {
    match prim {
        Primitive::Boolean => "bool",
        Primitive::Int8 => "int8",
        Primitive::UInt8 => "uint8",
        Primitive::Int16 => "int16",
        Primitive::UInt16 => "uint16",
        Primitive::Int32 => "int32",
        Primitive::UInt32 => "uint32",
        Primitive::Int64 => "int64",
        Primitive::UInt64 => "uint64",
        Primitive::Float => "float32",
        Primitive::Double => "float64",
        Primitive::UniChar => "rune",
    }
}

/// `gi.Argument` accessor kind for a primitive (`gi.New<Kind>Argument`, `a.<Kind>()`).
pub fn argument_kind(prim: Primitive) -> &'static str {
    match prim {
        Primitive::Boolean => "Bool",
        Primitive::Int8 => "Int8",
        Primitive::UInt8 => "Uint8",
        Primitive::Int16 => "Int16",
        Primitive::UInt16 => "Uint16",
        Primitive::Int32 => "Int32",
        Primitive::UInt32 | Primitive::UniChar => "Uint32",
        Primitive::Int64 => "Int64",
        Primitive::UInt64 => "Uint64",
        Primitive::Float => "Float",
        Primitive::Double => "Double",
    }
}

/// `int/*TODO_TYPE <detail>*/`
pub(crate) fn placeholder_type(detail: &str) -> String {
    format!("int/*TODO_TYPE {detail}*/")
}

/// How the elements of a plain C array are exposed.
enum ElementForm {
    /// Typed slice handle, `gi.<Kind>Array`.
    Typed(&'static str),
    /// `gi.CStrArray`.
    Strings,
    /// `gi.PointerArray`.
    Pointers,
    /// Array of by-value structs: only a raw pointer is exposed.
    Opaque,
    Unsupported,
}

impl ElementForm {
    fn of(element: &TypeDescriptor) -> Self {
        match &element.kind {
            TypeKind::Primitive { prim } if !element.pointer => Self::Typed(argument_kind(*prim)),
            TypeKind::GType if !element.pointer => Self::Typed("GType"),
            TypeKind::Utf8 | TypeKind::Filename => Self::Strings,
            TypeKind::Interface(_) if element.pointer => Self::Pointers,
            TypeKind::Interface(_) => Self::Opaque,
            TypeKind::Primitive { .. }
            | TypeKind::GType
            | TypeKind::Array(_)
            | TypeKind::Error
            | TypeKind::HashTable
            | TypeKind::List
            | TypeKind::SList
            | TypeKind::Void => Self::Unsupported,
        }
    }

    /// Host handle type; `None` for unsupported elements.
    fn host_type(&self) -> Option<String> {
        match self {
            Self::Typed(kind) => Some(format!("gi.{kind}Array")),
            Self::Strings => Some("gi.CStrArray".to_string()),
            Self::Pointers => Some("gi.PointerArray".to_string()),
            Self::Opaque => Some("unsafe.Pointer".to_string()),
            Self::Unsupported => None,
        }
    }

    /// Whether the host value is a `{P, Len}` handle.
    fn is_handle(&self) -> bool {
        matches!(self, Self::Typed(_) | Self::Strings | Self::Pointers)
    }
}

#[cfg(test)]
mod tests;
