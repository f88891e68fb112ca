//! Return values: the call's return slot to the host result.

use gir_ir::{ArrayKind, ArrayType, EntityKind, FunctionDescriptor, Primitive, TypeKind};

use super::{argument_kind, placeholder_type, primitive_host_type, ElementForm, Gap, MapCx};

/// Marshaling plan for a non-void return value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappedReturn {
    pub host_type: String,
    /// Full read expression over the return slot (`ret.Int32()`).
    pub expr: String,
    /// Field of the result the expression assigns (`.P`).
    pub field: &'static str,
    /// The result is a zero-terminated handle needing `SetLenZT()`.
    pub zero_terminated: bool,
    pub gap: Option<Gap>,
}

impl MappedReturn {
    fn value(host_type: impl Into<String>, expr: String) -> Self {
        Self {
            host_type: host_type.into(),
            expr,
            field: "",
            zero_terminated: false,
            gap: None,
        }
    }

    fn handle(host_type: String, ret: &str) -> Self {
        Self {
            field: ".P",
            ..Self::value(host_type, format!("{ret}.Pointer()"))
        }
    }

    fn unmapped(ret: &str, detail: String) -> Self {
        Self {
            host_type: placeholder_type(&detail),
            expr: format!("{ret}.Int()/*TODO*/"),
            field: "",
            zero_terminated: false,
            gap: Some(Gap::new(detail)),
        }
    }
}

/// Map the return type of `func`, read from the slot variable `ret`.
///
/// Constructors return their container type rather than the declared one
/// (metadata often declares a base class).
pub fn map_return(cx: &mut MapCx<'_>, ret: &str, func: &FunctionDescriptor) -> MappedReturn {
    let ty = &func.return_type;
    match &ty.kind {
        TypeKind::Primitive { prim: Primitive::UniChar } if !ty.pointer => {
            MappedReturn::value("rune", format!("rune({ret}.Uint32())"))
        }
        TypeKind::Primitive { prim } if !ty.pointer => MappedReturn::value(
            primitive_host_type(*prim),
            format!("{ret}.{}()", argument_kind(*prim)),
        ),
        TypeKind::Utf8 | TypeKind::Filename => {
            let take = if func.caller_owns.is_transferred() { "Take" } else { "Copy" };
            MappedReturn::value("string", format!("{ret}.String().{take}()"))
        }
        TypeKind::Interface(entity) => match (entity.kind, ty.pointer) {
            (
                EntityKind::Object | EntityKind::Interface | EntityKind::Struct | EntityKind::Union,
                true,
            ) => {
                let target = match &func.container {
                    Some(container) if func.is_constructor() => container,
                    _ => entity,
                };
                MappedReturn::handle(cx.namer.type_name(target), ret)
            }
            (EntityKind::Enum, false) => {
                let host = cx.namer.enum_type_name(entity);
                let expr = format!("{host}({ret}.Int())");
                MappedReturn::value(host, expr)
            }
            (EntityKind::Flags, false) => {
                let host = cx.namer.flags_type_name(entity);
                let expr = format!("{host}({ret}.Int())");
                MappedReturn::value(host, expr)
            }
            (kind, pointer) => MappedReturn::unmapped(
                ret,
                format!("isPtr: {pointer}, tag: interface, biType: {kind}"),
            ),
        },
        TypeKind::Array(array) => array_return(cx, ret, array),
        TypeKind::Error => MappedReturn::handle(cx.namer.glib_type("Error"), ret),
        TypeKind::HashTable => MappedReturn::handle(cx.namer.glib_type("HashTable"), ret),
        TypeKind::List => MappedReturn::handle(cx.namer.glib_type("List"), ret),
        TypeKind::SList => MappedReturn::handle(cx.namer.glib_type("SList"), ret),
        TypeKind::GType => MappedReturn::value("gi.GType", format!("gi.GType({ret}.Uint())")),
        TypeKind::Void if ty.pointer => {
            MappedReturn::value("unsafe.Pointer", format!("{ret}.Pointer()"))
        }
        TypeKind::Primitive { .. } | TypeKind::Void => {
            MappedReturn::unmapped(ret, format!("isPtr: {}, tag: {}", ty.pointer, ty.kind))
        }
    }
}

fn array_return(cx: &mut MapCx<'_>, ret: &str, array: &ArrayType) -> MappedReturn {
    match array.kind {
        ArrayKind::C => {
            let form = ElementForm::of(&array.element);
            match form.host_type() {
                Some(host_type) if form.is_handle() => handle_with_length(cx, ret, array, &form, host_type),
                Some(host_type) => MappedReturn::value(host_type, format!("{ret}.Pointer()")),
                None => MappedReturn::unmapped(
                    ret,
                    format!(
                        "array type c, elemTypeTag: {}, isPtr: {}",
                        array.element.kind, array.element.pointer
                    ),
                ),
            }
        }
        ArrayKind::ByteArray => MappedReturn::handle(cx.namer.glib_type("ByteArray"), ret),
        ArrayKind::Array | ArrayKind::PtrArray => MappedReturn::unmapped(
            ret,
            format!("array type: {}, isZeroTerm: {}", array.kind.name(), array.zero_terminated),
        ),
    }
}

/// `gi.<Kind>Array{P: ret.Pointer(), Len: ...}` with the length taken from the
/// linked argument, or a zero-terminated marker.
fn handle_with_length(
    cx: &MapCx<'_>,
    ret: &str,
    array: &ArrayType,
    form: &ElementForm,
    host_type: String,
) -> MappedReturn {
    let linked = array.length_arg.and_then(|index| cx.length_expr(index));

    let (len, zero_terminated, gap) = match linked {
        Some(len) => (len, false, None),
        None if array.zero_terminated || matches!(form, ElementForm::Pointers) => {
            ("-1".to_string(), true, None)
        }
        None => {
            let gap = Gap::new("array length unknown");
            (format!("-1/*TODO {gap}*/"), false, Some(gap))
        }
    };
    let expr = format!("{host_type}{{P: {ret}.Pointer(), Len: {len}}}");
    MappedReturn {
        host_type,
        expr,
        field: "",
        zero_terminated,
        gap,
    }
}
