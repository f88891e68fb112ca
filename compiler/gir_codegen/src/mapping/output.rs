//! `out` direction: scratch slot to host value.
//!
//! Surfaced arguments are read back from the scratch array after the call.
//! Caller-allocated structs and arrays stay parameters; the callee writes into
//! storage the caller already owns.

use gir_ir::{
    ArrayKind, ArrayType, EntityKind, EntityRef, Primitive, Transfer, TypeDescriptor, TypeKind,
};

use super::{
    argument_kind, is_surfaced_out, placeholder_type, primitive_host_type, ElementForm, Gap, MapCx,
    MappedArg,
};

pub(super) fn map_out(
    cx: &mut MapCx<'_>,
    param: &str,
    ty: &TypeDescriptor,
    caller_allocates: bool,
    transfer: Transfer,
) -> MappedArg {
    if !is_surfaced_out(ty, caller_allocates) {
        return caller_allocated(cx, param, ty);
    }
    match &ty.kind {
        TypeKind::Primitive { prim } => read(
            primitive_host_type(*prim),
            format!("{}()", argument_kind(*prim)),
            matches!(prim, Primitive::UniChar),
        ),
        TypeKind::Utf8 | TypeKind::Filename => {
            // A borrowed string must be copied before the foreign side may release it.
            let take = if transfer.is_transferred() { "Take" } else { "Copy" };
            read("string", format!("String().{take}()"), false)
        }
        TypeKind::Interface(entity) => interface_out(cx, ty.pointer && !caller_allocates, entity),
        TypeKind::Array(array) => array_out(cx, param, array),
        TypeKind::Error => glib_handle_out(cx, "Error"),
        TypeKind::HashTable => glib_handle_out(cx, "HashTable"),
        TypeKind::List => glib_handle_out(cx, "List"),
        TypeKind::SList => glib_handle_out(cx, "SList"),
        TypeKind::GType => read("gi.GType", "Uint()".to_string(), true),
        TypeKind::Void if ty.pointer => read("unsafe.Pointer", "Pointer()".to_string(), false),
        TypeKind::Void => unmapped(format!("tag: {}", ty.kind)),
    }
}

fn read(host_type: &str, expr: String, needs_cast: bool) -> MappedArg {
    MappedArg {
        host_type: host_type.to_string(),
        expr,
        needs_cast,
        surfaced: true,
        ..MappedArg::default()
    }
}

fn handle(host_type: String) -> MappedArg {
    MappedArg {
        host_type,
        expr: "Pointer()".to_string(),
        field: ".P",
        surfaced: true,
        ..MappedArg::default()
    }
}

fn unmapped(detail: String) -> MappedArg {
    MappedArg {
        host_type: placeholder_type(&detail),
        expr: format!("Int()/*TODO {detail}*/"),
        surfaced: true,
        gap: Some(Gap::new(detail)),
        ..MappedArg::default()
    }
}

fn interface_out(cx: &mut MapCx<'_>, by_pointer: bool, entity: &EntityRef) -> MappedArg {
    match (entity.kind, by_pointer) {
        (
            EntityKind::Object | EntityKind::Interface | EntityKind::Struct | EntityKind::Union,
            true,
        ) => handle(cx.namer.type_name(entity)),
        (EntityKind::Enum, _) => {
            let host = cx.namer.enum_type_name(entity);
            read(&host, "Int()".to_string(), true)
        }
        (EntityKind::Flags, _) => {
            let host = cx.namer.flags_type_name(entity);
            read(&host, "Int()".to_string(), true)
        }
        (kind, _) => unmapped(format!("tag: ifc, biType: {kind}")),
    }
}

fn glib_handle_out(cx: &mut MapCx<'_>, name: &str) -> MappedArg {
    handle(cx.namer.glib_type(name))
}

fn array_out(cx: &mut MapCx<'_>, param: &str, array: &ArrayType) -> MappedArg {
    match array.kind {
        ArrayKind::C => {
            let form = ElementForm::of(&array.element);
            match form.host_type() {
                Some(host_type) if form.is_handle() => {
                    let mut mapped = handle(host_type);
                    patch_length(cx, param, array, &form, &mut mapped);
                    mapped
                }
                Some(host_type) => read(&host_type, "Pointer()".to_string(), false),
                None => unmapped(format!("array type c, elemTypeTag: {}", array.element.kind)),
            }
        }
        ArrayKind::ByteArray => glib_handle_out(cx, "ByteArray"),
        ArrayKind::Array | ArrayKind::PtrArray => {
            unmapped(format!("array type: {}", array.kind.name()))
        }
    }
}

/// Fix up the `Len` of an out array handle before returning it.
fn patch_length(
    cx: &MapCx<'_>,
    param: &str,
    array: &ArrayType,
    form: &ElementForm,
    mapped: &mut MappedArg,
) {
    if let Some(length) = array.length_arg.and_then(|index| cx.length_expr(index)) {
        mapped.pre_return.push(format!("{param}.Len = {length}"));
        return;
    }
    // Pointer arrays without a length are assumed to be zero-terminated.
    if array.zero_terminated || matches!(form, ElementForm::Pointers) {
        mapped.pre_return.push(format!("{param}.Len = -1"));
        mapped.pre_return.push(format!("{param}.SetLenZT()"));
        return;
    }
    let gap = Gap::new("array length unknown");
    mapped.pre_return.push(format!("/*TODO {gap}*/"));
    mapped.gap = Some(gap);
}

fn caller_allocated(cx: &mut MapCx<'_>, param: &str, ty: &TypeDescriptor) -> MappedArg {
    let param_kept = |host_type: String, expr: String| MappedArg {
        host_type,
        expr,
        ..MappedArg::default()
    };
    match &ty.kind {
        TypeKind::Interface(entity) if entity.kind == EntityKind::Struct => {
            param_kept(cx.namer.type_name(entity), format!("{param}.P"))
        }
        TypeKind::Array(array) if array.kind == ArrayKind::C => {
            let form = ElementForm::of(&array.element);
            match form.host_type() {
                Some(host_type) if form.is_handle() => param_kept(host_type, format!("{param}.P")),
                Some(host_type) => param_kept(host_type, param.to_string()),
                None => {
                    let detail =
                        format!("caller-allocates array type c, elemTypeTag: {}", array.element.kind);
                    MappedArg {
                        gap: Some(Gap::new(detail.clone())),
                        ..param_kept(placeholder_type(&detail), format!("{param}/*TODO*/"))
                    }
                }
            }
        }
        TypeKind::Array(array) if array.kind == ArrayKind::ByteArray => {
            param_kept(cx.namer.glib_type("ByteArray"), format!("{param}.P"))
        }
        other => {
            let detail = format!("caller-allocates: true, tag: {other}");
            MappedArg {
                gap: Some(Gap::new(detail.clone())),
                ..param_kept(placeholder_type(&detail), format!("{param}/*TODO*/"))
            }
        }
    }
}
