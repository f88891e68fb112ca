//! `in` direction: host parameter to `gi.Argument`.

use gir_ir::{
    ArrayKind, ArrayType, EntityKind, EntityRef, Primitive, Transfer, TypeDescriptor, TypeKind,
};

use super::{argument_kind, placeholder_type, primitive_host_type, ElementForm, Gap, MapCx, MappedArg};

pub(super) fn map_in(
    cx: &mut MapCx<'_>,
    param: &str,
    ty: &TypeDescriptor,
    transfer: Transfer,
) -> MappedArg {
    match &ty.kind {
        TypeKind::Primitive { prim } if !ty.pointer => {
            let kind = argument_kind(*prim);
            let expr = if matches!(prim, Primitive::UniChar) {
                format!("gi.NewUint32Argument(uint32({param}))")
            } else {
                format!("gi.New{kind}Argument({param})")
            };
            plain(primitive_host_type(*prim), expr)
        }
        TypeKind::Utf8 | TypeKind::Filename => string_in(cx, param, transfer),
        TypeKind::Interface(entity) => interface_in(cx, param, ty.pointer, entity),
        TypeKind::Array(array) => array_in(cx, param, array),
        TypeKind::Error => glib_handle_in(cx, param, "Error"),
        TypeKind::HashTable => glib_handle_in(cx, param, "HashTable"),
        TypeKind::List => glib_handle_in(cx, param, "List"),
        TypeKind::SList => glib_handle_in(cx, param, "SList"),
        TypeKind::GType => plain("gi.GType", format!("gi.NewUintArgument(uint({param}))")),
        TypeKind::Void if ty.pointer => {
            plain("unsafe.Pointer", format!("gi.NewPointerArgument({param})"))
        }
        TypeKind::Primitive { .. } | TypeKind::Void => {
            unmapped(param, format!("isPtr: {}, tag: {}", ty.pointer, ty.kind))
        }
    }
}

fn plain(host_type: &str, expr: String) -> MappedArg {
    MappedArg {
        host_type: host_type.to_string(),
        expr,
        ..MappedArg::default()
    }
}

fn unmapped(param: &str, detail: String) -> MappedArg {
    MappedArg {
        host_type: placeholder_type(&detail),
        expr: format!("gi.NewIntArgument({param})/*TODO*/"),
        gap: Some(Gap::new(detail)),
        ..MappedArg::default()
    }
}

/// Transient C copy for the call; freed afterwards unless the callee takes it.
fn string_in(cx: &mut MapCx<'_>, param: &str, transfer: Transfer) -> MappedArg {
    let c_var = cx.vars.alloc(&format!("c_{param}"));
    let post_call = if transfer.is_transferred() {
        Vec::new()
    } else {
        vec![format!("gi.Free({c_var})")]
    };
    MappedArg {
        host_type: "string".to_string(),
        pre_statements: vec![format!("{c_var} := gi.CString({param})")],
        expr: format!("gi.NewStringArgument({c_var})"),
        post_call,
        ..MappedArg::default()
    }
}

fn interface_in(cx: &mut MapCx<'_>, param: &str, pointer: bool, entity: &EntityRef) -> MappedArg {
    match (entity.kind, pointer) {
        (EntityKind::Object | EntityKind::Interface, true) => {
            // Interface-typed parameters may be nil; only non-nil values expose P_<Name>().
            let tmp = cx.vars.alloc("tmp");
            MappedArg {
                host_type: cx.namer.interface_type_name(entity),
                pre_statements: vec![
                    format!("var {tmp} unsafe.Pointer"),
                    format!("if {param} != nil {{"),
                    format!("\t{tmp} = {param}.P_{}()", entity.name),
                    "}".to_string(),
                ],
                expr: format!("gi.NewPointerArgument({tmp})"),
                ..MappedArg::default()
            }
        }
        (EntityKind::Struct | EntityKind::Union, true) => MappedArg {
            host_type: cx.namer.type_name(entity),
            expr: format!("gi.NewPointerArgument({param}.P)"),
            ..MappedArg::default()
        },
        (EntityKind::Enum, false) => MappedArg {
            host_type: cx.namer.enum_type_name(entity),
            expr: format!("gi.NewIntArgument(int({param}))"),
            ..MappedArg::default()
        },
        (EntityKind::Flags, false) => MappedArg {
            host_type: cx.namer.flags_type_name(entity),
            expr: format!("gi.NewIntArgument(int({param}))"),
            ..MappedArg::default()
        },
        (EntityKind::Callback, false) => {
            let detail = "CALLBACK".to_string();
            let prefix = cx.namer.pkg_prefix(&entity.namespace);
            MappedArg {
                host_type: placeholder_type(&detail),
                expr: format!(
                    "gi.NewPointerArgument(unsafe.Pointer({prefix}GetPointer_my{}()))",
                    entity.name
                ),
                gap: Some(Gap::new(detail)),
                ..MappedArg::default()
            }
        }
        (kind, pointer) => unmapped(param, format!("isPtr: {pointer}, tag: interface, biType: {kind}")),
    }
}

fn glib_handle_in(cx: &mut MapCx<'_>, param: &str, name: &str) -> MappedArg {
    MappedArg {
        host_type: cx.namer.glib_type(name),
        expr: format!("gi.NewPointerArgument({param}.P)"),
        ..MappedArg::default()
    }
}

fn array_in(cx: &mut MapCx<'_>, param: &str, array: &ArrayType) -> MappedArg {
    match array.kind {
        ArrayKind::C => {
            let form = ElementForm::of(&array.element);
            match form.host_type() {
                Some(host_type) if form.is_handle() => MappedArg {
                    host_type,
                    expr: format!("gi.NewPointerArgument({param}.P)"),
                    ..MappedArg::default()
                },
                Some(host_type) => MappedArg {
                    host_type,
                    expr: format!("gi.NewPointerArgument({param})"),
                    ..MappedArg::default()
                },
                None => unmapped(
                    param,
                    format!(
                        "array type c, elemTypeTag: {}, isPtr: {}",
                        array.element.kind, array.element.pointer
                    ),
                ),
            }
        }
        ArrayKind::ByteArray => glib_handle_in(cx, param, "ByteArray"),
        ArrayKind::Array | ArrayKind::PtrArray => {
            unmapped(param, format!("array type: {}", array.kind.name()))
        }
    }
}
