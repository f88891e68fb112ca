use super::*;
use crate::names::TypeNamer;
use crate::vars::VarRegistry;
use gir_ir::{ArrayKind, ArrayType, EntityRef, FunctionDescriptor, FunctionFlags, Transfer};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

struct Fixture {
    namer: TypeNamer,
    vars: VarRegistry,
    handle_lengths: HandleLengths,
}

impl Fixture {
    fn new() -> Self {
        Self {
            namer: TypeNamer::new(
                "Gtk",
                ["GLib-2.0", "GObject-2.0", "Gdk-3.0"].map(String::from),
            ),
            vars: VarRegistry::new(),
            handle_lengths: HandleLengths::default(),
        }
    }

    fn cx(&mut self) -> MapCx<'_> {
        MapCx {
            namer: &mut self.namer,
            vars: &mut self.vars,
            handle_lengths: &self.handle_lengths,
        }
    }

    fn arg(&mut self, param: &str, arg: &ArgumentDescriptor) -> MappedArg {
        map_argument(&mut self.cx(), param, arg)
    }

    fn ret(&mut self, func: &FunctionDescriptor) -> MappedReturn {
        map_return(&mut self.cx(), "ret", func)
    }
}

fn returning(ty: TypeDescriptor, transfer: Transfer) -> FunctionDescriptor {
    FunctionDescriptor::new("f", "f").returning(ty, transfer)
}

fn primitive() -> impl Strategy<Value = Primitive> {
    proptest::sample::select(Primitive::ALL.to_vec())
}

proptest! {
    #[test]
    fn primitive_host_types_agree(prim in primitive()) {
        let mut fx = Fixture::new();
        let ty = TypeDescriptor::primitive(prim);
        let input = fx.arg("x", &ArgumentDescriptor::input("x", ty.clone()));
        let output = fx.arg("y", &ArgumentDescriptor::output("y", ty.clone()));
        let ret = fx.ret(&returning(ty, Transfer::Nothing));

        prop_assert_eq!(&input.host_type, &output.host_type);
        prop_assert_eq!(&input.host_type, &ret.host_type);
        prop_assert!(input.gap.is_none());
        prop_assert!(output.gap.is_none());
        prop_assert!(ret.gap.is_none());
        prop_assert!(output.surfaced);
    }
}

#[test]
fn primitive_marshaling() {
    let mut fx = Fixture::new();
    let int = fx.arg("n", &ArgumentDescriptor::input("n", TypeDescriptor::primitive(Primitive::Int32)));
    assert_eq!(int.expr, "gi.NewInt32Argument(n)");

    let ch = fx.arg("c", &ArgumentDescriptor::input("c", TypeDescriptor::primitive(Primitive::UniChar)));
    assert_eq!(ch.host_type, "rune");
    assert_eq!(ch.expr, "gi.NewUint32Argument(uint32(c))");

    let out = fx.arg("c", &ArgumentDescriptor::output("c", TypeDescriptor::primitive(Primitive::UniChar)));
    assert_eq!(out.expr, "Uint32()");
    assert!(out.needs_cast);

    let ret = fx.ret(&returning(TypeDescriptor::primitive(Primitive::Double), Transfer::Nothing));
    assert_eq!(ret.host_type, "float64");
    assert_eq!(ret.expr, "ret.Double()");
}

#[test]
fn string_in_frees_unless_transferred() {
    let mut fx = Fixture::new();
    let borrowed = fx.arg("label", &ArgumentDescriptor::input("label", TypeDescriptor::utf8()));
    assert_eq!(borrowed.host_type, "string");
    assert_eq!(borrowed.pre_statements, vec!["c_label := gi.CString(label)"]);
    assert_eq!(borrowed.expr, "gi.NewStringArgument(c_label)");
    assert_eq!(borrowed.post_call, vec!["gi.Free(c_label)"]);

    let given = fx.arg(
        "label",
        &ArgumentDescriptor::input("label", TypeDescriptor::utf8()).with_transfer(Transfer::Everything),
    );
    assert_eq!(given.pre_statements, vec!["c_label1 := gi.CString(label)"]);
    assert!(given.post_call.is_empty());
}

#[test]
fn string_out_copies_only_when_borrowed() {
    let mut fx = Fixture::new();
    let borrowed = fx.arg("s", &ArgumentDescriptor::output("s", TypeDescriptor::utf8()));
    assert_eq!(borrowed.expr, "String().Copy()");

    for transfer in [Transfer::Container, Transfer::Everything] {
        let owned = fx.arg(
            "s",
            &ArgumentDescriptor::output("s", TypeDescriptor::utf8()).with_transfer(transfer),
        );
        assert_eq!(owned.expr, "String().Take()");
    }

    let ret = fx.ret(&returning(TypeDescriptor::utf8(), Transfer::Nothing));
    assert_eq!(ret.expr, "ret.String().Copy()");
    let ret = fx.ret(&returning(TypeDescriptor::utf8(), Transfer::Everything));
    assert_eq!(ret.expr, "ret.String().Take()");
}

#[test]
fn object_in_guards_nil() {
    let mut fx = Fixture::new();
    let ty = TypeDescriptor::entity_ptr("Gdk", "Window", EntityKind::Object);
    let mapped = fx.arg("window", &ArgumentDescriptor::input("window", ty));
    assert_eq!(mapped.host_type, "gdk.IWindow");
    assert_eq!(
        mapped.pre_statements,
        vec![
            "var tmp unsafe.Pointer",
            "if window != nil {",
            "\ttmp = window.P_Window()",
            "}",
        ]
    );
    assert_eq!(mapped.expr, "gi.NewPointerArgument(tmp)");
    assert!(fx.namer.imports().contains("gdk-3.0"));
}

#[test]
fn struct_enum_flags_in() {
    let mut fx = Fixture::new();
    let rect = fx.arg(
        "rect",
        &ArgumentDescriptor::input("rect", TypeDescriptor::entity_ptr("Gdk", "Rectangle", EntityKind::Struct)),
    );
    assert_eq!(rect.host_type, "gdk.Rectangle");
    assert_eq!(rect.expr, "gi.NewPointerArgument(rect.P)");

    let align = fx.arg(
        "align",
        &ArgumentDescriptor::input("align", TypeDescriptor::entity("Gtk", "Align", EntityKind::Enum)),
    );
    assert_eq!(align.host_type, "AlignEnum");
    assert_eq!(align.expr, "gi.NewIntArgument(int(align))");

    let flags = fx.arg(
        "mask",
        &ArgumentDescriptor::output("mask", TypeDescriptor::entity("Gdk", "EventMask", EntityKind::Flags)),
    );
    assert_eq!(flags.host_type, "gdk.EventMaskFlags");
    assert_eq!(flags.expr, "Int()");
    assert!(flags.needs_cast);
}

#[test]
fn callback_resolves_thunk_with_placeholder_type() {
    let mut fx = Fixture::new();
    let ty = TypeDescriptor::entity("GLib", "SourceFunc", EntityKind::Callback);
    let mapped = fx.arg("func", &ArgumentDescriptor::input("func", ty));
    assert_eq!(mapped.host_type, "int/*TODO_TYPE CALLBACK*/");
    assert_eq!(
        mapped.expr,
        "gi.NewPointerArgument(unsafe.Pointer(g.GetPointer_mySourceFunc()))"
    );
    assert!(mapped.gap.is_some());
}

#[test]
fn glib_handles() {
    let mut fx = Fixture::new();
    let table = fx.arg("table", &ArgumentDescriptor::input("table", TypeDescriptor::new(TypeKind::HashTable).pointer()));
    assert_eq!(table.host_type, "g.HashTable");
    assert_eq!(table.expr, "gi.NewPointerArgument(table.P)");

    let list = fx.ret(&returning(TypeDescriptor::new(TypeKind::List).pointer(), Transfer::Container));
    assert_eq!(list.host_type, "g.List");
    assert_eq!(list.expr, "ret.Pointer()");
    assert_eq!(list.field, ".P");
    assert!(fx.namer.imports().contains("glib-2.0"));
}

#[test]
fn gtype_and_void_pointer() {
    let mut fx = Fixture::new();
    let gtype = fx.arg("t", &ArgumentDescriptor::input("t", TypeDescriptor::new(TypeKind::GType)));
    assert_eq!(gtype.host_type, "gi.GType");
    assert_eq!(gtype.expr, "gi.NewUintArgument(uint(t))");

    let data = fx.arg("data", &ArgumentDescriptor::input("data", TypeDescriptor::void().pointer()));
    assert_eq!(data.host_type, "unsafe.Pointer");
    assert_eq!(data.expr, "gi.NewPointerArgument(data)");

    let ret = fx.ret(&returning(TypeDescriptor::new(TypeKind::GType), Transfer::Nothing));
    assert_eq!(ret.expr, "gi.GType(ret.Uint())");
}

#[test]
fn caller_allocated_out_struct_stays_parameter() {
    let mut fx = Fixture::new();
    let arg = ArgumentDescriptor::output("iter", TypeDescriptor::entity_ptr("Gtk", "TreeIter", EntityKind::Struct))
        .caller_allocated();
    let mapped = fx.arg("iter", &arg);
    assert!(!mapped.surfaced);
    assert_eq!(mapped.host_type, "TreeIter");
    assert_eq!(mapped.expr, "iter.P");
}

#[test]
fn caller_allocated_out_arrays_stay_parameters() {
    let mut fx = Fixture::new();
    let bytes = TypeDescriptor::c_array(TypeDescriptor::primitive(Primitive::UInt8), Some(1), false);
    let rects = TypeDescriptor::c_array(TypeDescriptor::entity("Gdk", "Rectangle", EntityKind::Struct), None, false);
    let errors = TypeDescriptor::c_array(TypeDescriptor::new(TypeKind::Error), None, false);
    let garray = TypeDescriptor::new(TypeKind::Array(ArrayType {
        kind: ArrayKind::Array,
        element: Box::new(TypeDescriptor::primitive(Primitive::Int32)),
        zero_terminated: false,
        length_arg: None,
    }))
    .pointer();

    // (param, type, host type, pointer expression, degraded)
    let cases = [
        ("buffer", bytes, "gi.Uint8Array", "buffer.P", false),
        ("rects", rects, "unsafe.Pointer", "rects", false),
        (
            "errors",
            errors,
            "int/*TODO_TYPE caller-allocates array type c, elemTypeTag: error*/",
            "errors/*TODO*/",
            true,
        ),
        (
            "values",
            garray,
            "int/*TODO_TYPE caller-allocates: true, tag: array*/",
            "values/*TODO*/",
            true,
        ),
    ];
    for (param, ty, host_type, expr, degraded) in cases {
        let mapped = fx.arg(param, &ArgumentDescriptor::output(param, ty).caller_allocated());
        assert!(!mapped.surfaced, "{param} surfaced");
        assert_eq!(mapped.host_type, host_type);
        assert_eq!(mapped.expr, expr);
        assert_eq!(mapped.gap.is_some(), degraded, "{param} gap");
        assert!(mapped.pre_return.is_empty());
    }
}

#[test]
fn caller_allocated_object_out_degrades() {
    let mut fx = Fixture::new();
    let arg = ArgumentDescriptor::output("widget", TypeDescriptor::entity_ptr("Gtk", "Widget", EntityKind::Object))
        .caller_allocated();
    let mapped = fx.arg("widget", &arg);
    assert!(mapped.surfaced);
    assert_eq!(mapped.host_type, "int/*TODO_TYPE tag: ifc, biType: object*/");
    assert_eq!(mapped.expr, "Int()/*TODO tag: ifc, biType: object*/");
    assert_eq!(mapped.gap, Some(Gap::new("tag: ifc, biType: object")));
}

#[test]
fn byte_arrays_are_glib_handles() {
    let mut fx = Fixture::new();
    let bytes = TypeDescriptor::new(TypeKind::Array(ArrayType {
        kind: ArrayKind::ByteArray,
        element: Box::new(TypeDescriptor::primitive(Primitive::UInt8)),
        zero_terminated: false,
        length_arg: None,
    }))
    .pointer();

    let input = fx.arg("data", &ArgumentDescriptor::input("data", bytes.clone()));
    assert_eq!(input.host_type, "g.ByteArray");
    assert_eq!(input.expr, "gi.NewPointerArgument(data.P)");

    let output = fx.arg("data", &ArgumentDescriptor::output("data", bytes.clone()));
    assert_eq!(output.host_type, "g.ByteArray");
    assert_eq!((output.expr.as_str(), output.field), ("Pointer()", ".P"));
    assert!(output.surfaced);

    let ret = fx.ret(&returning(bytes, Transfer::Everything));
    assert_eq!(ret.host_type, "g.ByteArray");
    assert_eq!((ret.expr.as_str(), ret.field), ("ret.Pointer()", ".P"));
    assert!(ret.gap.is_none());
    assert!(fx.namer.imports().contains("glib-2.0"));
}

#[test]
fn by_value_struct_elements_fall_back_to_raw_pointer() {
    let mut fx = Fixture::new();
    let rects = TypeDescriptor::c_array(TypeDescriptor::entity("Gdk", "Rectangle", EntityKind::Struct), None, false);

    let input = fx.arg("rects", &ArgumentDescriptor::input("rects", rects.clone()));
    assert_eq!(input.host_type, "unsafe.Pointer");
    assert_eq!(input.expr, "gi.NewPointerArgument(rects)");

    let output = fx.arg("rects", &ArgumentDescriptor::output("rects", rects.clone()));
    assert_eq!(output.host_type, "unsafe.Pointer");
    assert_eq!(output.expr, "Pointer()");
    assert!(output.pre_return.is_empty());

    let ret = fx.ret(&returning(rects, Transfer::Container));
    assert_eq!(ret.host_type, "unsafe.Pointer");
    assert_eq!(ret.expr, "ret.Pointer()");
    assert!(!ret.zero_terminated);
    assert!(input.gap.is_none() && output.gap.is_none() && ret.gap.is_none());
}

#[test]
fn error_tag_in_every_direction() {
    let mut fx = Fixture::new();
    let error = TypeDescriptor::new(TypeKind::Error).pointer();

    let input = fx.arg("error", &ArgumentDescriptor::input("error", error.clone()));
    assert_eq!(input.host_type, "g.Error");
    assert_eq!(input.expr, "gi.NewPointerArgument(error.P)");

    let output = fx.arg("error", &ArgumentDescriptor::output("error", error.clone()));
    assert_eq!(output.host_type, "g.Error");
    assert_eq!((output.expr.as_str(), output.field), ("Pointer()", ".P"));
    assert!(output.surfaced);

    let ret = fx.ret(&returning(error, Transfer::Everything));
    assert_eq!(ret.host_type, "g.Error");
    assert_eq!((ret.expr.as_str(), ret.field), ("ret.Pointer()", ".P"));
}

#[test]
fn handle_lengths_override_parameter_names() {
    let mut fx = Fixture::new();
    fx.vars.register_param(0, "points");
    fx.vars.register_param(1, "n_points");
    fx.handle_lengths.insert(1, "points".to_string());
    let ty = TypeDescriptor::c_array(TypeDescriptor::primitive(Primitive::Double), Some(1), false);

    let ret = fx.ret(&returning(ty.clone(), Transfer::Everything));
    assert_eq!(ret.expr, "gi.DoubleArray{P: ret.Pointer(), Len: points.Len}");

    let out = fx.arg("dst", &ArgumentDescriptor::output("dst", ty));
    assert_eq!(out.pre_return, vec!["dst.Len = points.Len"]);
}

#[test]
fn out_array_patches_linked_length() {
    let mut fx = Fixture::new();
    fx.vars.register_param(0, "points");
    fx.vars.register_param(1, "n_points");
    let ty = TypeDescriptor::c_array(TypeDescriptor::primitive(Primitive::Double), Some(1), false);
    let mapped = fx.arg("points", &ArgumentDescriptor::output("points", ty));
    assert_eq!(mapped.host_type, "gi.DoubleArray");
    assert_eq!(mapped.field, ".P");
    assert_eq!(mapped.pre_return, vec!["points.Len = int(n_points)"]);
}

#[test]
fn out_pointer_array_without_length_is_zero_terminated() {
    let mut fx = Fixture::new();
    let elem = TypeDescriptor::entity_ptr("Gtk", "Widget", EntityKind::Object);
    let ty = TypeDescriptor::c_array(elem, None, false);
    let mapped = fx.arg("children", &ArgumentDescriptor::output("children", ty));
    assert_eq!(mapped.host_type, "gi.PointerArray");
    assert_eq!(mapped.pre_return, vec!["children.Len = -1", "children.SetLenZT()"]);
    assert!(mapped.gap.is_none());
}

#[test]
fn return_arrays() {
    let mut fx = Fixture::new();
    let strv = TypeDescriptor::c_array(TypeDescriptor::utf8(), None, true);
    let mapped = fx.ret(&returning(strv, Transfer::Everything));
    assert_eq!(mapped.host_type, "gi.CStrArray");
    assert_eq!(mapped.expr, "gi.CStrArray{P: ret.Pointer(), Len: -1}");
    assert!(mapped.zero_terminated);

    fx.vars.register_param(0, "length");
    let bytes = TypeDescriptor::c_array(TypeDescriptor::primitive(Primitive::UInt8), Some(0), false);
    let mapped = fx.ret(&returning(bytes, Transfer::Everything));
    assert_eq!(mapped.expr, "gi.Uint8Array{P: ret.Pointer(), Len: int(length)}");
    assert!(!mapped.zero_terminated);

    let unknown = TypeDescriptor::c_array(TypeDescriptor::primitive(Primitive::Int32), None, false);
    let mapped = fx.ret(&returning(unknown, Transfer::Nothing));
    assert!(mapped.gap.is_some());
}

#[test]
fn garray_degrades_to_placeholder() {
    let mut fx = Fixture::new();
    let ty = TypeDescriptor::new(TypeKind::Array(ArrayType {
        kind: ArrayKind::Array,
        element: Box::new(TypeDescriptor::primitive(Primitive::Int32)),
        zero_terminated: false,
        length_arg: None,
    }))
    .pointer();
    let mapped = fx.arg("arr", &ArgumentDescriptor::input("arr", ty));
    assert_eq!(mapped.host_type, "int/*TODO_TYPE array type: array*/");
    assert_eq!(mapped.expr, "gi.NewIntArgument(arr)/*TODO*/");
    assert_eq!(mapped.gap, Some(Gap::new("array type: array")));
}

#[test]
fn constructor_returns_container_type() {
    let mut fx = Fixture::new();
    let func = FunctionDescriptor::new("gtk_button_new", "new")
        .with_container(EntityRef::new("Gtk", "Button", EntityKind::Object))
        .with_flags(FunctionFlags::IS_CONSTRUCTOR)
        .returning(TypeDescriptor::entity_ptr("Gtk", "Widget", EntityKind::Object), Transfer::Nothing);
    let mapped = fx.ret(&func);
    assert_eq!(mapped.host_type, "Button");
    assert_eq!(mapped.expr, "ret.Pointer()");
    assert_eq!(mapped.field, ".P");
}

#[test]
fn inout_is_a_visible_gap() {
    let mut fx = Fixture::new();
    let arg = ArgumentDescriptor::input("n", TypeDescriptor::primitive(Primitive::Int32))
        .with_direction(Direction::InOut);
    let mapped = fx.arg("n", &arg);
    assert!(mapped.surfaced);
    assert!(mapped.host_type.contains("TODO_TYPE"));
    assert!(mapped.gap.is_some());
}

#[test]
fn length_from_handle() {
    let (expr, gap) = map_length_from_handle(&TypeDescriptor::primitive(Primitive::Int32), "data");
    assert_eq!(expr, "gi.NewInt32Argument(int32(data.Len))");
    assert!(gap.is_none());

    let (expr, gap) = map_length_from_handle(&TypeDescriptor::primitive(Primitive::UInt64), "data");
    assert_eq!(expr, "gi.NewUint64Argument(uint64(data.Len))");
    assert!(gap.is_none());

    let (_, gap) = map_length_from_handle(&TypeDescriptor::utf8(), "data");
    assert!(gap.is_some());
}
