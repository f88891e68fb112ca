//! Function Signature Synthesis
//!
//! Turns one [`FunctionDescriptor`] into one wrapper block. Synthesis runs in
//! two passes over a [`Frame`]:
//!
//! 1. **Assembly** classifies the call form, binds parameter names, and maps
//!    every argument and the return value into statement lists.
//! 2. **Emission** writes those lists in a fixed order: lookup, scratch array,
//!    argument preparation, argument construction, call, cleanup, out
//!    extraction, result extraction, pre-return fixups, return.
//!
//! Each synthesized function consumes exactly one function id from the
//! [`Session`]; blocked functions consume none.

use gir_ir::{Direction, EntityKind, EntityRef, FunctionDescriptor, TypeDescriptor};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::block::SourceBlock;
use crate::classify::{classify, CallForm, Classification};
use crate::mapping::{
    exposes_length, is_surfaced_out, map_argument, map_length_from_handle, map_return, Gap,
    HandleLengths, MapCx,
};
use crate::names::{camel_case, constructor_name, static_member_name, TypeNamer};
use crate::policy::Policy;
use crate::session::Session;
use crate::vars::VarRegistry;

/// Declaration indices used by the runtime to find the callable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupHint {
    /// Index of the function (or its container) in the namespace.
    pub lv1: Option<usize>,
    /// Index of the member within its container.
    pub lv2: Option<usize>,
}

impl LookupHint {
    pub fn free(index: usize) -> Self {
        Self {
            lv1: Some(index),
            lv2: None,
        }
    }

    pub fn member(container_index: usize, member_index: usize) -> Self {
        Self {
            lv1: Some(container_index),
            lv2: Some(member_index),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Generated { id: u32, incomplete: bool },
    Skipped,
}

/// One synthesized block and what happened to produce it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Synthesized {
    pub outcome: Outcome,
    pub block: SourceBlock,
}

/// Who supplies the value of an implicit array length argument.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LengthOwner {
    /// A parameter handle that carries `Len`.
    Handle(usize),
    /// An array the call produces (surfaced out argument or return value).
    Produced,
}

/// Synthesizes wrappers for one namespace.
pub struct Synthesizer<'a> {
    namer: &'a mut TypeNamer,
    policy: &'a Policy,
    session: &'a mut Session,
}

impl<'a> Synthesizer<'a> {
    pub fn new(namer: &'a mut TypeNamer, policy: &'a Policy, session: &'a mut Session) -> Self {
        Self {
            namer,
            policy,
            session,
        }
    }

    pub fn session(&mut self) -> &mut Session {
        &mut *self.session
    }

    /// Synthesize the wrapper for `func`.
    #[tracing::instrument(level = "debug", skip_all, fields(symbol = %func.symbol))]
    pub fn synthesize(&mut self, func: &FunctionDescriptor, hint: LookupHint) -> Synthesized {
        let qualified = func.qualified_name();
        if self.policy.is_blocked(&qualified) {
            debug!(%qualified, "blocked");
            self.session.record_skip();
            let mut block = SourceBlock::new();
            block.line("");
            block.comment(format!("blocked function {qualified}"));
            return Synthesized {
                outcome: Outcome::Skipped,
                block,
            };
        }

        let id = self.session.next_function_id();
        let classification = classify(func);
        trace!(id, rule = %classification.rule, "classified");

        let mut frame = Frame::new();
        let name = self.display_name(func, &classification);
        frame.assemble(self.namer, func, &classification);
        let block = frame.emit(self.namer.namespace(), func, id, hint, &name);

        for gap in &frame.gaps {
            debug!(%gap, "unmapped type");
        }
        let incomplete = !frame.gaps.is_empty() || block.contains_placeholder();
        self.session.record_function(incomplete);
        Synthesized {
            outcome: Outcome::Generated { id, incomplete },
            block,
        }
    }

    /// Final host name; the rename table only replaces the result.
    fn display_name(&self, func: &FunctionDescriptor, classification: &Classification) -> String {
        if let Some(renamed) = self.policy.rename(&func.symbol) {
            return renamed.to_string();
        }
        let camel = camel_case(&func.name);
        match (&func.container, classification.form) {
            (Some(container), CallForm::Constructor) => constructor_name(&container.name, &camel),
            (Some(container), CallForm::Free) if classification.is_static_member() => {
                static_member_name(&container.name, &camel)
            }
            _ => camel,
        }
    }
}

/// Statement lists collected during assembly.
struct Frame {
    vars: VarRegistry,
    err: String,
    comments: Vec<String>,
    receiver: Option<String>,
    params: Vec<String>,
    results: Vec<String>,
    before_args: Vec<String>,
    new_args: Vec<String>,
    arg_names: Vec<String>,
    after_call: Vec<String>,
    set_params: Vec<String>,
    before_return: Vec<String>,
    /// `(variable, slot count)` of the scratch array once the first slot is taken.
    out_args: Option<(String, usize)>,
    handle_lengths: HandleLengths,
    result: Option<ResultPlan>,
    gaps: Vec<Gap>,
}

/// Return slot variable and the statements that fill the result from it.
struct ResultPlan {
    ret: String,
    assign: Vec<String>,
}

impl Frame {
    fn new() -> Self {
        let mut vars = VarRegistry::new();
        let err = vars.alloc("err");
        Self {
            vars,
            err,
            comments: Vec::new(),
            receiver: None,
            params: Vec::new(),
            results: Vec::new(),
            before_args: Vec::new(),
            new_args: Vec::new(),
            arg_names: Vec::new(),
            after_call: Vec::new(),
            set_params: Vec::new(),
            before_return: Vec::new(),
            out_args: None,
            handle_lengths: HandleLengths::default(),
            result: None,
            gaps: Vec::new(),
        }
    }

    /// Take the next scratch slot, returning `(variable, index)`.
    fn out_slot(&mut self) -> (String, usize) {
        let (var, index) = match self.out_args.take() {
            Some(existing) => existing,
            None => (self.vars.alloc("outArgs"), 0),
        };
        self.out_args = Some((var.clone(), index + 1));
        (var, index)
    }

    fn note_gap(&mut self, gap: Option<Gap>) {
        if let Some(gap) = gap {
            self.gaps.push(gap);
        }
    }

    fn assemble(
        &mut self,
        namer: &mut TypeNamer,
        func: &FunctionDescriptor,
        classification: &Classification,
    ) {
        if let (CallForm::Method { .. }, Some(container)) = (classification.form, &func.container) {
            self.add_receiver(container);
        }

        let start = classification.first_param_index();
        self.comments.push(func.symbol.clone());
        self.comments.push(String::new());

        let mut names = FxHashMap::default();
        for (index, arg) in func.args.iter().enumerate().skip(start) {
            let name = self.vars.register_param(index, &arg.name);
            let mut comment = format!("[ {name} ] trans: {}", arg.transfer);
            if arg.direction != Direction::In {
                comment.push_str(&format!(", dir: {}", arg.direction));
            }
            self.comments.push(comment);
            self.comments.push(String::new());
            names.insert(index, name);
        }

        let owners = length_owners(func, start);
        for (&length, owner) in &owners {
            if let LengthOwner::Handle(array_index) = owner {
                if let Some(handle) = names.get(array_index) {
                    self.handle_lengths.insert(length, handle.clone());
                }
            }
        }
        for (index, arg) in func.args.iter().enumerate().skip(start) {
            let Some(param) = names.get(&index).cloned() else {
                continue;
            };
            let owner = owners.get(&index).copied();
            match arg.direction {
                Direction::In => {
                    if let Some(handle) = self.handle_lengths.get(&index).cloned() {
                        let (expr, gap) = map_length_from_handle(&arg.ty, &handle);
                        self.note_gap(gap);
                        let arg_var = self.vars.alloc(&format!("arg_{param}"));
                        self.new_args.push(format!("{arg_var} := {expr}"));
                        self.arg_names.push(arg_var);
                        continue;
                    }
                    let mapped = map_argument(&mut self.cx(namer), &param, arg);
                    let arg_var = self.vars.alloc(&format!("arg_{param}"));
                    self.before_args.extend(mapped.pre_statements);
                    self.new_args.push(format!("{arg_var} := {}", mapped.expr));
                    self.arg_names.push(arg_var);
                    self.after_call.extend(mapped.post_call);
                    self.params.push(format!("{param} {}", mapped.host_type));
                    self.note_gap(mapped.gap);
                }
                Direction::InOut => {
                    // Neither forwarded nor read back; the slot only keeps the call shape.
                    // Linked inout lengths stay visible too, as part of the same gap.
                    let mapped = map_argument(&mut self.cx(namer), &param, arg);
                    let (out_var, slot) = self.out_slot();
                    let arg_var = self.vars.alloc(&format!("arg_{param}"));
                    self.new_args.push(format!(
                        "{arg_var} := gi.NewPointerArgument(unsafe.Pointer(&{out_var}[{slot}]))"
                    ));
                    self.arg_names.push(arg_var);
                    self.params.push(format!("{param} {}", mapped.host_type));
                    self.note_gap(mapped.gap);
                }
                Direction::Out => {
                    let mapped = map_argument(&mut self.cx(namer), &param, arg);
                    let arg_var = self.vars.alloc(&format!("arg_{param}"));
                    if mapped.surfaced {
                        let (out_var, slot) = self.out_slot();
                        self.new_args.push(format!(
                            "{arg_var} := gi.NewPointerArgument(unsafe.Pointer(&{out_var}[{slot}]))"
                        ));
                        let read = format!("{out_var}[{slot}].{}", mapped.expr);
                        let value = if mapped.needs_cast {
                            format!("{}({read})", mapped.host_type)
                        } else {
                            read
                        };
                        if owner.is_some() {
                            // Length counterparts are consumed locally, never returned.
                            self.after_call
                                .push(format!("var {param} {}; _ = {param}", mapped.host_type));
                        } else {
                            self.results.push(format!("{param} {}", mapped.host_type));
                        }
                        self.set_params.push(format!("{param}{} = {value}", mapped.field));
                    } else {
                        self.new_args
                            .push(format!("{arg_var} := gi.NewPointerArgument({})", mapped.expr));
                        self.params.push(format!("{param} {}", mapped.host_type));
                    }
                    self.arg_names.push(arg_var);
                    self.before_return.extend(mapped.pre_return);
                    self.note_gap(mapped.gap);
                }
            }
        }

        if func.throws() {
            let (out_var, slot) = self.out_slot();
            let arg_var = self.vars.alloc(&format!("arg_{}", self.err));
            self.new_args.push(format!(
                "{arg_var} := gi.NewPointerArgument(unsafe.Pointer(&{out_var}[{slot}]))"
            ));
            self.arg_names.push(arg_var);
            self.after_call
                .push(format!("{} = gi.ToError({out_var}[{slot}].Pointer())", self.err));
            self.results.push(format!("{} error", self.err));
        }

        if !func.return_type.is_void() {
            let ret = self.vars.alloc("ret");
            let result = self.vars.alloc("result");
            let mapped = map_return(&mut self.cx(namer), &ret, func);
            self.results.insert(0, format!("{result} {}", mapped.host_type));
            self.comments.push(format!("[ {result} ] trans: {}", func.caller_owns));
            self.comments.push(String::new());

            let mut assign = vec![format!("{result}{} = {}", mapped.field, mapped.expr)];
            if mapped.zero_terminated {
                assign.push(format!("{result}.SetLenZT()"));
            }
            self.result = Some(ResultPlan { ret, assign });
            self.note_gap(mapped.gap);
        }
    }

    fn cx<'b>(&'b mut self, namer: &'b mut TypeNamer) -> MapCx<'b> {
        MapCx {
            namer,
            vars: &mut self.vars,
            handle_lengths: &self.handle_lengths,
        }
    }

    /// Bind the receiver `v` and pass its pointer as the first call argument.
    fn add_receiver(&mut self, container: &EntityRef) {
        let v = self.vars.alloc("v");
        let (receiver_type, pointer) = if container.kind == EntityKind::Interface {
            (
                format!("*{}Ifc", container.name),
                format!("*(*unsafe.Pointer)(unsafe.Pointer({v}))"),
            )
        } else {
            (container.name.clone(), format!("{v}.P"))
        };
        let arg_v = self.vars.alloc("arg_v");
        self.new_args
            .push(format!("{arg_v} := gi.NewPointerArgument({pointer})"));
        self.arg_names.push(arg_v);
        self.receiver = Some(format!("({v} {receiver_type})"));
    }

    fn emit(
        &mut self,
        namespace: &str,
        func: &FunctionDescriptor,
        id: u32,
        hint: LookupHint,
        name: &str,
    ) -> SourceBlock {
        let mut block = SourceBlock::new();
        if func.is_deprecated() {
            block.comment("Deprecated");
        }
        for comment in &self.comments {
            block.comment(comment);
        }

        let receiver = self
            .receiver
            .as_deref()
            .map(|r| format!("{r} "))
            .unwrap_or_default();
        let results = match self.results.len() {
            0 => String::new(),
            _ => format!(" ({})", self.results.join(", ")),
        };
        block.line(format!(
            "func {receiver}{name}({}){results} {{",
            self.params.join(", ")
        ));

        let iv = self.vars.alloc("iv");
        let lookup = lookup_call(namespace, func, id, hint);
        let err = self.err.clone();
        let throws = func.throws();
        let out_args = self.out_args.clone();
        let args_var = if self.arg_names.is_empty() {
            None
        } else {
            Some(self.vars.alloc("args"))
        };

        block.with_indent(|b| {
            b.line(format!("{iv}, {err} := {lookup}"));
            b.line(format!("if {err} != nil {{"));
            b.with_indent(|b| {
                if !throws {
                    b.line(format!("log.Println(\"WARN:\", {err})"));
                }
                b.line("return");
            });
            b.line("}");

            if let Some((var, count)) = &out_args {
                b.line(format!("var {var} [{count}]gi.Argument"));
            }
            b.lines(&self.before_args);
            b.lines(&self.new_args);

            let call_args = match &args_var {
                Some(var) => {
                    b.line(format!("{var} := []gi.Argument{{{}}}", self.arg_names.join(", ")));
                    var.clone()
                }
                None => "nil".to_string(),
            };
            let call_ret = match &self.result {
                Some(plan) => {
                    b.line(format!("var {} gi.Argument", plan.ret));
                    format!("&{}", plan.ret)
                }
                None => "nil".to_string(),
            };
            let call_out = match &out_args {
                Some((var, _)) => format!("&{var}[0]"),
                None => "nil".to_string(),
            };
            b.line(format!("{iv}.Call({call_args}, {call_ret}, {call_out})"));

            b.lines(&self.after_call);
            b.lines(&self.set_params);
            if let Some(plan) = &self.result {
                b.lines(&plan.assign);
            }
            b.lines(&self.before_return);
            if !self.results.is_empty() {
                b.line("return");
            }
        });
        block.line("}");
        block
    }
}

/// Map each implicit length argument to the array that defines it.
///
/// A parameter handle wins over a produced array, since only a handle can
/// supply the length before the call.
fn length_owners(func: &FunctionDescriptor, start: usize) -> FxHashMap<usize, LengthOwner> {
    let mut owners = FxHashMap::default();
    let mut link = |ty: &TypeDescriptor, owner: LengthOwner| {
        if let Some(length) = ty.array().and_then(|array| array.length_arg) {
            let entry = owners.entry(length).or_insert(owner);
            if matches!(owner, LengthOwner::Handle(_)) && *entry == LengthOwner::Produced {
                *entry = owner;
            }
        }
    };
    for (index, arg) in func.args.iter().enumerate().skip(start) {
        let is_handle = match arg.direction {
            Direction::In => exposes_length(&arg.ty),
            Direction::Out => {
                !is_surfaced_out(&arg.ty, arg.caller_allocates) && exposes_length(&arg.ty)
            }
            Direction::InOut => false,
        };
        let owner = if is_handle {
            LengthOwner::Handle(index)
        } else {
            LengthOwner::Produced
        };
        link(&arg.ty, owner);
    }
    link(&func.return_type, LengthOwner::Produced);
    owners
}

/// The `_I.Get` (or `_I.Get1`) lookup expression.
fn lookup_call(namespace: &str, func: &FunctionDescriptor, id: u32, hint: LookupHint) -> String {
    let shared_cache = matches!(namespace, "GObject" | "Gio");
    let mut args = vec![id.to_string()];
    if shared_cache {
        args.push(quote(namespace));
    }
    match &func.container {
        Some(container) => {
            args.push(quote(&container.name));
            args.push(quote(&func.name));
        }
        None => {
            args.push(quote(&func.name));
            args.push(quote(""));
        }
    }
    let index = |i: Option<usize>| i.map_or_else(|| "-1".to_string(), |i| i.to_string());
    args.push(index(hint.lv1));
    args.push(index(hint.lv2));

    let info_type = match func.container.as_ref().map(|c| c.kind) {
        Some(EntityKind::Struct) => "STRUCT",
        Some(EntityKind::Union) => "UNION",
        Some(EntityKind::Object) => "OBJECT",
        Some(EntityKind::Interface) => "INTERFACE",
        Some(EntityKind::Enum | EntityKind::Flags | EntityKind::Callback) | None => "FUNCTION",
    };
    args.push(format!("gi.INFO_TYPE_{info_type}"));

    // Struct lookups on GObject.ObjectClass must not go through find_method.
    let no_call_find =
        namespace == "GObject" && func.container.as_ref().is_some_and(|c| c.name == "ObjectClass");
    args.push(if no_call_find { "gi.FindMethodNoCallFind" } else { "0" }.to_string());

    let method = if shared_cache { "Get1" } else { "Get" };
    format!("_I.{method}({})", args.join(", "))
}

fn quote(text: &str) -> String {
    format!("{text:?}")
}
