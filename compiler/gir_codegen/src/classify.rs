//! Call Form Classification
//!
//! Decides whether a container member becomes a constructor, a method with a
//! receiver, or a free function. The decision is isolated here because the
//! no-flag case is a heuristic; [`Classification::rule`] records which rule
//! fired so surprising results can be traced in the debug log.

use std::fmt;

use gir_ir::{FunctionDescriptor, TypeKind};

/// How a function is exposed in the host language.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallForm {
    /// `New<Container>...`, no receiver.
    Constructor,
    /// Receiver-bound; `consumes_first_arg` when the receiver is declared
    /// argument 0 rather than implied by the method flag.
    Method { consumes_first_arg: bool },
    /// Namespace-level function, or a static container member.
    Free,
}

/// The rule that produced a [`CallForm`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    NoContainer,
    ConstructorFlag,
    MethodFlag,
    FirstArgIsReceiver,
    FirstArgNotReceiver,
    NoArguments,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rule::NoContainer => "no container",
            Rule::ConstructorFlag => "constructor flag",
            Rule::MethodFlag => "method flag",
            Rule::FirstArgIsReceiver => "first argument points at container",
            Rule::FirstArgNotReceiver => "first argument is not the container",
            Rule::NoArguments => "member without arguments",
        };
        f.write_str(text)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub form: CallForm,
    pub rule: Rule,
}

impl Classification {
    fn new(form: CallForm, rule: Rule) -> Self {
        Self { form, rule }
    }

    /// Index of the first declared argument that is not the receiver.
    pub fn first_param_index(&self) -> usize {
        match self.form {
            CallForm::Method {
                consumes_first_arg: true,
            } => 1,
            _ => 0,
        }
    }

    /// Whether the member keeps its container but loses the receiver, and so
    /// needs a disambiguated display name.
    pub fn is_static_member(&self) -> bool {
        matches!(self.rule, Rule::FirstArgNotReceiver | Rule::NoArguments)
    }
}

/// Classify `func`. Explicit flags win over the first-argument heuristic.
pub fn classify(func: &FunctionDescriptor) -> Classification {
    let Some(container) = &func.container else {
        return Classification::new(CallForm::Free, Rule::NoContainer);
    };
    if func.is_constructor() {
        return Classification::new(CallForm::Constructor, Rule::ConstructorFlag);
    }
    if func.is_method() {
        return Classification::new(
            CallForm::Method {
                consumes_first_arg: false,
            },
            Rule::MethodFlag,
        );
    }
    let Some(first) = func.args.first() else {
        return Classification::new(CallForm::Free, Rule::NoArguments);
    };
    let points_at_container = first.ty.pointer
        && matches!(
            &first.ty.kind,
            TypeKind::Interface(entity)
                if entity.name == container.name && entity.namespace == container.namespace
        );
    if points_at_container {
        Classification::new(
            CallForm::Method {
                consumes_first_arg: true,
            },
            Rule::FirstArgIsReceiver,
        )
    } else {
        Classification::new(CallForm::Free, Rule::FirstArgNotReceiver)
    }
}
