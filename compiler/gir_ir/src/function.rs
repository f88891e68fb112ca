//! Function and Argument Descriptors

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::types::{EntityRef, TypeDescriptor};

/// Data flow direction of an argument.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    In,
    Out,
    InOut,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
            Direction::InOut => write!(f, "inout"),
        }
    }
}

/// Ownership transfer of a value crossing the foreign boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transfer {
    /// The source keeps ownership.
    #[default]
    Nothing,
    /// The receiver owns the container but not its elements.
    Container,
    /// The receiver owns everything.
    Everything,
}

impl Transfer {
    /// Whether any ownership moves to the receiver.
    pub fn is_transferred(self) -> bool {
        !matches!(self, Transfer::Nothing)
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transfer::Nothing => write!(f, "none"),
            Transfer::Container => write!(f, "container"),
            Transfer::Everything => write!(f, "everything"),
        }
    }
}

/// One declared argument of a foreign function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub transfer: Transfer,
    #[serde(default)]
    pub caller_allocates: bool,
}

impl ArgumentDescriptor {
    /// An `in` argument without ownership transfer.
    pub fn input(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            direction: Direction::In,
            transfer: Transfer::Nothing,
            caller_allocates: false,
        }
    }

    /// An `out` argument without ownership transfer.
    pub fn output(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            direction: Direction::Out,
            ..Self::input(name, ty)
        }
    }

    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_transfer(mut self, transfer: Transfer) -> Self {
        self.transfer = transfer;
        self
    }

    #[must_use]
    pub fn caller_allocated(mut self) -> Self {
        self.caller_allocates = true;
        self
    }
}

bitflags! {
    /// Function-level metadata flags.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct FunctionFlags: u8 {
        const IS_CONSTRUCTOR = 1 << 0;
        const IS_METHOD = 1 << 1;
        const THROWS = 1 << 2;
        const DEPRECATED = 1 << 3;
    }
}

impl Default for FunctionFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// One declared foreign function, free or owned by a type entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Linkage symbol (e.g. `gtk_button_new_with_label`).
    pub symbol: String,
    /// Metadata name (e.g. `new_with_label`).
    pub name: String,
    /// Owning entity, `None` for namespace-level functions.
    #[serde(default)]
    pub container: Option<EntityRef>,
    #[serde(default)]
    pub flags: FunctionFlags,
    #[serde(default)]
    pub args: Vec<ArgumentDescriptor>,
    #[serde(default = "TypeDescriptor::void")]
    pub return_type: TypeDescriptor,
    /// Ownership transfer of the return value.
    #[serde(default)]
    pub caller_owns: Transfer,
}

impl FunctionDescriptor {
    /// A free function returning nothing and taking no arguments.
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            container: None,
            flags: FunctionFlags::empty(),
            args: Vec::new(),
            return_type: TypeDescriptor::void(),
            caller_owns: Transfer::Nothing,
        }
    }

    /// `Container.name` for members, the bare name otherwise.
    pub fn qualified_name(&self) -> String {
        match &self.container {
            Some(container) => format!("{}.{}", container.name, self.name),
            None => self.name.clone(),
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.flags.contains(FunctionFlags::IS_CONSTRUCTOR)
    }

    pub fn is_method(&self) -> bool {
        self.flags.contains(FunctionFlags::IS_METHOD)
    }

    pub fn throws(&self) -> bool {
        self.flags.contains(FunctionFlags::THROWS)
    }

    pub fn is_deprecated(&self) -> bool {
        self.flags.contains(FunctionFlags::DEPRECATED)
    }

    /// Argument indices referenced as array lengths by any argument or by the return type.
    pub fn length_arg_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .args
            .iter()
            .map(|arg| &arg.ty)
            .chain(std::iter::once(&self.return_type))
            .filter_map(|ty| ty.array().and_then(|array| array.length_arg))
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    // Builder helpers used by fixtures.

    #[must_use]
    pub fn with_container(mut self, container: EntityRef) -> Self {
        self.container = Some(container);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: FunctionFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_arg(mut self, arg: ArgumentDescriptor) -> Self {
        self.args.push(arg);
        self
    }

    #[must_use]
    pub fn returning(mut self, ty: TypeDescriptor, caller_owns: Transfer) -> Self {
        self.return_type = ty;
        self.caller_owns = caller_owns;
        self
    }
}
