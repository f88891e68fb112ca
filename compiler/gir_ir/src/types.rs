//! Type Descriptors
//!
//! A [`TypeDescriptor`] is the metadata view of one foreign type: a closed
//! [`TypeKind`] plus a pointer flag. Array and interface-reference kinds carry
//! their extra payload inline so that consumers match on a single enum and the
//! compiler enforces exhaustiveness when a new kind is added.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed-size scalar tags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Boolean,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    /// A 32-bit unicode code point.
    UniChar,
}

impl Primitive {
    /// Every primitive tag, in metadata order.
    pub const ALL: [Primitive; 12] = [
        Primitive::Boolean,
        Primitive::Int8,
        Primitive::UInt8,
        Primitive::Int16,
        Primitive::UInt16,
        Primitive::Int32,
        Primitive::UInt32,
        Primitive::Int64,
        Primitive::UInt64,
        Primitive::Float,
        Primitive::Double,
        Primitive::UniChar,
    ];

    /// Tag name as it appears in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Int8 => "int8",
            Primitive::UInt8 => "uint8",
            Primitive::Int16 => "int16",
            Primitive::UInt16 => "uint16",
            Primitive::Int32 => "int32",
            Primitive::UInt32 => "uint32",
            Primitive::Int64 => "int64",
            Primitive::UInt64 => "uint64",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::UniChar => "unichar",
        }
    }

    /// Signed and unsigned integers of every width.
    pub fn is_integer(self) -> bool {
        !matches!(
            self,
            Primitive::Boolean | Primitive::Float | Primitive::Double | Primitive::UniChar
        )
    }
}

/// What kind of entity an interface reference (or a function container) points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Object,
    Interface,
    Struct,
    Union,
    Enum,
    Flags,
    Callback,
}

impl EntityKind {
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Object => "object",
            EntityKind::Interface => "interface",
            EntityKind::Struct => "struct",
            EntityKind::Union => "union",
            EntityKind::Enum => "enum",
            EntityKind::Flags => "flags",
            EntityKind::Callback => "callback",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reference to a declared type entity in some namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub namespace: String,
    pub name: String,
    pub kind: EntityKind,
}

impl EntityRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Storage flavor of an array type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayKind {
    /// Plain C array.
    #[default]
    C,
    /// `GArray`.
    Array,
    /// `GPtrArray`.
    PtrArray,
    /// `GByteArray`.
    ByteArray,
}

impl ArrayKind {
    pub fn name(self) -> &'static str {
        match self {
            ArrayKind::C => "c",
            ArrayKind::Array => "array",
            ArrayKind::PtrArray => "ptr_array",
            ArrayKind::ByteArray => "byte_array",
        }
    }
}

/// Array payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayType {
    #[serde(default)]
    pub kind: ArrayKind,
    pub element: Box<TypeDescriptor>,
    #[serde(default)]
    pub zero_terminated: bool,
    /// Index of the argument carrying this array's length, if linked.
    #[serde(default)]
    pub length_arg: Option<usize>,
}

/// The closed set of type tags.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum TypeKind {
    Primitive { prim: Primitive },
    Utf8,
    Filename,
    Array(ArrayType),
    Interface(EntityRef),
    Error,
    HashTable,
    List,
    SList,
    GType,
    Void,
}

impl TypeKind {
    /// Tag name as it appears in placeholder annotations.
    pub fn tag_name(&self) -> &'static str {
        match self {
            TypeKind::Primitive { prim } => prim.name(),
            TypeKind::Utf8 => "utf8",
            TypeKind::Filename => "filename",
            TypeKind::Array(_) => "array",
            TypeKind::Interface(_) => "interface",
            TypeKind::Error => "error",
            TypeKind::HashTable => "ghash",
            TypeKind::List => "glist",
            TypeKind::SList => "gslist",
            TypeKind::GType => "gtype",
            TypeKind::Void => "void",
        }
    }

    /// Both string tags marshal identically.
    pub fn is_string(&self) -> bool {
        matches!(self, TypeKind::Utf8 | TypeKind::Filename)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// One foreign type: tag plus pointer-ness.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    #[serde(default)]
    pub pointer: bool,
    #[serde(flatten)]
    pub kind: TypeKind,
}

impl TypeDescriptor {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            pointer: false,
            kind,
        }
    }

    /// Builder-style pointer flag.
    #[must_use]
    pub fn pointer(mut self) -> Self {
        self.pointer = true;
        self
    }

    pub fn void() -> Self {
        Self::new(TypeKind::Void)
    }

    pub fn primitive(prim: Primitive) -> Self {
        Self::new(TypeKind::Primitive { prim })
    }

    /// A `utf8` string; strings are always pointers.
    pub fn utf8() -> Self {
        Self::new(TypeKind::Utf8).pointer()
    }

    /// A pointer to a declared entity (the common shape for objects and structs).
    pub fn entity_ptr(namespace: &str, name: &str, kind: EntityKind) -> Self {
        Self::new(TypeKind::Interface(EntityRef::new(namespace, name, kind))).pointer()
    }

    /// A by-value reference to a declared entity (enums, flags, callbacks).
    pub fn entity(namespace: &str, name: &str, kind: EntityKind) -> Self {
        Self::new(TypeKind::Interface(EntityRef::new(namespace, name, kind)))
    }

    /// A plain C array of `element`.
    pub fn c_array(element: TypeDescriptor, length_arg: Option<usize>, zero_terminated: bool) -> Self {
        Self::new(TypeKind::Array(ArrayType {
            kind: ArrayKind::C,
            element: Box::new(element),
            zero_terminated,
            length_arg,
        }))
        .pointer()
    }

    /// Non-pointer `void`: "no value".
    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeKind::Void) && !self.pointer
    }

    /// The referenced entity, for interface kinds.
    pub fn entity_ref(&self) -> Option<&EntityRef> {
        match &self.kind {
            TypeKind::Interface(entity) => Some(entity),
            _ => None,
        }
    }

    /// The array payload, for array kinds.
    pub fn array(&self) -> Option<&ArrayType> {
        match &self.kind {
            TypeKind::Array(array) => Some(array),
            _ => None,
        }
    }
}
