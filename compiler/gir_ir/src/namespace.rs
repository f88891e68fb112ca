//! Namespaces and Declared Entities

use serde::{Deserialize, Serialize};

use crate::function::FunctionDescriptor;
use crate::types::{EntityKind, EntityRef};

/// A type declared by a namespace, with its member functions in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntity {
    pub name: String,
    pub kind: EntityKind,
    /// Symbol of the type-registration function (`gtk_button_get_type`), if any.
    #[serde(default)]
    pub type_init: Option<String>,
    #[serde(default)]
    pub functions: Vec<FunctionDescriptor>,
}

impl TypeEntity {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_init: None,
            functions: Vec::new(),
        }
    }

    /// Whether the entity can carry a runtime type id.
    pub fn is_registered_type(&self) -> bool {
        self.type_init.is_some() && !matches!(self.kind, EntityKind::Callback)
    }
}

/// One introspection namespace (`Gtk-3.0`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceEntity {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub types: Vec<TypeEntity>,
    #[serde(default)]
    pub functions: Vec<FunctionDescriptor>,
    /// Immediate dependencies as `Name-Version` identifiers.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl NamespaceEntity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            types: Vec::new(),
            functions: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// `Name-Version` identifier.
    pub fn id(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// Fill in the `container` of every member function that lacks one.
    ///
    /// Metadata dumps usually nest members under their entity without repeating
    /// the owner on each function.
    pub fn attach_containers(&mut self) {
        let namespace = self.name.clone();
        for entity in &mut self.types {
            let owner = EntityRef::new(namespace.as_str(), entity.name.as_str(), entity.kind);
            for func in &mut entity.functions {
                if func.container.is_none() {
                    func.container = Some(owner.clone());
                }
            }
        }
    }
}

/// Split a `Name-Version` identifier. Plain names yield no version.
pub fn split_namespace_id(id: &str) -> (&str, Option<&str>) {
    match id.split_once('-') {
        Some((name, version)) => (name, Some(version)),
        None => (id, None),
    }
}
