//! Host Naming
//!
//! Everything that turns metadata names into host identifiers lives here:
//! display names, constructor names, static-member disambiguation, and the
//! package prefix for types that cross a namespace boundary.
//!
//! [`TypeNamer`] is created once per generated namespace from the dependency
//! closure and collects the set of packages that generated code refers to.

use std::collections::BTreeSet;

use gir_ir::EntityRef;
use heck::ToUpperCamelCase;

/// Namespaces whose generated code shares the single `g.` package alias.
const FOUNDATIONAL: &[&str] = &["glib", "gobject", "gio"];

/// Metadata `snake_case` name to host `UpperCamelCase`.
pub fn camel_case(name: &str) -> String {
    name.to_upper_camel_case()
}

/// `New` + container + the camel name with a leading `New` removed.
///
/// `new` on `Button` gives `NewButton`; `new_with_label` gives
/// `NewButtonWithLabel`.
pub fn constructor_name(container: &str, camel: &str) -> String {
    let rest = camel.strip_prefix("New").unwrap_or(camel);
    format!("New{container}{rest}")
}

/// Display name for a container member that is neither constructor nor method.
pub fn static_member_name(container: &str, camel: &str) -> String {
    format!("{container}{camel}1")
}

/// Resolves type names relative to the namespace being generated.
#[derive(Debug, Clone)]
pub struct TypeNamer {
    namespace: String,
    /// Dependency closure as `Name-Version` ids, sorted for deterministic lookup.
    closure: Vec<String>,
    imports: BTreeSet<String>,
}

impl TypeNamer {
    pub fn new<I>(namespace: impl Into<String>, closure: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut closure: Vec<String> = closure.into_iter().collect();
        closure.sort();
        closure.dedup();
        Self {
            namespace: namespace.into(),
            closure,
            imports: BTreeSet::new(),
        }
    }

    /// Namespace being generated.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Whether types of `ns` are referenced without a package prefix.
    ///
    /// `GObject` generates into the same package as `GLib`; `Gio` additionally
    /// shares it with `GObject`.
    pub fn is_same_namespace(&self, ns: &str) -> bool {
        if ns == self.namespace {
            return true;
        }
        match self.namespace.as_str() {
            "GObject" => ns == "GLib",
            "Gio" => ns == "GLib" || ns == "GObject",
            _ => false,
        }
    }

    /// Package prefix for a type declared in `ns`, recording the import.
    pub fn pkg_prefix(&mut self, ns: &str) -> String {
        if self.is_same_namespace(ns) {
            return String::new();
        }
        self.add_import(ns);
        let lower = ns.to_lowercase();
        if FOUNDATIONAL.contains(&lower.as_str()) {
            "g.".to_string()
        } else {
            format!("{lower}.")
        }
    }

    /// Record the closure entry for `ns` as an import, if there is one.
    fn add_import(&mut self, ns: &str) {
        let wanted = format!("{ns}-");
        if let Some(dep) = self.closure.iter().find(|dep| dep.starts_with(&wanted)) {
            self.imports.insert(dep.to_lowercase());
        }
    }

    /// Host name of a declared entity, prefixed when foreign.
    pub fn type_name(&mut self, entity: &EntityRef) -> String {
        let prefix = self.pkg_prefix(&entity.namespace);
        format!("{prefix}{}", entity.name)
    }

    /// Interface form used by in-direction object parameters.
    ///
    /// `gobject.Object` becomes `gobject.IObject`, `Object` becomes `IObject`.
    pub fn interface_type_name(&mut self, entity: &EntityRef) -> String {
        let name = self.type_name(entity);
        match name.split_once('.') {
            Some((pkg, rest)) => format!("{pkg}.I{rest}"),
            None => format!("I{name}"),
        }
    }

    pub fn enum_type_name(&mut self, entity: &EntityRef) -> String {
        format!("{}Enum", self.type_name(entity))
    }

    pub fn flags_type_name(&mut self, entity: &EntityRef) -> String {
        format!("{}Flags", self.type_name(entity))
    }

    /// A GLib-provided handle type (`Error`, `List`, ...).
    pub fn glib_type(&mut self, name: &str) -> String {
        let prefix = self.pkg_prefix("GLib");
        format!("{prefix}{name}")
    }

    /// Packages referenced so far, lower-cased `name-version`.
    pub fn imports(&self) -> &BTreeSet<String> {
        &self.imports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gir_ir::EntityKind;
    use pretty_assertions::assert_eq;

    fn gtk_namer() -> TypeNamer {
        TypeNamer::new(
            "Gtk",
            ["Gdk-3.0", "GObject-2.0", "GLib-2.0", "Pango-1.0"].map(String::from),
        )
    }

    #[test]
    fn camel_and_constructor_names() {
        assert_eq!(camel_case("get_label"), "GetLabel");
        assert_eq!(camel_case("new"), "New");
        assert_eq!(constructor_name("Button", &camel_case("new")), "NewButton");
        assert_eq!(
            constructor_name("Button", &camel_case("new_with_label")),
            "NewButtonWithLabel"
        );
        assert_eq!(constructor_name("Builder", "Create"), "NewBuilderCreate");
        assert_eq!(static_member_name("IOChannel", "ErrorQuark"), "IOChannelErrorQuark1");
    }

    #[test]
    fn local_types_are_unprefixed() {
        let mut namer = gtk_namer();
        let button = EntityRef::new("Gtk", "Button", EntityKind::Object);
        assert_eq!(namer.type_name(&button), "Button");
        assert_eq!(namer.interface_type_name(&button), "IButton");
        assert!(namer.imports().is_empty());
    }

    #[test]
    fn foreign_types_record_imports() {
        let mut namer = gtk_namer();
        let window = EntityRef::new("Gdk", "Window", EntityKind::Object);
        assert_eq!(namer.type_name(&window), "gdk.Window");
        assert_eq!(namer.interface_type_name(&window), "gdk.IWindow");

        let object = EntityRef::new("GObject", "Object", EntityKind::Object);
        assert_eq!(namer.type_name(&object), "g.Object");
        assert_eq!(namer.glib_type("Error"), "g.Error");

        let imports: Vec<_> = namer.imports().iter().cloned().collect();
        assert_eq!(imports, vec!["gdk-3.0", "glib-2.0", "gobject-2.0"]);
    }

    #[test]
    fn foundational_namespaces_collapse() {
        let mut gio = TypeNamer::new("Gio", ["GObject-2.0", "GLib-2.0"].map(String::from));
        assert!(gio.is_same_namespace("GLib"));
        assert!(gio.is_same_namespace("GObject"));
        assert_eq!(gio.glib_type("List"), "List");

        let gobject = TypeNamer::new("GObject", ["GLib-2.0"].map(String::from));
        assert!(gobject.is_same_namespace("GLib"));
        assert!(!gobject.is_same_namespace("Gio"));
    }

    #[test]
    fn enum_and_flags_suffixes() {
        let mut namer = gtk_namer();
        let align = EntityRef::new("Gtk", "Align", EntityKind::Enum);
        let mask = EntityRef::new("Gdk", "EventMask", EntityKind::Flags);
        assert_eq!(namer.enum_type_name(&align), "AlignEnum");
        assert_eq!(namer.flags_type_name(&mask), "gdk.EventMaskFlags");
    }
}
