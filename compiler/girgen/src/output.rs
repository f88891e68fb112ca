//! Per-namespace output buffer.

use std::collections::BTreeSet;
use std::fmt::Write;

use gir_codegen::{Metrics, SourceBlock};

/// Import root of the generated binding packages.
pub const GIR_IMPORT_ROOT: &str = "github.com/linuxdeepin/go-gir";

/// Foundational namespaces share one package, imported as `g`.
const SHARED_PACKAGE: &str = "g-2.0";

/// Everything generated for one namespace, in visit order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamespaceOutput {
    /// Bare namespace name (`Gtk`).
    pub namespace: String,
    pub blocks: Vec<SourceBlock>,
    /// Dependency packages referenced by the blocks, as lower-cased ids (`gdk-3.0`).
    pub imports: BTreeSet<String>,
    pub c_includes: Vec<String>,
    pub metrics: Metrics,
}

impl NamespaceOutput {
    /// Go package name of the namespace.
    pub fn package_name(&self) -> String {
        self.namespace.to_lowercase()
    }

    /// Render a complete Go source file.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "package {}", self.package_name());
        out.push('\n');

        if !self.c_includes.is_empty() {
            out.push_str("/*\n");
            for header in &self.c_includes {
                let _ = writeln!(out, "#include <{header}>");
            }
            out.push_str("*/\nimport \"C\"\n");
        }

        let std_imports = self.std_imports();
        let gir_imports = self.import_lines();
        if !std_imports.is_empty() || !gir_imports.is_empty() {
            out.push_str("import (\n");
            for package in &std_imports {
                let _ = writeln!(out, "\t\"{package}\"");
            }
            if !std_imports.is_empty() && !gir_imports.is_empty() {
                out.push('\n');
            }
            for import in &gir_imports {
                let _ = writeln!(out, "\t{import}");
            }
            out.push_str(")\n");
        }

        for block in &self.blocks {
            out.push('\n');
            out.push_str(&block.render());
        }
        out
    }

    /// Standard packages the blocks actually reference; Go rejects unused imports.
    fn std_imports(&self) -> Vec<&'static str> {
        ["log", "unsafe"]
            .into_iter()
            .filter(|package| self.references(package))
            .collect()
    }

    fn references(&self, package: &str) -> bool {
        self.blocks.iter().any(|block| {
            block
                .as_lines()
                .iter()
                .any(|line| !line.trim_start().starts_with("//") && qualifies(line, package))
        })
    }

    fn import_lines(&self) -> BTreeSet<String> {
        let mut lines: BTreeSet<String> = self
            .imports
            .iter()
            .map(|id| {
                let name = id.split('-').next().unwrap_or(id);
                if matches!(name, "glib" | "gobject" | "gio") {
                    format!("g \"{GIR_IMPORT_ROOT}/{SHARED_PACKAGE}\"")
                } else {
                    format!("\"{GIR_IMPORT_ROOT}/{id}\"")
                }
            })
            .collect();
        if self.references("gi") {
            lines.insert(format!("\"{GIR_IMPORT_ROOT}/gi\""));
        }
        lines
    }
}

/// Whether `line` contains `package.` as a selector rather than a name suffix.
fn qualifies(line: &str, package: &str) -> bool {
    let qualifier = format!("{package}.");
    line.match_indices(&qualifier).any(|(at, _)| {
        !line[..at]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.')
    })
}
