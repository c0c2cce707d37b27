//! Registration source emission.
//!
//! Produces the TypeScript module that instantiates a hosting application
//! and registers each component as a custom element. Two import strategies
//! share one registration routine: static imports for single-file bundles,
//! dynamic-import loaders for lazy chunking.

use std::fmt::Write as _;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use element_analyzer::ComponentMetadata;

/// Which artifact the registration source is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationMode {
    /// Bundle entry: self-invokes registration at load time and publishes
    /// the completion promise on the `ngElementsReady` global.
    BrowserEntry,
    /// Standalone module: exposes `registerElements` for the caller.
    Standalone,
}

/// Options for [`emit_registration`].
#[derive(Debug, Clone)]
pub struct RegistrationOptions {
    pub mode: RegistrationMode,
    /// Directory the emitted module will live in; import paths are computed
    /// relative to it.
    pub out_dir: Utf8PathBuf,
    /// Extension appended to import specifiers (e.g. `"js"`), when set.
    pub import_extension: Option<String>,
    /// Static imports so the bundler emits a single file (no lazy chunks).
    pub inline_components: bool,
}

/// The well-known global a browser entry publishes its readiness on.
pub const READY_GLOBAL: &str = "ngElementsReady";

/// Builds the registration module text. Pure; component order follows the
/// input.
pub fn emit_registration(components: &[ComponentMetadata], options: &RegistrationOptions) -> String {
    let mut out = String::new();
    out.push_str("import \"@angular/compiler\";\n");
    out.push_str("import { createApplication } from \"@angular/platform-browser\";\n");
    out.push_str("import { createCustomElement } from \"@angular/elements\";\n\n");

    if options.inline_components {
        emit_inline_definitions(&mut out, components, options);
    } else {
        emit_lazy_definitions(&mut out, components, options);
    }

    if options.mode == RegistrationMode::BrowserEntry {
        out.push_str("\n");
        let _ = writeln!(
            out,
            "var {} = registerElements().catch(function (err) {{",
            READY_GLOBAL
        );
        out.push_str(
            "  if (typeof console !== \"undefined\" && console.error) console.error(\"[ng-elements-rs] Registration failed:\", err);\n",
        );
        out.push_str("  throw err;\n");
        out.push_str("});\n");
        let _ = writeln!(
            out,
            "if (typeof window !== \"undefined\") (window as unknown as Record<string, unknown>)[\"{}\"] = {};",
            READY_GLOBAL, READY_GLOBAL
        );
    }

    out
}

/// Static strategy: one eager import per component, definitions carry the
/// resolved component value.
fn emit_inline_definitions(
    out: &mut String,
    components: &[ComponentMetadata],
    options: &RegistrationOptions,
) {
    for (index, component) in components.iter().enumerate() {
        let specifier = module_specifier(
            &component.file_path,
            &options.out_dir,
            options.import_extension.as_deref(),
        );
        let _ = writeln!(
            out,
            "import * as Component{}Module from \"{}\";",
            index, specifier
        );
        let _ = writeln!(
            out,
            "const Component{} = (Component{}Module as Record<string, unknown>)[\"{}\"];",
            index, index, component.class_name
        );
    }

    out.push_str("\nconst elementDefinitions = [\n");
    for (index, component) in components.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {{ tag: \"{}\", component: Component{} }},",
            component.tag, index
        );
    }
    out.push_str("];\n\n");

    out.push_str("export async function registerElements() {\n");
    out.push_str("  const app = await createApplication();\n");
    out.push_str("  for (const def of elementDefinitions) {\n");
    out.push_str("    if (customElements.get(def.tag)) {\n");
    out.push_str("      continue;\n");
    out.push_str("    }\n");
    out.push_str("    const element = createCustomElement(def.component as import(\"@angular/core\").Type<unknown>, { injector: app.injector });\n");
    out.push_str("    customElements.define(def.tag, element);\n");
    out.push_str("  }\n");
    out.push_str("}\n");
}

/// Lazy strategy: one zero-argument dynamic-import loader per component;
/// registration resolves the named export, falls back to the default
/// export, and fails loudly when neither exists.
fn emit_lazy_definitions(
    out: &mut String,
    components: &[ComponentMetadata],
    options: &RegistrationOptions,
) {
    for (index, component) in components.iter().enumerate() {
        let specifier = module_specifier(
            &component.file_path,
            &options.out_dir,
            options.import_extension.as_deref(),
        );
        let _ = writeln!(
            out,
            "const loadComponent{} = () => import(\"{}\");",
            index, specifier
        );
    }

    out.push_str("\nconst elementDefinitions = [\n");
    for (index, component) in components.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {{ tag: \"{}\", className: \"{}\", load: loadComponent{} }},",
            component.tag, component.class_name, index
        );
    }
    out.push_str("];\n\n");

    out.push_str("export async function registerElements() {\n");
    out.push_str("  const app = await createApplication();\n");
    out.push_str("  for (const def of elementDefinitions) {\n");
    out.push_str("    if (customElements.get(def.tag)) {\n");
    out.push_str("      continue;\n");
    out.push_str("    }\n");
    out.push_str("    const module = await def.load();\n");
    out.push_str("    const component = module[def.className] ?? module.default;\n");
    out.push_str("    if (!component) {\n");
    out.push_str("      throw new Error(`registerElements: ${def.className} not found in module for ${def.tag}`);\n");
    out.push_str("    }\n");
    out.push_str("    const element = createCustomElement(component, { injector: app.injector });\n");
    out.push_str("    customElements.define(def.tag, element);\n");
    out.push_str("  }\n");
    out.push_str("}\n");
}

/// Computes the import specifier for a component source: its path relative
/// to the output directory, `/`-separated, source extension stripped, the
/// configured extension appended, and `./`-prefixed when not already
/// relative.
fn module_specifier(
    file_path: &Utf8Path,
    out_dir: &Utf8Path,
    import_extension: Option<&str>,
) -> String {
    let mut specifier = strip_source_extension(&relative_path(out_dir, file_path));
    if let Some(extension) = import_extension {
        specifier.push('.');
        specifier.push_str(extension.trim_start_matches('.'));
    }
    if specifier.starts_with('.') {
        specifier
    } else {
        format!("./{}", specifier)
    }
}

/// `/`-joined path of `to` relative to the directory `from`. Both paths must
/// be rooted the same way (both workspace-relative or both absolute).
fn relative_path(from: &Utf8Path, to: &Utf8Path) -> String {
    let from: Vec<&str> = normal_components(from);
    let to: Vec<&str> = normal_components(to);
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..from.len() {
        parts.push("..");
    }
    parts.extend(&to[common..]);
    parts.join("/")
}

fn normal_components(path: &Utf8Path) -> Vec<&str> {
    path.components()
        .filter(|component| !matches!(component, Utf8Component::CurDir))
        .map(|component| component.as_str())
        .collect()
}

/// Removes a final `.ext` from the path's last segment, mirroring the
/// behavior of stripping `/\.[^/.]+$/`.
fn strip_source_extension(path: &str) -> String {
    let last_slash = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    let file_name = &path[last_slash..];
    if let Some(dot) = file_name.rfind('.') {
        let extension = &file_name[dot + 1..];
        if !extension.is_empty() {
            return path[..last_slash + dot].to_string();
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn component(tag: &str, class_name: &str, file_path: &str) -> ComponentMetadata {
        ComponentMetadata {
            tag: tag.to_string(),
            class_name: class_name.to_string(),
            file_path: Utf8PathBuf::from(file_path),
            members: Vec::new(),
        }
    }

    fn options(mode: RegistrationMode, inline: bool) -> RegistrationOptions {
        RegistrationOptions {
            mode,
            out_dir: Utf8PathBuf::from("dist"),
            import_extension: None,
            inline_components: inline,
        }
    }

    #[test]
    fn module_specifiers_are_relative_and_extension_free() {
        assert_eq!(
            module_specifier(
                Utf8Path::new("src/card.component.ts"),
                Utf8Path::new("dist"),
                None
            ),
            "../src/card.component"
        );
        assert_eq!(
            module_specifier(
                Utf8Path::new("dist/widget.ts"),
                Utf8Path::new("dist"),
                None
            ),
            "./widget"
        );
        assert_eq!(
            module_specifier(
                Utf8Path::new("src/card.component.ts"),
                Utf8Path::new("dist"),
                Some("js")
            ),
            "../src/card.component.js"
        );
        assert_eq!(
            module_specifier(
                Utf8Path::new("./src/app.ts"),
                Utf8Path::new("./dist/out"),
                Some(".mjs")
            ),
            "../../src/app.mjs"
        );
    }

    #[test]
    fn inline_mode_emits_static_imports_and_eager_definitions() {
        let source = emit_registration(
            &[component("app-card", "CardComponent", "src/card.component.ts")],
            &options(RegistrationMode::Standalone, true),
        );

        assert!(source.contains("import * as Component0Module from \"../src/card.component\";"));
        assert!(source.contains(
            "const Component0 = (Component0Module as Record<string, unknown>)[\"CardComponent\"];"
        ));
        assert!(source.contains("{ tag: \"app-card\", component: Component0 },"));
        assert!(source.contains("export async function registerElements()"));
        assert!(!source.contains("load:"));
    }

    #[test]
    fn lazy_mode_emits_loaders_with_export_fallback() {
        let source = emit_registration(
            &[component("app-card", "CardComponent", "src/card.component.ts")],
            &options(RegistrationMode::Standalone, false),
        );

        assert!(source.contains("const loadComponent0 = () => import(\"../src/card.component\");"));
        assert!(source.contains(
            "{ tag: \"app-card\", className: \"CardComponent\", load: loadComponent0 },"
        ));
        assert!(source.contains("const component = module[def.className] ?? module.default;"));
        assert!(source
            .contains("throw new Error(`registerElements: ${def.className} not found in module for ${def.tag}`);"));
    }

    #[test]
    fn registration_routine_skips_already_registered_tags() {
        for inline in [true, false] {
            let source = emit_registration(
                &[component("app-card", "CardComponent", "src/card.component.ts")],
                &options(RegistrationMode::Standalone, inline),
            );
            assert!(source.contains("if (customElements.get(def.tag)) {"));
            assert!(source.contains("const app = await createApplication();"));
            assert!(source.contains("customElements.define(def.tag, element);"));
        }
    }

    #[test]
    fn browser_entry_publishes_ready_global() {
        let source = emit_registration(
            &[component("app-card", "CardComponent", "src/card.component.ts")],
            &options(RegistrationMode::BrowserEntry, true),
        );
        assert!(source.contains("var ngElementsReady = registerElements().catch(function (err) {"));
        assert!(source.contains("[\"ngElementsReady\"] = ngElementsReady;"));
    }

    #[test]
    fn standalone_module_does_not_self_invoke() {
        let source = emit_registration(
            &[component("app-card", "CardComponent", "src/card.component.ts")],
            &options(RegistrationMode::Standalone, true),
        );
        assert!(!source.contains("ngElementsReady"));
    }

    #[test]
    fn definitions_preserve_component_order() {
        let source = emit_registration(
            &[
                component("app-one", "OneComponent", "src/one.ts"),
                component("app-two", "TwoComponent", "src/two.ts"),
            ],
            &options(RegistrationMode::Standalone, false),
        );
        let one = source.find("\"app-one\"").unwrap();
        let two = source.find("\"app-two\"").unwrap();
        assert!(one < two);
    }
}
