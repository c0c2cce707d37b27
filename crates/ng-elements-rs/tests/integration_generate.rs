//! Integration tests driving the compiled binary through temp-dir fixtures.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const SAMPLE_COMPONENT: &str = r#"
import { Component, input, output } from "@angular/core";

@Component({
  selector: "app-card",
  template: "<div></div>",
})
export class CardComponent {
  title = input<string>(undefined, { alias: "heading" });
  count = input.required<number>();
  active = input();
  updated = output<Date>();
  renamed = output<{ id: string }>({ alias: "renamed-event" });
}
"#;

fn run_binary(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ng-elements-rs"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run ng-elements-rs")
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn generates_artifacts_from_explicit_config() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/card.component.ts"), SAMPLE_COMPONENT).unwrap();
    fs::write(
        root.join("elements.config.json"),
        r#"{
            "elements": { "app-card": "src/card.component.ts#CardComponent" },
            "outDir": "dist",
            "elementOutputs": ["standalone"]
        }"#,
    )
    .unwrap();

    let output = run_binary(root, &["--config", "elements.config.json"]);
    assert!(
        output.status.success(),
        "generation failed: {}",
        stderr_of(&output)
    );

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("dist/custom-elements.json")).unwrap())
            .unwrap();
    assert_eq!(manifest["schemaVersion"], "1.0.0");
    let declaration = &manifest["modules"][0]["declarations"][0];
    assert_eq!(declaration["tagName"], "app-card");
    assert_eq!(declaration["name"], "CardComponent");
    assert_eq!(declaration["members"][0]["name"], "heading");
    assert_eq!(declaration["members"][0]["type"]["text"], "string");
    assert_eq!(declaration["members"][1]["name"], "count");
    assert_eq!(declaration["events"][0]["name"], "updated");
    assert_eq!(declaration["events"][1]["name"], "renamed-event");
    assert_eq!(declaration["events"][1]["type"]["text"], "{ id: string }");
    assert_eq!(declaration["attributes"], declaration["members"]);

    let typings = fs::read_to_string(root.join("dist/custom-elements.d.ts")).unwrap();
    assert!(typings.contains("export interface AppCardElement extends HTMLElement {}"));
    assert!(typings.contains("heading?: string;"));
    assert!(typings.contains("count: number;"));
    assert!(typings.contains("onRenamedEvent?: (e: CustomEvent<{ id: string }>) => void;"));
    assert!(typings.contains("\"app-card\": AppCardElement;"));

    let registration = fs::read_to_string(root.join("dist/elements.ts")).unwrap();
    assert!(registration.contains("const loadComponent0 = () => import(\"../src/card.component\");"));
    assert!(registration.contains("export async function registerElements()"));
    assert!(!registration.contains("ngElementsReady"));
}

#[test]
fn inline_browser_entry_without_build_runs_standalone_kind() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/card.component.ts"), SAMPLE_COMPONENT).unwrap();
    fs::write(
        root.join("elements.config.json"),
        r#"{
            "elements": [
                { "tag": "app-card", "component": "src/card.component.ts#CardComponent" }
            ],
            "outDir": "dist",
            "inlineComponents": true
        }"#,
    )
    .unwrap();

    let output = run_binary(root, &["--config", "elements.config.json"]);
    assert!(
        output.status.success(),
        "generation failed: {}",
        stderr_of(&output)
    );

    let registration = fs::read_to_string(root.join("dist/elements.ts")).unwrap();
    assert!(registration.contains("import * as Component0Module from \"../src/card.component\";"));
    assert!(registration.contains("{ tag: \"app-card\", component: Component0 },"));
}

#[test]
fn duplicate_tag_fails_before_any_write() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/card.component.ts"), SAMPLE_COMPONENT).unwrap();
    fs::write(
        root.join("elements.config.json"),
        r#"{
            "elements": [
                { "tag": "app-card", "component": "src/card.component.ts#CardComponent" },
                { "tag": "app-card", "component": "src/other.component.ts#OtherComponent" }
            ],
            "outDir": "dist"
        }"#,
    )
    .unwrap();

    let output = run_binary(root, &["--config", "elements.config.json"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("tag is duplicated: app-card"));
    assert!(!root.join("dist").exists(), "no artifact may be written");
}

#[test]
fn browser_output_without_build_target_fails() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/card.component.ts"), SAMPLE_COMPONENT).unwrap();
    fs::write(
        root.join("elements.config.json"),
        r#"{
            "elements": { "app-card": "src/card.component.ts#CardComponent" },
            "outDir": "dist",
            "elementOutputs": ["browser"]
        }"#,
    )
    .unwrap();

    let output = run_binary(root, &["--config", "elements.config.json"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("browser output requires a build target"));
    assert!(!root.join("dist").exists(), "no artifact may be written");
}

#[test]
fn discovery_mode_scans_the_tsconfig_context() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join("src/auto.component.ts"),
        r#"
        import { Component, input } from "@angular/core";

        @RegisterWebComponent("app-auto")
        @Component({ selector: "app-auto-selector", template: "" })
        export class AutoComponent {
          label = input<string>();
        }
        "#,
    )
    .unwrap();
    fs::write(
        root.join("tsconfig.json"),
        r#"{ "include": ["src"] }"#,
    )
    .unwrap();

    let output = run_binary(
        root,
        &["--tsconfig", "tsconfig.json", "--out-dir", "generated"],
    );
    assert!(
        output.status.success(),
        "discovery failed: {}",
        stderr_of(&output)
    );

    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(root.join("generated/custom-elements.json")).unwrap(),
    )
    .unwrap();
    let declaration = &manifest["modules"][0]["declarations"][0];
    assert_eq!(declaration["tagName"], "app-auto");
    assert_eq!(declaration["name"], "AutoComponent");
    assert_eq!(declaration["members"][0]["name"], "label");
}

#[test]
fn missing_component_class_fails_with_resolution_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/card.component.ts"), SAMPLE_COMPONENT).unwrap();
    fs::write(
        root.join("elements.config.json"),
        r#"{
            "elements": { "app-card": "src/card.component.ts#MissingComponent" },
            "outDir": "dist"
        }"#,
    )
    .unwrap();

    let output = run_binary(root, &["--config", "elements.config.json"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("cannot be resolved to a class: MissingComponent"));
}

#[test]
fn unsupported_output_kind_fails() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(
        root.join("elements.config.json"),
        r#"{ "elements": {}, "elementOutputs": ["webview"] }"#,
    )
    .unwrap();

    let output = run_binary(root, &["--config", "elements.config.json"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("unsupported output kind: webview"));
}

#[test]
fn unparsable_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("elements.config.json"), "{ not json").unwrap();

    let output = run_binary(root, &["--config", "elements.config.json"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("generator config could not be parsed"));
}
