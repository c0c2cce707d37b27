//! Reactive member extraction.
//!
//! Walks a class body and recognizes properties whose initializer is one of
//! the signal factory calls (`input(...)`, `output(...)`,
//! `input.required(...)`). Everything else is silently skipped: over-matching
//! is worse than under-matching for properties that are legitimately not
//! reactive members.

use swc_common::Spanned;
use swc_ecma_ast::{Callee, CallExpr, Class, ClassMember, ClassProp, Expr, MemberProp};

use crate::ast::{object_string_prop, prop_name_text};
use crate::project::SourceFileRecord;

/// Whether a member is an input or an output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Input,
    Output,
}

/// One declared input or output on a component class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalMember {
    pub name: String,
    pub kind: SignalKind,
    /// Only meaningful for inputs.
    pub required: bool,
    /// Textual type description; `"unknown"` when unrecoverable.
    pub type_text: String,
    /// External-facing name override; always non-empty when present.
    pub alias: Option<String>,
}

impl SignalMember {
    /// The externally visible name: the alias if set, otherwise the
    /// declared property name.
    pub fn effective_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// The closed set of recognized factory callee shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FactoryCallee {
    Input,
    Output,
    InputRequired,
}

/// Extracts the ordered sequence of reactive members declared on a class.
pub fn extract_signal_members(file: &SourceFileRecord, class: &Class) -> Vec<SignalMember> {
    let mut members = Vec::new();
    for member in &class.body {
        let ClassMember::ClassProp(prop) = member else {
            continue;
        };
        let Some(name) = prop_name_text(&prop.key) else {
            continue;
        };
        let Some(value) = prop.value.as_deref() else {
            continue;
        };
        let Expr::Call(call) = value else {
            continue;
        };
        let Some(factory) = classify_callee(&call.callee) else {
            continue;
        };
        let (kind, required) = match factory {
            FactoryCallee::Input => (SignalKind::Input, false),
            FactoryCallee::Output => (SignalKind::Output, false),
            FactoryCallee::InputRequired => (SignalKind::Input, true),
        };
        members.push(SignalMember {
            name,
            kind,
            required,
            type_text: resolve_type_text(file, prop, call, kind),
            alias: resolve_alias(call),
        });
    }
    members
}

/// Classifies a call's callee: the bare identifiers `input` / `output`, or
/// the `input.required` property access. Any other shape is not a factory.
fn classify_callee(callee: &Callee) -> Option<FactoryCallee> {
    let Callee::Expr(expr) = callee else {
        return None;
    };
    match expr.as_ref() {
        Expr::Ident(ident) => match ident.sym.as_str() {
            "input" => Some(FactoryCallee::Input),
            "output" => Some(FactoryCallee::Output),
            _ => None,
        },
        Expr::Member(member) => {
            let Expr::Ident(obj) = member.obj.as_ref() else {
                return None;
            };
            let MemberProp::Ident(prop) = &member.prop else {
                return None;
            };
            if obj.sym.as_str() == "input" && prop.sym.as_str() == "required" {
                Some(FactoryCallee::InputRequired)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Resolves the member's type text, first match wins: explicit generic
/// argument on the call, explicit annotation on the property, then the
/// inferred signal type run through [`sanitize_type_text`].
fn resolve_type_text(
    file: &SourceFileRecord,
    prop: &ClassProp,
    call: &CallExpr,
    kind: SignalKind,
) -> String {
    if let Some(type_args) = call.type_args.as_deref() {
        if let Some(first) = type_args.params.first() {
            return file.span_text(first.span()).to_string();
        }
    }
    if let Some(annotation) = prop.type_ann.as_deref() {
        return file.span_text(annotation.type_ann.span()).to_string();
    }
    sanitize_type_text(inferred_signal_type(kind))
}

/// The type an un-parameterized factory call produces.
fn inferred_signal_type(kind: SignalKind) -> &'static str {
    match kind {
        SignalKind::Input => "InputSignal<unknown>",
        SignalKind::Output => "OutputEmitterRef<unknown>",
    }
}

/// Collapses the factory's unresolved placeholder shapes, `any`, and empty
/// text to the literal `"unknown"`.
fn sanitize_type_text(type_text: &str) -> String {
    if type_text.contains("InputSignal<unknown>")
        || type_text.contains("OutputEmitterRef<unknown>")
        || type_text.is_empty()
        || type_text == "any"
    {
        return "unknown".to_string();
    }
    type_text.to_string()
}

/// Examines the call's first two arguments for an options object literal
/// carrying a string-valued `alias`. An empty alias is treated as absent.
fn resolve_alias(call: &CallExpr) -> Option<String> {
    for arg in call.args.iter().take(2) {
        if arg.spread.is_some() {
            continue;
        }
        let Expr::Object(obj) = arg.expr.as_ref() else {
            continue;
        };
        if let Some(alias) = object_string_prop(obj, "alias") {
            if !alias.is_empty() {
                return Some(alias);
            }
        }
    }
    None
}
