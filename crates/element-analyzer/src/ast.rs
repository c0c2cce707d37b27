//! Small helpers shared by the extraction, discovery, and normalization
//! walks.

use swc_ecma_ast::{
    Callee, Class, Decorator, Expr, KeyValueProp, Lit, MemberProp, ObjectLit, Prop, PropName,
    PropOrSpread, Str,
};

/// Gets the textual name of a property key, for identifier and string keys.
/// Computed, numeric, and bigint keys have no stable name and yield `None`.
pub(crate) fn prop_name_text(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => str_value(s).map(str::to_string),
        _ => None,
    }
}

/// Gets a string value from a Str literal.
pub(crate) fn str_value(s: &Str) -> Option<&str> {
    s.value.as_str()
}

/// Looks up a string-valued property by name in an object literal.
/// Shorthand, spread, and non-string values are ignored.
pub(crate) fn object_string_prop(obj: &ObjectLit, name: &str) -> Option<String> {
    for prop in &obj.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        let Prop::KeyValue(KeyValueProp { key, value }) = prop.as_ref() else {
            continue;
        };
        if prop_name_text(key).as_deref() != Some(name) {
            continue;
        }
        if let Expr::Lit(Lit::Str(s)) = value.as_ref() {
            return str_value(s).map(str::to_string);
        }
    }
    None
}

/// Finds a class decorator by name. Matches the bare identifier, call, and
/// namespaced member forms.
pub(crate) fn find_decorator<'a>(class: &'a Class, name: &str) -> Option<&'a Decorator> {
    class
        .decorators
        .iter()
        .find(|decorator| decorator_name(&decorator.expr) == Some(name))
}

pub(crate) fn decorator_name(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Call(call) => {
            let Callee::Expr(callee) = &call.callee else {
                return None;
            };
            decorator_name(callee)
        }
        Expr::Ident(ident) => Some(ident.sym.as_str()),
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(prop) => Some(prop.sym.as_str()),
            _ => None,
        },
        _ => None,
    }
}

/// Returns the decorator call's first argument when it is a plain object
/// literal.
pub(crate) fn decorator_first_arg_object(decorator: &Decorator) -> Option<&ObjectLit> {
    let Expr::Call(call) = decorator.expr.as_ref() else {
        return None;
    };
    let first = call.args.first()?;
    if first.spread.is_some() {
        return None;
    }
    match first.expr.as_ref() {
        Expr::Object(obj) => Some(obj),
        _ => None,
    }
}
