//! Map a Rust function signature onto [`Signature`].

use syn::{FnArg, GenericArgument, Pat, PathArguments, ReturnType, Type};

use crate::ir::{Parameter, Signature, ValueKind};

/// Describe `sig`, or explain why it cannot be dispatched to.
pub fn describe(sig: &syn::Signature) -> Result<Signature, String> {
    if sig.asyncness.is_some() {
        return Err("async functions cannot be commands".to_owned());
    }
    if sig.unsafety.is_some() {
        return Err("unsafe functions cannot be commands".to_owned());
    }
    if !sig.generics.params.is_empty() {
        return Err("generic functions cannot be commands".to_owned());
    }
    if sig.variadic.is_some() {
        return Err("variadic functions cannot be commands".to_owned());
    }

    let mut arguments = Vec::with_capacity(sig.inputs.len());
    for input in &sig.inputs {
        match input {
            FnArg::Receiver(_) => return Err("methods cannot be commands".to_owned()),
            FnArg::Typed(typed) => {
                let name = match typed.pat.as_ref() {
                    Pat::Ident(binding) => Some(binding.ident.to_string()),
                    _ => None,
                };
                let (kind, is_optional) = match option_inner(&typed.ty) {
                    Some(inner) => (kind_of(inner), true),
                    None => (kind_of(&typed.ty), false),
                };
                arguments.push(Parameter { name, kind, is_optional });
            }
        }
    }

    Ok(Signature { arguments, returns: returns(&sig.output) })
}

fn returns(output: &ReturnType) -> Vec<Parameter> {
    let ReturnType::Type(_, ty) = output else {
        return Vec::new();
    };
    match result_ok(ty) {
        Some(ok) => {
            let mut values = values(ok);
            values.push(Parameter::unnamed(ValueKind::Error));
            values
        }
        // bare `Result` alias with its arguments hidden
        None if is_named(ty, "Result") => vec![Parameter::unnamed(ValueKind::Error)],
        None => values(ty),
    }
}

/// One entry per returned value; unit is none.
fn values(ty: &Type) -> Vec<Parameter> {
    match strip(ty) {
        Type::Tuple(tuple) => tuple.elems.iter().map(|t| Parameter::unnamed(kind_of(t))).collect(),
        other => vec![Parameter::unnamed(kind_of(other))],
    }
}

fn kind_of(ty: &Type) -> ValueKind {
    let Type::Path(path) = strip(ty) else {
        return ValueKind::Opaque;
    };
    if path.qself.is_some() {
        return ValueKind::Opaque;
    }
    let Some(last) = path.path.segments.last() else {
        return ValueKind::Opaque;
    };
    if !last.arguments.is_none() {
        return ValueKind::Opaque;
    }
    match last.ident.to_string().as_str() {
        "isize" => ValueKind::Int,
        "usize" => ValueKind::UInt,
        "f32" => ValueKind::Float32,
        "bool" => ValueKind::Bool,
        "String" => ValueKind::String,
        _ => ValueKind::Opaque,
    }
}

/// `T` of `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    generic_args(ty, "Option").and_then(|mut args| args.next())
}

/// `T` of `Result<T, E>` or `Result<T>`.
fn result_ok(ty: &Type) -> Option<&Type> {
    generic_args(ty, "Result").and_then(|mut args| args.next())
}

fn is_named(ty: &Type, name: &str) -> bool {
    match strip(ty) {
        Type::Path(path) => path.path.segments.last().is_some_and(|s| s.ident == name),
        _ => false,
    }
}

/// Type arguments of `ty` when its last path segment is `name<..>`.
fn generic_args<'a>(ty: &'a Type, name: &str) -> Option<impl Iterator<Item = &'a Type>> {
    let Type::Path(path) = strip(ty) else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident != name {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    Some(args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    }))
}

fn strip(ty: &Type) -> &Type {
    match ty {
        Type::Paren(inner) => strip(&inner.elem),
        Type::Group(inner) => strip(&inner.elem),
        other => other,
    }
}
