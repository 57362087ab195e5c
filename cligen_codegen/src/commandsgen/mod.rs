//! # Dispatcher generation
//!
//! Compiles a [`Program`] into the source text of one module:
//!
//! ```text
//! pub mod <module_name> {
//!     pub enum Target { .. }                      // one variant per command
//!     pub static COMMANDS: &[(&str, Target)]      // lower-cased names, sorted
//!     pub fn lookup(name: &str) -> Option<Target> // case-insensitive
//!     pub const USAGE: &str
//!     pub fn start<S: AsRef<str>>(raw_args: &[S]) -> Result<(), DispatchError>
//! }
//! ```
//!
//! `start` takes the command name from the first raw argument, slices the rest
//! with `cligen_runtime::slice`, checks arity, converts positionals in order and
//! optional flags by name, then calls the target.
//!
//! Parameter kinds map onto Rust types as follows:
//!
//! | Kind    | Rust     | Conversion                  |
//! |---------|----------|-----------------------------|
//! | Int     | `isize`  | `cligen_runtime::parse_int` |
//! | UInt    | `usize`  | `cligen_runtime::parse_uint`|
//! | Float32 | `f32`    | `cligen_runtime::parse_f32` |
//! | Bool    | `bool`   | `cligen_runtime::parse_bool`|
//! | String  | `String` | cloned                      |
//! | Opaque  | -        | optional only, always `None`|
//!
//! A target with an `Error` return must return `Result<_, E>` where
//! `E: Into<Box<dyn Error + Send + Sync>>`; an `Err` surfaces as
//! `DispatchError::Command`. Every other return value is discarded.
//!
//! All identifiers local to the generated module come from [`IdentAllocator`].

use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::LitStr;
use tracing::{debug, info};

use crate::RESERVED_COMMAND;
use crate::error::GenerationError;
use crate::ident::IdentAllocator;
use crate::ir::{Command, Parameter, Program, ValueKind};

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// @generated by cligen. Do not edit.";

/// Item names the generated module defines itself.
const MODULE_ITEMS: &[&str] = &["Target", "COMMANDS", "USAGE", "lookup", "start"];

/// Generate dispatcher source for `program` with the default identifier seed.
pub fn generate(program: &Program) -> Result<String, GenerationError> {
    generate_with(program, &mut IdentAllocator::new())
}

/// Generate dispatcher source, drawing local identifiers from `idents`.
pub fn generate_with(program: &Program, idents: &mut IdentAllocator) -> Result<String, GenerationError> {
    let commands = validate(program)?;

    for item in MODULE_ITEMS {
        idents.reserve(*item);
    }
    for entry in &commands {
        // A local binding can only shadow the first segment of a target path.
        if let Some(first) = entry.path.segments.first() {
            idents.reserve(first.ident.to_string());
        }
    }

    let tokens = emit_module(program, &commands, idents)?;
    let file: syn::File = syn::parse2(tokens)?;
    let text = format!("{GENERATED_HEADER}\n{}", prettyplease::unparse(&file));

    // The emitted text must stand on its own as a Rust file.
    syn::parse_file(&text)?;

    info!(
        module = %program.module_name,
        commands = commands.len(),
        bytes = text.len(),
        "generated dispatcher"
    );
    Ok(text)
}

/// A command that passed validation, with its lower-cased lookup key and parsed path.
struct Entry<'a> {
    key: String,
    command: &'a Command,
    path: syn::Path,
}

/// Check the whole program before anything is emitted. Entries come back sorted by key.
fn validate(program: &Program) -> Result<Vec<Entry<'_>>, GenerationError> {
    if syn::parse_str::<Ident>(&program.module_name).is_err() {
        return Err(GenerationError::InvalidModuleName { name: program.module_name.clone() });
    }

    let mut entries: Vec<Entry<'_>> = Vec::with_capacity(program.commands.len());

    for (registered, command) in &program.commands {
        if *registered != command.exposed_name {
            return Err(GenerationError::MismatchedKey {
                key: registered.clone(),
                exposed: command.exposed_name.clone(),
            });
        }

        let key = command.exposed_name.to_lowercase();
        let name = &command.internal_name;

        if key == RESERVED_COMMAND {
            return Err(GenerationError::ReservedName { command: name.clone() });
        }
        if entries.iter().any(|e| e.key == key) {
            return Err(GenerationError::DuplicateCommand { name: command.exposed_name.clone() });
        }

        let path = syn::parse_str::<syn::Path>(name).map_err(|_| GenerationError::InvalidPath {
            command: command.exposed_name.clone(),
            path: name.clone(),
        })?;

        for (i, param) in command.signature.arguments.iter().enumerate() {
            let position = i + 1;
            match (param.kind, param.is_optional) {
                (ValueKind::Error, _) => {
                    return Err(GenerationError::ErrorParameter {
                        command: command.exposed_name.clone(),
                        parameter: param.label(position),
                    });
                }
                (ValueKind::Opaque, false) => {
                    return Err(GenerationError::UnsupportedType {
                        command: command.exposed_name.clone(),
                        parameter: param.label(position),
                    });
                }
                (_, true) if param.name.is_none() => {
                    return Err(GenerationError::UnnamedOptional {
                        command: command.exposed_name.clone(),
                        position,
                    });
                }
                _ => {}
            }
        }

        if command.signature.error_returns() > 1 {
            return Err(GenerationError::MultipleErrorReturns { command: command.exposed_name.clone() });
        }

        entries.push(Entry { key, command, path });
    }

    entries.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(entries)
}

/// Locals of `start` shared by every dispatch arm.
struct StartLocals {
    input: Ident,
    first: Ident,
    target: Ident,
    flags: Ident,
    args: Ident,
}

fn emit_module(
    program: &Program,
    entries: &[Entry<'_>],
    idents: &mut IdentAllocator,
) -> Result<TokenStream2, GenerationError> {
    let mod_ident = format_ident!("{}", program.module_name);

    let mut variants: Vec<Ident> = Vec::with_capacity(entries.len());
    for _ in entries {
        variants.push(idents.next(true)?);
    }

    let lookup_name = idents.next(false)?;
    let lookup_key = idents.next(false)?;
    let lookup_entry = idents.next(false)?;
    let lookup_index = idents.next(false)?;

    let locals = StartLocals {
        input: idents.next(false)?,
        first: idents.next(false)?,
        target: idents.next(false)?,
        flags: idents.next(false)?,
        args: idents.next(false)?,
    };

    let mut variant_decls: Vec<TokenStream2> = Vec::new();
    let mut name_arms: Vec<TokenStream2> = Vec::new();
    let mut description_arms: Vec<TokenStream2> = Vec::new();
    let mut table: Vec<TokenStream2> = Vec::new();
    let mut dispatch_arms: Vec<TokenStream2> = Vec::new();

    for (entry, variant) in entries.iter().zip(&variants) {
        let command = entry.command;
        let exposed = LitStr::new(&command.exposed_name, Span::call_site());
        let description = LitStr::new(&command.description, Span::call_site());
        let key = LitStr::new(&entry.key, Span::call_site());
        let doc = format!(" `{}` calls `{}`.", command.exposed_name, command.internal_name);

        variant_decls.push(quote! {
            #[doc = #doc]
            #variant
        });
        name_arms.push(quote! { Target::#variant => #exposed, });
        description_arms.push(quote! { Target::#variant => #description, });
        table.push(quote! { (#key, Target::#variant) });

        let body = emit_arm(entry, &locals, idents)?;
        dispatch_arms.push(quote! { Target::#variant => { #body } });
        debug!(
            command = %command.exposed_name,
            target = %command.internal_name,
            arguments = command.signature.arguments.len(),
            "emitted dispatch arm"
        );
    }

    let usage = LitStr::new(&usage_text(entries), Span::call_site());
    let module_doc = format!(
        " Dispatcher for {} command(s). Generated by cligen.",
        entries.len()
    );

    let StartLocals { input, first, target, flags, args } = &locals;

    Ok(quote! {
        #[allow(dead_code, unused_variables, unreachable_code, unreachable_patterns, clippy::all)]
        pub mod #mod_ident {
            #![doc = #module_doc]

            /// Every exposed command.
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
            pub enum Target {
                #( #variant_decls ),*
            }

            impl Target {
                /// Name users type.
                pub const fn name(self) -> &'static str {
                    match self {
                        #( #name_arms )*
                    }
                }

                /// One-line summary shown in `USAGE`.
                pub const fn description(self) -> &'static str {
                    match self {
                        #( #description_arms )*
                    }
                }
            }

            /// Lower-cased command names, sorted for binary search.
            pub static COMMANDS: &[(&str, Target)] = &[ #( #table ),* ];

            /// Resolve a command name, ignoring case.
            pub fn lookup(#lookup_name: &str) -> Option<Target> {
                let #lookup_key = #lookup_name.to_lowercase();
                COMMANDS
                    .binary_search_by(|(#lookup_entry, _)| (*#lookup_entry).cmp(#lookup_key.as_str()))
                    .ok()
                    .map(|#lookup_index| COMMANDS[#lookup_index].1)
            }

            pub const USAGE: &str = #usage;

            /// Run the command named by the first raw argument, passing it the rest.
            pub fn start<S: AsRef<str>>(#input: &[S]) -> Result<(), ::cligen_runtime::DispatchError> {
                let Some(#first) = #input.first() else {
                    return Err(::cligen_runtime::ArgumentError::Insufficient.into());
                };
                let #first: &str = #first.as_ref();

                if #first.eq_ignore_ascii_case(#RESERVED_COMMAND) {
                    print!("{}", USAGE);
                    return Ok(());
                }

                let Some(#target) = lookup(#first) else {
                    return Err(::cligen_runtime::ArgumentError::NoMatchingTarget(#first.to_owned()).into());
                };

                let (#flags, #args) = ::cligen_runtime::slice(&#input[1..])?;

                match #target {
                    #( #dispatch_arms )*
                }
            }
        }
    })
}

/// Body of one dispatch arm: arity check, conversions in declaration order, call.
fn emit_arm(
    entry: &Entry<'_>,
    locals: &StartLocals,
    idents: &mut IdentAllocator,
) -> Result<TokenStream2, GenerationError> {
    let signature = &entry.command.signature;
    let args = &locals.args;
    let flags = &locals.flags;

    let required = signature.required_count();
    let arity = if required > 0 {
        quote! {
            if #args.len() < #required {
                return Err(::cligen_runtime::ArgumentError::NotEnough {
                    expected: #required,
                    found: #args.len(),
                }
                .into());
            }
        }
    } else {
        quote! {}
    };

    let mut bindings: Vec<TokenStream2> = Vec::new();
    let mut call_args: Vec<Ident> = Vec::new();
    let mut cursor = 0usize;

    for (i, param) in signature.arguments.iter().enumerate() {
        let binding = idents.next(false)?;
        let label = param.label(i + 1);

        let stmt = if param.is_optional {
            // validate() guarantees optional parameters are named
            let key = param.name.as_deref().unwrap_or_default().to_lowercase();
            emit_optional(&binding, param, &key, &label, flags, idents)?
        } else {
            let stmt = emit_required(&binding, param, cursor, &label, args);
            cursor += 1;
            stmt
        };

        bindings.push(stmt);
        call_args.push(binding);
    }

    let path = &entry.path;
    let call = quote! { #path( #( #call_args ),* ) };
    let invoke = if signature.error_returns() == 1 {
        let err = idents.next(false)?;
        quote! {
            if let Err(#err) = #call {
                return Err(::cligen_runtime::DispatchError::command(#err));
            }
        }
    } else {
        quote! { let _ = #call; }
    };

    Ok(quote! {
        #arity
        #( #bindings )*
        #invoke
        Ok(())
    })
}

/// `(type, converter)` for a kind; `None` converter means clone the raw text.
fn conversion(kind: ValueKind) -> Option<(TokenStream2, Option<Ident>)> {
    match kind {
        ValueKind::Int => Some((quote!(isize), Some(format_ident!("parse_int")))),
        ValueKind::UInt => Some((quote!(usize), Some(format_ident!("parse_uint")))),
        ValueKind::Float32 => Some((quote!(f32), Some(format_ident!("parse_f32")))),
        ValueKind::Bool => Some((quote!(bool), Some(format_ident!("parse_bool")))),
        ValueKind::String => Some((quote!(String), None)),
        ValueKind::Error | ValueKind::Opaque => None,
    }
}

fn emit_required(binding: &Ident, param: &Parameter, index: usize, label: &str, args: &Ident) -> TokenStream2 {
    let Some((ty, parse)) = conversion(param.kind) else {
        // rejected by validate()
        return quote! {};
    };
    let value = match parse {
        Some(parse) => quote! { ::cligen_runtime::#parse(&#args[#index], #label)? },
        None => quote! { #args[#index].clone() },
    };
    quote! { let #binding: #ty = #value; }
}

fn emit_optional(
    binding: &Ident,
    param: &Parameter,
    key: &str,
    label: &str,
    flags: &Ident,
    idents: &mut IdentAllocator,
) -> Result<TokenStream2, GenerationError> {
    let Some((ty, parse)) = conversion(param.kind) else {
        // Nothing can be parsed into an opaque value; it is always absent.
        return Ok(quote! { let #binding = None; });
    };

    let raw = idents.next(false)?;
    let value = match parse {
        Some(parse) => quote! { ::cligen_runtime::#parse(#raw, #label)? },
        None => quote! { #raw.clone() },
    };
    Ok(quote! {
        let #binding: Option<#ty> = match #flags.get(#key) {
            Some(#raw) => Some(#value),
            None => None,
        };
    })
}

fn usage_text(entries: &[Entry<'_>]) -> String {
    let mut text = String::from("Usage: <command> [flags] [arguments]\n\nCommands:\n");

    for entry in entries {
        let command = entry.command;
        let mut line = format!("  {}", command.exposed_name);
        for (i, param) in command.signature.arguments.iter().enumerate() {
            let label = param.label(i + 1);
            if param.is_optional {
                line.push_str(&format!(" [--{}=<{}>]", label.to_lowercase(), param.kind));
            } else {
                line.push_str(&format!(" <{}: {}>", label, param.kind));
            }
        }
        text.push_str(&line);
        text.push('\n');
        if !command.description.is_empty() {
            text.push_str(&format!("      {}\n", command.description));
        }
    }

    text.push_str("  help\n      Show this message\n");
    text
}

// ================= TESTS ==========================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Signature;

    fn command(internal: &str, exposed: &str, arguments: Vec<Parameter>, returns: Vec<Parameter>) -> Command {
        Command {
            internal_name: internal.into(),
            exposed_name: exposed.into(),
            signature: Signature { arguments, returns },
            description: format!("runs {exposed}"),
        }
    }

    fn program(commands: Vec<Command>) -> Program {
        let mut program = Program::new("cli");
        for c in commands {
            program.insert(c);
        }
        program
    }

    fn demo() -> Program {
        program(vec![
            command(
                "crate::repeat",
                "repeat",
                vec![
                    Parameter::required("count", ValueKind::Int),
                    Parameter::optional("verbose", ValueKind::Bool),
                ],
                vec![Parameter::unnamed(ValueKind::Error)],
            ),
            command(
                "crate::math::scale",
                "Scale",
                vec![
                    Parameter::required("value", ValueKind::Float32),
                    Parameter::required("times", ValueKind::UInt),
                    Parameter::optional("label", ValueKind::String),
                    Parameter::optional("handle", ValueKind::Opaque),
                ],
                vec![Parameter::unnamed(ValueKind::Float32)],
            ),
            command("crate::ping", "ping", vec![], vec![]),
        ])
    }

    #[test]
    fn test_output_is_a_rust_file_with_entry_point() {
        let text = generate(&demo()).unwrap();
        assert!(text.starts_with(GENERATED_HEADER));

        let file = syn::parse_file(&text).unwrap();
        let syn::Item::Mod(module) = &file.items[0] else {
            panic!("expected a module");
        };
        assert_eq!(module.ident, "cli");

        let (_, items) = module.content.as_ref().unwrap();
        let names: Vec<String> = items
            .iter()
            .filter_map(|item| match item {
                syn::Item::Fn(f) => Some(f.sig.ident.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["lookup", "start"]);
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate(&demo()).unwrap(), generate(&demo()).unwrap());
    }

    #[test]
    fn test_targets_and_conversions_are_emitted() {
        let text = generate(&demo()).unwrap();
        for needle in [
            "crate::repeat(",
            "crate::math::scale(",
            "crate::ping()",
            "::cligen_runtime::parse_int(",
            "::cligen_runtime::parse_f32(",
            "::cligen_runtime::parse_uint(",
            "::cligen_runtime::parse_bool(",
            "::cligen_runtime::DispatchError::command(",
            "\"verbose\"",
            "(\"scale\", Target::",
        ] {
            assert!(text.contains(needle), "missing `{needle}` in\n{text}");
        }
    }

    #[test]
    fn test_output_is_formatted_one_item_per_line() {
        let text = generate(&demo()).unwrap();
        assert!(text.lines().count() > 40, "{text}");

        let starts: Vec<&str> = text.lines().map(str::trim_start).collect();
        for head in ["pub mod cli {", "pub enum Target {", "pub fn lookup(", "pub fn start<S: AsRef<str>>("] {
            assert!(starts.iter().any(|line| line.starts_with(head)), "no line starts with `{head}` in\n{text}");
        }

        // Both accessors on `Target` carry docs.
        assert!(text.contains("/// Name users type."));
        assert!(text.contains("/// One-line summary shown in `USAGE`."));
    }

    #[test]
    fn test_positional_cursor_skips_optionals() {
        let p = program(vec![command(
            "crate::mix",
            "mix",
            vec![
                Parameter::required("a", ValueKind::Int),
                Parameter::optional("v", ValueKind::Bool),
                Parameter::required("b", ValueKind::UInt),
                Parameter::optional("s", ValueKind::String),
            ],
            vec![],
        )]);
        let text = generate(&p).unwrap();
        assert!(text.contains("[0usize], \"a\")"), "{text}");
        assert!(text.contains("[1usize], \"b\")"), "{text}");
        assert!(text.contains("expected: 2usize"), "{text}");
        assert!(text.contains(".get(\"v\")") && text.contains(".get(\"s\")"), "{text}");
    }

    #[test]
    fn test_commands_table_is_sorted_by_lowercase_name() {
        let text = generate(&demo()).unwrap();
        let ping = text.find("(\"ping\"").unwrap();
        let repeat = text.find("(\"repeat\"").unwrap();
        let scale = text.find("(\"scale\"").unwrap();
        assert!(ping < repeat && repeat < scale);
    }

    #[test]
    fn test_usage_lists_every_command() {
        let program = demo();
        let entries = validate(&program).unwrap();
        let usage = usage_text(&entries);
        assert!(usage.contains("  repeat <count: isize> [--verbose=<bool>]\n      runs repeat\n"));
        assert!(usage.contains("  Scale <value: f32> <times: usize> [--label=<String>] [--handle=<value>]"));
        assert!(usage.contains("  ping\n"));
        assert!(usage.ends_with("  help\n      Show this message\n"));
    }

    #[test]
    fn test_empty_program_still_generates() {
        let text = generate(&Program::new("empty")).unwrap();
        assert!(text.contains("pub fn start"));
    }

    fn count_ident(tokens: TokenStream2, name: &str) -> usize {
        tokens
            .into_iter()
            .map(|tree| match tree {
                proc_macro2::TokenTree::Ident(ident) => usize::from(ident == name),
                proc_macro2::TokenTree::Group(group) => count_ident(group.stream(), name),
                _ => 0,
            })
            .sum()
    }

    #[test]
    fn test_locals_never_shadow_target_roots() {
        let mut shadow = IdentAllocator::new();
        for item in MODULE_ITEMS {
            shadow.reserve(*item);
        }
        let variant = shadow.next_name(true).unwrap();
        let local = shadow.next_name(false).unwrap();

        // Root the target path at the first local the generator would otherwise draw.
        let program = program(vec![command(&format!("{local}::run"), &variant, vec![], vec![])]);
        let text = generate(&program).unwrap();
        let tokens: TokenStream2 = text.parse().unwrap();
        assert_eq!(count_ident(tokens, &local), 1, "{text}");
    }

    #[test]
    fn test_rejects_two_error_returns() {
        let p = program(vec![command(
            "crate::f",
            "f",
            vec![],
            vec![Parameter::unnamed(ValueKind::Error), Parameter::unnamed(ValueKind::Error)],
        )]);
        assert!(matches!(generate(&p), Err(GenerationError::MultipleErrorReturns { .. })));
    }

    #[test]
    fn test_rejects_required_opaque() {
        let p = program(vec![command(
            "crate::f",
            "f",
            vec![Parameter::required("conn", ValueKind::Opaque)],
            vec![],
        )]);
        match generate(&p) {
            Err(GenerationError::UnsupportedType { command, parameter }) => {
                assert_eq!(command, "f");
                assert_eq!(parameter, "conn");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unnamed_optional() {
        let p = program(vec![command(
            "crate::f",
            "f",
            vec![
                Parameter::required("a", ValueKind::Int),
                Parameter { name: None, kind: ValueKind::Int, is_optional: true },
            ],
            vec![],
        )]);
        assert!(matches!(
            generate(&p),
            Err(GenerationError::UnnamedOptional { position: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_error_parameter() {
        let p = program(vec![command(
            "crate::f",
            "f",
            vec![Parameter::required("e", ValueKind::Error)],
            vec![],
        )]);
        assert!(matches!(generate(&p), Err(GenerationError::ErrorParameter { .. })));
    }

    #[test]
    fn test_rejects_reserved_name() {
        let p = program(vec![command("crate::assist", "Help", vec![], vec![])]);
        assert!(matches!(generate(&p), Err(GenerationError::ReservedName { .. })));
    }

    #[test]
    fn test_rejects_mismatched_key() {
        let mut p = program(vec![]);
        p.commands.insert("alias".into(), command("crate::real", "real", vec![], vec![]));
        match generate(&p) {
            Err(GenerationError::MismatchedKey { key, exposed }) => {
                assert_eq!(key, "alias");
                assert_eq!(exposed, "real");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_rejects_case_insensitive_duplicates() {
        let p = program(vec![
            command("crate::a", "List", vec![], vec![]),
            command("crate::b", "list", vec![], vec![]),
        ]);
        assert!(matches!(generate(&p), Err(GenerationError::DuplicateCommand { .. })));
    }

    #[test]
    fn test_rejects_invalid_path_and_module() {
        let p = program(vec![command("crate::not a path", "f", vec![], vec![])]);
        assert!(matches!(generate(&p), Err(GenerationError::InvalidPath { .. })));

        let mut p = program(vec![]);
        p.module_name = "match".into();
        assert!(matches!(generate(&p), Err(GenerationError::InvalidModuleName { .. })));
    }
}
