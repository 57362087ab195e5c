//! `/// cligen:<opcode> <operands..>` doc-comment directives.

use syn::{Attribute, Expr, ExprLit, Lit, Meta};
use tracing::{debug, warn};

use crate::ir::Parameter;

pub const DIRECTIVE_PREFIX: &str = "cligen:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `cmd <name>`
    Cmd(String),
    /// `rename <old> <new>`
    Rename { from: String, to: String },
    /// `description <text..>`
    Description(String),
}

/// Lines of the doc comment that are directives, without the prefix.
pub fn directive_lines(attrs: &[Attribute]) -> Vec<String> {
    let mut lines = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        let Meta::NameValue(meta) = &attr.meta else {
            continue;
        };
        let Expr::Lit(ExprLit { lit: Lit::Str(text), .. }) = &meta.value else {
            continue;
        };
        for line in text.value().lines() {
            let line = line.trim();
            let Some(body) = line.strip_prefix(DIRECTIVE_PREFIX) else {
                continue;
            };
            if body.starts_with(|c: char| c.is_ascii_alphabetic()) {
                lines.push(body.to_owned());
            }
        }
    }
    lines
}

/// Parse one directive body. `Ok(None)` for opcodes this front-end does not know.
pub fn parse(body: &str) -> Result<Option<Directive>, String> {
    let mut words = body.split_whitespace();
    let Some(opcode) = words.next() else {
        return Ok(None);
    };
    let operands: Vec<&str> = words.collect();

    match opcode {
        "cmd" => match operands.first() {
            Some(name) => Ok(Some(Directive::Cmd((*name).to_owned()))),
            None => Err("`cmd` directive needs a command name".to_owned()),
        },
        "rename" => match operands.as_slice() {
            [from, to, ..] => Ok(Some(Directive::Rename {
                from: (*from).to_owned(),
                to: (*to).to_owned(),
            })),
            _ => Err(format!(
                "`rename` directive needs two operands, got {}",
                operands.len()
            )),
        },
        "description" => {
            if operands.is_empty() {
                Err("`description` directive needs some text".to_owned())
            } else {
                Ok(Some(Directive::Description(operands.join(" "))))
            }
        }
        other => {
            debug!(opcode = other, "ignoring unknown directive");
            Ok(None)
        }
    }
}

/// Rename the first argument whose name matches `from`, ignoring case.
pub fn rename(arguments: &mut [Parameter], from: &str, to: &str) -> bool {
    let found = arguments.iter_mut().find(|p| {
        p.name
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(from))
    });
    match found {
        Some(param) => {
            param.name = Some(to.to_owned());
            true
        }
        None => {
            warn!(parameter = from, "rename directive matches no parameter");
            false
        }
    }
}
