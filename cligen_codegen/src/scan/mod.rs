//! # Source front-end
//!
//! Finds functions annotated with `/// cligen:` directives and turns them into a
//! [`Program`]:
//!
//! ```ignore
//! /// Repeat the greeting.
//! /// cligen:cmd repeat
//! /// cligen:rename verbose v
//! /// cligen:description Print hello COUNT times
//! pub fn repeat(count: isize, verbose: Option<bool>) -> Result<(), MyError> { .. }
//! ```
//!
//! Only free functions at the top level of each file are considered.

pub mod directive;
pub mod signature;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use syn::{Item, ItemFn, Visibility};
use tracing::{debug, warn};

use crate::RESERVED_COMMAND;
use crate::error::ScanError;
use crate::ir::{Command, Program};
use directive::Directive;

/// Generated files are skipped when scanning.
pub const GENERATED_SUFFIX: &str = ".cligen.rs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Name of the generated module.
    pub module_name: String,
    /// Path prefix of the scanned crate as seen from the generated code:
    /// `crate` when the dispatcher lives in the same crate, `::name` otherwise.
    pub crate_path: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { module_name: "cli".to_owned(), crate_path: "crate".to_owned() }
    }
}

/// Scan the `.rs` files directly inside `dir`.
pub fn scan_dir(dir: impl AsRef<Path>, options: &ScanOptions) -> Result<Program, ScanError> {
    let dir = dir.as_ref();
    let mut program = Program::new(options.module_name.clone());
    // lower-cased exposed name -> internal name
    let mut owners: HashMap<String, String> = HashMap::new();

    for path in source_files(dir)? {
        let source = fs::read_to_string(&path).map_err(|source| ScanError::Io { path: path.clone(), source })?;
        let module = module_path(&options.crate_path, &path);
        let commands = scan_source(&source, &module).map_err(|err| match err {
            ScanError::Parse { source, .. } => ScanError::Parse { path: path.clone(), source },
            other => other,
        })?;

        for command in commands {
            let key = command.exposed_name.to_lowercase();
            if let Some(first) = owners.get(&key) {
                return Err(ScanError::DuplicateCommand {
                    name: command.exposed_name,
                    first: first.clone(),
                    second: command.internal_name,
                });
            }
            owners.insert(key, command.internal_name.clone());
            program.insert(command);
        }
    }

    debug!(dir = %dir.display(), commands = program.commands.len(), "scan complete");
    Ok(program)
}

/// Extract commands from one file's source; targets are `<module>::<fn>`.
pub fn scan_source(source: &str, module: &str) -> Result<Vec<Command>, ScanError> {
    let file = syn::parse_file(source).map_err(|source| ScanError::Parse { path: PathBuf::new(), source })?;

    let mut commands = Vec::new();
    for item in &file.items {
        let Item::Fn(function) = item else {
            continue;
        };
        if let Some(command) = command_of(function, module)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

fn command_of(function: &ItemFn, module: &str) -> Result<Option<Command>, ScanError> {
    let lines = directive::directive_lines(&function.attrs);
    if lines.is_empty() {
        return Ok(None);
    }

    let fn_name = function.sig.ident.to_string();
    let internal_name = format!("{module}::{fn_name}");

    let mut signature = signature::describe(&function.sig).map_err(|message| ScanError::Unsupported {
        function: internal_name.clone(),
        message,
    })?;

    let mut exposed_name = fn_name;
    let mut description = String::new();

    for line in &lines {
        let parsed = directive::parse(line).map_err(|message| ScanError::Directive {
            function: internal_name.clone(),
            message,
        })?;
        match parsed {
            Some(Directive::Cmd(name)) => exposed_name = name,
            Some(Directive::Rename { from, to }) => {
                directive::rename(&mut signature.arguments, &from, &to);
            }
            Some(Directive::Description(text)) => description = text,
            None => {}
        }
    }

    if exposed_name.eq_ignore_ascii_case(RESERVED_COMMAND) {
        return Err(ScanError::ReservedName { function: internal_name });
    }

    if !module.starts_with("crate") && !matches!(function.vis, Visibility::Public(_)) {
        warn!(function = %internal_name, "command target is not `pub` but is called from another crate");
    }

    debug!(
        command = %exposed_name,
        target = %internal_name,
        arguments = signature.arguments.len(),
        "discovered command"
    );

    Ok(Some(Command { internal_name, exposed_name, signature, description }))
}

/// Sorted `.rs` files in `dir`, generated output excluded.
fn source_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let io_err = |source| ScanError::Io { path: dir.to_path_buf(), source };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !path.is_file() || !name.ends_with(".rs") {
            continue;
        }
        if name.ends_with(GENERATED_SUFFIX) {
            debug!(file = name, "skipping generated file");
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// `lib.rs`, `main.rs` and `mod.rs` define the crate/module root itself.
fn module_path(crate_path: &str, file: &Path) -> String {
    let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    match stem {
        "lib" | "main" | "mod" | "" => crate_path.to_owned(),
        _ => format!("{crate_path}::{stem}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Parameter, ValueKind};

    const GREETER: &str = r#"
        use std::fmt;

        /// Repeat the greeting.
        /// cligen:cmd Repeat
        /// cligen:rename verbose v
        /// cligen:description Print hello COUNT times
        pub fn repeat(count: isize, verbose: Option<bool>) -> Result<(), fmt::Error> {
            Ok(())
        }

        /// Not a command.
        pub fn helper() {}

        /// cligen:cmd hi
        pub fn greet(name: String) {}
    "#;

    #[test]
    fn test_scan_source_extracts_annotated_functions() {
        let commands = scan_source(GREETER, "crate").unwrap();
        assert_eq!(commands.len(), 2);

        let repeat = &commands[0];
        assert_eq!(repeat.internal_name, "crate::repeat");
        assert_eq!(repeat.exposed_name, "Repeat");
        assert_eq!(repeat.description, "Print hello COUNT times");
        assert_eq!(
            repeat.signature.arguments,
            vec![
                Parameter::required("count", ValueKind::Int),
                Parameter::optional("v", ValueKind::Bool),
            ]
        );
        assert_eq!(repeat.signature.returns, vec![Parameter::unnamed(ValueKind::Error)]);

        assert_eq!(commands[1].exposed_name, "hi");
        assert_eq!(commands[1].description, "");
    }

    #[test]
    fn test_function_name_is_default_exposed_name() {
        let commands = scan_source("/// cligen:description Says hi\nfn wave() {}", "crate::gestures").unwrap();
        assert_eq!(commands[0].exposed_name, "wave");
        assert_eq!(commands[0].internal_name, "crate::gestures::wave");
    }

    #[test]
    fn test_reserved_and_malformed_directives() {
        assert!(matches!(
            scan_source("/// cligen:cmd HELP\nfn f() {}", "crate"),
            Err(ScanError::ReservedName { .. })
        ));
        assert!(matches!(
            scan_source("/// cligen:rename a\nfn f(a: bool) {}", "crate"),
            Err(ScanError::Directive { .. })
        ));
        assert!(matches!(
            scan_source("/// cligen:cmd f\nasync fn f() {}", "crate"),
            Err(ScanError::Unsupported { .. })
        ));
        assert!(matches!(scan_source("fn broken(", "crate"), Err(ScanError::Parse { .. })));
    }

    #[test]
    fn test_module_path() {
        assert_eq!(module_path("crate", Path::new("src/lib.rs")), "crate");
        assert_eq!(module_path("::usercode", Path::new("src/main.rs")), "::usercode");
        assert_eq!(module_path("crate", Path::new("src/tools.rs")), "crate::tools");
    }

    #[test]
    fn test_scan_dir_orders_and_skips_generated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lib.rs"), GREETER).unwrap();
        fs::write(dir.path().join("math.rs"), "/// cligen:cmd add\npub fn add(a: isize, b: isize) -> isize { a + b }").unwrap();
        fs::write(dir.path().join("commands.cligen.rs"), "/// cligen:cmd ghost\npub fn ghost() {}").unwrap();
        fs::write(dir.path().join("notes.txt"), "/// cligen:cmd nope").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let options = ScanOptions { module_name: "commands".into(), crate_path: "::greeter".into() };
        let program = scan_dir(dir.path(), &options).unwrap();

        assert_eq!(program.module_name, "commands");
        let names: Vec<&str> = program.commands.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Repeat", "add", "hi"]);
        assert_eq!(program.commands["add"].internal_name, "::greeter::math::add");
        assert_eq!(program.commands["hi"].internal_name, "::greeter::greet");
    }

    #[test]
    fn test_scan_dir_rejects_duplicates_across_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "/// cligen:cmd list\npub fn one() {}").unwrap();
        fs::write(dir.path().join("b.rs"), "/// cligen:cmd LIST\npub fn two() {}").unwrap();

        match scan_dir(dir.path(), &ScanOptions::default()) {
            Err(ScanError::DuplicateCommand { first, second, .. }) => {
                assert_eq!(first, "crate::a::one");
                assert_eq!(second, "crate::b::two");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_scan_dir_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.rs");
        fs::write(&file, "fn (").unwrap();
        match scan_dir(dir.path(), &ScanOptions::default()) {
            Err(ScanError::Parse { path, .. }) => assert_eq!(path, file),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_scan_dir_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            scan_dir(&missing, &ScanOptions::default()),
            Err(ScanError::Io { .. })
        ));
    }
}
