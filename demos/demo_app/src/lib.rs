//! Dispatcher for the `usercode` commands, generated at build time.

include!(concat!(env!("OUT_DIR"), "/commands.rs"));
