//! Host library whose annotated functions become `demo_app` commands.

pub mod commands;

use std::cell::RefCell;

use thiserror::Error;

thread_local! {
    static CALLS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Calls made on this thread since the last [`take_calls`].
pub fn take_calls() -> Vec<String> {
    CALLS.with(|calls| std::mem::take(&mut *calls.borrow_mut()))
}

pub(crate) fn record(call: String) {
    CALLS.with(|calls| calls.borrow_mut().push(call));
}

#[derive(Error, Debug, PartialEq)]
pub enum DemoError {
    #[error("refusing to repeat {0} times, the limit is 100")]
    TooMany(isize),

    #[error("division by zero")]
    DivisionByZero,
}

pub const MAX_REPEAT: isize = 100;

/// Handle that can't be typed on a command line.
#[derive(Debug, Default)]
pub struct Session {
    pub id: u32,
}
