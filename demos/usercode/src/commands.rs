use crate::{DemoError, MAX_REPEAT, Session, record};

/// Print a greeting several times.
/// cligen:cmd repeat
/// cligen:rename verbose v
/// cligen:description Print hello COUNT times
pub fn repeat(count: isize, verbose: Option<bool>) -> Result<(), DemoError> {
    record(format!("repeat({count}, {verbose:?})"));
    if count > MAX_REPEAT {
        return Err(DemoError::TooMany(count));
    }
    for i in 0..count {
        if verbose == Some(true) {
            println!("{}: hello", i + 1);
        } else {
            println!("hello");
        }
    }
    Ok(())
}

/// cligen:cmd greet
/// cligen:description Greet someone, optionally loudly
pub fn greet(name: String, shout: Option<bool>, greeting: Option<String>) {
    record(format!("greet({name}, {shout:?}, {greeting:?})"));
    let line = format!("{}, {}!", greeting.as_deref().unwrap_or("Hello"), name);
    if shout == Some(true) {
        println!("{}", line.to_uppercase());
    } else {
        println!("{line}");
    }
}

/// cligen:cmd div
/// cligen:description Divide two numbers
pub fn divide(a: f32, b: f32) -> Result<f32, DemoError> {
    record(format!("divide({a}, {b})"));
    if b == 0.0 {
        return Err(DemoError::DivisionByZero);
    }
    println!("{}", a / b);
    Ok(a / b)
}

/// cligen:cmd Sum
/// cligen:description Add the numbers FROM..TO
pub fn sum(from: usize, to: usize, step: Option<usize>) -> usize {
    record(format!("sum({from}, {to}, {step:?})"));
    let total = (from..to).step_by(step.unwrap_or(1).max(1)).sum();
    println!("{total}");
    total
}

/// cligen:cmd mix
/// cligen:description Two numbers with flags in between
pub fn mix(a: isize, v: Option<bool>, b: usize, s: Option<String>) {
    record(format!("mix({a}, {v:?}, {b}, {s:?})"));
}

/// Session can only come from code, so the flag is never bound.
/// cligen:cmd connect
pub fn connect(host: String, session: Option<Session>) {
    record(format!("connect({host}, {})", session.is_some()));
}

/// cligen:cmd ping
pub fn ping() {
    record("ping()".to_owned());
    println!("pong");
}

/// Not annotated, not exposed.
pub fn internal_helper() -> usize {
    42
}
