//! Console capability.
//!
//! Programs talk to the console only through [`readln`] and [`println`],
//! which look the service up in whatever environment they are provided
//! with. [`LiveConsole`] is backed by stdin/stdout; [`TestConsole`] by an
//! in-memory input queue and output log.
//!
//! # Examples
//!
//! ```
//! use tidepool::console::{echo, TestConsole};
//!
//! let env = TestConsole::with_input(["Toni"]);
//! echo().provide(&env).unwrap();
//!
//! assert_eq!(env.output(), vec!["what's your name?", "Hello Toni"]);
//! ```
//!
//! A larger environment exposes the console through [`HasConsole`]:
//!
//! ```
//! use tidepool::console::{self, HasConsole, TestConsole};
//!
//! struct AppEnv {
//!     console: TestConsole,
//! }
//!
//! impl HasConsole for AppEnv {
//!     type Service = TestConsole;
//!
//!     fn console(&self) -> &TestConsole {
//!         &self.console
//!     }
//! }
//!
//! let env = AppEnv { console: TestConsole::new() };
//! console::println::<AppEnv>("ready").provide(&env).unwrap();
//! assert_eq!(env.console.output(), vec!["ready"]);
//! ```

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt;
use std::io::{self, BufRead};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::effect::Effect;
use crate::fault::Fault;
use crate::marker::Unit;

/// Console failures surfaced through [`Fault`]s.
#[derive(Debug)]
pub enum ConsoleError {
    /// No more input lines are available.
    InputExhausted,
    /// Reading from the underlying stream failed.
    Io(io::Error),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::InputExhausted => write!(f, "console input exhausted"),
            ConsoleError::Io(err) => write!(f, "console I/O failed: {}", err),
        }
    }
}

impl StdError for ConsoleError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConsoleError::InputExhausted => None,
            ConsoleError::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for ConsoleError {
    fn from(err: io::Error) -> Self {
        ConsoleError::Io(err)
    }
}

/// A console service.
///
/// Both operations return effects, so implementations decide how reading and
/// writing are deferred.
pub trait Console {
    /// Read one line, without its trailing newline.
    fn readln<R: 'static>(&self) -> Effect<R, Fault, String>;

    /// Write one line.
    fn println<R: 'static>(&self, text: String) -> Effect<R, Fault, Unit>;
}

/// Environments that carry a [`Console`].
pub trait HasConsole {
    /// The console implementation in this environment.
    type Service: Console;

    /// Look up the console service.
    fn console(&self) -> &Self::Service;
}

/// Read a line from the environment's console.
pub fn readln<R>() -> Effect<R, Fault, String>
where
    R: HasConsole + 'static,
{
    Effect::access_m(|env: &R| env.console().readln())
}

/// Write a line to the environment's console.
pub fn println<R>(text: impl Into<String>) -> Effect<R, Fault, Unit>
where
    R: HasConsole + 'static,
{
    let text = text.into();
    Effect::access_m(move |env: &R| env.console().println(text.clone()))
}

/// Ask for a name and greet it.
pub fn echo<R>() -> Effect<R, Fault, Unit>
where
    R: HasConsole + 'static,
{
    println("what's your name?")
        .and_then(readln::<R>)
        .flat_map(|name| println(format!("Hello {}", name)))
}

/// Console backed by the process's stdin and stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveConsole;

impl Console for LiveConsole {
    fn readln<R: 'static>(&self) -> Effect<R, Fault, String> {
        Effect::from(|| -> Result<String, ConsoleError> {
            let mut line = String::new();
            if io::stdin().lock().read_line(&mut line)? == 0 {
                return Err(ConsoleError::InputExhausted);
            }
            Ok(line.trim_end_matches(['\r', '\n']).to_string())
        })
    }

    fn println<R: 'static>(&self, text: String) -> Effect<R, Fault, Unit> {
        Effect::exec(move || println!("{}", text))
    }
}

impl HasConsole for LiveConsole {
    type Service = Self;

    fn console(&self) -> &Self {
        self
    }
}

/// In-memory console for tests.
///
/// Clones share the same queue and log, so a test can keep a handle while
/// the environment is provided elsewhere.
#[derive(Debug, Clone, Default)]
pub struct TestConsole {
    input: Arc<Mutex<VecDeque<String>>>,
    output: Arc<Mutex<Vec<String>>>,
}

impl TestConsole {
    /// Console with no queued input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Console that will answer reads with `lines`, in order.
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let console = Self::new();
        lock(&console.input).extend(lines.into_iter().map(Into::into));
        console
    }

    /// Queue another input line.
    pub fn push_input(&self, line: impl Into<String>) {
        lock(&self.input).push_back(line.into());
    }

    /// Everything written so far.
    pub fn output(&self) -> Vec<String> {
        lock(&self.output).clone()
    }

    /// Input lines not yet read.
    pub fn remaining_input(&self) -> Vec<String> {
        lock(&self.input).iter().cloned().collect()
    }
}

impl Console for TestConsole {
    fn readln<R: 'static>(&self) -> Effect<R, Fault, String> {
        let input = Arc::clone(&self.input);
        Effect::from(move || lock(&input).pop_front().ok_or(ConsoleError::InputExhausted))
    }

    fn println<R: 'static>(&self, text: String) -> Effect<R, Fault, Unit> {
        let output = Arc::clone(&self.output);
        Effect::exec(move || lock(&output).push(text.clone()))
    }
}

impl HasConsole for TestConsole {
    type Service = Self;

    fn console(&self) -> &Self {
        self
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
