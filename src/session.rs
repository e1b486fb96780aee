//! A persistent interpreter session.
//!
//! Each call to [`Lox::run`] pushes one source text through the full pipeline
//! (scan, parse, resolve, interpret) against the same globals. Node ids keep
//! counting across runs, so distances recorded for earlier sources remain
//! valid for closures that outlive them.

use std::io::{self, Write};
use std::thread;

use log::{debug, info};

use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::scan_tokens;
use crate::value::Value;

/// Stack reserved for a thread running Lox programs: room for
/// [`MAX_CALL_DEPTH`](crate::interpreter::MAX_CALL_DEPTH) nested calls.
pub const PROGRAM_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Run `task` on a new thread with a [`PROGRAM_STACK_SIZE`] stack and wait
/// for its result. A panic on that thread comes back as an I/O error.
pub fn run_on_large_stack<F, T>(task: F) -> io::Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    debug!("Spawning interpreter thread with {} byte stack", PROGRAM_STACK_SIZE);

    thread::Builder::new()
        .name("lox".into())
        .stack_size(PROGRAM_STACK_SIZE)
        .spawn(task)?
        .join()
        .map_err(|_| io::Error::other("interpreter thread panicked"))
}

pub struct Lox<W: Write = io::Stdout> {
    interpreter: Interpreter<W>,
    next_id: usize,
}

impl Lox<io::Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Lox<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Lox<W> {
    pub fn with_output(out: W) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
            next_id: 0,
        }
    }

    /// Run a program. Static errors stop the run before anything executes;
    /// a runtime error stops it at the failing statement, keeping whatever
    /// earlier statements defined.
    ///
    /// Programs recursing thousands of calls deep need the stack provided by
    /// [`run_on_large_stack`].
    pub fn run(&mut self, source: &str) -> Result<()> {
        info!("Running {} byte(s) of source", source.len());

        let tokens = scan_tokens(source)?;

        let mut parser = Parser::with_first_id(&tokens, self.next_id);
        let parsed = parser.parse();
        self.next_id = parser.next_expr_id();
        let statements = parsed?;

        let locals = Resolver::new().resolve(&statements)?;
        self.interpreter.add_locals(locals);

        self.interpreter.interpret(&statements)
    }

    /// Evaluate a single expression against the session's globals.
    pub fn evaluate(&mut self, source: &str) -> Result<Value> {
        let tokens = scan_tokens(source)?;

        let mut parser = Parser::with_first_id(&tokens, self.next_id);
        let parsed = parser.parse_expression();
        self.next_id = parser.next_expr_id();
        let expr = parsed?;

        let value = self.interpreter.evaluate(&expr)?;
        debug!("Evaluated to: {}", value);

        Ok(value)
    }

    pub fn interpreter(&self) -> &Interpreter<W> {
        &self.interpreter
    }

    pub fn output(&self) -> &W {
        self.interpreter.output()
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }
}
