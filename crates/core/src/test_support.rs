//! Shared doubles for unit tests: a scripted process runner and a
//! line-capturing output sink.

use crate::process::{ExecMode, ExecResult, ProcessRunner};
use crate::tool::OutputSink;
use std::cell::RefCell;
use std::rc::Rc;

struct Rule {
    pattern: String,
    output: Vec<String>,
    status: i32,
}

/// A [`ProcessRunner`] that answers from a script instead of spawning
///
/// Rules match on a substring of the command line, first match wins; an
/// unmatched command fails with status 1. Every invocation is recorded so
/// tests can assert on what ran (and what didn't). Clones share state.
#[derive(Clone, Default)]
pub(crate) struct ScriptRunner {
    inner: Rc<ScriptInner>,
}

#[derive(Default)]
struct ScriptInner {
    rules: RefCell<Vec<Rule>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule: commands containing `pattern` produce `output` and `status`
    pub fn on(self, pattern: &str, output: &[&str], status: i32) -> Self {
        self.inner.rules.borrow_mut().push(Rule {
            pattern: pattern.to_string(),
            output: output.iter().map(|s| s.to_string()).collect(),
            status,
        });
        self
    }

    pub fn call_count(&self) -> usize {
        self.inner.calls.borrow().len()
    }

    pub fn calls_matching(&self, pattern: &str) -> usize {
        self.inner
            .calls
            .borrow()
            .iter()
            .filter(|c| c.contains(pattern))
            .count()
    }
}

impl ProcessRunner for ScriptRunner {
    fn run(&self, command: &str, _mode: ExecMode) -> ExecResult {
        self.inner.calls.borrow_mut().push(command.to_string());
        let rules = self.inner.rules.borrow();
        match rules.iter().find(|r| command.contains(&r.pattern)) {
            Some(rule) => ExecResult {
                command: command.to_string(),
                output: rule.output.clone(),
                status: rule.status,
            },
            None => ExecResult::failure(command),
        }
    }
}

/// An [`OutputSink`] that collects forwarded lines; clones share state
#[derive(Clone, Default)]
pub(crate) struct CaptureSink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl OutputSink for CaptureSink {
    fn writeln(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}
