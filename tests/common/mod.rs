#![allow(dead_code, clippy::pedantic)]
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use csvrow::{Record, RecordSource, StringRecord};
use serde::Serialize;

pub const STRINGS_CSV: &str =
    "First Name,Last Name,Email,City,State\nJohn,Doe,johndoe@email.com,Los Angeles,CA\n";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Record)]
pub struct Person {
    #[csv("First Name")]
    pub first_name: String,
    #[csv("Last Name")]
    pub last_name: String,
    #[csv("Email")]
    pub email: String,
    #[csv("City")]
    pub city: String,
    #[csv("State")]
    pub state: String,
}

impl Person {
    pub fn new(first: &str, last: &str, email: &str, city: &str, state: &str) -> Self {
        Self {
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
            city: city.into(),
            state: state.into(),
        }
    }
}

/// Failure injected by [`ScriptedSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedFailure(pub &'static str);

impl fmt::Display for InjectedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "injected failure: {}", self.0)
    }
}

impl std::error::Error for InjectedFailure {}

/// One scripted response of a [`ScriptedSource`].
pub enum Step {
    Row(Vec<&'static str>),
    Fail(&'static str),
}

/// Source that replays a fixed script and counts how often it was read.
pub struct ScriptedSource {
    steps: std::vec::IntoIter<Step>,
    reads: Rc<Cell<usize>>,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> (Self, Rc<Cell<usize>>) {
        let reads = Rc::new(Cell::new(0));
        (
            Self {
                steps: steps.into_iter(),
                reads: Rc::clone(&reads),
            },
            reads,
        )
    }
}

impl RecordSource for ScriptedSource {
    type Error = InjectedFailure;

    fn read_record(&mut self, record: &mut StringRecord) -> Result<bool, Self::Error> {
        self.reads.set(self.reads.get() + 1);
        match self.steps.next() {
            None => Ok(false),
            Some(Step::Fail(reason)) => Err(InjectedFailure(reason)),
            Some(Step::Row(fields)) => {
                record.clear();
                for field in fields {
                    record.push_field(field);
                }
                Ok(true)
            }
        }
    }
}
