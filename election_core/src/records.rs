// ********* Identity records ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// The identity fields shared by every participant of an election.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

impl Identity {
    pub fn new(id: &str, name: &str) -> Identity {
        Identity {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// A registered voter.
///
/// `has_voted` only ever goes from false to true.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Student {
    pub identity: Identity,
    pub has_voted: bool,
}

impl Student {
    pub fn new(id: &str) -> Student {
        Student {
            identity: Identity::new(id, "Student"),
            has_voted: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Candidate {
    pub identity: Identity,
    pub vote_count: u64,
}

impl Candidate {
    pub fn new(id: &str, name: &str) -> Candidate {
        Candidate {
            identity: Identity::new(id, name),
            vote_count: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }
}

/// The election administrator. There is exactly one, with a fixed credential.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Admin {
    pub identity: Identity,
    password: String,
}

impl Admin {
    pub const DEFAULT_ID: &'static str = "admin";
    pub const DEFAULT_PASSWORD: &'static str = "1234";

    pub fn new(id: &str, password: &str) -> Admin {
        Admin {
            identity: Identity::new(id, "Admin"),
            password: password.to_string(),
        }
    }

    /// Plain string comparison on both fields.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.identity.id == username && self.password == password
    }
}

impl Default for Admin {
    fn default() -> Self {
        Admin::new(Admin::DEFAULT_ID, Admin::DEFAULT_PASSWORD)
    }
}

// ********* Election store ***********

/// The whole state of an election.
///
/// Students are keyed by id. Candidates are kept in creation order, which is
/// also the order used to number them on the ballot.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ElectionStore {
    pub(crate) election_started: bool,
    pub(crate) students: BTreeMap<String, Student>,
    pub(crate) candidates: Vec<Candidate>,
    pub(crate) admin: Admin,
}

// ******** Output data structures *********

/// The outcome of a request to start the election.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum StartOutcome {
    /// The election is now open, with the given number of students registered.
    Started(usize),
    /// An election was already running. Nothing was changed.
    AlreadyOngoing,
    /// More students were requested than can be registered. Nothing was changed.
    TooManyStudents { requested: usize, max: usize },
}

/// The current count for one candidate.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Tally {
    pub id: String,
    pub name: String,
    pub votes: u64,
}

// ********* Errors **********

/// Reasons for which a vote is refused. A refused vote never changes the store.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VoteRejected {
    ElectionNotStarted,
    UnknownStudent(String),
    AlreadyVoted(String),
    /// The ballot number is outside of `1..=number of candidates`.
    InvalidChoice(usize),
}

impl Error for VoteRejected {}

impl Display for VoteRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteRejected::ElectionNotStarted => write!(f, "the election has not started"),
            VoteRejected::UnknownStudent(id) => write!(f, "unknown student id {:?}", id),
            VoteRejected::AlreadyVoted(id) => write!(f, "student {} has already voted", id),
            VoteRejected::InvalidChoice(choice) => write!(f, "invalid candidate number {}", choice),
        }
    }
}

/// Errors found while reading back a saved election.
///
/// Line numbers start at 1.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum DecodeError {
    MissingLine { line: usize, what: &'static str },
    InvalidNumber { line: usize, value: String },
    MissingField { line: usize, what: &'static str },
    /// The line could not be split into fields.
    Unreadable { line: usize, message: String },
}

impl Error for DecodeError {}

impl Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::MissingLine { line, what } => {
                write!(f, "line {}: expected {}, found end of data", line, what)
            }
            DecodeError::InvalidNumber { line, value } => {
                write!(f, "line {}: {:?} is not a valid count", line, value)
            }
            DecodeError::MissingField { line, what } => {
                write!(f, "line {}: missing {}", line, what)
            }
            DecodeError::Unreadable { line, message } => {
                write!(f, "line {}: {}", line, message)
            }
        }
    }
}
