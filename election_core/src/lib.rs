/*!
The state machine behind a small student election.

An [`ElectionStore`] holds the registered students, the candidates and whether
the election has started. All the operations of the tracker go through it:

```
use election_core::{ElectionStore, StartOutcome};

let mut store = ElectionStore::new();
store.add_candidate("Alice");
store.add_candidate("Bob");
assert_eq!(store.provision_students(2), StartOutcome::Started(2));

store.record_vote("S001", 1)?;
store.record_vote("S002", 2)?;
assert!(store.record_vote("S001", 2).is_err());
# Ok::<(), election_core::VoteRejected>(())
```

The state can be written to and read back from a line-oriented text format with
the [`codec`] module. See the [`manual`] for the details of the format.
*/

pub mod codec;
pub mod manual;
mod records;

use log::{debug, info, warn};

pub use crate::records::*;

/// Width of the numeric part of generated student ids.
const STUDENT_ID_WIDTH: usize = 3;

/// Largest number of students that one election can register.
pub const MAX_STUDENTS: usize = 100_000;

fn student_id(idx: usize) -> String {
    format!("S{:0width$}", idx, width = STUDENT_ID_WIDTH)
}

impl ElectionStore {
    /// An empty store: no students, no candidates, election not started.
    pub fn new() -> ElectionStore {
        ElectionStore::default()
    }

    pub fn election_started(&self) -> bool {
        self.election_started
    }

    pub fn find_student(&self, id: &str) -> Option<&Student> {
        self.students.get(id)
    }

    /// All the registered students, ordered by id.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    pub fn num_students(&self) -> usize {
        self.students.len()
    }

    /// The candidates, in the order in which they were added.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Registers a new candidate at the end of the ballot.
    pub fn add_candidate(&mut self, name: &str) -> &Candidate {
        let idx = self.candidates.len();
        let id = format!("C{}", idx + 1);
        info!("add_candidate: {} -> {:?}", id, name);
        self.candidates.push(Candidate::new(&id, name));
        &self.candidates[idx]
    }

    /// Starts the election with `count` students, named `S001`, `S002`, ...
    ///
    /// This can only happen once. Calling it again once the election is running
    /// leaves the store untouched. At most [`MAX_STUDENTS`] can be registered.
    pub fn provision_students(&mut self, count: usize) -> StartOutcome {
        if self.election_started {
            warn!("provision_students: election already ongoing, ignoring");
            return StartOutcome::AlreadyOngoing;
        }
        if count > MAX_STUDENTS {
            warn!(
                "provision_students: {} students requested, at most {} allowed",
                count, MAX_STUDENTS
            );
            return StartOutcome::TooManyStudents {
                requested: count,
                max: MAX_STUDENTS,
            };
        }
        for idx in 1..=count {
            let id = student_id(idx);
            self.students.insert(id.clone(), Student::new(&id));
        }
        self.election_started = true;
        info!("provision_students: election started with {} students", count);
        StartOutcome::Started(count)
    }

    /// Checks that a student is allowed to vote right now, and returns the
    /// ballot to present to them.
    pub fn ballot_for(&self, student_id: &str) -> Result<&[Candidate], VoteRejected> {
        if !self.election_started {
            return Err(VoteRejected::ElectionNotStarted);
        }
        match self.students.get(student_id) {
            None => Err(VoteRejected::UnknownStudent(student_id.to_string())),
            Some(s) if s.has_voted => Err(VoteRejected::AlreadyVoted(student_id.to_string())),
            Some(_) => Ok(&self.candidates),
        }
    }

    /// Records the vote of a student for the candidate at position `choice`
    /// on the ballot (starting at 1).
    ///
    /// On success, the candidate count goes up by one and the student is marked
    /// as having voted. On failure nothing changes.
    pub fn record_vote(
        &mut self,
        student_id: &str,
        choice: usize,
    ) -> Result<&Candidate, VoteRejected> {
        let num_candidates = self.ballot_for(student_id)?.len();
        if choice == 0 || choice > num_candidates {
            debug!(
                "record_vote: choice {} out of range 1..={}",
                choice, num_candidates
            );
            return Err(VoteRejected::InvalidChoice(choice));
        }
        // Both lookups were validated by ballot_for above.
        if let Some(student) = self.students.get_mut(student_id) {
            student.has_voted = true;
        }
        let candidate = &mut self.candidates[choice - 1];
        candidate.vote_count += 1;
        info!(
            "record_vote: {} voted for {} ({})",
            student_id,
            candidate.id(),
            candidate.vote_count
        );
        Ok(candidate)
    }

    /// Checks a pair of credentials against the administrator account.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        let res = self.admin.authenticate(username, password);
        if !res {
            warn!("authenticate: rejected credentials for {:?}", username);
        }
        res
    }

    /// The current tally, in ballot order. `None` until the election starts.
    pub fn results(&self) -> Option<Vec<Tally>> {
        if !self.election_started {
            return None;
        }
        Some(
            self.candidates
                .iter()
                .map(|c| Tally {
                    id: c.id().to_string(),
                    name: c.name().to_string(),
                    votes: c.vote_count,
                })
                .collect(),
        )
    }

    /// Number of students who have cast their vote.
    pub fn voted_count(&self) -> usize {
        self.students.values().filter(|s| s.has_voted).count()
    }

    /// Sum of the votes received by all the candidates.
    pub fn total_votes(&self) -> u64 {
        self.candidates.iter().map(|c| c.vote_count).sum()
    }
}
