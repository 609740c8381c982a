// The menus of the tracker.

use crate::tracker::*;

/// The top-level menu. Returns when the user exits or the input ends.
pub fn main_menu<R: BufRead, W: Write>(
    store: &mut ElectionStore,
    p: &mut Prompter<R, W>,
) -> TrackerResult<()> {
    loop {
        p.say("Welcome to the student election tracker!")?;
        p.say("1. Student Panel\n2. Admin Panel\n3. Exit")?;
        let choice = match p.ask_int("Enter your choice: ")? {
            Some(x) => x,
            None => {
                info!("main_menu: end of input");
                return Ok(());
            }
        };
        match choice {
            1 => student_panel(store, p)?,
            2 => admin_panel(store, p)?,
            3 => {
                p.say("Thank you for using the student election tracker. Goodbye!")?;
                return Ok(());
            }
            _ => p.say("Invalid choice! Please try again.")?,
        }
    }
}

/// One voting attempt.
fn student_panel<R: BufRead, W: Write>(
    store: &mut ElectionStore,
    p: &mut Prompter<R, W>,
) -> TrackerResult<()> {
    if !store.election_started() {
        return p.say("Election has not started yet. Please try again later.");
    }
    let student_id = match p.ask_line("Enter your Student ID: ")? {
        Some(s) => s.trim().to_string(),
        None => return Ok(()),
    };

    match store.ballot_for(&student_id) {
        Ok(ballot) => {
            p.say("Candidates:")?;
            for (idx, c) in ballot.iter().enumerate() {
                p.say(&format!("{}. {}", idx + 1, c.name()))?;
            }
        }
        Err(VoteRejected::AlreadyVoted(_)) => {
            return p.say("You have already voted. Access denied.");
        }
        Err(e) => {
            debug!("student_panel: {}", e);
            return p.say("Invalid Student ID.");
        }
    }

    let choice = match p.ask_int("Enter your vote (candidate number): ")? {
        // Negative numbers are never a valid ballot position.
        Some(x) => usize::try_from(x).unwrap_or(0),
        None => return Ok(()),
    };
    match store.record_vote(&student_id, choice) {
        Ok(_) => p.say("Your vote has been successfully cast!"),
        Err(e) => {
            debug!("student_panel: {}", e);
            p.say("Invalid choice! Returning to main menu.")
        }
    }
}

fn admin_panel<R: BufRead, W: Write>(
    store: &mut ElectionStore,
    p: &mut Prompter<R, W>,
) -> TrackerResult<()> {
    let username = match p.ask_line("Enter Admin Username: ")? {
        Some(s) => s,
        None => return Ok(()),
    };
    let password = match p.ask_line("Enter Admin Password: ")? {
        Some(s) => s,
        None => return Ok(()),
    };
    if !store.authenticate(&username, &password) {
        return p.say("Invalid credentials! Access denied.");
    }

    loop {
        p.say("Admin Panel:")?;
        p.say("1. Start New Election\n2. Add Candidate\n3. View Results\n4. Logout")?;
        let choice = match p.ask_int("Enter your choice: ")? {
            Some(x) => x,
            None => return Ok(()),
        };
        match choice {
            1 => start_election(store, p)?,
            2 => add_candidate(store, p)?,
            3 => view_results(store, p)?,
            4 => return p.say("Logging out..."),
            _ => p.say("Invalid choice! Please try again.")?,
        }
    }
}

fn start_election<R: BufRead, W: Write>(
    store: &mut ElectionStore,
    p: &mut Prompter<R, W>,
) -> TrackerResult<()> {
    if store.election_started() {
        return p.say("Election is already ongoing.");
    }
    let count = match p.ask_int("Enter number of students: ")? {
        // A negative count opens the election with nobody registered.
        Some(x) if x < 0 => 0,
        Some(x) => usize::try_from(x).unwrap_or(usize::MAX),
        None => return Ok(()),
    };
    match store.provision_students(count) {
        StartOutcome::Started(_) => p.say("Election has been successfully started!"),
        StartOutcome::AlreadyOngoing => p.say("Election is already ongoing."),
        StartOutcome::TooManyStudents { max, .. } => p.say(&format!(
            "Too many students! At most {} can be registered.",
            max
        )),
    }
}

fn add_candidate<R: BufRead, W: Write>(
    store: &mut ElectionStore,
    p: &mut Prompter<R, W>,
) -> TrackerResult<()> {
    loop {
        let name = match p.ask_line("Enter candidate name: ")? {
            Some(s) => s,
            None => return Ok(()),
        };
        let name = name.trim();
        if name.is_empty() {
            p.say("The candidate name cannot be empty.")?;
            continue;
        }
        store.add_candidate(name);
        return p.say("Candidate added successfully!");
    }
}

fn view_results<R: BufRead, W: Write>(
    store: &ElectionStore,
    p: &mut Prompter<R, W>,
) -> TrackerResult<()> {
    let tallies = match store.results() {
        Some(t) => t,
        None => return p.say("No election results to display. Election has not started."),
    };
    p.say("Election Results:")?;
    for t in tallies.iter() {
        p.say(&format!("{}: {} votes", t.name, t.votes))?;
    }
    Ok(())
}
