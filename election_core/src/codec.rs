// Line-oriented text encoding of an election store.
//
// The layout is:
//   started flag
//   number of students
//   <id>,<has voted>        one line per student
//   number of candidates
//   <id>,<name>,<votes>     one line per candidate, in ballot order
//
// Fields are separated by commas and there is no quoting or escaping.

use std::io::Write;

use csv::{QuoteStyle, ReaderBuilder, StringRecord, StringRecordsIntoIter, WriterBuilder};
use log::{debug, warn};

use crate::records::*;

const DELIMITER: char = ',';

/// Writes the store in the saved-file format to `out`.
///
/// Candidate names that contain the delimiter are written as-is and such a file
/// will not decode again.
pub fn write_store<W: Write>(store: &ElectionStore, out: W) -> csv::Result<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .delimiter(DELIMITER as u8)
        .from_writer(out);

    wtr.write_record([store.election_started.to_string()])?;
    wtr.write_record([store.students.len().to_string()])?;
    for s in store.students.values() {
        wtr.write_record([s.id(), if s.has_voted { "true" } else { "false" }])?;
    }
    wtr.write_record([store.candidates.len().to_string()])?;
    for c in store.candidates.iter() {
        if c.name().contains(DELIMITER) {
            warn!(
                "write_store: candidate {} has a name containing {:?}, the saved data will not load back",
                c.id(),
                DELIMITER
            );
        }
        wtr.write_record([
            c.id().to_string(),
            c.name().to_string(),
            c.vote_count.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Same as [`write_store`], into a string.
pub fn encode(store: &ElectionStore) -> csv::Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    write_store(store, &mut buf)?;
    // Every field comes from a `str`.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Reads back a store written by [`encode`].
///
/// Lines after the last candidate are ignored.
pub fn decode(data: &str) -> Result<ElectionStore, DecodeError> {
    match decode_partial(data) {
        (store, None) => Ok(store),
        (_, Some(e)) => Err(e),
    }
}

/// Reads back as much of a saved store as possible.
///
/// Reading stops at the first bad line. The returned store holds everything
/// read before that line, and the error describes the line.
pub fn decode_partial(data: &str) -> (ElectionStore, Option<DecodeError>) {
    let mut store = ElectionStore::new();
    let res = read_records(data, &mut store);
    if let Err(e) = &res {
        warn!(
            "decode_partial: stopped at {}, kept {} students and {} candidates",
            e,
            store.students.len(),
            store.candidates.len()
        );
    }
    (store, res.err())
}

fn read_records(data: &str, store: &mut ElectionStore) -> Result<(), DecodeError> {
    let rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(DELIMITER as u8)
        .from_reader(data.as_bytes());
    let mut records = RecordReader {
        records: rdr.into_records(),
        lineno: 0,
    };

    let status = records.next_record("the election status")?;
    store.election_started = read_flag(status.field(0, "the election status")?);
    let num_students = records.next_count("the number of students")?;
    debug!(
        "read_records: started: {} students: {}",
        store.election_started, num_students
    );
    for _ in 0..num_students {
        let record = records.next_record("a student record")?;
        let id = record.field(0, "the student id")?;
        let mut student = Student::new(id);
        student.has_voted = read_flag(record.field(1, "the voting status")?);
        store.students.insert(id.to_string(), student);
    }

    let num_candidates = records.next_count("the number of candidates")?;
    debug!("read_records: candidates: {}", num_candidates);
    for _ in 0..num_candidates {
        let record = records.next_record("a candidate record")?;
        let mut candidate = Candidate::new(
            record.field(0, "the candidate id")?,
            record.field(1, "the candidate name")?,
        );
        candidate.vote_count = parse_count(record.lineno, record.field(2, "the vote count")?)?;
        store.candidates.push(candidate);
    }
    Ok(())
}

// Anything other than "true" (in any case) reads as false.
fn read_flag(s: &str) -> bool {
    s.eq_ignore_ascii_case("true")
}

fn parse_count<T: std::str::FromStr>(lineno: usize, s: &str) -> Result<T, DecodeError> {
    s.parse::<T>().map_err(|_| DecodeError::InvalidNumber {
        line: lineno,
        value: s.to_string(),
    })
}

struct Record {
    lineno: usize,
    fields: StringRecord,
}

impl Record {
    fn field(&self, idx: usize, what: &'static str) -> Result<&str, DecodeError> {
        self.fields.get(idx).ok_or(DecodeError::MissingField {
            line: self.lineno,
            what,
        })
    }
}

struct RecordReader<'a> {
    records: StringRecordsIntoIter<&'a [u8]>,
    // Line of the last record read, starting at 1.
    lineno: usize,
}

impl<'a> RecordReader<'a> {
    fn next_record(&mut self, what: &'static str) -> Result<Record, DecodeError> {
        match self.records.next() {
            Some(Ok(fields)) => {
                self.lineno = fields
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(self.lineno + 1);
                Ok(Record {
                    lineno: self.lineno,
                    fields,
                })
            }
            Some(Err(e)) => Err(DecodeError::Unreadable {
                line: e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(self.lineno + 1),
                message: e.to_string(),
            }),
            None => Err(DecodeError::MissingLine {
                line: self.lineno + 1,
                what,
            }),
        }
    }

    fn next_count(&mut self, what: &'static str) -> Result<usize, DecodeError> {
        let record = self.next_record(what)?;
        parse_count(record.lineno, record.field(0, what)?)
    }
}
