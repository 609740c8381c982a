/*!

This is the long-form manual for `election_core` and `election-tracker`.

## Running an election

Start the tracker from the directory holding the data file:

```bash
election-tracker --data election_data.txt
```

The main menu offers three entries:

1. **Student Panel**: a student enters their id (`S001`, `S002`, ...) and picks
   a candidate by its number on the ballot. Each student votes once.
2. **Admin Panel**: after logging in, the administrator can start the
   election, add candidates, and view the results.
3. **Exit**: saves the election and quits.

Starting the election asks for the number of students. The tracker then
registers students `S001` up to that number. An election can only be started
once; the request is ignored while an election is running.

Candidates are numbered in the order they were added, starting at 1. This is
the number a student types to vote for them.

Passing `--summary` prints the current state of the election as JSON and
exits without opening the menu:

```json
{
  "electionStarted": true,
  "students": 2,
  "voted": 2,
  "results": [
    { "id": "C1", "name": "Alice", "votes": 1 },
    { "id": "C2", "name": "Bob", "votes": 1 }
  ]
}
```

## Data file

The election is saved as plain text, one record per line:

```text
true
2
S001,true
S002,true
2
C1,Alice,1
C2,Bob,1
```

- the first line tells whether the election has started (`true` or `false`)
- then the number of students, followed by one `<id>,<voted>` line per student
- then the number of candidates, followed by one `<id>,<name>,<votes>` line per
  candidate, in ballot order

There is no quoting. A candidate name containing a comma is saved as-is and the
file only loads up to that line until it is fixed by hand.

If the data file does not exist, the tracker starts with an empty election. If
a line of the file is malformed, the error is reported and the tracker keeps the
records read before that line. At exit the original file is first copied to
`<data file>.bak`, then replaced. If the copy fails the file is left untouched
and nothing is saved.

Starting an election registers at most 100000 students.

## Settings

A JSON settings file can be given with `--config`:

```json
{ "dataFile": "/var/lib/election/election_data.txt" }
```

The `--data` option takes precedence over the settings file.

Logging follows `RUST_LOG`. `--verbose` turns on debug output.
*/
