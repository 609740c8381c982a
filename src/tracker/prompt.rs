// Line-oriented console input.

use crate::tracker::*;

/// Reads answers from `input` and writes prompts and messages to `output`.
///
/// The end of the input is reported as `None` by the `ask_*` functions.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Prompter<R, W> {
        Prompter { input, output }
    }

    /// Writes a full line.
    pub fn say(&mut self, msg: &str) -> TrackerResult<()> {
        writeln!(self.output, "{}", msg).context(ConsoleSnafu {})
    }

    /// Shows `prompt` and reads one line, without its line terminator.
    pub fn ask_line(&mut self, prompt: &str) -> TrackerResult<Option<String>> {
        write!(self.output, "{}", prompt).context(ConsoleSnafu {})?;
        self.output.flush().context(ConsoleSnafu {})?;
        self.read_line()
    }

    /// Shows `prompt` and reads an integer.
    ///
    /// Lines that are not integers are rejected with a message and the next
    /// line is read instead. Blank lines are skipped.
    pub fn ask_int(&mut self, prompt: &str) -> TrackerResult<Option<i64>> {
        let mut line = self.ask_line(prompt)?;
        while let Some(l) = line {
            let token = l.trim();
            if !token.is_empty() {
                match token.parse::<i64>() {
                    Ok(x) => return Ok(Some(x)),
                    Err(_) => {
                        debug!("ask_int: rejected {:?}", token);
                        self.say("Invalid input! Please enter a valid number.")?;
                    }
                }
            }
            line = self.read_line()?;
        }
        Ok(None)
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> TrackerResult<Option<String>> {
        let mut buf = String::new();
        let num_read = self.input.read_line(&mut buf).context(ConsoleSnafu {})?;
        if num_read == 0 {
            return Ok(None);
        }
        let len = buf.trim_end_matches(&['\n', '\r'][..]).len();
        buf.truncate(len);
        Ok(Some(buf))
    }
}
