use clap::Parser;

/// This is a menu-driven tracker for student elections.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file holding the saved election. It is read at startup and
    /// overwritten on exit. Setting this option overrides the path that may be specified with
    /// the --config option. Defaults to election_data.txt in the current directory.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,

    /// (file path, optional) A JSON settings file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// If passed as an argument, prints a JSON summary of the saved election to the standard
    /// output and exits without opening the menu.
    #[clap(short, long, takes_value = false)]
    pub summary: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
