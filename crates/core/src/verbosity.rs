//! Verbosity levels and per-tool flag mapping
//!
//! Translates the CLI's abstract verbosity level into the flags each wrapped
//! tool understands. Lando takes one uniform table; git flags vary by
//! subcommand, so its mapper reassembles the whole command string. The
//! mappings are data-driven tables rather than branching logic so a new row
//! is an entry, not a new code path.
//!
//! Verbosity is snapshotted onto each tool when it is bound, never read from
//! ambient global state.

/// Output verbosity, ordered from least to most talkative
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Suppress forwarded tool output entirely
    Quiet,
    /// Default level
    #[default]
    Normal,
    /// `-v`
    Verbose,
    /// `-vv`
    VeryVerbose,
    /// Everything the tool can say
    Debug,
}

impl Verbosity {
    /// Derive the level from CLI flags: `-q` wins, then counted `-v`s
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Verbosity::Quiet;
        }
        match verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            2 => Verbosity::VeryVerbose,
            _ => Verbosity::Debug,
        }
    }

    fn index(self) -> usize {
        match self {
            Verbosity::Quiet => 0,
            Verbosity::Normal => 1,
            Verbosity::Verbose => 2,
            Verbosity::VeryVerbose => 3,
            Verbosity::Debug => 4,
        }
    }
}

/// Lando's uniform verbosity table, indexed by [`Verbosity`]
///
/// Verbose levels pass `-v` variants through lando's `--` separator to the
/// underlying service; quiet folds stderr into the captured stream.
const LANDO_FLAGS: [&str; 5] = ["2>&1", "", "-- -v", "-- -vv", "-- -vvvv"];

/// Default git flags when no subcommand-specific row applies
const GIT_DEFAULT: [&str; 5] = ["", "", "-v", "-vv", "-vv"];

/// Per-subcommand git overrides; first element of the argument string
/// selects the row
const GIT_OVERRIDES: &[(&str, [&str; 5])] = &[
    ("checkout", ["-q 2>&1", "", "-v", "-vv", "-vv"]),
    ("pull", ["-q 2>&1", "", "-v", "-vv", "-vv"]),
];

fn join_flag(argv: &str, flag: &str) -> String {
    format!("{} {}", argv.trim(), flag).trim().to_string()
}

/// Append the lando flag for `verbosity` to an argument string
pub fn apply_lando(argv: &str, verbosity: Verbosity) -> String {
    join_flag(argv, LANDO_FLAGS[verbosity.index()])
}

/// Rewrite a git argument string with the verbosity flag for its subcommand
///
/// The flag's spelling and position depend on the subcommand, so the command
/// string is reassembled rather than suffixed blindly. Input without an
/// identifiable subcommand is returned unchanged; the mapper never guesses.
pub fn apply_git(argv: &str, verbosity: Verbosity) -> String {
    let trimmed = argv.trim();
    let Some(subcommand) = trimmed.split_whitespace().next() else {
        return argv.to_string();
    };

    let row = GIT_OVERRIDES
        .iter()
        .find(|(name, _)| *name == subcommand)
        .map(|(_, row)| row)
        .unwrap_or(&GIT_DEFAULT);

    join_flag(trimmed, row[verbosity.index()])
}
