/// Runtime options of one invocation, as set on the command line.
#[derive(Debug, Clone, Default)]
pub struct Mode {
    /// Report files that would change without writing them.
    pub check: bool,

    /// Print a diff for every file that would change.
    pub diff: bool,

    pub verbose: bool,

    pub quiet: bool,
}

impl Mode {
    /// Whether formatted output should be written back to disk.
    pub fn should_write(&self) -> bool {
        !self.check && !self.diff
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    /// SQL file extension this tool processes.
    pub fn sql_extension(&self) -> &'static str {
        "sql"
    }
}
