//! Environment variable lookup.

/// Read-only view of environment variables.
pub trait EnvLookup {
    /// Value of `name`, or `None` when unset. A set-but-empty variable
    /// returns `Some("")`.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Lookup against the current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_env_reads_path() {
        // PATH is set in every test environment we run in.
        assert!(ProcessEnv.lookup("PATH").is_some());
    }

    #[test]
    fn process_env_misses_unset_variable() {
        assert_eq!(
            ProcessEnv.lookup("HELPERS_TEST_SURELY_UNSET_VARIABLE_7f3a"),
            None
        );
    }
}
