use crate::jobs::DEFAULT_CAPACITY;

/// Runtime settings for a shell session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    pub max_background_jobs: usize,
    /// Environment variable consulted by `cd` with no arguments
    pub home_var: String,
}

impl ShellConfig {
    pub fn with_max_background_jobs(mut self, max: usize) -> Self {
        self.max_background_jobs = max;
        self
    }

    pub fn with_home_var(mut self, name: impl Into<String>) -> Self {
        self.home_var = name.into();
        self
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: ": ".to_string(),
            max_background_jobs: DEFAULT_CAPACITY,
            home_var: "HOME".to_string(),
        }
    }
}
