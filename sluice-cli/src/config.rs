//! CLI configuration

/// Configuration shared by all commands
pub struct Config {
    /// Base URL of the dispatcher admin API
    pub dispatcher_url: String,
}
