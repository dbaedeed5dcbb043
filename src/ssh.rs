/// One `Host` block from ~/.ssh/config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEntry {
    /// Matches the `Host` alias in ~/.ssh/config, lowercased.
    pub alias: String,
    pub user: Option<String>,
    pub hostname: Option<String>,
}

impl ConnectionEntry {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            user: None,
            hostname: None,
        }
    }

    /// The line shown in the picker: `alias: [user@]hostname`.
    pub fn display(&self) -> String {
        let target = match (&self.user, &self.hostname) {
            (Some(user), Some(hostname)) => format!("{}@{}", user, hostname),
            (Some(user), None) => user.clone(),
            (None, Some(hostname)) => hostname.clone(),
            (None, None) => String::new(),
        };
        format!("{}: {}", self.alias, target)
    }

    pub fn ssh_command(&self) -> String {
        format!("ssh {}", self.alias)
    }
}

/// Build the command for a display line by taking everything before the
/// first `:` as the ssh target.
pub fn ssh_command_for(display: &str) -> String {
    let target = display.split(':').next().unwrap_or_default();
    format!("ssh {}", target)
}
