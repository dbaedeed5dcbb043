use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::ssh::ConnectionEntry;

const HOST_KEYWORD: &str = "host ";
const HOSTNAME_KEYWORD: &str = "hostname ";
const USER_KEYWORD: &str = "user ";
const WILDCARD_MARKER: &str = " *";

/// Returns the path to ~/.ssh/config.
pub fn ssh_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    Ok(home.join(".ssh").join("config"))
}

/// Read and parse an ssh config file. Any read failure is fatal to the caller.
pub fn load_entries(path: &Path) -> Result<Vec<ConnectionEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let entries = parse_entries(&content);
    info!("loaded {} hosts from {}", entries.len(), path.display());
    Ok(entries)
}

/// Parse all `Host` blocks into entries, in file order.
/// Wildcard blocks (`Host *`, `Host *.example.com`) are skipped.
pub fn parse_entries(content: &str) -> Vec<ConnectionEntry> {
    let mut builder = EntryBuilder::default();

    for (lineno, line) in content.lines().enumerate() {
        if line.trim_start().starts_with('#') {
            continue;
        }

        // ASCII lowercasing keeps byte offsets identical to `line`.
        let lower = line.to_ascii_lowercase();

        if lower.contains(HOST_KEYWORD) && !lower.contains(WILDCARD_MARKER) {
            let alias = value_after(line, &lower, HOST_KEYWORD).to_lowercase();
            builder.open(alias);
        } else if lower.contains(HOST_KEYWORD) {
            builder.close();
        } else if lower.contains(HOSTNAME_KEYWORD) {
            let value = value_after(line, &lower, HOSTNAME_KEYWORD);
            if !builder.set_hostname(value) {
                debug!("line {}: HostName outside of a Host block", lineno + 1);
            }
        } else if lower.contains(USER_KEYWORD) {
            let value = value_after(line, &lower, USER_KEYWORD);
            if !builder.set_user(value) {
                debug!("line {}: User outside of a Host block", lineno + 1);
            }
        }
    }

    builder.finish()
}

/// Text following the first occurrence of `keyword`, trimmed.
fn value_after<'a>(line: &'a str, lower: &str, keyword: &str) -> &'a str {
    match lower.find(keyword) {
        Some(idx) => line[idx + keyword.len()..].trim(),
        None => "",
    }
}

/// Accumulates the entry currently being built and finalizes it when the
/// next `Host` line starts or the input ends.
#[derive(Default)]
struct EntryBuilder {
    entries: Vec<ConnectionEntry>,
    current: Option<ConnectionEntry>,
}

impl EntryBuilder {
    fn open(&mut self, alias: String) {
        self.close();
        if !alias.is_empty() {
            self.current = Some(ConnectionEntry::new(alias));
        }
    }

    fn close(&mut self) {
        if let Some(entry) = self.current.take() {
            self.entries.push(entry);
        }
    }

    fn set_hostname(&mut self, value: &str) -> bool {
        match self.current {
            Some(ref mut c) => {
                c.hostname = Some(value.to_string());
                true
            }
            None => false,
        }
    }

    fn set_user(&mut self, value: &str) -> bool {
        match self.current {
            Some(ref mut c) => {
                c.user = Some(value.to_string());
                true
            }
            None => false,
        }
    }

    fn finish(mut self) -> Vec<ConnectionEntry> {
        self.close();
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn displays(content: &str) -> Vec<String> {
        parse_entries(content).iter().map(|e| e.display()).collect()
    }

    #[test]
    fn test_one_entry_per_host_line_in_file_order() {
        let content = "Host alpha\nHost beta\n  HostName b.example.com\nHost gamma\n";
        let aliases: Vec<String> = parse_entries(content).into_iter().map(|e| e.alias).collect();
        assert_eq!(aliases, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_wildcard_host_is_skipped() {
        let content = "Host *\n  User root\n  ServerAliveInterval 60\n";
        assert!(parse_entries(content).is_empty());
    }

    #[test]
    fn test_wildcard_block_does_not_leak_into_previous_entry() {
        let content = "Host web\n  HostName web.local\nHost *\n  User root\n";
        assert_eq!(displays(content), vec!["web: web.local"]);
    }

    #[test]
    fn test_full_block_display() {
        let content = "Host foo\n    HostName 1.2.3.4\n    User bob\n";
        assert_eq!(displays(content), vec!["foo: bob@1.2.3.4"]);
    }

    #[test]
    fn test_user_before_hostname_renders_same() {
        let content = "Host foo\n    User bob\n    HostName 1.2.3.4\n";
        assert_eq!(displays(content), vec!["foo: bob@1.2.3.4"]);
    }

    #[test]
    fn test_bare_host_display() {
        assert_eq!(displays("Host bar\n"), vec!["bar: "]);
    }

    #[test]
    fn test_repeated_directive_is_last_writer_wins() {
        let content = "Host foo\n  User alice\n  User bob\n  HostName h1\n  HostName h2\n";
        assert_eq!(displays(content), vec!["foo: bob@h2"]);
    }

    #[test]
    fn test_alias_lowercased_values_keep_case() {
        let content = "HOST MyBox\n\tHostName Box.Example.COM\n\tuser Admin\n";
        let entries = parse_entries(content);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].alias, "mybox");
        assert_eq!(entries[0].hostname.as_deref(), Some("Box.Example.COM"));
        assert_eq!(entries[0].user.as_deref(), Some("Admin"));
    }

    #[test]
    fn test_directives_before_first_host_are_ignored() {
        let content = "User nobody\nHostName stray\nHost real\n";
        assert_eq!(displays(content), vec!["real: "]);
    }

    #[test]
    fn test_comments_do_not_open_entries() {
        let content = "# the host for work\nHost work\n  # user alice\n  User bob\n";
        assert_eq!(displays(content), vec!["work: bob"]);
    }

    #[test]
    fn test_unrelated_directives_are_ignored() {
        let content = "Host foo\n  Port 2222\n  IdentityFile ~/.ssh/id_ed25519\n  ForwardAgent yes\n";
        assert_eq!(displays(content), vec!["foo: "]);
    }

    #[test]
    fn test_empty_alias_opens_nothing() {
        let content = "Host a\nHost   \n  User ghost\n";
        assert_eq!(displays(content), vec!["a: "]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "Host foo\r\n  HostName 1.2.3.4\r\n  User bob\r\n";
        assert_eq!(displays(content), vec!["foo: bob@1.2.3.4"]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(parse_entries("").is_empty());
    }

    #[test]
    fn test_parsing_is_repeatable() {
        let content = "Host a\n  User u\nHost b\n  HostName h\n";
        assert_eq!(parse_entries(content), parse_entries(content));
    }

    #[test]
    fn test_load_entries_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Host staging\n  HostName 10.0.0.5\n  User ci").unwrap();
        let entries = load_entries(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].display(), "staging: ci@10.0.0.5");
    }

    #[test]
    fn test_load_entries_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_entries(&dir.path().join("config")).unwrap_err();
        assert!(err.to_string().starts_with("reading "));
    }
}
