use std::fmt;

/// Checks if the error comes from a history database held by another process
#[must_use]
pub fn is_database_locked_error(error_str: &str) -> bool {
    error_str.contains("database is locked") || error_str.contains("database is busy")
}

/// Formats an error with additional help text if the history database is
/// locked
pub fn format_error_with_help<E: fmt::Display>(
    error: &E,
    program_name: &str,
    config_file: &str,
) -> String {
    let error_str = error.to_string();

    if is_database_locked_error(&error_str) {
        format!(
            "{error_str}\n\nAnother {program_name} instance is probably using the same history \
             database.\nStop it, or point 'history.path' in your {program_name} configuration \
             file to another location:\n\n[history]\npath = \"/tmp/{program_name}-history\"\n\n\
             Default location: $XDG_CONFIG_HOME/cliptrail/{config_file}"
        )
    } else {
        error_str
    }
}

#[cfg(test)]
mod tests {
    use super::{format_error_with_help, is_database_locked_error};

    #[test]
    fn test_help_is_only_added_for_locked_database() {
        assert!(is_database_locked_error("Could not open, error: database is locked"));

        let plain = format_error_with_help(&"file not found", "cliptraild", "cliptraild.toml");
        assert_eq!(plain, "file not found");

        let helped = format_error_with_help(&"database is locked", "cliptraild", "cliptraild.toml");
        assert!(helped.starts_with("database is locked"));
        assert!(helped.contains("history.path"));
        assert!(helped.contains("cliptraild.toml"));
    }
}
