//! First-token extraction.

/// Returns the base executable of a command: its first whitespace-delimited
/// token. `None` for empty or whitespace-only input.
///
/// No shell parsing happens here. `"FOO=1 make"` yields `"FOO=1"`, and
/// `"/bin/rm x"` yields `"/bin/rm"`, which is on neither default list.
pub fn base_command(command: &str) -> Option<&str> {
    command.split_whitespace().next()
}
