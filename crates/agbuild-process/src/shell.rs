//! Platform shell invocation

use std::process::Command;

/// Get the shell and the flag that makes it run a command line
fn get_shell() -> (&'static str, &'static str) {
    if cfg!(windows) {
        ("cmd.exe", "/C")
    } else {
        ("/bin/sh", "-c")
    }
}

/// Build a [`Command`] that runs `command_line` through the platform shell
pub fn shell_command(command_line: &str) -> Command {
    let (shell, flag) = get_shell();
    let mut cmd = Command::new(shell);
    cmd.arg(flag).arg(command_line);
    cmd
}

/// Flags whose value must never be echoed or logged
const SECRET_FLAGS: &[&str] = &["--auth-token"];

/// Replace the value of every secret flag in a command line with `***`.
///
/// Both `--flag value` and `--flag=value` are recognized.
pub fn mask_secrets(command_line: &str) -> String {
    let mut masked = Vec::new();
    let mut hide_next = false;
    for word in command_line.split(' ') {
        if hide_next && !word.is_empty() {
            masked.push("***".to_string());
            hide_next = false;
            continue;
        }
        match SECRET_FLAGS.iter().find(|flag| word.starts_with(**flag)) {
            Some(flag) if word.len() == flag.len() => {
                hide_next = true;
                masked.push(word.to_string());
            }
            Some(flag) if word[flag.len()..].starts_with('=') => {
                masked.push(format!("{}=***", flag));
            }
            _ => masked.push(word.to_string()),
        }
    }
    masked.join(" ")
}

/// Quote an argument for a shell command line if it contains whitespace or
/// quotes
pub fn quote_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(|c| c.is_whitespace() || c == '"') {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_arg() {
        assert_eq!(quote_arg("build-linux-x86_64"), "build-linux-x86_64");
        assert_eq!(quote_arg("Program Files"), "\"Program Files\"");
        assert_eq!(quote_arg(""), "\"\"");
    }

    #[test]
    fn test_mask_secrets() {
        assert_eq!(
            mask_secrets("sentry-cli --auth-token abc123 upload-dif -o e47 build/debug-symbols"),
            "sentry-cli --auth-token *** upload-dif -o e47 build/debug-symbols"
        );
        assert_eq!(
            mask_secrets("sentry-cli --auth-token=abc123 info"),
            "sentry-cli --auth-token=*** info"
        );
        assert_eq!(mask_secrets("zip -r out.zip bin"), "zip -r out.zip bin");
        assert_eq!(mask_secrets("tool --auth-tokens x"), "tool --auth-tokens x");
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_runs_command_line() {
        let output = shell_command("echo one && echo two").output().unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "one\ntwo\n");
    }
}
