//! Common utilities

/// Check if a command is available in PATH
pub fn command_exists(cmd: &str) -> bool {
    std::process::Command::new("which")
        .arg(cmd)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_exists_for_shell() {
        assert!(command_exists("sh"));
    }

    #[test]
    fn test_command_exists_missing() {
        assert!(!command_exists("definitely-not-a-real-command-xyz"));
    }
}
