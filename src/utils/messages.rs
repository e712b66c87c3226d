/// Pure functions for formatting status messages (Discord-agnostic)

/// Format an error message with emoji
pub fn format_error(message: &str) -> String {
    format!("❌ {}", message)
}

/// Format a success message with emoji
pub fn format_success(message: &str) -> String {
    format!("✅ {}", message)
}

/// Format a warning message with emoji
pub fn format_warning(message: &str) -> String {
    format!("⚠️ {}", message)
}

/// Format an info message with emoji
pub fn format_info(message: &str) -> String {
    format!("ℹ️ {}", message)
}

/// Build an error message for missing bot permissions in a channel.
///
/// Several names mean any of them may be the missing one.
pub fn build_permission_error(permissions: &[&str], channel_mention: &str) -> String {
    let names = permissions
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(" and/or ");
    format_error(&format!(
        "I don't have the {} permission in {}. Please grant it and try again.",
        names, channel_mention
    ))
}

/// Build an error message for a failed outbound action
pub fn build_transport_error(action: &str, cause: &dyn std::fmt::Display) -> String {
    format_error(&format!("Failed to {}: {}", action, cause))
}

/// Join a progress line and a final status into one reply
pub fn join_lines(lines: &[String]) -> String {
    lines
        .iter()
        .filter(|line| !line.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_markers() {
        assert_eq!(format_error("nope"), "❌ nope");
        assert_eq!(format_success("done"), "✅ done");
        assert_eq!(format_warning("careful"), "⚠️ careful");
        assert_eq!(format_info("fyi"), "ℹ️ fyi");
    }

    #[test]
    fn test_build_permission_error() {
        let msg = build_permission_error(&["Speak"], "<#1>");
        assert!(msg.starts_with("❌"));
        assert!(msg.contains("the 'Speak' permission"));
        assert!(msg.contains("<#1>"));
    }

    #[test]
    fn test_build_permission_error_names_every_candidate() {
        let msg = build_permission_error(&["Send Messages", "Attach Files"], "<#1>");
        assert!(msg.contains("'Send Messages' and/or 'Attach Files'"));
    }

    #[test]
    fn test_build_transport_error() {
        assert_eq!(
            build_transport_error("send the message", &"timed out"),
            "❌ Failed to send the message: timed out"
        );
    }

    #[test]
    fn test_join_lines_skips_empty() {
        let joined = join_lines(&["a".to_string(), String::new(), "b".to_string()]);
        assert_eq!(joined, "a\nb");
        assert_eq!(join_lines(&[]), "");
    }
}
