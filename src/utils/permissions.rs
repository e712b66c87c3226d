/// Capability queries against a resolved bot/channel permission set
use poise::serenity_prelude::Permissions;

/// A single capability an operation may require from the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Connect,
    Speak,
    SendMessages,
    AttachFiles,
}

impl Capability {
    /// The Discord permission bit backing this capability
    pub fn permission(self) -> Permissions {
        match self {
            Capability::Connect => Permissions::CONNECT,
            Capability::Speak => Permissions::SPEAK,
            Capability::SendMessages => Permissions::SEND_MESSAGES,
            Capability::AttachFiles => Permissions::ATTACH_FILES,
        }
    }

    /// Name shown to users when the capability is missing
    pub fn display_name(self) -> &'static str {
        match self {
            Capability::Connect => "Connect",
            Capability::Speak => "Speak",
            Capability::SendMessages => "Send Messages",
            Capability::AttachFiles => "Attach Files",
        }
    }
}

/// Capabilities required to join a voice channel
pub const JOIN_VOICE: &[Capability] = &[Capability::Connect, Capability::Speak];

/// Capabilities required to post text
pub const SEND_TEXT: &[Capability] = &[Capability::SendMessages];

/// Capabilities required to post text with a file
pub const SEND_MEDIA: &[Capability] = &[Capability::SendMessages, Capability::AttachFiles];

/// Check whether a permission set grants a capability
pub fn has(permissions: Permissions, capability: Capability) -> bool {
    permissions.contains(capability.permission())
}

/// Return the first required capability the permission set lacks
pub fn missing_capability(
    permissions: Permissions,
    required: &[Capability],
) -> Option<Capability> {
    required
        .iter()
        .copied()
        .find(|capability| !has(permissions, *capability))
}

/// User-facing names of a set of capabilities
pub fn display_names(capabilities: &[Capability]) -> Vec<&'static str> {
    capabilities.iter().map(|c| c.display_name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has() {
        let perms = Permissions::SEND_MESSAGES | Permissions::CONNECT;
        assert!(has(perms, Capability::SendMessages));
        assert!(has(perms, Capability::Connect));
        assert!(!has(perms, Capability::Speak));
    }

    #[test]
    fn test_missing_capability_none() {
        let perms = Permissions::CONNECT | Permissions::SPEAK;
        assert_eq!(missing_capability(perms, JOIN_VOICE), None);
    }

    #[test]
    fn test_missing_capability_reports_first_gap() {
        assert_eq!(
            missing_capability(Permissions::empty(), JOIN_VOICE),
            Some(Capability::Connect)
        );
        assert_eq!(
            missing_capability(Permissions::CONNECT, JOIN_VOICE),
            Some(Capability::Speak)
        );
        assert_eq!(
            missing_capability(Permissions::SEND_MESSAGES, SEND_MEDIA),
            Some(Capability::AttachFiles)
        );
    }

    #[test]
    fn test_display_names() {
        assert_eq!(display_names(SEND_MEDIA), vec!["Send Messages", "Attach Files"]);
        assert!(display_names(&[]).is_empty());
    }

    #[test]
    fn test_empty_requirement() {
        assert_eq!(missing_capability(Permissions::empty(), &[]), None);
    }

    #[test]
    fn test_administrator_bit_alone_is_not_expanded() {
        // Guild-level resolution already folds ADMINISTRATOR into every bit.
        assert!(!has(Permissions::ADMINISTRATOR, Capability::SendMessages));
    }
}
