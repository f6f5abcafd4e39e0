//! Channel-name construction and slug sanitation.

use crate::id::TicketId;

/// Prefix for the requester-visible ticket channel.
pub const TICKET_PREFIX: &str = "ticket";
/// Prefix for the staff-only discussion channel.
pub const STAFF_PREFIX: &str = "staff";
/// Marker prepended to a channel name when the ticket is closed.
pub const CLOSED_PREFIX: &str = "closed";
/// Slug used when a requester's display name sanitizes to nothing.
pub const FALLBACK_SLUG: &str = "player";

/// Reduce a display name to a platform-safe channel slug.
///
/// Lowercases the input, collapses every run of characters outside
/// `[a-z0-9-]` to a single `-`, and trims leading/trailing dashes. The
/// function is idempotent.
#[must_use]
pub fn sanitize_channel_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Slug for a requester, falling back when the name sanitizes away entirely.
#[must_use]
pub fn requester_slug(display_name: &str) -> String {
    let slug = sanitize_channel_name(display_name);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

#[must_use]
pub fn ticket_channel_name(slug: &str, id: &TicketId) -> String {
    format!("{TICKET_PREFIX}-{slug}-{id}")
}

#[must_use]
pub fn staff_channel_name(id: &TicketId) -> String {
    format!("{STAFF_PREFIX}-{id}")
}

#[must_use]
pub fn closed_channel_name(current: &str) -> String {
    format!("{CLOSED_PREFIX}-{current}")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Alice", "alice")]
    #[case("alice", "alice")]
    #[case("Mr. Bones!!", "mr-bones")]
    #[case("--weird--", "weird")]
    #[case("a__b", "a-b")]
    #[case("ÉLODIE", "lodie")]
    #[case("user 42", "user-42")]
    #[case("!!!", "")]
    fn sanitize_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_channel_name(input), expected);
    }

    #[rstest]
    #[case("Alice")]
    #[case("Mr. Bones!!")]
    #[case("--a--b--")]
    #[case("")]
    fn sanitize_is_idempotent(#[case] input: &str) {
        let once = sanitize_channel_name(input);
        assert_eq!(sanitize_channel_name(&once), once);
    }

    #[test]
    fn sanitize_output_charset_and_edges() {
        for input in ["-lead", "trail-", "Ünïcødé Näme", "  spaced  out  "] {
            let out = sanitize_channel_name(input);
            assert!(
                out.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "unexpected character in {out:?}"
            );
            assert!(!out.starts_with('-'), "leading dash in {out:?}");
            assert!(!out.ends_with('-'), "trailing dash in {out:?}");
        }
    }

    #[test]
    fn empty_slug_falls_back() {
        assert_eq!(requester_slug("!!!"), FALLBACK_SLUG);
        assert_eq!(requester_slug("alice"), "alice");
    }

    #[test]
    fn channel_name_templates() {
        let id = TicketId::from_millis(123_456);
        assert_eq!(ticket_channel_name("alice", &id), "ticket-alice-123456");
        assert_eq!(staff_channel_name(&id), "staff-123456");
        assert_eq!(
            closed_channel_name("ticket-alice-123456"),
            "closed-ticket-alice-123456"
        );
    }
}
