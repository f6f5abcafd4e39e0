//! Channel permission model: deny-by-default visibility with explicit
//! allow-lists for the staff audience and, on the ticket channel, the
//! requester.

/// The channel permissions this engine grants or denies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPermission {
    ViewChannel,
    SendMessages,
    ReadMessageHistory,
}

/// Everything a participant needs inside a ticket conversation.
pub const PARTICIPANT_GRANTS: [ChannelPermission; 3] = [
    ChannelPermission::ViewChannel,
    ChannelPermission::SendMessages,
    ChannelPermission::ReadMessageHistory,
];

/// Who a permission overwrite applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// The community-wide everyone principal.
    Everyone,
    Role(String),
    Member(String),
}

/// One per-principal allow/deny entry in a channel's overwrite set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overwrite {
    pub principal: Principal,
    pub allow: Vec<ChannelPermission>,
    pub deny: Vec<ChannelPermission>,
}

impl Overwrite {
    fn deny_everyone() -> Self {
        Self {
            principal: Principal::Everyone,
            allow: Vec::new(),
            deny: vec![ChannelPermission::ViewChannel],
        }
    }

    fn allow_participant(principal: Principal) -> Self {
        Self {
            principal,
            allow: PARTICIPANT_GRANTS.to_vec(),
            deny: Vec::new(),
        }
    }
}

/// Overwrite set for the requester-visible ticket channel: everyone denied,
/// the staff audience and the requester granted the participant permissions.
#[must_use]
pub fn ticket_channel_overwrites(requester_id: &str, audience_role_id: &str) -> Vec<Overwrite> {
    vec![
        Overwrite::deny_everyone(),
        Overwrite::allow_participant(Principal::Role(audience_role_id.to_string())),
        Overwrite::allow_participant(Principal::Member(requester_id.to_string())),
    ]
}

/// Overwrite set for the staff-only discussion channel: everyone denied,
/// only the staff audience granted the participant permissions.
#[must_use]
pub fn staff_channel_overwrites(audience_role_id: &str) -> Vec<Overwrite> {
    vec![
        Overwrite::deny_everyone(),
        Overwrite::allow_participant(Principal::Role(audience_role_id.to_string())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everyone_deny_rule_comes_first() {
        for set in [
            ticket_channel_overwrites("U1", "R1"),
            staff_channel_overwrites("R1"),
        ] {
            let first = &set[0];
            assert_eq!(first.principal, Principal::Everyone);
            assert_eq!(first.deny, vec![ChannelPermission::ViewChannel]);
            assert!(first.allow.is_empty());
        }
    }

    #[test]
    fn requester_mirrors_audience_on_ticket_channel() {
        let set = ticket_channel_overwrites("U1", "R1");
        let audience = set
            .iter()
            .find(|o| o.principal == Principal::Role("R1".into()))
            .expect("audience overwrite");
        let requester = set
            .iter()
            .find(|o| o.principal == Principal::Member("U1".into()))
            .expect("requester overwrite");
        assert_eq!(audience.allow, requester.allow);
        assert_eq!(audience.allow, PARTICIPANT_GRANTS.to_vec());
    }

    /// The staff set must be a strict subset of the ticket set once the
    /// requester-specific entry is excluded.
    #[test]
    fn staff_set_is_subset_of_ticket_set_minus_requester() {
        let ticket = ticket_channel_overwrites("U1", "R1");
        let staff = staff_channel_overwrites("R1");
        for overwrite in &staff {
            assert!(
                ticket.contains(overwrite),
                "staff overwrite {overwrite:?} missing from ticket set"
            );
        }
        assert_eq!(ticket.len(), staff.len() + 1);
        assert!(
            !staff
                .iter()
                .any(|o| matches!(o.principal, Principal::Member(_))),
            "staff channel must not grant any individual member"
        );
    }
}
