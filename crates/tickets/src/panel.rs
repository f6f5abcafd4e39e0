//! Standing selection panel: the single re-publishable prompt that starts
//! ticket creation.

use tracing::{info, warn};

use crate::{
    directory::{
        ChannelDirectory, ChannelHandle, MessageRef, OutgoingMessage, SelectMenuSpec,
        SelectOptionSpec,
    },
    error::{Error, Result},
    routing::RoutingTable,
};

/// Component id carried by the panel's selection menu.
pub const PANEL_CUSTOM_ID: &str = "ticket-panel";

const PANEL_PLACEHOLDER: &str = "Select a ticket type";

/// Build the panel prompt. Options are the routing table's (label, key)
/// pairs in table order.
#[must_use]
pub fn panel_message(routes: &RoutingTable) -> OutgoingMessage {
    OutgoingMessage {
        content: concat!(
            "\u{1F3AB} **Help Desk**\n",
            "Select the ticket type below to open a private support channel.",
        )
        .to_string(),
        menu: Some(SelectMenuSpec {
            custom_id: PANEL_CUSTOM_ID.into(),
            placeholder: PANEL_PLACEHOLDER.into(),
            options: routes
                .routes()
                .iter()
                .map(|r| SelectOptionSpec {
                    label: r.label.clone(),
                    value: r.key.clone(),
                })
                .collect(),
        }),
    }
}

/// Publish the panel, editing the previous prompt in place when a reference
/// to it survives.
///
/// A stale or unreachable reference is logged and abandoned; exactly one
/// fresh prompt is sent in that case. Only a failure to send the fresh
/// prompt is surfaced, and never to an end user.
pub async fn publish_or_refresh(
    directory: &dyn ChannelDirectory,
    panel_channel: &ChannelHandle,
    routes: &RoutingTable,
    existing: Option<&MessageRef>,
) -> Result<MessageRef> {
    let message = panel_message(routes);

    if let Some(existing) = existing {
        match refresh_existing(directory, existing, &message).await {
            Ok(()) => {
                info!(message_id = %existing.message_id, "refreshed existing panel message");
                return Ok(existing.clone());
            },
            Err(e) => {
                warn!(
                    message_id = %existing.message_id,
                    error = %e,
                    "unable to edit existing panel message, sending a new panel"
                );
            },
        }
    }

    let sent = directory
        .send_message(panel_channel, &message)
        .await
        .map_err(Error::presentation)?;
    info!(channel = %panel_channel.id, message_id = %sent.message_id, "published panel message");
    Ok(sent)
}

async fn refresh_existing(
    directory: &dyn ChannelDirectory,
    existing: &MessageRef,
    message: &OutgoingMessage,
) -> anyhow::Result<()> {
    directory.fetch_message(existing).await?;
    directory.edit_message(existing, message).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use {anyhow::bail, async_trait::async_trait};

    use {super::*, crate::directory::CreateChannelSpec};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Fetch(String),
        Edit(String),
        Send(String),
    }

    #[derive(Default)]
    struct MockDirectory {
        calls: Mutex<Vec<Call>>,
        fetch_fails: bool,
        edit_fails: bool,
        send_fails: bool,
    }

    impl MockDirectory {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChannelDirectory for MockDirectory {
        async fn create_channel(&self, _spec: CreateChannelSpec) -> anyhow::Result<ChannelHandle> {
            bail!("not used by panel tests")
        }

        async fn send_message(
            &self,
            channel: &ChannelHandle,
            _message: &OutgoingMessage,
        ) -> anyhow::Result<MessageRef> {
            self.calls.lock().unwrap().push(Call::Send(channel.id.clone()));
            if self.send_fails {
                bail!("send rejected");
            }
            Ok(MessageRef {
                channel_id: channel.id.clone(),
                message_id: "fresh".into(),
            })
        }

        async fn fetch_message(&self, message: &MessageRef) -> anyhow::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Fetch(message.message_id.clone()));
            if self.fetch_fails {
                bail!("unknown message");
            }
            Ok(())
        }

        async fn edit_message(
            &self,
            message: &MessageRef,
            _content: &OutgoingMessage,
        ) -> anyhow::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Edit(message.message_id.clone()));
            if self.edit_fails {
                bail!("edit rejected");
            }
            Ok(())
        }

        async fn rename_channel(
            &self,
            _channel: &ChannelHandle,
            _new_name: &str,
        ) -> anyhow::Result<()> {
            bail!("not used by panel tests")
        }

        async fn has_role(&self, _member_id: &str, _role_id: &str) -> anyhow::Result<bool> {
            bail!("not used by panel tests")
        }
    }

    fn routes() -> RoutingTable {
        RoutingTable::from_config(
            Some(r#"[{"label": "Billing", "value": "billing", "staffRoleId": "R1"}]"#),
            "RD",
        )
    }

    fn existing_ref() -> MessageRef {
        MessageRef {
            channel_id: "C1".into(),
            message_id: "M1".into(),
        }
    }

    #[test]
    fn panel_options_follow_table_order() {
        let table = RoutingTable::from_config(
            Some(
                r#"[
                    {"label": "Billing", "value": "billing"},
                    {"label": "Reports", "value": "reports"}
                ]"#,
            ),
            "RD",
        );
        let message = panel_message(&table);
        let menu = message.menu.expect("panel carries a menu");
        assert_eq!(menu.custom_id, PANEL_CUSTOM_ID);
        let pairs: Vec<_> = menu
            .options
            .iter()
            .map(|o| (o.label.as_str(), o.value.as_str()))
            .collect();
        assert_eq!(pairs, [("Billing", "billing"), ("Reports", "reports")]);
    }

    #[tokio::test]
    async fn valid_reference_edits_in_place_without_sending() {
        let directory = MockDirectory::default();
        let channel = ChannelHandle::new("C1");
        let existing = existing_ref();

        let published =
            publish_or_refresh(&directory, &channel, &routes(), Some(&existing))
                .await
                .expect("refresh");

        assert_eq!(published, existing);
        assert_eq!(
            directory.calls(),
            [Call::Fetch("M1".into()), Call::Edit("M1".into())]
        );
    }

    #[tokio::test]
    async fn unresolvable_reference_sends_exactly_one_new_prompt() {
        let directory = MockDirectory {
            fetch_fails: true,
            ..Default::default()
        };
        let channel = ChannelHandle::new("C1");
        let existing = existing_ref();

        let published =
            publish_or_refresh(&directory, &channel, &routes(), Some(&existing))
                .await
                .expect("fallback send");

        assert_eq!(published.message_id, "fresh");
        assert_eq!(
            directory.calls(),
            [Call::Fetch("M1".into()), Call::Send("C1".into())]
        );
    }

    #[tokio::test]
    async fn failed_edit_falls_back_to_fresh_send() {
        let directory = MockDirectory {
            edit_fails: true,
            ..Default::default()
        };
        let channel = ChannelHandle::new("C1");
        let existing = existing_ref();

        let published =
            publish_or_refresh(&directory, &channel, &routes(), Some(&existing))
                .await
                .expect("fallback send");

        assert_eq!(published.message_id, "fresh");
        let calls = directory.calls();
        assert_eq!(calls.last(), Some(&Call::Send("C1".into())));
        assert_eq!(
            calls.iter().filter(|c| matches!(c, Call::Send(_))).count(),
            1
        );
    }

    #[tokio::test]
    async fn no_reference_sends_fresh_prompt() {
        let directory = MockDirectory::default();
        let channel = ChannelHandle::new("C1");

        let published = publish_or_refresh(&directory, &channel, &routes(), None)
            .await
            .expect("send");

        assert_eq!(published.message_id, "fresh");
        assert_eq!(directory.calls(), [Call::Send("C1".into())]);
    }

    #[tokio::test]
    async fn failed_send_surfaces_presentation_error() {
        let directory = MockDirectory {
            send_fails: true,
            ..Default::default()
        };
        let channel = ChannelHandle::new("C1");

        let result = publish_or_refresh(&directory, &channel, &routes(), None).await;
        assert!(matches!(result, Err(Error::Presentation { .. })));
    }
}
