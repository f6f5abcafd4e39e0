//! Serenity-backed implementation of the channel-directory capability.

use std::sync::Arc;

use {
    anyhow::{Context as _, Result},
    async_trait::async_trait,
    secrecy::ExposeSecret,
    serenity::{
        all::{
            ChannelId, ChannelType, CreateActionRow, CreateChannel, CreateMessage,
            CreateSelectMenu, CreateSelectMenuKind, CreateSelectMenuOption, EditChannel,
            EditMessage, GuildId, MessageId, PermissionOverwrite, PermissionOverwriteType,
            Permissions, RoleId, UserId,
        },
        http::Http,
    },
};

use {
    helpdesk_config::HelpdeskConfig,
    helpdesk_tickets::{
        directory::{
            ChannelDirectory, ChannelHandle, CreateChannelSpec, MessageRef, OutgoingMessage,
            SelectMenuSpec,
        },
        overwrites::{ChannelPermission, Overwrite, Principal},
    },
};

/// Channel directory backed by the Discord REST API for one guild.
pub struct SerenityDirectory {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl SerenityDirectory {
    #[must_use]
    pub fn new(http: Arc<Http>, guild_id: GuildId) -> Self {
        Self { http, guild_id }
    }

    pub fn from_config(config: &HelpdeskConfig) -> Result<Self> {
        let guild_id = GuildId::new(parse_id(&config.discord.guild_id, "guild")?);
        let http = Arc::new(Http::new(config.discord.token.expose_secret()));
        Ok(Self::new(http, guild_id))
    }

    fn map_overwrite(&self, overwrite: &Overwrite) -> Result<PermissionOverwrite> {
        let kind = match &overwrite.principal {
            // The everyone principal is the role sharing the guild's id.
            Principal::Everyone => PermissionOverwriteType::Role(RoleId::new(self.guild_id.get())),
            Principal::Role(id) => PermissionOverwriteType::Role(RoleId::new(parse_id(id, "role")?)),
            Principal::Member(id) => {
                PermissionOverwriteType::Member(UserId::new(parse_id(id, "member")?))
            },
        };
        Ok(PermissionOverwrite {
            allow: permission_bits(&overwrite.allow),
            deny: permission_bits(&overwrite.deny),
            kind,
        })
    }
}

#[async_trait]
impl ChannelDirectory for SerenityDirectory {
    async fn create_channel(&self, spec: CreateChannelSpec) -> Result<ChannelHandle> {
        let overwrites = spec
            .overwrites
            .iter()
            .map(|o| self.map_overwrite(o))
            .collect::<Result<Vec<_>>>()?;
        let mut builder = CreateChannel::new(spec.name)
            .kind(ChannelType::Text)
            .topic(spec.topic)
            .permissions(overwrites);
        if let Some(parent) = &spec.parent_id {
            builder = builder.category(ChannelId::new(parse_id(parent, "category")?));
        }
        let channel = self
            .guild_id
            .create_channel(&self.http, builder)
            .await
            .context("create channel")?;
        Ok(ChannelHandle::new(channel.id.to_string()))
    }

    async fn send_message(
        &self,
        channel: &ChannelHandle,
        message: &OutgoingMessage,
    ) -> Result<MessageRef> {
        let channel_id = ChannelId::new(parse_id(&channel.id, "channel")?);
        let mut builder = CreateMessage::new().content(message.content.clone());
        if let Some(menu) = &message.menu {
            builder = builder.components(vec![CreateActionRow::SelectMenu(render_menu(menu))]);
        }
        let sent = channel_id
            .send_message(&self.http, builder)
            .await
            .context("send message")?;
        Ok(MessageRef {
            channel_id: channel.id.clone(),
            message_id: sent.id.to_string(),
        })
    }

    async fn fetch_message(&self, message: &MessageRef) -> Result<()> {
        let channel_id = ChannelId::new(parse_id(&message.channel_id, "channel")?);
        let message_id = MessageId::new(parse_id(&message.message_id, "message")?);
        channel_id
            .message(&self.http, message_id)
            .await
            .context("fetch message")?;
        Ok(())
    }

    async fn edit_message(&self, message: &MessageRef, content: &OutgoingMessage) -> Result<()> {
        let channel_id = ChannelId::new(parse_id(&message.channel_id, "channel")?);
        let message_id = MessageId::new(parse_id(&message.message_id, "message")?);
        let mut builder = EditMessage::new().content(content.content.clone());
        if let Some(menu) = &content.menu {
            builder = builder.components(vec![CreateActionRow::SelectMenu(render_menu(menu))]);
        }
        channel_id
            .edit_message(&self.http, message_id, builder)
            .await
            .context("edit message")?;
        Ok(())
    }

    async fn rename_channel(&self, channel: &ChannelHandle, new_name: &str) -> Result<()> {
        let channel_id = ChannelId::new(parse_id(&channel.id, "channel")?);
        channel_id
            .edit(&self.http, EditChannel::new().name(new_name))
            .await
            .context("rename channel")?;
        Ok(())
    }

    async fn has_role(&self, member_id: &str, role_id: &str) -> Result<bool> {
        let user_id = UserId::new(parse_id(member_id, "member")?);
        let role_id = RoleId::new(parse_id(role_id, "role")?);
        let member = self
            .http
            .get_member(self.guild_id, user_id)
            .await
            .context("fetch member")?;
        Ok(member.roles.contains(&role_id))
    }
}

fn parse_id(value: &str, what: &'static str) -> Result<u64> {
    let id: u64 = value
        .parse()
        .with_context(|| format!("{what} id {value:?} is not numeric"))?;
    anyhow::ensure!(id != 0, "{what} id must be non-zero");
    Ok(id)
}

fn permission_bits(permissions: &[ChannelPermission]) -> Permissions {
    permissions
        .iter()
        .fold(Permissions::empty(), |bits, p| {
            bits | match p {
                ChannelPermission::ViewChannel => Permissions::VIEW_CHANNEL,
                ChannelPermission::SendMessages => Permissions::SEND_MESSAGES,
                ChannelPermission::ReadMessageHistory => Permissions::READ_MESSAGE_HISTORY,
            }
        })
}

fn render_menu(menu: &SelectMenuSpec) -> CreateSelectMenu {
    CreateSelectMenu::new(menu.custom_id.clone(), CreateSelectMenuKind::String {
        options: menu
            .options
            .iter()
            .map(|o| CreateSelectMenuOption::new(o.label.clone(), o.value.clone()))
            .collect(),
    })
    .placeholder(menu.placeholder.clone())
}

#[cfg(test)]
mod tests {
    use helpdesk_tickets::overwrites::{staff_channel_overwrites, ticket_channel_overwrites};

    use super::*;

    fn directory() -> SerenityDirectory {
        SerenityDirectory::new(Arc::new(Http::new("")), GuildId::new(900))
    }

    #[test]
    fn participant_permissions_map_to_expected_bits() {
        let bits = permission_bits(&[
            ChannelPermission::ViewChannel,
            ChannelPermission::SendMessages,
            ChannelPermission::ReadMessageHistory,
        ]);
        assert_eq!(
            bits,
            Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES | Permissions::READ_MESSAGE_HISTORY
        );
    }

    #[test]
    fn everyone_principal_maps_to_guild_role() {
        let dir = directory();
        let set = staff_channel_overwrites("700");
        let mapped = dir.map_overwrite(&set[0]).expect("map everyone overwrite");
        assert_eq!(mapped.kind, PermissionOverwriteType::Role(RoleId::new(900)));
        assert_eq!(mapped.deny, Permissions::VIEW_CHANNEL);
        assert!(mapped.allow.is_empty());
    }

    #[test]
    fn requester_overwrite_maps_to_member_kind() {
        let dir = directory();
        let set = ticket_channel_overwrites("42", "700");
        let requester = dir.map_overwrite(&set[2]).expect("map requester overwrite");
        assert_eq!(
            requester.kind,
            PermissionOverwriteType::Member(UserId::new(42))
        );
        assert!(requester.allow.contains(Permissions::VIEW_CHANNEL));
    }

    #[test]
    fn non_numeric_ids_are_rejected() {
        let dir = directory();
        let set = staff_channel_overwrites("not-a-role");
        assert!(dir.map_overwrite(&set[1]).is_err());
        assert!(parse_id("0", "role").is_err());
    }
}
