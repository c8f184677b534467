// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::components::button_rows;
use super::users::sender_from_user;
use crate::desk::{Desk, Inbound};
use crate::prompt::Prompt;
use miette::{IntoDiagnostic, bail};
use twilight_http::client::{Client, InteractionClient};
use twilight_model::application::interaction::message_component::MessageComponentInteractionData;
use twilight_model::channel::message::MessageFlags;
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;

/// How replies to a deferred interaction are delivered
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReplyMode {
	/// The first reply replaces the deferred "thinking" message; the rest follow it.
	ReplaceDeferred,
	/// Every reply is a new followup message.
	Followup { ephemeral: bool },
}

/// Handles a button press. The custom ID of every button the bot sends is an action token.
pub async fn route_interaction(
	interaction: &InteractionCreate,
	interaction_data: &MessageComponentInteractionData,
	http_client: &Client,
	application_id: Id<ApplicationMarker>,
	desk: &Desk,
) -> miette::Result<()> {
	let Some(user) = interaction.author() else {
		bail!("Component interaction has no user: {:?}", interaction);
	};
	let nick = interaction.member.as_ref().and_then(|member| member.nick.as_deref());
	let sender = sender_from_user(user, nick);

	let interaction_client = http_client.interaction(application_id);
	let response = InteractionResponse {
		kind: InteractionResponseType::DeferredUpdateMessage,
		data: None,
	};
	interaction_client
		.create_response(interaction.id, &interaction.token, &response)
		.await
		.into_diagnostic()?;

	let replies = desk
		.handle(&sender, Inbound::Button(interaction_data.custom_id.clone()))
		.await?;
	// Presses in the ticket channel are answered only to the operator who pressed.
	let mode = ReplyMode::Followup {
		ephemeral: interaction.guild_id.is_some(),
	};
	send_interaction_replies(&interaction_client, &interaction.token, &replies, mode).await
}

pub async fn send_interaction_replies(
	interaction_client: &InteractionClient<'_>,
	interaction_token: &str,
	replies: &[Prompt],
	mode: ReplyMode,
) -> miette::Result<()> {
	let mut replies = replies.iter();
	let ephemeral = match mode {
		ReplyMode::ReplaceDeferred => {
			if let Some(first) = replies.next() {
				let components = button_rows(&first.buttons);
				interaction_client
					.update_response(interaction_token)
					.content(Some(first.text.as_str()))
					.components(Some(components.as_slice()))
					.await
					.into_diagnostic()?;
			}
			false
		}
		ReplyMode::Followup { ephemeral } => ephemeral,
	};

	for reply in replies {
		let components = button_rows(&reply.buttons);
		let mut followup = interaction_client
			.create_followup(interaction_token)
			.content(&reply.text)
			.components(&components);
		if ephemeral {
			followup = followup.flags(MessageFlags::EPHEMERAL);
		}
		followup.await.into_diagnostic()?;
	}
	Ok(())
}
