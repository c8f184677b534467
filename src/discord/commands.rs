// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::interactions::{ReplyMode, send_interaction_replies};
use super::users::sender_from_user;
use crate::conversation::menu::MenuCommand;
use crate::desk::{Desk, Inbound};
use miette::{IntoDiagnostic, bail};
use twilight_http::client::Client;
use twilight_model::application::command::{Command, CommandType};
use twilight_model::application::interaction::InteractionContextType;
use twilight_model::application::interaction::application_command::CommandData;
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;
use twilight_util::builder::command::CommandBuilder;

/// One slash command per menu entry, usable in direct messages with the bot
pub fn command_definitions() -> Vec<Command> {
	MenuCommand::all_commands()
		.into_iter()
		.map(|command| {
			CommandBuilder::new(command.command_name(), command.description(), CommandType::ChatInput)
				.contexts([InteractionContextType::BotDm])
				.build()
		})
		.collect()
}

pub async fn route_command(
	interaction: &InteractionCreate,
	command_data: &CommandData,
	http_client: &Client,
	application_id: Id<ApplicationMarker>,
	desk: &Desk,
) -> miette::Result<()> {
	let Some(command) = MenuCommand::from_command_name(&command_data.name) else {
		bail!("Unknown command encountered: {}\n{:?}", command_data.name, command_data);
	};
	let Some(user) = interaction.author() else {
		bail!("Command interaction has no user: {:?}", interaction);
	};
	let sender = sender_from_user(user, None);

	let interaction_client = http_client.interaction(application_id);
	let response = InteractionResponse {
		kind: InteractionResponseType::DeferredChannelMessageWithSource,
		data: None,
	};
	interaction_client
		.create_response(interaction.id, &interaction.token, &response)
		.await
		.into_diagnostic()?;

	let replies = desk.handle(&sender, Inbound::Menu(command)).await?;
	send_interaction_replies(&interaction_client, &interaction.token, &replies, ReplyMode::ReplaceDeferred).await
}
