// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::commands::{command_definitions, route_command};
use super::interactions::route_interaction;
use super::messages::handle_direct_message;
use crate::config::ConfigData;
use crate::desk::Desk;
use miette::IntoDiagnostic;
use std::sync::Arc;
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt};
use twilight_http::client::Client;
use twilight_model::application::interaction::InteractionData;
use twilight_model::gateway::event::Event;
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;

pub fn set_up_client(config: &ConfigData) -> Arc<Client> {
	let client = Client::builder()
		.token(config.discord.bot_token.clone())
		.timeout(config.discord.request_timeout)
		.build();
	Arc::new(client)
}

pub async fn run_bot(config: Arc<ConfigData>, http_client: Arc<Client>, desk: Arc<Desk>) -> miette::Result<()> {
	let intents = Intents::DIRECT_MESSAGES | Intents::MESSAGE_CONTENT;

	let mut shard = Shard::new(ShardId::ONE, config.discord.bot_token.clone(), intents);

	let application_id = {
		let application_response = http_client.current_user_application().await.into_diagnostic()?;
		application_response.model().await.into_diagnostic()?.id
	};

	{
		let interaction_client = http_client.interaction(application_id);
		let commands = command_definitions();
		interaction_client
			.set_global_commands(&commands)
			.await
			.into_diagnostic()?;
	}

	while let Some(event) = shard.next_event(EventTypeFlags::all()).await {
		let event = match event {
			Ok(event) => event,
			Err(error) => {
				tracing::warn!(source = ?error, "error receiving event");
				continue;
			}
		};

		tokio::spawn(handle_event(
			event,
			Arc::clone(&http_client),
			application_id,
			Arc::clone(&desk),
		));
	}

	Ok(())
}

async fn handle_event(event: Event, http_client: Arc<Client>, application_id: Id<ApplicationMarker>, desk: Arc<Desk>) {
	let event_result = handle_event_route(event, &http_client, application_id, &desk).await;
	if let Err(error) = event_result {
		tracing::error!(source = ?error, "An error occurred handling a gateway event");
	}
}

async fn handle_event_route(
	event: Event,
	http_client: &Client,
	application_id: Id<ApplicationMarker>,
	desk: &Desk,
) -> miette::Result<()> {
	tracing::debug!("Incoming gateway message: {:?}", event);
	match event {
		Event::InteractionCreate(interaction) => match &interaction.data {
			Some(InteractionData::ApplicationCommand(command_data)) => {
				route_command(&interaction, command_data, http_client, application_id, desk).await?;
			}
			Some(InteractionData::MessageComponent(interaction_data)) => {
				route_interaction(&interaction, interaction_data, http_client, application_id, desk).await?;
			}
			_ => (),
		},
		Event::MessageCreate(message) => handle_direct_message(&message, http_client, desk).await?,
		Event::Ready(_) => {
			tracing::info!("Discord gateway is ready");
		}
		_ => (),
	}
	Ok(())
}
