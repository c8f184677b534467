// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::components::button_rows;
use crate::card::Card;
use crate::notify::{ChatSurface, DeliveryError};
use crate::prompt::Prompt;
use async_trait::async_trait;
use std::slice;
use std::sync::Arc;
use twilight_http::client::Client;
use twilight_model::channel::message::embed::Embed;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker, UserMarker};
use twilight_util::builder::embed::{EmbedBuilder, ImageSource};

/// Posts ticket cards to the ticket channel and direct messages to users
pub struct DiscordSurface {
	http_client: Arc<Client>,
	ticket_channel: Id<ChannelMarker>,
}

impl DiscordSurface {
	pub fn new(http_client: Arc<Client>, ticket_channel: Id<ChannelMarker>) -> Self {
		Self {
			http_client,
			ticket_channel,
		}
	}
}

/// Cards with an image are sent as an embed showing the image, with the card text as its description.
fn image_embed(card: &Card, image_url: &str) -> Result<Embed, DeliveryError> {
	let image = ImageSource::url(image_url).map_err(DeliveryError::new)?;
	let embed = EmbedBuilder::new()
		.description(&card.text)
		.image(image)
		.validate()
		.map_err(DeliveryError::new)?
		.build();
	Ok(embed)
}

#[async_trait]
impl ChatSurface for DiscordSurface {
	async fn post_card(&self, card: &Card) -> Result<Id<MessageMarker>, DeliveryError> {
		let components = button_rows(&card.buttons);
		let create_message = self.http_client.create_message(self.ticket_channel).components(&components);
		let response = match &card.image_url {
			Some(image_url) => {
				let embed = image_embed(card, image_url)?;
				create_message.embeds(&[embed]).await
			}
			None => create_message.content(&card.text).await,
		};
		let message = response
			.map_err(DeliveryError::new)?
			.model()
			.await
			.map_err(DeliveryError::new)?;
		Ok(message.id)
	}

	async fn edit_card_text(&self, message: Id<MessageMarker>, card: &Card) -> Result<(), DeliveryError> {
		let components = button_rows(&card.buttons);
		self.http_client
			.update_message(self.ticket_channel, message)
			.content(Some(card.text.as_str()))
			.components(Some(components.as_slice()))
			.await
			.map_err(DeliveryError::new)?;
		Ok(())
	}

	async fn edit_card_caption(&self, message: Id<MessageMarker>, card: &Card) -> Result<(), DeliveryError> {
		let Some(image_url) = &card.image_url else {
			return self.edit_card_text(message, card).await;
		};
		let embed = image_embed(card, image_url)?;
		let components = button_rows(&card.buttons);
		self.http_client
			.update_message(self.ticket_channel, message)
			.embeds(Some(slice::from_ref(&embed)))
			.components(Some(components.as_slice()))
			.await
			.map_err(DeliveryError::new)?;
		Ok(())
	}

	async fn send_direct(&self, user: Id<UserMarker>, prompt: &Prompt) -> Result<(), DeliveryError> {
		let channel = self
			.http_client
			.create_private_channel(user)
			.await
			.map_err(DeliveryError::new)?
			.model()
			.await
			.map_err(DeliveryError::new)?;
		let components = button_rows(&prompt.buttons);
		self.http_client
			.create_message(channel.id)
			.content(&prompt.text)
			.components(&components)
			.await
			.map_err(DeliveryError::new)?;
		Ok(())
	}
}
