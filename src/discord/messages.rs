// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::components::button_rows;
use super::users::sender_from_user;
use crate::desk::{Desk, Inbound};
use miette::IntoDiagnostic;
use twilight_http::client::Client;
use twilight_model::channel::{Attachment, Message};

/// Feeds a direct message to the desk and answers in the same channel.
pub async fn handle_direct_message(message: &Message, http_client: &Client, desk: &Desk) -> miette::Result<()> {
	if message.author.bot || message.guild_id.is_some() {
		return Ok(());
	}

	let sender = sender_from_user(&message.author, None);
	let inbound = match message.attachments.iter().find(|attachment| is_image(attachment)) {
		Some(attachment) => Inbound::Image {
			url: attachment.url.clone(),
			caption: Some(message.content.clone()),
		},
		None => Inbound::Text(message.content.clone()),
	};
	let replies = desk.handle(&sender, inbound).await?;

	// Replies are sent one at a time so they arrive in order.
	for reply in replies.iter() {
		let components = button_rows(&reply.buttons);
		http_client
			.create_message(message.channel_id)
			.content(&reply.text)
			.components(&components)
			.await
			.into_diagnostic()?;
	}
	Ok(())
}

fn is_image(attachment: &Attachment) -> bool {
	attachment
		.content_type
		.as_deref()
		.is_some_and(|content_type| content_type.starts_with("image/"))
}
