// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tells everyone involved about a ticket transition.
//!
//! The transition is already committed when these functions run. Each recipient (the ticket card, the reporter, the
//! operator) gets its own independent delivery attempt; a failure is logged and never affects the ticket or the
//! other deliveries.

use crate::card::{self, Card};
use crate::feedback::rating_prompt;
use crate::model::{Operator, Ticket, database_id_from_discord_id, discord_id_from_database_id};
use crate::prompt::{Prompt, PromptButton};
use crate::store::{CreatedTicket, TicketStore};
use async_trait::async_trait;
use miette::Diagnostic;
use std::error::Error;
use std::fmt;
use twilight_mention::fmt::Mention;
use twilight_model::id::Id;
use twilight_model::id::marker::{MessageMarker, UserMarker};

/// The outbound side of the chat transport
#[async_trait]
pub trait ChatSurface: Send + Sync {
	/// Posts a new card in the ticket channel, as an image with a caption if the card has an image.
	async fn post_card(&self, card: &Card) -> Result<Id<MessageMarker>, DeliveryError>;

	/// Replaces the text and buttons of a card that was posted without an image.
	async fn edit_card_text(&self, message: Id<MessageMarker>, card: &Card) -> Result<(), DeliveryError>;

	/// Replaces the caption and buttons of a card that was posted with an image.
	async fn edit_card_caption(&self, message: Id<MessageMarker>, card: &Card) -> Result<(), DeliveryError>;

	/// Sends a direct message to a user.
	async fn send_direct(&self, user: Id<UserMarker>, prompt: &Prompt) -> Result<(), DeliveryError>;
}

// Deliveries fail for all sorts of transport reasons that callers only ever log, so the cause is kept boxed.
#[derive(Debug, Diagnostic)]
pub struct DeliveryError(pub Box<dyn Error + Send + Sync>);

impl DeliveryError {
	pub fn new(error: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
		Self(error.into())
	}
}

impl fmt::Display for DeliveryError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

impl Error for DeliveryError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		self.0.source()
	}
}

/// A URL that opens a conversation with the user
pub fn contact_url(user: Id<UserMarker>) -> String {
	format!("https://discord.com/users/{}", user.get())
}

/// Posts the new ticket's card and marks the tickets it replaced as superseded.
pub async fn announce_created(store: &dyn TicketStore, surface: &dyn ChatSurface, created: &CreatedTicket) {
	let ticket_id = created.ticket.id;
	let post_future = post_card(store, surface, &created.ticket);
	let superseded_future = async {
		for superseded in created.superseded.iter() {
			let result = refresh_card(store, surface, superseded).await;
			log_delivery("superseded card", superseded.id, result);
		}
	};
	let (post_result, _) = tokio::join!(post_future, superseded_future);
	log_delivery("new card", ticket_id, post_result);
}

/// Updates the card and sends the operator a way to reach the reporter.
pub async fn announce_claimed(store: &dyn TicketStore, surface: &dyn ChatSurface, ticket: &Ticket, operator: &Operator) {
	let operator_future = async {
		let reporter = match store.user(ticket.owner) {
			Ok(reporter) => reporter,
			Err(error) => return Err(DeliveryError::new(error)),
		};
		let reporter_name = match &reporter {
			Some(reporter) => format!("{} ({})", reporter.full_name, reporter.place),
			None => String::from("an unregistered user"),
		};
		let reporter_mention = ticket.get_owner().mention();
		let prompt = Prompt::text(format!(
			"You claimed ticket #{}.\nReported by {} {}:\n{}",
			ticket.id, reporter_name, reporter_mention, ticket.description
		))
		.with_button(PromptButton::link("Contact reporter", contact_url(ticket.get_owner())));
		surface.send_direct(operator_user(operator), &prompt).await
	};
	let (card_result, operator_result) = tokio::join!(refresh_card(store, surface, ticket), operator_future);
	log_delivery("card", ticket.id, card_result);
	log_delivery("operator", ticket.id, operator_result);
}

pub async fn announce_released(store: &dyn TicketStore, surface: &dyn ChatSurface, ticket: &Ticket, operator: &Operator) {
	let prompt = Prompt::text(format!(
		"You released ticket #{}. It's available for other operators again.",
		ticket.id
	));
	let (card_result, operator_result) = tokio::join!(
		refresh_card(store, surface, ticket),
		surface.send_direct(operator_user(operator), &prompt)
	);
	log_delivery("card", ticket.id, card_result);
	log_delivery("operator", ticket.id, operator_result);
}

/// Updates the card and lets the reporter know, asking them to rate how the ticket was handled.
pub async fn announce_closed(store: &dyn TicketStore, surface: &dyn ChatSurface, ticket: &Ticket) {
	let closed_by = ticket.assignee_name.as_deref().unwrap_or("an operator");
	let notice = format!(
		"Your ticket #{} has been closed by {}.\nHow would you rate the help you received?",
		ticket.id, closed_by
	);
	let prompt = rating_prompt(ticket, notice);
	let (card_result, reporter_result) = tokio::join!(
		refresh_card(store, surface, ticket),
		surface.send_direct(ticket.get_owner(), &prompt)
	);
	log_delivery("card", ticket.id, card_result);
	log_delivery("reporter", ticket.id, reporter_result);
}

/// Re-renders the ticket's card from stored data and edits it in place.
///
/// The ticket is read again from the store, so a notification that arrives after a later transition still shows the
/// latest state.
pub async fn refresh_card(store: &dyn TicketStore, surface: &dyn ChatSurface, ticket: &Ticket) -> Result<(), DeliveryError> {
	let ticket = store
		.ticket(ticket.id)
		.map_err(DeliveryError::new)?
		.ok_or_else(|| DeliveryError::new(format!("ticket #{} is no longer stored", ticket.id)))?;
	let Some(message) = ticket.get_card_message() else {
		return Err(DeliveryError::new(format!("ticket #{} has no card message", ticket.id)));
	};
	let card = current_card(store, &ticket)?;
	if card.has_image() {
		surface.edit_card_caption(message, &card).await
	} else {
		surface.edit_card_text(message, &card).await
	}
}

async fn post_card(store: &dyn TicketStore, surface: &dyn ChatSurface, ticket: &Ticket) -> Result<(), DeliveryError> {
	let card = current_card(store, ticket)?;
	let message = surface.post_card(&card).await?;
	store
		.set_card_message(ticket.id, database_id_from_discord_id(message.get()))
		.map_err(DeliveryError::new)
}

fn current_card(store: &dyn TicketStore, ticket: &Ticket) -> Result<Card, DeliveryError> {
	let owner = store.user(ticket.owner).map_err(DeliveryError::new)?;
	let feedback = store.feedback_for_ticket(ticket.id).map_err(DeliveryError::new)?;
	Ok(card::render(ticket, owner.as_ref(), &feedback))
}

fn operator_user(operator: &Operator) -> Id<UserMarker> {
	Id::new(discord_id_from_database_id(operator.id))
}

fn log_delivery(recipient: &str, ticket_id: i64, result: Result<(), DeliveryError>) {
	if let Err(error) = result {
		tracing::warn!(source = ?error, ticket = ticket_id, recipient, "Failed to deliver ticket notification");
	}
}
