// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::action::{Action, MAX_RATING};
use crate::model::{Feedback, NewFeedback, Ticket, TicketStatus};
use crate::notify::{self, ChatSurface};
use crate::prompt::{Prompt, PromptButton};
use crate::store::{StoreError, TicketStore};
use chrono::Utc;
use miette::Diagnostic;
use std::fmt;

#[derive(Debug, Diagnostic)]
pub enum FeedbackError {
	/// The ticket doesn't exist or belongs to someone else
	NotFound(i64),
	NotClosed(i64),
	Store(StoreError),
}

impl From<StoreError> for FeedbackError {
	fn from(error: StoreError) -> Self {
		Self::Store(error)
	}
}

impl std::error::Error for FeedbackError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Store(error) => Some(error),
			_ => None,
		}
	}
}

impl fmt::Display for FeedbackError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NotFound(ticket_id) => write!(f, "Ticket #{} was not found.", ticket_id),
			Self::NotClosed(ticket_id) => write!(f, "Ticket #{} can be rated once it's closed.", ticket_id),
			Self::Store(error) => write!(f, "{}", error),
		}
	}
}

pub fn stars(rating: i16) -> String {
	"★".repeat(rating.clamp(0, i16::from(MAX_RATING)) as usize)
}

/// The close notice sent to the reporter, with one button per rating
pub fn rating_prompt(ticket: &Ticket, notice: String) -> Prompt {
	let mut prompt = Prompt::text(notice);
	for rating in 1..=MAX_RATING {
		let action = Action::Rate {
			ticket_id: ticket.id,
			stars: rating,
		};
		prompt = prompt.with_button(PromptButton::action(stars(i16::from(rating)), action));
	}
	prompt
}

/// Checks that the user may rate the ticket.
pub fn check_rating(store: &dyn TicketStore, ticket_id: i64, rater: i64) -> Result<Ticket, FeedbackError> {
	let ticket = match store.ticket(ticket_id)? {
		Some(ticket) if ticket.owner == rater => ticket,
		_ => return Err(FeedbackError::NotFound(ticket_id)),
	};
	if ticket.status != TicketStatus::Closed {
		return Err(FeedbackError::NotClosed(ticket_id));
	}
	Ok(ticket)
}

/// Stores the rating and comment and shows them on the ticket's card.
pub async fn record(
	store: &dyn TicketStore,
	surface: &dyn ChatSurface,
	ticket_id: i64,
	rater: i64,
	rating: u8,
	comment: String,
) -> Result<Feedback, FeedbackError> {
	let ticket = check_rating(store, ticket_id, rater)?;
	let new_feedback = NewFeedback {
		ticket: ticket_id,
		rater,
		rating: i16::from(rating.clamp(1, MAX_RATING)),
		comment,
		submitted_at: Utc::now(),
	};
	let feedback = store.add_feedback(new_feedback)?;
	tracing::info!(ticket = ticket_id, rating = feedback.rating, "Feedback received");

	if let Err(error) = notify::refresh_card(store, surface, &ticket).await {
		tracing::warn!(source = ?error, ticket = ticket_id, "Failed to show feedback on the ticket card");
	}
	Ok(feedback)
}
