// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The message that represents a ticket in the ticket channel.
//!
//! Cards are always rendered from the stored ticket, its owner and its feedback, so a card can be re-rendered after
//! any change and edited in place.

use crate::action::Action;
use crate::feedback::stars;
use crate::model::{Feedback, Ticket, TicketStatus, User};
use crate::conversation::MAX_DESCRIPTION_CHARS;
use crate::prompt::{PromptButton, truncate};

/// Discord's limit for message content, which is also well under the limit for embed descriptions
pub const MAX_CARD_CHARS: usize = 2000;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Card {
	pub text: String,
	/// When set, the card is posted as an image with the text as its caption
	pub image_url: Option<String>,
	pub buttons: Vec<PromptButton>,
}

impl Card {
	pub fn has_image(&self) -> bool {
		self.image_url.is_some()
	}
}

pub fn render(ticket: &Ticket, owner: Option<&User>, feedback: &[Feedback]) -> Card {
	let heading = match ticket.status {
		TicketStatus::Active => "🆕",
		TicketStatus::InProgress => "🛠️",
		TicketStatus::Closed => "✅",
	};
	let mut text = format!("{} Ticket #{}\n", heading, ticket.id);
	match owner {
		Some(owner) => text.push_str(&format!("👤 {}\n🏢 {}\n", owner.full_name, owner.place)),
		None => text.push_str("👤 Unregistered user\n"),
	}
	text.push_str(&format!("💬 {}\n", truncate(&ticket.description, MAX_DESCRIPTION_CHARS)));
	text.push_str(&format!("Status: {}", ticket.status.name()));

	let assignee = ticket.assignee_name.as_deref().unwrap_or("an operator");
	match (ticket.status, ticket.superseded_by) {
		(TicketStatus::Closed, Some(new_ticket)) => {
			text.push_str(&format!("\nAuto-closed, superseded by ticket #{}", new_ticket))
		}
		(TicketStatus::Closed, None) => text.push_str(&format!("\nClosed by {}", assignee)),
		(TicketStatus::InProgress, _) => text.push_str(&format!("\nClaimed by {}", assignee)),
		(TicketStatus::Active, _) => (),
	}

	for entry in feedback {
		text.push_str(&format!("\n{} — {}", stars(entry.rating), entry.comment));
	}

	let buttons = match ticket.status {
		TicketStatus::Active => vec![
			PromptButton::action("Claim", Action::Assign(ticket.id)),
			PromptButton::action("Close", Action::Close(ticket.id)),
		],
		TicketStatus::InProgress => vec![
			PromptButton::action("Release", Action::Unassign(ticket.id)),
			PromptButton::action("Close", Action::Close(ticket.id)),
		],
		TicketStatus::Closed => Vec::new(),
	};

	Card {
		text: truncate(&text, MAX_CARD_CHARS),
		image_url: ticket.image_url.clone(),
		buttons,
	}
}
