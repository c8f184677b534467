// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ticket state transitions.
//!
//! ```text
//! Active ──claim──▶ InProgress ──close──▶ Closed
//!   ▲                   │                   ▲
//!   └─────release───────┘                   │
//!   └──────────────────close────────────────┘
//! ```
//!
//! The store applies every transition as a conditional write. When the condition fails, the ticket is read back to
//! tell the operator why.

use crate::model::{NewTicket, Operator, Ticket, TicketStatus};
use crate::store::{CreatedTicket, StoreError, TicketStore};
use chrono::Utc;
use miette::Diagnostic;
use std::fmt;

#[derive(Debug, Diagnostic)]
pub enum LifecycleError {
	NotFound(i64),
	AlreadyClaimed { ticket_id: i64, assignee_name: Option<String> },
	NotClaimant(i64),
	AlreadyClosed(i64),
	Store(StoreError),
}

impl From<StoreError> for LifecycleError {
	fn from(error: StoreError) -> Self {
		Self::Store(error)
	}
}

impl std::error::Error for LifecycleError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Store(error) => Some(error),
			_ => None,
		}
	}
}

impl fmt::Display for LifecycleError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NotFound(ticket_id) => write!(f, "Ticket #{} was not found.", ticket_id),
			Self::AlreadyClaimed {
				ticket_id,
				assignee_name: Some(name),
			} => write!(f, "Ticket #{} has already been claimed by {}.", ticket_id, name),
			Self::AlreadyClaimed {
				ticket_id,
				assignee_name: None,
			} => write!(f, "Ticket #{} has already been claimed.", ticket_id),
			Self::NotClaimant(ticket_id) => write!(f, "Only the operator working on ticket #{} can release it.", ticket_id),
			Self::AlreadyClosed(ticket_id) => write!(f, "Ticket #{} is already closed.", ticket_id),
			Self::Store(error) => write!(f, "{}", error),
		}
	}
}

/// Opens a ticket for the user, closing any ticket the user still had open.
pub fn create(
	store: &dyn TicketStore,
	owner: i64,
	description: String,
	image_url: Option<String>,
) -> Result<CreatedTicket, LifecycleError> {
	let created = store.create_ticket(NewTicket::new(owner, description, image_url))?;
	tracing::info!(
		ticket = created.ticket.id,
		owner,
		superseded = created.superseded.len(),
		"Ticket created"
	);
	Ok(created)
}

/// Assigns an unclaimed ticket to the operator. When several operators claim the same ticket at once, exactly one of
/// them gets it and the others get [LifecycleError::AlreadyClaimed].
pub fn claim(store: &dyn TicketStore, ticket_id: i64, operator: &Operator) -> Result<Ticket, LifecycleError> {
	if let Some(ticket) = store.assign_if_unclaimed(ticket_id, operator)? {
		tracing::info!(ticket = ticket_id, operator = operator.id, "Ticket claimed");
		return Ok(ticket);
	}

	let ticket = current_ticket(store, ticket_id)?;
	match ticket.status {
		TicketStatus::Closed => Err(LifecycleError::AlreadyClosed(ticket_id)),
		_ => Err(LifecycleError::AlreadyClaimed {
			ticket_id,
			assignee_name: ticket.assignee_name,
		}),
	}
}

/// Gives a claimed ticket back to the pool. Only the operator who claimed it can do this.
pub fn release(store: &dyn TicketStore, ticket_id: i64, operator: &Operator) -> Result<Ticket, LifecycleError> {
	if let Some(ticket) = store.unassign_if_claimant(ticket_id, operator.id)? {
		tracing::info!(ticket = ticket_id, operator = operator.id, "Ticket released");
		return Ok(ticket);
	}

	let ticket = current_ticket(store, ticket_id)?;
	match ticket.status {
		TicketStatus::Closed => Err(LifecycleError::AlreadyClosed(ticket_id)),
		_ => Err(LifecycleError::NotClaimant(ticket_id)),
	}
}

/// Closes the ticket, whether or not it was claimed.
pub fn close(store: &dyn TicketStore, ticket_id: i64, operator: &Operator) -> Result<Ticket, LifecycleError> {
	if let Some(ticket) = store.close_if_open(ticket_id, operator, Utc::now())? {
		tracing::info!(ticket = ticket_id, operator = operator.id, "Ticket closed");
		return Ok(ticket);
	}

	current_ticket(store, ticket_id)?;
	Err(LifecycleError::AlreadyClosed(ticket_id))
}

fn current_ticket(store: &dyn TicketStore, ticket_id: i64) -> Result<Ticket, LifecycleError> {
	match store.ticket(ticket_id)? {
		Some(ticket) => Ok(ticket),
		None => Err(LifecycleError::NotFound(ticket_id)),
	}
}
