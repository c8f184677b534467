// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{CreatedTicket, StoreError, TicketStore};
use crate::model::{Feedback, NewFeedback, NewTicket, Operator, Ticket, TicketStatus, User};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// An in-process store with the same conditional semantics as the Postgres one. A single lock covers all tables,
/// which makes every operation atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
	tables: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
	users: HashMap<i64, User>,
	tickets: BTreeMap<i64, Ticket>,
	feedback: Vec<Feedback>,
	last_ticket_id: i64,
	last_feedback_id: i64,
}

impl MemoryStore {
	fn tables(&self) -> MutexGuard<'_, Tables> {
		match self.tables.lock() {
			Ok(tables) => tables,
			Err(poisoned) => poisoned.into_inner(),
		}
	}

	/// All tickets, in ID order
	pub fn all_tickets(&self) -> Vec<Ticket> {
		self.tables().tickets.values().cloned().collect()
	}
}

impl TicketStore for MemoryStore {
	fn user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
		Ok(self.tables().users.get(&user_id).cloned())
	}

	fn upsert_user(&self, user: &User) -> Result<User, StoreError> {
		let mut tables = self.tables();
		let stored = tables
			.users
			.entry(user.user_id)
			.and_modify(|existing| {
				existing.handle = user.handle.clone();
				existing.full_name = user.full_name.clone();
				existing.place = user.place.clone();
			})
			.or_insert_with(|| user.clone());
		Ok(stored.clone())
	}

	fn create_ticket(&self, new_ticket: NewTicket) -> Result<CreatedTicket, StoreError> {
		let mut tables = self.tables();
		tables.last_ticket_id += 1;
		let ticket = Ticket {
			id: tables.last_ticket_id,
			owner: new_ticket.owner,
			description: new_ticket.description,
			image_url: new_ticket.image_url,
			status: new_ticket.status,
			assignee: None,
			assignee_name: None,
			created_at: new_ticket.created_at,
			closed_at: None,
			superseded_by: None,
			card_message: None,
		};

		let mut superseded = Vec::new();
		for prior in tables.tickets.values_mut() {
			if prior.owner == ticket.owner && prior.status.is_open() {
				prior.status = TicketStatus::Closed;
				prior.closed_at = Some(ticket.created_at);
				prior.superseded_by = Some(ticket.id);
				superseded.push(prior.clone());
			}
		}
		tables.tickets.insert(ticket.id, ticket.clone());

		Ok(CreatedTicket { ticket, superseded })
	}

	fn ticket(&self, ticket_id: i64) -> Result<Option<Ticket>, StoreError> {
		Ok(self.tables().tickets.get(&ticket_id).cloned())
	}

	fn tickets_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<Ticket>, StoreError> {
		let tables = self.tables();
		let user_tickets = tables
			.tickets
			.values()
			.rev()
			.filter(|ticket| ticket.owner == user_id)
			.take(usize::try_from(limit).unwrap_or(0))
			.cloned()
			.collect();
		Ok(user_tickets)
	}

	fn set_card_message(&self, ticket_id: i64, message_id: i64) -> Result<(), StoreError> {
		if let Some(ticket) = self.tables().tickets.get_mut(&ticket_id) {
			ticket.card_message = Some(message_id);
		}
		Ok(())
	}

	fn assign_if_unclaimed(&self, ticket_id: i64, operator: &Operator) -> Result<Option<Ticket>, StoreError> {
		let mut tables = self.tables();
		let Some(ticket) = tables.tickets.get_mut(&ticket_id) else {
			return Ok(None);
		};
		if ticket.assignee.is_some() || ticket.status != TicketStatus::Active {
			return Ok(None);
		}
		ticket.status = TicketStatus::InProgress;
		ticket.assignee = Some(operator.id);
		ticket.assignee_name = Some(operator.name.clone());
		Ok(Some(ticket.clone()))
	}

	fn unassign_if_claimant(&self, ticket_id: i64, operator_id: i64) -> Result<Option<Ticket>, StoreError> {
		let mut tables = self.tables();
		let Some(ticket) = tables.tickets.get_mut(&ticket_id) else {
			return Ok(None);
		};
		if ticket.assignee != Some(operator_id) || ticket.status != TicketStatus::InProgress {
			return Ok(None);
		}
		ticket.status = TicketStatus::Active;
		ticket.assignee = None;
		ticket.assignee_name = None;
		Ok(Some(ticket.clone()))
	}

	fn close_if_open(
		&self,
		ticket_id: i64,
		operator: &Operator,
		closed_at: DateTime<Utc>,
	) -> Result<Option<Ticket>, StoreError> {
		let mut tables = self.tables();
		let Some(ticket) = tables.tickets.get_mut(&ticket_id) else {
			return Ok(None);
		};
		if ticket.status == TicketStatus::Closed {
			return Ok(None);
		}
		ticket.status = TicketStatus::Closed;
		ticket.closed_at = Some(closed_at);
		if ticket.assignee.is_none() {
			ticket.assignee = Some(operator.id);
			ticket.assignee_name = Some(operator.name.clone());
		}
		Ok(Some(ticket.clone()))
	}

	fn add_feedback(&self, new_feedback: NewFeedback) -> Result<Feedback, StoreError> {
		let mut tables = self.tables();
		tables.last_feedback_id += 1;
		let feedback = Feedback {
			id: tables.last_feedback_id,
			ticket: new_feedback.ticket,
			rater: new_feedback.rater,
			rating: new_feedback.rating,
			comment: new_feedback.comment,
			submitted_at: new_feedback.submitted_at,
		};
		tables.feedback.push(feedback.clone());
		Ok(feedback)
	}

	fn feedback_for_ticket(&self, ticket_id: i64) -> Result<Vec<Feedback>, StoreError> {
		let tables = self.tables();
		let ticket_feedback = tables
			.feedback
			.iter()
			.filter(|feedback| feedback.ticket == ticket_id)
			.cloned()
			.collect();
		Ok(ticket_feedback)
	}
}
