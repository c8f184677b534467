// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{CreatedTicket, StoreError, TicketStore};
use crate::database::DbPool;
use crate::model::{Feedback, NewFeedback, NewTicket, Operator, Ticket, TicketStatus, User};
use crate::schema::{feedback, tickets, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DbError;

/// Stores everything in Postgres through a connection pool.
///
/// Claim arbitration relies on single conditional `UPDATE` statements, and ticket creation locks the owner's user row
/// so that two tickets for the same user can't both end up open.
pub struct PgTicketStore {
	db_connection_pool: DbPool,
}

impl PgTicketStore {
	pub fn new(db_connection_pool: DbPool) -> Self {
		Self { db_connection_pool }
	}
}

impl TicketStore for PgTicketStore {
	fn user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
		let mut db_connection = self.db_connection_pool.get()?;
		let user: Option<User> = users::table.find(user_id).first(&mut db_connection).optional()?;
		Ok(user)
	}

	fn upsert_user(&self, user: &User) -> Result<User, StoreError> {
		let mut db_connection = self.db_connection_pool.get()?;
		let user: User = diesel::insert_into(users::table)
			.values(user)
			.on_conflict(users::user_id)
			.do_update()
			.set((
				users::handle.eq(&user.handle),
				users::full_name.eq(&user.full_name),
				users::place.eq(&user.place),
			))
			.get_result(&mut db_connection)?;
		Ok(user)
	}

	fn create_ticket(&self, new_ticket: NewTicket) -> Result<CreatedTicket, StoreError> {
		let mut db_connection = self.db_connection_pool.get()?;
		let created = db_connection.transaction(|db_connection| {
			// Concurrent creates for the same owner queue up here, so each one sees the ticket inserted before it.
			let _owner_lock: Option<i64> = users::table
				.find(new_ticket.owner)
				.select(users::user_id)
				.for_update()
				.first(db_connection)
				.optional()?;

			let ticket: Ticket = diesel::insert_into(tickets::table)
				.values(&new_ticket)
				.get_result(db_connection)?;

			let superseded: Vec<Ticket> = diesel::update(tickets::table)
				.filter(
					tickets::owner
						.eq(new_ticket.owner)
						.and(tickets::status.ne(TicketStatus::Closed))
						.and(tickets::id.ne(ticket.id)),
				)
				.set((
					tickets::status.eq(TicketStatus::Closed),
					tickets::closed_at.eq(Some(new_ticket.created_at)),
					tickets::superseded_by.eq(Some(ticket.id)),
				))
				.get_results(db_connection)?;

			Ok::<CreatedTicket, DbError>(CreatedTicket { ticket, superseded })
		})?;
		Ok(created)
	}

	fn ticket(&self, ticket_id: i64) -> Result<Option<Ticket>, StoreError> {
		let mut db_connection = self.db_connection_pool.get()?;
		let ticket: Option<Ticket> = tickets::table.find(ticket_id).first(&mut db_connection).optional()?;
		Ok(ticket)
	}

	fn tickets_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<Ticket>, StoreError> {
		let mut db_connection = self.db_connection_pool.get()?;
		let user_tickets: Vec<Ticket> = tickets::table
			.filter(tickets::owner.eq(user_id))
			.order(tickets::id.desc())
			.limit(limit)
			.load(&mut db_connection)?;
		Ok(user_tickets)
	}

	fn set_card_message(&self, ticket_id: i64, message_id: i64) -> Result<(), StoreError> {
		let mut db_connection = self.db_connection_pool.get()?;
		diesel::update(tickets::table)
			.filter(tickets::id.eq(ticket_id))
			.set(tickets::card_message.eq(Some(message_id)))
			.execute(&mut db_connection)?;
		Ok(())
	}

	fn assign_if_unclaimed(&self, ticket_id: i64, operator: &Operator) -> Result<Option<Ticket>, StoreError> {
		let mut db_connection = self.db_connection_pool.get()?;
		let ticket: Option<Ticket> = diesel::update(tickets::table)
			.filter(
				tickets::id
					.eq(ticket_id)
					.and(tickets::assignee.is_null())
					.and(tickets::status.eq(TicketStatus::Active)),
			)
			.set((
				tickets::status.eq(TicketStatus::InProgress),
				tickets::assignee.eq(Some(operator.id)),
				tickets::assignee_name.eq(Some(operator.name.as_str())),
			))
			.get_result(&mut db_connection)
			.optional()?;
		Ok(ticket)
	}

	fn unassign_if_claimant(&self, ticket_id: i64, operator_id: i64) -> Result<Option<Ticket>, StoreError> {
		let mut db_connection = self.db_connection_pool.get()?;
		let ticket: Option<Ticket> = diesel::update(tickets::table)
			.filter(
				tickets::id
					.eq(ticket_id)
					.and(tickets::assignee.eq(operator_id))
					.and(tickets::status.eq(TicketStatus::InProgress)),
			)
			.set((
				tickets::status.eq(TicketStatus::Active),
				tickets::assignee.eq(None::<i64>),
				tickets::assignee_name.eq(None::<String>),
			))
			.get_result(&mut db_connection)
			.optional()?;
		Ok(ticket)
	}

	fn close_if_open(
		&self,
		ticket_id: i64,
		operator: &Operator,
		closed_at: DateTime<Utc>,
	) -> Result<Option<Ticket>, StoreError> {
		let mut db_connection = self.db_connection_pool.get()?;
		let closed = db_connection.transaction(|db_connection| {
			let ticket: Option<Ticket> = tickets::table
				.find(ticket_id)
				.for_update()
				.first(db_connection)
				.optional()?;
			let Some(ticket) = ticket else {
				return Ok(None);
			};
			if ticket.status == TicketStatus::Closed {
				return Ok(None);
			}

			let (assignee, assignee_name) = match ticket.assignee {
				Some(assignee) => (assignee, ticket.assignee_name),
				None => (operator.id, Some(operator.name.clone())),
			};
			let ticket: Ticket = diesel::update(tickets::table)
				.filter(tickets::id.eq(ticket_id))
				.set((
					tickets::status.eq(TicketStatus::Closed),
					tickets::closed_at.eq(Some(closed_at)),
					tickets::assignee.eq(Some(assignee)),
					tickets::assignee_name.eq(assignee_name),
				))
				.get_result(db_connection)?;
			Ok::<Option<Ticket>, DbError>(Some(ticket))
		})?;
		Ok(closed)
	}

	fn add_feedback(&self, new_feedback: NewFeedback) -> Result<Feedback, StoreError> {
		let mut db_connection = self.db_connection_pool.get()?;
		let feedback: Feedback = diesel::insert_into(feedback::table)
			.values(&new_feedback)
			.get_result(&mut db_connection)?;
		Ok(feedback)
	}

	fn feedback_for_ticket(&self, ticket_id: i64) -> Result<Vec<Feedback>, StoreError> {
		let mut db_connection = self.db_connection_pool.get()?;
		let ticket_feedback: Vec<Feedback> = feedback::table
			.filter(feedback::ticket.eq(ticket_id))
			.order(feedback::id.asc())
			.load(&mut db_connection)?;
		Ok(ticket_feedback)
	}
}
