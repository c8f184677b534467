// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Durable storage of users, tickets and feedback.
//!
//! Every ticket state change goes through one of the conditional operations on [TicketStore]. Each of them reports
//! `None` when its condition didn't hold, which is the ordinary outcome of losing a race with another operator and
//! not a failure of the store.

use crate::model::{Feedback, NewFeedback, NewTicket, Operator, Ticket, User};
use chrono::{DateTime, Utc};
use diesel::r2d2::PoolError;
use diesel::result::Error as DbError;
use miette::Diagnostic;
use std::fmt;

#[cfg(test)]
pub mod memory;
mod postgres;

pub use postgres::PgTicketStore;

/// The result of opening a ticket
#[derive(Clone, Debug)]
pub struct CreatedTicket {
	pub ticket: Ticket,
	/// The owner's tickets that were still open and have been closed in favor of the new one
	pub superseded: Vec<Ticket>,
}

pub trait TicketStore: Send + Sync {
	fn user(&self, user_id: i64) -> Result<Option<User>, StoreError>;

	/// Inserts the user, or replaces the profile fields of an existing record for the same user.
	fn upsert_user(&self, user: &User) -> Result<User, StoreError>;

	/// Inserts an active ticket and closes any other open ticket of the same owner in one atomic step.
	///
	/// Concurrent calls for the same owner are serialized, so the later call always closes the ticket inserted by
	/// the earlier one.
	fn create_ticket(&self, new_ticket: NewTicket) -> Result<CreatedTicket, StoreError>;

	fn ticket(&self, ticket_id: i64) -> Result<Option<Ticket>, StoreError>;

	/// Gets the most recent tickets of a user, newest first.
	fn tickets_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<Ticket>, StoreError>;

	fn set_card_message(&self, ticket_id: i64, message_id: i64) -> Result<(), StoreError>;

	/// Assigns the operator and moves the ticket to in progress, only if it's active and has no assignee.
	fn assign_if_unclaimed(&self, ticket_id: i64, operator: &Operator) -> Result<Option<Ticket>, StoreError>;

	/// Removes the assignee and moves the ticket back to active, only if the operator is the current assignee of an
	/// in-progress ticket.
	fn unassign_if_claimant(&self, ticket_id: i64, operator_id: i64) -> Result<Option<Ticket>, StoreError>;

	/// Closes the ticket if it isn't closed yet. If nobody is assigned, the closing operator becomes the assignee.
	fn close_if_open(
		&self,
		ticket_id: i64,
		operator: &Operator,
		closed_at: DateTime<Utc>,
	) -> Result<Option<Ticket>, StoreError>;

	fn add_feedback(&self, new_feedback: NewFeedback) -> Result<Feedback, StoreError>;

	/// Gets all feedback for a ticket in the order it was submitted.
	fn feedback_for_ticket(&self, ticket_id: i64) -> Result<Vec<Feedback>, StoreError>;
}

#[derive(Debug, Diagnostic)]
pub enum StoreError {
	Pool(PoolError),
	Query(DbError),
}

impl From<PoolError> for StoreError {
	fn from(error: PoolError) -> Self {
		Self::Pool(error)
	}
}

impl From<DbError> for StoreError {
	fn from(error: DbError) -> Self {
		Self::Query(error)
	}
}

impl std::error::Error for StoreError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Pool(error) => Some(error),
			Self::Query(error) => Some(error),
		}
	}
}

impl fmt::Display for StoreError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Pool(error) => write!(f, "database connection error: {}", error),
			Self::Query(error) => write!(f, "database error: {}", error),
		}
	}
}
