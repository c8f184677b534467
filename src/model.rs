// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::schema::{feedback, tickets, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use twilight_model::id::Id;
use twilight_model::id::marker::{MessageMarker, UserMarker};

/// Where a ticket is in its lifecycle.
///
/// Tickets only move forward, except for the toggle between [Self::Active] and [Self::InProgress] caused by an
/// operator claiming or releasing the ticket.
#[derive(Clone, Copy, DbEnum, Debug, Eq, PartialEq)]
#[ExistingTypePath = "crate::schema::sql_types::TicketStatus"]
pub enum TicketStatus {
	Active,
	InProgress,
	Closed,
}

impl TicketStatus {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Active => "Active",
			Self::InProgress => "In progress",
			Self::Closed => "Closed",
		}
	}

	pub fn is_open(&self) -> bool {
		!matches!(self, Self::Closed)
	}
}

/// A registered end user. There's at most one record per user; registering again or editing the profile overwrites
/// it.
#[derive(Clone, Debug, Insertable, Queryable)]
#[diesel(table_name = users)]
pub struct User {
	/// The ID of the user.
	///
	/// To get a Discord-facing version of this more easily, use [Self::get_user_id].
	pub user_id: i64,
	/// The user's Discord username, if known
	pub handle: Option<String>,
	/// The name the user gave during registration
	pub full_name: String,
	/// Where the user sits in the office
	pub place: String,
	pub registered_at: DateTime<Utc>,
}

impl User {
	/// Gets the Discord-facing user ID.
	///
	/// For the raw database representation, use [Self::user_id].
	pub fn get_user_id(&self) -> Id<UserMarker> {
		Id::new(discord_id_from_database_id(self.user_id))
	}
}

/// The database representation of a ticket
#[derive(Clone, Debug, Queryable)]
pub struct Ticket {
	/// Ticket's ID, assigned by the database in increasing order
	pub id: i64,
	/// The ID of the user who reported the problem.
	///
	/// To get a Discord-facing version of this more easily, use [Self::get_owner].
	pub owner: i64,
	pub description: String,
	/// URL of the image the user attached to the report, if any
	pub image_url: Option<String>,
	pub status: TicketStatus,
	/// The ID of the operator working on (or, once closed, responsible for) the ticket.
	///
	/// To get a Discord-facing version of this more easily, use [Self::get_assignee].
	pub assignee: Option<i64>,
	/// Display name of the assignee at the time they took the ticket
	pub assignee_name: Option<String>,
	pub created_at: DateTime<Utc>,
	pub closed_at: Option<DateTime<Utc>>,
	/// If the ticket was closed because the same user opened a new one, the new ticket's ID
	pub superseded_by: Option<i64>,
	/// The ID of the message representing this ticket in the ticket channel.
	///
	/// To get a Discord-facing version of this more easily, use [Self::get_card_message].
	pub card_message: Option<i64>,
}

impl Ticket {
	/// Gets the user who reported the problem.
	///
	/// For the raw database representation, use [Self::owner].
	pub fn get_owner(&self) -> Id<UserMarker> {
		Id::new(discord_id_from_database_id(self.owner))
	}

	/// Gets the operator assigned to the ticket, if any.
	///
	/// For the raw database representation, use [Self::assignee].
	pub fn get_assignee(&self) -> Option<Id<UserMarker>> {
		self.assignee
			.and_then(|database_id| Id::new_checked(discord_id_from_database_id(database_id)))
	}

	/// Gets the message in the ticket channel that represents this ticket.
	///
	/// For the raw database representation, use [Self::card_message].
	pub fn get_card_message(&self) -> Option<Id<MessageMarker>> {
		self.card_message
			.and_then(|database_id| Id::new_checked(discord_id_from_database_id(database_id)))
	}
}

/// The data needed to open a ticket; everything else is filled in by the store
#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = tickets)]
pub struct NewTicket {
	pub owner: i64,
	pub description: String,
	pub image_url: Option<String>,
	pub status: TicketStatus,
	pub created_at: DateTime<Utc>,
}

impl NewTicket {
	pub fn new(owner: i64, description: String, image_url: Option<String>) -> Self {
		Self {
			owner,
			description,
			image_url,
			status: TicketStatus::Active,
			created_at: Utc::now(),
		}
	}
}

/// A rating and comment left by a user for one of their closed tickets
#[derive(Clone, Debug, Queryable)]
pub struct Feedback {
	pub id: i64,
	pub ticket: i64,
	pub rater: i64,
	/// Rating between 1 and 5
	pub rating: i16,
	pub comment: String,
	pub submitted_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = feedback)]
pub struct NewFeedback {
	pub ticket: i64,
	pub rater: i64,
	pub rating: i16,
	pub comment: String,
	pub submitted_at: DateTime<Utc>,
}

/// The operator acting on a ticket, as recorded in the ticket's assignee fields
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Operator {
	pub id: i64,
	pub name: String,
}

impl Operator {
	pub fn new(user_id: Id<UserMarker>, name: impl Into<String>) -> Self {
		Self {
			id: database_id_from_discord_id(user_id.get()),
			name: name.into(),
		}
	}
}

/// Converts an ID used with Discord (unsigned) to an ID for Postgres use (signed)
pub fn database_id_from_discord_id(discord_id: u64) -> i64 {
	discord_id as i64
}

/// Converts an ID retrieved from the database (signed) to an ID for use with Discord (unsigned)
pub fn discord_id_from_database_id(database_id: i64) -> u64 {
	database_id as u64
}
