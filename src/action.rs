// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Button action tokens.
//!
//! Tokens have the form `<action>_<ticket ID>[_<argument>]`. The photo choice buttons are shown while the ticket is
//! still a draft, so they're sent without a ticket ID.

/// Highest rating a user can give
pub const MAX_RATING: u8 = 5;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
	AddPhoto,
	SkipPhoto,
	Assign(i64),
	Unassign(i64),
	Close(i64),
	Rate { ticket_id: i64, stars: u8 },
	Lookup(i64),
}

impl Action {
	pub fn parse(token: &str) -> Option<Self> {
		match token {
			"add_photo" => return Some(Self::AddPhoto),
			"skip_photo" => return Some(Self::SkipPhoto),
			_ => (),
		}

		let (action, arguments) = token.split_once('_')?;
		match action {
			"assign" => parse_ticket_id(arguments).map(Self::Assign),
			"unassign" => parse_ticket_id(arguments).map(Self::Unassign),
			"close" => parse_ticket_id(arguments).map(Self::Close),
			"ticket" => parse_ticket_id(arguments).map(Self::Lookup),
			"rate" => {
				let (ticket_id, stars) = arguments.split_once('_')?;
				let ticket_id = parse_ticket_id(ticket_id)?;
				let stars: u8 = stars.parse().ok()?;
				if !(1..=MAX_RATING).contains(&stars) {
					return None;
				}
				Some(Self::Rate { ticket_id, stars })
			}
			_ => None,
		}
	}

	pub fn token(&self) -> String {
		match self {
			Self::AddPhoto => String::from("add_photo"),
			Self::SkipPhoto => String::from("skip_photo"),
			Self::Assign(ticket_id) => format!("assign_{}", ticket_id),
			Self::Unassign(ticket_id) => format!("unassign_{}", ticket_id),
			Self::Close(ticket_id) => format!("close_{}", ticket_id),
			Self::Rate { ticket_id, stars } => format!("rate_{}_{}", ticket_id, stars),
			Self::Lookup(ticket_id) => format!("ticket_{}", ticket_id),
		}
	}
}

fn parse_ticket_id(id: &str) -> Option<i64> {
	let id: i64 = id.parse().ok()?;
	(id > 0).then_some(id)
}
