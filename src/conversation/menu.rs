// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::model::User;
use crate::prompt::Prompt;

/// A fixed menu entry. Menu commands are recognized at any step and abandon whatever flow the user was in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuCommand {
	Start,
	NewTicket,
	MyTickets,
	EditProfile,
	Help,
}

impl MenuCommand {
	pub fn all_commands() -> Vec<Self> {
		vec![
			Self::Start,
			Self::NewTicket,
			Self::MyTickets,
			Self::EditProfile,
			Self::Help,
		]
	}

	/// The text a user types in a direct message to use the command
	pub fn label(&self) -> &'static str {
		match self {
			Self::Start => "/start",
			Self::NewTicket => "New ticket",
			Self::MyTickets => "My tickets",
			Self::EditProfile => "Edit profile",
			Self::Help => "Help",
		}
	}

	/// The name of the slash command for the same menu entry
	pub fn command_name(&self) -> &'static str {
		match self {
			Self::Start => "start",
			Self::NewTicket => "ticket",
			Self::MyTickets => "tickets",
			Self::EditProfile => "profile",
			Self::Help => "help",
		}
	}

	pub fn description(&self) -> &'static str {
		match self {
			Self::Start => "Register or show the main menu",
			Self::NewTicket => "Report a problem",
			Self::MyTickets => "Show your recent tickets",
			Self::EditProfile => "Change your name or place",
			Self::Help => "Show what the bot can do",
		}
	}

	pub fn from_label(text: &str) -> Option<Self> {
		let text = text.trim();
		Self::all_commands()
			.into_iter()
			.find(|command| command.label().eq_ignore_ascii_case(text))
	}

	pub fn from_command_name(name: &str) -> Option<Self> {
		Self::all_commands()
			.into_iter()
			.find(|command| command.command_name() == name)
	}
}

/// The main menu, greeting the user by name if they're registered
pub fn main_menu(user: Option<&User>) -> Prompt {
	let mut text = match user {
		Some(user) => format!("Hello, {}! What would you like to do?\n", user.full_name),
		None => String::from("What would you like to do?\n"),
	};
	for command in MenuCommand::all_commands() {
		text.push_str(&format!("\n• **{}**: {}", command.label(), command.description()));
	}
	Prompt::text(text)
}
