// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::action::Action;

/// A message for a user, with the buttons to attach to it
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Prompt {
	pub text: String,
	pub buttons: Vec<PromptButton>,
}

impl Prompt {
	pub fn text(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			buttons: Vec::new(),
		}
	}

	pub fn with_button(mut self, button: PromptButton) -> Self {
		self.buttons.push(button);
		self
	}
}

/// Cuts `text` down to at most `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max_chars: usize) -> String {
	if text.chars().count() <= max_chars {
		return text.to_string();
	}
	let mut truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
	truncated.push('…');
	truncated
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PromptButton {
	pub label: String,
	pub target: ButtonTarget,
}

impl PromptButton {
	pub fn action(label: impl Into<String>, action: Action) -> Self {
		Self {
			label: label.into(),
			target: ButtonTarget::Action(action),
		}
	}

	pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			target: ButtonTarget::Link(url.into()),
		}
	}
}

/// What pressing a button does
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ButtonTarget {
	/// Sends the action back to the bot
	Action(Action),
	/// Opens a URL on the user's side
	Link(String),
}
