// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The guided dialogues users go through in direct messages.
//!
//! Each user is at one [Step]; the step carries only the draft data collected so far for its flow. Finishing a flow
//! returns the collected data in an [Outcome] and drops the step, so nothing leaks into the next flow.

use crate::action::Action;
use crate::prompt::{Prompt, PromptButton};
use std::collections::HashMap;
use twilight_model::id::Id;
use twilight_model::id::marker::UserMarker;

pub mod menu;

/// Longest problem description accepted, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 1500;

const ASK_FULL_NAME: &str = "Welcome! Please enter your full name:";
const ASK_PLACE: &str = "Now enter where you sit in the office:";
const ASK_DESCRIPTION: &str = "Describe your problem:";
const DESCRIPTION_TOO_LONG: &str = "That description is too long. Please describe the problem in at most 1500 characters:";
const ASK_PHOTO: &str = "Would you like to attach a photo?";
const ASK_SEND_PHOTO: &str = "Send a photo of your problem.";
const EXPECTED_PHOTO: &str = "A photo is expected here. Send an image, or use a menu command to start over.";
const ASK_COMMENT: &str = "Thanks for the rating! Now write a short comment about how your problem was handled:";
const ASK_NEW_FULL_NAME: &str = "Enter your new full name:";
const ASK_NEW_PLACE: &str = "Enter your new place in the office:";

static IDLE: Step = Step::Idle;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Step {
	#[default]
	Idle,
	RegisterName,
	RegisterPlace {
		full_name: String,
	},
	TicketDescription,
	TicketAskPhoto {
		description: String,
	},
	TicketWaitingPhoto {
		description: String,
	},
	FeedbackComment {
		ticket_id: i64,
		rating: u8,
	},
	EditName,
	EditPlace {
		full_name: String,
	},
}

impl Step {
	/// The question asked to the user at this step
	pub fn prompt(&self) -> Option<Prompt> {
		let prompt = match self {
			Self::Idle => return None,
			Self::RegisterName => Prompt::text(ASK_FULL_NAME),
			Self::RegisterPlace { .. } => Prompt::text(ASK_PLACE),
			Self::TicketDescription => Prompt::text(ASK_DESCRIPTION),
			Self::TicketAskPhoto { .. } => Prompt::text(ASK_PHOTO)
				.with_button(PromptButton::action("Attach photo", Action::AddPhoto))
				.with_button(PromptButton::action("Skip", Action::SkipPhoto)),
			Self::TicketWaitingPhoto { .. } => Prompt::text(ASK_SEND_PHOTO),
			Self::FeedbackComment { .. } => Prompt::text(ASK_COMMENT),
			Self::EditName => Prompt::text(ASK_NEW_FULL_NAME),
			Self::EditPlace { .. } => Prompt::text(ASK_NEW_PLACE),
		};
		Some(prompt)
	}
}

/// What the conversation wants done after handling an event
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
	/// Ask the user something; the conversation continues
	Reply(Prompt),
	/// The user isn't in a flow and the input isn't a menu command
	NotUnderstood,
	/// The event needed draft data the user's session doesn't have. The session has been reset.
	SessionFault,
	Register { full_name: String, place: String },
	UpdateProfile { full_name: String, place: String },
	SubmitTicket { description: String, image_url: Option<String> },
	SubmitFeedback { ticket_id: i64, rating: u8, comment: String },
}

#[derive(Debug, Default)]
pub struct Conversations {
	steps: HashMap<Id<UserMarker>, Step>,
}

impl Conversations {
	pub fn step(&self, user: Id<UserMarker>) -> &Step {
		self.steps.get(&user).unwrap_or(&IDLE)
	}

	/// Moves the user to the given step, abandoning whatever they were doing, and returns the step's question.
	pub fn begin(&mut self, user: Id<UserMarker>, step: Step) -> Option<Prompt> {
		let prompt = step.prompt();
		if step == Step::Idle {
			self.steps.remove(&user);
		} else {
			self.steps.insert(user, step);
		}
		prompt
	}

	pub fn reset(&mut self, user: Id<UserMarker>) {
		self.steps.remove(&user);
	}

	pub fn on_text(&mut self, user: Id<UserMarker>, text: &str) -> Outcome {
		let step = self.steps.remove(&user).unwrap_or_default();
		let text = text.trim();

		if text.is_empty() {
			return self.stay(user, step);
		}
		let text = text.to_string();

		match step {
			Step::Idle => Outcome::NotUnderstood,
			Step::RegisterName => self.advance(user, Step::RegisterPlace { full_name: text }),
			Step::RegisterPlace { full_name } => Outcome::Register { full_name, place: text },
			Step::TicketDescription if text.chars().count() > MAX_DESCRIPTION_CHARS => {
				self.steps.insert(user, step);
				Outcome::Reply(Prompt::text(DESCRIPTION_TOO_LONG))
			}
			Step::TicketDescription => self.advance(user, Step::TicketAskPhoto { description: text }),
			Step::TicketAskPhoto { .. } => self.stay(user, step),
			Step::TicketWaitingPhoto { .. } => {
				self.steps.insert(user, step);
				Outcome::Reply(Prompt::text(EXPECTED_PHOTO))
			}
			Step::FeedbackComment { ticket_id, rating } => Outcome::SubmitFeedback {
				ticket_id,
				rating,
				comment: text,
			},
			Step::EditName => self.advance(user, Step::EditPlace { full_name: text }),
			Step::EditPlace { full_name } => Outcome::UpdateProfile { full_name, place: text },
		}
	}

	pub fn on_image(&mut self, user: Id<UserMarker>, image_url: &str) -> Outcome {
		let step = self.steps.remove(&user).unwrap_or_default();
		match step {
			Step::Idle => Outcome::NotUnderstood,
			Step::TicketWaitingPhoto { description } => Outcome::SubmitTicket {
				description,
				image_url: Some(image_url.to_string()),
			},
			step => self.stay(user, step),
		}
	}

	/// Handles the "attach photo" and "skip" buttons.
	pub fn on_photo_choice(&mut self, user: Id<UserMarker>, attach: bool) -> Outcome {
		let step = self.steps.remove(&user).unwrap_or_default();
		let Step::TicketAskPhoto { description } = step else {
			return Outcome::SessionFault;
		};
		if attach {
			self.advance(user, Step::TicketWaitingPhoto { description })
		} else {
			Outcome::SubmitTicket {
				description,
				image_url: None,
			}
		}
	}

	/// Records a rating chosen from the rating prompt and asks for the comment that completes the feedback.
	pub fn on_rating(&mut self, user: Id<UserMarker>, ticket_id: i64, rating: u8) -> Prompt {
		let step = Step::FeedbackComment { ticket_id, rating };
		let prompt = Prompt::text(ASK_COMMENT);
		self.steps.insert(user, step);
		prompt
	}

	fn advance(&mut self, user: Id<UserMarker>, next: Step) -> Outcome {
		match self.begin(user, next) {
			Some(prompt) => Outcome::Reply(prompt),
			None => Outcome::NotUnderstood,
		}
	}

	fn stay(&mut self, user: Id<UserMarker>, step: Step) -> Outcome {
		self.advance(user, step)
	}
}
