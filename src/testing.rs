// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::card::Card;
use crate::notify::{ChatSurface, DeliveryError};
use crate::prompt::Prompt;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use twilight_model::id::Id;
use twilight_model::id::marker::{MessageMarker, UserMarker};

#[derive(Clone, Debug)]
pub enum Delivered {
	Posted { message: Id<MessageMarker>, card: Card },
	EditedText { message: Id<MessageMarker>, card: Card },
	EditedCaption { message: Id<MessageMarker>, card: Card },
	Direct { user: Id<UserMarker>, prompt: Prompt },
}

/// Records everything sent to it. Card edits and messages to particular users can be made to fail.
#[derive(Debug)]
pub struct RecordingSurface {
	deliveries: Mutex<Vec<Delivered>>,
	last_message_id: AtomicU64,
	fail_card_edits: AtomicBool,
	blocked_users: Mutex<HashSet<Id<UserMarker>>>,
}

impl Default for RecordingSurface {
	fn default() -> Self {
		Self {
			deliveries: Mutex::new(Vec::new()),
			last_message_id: AtomicU64::new(5000),
			fail_card_edits: AtomicBool::new(false),
			blocked_users: Mutex::new(HashSet::new()),
		}
	}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	match mutex.lock() {
		Ok(guard) => guard,
		Err(poisoned) => poisoned.into_inner(),
	}
}

impl RecordingSurface {
	pub fn fail_card_edits(&self) {
		self.fail_card_edits.store(true, Ordering::SeqCst);
	}

	pub fn block_user(&self, user: Id<UserMarker>) {
		lock(&self.blocked_users).insert(user);
	}

	pub fn deliveries(&self) -> Vec<Delivered> {
		lock(&self.deliveries).clone()
	}

	pub fn posted_cards(&self) -> Vec<(Id<MessageMarker>, Card)> {
		self.deliveries()
			.into_iter()
			.filter_map(|delivered| match delivered {
				Delivered::Posted { message, card } => Some((message, card)),
				_ => None,
			})
			.collect()
	}

	/// Card edits of either kind, in order
	pub fn edited_cards(&self) -> Vec<(Id<MessageMarker>, Card)> {
		self.deliveries()
			.into_iter()
			.filter_map(|delivered| match delivered {
				Delivered::EditedText { message, card } | Delivered::EditedCaption { message, card } => {
					Some((message, card))
				}
				_ => None,
			})
			.collect()
	}

	pub fn direct_messages(&self) -> Vec<(Id<UserMarker>, Prompt)> {
		self.deliveries()
			.into_iter()
			.filter_map(|delivered| match delivered {
				Delivered::Direct { user, prompt } => Some((user, prompt)),
				_ => None,
			})
			.collect()
	}

	fn record(&self, delivered: Delivered) {
		lock(&self.deliveries).push(delivered);
	}

	fn check_card_edit(&self) -> Result<(), DeliveryError> {
		if self.fail_card_edits.load(Ordering::SeqCst) {
			return Err(DeliveryError::new("Unknown Message"));
		}
		Ok(())
	}
}

#[async_trait]
impl ChatSurface for RecordingSurface {
	async fn post_card(&self, card: &Card) -> Result<Id<MessageMarker>, DeliveryError> {
		let message = Id::new(self.last_message_id.fetch_add(1, Ordering::SeqCst) + 1);
		self.record(Delivered::Posted {
			message,
			card: card.clone(),
		});
		Ok(message)
	}

	async fn edit_card_text(&self, message: Id<MessageMarker>, card: &Card) -> Result<(), DeliveryError> {
		self.check_card_edit()?;
		self.record(Delivered::EditedText {
			message,
			card: card.clone(),
		});
		Ok(())
	}

	async fn edit_card_caption(&self, message: Id<MessageMarker>, card: &Card) -> Result<(), DeliveryError> {
		self.check_card_edit()?;
		self.record(Delivered::EditedCaption {
			message,
			card: card.clone(),
		});
		Ok(())
	}

	async fn send_direct(&self, user: Id<UserMarker>, prompt: &Prompt) -> Result<(), DeliveryError> {
		if lock(&self.blocked_users).contains(&user) {
			return Err(DeliveryError::new("Cannot send messages to this user"));
		}
		self.record(Delivered::Direct {
			user,
			prompt: prompt.clone(),
		});
		Ok(())
	}
}
