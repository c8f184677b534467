// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Routes one inbound event through the conversation, the ticket lifecycle and the notifications.
//!
//! The returned prompts are the replies to the user who caused the event; everything that goes to other people is
//! sent through the [ChatSurface] directly.

use crate::action::Action;
use crate::conversation::menu::{MenuCommand, main_menu};
use crate::conversation::{Conversations, MAX_DESCRIPTION_CHARS, Outcome, Step};
use crate::feedback::{self, FeedbackError};
use crate::lifecycle::{self, LifecycleError};
use crate::model::{Operator, Ticket, User, database_id_from_discord_id};
use crate::notify::{self, ChatSurface};
use crate::prompt::{Prompt, PromptButton, truncate};
use crate::store::TicketStore;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use twilight_model::id::Id;
use twilight_model::id::marker::UserMarker;
use type_map::concurrent::TypeMap;

const NOT_UNDERSTOOD: &str = "Sorry, I didn't understand that. Use one of the menu commands below.";
const SESSION_RESET: &str = "That action doesn't match what we were doing, so let's start over.";
const REGISTER_FIRST: &str = "Before you can do that, please register.";
const RECENT_TICKET_COUNT: i64 = 10;
const LISTED_DESCRIPTION_CHARS: usize = 100;

/// The user an event came from
#[derive(Clone, Debug)]
pub struct Sender {
	pub id: Id<UserMarker>,
	/// Username on the transport
	pub handle: Option<String>,
	/// The name to show to others, used when the sender acts as an operator
	pub display_name: String,
}

impl Sender {
	fn database_id(&self) -> i64 {
		database_id_from_discord_id(self.id.get())
	}

	fn as_operator(&self) -> Operator {
		Operator::new(self.id, self.display_name.clone())
	}
}

#[derive(Clone, Debug)]
pub enum Inbound {
	Text(String),
	/// An image, by URL, with the text sent along with it. The text is used instead of the image unless a photo is
	/// expected.
	Image { url: String, caption: Option<String> },
	/// A button press, with the button's action token
	Button(String),
	Menu(MenuCommand),
}

pub struct Desk {
	store: Arc<dyn TicketStore>,
	surface: Arc<dyn ChatSurface>,
	bot_state: Arc<RwLock<TypeMap>>,
}

impl Desk {
	pub fn new(store: Arc<dyn TicketStore>, surface: Arc<dyn ChatSurface>, bot_state: Arc<RwLock<TypeMap>>) -> Self {
		Self {
			store,
			surface,
			bot_state,
		}
	}

	pub async fn handle(&self, sender: &Sender, inbound: Inbound) -> miette::Result<Vec<Prompt>> {
		match inbound {
			Inbound::Text(text) => self.handle_text(sender, &text).await,
			Inbound::Image { url, caption } => {
				let waiting_for_photo = self
					.with_conversations(|states| matches!(states.step(sender.id), Step::TicketWaitingPhoto { .. }))
					.await;
				match caption.filter(|caption| !caption.trim().is_empty()) {
					Some(caption) if !waiting_for_photo => self.handle_text(sender, &caption).await,
					_ => {
						let outcome = self.with_conversations(|states| states.on_image(sender.id, &url)).await;
						self.apply_outcome(sender, outcome).await
					}
				}
			}
			Inbound::Button(token) => self.handle_button(sender, &token).await,
			Inbound::Menu(command) => self.handle_menu(sender, command).await,
		}
	}

	async fn handle_text(&self, sender: &Sender, text: &str) -> miette::Result<Vec<Prompt>> {
		match MenuCommand::from_label(text) {
			Some(command) => self.handle_menu(sender, command).await,
			None => {
				let outcome = self.with_conversations(|states| states.on_text(sender.id, text)).await;
				self.apply_outcome(sender, outcome).await
			}
		}
	}

	async fn with_conversations<T>(&self, f: impl FnOnce(&mut Conversations) -> T) -> T {
		let mut state = self.bot_state.write().await;
		let conversations = state.entry::<Conversations>().or_insert_with(Conversations::default);
		f(conversations)
	}

	async fn begin(&self, sender: &Sender, step: Step) -> Option<Prompt> {
		self.with_conversations(|states| states.begin(sender.id, step)).await
	}

	async fn handle_menu(&self, sender: &Sender, command: MenuCommand) -> miette::Result<Vec<Prompt>> {
		self.with_conversations(|states| states.reset(sender.id)).await;
		let user = self.store.user(sender.database_id())?;

		let Some(user) = user else {
			if command == MenuCommand::Help {
				return Ok(vec![main_menu(None)]);
			}
			let mut replies = Vec::new();
			if command != MenuCommand::Start {
				replies.push(Prompt::text(REGISTER_FIRST));
			}
			replies.extend(self.begin(sender, Step::RegisterName).await);
			return Ok(replies);
		};

		let replies = match command {
			MenuCommand::Start | MenuCommand::Help => vec![main_menu(Some(&user))],
			MenuCommand::NewTicket => self.begin(sender, Step::TicketDescription).await.into_iter().collect(),
			MenuCommand::EditProfile => self.begin(sender, Step::EditName).await.into_iter().collect(),
			MenuCommand::MyTickets => vec![self.ticket_list(&user)?],
		};
		Ok(replies)
	}

	fn ticket_list(&self, user: &User) -> miette::Result<Prompt> {
		let tickets = self.store.tickets_for_user(user.user_id, RECENT_TICKET_COUNT)?;
		if tickets.is_empty() {
			return Ok(Prompt::text("You haven't reported any problems yet."));
		}
		let mut prompt = Prompt::text("Your recent tickets:");
		for ticket in tickets.iter() {
			prompt.text.push_str(&format!(
				"\n#{} ({}): {}",
				ticket.id,
				ticket.status.name(),
				truncate(&ticket.description, LISTED_DESCRIPTION_CHARS)
			));
			prompt = prompt.with_button(PromptButton::action(format!("#{}", ticket.id), Action::Lookup(ticket.id)));
		}
		Ok(prompt)
	}

	async fn apply_outcome(&self, sender: &Sender, outcome: Outcome) -> miette::Result<Vec<Prompt>> {
		let replies = match outcome {
			Outcome::Reply(prompt) => vec![prompt],
			Outcome::NotUnderstood => {
				let user = self.store.user(sender.database_id())?;
				vec![Prompt::text(NOT_UNDERSTOOD), main_menu(user.as_ref())]
			}
			Outcome::SessionFault => self.session_fault(sender).await?,
			Outcome::Register { full_name, place } => {
				let user = self.save_profile(sender, full_name, place)?;
				vec![Prompt::text("Registration complete ✅"), main_menu(Some(&user))]
			}
			Outcome::UpdateProfile { full_name, place } => {
				let user = self.save_profile(sender, full_name, place)?;
				vec![Prompt::text("Your profile has been updated ✅"), main_menu(Some(&user))]
			}
			Outcome::SubmitTicket { description, image_url } => {
				self.submit_ticket(sender, description, image_url).await?
			}
			Outcome::SubmitFeedback {
				ticket_id,
				rating,
				comment,
			} => {
				let result = feedback::record(
					self.store.as_ref(),
					self.surface.as_ref(),
					ticket_id,
					sender.database_id(),
					rating,
					comment,
				)
				.await;
				match result {
					Ok(_) => vec![Prompt::text("Thank you for your feedback!")],
					Err(FeedbackError::Store(error)) => return Err(error.into()),
					Err(error) => vec![Prompt::text(error.to_string())],
				}
			}
		};
		Ok(replies)
	}

	async fn session_fault(&self, sender: &Sender) -> miette::Result<Vec<Prompt>> {
		tracing::debug!(user = sender.id.get(), "Resetting conversation after an unexpected action");
		self.with_conversations(|states| states.reset(sender.id)).await;
		let user = self.store.user(sender.database_id())?;
		Ok(vec![Prompt::text(SESSION_RESET), main_menu(user.as_ref())])
	}

	fn save_profile(&self, sender: &Sender, full_name: String, place: String) -> miette::Result<User> {
		let registered_at = self
			.store
			.user(sender.database_id())?
			.map(|user| user.registered_at)
			.unwrap_or_else(Utc::now);
		let user = User {
			user_id: sender.database_id(),
			handle: sender.handle.clone(),
			full_name,
			place,
			registered_at,
		};
		Ok(self.store.upsert_user(&user)?)
	}

	async fn submit_ticket(
		&self,
		sender: &Sender,
		description: String,
		image_url: Option<String>,
	) -> miette::Result<Vec<Prompt>> {
		let created = lifecycle::create(self.store.as_ref(), sender.database_id(), description, image_url)?;
		notify::announce_created(self.store.as_ref(), self.surface.as_ref(), &created).await;

		let mut replies = Vec::new();
		for superseded in created.superseded.iter() {
			replies.push(Prompt::text(format!(
				"Your previous ticket #{} was closed because you opened a new one.",
				superseded.id
			)));
		}
		replies.push(Prompt::text(format!(
			"Ticket #{} has been sent to the support team ✅",
			created.ticket.id
		)));
		Ok(replies)
	}

	async fn handle_button(&self, sender: &Sender, token: &str) -> miette::Result<Vec<Prompt>> {
		let Some(action) = Action::parse(token) else {
			tracing::debug!(token, "Unrecognized button action");
			return self.session_fault(sender).await;
		};

		match action {
			Action::AddPhoto | Action::SkipPhoto => {
				let attach = action == Action::AddPhoto;
				let outcome = self
					.with_conversations(|states| states.on_photo_choice(sender.id, attach))
					.await;
				self.apply_outcome(sender, outcome).await
			}
			Action::Assign(ticket_id) => {
				let operator = sender.as_operator();
				let claimed = lifecycle::claim(self.store.as_ref(), ticket_id, &operator);
				self.after_transition(claimed, |ticket| async move {
					notify::announce_claimed(self.store.as_ref(), self.surface.as_ref(), &ticket, &operator).await;
					format!("You claimed ticket #{}.", ticket.id)
				})
				.await
			}
			Action::Unassign(ticket_id) => {
				let operator = sender.as_operator();
				let released = lifecycle::release(self.store.as_ref(), ticket_id, &operator);
				self.after_transition(released, |ticket| async move {
					notify::announce_released(self.store.as_ref(), self.surface.as_ref(), &ticket, &operator).await;
					format!("You released ticket #{}.", ticket.id)
				})
				.await
			}
			Action::Close(ticket_id) => {
				let operator = sender.as_operator();
				let closed = lifecycle::close(self.store.as_ref(), ticket_id, &operator);
				self.after_transition(closed, |ticket| async move {
					notify::announce_closed(self.store.as_ref(), self.surface.as_ref(), &ticket).await;
					format!("You closed ticket #{}.", ticket.id)
				})
				.await
			}
			Action::Rate { ticket_id, stars } => {
				match feedback::check_rating(self.store.as_ref(), ticket_id, sender.database_id()) {
					Ok(_) => {
						let prompt = self
							.with_conversations(|states| states.on_rating(sender.id, ticket_id, stars))
							.await;
						Ok(vec![prompt])
					}
					Err(FeedbackError::Store(error)) => Err(error.into()),
					Err(error) => {
						self.with_conversations(|states| states.reset(sender.id)).await;
						Ok(vec![Prompt::text(error.to_string())])
					}
				}
			}
			Action::Lookup(ticket_id) => {
				let ticket = self
					.store
					.ticket(ticket_id)?
					.filter(|ticket| ticket.owner == sender.database_id());
				let reply = match ticket {
					Some(ticket) => ticket_details(&ticket),
					None => Prompt::text(LifecycleError::NotFound(ticket_id).to_string()),
				};
				Ok(vec![reply])
			}
		}
	}

	/// Runs the notifications for a successful transition, or turns a rejected one into a reply for the operator.
	async fn after_transition<F, Fut>(
		&self,
		result: Result<Ticket, LifecycleError>,
		on_success: F,
	) -> miette::Result<Vec<Prompt>>
	where
		F: FnOnce(Ticket) -> Fut,
		Fut: Future<Output = String>,
	{
		match result {
			Ok(ticket) => {
				let confirmation = on_success(ticket).await;
				Ok(vec![Prompt::text(confirmation)])
			}
			Err(LifecycleError::Store(error)) => Err(error.into()),
			Err(error) => Ok(vec![Prompt::text(error.to_string())]),
		}
	}
}

fn ticket_details(ticket: &Ticket) -> Prompt {
	let mut text = format!(
		"Ticket #{}\nStatus: {}\nOpened: {}\n{}",
		ticket.id,
		ticket.status.name(),
		ticket.created_at.format("%Y-%m-%d %H:%M UTC"),
		truncate(&ticket.description, MAX_DESCRIPTION_CHARS)
	);
	if let Some(assignee) = &ticket.assignee_name {
		text.push_str(&format!("\nHandled by {}", assignee));
	}
	Prompt::text(text)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::TicketStatus;
	use crate::store::memory::MemoryStore;
	use crate::testing::RecordingSurface;

	struct Harness {
		store: Arc<MemoryStore>,
		surface: Arc<RecordingSurface>,
		desk: Desk,
	}

	impl Harness {
		fn new() -> Self {
			let store = Arc::new(MemoryStore::default());
			let surface = Arc::new(RecordingSurface::default());
			let desk = Desk::new(
				Arc::clone(&store) as Arc<dyn TicketStore>,
				Arc::clone(&surface) as Arc<dyn ChatSurface>,
				Arc::new(RwLock::new(TypeMap::new())),
			);
			Self { store, surface, desk }
		}

		async fn send(&self, sender: &Sender, inbound: Inbound) -> Vec<Prompt> {
			self.desk.handle(sender, inbound).await.unwrap()
		}

		async fn text(&self, sender: &Sender, text: &str) -> Vec<Prompt> {
			self.send(sender, Inbound::Text(text.to_string())).await
		}

		async fn press(&self, sender: &Sender, action: Action) -> Vec<Prompt> {
			self.send(sender, Inbound::Button(action.token())).await
		}

		async fn register(&self, sender: &Sender, name: &str, place: &str) {
			self.text(sender, "/start").await;
			self.text(sender, name).await;
			self.text(sender, place).await;
		}

		async fn submit(&self, sender: &Sender, description: &str) -> Vec<Prompt> {
			self.text(sender, "New ticket").await;
			self.text(sender, description).await;
			self.press(sender, Action::SkipPhoto).await
		}

		fn ticket(&self, ticket_id: i64) -> Ticket {
			self.store.ticket(ticket_id).unwrap().unwrap()
		}
	}

	fn sender(id: u64, name: &str) -> Sender {
		Sender {
			id: Id::new(id),
			handle: Some(name.to_lowercase()),
			display_name: name.to_string(),
		}
	}

	#[tokio::test]
	async fn full_ticket_lifecycle() {
		let harness = Harness::new();
		let reporter = sender(100, "A");
		let operator_x = sender(10, "X");
		let operator_y = sender(20, "Y");

		harness.register(&reporter, "Ada Lovelace", "Room 4").await;
		let replies = harness.submit(&reporter, "printer broken").await;
		assert_eq!(replies, vec![Prompt::text("Ticket #1 has been sent to the support team ✅")]);

		let ticket = harness.ticket(1);
		assert_eq!(ticket.status, TicketStatus::Active);
		assert_eq!(ticket.assignee, None);
		let posted = harness.surface.posted_cards();
		assert_eq!(posted.len(), 1);
		assert!(posted[0].1.text.contains("printer broken"));
		assert_eq!(posted[0].1.buttons.len(), 2);

		let replies = harness.press(&operator_x, Action::Assign(1)).await;
		assert_eq!(replies, vec![Prompt::text("You claimed ticket #1.")]);
		let ticket = harness.ticket(1);
		assert_eq!(ticket.status, TicketStatus::InProgress);
		assert_eq!(ticket.assignee, Some(10));
		assert!(harness.surface.edited_cards().last().unwrap().1.text.contains("Claimed by X"));
		let (recipient, link) = harness.surface.direct_messages().pop().unwrap();
		assert_eq!(recipient, Id::new(10));
		assert_eq!(link.buttons, vec![PromptButton::link("Contact reporter", "https://discord.com/users/100")]);

		let replies = harness.press(&operator_y, Action::Assign(1)).await;
		assert_eq!(replies, vec![Prompt::text("Ticket #1 has already been claimed by X.")]);
		assert_eq!(harness.ticket(1).assignee, Some(10));

		harness.press(&operator_x, Action::Close(1)).await;
		assert_eq!(harness.ticket(1).status, TicketStatus::Closed);
		let (recipient, notice) = harness.surface.direct_messages().pop().unwrap();
		assert_eq!(recipient, Id::new(100));
		assert_eq!(notice.buttons.len(), 5);

		let replies = harness.press(&reporter, Action::Rate { ticket_id: 1, stars: 4 }).await;
		assert_eq!(replies.len(), 1);
		let replies = harness.text(&reporter, "fixed quickly").await;
		assert_eq!(replies, vec![Prompt::text("Thank you for your feedback!")]);

		let feedback = harness.store.feedback_for_ticket(1).unwrap();
		assert_eq!(feedback.len(), 1);
		assert_eq!(feedback[0].rating, 4);
		assert_eq!(feedback[0].comment, "fixed quickly");
		let card = harness.surface.edited_cards().pop().unwrap().1;
		assert!(card.text.ends_with("★★★★ — fixed quickly"));
	}

	#[tokio::test]
	async fn second_ticket_supersedes_the_first() {
		let harness = Harness::new();
		let reporter = sender(100, "A");
		harness.register(&reporter, "Ada Lovelace", "Room 4").await;
		harness.submit(&reporter, "printer broken").await;

		let replies = harness.submit(&reporter, "network down").await;
		assert_eq!(
			replies,
			vec![
				Prompt::text("Your previous ticket #1 was closed because you opened a new one."),
				Prompt::text("Ticket #2 has been sent to the support team ✅"),
			]
		);

		let first = harness.ticket(1);
		assert_eq!(first.status, TicketStatus::Closed);
		assert_eq!(first.superseded_by, Some(2));
		assert_eq!(harness.ticket(2).status, TicketStatus::Active);

		let superseded_card = harness.surface.edited_cards().pop().unwrap().1;
		assert!(superseded_card.text.contains("Auto-closed, superseded by ticket #2"));
		// The reporter isn't asked to rate a ticket they replaced themselves.
		assert!(harness.surface.direct_messages().is_empty());
	}

	#[tokio::test]
	async fn ticket_with_photo() {
		let harness = Harness::new();
		let reporter = sender(100, "A");
		harness.register(&reporter, "Ada Lovelace", "Room 4").await;
		harness.text(&reporter, "New ticket").await;
		harness.text(&reporter, "monitor flickers").await;
		harness.press(&reporter, Action::AddPhoto).await;

		let replies = harness.text(&reporter, "it's on the second floor").await;
		assert_eq!(replies.len(), 1);
		assert!(harness.store.all_tickets().is_empty());

		harness
			.send(
				&reporter,
				Inbound::Image {
					url: String::from("https://cdn/monitor.jpg"),
					caption: Some(String::from("here it is")),
				},
			)
			.await;
		let ticket = harness.ticket(1);
		assert_eq!(ticket.image_url.as_deref(), Some("https://cdn/monitor.jpg"));
		assert!(harness.surface.posted_cards()[0].1.has_image());
	}

	#[tokio::test]
	async fn unregistered_user_is_sent_to_registration() {
		let harness = Harness::new();
		let reporter = sender(100, "A");
		let replies = harness.text(&reporter, "New ticket").await;
		assert_eq!(replies[0], Prompt::text(REGISTER_FIRST));
		assert_eq!(replies.len(), 2);

		harness.text(&reporter, "Ada Lovelace").await;
		let replies = harness.text(&reporter, "Room 4").await;
		assert_eq!(replies[0], Prompt::text("Registration complete ✅"));
		let user = harness.store.user(100).unwrap().unwrap();
		assert_eq!(user.full_name, "Ada Lovelace");
		assert_eq!(user.handle.as_deref(), Some("a"));
	}

	#[tokio::test]
	async fn edit_profile_overwrites_the_record() {
		let harness = Harness::new();
		let reporter = sender(100, "A");
		harness.register(&reporter, "Ada Lovelace", "Room 4").await;
		let registered_at = harness.store.user(100).unwrap().unwrap().registered_at;

		harness.text(&reporter, "Edit profile").await;
		harness.text(&reporter, "Ada King").await;
		let replies = harness.text(&reporter, "Room 7").await;
		assert_eq!(replies[0], Prompt::text("Your profile has been updated ✅"));

		let user = harness.store.user(100).unwrap().unwrap();
		assert_eq!(user.full_name, "Ada King");
		assert_eq!(user.place, "Room 7");
		assert_eq!(user.registered_at, registered_at);
	}

	#[tokio::test]
	async fn menu_command_abandons_the_draft() {
		let harness = Harness::new();
		let reporter = sender(100, "A");
		harness.register(&reporter, "Ada Lovelace", "Room 4").await;
		harness.text(&reporter, "New ticket").await;
		harness.text(&reporter, "printer broken").await;
		harness.send(&reporter, Inbound::Menu(MenuCommand::Help)).await;

		let replies = harness.press(&reporter, Action::SkipPhoto).await;
		assert_eq!(replies[0], Prompt::text(SESSION_RESET));
		assert!(harness.store.all_tickets().is_empty());
	}

	#[tokio::test]
	async fn free_text_while_idle_reprints_the_menu() {
		let harness = Harness::new();
		let reporter = sender(100, "A");
		harness.register(&reporter, "Ada Lovelace", "Room 4").await;
		let replies = harness.text(&reporter, "is anyone there?").await;
		assert_eq!(replies[0], Prompt::text(NOT_UNDERSTOOD));
		assert!(replies[1].text.starts_with("Hello, Ada Lovelace!"));
	}

	#[tokio::test]
	async fn rating_an_open_ticket_is_rejected() {
		let harness = Harness::new();
		let reporter = sender(100, "A");
		harness.register(&reporter, "Ada Lovelace", "Room 4").await;
		harness.submit(&reporter, "printer broken").await;

		let replies = harness.press(&reporter, Action::Rate { ticket_id: 1, stars: 5 }).await;
		assert_eq!(replies, vec![Prompt::text("Ticket #1 can be rated once it's closed.")]);
		let replies = harness.text(&reporter, "great").await;
		assert_eq!(replies[0], Prompt::text(NOT_UNDERSTOOD));
		assert!(harness.store.feedback_for_ticket(1).unwrap().is_empty());
	}

	#[tokio::test]
	async fn operator_conflicts_are_reported() {
		let harness = Harness::new();
		let reporter = sender(100, "A");
		let operator_x = sender(10, "X");
		let operator_y = sender(20, "Y");
		harness.register(&reporter, "Ada Lovelace", "Room 4").await;
		harness.submit(&reporter, "printer broken").await;
		harness.press(&operator_x, Action::Assign(1)).await;

		let replies = harness.press(&operator_y, Action::Unassign(1)).await;
		assert_eq!(
			replies,
			vec![Prompt::text("Only the operator working on ticket #1 can release it.")]
		);

		harness.press(&operator_x, Action::Unassign(1)).await;
		let ticket = harness.ticket(1);
		assert_eq!(ticket.status, TicketStatus::Active);
		assert_eq!(ticket.assignee, None);

		harness.press(&operator_y, Action::Close(1)).await;
		let replies = harness.press(&operator_x, Action::Close(1)).await;
		assert_eq!(replies, vec![Prompt::text("Ticket #1 is already closed.")]);

		let replies = harness.press(&operator_x, Action::Assign(9)).await;
		assert_eq!(replies, vec![Prompt::text("Ticket #9 was not found.")]);
	}

	#[tokio::test]
	async fn lookup_shows_only_own_tickets() {
		let harness = Harness::new();
		let reporter = sender(100, "A");
		let stranger = sender(200, "B");
		harness.register(&reporter, "Ada Lovelace", "Room 4").await;
		harness.submit(&reporter, "printer broken").await;

		let replies = harness.send(&reporter, Inbound::Menu(MenuCommand::MyTickets)).await;
		assert_eq!(replies[0].buttons, vec![PromptButton::action("#1", Action::Lookup(1))]);

		let replies = harness.press(&reporter, Action::Lookup(1)).await;
		assert!(replies[0].text.contains("printer broken"));
		let replies = harness.press(&stranger, Action::Lookup(1)).await;
		assert_eq!(replies, vec![Prompt::text("Ticket #1 was not found.")]);
	}

	#[tokio::test]
	async fn image_caption_is_used_as_the_description() {
		let harness = Harness::new();
		let reporter = sender(100, "A");
		harness.register(&reporter, "Ada Lovelace", "Room 4").await;
		harness.text(&reporter, "New ticket").await;

		let image = Inbound::Image {
			url: String::from("https://cdn/printer.jpg"),
			caption: Some(String::from("printer shows this error")),
		};
		let replies = harness.send(&reporter, image).await;
		assert_eq!(replies[0].buttons.len(), 2);

		harness.press(&reporter, Action::SkipPhoto).await;
		let ticket = harness.ticket(1);
		assert_eq!(ticket.description, "printer shows this error");
		assert_eq!(ticket.image_url, None);
	}

	#[tokio::test]
	async fn ticket_list_stays_short() {
		let harness = Harness::new();
		let reporter = sender(100, "A");
		harness.register(&reporter, "Ada Lovelace", "Room 4").await;
		for _ in 0..RECENT_TICKET_COUNT {
			lifecycle::create(harness.store.as_ref(), 100, "z".repeat(1500), None).unwrap();
		}

		let replies = harness.send(&reporter, Inbound::Menu(MenuCommand::MyTickets)).await;
		assert_eq!(replies[0].buttons.len(), 10);
		assert!(replies[0].text.chars().count() < 2000);
		assert!(replies[0].text.contains(&format!("{}…", "z".repeat(LISTED_DESCRIPTION_CHARS - 1))));
	}
}
