// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::action::Action;
use crate::prompt::{ButtonTarget, PromptButton};
use twilight_model::channel::message::component::{ActionRow, Button, ButtonStyle, Component};

/// Discord allows at most this many buttons in a single action row
const BUTTONS_PER_ROW: usize = 5;

/// Lays out buttons in action rows, in order.
pub fn button_rows(buttons: &[PromptButton]) -> Vec<Component> {
	buttons
		.chunks(BUTTONS_PER_ROW)
		.map(|row| {
			Component::ActionRow(ActionRow {
				components: row.iter().map(button).collect(),
			})
		})
		.collect()
}

fn button(prompt_button: &PromptButton) -> Component {
	let (custom_id, style, url) = match &prompt_button.target {
		ButtonTarget::Action(action) => (Some(action.token()), action_style(action), None),
		ButtonTarget::Link(url) => (None, ButtonStyle::Link, Some(url.clone())),
	};
	Component::Button(Button {
		custom_id,
		disabled: false,
		emoji: None,
		label: Some(prompt_button.label.clone()),
		style,
		url,
		sku_id: None,
	})
}

fn action_style(action: &Action) -> ButtonStyle {
	match action {
		Action::Assign(_) => ButtonStyle::Success,
		Action::Close(_) => ButtonStyle::Danger,
		Action::Unassign(_) | Action::SkipPhoto | Action::Lookup(_) => ButtonStyle::Secondary,
		Action::AddPhoto | Action::Rate { .. } => ButtonStyle::Primary,
	}
}
