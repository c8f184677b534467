// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::desk::Sender;
use twilight_model::user::User;

/// Builds the sender for a Discord user, with the server nickname if the event came from a server.
pub fn sender_from_user(user: &User, nick: Option<&str>) -> Sender {
	Sender {
		id: user.id,
		handle: Some(user.name.clone()),
		display_name: display_name(&user.name, user.global_name.as_deref(), nick),
	}
}

/// Picks the name shown to others: the server nickname, then the global name, then the username
fn display_name(username: &str, global_name: Option<&str>, nick: Option<&str>) -> String {
	nick.or(global_name).unwrap_or(username).to_string()
}
