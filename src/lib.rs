// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod action;
pub mod card;
pub mod config;
pub mod conversation;
pub mod database;
pub mod desk;
pub mod discord;
pub mod feedback;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod prompt;
pub mod schema;
pub mod store;
#[cfg(test)]
mod testing;
