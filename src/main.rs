// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use service_desk::config::parse_config;
use service_desk::database::{connect_db, run_embedded_migrations};
use service_desk::desk::Desk;
use service_desk::discord::{DiscordSurface, run_bot, set_up_client};
use service_desk::notify::ChatSurface;
use service_desk::store::{PgTicketStore, TicketStore};
use std::sync::Arc;
use tokio::sync::RwLock;
use type_map::concurrent::TypeMap;

#[tokio::main]
async fn main() -> miette::Result<()> {
	tracing_subscriber::fmt::init();

	let config = Arc::new(parse_config("config.kdl").await?);

	let db_connection_pool = connect_db(&config.database)?;
	run_embedded_migrations(&db_connection_pool)?;
	tracing::info!("Database is ready");

	let http_client = set_up_client(&config);
	let store: Arc<dyn TicketStore> = Arc::new(PgTicketStore::new(db_connection_pool));
	let surface: Arc<dyn ChatSurface> = Arc::new(DiscordSurface::new(
		Arc::clone(&http_client),
		config.discord.ticket_channel,
	));
	let bot_state = Arc::new(RwLock::new(TypeMap::new()));
	let desk = Arc::new(Desk::new(store, surface, bot_state));

	run_bot(config, http_client, desk).await
}
