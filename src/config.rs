// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use kdl::{KdlDocument, KdlError};
use miette::{Diagnostic, IntoDiagnostic};
use std::fmt;
use std::time::Duration;
use tokio::fs::read_to_string;
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
pub struct ConfigData {
	pub discord: DiscordConfig,
	pub database: DatabaseConfig,
}

#[derive(Debug)]
pub struct DiscordConfig {
	pub bot_token: String,
	/// The channel operators work from; ticket cards are posted here
	pub ticket_channel: Id<ChannelMarker>,
	/// Upper bound on each request to Discord
	pub request_timeout: Duration,
}

#[derive(Debug)]
pub struct DatabaseConfig {
	pub host: String,
	pub port: Option<u16>,
	pub username: String,
	pub password: String,
	pub database: String,
}

impl DatabaseConfig {
	pub fn connection_url(&self) -> String {
		match self.port {
			Some(port) => format!(
				"postgres://{}:{}@{}:{}/{}",
				self.username, self.password, self.host, port, self.database
			),
			None => format!(
				"postgres://{}:{}@{}/{}",
				self.username, self.password, self.host, self.database
			),
		}
	}
}

#[derive(Debug, Diagnostic)]
pub enum ConfigError {
	Syntax(KdlError),
	MissingBlock(&'static str),
	MissingValue { block: &'static str, name: &'static str },
	InvalidValue { block: &'static str, name: &'static str },
}

impl From<KdlError> for ConfigError {
	fn from(error: KdlError) -> Self {
		Self::Syntax(error)
	}
}

impl std::error::Error for ConfigError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Syntax(error) => Some(error),
			_ => None,
		}
	}
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Syntax(error) => write!(f, "config syntax error: {}", error),
			Self::MissingBlock(block) => write!(f, "config is missing the `{}` block", block),
			Self::MissingValue { block, name } => write!(f, "config is missing `{}` in the `{}` block", name, block),
			Self::InvalidValue { block, name } => write!(f, "config value `{}` in the `{}` block is invalid", name, block),
		}
	}
}

pub async fn parse_config(config_path: &str) -> miette::Result<ConfigData> {
	let config_file_contents = read_to_string(config_path).await.into_diagnostic()?;
	let config = parse_config_str(&config_file_contents)?;
	Ok(config)
}

pub fn parse_config_str(contents: &str) -> Result<ConfigData, ConfigError> {
	let document: KdlDocument = contents.parse()?;
	let discord = block(&document, "discord")?;
	let database = block(&document, "database")?;

	let ticket_channel = required_integer(discord, "discord", "ticket-channel")?;
	let ticket_channel = u64::try_from(ticket_channel)
		.ok()
		.and_then(Id::new_checked)
		.ok_or(ConfigError::InvalidValue {
			block: "discord",
			name: "ticket-channel",
		})?;
	let request_timeout_secs = match discord.get_arg("request-timeout-secs") {
		Some(value) => value
			.as_integer()
			.and_then(|secs| u64::try_from(secs).ok())
			.filter(|secs| *secs > 0)
			.ok_or(ConfigError::InvalidValue {
				block: "discord",
				name: "request-timeout-secs",
			})?,
		None => DEFAULT_REQUEST_TIMEOUT_SECS,
	};

	let port = match database.get_arg("port") {
		Some(value) => Some(
			value
				.as_integer()
				.and_then(|port| u16::try_from(port).ok())
				.ok_or(ConfigError::InvalidValue {
					block: "database",
					name: "port",
				})?,
		),
		None => None,
	};

	Ok(ConfigData {
		discord: DiscordConfig {
			bot_token: required_string(discord, "discord", "bot-token")?,
			ticket_channel,
			request_timeout: Duration::from_secs(request_timeout_secs),
		},
		database: DatabaseConfig {
			host: required_string(database, "database", "host")?,
			port,
			username: required_string(database, "database", "username")?,
			password: required_string(database, "database", "password")?,
			database: required_string(database, "database", "database")?,
		},
	})
}

fn block<'a>(document: &'a KdlDocument, name: &'static str) -> Result<&'a KdlDocument, ConfigError> {
	document
		.get(name)
		.and_then(|node| node.children())
		.ok_or(ConfigError::MissingBlock(name))
}

fn required_string(block: &KdlDocument, block_name: &'static str, name: &'static str) -> Result<String, ConfigError> {
	let value = block.get_arg(name).ok_or(ConfigError::MissingValue { block: block_name, name })?;
	value
		.as_string()
		.map(|value| value.to_string())
		.ok_or(ConfigError::InvalidValue { block: block_name, name })
}

fn required_integer(block: &KdlDocument, block_name: &'static str, name: &'static str) -> Result<i128, ConfigError> {
	let value = block.get_arg(name).ok_or(ConfigError::MissingValue { block: block_name, name })?;
	value.as_integer().ok_or(ConfigError::InvalidValue { block: block_name, name })
}
