use std::fmt;

use clap::{ArgAction, Parser};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
	pub host: String,
	pub port: u16,
}
impl Endpoint {
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self { host: host.into(), port }
	}
	pub fn as_tuple(&self) -> (&str, u16) {
		(&self.host, self.port)
	}
}
impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.host, self.port)
	}
}

/// `-h` is taken by the bind host, so help is `--help` only.
#[derive(Parser, Debug, Clone)]
#[command(name = "stunpeersniff", version, disable_help_flag = true)]
#[command(about = "TCP relay that launches a demux tool once a TURN peer address is seen")]
pub struct Config {
	/// Remote server address
	#[arg(short = 'H', default_value = "localhost")]
	pub remote_host: String,

	/// Remote server port
	#[arg(short = 'P', default_value_t = 3478)]
	pub remote_port: u16,

	/// Address to bind to
	#[arg(short = 'h', default_value = "localhost")]
	pub local_host: String,

	/// Local proxy port
	#[arg(short = 'p', default_value_t = 6000)]
	pub local_port: u16,

	/// Tool to launch if peer address found
	#[arg(short = 't', default_value = "stundemux")]
	pub tool: String,

	#[arg(long, action = ArgAction::Help)]
	help: Option<bool>,
}
impl Config {
	pub fn remote(&self) -> Endpoint {
		Endpoint::new(self.remote_host.clone(), self.remote_port)
	}
	pub fn local(&self) -> Endpoint {
		Endpoint::new(self.local_host.clone(), self.local_port)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = Config::try_parse_from(["stunpeersniff"]).unwrap();
		assert_eq!(config.remote(), Endpoint::new("localhost", 3478));
		assert_eq!(config.local(), Endpoint::new("localhost", 6000));
		assert_eq!(config.tool, "stundemux");
	}

	#[test]
	fn short_flags() {
		let config = Config::try_parse_from([
			"stunpeersniff", "-H", "turn.example.org", "-P", "443",
			"-h", "0.0.0.0", "-p", "7000", "-t", "/usr/local/bin/stundemux",
		]).unwrap();
		assert_eq!(config.remote().to_string(), "turn.example.org:443");
		assert_eq!(config.local().to_string(), "0.0.0.0:7000");
		assert_eq!(config.tool, "/usr/local/bin/stundemux");
	}

	#[test]
	fn rejects_out_of_range_ports() {
		assert!(Config::try_parse_from(["stunpeersniff", "-P", "70000"]).is_err());
	}

	#[test]
	fn help_is_long_only() {
		let err = Config::try_parse_from(["stunpeersniff", "--help"]).unwrap_err();
		assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
	}
}
