use clap::{Arg, ArgAction, Command};
use std::error::Error;
use std::path::PathBuf;
use std::{env, path, process};

use xferr::cache::MemoryCache;
use xferr::command;
use xferr::command::{ListFlags, PayloadSlot, TransferFlags};
use xferr::config::EngineConfig;
use xferr::engine::Engine;
use xferr::logging::{self, TracingStatusSink};
use xferr::path::RemotePath;
use xferr::session::Session;
use xferr::transport::ProcessTransport;
use xferr::types::{Credentials, Server};

///////////////////////
// Utility functions //
///////////////////////

fn default_config_path() -> Option<path::PathBuf> {
	match env::var("HOME") {
		Ok(home) => Some(path::PathBuf::from(home).join(".config/xferr/config.toml")),
		Err(_) => None,
	}
}

/// Split a fully-qualified remote file into its directory and name
fn split_target(full: &str) -> Result<(RemotePath, String), Box<dyn Error>> {
	let path = RemotePath::new(full);
	let parent = path
		.parent()
		.ok_or_else(|| format!("'{}' does not name a file inside a directory", full))?;
	let name = path
		.name()
		.ok_or_else(|| format!("'{}' does not name a file inside a directory", full))?
		.to_string();
	Ok((parent, name))
}

fn arg_string(matches: &clap::ArgMatches, id: &str) -> String {
	matches.get_one::<String>(id).cloned().unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	logging::init_tracing();

	let matches = Command::new("xferr")
		.version("0.2.0")
		.about("Remote filesystem transfer client")
		.subcommand_required(true)
		.arg(
			Arg::new("host")
				.short('H')
				.long("host")
				.value_name("HOST")
				.required(true)
				.help("Server host"),
		)
		.arg(Arg::new("port").short('P').long("port").value_name("PORT").help("Server port"))
		.arg(
			Arg::new("user")
				.short('u')
				.long("user")
				.value_name("USER")
				.required(true)
				.help("Login user"),
		)
		.arg(
			Arg::new("password")
				.long("password")
				.value_name("PASSWORD")
				.help("Password (defaults to $XFERR_PASSWORD)"),
		)
		.arg(Arg::new("config").short('c').long("config").value_name("FILE").help("Config file"))
		.arg(
			Arg::new("no-retry")
				.long("no-retry")
				.action(ArgAction::SetTrue)
				.help("Do not retry a failed connect"),
		)
		.subcommand(
			Command::new("ls")
				.about("List a directory")
				.arg(Arg::new("path").value_name("PATH").help("Directory (default: current)"))
				.arg(Arg::new("refresh").long("refresh").action(ArgAction::SetTrue))
				.arg(
					Arg::new("fallback")
						.long("fallback-current")
						.action(ArgAction::SetTrue)
						.help("On a failed directory change, list the current directory"),
				),
		)
		.subcommand(
			Command::new("chmod")
				.about("Change permissions of a remote file")
				.arg(Arg::new("mode").value_name("MODE").required(true))
				.arg(Arg::new("file").value_name("FILE").required(true)),
		)
		.subcommand(
			Command::new("rm")
				.about("Delete remote files")
				.arg(Arg::new("path").value_name("DIR").required(true))
				.arg(
					Arg::new("files")
						.value_name("FILE")
						.required(true)
						.action(ArgAction::Append),
				),
		)
		.subcommand(
			Command::new("mkdir")
				.about("Create a remote directory")
				.arg(Arg::new("path").value_name("DIR").required(true)),
		)
		.subcommand(
			Command::new("rmdir")
				.about("Remove a remote directory")
				.arg(Arg::new("path").value_name("DIR").required(true)),
		)
		.subcommand(
			Command::new("mv")
				.about("Rename a remote file")
				.arg(Arg::new("from").value_name("FROM").required(true))
				.arg(Arg::new("to").value_name("TO").required(true)),
		)
		.subcommand(
			Command::new("put")
				.about("Upload a local file")
				.arg(Arg::new("local").value_name("LOCAL").required(true))
				.arg(Arg::new("remote").value_name("REMOTE").required(true)),
		)
		.subcommand(
			Command::new("get")
				.about("Download a remote file")
				.arg(Arg::new("remote").value_name("REMOTE").required(true))
				.arg(Arg::new("local").value_name("LOCAL").required(true)),
		)
		.subcommand(
			Command::new("raw")
				.about("Send a raw protocol line")
				.arg(Arg::new("line").value_name("LINE").required(true)),
		)
		.get_matches();

	let config = match matches.get_one::<String>("config") {
		Some(path) => EngineConfig::load(path::Path::new(path))?,
		None => match default_config_path() {
			Some(path) => EngineConfig::load(&path)?,
			None => EngineConfig::default(),
		},
	};

	let host = arg_string(&matches, "host");
	let port = match matches.get_one::<String>("port") {
		Some(port) => port.parse()?,
		None => config.default_port,
	};
	let user = arg_string(&matches, "user");
	let password = match matches.get_one::<String>("password") {
		Some(password) => password.clone(),
		None => env::var("XFERR_PASSWORD").unwrap_or_default(),
	};

	let cmd = match matches.subcommand() {
		Some(("ls", sub)) => {
			let mut flags = ListFlags::empty();
			if sub.get_flag("refresh") {
				flags = flags | ListFlags::REFRESH;
			}
			if sub.get_flag("fallback") {
				flags = flags | ListFlags::FALLBACK_CURRENT;
			}
			let path = sub.get_one::<String>("path").map(|p| RemotePath::new(p));
			command::Command::List { path, subdir: String::new(), flags }
		}
		Some(("chmod", sub)) => {
			let (path, file) = split_target(&arg_string(sub, "file"))?;
			command::Command::Chmod { path, file, permission: arg_string(sub, "mode") }
		}
		Some(("rm", sub)) => {
			let files = sub
				.get_many::<String>("files")
				.map(|files| files.cloned().collect())
				.unwrap_or_default();
			command::Command::Delete { path: RemotePath::new(&arg_string(sub, "path")), files }
		}
		Some(("mkdir", sub)) => {
			command::Command::Mkdir { path: RemotePath::new(&arg_string(sub, "path")) }
		}
		Some(("rmdir", sub)) => command::Command::RemoveDir {
			path: RemotePath::new(&arg_string(sub, "path")),
			subdir: String::new(),
		},
		Some(("mv", sub)) => {
			let (from_path, from_file) = split_target(&arg_string(sub, "from"))?;
			let (to_path, to_file) = split_target(&arg_string(sub, "to"))?;
			command::Command::Rename { from_path, from_file, to_path, to_file }
		}
		Some(("put", sub)) => {
			let (remote_path, remote_file) = split_target(&arg_string(sub, "remote"))?;
			command::Command::Transfer {
				payload: PayloadSlot::new(PathBuf::from(arg_string(sub, "local"))),
				remote_path,
				remote_file,
				flags: TransferFlags::empty(),
			}
		}
		Some(("get", sub)) => {
			let (remote_path, remote_file) = split_target(&arg_string(sub, "remote"))?;
			command::Command::Transfer {
				payload: PayloadSlot::new(PathBuf::from(arg_string(sub, "local"))),
				remote_path,
				remote_file,
				flags: TransferFlags::DOWNLOAD,
			}
		}
		Some(("raw", sub)) => command::Command::Raw { line: arg_string(sub, "line") },
		_ => unreachable!("subcommand_required"),
	};

	let server = Server::new(&host, port);
	let transport = ProcessTransport::new(
		&config.agent_command,
		config.agent_args.clone(),
		config.exchange_timeout(),
	);
	let session = Session::new(
		server.clone(),
		Box::new(transport),
		std::sync::Arc::new(MemoryCache::new()),
		Box::new(TracingStatusSink),
	);
	let mut engine = Engine::new(session);

	let connect = command::Command::Connect {
		server,
		credentials: Credentials::new(&user, &password),
		retry_connecting: config.retry_connecting && !matches.get_flag("no-retry"),
	};
	let code = engine.execute(connect).await;
	if code.is_error() {
		eprintln!("connect failed: {}", code);
		process::exit(1);
	}

	let kind = cmd.kind();
	let code = engine.execute(cmd).await;
	println!("{}: {}", kind, code);

	engine.execute(command::Command::Disconnect).await;
	if code.is_error() {
		process::exit(1);
	}
	Ok(())
}

// vim: ts=4
