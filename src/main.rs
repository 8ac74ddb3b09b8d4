use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use docsync::config::{self, Config};
use docsync::ConfigError;
use docsync::logging::{self, *};
use docsync::remote::HttpRemote;
use docsync::sync::SyncEngine;
use docsync::tracker::ChangeTracker;
use docsync::uploader::Uploader;
use docsync::utils::{setup_signal_handlers, ShutdownFlag};
use docsync::validation::Validator;

/// Exit status for configuration problems detected before any network activity
const EXIT_CONFIG: u8 = 2;

fn cli() -> Command {
	Command::new("docsync")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Synchronize local directories with remote document folders")
		.arg(Arg::new("config").long("config").value_name("FILE").help("Config file (TOML or JSON5)"))
		.arg(Arg::new("base-url").long("base-url").value_name("URL").help("Base URL of the API"))
		.arg(
			Arg::new("api-key")
				.long("api-key")
				.value_name("KEY")
				.help("API key for authentication"),
		)
		.arg(
			Arg::new("mapping-file")
				.long("mapping-file")
				.value_name("FILE")
				.conflicts_with("mapping")
				.help("JSON file with local directory to folder ID mappings"),
		)
		.arg(
			Arg::new("mapping")
				.long("mapping")
				.num_args(2)
				.value_names(["LOCAL_PATH", "FOLDER_ID"])
				.action(ArgAction::Append)
				.help("Map a local directory to a remote folder ID (repeatable)"),
		)
		.arg(
			Arg::new("directory")
				.long("directory")
				.value_name("DIR")
				.requires("folder-id")
				.help("Sync a specific local directory"),
		)
		.arg(
			Arg::new("folder-id")
				.long("folder-id")
				.value_name("ID")
				.requires("directory")
				.help("Remote folder ID for --directory"),
		)
		.arg(Arg::new("manifest").long("manifest").value_name("FILE").help("Sync manifest location"))
		.arg(Arg::new("log-file").long("log-file").value_name("FILE").help("Also write logs to FILE"))
		.arg(
			Arg::new("verify-ssl")
				.long("verify-ssl")
				.action(ArgAction::SetTrue)
				.help("Verify SSL certificates"),
		)
		.arg(
			Arg::new("verbose")
				.short('v')
				.long("verbose")
				.action(ArgAction::SetTrue)
				.help("Enable verbose logging"),
		)
}

/// Layer CLI flags over the file/env configuration
fn apply_cli(config: &mut Config, matches: &ArgMatches) {
	if let Some(v) = matches.get_one::<String>("base-url") {
		config.base_url = v.clone();
	}
	if let Some(v) = matches.get_one::<String>("api-key") {
		config.api_key = v.clone();
	}
	if let Some(v) = matches.get_one::<String>("manifest") {
		config.manifest_path = PathBuf::from(v);
	}
	if let Some(v) = matches.get_one::<String>("log-file") {
		config.log_file = Some(PathBuf::from(v));
	}
	if matches.get_flag("verify-ssl") {
		config.verify_ssl = true;
	}
	if matches.get_flag("verbose") {
		config.verbose = true;
	}
}

/// Resolve folder mappings from the mapping file, inline pairs or `--directory`
fn resolve_mappings(config: &mut Config, matches: &ArgMatches) -> Result<(), ConfigError> {
	if let Some(file) = matches.get_one::<String>("mapping-file") {
		let mappings = config::load_mapping_file(file.as_ref())?;
		if mappings.is_empty() {
			return Err(ConfigError::InvalidMapping {
				message: "No valid mappings found in the mapping file.".to_string(),
			});
		}
		config.mappings = mappings;
	} else if let Some(values) = matches.get_many::<String>("mapping") {
		let values: Vec<&String> = values.collect();
		config.mappings =
			values.chunks(2).map(|pair| (pair[0].clone(), pair[1].clone())).collect();
	}

	if let (Some(dir), Some(folder_id)) =
		(matches.get_one::<String>("directory"), matches.get_one::<String>("folder-id"))
	{
		config.mappings.insert(dir.clone(), folder_id.clone());
	}
	Ok(())
}

fn prepare(config: &mut Config, matches: &ArgMatches) -> Result<(), ConfigError> {
	resolve_mappings(config, matches)?;
	config.validate()?;
	Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
	let matches = cli().get_matches();

	let mut config = match matches.get_one::<String>("config") {
		Some(path) => match Config::from_file(path.as_ref()) {
			Ok(config) => config,
			Err(e) => {
				eprintln!("{}", e);
				return ExitCode::from(EXIT_CONFIG);
			}
		},
		None => Config::default(),
	};
	config.apply_env();
	apply_cli(&mut config, &matches);

	if let Err(e) = logging::init_tracing(config.verbose, config.log_file.as_deref()) {
		eprintln!("{}", e);
		return ExitCode::from(EXIT_CONFIG);
	}

	if let Err(e) = prepare(&mut config, &matches) {
		error!("{}", e);
		return ExitCode::from(EXIT_CONFIG);
	}
	info!("Using folder mappings: {:?}", config.mappings);

	let remote = match HttpRemote::new(&config.base_url, &config.api_key, config.verify_ssl) {
		Ok(remote) => remote,
		Err(e) => {
			error!("{}", e);
			return ExitCode::from(EXIT_CONFIG);
		}
	};

	let shutdown = ShutdownFlag::new();
	setup_signal_handlers(shutdown.clone());

	let uploader = Uploader::new(Arc::new(remote)).with_settle_delay(config.settle_delay());
	let tracker = ChangeTracker::open(&config.manifest_path);
	let mut engine = SyncEngine::new(uploader, tracker).with_shutdown(shutdown);

	let report = engine.sync_all(&config.mappings).await;
	let errored = report.outcomes.iter().filter(|o| o.result.is_err()).count();
	info!(
		"Synced {} of {} directories: {}",
		report.outcomes.len() - errored,
		config.mappings.len(),
		report.totals
	);

	if report.is_clean() {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	}
}

// vim: ts=4
