//! Signal handlers for graceful termination
//!
//! The first SIGINT/SIGTERM only raises a [`ShutdownFlag`]; the sync engine
//! checks it between files so the file in flight (and its manifest update)
//! completes. A second signal exits immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cooperative stop request shared between the signal task and the engine
#[derive(Clone, Debug, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
	pub fn new() -> Self {
		ShutdownFlag::default()
	}

	pub fn request(&self) {
		self.0.store(true, Ordering::SeqCst);
	}

	pub fn is_requested(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}
}

/// Spawn the signal watcher; must be called from within a tokio runtime
#[cfg(unix)]
pub fn setup_signal_handlers(flag: ShutdownFlag) {
	tokio::spawn(async move {
		use tokio::signal;

		let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(stream) => stream,
			Err(e) => {
				warn!("Failed to setup SIGTERM handler: {}. Process will not handle SIGTERM gracefully.", e);
				return;
			}
		};

		let mut sigint = match signal::unix::signal(signal::unix::SignalKind::interrupt()) {
			Ok(stream) => stream,
			Err(e) => {
				warn!("Failed to setup SIGINT handler: {}. Process will not handle SIGINT gracefully.", e);
				return;
			}
		};

		loop {
			let code = tokio::select! {
				_ = sigterm.recv() => 143, // 128 + SIGTERM(15)
				_ = sigint.recv() => 130,  // 128 + SIGINT(2)
			};
			if flag.is_requested() {
				debug!("Second signal received, exiting now");
				std::process::exit(code);
			}
			warn!("Interrupt received, stopping after the current file (repeat to abort)");
			flag.request();
		}
	});
}

#[cfg(not(unix))]
pub fn setup_signal_handlers(flag: ShutdownFlag) {
	tokio::spawn(async move {
		loop {
			if let Err(e) = tokio::signal::ctrl_c().await {
				warn!("Failed to setup Ctrl-C handler: {}", e);
				return;
			}
			if flag.is_requested() {
				debug!("Second Ctrl-C received, exiting now");
				std::process::exit(130);
			}
			warn!("Interrupt received, stopping after the current file (repeat to abort)");
			flag.request();
		}
	});
}


// vim: ts=4
