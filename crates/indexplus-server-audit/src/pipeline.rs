// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{instrument, warn};

use crate::error::{AuditError, AuditResult};
use crate::event::AuditLogEntry;
use crate::filter::AuditFilterConfig;
use crate::sink::AuditSink;

pub struct AuditService {
	tx: mpsc::Sender<AuditLogEntry>,
}

impl AuditService {
	pub fn new(
		global_filter: AuditFilterConfig,
		queue_capacity: usize,
		sinks: Vec<Arc<dyn AuditSink>>,
	) -> Self {
		let (tx, rx) = mpsc::channel(queue_capacity);

		tokio::spawn(Self::background_task(rx, global_filter, sinks));

		Self { tx }
	}

	async fn background_task(
		mut rx: mpsc::Receiver<AuditLogEntry>,
		global_filter: AuditFilterConfig,
		sinks: Vec<Arc<dyn AuditSink>>,
	) {
		while let Some(entry) = rx.recv().await {
			if !global_filter.allows(&entry) {
				continue;
			}

			let entry = Arc::new(entry);

			for sink in &sinks {
				if !sink.filter().allows(&entry) {
					continue;
				}

				let sink = Arc::clone(sink);
				let entry = Arc::clone(&entry);

				tokio::spawn(async move {
					if let Err(e) = sink.publish(entry).await {
						warn!(sink = sink.name(), error = %e, "audit sink publish failed");
					}
				});
			}
		}
	}

	/// Log an audit entry to the queue for processing.
	///
	/// Returns `true` if the entry was successfully queued. When the queue
	/// is at capacity the newest entry is dropped and a warning is emitted.
	#[instrument(skip(self, entry), fields(event_type = %entry.event_type))]
	pub fn log(&self, entry: AuditLogEntry) -> bool {
		match self.tx.try_send(entry) {
			Ok(()) => true,
			Err(TrySendError::Full(entry)) => {
				warn!(event_type = %entry.event_type, "audit queue full, dropping entry");
				false
			}
			Err(TrySendError::Closed(entry)) => {
				warn!(event_type = %entry.event_type, "audit pipeline stopped, dropping entry");
				false
			}
		}
	}

	/// Log an audit entry, waiting for queue space instead of dropping.
	pub async fn log_blocking(&self, entry: AuditLogEntry) -> AuditResult<()> {
		self.tx.send(entry).await.map_err(|_| AuditError::Shutdown)
	}
}
