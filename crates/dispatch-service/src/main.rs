//! Main entry point for the dispatch queue service.
//!
//! This binary seeds a sample working set, walks it through the queue
//! surfaces an operations desk uses (paging, menu-action routing, lifecycle
//! transitions, batch tools), then keeps an escalation monitor running until
//! interrupted, re-listing the first page whenever a sweep changes the queue.

use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;

mod config;
mod seed;

use config::Config;
use dispatch_core::{
	escalation, pager, queue, router, summary, OrderStateMachine, OrderStore, PageCursor,
	PageResult, QueueError, RouteOutcome,
};
use dispatch_types::{OrderId, Transition};

/// Command-line arguments for the dispatch service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	/// Dump the first page and the summary as JSON after the drive
	#[arg(long)]
	json: bool,
}

/// Main entry point for the dispatch service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Seeds the working set and runs the scripted drive
/// 5. Runs the escalation monitor until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	// Create env filter with default from args
	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started dispatch service");

	let config = Config::from_file(&args.config)?;
	let policy = config.escalation_policy()?;
	tracing::info!(
		urgent_after_minutes = policy.urgent_after().num_minutes(),
		timeout_after_minutes = policy.timeout_after().num_minutes(),
		"Loaded configuration"
	);

	// Seed the working set and apply a first sweep so the queue opens with
	// its overdue orders already escalated.
	let store = OrderStore::from_orders(seed::sample_orders(config.seed.orders, Utc::now()))?;
	let mut machine = OrderStateMachine::new(store);
	escalation::sweep(&mut machine, &policy, Utc::now());

	let mut cursor = PageCursor::new();
	cursor.set_size(config.board.page_size);

	scripted_drive(&mut machine, &cursor)?;

	if args.json {
		let page = pager::list_page(machine.store(), cursor.page_size(), cursor.page_number())?;
		let snapshot = serde_json::json!({
			"page": page,
			"summary": summary::summarize(machine.store()),
		});
		println!("{}", serde_json::to_string_pretty(&snapshot)?);
	}

	run_monitor(&mut machine, &policy, &config, &cursor).await?;

	let closing = summary::summarize(&machine.into_store());
	tracing::info!(
		total = closing.total_orders,
		pending = closing.pending_dispatch,
		completed = closing.completed,
		"Stopped dispatch service"
	);
	Ok(())
}

/// Walks the seeded board through every queue surface once.
fn scripted_drive(machine: &mut OrderStateMachine, cursor: &PageCursor) -> Result<(), QueueError> {
	let opening = summary::summarize(machine.store());
	tracing::info!(
		component = "service",
		total = opening.total_orders,
		pending = opening.pending_dispatch,
		urgent = opening.urgent,
		timed_out = opening.timed_out,
		"Board seeded"
	);

	let page = pager::list_page(machine.store(), cursor.page_size(), cursor.page_number())?;
	log_page(&page);

	let mut pending = page
		.items
		.iter()
		.filter(|order| order.is_pending())
		.map(|order| order.id)
		.collect::<Vec<OrderId>>()
		.into_iter();

	// Route the close-out menu action, then apply the transition it names
	// with the amount the operator would confirm.
	if let Some(id) = pending.next() {
		match router::route(machine.store(), "完单", id)? {
			RouteOutcome::Transition { kind } => {
				tracing::info!(
					component = "service",
					order_id = %id,
					kind = %kind,
					"Menu action resolved to a transition"
				);
				let amount = machine.get_order(id)?.total_amount;
				machine.apply(id, Transition::Complete { amount })?;
			}
			RouteOutcome::Informational { label } => {
				tracing::info!(component = "service", order_id = %id, label = %label, "Menu action passed through");
			}
		}

		// A display-only action comes back as a notice and touches nothing.
		if let RouteOutcome::Informational { label } =
			router::route(machine.store(), "查资源", id)?
		{
			tracing::info!(component = "service", order_id = %id, label = %label, "Notice passed through");
		}
	}

	if let Some(id) = pending.next() {
		machine.dispatch(id)?;
		// A second dispatch must be refused and leave the order alone.
		if let Err(err) = machine.dispatch(id) {
			tracing::warn!(component = "service", order_id = %id, error = %err, "Transition refused");
		}
	}

	if let Some(id) = pending.next() {
		machine.mark_returned(id, "客户改期，联系不上")?;
	}
	if let Some(id) = pending.next() {
		machine.mark_error(id, "现场与描述不符，需加价")?;
	}

	let batch: Vec<OrderId> = pending.take(2).collect();
	if !batch.is_empty() {
		let outcome = machine.void_many(&batch);
		tracing::info!(
			component = "service",
			voided = outcome.applied.len(),
			failed = outcome.failures.len(),
			"Batch void applied"
		);
	}

	let refreshed = pager::list_page(machine.store(), cursor.page_size(), cursor.page_number())?;
	log_page(&refreshed);
	Ok(())
}

/// Sweeps on a fixed cadence until interrupted.
async fn run_monitor(
	machine: &mut OrderStateMachine,
	policy: &escalation::EscalationPolicy,
	config: &Config,
	cursor: &PageCursor,
) -> Result<(), QueueError> {
	let mut interval = tokio::time::interval(std::time::Duration::from_secs(
		config.escalation.sweep_interval_seconds,
	));

	loop {
		tokio::select! {
			_ = interval.tick() => {
				let escalated = escalation::sweep(machine, policy, Utc::now());
				if !escalated.is_empty() {
					tracing::info!(
						component = "service",
						escalated = escalated.len(),
						"Sweep changed the queue"
					);
					let page = pager::list_page(
						machine.store(),
						cursor.page_size(),
						cursor.page_number(),
					)?;
					log_page(&page);
				}
			}
			result = tokio::signal::ctrl_c() => {
				if let Err(err) = result {
					tracing::warn!(error = %err, "Shutdown signal listener failed");
				}
				tracing::info!("Shutdown signal received");
				return Ok(());
			}
		}
	}
}

/// Logs one page of the queue with each order's urgency tier.
fn log_page(page: &PageResult) {
	let items: Vec<String> = page
		.items
		.iter()
		.map(|order| format!("{}:{:?}", order.id, queue::classify(order)))
		.collect();
	tracing::info!(
		component = "service",
		page = page.page_number,
		of = page.total_pages,
		total = page.total_items,
		items = ?items,
		"Queue page"
	);
}
