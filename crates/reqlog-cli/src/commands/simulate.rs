//! Simulate command
//!
//! Usage: reqlog simulate [--requests <N>] [--fail-every <K>] [--work-ms <MS>]
//!
//! Each simulated request runs on its own thread with a request-scoped
//! logger, the way a service handler would use the façade.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use clap::Args;
use reqlog_logging::{get_request_id, Attr, Context, Logger};
use thiserror::Error;

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Number of requests
    #[arg(short = 'n', long, default_value_t = 4)]
    pub requests: usize,

    /// Every K-th request fails (0 disables failures)
    #[arg(long, default_value_t = 3)]
    pub fail_every: usize,

    /// Simulated work per request, in milliseconds
    #[arg(long, default_value_t = 10)]
    pub work_ms: u64,
}

#[derive(Debug, Error)]
#[error("storage backend returned status {status} for {key}")]
struct StorageError {
    status: u16,
    key: String,
}

/// Execute simulate command
pub fn execute(logger: &Logger, args: SimulateArgs) -> anyhow::Result<()> {
    let base = logger.with_component("simulator");
    let start = Instant::now();
    let failures = AtomicUsize::new(0);

    thread::scope(|scope| {
        for n in 1..=args.requests {
            let (base, args, failures) = (&base, &args, &failures);
            scope.spawn(move || {
                if handle_request(base, n, args).is_err() {
                    failures.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    base.info(
        "simulation finished",
        &[
            Attr::new("requests", args.requests),
            Attr::new("failures", failures.load(Ordering::Relaxed)),
        ],
    );
    base.time_track(start, "simulation", &[]);
    Ok(())
}

fn handle_request(base: &Logger, n: usize, args: &SimulateArgs) -> Result<(), StorageError> {
    let start = Instant::now();
    let (ctx, logger) = base.with_request_id(&Context::background());
    let logger = logger.with_operation("upload");

    logger.info("request received", &[Attr::new("request", n)]);
    let result = store_object(&ctx, &logger, n, args);
    if let Err(err) = &result {
        logger.log_error("upload failed", Some(err), &[Attr::new("request", n)]);
    }
    logger.time_track(start, "upload", &[]);
    result
}

fn store_object(
    ctx: &Context,
    logger: &Logger,
    n: usize,
    args: &SimulateArgs,
) -> Result<(), StorageError> {
    let logger = logger.with_component("storage");
    let _timer = logger.start_timer("store_object");

    logger.debug(
        "forwarding to storage",
        &[Attr::new("upstream_request_id", get_request_id(ctx))],
    );
    thread::sleep(Duration::from_millis(args.work_ms));

    if args.fail_every > 0 && n % args.fail_every == 0 {
        return Err(StorageError {
            status: 503,
            key: format!("objects/{n}"),
        });
    }
    Ok(())
}
