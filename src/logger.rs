use std::{path::Path, sync::OnceLock};
use tracing_subscriber::{fmt, EnvFilter};

static GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
static INIT: OnceLock<()> = OnceLock::new();

/// Initialize file logging once for the whole process.
///
/// `filter` is a tracing directive string such as
/// `"outpost::search=debug,info"`; a `RUST_LOG` environment variable takes
/// precedence. UCI protocol traffic stays on stdout, so the log file only
/// ever carries diagnostics.
pub fn init_logging<P: AsRef<Path>>(path: P, filter: &str) {
    INIT.get_or_init(|| {
        let path = path.as_ref();

        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }

        let file = match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(_) => return,
        };

        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        // The guard must outlive the process or buffered events are lost.
        let _ = GUARD.set(guard);

        let env_filter = if std::env::var_os("RUST_LOG").is_some() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"))
        };

        let subscriber = fmt()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .with_target(true)
            .with_writer(non_blocking)
            .finish();

        // Idempotent: a second init (e.g. across tests) is a no-op.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
