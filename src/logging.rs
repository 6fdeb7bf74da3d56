use env_logger::{Builder, Env};
use std::io::Write;

/// Installs the logger shared by both binaries.
///
/// Defaults to `debug`, `RUST_LOG` takes precedence. Lines look like
/// `2024-01-01T12:00:00.123Z [INFO    ] message`.
pub fn init() {
    Builder::from_env(Env::default().default_filter_or("debug"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{:<8}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .init();
}
