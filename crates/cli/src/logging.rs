/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` / `-vv` raise the level from `warn`.
pub fn init(verbosity: u8) {
    // Library crates log through the `log` facade
    let _ = tracing_log::LogTracer::init();

    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default.into());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .with_level(true)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
