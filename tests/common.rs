#![allow(dead_code)]

/// Enables tracing for a test, returning a guard that restores the
/// previous subscriber when dropped.
pub fn init() -> tracing::subscriber::DefaultGuard {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::DEBUG.into())
                .from_env_lossy(),
        )
        .finish();

    tracing::subscriber::set_default(subscriber)
}
