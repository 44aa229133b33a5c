//! Logging setup shared by tests, benches and tools.

/// Route log output to stderr.
///
/// Safe to call from every test in a binary; only the first call installs the
/// logger.
pub fn log_to_stderr() {
    static ONCE: std::sync::Once = std::sync::Once::new();

    ONCE.call_once(|| {
        env_logger::builder()
            .format(|buf, record| {
                use std::io::Write;

                writeln!(
                    buf,
                    "{} [{}] {} at={}",
                    time::OffsetDateTime::now_utc(),
                    record.level(),
                    record.args(),
                    record.target()
                )
            })
            .init();
    });
}
