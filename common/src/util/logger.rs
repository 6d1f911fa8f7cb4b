use std::io::Write;

/// Initializes the process-wide logger. Safe to call more than once; only
/// the first call takes effect.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(buf, "[{}] {}", record.level(), record.args())
        })
        .try_init();
}
