pub mod alert;
pub mod config;
pub mod dispatch;
pub mod evaluator;
pub mod probe;
pub mod runner;
pub mod types;

pub use alert::{Alert, AlertDecision, AlertField, Severity};
pub use config::{saerro_schema, ConfigError, WatchConfig};
pub use dispatch::{AlertDispatcher, DeliveryError};
pub use evaluator::{
    DegradedAnnotation, HealthEvaluator, HealthSchema, ScalarSpec, ToleranceRule,
};
pub use probe::{HealthProbe, ProbeError};
pub use runner::Watchdog;
pub use types::{HealthSnapshot, UpDown, WorldStatus};

/// Initialize the global logger
///
/// Timestamped, level-tagged lines on stdout; unknown level names fall
/// back to `info`.
pub fn init_logging(level: &str) -> Result<(), fern::InitError> {
    let level = level.parse::<log::LevelFilter>().unwrap_or(log::LevelFilter::Info);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] [{}] {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}
