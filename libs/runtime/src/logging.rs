//! Logging bootstrap.
//!
//! Each [`Section`] of the logging config yields a console sink and an optional
//! JSON file sink. Named sections claim the targets prefixed by their key
//! (`task_manager` claims `task_manager::domain::service`); the `default`
//! section receives everything unclaimed.

use crate::config::{LoggingConfig, Section};
use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use parking_lot::Mutex;
use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::FilterFn, fmt, layer::SubscriberExt, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        "off" | "none" => None,
        _ => Some(LevelFilter::INFO),
    }
}

/// Returns true if target == prefix or target starts with "prefix::"
fn matches_prefix(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn create_rotating_writer(section: &Section, log_path: &Path) -> std::io::Result<RotWriter> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let backups = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);
    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(FileLimit::MaxFiles(backups)),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

/// Which targets a section is responsible for.
#[derive(Clone)]
enum Scope {
    Prefix(String),
    /// Everything not claimed by one of the listed prefixes.
    Rest(Arc<Vec<String>>),
}

impl Scope {
    fn filter(
        self,
        max: LevelFilter,
    ) -> FilterFn<impl Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static> {
        FilterFn::new(move |meta: &tracing::Metadata<'_>| {
            if *meta.level() > max {
                return false;
            }
            match &self {
                Scope::Prefix(prefix) => matches_prefix(meta.target(), prefix),
                Scope::Rest(claimed) => !claimed.iter().any(|p| matches_prefix(meta.target(), p)),
            }
        })
    }
}

fn section_layers(name: &str, section: &Section, scope: Scope, base_dir: &Path) -> Vec<BoxedLayer> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if let Some(level) = parse_level(&section.console_level) {
        layers.push(
            fmt::layer()
                .with_ansi(atty::is(atty::Stream::Stdout))
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(scope.clone().filter(level))
                .boxed(),
        );
    }

    if section.file.trim().is_empty() {
        return layers;
    }
    let Some(level) = parse_level(&section.file_level) else {
        return layers;
    };

    let log_path = resolve_log_path(&section.file, base_dir);
    match create_rotating_writer(section, &log_path) {
        Ok(writer) => layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(writer)
                .with_filter(scope.filter(level))
                .boxed(),
        ),
        Err(e) => eprintln!(
            "Failed to init log file for '{}': {} ({})",
            name,
            log_path.display(),
            e
        ),
    }
    layers
}

fn build_layers(cfg: &LoggingConfig, base_dir: &Path) -> Vec<BoxedLayer> {
    let claimed: Vec<String> = cfg
        .keys()
        .filter(|k| k.as_str() != "default")
        .cloned()
        .collect();

    let mut layers = Vec::new();
    for name in &claimed {
        let section = &cfg[name];
        layers.extend(section_layers(
            name,
            section,
            Scope::Prefix(name.clone()),
            base_dir,
        ));
    }
    if let Some(section) = cfg.get("default") {
        layers.extend(section_layers(
            "default",
            section,
            Scope::Rest(Arc::new(claimed)),
            base_dir,
        ));
    }
    layers
}

/// Install the global subscriber. `base_dir` (normally `server.home_dir`)
/// anchors relative log file paths. Calling this twice is harmless.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` before installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let subscriber = Registry::default().with(build_layers(cfg, base_dir));
    let _ = tracing::subscriber::set_global_default(subscriber);
}
