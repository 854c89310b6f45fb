//! Tracing subscriber setup.
//!
//! Logs go to stderr. Stdout is reserved for command output such as the
//! `--json` import summary.

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::Config;

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` drives the filter; `LOG_FORMAT=json` switches to one JSON object per line.
pub fn init(config: &Config) {
    if let Err(e) = tracing::subscriber::set_global_default(build_subscriber(config, std::io::stderr)) {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }
}

/// Builds the subscriber for `config`, writing through `writer`.
pub fn build_subscriber<W>(config: &Config, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.log_format == "json" {
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .json()
                .with_current_span(false)
                .finish(),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_target(false)
                .with_ansi(false)
                .finish(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn config(log_format: &str) -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            log_level: "info".to_string(),
            log_format: log_format.to_string(),
            batch_size: 500,
            db_max_connections: 5,
            db_connect_timeout: 30,
            db_idle_timeout: 600,
            db_max_lifetime: 1800,
        }
    }

    #[test]
    fn test_json_logs_go_to_given_writer() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = build_subscriber(&config("json"), move || sink.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(inserted = 3, "Import complete");
            tracing::debug!("filtered out");
        });

        let output = captured.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);

        let event: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(event["fields"]["message"], "Import complete");
        assert_eq!(event["fields"]["inserted"], 3);
    }

    #[test]
    fn test_text_logs_go_to_given_writer() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = build_subscriber(&config("text"), move || sink.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Snapshot loaded");
        });

        assert!(captured.contents().contains("Snapshot loaded"));
    }
}
