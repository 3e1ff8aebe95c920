use metrics_exporter_prometheus::PrometheusBuilder;
use pawfolio::api::Session;
use pawfolio::config::AppConfig;
use std::io::{self, BufRead, Write};

fn main() {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    pawfolio::telemetry::init_telemetry("pawfolio");

    let metric_handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!("Metrics recorder unavailable: {}", e);
            None
        }
    };

    let config = AppConfig::from_env();
    let pets = match config.load_pets() {
        Ok(pets) => pets,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(pets = pets.len(), "Starting session, reading commands from stdin");
    let mut session = Session::new(pets, config.known_emails, metric_handle);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let now = chrono::Local::now().naive_local();
        let reply = session.handle_line(&line, now);
        if let Err(e) = writeln!(stdout, "{}", reply).and_then(|_| stdout.flush()) {
            tracing::error!("Failed to write reply: {}", e);
            break;
        }
    }

    tracing::info!("Session closed");
}
