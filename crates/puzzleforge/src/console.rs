//! Colorful console output for solve events.
//!
//! Provides a custom `tracing` layer that formats solver events with colors.
//! Initialized by [`crate::load_solver`] when the `console` feature is enabled.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. Filtering
/// follows `RUST_LOG`, defaulting to `puzzleforge_solver=info`.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("puzzleforge_solver=info"));

        // Another subscriber may already be installed by the host application.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolveConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats solver events with colors.
pub struct SolveConsoleLayer;

impl<S: Subscriber> Layer<S> for SolveConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("puzzleforge_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    puzzle_id: Option<String>,
    algorithm: Option<String>,
    strategy: Option<String>,
    error: Option<String>,
    piece_count: Option<u64>,
    max_iterations: Option<u64>,
    iterations: Option<u64>,
    evaluations: Option<u64>,
    speed: Option<u64>,
    best_fitness: Option<f64>,
    confidence: Option<f64>,
    elapsed_secs: Option<f64>,
    solved: Option<bool>,
    cancelled: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "puzzle_id" => self.puzzle_id = Some(s),
            "algorithm" => self.algorithm = Some(s),
            "strategy" => self.strategy = Some(s),
            "error" => self.error = Some(s),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "puzzle_id" => self.puzzle_id = Some(value.to_string()),
            "algorithm" => self.algorithm = Some(value.to_string()),
            "strategy" => self.strategy = Some(value.to_string()),
            "error" => self.error = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "piece_count" => self.piece_count = Some(value),
            "max_iterations" => self.max_iterations = Some(value),
            "iterations" => self.iterations = Some(value),
            "evaluations" => self.evaluations = Some(value),
            "speed" => self.speed = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "best_fitness" => self.best_fitness = Some(value),
            "confidence" => self.confidence = Some(value),
            "elapsed_secs" => self.elapsed_secs = Some(value),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "solved" => self.solved = Some(value),
            "cancelled" => self.cancelled = Some(value),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref() {
        Some("solve_start") => format_solve_start(v),
        Some("progress") => format_progress(v),
        Some("solve_end") => format_solve_end(v),
        Some("solve_failed") => format_solve_failed(v),
        Some("job_cancelled") | Some("job_superseded") => format_job_event(v),
        _ => String::new(),
    }
}

fn puzzle_tag(v: &EventVisitor) -> String {
    format!("[{}]", v.puzzle_id.as_deref().unwrap_or("?"))
}

fn format_solve_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} Solving started: algorithm ({}), pieces ({}), iteration limit ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        puzzle_tag(v).bright_cyan(),
        v.algorithm.as_deref().unwrap_or("?").white().bold(),
        v.piece_count.unwrap_or(0).to_formatted_string(&Locale::en).bright_yellow(),
        v.max_iterations.unwrap_or(0).to_formatted_string(&Locale::en).bright_yellow(),
    )
}

fn format_progress(v: &EventVisitor) -> String {
    let best = v
        .best_fitness
        .map(|f| format!("{f:.3}"))
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "    {} {} iteration {:>9} | {}/sec | best fitness {}",
        "->".bright_blue(),
        v.strategy.as_deref().unwrap_or("?").white(),
        v.iterations.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        v.speed.unwrap_or(0).to_formatted_string(&Locale::en).bright_magenta(),
        best.bright_green(),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let confidence = v.confidence.unwrap_or(0.0);
    let status = match (v.solved, v.cancelled) {
        (Some(true), Some(true)) => "CANCELLED (best so far)".yellow().bold().to_string(),
        (Some(true), _) => "SOLVED".bright_green().bold().to_string(),
        _ => "NO ARRANGEMENT".bright_red().bold().to_string(),
    };
    format!(
        "{} {} {} Solving ended: {}, confidence ({}), time spent ({}), iterations ({}), evaluations ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        puzzle_tag(v).bright_cyan(),
        status,
        format_confidence(confidence),
        format_duration_secs(v.elapsed_secs.unwrap_or(0.0)).yellow(),
        v.iterations.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        v.evaluations.unwrap_or(0).to_formatted_string(&Locale::en).white(),
    )
}

fn format_solve_failed(v: &EventVisitor) -> String {
    format!(
        "{} {} {} Solving failed: {}",
        timestamp().bright_black(),
        "WARN".bright_yellow(),
        puzzle_tag(v).bright_cyan(),
        v.error.as_deref().unwrap_or("unknown error").bright_red(),
    )
}

fn format_job_event(v: &EventVisitor) -> String {
    let text = match v.event.as_deref() {
        Some("job_superseded") => "Superseded by a newer solve",
        _ => "Cancellation requested",
    };
    format!(
        "{} {} {} {}",
        timestamp().bright_black(),
        "INFO".bright_green(),
        puzzle_tag(v).bright_cyan(),
        text.yellow(),
    )
}

fn format_confidence(confidence: f64) -> String {
    let text = format!("{:.1}%", confidence * 100.0);
    if confidence >= 0.75 {
        text.bright_green().to_string()
    } else if confidence >= 0.5 {
        text.yellow().to_string()
    } else {
        text.bright_red().to_string()
    }
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_secs(secs: f64) -> String {
    if secs < 1.0 {
        format!("{}ms", (secs * 1000.0) as u64)
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let whole = secs as u64;
        format!("{}m {}s", whole / 60, whole % 60)
    }
}
