//! CLI binary for imglift.
//!
//! A thin shim over the library crate that maps CLI flags to `UploadConfig`
//! and renders lifecycle events as a terminal progress display.

use anyhow::Result;
use clap::Parser;
use imglift::{
    process_files, FileTask, TaskErrorKind, TaskReporter, UploadConfig, DEFAULT_ENDPOINT,
};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI reporter using indicatif ─────────────────────────────────────────────

/// Terminal reporter: one progress bar per file task, plus a summary line
/// per terminal event. Tasks for several files run concurrently, so every
/// bar lives in a shared [`MultiProgress`] and lookups go through a mutex.
struct CliReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
    failures: AtomicUsize,
}

impl CliReporter {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
            failures: AtomicUsize::new(0),
        })
    }

    fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    fn take_bar(&self, task_id: &str) -> Option<ProgressBar> {
        self.bars.lock().unwrap().remove(task_id)
    }
}

impl TaskReporter for CliReporter {
    fn on_task_started(&self, task_id: &str) {
        let bar = self.multi.add(ProgressBar::new(0));
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:32.green/238}] {pos}/{len} images",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix(task_id.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        self.bars.lock().unwrap().insert(task_id.to_string(), bar);
    }

    fn on_upload_progress(&self, task_id: &str, total_count: usize, uploaded_count: usize) {
        if let Some(bar) = self.bars.lock().unwrap().get(task_id) {
            bar.set_length(total_count as u64);
            bar.set_position(uploaded_count as u64);
        }
    }

    fn on_task_aborted(&self, task_id: &str, error: TaskErrorKind) {
        self.failures.fetch_add(1, Ordering::SeqCst);
        if let Some(bar) = self.take_bar(task_id) {
            bar.finish_and_clear();
        }
        let _ = self.multi.println(format!(
            "{} {}  {}",
            red("✗"),
            bold(task_id),
            red(error.as_str())
        ));
    }

    fn on_task_ended(&self, task_id: &str, _is_build: bool, output_path: &Path) {
        if let Some(bar) = self.take_bar(task_id) {
            bar.finish_and_clear();
        }
        let _ = self.multi.println(format!(
            "{} {}  {}",
            green("✓"),
            bold(task_id),
            dim(&output_path.display().to_string())
        ));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Upload local images of one document and rewrite a sibling copy
  imglift notes.md

  # Several documents at once (processed concurrently)
  imglift posts/a.md posts/b.md posts/c.md

  # A non-default hosting endpoint
  imglift --endpoint http://127.0.0.1:36677/upload notes.md

  # Disable the per-upload timeout (trusted local endpoint)
  imglift --no-upload-timeout notes.md

UPLOAD ENDPOINT:
  The endpoint must speak the PicGo upload protocol:
    request   POST {"list": ["<absolute image path>"]}
    response  {"success": true, "result": ["<remote url>"]}

  The original file is never modified; the rewritten copy is written next
  to it as "{name} - {unix timestamp}.{ext}".
"#;

/// Upload local Markdown images to a hosting endpoint and rewrite the links.
#[derive(Parser, Debug)]
#[command(
    name = "imglift",
    version,
    about = "Upload local Markdown images to a hosting endpoint and rewrite the links",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown files to process.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Upload endpoint URL.
    #[arg(long, env = "IMGLIFT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Per-upload timeout in seconds.
    #[arg(long, env = "IMGLIFT_UPLOAD_TIMEOUT", default_value_t = 30)]
    upload_timeout: u64,

    /// Disable the per-upload timeout entirely.
    #[arg(long, env = "IMGLIFT_NO_UPLOAD_TIMEOUT")]
    no_upload_timeout: bool,

    /// Disable the progress display.
    #[arg(long, env = "IMGLIFT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMGLIFT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "IMGLIFT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress display is active;
    // the bars provide all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let timeout = if cli.no_upload_timeout {
        None
    } else {
        Some(cli.upload_timeout)
    };

    let reporter = show_progress.then(CliReporter::new);

    let mut builder = UploadConfig::builder()
        .endpoint(cli.endpoint)
        .upload_timeout_secs(timeout);
    if let Some(ref r) = reporter {
        let sink: Arc<dyn TaskReporter> = r.clone();
        builder = builder.reporter(sink);
    }
    let config = builder.build()?;

    // ── Run ──────────────────────────────────────────────────────────────
    let tasks: Vec<FileTask> = cli
        .files
        .iter()
        .enumerate()
        .map(|(i, path)| FileTask::new(format!("file-{}", i + 1), path.clone()))
        .collect();

    process_files(&tasks, &config).await;

    if let Some(r) = reporter {
        let failures = r.failures();
        if failures > 0 {
            eprintln!(
                "{} {}/{} files failed",
                red("✘"),
                failures,
                tasks.len()
            );
            std::process::exit(1);
        }
        eprintln!("{} {} files processed", green("✔"), bold(&tasks.len().to_string()));
    }

    Ok(())
}
