use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::{fmt::Write, time::Duration};

use crate::Verbosity;

const PROGRESS_CHARS: &str = "━━";

const PAGE_TEMPLATE: &str = "{spinner:.green.bold} {elapsed_precise:.bold} {wide_bar:.green/white.dim} {percent:.bold}  {pos:.green} ({msg:.bold.blue} | eta. {eta:.blue})";

/// Builds the bar that tracks the posts of a single fetched page.
///
/// Quiet runs get a hidden bar so callers never need to branch on verbosity.
pub fn page_bar(len: u64, message: String, verbosity: Verbosity) -> ProgressBar {
    if verbosity == Verbosity::Quiet {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len)
        .with_style(master_progress_style())
        .with_message(message);
    bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(60));
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn master_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(PAGE_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("pos", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{}/{}", state.pos(), state.len().unwrap_or_default());
        })
        .with_key("percent", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{:>3.0}%", state.fraction() * 100_f32);
        })
        .progress_chars(PROGRESS_CHARS)
}
