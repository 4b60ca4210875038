use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{msg:>10} [{wide_bar}] {pos}/{len}";

pub fn bar(len: usize, msg: &'static str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    match ProgressStyle::with_template(TEMPLATE) {
        Ok(style) => bar.set_style(style.progress_chars("=> ")),
        Err(error) => tracing::warn!(?error, "Invalid progress bar template"),
    }
    bar.set_message(msg);
    bar
}
