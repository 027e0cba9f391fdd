use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for a series of create requests.
pub fn create_progress(len: u64, message: String) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{msg} [{bar:30}] {pos}/{len}")
        .map(|s| s.progress_chars("=> "))
    {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar
}
