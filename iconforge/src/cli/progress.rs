use crate::generator::Progress;
use std::cell::RefCell;
use std::io::IsTerminal;
use std::time::Duration;

pub enum ProgressBar {
    /// A pass over the size matrix
    Rasterize,

    /// Packing the iconset into a container
    Package,
}

impl ProgressBar {
    fn create_progressbar(&self, len: u64) -> indicatif::ProgressBar {
        match self {
            ProgressBar::Rasterize => {
                let progress = indicatif::ProgressBar::new(len);
                progress.set_style(
                    indicatif::ProgressStyle::default_bar()
                        .template("{spinner:.yellow} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} images")
                        .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
                        .progress_chars("=>-"),
                );
                progress.enable_steady_tick(Duration::from_millis(50));
                progress
            }
            ProgressBar::Package => {
                let progress = indicatif::ProgressBar::new_spinner();
                progress.set_style(
                    indicatif::ProgressStyle::default_spinner()
                        .template("{spinner:.green} [{elapsed_precise}] {msg}")
                        .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
                );
                progress.set_message("Packing .icns file");
                progress.enable_steady_tick(Duration::from_millis(50));
                progress
            }
        }
    }

    /// Create a callback that advances the progress bar by the given amount,
    /// or does nothing when not running interactively.
    pub fn new(&self, len: u64) -> Box<dyn Fn(u64)> {
        if !show_progress() {
            // No progress bar
            return Box::new(|_| {});
        }

        let progress = self.create_progressbar(len);
        Box::new(move |v| {
            if progress.position() + v >= len {
                progress.finish_and_clear();
            } else {
                progress.inc(v);
            }
        })
    }
}

/// Shows a bar while rasterizing and a spinner while packing. Each appears
/// only once its phase begins.
#[derive(Default)]
pub struct GenerateProgress {
    rasterize: RefCell<Option<Box<dyn Fn(u64)>>>,
    package: RefCell<Option<Box<dyn Fn(u64)>>>,
}

impl Progress for GenerateProgress {
    fn rasterizing(&self, count: usize) {
        *self.rasterize.borrow_mut() = Some(ProgressBar::Rasterize.new(count as u64));
    }

    fn rasterized(&self) {
        if let Some(tick) = self.rasterize.borrow().as_ref() {
            tick(1);
        }
    }

    fn packing(&self) {
        *self.package.borrow_mut() = Some(ProgressBar::Package.new(1));
    }

    fn packed(&self) {
        if let Some(tick) = self.package.borrow_mut().take() {
            tick(1);
        }
    }
}

fn show_progress() -> bool {
    std::io::stdout().is_terminal() && !std::env::var("CI").is_ok()
}
