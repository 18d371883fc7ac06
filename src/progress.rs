//! Progress reporting for long generation runs

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar that only redraws every `interval` steps
///
/// An interval of zero disables reporting altogether.
pub struct Progress {
    bar: Option<ProgressBar>,
    interval: usize,
    steps: usize,
}

impl Progress {
    /// Progress over `total` ranked voxels
    pub fn new(total: usize, interval: usize) -> Self {
        let bar = (interval > 0).then(|| {
            let pb = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {percent:>3}% {msg}")
            {
                pb.set_style(style.progress_chars("##-"));
            }
            pb
        });

        Self {
            bar,
            interval,
            steps: 0,
        }
    }

    /// Show the name of the running phase
    pub fn phase(&self, message: &'static str) {
        if let Some(pb) = &self.bar {
            pb.set_message(message);
        }
    }

    /// Count one step, redrawing at `position` once per interval
    pub fn step(&mut self, position: usize) {
        self.steps += 1;
        if let Some(pb) = &self.bar {
            if self.steps % self.interval == 0 {
                pb.set_position(position as u64);
            }
        }
    }

    /// Fill the bar and leave it on screen
    pub fn finish(&self, message: &'static str) {
        if let Some(pb) = &self.bar {
            pb.set_position(pb.length().unwrap_or(0));
            pb.finish_with_message(message);
        }
    }

    /// Whether anything is drawn
    pub fn is_enabled(&self) -> bool {
        self.bar.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_disables() {
        let mut progress = Progress::new(100, 0);
        assert!(!progress.is_enabled());
        progress.step(10);
        progress.finish("done");
    }

    #[test]
    fn test_enabled_counts_steps() {
        let mut progress = Progress::new(100, 3);
        assert!(progress.is_enabled());
        for i in 0..7 {
            progress.step(i);
        }
        assert_eq!(progress.steps, 7);
    }
}
