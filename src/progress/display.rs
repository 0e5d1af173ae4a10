//! Progress bar display management and coordination.
//!
//! The main bar counts completed files; each worker shows a spinner naming
//! the file it is fetching.

use crate::model::FileResult;
use crate::progress::StyleOptions;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};
use std::time::Duration;

/// Progress display manager shared by the download workers.
#[derive(Debug)]
pub struct ProgressDisplay {
    /// The multi-progress instance for coordinating multiple progress bars.
    multi: MultiProgress,
    /// The main progress bar for overall progress.
    main: ProgressBar,
    /// Style options for progress bars.
    style_options: StyleOptions,
}

impl ProgressDisplay {
    /// Create a new progress display manager for `total` files.
    pub fn new(style_options: StyleOptions, total: usize) -> Self {
        let multi = if style_options.is_enabled() {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        let main = multi.add(style_options.main().clone().to_progress_bar(total as u64));
        main.tick();

        Self {
            multi,
            main,
            style_options,
        }
    }

    /// Create a spinner for `file`.
    pub fn create_child(&self, file: &FileResult) -> ProgressBar {
        let pb = self
            .multi
            .add(self.style_options.child().clone().to_progress_bar(0));
        pb.set_message(format!("Fetching {}", file));
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    /// Increment the main progress bar by one.
    pub fn increment_main(&self) {
        self.main.inc(1);
    }

    /// Current position of the main progress bar.
    pub fn completed(&self) -> u64 {
        self.main.position()
    }

    /// Finish a child progress bar based on configuration.
    pub fn finish_child(&self, pb: ProgressBar) {
        if self.style_options.child().clear {
            pb.finish_and_clear();
        } else {
            pb.finish();
        }
    }

    /// Finish the progress display, clearing or keeping the main bar based on configuration.
    pub fn finish(&self) {
        if self.style_options.main().clear {
            self.main.finish_and_clear();
        } else {
            self.main.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProjectRef, RepositoryRef};

    #[test]
    fn test_hidden_display_counts_files() {
        let display = ProgressDisplay::new(StyleOptions::hidden(), 3);
        let file = FileResult::new(
            "org",
            ProjectRef::new("p", "proj"),
            RepositoryRef::new("r", "repo"),
            "/a.txt",
            "main",
            None,
        )
        .unwrap();

        let pb = display.create_child(&file);
        display.finish_child(pb);
        display.increment_main();
        display.increment_main();
        assert_eq!(display.completed(), 2);
        display.finish();
    }
}
