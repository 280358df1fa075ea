//! Output formatting utilities
//!
//! This module provides formatters for CLI output in both human-readable
//! and JSON formats. It also handles progress bars and colored output.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use progress::ProgressBar;

/// Output configuration derived from CLI flags and config defaults
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Color even when the terminal is not detected as a tty
    pub force_color: bool,
    /// Disable progress bar
    pub no_progress: bool,
    /// Suppress non-error output
    pub quiet: bool,
}

impl OutputConfig {
    /// Merge CLI flags with the `[defaults]` section of the config file
    ///
    /// Flags can only switch features off or JSON on; they never re-enable
    /// something the config file disabled. `--no-color` overrides `color = "always"`.
    pub fn merge(self, defaults: &jukebox_core::config::Defaults) -> Self {
        let no_color = self.no_color || defaults.color == "never";
        Self {
            json: self.json || defaults.output == "json",
            no_color,
            force_color: !no_color && (self.force_color || defaults.color == "always"),
            no_progress: self.no_progress || !defaults.progress,
            quiet: self.quiet,
        }
    }

    /// Override terminal color detection for stdout and stderr
    ///
    /// Left untouched in `auto` mode.
    pub fn apply_color_mode(&self) {
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        } else if self.force_color {
            console::set_colors_enabled(true);
            console::set_colors_enabled_stderr(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jukebox_core::config::Defaults;

    #[test]
    fn test_merge_with_defaults() {
        let defaults = Defaults {
            output: "json".into(),
            color: "never".into(),
            progress: false,
        };
        let merged = OutputConfig::default().merge(&defaults);
        assert!(merged.json);
        assert!(merged.no_color);
        assert!(merged.no_progress);
        assert!(!merged.quiet);
    }

    #[test]
    fn test_flags_win_over_human_defaults() {
        let flags = OutputConfig {
            json: true,
            quiet: true,
            ..Default::default()
        };
        let merged = flags.merge(&Defaults::default());
        assert!(merged.json);
        assert!(merged.quiet);
        assert!(!merged.no_color);
        assert!(!merged.force_color);
        assert!(!merged.no_progress);
    }

    #[test]
    fn test_color_always_forces_color() {
        let defaults = Defaults {
            color: "always".into(),
            ..Default::default()
        };
        let merged = OutputConfig::default().merge(&defaults);
        assert!(merged.force_color);
        assert!(!merged.no_color);
    }

    #[test]
    fn test_no_color_flag_beats_color_always() {
        let defaults = Defaults {
            color: "always".into(),
            ..Default::default()
        };
        let flags = OutputConfig {
            no_color: true,
            ..Default::default()
        };
        let merged = flags.merge(&defaults);
        assert!(merged.no_color);
        assert!(!merged.force_color);
    }
}
