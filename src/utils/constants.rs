/// SwapWatch constants
///
/// Namespace key, file names, refresh cadence, and widget geometry.

/// Top-level JSON key this tool's settings nest under. The settings file may
/// carry sibling namespaces owned by other tools; writes preserve them.
pub const NAMESPACE_KEY: &str = "SwapWatch";

/// Settings file name, resolved next to the executable by default.
pub const SETTINGS_FILE_NAME: &str = "widget_settings.json";

/// Log file name, written beside the settings file.
pub const LOG_FILE_NAME: &str = "swapwatch.log";

/// Steady-state refresh cadence in seconds (best effort, not real time).
pub const REFRESH_INTERVAL_SECS: u64 = 1;

/// Floating widget geometry, in terminal cells.
pub const WIDGET_WIDTH: u16 = 46;
pub const WIDGET_HEIGHT: u16 = 5;
