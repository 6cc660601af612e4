pub mod widget;

// The TUI is a single floating widget rendered over a dim backdrop:
// - Header: RAM hardware description, or live RAM usage when tracking is on
// - Body: swap usage with color-coded pressure alerts (>80% red, >60% yellow)
// - Footer: toggle indicators and the last refresh time
