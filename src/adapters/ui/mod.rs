//! UI adapters: startup banner and the inquire-based interaction loop.

pub mod banner;
pub mod tui;

pub use tui::TuiInputPort;

/// Prints the welcome banner. Call once at startup (in main after tracing init).
pub fn init_ui() {
    banner::print_welcome();
}
