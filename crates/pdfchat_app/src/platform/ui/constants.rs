use std::time::Duration;

use ratatui::style::Color;

/// How long the startup notice stays up without a key press.
pub const NOTICE_TIMEOUT: Duration = Duration::from_secs(5);
/// Poll interval of the terminal loop; also the redraw throttle.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(75);

pub const NOTICE_TITLE: &str = " ⚠️ Local LLM Required ";
pub const NOTICE_BODY: &[&str] = &[
    "This client needs the PDF chat backend and a local LLM",
    "(Large Language Model) running on this machine.",
    "",
    "To use it:",
    "  1. Clone the backend repository",
    "  2. Set up a local LLM server",
    "  3. Start the backend (default http://localhost:8000)",
    "",
    "This message closes in 5 seconds, or press any key.",
];

pub const ACCENT: Color = Color::Cyan;
pub const USER: Color = Color::Green;
pub const BOT: Color = Color::LightBlue;
pub const MUTED: Color = Color::DarkGray;
pub const WARN: Color = Color::Yellow;
pub const ERROR: Color = Color::Red;
pub const CODE_BG: Color = Color::Rgb(40, 40, 48);
