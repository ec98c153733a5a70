//! Terminal output styling for changeset-report
//!
//! Status messages are styled with soft pastel colors; report lines are printed
//! verbatim so their own formatting (ANSI or Markdown) is left untouched.

use owo_colors::OwoColorize;

/// Print a success message with a green checkmark
pub fn success(message: &str) {
    // Pastel mint green: RGB(152, 225, 152)
    println!(
        "{} {}",
        "✓".truecolor(152, 225, 152).bold(),
        message.bright_white()
    );
}

/// Print a warning message with a yellow warning symbol
pub fn warning(message: &str) {
    // Pastel cream/yellow: RGB(255, 230, 160)
    eprintln!(
        "{} {}",
        "⚠".truecolor(255, 230, 160).bold(),
        message.bright_white()
    );
}

/// Print a report line as-is
pub fn line(text: &str) {
    println!("{}", text);
}
