//! Clipboard writes via the OSC 52 terminal escape.
//!
//! Works over SSH and inside tmux (with `set-clipboard on`) without a
//! system clipboard daemon.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::{self, Write};

pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

pub fn copy(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(osc52_sequence(text).as_bytes())?;
    stdout.flush()
}
