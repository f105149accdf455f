//! Line-oriented surface for terminals and logs.

use std::io::{self, Write};

use crate::timeline::Page;

use super::surface::{DrawCommand, Surface};

/// Writes one line per surface call, prefixed with a tier label.
pub struct TextSurface {
    label: &'static str,
    out: Box<dyn Write>,
}

impl TextSurface {
    pub fn new(label: &'static str, out: Box<dyn Write>) -> Self {
        Self { label, out }
    }

    pub fn stdout(label: &'static str) -> Self {
        Self::new(label, Box::new(io::stdout()))
    }

    fn line(&mut self, text: String) {
        // Output errors (closed pipe) are not fatal to playback
        let _ = writeln!(self.out, "[{}] {}", self.label, text);
    }
}

/// One-line description of a draw command.
pub fn describe(command: &DrawCommand) -> String {
    match command {
        DrawCommand::Stroke {
            color,
            width,
            points,
        } => format!("stroke {} w={} ({} pts)", color, width, points.len()),
        DrawCommand::Erase { region } => format!(
            "erase {}x{} at ({}, {})",
            region.width, region.height, region.x, region.y
        ),
        DrawCommand::Text {
            text,
            position,
            font,
        } => format!(
            "text {:?} at ({}, {}) {} {}pt",
            text, position.x, position.y, font.family, font.size
        ),
        DrawCommand::PageMarker { page } => format!("page change -> {}", page),
    }
}

impl Surface for TextSurface {
    fn show_page(&mut self, page: &Page) {
        match &page.background {
            Some(background) => self.line(format!("show page {} ({})", page.index, background)),
            None => self.line(format!("show page {}", page.index)),
        }
    }

    fn clear(&mut self, page: usize) {
        self.line(format!("clear page {}", page));
    }

    fn draw(&mut self, page: usize, command: &DrawCommand) {
        self.line(format!("page {}: {}", page, describe(command)));
    }

    fn release(&mut self) {
        self.line("released".to_string());
        let _ = self.out.flush();
    }
}
