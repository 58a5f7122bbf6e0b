use crossterm::style::Color;

/// Colors for the maze printout
#[derive(Debug, Clone)]
pub struct Theme {
    /// Default text color
    pub fg: Color,
    /// Grid border color
    pub border: Color,
    /// Start cell
    pub start: Color,
    /// Exit cell
    pub exit: Color,
    /// Cells on the solution path
    pub path: Color,
    /// Dead-end cells
    pub dead_end: Color,
    /// Question text
    pub question: Color,
    /// The correct answer in a choice list
    pub correct: Color,
    /// Secondary text
    pub info: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            start: Color::Rgb { r: 80, g: 180, b: 255 },
            exit: Color::Rgb { r: 90, g: 255, b: 130 },
            path: Color::Rgb { r: 255, g: 210, b: 100 },
            dead_end: Color::Rgb { r: 255, g: 90, b: 90 },
            question: Color::Rgb { r: 255, g: 255, b: 255 },
            correct: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
        }
    }
}
