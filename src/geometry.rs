use winit::dpi::{LogicalPosition, LogicalSize, PhysicalSize};

/// A rectangle in the parent window, in logical pixels with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub position: LogicalPosition<f64>,
    pub size: LogicalSize<f64>,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            position: LogicalPosition::new(x, y),
            size: LogicalSize::new(width, height),
        }
    }

    /// Bounds covering a whole parent of the given size
    pub fn filling(size: LogicalSize<f64>) -> Self {
        Self {
            position: LogicalPosition::new(0.0, 0.0),
            size,
        }
    }

    /// Bounds covering a parent whose inner size is reported in physical pixels
    pub fn filling_physical(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        Self::filling(size.to_logical(scale_factor))
    }

    pub fn with_size(self, size: LogicalSize<f64>) -> Self {
        Self { size, ..self }
    }

    /// Distance from the parent's bottom edge to this rectangle's bottom edge.
    /// Used by views whose coordinate space grows upward.
    pub fn flipped_y(&self, parent_height: f64) -> f64 {
        parent_height - (self.position.y + self.size.height)
    }
}
