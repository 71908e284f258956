/// Axis-aligned box described by its center and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Edges count as inside
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.left() && px <= self.right() && py >= self.bottom() && py <= self.top()
    }

    /// The four corners of the box
    pub fn corners(&self) -> [(f32, f32); 4] {
        [
            (self.right(), self.top()),
            (self.right(), self.bottom()),
            (self.left(), self.top()),
            (self.left(), self.bottom()),
        ]
    }

    /// Corner-sampling overlap test: true when any corner of `probe` lies
    /// inside this box. A probe that straddles the box with all four
    /// corners outside does not register.
    pub fn overlaps(&self, probe: &BoundingBox) -> bool {
        probe
            .corners()
            .iter()
            .any(|&(px, py)| self.contains(px, py))
    }
}
