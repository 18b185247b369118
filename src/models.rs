use image::RgbImage;
use imageproc::geometry::contour_area;
use imageproc::point::Point;

/// Nesting links of a contour inside the list it was extracted with.
/// `None` plays the role of "-1" in the usual parent/child tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hierarchy {
    pub parent: Option<usize>,
    pub first_child: Option<usize>,
}

impl Hierarchy {
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}

/// Closed boundary of a foreground region in a binary image
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
    pub hierarchy: Hierarchy,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>, hierarchy: Hierarchy) -> Self {
        Self { points, hierarchy }
    }

    /// Polygon area enclosed by the boundary points (shoelace formula).
    /// Single points and straight runs have zero area.
    pub fn area(&self) -> f64 {
        contour_area(&self.points)
    }

    /// Tightest upright rectangle containing every boundary point
    pub fn bounding_box(&self) -> BoundingBox {
        let Some(first) = self.points.first() else {
            return BoundingBox::default();
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        BoundingBox {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        }
    }
}

/// Integer rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f64 / self.height as f64
    }

    /// Center used for re-centering boxes, rounded down like the box arithmetic
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Box of the given size sharing this box's (integer) center
    pub fn recentered(&self, width: i32, height: i32) -> BoundingBox {
        let (cx, cy) = self.center();
        BoundingBox {
            x: cx - width / 2,
            y: cy - height / 2,
            width,
            height,
        }
    }

    /// True when the box is non-empty and lies inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x >= 0
            && self.y >= 0
            && self.right() as i64 <= width as i64
            && self.bottom() as i64 <= height as i64
    }

    /// Stricter variant that also keeps a one pixel gap to every image edge
    pub fn fits_strictly_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x > 0
            && self.y > 0
            && (self.right() as i64) < width as i64
            && (self.bottom() as i64) < height as i64
    }
}

/// Candidate digit glyph cropped out of the working image
#[derive(Debug, Clone)]
pub struct RegionOfInterest {
    pub image: RgbImage,
    /// Top-left corner, inclusive
    pub point1: (u32, u32),
    /// Bottom-right corner, exclusive
    pub point2: (u32, u32),
}

impl RegionOfInterest {
    pub fn width(&self) -> u32 {
        self.point2.0 - self.point1.0
    }

    pub fn height(&self) -> u32 {
        self.point2.1 - self.point1.1
    }

    pub fn center(&self) -> (u32, u32) {
        (
            (self.point1.0 + self.point2.0) / 2,
            (self.point1.1 + self.point2.1) / 2,
        )
    }
}
