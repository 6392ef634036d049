//! Contour extraction: border chains of ink regions in a binary mask.
//!
//! Wraps Suzuki-Abe border following (`imageproc::contours::find_contours`)
//! and keeps the outer/hole classification and parent links it reports.
//! Two retrieval modes mirror what the feature extractors need:
//!
//! - [`Retrieval::External`]: top-level outer borders only, one per
//!   separate ink region. Used for size, spacing and slant measurements.
//! - [`Retrieval::Hierarchy`]: every border, including holes and regions
//!   nested inside holes. Used to find closed loops.
//!
//! Contours are transient: they are recomputed from a mask whenever
//! needed and never stored in a descriptor.

use image::GrayImage;
use imageproc::contours::BorderType;

use crate::types::{Point, Polyline};

/// Which borders to keep when tracing a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retrieval {
    /// Outer borders with no enclosing hole.
    #[default]
    External,
    /// All borders with parent links.
    Hierarchy,
}

/// Whether a contour bounds ink from the outside or a hole inside ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    /// Outer border of an ink region.
    Outer,
    /// Border of a background hole enclosed by ink.
    Hole,
}

/// Axis-aligned pixel extent, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Leftmost column.
    pub min_x: f64,
    /// Topmost row.
    pub min_y: f64,
    /// Rightmost column.
    pub max_x: f64,
    /// Bottom row.
    pub max_y: f64,
}

impl BoundingBox {
    /// Width in pixels, counting both edge columns.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x + 1.0
    }

    /// Height in pixels, counting both edge rows.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y + 1.0
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// A traced border chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point>,
    kind: BorderKind,
    parent: Option<usize>,
}

impl Contour {
    /// Create a top-level contour from raw parts.
    #[must_use]
    pub const fn new(points: Vec<Point>, kind: BorderKind) -> Self {
        Self {
            points,
            kind,
            parent: None,
        }
    }

    /// Attach the index of the enclosing border.
    #[must_use]
    pub fn with_parent(mut self, parent: Option<usize>) -> Self {
        self.parent = parent;
        self
    }

    /// Border pixels in tracing order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of border points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the contour has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Outer border or hole.
    #[must_use]
    pub const fn kind(&self) -> BorderKind {
        self.kind
    }

    /// Index of the enclosing border in the hierarchy it was extracted
    /// with, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Outer border not enclosed by anything.
    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        matches!(self.kind, BorderKind::Outer) && self.parent.is_none()
    }

    /// Enclosed area in square pixels (shoelace formula on the chain).
    #[must_use]
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x.mul_add(b.y, -(b.x * a.y))
            })
            .sum();
        twice.abs() / 2.0
    }

    /// Closed perimeter in pixels.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.as_polyline().arc_length(true)
    }

    /// Open arc length in pixels.
    #[must_use]
    pub fn arc_length(&self) -> f64 {
        self.as_polyline().arc_length(false)
    }

    /// Circularity `4π·area / perimeter²`: 1.0 for a disc, lower for
    /// elongated or ragged shapes. Zero when the perimeter vanishes.
    #[must_use]
    pub fn circularity(&self) -> f64 {
        let perimeter = self.perimeter();
        if perimeter <= 0.0 {
            return 0.0;
        }
        4.0 * std::f64::consts::PI * self.area() / (perimeter * perimeter)
    }

    /// Pixel extent of the chain, or `None` for an empty contour.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let init = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(self.points.iter().fold(init, |b, p| BoundingBox {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// The chain as a polyline.
    #[must_use]
    pub fn as_polyline(&self) -> Polyline {
        Polyline::new(self.points.clone())
    }

    /// Drop intermediate points on straight runs, keeping only the
    /// points where the chain changes direction.
    ///
    /// Closed-chain semantics: the first point is dropped too if it sits
    /// in the middle of a straight run through the wrap-around. Chains
    /// that would collapse entirely are returned unchanged.
    #[must_use]
    pub fn compressed(&self) -> Self {
        let n = self.points.len();
        if n < 3 {
            return self.clone();
        }
        let kept: Vec<Point> = (0..n)
            .filter(|&i| {
                let prev = self.points[(i + n - 1) % n];
                let cur = self.points[i];
                let next = self.points[(i + 1) % n];
                let (ax, ay) = (cur.x - prev.x, cur.y - prev.y);
                let (bx, by) = (next.x - cur.x, next.y - cur.y);
                ax.mul_add(by, -(ay * bx)).abs() > f64::EPSILON || ax.mul_add(bx, ay * by) < 0.0
            })
            .map(|i| self.points[i])
            .collect();
        if kept.len() < 2 {
            return self.clone();
        }
        Self::new(kept, self.kind).with_parent(self.parent)
    }
}

/// Trace the borders of ink regions in `mask`.
///
/// Any non-zero pixel counts as ink. Returns an empty list for a mask
/// without ink; callers decide whether that is an error.
#[must_use = "returns the traced contours"]
pub fn extract(mask: &GrayImage, retrieval: Retrieval) -> Vec<Contour> {
    let traced: Vec<imageproc::contours::Contour<u32>> = imageproc::contours::find_contours(mask);

    // Parent indices refer to positions in the full hierarchy, so it is
    // built unfiltered first.
    let hierarchy = traced.into_iter().map(|c| {
        let kind = match c.border_type {
            BorderType::Outer => BorderKind::Outer,
            BorderType::Hole => BorderKind::Hole,
        };
        let points = c
            .points
            .into_iter()
            .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
            .collect();
        Contour::new(points, kind).with_parent(c.parent)
    });

    match retrieval {
        Retrieval::External => hierarchy
            .filter(|c| c.is_top_level() && !c.is_empty())
            .collect(),
        Retrieval::Hierarchy => hierarchy.collect(),
    }
}

/// The contour with the largest enclosed area.
///
/// Ties keep the first contour in extraction order.
#[must_use]
pub fn largest(contours: &[Contour]) -> Option<&Contour> {
    contours.iter().fold(None, |best: Option<&Contour>, c| match best {
        Some(b) if b.area() >= c.area() => Some(b),
        _ => Some(c),
    })
}

/// Union bounding box of all contours.
#[must_use]
pub fn bounding_box(contours: &[Contour]) -> Option<BoundingBox> {
    contours
        .iter()
        .filter_map(Contour::bounding_box)
        .reduce(BoundingBox::union)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled_rect(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| {
            if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
                image::Luma([255])
            } else {
                image::Luma([0])
            }
        })
    }

    /// A square ring: ink frame with a background hole.
    fn ring() -> GrayImage {
        GrayImage::from_fn(30, 30, |x, y| {
            let outer = (5..25).contains(&x) && (5..25).contains(&y);
            let inner = (10..20).contains(&x) && (10..20).contains(&y);
            if outer && !inner {
                image::Luma([255])
            } else {
                image::Luma([0])
            }
        })
    }

    #[test]
    fn empty_mask_produces_no_contours() {
        let img = GrayImage::new(10, 10);
        assert!(extract(&img, Retrieval::External).is_empty());
        assert!(extract(&img, Retrieval::Hierarchy).is_empty());
    }

    #[test]
    fn rectangle_has_one_external_contour() {
        let img = filled_rect(20, 20, 5, 5, 15, 15);
        let contours = extract(&img, Retrieval::External);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].kind(), BorderKind::Outer);
        let bbox = contours[0].bounding_box().unwrap_or(BoundingBox {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        });
        assert!((bbox.width() - 10.0).abs() < f64::EPSILON);
        assert!((bbox.height() - 10.0).abs() < f64::EPSILON);
        // Border pixel centres enclose a 9x9 square.
        assert!((contours[0].area() - 81.0).abs() < 1e-9);
    }

    #[test]
    fn hierarchy_links_hole_to_its_outer_border() {
        let contours = extract(&ring(), Retrieval::Hierarchy);
        assert_eq!(contours.len(), 2);
        let hole = contours.iter().find(|c| c.kind() == BorderKind::Hole).unwrap();
        let parent = &contours[hole.parent().unwrap()];
        assert_eq!(parent.kind(), BorderKind::Outer);
        assert!(parent.is_top_level());
        assert!(!hole.is_top_level());
        assert_eq!(extract(&ring(), Retrieval::External).len(), 1);
    }

    #[test]
    fn largest_picks_max_area() {
        let mut img = filled_rect(40, 20, 2, 2, 6, 6);
        for y in 8..18 {
            for x in 20..35 {
                img.put_pixel(x, y, image::Luma([255]));
            }
        }
        let contours = extract(&img, Retrieval::External);
        assert_eq!(contours.len(), 2);
        let big = largest(&contours).map(Contour::area).unwrap_or_default();
        assert!((big - 14.0 * 9.0).abs() < 1e-9);
    }

    #[test]
    fn compressed_square_keeps_corners() {
        let img = filled_rect(20, 20, 5, 5, 15, 15);
        let contours = extract(&img, Retrieval::External);
        let compressed = contours[0].compressed();
        assert_eq!(compressed.len(), 4);
        assert!((compressed.area() - contours[0].area()).abs() < 1e-9);
    }

    #[test]
    fn circularity_of_square_is_pi_over_four() {
        let contour = Contour::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ],
            BorderKind::Outer,
        );
        assert!((contour.circularity() - std::f64::consts::FRAC_PI_4).abs() < 1e-9);
    }

    #[test]
    fn union_bounding_box_spans_all_contours() {
        let mut img = filled_rect(50, 30, 2, 3, 6, 8);
        img.put_pixel(40, 25, image::Luma([255]));
        let contours = extract(&img, Retrieval::External);
        let bbox = bounding_box(&contours);
        assert_eq!(
            bbox,
            Some(BoundingBox {
                min_x: 2.0,
                min_y: 3.0,
                max_x: 40.0,
                max_y: 25.0,
            })
        );
    }
}
