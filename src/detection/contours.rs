use image::GrayImage;
use imageproc::contours::{BorderType, find_contours as trace_borders};
use imageproc::point::Point;
use crate::models::{Contour, Hierarchy};

/// Copy of `binary` inside a one pixel background frame.
/// imageproc only opens an outer border at `x > 0`, so a component in
/// column 0 would otherwise be traced as a parentless hole.
fn with_background_frame(binary: &GrayImage) -> GrayImage {
    let mut framed = GrayImage::new(binary.width() + 2, binary.height() + 2);
    image::imageops::replace(&mut framed, binary, 1, 1);
    framed
}

/// Find every border in a binary image, with a two-level hierarchy.
///
/// Outer borders are always top level and hole borders hang off the outer
/// border that encloses them. A blob sitting inside a hole therefore starts a
/// new top-level component instead of nesting further. No point of a border is
/// dropped, and components touching the image edge get a proper outer border.
pub fn find_contours(binary: &GrayImage) -> Vec<Contour> {
    let borders = trace_borders::<i32>(&with_background_frame(binary));

    let parents: Vec<Option<usize>> = borders
        .iter()
        .map(|border| match border.border_type {
            BorderType::Outer => None,
            BorderType::Hole => border.parent,
        })
        .collect();

    let mut first_child: Vec<Option<usize>> = vec![None; borders.len()];
    for (idx, parent) in parents.iter().enumerate() {
        if let Some(p) = *parent {
            if first_child[p].is_none() {
                first_child[p] = Some(idx);
            }
        }
    }

    borders
        .into_iter()
        .zip(parents.into_iter().zip(first_child))
        .map(|(border, (parent, first_child))| {
            let points = border
                .points
                .into_iter()
                .map(|p| Point::new(p.x - 1, p.y - 1))
                .collect();
            Contour::new(points, Hierarchy { parent, first_child })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IsolatorConfig;
    use crate::detection::candidates::CandidateFilter;
    use crate::models::BoundingBox;
    use image::Luma;

    fn fill(img: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
    }

    #[test]
    fn empty_image_has_no_contours() {
        let img = GrayImage::new(32, 32);
        assert!(find_contours(&img).is_empty());
    }

    #[test]
    fn ring_square_and_island_hierarchy() {
        let mut img = GrayImage::new(30, 30);
        // Ring 2..=11 with hole 4..=9
        fill(&mut img, 2, 2, 11, 11);
        for y in 4..=9 {
            for x in 4..=9 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        // Island inside the hole
        fill(&mut img, 6, 6, 7, 7);
        // Solid square elsewhere
        fill(&mut img, 16, 16, 20, 20);

        let contours = find_contours(&img);
        assert_eq!(contours.len(), 4);

        let ring = &contours[0];
        assert_eq!(ring.hierarchy, Hierarchy { parent: None, first_child: Some(1) });
        assert_eq!(ring.bounding_box().width, 10);

        let hole = &contours[1];
        assert_eq!(hole.hierarchy, Hierarchy { parent: Some(0), first_child: None });

        let island = &contours[2];
        assert!(island.hierarchy.is_top_level());
        assert!(!island.hierarchy.has_children());

        let square = &contours[3];
        assert_eq!(square.hierarchy, Hierarchy::default());
        assert_eq!(square.area(), 16.0);
    }

    #[test]
    fn ring_in_first_column_keeps_its_hole() {
        let mut img = GrayImage::new(60, 70);
        // Ring x 0..=19, y 10..=49 with hole x 3..=16, y 13..=46
        fill(&mut img, 0, 10, 19, 49);
        for y in 13..=46 {
            for x in 3..=16 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        // Island inside the hole
        fill(&mut img, 6, 18, 13, 41);

        let contours = find_contours(&img);
        assert_eq!(contours.len(), 3);

        let ring = &contours[0];
        assert_eq!(ring.hierarchy, Hierarchy { parent: None, first_child: Some(1) });
        assert_eq!(ring.bounding_box(), BoundingBox::new(0, 10, 20, 40));

        let hole = &contours[1];
        assert_eq!(hole.hierarchy, Hierarchy { parent: Some(0), first_child: None });
        assert_eq!(hole.bounding_box(), BoundingBox::new(2, 12, 16, 36));

        let island = &contours[2];
        assert_eq!(island.hierarchy, Hierarchy::default());

        // The ring itself fails the margin rule, its hole is a valid candidate.
        let kept = CandidateFilter::new(IsolatorConfig::default()).filter(&contours, &img);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].bounding_box(), BoundingBox::new(2, 12, 16, 36));
    }

    #[test]
    fn points_are_in_image_coordinates() {
        let mut img = GrayImage::new(10, 10);
        fill(&mut img, 0, 0, 3, 3);
        let contours = find_contours(&img);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].bounding_box(), BoundingBox::new(0, 0, 4, 4));
        assert!(contours[0].points.iter().all(|p| p.x >= 0 && p.y >= 0));
    }

    #[test]
    fn hierarchy_indices_stay_in_range() {
        let mut img = GrayImage::new(40, 20);
        fill(&mut img, 1, 1, 10, 10);
        fill(&mut img, 20, 2, 30, 15);
        img.put_pixel(25, 8, Luma([0]));

        let contours = find_contours(&img);
        for contour in &contours {
            for idx in [contour.hierarchy.parent, contour.hierarchy.first_child]
                .into_iter()
                .flatten()
            {
                assert!(idx < contours.len());
            }
        }
    }
}
