//! Connected-region extraction from a binary mask.
//!
//! Regions are grown with an explicit stack over 8-connected foreground
//! pixels, so large walnuts never recurse. Regions of 10 pixels or fewer are
//! noise and never reported.

use super::segmenter::FOREGROUND;
use image::GrayImage;

const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// One 8-connected foreground region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    points: Vec<(u32, u32)>,
    min_x: u32,
    max_x: u32,
    min_y: u32,
    max_y: u32,
}

impl Region {
    fn seed(x: u32, y: u32) -> Self {
        Self {
            points: Vec::new(),
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    fn add(&mut self, x: u32, y: u32) {
        self.points.push((x, y));
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    pub fn points(&self) -> &[(u32, u32)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(min_x, min_y, max_x, max_y)`
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// Area of the axis-aligned box spanned by the extreme coordinates
    pub fn bbox_area(&self) -> u64 {
        (self.max_x - self.min_x) as u64 * (self.max_y - self.min_y) as u64
    }
}

/// Finds the walnut as the largest plausible foreground region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContourExtractor {
    min_contour_size: u64,
}

impl ContourExtractor {
    /// Regions with this many points or fewer are discarded
    pub const NOISE_POINTS: usize = 10;

    pub fn new(min_contour_size: u64) -> Self {
        Self { min_contour_size }
    }

    /// All regions above the noise floor, in row-major seed order
    pub fn regions(&self, mask: &GrayImage) -> Vec<Region> {
        let (width, height) = mask.dimensions();
        let mut visited = vec![false; width as usize * height as usize];
        let mut regions = Vec::new();

        for y in 0..height {
            for x in 0..width {
                let index = y as usize * width as usize + x as usize;
                if visited[index] || mask.get_pixel(x, y)[0] != FOREGROUND {
                    continue;
                }

                let region = flood_fill(mask, &mut visited, x, y);
                if region.len() > Self::NOISE_POINTS {
                    regions.push(region);
                }
            }
        }

        regions
    }

    /// Region with the largest bounding-box area (first wins on ties), or
    /// `None` when nothing reaches `min_contour_size`
    pub fn largest_region(&self, mask: &GrayImage) -> Option<Region> {
        let mut best: Option<Region> = None;
        for region in self.regions(mask) {
            let larger = best
                .as_ref()
                .map_or(true, |current| region.bbox_area() > current.bbox_area());
            if larger {
                best = Some(region);
            }
        }

        best.filter(|region| region.bbox_area() >= self.min_contour_size)
    }
}

impl Default for ContourExtractor {
    fn default() -> Self {
        Self::new(100)
    }
}

fn flood_fill(mask: &GrayImage, visited: &mut [bool], start_x: u32, start_y: u32) -> Region {
    let (width, height) = mask.dimensions();
    let index = |x: u32, y: u32| y as usize * width as usize + x as usize;

    let mut region = Region::seed(start_x, start_y);
    let mut stack = vec![(start_x, start_y)];
    visited[index(start_x, start_y)] = true;

    while let Some((x, y)) = stack.pop() {
        region.add(x, y);

        for (dx, dy) in NEIGHBOURS {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                continue;
            }

            let (nx, ny) = (nx as u32, ny as u32);
            let neighbour = index(nx, ny);
            if !visited[neighbour] && mask.get_pixel(nx, ny)[0] == FOREGROUND {
                visited[neighbour] = true;
                stack.push((nx, ny));
            }
        }
    }

    region
}
