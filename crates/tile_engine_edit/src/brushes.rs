//! Pixel sets for the drawing tools
//!
//! Everything here works in signed canvas coordinates and never touches a surface; callers
//! clip the points to the canvas while painting.

use std::collections::VecDeque;

/// Walks the pixels of a line segment with integer error accumulation (Bresenham), start and
/// end included.
#[derive(Clone, Debug)]
pub struct LinePoints {
    x: i32,
    y: i32,
    end: (i32, i32),
    dx: i32,
    dy: i32,
    step: (i32, i32),
    err: i32,
    done: bool,
}

impl Iterator for LinePoints {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = (self.x, self.y);
        if current == self.end {
            self.done = true;
            return Some(current);
        }

        let doubled = 2 * self.err;
        if doubled >= self.dy {
            self.err += self.dy;
            self.x += self.step.0;
        }
        if doubled <= self.dx {
            self.err += self.dx;
            self.y += self.step.1;
        }
        Some(current)
    }
}

pub fn bresenham_line(x0: i32, y0: i32, x1: i32, y1: i32) -> LinePoints {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    LinePoints {
        x: x0,
        y: y0,
        end: (x1, y1),
        dx,
        dy,
        step: (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 }),
        err: dx + dy,
        done: false,
    }
}

/// Rectangle spanned by two opposite corners given in any order. The outline visits every
/// border pixel exactly once, also for one pixel wide or high rectangles.
pub fn rectangle_points(x0: i32, y0: i32, x1: i32, y1: i32, filled: bool) -> Vec<(i32, i32)> {
    let (left, right) = (x0.min(x1), x0.max(x1));
    let (top, bottom) = (y0.min(y1), y0.max(y1));

    if filled {
        return (top..=bottom).flat_map(|y| (left..=right).map(move |x| (x, y))).collect();
    }

    let mut rows = vec![top];
    if bottom != top {
        rows.push(bottom);
    }
    let mut columns = vec![left];
    if right != left {
        columns.push(right);
    }

    let horizontal = rows.into_iter().flat_map(|y| (left..=right).map(move |x| (x, y)));
    let vertical = (top + 1..bottom).flat_map(|y| columns.iter().map(move |&x| (x, y)));
    horizontal.chain(vertical).collect()
}

/// 4-connected region around the start point whose pixels compare equal to it, in the order
/// they were reached. Empty if the start lies outside the `width × height` area.
pub fn flood_fill_points<T, F>(start_x: i32, start_y: i32, width: i32, height: i32, get_pixel: F) -> Vec<(i32, i32)>
where
    T: PartialEq,
    F: Fn(i32, i32) -> T,
{
    let inside = |x: i32, y: i32| (0..width).contains(&x) && (0..height).contains(&y);
    if !inside(start_x, start_y) {
        return Vec::new();
    }

    let slot = |x: i32, y: i32| y as usize * width as usize + x as usize;
    let mut visited = vec![false; width as usize * height as usize];
    let target = get_pixel(start_x, start_y);
    let mut region = Vec::new();
    let mut pending = VecDeque::from([(start_x, start_y)]);
    visited[slot(start_x, start_y)] = true;

    while let Some((x, y)) = pending.pop_front() {
        region.push((x, y));
        for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
            if !inside(nx, ny) || visited[slot(nx, ny)] {
                continue;
            }
            if get_pixel(nx, ny) == target {
                visited[slot(nx, ny)] = true;
                pending.push_back((nx, ny));
            }
        }
    }
    region
}
