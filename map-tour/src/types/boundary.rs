use egui::Color32;
use serde::{Deserialize, Deserializer};
use walkers::Position;

/// Base look of a boundary overlay.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundaryStyle {
    #[serde(deserialize_with = "hex_color")]
    pub color: Color32,
    #[serde(deserialize_with = "hex_color")]
    pub fill_color: Color32,
    pub weight: f32,
    pub opacity: f32,
    pub fill_opacity: f32,
}

/// How a boundary fades while the tour progresses: opacities drop
/// linearly by `*_delta` over the whole tour and never go below `*_floor`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoundaryFade {
    pub stroke_floor: f32,
    pub stroke_delta: f32,
    pub fill_floor: f32,
    pub fill_delta: f32,
}

impl Default for BoundaryFade {
    fn default() -> Self {
        Self {
            stroke_floor: 0.6,
            stroke_delta: 0.3,
            fill_floor: 0.1,
            fill_delta: 0.2,
        }
    }
}

impl BoundaryStyle {
    /// The live style at `progress`; colors and weight are unchanged.
    pub fn faded(&self, fade: &BoundaryFade, progress: f64) -> BoundaryStyle {
        let progress = progress.clamp(0.0, 1.0) as f32;
        BoundaryStyle {
            opacity: (self.opacity - progress * fade.stroke_delta).max(fade.stroke_floor),
            fill_opacity: (self.fill_opacity - progress * fade.fill_delta).max(fade.fill_floor),
            ..*self
        }
    }

    pub fn stroke(&self) -> egui::Stroke {
        egui::Stroke::new(self.weight, self.color.gamma_multiply(self.opacity))
    }

    pub fn fill(&self) -> Color32 {
        self.fill_color.gamma_multiply(self.fill_opacity)
    }
}

/// Parses `#RRGGBB` (the leading `#` is optional).
pub fn parse_hex_color(text: &str) -> Option<Color32> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn hex_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color32, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_hex_color(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{}'", text)))
}

/// A closed polygon ring in `[lon, lat]` order, with a triangulation of
/// its interior for filling.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryGeometry {
    ring: Vec<[f64; 2]>,
    triangles: Vec<[usize; 3]>,
}

impl BoundaryGeometry {
    /// Builds a geometry from raw ring coordinates.
    ///
    /// Consecutive duplicate points are dropped and the ring is closed if
    /// it is open. Returns `None` when fewer than three distinct points
    /// remain.
    pub fn from_ring(points: Vec<[f64; 2]>) -> Option<Self> {
        let mut ring: Vec<[f64; 2]> = Vec::with_capacity(points.len() + 1);
        for point in points {
            if !point[0].is_finite() || !point[1].is_finite() {
                return None;
            }
            if ring.last() != Some(&point) {
                ring.push(point);
            }
        }

        let open_len = if ring.len() > 1 && ring.first() == ring.last() {
            ring.len() - 1
        } else {
            ring.len()
        };
        if open_len < 3 {
            return None;
        }
        if ring.first() != ring.last() {
            ring.push(ring[0]);
        }

        let triangles = triangulate(&ring[..open_len]);
        Some(Self { ring, triangles })
    }

    /// Number of points in the closed ring.
    pub fn point_count(&self) -> usize {
        self.ring.len()
    }

    pub fn ring(&self) -> &[[f64; 2]] {
        &self.ring
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.ring
            .iter()
            .map(|[lon, lat]| Position::from_lat_lon(*lat, *lon))
    }

    /// Triangles over the open ring, as indices into `ring()`.
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }
}

fn cross(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

fn inside_triangle(p: [f64; 2], a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

/// Ear clipping over a simple polygon given without its closing point.
fn triangulate(points: &[[f64; 2]]) -> Vec<[usize; 3]> {
    let mut remaining: Vec<usize> = (0..points.len()).collect();

    let doubled_area: f64 = (0..points.len())
        .map(|i| {
            let [x0, y0] = points[i];
            let [x1, y1] = points[(i + 1) % points.len()];
            x0 * y1 - x1 * y0
        })
        .sum();
    if doubled_area < 0.0 {
        remaining.reverse();
    }

    let mut triangles = Vec::with_capacity(points.len().saturating_sub(2));
    while remaining.len() > 3 {
        let m = remaining.len();
        let ear = (0..m).find(|&i| {
            let (a, b, c) = (
                remaining[(i + m - 1) % m],
                remaining[i],
                remaining[(i + 1) % m],
            );
            let (pa, pb, pc) = (points[a], points[b], points[c]);
            if cross(pa, pb, pc) <= 0.0 {
                return false;
            }
            !remaining
                .iter()
                .filter(|&&j| j != a && j != b && j != c)
                .any(|&j| {
                    let p = points[j];
                    p != pa && p != pb && p != pc && inside_triangle(p, pa, pb, pc)
                })
        });

        match ear {
            Some(i) => {
                triangles.push([
                    remaining[(i + m - 1) % m],
                    remaining[i],
                    remaining[(i + 1) % m],
                ]);
                remaining.remove(i);
            }
            None => {
                // Collinear vertices are never ears; drop one and retry.
                let flat = (0..m).find(|&i| {
                    let (a, b, c) = (
                        remaining[(i + m - 1) % m],
                        remaining[i],
                        remaining[(i + 1) % m],
                    );
                    cross(points[a], points[b], points[c]).abs() < f64::EPSILON
                });
                match flat {
                    Some(i) => {
                        remaining.remove(i);
                    }
                    None => break,
                }
            }
        }
    }

    if let [a, b, c] = remaining[..] {
        if cross(points[a], points[b], points[c]) != 0.0 {
            triangles.push([a, b, c]);
        }
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hackney_style() -> BoundaryStyle {
        BoundaryStyle {
            color: Color32::from_rgb(0x98, 0xD8, 0xC8),
            fill_color: Color32::from_rgb(0x98, 0xD8, 0xC8),
            weight: 2.0,
            opacity: 0.9,
            fill_opacity: 0.6,
        }
    }

    fn triangle_area(ring: &[[f64; 2]], [a, b, c]: [usize; 3]) -> f64 {
        cross(ring[a], ring[b], ring[c]).abs() / 2.0
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#DC2626"), Some(Color32::from_rgb(0xDC, 0x26, 0x26)));
        assert_eq!(parse_hex_color("98d8c8"), Some(Color32::from_rgb(0x98, 0xD8, 0xC8)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
    }

    #[test]
    fn fade_is_non_increasing_and_floored() {
        let style = hackney_style();
        let fade = BoundaryFade::default();
        let mut previous = style.faded(&fade, 0.0);
        assert!((previous.opacity - 0.9).abs() < 1e-6);
        assert!((previous.fill_opacity - 0.6).abs() < 1e-6);

        for step in 1..=100 {
            let live = style.faded(&fade, step as f64 / 100.0);
            assert!(live.opacity <= previous.opacity);
            assert!(live.fill_opacity <= previous.fill_opacity);
            assert!(live.opacity >= fade.stroke_floor);
            assert!(live.fill_opacity >= fade.fill_floor);
            assert_eq!(live.color, style.color);
            previous = live;
        }
    }

    #[test]
    fn fade_floor_wins_over_base() {
        let mut style = hackney_style();
        style.opacity = 0.2;
        let live = style.faded(&BoundaryFade::default(), 0.0);
        assert!((live.opacity - 0.6).abs() < 1e-6);
    }

    #[test]
    fn ring_is_closed_and_deduplicated() {
        let geometry = BoundaryGeometry::from_ring(vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
        ])
        .unwrap();
        assert_eq!(geometry.point_count(), 5);
        assert_eq!(geometry.ring().first(), geometry.ring().last());
        assert_eq!(geometry.triangles().len(), 2);
    }

    #[test]
    fn degenerate_rings_are_rejected() {
        assert!(BoundaryGeometry::from_ring(vec![]).is_none());
        assert!(BoundaryGeometry::from_ring(vec![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]).is_none());
        assert!(BoundaryGeometry::from_ring(vec![[0.0, 0.0], [f64::NAN, 1.0], [1.0, 0.0]]).is_none());
    }

    #[test]
    fn concave_ring_triangulation_covers_its_area() {
        // An L shape, clockwise, area 3.
        let ring = vec![
            [0.0, 0.0],
            [0.0, 2.0],
            [1.0, 2.0],
            [1.0, 1.0],
            [2.0, 1.0],
            [2.0, 0.0],
            [0.0, 0.0],
        ];
        let geometry = BoundaryGeometry::from_ring(ring).unwrap();
        assert_eq!(geometry.triangles().len(), 4);
        let area: f64 = geometry
            .triangles()
            .iter()
            .map(|t| triangle_area(geometry.ring(), *t))
            .sum();
        assert!((area - 3.0).abs() < 1e-9);
    }
}
