//! Vector shapes and their G-code emission.
//!
//! Every shape carries a [`CutStyle`] with its cutting height, optional
//! feed/power overrides, and fill settings. Emission follows a fixed
//! protocol: identify the shape in a comment, travel to its first point,
//! plunge, cut the body with the laser on, then switch the laser off and
//! restore document power.
//!
//! Angles are degrees everywhere. Coordinates and lengths are millimeters.

use crate::document::EmitContext;
use crate::error::DesignError;
use crate::glyphs::{self, Stroke, GLYPH_HEIGHT};
use std::fmt;
use tracing::debug;

/// A 2D point in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Rotates `point` around `center` by `angle_deg` degrees counterclockwise.
pub fn rotate_point(point: Point, center: Point, angle_deg: f64) -> Point {
    if angle_deg.abs() < 1e-6 {
        return point;
    }
    let rad = angle_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

/// Rotates a direction vector by `angle_deg` degrees.
fn rotate_vec(vx: f64, vy: f64, angle_deg: f64) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    (vx * cos - vy * sin, vx * sin + vy * cos)
}

/// Per-shape cutting parameters.
///
/// `z` is always set at construction so a shape can never be emitted
/// without a cutting height. Feed and power are optional overrides; when
/// unset the document values apply for the duration of the shape.
#[derive(Debug, Clone)]
pub struct CutStyle {
    z: f64,
    feed: Option<f64>,
    power: Option<f64>,
    filled: bool,
    passes: u32,
    stepdown: Option<f64>,
    /// Comment emitted before the shape body.
    pub header: Option<String>,
    /// Comment emitted after the shape body.
    pub footer: Option<String>,
}

impl CutStyle {
    pub fn new(z: f64) -> Self {
        Self {
            z,
            feed: None,
            power: None,
            filled: false,
            passes: 1,
            stepdown: None,
            header: None,
            footer: None,
        }
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn set_z(&mut self, z: f64) {
        self.z = z;
    }

    pub fn feed(&self) -> Option<f64> {
        self.feed
    }

    pub fn set_feed(&mut self, feed: f64) -> Result<(), DesignError> {
        if feed <= 0.0 {
            return Err(DesignError::InvalidFeed { value: feed });
        }
        self.feed = Some(feed);
        Ok(())
    }

    pub fn power(&self) -> Option<f64> {
        self.power
    }

    pub fn set_power(&mut self, power: f64) -> Result<(), DesignError> {
        if !(0.0..=100.0).contains(&power) {
            return Err(DesignError::InvalidPower { value: power });
        }
        self.power = Some(power);
        Ok(())
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Marks the shape for filling. The flag is one-way: once a fill has
    /// been requested it cannot be cleared, because fill lines may
    /// already have been derived from the shape.
    pub fn set_filled(&mut self, filled: bool) -> Result<(), DesignError> {
        if self.filled && !filled {
            return Err(DesignError::CannotUnfill);
        }
        self.filled = filled;
        Ok(())
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn set_passes(&mut self, passes: u32) -> Result<(), DesignError> {
        if passes == 0 {
            return Err(DesignError::InvalidPasses { value: passes });
        }
        self.passes = passes;
        Ok(())
    }

    pub fn stepdown(&self) -> Option<f64> {
        self.stepdown
    }

    /// Z drop applied between repeated cutting passes.
    pub fn set_stepdown(&mut self, stepdown: f64) -> Result<(), DesignError> {
        if stepdown <= 0.0 {
            return Err(DesignError::InvalidDimension {
                name: "stepdown",
                value: stepdown,
            });
        }
        self.stepdown = Some(stepdown);
        Ok(())
    }
}

/// A straight cut of a given length and direction from a start point.
#[derive(Debug, Clone)]
pub struct Line {
    pub x: f64,
    pub y: f64,
    length: f64,
    rotation: f64,
    pub style: CutStyle,
}

impl Line {
    pub fn new(x: f64, y: f64, z: f64, length: f64, rotation: f64) -> Result<Self, DesignError> {
        if length <= 0.0 {
            return Err(DesignError::InvalidDimension {
                name: "length",
                value: length,
            });
        }
        Ok(Self {
            x,
            y,
            length,
            rotation,
            style: CutStyle::new(z),
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn set_length(&mut self, length: f64) -> Result<(), DesignError> {
        if length <= 0.0 {
            return Err(DesignError::InvalidDimension {
                name: "length",
                value: length,
            });
        }
        self.length = length;
        Ok(())
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn start(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn end(&self) -> Point {
        let (dx, dy) = rotate_vec(self.length, 0.0, self.rotation);
        Point::new(self.x + dx, self.y + dy)
    }

    /// Swaps start and end, keeping the same segment.
    pub fn reverse(&mut self) {
        let end = self.end();
        self.x = end.x;
        self.y = end.y;
        self.rotation = (self.rotation + 180.0).rem_euclid(360.0);
    }
}

/// An open chain of straight cuts.
#[derive(Debug, Clone)]
pub struct PolyLine {
    points: Vec<Point>,
    pub style: CutStyle,
}

impl PolyLine {
    pub fn new(points: Vec<Point>, z: f64) -> Result<Self, DesignError> {
        if points.len() < 2 {
            return Err(DesignError::TooFewPoints {
                shape: "PolyLine",
                needed: 2,
                got: points.len(),
            });
        }
        Ok(Self {
            points,
            style: CutStyle::new(z),
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }
}

/// An axis-or-rotated rectangle, addressed by its center.
#[derive(Debug, Clone)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    width: f64,
    height: f64,
    rotation: f64,
    start_corner: usize,
    pub style: CutStyle,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, z: f64, width: f64, height: f64) -> Result<Self, DesignError> {
        if width <= 0.0 {
            return Err(DesignError::InvalidDimension {
                name: "width",
                value: width,
            });
        }
        if height <= 0.0 {
            return Err(DesignError::InvalidDimension {
                name: "height",
                value: height,
            });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
            start_corner: 0,
            style: CutStyle::new(z),
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_width(&mut self, width: f64) -> Result<(), DesignError> {
        if width <= 0.0 {
            return Err(DesignError::InvalidDimension {
                name: "width",
                value: width,
            });
        }
        self.width = width;
        Ok(())
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_height(&mut self, height: f64) -> Result<(), DesignError> {
        if height <= 0.0 {
            return Err(DesignError::InvalidDimension {
                name: "height",
                value: height,
            });
        }
        self.height = height;
        Ok(())
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }

    /// The four corners in cutting order, starting at the current start
    /// corner. At zero rotation with the default start corner the first
    /// point is the lower-left corner.
    pub fn corners(&self) -> [Point; 4] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        let base = [
            Point::new(-hw, -hh),
            Point::new(-hw, hh),
            Point::new(hw, hh),
            Point::new(hw, -hh),
        ];
        let mut out = [Point::new(0.0, 0.0); 4];
        for (k, slot) in out.iter_mut().enumerate() {
            let local = base[(self.start_corner + k) % 4];
            let (dx, dy) = rotate_vec(local.x, local.y, self.rotation);
            *slot = Point::new(self.x + dx, self.y + dy);
        }
        out
    }

    fn roll_to_nearest(&mut self, reference: Point) {
        let corners = self.corners();
        let mut best = 0;
        let mut best_d = f64::INFINITY;
        for (k, corner) in corners.iter().enumerate() {
            let d = corner.distance_to(&reference);
            if d < best_d {
                best_d = d;
                best = k;
            }
        }
        self.start_corner = (self.start_corner + best) % 4;
    }

    /// Horizontal hatch lines covering the interior, inset by one
    /// stepover from every edge and following the rectangle's rotation.
    fn fill_lines(&self, stepover: f64) -> Result<Vec<Shape>, DesignError> {
        if stepover <= 0.0 {
            return Err(DesignError::InvalidStepover { value: stepover });
        }
        let count = ((self.height - stepover) / stepover).round() as i64;
        let length = self.width - 2.0 * stepover;
        if count <= 0 || length <= 0.0 {
            return Ok(Vec::new());
        }

        let corner = self.corners()[0];
        let (sx, sy) = rotate_vec(stepover, stepover, self.rotation);
        let (dx, dy) = rotate_vec(0.0, stepover, self.rotation);
        let mut x = corner.x + sx;
        let mut y = corner.y + sy;

        let mut lines = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mut line = Line::new(x, y, self.style.z(), length, self.rotation)?;
            line.style.feed = self.style.feed;
            line.style.power = self.style.power;
            lines.push(Shape::Line(line));
            x += dx;
            y += dy;
        }
        Ok(lines)
    }
}

/// A closed polygon over at least three vertices.
#[derive(Debug, Clone)]
pub struct Polygon {
    points: Vec<Point>,
    pub style: CutStyle,
}

impl Polygon {
    pub fn new(points: Vec<Point>, z: f64) -> Result<Self, DesignError> {
        if points.len() < 3 {
            return Err(DesignError::TooFewPoints {
                shape: "Polygon",
                needed: 3,
                got: points.len(),
            });
        }
        Ok(Self {
            points,
            style: CutStyle::new(z),
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Rotates the vertex order so cutting starts at the vertex nearest
    /// the reference point. The cycle itself is unchanged.
    fn roll_to_nearest(&mut self, reference: Point) {
        let mut best = 0;
        let mut best_d = f64::INFINITY;
        for (k, point) in self.points.iter().enumerate() {
            let d = point.distance_to(&reference);
            if d < best_d {
                best_d = d;
                best = k;
            }
        }
        self.points.rotate_left(best);
    }
}

/// A full circle cut as a single G2 arc.
#[derive(Debug, Clone)]
pub struct Circle {
    x: f64,
    y: f64,
    radius: f64,
    start_angle: f64,
    pub style: CutStyle,
}

impl Circle {
    /// The cut starts at the top of the circle by default.
    pub fn new(x: f64, y: f64, z: f64, radius: f64) -> Result<Self, DesignError> {
        if radius <= 0.0 {
            return Err(DesignError::InvalidDimension {
                name: "radius",
                value: radius,
            });
        }
        Ok(Self {
            x,
            y,
            radius,
            start_angle: 90.0,
            style: CutStyle::new(z),
        })
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_center(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<(), DesignError> {
        if radius <= 0.0 {
            return Err(DesignError::InvalidDimension {
                name: "radius",
                value: radius,
            });
        }
        self.radius = radius;
        Ok(())
    }

    /// Where the arc begins and ends.
    pub fn start_point(&self) -> Point {
        let rad = self.start_angle.to_radians();
        Point::new(
            self.x + self.radius * rad.cos(),
            self.y + self.radius * rad.sin(),
        )
    }

    /// Retargets the arc start to the point on the circle nearest the
    /// reference. A reference at the exact center leaves the start alone.
    pub fn retarget_start(&mut self, reference: Point) {
        let dx = reference.x - self.x;
        let dy = reference.y - self.y;
        if dx.abs() < 1e-9 && dy.abs() < 1e-9 {
            return;
        }
        self.start_angle = dy.atan2(dx).to_degrees();
    }

    /// Full-circle clockwise arc: end equals start, I/J point from the
    /// start back to the center.
    fn arc_command(&self) -> String {
        let start = self.start_point();
        format!(
            "G2 X{:.3} Y{:.3} I{:.3} J{:.3}",
            start.x,
            start.y,
            self.x - start.x,
            self.y - start.y
        )
    }

    /// Horizontal chords covering the interior. A center line spans the
    /// diameter inset by one stepover; chord pairs mirror above and
    /// below it, spaced so adjacent chords are one stepover apart at the
    /// rim.
    fn fill_lines(&self, stepover: f64) -> Result<Vec<Shape>, DesignError> {
        if stepover <= 0.0 {
            return Err(DesignError::InvalidStepover { value: stepover });
        }
        let count = ((self.radius - stepover) / stepover).round() as i64;
        let mut lines = Vec::new();

        let center_len = 2.0 * (self.radius - stepover);
        if center_len > 0.0 {
            let mut line = Line::new(
                self.x - self.radius + stepover,
                self.y,
                self.style.z(),
                center_len,
                0.0,
            )?;
            line.style.feed = self.style.feed;
            line.style.power = self.style.power;
            lines.push(Shape::Line(line));
        }

        let mut theta: f64 = 0.0;
        for _ in 0..count {
            let next_sin = stepover / self.radius + theta.sin();
            if next_sin >= 1.0 {
                break;
            }
            theta = next_sin.asin();
            let half = self.radius * theta.cos();
            let rise = self.radius * theta.sin();
            let length = 2.0 * (half - stepover);
            if length <= 0.0 {
                break;
            }
            let x0 = self.x - half + stepover;
            for y in [self.y + rise, self.y - rise] {
                let mut line = Line::new(x0, y, self.style.z(), length, 0.0)?;
                line.style.feed = self.style.feed;
                line.style.power = self.style.power;
                lines.push(Shape::Line(line));
            }
        }
        Ok(lines)
    }
}

/// Pen instruction in a rendered text toolpath.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PenCommand {
    /// Character marker, emitted as a comment.
    Glyph(char),
    /// Laser off, travel feed.
    Up,
    /// Laser on, cutting feed.
    Down,
    /// Move to a point relative to the text origin.
    To(Point),
}

/// A run of engraved text rendered with the single-stroke font.
///
/// The toolpath is rendered at construction: scaled so glyphs are
/// `size` millimeters tall, rotated about the text origin, and shifted
/// so the bounding box's lower-left corner sits at the origin.
#[derive(Debug, Clone)]
pub struct Text {
    text: String,
    size: f64,
    rotation: f64,
    pub x: f64,
    pub y: f64,
    width: f64,
    height: f64,
    commands: Vec<PenCommand>,
    pub style: CutStyle,
}

impl Text {
    pub fn new(
        text: &str,
        size: f64,
        rotation: f64,
        x: f64,
        y: f64,
    ) -> Result<Self, DesignError> {
        if size <= 0.0 {
            return Err(DesignError::InvalidDimension {
                name: "text size",
                value: size,
            });
        }
        let (commands, width, height) = render(text, size, rotation)?;
        Ok(Self {
            text: text.to_uppercase(),
            size,
            rotation,
            x,
            y,
            width,
            height,
            commands,
            style: CutStyle::new(0.0),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn extents(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn toolpath_points(&self) -> Vec<Point> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                PenCommand::To(p) => Some(Point::new(self.x + p.x, self.y + p.y)),
                _ => None,
            })
            .collect()
    }

    /// Plays the rendered pen commands. The preamble has already turned
    /// the laser on, so the first pen-up stroke switches it straight
    /// back off for the travel to the first glyph.
    fn emit_strokes(&self, cx: &mut EmitContext<'_>, feed: f64) -> Result<(), DesignError> {
        let mut pen_down = false;
        for cmd in &self.commands {
            match cmd {
                PenCommand::Glyph(ch) => {
                    cx.out.line(&format!("(Character: {})", ch));
                }
                PenCommand::Up => {
                    cx.out.line(&cx.machine.laser_off_line());
                    cx.out.line(&format!("F{:.1}", cx.machine.travel_feed));
                    pen_down = false;
                }
                PenCommand::Down => {
                    cx.out.line(&cx.machine.laser_on_line());
                    cx.out.line(&format!("F{:.1}", feed));
                    pen_down = true;
                }
                PenCommand::To(p) => {
                    let word = if pen_down { "G1" } else { "G0" };
                    cx.out.line(&format!(
                        "{} X{:.3} Y{:.3} Z{:.3}",
                        word,
                        self.x + p.x,
                        self.y + p.y,
                        self.style.z()
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Renders text into pen commands plus the bounding box extents.
fn render(
    text: &str,
    size: f64,
    rotation: f64,
) -> Result<(Vec<PenCommand>, f64, f64), DesignError> {
    let scale = size / GLYPH_HEIGHT;
    let origin = Point::new(0.0, 0.0);
    let mut commands = Vec::new();
    let mut cursor = 0.0;

    for ch in text.chars() {
        let glyph = glyphs::lookup(ch).ok_or(DesignError::UnsupportedCharacter { ch })?;
        if !glyph.strokes.is_empty() {
            commands.push(PenCommand::Glyph(ch.to_ascii_uppercase()));
        }
        for stroke in glyph.strokes {
            commands.push(match stroke {
                Stroke::Up => PenCommand::Up,
                Stroke::Down => PenCommand::Down,
                Stroke::At(gx, gy) => {
                    let scaled = Point::new((gx + cursor) * scale, gy * scale);
                    PenCommand::To(rotate_point(scaled, origin, rotation))
                }
            });
        }
        cursor += glyph.advance;
    }

    // Shift the toolpath so its bounding box starts at the text origin.
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for cmd in &commands {
        if let PenCommand::To(p) = cmd {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
    }
    if min.x.is_finite() {
        for cmd in &mut commands {
            if let PenCommand::To(p) = cmd {
                p.x -= min.x;
                p.y -= min.y;
            }
        }
        Ok((commands, max.x - min.x, max.y - min.y))
    } else {
        Ok((commands, cursor * scale, 0.0))
    }
}

/// Any engraveable shape.
#[derive(Debug, Clone)]
pub enum Shape {
    Line(Line),
    PolyLine(PolyLine),
    Rectangle(Rectangle),
    Polygon(Polygon),
    Circle(Circle),
    Text(Text),
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Line(_) => "Line",
            Shape::PolyLine(_) => "PolyLine",
            Shape::Rectangle(_) => "Rectangle",
            Shape::Polygon(_) => "Polygon",
            Shape::Circle(_) => "Circle",
            Shape::Text(_) => "Text",
        }
    }

    pub fn style(&self) -> &CutStyle {
        match self {
            Shape::Line(s) => &s.style,
            Shape::PolyLine(s) => &s.style,
            Shape::Rectangle(s) => &s.style,
            Shape::Polygon(s) => &s.style,
            Shape::Circle(s) => &s.style,
            Shape::Text(s) => &s.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut CutStyle {
        match self {
            Shape::Line(s) => &mut s.style,
            Shape::PolyLine(s) => &mut s.style,
            Shape::Rectangle(s) => &mut s.style,
            Shape::Polygon(s) => &mut s.style,
            Shape::Circle(s) => &mut s.style,
            Shape::Text(s) => &mut s.style,
        }
    }

    /// The toolpath points in cutting order. For a circle this is the
    /// single arc start point; for text, every pen target.
    pub fn points(&self) -> Vec<Point> {
        match self {
            Shape::Line(s) => vec![s.start(), s.end()],
            Shape::PolyLine(s) => s.points.clone(),
            Shape::Rectangle(s) => s.corners().to_vec(),
            Shape::Polygon(s) => s.points.clone(),
            Shape::Circle(s) => vec![s.start_point()],
            Shape::Text(s) => s.toolpath_points(),
        }
    }

    /// Whether the cut returns to its first point.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            Shape::Rectangle(_) | Shape::Polygon(_) | Shape::Circle(_)
        )
    }

    /// Bounding box size (width, height).
    pub fn size(&self) -> (f64, f64) {
        match self {
            Shape::Circle(s) => (2.0 * s.radius, 2.0 * s.radius),
            Shape::Text(s) => s.extents(),
            _ => {
                let points = self.points();
                let mut min = Point::new(f64::INFINITY, f64::INFINITY);
                let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
                for p in &points {
                    min.x = min.x.min(p.x);
                    min.y = min.y.min(p.y);
                    max.x = max.x.max(p.x);
                    max.y = max.y.max(p.y);
                }
                (max.x - min.x, max.y - min.y)
            }
        }
    }

    /// The shape's reference point: rectangle and circle centers, line
    /// start, text origin, bounding-box center for point-list shapes.
    pub fn position(&self) -> Point {
        match self {
            Shape::Line(s) => s.start(),
            Shape::Rectangle(s) => Point::new(s.x, s.y),
            Shape::Circle(s) => s.center(),
            Shape::Text(s) => Point::new(s.x, s.y),
            Shape::PolyLine(_) | Shape::Polygon(_) => {
                let points = self.points();
                let mut min = Point::new(f64::INFINITY, f64::INFINITY);
                let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
                for p in &points {
                    min.x = min.x.min(p.x);
                    min.y = min.y.min(p.y);
                    max.x = max.x.max(p.x);
                    max.y = max.y.max(p.y);
                }
                Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0)
            }
        }
    }

    /// Moves the reference point, translating the whole shape.
    pub fn set_position(&mut self, x: f64, y: f64) {
        match self {
            Shape::Line(s) => {
                s.x = x;
                s.y = y;
            }
            Shape::Rectangle(s) => {
                s.x = x;
                s.y = y;
            }
            Shape::Circle(s) => s.set_center(x, y),
            Shape::Text(s) => {
                s.x = x;
                s.y = y;
            }
            Shape::PolyLine(_) | Shape::Polygon(_) => {
                let current = self.position();
                let dx = x - current.x;
                let dy = y - current.y;
                let points = match self {
                    Shape::PolyLine(s) => &mut s.points,
                    Shape::Polygon(s) => &mut s.points,
                    _ => unreachable!(),
                };
                for p in points.iter_mut() {
                    p.x += dx;
                    p.y += dy;
                }
            }
        }
    }

    /// Travel distance from a machine position to this shape. For circles
    /// this is the signed distance to the perimeter, negative inside.
    pub fn distance(&self, from: Point) -> f64 {
        match self {
            Shape::Circle(s) => from.distance_to(&s.center()) - s.radius,
            Shape::Line(s) => from
                .distance_to(&s.start())
                .min(from.distance_to(&s.end())),
            _ => self
                .points()
                .iter()
                .map(|p| from.distance_to(p))
                .fold(f64::INFINITY, f64::min),
        }
    }

    /// Reorders the cut so it begins as close as possible to the
    /// reference point without changing the geometry. Repeated calls
    /// with the same reference are stable.
    pub fn set_start_point(&mut self, reference: Point) {
        match self {
            Shape::Line(s) => {
                if s.end().distance_to(&reference) < s.start().distance_to(&reference) {
                    s.reverse();
                }
            }
            Shape::PolyLine(s) => {
                let first = s.points[0];
                let last = s.points[s.points.len() - 1];
                if last.distance_to(&reference) < first.distance_to(&reference) {
                    s.points.reverse();
                }
            }
            Shape::Rectangle(s) => s.roll_to_nearest(reference),
            Shape::Polygon(s) => s.roll_to_nearest(reference),
            Shape::Circle(s) => s.retarget_start(reference),
            Shape::Text(_) => {}
        }
    }

    /// Where the machine sits after cutting: the first point for closed
    /// shapes, the last point for open ones.
    pub fn exit_point(&self) -> Point {
        let points = self.points();
        if self.is_closed() {
            points[0]
        } else {
            *points.last().unwrap_or(&Point::new(0.0, 0.0))
        }
    }

    /// Derives fill lines for shapes that support filling.
    pub fn fill_lines(&self, stepover: f64) -> Result<Vec<Shape>, DesignError> {
        match self {
            Shape::Rectangle(s) => s.fill_lines(stepover),
            Shape::Circle(s) => s.fill_lines(stepover),
            _ => Err(DesignError::FillUnsupported { shape: self.kind() }),
        }
    }

    /// Emits the shape following the standard protocol: identifying
    /// comment, optional retract, travel, plunge, feed, power override,
    /// laser on, body (repeated for multi-pass cuts), laser off and
    /// power restore.
    pub fn emit(&self, cx: &mut EmitContext<'_>) -> Result<(), DesignError> {
        debug!(shape = self.kind(), "emitting shape");
        let style = self.style();
        cx.out.line(&format!("({})", self));
        if let Some(header) = &style.header {
            cx.out.comment(header);
        }

        if let Some(z_retract) = cx.machine.z_retract {
            cx.out.line(&format!(
                "G0 Z{:.3} F{:.1}",
                z_retract, cx.machine.travel_feed
            ));
        }
        let points = self.points();
        let first = points
            .first()
            .ok_or(DesignError::EmptyShape { shape: self.kind() })?;
        cx.out.line(&format!(
            "G0 X{:.3} Y{:.3} F{:.1}",
            first.x, first.y, cx.machine.travel_feed
        ));
        cx.out.line(&format!("G0 Z{:.3}", style.z()));

        let feed = style.feed().unwrap_or(cx.machine.cut_feed);
        cx.out.line(&format!("G1 F{:.1}", feed));
        if let Some(power) = style.power() {
            cx.machine.override_power(power);
        }
        cx.out.line(&cx.machine.laser_on_line());

        let stepdown = style.stepdown().unwrap_or(0.0);
        for pass in 0..style.passes() {
            if pass > 0 {
                cx.out
                    .line(&format!("G1 Z{:.3}", style.z() - stepdown * pass as f64));
            }
            self.emit_body(cx, feed)?;
        }

        cx.out.line(&cx.machine.laser_off_line());
        cx.machine.restore_power();
        if let Some(footer) = &style.footer {
            cx.out.comment(footer);
        }
        cx.out.blank();
        Ok(())
    }

    fn emit_body(&self, cx: &mut EmitContext<'_>, feed: f64) -> Result<(), DesignError> {
        match self {
            Shape::Circle(s) => {
                cx.out.line(&s.arc_command());
                Ok(())
            }
            Shape::Text(s) => s.emit_strokes(cx, feed),
            _ => {
                let points = self.points();
                for p in &points[1..] {
                    cx.out.line(&format!("G1 X{:.3} Y{:.3}", p.x, p.y));
                }
                if self.is_closed() {
                    cx.out
                        .line(&format!("G1 X{:.3} Y{:.3}", points[0].x, points[0].y));
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Line(s) => write!(
                f,
                "Line: x={:.3},y={:.3},length={:.3},rotation={:.3}",
                s.x, s.y, s.length, s.rotation
            ),
            Shape::PolyLine(s) => write!(f, "PolyLine: points={}", s.points.len()),
            Shape::Rectangle(s) => write!(
                f,
                "Rectangle: x={:.3},y={:.3},width={:.3},height={:.3},rotation={:.3}",
                s.x, s.y, s.width, s.height, s.rotation
            ),
            Shape::Polygon(s) => write!(f, "Polygon: points={}", s.points.len()),
            Shape::Circle(s) => {
                let start = s.start_point();
                write!(
                    f,
                    "Circle: x={:.3},y={:.3},radius={:.3},xs={:.3},ys={:.3}",
                    s.x, s.y, s.radius, start.x, start.y
                )
            }
            Shape::Text(s) => write!(f, "Text: {}", s.text),
        }
    }
}

impl From<Line> for Shape {
    fn from(s: Line) -> Self {
        Shape::Line(s)
    }
}

impl From<PolyLine> for Shape {
    fn from(s: PolyLine) -> Self {
        Shape::PolyLine(s)
    }
}

impl From<Rectangle> for Shape {
    fn from(s: Rectangle) -> Self {
        Shape::Rectangle(s)
    }
}

impl From<Polygon> for Shape {
    fn from(s: Polygon) -> Self {
        Shape::Polygon(s)
    }
}

impl From<Circle> for Shape {
    fn from(s: Circle) -> Self {
        Shape::Circle(s)
    }
}

impl From<Text> for Shape {
    fn from(s: Text) -> Self {
        Shape::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_point(p: Point, x: f64, y: f64) {
        assert!(
            (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9,
            "expected ({}, {}), got ({}, {})",
            x,
            y,
            p.x,
            p.y
        );
    }

    #[test]
    fn test_rectangle_corners_start_lower_left() {
        let rect = Rectangle::new(0.0, 0.0, 0.0, 10.0, 10.0).unwrap();
        let corners = rect.corners();
        assert_point(corners[0], -5.0, -5.0);
        assert_point(corners[1], -5.0, 5.0);
        assert_point(corners[2], 5.0, 5.0);
        assert_point(corners[3], 5.0, -5.0);
    }

    #[test]
    fn test_rectangle_rotation() {
        let mut rect = Rectangle::new(0.0, 0.0, 0.0, 10.0, 4.0).unwrap();
        rect.set_rotation(90.0);
        let corners = rect.corners();
        assert_point(corners[0], 2.0, -5.0);
        assert_point(corners[1], -2.0, -5.0);
    }

    #[test]
    fn test_rectangle_start_point_rolls_to_nearest_corner() {
        let mut shape = Shape::Rectangle(Rectangle::new(0.0, 0.0, 0.0, 10.0, 10.0).unwrap());
        shape.set_start_point(Point::new(20.0, 20.0));
        assert_point(shape.points()[0], 5.0, 5.0);
        // Same geometry, just a different starting corner.
        shape.set_start_point(Point::new(20.0, 20.0));
        assert_point(shape.points()[0], 5.0, 5.0);
    }

    #[test]
    fn test_rectangle_rejects_bad_dimensions() {
        assert!(Rectangle::new(0.0, 0.0, 0.0, -1.0, 5.0).is_err());
        assert!(Rectangle::new(0.0, 0.0, 0.0, 5.0, 0.0).is_err());
        let mut rect = Rectangle::new(0.0, 0.0, 0.0, 5.0, 5.0).unwrap();
        assert!(rect.set_width(-2.0).is_err());
        assert_eq!(rect.width(), 5.0);
    }

    #[test]
    fn test_line_reverse_via_start_point() {
        let mut shape = Shape::Line(Line::new(0.0, 0.0, 0.0, 10.0, 0.0).unwrap());
        shape.set_start_point(Point::new(11.0, 0.0));
        assert_point(shape.points()[0], 10.0, 0.0);
        assert_point(shape.points()[1], 0.0, 0.0);
        shape.set_start_point(Point::new(11.0, 0.0));
        assert_point(shape.points()[0], 10.0, 0.0);
    }

    #[test]
    fn test_circle_default_start_is_top() {
        let circle = Circle::new(0.0, 0.0, 0.0, 5.0).unwrap();
        assert_point(circle.start_point(), 0.0, 5.0);
    }

    #[test]
    fn test_circle_arc_command() {
        let circle = Circle::new(0.0, 0.0, 0.0, 5.0).unwrap();
        assert_eq!(circle.arc_command(), "G2 X0.000 Y5.000 I0.000 J-5.000");
    }

    #[test]
    fn test_circle_retarget_start() {
        let mut circle = Circle::new(0.0, 0.0, 0.0, 5.0).unwrap();
        circle.retarget_start(Point::new(10.0, 0.0));
        assert_point(circle.start_point(), 5.0, 0.0);
        circle.retarget_start(Point::new(10.0, 0.0));
        assert_point(circle.start_point(), 5.0, 0.0);
        // Reference at the center keeps the current start.
        circle.retarget_start(Point::new(0.0, 0.0));
        assert_point(circle.start_point(), 5.0, 0.0);
    }

    #[test]
    fn test_rectangle_fill_count_and_length() {
        let rect = Rectangle::new(0.0, 0.0, 0.0, 10.0, 10.0).unwrap();
        let lines = rect.fill_lines(1.0).unwrap();
        assert_eq!(lines.len(), 9);
        for line in &lines {
            match line {
                Shape::Line(l) => assert!((l.length() - 8.0).abs() < 1e-9),
                other => panic!("expected fill line, got {}", other),
            }
        }
        // First fill line sits one stepover in from the lower-left corner.
        assert_point(lines[0].points()[0], -4.0, -4.0);
    }

    #[test]
    fn test_circle_fill_center_line() {
        let circle = Circle::new(0.0, 0.0, 0.0, 5.0).unwrap();
        let lines = circle.fill_lines(1.0).unwrap();
        match &lines[0] {
            Shape::Line(l) => {
                assert!((l.length() - 8.0).abs() < 1e-9);
                assert_point(l.start(), -4.0, 0.0);
            }
            other => panic!("expected fill line, got {}", other),
        }
        // Chords mirror above and below the center line.
        assert!(lines.len() > 1);
        assert_eq!(lines.len() % 2, 1);
    }

    #[test]
    fn test_fill_unsupported_for_open_shapes() {
        let shape = Shape::Line(Line::new(0.0, 0.0, 0.0, 5.0, 0.0).unwrap());
        assert!(matches!(
            shape.fill_lines(1.0),
            Err(DesignError::FillUnsupported { shape: "Line" })
        ));
    }

    #[test]
    fn test_fill_flag_is_one_way() {
        let mut style = CutStyle::new(0.0);
        style.set_filled(true).unwrap();
        assert!(matches!(
            style.set_filled(false),
            Err(DesignError::CannotUnfill)
        ));
        assert!(style.is_filled());
        // Re-asserting the flag is fine.
        style.set_filled(true).unwrap();
    }

    #[test]
    fn test_style_validation() {
        let mut style = CutStyle::new(-0.5);
        assert!(style.set_feed(0.0).is_err());
        assert!(style.set_power(150.0).is_err());
        assert!(style.set_passes(0).is_err());
        assert!(style.set_stepdown(-1.0).is_err());
        style.set_feed(750.0).unwrap();
        style.set_power(45.0).unwrap();
        assert_eq!(style.feed(), Some(750.0));
        assert_eq!(style.power(), Some(45.0));
    }

    #[test]
    fn test_polygon_needs_three_points() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        assert!(matches!(
            Polygon::new(points, 0.0),
            Err(DesignError::TooFewPoints { needed: 3, .. })
        ));
    }

    #[test]
    fn test_polygon_roll_preserves_cycle() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let mut shape = Shape::Polygon(Polygon::new(points, 0.0).unwrap());
        shape.set_start_point(Point::new(11.0, 11.0));
        let rolled = shape.points();
        assert_point(rolled[0], 10.0, 10.0);
        assert_point(rolled[1], 0.0, 10.0);
        assert_point(rolled[3], 10.0, 0.0);
    }

    #[test]
    fn test_exit_point_open_vs_closed() {
        let line = Shape::Line(Line::new(0.0, 0.0, 0.0, 10.0, 0.0).unwrap());
        assert_point(line.exit_point(), 10.0, 0.0);
        let rect = Shape::Rectangle(Rectangle::new(0.0, 0.0, 0.0, 10.0, 10.0).unwrap());
        assert_point(rect.exit_point(), -5.0, -5.0);
    }

    #[test]
    fn test_text_rejects_unsupported_characters() {
        assert!(matches!(
            Text::new("A#B", 4.0, 0.0, 0.0, 0.0),
            Err(DesignError::UnsupportedCharacter { ch: '#' })
        ));
    }

    #[test]
    fn test_text_uppercases_and_measures() {
        let text = Text::new("ab", 9.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(text.text(), "AB");
        let (w, h) = text.extents();
        assert!(w > 9.0, "two glyphs are wider than one cell: {}", w);
        assert!((h - 9.0).abs() < 1e-9, "glyphs are size mm tall: {}", h);
    }

    #[test]
    fn test_text_normalized_to_origin() {
        let shape = Shape::Text(Text::new("HI", 4.0, 0.0, 0.0, 0.0).unwrap());
        let points = shape.points();
        let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert!(min_x.abs() < 1e-9);
        assert!(min_y.abs() < 1e-9);
    }

    #[test]
    fn test_circle_distance_is_signed() {
        let shape = Shape::Circle(Circle::new(0.0, 0.0, 0.0, 5.0).unwrap());
        // A reference inside the circle is a negative perimeter distance,
        // so an enclosing circle always wins an ordering pick.
        assert!((shape.distance(Point::new(1.0, 0.0)) - (-4.0)).abs() < 1e-9);
        assert!((shape.distance(Point::new(9.0, 0.0)) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_shape_position_round_trip() {
        let mut shape = Shape::Rectangle(Rectangle::new(1.0, 2.0, 0.0, 4.0, 4.0).unwrap());
        shape.set_position(10.0, 20.0);
        assert_point(shape.position(), 10.0, 20.0);
        assert_point(shape.points()[0], 8.0, 18.0);

        let mut poly = Shape::Polygon(
            Polygon::new(
                vec![
                    Point::new(0.0, 0.0),
                    Point::new(2.0, 0.0),
                    Point::new(1.0, 2.0),
                ],
                0.0,
            )
            .unwrap(),
        );
        poly.set_position(5.0, 5.0);
        assert_point(poly.position(), 5.0, 5.0);
    }

    proptest! {
        #[test]
        fn prop_rectangle_start_point_idempotent(
            rx in -50.0..50.0f64,
            ry in -50.0..50.0f64,
            rot in 0.0..360.0f64,
        ) {
            let mut rect = Rectangle::new(0.0, 0.0, 0.0, 8.0, 6.0).unwrap();
            rect.set_rotation(rot);
            let mut shape = Shape::Rectangle(rect);
            let reference = Point::new(rx, ry);
            shape.set_start_point(reference);
            let first = shape.points();
            shape.set_start_point(reference);
            let second = shape.points();
            for (a, b) in first.iter().zip(second.iter()) {
                prop_assert!((a.x - b.x).abs() < 1e-9);
                prop_assert!((a.y - b.y).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_rectangle_fill_lines_stay_inside(
            w in 3.0..40.0f64,
            h in 3.0..40.0f64,
            s in 0.2..1.0f64,
        ) {
            let rect = Rectangle::new(0.0, 0.0, 0.0, w, h).unwrap();
            let lines = rect.fill_lines(s).unwrap();
            for line in &lines {
                for p in line.points() {
                    prop_assert!(p.x >= -w / 2.0 - 1e-9 && p.x <= w / 2.0 + 1e-9);
                    prop_assert!(p.y >= -h / 2.0 - 1e-9 && p.y <= h / 2.0 + 1e-9);
                }
            }
        }
    }
}
