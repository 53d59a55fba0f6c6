//! Calibration documents for dialing in a laser cutter.
//!
//! These build ordinary [`Document`]s: a speed/power grid of filled
//! test squares, a focus ramp of lines cut at different Z heights, and
//! a plain guide line for marking the spoilboard.

use crate::document::Document;
use crate::error::DesignError;
use crate::layout::{GridLayout, Layout, Node};
use crate::shapes::{Line, Rectangle, Shape, Text};
use tracing::info;

fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{:.0}", v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A grid of engraved squares, one per speed/power combination.
///
/// Powers run left to right along the columns and speeds bottom to top
/// along the rows, fastest row first, with engraved labels on both
/// axes. Cut the pattern once, then read the best-looking square's row
/// and column straight off the board.
#[derive(Debug, Clone)]
pub struct SpeedPowerTest {
    speeds: Vec<f64>,
    powers: Vec<f64>,
    square_size: f64,
    text_size: f64,
}

impl SpeedPowerTest {
    pub fn new(mut speeds: Vec<f64>, mut powers: Vec<f64>) -> Result<Self, DesignError> {
        if speeds.is_empty() {
            return Err(DesignError::EmptyCalibration { name: "speeds" });
        }
        if powers.is_empty() {
            return Err(DesignError::EmptyCalibration { name: "powers" });
        }
        for &feed in &speeds {
            if feed <= 0.0 {
                return Err(DesignError::InvalidFeed { value: feed });
            }
        }
        for &power in &powers {
            if !(0.0..=100.0).contains(&power) {
                return Err(DesignError::InvalidPower { value: power });
            }
        }
        speeds.sort_by(f64::total_cmp);
        powers.sort_by(f64::total_cmp);
        Ok(Self {
            speeds,
            powers,
            square_size: 10.0,
            text_size: 4.0,
        })
    }

    pub fn set_square_size(&mut self, size: f64) -> Result<(), DesignError> {
        if size <= 0.0 {
            return Err(DesignError::InvalidDimension {
                name: "square size",
                value: size,
            });
        }
        self.square_size = size;
        self.text_size = 0.4 * size;
        Ok(())
    }

    pub fn build(&self) -> Result<Document, DesignError> {
        let mut doc = Document::new();
        let stepover = doc.fill_stepover();

        let mut grid = GridLayout::new(self.speeds.len() + 1, self.powers.len() + 1)?;
        grid.set_cell_padding(1.0, 1.0);

        // Column labels across the top.
        for (column, &power) in self.powers.iter().enumerate() {
            let mut label = Text::new(&format!("{:.0}%", power), self.text_size, 0.0, 0.0, 0.0)?;
            label.style.header = Some(format!("Power Label: {:.0}", power));
            grid.add_cell(0, column + 1, Node::Shape(Shape::Text(label)), stepover)?;
        }

        // Row labels down the left side, fastest speed on top.
        for (row, &speed) in self.speeds.iter().rev().enumerate() {
            let mut label = Text::new(&format!("{:.0}", speed), self.text_size, 0.0, 0.0, 0.0)?;
            label.style.header = Some(format!("Speed Label: {:.0}", speed));
            grid.add_cell(row + 1, 0, Node::Shape(Shape::Text(label)), stepover)?;
        }

        for (row, &speed) in self.speeds.iter().rev().enumerate() {
            for (column, &power) in self.powers.iter().enumerate() {
                let mut square =
                    Rectangle::new(0.0, 0.0, 0.0, self.square_size, self.square_size)?;
                square.style.set_feed(speed)?;
                square.style.set_power(power)?;
                square.style.header =
                    Some(format!("Power={:.0}%, Speed={:.0}", power, speed));
                grid.add_cell(
                    row + 1,
                    column + 1,
                    Node::Shape(Shape::Rectangle(square)),
                    stepover,
                )?;
            }
        }

        // Axis titles around the measurement grid.
        let mut outer = GridLayout::new(2, 2)?;
        let power_title = Text::new("POWER", self.text_size, 0.0, 0.0, 0.0)?;
        outer.add_cell(0, 1, Node::Shape(Shape::Text(power_title)), stepover)?;
        let speed_title = Text::new("SPEED", self.text_size, 90.0, 0.0, 0.0)?;
        outer.add_cell(1, 0, Node::Shape(Shape::Text(speed_title)), stepover)?;
        outer.add_cell(1, 1, Node::Layout(Box::new(Layout::Grid(grid))), stepover)?;

        doc.set_layout(Layout::Grid(outer));
        let (width, height) = doc.size()?;
        doc.set_header(&format!(
            "Speed & Power Tuning Print\n\
             Document size: {:.1}mm x {:.1}mm\n\
             Speeds: {}\n\
             Powers: {}\n\
             Square size: {:.1}mm",
            width,
            height,
            join_values(&self.speeds),
            join_values(&self.powers),
            self.square_size
        ));
        info!(
            speeds = self.speeds.len(),
            powers = self.powers.len(),
            "built speed/power test"
        );
        Ok(doc)
    }
}

/// Lines cut at a range of Z offsets to find the focus height.
///
/// Each row pairs an engraved label with a line cut at that Z offset;
/// the sharpest line marks the focal plane.
#[derive(Debug, Clone)]
pub struct FocusTest {
    heights: Vec<f64>,
    length: f64,
}

impl FocusTest {
    pub fn new(mut heights: Vec<f64>, length: f64) -> Result<Self, DesignError> {
        if heights.is_empty() {
            return Err(DesignError::EmptyCalibration { name: "heights" });
        }
        if length <= 0.0 {
            return Err(DesignError::InvalidDimension {
                name: "length",
                value: length,
            });
        }
        heights.sort_by(f64::total_cmp);
        Ok(Self { heights, length })
    }

    pub fn build(&self) -> Result<Document, DesignError> {
        let mut doc = Document::new();
        let stepover = doc.fill_stepover();

        let mut grid = GridLayout::new(self.heights.len(), 2)?;
        grid.set_cell_padding(1.0, 0.75);

        // Rows run from the lowest offset at the top, reading like a scale.
        for (row, &height) in self.heights.iter().enumerate() {
            let text = if height > 0.0 {
                format!("+{:.1}", height)
            } else {
                format!("{:.1}", height)
            };
            let mut label = Text::new(&text, 4.0, 0.0, 0.0, 0.0)?;
            label.style.header = Some(format!("Z offset: {:.1}", height));
            grid.add_cell(row, 0, Node::Shape(Shape::Text(label)), stepover)?;

            let line = Line::new(0.0, 0.0, height, self.length, 0.0)?;
            grid.add_cell(row, 1, Node::Shape(Shape::Line(line)), stepover)?;
        }

        doc.set_layout(Layout::Grid(grid));
        let (width, height) = doc.size()?;
        doc.set_header(&format!(
            "Laser Focus Tuning Print\n\
             Document size: {:.1}mm x {:.1}mm\n\
             Heights: {}",
            width,
            height,
            self.heights
                .iter()
                .map(|v| format!("{:.1}", v))
                .collect::<Vec<_>>()
                .join(", ")
        ));
        info!(heights = self.heights.len(), "built focus test");
        Ok(doc)
    }
}

/// A single straight cut for marking alignment lines on the spoilboard.
pub fn guide_line(length: f64, rotation: f64, power: f64) -> Result<Document, DesignError> {
    let mut doc = Document::new();
    let mut line = Line::new(0.0, 0.0, 0.0, length, rotation)?;
    line.style.set_power(power)?;
    doc.add_shape(Shape::Line(line))?;
    doc.set_header("Guide Line for Spoilboard");
    Ok(doc)
}
