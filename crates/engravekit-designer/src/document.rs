//! The G-code document: machine state, output buffer, and generation.
//!
//! A [`Document`] owns machine-level state (power, feeds, retract
//! height), a root [`Layout`] of shapes, and the output buffer. Calling
//! [`Document::generate`] clears the buffer and renders the whole tree,
//! so generation is repeatable.

use crate::error::DesignError;
use crate::layout::{Layout, Node};
use crate::shapes::Shape;
use engravekit_core::{LaserMode, MachineSettings, MeasurementSystem, SettingsError};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Accumulates G-code lines with a configurable line ending.
#[derive(Debug, Clone)]
pub struct CodeBuffer {
    text: String,
    eol: String,
}

impl CodeBuffer {
    pub fn new(eol: &str) -> Self {
        Self {
            text: String::new(),
            eol: eol.to_string(),
        }
    }

    /// Appends one line plus the line ending.
    pub fn line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push_str(&self.eol);
    }

    /// Appends a parenthesized comment line.
    pub fn comment(&mut self, comment: &str) {
        self.line(&format!("({})", comment));
    }

    pub fn blank(&mut self) {
        self.line("");
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

/// Live machine state threaded through emission.
///
/// `power` is the percentage currently in force; shape overrides bump it
/// for the duration of one shape and [`MachineState::restore_power`]
/// brings back the document default.
#[derive(Debug, Clone)]
pub struct MachineState {
    pub(crate) laser_mode: LaserMode,
    pub(crate) power: f64,
    pub(crate) power_default: f64,
    pub(crate) device_power_max: f64,
    pub(crate) travel_feed: f64,
    pub(crate) cut_feed: f64,
    pub(crate) z_retract: Option<f64>,
    pub(crate) fill_stepover: f64,
}

impl MachineState {
    pub fn from_settings(settings: &MachineSettings) -> Self {
        Self {
            laser_mode: settings.laser_mode,
            power: settings.laser_power_default,
            power_default: settings.laser_power_default,
            device_power_max: settings.device_power_max,
            travel_feed: settings.travel_feed,
            cut_feed: settings.cut_feed,
            z_retract: settings.z_retract_height,
            fill_stepover: settings.fill_stepover,
        }
    }

    /// The laser-on command at the current power, scaled to the device
    /// S-word range.
    pub fn laser_on_line(&self) -> String {
        let s_word = self.power / 100.0 * self.device_power_max;
        format!(
            "{} S{:.0} (Laser on @ {}%)",
            self.laser_mode.code(),
            s_word,
            format_percent(self.power)
        )
    }

    pub fn laser_off_line(&self) -> String {
        "M5        (Laser off)".to_string()
    }

    pub(crate) fn override_power(&mut self, power: f64) {
        self.power = power;
    }

    pub(crate) fn restore_power(&mut self) {
        self.power = self.power_default;
    }
}

fn format_percent(power: f64) -> String {
    if (power - power.round()).abs() < 1e-9 {
        format!("{:.0}", power)
    } else {
        format!("{:.1}", power)
    }
}

/// Mutable borrow bundle handed down the layout tree during emission.
pub struct EmitContext<'a> {
    pub machine: &'a mut MachineState,
    pub out: &'a mut CodeBuffer,
}

/// A complete engraving job.
#[derive(Debug, Clone)]
pub struct Document {
    x: f64,
    y: f64,
    z: f64,
    machine: MachineState,
    buffer: CodeBuffer,
    header: String,
    footer: String,
    layout: Layout,
    job_control: bool,
}

impl Document {
    /// A document with default machine settings and a sequential layout.
    pub fn new() -> Self {
        let settings = MachineSettings::default();
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            machine: MachineState::from_settings(&settings),
            buffer: CodeBuffer::new("\n"),
            header: String::new(),
            footer: String::new(),
            layout: Layout::sequential(),
            job_control: true,
        }
    }

    /// Builds a document from validated machine settings.
    pub fn from_settings(settings: &MachineSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let mut doc = Self::new();
        doc.machine = MachineState::from_settings(settings);
        Ok(doc)
    }

    /// Whether setup (G90/G21) and end (M2) blocks are emitted. Disable
    /// to splice a document's output into a larger job.
    pub fn set_job_control(&mut self, enabled: bool) {
        self.job_control = enabled;
    }

    /// Places the root layout. Z is carried for callers that track the
    /// document height alongside its position.
    pub fn set_origin(&mut self, x: f64, y: f64, z: f64) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    /// Adds a shape to the root layout. Filled shapes are expanded into
    /// outline plus fill lines using the document stepover.
    pub fn add_shape(&mut self, shape: Shape) -> Result<(), DesignError> {
        let stepover = self.machine.fill_stepover;
        self.layout.add_child(Node::Shape(shape), stepover)
    }

    /// Adds an arbitrary node (shape or nested layout) to the root layout.
    pub fn add_node(&mut self, node: Node) -> Result<(), DesignError> {
        let stepover = self.machine.fill_stepover;
        self.layout.add_child(node, stepover)
    }

    pub fn power(&self) -> f64 {
        self.machine.power_default
    }

    /// Document-wide laser power percentage.
    pub fn set_power(&mut self, power: f64) -> Result<(), DesignError> {
        if !(0.0..=100.0).contains(&power) {
            return Err(DesignError::InvalidPower { value: power });
        }
        self.machine.power = power;
        self.machine.power_default = power;
        Ok(())
    }

    pub fn set_device_power_max(&mut self, max: f64) -> Result<(), DesignError> {
        if max <= 0.0 {
            return Err(DesignError::InvalidDimension {
                name: "device power max",
                value: max,
            });
        }
        self.machine.device_power_max = max;
        Ok(())
    }

    pub fn travel_feed(&self) -> f64 {
        self.machine.travel_feed
    }

    pub fn set_travel_feed(&mut self, feed: f64) -> Result<(), DesignError> {
        if feed <= 0.0 {
            return Err(DesignError::InvalidFeed { value: feed });
        }
        self.machine.travel_feed = feed;
        Ok(())
    }

    pub fn cut_feed(&self) -> f64 {
        self.machine.cut_feed
    }

    pub fn set_cut_feed(&mut self, feed: f64) -> Result<(), DesignError> {
        if feed <= 0.0 {
            return Err(DesignError::InvalidFeed { value: feed });
        }
        self.machine.cut_feed = feed;
        Ok(())
    }

    pub fn set_laser_mode(&mut self, mode: LaserMode) {
        self.machine.laser_mode = mode;
    }

    /// Accepts a raw laser-on G-code word (M3 or M4).
    pub fn set_laser_on_code(&mut self, code: &str) -> Result<(), DesignError> {
        let mode = code
            .parse::<LaserMode>()
            .map_err(|reason| DesignError::InvalidLaserCode { reason })?;
        self.machine.laser_mode = mode;
        Ok(())
    }

    /// Z height for retraction before travel moves; `None` disables.
    pub fn set_z_retract(&mut self, height: Option<f64>) {
        self.machine.z_retract = height;
    }

    pub fn fill_stepover(&self) -> f64 {
        self.machine.fill_stepover
    }

    pub fn set_fill_stepover(&mut self, stepover: f64) -> Result<(), DesignError> {
        if stepover <= 0.0 {
            return Err(DesignError::InvalidStepover { value: stepover });
        }
        self.machine.fill_stepover = stepover;
        Ok(())
    }

    /// Comment block at the top of the output; each line is wrapped in
    /// parentheses.
    pub fn set_header(&mut self, header: &str) {
        self.header = header.to_string();
    }

    pub fn set_footer(&mut self, footer: &str) {
        self.footer = footer.to_string();
    }

    /// Line ending for generated output. Clears the buffer.
    pub fn set_eol(&mut self, eol: &str) {
        self.buffer = CodeBuffer::new(eol);
    }

    /// The most recently generated G-code.
    pub fn code(&self) -> &str {
        self.buffer.as_str()
    }

    /// Overall document size, if the root layout can report one.
    pub fn size(&self) -> Result<(f64, f64), DesignError> {
        self.layout.size()
    }

    /// Renders the whole document into the buffer and returns it.
    /// Regenerating produces identical output for an unchanged document.
    pub fn generate(&mut self) -> Result<&str, DesignError> {
        debug!("generating document");
        self.buffer.clear();

        if !self.header.is_empty() {
            for line in self.header.lines() {
                self.buffer.comment(line);
            }
        }

        if self.job_control {
            self.buffer.blank();
            self.buffer.line("(Machine Setup)");
            self.buffer.line("G90  (Absolute Position Mode)");
            self.buffer.line(MeasurementSystem::Metric.setup_line());
            self.buffer.blank();
        }

        self.layout.set_origin(self.x, self.y);
        {
            let mut cx = EmitContext {
                machine: &mut self.machine,
                out: &mut self.buffer,
            };
            self.layout.emit(&mut cx)?;
        }

        if self.job_control {
            self.buffer.blank();
            self.buffer.line("M2 (End Document)");
        }
        if !self.footer.is_empty() {
            let footer = self.footer.clone();
            self.buffer.comment(&footer);
        }

        info!(bytes = self.buffer.as_str().len(), "document generated");
        Ok(self.buffer.as_str())
    }

    /// Writes the G-code to a file, generating first if needed.
    pub fn save(&mut self, path: &Path) -> Result<(), DesignError> {
        if self.buffer.is_empty() {
            self.generate()?;
        }
        fs::write(path, self.buffer.as_str())?;
        info!(path = %path.display(), "saved G-code");
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Line, Rectangle, Shape};

    fn rect_10x10() -> Shape {
        Shape::Rectangle(Rectangle::new(0.0, 0.0, 0.0, 10.0, 10.0).unwrap())
    }

    #[test]
    fn test_rectangle_end_to_end() {
        let mut doc = Document::new();
        doc.add_shape(rect_10x10()).unwrap();
        let code = doc.generate().unwrap().to_string();

        assert!(code.contains("(Machine Setup)"));
        assert!(code.contains("G90  (Absolute Position Mode)"));
        assert!(code.contains("G21  (Units = millimeters)"));
        // Travel to the lower-left corner at travel feed, then plunge.
        assert!(code.contains("G0 X-5.000 Y-5.000 F3000.0"));
        assert!(code.contains("G0 Z0.000"));
        assert!(code.contains("G1 F500.0"));
        assert!(code.contains("M4 S800 (Laser on @ 80%)"));
        // Remaining corners plus the closing move.
        assert!(code.contains("G1 X-5.000 Y5.000"));
        assert!(code.contains("G1 X5.000 Y5.000"));
        assert!(code.contains("G1 X5.000 Y-5.000"));
        assert!(code.contains("G1 X-5.000 Y-5.000"));
        assert!(code.contains("M5        (Laser off)"));
        assert!(code.contains("M2 (End Document)"));

        let off = code.find("M5").unwrap();
        let on = code.find("M4").unwrap();
        assert!(on < off);
    }

    #[test]
    fn test_circle_single_arc() {
        let mut doc = Document::new();
        doc.add_shape(Shape::Circle(Circle::new(0.0, 0.0, 0.0, 5.0).unwrap()))
            .unwrap();
        let code = doc.generate().unwrap();
        assert!(code.contains("G0 X0.000 Y5.000 F3000.0"));
        assert!(code.contains("G2 X0.000 Y5.000 I0.000 J-5.000"));
    }

    #[test]
    fn test_power_override_restored_after_shape() {
        let mut doc = Document::new();
        let mut first = rect_10x10();
        first.style_mut().set_power(30.0).unwrap();
        doc.add_shape(first).unwrap();
        doc.add_shape(rect_10x10()).unwrap();
        let code = doc.generate().unwrap();

        let low = code.find("M4 S300 (Laser on @ 30%)").unwrap();
        let high = code.find("M4 S800 (Laser on @ 80%)").unwrap();
        assert!(low < high);
    }

    #[test]
    fn test_feed_override_in_force_for_shape() {
        let mut doc = Document::new();
        let mut shape = rect_10x10();
        shape.style_mut().set_feed(750.0).unwrap();
        doc.add_shape(shape).unwrap();
        let code = doc.generate().unwrap();
        assert!(code.contains("G1 F750.0"));
        assert!(!code.contains("G1 F500.0"));
    }

    #[test]
    fn test_z_retract_before_travel() {
        let mut doc = Document::new();
        doc.set_z_retract(Some(3.0));
        doc.add_shape(rect_10x10()).unwrap();
        let code = doc.generate().unwrap();
        let retract = code.find("G0 Z3.000 F3000.0").unwrap();
        let travel = code.find("G0 X-5.000").unwrap();
        assert!(retract < travel);
    }

    #[test]
    fn test_multi_pass_steps_down() {
        let mut doc = Document::new();
        let mut shape = rect_10x10();
        shape.style_mut().set_passes(3).unwrap();
        shape.style_mut().set_stepdown(0.2).unwrap();
        doc.add_shape(shape).unwrap();
        let code = doc.generate().unwrap();
        assert!(code.contains("G1 Z-0.200"));
        assert!(code.contains("G1 Z-0.400"));
        // All passes happen inside one laser-on region.
        assert_eq!(code.matches("M4 ").count(), 1);
    }

    #[test]
    fn test_header_and_footer_comments() {
        let mut doc = Document::new();
        doc.set_header("Test Job\nSecond Line");
        doc.set_footer("Done");
        doc.add_shape(rect_10x10()).unwrap();
        let code = doc.generate().unwrap();
        assert!(code.starts_with("(Test Job)\n(Second Line)\n"));
        assert!(code.trim_end().ends_with("(Done)"));
    }

    #[test]
    fn test_job_control_disabled() {
        let mut doc = Document::new();
        doc.set_job_control(false);
        doc.add_shape(rect_10x10()).unwrap();
        let code = doc.generate().unwrap();
        assert!(!code.contains("(Machine Setup)"));
        assert!(!code.contains("M2 (End Document)"));
    }

    #[test]
    fn test_generate_is_repeatable() {
        let mut doc = Document::new();
        doc.set_layout(Layout::nearest_neighbor());
        doc.add_shape(rect_10x10()).unwrap();
        doc.add_shape(Shape::Line(Line::new(20.0, 0.0, 0.0, 5.0, 0.0).unwrap()))
            .unwrap();
        let first = doc.generate().unwrap().to_string();
        let second = doc.generate().unwrap().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn test_setters_validate() {
        let mut doc = Document::new();
        assert!(doc.set_power(120.0).is_err());
        assert!(doc.set_cut_feed(0.0).is_err());
        assert!(doc.set_fill_stepover(-1.0).is_err());
        assert!(doc.set_laser_on_code("M5").is_err());
        doc.set_laser_on_code("m3").unwrap();
        doc.add_shape(rect_10x10()).unwrap();
        let code = doc.generate().unwrap();
        assert!(code.contains("M3 S800"));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.gcode");
        let mut doc = Document::new();
        doc.add_shape(rect_10x10()).unwrap();
        doc.save(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("M2 (End Document)"));
    }

    #[test]
    fn test_from_settings_rejects_invalid() {
        let mut settings = MachineSettings::default();
        settings.travel_feed = -1.0;
        assert!(Document::from_settings(&settings).is_err());
    }
}
