//! Layout strategies for ordering and placing shapes.
//!
//! A document holds a tree of [`Node`]s: leaf shapes and nested layouts.
//! List layouts decide cutting order only; the grid and cell layouts
//! also place their children. Filled shapes are expanded when added, so
//! a layout always sees the outline plus its derived fill lines as
//! ordinary children.

use crate::document::EmitContext;
use crate::error::DesignError;
use crate::shapes::{Point, Shape};
use tracing::debug;

/// A child of a layout: a shape, a rigid group of shapes, or a nested
/// layout.
///
/// Groups hold a filled shape followed by its derived fill lines. They
/// move as one unit when a grid or cell repositions them, keeping the
/// fill aligned with its outline.
#[derive(Debug, Clone)]
pub enum Node {
    Shape(Shape),
    Group(Vec<Shape>),
    Layout(Box<Layout>),
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Shape(s) => s.kind(),
            Node::Group(_) => "Group",
            Node::Layout(l) => l.kind(),
        }
    }

    /// The group's outline shape. Groups are built non-empty.
    fn leader(shapes: &[Shape]) -> &Shape {
        &shapes[0]
    }

    /// Bounding size. Fails for nested layouts that cannot report one.
    pub fn size(&self) -> Result<(f64, f64), DesignError> {
        match self {
            Node::Shape(s) => Ok(s.size()),
            Node::Group(shapes) => Ok(Self::leader(shapes).size()),
            Node::Layout(l) => l.size(),
        }
    }

    /// The node's reference point.
    pub fn position(&self) -> Point {
        match self {
            Node::Shape(s) => s.position(),
            Node::Group(shapes) => Self::leader(shapes).position(),
            Node::Layout(l) => {
                let frame = l.frame();
                Point::new(frame.x, frame.y)
            }
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        match self {
            Node::Shape(s) => s.set_position(x, y),
            Node::Group(shapes) => {
                let current = Self::leader(shapes).position();
                let dx = x - current.x;
                let dy = y - current.y;
                for shape in shapes.iter_mut() {
                    let p = shape.position();
                    shape.set_position(p.x + dx, p.y + dy);
                }
            }
            Node::Layout(l) => {
                let frame = l.frame_mut();
                frame.x = x;
                frame.y = y;
            }
        }
    }

    /// Travel distance from a machine position to this node.
    pub fn distance(&self, from: Point) -> f64 {
        match self {
            Node::Shape(s) => s.distance(from),
            Node::Group(shapes) => Self::leader(shapes).distance(from),
            Node::Layout(_) => from.distance_to(&self.position()),
        }
    }

    /// Reorders a shape's cut to start near the reference point.
    /// Nested layouts order their own children and ignore this.
    pub fn set_start_point(&mut self, reference: Point) {
        match self {
            Node::Shape(s) => s.set_start_point(reference),
            Node::Group(shapes) => shapes[0].set_start_point(reference),
            Node::Layout(_) => {}
        }
    }

    /// Where the machine sits after this node has been cut.
    pub fn exit_point(&self) -> Point {
        match self {
            Node::Shape(s) => s.exit_point(),
            Node::Group(shapes) => shapes[shapes.len() - 1].exit_point(),
            Node::Layout(_) => self.position(),
        }
    }

    pub fn emit(&mut self, cx: &mut EmitContext<'_>) -> Result<(), DesignError> {
        match self {
            Node::Shape(s) => s.emit(cx),
            Node::Group(shapes) => {
                for shape in shapes.iter() {
                    shape.emit(cx)?;
                }
                Ok(())
            }
            Node::Layout(l) => l.emit(cx),
        }
    }
}

impl From<Shape> for Node {
    fn from(shape: Shape) -> Self {
        Node::Shape(shape)
    }
}

impl From<Layout> for Node {
    fn from(layout: Layout) -> Self {
        Node::Layout(Box::new(layout))
    }
}

/// Placement and annotation shared by every layout.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Layout origin.
    pub x: f64,
    pub y: f64,
    /// Outer padding, applied once per axis.
    pub padding_width: f64,
    pub padding_height: f64,
    /// Comment emitted before the layout's children.
    pub header: Option<String>,
    /// Comment emitted after the layout's children.
    pub footer: Option<String>,
}

/// Expands a filled shape into the shape plus its fill lines.
fn expand_fill(node: Node, stepover: f64) -> Result<Vec<Node>, DesignError> {
    match node {
        Node::Shape(shape) if shape.style().is_filled() => {
            let fills = shape.fill_lines(stepover)?;
            debug!(
                shape = shape.kind(),
                lines = fills.len(),
                "expanded fill"
            );
            let mut out = Vec::with_capacity(1 + fills.len());
            out.push(Node::Shape(shape));
            out.extend(fills.into_iter().map(Node::Shape));
            Ok(out)
        }
        other => Ok(vec![other]),
    }
}

/// Like [`expand_fill`] but always yields one node, grouping a shape
/// with its fill lines so single-slot layouts can move them together.
fn expand_fill_single(node: Node, stepover: f64) -> Result<Node, DesignError> {
    match node {
        Node::Shape(shape) if shape.style().is_filled() => {
            let fills = shape.fill_lines(stepover)?;
            let mut shapes = Vec::with_capacity(1 + fills.len());
            shapes.push(shape);
            shapes.extend(fills);
            Ok(Node::Group(shapes))
        }
        other => Ok(other),
    }
}

/// Emits children in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SequentialLayout {
    pub frame: Frame,
    children: Vec<Node>,
}

impl SequentialLayout {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Greedy nearest-neighbor ordering.
///
/// Starting from the machine origin, repeatedly cuts the unvisited child
/// closest to the current position, lets the child reorder its own cut
/// to start nearby, and advances to the child's exit point. Ties go to
/// the earliest-added child.
#[derive(Debug, Clone, Default)]
pub struct NearestNeighborLayout {
    pub frame: Frame,
    children: Vec<Node>,
}

impl NearestNeighborLayout {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&mut self, cx: &mut EmitContext<'_>) -> Result<(), DesignError> {
        let mut position = Point::new(0.0, 0.0);
        let mut remaining: Vec<usize> = (0..self.children.len()).collect();
        while !remaining.is_empty() {
            let mut best = 0;
            let mut best_distance = f64::INFINITY;
            for (slot, &index) in remaining.iter().enumerate() {
                let d = self.children[index].distance(position);
                if d < best_distance {
                    best_distance = d;
                    best = slot;
                }
            }
            let index = remaining.remove(best);
            let child = &mut self.children[index];
            child.set_start_point(position);
            child.emit(cx)?;
            position = child.exit_point();
        }
        Ok(())
    }
}

/// Travelling-salesman ordering over child reference points.
///
/// Builds a squared-distance weight matrix, starts from the child
/// nearest the machine origin, and follows the cheapest unvisited edge
/// from each stop. The tour does not return to its start.
#[derive(Debug, Clone, Default)]
pub struct TspLayout {
    pub frame: Frame,
    children: Vec<Node>,
}

impl TspLayout {
    pub fn new() -> Self {
        Self::default()
    }

    fn tour(&self) -> Vec<usize> {
        let n = self.children.len();
        if n == 0 {
            return Vec::new();
        }
        let centers: Vec<Point> = self.children.iter().map(|c| c.position()).collect();
        let mut weight = vec![vec![0.0f64; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = centers[i].distance_to(&centers[j]);
                weight[i][j] = d * d;
                weight[j][i] = d * d;
            }
        }

        let origin = Point::new(0.0, 0.0);
        let mut source = 0;
        let mut best = f64::INFINITY;
        for (i, child) in self.children.iter().enumerate() {
            let d = child.distance(origin);
            if d < best {
                best = d;
                source = i;
            }
        }

        let mut visited = vec![false; n];
        visited[source] = true;
        let mut order = vec![source];
        while order.len() < n {
            let current = order[order.len() - 1];
            let mut next = None;
            let mut next_weight = f64::INFINITY;
            for (j, seen) in visited.iter().enumerate() {
                if !seen && weight[current][j] < next_weight {
                    next_weight = weight[current][j];
                    next = Some(j);
                }
            }
            match next {
                Some(j) => {
                    visited[j] = true;
                    order.push(j);
                }
                None => break,
            }
        }
        order
    }

    fn emit(&mut self, cx: &mut EmitContext<'_>) -> Result<(), DesignError> {
        let order = self.tour();
        debug!(children = self.children.len(), "tsp tour computed");
        for index in order {
            self.children[index].emit(cx)?;
        }
        Ok(())
    }
}

/// A single padded slot around one child.
#[derive(Debug, Clone, Default)]
pub struct CellLayout {
    pub frame: Frame,
    child: Option<Node>,
}

impl CellLayout {
    pub fn new(padding_width: f64, padding_height: f64) -> Self {
        Self {
            frame: Frame {
                padding_width,
                padding_height,
                ..Frame::default()
            },
            child: None,
        }
    }

    pub fn set_child(&mut self, node: Node, stepover: f64) -> Result<(), DesignError> {
        self.child = Some(expand_fill_single(node, stepover)?);
        Ok(())
    }

    fn size(&self) -> Result<(f64, f64), DesignError> {
        match &self.child {
            Some(child) => {
                let (w, h) = child.size()?;
                Ok((
                    w + 2.0 * self.frame.padding_width,
                    h + 2.0 * self.frame.padding_height,
                ))
            }
            None => Ok((
                2.0 * self.frame.padding_width,
                2.0 * self.frame.padding_height,
            )),
        }
    }

    fn emit(&mut self, cx: &mut EmitContext<'_>) -> Result<(), DesignError> {
        if let Some(header) = &self.frame.header {
            cx.out.comment(header);
        }
        match &mut self.child {
            Some(child) => {
                child.set_position(
                    self.frame.x + self.frame.padding_width,
                    self.frame.y + self.frame.padding_height,
                );
                child.emit(cx)?;
            }
            None => cx.out.line("( *Empty Cell* )"),
        }
        if let Some(footer) = &self.frame.footer {
            cx.out.comment(footer);
        }
        Ok(())
    }
}

/// A rows-by-columns arrangement of cells.
///
/// Row 0 is the top row, matching how a test pattern reads on the
/// machine bed. Columns are sized to their widest member and rows to
/// their tallest; children are centered within their cell.
#[derive(Debug, Clone)]
pub struct GridLayout {
    pub frame: Frame,
    rows: usize,
    columns: usize,
    cells: Vec<Option<Node>>,
    cell_padding_width: f64,
    cell_padding_height: f64,
}

impl GridLayout {
    pub fn new(rows: usize, columns: usize) -> Result<Self, DesignError> {
        if rows == 0 || columns == 0 {
            return Err(DesignError::InvalidGrid {
                reason: format!("dimensions must be at least 1x1, got {}x{}", rows, columns),
            });
        }
        Ok(Self {
            frame: Frame::default(),
            rows,
            columns,
            cells: vec![None; rows * columns],
            cell_padding_width: 0.0,
            cell_padding_height: 0.0,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Padding applied inside cells created by [`add_cell`].
    ///
    /// [`add_cell`]: GridLayout::add_cell
    pub fn set_cell_padding(&mut self, width: f64, height: f64) {
        self.cell_padding_width = width;
        self.cell_padding_height = height;
    }

    fn slot(&self, row: usize, column: usize) -> Result<usize, DesignError> {
        if row >= self.rows || column >= self.columns {
            return Err(DesignError::GridIndex {
                row,
                column,
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(row * self.columns + column)
    }

    /// Places a node directly into a cell, replacing any occupant.
    pub fn set_cell(
        &mut self,
        row: usize,
        column: usize,
        node: Node,
        stepover: f64,
    ) -> Result<(), DesignError> {
        let slot = self.slot(row, column)?;
        self.cells[slot] = Some(expand_fill_single(node, stepover)?);
        Ok(())
    }

    /// Wraps a node in a padded cell and places it.
    pub fn add_cell(
        &mut self,
        row: usize,
        column: usize,
        node: Node,
        stepover: f64,
    ) -> Result<(), DesignError> {
        let slot = self.slot(row, column)?;
        let mut cell = CellLayout::new(self.cell_padding_width, self.cell_padding_height);
        cell.set_child(node, stepover)?;
        self.cells[slot] = Some(Node::Layout(Box::new(Layout::Cell(cell))));
        Ok(())
    }

    fn cell_sizes(&self) -> Result<Vec<(f64, f64)>, DesignError> {
        self.cells
            .iter()
            .map(|cell| match cell {
                Some(node) => node.size(),
                None => Ok((0.0, 0.0)),
            })
            .collect()
    }

    fn column_widths(&self, sizes: &[(f64, f64)]) -> Vec<f64> {
        let mut widths = vec![0.0f64; self.columns];
        for i in 0..self.rows {
            for (j, width) in widths.iter_mut().enumerate() {
                *width = width.max(sizes[i * self.columns + j].0);
            }
        }
        widths
    }

    fn row_heights(&self, sizes: &[(f64, f64)]) -> Vec<f64> {
        let mut heights = vec![0.0f64; self.rows];
        for (i, height) in heights.iter_mut().enumerate() {
            for j in 0..self.columns {
                *height = height.max(sizes[i * self.columns + j].1);
            }
        }
        heights
    }

    fn size(&self) -> Result<(f64, f64), DesignError> {
        let sizes = self.cell_sizes()?;
        let width: f64 = self.column_widths(&sizes).iter().sum();
        let height: f64 = self.row_heights(&sizes).iter().sum();
        Ok((
            width + self.frame.padding_width,
            height + self.frame.padding_height,
        ))
    }

    fn emit(&mut self, cx: &mut EmitContext<'_>) -> Result<(), DesignError> {
        if let Some(header) = &self.frame.header {
            cx.out.comment(header);
        }
        let sizes = self.cell_sizes()?;
        let column_widths = self.column_widths(&sizes);
        let row_heights = self.row_heights(&sizes);
        let x_base = self.frame.x + self.frame.padding_width;
        let y_base = self.frame.y + self.frame.padding_height;

        for i in 0..self.rows {
            for j in 0..self.columns {
                cx.out.line(&format!("(Grid cell {},{} )", i, j));
                let slot = i * self.columns + j;
                let node = match &mut self.cells[slot] {
                    Some(node) => node,
                    None => {
                        cx.out.line("( *Empty Cell* )");
                        continue;
                    }
                };
                let (w, h) = sizes[slot];
                // Row 0 sits at the top, so a cell's y offset is the
                // total height of every row below it.
                let x_offset = x_base
                    + column_widths[..j].iter().sum::<f64>()
                    + (column_widths[j] - w) / 2.0;
                let y_offset = y_base
                    + row_heights[i + 1..].iter().sum::<f64>()
                    + (row_heights[i] - h) / 2.0;
                node.set_position(x_offset, y_offset);
                node.emit(cx)?;
            }
        }
        if let Some(footer) = &self.frame.footer {
            cx.out.comment(footer);
        }
        Ok(())
    }
}

/// A cutting-order and placement strategy over child nodes.
#[derive(Debug, Clone)]
pub enum Layout {
    Sequential(SequentialLayout),
    NearestNeighbor(NearestNeighborLayout),
    Tsp(TspLayout),
    Grid(GridLayout),
    Cell(CellLayout),
}

impl Layout {
    pub fn sequential() -> Self {
        Layout::Sequential(SequentialLayout::new())
    }

    pub fn nearest_neighbor() -> Self {
        Layout::NearestNeighbor(NearestNeighborLayout::new())
    }

    pub fn tsp() -> Self {
        Layout::Tsp(TspLayout::new())
    }

    pub fn grid(rows: usize, columns: usize) -> Result<Self, DesignError> {
        Ok(Layout::Grid(GridLayout::new(rows, columns)?))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Layout::Sequential(_) => "Sequential",
            Layout::NearestNeighbor(_) => "NearestNeighbor",
            Layout::Tsp(_) => "Tsp",
            Layout::Grid(_) => "Grid",
            Layout::Cell(_) => "Cell",
        }
    }

    pub fn frame(&self) -> &Frame {
        match self {
            Layout::Sequential(l) => &l.frame,
            Layout::NearestNeighbor(l) => &l.frame,
            Layout::Tsp(l) => &l.frame,
            Layout::Grid(l) => &l.frame,
            Layout::Cell(l) => &l.frame,
        }
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        match self {
            Layout::Sequential(l) => &mut l.frame,
            Layout::NearestNeighbor(l) => &mut l.frame,
            Layout::Tsp(l) => &mut l.frame,
            Layout::Grid(l) => &mut l.frame,
            Layout::Cell(l) => &mut l.frame,
        }
    }

    /// Adds a child node. Filled shapes are expanded into the outline
    /// plus fill lines using the given stepover. For a grid this targets
    /// cell (0,0); use [`GridLayout`] methods to address other cells.
    pub fn add_child(&mut self, node: Node, stepover: f64) -> Result<(), DesignError> {
        match self {
            Layout::Sequential(l) => {
                l.children.extend(expand_fill(node, stepover)?);
                Ok(())
            }
            Layout::NearestNeighbor(l) => {
                l.children.extend(expand_fill(node, stepover)?);
                Ok(())
            }
            Layout::Tsp(l) => {
                l.children.extend(expand_fill(node, stepover)?);
                Ok(())
            }
            Layout::Grid(l) => l.set_cell(0, 0, node, stepover),
            Layout::Cell(l) => l.set_child(node, stepover),
        }
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        match self {
            Layout::Sequential(l) => l.children.len(),
            Layout::NearestNeighbor(l) => l.children.len(),
            Layout::Tsp(l) => l.children.len(),
            Layout::Grid(l) => l.cells.iter().filter(|c| c.is_some()).count(),
            Layout::Cell(l) => usize::from(l.child.is_some()),
        }
    }

    /// Overall placed size. Only grids and cells know their extent;
    /// ordering-only layouts fail.
    pub fn size(&self) -> Result<(f64, f64), DesignError> {
        match self {
            Layout::Grid(l) => l.size(),
            Layout::Cell(l) => l.size(),
            other => Err(DesignError::SizeUnsupported {
                layout: other.kind(),
            }),
        }
    }

    pub fn set_origin(&mut self, x: f64, y: f64) {
        let frame = self.frame_mut();
        frame.x = x;
        frame.y = y;
    }

    pub fn emit(&mut self, cx: &mut EmitContext<'_>) -> Result<(), DesignError> {
        match self {
            Layout::Sequential(l) => {
                if let Some(header) = &l.frame.header {
                    cx.out.comment(header);
                }
                for child in &mut l.children {
                    child.emit(cx)?;
                }
                if let Some(footer) = &l.frame.footer {
                    cx.out.comment(footer);
                }
                Ok(())
            }
            Layout::NearestNeighbor(l) => {
                if let Some(header) = &l.frame.header {
                    cx.out.comment(header);
                }
                l.emit(cx)?;
                if let Some(footer) = &l.frame.footer {
                    cx.out.comment(footer);
                }
                Ok(())
            }
            Layout::Tsp(l) => {
                if let Some(header) = &l.frame.header {
                    cx.out.comment(header);
                }
                l.emit(cx)?;
                if let Some(footer) = &l.frame.footer {
                    cx.out.comment(footer);
                }
                Ok(())
            }
            Layout::Grid(l) => l.emit(cx),
            Layout::Cell(l) => l.emit(cx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{CodeBuffer, EmitContext, MachineState};
    use crate::shapes::{Circle, Line, Rectangle};
    use engravekit_core::MachineSettings;

    fn emit_layout(layout: &mut Layout) -> String {
        let mut machine = MachineState::from_settings(&MachineSettings::default());
        let mut out = CodeBuffer::new("\n");
        let mut cx = EmitContext {
            machine: &mut machine,
            out: &mut out,
        };
        layout.emit(&mut cx).unwrap();
        out.as_str().to_string()
    }

    fn line_at(x: f64, y: f64) -> Node {
        Node::Shape(Shape::Line(Line::new(x, y, 0.0, 1.0, 0.0).unwrap()))
    }

    #[test]
    fn test_sequential_preserves_insertion_order() {
        let mut layout = Layout::sequential();
        layout.add_child(line_at(50.0, 50.0), 0.1).unwrap();
        layout.add_child(line_at(1.0, 1.0), 0.1).unwrap();
        let code = emit_layout(&mut layout);
        let far = code.find("X50.000").unwrap();
        let near = code.find("X1.000").unwrap();
        assert!(far < near);
    }

    #[test]
    fn test_nearest_neighbor_orders_by_distance() {
        let mut layout = Layout::nearest_neighbor();
        layout.add_child(line_at(50.0, 50.0), 0.1).unwrap();
        layout.add_child(line_at(1.0, 1.0), 0.1).unwrap();
        layout.add_child(line_at(20.0, 20.0), 0.1).unwrap();
        let code = emit_layout(&mut layout);
        let near = code.find("X1.000").unwrap();
        let mid = code.find("X20.000").unwrap();
        let far = code.find("X50.000").unwrap();
        assert!(near < mid && mid < far);
    }

    #[test]
    fn test_nearest_neighbor_tie_goes_to_first_listed() {
        let mut layout = Layout::nearest_neighbor();
        // Both starts sit exactly 5 units from the origin.
        layout.add_child(line_at(3.0, 4.0), 0.1).unwrap();
        layout.add_child(line_at(4.0, 3.0), 0.1).unwrap();
        let code = emit_layout(&mut layout);
        let first = code.find("X3.000 Y4.000").unwrap();
        let second = code.find("X4.000 Y3.000").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_nearest_neighbor_reverses_toward_cursor() {
        let mut layout = Layout::nearest_neighbor();
        // End of this line is closer to the origin than its start.
        let line = Line::new(10.0, 0.0, 0.0, 9.0, 180.0).unwrap();
        layout.add_child(Node::Shape(Shape::Line(line)), 0.1).unwrap();
        let code = emit_layout(&mut layout);
        // Travel goes to the end nearest the origin.
        assert!(code.contains("G0 X1.000 Y0.000"));
    }

    #[test]
    fn test_tsp_starts_nearest_origin_and_visits_all() {
        let mut layout = Layout::tsp();
        layout.add_child(line_at(40.0, 0.0), 0.1).unwrap();
        layout.add_child(line_at(2.0, 0.0), 0.1).unwrap();
        layout.add_child(line_at(20.0, 0.0), 0.1).unwrap();
        let code = emit_layout(&mut layout);
        let near = code.find("X2.000").unwrap();
        let mid = code.find("X20.000").unwrap();
        let far = code.find("X40.000").unwrap();
        assert!(near < mid && mid < far);
    }

    #[test]
    fn test_ordering_layouts_have_no_size() {
        assert!(matches!(
            Layout::sequential().size(),
            Err(DesignError::SizeUnsupported {
                layout: "Sequential"
            })
        ));
        assert!(matches!(
            Layout::nearest_neighbor().size(),
            Err(DesignError::SizeUnsupported { .. })
        ));
    }

    #[test]
    fn test_grid_size_includes_cell_padding() {
        let mut grid = GridLayout::new(1, 1).unwrap();
        grid.set_cell_padding(2.0, 2.0);
        let rect = Rectangle::new(0.0, 0.0, 0.0, 10.0, 10.0).unwrap();
        grid.add_cell(0, 0, Node::Shape(Shape::Rectangle(rect)), 0.1)
            .unwrap();
        let (w, h) = Layout::Grid(grid).size().unwrap();
        assert!((w - 14.0).abs() < 1e-9, "width {}", w);
        assert!((h - 14.0).abs() < 1e-9, "height {}", h);
    }

    #[test]
    fn test_grid_rejects_out_of_bounds() {
        let mut grid = GridLayout::new(2, 3).unwrap();
        let err = grid.set_cell(2, 0, line_at(0.0, 0.0), 0.1);
        assert!(matches!(
            err,
            Err(DesignError::GridIndex {
                row: 2,
                rows: 2,
                ..
            })
        ));
        assert!(GridLayout::new(0, 3).is_err());
    }

    #[test]
    fn test_grid_marks_empty_cells() {
        let mut grid = GridLayout::new(1, 2).unwrap();
        grid.set_cell(0, 1, line_at(0.0, 0.0), 0.1).unwrap();
        let mut layout = Layout::Grid(grid);
        let code = emit_layout(&mut layout);
        assert!(code.contains("(Grid cell 0,0 )"));
        assert!(code.contains("( *Empty Cell* )"));
        assert!(code.contains("(Grid cell 0,1 )"));
    }

    #[test]
    fn test_grid_row_zero_on_top() {
        let mut grid = GridLayout::new(2, 1).unwrap();
        let top = Rectangle::new(0.0, 0.0, 0.0, 10.0, 10.0).unwrap();
        let bottom = Rectangle::new(0.0, 0.0, 0.0, 10.0, 10.0).unwrap();
        let mut top = Shape::Rectangle(top);
        let mut bottom = Shape::Rectangle(bottom);
        top.style_mut().header = Some("top".into());
        bottom.style_mut().header = Some("bottom".into());
        grid.set_cell(0, 0, Node::Shape(top), 0.1).unwrap();
        grid.set_cell(1, 0, Node::Shape(bottom), 0.1).unwrap();
        let mut layout = Layout::Grid(grid);
        let code = emit_layout(&mut layout);

        let y_of = |header: &str| -> f64 {
            let at = code.find(header).unwrap();
            let rest = &code[at..];
            let y_at = rest.find(" Y").unwrap();
            rest[y_at + 2..]
                .split_whitespace()
                .next()
                .unwrap()
                .parse()
                .unwrap()
        };
        assert!(y_of("(top)") > y_of("(bottom)"));
    }

    #[test]
    fn test_filled_shape_expands_on_add() {
        let mut rect = Shape::Rectangle(Rectangle::new(0.0, 0.0, 0.0, 10.0, 10.0).unwrap());
        rect.style_mut().set_filled(true).unwrap();
        let mut layout = Layout::sequential();
        layout.add_child(Node::Shape(rect), 1.0).unwrap();
        // Outline plus nine fill lines.
        assert_eq!(layout.child_count(), 10);
    }

    #[test]
    fn test_filled_shape_in_grid_cell_stays_grouped() {
        let mut circle = Shape::Circle(Circle::new(0.0, 0.0, 0.0, 5.0).unwrap());
        circle.style_mut().set_filled(true).unwrap();
        let mut grid = GridLayout::new(1, 1).unwrap();
        grid.add_cell(0, 0, Node::Shape(circle), 1.0).unwrap();
        let mut layout = Layout::Grid(grid);
        let code = emit_layout(&mut layout);
        assert!(code.contains("Circle:"));
        assert!(code.contains("Line:"));
    }
}
