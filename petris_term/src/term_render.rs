use petris::{Cell, Frame, Renderer, SessionState};

#[derive(Clone, PartialEq, Debug)]
pub enum TermCell {
    FieldCell(Cell),
    BorderVertical,
    BorderHorizontal,
    BorderTopLeft,
    BorderTopRight,
    BorderBottomLeft,
    BorderBottomRight,
    Space,
    Message(String),
}

pub trait TermStyle {
    fn display<'a>(&self, cell: &'a TermCell) -> &'a str;
    fn width(&self, cell: &TermCell) -> usize;
}

pub trait TermRender {
    fn output(&self, style: &impl TermStyle) -> Vec<Vec<TermCell>>;
    fn render(&self, style: &impl TermStyle) -> Vec<String> {
        let mut lines = Vec::new();
        for row in self.output(style) {
            let mut line = String::new();
            for cell in &row {
                line.push_str(style.display(cell));
            }
            lines.push(line);
        }
        lines
    }
}

// Make all lines in block the same width by padding with TermCell::Space
pub fn pad_block_right(block: &mut [Vec<TermCell>], style: &impl TermStyle) {
    assert_eq!(style.width(&TermCell::Space), 1);
    let widths: Vec<usize> = block
        .iter()
        .map(|row| row.iter().map(|cell| style.width(cell)).sum())
        .collect();
    let width = widths.iter().copied().max().unwrap_or(0);
    for (row, line_width) in block.iter_mut().zip(widths) {
        row.extend(std::iter::repeat_n(TermCell::Space, width - line_width));
    }
}

fn cell_width(cell: &TermCell) -> usize {
    match cell {
        TermCell::FieldCell(_) | TermCell::BorderHorizontal => 2,
        TermCell::BorderVertical
        | TermCell::BorderTopLeft
        | TermCell::BorderTopRight
        | TermCell::BorderBottomLeft
        | TermCell::BorderBottomRight
        | TermCell::Space => 1,
        TermCell::Message(s) => s.chars().count(),
    }
}

pub struct PlainTermStyle;

impl TermStyle for PlainTermStyle {
    fn display<'a>(&self, cell: &'a TermCell) -> &'a str {
        match cell {
            TermCell::FieldCell(Cell::Empty) => "  ",
            TermCell::FieldCell(Cell::Wall) => "##",
            TermCell::FieldCell(Cell::Block(_)) => "[]",
            TermCell::BorderVertical => "|",
            TermCell::BorderTopLeft
            | TermCell::BorderTopRight
            | TermCell::BorderBottomLeft
            | TermCell::BorderBottomRight => "+",
            TermCell::BorderHorizontal => "--",
            TermCell::Space => " ",
            TermCell::Message(s) => s.as_str(),
        }
    }
    fn width(&self, cell: &TermCell) -> usize {
        cell_width(cell)
    }
}

/// Colors follow the block palette: gray, black, red, yellow, green, cyan, blue, magenta
pub struct AnsiTermStyle;

impl TermStyle for AnsiTermStyle {
    fn display<'a>(&self, cell: &'a TermCell) -> &'a str {
        match cell {
            TermCell::FieldCell(Cell::Empty) => "\x1b[0m  ",
            TermCell::FieldCell(Cell::Wall) => "\x1b[0m##",
            TermCell::FieldCell(Cell::Block(color)) => match color {
                0 => "\x1b[0;90m[]",
                1 => "\x1b[0;30;47m[]",
                2 => "\x1b[0;31m[]",
                3 => "\x1b[0;33m[]",
                4 => "\x1b[0;32m[]",
                5 => "\x1b[0;36m[]",
                6 => "\x1b[0;34m[]",
                7 => "\x1b[0;35m[]",
                _ => "\x1b[0;37m[]",
            },
            TermCell::BorderVertical => "\x1b[0m│",
            TermCell::BorderTopLeft => "\x1b[0m┌",
            TermCell::BorderTopRight => "\x1b[0m┐",
            TermCell::BorderBottomLeft => "\x1b[0m└",
            TermCell::BorderHorizontal => "\x1b[0m──",
            TermCell::BorderBottomRight => "\x1b[0m┘",
            TermCell::Space => " ",
            TermCell::Message(s) => s.as_str(),
        }
    }
    fn width(&self, cell: &TermCell) -> usize {
        cell_width(cell)
    }
}

/// Renderer target collecting the well one cell per block
pub struct TermCanvas {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    overlay: Option<String>,
}

impl TermCanvas {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::Empty; cols * rows],
            overlay: None,
        }
    }

    pub fn from_frame(frame: &Frame) -> Self {
        let mut canvas = Self::new(frame.cols, frame.rows);
        frame.draw(&mut canvas, 1);
        canvas
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.cols + x]
    }
}

impl Renderer for TermCanvas {
    fn draw_background(&mut self) {
        self.cells.fill(Cell::Empty);
        self.overlay = None;
    }

    fn draw_block(&mut self, x: u32, y: u32, cell: Cell) {
        let (x, y) = (x as usize, y as usize);
        if cell.is_empty() || x >= self.cols || y >= self.rows {
            return;
        }
        self.cells[y * self.cols + x] = cell;
    }

    fn draw_game_over(&mut self, text: &str) {
        self.overlay = Some(text.to_string());
    }
}

impl TermRender for TermCanvas {
    fn output(&self, style: &impl TermStyle) -> Vec<Vec<TermCell>> {
        let mut lines: Vec<Vec<TermCell>> = (0..self.rows)
            .map(|y| (0..self.cols).map(|x| TermCell::FieldCell(self.cell(x, y))).collect())
            .collect();

        if let Some(text) = &self.overlay {
            let middle = lines.len() / 2;
            let inner = self.cols * 2;
            let pad = inner.saturating_sub(text.chars().count()) / 2;
            lines[middle] = vec![TermCell::Message(format!("{}{}", " ".repeat(pad), text))];
            pad_block_right(&mut lines, style);
        }

        for line in &mut lines {
            line.insert(0, TermCell::BorderVertical);
            line.push(TermCell::BorderVertical);
        }

        let mut top = vec![TermCell::BorderTopLeft];
        top.extend(std::iter::repeat_n(TermCell::BorderHorizontal, self.cols));
        top.push(TermCell::BorderTopRight);
        lines.insert(0, top);

        let mut bottom = vec![TermCell::BorderBottomLeft];
        bottom.extend(std::iter::repeat_n(TermCell::BorderHorizontal, self.cols));
        bottom.push(TermCell::BorderBottomRight);
        lines.push(bottom);
        lines
    }
}

/// Score, level and the keys to press
pub struct StatusPanel {
    score: u64,
    level: u64,
    state: SessionState,
}

impl StatusPanel {
    pub fn from_frame(frame: &Frame) -> Self {
        Self {
            score: frame.score,
            level: frame.level,
            state: frame.state,
        }
    }
}

impl TermRender for StatusPanel {
    fn output(&self, _style: &impl TermStyle) -> Vec<Vec<TermCell>> {
        let hint = match self.state {
            SessionState::Running => "Esc: stop",
            SessionState::NotStarted | SessionState::GameOver => "Enter: start",
        };
        [
            format!("Score: {}", self.score),
            format!("Level: {}", self.level),
            String::new(),
            format!("{}", self.state),
            hint.to_string(),
            String::new(),
            "←/→  move".to_string(),
            "↓    drop".to_string(),
            "↑/z  rotate left".to_string(),
            "x    rotate right".to_string(),
            "q    quit".to_string(),
        ]
        .into_iter()
        .map(|text| if text.is_empty() { Vec::new() } else { vec![TermCell::Message(text)] })
        .collect()
    }
}

/// Well on the left, status panel on the right
pub struct GameScreen {
    well: TermCanvas,
    panel: StatusPanel,
}

impl GameScreen {
    pub fn new(frame: &Frame) -> Self {
        Self {
            well: TermCanvas::from_frame(frame),
            panel: StatusPanel::from_frame(frame),
        }
    }
}

impl TermRender for GameScreen {
    fn output(&self, style: &impl TermStyle) -> Vec<Vec<TermCell>> {
        let mut well_lines = self.well.output(style);
        let mut panel_lines = self.panel.output(style);
        pad_block_right(&mut well_lines, style);
        pad_block_right(&mut panel_lines, style);

        let well_width: usize = well_lines
            .first()
            .map(|row| row.iter().map(|c| style.width(c)).sum())
            .unwrap_or(0);

        let total = well_lines.len().max(panel_lines.len());
        (0..total)
            .map(|i| {
                let mut line = match well_lines.get(i) {
                    Some(row) => row.clone(),
                    None => vec![TermCell::Space; well_width],
                };
                line.push(TermCell::Space);
                line.push(TermCell::Space);
                if let Some(row) = panel_lines.get(i) {
                    line.extend(row.iter().cloned());
                }
                line
            })
            .collect()
    }
}
