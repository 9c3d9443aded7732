//! The demo surface: tiles laid out in a grid, painted with plain VT
//! sequences.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::{Rc, Weak};

use tuiloop::DELETE;
use tuiloop::prelude::*;

/// Characters kept per tile.
const MAX_TEXT: usize = 32;

type TileRef = Rc<RefCell<Tile>>;

/// Parse `COLSxROWS`. Both must be positive.
pub fn parse_grid(value: &str) -> Option<(usize, usize)> {
    let (cols, rows) = value.trim().split_once(['x', 'X'])?;
    let cols: usize = cols.parse().ok()?;
    let rows: usize = rows.parse().ok()?;
    (cols > 0 && rows > 0).then_some((cols, rows))
}

pub struct Tile {
    row: usize,
    col: usize,
    text: String,
    focused: bool,
    /// Needs repainting on the next surface update.
    dirty: bool,
    me: Weak<RefCell<Tile>>,
    /// Indexed like [`Direction::ALL`].
    neighbors: [Option<Weak<RefCell<Tile>>>; 4],
}

impl Tile {
    fn new(row: usize, col: usize, me: &Weak<RefCell<Tile>>) -> Self {
        Self {
            row,
            col,
            text: String::new(),
            focused: false,
            dirty: true,
            me: me.clone(),
            neighbors: [None, None, None, None],
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn label(&self) -> String {
        format!("{},{} {}", self.row, self.col, self.text())
    }

    fn touch(&self, cx: &mut dyn Invalidate) {
        if let Some(me) = self.me.upgrade() {
            let node: NodeRef = me;
            cx.invalidate(&node);
        }
    }
}

fn slot(direction: Direction) -> usize {
    Direction::ALL
        .iter()
        .position(|d| *d == direction)
        .unwrap_or_default()
}

impl Focusable for Tile {
    fn handle_event(&mut self, c: char, cx: &mut dyn Invalidate) {
        match c {
            DELETE => {
                self.text.pop();
            }
            '\n' | '\r' => self.text.clear(),
            c if c.is_control() => return,
            c => {
                if self.text.chars().count() >= MAX_TEXT {
                    self.text.remove(0);
                }
                self.text.push(c);
            }
        }
        self.touch(cx);
    }

    fn resign_focus(&mut self, cx: &mut dyn Invalidate) {
        self.focused = false;
        self.touch(cx);
    }

    fn become_focus(&mut self, cx: &mut dyn Invalidate) {
        self.focused = true;
        self.touch(cx);
    }

    fn neighbor(&self, direction: Direction, _origin: Point) -> Option<FocusRef> {
        let tile = self.neighbors[slot(direction)].as_ref()?.upgrade()?;
        Some(tile)
    }

    fn focus_origin(&self) -> Point {
        Point::new(self.col as u16, self.row as u16)
    }
}

impl ViewNode for Tile {
    fn update(&mut self, _cx: &mut dyn Invalidate) -> Result<(), ViewError> {
        self.dirty = true;
        Ok(())
    }
}

/// Width and height of one tile, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TileGeometry {
    width: u16,
    height: u16,
}

/// Grid of tiles writing to `out`.
pub struct Board {
    cols: usize,
    rows: usize,
    tiles: Vec<TileRef>,
    geometry: Option<TileGeometry>,
    out: Box<dyn Write>,
}

impl Board {
    pub fn new(cols: usize, rows: usize, out: Box<dyn Write>) -> Self {
        let tiles: Vec<TileRef> = (0..rows * cols)
            .map(|i| Rc::new_cyclic(|me| RefCell::new(Tile::new(i / cols, i % cols, me))))
            .collect();
        for row in 0..rows {
            for col in 0..cols {
                let link = |r: Option<usize>, c: Option<usize>| {
                    let (r, c) = (r?, c?);
                    (r < rows && c < cols).then(|| Rc::downgrade(&tiles[r * cols + c]))
                };
                let mut tile = tiles[row * cols + col].borrow_mut();
                tile.neighbors[slot(Direction::Up)] = link(row.checked_sub(1), Some(col));
                tile.neighbors[slot(Direction::Down)] = link(Some(row + 1), Some(col));
                tile.neighbors[slot(Direction::Left)] = link(Some(row), col.checked_sub(1));
                tile.neighbors[slot(Direction::Right)] = link(Some(row), Some(col + 1));
            }
        }
        Self {
            cols,
            rows,
            tiles,
            geometry: None,
            out,
        }
    }

    #[cfg(test)]
    fn tile(&self, row: usize, col: usize) -> &TileRef {
        &self.tiles[row * self.cols + col]
    }

    fn paint(&mut self, only_dirty: bool) -> io::Result<()> {
        let Some(geometry) = self.geometry else {
            return Ok(());
        };
        if geometry.width == 0 || geometry.height == 0 {
            return Ok(());
        }
        let width = usize::from(geometry.width);
        for tile in &self.tiles {
            let mut tile = tile.borrow_mut();
            if only_dirty && !tile.dirty {
                continue;
            }
            tile.dirty = false;
            let x = tile.col as u16 * geometry.width + 1;
            let y = tile.row as u16 * geometry.height + 1;
            let mut label: String = tile.label().chars().take(width).collect();
            let pad = width.saturating_sub(label.chars().count());
            label.extend(std::iter::repeat_n(' ', pad));
            write!(self.out, "\x1b[{y};{x}H")?;
            if tile.is_focused() {
                write!(self.out, "\x1b[7m{label}\x1b[0m")?;
            } else {
                write!(self.out, "{label}")?;
            }
        }
        self.out.flush()
    }
}

impl Surface for Board {
    fn layout(&mut self, size: Size) {
        if self.geometry.is_none() {
            let cols = u16::try_from(self.cols).unwrap_or(u16::MAX).max(1);
            let rows = u16::try_from(self.rows).unwrap_or(u16::MAX).max(1);
            self.geometry = Some(TileGeometry {
                width: size.width / cols,
                height: size.height / rows,
            });
        }
    }

    fn draw(&mut self) -> Result<(), ViewError> {
        write!(self.out, "\x1b[2J").map_err(ViewError::Render)?;
        self.paint(false).map_err(ViewError::Render)
    }

    fn update(&mut self) -> Result<(), ViewError> {
        self.paint(true).map_err(ViewError::Render)
    }

    fn invalidate_size_cache(&mut self) {
        self.geometry = None;
        // Tiles moved; everything repaints after a clear.
        for tile in &self.tiles {
            tile.borrow_mut().dirty = true;
        }
        let _ = write!(self.out, "\x1b[2J");
    }

    fn first_focusable(&self) -> Option<FocusRef> {
        let tile = self.tiles.first()?.clone();
        Some(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tuiloop::headless::{HeadlessHost, Step};

    #[derive(Clone, Default)]
    struct Screen(Arc<Mutex<Vec<u8>>>);

    impl Screen {
        fn take(&self) -> String {
            let bytes = std::mem::take(&mut *self.0.lock().unwrap());
            String::from_utf8(bytes).unwrap()
        }
    }

    impl Write for Screen {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn board(cols: usize, rows: usize) -> (Board, Screen) {
        let screen = Screen::default();
        (Board::new(cols, rows, Box::new(screen.clone())), screen)
    }

    fn tiles(board: &Board) -> Vec<TileRef> {
        board.tiles.clone()
    }

    #[test]
    fn parse_grid_accepts_cols_by_rows() {
        assert_eq!(parse_grid("4x2"), Some((4, 2)));
        assert_eq!(parse_grid(" 1X1 "), Some((1, 1)));
        assert_eq!(parse_grid("0x3"), None);
        assert_eq!(parse_grid("3"), None);
        assert_eq!(parse_grid("ax3"), None);
    }

    #[test]
    fn neighbors_follow_the_grid() {
        let (board, _) = board(2, 2);
        let origin = Point::ORIGIN;
        let top_left = board.tile(0, 0).borrow();
        assert!(top_left.neighbor(Direction::Up, origin).is_none());
        assert!(top_left.neighbor(Direction::Left, origin).is_none());
        assert!(top_left.neighbor(Direction::Right, origin).is_some());
        assert!(top_left.neighbor(Direction::Down, origin).is_some());
        let bottom_right = board.tile(1, 1).borrow();
        assert!(bottom_right.neighbor(Direction::Down, origin).is_none());
        assert!(bottom_right.neighbor(Direction::Right, origin).is_none());
        assert_eq!(bottom_right.focus_origin(), Point::new(1, 1));
    }

    #[test]
    fn typing_edits_the_tile() {
        let (board, _) = board(1, 1);
        let mut scheduler_stub = Vec::<NodeRef>::new();
        struct Collect<'a>(&'a mut Vec<NodeRef>);
        impl Invalidate for Collect<'_> {
            fn invalidate(&mut self, node: &NodeRef) {
                self.0.push(node.clone());
            }
        }
        let tile = board.tile(0, 0).clone();
        let mut cx = Collect(&mut scheduler_stub);
        for c in "hey\u{7f}\u{7f}i\u{1}".chars() {
            tile.borrow_mut().handle_event(c, &mut cx);
        }
        assert_eq!(tile.borrow().text(), "hi");
        tile.borrow_mut().handle_event('\n', &mut cx);
        assert_eq!(tile.borrow().text(), "");
        // The ignored control character did not invalidate.
        assert_eq!(scheduler_stub.len(), 7);
    }

    #[test]
    fn text_is_capped() {
        let (board, _) = board(1, 1);
        struct Ignore;
        impl Invalidate for Ignore {
            fn invalidate(&mut self, _node: &NodeRef) {}
        }
        let tile = board.tile(0, 0).clone();
        for c in std::iter::repeat_n('a', MAX_TEXT).chain(['b']) {
            tile.borrow_mut().handle_event(c, &mut Ignore);
        }
        assert_eq!(tile.borrow().text().len(), MAX_TEXT);
        assert!(tile.borrow().text().ends_with('b'));
    }

    #[test]
    fn run_moves_focus_and_repaints_changed_tiles() {
        let host = HeadlessHost::new(40, 10);
        let (board, screen) = board(2, 1);
        let all = tiles(&board);
        let script = vec![
            Step::input("x"),
            Step::input("\u{1b}[C"),
            Step::input("y"),
            Step::end_of_transmission(),
        ];
        let mut app =
            Application::new(host.parts(script), Box::new(board), AppConfig::default()).unwrap();
        app.run().unwrap();

        assert_eq!(all[0].borrow().text(), "x");
        assert_eq!(all[1].borrow().text(), "y");
        assert!(!all[0].borrow().is_focused());
        assert!(all[1].borrow().is_focused());

        let out = screen.take();
        assert!(out.starts_with("\x1b[2J"));
        // Second tile starts at column 21 of a 40-column terminal.
        assert!(out.contains("\x1b[1;21H"));
        assert!(out.contains("\x1b[7m0,1 y"));
    }

    #[test]
    fn resize_clears_and_repaints_everything() {
        let host = HeadlessHost::new(40, 10);
        let (board, screen) = board(2, 1);
        let script = vec![Step::Resize { cols: 60, rows: 10 }, Step::interrupt()];
        let mut app =
            Application::new(host.parts(script), Box::new(board), AppConfig::default()).unwrap();
        app.run().unwrap();
        let out = screen.take();
        assert_eq!(out.matches("\x1b[2J").count(), 2);
        assert!(out.contains("\x1b[1;31H"));
    }

    #[test]
    fn paint_before_layout_writes_nothing() {
        let (mut board, screen) = board(2, 2);
        board.update().unwrap();
        assert!(screen.take().is_empty());
    }
}
