//! Shared fixtures: a grid of focusable cells on a recording surface.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tuiloop_core::error::ViewError;
use tuiloop_core::event::Direction;
use tuiloop_core::geometry::{Point, Size};
use tuiloop_core::view::{FocusRef, Focusable, Invalidate, NodeRef, Surface, ViewNode};

pub type Log = Rc<RefCell<Vec<String>>>;

pub struct Cell {
    pub name: String,
    pub keys: String,
    pub updates: u32,
    log: Log,
    me: Weak<RefCell<Cell>>,
    up: Option<Weak<RefCell<Cell>>>,
    down: Option<Weak<RefCell<Cell>>>,
    left: Option<Weak<RefCell<Cell>>>,
    right: Option<Weak<RefCell<Cell>>>,
}

impl Cell {
    fn node(&self) -> Option<NodeRef> {
        let me = self.me.upgrade()?;
        Some(me)
    }
}

impl Focusable for Cell {
    fn handle_event(&mut self, c: char, cx: &mut dyn Invalidate) {
        self.keys.push(c);
        self.log.borrow_mut().push(format!("{}:key:{c}", self.name));
        if let Some(node) = self.node() {
            cx.invalidate(&node);
        }
    }

    fn resign_focus(&mut self, cx: &mut dyn Invalidate) {
        self.log.borrow_mut().push(format!("{}:resign", self.name));
        if let Some(node) = self.node() {
            cx.invalidate(&node);
        }
    }

    fn become_focus(&mut self, cx: &mut dyn Invalidate) {
        self.log.borrow_mut().push(format!("{}:become", self.name));
        if let Some(node) = self.node() {
            cx.invalidate(&node);
        }
    }

    fn neighbor(&self, direction: Direction, _origin: Point) -> Option<FocusRef> {
        let link = match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        };
        let cell = link.as_ref()?.upgrade()?;
        Some(cell)
    }
}

impl ViewNode for Cell {
    fn update(&mut self, _cx: &mut dyn Invalidate) -> Result<(), ViewError> {
        self.updates += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Passes {
    pub layouts: Vec<Size>,
    pub draws: u32,
    pub updates: u32,
    pub size_cache_drops: u32,
}

/// A `cols` x `rows` grid. Row-major; cell names are `r{row}c{col}`.
pub struct Grid {
    pub cells: Vec<Rc<RefCell<Cell>>>,
    pub cols: usize,
    pub log: Log,
    pub passes: Rc<RefCell<Passes>>,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Self {
        let log = Log::default();
        let cells: Vec<Rc<RefCell<Cell>>> = (0..rows * cols)
            .map(|i| {
                Rc::new_cyclic(|me| {
                    RefCell::new(Cell {
                        name: format!("r{}c{}", i / cols, i % cols),
                        keys: String::new(),
                        updates: 0,
                        log: Rc::clone(&log),
                        me: me.clone(),
                        up: None,
                        down: None,
                        left: None,
                        right: None,
                    })
                })
            })
            .collect();
        for (i, cell) in cells.iter().enumerate() {
            let (row, col) = (i / cols, i % cols);
            let mut cell = cell.borrow_mut();
            cell.up = (row > 0).then(|| Rc::downgrade(&cells[i - cols]));
            cell.down = (row + 1 < rows).then(|| Rc::downgrade(&cells[i + cols]));
            cell.left = (col > 0).then(|| Rc::downgrade(&cells[i - 1]));
            cell.right = (col + 1 < cols).then(|| Rc::downgrade(&cells[i + 1]));
        }
        Self {
            cells,
            cols,
            log,
            passes: Rc::new(RefCell::new(Passes::default())),
        }
    }

    pub fn row(cols: usize) -> Self {
        Self::new(cols, 1)
    }

    pub fn cell(&self, row: usize, col: usize) -> &Rc<RefCell<Cell>> {
        &self.cells[row * self.cols + col]
    }

    pub fn node(&self, index: usize) -> NodeRef {
        self.cells[index].clone()
    }

    pub fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    /// The surface over this grid, for handing to an application.
    pub fn surface(&self) -> Box<dyn Surface> {
        Box::new(GridSurface {
            first: self.cells.first().cloned(),
            passes: Rc::clone(&self.passes),
        })
    }
}

struct GridSurface {
    first: Option<Rc<RefCell<Cell>>>,
    passes: Rc<RefCell<Passes>>,
}

impl Surface for GridSurface {
    fn layout(&mut self, size: Size) {
        self.passes.borrow_mut().layouts.push(size);
    }

    fn draw(&mut self) -> Result<(), ViewError> {
        self.passes.borrow_mut().draws += 1;
        Ok(())
    }

    fn update(&mut self) -> Result<(), ViewError> {
        self.passes.borrow_mut().updates += 1;
        Ok(())
    }

    fn invalidate_size_cache(&mut self) {
        self.passes.borrow_mut().size_cache_drops += 1;
    }

    fn first_focusable(&self) -> Option<FocusRef> {
        let first = self.first.clone()?;
        Some(first)
    }
}

/// Whether `focused` is the same element as `cell`.
pub fn is_same(focused: &FocusRef, cell: &Rc<RefCell<Cell>>) -> bool {
    let cell: FocusRef = cell.clone();
    Rc::ptr_eq(focused, &cell)
}
