//! Property-based tests for the run-loop invariants.
//!
//! 1. **Coalescing** - any burst of N >= 1 invalidations before the cycle
//!    runs queues exactly one cycle, and that cycle updates every distinct
//!    node exactly once followed by one layout and one render.
//!
//! 2. **Focus pairing** - on a grid, every successful move logs exactly one
//!    resign (old) then one become (new); every failed move logs nothing and
//!    leaves focus where it was.
//!
//! 3. **Input ordering** - whatever the chunking, the focused element sees
//!    the concatenation of the chunks.

mod common;

use common::{Grid, is_same};
use proptest::prelude::*;
use tuiloop_backend::{RunQueue, Task};
use tuiloop_core::event::Direction;
use tuiloop_core::geometry::Size;
use tuiloop_core::view::{FocusRef, Invalidate};
use tuiloop_runtime::headless::{HeadlessHost, Step};
use tuiloop_runtime::{AppConfig, Application, FocusNavigator, UpdateScheduler, Window};

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

proptest! {
    #[test]
    fn burst_coalesces_into_one_cycle(picks in prop::collection::vec(0usize..6, 1..40)) {
        let grid = Grid::row(6);
        let mut queue = RunQueue::new();
        let mut scheduler = UpdateScheduler::new(queue.deferrer());
        let mut window = Window::new(grid.surface(), Size::new(80, 24));

        for &i in &picks {
            scheduler.invalidate(&grid.node(i));
        }
        let mut distinct = picks.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(scheduler.pending_len(), distinct.len());

        let mut cycles_queued = 0;
        while let Some(task) = queue.pop() {
            prop_assert_eq!(&task, &Task::RunCycle);
            cycles_queued += 1;
            scheduler.run_scheduled(&mut window);
        }
        prop_assert_eq!(cycles_queued, 1);
        prop_assert_eq!(scheduler.cycles(), 1);
        for (i, cell) in grid.cells.iter().enumerate() {
            let expected = u32::from(distinct.contains(&i));
            prop_assert_eq!(cell.borrow().updates, expected);
        }
        prop_assert_eq!(grid.passes.borrow().layouts.len(), 1);
        prop_assert_eq!(grid.passes.borrow().draws, 1);
    }

    #[test]
    fn focus_moves_pair_resign_with_become(
        cols in 1usize..4,
        rows in 1usize..4,
        moves in prop::collection::vec(direction(), 0..30),
    ) {
        let grid = Grid::new(cols, rows);
        let queue = RunQueue::new();
        let mut scheduler = UpdateScheduler::new(queue.deferrer());
        let mut nav = FocusNavigator::new();
        let first: FocusRef = grid.cells[0].clone();
        nav.focus_initial(Some(first), &mut scheduler);
        let (mut row, mut col) = (0usize, 0usize);

        for dir in moves {
            grid.clear_log();
            let target = match dir {
                Direction::Up => row.checked_sub(1).map(|r| (r, col)),
                Direction::Down => (row + 1 < rows).then_some((row + 1, col)),
                Direction::Left => col.checked_sub(1).map(|c| (row, c)),
                Direction::Right => (col + 1 < cols).then_some((row, col + 1)),
            };
            let moved = nav.navigate(dir, &mut scheduler);
            prop_assert_eq!(moved, target.is_some());
            match target {
                Some((r, c)) => {
                    prop_assert_eq!(
                        grid.log(),
                        vec![format!("r{row}c{col}:resign"), format!("r{r}c{c}:become")]
                    );
                    row = r;
                    col = c;
                }
                None => prop_assert!(grid.log().is_empty()),
            }
            let focused = nav.focused();
            prop_assert!(focused.is_some_and(|f| is_same(&f, grid.cell(row, col))));
        }
    }

    #[test]
    fn chunks_are_seen_in_order(chunks in prop::collection::vec("[a-z]{0,6}", 1..8)) {
        let host = HeadlessHost::new(80, 24);
        let grid = Grid::row(1);
        let refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let script = vec![Step::inputs(&refs), Step::end_of_transmission()];
        let mut app =
            Application::new(host.parts(script), grid.surface(), AppConfig::default()).unwrap();
        app.run().unwrap();
        prop_assert_eq!(&grid.cell(0, 0).borrow().keys, &chunks.concat());
    }
}
