use std::collections::VecDeque;
use std::fmt;

use crate::error::ChartResult;

pub type DeferredTask<C> = Box<dyn FnOnce(&mut C) -> ChartResult<()>>;

/// Tasks scheduled to run after the current dispatch turn.
///
/// `run_turn` only runs tasks that were queued before it started; anything a
/// task schedules waits for the following turn.
pub struct DeferredQueue<C> {
    tasks: VecDeque<DeferredTask<C>>,
}

impl<C> Default for DeferredQueue<C> {
    fn default() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }
}

impl<C> fmt::Debug for DeferredQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.tasks.len())
            .finish()
    }
}

impl<C> DeferredQueue<C> {
    pub fn schedule(&mut self, task: DeferredTask<C>) {
        self.tasks.push_back(task);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Detaches the tasks of the current turn.
    #[must_use]
    pub fn take_turn(&mut self) -> VecDeque<DeferredTask<C>> {
        std::mem::take(&mut self.tasks)
    }

    /// Runs one turn against `context`; the first error is returned after the
    /// remaining tasks of the turn have run.
    pub fn run_turn(&mut self, context: &mut C) -> ChartResult<usize> {
        let turn = self.take_turn();
        let count = turn.len();
        let mut first_error = None;
        for task in turn {
            if let Err(err) = task(context) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(count),
        }
    }
}
