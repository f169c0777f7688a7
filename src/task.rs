//! Async boundary plumbing.
//!
//! Collaborator futures (image loads, uploads, background removal) run
//! on a thread pool; their completion handlers are queued and drained
//! by the editor on its single dispatch thread, so results re-enter
//! the mutation path strictly serialized. Disposing the runner bumps
//! an epoch counter: completions spawned under an older epoch are
//! dropped instead of touching a torn-down scene.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::Future;
use futures::executor::ThreadPool;
use parking_lot::Mutex;

use crate::editor::Editor;

pub(crate) type Completion = Box<dyn FnOnce(&mut Editor) + Send>;

pub(crate) struct TaskRunner {
    pool: ThreadPool,
    queue: Arc<Mutex<Vec<(u64, Completion)>>>,
    epoch: Arc<AtomicU64>,
}

impl std::fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRunner")
            .field("queued", &self.queue.lock().len())
            .field("epoch", &self.epoch.load(Ordering::SeqCst))
            .finish()
    }
}

impl TaskRunner {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            pool: ThreadPool::new()?,
            queue: Arc::new(Mutex::new(Vec::new())),
            epoch: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run `future` off the editing path; queue `done` to run with its
    /// output on the next pump.
    pub fn spawn<T, F, D>(&self, future: F, done: D)
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
        D: FnOnce(&mut Editor, T) + Send + 'static,
    {
        let epoch = self.epoch.load(Ordering::SeqCst);
        let queue = Arc::clone(&self.queue);
        self.pool.spawn_ok(async move {
            let output = future.await;
            queue
                .lock()
                .push((epoch, Box::new(move |editor: &mut Editor| done(editor, output))));
        });
    }

    /// Take the completions that arrived since the last drain. Stale
    /// completions from before a dispose are discarded here.
    pub fn drain(&self) -> Vec<Completion> {
        let current = self.epoch.load(Ordering::SeqCst);
        let drained: Vec<(u64, Completion)> = {
            let mut queue = self.queue.lock();
            queue.drain(..).collect()
        };
        drained
            .into_iter()
            .filter(|(epoch, _)| *epoch == current)
            .map(|(_, completion)| completion)
            .collect()
    }

    /// Invalidate all in-flight work. Their completion handlers will
    /// never run.
    pub fn dispose(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.queue.lock().clear();
    }

    pub fn has_queued(&self) -> bool {
        !self.queue.lock().is_empty()
    }
}
