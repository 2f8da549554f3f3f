/// Background model loading
///
/// OBJ parsing runs on a worker thread and hands finished mesh batches back
/// over a channel. Only the composition root drains tasks and writes the
/// results into the collision index, so the index has a single writer no
/// matter how many loads are in flight.
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{anyhow, Result};
use log::{debug, error};

use crate::mesh::Mesh;

/// Handle to an in-flight load; poll with [`try_take`](Self::try_take)
pub struct LoadTask {
    path: String,
    receiver: Receiver<Result<Vec<Mesh>>>,
    taken: bool,
}

impl LoadTask {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The batch, once the worker finishes; `None` while still loading.
    /// Yields at most one result over the task's lifetime.
    pub fn try_take(&mut self) -> Option<Result<Vec<Mesh>>> {
        if self.taken {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.taken = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.taken = true;
                Some(Err(anyhow!("loader worker for '{}' died", self.path)))
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.taken
    }
}

pub struct ModelLoader;

impl ModelLoader {
    /// Start loading `path` off-thread
    pub fn load(path: &str) -> LoadTask {
        let (sender, receiver) = mpsc::channel();
        let worker_path = path.to_string();

        thread::spawn(move || {
            debug!("loading model '{}'", worker_path);
            let result = Mesh::load_obj(&worker_path);
            if let Err(error) = &result {
                error!("failed to load '{}': {:#}", worker_path, error);
            }
            // The receiver may already be gone on shutdown; nothing to do
            let _ = sender.send(result);
        });

        LoadTask {
            path: path.to_string(),
            receiver,
            taken: false,
        }
    }
}
