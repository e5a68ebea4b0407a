use std::{
    io,
    path::{Path, PathBuf},
    sync::mpsc,
    thread::{self, JoinHandle},
};

use crate::{EngineError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferKind {
    Load,
    Save,
}

/// A whole-buffer load or save running on its own thread.
///
/// The worker owns the byte buffer until the transfer is handed back to
/// [`crate::TileGridSurface::finish_transfer`]. There is no cancellation.
#[derive(Debug)]
pub struct BufferTransfer {
    kind: TransferKind,
    path: PathBuf,
    handle: JoinHandle<(Vec<u8>, io::Result<()>)>,
}

pub(crate) struct TransferOutcome {
    /// `None` only if the worker died and took the buffer with it.
    pub buffer: Option<Vec<u8>>,
    pub result: Result<()>,
}

impl BufferTransfer {
    /// Starts the worker. It waits for the buffer on the returned sender, so a failed spawn
    /// leaves the caller's buffer untouched.
    pub(crate) fn spawn(kind: TransferKind, path: &Path) -> Result<(Self, mpsc::Sender<Vec<u8>>)> {
        let (tx, rx) = mpsc::channel::<Vec<u8>>();
        let worker_path = path.to_path_buf();
        let name = match kind {
            TransferKind::Load => "buffer_load",
            TransferKind::Save => "buffer_save",
        };

        let handle = thread::Builder::new().name(name.to_string()).spawn(move || {
            let Ok(data) = rx.recv() else {
                return (Vec::new(), Err(io::Error::other("buffer was never handed over")));
            };
            match kind {
                TransferKind::Load => match std::fs::read(&worker_path) {
                    Ok(loaded) => (loaded, Ok(())),
                    Err(err) => (data, Err(err)),
                },
                TransferKind::Save => {
                    let result = std::fs::write(&worker_path, &data);
                    (data, result)
                }
            }
        })?;

        Ok((
            Self {
                kind,
                path: path.to_path_buf(),
                handle,
            },
            tx,
        ))
    }

    pub fn kind(&self) -> TransferKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Blocks until the worker is done.
    pub(crate) fn join(self) -> TransferOutcome {
        match self.handle.join() {
            Ok((buffer, Ok(()))) => {
                log::info!("{:?} of '{}' finished ({} bytes)", self.kind, self.path.display(), buffer.len());
                TransferOutcome {
                    buffer: Some(buffer),
                    result: Ok(()),
                }
            }
            Ok((buffer, Err(err))) => {
                log::warn!("{:?} of '{}' failed: {err}", self.kind, self.path.display());
                TransferOutcome {
                    buffer: Some(buffer),
                    result: Err(EngineError::transfer_failed(&self.path, err)),
                }
            }
            Err(_) => {
                log::warn!("{:?} worker for '{}' panicked", self.kind, self.path.display());
                TransferOutcome {
                    buffer: None,
                    result: Err(EngineError::transfer_failed(&self.path, "worker thread panicked")),
                }
            }
        }
    }
}
