//! Asynchronous job execution. One background worker thread per job; the
//! control surface stays responsive and receives phase updates plus exactly
//! one terminal notification through [`JobEvents`].

use std::collections::HashMap;
use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::catalog::{Catalog, Category};
use crate::error::SepError;
use crate::params::JobParams;
use crate::paths::unique_dest;
use crate::separator;
use crate::transcriber::{self, Transcriber};
use crate::types::{JobResult, TranscriberKind};

/// Cooperative cancellation flag, checked at phase boundaries only — the
/// wrapped ML backends are not preemptible, so a running backend call is
/// always awaited and its result discarded instead.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Callbacks back to the control surface. Implementations must be safe to
/// call from the worker thread.
pub trait JobEvents: Send + Sync {
    /// Human-readable phase description ("Loading model", "Separating",
    /// "Saving files", "Canceled", "Error", ...).
    fn on_status(&self, message: &str);

    /// Terminal notification, delivered exactly once per job after all
    /// filesystem side effects are finalized.
    fn on_finished(&self, result: &JobResult);
}

/// Handle to one submitted job.
pub struct JobHandle {
    token: CancelToken,
    worker: Option<JoinHandle<()>>,
}

impl JobHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, |w| w.is_finished())
    }

    /// Wait for the worker to finish. A worker panic has already been
    /// reported through `on_finished`, so it is swallowed here.
    pub fn join(mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

type TranscriberMap = HashMap<TranscriberKind, Box<dyn Transcriber>>;

/// Dispatches jobs to background workers. Serialization of jobs is the
/// surface layer's policy; the runner itself only promises that each
/// submitted job runs to exactly one terminal notification.
pub struct JobRunner {
    events: Arc<dyn JobEvents>,
    catalog: Arc<dyn Catalog>,
    // Kept across jobs so the adapters' model caches survive.
    transcribers: Arc<Mutex<TranscriberMap>>,
}

impl JobRunner {
    pub fn new(events: Arc<dyn JobEvents>, catalog: Arc<dyn Catalog>) -> Self {
        JobRunner {
            events,
            catalog,
            transcribers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Start background execution; non-blocking.
    pub fn submit(&self, params: JobParams) -> JobHandle {
        let token = CancelToken::new();
        let worker_token = token.clone();
        let events = Arc::clone(&self.events);
        let catalog = Arc::clone(&self.catalog);
        let transcribers = Arc::clone(&self.transcribers);

        let worker = thread::spawn(move || {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                execute(params, &worker_token, &*events, &*catalog, &transcribers)
            }));
            match outcome {
                Ok(result) => events.on_finished(&result),
                Err(_) => {
                    log::error!("job worker panicked");
                    events.on_status("Error");
                    events.on_finished(&JobResult::failed(SepError::BackendInvocation {
                        tool: "job runner".to_string(),
                        detail: "worker panicked".to_string(),
                    }));
                }
            }
        });

        JobHandle {
            token,
            worker: Some(worker),
        }
    }
}

fn execute(
    mut params: JobParams,
    cancel: &CancelToken,
    events: &dyn JobEvents,
    catalog: &dyn Catalog,
    transcribers: &Mutex<TranscriberMap>,
) -> JobResult {
    params.normalize();
    if let Err(e) = params.validate() {
        events.on_status("Error");
        return JobResult::failed(e);
    }
    if cancel.is_canceled() {
        events.on_status("Canceled");
        return JobResult::canceled();
    }

    events.on_status("Loading model");
    let separator = separator::for_engine(params.engine);

    events.on_status("Separating");
    let progress = |msg: &str| events.on_status(msg);
    let mut result = separator.separate(&params, cancel, &progress);

    if result.is_canceled() {
        events.on_status("Canceled");
        return result;
    }
    if !result.success {
        events.on_status("Error");
        return result;
    }

    let mut transcribed = false;
    if let Some(request) = params.transcription.clone() {
        // Phase boundary: a cancellation that arrived while files were
        // being finalized skips transcription and the catalog refresh.
        if cancel.is_canceled() {
            events.on_status("Canceled");
            return JobResult::canceled();
        }

        if let Some(vocals) = result.vocals_path.clone() {
            events.on_status("Transcribing");
            match transcribe_vocals(&params, &request.engine, &request.model, &vocals, transcribers)
            {
                Ok(dest) => {
                    result.transcription_path = Some(dest);
                    transcribed = true;
                }
                // Transcription failure does not demote a successful
                // separation.
                Err(e) => log::warn!("transcription skipped: {e}"),
            }
        }
    }

    catalog.refresh(Category::Vocals);
    catalog.refresh(Category::Instrumentals);
    if transcribed {
        catalog.refresh(Category::Transcriptions);
    }

    result
}

fn transcribe_vocals(
    params: &JobParams,
    kind: &TranscriberKind,
    model: &str,
    vocals: &std::path::Path,
    transcribers: &Mutex<TranscriberMap>,
) -> Result<std::path::PathBuf, SepError> {
    fs::create_dir_all(&params.transcription_dir)?;
    let dest = unique_dest(
        &params.transcription_dir,
        &format!("{}_transcription", params.output_stem_prefix()),
        "txt",
    );

    let mut map = transcribers.lock().expect("transcriber cache poisoned");
    let transcriber = map
        .entry(*kind)
        .or_insert_with(|| transcriber::for_kind(*kind));
    if transcriber.transcribe(vocals, &dest, model) {
        Ok(dest)
    } else {
        Err(SepError::Transcription(format!(
            "{kind} failed for {:?}",
            vocals
        )))
    }
}
