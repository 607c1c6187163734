//! The workflow shell: wires the state machine to the runtime, publishes
//! snapshots, and resolves the embedding caller's callbacks.

use std::sync::Arc;

use tally_core::{Category, Palette};
use tally_service::CategoryService;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};

use crate::runtime::EffectRunner;
use crate::workflow::{Action, Effect, RefreshPolicy, Snapshot, Workflow};

pub type SelectCallback = Box<dyn FnMut(Category)>;
pub type CloseCallback = Box<dyn FnMut()>;

/// Back-navigation for the standalone screen.
pub trait Navigator {
    fn go_back(&mut self);
}

/// Callbacks supplied by a caller embedding the screen.
///
/// With `on_select` set the screen acts as a category picker: choosing a row
/// hands the category to the caller. With `on_close` set the close gesture
/// goes to the caller instead of the navigator.
#[derive(Default)]
pub struct Embedding {
    pub on_select: Option<SelectCallback>,
    pub on_close: Option<CloseCallback>,
}

impl Embedding {
    pub fn standalone() -> Self {
        Self::default()
    }

    pub fn picker(on_select: SelectCallback, on_close: Option<CloseCallback>) -> Self {
        Self {
            on_select: Some(on_select),
            on_close,
        }
    }

    pub fn is_picker(&self) -> bool {
        self.on_select.is_some()
    }
}

pub struct Shell {
    workflow: Workflow,
    runner: EffectRunner,
    results: mpsc::UnboundedReceiver<Action>,
    snapshots: watch::Sender<Snapshot>,
    embedding: Embedding,
    navigator: Box<dyn Navigator>,
}

impl Shell {
    pub fn new(
        service: Arc<dyn CategoryService>,
        handle: Handle,
        palette: Palette,
        refresh_policy: RefreshPolicy,
        embedding: Embedding,
        navigator: Box<dyn Navigator>,
    ) -> Self {
        let workflow = Workflow::new(palette, refresh_policy);
        let (runner, results) = EffectRunner::new(service, handle);
        let (snapshots, _) = watch::channel(workflow.snapshot());
        Self {
            workflow,
            runner,
            results,
            snapshots,
            embedding,
            navigator,
        }
    }

    /// Issue the first-mount fetch.
    pub fn mount(&mut self) {
        let effects = self.workflow.mount();
        self.run(effects);
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn is_picker(&self) -> bool {
        self.embedding.is_picker()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn dispatch(&mut self, action: Action) {
        let effects = self.workflow.update(action);
        self.snapshots.send_replace(self.workflow.snapshot());
        self.run(effects);
    }

    /// Apply every settled call that is already waiting. Returns how many
    /// were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.results.try_recv() {
            self.dispatch(action);
            applied += 1;
        }
        applied
    }

    /// Wait for the next settled call and apply it. Returns `false` once the
    /// result channel is closed.
    pub async fn next_settlement(&mut self) -> bool {
        match self.results.recv().await {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchCategories { generation } => self.runner.fetch(generation),
                Effect::CreateCategory { ticket, input } => self.runner.create(ticket, input),
                Effect::CategoryChosen(category) => match self.embedding.on_select.as_mut() {
                    Some(on_select) => on_select(category),
                    None => tracing::debug!(id = %category.id, "row selected; no picker callback"),
                },
                Effect::CloseRequested => match self.embedding.on_close.as_mut() {
                    Some(on_close) => on_close(),
                    None => self.navigator.go_back(),
                },
            }
        }
    }
}
