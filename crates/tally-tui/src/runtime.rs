//! Carries persistence effects across a tokio task boundary.
//!
//! Each call runs as its own task and reports back as an [`Action`] on an
//! unbounded channel. The workflow's `Submitting` ticket is the single
//! in-flight slot: the runner never starts a create on its own.

use std::sync::Arc;

use tally_core::CreateCategory;
use tally_service::CategoryService;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::workflow::{Action, SubmitTicket};

pub struct EffectRunner {
    service: Arc<dyn CategoryService>,
    handle: Handle,
    tx: mpsc::UnboundedSender<Action>,
}

impl EffectRunner {
    pub fn new(
        service: Arc<dyn CategoryService>,
        handle: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { service, handle, tx }, rx)
    }

    pub fn fetch(&self, generation: u64) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = service.list_categories().await;
            // The receiver is gone only when the screen was torn down.
            let _ = tx.send(Action::Refreshed { generation, result });
        });
    }

    pub fn create(&self, ticket: SubmitTicket, input: CreateCategory) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = service.create_category(&input).await;
            if let Err(ref e) = result {
                tracing::info!(ticket = ticket.0, "create failed: {e}");
            }
            let _ = tx.send(Action::Settled { ticket, result });
        });
    }
}
