//! # Controller Driver
//!
//! Runs a state [`Machine`] on its own Tokio task. Events from the presentation layer and
//! completions of client calls are applied one at a time; after each one the new snapshot
//! is published on a `watch` channel. Effects run as spawned tasks whose results come back
//! as completions.
//!
//! The task ends once every [`ControllerHandle`] is dropped.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A pure state machine driven by events and completions.
pub trait Machine: Send + 'static {
    type Event: Debug + Send + 'static;
    type Effect: Debug + Send + 'static;
    type Completion: Send + 'static;
    type Snapshot: Clone + Send + Sync + 'static;

    fn on_event(&mut self, event: Self::Event) -> Vec<Self::Effect>;
    fn on_completion(&mut self, completion: Self::Completion) -> Vec<Self::Effect>;
    fn snapshot(&self) -> Self::Snapshot;
}

/// Executes a machine's effects.
#[async_trait]
pub trait Perform<M: Machine>: Send + Sync + 'static {
    async fn perform(&self, effect: M::Effect) -> M::Completion;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Controller stopped")]
pub struct ControllerClosed;

/// Presentation-side handle: send events, read snapshots.
pub struct ControllerHandle<M: Machine> {
    events: mpsc::Sender<M::Event>,
    snapshots: watch::Receiver<M::Snapshot>,
}

impl<M: Machine> Clone for ControllerHandle<M> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            snapshots: self.snapshots.clone(),
        }
    }
}

impl<M: Machine> ControllerHandle<M> {
    pub async fn send(&self, event: M::Event) -> Result<(), ControllerClosed> {
        self.events.send(event).await.map_err(|_| ControllerClosed)
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> M::Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified on every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<M::Snapshot> {
        self.snapshots.clone()
    }

    /// Waits until a snapshot satisfies `predicate` and returns it.
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&M::Snapshot) -> bool,
    ) -> Result<M::Snapshot, ControllerClosed> {
        let mut receiver = self.snapshots.clone();
        let snapshot = receiver
            .wait_for(|snapshot| predicate(snapshot))
            .await
            .map_err(|_| ControllerClosed)?;
        Ok(snapshot.clone())
    }
}

/// Spawns `machine` with `performer` executing its effects.
pub fn spawn_controller<M, P>(
    machine: M,
    performer: Arc<P>,
    buffer_size: usize,
) -> (ControllerHandle<M>, JoinHandle<()>)
where
    M: Machine,
    P: Perform<M> + ?Sized,
{
    let (events, receiver) = mpsc::channel(buffer_size);
    let (publisher, snapshots) = watch::channel(machine.snapshot());
    let handle = tokio::spawn(run(machine, performer, receiver, publisher));
    (ControllerHandle { events, snapshots }, handle)
}

async fn run<M, P>(
    mut machine: M,
    performer: Arc<P>,
    mut events: mpsc::Receiver<M::Event>,
    publisher: watch::Sender<M::Snapshot>,
) where
    M: Machine,
    P: Perform<M> + ?Sized,
{
    let (done, mut completions) = mpsc::unbounded_channel::<M::Completion>();
    info!("Controller started");

    loop {
        let effects = tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    debug!(?event, "Event");
                    machine.on_event(event)
                }
                None => break,
            },
            Some(completion) = completions.recv() => machine.on_completion(completion),
        };
        publisher.send_replace(machine.snapshot());

        for effect in effects {
            debug!(?effect, "Effect");
            let performer = performer.clone();
            let done = done.clone();
            tokio::spawn(async move {
                let completion = performer.perform(effect).await;
                // The controller may have stopped meanwhile.
                let _ = done.send(completion);
            });
        }
    }

    info!("Controller stopped");
}
