//! # Mock Framework & Testing Guide
//!
//! `MockClient<T>` hands out a real [`ResourceClient<T>`] whose requests are answered from a
//! queue of expectations instead of a running actor. Use it to test logic *around* a client
//! (wrappers, gateways, controllers) deterministically, including failures that are hard to
//! provoke against a real actor.
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Determinism** | Fully scripted | Subject to scheduler |
//! | **State** | None (expectations) | Real store |
//! | **Error Injection** | `return_err` | [`SwitchablePersistence`] for storage outages |
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Tag { id: u32 }
//! #[derive(Debug)] struct TagCreate;
//! #[derive(Debug)] struct TagUpdate;
//! #[derive(Debug, thiserror::Error)] #[error("tag error")] struct TagError;
//!
//! #[async_trait]
//! impl ActorEntity for Tag {
//!     type Id = u32; type Create = TagCreate; type Update = TagUpdate;
//!     type Context = (); type Error = TagError;
//!     fn id(&self) -> &u32 { &self.id }
//!     fn from_create_params(id: u32, _: TagCreate) -> Result<Self, TagError> { Ok(Self { id }) }
//!     async fn on_update(&mut self, _: TagUpdate, _: &()) -> Result<(), TagError> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Tag>::new();
//!     mock.expect_get(1).return_err(FrameworkError::ActorClosed);
//!
//!     let result = mock.client().get(1).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```
//!
//! For lower-level assertions on the exact payload a client sent, use
//! [`create_mock_client`] together with [`expect_create`], [`expect_update`] or
//! [`expect_delete`].

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::{FrameworkError, StorageError};
use crate::message::ResourceRequest;
use crate::store::{InMemoryPersistence, Persistence, Snapshot};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the response it should receive.
enum Expectation<T: ActorEntity> {
    Create {
        response: Result<T, FrameworkError>,
    },
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), FrameworkError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Expectations are consumed in order. A request that does not match the next expectation
/// (wrong operation or wrong ID) is answered by dropping its responder, so the caller sees
/// [`FrameworkError::ActorDropped`], and is reported by [`MockClient::verify`].
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    mismatches: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must be called inside a tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let mismatches = Arc::new(Mutex::new(Vec::new()));
        let queue = expectations.clone();
        let log = mismatches.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().unwrap().pop_front();
                answer(request, expectation, &log);
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            mismatches,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::Get { id, response })
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|response| Expectation::List { response })
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    fn builder<R>(
        &mut self,
        make: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            make: Box::new(make),
        }
    }

    /// Verifies that all expectations were met and no unexpected request arrived.
    pub fn verify(&self) {
        let mismatches = self.mismatches.lock().unwrap();
        if !mismatches.is_empty() {
            panic!("Unexpected requests: {}", mismatches.join("; "));
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Answers `request` from `expectation`. Mismatches are logged before the responder drops,
/// so a caller that observed `ActorDropped` is guaranteed to find them in `verify`.
fn answer<T: ActorEntity>(
    request: ResourceRequest<T>,
    expectation: Option<Expectation<T>>,
    log: &Mutex<Vec<String>>,
) {
    match (request, expectation) {
        (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response })) => {
            reply_if_same(&id, &want, respond_to, response, log)
        }
        (
            ResourceRequest::Update { id, respond_to, .. },
            Some(Expectation::Update { id: want, response }),
        ) => reply_if_same(&id, &want, respond_to, response, log),
        (
            ResourceRequest::Delete { id, respond_to },
            Some(Expectation::Delete { id: want, response }),
        ) => reply_if_same(&id, &want, respond_to, response, log),
        (request, Some(_)) => {
            let problem = format!("{} did not match the next expectation", op(&request));
            log.lock().unwrap().push(problem);
        }
        (request, None) => {
            let problem = format!("{} with no expectation left", op(&request));
            log.lock().unwrap().push(problem);
        }
    }
}

fn reply_if_same<I: PartialEq + std::fmt::Display, R>(
    got: &I,
    want: &I,
    respond_to: oneshot::Sender<Result<R, FrameworkError>>,
    response: Result<R, FrameworkError>,
    log: &Mutex<Vec<String>>,
) {
    if got == want {
        let _ = respond_to.send(response);
    } else {
        log.lock()
            .unwrap()
            .push(format!("expected id {want}, got {got}"));
    }
}

fn op<T: ActorEntity>(request: &ResourceRequest<T>) -> &'static str {
    match request {
        ResourceRequest::Create { .. } => "Create",
        ResourceRequest::Get { .. } => "Get",
        ResourceRequest::List { .. } => "List",
        ResourceRequest::Update { .. } => "Update",
        ResourceRequest::Delete { .. } => "Delete",
    }
}

/// Builder that queues one expectation with its scripted response.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Queue<T>,
    make: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let expectation = (self.make)(response);
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// CHANNEL-LEVEL HELPERS
// =============================================================================

/// Creates a client and the receiver its requests land on.
///
/// Lets a test inspect each request payload and answer it by hand through the responder.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message, if it is a Create request.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message, if it is an Update request.
pub async fn expect_update<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Update, oneshot::Sender<Result<T, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Delete request.
pub async fn expect_delete<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<(), FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

// =============================================================================
// STORAGE OUTAGES
// =============================================================================

/// In-memory persistence whose writes can be switched off to simulate an unavailable store.
pub struct SwitchablePersistence<T> {
    inner: InMemoryPersistence<T>,
    available: Arc<AtomicBool>,
}

/// Handle that flips a [`SwitchablePersistence`] between available and unavailable.
#[derive(Clone)]
pub struct StorageSwitch(Arc<AtomicBool>);

impl StorageSwitch {
    pub fn fail(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn restore(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl<T> SwitchablePersistence<T> {
    pub fn new() -> (Self, StorageSwitch) {
        let available = Arc::new(AtomicBool::new(true));
        let persistence = Self {
            inner: InMemoryPersistence::default(),
            available: available.clone(),
        };
        (persistence, StorageSwitch(available))
    }
}

impl<T: Send + 'static> Persistence<T> for SwitchablePersistence<T> {
    fn load(&mut self) -> Result<Snapshot<T>, StorageError> {
        self.inner.load()
    }

    fn save(&mut self, next_id: u32, records: &[&T]) -> Result<(), StorageError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("backing store offline".into()));
        }
        self.inner.save(next_id, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Member {
        id: u32,
        email: String,
    }

    #[derive(Debug)]
    struct MemberCreate {
        email: String,
    }

    #[derive(Debug)]
    struct MemberUpdate;

    #[derive(Debug, thiserror::Error)]
    #[error("Member error")]
    struct MemberError;

    #[async_trait]
    impl ActorEntity for Member {
        type Id = u32;
        type Create = MemberCreate;
        type Update = MemberUpdate;
        type Context = ();
        type Error = MemberError;

        fn id(&self) -> &u32 {
            &self.id
        }

        fn from_create_params(id: u32, params: MemberCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                email: params.email,
            })
        }

        async fn on_update(&mut self, _: MemberUpdate, _: &()) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn member(id: u32, email: &str) -> Member {
        Member {
            id,
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_client_channel_helpers() {
        let (client, mut receiver) = create_mock_client::<Member>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(MemberCreate {
                    email: "test@example.com".to_string(),
                })
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.email, "test@example.com");
        responder.send(Ok(member(1, &payload.email))).unwrap();

        let created = create_task.await.unwrap().unwrap();
        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Member>::new();
        mock.expect_create().return_ok(member(1, "test@example.com"));
        mock.expect_list().return_ok(vec![member(1, "test@example.com")]);
        mock.expect_delete(1).return_ok(());

        let client = mock.client();
        let created = client
            .create(MemberCreate {
                email: "test@example.com".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(client.list().await.unwrap().len(), 1);
        client.delete(1).await.unwrap();

        mock.verify();
    }

    #[tokio::test]
    async fn test_wrong_id_is_reported() {
        let mut mock = MockClient::<Member>::new();
        mock.expect_update(1).return_ok(member(1, "a@example.com"));

        let result = mock.client().update(2, MemberUpdate).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));

        let verdict = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| mock.verify()));
        assert!(verdict.is_err());
    }

    #[test]
    fn test_switch_fails_and_restores_writes() {
        let (mut store, switch) = SwitchablePersistence::<Member>::new();
        let m = member(1, "a@example.com");
        assert!(store.save(2, &[&m]).is_ok());
        switch.fail();
        assert!(matches!(store.save(2, &[&m]), Err(StorageError::Unavailable(_))));
        switch.restore();
        assert!(store.save(2, &[&m]).is_ok());
    }
}
