//! # Mock Framework
//!
//! Utilities for testing clients in isolation, without spawning the real actor.
//!
//! Use [`create_mock_client`] to get a client and the receiver it sends to, then use
//! [`expect_action`] or [`expect_event`] to assert what arrived and answer it.
//! [`MockClient`] offers a fluent alternative with queued expectations.

use crate::framework::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// A queued reply for the next action request.
enum Expectation<T: ActorEntity> {
    Action {
        response: Result<T::ActionResult, T::Error>,
    },
}

/// A mock client with expectation tracking for fluent testing.
///
/// Events sent through the client are recorded and can be read back with
/// [`MockClient::events`]; actions are answered from the expectation queue in order.
///
/// # Example
/// ```ignore
/// let mock = MockClient::<DeliveryCoordinator>::new();
/// mock.expect_action().return_ok(CourierActionResult::Deliverable(true));
///
/// let client = CourierClient::new(mock.client(), RewardCatalog::builtin());
/// assert!(client.is_deliverable().await?);
/// mock.verify();
/// ```
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
    events: Arc<Mutex<Vec<T::Event>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let events = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let events_clone = events.clone();

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                match request {
                    ResourceRequest::Action { action, respond_to } => {
                        let expectation = expectations_clone.lock().unwrap().pop_front();
                        match expectation {
                            Some(Expectation::Action { response }) => {
                                let _ = respond_to.send(response);
                            }
                            None => panic!("Unexpected action: {action:?}"),
                        }
                    }
                    ResourceRequest::Event { event } => {
                        events_clone.lock().unwrap().push(event);
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            events,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects an action request.
    pub fn expect_action(&self) -> ActionExpectationBuilder<T> {
        ActionExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Number of events received so far.
    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Drains the events received so far.
    pub fn events(&self) -> Vec<T::Event> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder for action expectations.
pub struct ActionExpectationBuilder<T: ActorEntity> {
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T: ActorEntity> ActionExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, result: T::ActionResult) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Action { response: Ok(result) });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: T::Error) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Action { response: Err(error) });
    }
}

// =============================================================================
// RECEIVER HELPERS
// =============================================================================

/// Creates a mock client and a receiver for asserting requests.
///
/// # Testing Strategy
/// Instead of spinning up a `ResourceActor`, the client sends into a channel the test
/// controls. The test inspects each message and answers it, which makes success,
/// failure and ordering fully deterministic.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is an Action request.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Action, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { action, respond_to }) => Some((action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Event.
pub async fn expect_event<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<T::Event> {
    match receiver.recv().await {
        Some(ResourceRequest::Event { event }) => Some(event),
        _ => None,
    }
}

/// Replies to an action with a transport failure, as a crashed actor would look to the caller.
pub fn respond_dropped<T: ActorEntity>(respond_to: Response<T>) {
    let _ = respond_to.send(Err(T::Error::from(FrameworkError::ActorDropped)));
}
