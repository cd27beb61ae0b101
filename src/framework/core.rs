//! # Core Actor Framework
//!
//! This module defines the generic building blocks for the actor system.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: The trait that the actor-owned state must implement.
//! - [`ResourceActor`]: The generic actor that owns the state and runs the message loop.
//! - [`ResourceClient`]: The generic client for communicating with actors.
//! - [`FrameworkError`]: Transport errors (e.g., ActorClosed, ActorDropped).

use async_trait::async_trait;
use std::fmt::Debug;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION (Trait with Hooks, Actions and Events)
// =============================================================================

/// Trait that any actor-owned state must implement to be driven by [`ResourceActor`].
///
/// # Architecture Note
/// The actor owns exactly one `ActorEntity` value and applies every message to it in
/// arrival order. Business logic lives in the entity; channels, the message loop and
/// logging live in the framework.
///
/// Two kinds of input exist:
/// - **Actions** are request/response: the caller awaits an `ActionResult` or an `Error`.
/// - **Events** are fire-and-forget pushes (e.g. location fixes). They never produce a reply.
///
/// # Async & Context
/// This trait is `#[async_trait]` so hooks may await (e.g. flushing storage on stop).
/// The `Context` type is injected into every hook by [`ResourceActor::run`], which allows
/// shared, immutable dependencies to be bound late instead of at construction time.
#[async_trait]
pub trait ActorEntity: Send + 'static {
    /// Enum of the operations the actor accepts.
    type Action: Send + Debug;

    /// The result type returned by actions.
    type ActionResult: Send + Debug;

    /// Enum of fire-and-forget inputs.
    type Event: Send + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity. Transport failures are folded into it through
    /// `From<FrameworkError>` so clients deal with a single error enum.
    type Error: std::error::Error + From<FrameworkError> + Send + Sync + 'static;

    // --- Lifecycle Hooks (Async) ---

    /// Called once before the first message is processed.
    async fn on_start(&mut self, _ctx: &Self::Context) {}

    /// Called once after the channel has closed and the last message was processed.
    async fn on_stop(&mut self, _ctx: &Self::Context) {}

    // --- Handlers (Async) ---

    /// Handle a request/response action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    /// Apply a fire-and-forget event.
    async fn handle_event(&mut self, event: Self::Event, ctx: &Self::Context);
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors raised by the message transport itself.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
}

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<<T as ActorEntity>::ActionResult, <T as ActorEntity>::Error>>;

/// Internal message type sent to the actor.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Action {
        action: T::Action,
        respond_to: Response<T>,
    },
    Event {
        event: T::Event,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// The generic actor that owns one [`ActorEntity`].
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the state and the receiver
/// end of the channel. Messages are processed *sequentially*, so the entity needs no
/// `Mutex` or `RwLock`: exclusive ownership inside the task is the synchronization.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    entity: T,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` around `entity` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the mailbox capacity; senders wait when it is full.
    pub fn new(entity: T, buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, entity };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// Returns the entity so callers (mostly tests) can inspect the final state.
    pub async fn run(mut self, context: T::Context) -> T {
        // Extract just the type name (e.g., "DeliveryCoordinator")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");
        self.entity.on_start(&context).await;

        let mut processed: u64 = 0;
        while let Some(msg) = self.receiver.recv().await {
            processed += 1;
            match msg {
                ResourceRequest::Action { action, respond_to } => {
                    debug!(entity_type, ?action, "Action");
                    let result = self.entity.handle_action(action, &context).await;
                    match &result {
                        Ok(_) => debug!(entity_type, "Action ok"),
                        Err(e) => warn!(entity_type, error = %e, "Action failed"),
                    }
                    // The caller may have given up waiting; nothing to do then.
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Event { event } => {
                    debug!(entity_type, ?event, "Event");
                    self.entity.handle_event(event, &context).await;
                }
            }
        }

        self.entity.on_stop(&context).await;
        info!(entity_type, processed, "Shutdown");
        self.entity
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for interacting with a `ResourceActor`.
///
/// Holds only a sender, so cloning is cheap and clones can be shared across tasks.
/// The actor stops once every clone has been dropped.
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    /// Sends an action and waits for its result.
    pub async fn perform_action(&self, action: T::Action) -> Result<T::ActionResult, T::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Action { action, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Enqueues an event without waiting for it to be applied.
    ///
    /// Events from one client are applied in the order they were sent.
    pub async fn notify(&self, event: T::Event) -> Result<(), FrameworkError> {
        self.sender
            .send(ResourceRequest::Event { event })
            .await
            .map_err(|_| FrameworkError::ActorClosed)
    }

    /// Returns `true` once the actor has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
