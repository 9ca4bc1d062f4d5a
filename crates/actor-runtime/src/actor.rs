use crate::channels::IntentReceiver;
use crate::{actor_error, actor_info};
use actor_protocol::ActorError;
use std::ops::ControlFlow;
use std::thread::JoinHandle;

/// Actor trait for the Worker Loop
///
/// An actor owns its state outright and is driven by exactly one thread. It
/// receives intents in queue order and handles each one to completion before
/// the next is popped, so handlers must never block for long: a stalled
/// handler stalls the whole pipeline.
///
/// # Lifecycle
///
/// 1. **init()** - Called once before message processing starts
/// 2. **handle()** - Called for each dequeued message
/// 3. **after_drain()** - Called each time the queue runs dry
/// 4. **shutdown()** - Called once when the loop exits
///
/// # Example
///
/// ```ignore
/// struct Counter {
///     seen: u32,
/// }
///
/// impl Actor for Counter {
///     type Message = u32;
///
///     fn name(&self) -> &'static str {
///         "Counter"
///     }
///
///     fn handle(&mut self, msg: u32) -> Result<ControlFlow<()>, ActorError> {
///         self.seen += msg;
///         Ok(ControlFlow::Continue(()))
///     }
/// }
/// ```
pub trait Actor: Send + 'static {
    /// Message type this actor processes
    type Message: Send + 'static;

    /// Actor name (used for logging and as the worker thread name)
    fn name(&self) -> &'static str;

    /// Initialize the actor before processing messages
    fn init(&mut self) -> Result<(), ActorError> {
        Ok(())
    }

    /// Handle a single message
    ///
    /// `ControlFlow::Break` ends the loop after this message.
    fn handle(&mut self, msg: Self::Message) -> Result<ControlFlow<()>, ActorError>;

    /// Runs once per drain cycle, after the queue is empty and before the
    /// thread goes back to sleep.
    fn after_drain(&mut self) {}

    /// A handler failed. The loop keeps running.
    fn on_error(&mut self, err: ActorError) {
        actor_error!("{} error: {}", self.name(), err);
    }

    /// Clean up before the thread exits
    fn shutdown(&mut self) {}

    /// Main run loop
    ///
    /// Blocks on the queue while idle, drains everything pending once woken,
    /// then calls `after_drain`. Returns the actor once the queue is closed or
    /// a handler breaks.
    fn run(mut self, rx: IntentReceiver<Self::Message>) -> Self
    where
        Self: Sized,
    {
        if let Err(e) = self.init() {
            actor_error!("{} init failed: {}", self.name(), e);
            return self;
        }

        actor_info!("{} started", self.name());

        while let Some(first) = rx.pop_blocking() {
            let mut flow = dispatch(&mut self, first);
            while flow.is_continue() {
                match rx.try_pop() {
                    Some(msg) => flow = dispatch(&mut self, msg),
                    None => break,
                }
            }
            self.after_drain();
            if flow.is_break() {
                break;
            }
        }

        self.shutdown();
        actor_info!("{} stopped", self.name());
        self
    }
}

fn dispatch<A: Actor>(actor: &mut A, msg: A::Message) -> ControlFlow<()> {
    match actor.handle(msg) {
        Ok(flow) => flow,
        Err(e) => {
            actor.on_error(e);
            ControlFlow::Continue(())
        }
    }
}

/// Run `actor` on a dedicated, named OS thread.
pub fn spawn_worker<A: Actor>(
    actor: A,
    rx: IntentReceiver<A::Message>,
) -> std::io::Result<JoinHandle<()>> {
    let name = actor.name().to_string();
    std::thread::Builder::new().name(name).spawn(move || {
        actor.run(rx);
    })
}
