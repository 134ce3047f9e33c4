//! Chat relay loop.
//!
//! # Responsibilities
//! - Poll the bot API and translate commands into pet actions
//! - Guard the shared session account with a single-permit busy check
//! - Pump queued notifications back out to the originating chats
//!
//! # Design Decisions
//! - One action in flight at a time per process: the session account is a
//!   shared resource and conflicting submissions would race it
//! - Action lifecycles run on their own tasks; the poll loop never waits on
//!   a transaction
//! - Replies are fire-and-forget through an unbounded channel; the pump
//!   drains it until every producer is gone

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::{broadcast, mpsc, Semaphore};

use crate::bot::api::{BotClient, Update};
use crate::chain::call::ActionCall;
use crate::chain::contract::PetContract;
use crate::chain::executor::ActionExecutor;
use crate::chain::fees::FeePolicy;
use crate::chain::reporter::{NotificationSink, ResultReporter};
use crate::chain::stats::StatsReader;
use crate::chain::submitter::TxSubmitter;
use crate::chain::waiter::ConfirmationWaiter;
use crate::observability::metrics;

const WELCOME_REPLY: &str = "Welcome! Up and running.";
const FALLBACK_REPLY: &str = "Got another message!";
const BUSY_REPLY: &str = "Hold on, the previous action is still in flight.";
const STATS_UNAVAILABLE_REPLY: &str = "Could not fetch pet stats right now.";

/// What a chat message asks the relay to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Do(ActionCall),
    Stats,
    Other,
}

impl Command {
    /// Parse a message text. Commands may carry a `@botname` suffix and
    /// trailing arguments; both are ignored.
    pub fn parse(text: &str) -> Self {
        let word = text.trim().split_whitespace().next().unwrap_or("");
        let word = word.split('@').next().unwrap_or(word);

        match word {
            "/start" => Command::Start,
            "/feed" => Command::Do(ActionCall::Feed),
            "/play" => Command::Do(ActionCall::Play),
            "/rest" => Command::Do(ActionCall::Rest),
            "/stats" => Command::Stats,
            _ => Command::Other,
        }
    }
}

/// A reply queued for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub text: String,
}

/// Notification sink that queues replies for one chat.
#[derive(Debug, Clone)]
pub struct ChatNotifier {
    chat_id: i64,
    outbound: mpsc::UnboundedSender<OutboundMessage>,
}

impl ChatNotifier {
    pub fn new(chat_id: i64, outbound: mpsc::UnboundedSender<OutboundMessage>) -> Self {
        Self { chat_id, outbound }
    }

    fn enqueue(&self, text: &str) {
        let message = OutboundMessage {
            chat_id: self.chat_id,
            text: text.to_string(),
        };
        if self.outbound.send(message).is_err() {
            tracing::warn!(chat_id = self.chat_id, "Outbound queue closed, dropping notification");
        }
    }
}

impl NotificationSink for ChatNotifier {
    fn notify_success(&self, message: &str) {
        self.enqueue(message);
    }

    fn notify_failure(&self, message: &str) {
        self.enqueue(message);
    }
}

/// The long-polling chat loop.
pub struct ChatRelay {
    client: Arc<BotClient>,
    contract: Arc<PetContract>,
    fee_policy: FeePolicy,
    submitter: TxSubmitter,
    waiter: ConfirmationWaiter,
    stats: StatsReader,
    busy: Arc<Semaphore>,
}

impl ChatRelay {
    pub fn new(
        client: Arc<BotClient>,
        contract: Arc<PetContract>,
        fee_policy: FeePolicy,
        submitter: TxSubmitter,
        waiter: ConfirmationWaiter,
        stats: StatsReader,
    ) -> Self {
        Self {
            client,
            contract,
            fee_policy,
            submitter,
            waiter,
            stats,
            busy: Arc::new(Semaphore::new(1)),
        }
    }

    /// Poll updates until shutdown, then drain outbound replies.
    ///
    /// Returns once the queue is empty and every in-flight lifecycle has
    /// reported; submitted transactions are never cancelled.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let pump = tokio::spawn(outbound_pump(self.client.clone(), outbound_rx));

        let mut offset = 0i64;

        tracing::info!("Chat relay started");
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Chat relay stopping");
                    break;
                }
                batch = self.client.get_updates(offset) => match batch {
                    Ok(updates) => {
                        for update in updates {
                            offset = offset.max(update.update_id + 1);
                            self.handle_update(update, &outbound_tx);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Update poll failed, backing off");
                        let jitter = rand::thread_rng().gen_range(0..500);
                        tokio::time::sleep(Duration::from_millis(1_000 + jitter)).await;
                    }
                }
            }
        }

        // Our sender is gone; the pump finishes once in-flight lifecycles
        // drop theirs.
        drop(outbound_tx);
        if let Err(e) = pump.await {
            tracing::error!(error = %e, "Outbound pump task failed");
        }
    }

    fn handle_update(&self, update: Update, outbound: &mpsc::UnboundedSender<OutboundMessage>) {
        let Some(message) = update.message else { return };
        let Some(text) = message.text.as_deref() else { return };
        let chat_id = message.chat.id;

        match Command::parse(text) {
            Command::Start => {
                metrics::record_chat_event("start");
                queue_reply(outbound, chat_id, WELCOME_REPLY);
            }
            Command::Stats => {
                metrics::record_chat_event("stats");
                let stats = self.stats.clone();
                let outbound = outbound.clone();
                tokio::spawn(async move {
                    match stats.read().await {
                        Ok(current) => {
                            queue_reply(&outbound, chat_id, &format!("Pet status: {}.", current));
                        }
                        Err(e) => {
                            tracing::warn!(chat_id = chat_id, error = %e, "Stats read failed");
                            queue_reply(&outbound, chat_id, STATS_UNAVAILABLE_REPLY);
                        }
                    }
                });
            }
            Command::Do(call) => {
                metrics::record_chat_event("action");
                match self.busy.clone().try_acquire_owned() {
                    Ok(permit) => {
                        let executor = self.executor_for(chat_id, outbound.clone());
                        tokio::spawn(async move {
                            executor.execute(&call).await;
                            drop(permit);
                        });
                    }
                    Err(_) => {
                        metrics::record_chat_event("busy");
                        tracing::debug!(chat_id = chat_id, "Action refused, one already in flight");
                        queue_reply(outbound, chat_id, BUSY_REPLY);
                    }
                }
            }
            Command::Other => {
                metrics::record_chat_event("echo");
                queue_reply(outbound, chat_id, FALLBACK_REPLY);
            }
        }
    }

    /// Assemble the lifecycle pipeline with reporting bound to one chat.
    fn executor_for(
        &self,
        chat_id: i64,
        outbound: mpsc::UnboundedSender<OutboundMessage>,
    ) -> ActionExecutor {
        let notifier = ChatNotifier::new(chat_id, outbound);
        ActionExecutor::new(
            self.contract.clone(),
            self.fee_policy.clone(),
            self.submitter.clone(),
            self.waiter.clone(),
            ResultReporter::new(Arc::new(notifier)),
        )
    }
}

fn queue_reply(outbound: &mpsc::UnboundedSender<OutboundMessage>, chat_id: i64, text: &str) {
    let message = OutboundMessage {
        chat_id,
        text: text.to_string(),
    };
    if outbound.send(message).is_err() {
        tracing::warn!(chat_id = chat_id, "Outbound queue closed, dropping reply");
    }
}

/// Deliver queued replies until every sender is gone.
async fn outbound_pump(client: Arc<BotClient>, mut rx: mpsc::UnboundedReceiver<OutboundMessage>) {
    while let Some(message) = rx.recv().await {
        if let Err(e) = client.send_message(message.chat_id, &message.text).await {
            tracing::warn!(chat_id = message.chat_id, error = %e, "Failed to deliver reply");
        }
    }
    tracing::debug!("Outbound pump drained");
}
