use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ChatConfig;
use crate::models::{Apartment, Attachment, ChatMessage, QuickReply};
use crate::pricing::{BookingSummary, ServiceOptions, UpsellWizard};
use crate::reveal::Revealer;

use super::client::SearchBackend;
use super::types::{HistoryEntry, SearchRequest, SearchResponse};

pub const GREETING: &str = "Bonjour ! Je suis Sarah, votre conseillère en logement chez ECLA. 🏠\n\n\
Je suis là pour vous accompagner dans votre recherche d'appartement. Dites-moi ce que vous \
recherchez (ville, budget, type de logement) et je vous trouve les meilleures options !";

pub const FALLBACK_ANSWER: &str = "Désolé, je n'ai pas pu traiter votre demande.";

/// Left in an answer cancelled before any of its text was shown
pub const CANCELLED_ANSWER: &str = "Réponse interrompue.";

/// Prior messages sent as context with each query
pub const HISTORY_LIMIT: usize = 6;

const ATTACH_PAUSE: Duration = Duration::from_millis(200);

/// Everything the chat view renders. Replaced as a whole on every change.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    /// An exchange is in flight; submissions are ignored meanwhile
    pub loading: bool,
    pub booking: Option<Arc<BookingSummary>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty query or an exchange already running
    Ignored,
    Answered { message_id: String },
    Failed { message_id: String, error: String },
    /// The placeholder was removed or the reveal cancelled before completion
    Superseded { message_id: String },
}

/// Drives one conversation with the search assistant
pub struct ChatSession<B> {
    backend: B,
    revealer: Revealer,
    search_type: Option<String>,
    attach_pause: Duration,
    state: watch::Sender<ChatState>,
    in_flight: Mutex<Option<(String, CancellationToken)>>,
}

/// Clears `loading` however the exchange ends, including when dropped mid-way
struct LoadingGuard<'a> {
    state: &'a watch::Sender<ChatState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|state| state.loading = false);
    }
}

impl<B: SearchBackend> ChatSession<B> {
    pub fn new(backend: B, config: &ChatConfig) -> Self {
        let initial = ChatState {
            messages: vec![ChatMessage::assistant(GREETING)],
            ..Default::default()
        };
        let (state, _) = watch::channel(initial);

        Self {
            backend,
            revealer: Revealer::default(),
            search_type: config.search_type.clone(),
            attach_pause: ATTACH_PAUSE,
            state,
            in_flight: Mutex::new(None),
        }
    }

    pub fn with_revealer(mut self, revealer: Revealer) -> Self {
        self.revealer = revealer;
        self
    }

    pub fn with_attach_pause(mut self, pause: Duration) -> Self {
        self.attach_pause = pause;
        self
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ChatState {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state replacement
    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.state.subscribe()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|state| state.input = text);
    }

    /// Send whatever is in the input field
    pub async fn submit_input(&self) -> SubmitOutcome {
        let input = self.state.borrow().input.clone();
        self.submit(&input).await
    }

    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        self.exchange(text.to_string(), text.to_string()).await
    }

    /// Show the reply's label as the user's message and query with its value
    pub async fn submit_quick_reply(&self, reply: &QuickReply) -> SubmitOutcome {
        self.exchange(reply.label.clone(), reply.value.clone()).await
    }

    /// Stop revealing the current answer
    pub fn cancel(&self) {
        if let Some((message_id, token)) = self.lock_in_flight().take() {
            debug!("Cancelling reveal of {}", message_id);
            token.cancel();
        }
    }

    /// Drop the conversation and start over from the greeting
    pub fn clear(&self) {
        self.cancel();
        self.state.send_modify(|state| {
            state.messages = vec![ChatMessage::assistant(GREETING)];
            state.booking = None;
        });
        info!("Conversation cleared");
    }

    /// Open the configurator for an apartment shown in the conversation
    pub fn open_upsell(&self, apartment_id: &str) -> Option<UpsellWizard> {
        let state = self.state.borrow();
        let typology = state
            .messages
            .iter()
            .rev()
            .flat_map(|message| message.apartments())
            .find(|apartment| apartment.id == apartment_id)?
            .clone();

        let services = match &state.booking {
            Some(booking) if booking.typology().id == typology.id => *booking.services(),
            _ => ServiceOptions::default(),
        };
        Some(UpsellWizard::new(typology, services))
    }

    /// Keep a finalized selection, replacing any previous one
    pub fn confirm_booking(&self, summary: BookingSummary) {
        info!(
            "Booking confirmed for {} at {}/month",
            summary.typology().id,
            summary.total_rent()
        );
        let summary = Arc::new(summary);
        self.state.send_modify(|state| state.booking = Some(summary));
    }

    pub fn booking(&self) -> Option<Arc<BookingSummary>> {
        self.state.borrow().booking.clone()
    }

    /// Apartments attached to the most recent message that has any
    pub fn latest_apartments(&self) -> Vec<Apartment> {
        self.state
            .borrow()
            .messages
            .iter()
            .rev()
            .map(|message| message.apartments())
            .find(|apartments| !apartments.is_empty())
            .map(|apartments| apartments.to_vec())
            .unwrap_or_default()
    }

    async fn exchange(&self, display: String, query: String) -> SubmitOutcome {
        if query.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let user = ChatMessage::user(display);
        let placeholder = ChatMessage::placeholder();
        let message_id = placeholder.id.clone();
        let mut history = Vec::new();

        let accepted = self.state.send_if_modified(|state| {
            if state.loading {
                return false;
            }
            history = history_for(&state.messages);
            state.messages.push(user);
            state.messages.push(placeholder);
            state.input.clear();
            state.loading = true;
            true
        });
        if !accepted {
            debug!("Ignoring submission while an exchange is in flight");
            return SubmitOutcome::Ignored;
        }
        let _loading = LoadingGuard { state: &self.state };

        let cancel = CancellationToken::new();
        *self.lock_in_flight() = Some((message_id.clone(), cancel.clone()));

        let request = SearchRequest::new(query, history).with_kind(self.search_type.clone());
        info!("Sending query to {}", self.backend.endpoint());

        let outcome = match self.backend.search(&request).await {
            Ok(response) => self.deliver(&message_id, response, &cancel).await,
            Err(e) => {
                warn!("Search failed: {}", e);
                let error = format!("Erreur: {}", e);
                if self.reveal_into(&message_id, &error, &cancel).await {
                    SubmitOutcome::Failed {
                        message_id: message_id.clone(),
                        error,
                    }
                } else {
                    SubmitOutcome::Superseded {
                        message_id: message_id.clone(),
                    }
                }
            }
        };

        let mut in_flight = self.lock_in_flight();
        if in_flight.as_ref().is_some_and(|(id, _)| *id == message_id) {
            *in_flight = None;
        }
        outcome
    }

    async fn deliver(
        &self,
        message_id: &str,
        response: SearchResponse,
        cancel: &CancellationToken,
    ) -> SubmitOutcome {
        let superseded = || SubmitOutcome::Superseded {
            message_id: message_id.to_string(),
        };

        let answer = if response.answer.trim().is_empty() {
            FALLBACK_ANSWER
        } else {
            response.answer.as_str()
        };
        if !self.reveal_into(message_id, answer, cancel).await {
            return superseded();
        }

        let Some(attachment) = pick_attachment(
            response.has_apartments,
            response.apartments,
            response.quick_replies,
        ) else {
            return SubmitOutcome::Answered {
                message_id: message_id.to_string(),
            };
        };

        tokio::select! {
            _ = cancel.cancelled() => return superseded(),
            _ = tokio::time::sleep(self.attach_pause) => {}
        }

        let attached = self.state.send_if_modified(|state| {
            match state.messages.iter_mut().find(|m| m.id == message_id) {
                Some(message) => {
                    message.attachment = Some(attachment);
                    true
                }
                None => false,
            }
        });
        if !attached {
            return superseded();
        }

        SubmitOutcome::Answered {
            message_id: message_id.to_string(),
        }
    }

    /// Reveal `text` into the message with `message_id`. Returns false when the
    /// message disappeared or the reveal was cancelled before the end.
    async fn reveal_into(&self, message_id: &str, text: &str, cancel: &CancellationToken) -> bool {
        let mut updates = self.revealer.reveal(text, cancel.clone());

        while let Some(update) = updates.next().await {
            let applied = self.state.send_if_modified(|state| {
                match state.messages.iter_mut().find(|m| m.id == message_id) {
                    Some(message) => {
                        message.content = update.content;
                        message.streaming = update.more;
                        true
                    }
                    None => false,
                }
            });
            if !applied {
                debug!("Message {} is gone, stopping reveal", message_id);
                cancel.cancel();
                return false;
            }
        }

        // an empty text or a cancelled reveal leaves the flag up
        let cancelled = cancel.is_cancelled();
        let mut present = false;
        self.state.send_if_modified(|state| {
            match state.messages.iter_mut().find(|m| m.id == message_id) {
                Some(message) => {
                    present = true;
                    let mut changed = std::mem::replace(&mut message.streaming, false);
                    if cancelled && message.content.is_empty() {
                        message.content = CANCELLED_ANSWER.to_string();
                        changed = true;
                    }
                    changed
                }
                None => false,
            }
        });

        present && !cancelled
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<(String, CancellationToken)>> {
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Last non-streaming, non-empty messages, oldest first, as the endpoint expects them
pub fn history_for(messages: &[ChatMessage]) -> Vec<HistoryEntry> {
    let settled: Vec<&ChatMessage> = messages
        .iter()
        .filter(|m| !m.streaming && !m.content.is_empty())
        .collect();
    settled[settled.len().saturating_sub(HISTORY_LIMIT)..]
        .iter()
        .map(|m| HistoryEntry {
            role: m.sender.as_role().to_string(),
            content: m.content.clone(),
        })
        .collect()
}

/// Apartments win over quick replies when a response carries both
pub fn pick_attachment(
    has_apartments: Option<bool>,
    apartments: Vec<Apartment>,
    quick_replies: Vec<QuickReply>,
) -> Option<Attachment> {
    if has_apartments != Some(false) && !apartments.is_empty() {
        Some(Attachment::Apartments(apartments))
    } else if !quick_replies.is_empty() {
        Some(Attachment::QuickReplies(quick_replies))
    } else {
        None
    }
}
