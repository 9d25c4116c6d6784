use std::pin::Pin;
use std::time::Duration;

use futures::Stream;
use tokio_util::sync::CancellationToken;

/// One partial rendering of the text being revealed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealUpdate {
    pub content: String,
    /// False only on the update carrying the full text
    pub more: bool,
}

pub type RevealStream = Pin<Box<dyn Stream<Item = RevealUpdate> + Send>>;

/// Pause after a character, in time units
pub fn delay_units(ch: char) -> u32 {
    match ch {
        ' ' => 20,
        '.' | '!' | '?' => 50,
        ',' | ';' | ':' => 10,
        _ => 15,
    }
}

/// Emits a text one character at a time with punctuation-aware pacing
#[derive(Debug, Clone, Copy)]
pub struct Revealer {
    unit: Duration,
    trailing_wait: bool,
}

impl Default for Revealer {
    fn default() -> Self {
        Self {
            unit: Duration::from_millis(1),
            trailing_wait: false,
        }
    }
}

impl Revealer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of one time unit
    pub fn with_unit(mut self, unit: Duration) -> Self {
        self.unit = unit;
        self
    }

    /// Also pause after the last character, like the web widget did
    pub fn with_trailing_wait(mut self, trailing_wait: bool) -> Self {
        self.trailing_wait = trailing_wait;
        self
    }

    pub fn delay_after(&self, ch: char) -> Duration {
        self.unit * delay_units(ch)
    }

    /// Total time spent waiting while revealing `text`
    pub fn total_delay(&self, text: &str) -> Duration {
        let count = text.chars().count();
        text.chars()
            .enumerate()
            .filter(|(index, _)| self.trailing_wait || index + 1 < count)
            .map(|(_, ch)| self.delay_after(ch))
            .sum()
    }

    /// Lazily reveal `text`: one update per character, growing prefixes.
    ///
    /// The stream is single-use; revealing again starts from an empty prefix.
    /// Once `cancel` fires no further update is produced, including while a
    /// pause is pending.
    pub fn reveal(&self, text: impl Into<String>, cancel: CancellationToken) -> RevealStream {
        let text = text.into();
        let revealer = *self;

        Box::pin(async_stream::stream! {
            let total = text.chars().count();
            let mut content = String::with_capacity(text.len());

            for (index, ch) in text.chars().enumerate() {
                if cancel.is_cancelled() {
                    break;
                }
                content.push(ch);
                let more = index + 1 < total;
                yield RevealUpdate { content: content.clone(), more };

                if more || revealer.trailing_wait {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(revealer.delay_after(ch)) => {}
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio::time::Instant;

    #[test]
    fn delays_follow_punctuation() {
        assert_eq!(delay_units(' '), 20);
        assert_eq!(delay_units('.'), 50);
        assert_eq!(delay_units('!'), 50);
        assert_eq!(delay_units('?'), 50);
        assert_eq!(delay_units(','), 10);
        assert_eq!(delay_units(';'), 10);
        assert_eq!(delay_units(':'), 10);
        assert_eq!(delay_units('a'), 15);
        assert_eq!(delay_units('é'), 15);
    }

    #[tokio::test(start_paused = true)]
    async fn reveals_hi_in_three_updates() {
        let started = Instant::now();
        let updates: Vec<_> = Revealer::new()
            .reveal("Hi!", CancellationToken::new())
            .collect()
            .await;

        assert_eq!(
            updates,
            vec![
                RevealUpdate { content: "H".into(), more: true },
                RevealUpdate { content: "Hi".into(), more: true },
                RevealUpdate { content: "Hi!".into(), more: false },
            ]
        );
        // 15 after 'H', 15 after 'i', nothing after the final '!'
        assert_eq!(started.elapsed(), Duration::from_millis(30));
    }

    #[tokio::test(start_paused = true)]
    async fn trailing_wait_reproduces_widget_pacing() {
        let revealer = Revealer::new().with_trailing_wait(true);
        let started = Instant::now();
        let count = revealer.reveal("Hi!", CancellationToken::new()).count().await;

        assert_eq!(count, 3);
        assert_eq!(started.elapsed(), Duration::from_millis(80));
        assert_eq!(revealer.total_delay("Hi!"), Duration::from_millis(80));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_text_emits_nothing() {
        let started = Instant::now();
        let updates: Vec<_> = Revealer::new()
            .reveal("", CancellationToken::new())
            .collect()
            .await;
        assert!(updates.is_empty());
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn one_update_per_char_with_growing_prefixes() {
        let text = "Bonjour, à Lille ?";
        let updates: Vec<_> = Revealer::new()
            .reveal(text, CancellationToken::new())
            .collect()
            .await;

        assert_eq!(updates.len(), text.chars().count());
        for pair in updates.windows(2) {
            assert!(pair[1].content.starts_with(&pair[0].content));
            assert_eq!(pair[1].content.chars().count(), pair[0].content.chars().count() + 1);
        }
        assert!(updates[..updates.len() - 1].iter().all(|u| u.more));
        assert_eq!(updates.last().unwrap().content, text);
        assert!(!updates.last().unwrap().more);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_matches_total_delay() {
        let text = "Oui, bien sûr. Voici.";
        let revealer = Revealer::new();
        let started = Instant::now();
        revealer.reveal(text, CancellationToken::new()).count().await;
        assert_eq!(started.elapsed(), revealer.total_delay(text));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_pending_updates() {
        let cancel = CancellationToken::new();
        let mut stream = Revealer::new().reveal("abcdef", cancel.clone());

        let first = stream.next().await.unwrap();
        assert_eq!(first.content, "a");
        cancel.cancel();

        assert_eq!(stream.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn unit_scales_pacing() {
        let revealer = Revealer::new().with_unit(Duration::from_millis(2));
        let started = Instant::now();
        revealer.reveal("ok", CancellationToken::new()).count().await;
        assert_eq!(started.elapsed(), Duration::from_millis(30));
    }
}
