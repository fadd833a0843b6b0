//! Transient status line.
//!
//! Loading messages stay until replaced. Everything else disappears after the
//! dismiss delay.

use std::time::Duration;
use tokio::time::Instant;

pub const SEARCHING_COORDINATES: &str = "Buscando coordenadas…";
pub const FETCHING_FORECAST: &str = "Buscando previsão…";
pub const REQUESTING_LOCATION: &str = "Solicitando localização…";
pub const RESOLVING_PLACE_NAME: &str = "Buscando nome do local…";
pub const EMPTY_QUERY: &str = "Digite uma cidade ou use a localização";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

#[derive(Debug)]
pub struct StatusLine {
    current: Option<(StatusMessage, Option<Instant>)>,
    dismiss_after: Duration,
}

impl StatusLine {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            current: None,
            dismiss_after,
        }
    }

    pub fn loading(&mut self, text: &str) {
        self.set(text.to_string(), StatusKind::Loading);
    }

    pub fn info(&mut self, text: &str) {
        self.set(text.to_string(), StatusKind::Info);
    }

    /// Error shown as `Erro: <message>`.
    pub fn error(&mut self, message: &str) {
        self.set(format!("Erro: {}", message), StatusKind::Error);
    }

    /// Error shown verbatim, without the prefix.
    pub fn alert(&mut self, text: &str) {
        self.set(text.to_string(), StatusKind::Error);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Message still on screen, if any.
    pub fn visible(&self) -> Option<&StatusMessage> {
        let (message, deadline) = self.current.as_ref()?;
        match deadline {
            Some(at) if Instant::now() >= *at => None,
            _ => Some(message),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.visible()
            .is_some_and(|m| m.kind == StatusKind::Loading)
    }

    fn set(&mut self, text: String, kind: StatusKind) {
        tracing::info!("[status] {}", text);
        let deadline = match kind {
            StatusKind::Loading => None,
            StatusKind::Info | StatusKind::Error => Some(Instant::now() + self.dismiss_after),
        };
        self.current = Some((StatusMessage { text, kind }, deadline));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_info_auto_dismisses() {
        let mut status = StatusLine::new(Duration::from_secs(4));
        status.info(EMPTY_QUERY);
        assert_eq!(status.visible().map(|m| m.text.as_str()), Some(EMPTY_QUERY));

        tokio::time::advance(Duration::from_millis(3999)).await;
        assert!(status.visible().is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(status.visible().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_stays_until_replaced() {
        let mut status = StatusLine::new(Duration::from_secs(4));
        status.loading(FETCHING_FORECAST);
        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(status.is_loading());

        status.error("Local não encontrado");
        let visible = status.visible().unwrap();
        assert_eq!(visible.text, "Erro: Local não encontrado");
        assert_eq!(visible.kind, StatusKind::Error);

        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(status.visible().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_message_restarts_timer() {
        let mut status = StatusLine::new(Duration::from_secs(4));
        status.info("a");
        tokio::time::advance(Duration::from_secs(3)).await;
        status.info("b");
        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(status.visible().map(|m| m.text.as_str()), Some("b"));
    }

    #[test]
    fn test_clear() {
        let mut status = StatusLine::new(Duration::from_secs(4));
        status.loading(SEARCHING_COORDINATES);
        status.clear();
        assert!(status.visible().is_none());
    }
}
