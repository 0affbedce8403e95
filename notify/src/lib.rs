//! Operator notifications.
//!
//! Delivery is best-effort: a `Notifier` never returns an error to its
//! caller. Failures are logged inside the implementation and dropped.

pub mod errors;
pub mod log;
pub mod message;
pub mod telegram;

pub use errors::NotifyError;
pub use log::LogNotifier;
pub use telegram::{TelegramCredentials, TelegramNotifier};

use std::sync::Arc;

use async_trait::async_trait;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str);
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    async fn send(&self, message: &str) {
        (**self).send(message).await
    }
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Box<T> {
    async fn send(&self, message: &str) {
        (**self).send(message).await
    }
}
