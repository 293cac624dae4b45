//! User-facing notifications.
//!
//! Storage-capacity and upload failures must reach the person at the
//! keyboard, not only the log. A [`Notifier`] is that channel.

use std::sync::Mutex;

/// Shown when the storage slot rejects a save for lack of space.
pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "Erreur: Espace de stockage saturé. Impossible de sauvegarder ce fichier.";

/// Shown when any file of an upload batch could not be read.
pub const UPLOAD_FAILED_MESSAGE: &str =
    "Une erreur est survenue lors du chargement des fichiers.";

/// Sink for blocking user notifications.
pub trait Notifier {
    /// Show a message the user has to acknowledge.
    fn alert(&self, message: &str);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn alert(&self, message: &str) {
        (**self).alert(message)
    }
}

/// Writes notifications to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Keeps notifications in memory, in the order they were raised.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<String>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages raised so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn alert(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        notifier.alert("first");
        notifier.alert("second");
        assert_eq!(notifier.messages(), vec!["first", "second"]);
    }

    #[test]
    fn test_notifier_by_reference() {
        let notifier = MemoryNotifier::new();
        let by_ref = &notifier;
        by_ref.alert("hello");
        assert_eq!(notifier.messages(), vec!["hello"]);
    }
}
