use std::sync::Arc;

use viko_push::Notifier;
use viko_store::Store;
use viko_translate::Translator;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<Store>,
    pub translator: Translator,
    pub notifier: Notifier,
    /// Served to clients so they can register push subscriptions.
    pub vapid_public_key: String,
}
