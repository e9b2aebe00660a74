//! Payment handlers.
//!
//! ## Commands
//! - Processing Yoco payment webhooks

mod handle_yoco_webhook;

pub use handle_yoco_webhook::{
    HandleYocoWebhookCommand, HandleYocoWebhookHandler, HandleYocoWebhookResult,
};
