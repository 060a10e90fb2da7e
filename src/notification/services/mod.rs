//! Notification message composition.

mod composer;

pub use composer::{NotificationComposeError, NotificationComposer, NotificationTemplates};
