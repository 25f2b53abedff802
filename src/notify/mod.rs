//! Notification intents and in-app delivery
//!
//! Core components emit [`NotificationIntent`](crate::types::NotificationIntent)s
//! after their transaction commits. Emission never blocks and never fails the
//! triggering operation; a background [`NotificationDispatcher`] hands the
//! intents to delivery sinks such as the in-app [`NotificationInbox`].

pub mod dispatcher;
pub mod emitter;
pub mod inbox;
pub mod messages;

pub use dispatcher::{NotificationDelivery, NotificationDispatcher};
pub use emitter::{
    emit_best_effort, emit_with_backpressure, ChannelNotificationEmitter, NoopNotificationEmitter, NotificationEmitter,
    RecordingNotificationEmitter,
};
pub use inbox::NotificationInbox;
