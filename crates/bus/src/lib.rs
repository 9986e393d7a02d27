//! Plutus Event Bus
//!
//! A publish/subscribe hub keyed by [`Topic`]. Listeners register per topic
//! and receive every event published to that topic after their subscription
//! completes; nothing is replayed. Delivery is isolated per listener: a
//! panicking callback is caught and logged, and never disturbs the publisher
//! or the other listeners of the same publish.
//!
//! Transport layers that drain events asynchronously use the channel adapter
//! in [`subscription`], which unsubscribes itself when dropped.

mod hub;
mod subscription;
mod topic;

pub use hub::{EventBus, SubscriptionHandle};
pub use subscription::TopicSubscription;
pub use topic::Topic;
