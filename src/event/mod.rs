//! Payload-free change notifications for the surrounding UI.

mod bus;

pub use bus::{ChangeBus, SubscriptionId};
