//! Channel subscription operations.

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use tubebrief_core::resolve::{resolve_channel_reference, ChannelLookup};
use tubebrief_core::{ChannelSubscription, Error, MetadataGateway, Result, SubscriptionRepository};

/// Subscribes users to channels and manages their subscription list.
pub struct SubscriptionService {
    gateway: Arc<dyn MetadataGateway>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionService {
    /// Create a new service from its capability dependencies.
    pub fn new(
        gateway: Arc<dyn MetadataGateway>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            gateway,
            subscriptions,
        }
    }

    /// Subscribe a user to a channel given a raw reference (canonical ID,
    /// channel URL, or handle).
    ///
    /// Subscribing twice resolves silently to the existing row. The
    /// last-published timestamp starts empty and is advanced as videos are
    /// processed.
    #[instrument(skip(self), fields(subsystem = "pipeline", component = "subscriptions", op = "subscribe", user_id = %user_id))]
    pub async fn subscribe(
        &self,
        user_id: Uuid,
        channel_reference: &str,
    ) -> Result<ChannelSubscription> {
        // Fails synchronously, before any network call.
        let identifier = resolve_channel_reference(channel_reference)?;
        let lookup = ChannelLookup::from_identifier(&identifier);

        let channel = self.gateway.fetch_channel(&lookup).await?.ok_or_else(|| {
            Error::NotFound(format!("channel {} does not exist upstream", identifier))
        })?;

        let subscription = self
            .subscriptions
            .ensure(user_id, &channel.external_channel_id, &channel.title, None)
            .await?;

        info!(
            channel_id = %subscription.external_channel_id,
            subscription_id = %subscription.id,
            "Subscription ensured"
        );
        Ok(subscription)
    }

    /// List all of a user's subscriptions.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<ChannelSubscription>> {
        self.subscriptions.list_for_user(user_id).await
    }

    /// Remove a subscription. `NotFound` when the row does not exist or
    /// belongs to another user.
    pub async fn unsubscribe(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        if !self.subscriptions.delete(id, user_id).await? {
            return Err(Error::NotFound(format!("subscription {}", id)));
        }
        Ok(())
    }
}
