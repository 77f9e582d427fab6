// Visibility gate - one snapshot of the public/private flag per page activation
use crate::application::submission_repository::VisibilitySettings;
use crate::domain::visibility::PublicSettings;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub struct VisibilityGate {
    source: Arc<dyn VisibilitySettings>,
    snapshot: OnceCell<PublicSettings>,
}

impl VisibilityGate {
    pub fn new(source: Arc<dyn VisibilitySettings>) -> Self {
        Self {
            source,
            snapshot: OnceCell::new(),
        }
    }

    /// Load the flag on first call; later calls return the same snapshot.
    /// A load failure counts as private.
    pub async fn initialize(&self) -> PublicSettings {
        *self
            .snapshot
            .get_or_init(|| async {
                match self.source.load().await {
                    Ok(settings) => {
                        tracing::debug!(
                            "Visibility loaded: public_data_enabled={}",
                            settings.is_public_data_enabled
                        );
                        settings
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load visibility settings, treating as private: {}", e);
                        PublicSettings::private()
                    }
                }
            })
            .await
    }

    pub fn settings(&self) -> PublicSettings {
        self.snapshot.get().copied().unwrap_or_default()
    }

    pub fn is_public_data_enabled(&self) -> bool {
        self.settings().is_public_data_enabled
    }
}
