use uuid::Uuid;

use crate::database::models::CreateActivityInput;
use crate::database::repositories::ActivityRepository;

/// Records audit-trail entries for mutations. Logging failures are reported
/// but never fail the mutation that triggered them.
#[derive(Clone)]
pub struct ActivityLogger {
    repository: ActivityRepository,
}

impl ActivityLogger {
    pub fn new(repository: ActivityRepository) -> Self {
        Self { repository }
    }

    pub async fn log_activity(
        &self,
        actor_id: Option<Uuid>,
        entity_type: &str,
        entity_id: &str,
        action: &str,
        description: String,
        metadata: Option<serde_json::Value>,
    ) {
        let input = CreateActivityInput {
            user_id: actor_id,
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            action: action.to_string(),
            description,
            metadata,
        };

        if let Err(err) = self.repository.log_activity(input).await {
            log::warn!(
                "Failed to record {} activity on {} {}: {}",
                action,
                entity_type,
                entity_id,
                err
            );
        }
    }
}
