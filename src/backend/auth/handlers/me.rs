/**
 * Current Session Handler
 *
 * Echoes the verified session as a public profile. The `AuthSession`
 * extractor does the cookie check; an invalid or missing session never
 * reaches this body.
 */
use axum::Json;

use crate::backend::auth::gate::AuthSession;
use crate::shared::staff::StaffProfile;

/// Current session handler
///
/// # Returns
///
/// The public profile of the authenticated staff member
pub async fn get_me(session: AuthSession) -> Json<StaffProfile> {
    Json(StaffProfile::new(
        session.staff_id,
        session.name,
        session.role,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::roles::Role;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_me_echoes_session() {
        let id = Uuid::new_v4();
        let session = AuthSession {
            staff_id: id,
            name: "Io Reyes".to_string(),
            role: Role::Performer,
        };
        let Json(profile) = get_me(session).await;
        assert_eq!(profile, StaffProfile::new(id, "Io Reyes", Role::Performer));
    }
}
