/**
 * Staff Directory
 *
 * Staff records live in one seed document, `staff/index.json`, in the same
 * document store as everything else. Each record carries the bcrypt hash of
 * the member's access key; provisioning beyond editing that document is out
 * of scope.
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::store::{DocumentStore, StoreError};
use crate::shared::roles::Role;
use crate::shared::staff::StaffProfile;

/// Document key of the staff directory
pub const STAFF_DIRECTORY_KEY: &str = "staff/index.json";

/// One staff member as stored in the directory document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffRecord {
    /// Unique staff ID (UUID)
    pub id: Uuid,
    /// Login name (unique within the directory)
    pub username: String,
    /// Display name shown to other staff
    pub name: String,
    /// Role used by the access gate
    pub role: Role,
    /// Bcrypt hash of the access key
    pub access_key_hash: String,
}

impl StaffRecord {
    /// The public view of this record
    pub fn profile(&self) -> StaffProfile {
        StaffProfile::new(self.id, self.name.clone(), self.role)
    }
}

/// Load every record in the staff directory
///
/// An absent directory is an empty roster, not an error; a directory that no
/// longer parses as a record list is `Corrupt`.
pub async fn load_directory(store: &dyn DocumentStore) -> Result<Vec<StaffRecord>, StoreError> {
    let Some(value) = store.read(STAFF_DIRECTORY_KEY).await? else {
        return Ok(Vec::new());
    };
    serde_json::from_value(value).map_err(|e| StoreError::corrupt(STAFF_DIRECTORY_KEY, e))
}

/// Look up one staff member by login name
pub async fn find_by_username(
    store: &dyn DocumentStore,
    username: &str,
) -> Result<Option<StaffRecord>, StoreError> {
    let directory = load_directory(store).await?;
    Ok(directory.into_iter().find(|r| r.username == username))
}

/// Check an access key against a record's stored hash
///
/// A hash that bcrypt cannot parse counts as a failed check, not an error;
/// the caller cannot do anything better with it than reject the login.
pub fn verify_access_key(record: &StaffRecord, access_key: &str) -> bool {
    bcrypt::verify(access_key, &record.access_key_hash).unwrap_or(false)
}

/// Hash an access key for a new directory entry
pub fn hash_access_key(access_key: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(access_key, bcrypt::DEFAULT_COST)
}
