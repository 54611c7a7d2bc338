//! Share code generation.

use uuid::Uuid;

use gallery_core::result::AppResult;
use gallery_database::store::ShareStore;

/// Generates unique 32-character hexadecimal share codes.
///
/// Uniqueness is checked against the store before use, but the authoritative
/// guard is the UNIQUE constraint on `share_links.share_code`: an insert that
/// loses the race surfaces as a conflict and the caller regenerates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeGenerator;

impl CodeGenerator {
    /// Produce one candidate code.
    pub fn generate() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Produce a code not currently present in the store.
    pub async fn generate_unused(store: &dyn ShareStore) -> AppResult<String> {
        loop {
            let code = Self::generate();
            if !store.code_exists(&code).await? {
                return Ok(code);
            }
        }
    }
}
