// Prefixed random identifiers

use rand::RngCore;

pub const ACCOUNT_PREFIX: &str = "acc";
pub const WORKFLOW_EXECUTION_PREFIX: &str = "wfe";
pub const CREDENTIAL_PREFIX: &str = "crd";

/// `{prefix}_{32 hex chars}`, or bare hex when `prefix` is empty
pub fn generate_id(prefix: &str) -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    let random = hex::encode(bytes);
    if prefix.is_empty() {
        random
    } else {
        format!("{}_{}", prefix, random)
    }
}

pub fn generate_account_id() -> String {
    generate_id(ACCOUNT_PREFIX)
}

pub fn generate_workflow_execution_id() -> String {
    generate_id(WORKFLOW_EXECUTION_PREFIX)
}

pub fn generate_credential_id() -> String {
    generate_id(CREDENTIAL_PREFIX)
}
