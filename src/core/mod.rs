// Domain core: errors, records, identifiers, token signing

pub mod crypto;
pub mod errors;
pub mod ids;
pub mod models;
