//! Credential types, signing, and issuance

mod grants;
mod issuer;
mod signer;
mod token;

pub use grants::Grants;
pub use issuer::CredentialIssuer;
pub use signer::{CredentialSigner, JwtSigner, MockSigner, TokenClaims};
pub use token::Credential;
