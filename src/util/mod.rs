pub mod errors;
pub mod html;
pub mod jwt;
pub mod subscribe;

pub use errors::{ErrorData, ErrorFactory, ErrorMap, FirebaseError};
pub use html::escape_html;
pub use jwt::{decode_claims, TokenClaims};
pub use subscribe::{ObserverList, PartialObserver, Unsubscribe};
