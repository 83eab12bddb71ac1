//! Accounts and caller identity: registration, login, bearer tokens, and the
//! [`Identity`] extractor the other routers rely on for ownership checks.

pub mod domain;
pub mod identity;
pub mod password;
pub mod router;
pub mod service;
pub mod token;

pub use domain::{LoginRequest, ProfileUpdate, RegisterRequest, Role, RoleChange, Session, User};
pub use identity::Identity;
pub use router::account_router;
pub use service::AccountService;
pub use token::{Claims, TokenAuthority, TokenError};
