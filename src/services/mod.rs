pub mod credentials;

pub mod account_service;
pub mod account_service_impl;
pub use account_service::{Account, AccountService, AuthError, Registration};
pub use account_service_impl::DefaultAccountService;

pub mod session_service;
pub mod session_service_impl;
pub use session_service::{Credentials, SessionVerifier};
pub use session_service_impl::DefaultSessionVerifier;

#[cfg(test)]
mod test_support;
