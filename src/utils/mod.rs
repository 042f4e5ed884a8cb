pub(crate) mod auth;
pub(crate) mod extract;
pub(crate) mod rank;
