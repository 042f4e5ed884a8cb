pub(crate) mod admin;
pub(crate) mod auth;
pub(crate) mod events;
pub(crate) mod help;
pub(crate) mod knowledge;
pub(crate) mod posts;
pub(crate) mod router;
pub(crate) mod tasks;
pub(crate) mod users;
