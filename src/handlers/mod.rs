pub(crate) mod echo;
pub(crate) mod health;
pub(crate) mod home;
pub(crate) mod http_options;
pub(crate) mod items;
pub(crate) mod not_found;
