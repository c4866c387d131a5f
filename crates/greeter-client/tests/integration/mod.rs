mod login;
mod session_store;
