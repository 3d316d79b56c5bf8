// External storage connections (OneDrive). Linking a new account is out of
// this service's hands; listing and disconnecting are not.

pub mod handlers;
