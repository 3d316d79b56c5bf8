// Company file library. Uploads happen elsewhere; this side only lists them.

pub mod handlers;
