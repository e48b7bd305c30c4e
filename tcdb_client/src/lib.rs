mod client;
mod cookie;
mod errors;
mod retry;
mod user_agent;
pub use self::client::{FetchedPage, Session};
pub use self::cookie::{normalize_cookie, read_cookie_file};
pub use self::errors::Error;
pub use self::retry::{is_retryable, RetryPolicy, RETRYABLE_STATUSES};
pub use self::user_agent::USER_AGENT;
