/// Desktop Chrome user agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
