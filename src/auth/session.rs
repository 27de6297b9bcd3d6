// Session-expired signal
// Raised once per failed refresh cycle instead of navigating to a login page

/// Receives the unrecoverable authentication failure
pub trait SessionListener: Send + Sync {
    /// Stored credentials are already cleared when this runs.
    /// `login_path` names the login surface the user should be sent to.
    fn session_expired(&self, login_path: &str);
}

impl<F> SessionListener for F
where
    F: Fn(&str) + Send + Sync,
{
    fn session_expired(&self, login_path: &str) {
        self(login_path)
    }
}

/// Default listener: logs the expiry and nothing else
pub struct LogSessionListener;

impl SessionListener for LogSessionListener {
    fn session_expired(&self, login_path: &str) {
        tracing::warn!(login_path, "Session expired, sign in again");
    }
}
