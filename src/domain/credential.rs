/// A bearer token obtained from the text-processing provider, valid until
/// `expires_at` (unix epoch seconds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: u64,
}

impl Credential {
    pub fn new(access_token: impl Into<String>, expires_at: u64) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// Whether the token is still usable at `now`, keeping `margin_secs` of
    /// headroom so a call issued right now does not expire mid-flight.
    pub fn is_fresh(&self, now: u64, margin_secs: u64) -> bool {
        now < self.expires_at.saturating_sub(margin_secs)
    }
}
