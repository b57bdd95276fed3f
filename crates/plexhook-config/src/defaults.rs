//! Fallback values applied when the invoker leaves optional settings unset.

/// Identity endpoint used to exchange Plex credentials for a token.
pub const DEFAULT_SIGNIN_URL: &str = "https://plex.tv/users/sign_in.xml";
/// JSON-RPC port exposed by companion playback clients.
pub const DEFAULT_CLIENT_PORT: u16 = 3005;
/// Per-request timeout applied to every outbound call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
