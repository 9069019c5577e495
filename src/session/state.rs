use std::fmt;

/// Where the bridge is in establishing the server session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BridgeState {
    Anonymous,
    /// Credentials submitted to the identity provider.
    Authenticating,
    /// Session exchange in flight. At most one per bridge.
    Bridging,
    Established,
    /// Terminal for the attempt; immediately followed by `Anonymous`.
    Failed,
}

impl BridgeState {
    /// An exchange may start from here without duplicating one already running or done.
    pub fn accepts_exchange(self) -> bool {
        !matches!(self, BridgeState::Bridging | BridgeState::Established)
    }

    pub fn is_busy(self) -> bool {
        matches!(self, BridgeState::Authenticating | BridgeState::Bridging)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BridgeState::Anonymous => "anonymous",
            BridgeState::Authenticating => "authenticating",
            BridgeState::Bridging => "bridging",
            BridgeState::Established => "established",
            BridgeState::Failed => "failed",
        }
    }
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a bridge operation ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeOutcome {
    /// This call ran the exchange and the server accepted it.
    Established { navigated: bool },
    /// Another trigger owns, or already finished, the exchange; nothing was sent.
    Deduplicated,
    /// The exchange went through but a sign-out took over before it finished; its result
    /// was discarded.
    Superseded,
    /// Nothing to do for this notification.
    Idle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_idle_states_accept_an_exchange() {
        assert!(BridgeState::Anonymous.accepts_exchange());
        assert!(BridgeState::Authenticating.accepts_exchange());
        assert!(BridgeState::Failed.accepts_exchange());
        assert!(!BridgeState::Bridging.accepts_exchange());
        assert!(!BridgeState::Established.accepts_exchange());
    }

    #[test]
    fn busy_states() {
        assert!(BridgeState::Authenticating.is_busy());
        assert!(BridgeState::Bridging.is_busy());
        assert!(!BridgeState::Established.is_busy());
        assert_eq!(BridgeState::Bridging.to_string(), "bridging");
    }
}
