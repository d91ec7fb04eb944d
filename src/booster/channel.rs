/// Per-channel boost state, owned by the transport that owns the stream.
///
/// The flag starts false when the channel is created and is set at most
/// once, by the connection classifier, before the first read on the
/// channel. There is no way to clear it: a channel that ran through the
/// booster keeps decoding both formats until it is dropped.
#[derive(Debug, Default)]
pub struct ChannelState {
    boosted: bool,
}

impl ChannelState {
    pub fn new() -> Self {
        ChannelState { boosted: false }
    }

    pub fn is_boosted(&self) -> bool {
        self.boosted
    }

    /// Monotonic: only ever flips false -> true.
    pub fn mark_boosted(&mut self) {
        self.boosted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::ChannelState;

    #[test]
    fn fresh_channel_is_not_boosted() {
        assert!(!ChannelState::new().is_boosted());
        assert!(!ChannelState::default().is_boosted());
    }

    #[test]
    fn mark_boosted_sticks() {
        let mut state = ChannelState::new();
        state.mark_boosted();
        assert!(state.is_boosted());
        // marking again is a no-op, never a reset
        state.mark_boosted();
        assert!(state.is_boosted());
    }
}
