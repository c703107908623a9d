//! History window selection.

/// The trailing slice of `transcript` replayed into the next model call.
///
/// Returns the last `min(len, 2 * rounds)` items. No pairing or
/// summarization is attempted, so an odd-length transcript yields a window
/// that starts with an assistant message.
pub fn history_window<T>(transcript: &[T], rounds: u32) -> &[T] {
    let keep = (rounds as usize).saturating_mul(2).min(transcript.len());
    &transcript[transcript.len() - keep..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_bounded_suffix() {
        let transcript: Vec<u32> = (0..25).collect();
        for rounds in 0..20 {
            let window = history_window(&transcript, rounds);
            let expected = (2 * rounds as usize).min(transcript.len());
            assert_eq!(window.len(), expected);
            assert!(transcript.ends_with(window));
        }
    }

    #[test]
    fn test_zero_rounds_is_empty() {
        let transcript = ["a", "b"];
        assert!(history_window(&transcript, 0).is_empty());
    }

    #[test]
    fn test_short_transcript_returned_whole() {
        let transcript = ["u1", "a1", "u2"];
        assert_eq!(history_window(&transcript, 10), &transcript[..]);
    }

    #[test]
    fn test_odd_window_may_start_with_assistant() {
        // u0 a0 u1 a1 u2 a2 u3 : 7 items, window of 4 starts at a1
        let transcript = ["u0", "a0", "u1", "a1", "u2", "a2", "u3"];
        assert_eq!(history_window(&transcript, 2), &["a1", "u2", "a2", "u3"]);
    }

    #[test]
    fn test_empty_transcript() {
        let transcript: [u8; 0] = [];
        assert!(history_window(&transcript, 5).is_empty());
    }

    #[test]
    fn test_huge_round_count_does_not_overflow() {
        let transcript = [1, 2, 3];
        assert_eq!(history_window(&transcript, u32::MAX).len(), 3);
    }
}
