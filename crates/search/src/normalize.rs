use scout_core::Context;

/// Trim a prefix to a whole number of hex bytes before it reaches a
/// UUID-keyed collection. Hyphens do not count toward the length; an odd count
/// drops the final character. Job IDs are free-form and pass through.
///
/// The result may match more records than `prefix` does, so callers must
/// re-check the original prefix on every candidate.
pub fn normalize<'p>(prefix: &'p str, context: &Context) -> &'p str {
    if *context == Context::Jobs {
        return prefix;
    }
    let digits = prefix.chars().filter(|c| *c != '-').count();
    if digits % 2 == 0 {
        return prefix;
    }
    match prefix.char_indices().next_back() {
        Some((at, _)) => &prefix[..at],
        None => prefix,
    }
}
