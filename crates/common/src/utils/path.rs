/// Whether `segment` can be joined onto a directory without escaping it.
///
/// Used for user handles and collection item names alike.
pub fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}
