//! Shared bounds and normalisation for user-supplied arguments.

/// Longest part number or group pattern accepted from a user.
pub const MAX_ARGUMENT_LENGTH: usize = 20;
/// Images probed per group.
pub const MAX_MEDIA_PER_GROUP: usize = 3;
/// Characters in a VIN.
pub const VIN_LENGTH: usize = 17;
/// Every VIN in the registry carries this manufacturer marker.
pub const VIN_MARKER: &str = "JA";

/// Trim, upper-case and cut an argument to `MAX_ARGUMENT_LENGTH` characters.
pub fn normalize_argument(raw: &str) -> String {
    raw.trim()
        .to_uppercase()
        .chars()
        .take(MAX_ARGUMENT_LENGTH)
        .collect()
}

/// Trim and cut a free-text pattern without changing its case.
pub fn normalize_pattern(raw: &str) -> String {
    raw.trim().chars().take(MAX_ARGUMENT_LENGTH).collect()
}

pub fn normalize_vin(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Cheap shape check run before touching the registry.
pub fn is_plausible_vin(vin: &str) -> bool {
    vin.chars().count() == VIN_LENGTH && vin.contains(VIN_MARKER)
}

/// A group code that can be used as a file name component.
pub fn is_path_safe_code(code: &str) -> bool {
    !code.is_empty() && !code.contains(['/', '\\']) && !code.contains("..")
}

/// First characters of user text, for log lines.
pub fn log_preview(text: &str) -> String {
    text.chars().take(MAX_ARGUMENT_LENGTH).collect()
}
