/// Undeterminable hard filters at which strict mode blocks a pass
pub const STRICT_UNDETERMINABLE_LIMIT: usize = 3;

/// Whether strict mode forces the verdict to fail. It can only veto a pass,
/// never grant one.
pub fn strict_override(strict: bool, undeterminable: usize) -> bool {
    strict && undeterminable >= STRICT_UNDETERMINABLE_LIMIT
}
