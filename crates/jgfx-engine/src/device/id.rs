/// Identifier of a render target, unique within one device context.
///
/// `NONE` (0) never refers to a real target; issued ids start at 1 and
/// are not reused for the lifetime of the device context.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TargetId(pub(crate) u64);

impl TargetId {
    pub const NONE: TargetId = TargetId(0);
}

/// Identifier of a mutable graphics resource state.
///
/// A texture gets a fresh `ResourceId` every time its pixel contents
/// change, so a render target can compare ids instead of contents to
/// decide whether a rebind is needed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(pub(crate) u64);

impl ResourceId {
    pub const NONE: ResourceId = ResourceId(0);
}
