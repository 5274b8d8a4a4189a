/// How a decoder treats union branch indexes outside of the declared union.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnionTagPolicy {
    /// For an optional `["null", T]` field, index 1 is the only "present"
    /// indicator and every other index takes the null path. Compatible with
    /// producers of the existing wire data.
    #[default]
    Permissive,
    /// Indexes outside of the declared union fail with a corrupt-stream error.
    Strict,
}

/// Options that control record decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub union_tags: UnionTagPolicy,
}

impl DecodeOptions {
    pub fn new() -> DecodeOptions {
        Default::default()
    }

    pub fn strict() -> DecodeOptions {
        DecodeOptions {
            union_tags: UnionTagPolicy::Strict,
        }
    }

    pub fn with_union_tags(mut self, policy: UnionTagPolicy) -> Self {
        self.union_tags = policy;
        self
    }
}
