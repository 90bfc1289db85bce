use crate::error::CoreResult;
use crate::types::MaskCategory;

// ---------------------------------------------------------------------------
// SyntheticProvider — external capability producing plausible fake data
//
// The engine calls it by category name only. The generation algorithm
// (locale tables, random composition) is the provider's business; from the
// engine's perspective the call is side-effect-free. Output bears no
// relation to the original value.
// ---------------------------------------------------------------------------

pub trait SyntheticProvider: Send + Sync {
    fn generate(&self, category: MaskCategory) -> CoreResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify the trait object is object-safe
    fn _assert_provider_object_safe(_: &dyn SyntheticProvider) {}

    struct Upper;

    impl SyntheticProvider for Upper {
        fn generate(&self, category: MaskCategory) -> CoreResult<String> {
            Ok(category.as_str().to_uppercase())
        }
    }

    #[test]
    fn test_provider_impl() {
        let p = Upper;
        assert_eq!(p.generate(MaskCategory::Phone).unwrap(), "PHONE");
    }
}
