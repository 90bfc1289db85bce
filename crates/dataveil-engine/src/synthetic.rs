use dataveil_core::{CoreResult, MaskCategory, SyntheticProvider};
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::chrono::en::Date;
use fake::faker::creditcard::en::CreditCardNumber;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;

/// Default `SyntheticProvider` backed by the `fake` crate.
///
/// Freshly randomized on every call; output bears no relation to the value
/// it replaces.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeProvider;

impl FakeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl SyntheticProvider for FakeProvider {
    fn generate(&self, category: MaskCategory) -> CoreResult<String> {
        let value = match category {
            MaskCategory::Phone => PhoneNumber().fake(),
            MaskCategory::Email => SafeEmail().fake(),
            MaskCategory::Address => format!(
                "{} {}, {}, {} {}",
                BuildingNumber().fake::<String>(),
                StreetName().fake::<String>(),
                CityName().fake::<String>(),
                StateAbbr().fake::<String>(),
                ZipCode().fake::<String>(),
            ),
            MaskCategory::CreditCard => CreditCardNumber().fake(),
            MaskCategory::Date => Date().fake(),
            MaskCategory::Generic => Sentence(3..8).fake(),
        };
        Ok(value)
    }
}

/// Provider that returns a fixed string for every category. Used in tests
/// where masked output must be predictable.
#[derive(Debug, Clone)]
pub struct FixedProvider {
    value: String,
}

impl FixedProvider {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl SyntheticProvider for FixedProvider {
    fn generate(&self, _category: MaskCategory) -> CoreResult<String> {
        Ok(self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_provider_covers_every_category() {
        let provider = FakeProvider::new();
        for category in [
            MaskCategory::Phone,
            MaskCategory::Email,
            MaskCategory::Address,
            MaskCategory::CreditCard,
            MaskCategory::Date,
            MaskCategory::Generic,
        ] {
            let value = provider.generate(category).unwrap();
            assert!(!value.is_empty(), "empty output for {}", category);
        }
    }

    #[test]
    fn test_fake_email_looks_like_email() {
        let value = FakeProvider::new().generate(MaskCategory::Email).unwrap();
        assert!(value.contains('@'));
    }

    #[test]
    fn test_fixed_provider() {
        let provider = FixedProvider::new("stub");
        assert_eq!(provider.generate(MaskCategory::Date).unwrap(), "stub");
    }
}
