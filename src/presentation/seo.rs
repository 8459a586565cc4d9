//! Per-state page metadata (title, description, keywords)

use crate::rates::StateRate;
use serde::Serialize;

/// Year quoted in page copy
pub const COPY_YEAR: u32 = 2025;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
}

impl PageMeta {
    /// Copy for a selected state; `None` reads as "the US"
    pub fn for_state(state: Option<&StateRate>) -> Self {
        let name = state.map(|s| s.name.as_str()).unwrap_or("the US");

        Self {
            title: format!("Is Solar Worth It in {name}? {COPY_YEAR} Calculator & Costs"),
            description: format!(
                "Calculate true solar savings in {name} with {COPY_YEAR} rates. \
                 See installation costs, payback period, and 30% federal tax credit \
                 eligibility for {name} homeowners."
            ),
            keywords: format!(
                "solar calculator {name}, solar panel cost {name}, \
                 {name} solar incentives {COPY_YEAR}, \
                 is solar worth it in {name}, solar roi calculator"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_meta() {
        let texas = StateRate::new("Texas", "TX", 0.16, 5.6);
        let meta = PageMeta::for_state(Some(&texas));
        assert_eq!(meta.title, "Is Solar Worth It in Texas? 2025 Calculator & Costs");
        assert!(meta
            .description
            .starts_with("Calculate true solar savings in Texas with 2025 rates."));
        assert!(meta.keywords.contains("Texas solar incentives 2025"));
    }

    #[test]
    fn test_unknown_state_reads_as_us() {
        let meta = PageMeta::for_state(None);
        assert_eq!(meta.title, "Is Solar Worth It in the US? 2025 Calculator & Costs");
    }
}
