//! Promotion Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    promotions::{Percent, PromoCodeTable},
};

/// Wrapper for promo codes in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Map of code -> discount percentage points
    pub codes: FxHashMap<String, u8>,
}

impl TryFrom<PromotionsFixture> for PromoCodeTable {
    type Error = FixtureError;

    fn try_from(fixture: PromotionsFixture) -> Result<Self, Self::Error> {
        let mut table = PromoCodeTable::new();

        for (code, percent) in fixture.codes {
            table.insert(&code, Percent::new(percent)?);
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn fixture_converts_into_table() -> TestResult {
        let fixture: PromotionsFixture =
            serde_norway::from_str("codes:\n  SAMURAI10: 10\n  KATANA2023: 15\n")?;

        let table = PromoCodeTable::try_from(fixture)?;

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.lookup("katana2023").map(|promo| promo.percent.value()),
            Some(15)
        );

        Ok(())
    }

    #[test]
    fn fixture_rejects_out_of_range_percent() -> TestResult {
        let fixture: PromotionsFixture = serde_norway::from_str("codes:\n  TOOBIG: 150\n")?;

        let result = PromoCodeTable::try_from(fixture);

        assert!(matches!(result, Err(FixtureError::Promotion(_))));

        Ok(())
    }
}
