//! Parameter resolution.
//!
//! A [`ParameterSource`] is any keyed, read-only store of regulatory
//! reference data. Resolution turns the pieces it holds for one period into
//! a single [`RegulatoryParameters`] snapshot, reporting the first missing
//! piece by name.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollPeriod;

use super::types::{
    FamilyAllowanceBracket, IndicatorSet, RegulatoryParameters, TaxBracket, TaxableCaps,
};

/// Legal multiple of the minimum wage that caps the annual gratification.
pub const GRATIFICATION_CAP_MINIMUM_WAGES: Decimal = Decimal::from_parts(475, 0, 0, false, 2);

/// Read-only, period-keyed regulatory reference data.
///
/// Every lookup returns `None` when the piece is not published for the
/// period; deciding whether that is fatal is left to the resolver.
pub trait ParameterSource {
    /// Economic indicators (UF, UTM, minimum wage).
    fn indicators(&self, period: &PayrollPeriod) -> Option<IndicatorSet>;

    /// Taxable caps in UF.
    fn taxable_caps(&self, period: &PayrollPeriod) -> Option<TaxableCaps>;

    /// Mandatory pension rates keyed by fund name.
    fn pension_rates(&self, period: &PayrollPeriod) -> Option<BTreeMap<String, Decimal>>;

    /// Progressive income-tax table.
    fn tax_brackets(&self, period: &PayrollPeriod) -> Option<Vec<TaxBracket>>;

    /// Family-allowance table.
    fn family_allowance_brackets(&self, period: &PayrollPeriod)
    -> Option<Vec<FamilyAllowanceBracket>>;
}

fn not_found(parameter: &str, period: &PayrollPeriod) -> EngineError {
    EngineError::ParametersNotFound {
        parameter: parameter.to_string(),
        period: period.to_string(),
    }
}

/// Resolves every parameter published for a period.
///
/// Indicators, taxable caps and the tax table are required. Pension rates
/// and the family-allowance table may be absent; the engine raises a
/// configuration error only for employees that need them.
pub fn resolve_period<S>(source: &S, period: PayrollPeriod) -> EngineResult<RegulatoryParameters>
where
    S: ParameterSource + ?Sized,
{
    let indicators = source
        .indicators(&period)
        .ok_or_else(|| not_found("indicators", &period))?;
    let caps = source
        .taxable_caps(&period)
        .ok_or_else(|| not_found("taxable_caps", &period))?;
    let tax_brackets = source
        .tax_brackets(&period)
        .filter(|brackets| !brackets.is_empty())
        .ok_or_else(|| not_found("tax_brackets", &period))?;
    let pension_rates = source.pension_rates(&period).unwrap_or_default();
    let family_allowance_brackets = source.family_allowance_brackets(&period);

    let annual_gratification_cap = indicators
        .annual_gratification_cap
        .unwrap_or(indicators.minimum_wage * GRATIFICATION_CAP_MINIMUM_WAGES);

    tracing::debug!(
        period = %period,
        uf = %indicators.uf,
        utm = %indicators.utm,
        funds = pension_rates.len(),
        "Resolved regulatory parameters"
    );

    Ok(RegulatoryParameters {
        period,
        uf: indicators.uf,
        utm: indicators.utm,
        minimum_wage: indicators.minimum_wage,
        annual_gratification_cap,
        pension_cap_uf: caps.pension_uf,
        unemployment_cap_uf: caps.unemployment_uf,
        unemployment_employee_rate: indicators.unemployment_employee_rate,
        pension_rates,
        tax_brackets,
        family_allowance_brackets,
    })
}

/// Resolves a period and, when a pension fund is named, checks that its
/// rate is published.
pub fn resolve<S>(
    source: &S,
    period: PayrollPeriod,
    pension_fund: Option<&str>,
) -> EngineResult<RegulatoryParameters>
where
    S: ParameterSource + ?Sized,
{
    let params = resolve_period(source, period)?;
    if let Some(fund) = pension_fund {
        params.pension_rate(fund)?;
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawNumber;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[derive(Default)]
    struct StubSource {
        indicators: Option<IndicatorSet>,
        caps: Option<TaxableCaps>,
        rates: Option<BTreeMap<String, Decimal>>,
        brackets: Option<Vec<TaxBracket>>,
        family: Option<Vec<FamilyAllowanceBracket>>,
    }

    impl ParameterSource for StubSource {
        fn indicators(&self, _: &PayrollPeriod) -> Option<IndicatorSet> {
            self.indicators.clone()
        }
        fn taxable_caps(&self, _: &PayrollPeriod) -> Option<TaxableCaps> {
            self.caps
        }
        fn pension_rates(&self, _: &PayrollPeriod) -> Option<BTreeMap<String, Decimal>> {
            self.rates.clone()
        }
        fn tax_brackets(&self, _: &PayrollPeriod) -> Option<Vec<TaxBracket>> {
            self.brackets.clone()
        }
        fn family_allowance_brackets(
            &self,
            _: &PayrollPeriod,
        ) -> Option<Vec<FamilyAllowanceBracket>> {
            self.family.clone()
        }
    }

    fn complete_source() -> StubSource {
        let mut rates = BTreeMap::new();
        rates.insert("Modelo".to_string(), dec("0.1058"));
        StubSource {
            indicators: Some(IndicatorSet {
                uf: dec("38000"),
                utm: dec("67000"),
                minimum_wage: dec("500000"),
                annual_gratification_cap: None,
                unemployment_employee_rate: dec("0.006"),
            }),
            caps: Some(TaxableCaps {
                pension_uf: dec("87.8"),
                unemployment_uf: dec("131.8"),
            }),
            rates: Some(rates),
            brackets: Some(vec![TaxBracket {
                from: RawNumber::Int(0),
                to: None,
                factor: RawNumber::Int(0),
                rebate: RawNumber::Int(0),
            }]),
            family: None,
        }
    }

    fn period() -> PayrollPeriod {
        PayrollPeriod::new(2025, 1).unwrap()
    }

    #[test]
    fn test_resolve_complete_period() {
        let params = resolve_period(&complete_source(), period()).unwrap();
        assert_eq!(params.uf, dec("38000"));
        assert_eq!(params.pension_cap_uf, dec("87.8"));
        assert_eq!(params.family_allowance_brackets, None);
    }

    #[test]
    fn test_gratification_cap_defaults_to_4_75_minimum_wages() {
        let params = resolve_period(&complete_source(), period()).unwrap();
        assert_eq!(params.annual_gratification_cap, dec("2375000"));
    }

    #[test]
    fn test_explicit_gratification_cap_wins() {
        let mut source = complete_source();
        if let Some(indicators) = source.indicators.as_mut() {
            indicators.annual_gratification_cap = Some(dec("2400000"));
        }
        let params = resolve_period(&source, period()).unwrap();
        assert_eq!(params.annual_gratification_cap, dec("2400000"));
    }

    #[test]
    fn test_missing_indicators_names_the_piece() {
        let mut source = complete_source();
        source.indicators = None;
        let err = resolve_period(&source, period()).unwrap_err();
        assert_eq!(
            err,
            EngineError::ParametersNotFound {
                parameter: "indicators".to_string(),
                period: "2025-01".to_string(),
            }
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_missing_caps_and_brackets_are_reported() {
        let mut source = complete_source();
        source.caps = None;
        let err = resolve_period(&source, period()).unwrap_err();
        assert!(err.to_string().contains("taxable_caps"));

        let mut source = complete_source();
        source.brackets = Some(vec![]);
        let err = resolve_period(&source, period()).unwrap_err();
        assert!(err.to_string().contains("tax_brackets"));
    }

    #[test]
    fn test_missing_pension_rates_are_not_fatal_for_the_period() {
        let mut source = complete_source();
        source.rates = None;
        let params = resolve_period(&source, period()).unwrap();
        assert!(params.pension_rates.is_empty());
    }

    #[test]
    fn test_resolve_with_unknown_provider_fails() {
        let err = resolve(&complete_source(), period(), Some("Cuprum")).unwrap_err();
        assert_eq!(
            err,
            EngineError::ParametersNotFound {
                parameter: "pension_rate:Cuprum".to_string(),
                period: "2025-01".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_with_known_provider_ignores_case() {
        let params = resolve(&complete_source(), period(), Some("modelo")).unwrap();
        assert_eq!(params.pension_rate(" MODELO ").unwrap(), dec("0.1058"));
    }
}
