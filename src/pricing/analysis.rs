//! Expected move analysis
//!
//! Runs one ticker end to end: rate, spot and nearest chain from the market
//! data source, near-the-money contract selection, implied volatility for the
//! call and the put, then the expected move band.

use chrono::{NaiveDate, NaiveDateTime};

use super::expected_move::{compute_range, ExpectedMoveRange};
use crate::core::{ContractQuote, MoveResult, OptionQuote, OptionType, SpotQuote};
use crate::data::MarketData;
use crate::models::{ImpliedVolSolver, VolatilityEstimate};

/// Everything computed for one ticker
#[derive(Debug)]
pub struct MoveAnalysis {
    pub spot: SpotQuote,
    pub risk_free_rate: f64,
    pub expiration: NaiveDate,
    /// Years to expiration as measured, before sign normalization
    pub time_to_expiration: f64,
    pub call: ContractQuote,
    pub put: ContractQuote,
    pub call_vol: VolatilityEstimate,
    pub put_vol: VolatilityEstimate,
    /// Fails when either side did not converge
    pub range: MoveResult<ExpectedMoveRange>,
}

/// Analyze `symbol` as of `now`
///
/// Market data failures and solver faults (invalid input, division hazard)
/// are returned as errors. A side that does not converge is kept in the
/// analysis and surfaces through `range`.
pub fn analyze<M: MarketData>(
    market: &M,
    symbol: &str,
    solver: &ImpliedVolSolver,
    now: NaiveDateTime,
) -> MoveResult<MoveAnalysis> {
    let risk_free_rate = market.risk_free_rate()?;
    let spot = market.spot(symbol)?;
    let chain = market.nearest_expiration_chain(symbol)?;

    let call = *chain.nearest_itm_call()?;
    let put = *chain.nearest_itm_put()?;
    let time_to_expiration = chain.time_to_expiration(now);

    tracing::info!(
        symbol,
        spot = spot.price,
        rate = risk_free_rate,
        expiration = %chain.expiration,
        call_strike = call.strike,
        put_strike = put.strike,
        "selected near-the-money contracts"
    );

    let quote = |contract: &ContractQuote, option_type| {
        OptionQuote::new(
            spot.price,
            contract.strike,
            time_to_expiration,
            contract.last_price,
            option_type,
        )
    };

    let call_vol = solver.solve(&quote(&call, OptionType::Call), risk_free_rate)?;
    let put_vol = solver.solve(&quote(&put, OptionType::Put), risk_free_rate)?;

    for (side, estimate) in [("call", &call_vol), ("put", &put_vol)] {
        if !estimate.is_converged() {
            tracing::warn!(symbol, side, ?estimate, "implied volatility did not converge");
        }
    }

    let range = compute_range(spot.price, &call_vol, &put_vol, time_to_expiration);

    Ok(MoveAnalysis {
        spot,
        risk_free_rate,
        expiration: chain.expiration,
        time_to_expiration,
        call,
        put,
        call_vol,
        put_vol,
        range,
    })
}

impl MoveAnalysis {
    /// The four report lines: call vol, put vol, price, expected move
    pub fn report_lines(&self) -> Vec<String> {
        let range_line = match &self.range {
            Ok(range) => format!(
                "Expected move high of {:.2} to: {:.2}. Expected move low of {:.2} to: {:.2}",
                range.upside(),
                range.high,
                range.downside(),
                range.low
            ),
            Err(e) => format!("Expected move unavailable: {e}"),
        };

        vec![
            vol_line(OptionType::Call, &self.call_vol),
            vol_line(OptionType::Put, &self.put_vol),
            format!("{} price: {:.2}", self.spot.display_name.to_uppercase(), self.spot.price),
            range_line,
        ]
    }
}

fn vol_line(option_type: OptionType, estimate: &VolatilityEstimate) -> String {
    let outcome = match estimate {
        VolatilityEstimate::Converged { vol, .. } => format!("{:.2}%", vol * 100.0),
        VolatilityEstimate::NotConverged { iterations, .. } => {
            format!("did not converge after {iterations} iterations")
        }
        VolatilityEstimate::Diverged { iteration } => {
            format!("did not converge (diverged at iteration {iteration})")
        }
        VolatilityEstimate::NonPositive { vol, .. } => {
            format!("did not converge (matched at non-positive vol {vol:.4})")
        }
    };
    format!("Implied volatility of {option_type}: {outcome}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExpirationChain, MoveError};
    use crate::models::black_scholes::price;
    use approx::assert_abs_diff_eq;

    struct FixtureMarket {
        rate: f64,
        spot: SpotQuote,
        chain: ExpirationChain,
    }

    impl MarketData for FixtureMarket {
        fn spot(&self, _symbol: &str) -> MoveResult<SpotQuote> {
            Ok(self.spot.clone())
        }

        fn risk_free_rate(&self) -> MoveResult<f64> {
            Ok(self.rate)
        }

        fn nearest_expiration_chain(&self, _symbol: &str) -> MoveResult<ExpirationChain> {
            Ok(self.chain.clone())
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    /// Chain 35 days out whose ITM boundary contracts are priced at the given vols
    fn market(call_vol: f64, put_vol: f64) -> FixtureMarket {
        let rate = 0.04;
        let spot = 101.3;
        let expiration = NaiveDate::from_ymd_opt(2026, 11, 24).unwrap();
        let t = 35.0 / 365.0;

        let call_price = price(spot, 100.0, rate, call_vol, t, OptionType::Call);
        let put_price = price(spot, 105.0, rate, put_vol, t, OptionType::Put);

        let mut chain = ExpirationChain::new("ACME", expiration);
        chain.add_call(ContractQuote::new(95.0, 7.5, true));
        chain.add_call(ContractQuote::new(100.0, call_price, true));
        chain.add_call(ContractQuote::new(105.0, 1.1, false));
        chain.add_put(ContractQuote::new(100.0, 1.4, false));
        chain.add_put(ContractQuote::new(105.0, put_price, true));
        chain.add_put(ContractQuote::new(110.0, 9.0, true));

        FixtureMarket {
            rate,
            spot: SpotQuote {
                symbol: "ACME".to_string(),
                display_name: "Acme Corp".to_string(),
                price: spot,
            },
            chain,
        }
    }

    #[test]
    fn test_end_to_end() {
        let market = market(0.22, 0.27);
        let analysis = analyze(&market, "ACME", &ImpliedVolSolver::default(), now()).unwrap();

        assert_eq!(analysis.call.strike, 100.0);
        assert_eq!(analysis.put.strike, 105.0);
        assert_abs_diff_eq!(analysis.time_to_expiration, 35.0 / 365.0, epsilon = 1e-15);
        assert_abs_diff_eq!(analysis.call_vol.value().unwrap(), 0.22, epsilon = 1e-4);
        assert_abs_diff_eq!(analysis.put_vol.value().unwrap(), 0.27, epsilon = 1e-4);

        let range = analysis.range.as_ref().unwrap();
        let sqrt_t = (35.0_f64 / 365.0).sqrt();
        assert_abs_diff_eq!(range.high, 101.3 * (0.22 * sqrt_t).exp(), epsilon = 1e-3);
        assert_abs_diff_eq!(range.low, 101.3 / (0.27 * sqrt_t).exp(), epsilon = 1e-3);
    }

    #[test]
    fn test_report_lines() {
        let market = market(0.22, 0.27);
        let analysis = analyze(&market, "ACME", &ImpliedVolSolver::default(), now()).unwrap();
        let lines = analysis.report_lines();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Implied volatility of call: 22.00%");
        assert_eq!(lines[1], "Implied volatility of put: 27.00%");
        assert_eq!(lines[2], "ACME CORP price: 101.30");
        assert!(lines[3].starts_with("Expected move high of "));
        assert!(lines[3].contains(". Expected move low of "));
    }

    #[test]
    fn test_non_converged_side_is_reported() {
        let mut market = market(0.22, 0.27);
        // Put quoted at half its intrinsic value
        market.chain.puts = vec![ContractQuote::new(130.0, 14.35, true)];

        let analysis = analyze(&market, "ACME", &ImpliedVolSolver::default(), now()).unwrap();
        assert!(analysis.call_vol.is_converged());
        assert!(!analysis.put_vol.is_converged());
        assert!(analysis.range.as_ref().unwrap_err().is_non_convergence());

        let lines = analysis.report_lines();
        assert_eq!(lines[0], "Implied volatility of call: 22.00%");
        assert!(lines[1].starts_with("Implied volatility of put: did not converge"));
        assert!(lines[3].starts_with("Expected move unavailable: "));
        assert!(lines.iter().all(|line| !line.contains("None")));
    }

    #[test]
    fn test_non_positive_vol_is_not_printed_as_percentage() {
        let estimate = VolatilityEstimate::NonPositive { vol: -0.011, iteration: 13 };
        let line = vol_line(OptionType::Call, &estimate);

        assert!(line.starts_with("Implied volatility of call: did not converge"));
        assert!(!line.contains('%'));
    }

    #[test]
    fn test_missing_itm_contract() {
        let mut market = market(0.22, 0.27);
        market.chain.calls.retain(|c| !c.in_the_money);

        let err = analyze(&market, "ACME", &ImpliedVolSolver::default(), now()).unwrap_err();
        assert!(matches!(err, MoveError::DataUnavailable(_)));
    }

    #[test]
    fn test_expiring_today_solves_and_ranges_on_magnitude() {
        let market = market(0.22, 0.27);
        let expiry_day = NaiveDate::from_ymd_opt(2026, 11, 24)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap();
        let solver = ImpliedVolSolver::default();

        let analysis = analyze(&market, "ACME", &solver, expiry_day).unwrap();
        assert_abs_diff_eq!(analysis.time_to_expiration, -1.0 / 365.0, epsilon = 1e-15);

        // Same estimates as solving with +1/365 directly
        let t = 1.0 / 365.0;
        let call = OptionQuote::new(101.3, 100.0, t, analysis.call.last_price, OptionType::Call);
        let put = OptionQuote::new(101.3, 105.0, t, analysis.put.last_price, OptionType::Put);
        assert_eq!(analysis.call_vol, solver.solve(&call, 0.04).unwrap());
        assert_eq!(analysis.put_vol, solver.solve(&put, 0.04).unwrap());

        let expected = compute_range(101.3, &analysis.call_vol, &analysis.put_vol, t);
        assert_eq!(analysis.range.as_ref().ok(), expected.as_ref().ok());
        assert!(analysis.range.is_ok());
    }
}
