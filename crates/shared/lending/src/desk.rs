use efm_core::Agent;
use log::debug;

use crate::terms::LendingTerms;

/// How a move or startup got paid for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Funding {
    /// Savings covered the whole cost
    Savings,
    /// A loan of `principal` covered what savings could not
    Loan { principal: f64 },
    /// Could not be paid for
    Refused,
}

impl Funding {
    pub fn is_funded(&self) -> bool {
        !matches!(self, Funding::Refused)
    }
}

/// Applies a run's lending terms to individual agents
#[derive(Debug, Clone, Copy, Default)]
pub struct LoanDesk {
    terms: LendingTerms,
}

impl LoanDesk {
    pub fn new(terms: LendingTerms) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &LendingTerms {
        &self.terms
    }

    /// Whether a candidate firm must pass the repayment screen
    ///
    /// Only applies when debt awareness is on and reaching the firm would
    /// take a loan, i.e. the cost exceeds the agent's savings. Independent of
    /// whether loans can actually be originated.
    pub fn must_screen(&self, agent: &Agent, cost: f64) -> bool {
        self.terms.debt_awareness && cost > agent.savings
    }

    /// Repayment screen for a loan of `principal` backed by `expected_wage`
    pub fn can_repay(&self, agent: &Agent, expected_wage: f64, principal: f64) -> bool {
        can_repay_loan(
            agent,
            expected_wage,
            principal,
            self.terms.rate,
            self.terms.lookahead,
            self.terms.risk_pct,
        )
    }

    /// Pay `cost` for `agent`, borrowing the shortfall if allowed
    ///
    /// Savings are spent first. A loan is only originated when lending is
    /// enabled, the agent has no loan outstanding and the shortfall is within
    /// the cap; borrowing empties savings. A refused payment leaves the agent
    /// untouched.
    pub fn finance(&self, agent: &mut Agent, cost: f64) -> Funding {
        if agent.savings >= cost {
            agent.savings -= cost;
            return Funding::Savings;
        }

        let shortfall = cost - agent.savings;
        if !self.terms.enabled || agent.has_loan() || !self.terms.within_cap(shortfall) {
            return Funding::Refused;
        }

        debug!(
            "Agent {} borrows {:.6} (cost {:.6}, savings {:.6})",
            agent.id, shortfall, cost, agent.savings
        );
        agent.loan = shortfall;
        agent.savings = 0.0;
        Funding::Loan {
            principal: shortfall,
        }
    }

    /// Service every outstanding loan once, if lending is enabled
    pub fn service(&self, agents: &mut [Agent]) {
        if self.terms.enabled {
            pay_loans(agents, self.terms.rate);
        }
    }
}

/// Project whether `principal_needed` can be repaid within `lookahead` ticks
///
/// No loan is needed when savings cover the principal. Otherwise the loan
/// compounds each tick and is paid down by the agent's saved share of a
/// conservative wage, `expected_wage` reduced by `risk_pct` percent.
pub fn can_repay_loan(
    agent: &Agent,
    expected_wage: f64,
    principal_needed: f64,
    lending_rate: f64,
    lookahead: u32,
    risk_pct: f64,
) -> bool {
    if principal_needed <= agent.savings {
        return true;
    }

    let conservative_wage = expected_wage * (1.0 - risk_pct / 100.0);
    let repayment = agent.savings_rate * conservative_wage;
    let mut principal = principal_needed;
    for _ in 0..lookahead {
        principal *= 1.0 + lending_rate;
        principal -= repayment;
        if principal <= 0.0 {
            return true;
        }
    }
    false
}

/// Compound one tick of interest and sweep savings into the loan
///
/// Any excess savings stay with the agent; a loan of zero is left alone.
pub fn service_loan(agent: &mut Agent, lending_rate: f64) {
    if !agent.has_loan() {
        return;
    }

    let remaining = agent.loan * (1.0 + lending_rate) - agent.savings;
    if remaining < 0.0 {
        agent.savings = -remaining;
        agent.loan = 0.0;
    } else {
        agent.savings = 0.0;
        agent.loan = remaining;
    }
}

/// Service every agent's loan
pub fn pay_loans(agents: &mut [Agent], lending_rate: f64) {
    for agent in agents.iter_mut() {
        service_loan(agent, lending_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use efm_core::ProductionParams;

    fn agent(savings: f64, loan: f64, savings_rate: f64) -> Agent {
        let mut agent = Agent::new(
            0,
            ProductionParams::new(0.2, 1.0, 1.2),
            0.5,
            savings_rate,
            (0.5, 0.5),
        );
        agent.savings = savings;
        agent.loan = loan;
        agent
    }

    #[test]
    fn test_no_loan_needed_always_repayable() {
        let a = agent(10.0, 0.0, 0.0);
        assert!(can_repay_loan(&a, 0.0, 5.0, 10.0, 0, 100.0));
    }

    #[test]
    fn test_zero_lookahead_refuses_any_loan() {
        let a = agent(0.0, 0.0, 0.5);
        assert!(!can_repay_loan(&a, 10.0, 0.01, 0.0, 0, 0.0));
    }

    #[test]
    fn test_repayment_horizon() {
        // Saves 0.1 per tick against a principal of 0.25
        let a = agent(0.0, 0.0, 0.1);
        assert!(can_repay_loan(&a, 1.0, 0.25, 0.0, 3, 0.0));
        assert!(!can_repay_loan(&a, 1.0, 0.25, 0.0, 2, 0.0));
    }

    #[test]
    fn test_interest_extends_horizon() {
        let a = agent(0.0, 0.0, 0.1);
        // 0.3 * 1.1 - 0.1 = 0.23, * 1.1 - 0.1 = 0.153, * 1.1 - 0.1 = 0.0683
        assert!(!can_repay_loan(&a, 1.0, 0.3, 0.1, 3, 0.0));
        assert!(can_repay_loan(&a, 1.0, 0.3, 0.1, 4, 0.0));
    }

    #[test]
    fn test_full_risk_haircut_refuses() {
        let a = agent(0.0, 0.0, 0.5);
        assert!(!can_repay_loan(&a, 10.0, 0.1, 0.0, 100, 100.0));
    }

    #[test]
    fn test_service_pays_off_loan() {
        let mut a = agent(2.0, 1.0, 0.1);
        service_loan(&mut a, 0.1);
        assert_relative_eq!(a.savings, 0.9, epsilon = 1e-12);
        assert_relative_eq!(a.loan, 0.0);
    }

    #[test]
    fn test_service_partial_payment() {
        let mut a = agent(0.5, 1.0, 0.1);
        service_loan(&mut a, 0.1);
        assert_relative_eq!(a.loan, 0.6, epsilon = 1e-12);
        assert_relative_eq!(a.savings, 0.0);
    }

    #[test]
    fn test_pay_loans_skips_debt_free_agents() {
        let mut agents = vec![agent(3.0, 0.0, 0.1), agent(0.2, 1.0, 0.1)];
        pay_loans(&mut agents, 0.5);
        assert_relative_eq!(agents[0].savings, 3.0);
        assert_relative_eq!(agents[0].loan, 0.0);
        assert_relative_eq!(agents[1].loan, 1.3, epsilon = 1e-12);
        assert!(agents.iter().all(|a| a.savings >= 0.0 && a.loan >= 0.0));
    }

    #[test]
    fn test_finance_from_savings() {
        let desk = LoanDesk::new(LendingTerms::default());
        let mut a = agent(1.0, 0.0, 0.1);
        assert_eq!(desk.finance(&mut a, 0.4), Funding::Savings);
        assert_relative_eq!(a.savings, 0.6);
        assert!(!a.has_loan());
    }

    #[test]
    fn test_finance_borrows_shortfall() {
        let desk = LoanDesk::new(LendingTerms::default());
        let mut a = agent(0.25, 0.0, 0.1);
        let funding = desk.finance(&mut a, 1.0);
        assert_eq!(funding, Funding::Loan { principal: 0.75 });
        assert_relative_eq!(a.loan, 0.75);
        assert_relative_eq!(a.savings, 0.0);
    }

    #[test]
    fn test_finance_refusals() {
        let mut a = agent(0.0, 0.5, 0.1);
        let desk = LoanDesk::new(LendingTerms::default());
        assert_eq!(desk.finance(&mut a, 1.0), Funding::Refused);
        assert_relative_eq!(a.loan, 0.5);

        let mut a = agent(0.0, 0.0, 0.1);
        let desk = LoanDesk::new(LendingTerms::disabled());
        assert_eq!(desk.finance(&mut a, 1.0), Funding::Refused);
        assert!(!a.has_loan());

        let desk = LoanDesk::new(LendingTerms {
            loan_cap: 0.5,
            ..LendingTerms::default()
        });
        assert_eq!(desk.finance(&mut a, 1.0), Funding::Refused);
        assert!(desk.finance(&mut a, 0.5).is_funded());
    }

    #[test]
    fn test_must_screen_only_when_borrowing() {
        let desk = LoanDesk::new(LendingTerms::default());
        let a = agent(1.0, 0.0, 0.1);
        assert!(!desk.must_screen(&a, 0.5));
        assert!(desk.must_screen(&a, 1.5));

        let unaware = LoanDesk::new(LendingTerms {
            debt_awareness: false,
            ..LendingTerms::default()
        });
        assert!(!unaware.must_screen(&a, 1.5));

        // Awareness screens even when no loan could be originated
        let no_credit = LoanDesk::new(LendingTerms {
            enabled: false,
            ..LendingTerms::default()
        });
        assert!(no_credit.must_screen(&a, 1.5));
        assert!(!no_credit.must_screen(&a, 0.5));
    }

    #[test]
    fn test_service_disabled_is_noop() {
        let desk = LoanDesk::new(LendingTerms::disabled());
        let mut agents = vec![agent(0.2, 1.0, 0.1)];
        desk.service(&mut agents);
        assert_relative_eq!(agents[0].loan, 1.0);
    }
}
