//! EFM Lending
//!
//! Everything an agent's loan goes through:
//! - **Screening**: `can_repay_loan` projects whether a loan taken to reach a
//!   firm would be paid off within a lookahead horizon
//! - **Origination**: `LoanDesk::finance` pays a move or startup from savings,
//!   or covers the shortfall with a loan
//! - **Servicing**: `pay_loans` compounds interest and sweeps savings into
//!   every outstanding loan once per tick

mod desk;
mod terms;

pub use desk::{Funding, LoanDesk, can_repay_loan, pay_loans, service_loan};
pub use terms::LendingTerms;
