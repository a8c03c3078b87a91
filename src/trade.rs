use std::fmt;

use serde::Serialize;

use crate::portfolio::{Portfolio, aggregate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    /// A trade must strictly add contribution; a wash is rejected.
    pub fn from_difference(difference: f64) -> Self {
        if difference > 0.0 {
            Verdict::Approved
        } else {
            Verdict::Rejected
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Approved => f.write_str("APPROVED"),
            Verdict::Rejected => f.write_str("REJECTED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeEvaluation {
    pub outgoing_total: f64,
    pub incoming_total: f64,
    pub difference: f64,
    pub verdict: Verdict,
}

impl TradeEvaluation {
    pub fn from_totals(outgoing_total: f64, incoming_total: f64) -> Self {
        let difference = incoming_total - outgoing_total;
        Self {
            outgoing_total,
            incoming_total,
            difference,
            verdict: Verdict::from_difference(difference),
        }
    }

    pub fn summary(&self) -> String {
        let conclusion = match self.verdict {
            Verdict::Approved => "VERDICT: Trade APPROVED (Worthwhile)",
            Verdict::Rejected => "VERDICT: Trade REJECTED (Not Worthwhile)",
        };
        format!(
            "Total Outgoing Pe: {:.4}  vs  Total Incoming Pe: {:.4}\nNet Difference: {:+.4}\n\n{}",
            self.outgoing_total, self.incoming_total, self.difference, conclusion
        )
    }
}

pub fn compare(outgoing: &Portfolio, incoming: &Portfolio) -> TradeEvaluation {
    let evaluation = TradeEvaluation::from_totals(aggregate(outgoing), aggregate(incoming));
    tracing::debug!(
        outgoing = outgoing.len(),
        incoming = incoming.len(),
        difference = evaluation.difference,
        verdict = %evaluation.verdict,
        "trade compared"
    );
    evaluation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wash_is_rejected() {
        assert_eq!(Verdict::from_difference(0.0), Verdict::Rejected);
        assert_eq!(Verdict::from_difference(-0.0), Verdict::Rejected);
        assert_eq!(Verdict::from_difference(1e-9), Verdict::Approved);
    }

    #[test]
    fn summary_shows_signed_difference() {
        let eval = TradeEvaluation::from_totals(3.0, 2.5);
        let text = eval.summary();
        assert!(text.contains("Net Difference: -0.5000"));
        assert!(text.contains("REJECTED"));
    }
}
