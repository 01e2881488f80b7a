//! Payment gateway seam used when an escrow is funded.

use uuid::Uuid;

use crate::ResultEngine;

/// Charges a buyer for an escrow and returns the provider's reference.
pub trait PaymentGateway: Send + Sync + std::fmt::Debug {
    fn charge(&self, escrow_number: &str, amount_ngn: f64) -> ResultEngine<String>;
}

/// Settles every charge immediately. Used until a real provider is wired in.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockPaymentGateway;

impl PaymentGateway for MockPaymentGateway {
    fn charge(&self, escrow_number: &str, amount_ngn: f64) -> ResultEngine<String> {
        let reference = format!("MOCK-{}", Uuid::new_v4().simple());
        tracing::info!(escrow_number, amount_ngn, reference = %reference, "mock payment settled");
        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_gateway_always_settles_with_a_fresh_reference() {
        let gateway = MockPaymentGateway;
        let first = gateway.charge("ESC-00000000", 22_500.0).unwrap();
        let second = gateway.charge("ESC-00000000", 22_500.0).unwrap();

        assert!(first.starts_with("MOCK-"));
        assert_ne!(first, second);
    }
}
