//! Mock payment gateway for development and testing.

use crate::error::{RegistrationError, Result};
use crate::providers::{GatewayOrder, PaymentGateway};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// Mock payment gateway.
///
/// Records every order it creates; never touches the network.
#[derive(Clone, Default)]
pub struct MockPaymentGateway {
    orders: Arc<Mutex<Vec<GatewayOrder>>>,
    should_succeed: bool,
}

impl MockPaymentGateway {
    /// Create a mock gateway that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: Arc::new(Mutex::new(Vec::new())),
            should_succeed: true,
        }
    }

    /// Create a mock gateway that fails every order request.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            orders: Arc::new(Mutex::new(Vec::new())),
            should_succeed: false,
        }
    }

    /// Orders created so far.
    #[must_use]
    pub fn orders(&self) -> Vec<GatewayOrder> {
        self.orders.lock().map(|orders| orders.clone()).unwrap_or_default()
    }

    /// Number of orders created so far.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.lock().map(|orders| orders.len()).unwrap_or(0)
    }
}

impl PaymentGateway for MockPaymentGateway {
    fn create_order(
        &self,
        amount_minor_units: i64,
        currency: String,
        receipt: String,
    ) -> Pin<Box<dyn Future<Output = Result<GatewayOrder>> + Send>> {
        let orders = Arc::clone(&self.orders);
        let should_succeed = self.should_succeed;

        Box::pin(async move {
            if !should_succeed {
                return Err(RegistrationError::Gateway(
                    "Mock gateway configured to fail".to_string(),
                ));
            }

            let order = GatewayOrder {
                id: format!("order_mock_{}", uuid::Uuid::new_v4().simple()),
                amount: amount_minor_units,
                currency,
                receipt,
                status: "created".to_string(),
            };

            if let Ok(mut recorded) = orders.lock() {
                recorded.push(order.clone());
            }

            Ok(order)
        })
    }
}
