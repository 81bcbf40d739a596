//! Order-entry request and response models.
//!
//! The execution report summarizes the post-submit state of an order and
//! its fills. `exec_type` and `order_status` carry the protocol character
//! codes derived from the order status; `average_price` is the
//! quantity-weighted price over the reported trades, zero when there were
//! none.

use exchange_types::numeric::weighted_average;
use exchange_types::{time, Order, OrderId, OrderStatus, OrderType, Price, Side};
use matching_engine::OrderResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderRequest {
    pub client_order_id: String,
    pub symbol: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Required for LIMIT orders; ignored for MARKET.
    #[serde(default)]
    pub price: Option<Price>,
    pub quantity: u64,
    pub client_id: String,
}

impl SubmitOrderRequest {
    /// Admit the request as a new order, assigning its engine id.
    pub fn into_order(self) -> Order {
        Order::new(
            self.client_order_id,
            self.symbol,
            self.side,
            self.order_type,
            self.price.unwrap_or(Price::ZERO),
            self.quantity,
            self.client_id,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub order_id: OrderId,
    pub client_order_id: String,
    pub symbol: String,
    pub side: Side,
    pub total_qty: u64,
    pub remaining_qty: u64,
    pub filled_qty: u64,
    pub average_price: Decimal,
    pub exec_type: char,
    pub order_status: char,
    pub transact_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
}

impl ExecutionReport {
    pub fn from_result(result: &OrderResult) -> Self {
        let order = &result.order;
        let average_price =
            weighted_average(result.trades.iter().map(|t| (t.price, t.quantity)));
        Self {
            order_id: order.order_id,
            client_order_id: order.client_order_id.clone(),
            symbol: order.symbol.clone(),
            side: order.side,
            total_qty: order.quantity,
            remaining_qty: order.remaining_quantity,
            filled_qty: order.filled_quantity(),
            average_price,
            exec_type: exec_type_code(order.status),
            order_status: order_status_code(order.status),
            transact_time: time::unix_millis(),
            reject_reason: result.error.clone(),
        }
    }
}

/// Protocol execution-type code for a status transition.
pub fn exec_type_code(status: OrderStatus) -> char {
    match status {
        OrderStatus::New => '0',
        OrderStatus::PartiallyFilled => '1',
        OrderStatus::Filled => '2',
        OrderStatus::Cancelled => '4',
        OrderStatus::PendingCancel => '6',
        OrderStatus::Rejected => '8',
    }
}

/// Protocol order-status code. Same table as the execution type.
pub fn order_status_code(status: OrderStatus) -> char {
    exec_type_code(status)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub symbol: String,
    pub order_id: OrderId,
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_types::Trade;
    use rust_decimal_macros::dec;

    fn request_json(price: &str) -> String {
        format!(
            r#"{{
                "clientOrderId": "C1",
                "symbol": "AAPL",
                "side": "BUY",
                "type": "LIMIT",
                "price": {price},
                "quantity": 100,
                "clientId": "CLIENT1"
            }}"#
        )
    }

    #[test]
    fn request_accepts_numeric_and_string_prices() {
        let from_num: SubmitOrderRequest =
            serde_json::from_str(&request_json("150.25")).unwrap();
        let from_str: SubmitOrderRequest =
            serde_json::from_str(&request_json("\"150.25\"")).unwrap();
        assert_eq!(from_num.price, from_str.price);
        assert_eq!(from_num.order_type, OrderType::Limit);
    }

    #[test]
    fn market_request_needs_no_price() {
        let request: SubmitOrderRequest = serde_json::from_str(
            r#"{
                "clientOrderId": "M1",
                "symbol": "AAPL",
                "side": "SELL",
                "type": "MARKET",
                "quantity": 50,
                "clientId": "CLIENT1"
            }"#,
        )
        .unwrap();
        let order = request.into_order();
        assert_eq!(order.order_type, OrderType::Market);
        assert!(order.price.is_zero());
    }

    #[test]
    fn status_codes_follow_the_protocol_table() {
        assert_eq!(exec_type_code(OrderStatus::New), '0');
        assert_eq!(exec_type_code(OrderStatus::PartiallyFilled), '1');
        assert_eq!(exec_type_code(OrderStatus::Filled), '2');
        assert_eq!(exec_type_code(OrderStatus::Cancelled), '4');
        assert_eq!(exec_type_code(OrderStatus::PendingCancel), '6');
        assert_eq!(exec_type_code(OrderStatus::Rejected), '8');
        assert_eq!(order_status_code(OrderStatus::Filled), '2');
    }

    #[test]
    fn report_averages_fill_prices() {
        let order = Order::new(
            "B1",
            "AAPL",
            Side::Buy,
            OrderType::Limit,
            "151.00".parse().unwrap(),
            200,
            "BUYER",
        )
        .with_fill(200);
        let maker_a = OrderId::from_u64(900);
        let maker_b = OrderId::from_u64(901);
        let trades = vec![
            Trade::new(
                order.order_id,
                maker_a,
                "AAPL",
                "150.00".parse().unwrap(),
                100,
                "BUYER",
                "SELLER1",
            ),
            Trade::new(
                order.order_id,
                maker_b,
                "AAPL",
                "151.00".parse().unwrap(),
                100,
                "BUYER",
                "SELLER2",
            ),
        ];
        let result = OrderResult {
            order,
            trades,
            error: None,
        };

        let report = ExecutionReport::from_result(&result);
        assert_eq!(report.exec_type, '2');
        assert_eq!(report.filled_qty, 200);
        assert_eq!(report.remaining_qty, 0);
        assert_eq!(report.average_price, dec!(150.5));
        assert!(report.reject_reason.is_none());
    }

    #[test]
    fn rejected_report_has_zero_average_and_a_reason() {
        let order = Order::new(
            "B1",
            "FAKE",
            Side::Buy,
            OrderType::Limit,
            "150.00".parse().unwrap(),
            100,
            "BUYER",
        )
        .with_reject();
        let result = OrderResult {
            order,
            trades: Vec::new(),
            error: Some("Unknown symbol".to_string()),
        };

        let report = ExecutionReport::from_result(&result);
        assert_eq!(report.exec_type, '8');
        assert_eq!(report.order_status, '8');
        assert_eq!(report.average_price, Decimal::ZERO);
        assert_eq!(report.reject_reason.as_deref(), Some("Unknown symbol"));

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["execType"], "8");
        assert_eq!(value["rejectReason"], "Unknown symbol");
    }
}
