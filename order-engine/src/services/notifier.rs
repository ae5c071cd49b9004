//! 通知服务
//!
//! 封装 broadcast 通道，向订阅者（厨房大屏、收银端等传输层消费者）
//! 推送订单事件。发布是 fire-and-forget：没有订阅者时事件被丢弃。

use shared::message::BusEvent;
use tokio::sync::broadcast;

/// Staff notification channel
#[derive(Clone, Debug)]
pub struct Notifier {
    tx: broadcast::Sender<BusEvent>,
}

impl Notifier {
    /// 创建通知服务
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 订阅事件流
    pub fn subscribe(&self) -> broadcast::Receiver<BusEvent> {
        self.tx.subscribe()
    }

    /// 发布事件（fire-and-forget）
    pub fn publish(&self, event: BusEvent) {
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::debug!(receivers, "Event published");
            }
            Err(_) => {
                // 没有订阅者不是错误
                tracing::debug!("Event dropped, no subscribers");
            }
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event(order_id: i64) -> BusEvent {
        BusEvent::NewOrder {
            order_id,
            customer_name: "Ana".to_string(),
            table_id: None,
            total_amount: 60000,
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let notifier = Notifier::new(16);
        let mut rx = notifier.subscribe();
        notifier.publish(make_event(1));
        let event = rx.recv().await.unwrap();
        assert_eq!(event, make_event(1));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_does_not_panic() {
        let notifier = Notifier::new(16);
        notifier.publish(make_event(1));
    }

    #[tokio::test]
    async fn test_all_subscribers_receive_broadcast() {
        let notifier = Notifier::new(16);
        let mut rx1 = notifier.subscribe();
        let mut rx2 = notifier.subscribe();
        notifier.publish(make_event(7));
        assert_eq!(rx1.recv().await.unwrap(), make_event(7));
        assert_eq!(rx2.recv().await.unwrap(), make_event(7));
    }
}
