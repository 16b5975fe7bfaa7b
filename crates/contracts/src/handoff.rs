//! Handoff - driver 与投递 worker 之间的同步交接点
//!
//! 接收端空闲时先提交一个一次性槽位，发送端拿到槽位后才生成并放入记录。
//! 因此 `send` 在接收端准备好之前一直阻塞，通道中不会缓存任何记录。

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::ConvertedRecord;

type Slot = oneshot::Sender<ConvertedRecord>;

/// 对端已关闭
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("handoff receiver is gone")]
pub struct HandoffClosed;

/// 创建一对交接端点
pub fn handoff() -> (HandoffSender, HandoffReceiver) {
    // Carries at most one idle-receiver slot, never a record
    let (ready_tx, ready_rx) = mpsc::channel(1);
    (
        HandoffSender { ready: ready_rx },
        HandoffReceiver { ready: ready_tx },
    )
}

/// 发送端（driver 持有）
#[derive(Debug)]
pub struct HandoffSender {
    ready: mpsc::Receiver<Slot>,
}

impl HandoffSender {
    /// 等待接收端就绪，然后交出 `make` 生成的记录。
    ///
    /// `make` 只在接收端已经在等待时调用，适合在交接瞬间打时间戳。
    /// 取消是安全的：未拿到槽位前取消不会丢失任何已交接的记录。
    pub async fn send_with<F>(&mut self, make: F) -> Result<(), HandoffClosed>
    where
        F: FnOnce() -> ConvertedRecord,
    {
        let slot = self.ready.recv().await.ok_or(HandoffClosed)?;
        slot.send(make()).map_err(|_| HandoffClosed)
    }

    /// 交出一条已构造好的记录
    pub async fn send(&mut self, record: ConvertedRecord) -> Result<(), HandoffClosed> {
        self.send_with(move || record).await
    }
}

/// 接收端（投递 worker 持有）
#[derive(Debug)]
pub struct HandoffReceiver {
    ready: mpsc::Sender<Slot>,
}

impl HandoffReceiver {
    /// 宣告就绪并等待下一条记录，发送端被丢弃后返回 `None`
    pub async fn recv(&mut self) -> Option<ConvertedRecord> {
        let (slot, record) = oneshot::channel();
        self.ready.send(slot).await.ok()?;
        record.await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(humidity: f32) -> ConvertedRecord {
        ConvertedRecord {
            capture_time: Default::default(),
            temperature_c: 0.0,
            wind_speed_kmh: 0.0,
            humidity,
        }
    }

    #[tokio::test]
    async fn test_send_then_recv() {
        let (mut tx, mut rx) = handoff();
        let receiver = tokio::spawn(async move { rx.recv().await });

        tx.send(record(42.0)).await.unwrap();
        let received = receiver.await.unwrap().unwrap();
        assert_eq!(received.humidity, 42.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_blocks_until_receiver_ready() {
        let (mut tx, mut rx) = handoff();

        // Nobody is receiving yet
        let pending = tokio::time::timeout(Duration::from_secs(1), tx.send(record(1.0))).await;
        assert!(pending.is_err());

        let receiver = tokio::spawn(async move { rx.recv().await });
        tx.send(record(2.0)).await.unwrap();
        assert_eq!(receiver.await.unwrap().unwrap().humidity, 2.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_make_runs_only_at_handoff() {
        let (mut tx, mut rx) = handoff();
        let made = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));

        let flag = made.clone();
        let sender = tokio::spawn(async move {
            tx.send_with(|| {
                flag.store(true, std::sync::atomic::Ordering::SeqCst);
                record(3.0)
            })
            .await
        });

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!made.load(std::sync::atomic::Ordering::SeqCst));

        assert_eq!(rx.recv().await.unwrap().humidity, 3.0);
        sender.await.unwrap().unwrap();
        assert!(made.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_recv_after_sender_dropped() {
        let (tx, mut rx) = handoff();
        drop(tx);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped() {
        let (mut tx, rx) = handoff();
        drop(rx);
        assert_eq!(tx.send(record(1.0)).await, Err(HandoffClosed));
    }
}
