//! In-process message port.

use chemhover_protocols::ChannelError;
use tokio::sync::mpsc;

/// One end of a bidirectional text-frame channel.
pub struct Port {
    tx: mpsc::UnboundedSender<String>,
    rx: mpsc::UnboundedReceiver<String>,
}

/// Build two connected ports: frames sent on one arrive at the other.
pub fn pair() -> (Port, Port) {
    let (a_tx, b_rx) = mpsc::unbounded_channel();
    let (b_tx, a_rx) = mpsc::unbounded_channel();
    (Port { tx: a_tx, rx: a_rx }, Port { tx: b_tx, rx: b_rx })
}

impl Port {
    /// Separate the sending and receiving halves.
    pub fn split(self) -> (PortSender, PortReceiver) {
        (PortSender(self.tx), PortReceiver(self.rx))
    }
}

/// Sending half of a [`Port`]. Cheap to clone.
#[derive(Clone)]
pub struct PortSender(mpsc::UnboundedSender<String>);

impl PortSender {
    pub fn send(&self, frame: String) -> Result<(), ChannelError> {
        self.0.send(frame).map_err(|_| ChannelError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

/// Receiving half of a [`Port`].
pub struct PortReceiver(mpsc::UnboundedReceiver<String>);

impl PortReceiver {
    /// Next frame, or `None` once the other end is gone.
    pub async fn recv(&mut self) -> Option<String> {
        self.0.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pair_is_crossed() {
        let (a, b) = pair();
        let (a_tx, mut a_rx) = a.split();
        let (b_tx, mut b_rx) = b.split();

        a_tx.send("ping".to_string()).unwrap();
        assert_eq!(b_rx.recv().await.as_deref(), Some("ping"));

        b_tx.send("pong".to_string()).unwrap();
        assert_eq!(a_rx.recv().await.as_deref(), Some("pong"));
    }

    #[tokio::test]
    async fn test_send_after_peer_dropped() {
        let (a, b) = pair();
        drop(b);
        let (a_tx, mut a_rx) = a.split();
        assert!(a_tx.is_closed());
        assert!(matches!(a_tx.send("x".to_string()), Err(ChannelError::Closed)));
        assert!(a_rx.recv().await.is_none());
    }
}
