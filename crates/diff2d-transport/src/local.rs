//! Thread-hosted process group over crossbeam channels.

use crossbeam_channel::{Receiver, Sender};
use diff2d_core::{Rank, Tag, Transport, TransportError};

/// Payload carried between two ranks.
#[derive(Debug)]
enum Message {
    Rows { tag: Tag, data: Vec<f64> },
    Scalar(u64),
}

impl Message {
    fn kind(&self) -> &'static str {
        match self {
            Self::Rows { .. } => "row message",
            Self::Scalar(_) => "gathered scalar",
        }
    }
}

/// A group of `size` connected [`LocalTransport`]s.
///
/// # Examples
///
/// ```
/// use diff2d_core::{Rank, Tag, Transport};
/// use diff2d_transport::LocalGroup;
///
/// let mut ranks = LocalGroup::new(2).into_transports();
/// let r1 = ranks.pop().unwrap();
/// let r0 = ranks.pop().unwrap();
///
/// let peer = std::thread::spawn(move || {
///     let mut got = [0.0; 2];
///     r1.sendrecv(&[3.0, 4.0], Some(Rank(0)), Tag(1), &mut got, Some(Rank(0)), Tag(1))
///         .unwrap();
///     got
/// });
/// let mut got = [0.0; 2];
/// r0.sendrecv(&[1.0, 2.0], Some(Rank(1)), Tag(1), &mut got, Some(Rank(1)), Tag(1))
///     .unwrap();
/// assert_eq!(got, [3.0, 4.0]);
/// assert_eq!(peer.join().unwrap(), [1.0, 2.0]);
/// ```
#[derive(Debug)]
pub struct LocalGroup {
    transports: Vec<LocalTransport>,
}

impl LocalGroup {
    /// Wire up `size` ranks, one unbounded channel per ordered pair.
    pub fn new(size: usize) -> Self {
        // channels[from][to]
        let mut outgoing: Vec<Vec<Option<Sender<Message>>>> =
            (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut incoming: Vec<Vec<Option<Receiver<Message>>>> =
            (0..size).map(|_| (0..size).map(|_| None).collect()).collect();

        for (from, senders) in outgoing.iter_mut().enumerate() {
            for receivers in incoming.iter_mut() {
                let (tx, rx) = crossbeam_channel::unbounded();
                senders.push(Some(tx));
                receivers[from] = Some(rx);
            }
        }

        let transports = outgoing
            .into_iter()
            .zip(incoming)
            .enumerate()
            .map(|(r, (senders, receivers))| LocalTransport {
                rank: Rank(r),
                size,
                senders,
                receivers,
            })
            .collect();
        Self { transports }
    }

    /// Number of ranks.
    pub fn size(&self) -> usize {
        self.transports.len()
    }

    /// One transport per rank, in rank order.
    pub fn into_transports(self) -> Vec<LocalTransport> {
        self.transports
    }
}

/// One rank's endpoint of a [`LocalGroup`].
///
/// Dropping it disconnects the rank: every peer blocked on a receive
/// from it gets [`TransportError::PeerDisconnected`].
#[derive(Debug)]
pub struct LocalTransport {
    rank: Rank,
    size: usize,
    /// Indexed by destination rank.
    senders: Vec<Option<Sender<Message>>>,
    /// Indexed by source rank.
    receivers: Vec<Option<Receiver<Message>>>,
}

impl LocalTransport {
    fn check(&self, rank: Rank) -> Result<usize, TransportError> {
        if rank.index() < self.size {
            Ok(rank.index())
        } else {
            Err(TransportError::InvalidRank {
                rank,
                size: self.size,
            })
        }
    }

    fn send(&self, to: Rank, msg: Message) -> Result<(), TransportError> {
        let idx = self.check(to)?;
        let tx = self.senders[idx]
            .as_ref()
            .ok_or(TransportError::PeerDisconnected { peer: to })?;
        tx.send(msg)
            .map_err(|_| TransportError::PeerDisconnected { peer: to })
    }

    fn recv(&self, from: Rank) -> Result<Message, TransportError> {
        let idx = self.check(from)?;
        let rx = self.receivers[idx]
            .as_ref()
            .ok_or(TransportError::PeerDisconnected { peer: from })?;
        rx.recv()
            .map_err(|_| TransportError::PeerDisconnected { peer: from })
    }

    /// Leave the group early, releasing both ends of every channel.
    ///
    /// Peers waiting on this rank observe a disconnect. Further calls on
    /// this transport fail with [`TransportError::PeerDisconnected`].
    pub fn disconnect(&mut self) {
        self.senders.iter_mut().for_each(|s| *s = None);
        self.receivers.iter_mut().for_each(|r| *r = None);
    }
}

impl Transport for LocalTransport {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn sendrecv(
        &self,
        send: &[f64],
        to: Option<Rank>,
        send_tag: Tag,
        recv: &mut [f64],
        from: Option<Rank>,
        recv_tag: Tag,
    ) -> Result<(), TransportError> {
        // Channels are unbounded, so posting the send first cannot block
        // and the pair behaves as one combined operation.
        if let Some(to) = to {
            self.send(
                to,
                Message::Rows {
                    tag: send_tag,
                    data: send.to_vec(),
                },
            )?;
        }
        let Some(from) = from else {
            return Ok(());
        };
        match self.recv(from)? {
            Message::Rows { tag, data } => {
                if tag != recv_tag {
                    return Err(TransportError::TagMismatch {
                        peer: from,
                        expected: recv_tag,
                        found: tag,
                    });
                }
                if data.len() != recv.len() {
                    return Err(TransportError::LengthMismatch {
                        peer: from,
                        expected: recv.len(),
                        found: data.len(),
                    });
                }
                recv.copy_from_slice(&data);
                Ok(())
            }
            other => Err(TransportError::UnexpectedMessage {
                peer: from,
                reason: format!("expected row message, got {}", other.kind()),
            }),
        }
    }

    fn gather(&self, value: u64, root: Rank) -> Result<Vec<u64>, TransportError> {
        self.check(root)?;
        if self.rank != root {
            self.send(root, Message::Scalar(value))?;
            return Ok(Vec::new());
        }
        let mut out = Vec::with_capacity(self.size);
        for r in (0..self.size).map(Rank) {
            if r == root {
                out.push(value);
                continue;
            }
            match self.recv(r)? {
                Message::Scalar(v) => out.push(v),
                other => {
                    return Err(TransportError::UnexpectedMessage {
                        peer: r,
                        reason: format!("expected gathered scalar, got {}", other.kind()),
                    })
                }
            }
        }
        Ok(out)
    }
}
